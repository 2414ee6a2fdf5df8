//! ANSI syntax highlighting for formatted XML and JSON.
//!
//! Highlighting only wraps tokens in colour escapes; stripping the escapes
//! yields the input unchanged.

use owo_colors::OwoColorize;

use crate::content::ContentKind;

/// Highlight already formatted `text` of the given kind.
///
/// Returns `text` untouched when `enabled` is false.
#[must_use]
pub fn highlight(kind: ContentKind, text: &str, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    match kind {
        ContentKind::Xml => highlight_xml(text),
        ContentKind::Json => highlight_json(text),
    }
}

fn highlight_xml(text: &str) -> String {
    let mut output = String::with_capacity(text.len() * 2);
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        output.push_str(&rest[..start]);
        rest = &rest[start..];
        let Some(end) = rest.find('>') else {
            break;
        };
        highlight_tag(&rest[..=end], &mut output);
        rest = &rest[end + 1..];
    }
    output.push_str(rest);
    output
}

fn highlight_tag(tag: &str, output: &mut String) {
    if tag.starts_with("<!") || tag.starts_with("<?") {
        output.push_str(&tag.dimmed().to_string());
        return;
    }

    let (open, body) = if let Some(body) = tag.strip_prefix("</") {
        ("</", body)
    } else {
        ("<", &tag[1..])
    };
    let (body, close) = if let Some(body) = body.strip_suffix("/>") {
        (body, "/>")
    } else {
        (body.strip_suffix('>').unwrap_or(body), ">")
    };

    output.push_str(&open.dimmed().to_string());
    let name_end = body
        .find(|ch: char| ch.is_whitespace())
        .unwrap_or(body.len());
    let (name, attributes) = body.split_at(name_end);
    output.push_str(&name.blue().to_string());
    highlight_attributes(attributes, output);
    output.push_str(&close.dimmed().to_string());
}

fn highlight_attributes(attributes: &str, output: &mut String) {
    let mut chars = attributes.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch == '"' || ch == '\'' {
            let mut end = attributes.len();
            for (close_index, close) in chars.by_ref() {
                if close == ch {
                    end = close_index + close.len_utf8();
                    break;
                }
            }
            let value = &attributes[index..end];
            output.push_str(&value.green().to_string());
        } else if ch.is_whitespace() || ch == '=' {
            output.push(ch);
        } else {
            let mut end = index + ch.len_utf8();
            while let Some(&(next_index, next)) = chars.peek() {
                if next.is_whitespace() || next == '=' || next == '"' || next == '\'' {
                    break;
                }
                end = next_index + next.len_utf8();
                chars.next();
            }
            let name = &attributes[index..end];
            output.push_str(&name.cyan().to_string());
        }
    }
}

fn highlight_json(text: &str) -> String {
    let mut output = String::with_capacity(text.len() * 2);
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => {
                let mut end = text.len();
                let mut escaped = false;
                for (close_index, close) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if close == '\\' {
                        escaped = true;
                    } else if close == '"' {
                        end = close_index + 1;
                        break;
                    }
                }
                let literal = &text[index..end];
                if text[end..].trim_start().starts_with(':') {
                    output.push_str(&literal.cyan().to_string());
                } else {
                    output.push_str(&literal.green().to_string());
                }
            }
            '-' | '0'..='9' | 'a'..='z' => {
                let mut end = index + 1;
                while let Some(&(next_index, next)) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || matches!(next, '.' | '+' | '-')) {
                        break;
                    }
                    end = next_index + next.len_utf8();
                    chars.next();
                }
                let token = &text[index..end];
                if matches!(token, "true" | "false" | "null") {
                    output.push_str(&token.magenta().to_string());
                } else {
                    output.push_str(&token.yellow().to_string());
                }
            }
            _ => output.push(ch),
        }
    }
    output
}
