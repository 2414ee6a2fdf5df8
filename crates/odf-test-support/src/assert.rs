//! Assertions over rendered terminal output.

/// Remove ANSI SGR sequences (`ESC [ … m`) from `text`.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }
    output
}

/// Panic unless every needle appears in `haystack`, in order.
///
/// # Panics
///
/// Panics naming the first needle that is missing or out of order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut rest = haystack;
    for needle in needles {
        match rest.find(needle) {
            Some(index) => rest = &rest[index + needle.len()..],
            None => panic!("expected `{needle}` (in order) within:\n{haystack}"),
        }
    }
}
