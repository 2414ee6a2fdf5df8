//! Parsing helpers for configuration values.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse an HTTP(S) base URL and normalise it to end with `/`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for unparsable URLs and for schemes
/// other than `http`/`https`.
pub fn parse_api_url(field: &str, raw: &str) -> ConfigResult<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|err| ConfigError::invalid(field, trimmed, format!("not a URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            field,
            trimmed,
            "scheme must be http or https",
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::invalid(field, trimmed, "must be a base URL"));
    }
    Ok(ensure_trailing_slash(url))
}

/// Append `/` to the path so relative joins extend it instead of replacing
/// its last segment.
#[must_use]
pub fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Parse an unsigned integer within `min..=max`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a number or is
/// out of range.
pub fn parse_bounded_u64(field: &str, raw: &str, min: u64, max: u64) -> ConfigResult<u64> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid(field, trimmed, "must be an unsigned integer"))?;
    if !(min..=max).contains(&value) {
        return Err(ConfigError::invalid(
            field,
            trimmed,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(value)
}

/// [`parse_bounded_u64`] narrowed to `u32`.
///
/// # Errors
///
/// Same as [`parse_bounded_u64`].
pub fn parse_bounded_u32(field: &str, raw: &str, min: u32, max: u32) -> ConfigResult<u32> {
    let value = parse_bounded_u64(field, raw, u64::from(min), u64::from(max))?;
    u32::try_from(value).map_err(|_| ConfigError::invalid(field, raw.trim(), "out of range"))
}
