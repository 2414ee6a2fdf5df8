//! Error state shared by every view.

use odf_client::ApiError;
use owo_colors::OwoColorize;

/// "Error loading <subject>" followed by the most useful message available.
#[must_use]
pub fn render_error(subject: &str, err: &ApiError, color: bool) -> String {
    let title = format!("Error loading {subject}");
    let message = err.display_message();
    if color {
        format!("{}\n{}\n", title.red().bold(), message)
    } else {
        format!("{title}\n{message}\n")
    }
}
