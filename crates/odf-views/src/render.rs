//! Terminal rendering options.

use terminal_size::{Width, terminal_size};

/// Width assumed when stdout is not a terminal.
pub const FALLBACK_WIDTH: usize = 120;

/// How views lay out and decorate their output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colour escapes.
    pub color: bool,
    /// Available columns.
    pub width: usize,
}

impl RenderOptions {
    /// Uncoloured output at `width` columns.
    #[must_use]
    pub const fn plain(width: usize) -> Self {
        Self {
            color: false,
            width,
        }
    }

    /// Options for the current terminal.
    #[must_use]
    pub fn detect(color: bool) -> Self {
        let width = terminal_size().map_or(FALLBACK_WIDTH, |(Width(width), _)| usize::from(width));
        Self { color, width }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::plain(FALLBACK_WIDTH)
    }
}
