#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Display formatting for raw ODF document content.
//!
//! Layout: `xml.rs` (indenting pretty-printer with a strict and a degraded
//! entry point), `json.rs` (two-space JSON pretty-printing), `content.rs`
//! (XML/JSON sniffing and dispatch), `highlight.rs` (ANSI syntax colouring).

pub mod content;
pub mod highlight;
pub mod json;
pub mod xml;

pub use content::{ContentKind, format_content};
pub use highlight::highlight;
pub use json::{pretty_print_json, render_json, render_value};
pub use xml::{INDENT_UNIT, XmlFormatError, break_tags, pretty_print_xml, render_xml};
