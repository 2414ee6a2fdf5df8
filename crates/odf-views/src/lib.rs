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

//! View models for the ODF document viewer.
//!
//! Views are pure renderers over API responses plus small controllers that
//! decide when a request is issued. Everything renders to `String` so the
//! binary owns stdout.
//!
//! Layout:
//! - `filters.rs`: list filters, discipline validation, query parameters
//! - `debounce.rs`: timer that settles rapid edits into one value
//! - `list.rs`: list controller and table rendering
//! - `detail.rs`: document header, formatted content, clipboard escape
//! - `compare.rs`: side-by-side panes
//! - `status.rs`: error and loading states
//! - `session.rs`: interactive browse session tying the views together
//! - `render.rs`: terminal width and colour options

pub mod compare;
pub mod debounce;
pub mod detail;
pub mod filters;
pub mod list;
pub mod render;
pub mod session;
pub mod status;

pub use compare::{CompareView, render_compare};
pub use debounce::Debouncer;
pub use detail::{DetailMode, DetailView, osc52_copy, render_detail};
pub use filters::{DocumentFilters, FilterError, FilterField, is_valid_discipline};
pub use list::{EMPTY_STATE, ListController, ListState, format_date, render_list, render_table};
pub use render::RenderOptions;
pub use session::{BrowseSession, CommandError, SessionCommand, SessionOutput};
pub use status::render_error;
