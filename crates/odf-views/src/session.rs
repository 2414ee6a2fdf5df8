//! Interactive browse session over the list, detail and compare views.
//!
//! # Design
//! - Text filter edits update a draft immediately and reach the list only
//!   after the debounce window settles.
//! - Discipline edits, paging and clearing apply at once.
//! - All requests go through the shared cache; `refresh` empties it.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use odf_client::{CachedDocuments, DocumentsApi, QueryCache};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::compare::CompareView;
use crate::debounce::Debouncer;
use crate::detail::{DetailMode, DetailView};
use crate::filters::{DocumentFilters, FilterError, FilterField};
use crate::list::{ListController, ListState};
use crate::render::RenderOptions;
use crate::status::render_error;

/// Commands understood by the session.
pub const HELP: &str = "\
commands:
  filter <field> [value]   set a filter (competition-code, document-code,
                           document-type, document-subtype, discipline);
                           no value clears it
  clear                    clear every filter
  list                     show the current page again
  next | prev              move one page
  page <n>                 jump to page n
  open <id> [raw|parsed]   show a document
  compare <id1> <id2>      show two documents side by side
  refresh                  drop cached responses and reload
  help                     show this text
  quit                     leave the session
";

const NO_PAGE_LOADED: &str =
    "no page loaded; fix the filters or `refresh` before moving to the next page\n";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Set one filter.
    Filter(FilterField, String),
    /// Clear every filter.
    Clear,
    /// Re-render the current page.
    List,
    /// Next page.
    Next,
    /// Previous page.
    Prev,
    /// Jump to a page.
    Page(u32),
    /// Show one document.
    Open(String, DetailMode),
    /// Show two documents side by side.
    Compare(String, String),
    /// Drop the cache and reload.
    Refresh,
    /// Show the command list.
    Help,
    /// Leave.
    Quit,
}

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line.
    #[error("empty command; type `help` for the list of commands")]
    Empty,
    /// Unrecognised command word.
    #[error("unknown command `{command}`; type `help` for the list of commands")]
    Unknown {
        /// Word as typed.
        command: String,
    },
    /// A required argument is missing.
    #[error("`{command}` requires {argument}")]
    MissingArgument {
        /// Command word.
        command: &'static str,
        /// Description of the missing argument.
        argument: &'static str,
    },
    /// Page is not a positive integer.
    #[error("invalid page `{value}`; expected a number starting at 1")]
    InvalidPage {
        /// Value as typed.
        value: String,
    },
    /// Detail mode is neither `raw` nor `parsed`.
    #[error("invalid mode `{value}`; expected raw or parsed")]
    InvalidMode {
        /// Value as typed.
        value: String,
    },
    /// Unknown filter field.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(CommandError::Empty);
        };
        match command.to_ascii_lowercase().as_str() {
            "filter" | "f" => {
                let field = words.next().ok_or(CommandError::MissingArgument {
                    command: "filter",
                    argument: "a field name",
                })?;
                let field = field.parse::<FilterField>()?;
                Ok(Self::Filter(field, words.collect::<Vec<_>>().join(" ")))
            }
            "clear" => Ok(Self::Clear),
            "list" | "ls" => Ok(Self::List),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Prev),
            "page" => {
                let value = words.next().ok_or(CommandError::MissingArgument {
                    command: "page",
                    argument: "a page number",
                })?;
                match value.parse::<u32>() {
                    Ok(page) if page >= 1 => Ok(Self::Page(page)),
                    _ => Err(CommandError::InvalidPage {
                        value: value.to_string(),
                    }),
                }
            }
            "open" | "show" => {
                let id = words.next().ok_or(CommandError::MissingArgument {
                    command: "open",
                    argument: "a document id",
                })?;
                let mode = match words.next() {
                    None | Some("raw") => DetailMode::Raw,
                    Some("parsed") => DetailMode::Parsed,
                    Some(other) => {
                        return Err(CommandError::InvalidMode {
                            value: other.to_string(),
                        });
                    }
                };
                Ok(Self::Open(id.to_string(), mode))
            }
            "compare" => {
                let (Some(first), Some(second)) = (words.next(), words.next()) else {
                    return Err(CommandError::MissingArgument {
                        command: "compare",
                        argument: "two document ids",
                    });
                };
                Ok(Self::Compare(first.to_string(), second.to_string()))
            }
            "refresh" | "r" => Ok(Self::Refresh),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown {
                command: other.to_string(),
            }),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutput {
    /// Print this text.
    Render(String),
    /// End the session.
    Quit,
}

/// State of one interactive session.
pub struct BrowseSession<A> {
    documents: CachedDocuments<A>,
    list: ListController,
    draft: DocumentFilters,
    debouncer: Debouncer<DocumentFilters>,
    settled: UnboundedReceiver<DocumentFilters>,
    options: RenderOptions,
}

impl<A: DocumentsApi> BrowseSession<A> {
    /// Session over `api`, caching in `cache`.
    #[must_use]
    pub fn new(
        api: A,
        cache: Arc<QueryCache>,
        page_size: u32,
        debounce: Duration,
        options: RenderOptions,
    ) -> Self {
        let (debouncer, settled) = Debouncer::new(debounce);
        Self {
            documents: CachedDocuments::new(api, cache),
            list: ListController::new(page_size),
            draft: DocumentFilters::default(),
            debouncer,
            settled,
            options,
        }
    }

    /// Uncached API the session talks to.
    #[must_use]
    pub const fn api(&self) -> &A {
        self.documents.inner()
    }

    /// Filters as typed, including edits still settling.
    #[must_use]
    pub const fn draft(&self) -> &DocumentFilters {
        &self.draft
    }

    /// List controller.
    #[must_use]
    pub const fn list(&self) -> &ListController {
        &self.list
    }

    /// Whether a filter edit is still settling or settled but not yet applied.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending() || !self.settled.is_empty()
    }

    /// Load and render the first page.
    pub async fn start(&mut self) -> String {
        self.reload().await
    }

    /// Wait for the next settled filter edit.
    pub async fn next_settled(&mut self) -> Option<DocumentFilters> {
        self.settled.recv().await
    }

    /// Apply settled filters. Returns the re-rendered list when they differ
    /// from the applied ones.
    ///
    /// A value that no longer matches the draft was overtaken by a later
    /// command and is ignored.
    pub async fn apply_settled(&mut self, filters: DocumentFilters) -> Option<String> {
        if filters != self.draft {
            debug!("settled filters superseded by a later edit");
            return None;
        }
        if !self.list.set_filters(filters) {
            debug!("settled filters unchanged; no request issued");
            return None;
        }
        Some(self.reload().await)
    }

    /// Execute one command.
    pub async fn handle(&mut self, command: SessionCommand) -> SessionOutput {
        let text = match command {
            SessionCommand::Filter(field, value) => {
                self.draft.set(field, value);
                if field.is_free_text() && !self.debouncer.delay().is_zero() {
                    self.debouncer.push(self.draft.clone());
                    format!("filter {field}={} (applies when typing settles)\n", self.draft.get(field))
                } else {
                    self.apply_draft().await
                }
            }
            SessionCommand::Clear => {
                self.draft = DocumentFilters::default();
                self.apply_draft().await
            }
            SessionCommand::List => self.list.render(self.options),
            SessionCommand::Next => {
                if self.list.next_page() {
                    self.reload().await
                } else if matches!(self.list.state(), ListState::Loaded(_)) {
                    "already on the last page\n".to_string()
                } else {
                    NO_PAGE_LOADED.to_string()
                }
            }
            SessionCommand::Prev => {
                if self.list.previous_page() {
                    self.reload().await
                } else {
                    "already on the first page\n".to_string()
                }
            }
            SessionCommand::Page(page) => {
                self.list.set_page(page);
                self.reload().await
            }
            SessionCommand::Open(id, mode) => {
                match DetailView::load(&self.documents, &id, mode).await {
                    Ok(view) => view.render(mode, self.options),
                    Err(err) => render_error("document", &err, self.options.color),
                }
            }
            SessionCommand::Compare(first, second) => {
                match CompareView::load(&self.documents, &first, &second).await {
                    Ok(view) => view.render(self.options),
                    Err(err) => render_error("comparison", &err, self.options.color),
                }
            }
            SessionCommand::Refresh => {
                self.documents.cache().invalidate_all();
                info!("cache cleared");
                self.reload().await
            }
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Quit => {
                self.debouncer.cancel();
                return SessionOutput::Quit;
            }
        };
        SessionOutput::Render(text)
    }

    async fn apply_draft(&mut self) -> String {
        self.debouncer.cancel();
        self.list.set_filters(self.draft.clone());
        self.reload().await
    }

    async fn reload(&mut self) -> String {
        self.list.load(&self.documents).await;
        self.list.render(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odf_client::ApiError;
    use odf_client::testing::{RecordedCall, ScriptedApi};
    use odf_config::CacheSettings;
    use odf_test_support::fixtures::{sample_document, sample_list};
    use tokio::time::advance;

    fn session(api: ScriptedApi) -> BrowseSession<ScriptedApi> {
        BrowseSession::new(
            api,
            Arc::new(QueryCache::new(CacheSettings::default())),
            20,
            Duration::from_millis(500),
            RenderOptions::default(),
        )
    }

    fn rendered(output: SessionOutput) -> String {
        match output {
            SessionOutput::Render(text) => text,
            SessionOutput::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn commands_parse() {
        assert_eq!(
            "filter document-code SWM 100".parse(),
            Ok(SessionCommand::Filter(
                FilterField::DocumentCode,
                "SWM 100".into()
            ))
        );
        assert_eq!(
            "filter discipline".parse(),
            Ok(SessionCommand::Filter(FilterField::Discipline, String::new()))
        );
        assert_eq!("page 3".parse(), Ok(SessionCommand::Page(3)));
        assert_eq!(
            "open doc-1 parsed".parse(),
            Ok(SessionCommand::Open("doc-1".into(), DetailMode::Parsed))
        );
        assert_eq!(
            "compare a b".parse(),
            Ok(SessionCommand::Compare("a".into(), "b".into()))
        );
        assert_eq!("  Q ".parse(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert_eq!("".parse::<SessionCommand>(), Err(CommandError::Empty));
        assert_eq!(
            "page 0".parse::<SessionCommand>(),
            Err(CommandError::InvalidPage { value: "0".into() })
        );
        assert!(matches!(
            "compare a".parse::<SessionCommand>(),
            Err(CommandError::MissingArgument { command: "compare", .. })
        ));
        assert!(matches!(
            "filter colour red".parse::<SessionCommand>(),
            Err(CommandError::Filter(FilterError::UnknownField { .. }))
        ));
        assert!(matches!(
            "dance".parse::<SessionCommand>(),
            Err(CommandError::Unknown { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_issue_one_request_with_the_final_value() {
        let mut session = session(ScriptedApi::new().with_list(sample_list(1, 1)));
        session.start().await;

        for partial in ["S", "SW", "SWM"] {
            let output = rendered(
                session
                    .handle(SessionCommand::Filter(FilterField::DocumentCode, partial.into()))
                    .await,
            );
            assert!(output.contains("applies when typing settles"));
            advance(Duration::from_millis(100)).await;
        }
        assert_eq!(session.api().list_calls().len(), 1);

        let settled = session.next_settled().await.expect("settled value");
        assert_eq!(settled.document_code, "SWM");
        assert!(session.apply_settled(settled).await.is_some());

        let calls = session.api().list_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].document_code.as_deref(), Some("SWM"));
        assert_eq!(calls[1].page, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn settled_value_overtaken_by_clear_is_ignored() {
        let mut session = session(ScriptedApi::new());
        session.start().await;
        session
            .handle(SessionCommand::Filter(FilterField::DocumentType, "DT_RESULT".into()))
            .await;
        advance(Duration::from_millis(600)).await;
        while session.settled.is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(session.has_pending(), "settled but unapplied edits count as pending");
        session.handle(SessionCommand::Clear).await;

        let settled = session.next_settled().await.expect("settled value");
        assert!(session.apply_settled(settled).await.is_none());
        assert!(session.list().filters().is_empty());
        assert!(!session.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn next_without_a_loaded_page_explains_why() {
        let mut blocked = session(ScriptedApi::new());
        blocked.start().await;
        blocked
            .handle(SessionCommand::Filter(FilterField::Discipline, "sw".into()))
            .await;
        assert_eq!(
            rendered(blocked.handle(SessionCommand::Next).await),
            NO_PAGE_LOADED
        );

        let mut failing = session(
            ScriptedApi::new().with_list_error(ApiError::from_status(404, b"{}")),
        );
        failing.start().await;
        assert_eq!(
            rendered(failing.handle(SessionCommand::Next).await),
            NO_PAGE_LOADED
        );
        assert_eq!(failing.api().list_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn next_on_the_final_page_says_so() {
        let mut session = session(ScriptedApi::new().with_list(sample_list(1, 1)));
        session.start().await;
        assert_eq!(
            rendered(session.handle(SessionCommand::Next).await),
            "already on the last page\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn discipline_applies_immediately_and_invalid_values_block() {
        let mut session = session(ScriptedApi::new().with_list(sample_list(1, 1)));
        session.start().await;

        let output = rendered(
            session
                .handle(SessionCommand::Filter(FilterField::Discipline, "sw".into()))
                .await,
        );
        assert!(output.contains("discipline must be exactly 3 uppercase letters"));
        assert_eq!(session.api().list_calls().len(), 1);

        session
            .handle(SessionCommand::Filter(FilterField::Discipline, "SWM".into()))
            .await;
        let calls = session.api().list_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].discipline.as_deref(), Some("SWM"));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_pages_are_served_from_cache_until_refresh() {
        let mut session = session(ScriptedApi::new().with_list(sample_list(20, 60)));
        session.start().await;
        session.handle(SessionCommand::Next).await;
        session.handle(SessionCommand::Prev).await;
        assert_eq!(session.api().list_calls().len(), 2);

        session.handle(SessionCommand::Refresh).await;
        assert_eq!(session.api().list_calls().len(), 3);
        assert_eq!(
            rendered(session.handle(SessionCommand::Prev).await),
            "already on the first page\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn open_and_compare_render_their_views() {
        let mut session = session(
            ScriptedApi::new()
                .with_document(sample_document("a"))
                .with_document(sample_document("b")),
        );
        let detail = rendered(
            session
                .handle(SessionCommand::Open("a".into(), DetailMode::Raw))
                .await,
        );
        assert!(detail.contains("XML content"));

        let missing = rendered(
            session
                .handle(SessionCommand::Open("zzz".into(), DetailMode::Raw))
                .await,
        );
        assert!(missing.starts_with("Error loading document\nDocument zzz not found"));

        let compare = rendered(
            session
                .handle(SessionCommand::Compare("a".into(), "b".into()))
                .await,
        );
        assert!(compare.contains("Document 1 (a)"));
        assert!(
            session
                .api()
                .calls()
                .contains(&RecordedCall::Compare("a".into(), "b".into()))
        );
        assert_eq!(session.handle(SessionCommand::Quit).await, SessionOutput::Quit);
    }
}
