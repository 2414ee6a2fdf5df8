use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use odf_client::DocumentsApi;
use odf_views::{BrowseSession, SessionCommand, SessionOutput};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult};

pub(crate) async fn handle_browse<R, W>(ctx: &AppContext, input: R, output: W) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = BrowseSession::new(
        ctx.documents.inner().clone(),
        Arc::clone(ctx.documents.cache()),
        ctx.config.page_size,
        ctx.config.debounce,
        ctx.render,
    );
    run_browse(&mut session, input, output).await
}

/// Drive `session` from `input` until `quit` or end of input.
///
/// Settled filter edits are applied as soon as their debounce window closes,
/// even while waiting for the next line.
pub(crate) async fn run_browse<A, R, W>(
    session: &mut BrowseSession<A>,
    input: R,
    mut output: W,
) -> CliResult<()>
where
    A: DocumentsApi,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    emit(&mut output, &session.start().await)?;
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line
                    .context("failed to read command")
                    .map_err(CliError::failure)?;
                let Some(line) = line else {
                    flush_pending(session, &mut output).await?;
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(command) => match session.handle(command).await {
                        SessionOutput::Render(text) => emit(&mut output, &text)?,
                        SessionOutput::Quit => break,
                    },
                    Err(err) => emit(&mut output, &format!("{err}\n"))?,
                }
            }
            Some(filters) = session.next_settled() => {
                if let Some(text) = session.apply_settled(filters).await {
                    emit(&mut output, &text)?;
                }
            }
        }
    }
    debug!("browse session finished");
    Ok(())
}

/// Input ended mid-edit: let the last edit settle so it is not lost.
async fn flush_pending<A: DocumentsApi, W: Write>(
    session: &mut BrowseSession<A>,
    output: &mut W,
) -> CliResult<()> {
    if !session.has_pending() {
        return Ok(());
    }
    if let Some(filters) = session.next_settled().await
        && let Some(text) = session.apply_settled(filters).await
    {
        emit(output, &text)?;
    }
    Ok(())
}

fn emit<W: Write>(output: &mut W, text: &str) -> CliResult<()> {
    output
        .write_all(text.as_bytes())
        .and_then(|()| output.flush())
        .context("failed to write output")
        .map_err(CliError::failure)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use odf_client::QueryCache;
    use odf_client::testing::{RecordedCall, ScriptedApi};
    use odf_config::CacheSettings;
    use odf_test_support::fixtures::{sample_document, sample_list};
    use odf_views::RenderOptions;

    fn session(api: ScriptedApi) -> BrowseSession<ScriptedApi> {
        BrowseSession::new(
            api,
            Arc::new(QueryCache::new(CacheSettings::default())),
            20,
            Duration::from_millis(500),
            RenderOptions::plain(100),
        )
    }

    async fn drive(session: &mut BrowseSession<ScriptedApi>, script: &str) -> String {
        let mut output = Vec::new();
        run_browse(session, script.as_bytes(), &mut output)
            .await
            .expect("session should run");
        String::from_utf8(output).expect("utf-8 output")
    }

    #[tokio::test(start_paused = true)]
    async fn typed_filter_reaches_the_list_once_after_input_ends() {
        let mut browse = session(ScriptedApi::new().with_list(sample_list(3, 3)));
        let text = drive(
            &mut browse,
            "filter type D\nfilter type DT_\nfilter type DT_RESULT\n",
        )
        .await;

        let calls = browse.api().list_calls();
        assert_eq!(calls.len(), 2, "initial load plus the settled edit");
        assert_eq!(calls[1].document_type.as_deref(), Some("DT_RESULT"));
        assert!(text.contains("filters: document-type=DT_RESULT"));
    }

    #[tokio::test(start_paused = true)]
    async fn quit_discards_unsettled_edits() {
        let mut browse = session(ScriptedApi::new());
        drive(&mut browse, "filter code SWM\nquit\nfilter code ATH\n").await;
        assert_eq!(browse.api().list_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_commands_are_reported_and_the_session_continues() {
        let mut browse = session(
            ScriptedApi::new()
                .with_list(sample_list(1, 1))
                .with_document(sample_document("doc-1")),
        );
        let text = drive(&mut browse, "frobnicate\npage zero\nopen doc-1\nquit\n").await;
        assert!(text.contains("unknown command `frobnicate`"));
        assert!(text.contains("invalid page `zero`"));
        assert!(text.contains("Document: "));
        assert!(browse.api().calls().contains(&RecordedCall::Document("doc-1".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_discipline_shows_the_hint_without_a_request() {
        let mut browse = session(ScriptedApi::new());
        let text = drive(&mut browse, "filter discipline sw\n").await;
        assert!(text.contains("discipline must be exactly 3 uppercase letters"));
        assert_eq!(browse.api().list_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_refetches_the_current_page() {
        let mut browse = session(ScriptedApi::new().with_list(sample_list(2, 2)));
        drive(&mut browse, "list\nrefresh\n").await;
        assert_eq!(browse.api().list_calls().len(), 2);
    }
}
