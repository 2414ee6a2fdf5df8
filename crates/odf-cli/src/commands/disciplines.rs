use odf_client::DocumentsApi;
use odf_views::is_valid_discipline;
use tracing::warn;

use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_disciplines;

/// Discipline codes from the backend; codes that are not three uppercase
/// letters are reported separately because the list filter would reject them.
pub(crate) async fn handle_disciplines(ctx: &AppContext) -> CliResult<String> {
    let response = ctx
        .documents
        .list_disciplines()
        .await
        .map_err(|err| CliError::api("failed to list disciplines", &err))?;

    let (valid, rejected): (Vec<String>, Vec<String>) = response
        .disciplines
        .into_iter()
        .partition(|code| !code.is_empty() && is_valid_discipline(code));
    if !rejected.is_empty() {
        warn!(count = rejected.len(), "backend returned malformed discipline codes");
    }
    render_disciplines(&valid, &rejected, ctx.output)
}
