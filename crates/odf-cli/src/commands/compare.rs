use odf_views::CompareView;

use crate::cli::CompareArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_comparison;

pub(crate) async fn handle_compare(ctx: &AppContext, args: CompareArgs) -> CliResult<String> {
    let (first, second) = (args.first_id.trim(), args.second_id.trim());
    if first.is_empty() || second.is_empty() {
        return Err(CliError::validation("both document ids are required"));
    }
    let view = CompareView::load(&ctx.documents, first, second)
        .await
        .map_err(|err| CliError::api(format!("failed to compare {first} and {second}"), &err))?;
    render_comparison(&view.comparison, ctx.output, ctx.render)
}
