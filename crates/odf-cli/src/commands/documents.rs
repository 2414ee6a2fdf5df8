use odf_client::DocumentsApi;
use odf_views::{DetailMode, DetailView, DocumentFilters, osc52_copy};
use tracing::info;

use crate::cli::{ByCodeArgs, ListArgs, ShowArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_code_matches, render_document, render_document_list};

pub(crate) async fn handle_list(ctx: &AppContext, args: ListArgs) -> CliResult<String> {
    let filters = DocumentFilters {
        competition_code: args.competition_code.unwrap_or_default(),
        document_code: args.document_code.unwrap_or_default(),
        document_type: args.document_type.unwrap_or_default(),
        document_subtype: args.document_subtype.unwrap_or_default(),
        discipline: args.discipline.unwrap_or_default(),
    };
    let params = filters.to_params(args.page, ctx.config.page_size)?;

    let list = ctx
        .documents
        .list_documents(&params)
        .await
        .map_err(|err| CliError::api("failed to list documents", &err))?;
    render_document_list(&list, ctx.output, ctx.render)
}

pub(crate) async fn handle_show(ctx: &AppContext, args: ShowArgs) -> CliResult<String> {
    let mode = DetailMode::from(args.mode);
    let view = DetailView::load(&ctx.documents, &args.id, mode)
        .await
        .map_err(|err| CliError::api(format!("failed to fetch document {}", args.id), &err))?;

    let mut text = String::new();
    if args.copy {
        text.push_str(&osc52_copy(&view.document.content));
        info!(id = %args.id, "raw content sent to the clipboard");
    }
    text.push_str(&render_document(
        &view.document,
        mode,
        view.parsed.as_ref(),
        ctx.output,
        ctx.render,
    )?);
    Ok(text)
}

pub(crate) async fn handle_by_code(ctx: &AppContext, args: ByCodeArgs) -> CliResult<String> {
    let code = args.document_code.trim();
    if code.is_empty() {
        return Err(CliError::validation("document code must not be empty"));
    }
    let documents = ctx
        .documents
        .find_by_document_code(code)
        .await
        .map_err(|err| CliError::api(format!("failed to fetch documents for {code}"), &err))?;
    render_code_matches(code, &documents, ctx.output, ctx.render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use odf_test_support::fixtures::{SAMPLE_DOCUMENT_CODE, sample_document, sample_list};
    use serde_json::json;

    use crate::cli::{ContentMode, OutputFormat};
    use crate::client::test_support::context_with;

    fn list_args() -> ListArgs {
        ListArgs {
            page: 1,
            competition_code: None,
            document_code: None,
            document_type: None,
            document_subtype: None,
            discipline: None,
        }
    }

    #[tokio::test]
    async fn list_sends_filters_and_renders_a_table() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/odf-documents")
                .query_param("page", "2")
                .query_param("pageSize", "20")
                .query_param("documentType", "DT_RESULT")
                .query_param("discipline", "SWM");
            then.status(200).json_body(json!(sample_list(1, 21)));
        });

        let ctx = context_with(&server, OutputFormat::Table);
        let args = ListArgs {
            page: 2,
            document_type: Some("DT_RESULT".into()),
            discipline: Some("SWM".into()),
            ..list_args()
        };
        let text = handle_list(&ctx, args).await.expect("list should succeed");
        mock.assert();
        assert!(text.contains("21 documents"));
        assert!(text.contains(SAMPLE_DOCUMENT_CODE));
    }

    #[tokio::test]
    async fn malformed_discipline_is_rejected_before_any_request() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server, OutputFormat::Table);
        let args = ListArgs {
            discipline: Some("swm".into()),
            ..list_args()
        };
        let err = handle_list(&ctx, args).await.expect_err("validation");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("3 uppercase letters"));
    }

    #[tokio::test]
    async fn server_errors_surface_the_server_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/odf-documents/missing");
            then.status(404)
                .json_body(json!({"statusCode": 404, "message": "Document missing not found"}));
        });
        let ctx = context_with(&server, OutputFormat::Table);
        let args = ShowArgs {
            id: "missing".into(),
            mode: ContentMode::Raw,
            copy: false,
        };
        let err = handle_show(&ctx, args).await.expect_err("404");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.display_message(),
            "failed to fetch document missing: Document missing not found"
        );
    }

    #[tokio::test]
    async fn show_with_copy_emits_the_clipboard_escape_first() {
        let server = MockServer::start_async().await;
        let document = sample_document("doc-1");
        server.mock(|when, then| {
            when.method(GET).path("/odf-documents/doc-1");
            then.status(200).json_body(json!(document));
        });
        let ctx = context_with(&server, OutputFormat::Table);
        let args = ShowArgs {
            id: "doc-1".into(),
            mode: ContentMode::Raw,
            copy: true,
        };
        let text = handle_show(&ctx, args).await.expect("show");
        assert!(text.starts_with(&osc52_copy(&document.content)));
        assert!(text.contains("XML content"));
    }

    #[tokio::test]
    async fn parsed_mode_falls_back_to_the_placeholder() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/odf-documents/doc-1");
            then.status(200).json_body(json!(sample_document("doc-1")));
        });
        server.mock(|when, then| {
            when.method(GET).path("/odf-documents/doc-1/parsed");
            then.status(404).json_body(json!({"message": "not parsed"}));
        });
        let ctx = context_with(&server, OutputFormat::Table);
        let args = ShowArgs {
            id: "doc-1".into(),
            mode: ContentMode::Parsed,
            copy: false,
        };
        let text = handle_show(&ctx, args).await.expect("show");
        assert!(text.contains(odf_views::detail::PARSED_PLACEHOLDER));
    }

    #[tokio::test]
    async fn by_code_lists_versions_as_json() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/odf-documents/document-code/{SAMPLE_DOCUMENT_CODE}"));
            then.status(200)
                .json_body(json!([sample_document("a"), sample_document("b")]));
        });
        let ctx = context_with(&server, OutputFormat::Json);
        let text = handle_by_code(
            &ctx,
            ByCodeArgs {
                document_code: SAMPLE_DOCUMENT_CODE.into(),
            },
        )
        .await
        .expect("by code");
        mock.assert();
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn blank_document_code_is_a_validation_error() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server, OutputFormat::Table);
        let err = handle_by_code(
            &ctx,
            ByCodeArgs {
                document_code: "  ".into(),
            },
        )
        .await
        .expect_err("validation");
        assert_eq!(err.exit_code(), 2);
    }
}
