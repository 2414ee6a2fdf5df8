//! Application context and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use odf_client::{ApiError, CachedDocuments, OdfClient, QueryCache};
use odf_config::{ClientConfig, ConfigError};
use odf_views::{FilterError, RenderOptions};

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Wrap an API error with what was being attempted.
    pub(crate) fn api(action: impl Into<String>, err: &ApiError) -> Self {
        Self::Failure(anyhow!("{}", err.display_message()).context(action.into()))
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<FilterError> for CliError {
    fn from(err: FilterError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) documents: CachedDocuments<OdfClient>,
    pub(crate) config: ClientConfig,
    pub(crate) output: OutputFormat,
    pub(crate) render: RenderOptions,
}

impl AppContext {
    /// Build the HTTP client and request cache for `config`.
    pub(crate) fn new(
        config: ClientConfig,
        request_id: &str,
        output: OutputFormat,
        render: RenderOptions,
    ) -> CliResult<Self> {
        let client = OdfClient::new(&config, request_id)
            .map_err(|err| CliError::api("failed to build HTTP client", &err))?;
        let cache = Arc::new(QueryCache::new(config.cache.clone()));
        Ok(Self {
            documents: CachedDocuments::new(client, cache),
            config,
            output,
            render,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use httpmock::MockServer;
    use odf_config::ClientConfig;
    use odf_views::RenderOptions;

    use super::AppContext;
    use crate::cli::OutputFormat;

    /// Context pointed at `server` with plain 100-column rendering.
    pub(crate) fn context_with(server: &MockServer, output: OutputFormat) -> AppContext {
        let base_url = server.base_url().parse().expect("valid URL");
        let mut config = ClientConfig::with_api_url(base_url);
        config.cache.retry_backoff = std::time::Duration::ZERO;
        AppContext::new(config, "test-trace", output, RenderOptions::plain(100))
            .expect("context should build")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_validation_from_failure() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("down")).exit_code(), 3);
    }

    #[test]
    fn api_errors_keep_the_server_message() {
        let err = ApiError::from_status(404, br#"{"message":"Document x not found"}"#);
        let cli = CliError::api("failed to fetch document x", &err);
        assert_eq!(cli.exit_code(), 3);
        assert_eq!(
            cli.display_message(),
            "failed to fetch document x: Document x not found"
        );
    }

    #[test]
    fn filter_and_config_errors_are_validation_errors() {
        let filter = CliError::from(FilterError::InvalidDiscipline { value: "ab".into() });
        assert_eq!(filter.exit_code(), 2);
        assert!(filter.display_message().contains("3 uppercase letters"));

        let config = CliError::from(ConfigError::InvalidField {
            field: "--api-url".into(),
            value: "ftp://x".into(),
            message: "scheme must be http or https".into(),
        });
        assert_eq!(config.exit_code(), 2);
    }
}
