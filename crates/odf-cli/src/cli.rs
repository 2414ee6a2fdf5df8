//! Argument parsing, configuration and command dispatch.

use std::io::{self, IsTerminal};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use odf_config::defaults::{ENV_API_URL, ENV_PAGE_SIZE, ENV_TIMEOUT_SECS, MAX_PAGE_SIZE};
use odf_config::validate::parse_api_url;
use odf_config::{ClientConfig, load_from_env};
use odf_telemetry::{DEFAULT_LOG_LEVEL, LoggingConfig, build_sha, init_logging};
use odf_views::{DetailMode, RenderOptions};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::client::{AppContext, CliResult};
use crate::commands::browse::handle_browse;
use crate::commands::compare::handle_compare;
use crate::commands::disciplines::handle_disciplines;
use crate::commands::documents::{handle_by_code, handle_list, handle_show};

const MAX_TIMEOUT_SECS: u64 = 600;

/// Parses arguments, runs the requested command and prints its output.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "odf",
        command = command_label(&cli.command),
        trace_id = %trace_id,
        build = build_sha()
    );

    let result = async move {
        let ctx = prepare(&cli, &trace_id)?;
        dispatch(cli.command, &ctx).await
    }
    .instrument(span)
    .await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn prepare(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let config = apply_overrides(load_from_env()?, cli)?;
    debug!(api_url = %config.api_url, timeout = ?config.timeout, "configuration resolved");
    let render = RenderOptions::detect(cli.color.enabled());
    AppContext::new(config, trace_id, cli.output, render)
}

/// Flags win over the environment.
fn apply_overrides(mut config: ClientConfig, cli: &Cli) -> CliResult<ClientConfig> {
    if let Some(raw) = cli.api_url.as_deref().filter(|raw| !raw.trim().is_empty()) {
        config.api_url = parse_api_url("--api-url", raw)?;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    Ok(config)
}

async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::List(args) => handle_list(ctx, args).await.map(print),
        Command::Show(args) => handle_show(ctx, args).await.map(print),
        Command::ByCode(args) => handle_by_code(ctx, args).await.map(print),
        Command::Compare(args) => handle_compare(ctx, args).await.map(print),
        Command::Disciplines => handle_disciplines(ctx).await.map(print),
        Command::Browse => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            handle_browse(ctx, stdin, io::stdout()).await
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn print(text: String) {
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::List(_) => "list",
        Command::Show(_) => "show",
        Command::ByCode(_) => "by-code",
        Command::Compare(_) => "compare",
        Command::Disciplines => "disciplines",
        Command::Browse => "browse",
    }
}

#[derive(Parser)]
#[command(name = "odf", about = "Browse ODF competition documents from the terminal")]
pub(crate) struct Cli {
    #[arg(long, global = true, env = ENV_API_URL, help = "Base URL of the documents API")]
    pub(crate) api_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = ENV_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS),
        help = "Per-request timeout in seconds"
    )]
    pub(crate) timeout: Option<u64>,
    #[arg(
        long,
        global = true,
        env = ENV_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)),
        help = "Documents per list page"
    )]
    pub(crate) page_size: Option<u32>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub(crate) color: ColorChoice,
    #[arg(long, global = true, env = "ODF_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List documents, newest first.
    List(ListArgs),
    /// Show one document.
    Show(ShowArgs),
    /// List every document published under a document code.
    ByCode(ByCodeArgs),
    /// Show two documents side by side.
    Compare(CompareArgs),
    /// List the disciplines known to the backend.
    Disciplines,
    /// Interactive session reading commands from stdin.
    Browse,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) page: u32,
    #[arg(long)]
    pub(crate) competition_code: Option<String>,
    #[arg(long)]
    pub(crate) document_code: Option<String>,
    #[arg(long)]
    pub(crate) document_type: Option<String>,
    #[arg(long)]
    pub(crate) document_subtype: Option<String>,
    #[arg(long, help = "Three uppercase letters, e.g. SWM")]
    pub(crate) discipline: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    pub(crate) id: String,
    #[arg(long, value_enum, default_value_t = ContentMode::Raw)]
    pub(crate) mode: ContentMode,
    #[arg(long, help = "Copy the raw content to the clipboard (OSC 52)")]
    pub(crate) copy: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ByCodeArgs {
    pub(crate) document_code: String,
}

#[derive(Args, Debug)]
pub(crate) struct CompareArgs {
    pub(crate) first_id: String,
    pub(crate) second_id: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ContentMode {
    Raw,
    Parsed,
}

impl From<ContentMode> for DetailMode {
    fn from(mode: ContentMode) -> Self {
        match mode {
            ContentMode::Raw => Self::Raw,
            ContentMode::Parsed => Self::Parsed,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        }
    }
}
