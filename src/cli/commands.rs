//! CLI command definitions for codepractice.
//!
//! The CLI is a thin driver over the library: `diff` and `parse` work on local
//! files, `problems` and `workspace` talk to the practice backend.

use crate::api::{Difficulty, HttpPracticeApi, PracticeApi, ProblemQuery};
use crate::config::ClientConfig;
use crate::description::parse_problem_description;
use crate::diff::{diff_text, DiffKind, DiffSummary, LineDiffRow};
use crate::workspace::{SessionRequest, WorkspaceController, WorkspaceState};
use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Coding-practice workspace client.
#[derive(Parser)]
#[command(name = "codepractice")]
#[command(about = "Run, submit and analyze coding-practice solutions from the terminal")]
#[command(version)]
#[command(
    long_about = "codepractice drives the practice workspace against a REST backend.\n\nExample usage:\n  codepractice workspace two-sum --code-file solution.py --run --submit --analyze"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Backend base URL.
    #[arg(long, env = "PRACTICE_API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    /// Bearer token for submit and analyze.
    #[arg(long, env = "PRACTICE_AUTH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds (transport default when unset).
    #[arg(long, env = "PRACTICE_HTTP_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Compare two files line by line.
    Diff(DiffArgs),

    /// Split a raw problem statement into sections and examples.
    Parse(ParseArgs),

    /// List problems from the catalog.
    #[command(alias = "ls")]
    Problems(ProblemsArgs),

    /// Open a problem and run, submit or analyze a solution.
    #[command(alias = "ws")]
    Workspace(WorkspaceArgs),
}

/// Arguments for `codepractice diff`.
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Earlier revision.
    pub left: String,

    /// Later revision.
    pub right: String,

    /// Output JSON rows.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `codepractice parse`.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// File containing the raw statement.
    pub statement: String,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `codepractice problems`.
#[derive(Parser, Debug)]
pub struct ProblemsArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub limit: Option<u32>,

    /// easy, medium or hard.
    #[arg(long)]
    pub difficulty: Option<String>,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub concept: Option<String>,

    /// Output JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `codepractice workspace`.
#[derive(Parser, Debug)]
pub struct WorkspaceArgs {
    /// Problem slug.
    pub slug: String,

    /// Execution language id (default: 71, Python 3).
    #[arg(long)]
    pub language: Option<u32>,

    /// Source file to use instead of the starter template.
    #[arg(short = 'f', long)]
    pub code_file: Option<String>,

    /// Run the visible tests.
    #[arg(long)]
    pub run: bool,

    /// Submit for full evaluation.
    #[arg(long)]
    pub submit: bool,

    /// Generate an analysis of the session.
    #[arg(long)]
    pub analyze: bool,

    /// Adopt an existing session instead of starting a new one.
    #[arg(long)]
    pub session: Option<String>,

    /// Load (or generate) the analysis for --session right away.
    #[arg(long, requires = "session")]
    pub auto_analyze: bool,

    /// Output the final workspace state as JSON.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let config = client_config(&cli)?;
    match cli.command {
        Commands::Diff(args) => run_diff_command(args),
        Commands::Parse(args) => run_parse_command(args),
        Commands::Problems(args) => run_problems_command(args, require_backend(config)?).await,
        Commands::Workspace(args) => {
            run_workspace_command(args, require_backend(config)?).await
        }
    }
}

/// Builds the client configuration from global flags.
///
/// Returns `None` when no backend URL was given; only backend commands need one.
fn client_config(cli: &Cli) -> anyhow::Result<Option<ClientConfig>> {
    let Some(url) = cli.api_base_url.as_deref() else {
        return Ok(None);
    };
    let mut config = ClientConfig::new()
        .with_api_base_url(url)
        .with_auth_token(cli.token.clone());
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    config.validate()?;
    Ok(Some(config))
}

fn require_backend(config: Option<ClientConfig>) -> anyhow::Result<ClientConfig> {
    config.context("No backend configured: pass --api-base-url or set PRACTICE_API_BASE_URL")
}

// ============================================================================
// Local commands
// ============================================================================

fn run_diff_command(args: DiffArgs) -> anyhow::Result<()> {
    let rows = diff_files(Path::new(&args.left), Path::new(&args.right))?;
    let summary = DiffSummary::from_rows(&rows);

    if args.json {
        let output = serde_json::json!({
            "summary": summary,
            "rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for line in render_diff_rows(&rows) {
        println!("{}", line);
    }
    println!();
    println!(
        "same: {}  added: {}  removed: {}  changed: {}",
        summary.same, summary.added, summary.removed, summary.changed
    );
    Ok(())
}

fn diff_files(left: &Path, right: &Path) -> anyhow::Result<Vec<LineDiffRow>> {
    let previous = fs::read_to_string(left)
        .with_context(|| format!("Failed to read {}", left.display()))?;
    let current = fs::read_to_string(right)
        .with_context(|| format!("Failed to read {}", right.display()))?;
    Ok(diff_text(&previous, &current))
}

/// Side-by-side rendering: marker, line numbers, then both texts.
pub fn render_diff_rows(rows: &[LineDiffRow]) -> Vec<String> {
    fn number(value: Option<usize>) -> String {
        value.map_or_else(String::new, |n| n.to_string())
    }

    rows.iter()
        .map(|row| {
            let marker = match row.kind {
                DiffKind::Same => ' ',
                DiffKind::Added => '+',
                DiffKind::Removed => '-',
                DiffKind::Changed => '~',
            };
            format!(
                "{} {:>4} {:<40} | {:>4} {}",
                marker,
                number(row.left_line_number),
                row.left_text,
                number(row.right_line_number),
                row.right_text
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

fn run_parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.statement)
        .with_context(|| format!("Failed to read {}", args.statement))?;
    let parsed = parse_problem_description(&raw);
    let examples = parsed.examples();

    if args.json {
        let output = serde_json::json!({
            "description": parsed,
            "examples": examples,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for paragraph in &parsed.statement_paragraphs {
        println!("{}\n", paragraph);
    }
    let sections = [
        ("Input", &parsed.input_format),
        ("Output", &parsed.output_format),
    ];
    for (title, body) in sections {
        if !body.is_empty() {
            println!("== {} ==\n{}\n", title, body);
        }
    }
    for (index, example) in examples.iter().enumerate() {
        println!("== Example {} ==", index + 1);
        println!("input:\n{}", example.input);
        println!("output:\n{}", example.output);
        if let Some(explanation) = &example.explanation {
            println!("explanation: {}", explanation);
        }
        println!();
    }
    if let Some(source) = &parsed.source {
        println!("Source: {}", source);
    }
    if let Some(note) = &parsed.import_note {
        println!("{}", note);
    }
    Ok(())
}

// ============================================================================
// Backend commands
// ============================================================================

async fn run_problems_command(args: ProblemsArgs, config: ClientConfig) -> anyhow::Result<()> {
    let difficulty = args
        .difficulty
        .as_deref()
        .map(str::parse::<Difficulty>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let mut query = ProblemQuery::new();
    query.page = args.page;
    query.limit = args.limit;
    query.difficulty = difficulty;
    query.search = args.search;
    query.concept = args.concept;

    let api = HttpPracticeApi::new(&config)?;
    let page = api.list_problems(&query).await?;
    info!(count = page.problems.len(), total = page.total, "Fetched problem catalog");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    for problem in &page.problems {
        println!(
            "{:<32} {:<7} {}",
            problem.slug,
            problem.difficulty.as_str(),
            problem.title
        );
    }
    println!(
        "\npage {} ({} per page), {} problems total",
        page.page, page.limit, page.total
    );
    Ok(())
}

async fn run_workspace_command(args: WorkspaceArgs, config: ClientConfig) -> anyhow::Result<()> {
    let config = match args.language {
        Some(language_id) => config.with_default_language_id(language_id),
        None => config,
    };
    let api = Arc::new(HttpPracticeApi::new(&config)?);
    let mut workspace = WorkspaceController::new(api, &config);

    let requested_session = args
        .session
        .clone()
        .map(|id| SessionRequest::new(id).with_auto_analyze(args.auto_analyze));
    workspace
        .load_problem(&args.slug, requested_session)
        .await
        .with_context(|| format!("Failed to load problem '{}'", args.slug))?;

    if let Some(language_id) = args.language {
        if workspace.state().language_id != language_id {
            warn!(
                requested = language_id,
                selected = workspace.state().language_id,
                "Requested language is not offered by the backend"
            );
        }
    }

    if let Some(path) = &args.code_file {
        let code =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        workspace.edit_code(code);
    }

    if !args.json {
        print_header(workspace.state());
        print_terminal(workspace.state());
    }

    let mut failure = None;
    if args.run {
        failure = failure.or(workspace.run().await.err());
        if !args.json {
            print_terminal(workspace.state());
        }
    }
    if args.submit {
        failure = failure.or(workspace.submit().await.err());
        if !args.json {
            print_terminal(workspace.state());
        }
    }
    if args.analyze {
        failure = failure.or(workspace.analyze().await.err());
        if !args.json {
            print_terminal(workspace.state());
        }
    }

    let state = workspace.state();
    let rows = state.attempt_diff();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&workspace_summary(state))?);
    } else if !rows.is_empty() {
        println!(
            "== Attempt {} vs {} ==",
            state.session.selected_left_attempt_id.unwrap_or_default(),
            state.session.selected_right_attempt_id.unwrap_or_default()
        );
        for line in render_diff_rows(&rows) {
            println!("{}", line);
        }
    }

    match failure {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn print_header(state: &WorkspaceState) {
    let Some(problem) = &state.problem else {
        return;
    };
    println!("{} [{}]", problem.title, problem.difficulty);
    if let Some(first) = state.description.statement_paragraphs.first() {
        println!("{}", first);
    }
    println!("language: {}", state.selected_language_name());
    println!();
}

fn print_terminal(state: &WorkspaceState) {
    for line in &state.terminal_lines {
        println!("{}", line);
    }
    println!();
}

fn workspace_summary(state: &WorkspaceState) -> serde_json::Value {
    let rows = state.attempt_diff();
    serde_json::json!({
        "slug": state.slug,
        "stage": state.stage(),
        "languageId": state.language_id,
        "sessionId": state.session_id(),
        "steps": state.flow_steps(),
        "terminal": state.terminal_lines,
        "run": state.session.run_result,
        "submit": state.session.submit_result,
        "analysis": state.session.analysis_result,
        "selectedAttempts": [
            state.session.selected_left_attempt_id,
            state.session.selected_right_attempt_id,
        ],
        "diffSummary": DiffSummary::from_rows(&rows),
    })
}
