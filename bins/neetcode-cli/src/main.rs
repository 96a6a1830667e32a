mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use neetcode_common::client::ProblemQuery;
use neetcode_common::types::SubmissionKind;
use neetcode_common::{AppContext, ClientConfig, ClientError};
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "neetcode")]
#[command(about = "NeetCode CLI - Run and submit solutions against the NeetCode judge", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported languages
    Languages,

    /// Print the starter template for a language
    Template {
        /// Language tag (e.g., python, java, cpp)
        #[arg(short, long)]
        language: String,

        /// Code currently in the editor, kept when the language has no template
        #[arg(short, long)]
        current: Option<PathBuf>,
    },

    /// Print the exact source that Run/Submit would send
    Compose {
        #[arg(short, long)]
        language: String,

        /// Solution file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Browse problems
    Problems {
        /// dsa or practice
        #[arg(short, long)]
        kind: Option<String>,

        /// easy, medium or hard
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Title search
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value = "20")]
        limit: u32,

        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Show a problem and its sample test cases
    Problem {
        #[arg(long)]
        id: String,
    },

    /// Run code once against custom input or the first sample
    Run {
        #[arg(short, long)]
        file: PathBuf,

        /// Defaults to the problem's first language, else the file extension
        #[arg(short, long)]
        language: Option<String>,

        /// Problem to take sample input from
        #[arg(short, long)]
        problem: Option<String>,

        /// Custom stdin
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// Read custom stdin from a file
        #[arg(long)]
        input_file: Option<PathBuf>,
    },

    /// Submit code for grading and wait for the verdict
    Submit {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        problem: String,

        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show one submission
    Status {
        /// Submission id
        #[arg(long)]
        id: String,
    },

    /// List your past submissions
    History {
        /// dsa, practice or mcq
        #[arg(short, long)]
        kind: Option<String>,

        #[arg(long, default_value = "20")]
        limit: u32,

        #[arg(long, default_value = "0")]
        offset: u32,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // Offline commands need no client
    match &cli.command {
        Commands::Languages => return commands::list_languages(),
        Commands::Template { language, current } => {
            return commands::print_template(language, current.as_deref())
        }
        Commands::Compose { language, file } => return commands::compose_file(language, file),
        _ => {}
    }

    let config = ClientConfig::from_env()?;
    debug!(api = %config.api_base_url, "Configuration loaded");
    let ctx = AppContext::init(config)?;

    let result = match cli.command {
        Commands::Problems {
            kind,
            difficulty,
            search,
            limit,
            offset,
        } => {
            let query = ProblemQuery {
                kind,
                difficulty,
                search,
                limit: Some(limit),
                offset: Some(offset),
            };
            commands::list_problems(&ctx, query).await
        }
        Commands::Problem { id } => commands::show_problem(&ctx, &id).await,
        Commands::Run {
            file,
            language,
            problem,
            input,
            input_file,
        } => {
            commands::run_code(
                &ctx,
                &file,
                language.as_deref(),
                problem.as_deref(),
                input.as_deref(),
                input_file.as_deref(),
            )
            .await
        }
        Commands::Submit {
            file,
            problem,
            language,
        } => commands::submit_code(&ctx, &file, &problem, language.as_deref()).await,
        Commands::Status { id } => commands::show_submission(&ctx, &id).await,
        Commands::History {
            kind,
            limit,
            offset,
        } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            commands::show_history(&ctx, kind, limit, offset).await
        }
        Commands::Languages | Commands::Template { .. } | Commands::Compose { .. } => Ok(()),
    };

    if let Err(e) = &result {
        if let Some(client_error) = e.downcast_ref::<ClientError>() {
            error!(code = client_error.error_code(), "Command failed");
        }
    }

    ctx.teardown();
    result
}

fn parse_kind(kind: &str) -> Result<SubmissionKind> {
    match kind.trim().to_lowercase().as_str() {
        "dsa" => Ok(SubmissionKind::Dsa),
        "practice" => Ok(SubmissionKind::Practice),
        "mcq" => Ok(SubmissionKind::Mcq),
        other => anyhow::bail!("Unknown submission kind '{}' (expected dsa, practice or mcq)", other),
    }
}
