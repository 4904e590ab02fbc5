//! casejudge - Command-line entry point

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casejudge::{report, Config, Grader, SessionReport, SourceUnit};

#[derive(Parser)]
#[command(name = "casejudge")]
#[command(about = "Grade a program against input/output case pairs", long_about = None)]
struct Args {
    /// Source file to grade (.c, .cpp, .java, .py)
    source: PathBuf,

    /// Directory holding input<N>.txt / output<N>.txt pairs
    #[arg(short, long)]
    cases: Option<PathBuf>,

    /// Grade only the case with this id
    #[arg(long)]
    case: Option<u64>,

    /// Wall-clock budget per execution in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Skip computing diffs for wrong answers
    #[arg(long)]
    no_diff: bool,

    /// Print the session report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_env()?;

    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(cases) = args.cases {
        config.grading.case_dir = cases;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        anyhow::ensure!(timeout_ms > 0, "--timeout-ms must be greater than zero");
        config.grading.time_budget = Duration::from_millis(timeout_ms);
    }
    if args.no_diff {
        config.grading.show_diff = false;
    }

    let source = SourceUnit::load(&args.source)
        .with_context(|| format!("Cannot load source {}", args.source.display()))?;
    let grader = Grader::new(source, &config.toolchains, config.grading.clone())?;

    let report = match args.case {
        Some(id) => {
            let result = grader.run_case_by_id(id).await?;
            SessionReport::new(
                grader.session_id(),
                grader.source().path().to_path_buf(),
                grader.plan().language,
                vec![result],
            )
        }
        None => grader.run_all().await?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_session(&report));
    }

    Ok(())
}
