mod input;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use newsgate_core::{AppConfig, CandidateRecord, CategoryTag};
use newsgate_engine::{Engine, EngineOptions, TracingSink, Verdict};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newsgate")]
#[command(about = "Classify and deduplicate entity news items")]
struct Cli {
    /// Profiles file; overrides `NEWSGATE_PROFILES_PATH`
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    /// Disable cross-category shadow suppression
    #[arg(long, global = true)]
    no_shadow: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List loaded category profiles
    Profiles,
    /// Classify a single headline against one category
    Classify {
        #[arg(long)]
        category: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        snippet: String,
    },
    /// Classify and deduplicate a JSON file of candidate batches
    Run {
        /// Path to a JSON array of batches, or `-` for stdin
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let config = newsgate_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("newsgate: run `newsgate --help` for available commands");
        return Ok(());
    };

    let engine = build_engine(&config, cli.profiles, cli.no_shadow)?;
    match command {
        Commands::Profiles => run_profiles(&engine),
        Commands::Classify {
            category,
            title,
            snippet,
        } => run_classify(&engine, &category, title, snippet)?,
        Commands::Run { input } => run_batches(&engine, &config, &input)?,
    }

    Ok(())
}

fn build_engine(
    config: &AppConfig,
    profiles_override: Option<PathBuf>,
    no_shadow: bool,
) -> anyhow::Result<Engine> {
    let path = profiles_override.unwrap_or_else(|| config.profiles_path.clone());
    let profiles = newsgate_core::load_profiles(&path)?;
    let mut options = EngineOptions::from_app_config(config);
    if no_shadow {
        options.shadow_suppression = false;
    }
    tracing::debug!(path = %path.display(), "loaded profiles");
    Ok(Engine::new(&profiles, options)?)
}

fn run_profiles(engine: &Engine) {
    println!("{:<14}{:<11}DEDUP", "CATEGORY", "SHAPE");
    for category in engine.categories() {
        let shape = match engine.is_tiered(category) {
            Some(true) => "tiered",
            _ => "threshold",
        };
        let dedup = engine
            .dedup_strategy(category)
            .map(|s| s.to_string())
            .unwrap_or_default();
        println!("{category:<14}{shape:<11}{dedup}");
    }
}

fn run_classify(
    engine: &Engine,
    category: &str,
    title: String,
    snippet: String,
) -> anyhow::Result<()> {
    let record = CandidateRecord::new(title, "cli://input").with_snippet(snippet);
    let verdict = engine.evaluate(&CategoryTag::new(category), &record)?;
    println!("{}", describe_verdict(&verdict));
    Ok(())
}

fn describe_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Accepted {
            importance: Some(importance),
        } => format!("accepted ({importance})"),
        Verdict::Accepted { importance: None } => "accepted".to_string(),
        Verdict::Rejected(reason) => format!("rejected: {reason}"),
    }
}

fn run_batches(engine: &Engine, config: &AppConfig, input: &Path) -> anyhow::Result<()> {
    let batches = input::load_batches(input, config.snippet_limit)?;
    let report = engine.run(&batches, &TracingSink)?;

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    input::write_json_lines(&mut out, report.table.records())?;
    out.flush()?;

    tracing::info!(
        batches = batches.len(),
        records = report.table.len(),
        "run complete"
    );
    Ok(())
}
