use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use taskrank::config::Config;
use taskrank::scoring::{resolve_strategy, Analysis, ScoringEngine, Strategy};
use taskrank::{tlog, tlog_error, Error, Result, TaskBatch};

/// taskrank - rank tasks by computed priority
#[derive(Parser, Debug)]
#[command(name = "taskrank")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    TASKRANK_DEBUG=1     Enable debug logging (alternative to --debug)\n    TASKRANK_LOG=LEVEL   Log level: error, warn, info, debug, trace")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.taskrank/taskrank.log)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Config file (default: ~/.taskrank/taskrank.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Score and rank every task in a batch
    Analyze {
        /// JSON batch file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Show only the top tasks of a batch
    Suggest {
        /// JSON batch file; reads stdin when omitted or "-"
        input: Option<PathBuf>,

        /// Percent-encoded batch, as sent in a ?tasks= query string
        #[arg(long, conflicts_with = "input", value_name = "ENCODED")]
        tasks: Option<String>,

        /// Number of tasks to return (default: config suggest_limit, or 3)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// List the available strategies and their weights
    Strategies,
}

/// Options shared by every scoring request.
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct RequestArgs {
    /// Scoring strategy (smart_balance, fastest_wins, high_impact, deadline_driven)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Reference date for urgency, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load() {
            Err(Error::NoHomeDir) => Config::default(),
            other => other?,
        },
    };

    taskrank::log::init(cli.debug, config.log_path());
    tlog!("taskrank starting: {:?}", cli.command);

    let result = match cli.command {
        Command::Analyze { input, request } => run_analyze(&config, input.as_deref(), &request),
        Command::Suggest {
            input,
            tasks,
            limit,
            request,
        } => run_suggest(&config, input.as_deref(), tasks, limit, &request),
        Command::Strategies => {
            run_strategies(&config);
            Ok(())
        }
    };

    if let Err(e) = &result {
        tlog_error!("{}", e);
    }
    result
}

fn run_analyze(config: &Config, input: Option<&Path>, request: &RequestArgs) -> Result<()> {
    let batch = read_batch(input)?;
    let engine = build_engine(config, request, &batch)?;
    let analysis = engine.analyze_batch(batch)?;
    tlog!(
        "analyze: strategy={} tasks={} warnings={}",
        analysis.strategy,
        analysis.count,
        analysis.warnings.len()
    );
    print_analysis(&analysis, request.compact)
}

fn run_suggest(
    config: &Config,
    input: Option<&Path>,
    tasks: Option<String>,
    limit: Option<usize>,
    request: &RequestArgs,
) -> Result<()> {
    let limit = limit.unwrap_or_else(|| config.effective_suggest_limit());
    if limit == 0 {
        return Err(Error::Validation("limit must be at least 1".to_string()));
    }

    let batch = match tasks {
        Some(encoded) => TaskBatch::from_query(&encoded)?,
        None => read_batch(input)?,
    };
    let engine = build_engine(config, request, &batch)?;
    let analysis = engine.suggest_batch(batch, limit)?;
    tlog!(
        "suggest: strategy={} limit={} returned={} warnings={}",
        analysis.strategy,
        limit,
        analysis.count,
        analysis.warnings.len()
    );
    print_analysis(&analysis, request.compact)
}

fn run_strategies(config: &Config) {
    let default = config.effective_strategy();
    for strategy in Strategy::ALL {
        let w = strategy.weights();
        let marker = if strategy == default { "*" } else { " " };
        println!(
            "{} {:<16} urgency={:.2} importance={:.2} effort={:.2} unlock={:.2}  {}",
            marker,
            strategy.as_str(),
            w.urgency,
            w.importance,
            w.effort,
            w.unlock,
            strategy.description()
        );
    }
}

/// Resolve the strategy and capture the reference date once for the request.
fn build_engine(config: &Config, request: &RequestArgs, batch: &TaskBatch) -> Result<ScoringEngine> {
    let strategy = resolve_strategy(
        request.strategy.as_deref(),
        batch.strategy.as_deref(),
        config.effective_strategy(),
    )?;
    Ok(match request.today {
        Some(date) => ScoringEngine::new(strategy, date),
        None => ScoringEngine::for_today(strategy),
    })
}

fn read_batch(input: Option<&Path>) -> Result<TaskBatch> {
    let json = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    TaskBatch::from_json(&json)
}

fn print_analysis(analysis: &Analysis, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(analysis)?
    } else {
        serde_json::to_string_pretty(analysis)?
    };
    println!("{}", json);
    Ok(())
}
