//! fa-audit - fairness audit command line.
//!
//! Commands:
//! - generate: write a synthetic, deliberately biased dataset as JSON
//! - evaluate: requester parity with a bootstrap interval and a finding
//! - audit: every fairness module over a dataset file
//! - config: show or validate the audit configuration
//! - schema: JSON schema of the dataset file format

use clap::{Args, Parser, Subcommand, ValueEnum};
use fa_audit::exit_codes::ExitCode;
use fa_audit::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use fa_audit::output::{render_error, OutputFormat};
use fa_audit::scenario::{self, render_human, run_sample_evaluation};
use fa_audit::synth::generate_fairness_data;
use fa_common::{CaseRecord, Dataset, Error, Result, SCHEMA_VERSION};
use fa_config::{load_config, validate_audit_config, AuditConfig, LoadedConfig, ScanStrategy};
use fa_core::{run_audit, AuditReport};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fa-audit")]
#[command(author, version, about = "Fairness audit for approve/deny decision data")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Audit configuration file (TOML or JSON)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log format on stderr (human or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic dataset with an injected requester bias
    Generate(GenerateArgs),
    /// Requester statistical parity with a bootstrap confidence interval
    Evaluate(EvaluateArgs),
    /// Run every fairness module over a dataset
    Audit(AuditArgs),
    /// Configuration management
    Config(ConfigArgs),
    /// Print the JSON schema of dataset files
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of cases
    #[arg(long, short = 'n', default_value_t = scenario::DEFAULT_ROWS)]
    rows: usize,

    /// Generator seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Dataset file; a synthetic dataset is generated when omitted
    #[arg(long, short = 'd')]
    data: Option<PathBuf>,

    /// Rows to generate when no dataset is given
    #[arg(long, short = 'n', default_value_t = scenario::DEFAULT_ROWS)]
    rows: usize,

    /// Seed for both generation and resampling
    #[arg(long)]
    seed: Option<u64>,

    /// Bootstrap iterations
    #[arg(long, default_value_t = scenario::DEFAULT_ITERATIONS)]
    iterations: usize,
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// Dataset file (JSON array of case records)
    data: PathBuf,

    /// Override bootstrap iterations
    #[arg(long)]
    iterations: Option<usize>,

    /// Override the bootstrap seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the violation scan strategy
    #[arg(long)]
    strategy: Option<StrategyArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Blocked,
    Exhaustive,
}

impl From<StrategyArg> for ScanStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Blocked => ScanStrategy::Blocked,
            StrategyArg::Exhaustive => ScanStrategy::Exhaustive,
        }
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration and where it came from
    Show,
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        path: PathBuf,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id);
    let guard = span.enter();

    let result = match &cli.command {
        Commands::Generate(args) => run_generate(&cli.global, args),
        Commands::Evaluate(args) => run_evaluate(&cli.global, args),
        Commands::Audit(args) => run_audit_command(&cli.global, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global, &run_id),
            ConfigCommands::Validate { path } => run_config_validate(&cli.global, path),
        },
        Commands::Schema => run_schema(),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => {
            let (text, code) = render_error(cli.global.format, &run_id, &err);
            tracing::error!(error = %err, code = err.code(), "command failed");
            eprintln!("{}", text);
            code
        }
    };
    tracing::debug!(exit_code = %exit_code, "run finished");
    drop(guard);
    std::process::exit(exit_code.as_i32());
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(global: &GlobalOpts) -> Result<LoadedConfig> {
    let loaded = load_config(global.config.as_deref())?;
    tracing::debug!(
        source = %loaded.source,
        path = ?loaded.path,
        "configuration loaded"
    );
    Ok(loaded)
}

fn read_dataset(path: &Path) -> Result<Dataset> {
    let dataset = Dataset::from_file(path)?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "dataset loaded");
    Ok(dataset)
}

fn run_generate(global: &GlobalOpts, args: &GenerateArgs) -> Result<ExitCode> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let dataset = generate_fairness_data(args.rows, seed)?;
    let json = serde_json::to_string_pretty(&dataset)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), rows = args.rows, seed, "dataset written");
            match global.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "schema_version": SCHEMA_VERSION,
                    "generated_at": chrono::Utc::now().to_rfc3339(),
                    "path": path.display().to_string(),
                    "rows": args.rows,
                    "seed": seed,
                }))?,
                OutputFormat::Human => {
                    println!("Wrote {} cases to {} (seed {})", args.rows, path.display(), seed)
                }
            }
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::Clean)
}

fn run_evaluate(global: &GlobalOpts, args: &EvaluateArgs) -> Result<ExitCode> {
    let loaded = load(global)?;
    let mut bootstrap = loaded.config.bootstrap.with_iterations(args.iterations);
    if let Some(seed) = args.seed {
        bootstrap = bootstrap.with_seed(seed);
    }

    let dataset = match &args.data {
        Some(path) => read_dataset(path)?,
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            tracing::info!(rows = args.rows, seed, "generating synthetic dataset");
            generate_fairness_data(args.rows, seed)?
        }
    };

    let eval = run_sample_evaluation(&dataset, &loaded.config.groups.requester, &bootstrap)?;
    match global.format {
        OutputFormat::Json => print_json(&eval)?,
        OutputFormat::Human => print!("{}", render_human(&eval)),
    }

    Ok(if eval.finding.is_robust() {
        ExitCode::DisparityFound
    } else {
        ExitCode::Clean
    })
}

fn run_audit_command(global: &GlobalOpts, args: &AuditArgs) -> Result<ExitCode> {
    let mut config = load(global)?.config;
    if let Some(iterations) = args.iterations {
        config.bootstrap.iterations = iterations;
    }
    if let Some(seed) = args.seed {
        config.bootstrap.seed = Some(seed);
    }
    if let Some(strategy) = args.strategy {
        config.violations.strategy = strategy.into();
    }

    let dataset = read_dataset(&args.data)?;
    let report = run_audit(&dataset, &config)?;

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print!("{}", render_audit_human(&report)),
    }

    Ok(if has_robust_disparity(&report) {
        ExitCode::DisparityFound
    } else {
        ExitCode::Clean
    })
}

fn has_robust_disparity(report: &AuditReport) -> bool {
    report.requester_significance.significant
        || report.premium_significance.significant
        || report
            .rate_gap_interval
            .as_ref()
            .and_then(|b| b.interval)
            .is_some_and(|ci| ci.excludes_zero())
}

fn render_audit_human(report: &AuditReport) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "Audit {} ({} records)", report.audit_id, report.rows);
    let _ = writeln!(out, "Group fairness:");
    for (name, cmp) in [
        ("statistical parity", &report.group.statistical_parity),
        ("equal opportunity", &report.group.equal_opportunity),
        ("predictive parity", &report.group.predictive_parity),
    ] {
        let _ = writeln!(
            out,
            "  {:<20} {:.4}  ({}: {:.4}, {:.4})",
            name, cmp.difference, cmp.pair, cmp.rate_a, cmp.rate_b
        );
    }
    if let Some(ci) = report.rate_gap_interval.as_ref().and_then(|b| b.interval) {
        let _ = writeln!(
            out,
            "  rate gap interval    [{:.4}, {:.4}] at {:.0}%",
            ci.lower,
            ci.upper,
            ci.level * 100.0
        );
    }
    let _ = writeln!(out, "Significance:");
    for (name, sig) in [
        ("requester", &report.requester_significance),
        ("premium", &report.premium_significance),
    ] {
        let _ = writeln!(
            out,
            "  {:<10} chi2 {:.4}  p {:.4}  V {:.4}{}",
            name,
            sig.chi2_statistic,
            sig.p_value,
            sig.effect_size,
            if sig.significant { "  significant" } else { "" }
        );
    }
    let _ = writeln!(out, "Individual fairness: {} violation(s)", report.violations.len());
    let _ = writeln!(
        out,
        "Intersectional: {} subgroup(s) above {} rows",
        report.intersectional.len(),
        report.intersectional.min_sample_size
    );
    for (intersection, stats) in &report.intersectional.subgroups {
        let _ = writeln!(
            out,
            "  {:<50} approval {:.4}  minutes {:.2}  n={}",
            intersection.to_string(),
            stats.approval_rate,
            stats.mean_processing_minutes,
            stats.sample_size
        );
    }
    out
}

fn run_config_show(global: &GlobalOpts, run_id: &str) -> Result<ExitCode> {
    let loaded = load(global)?;
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "run_id": run_id,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "source": loaded.source.to_string(),
            "path": loaded.path.as_ref().map(|p| p.display().to_string()),
            "config": &loaded.config,
        }))?,
        OutputFormat::Human => {
            let path = loaded
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("# source: {} ({})", loaded.source, path);
            print!("{}", loaded.config.to_toml_string().map_err(Error::from)?);
        }
    }
    Ok(ExitCode::Clean)
}

fn run_config_validate(global: &GlobalOpts, path: &Path) -> Result<ExitCode> {
    let config = AuditConfig::from_file(path)?;
    validate_audit_config(&config)?;
    tracing::info!(path = %path.display(), "configuration valid");
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "ok",
            "path": path.display().to_string(),
            "schema_version": &config.schema_version,
        }))?,
        OutputFormat::Human => println!("{}: ok", path.display()),
    }
    Ok(ExitCode::Clean)
}

fn run_schema() -> Result<ExitCode> {
    let schema = schemars::schema_for!(Vec<CaseRecord>);
    print_json(&schema)?;
    Ok(ExitCode::Clean)
}
