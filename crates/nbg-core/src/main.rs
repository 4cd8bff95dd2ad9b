//! nb-gibbs command-line entry point.
//!
//! - `nbg run`: load a corpus, sample, vote and print the run report
//! - `nbg check`: resolve and validate the sampler configuration
//! - `nbg version`

use chrono::Utc;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use nbg_config::{resolve_config, validate_config, InitStrategy, ResolvedPath, SamplerConfig};
use nbg_core::corpus::load_corpus;
use nbg_core::error::StructuredError;
use nbg_core::events::{
    event_names as progress_events, JsonlWriter, Phase, ProgressEmitter, ProgressEvent, RunEmitter,
};
use nbg_core::exit_codes::ExitCode;
use nbg_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use nbg_core::report::RunReport;
use nbg_core::sampler::GibbsSampler;
use nbg_core::Error;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;

/// Semi-supervised Naive Bayes text classification by collapsed Gibbs sampling
#[derive(Parser)]
#[command(name = "nbg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to sampler.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr: human or jsonl (overrides NBG_LOG_FORMAT)
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Human,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the test documents and print the run report
    Run(RunArgs),

    /// Resolve and validate the configuration
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Training documents, one per line: `<category> <term> <term> ...`
    #[arg(long, value_name = "FILE")]
    train: PathBuf,

    /// Test documents in the same format
    #[arg(long, value_name = "FILE")]
    test: PathBuf,

    /// Number of Gibbs sweeps
    #[arg(long, short = 'n')]
    sweeps: Option<usize>,

    /// RNG seed (random when omitted; reported either way)
    #[arg(long)]
    seed: Option<u64>,

    /// The two category tags; the first is label 0
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
    categories: Option<Vec<String>>,

    /// Class-proportion pseudo-counts
    #[arg(long, num_args = 2, value_names = ["G0", "G1"])]
    gamma: Option<Vec<f64>>,

    /// Per-term Dirichlet pseudo-count
    #[arg(long)]
    multi: Option<f64>,

    /// Test-label initialization: random or ground-truth
    #[arg(long)]
    init: Option<InitStrategy>,

    /// Recount statistics after every sweep and fail on divergence
    #[arg(long)]
    audit: bool,

    /// Write JSONL progress events to stderr
    #[arg(long)]
    progress: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Clean,
                _ => ExitCode::ArgsError,
            };
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

    let exit_code = match &cli.command {
        Commands::Run(args) => run_sampler(&cli.global, args),
        Commands::Check => run_check(&cli.global),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run_sampler(global: &GlobalOpts, args: &RunArgs) -> ExitCode {
    match execute_run(global, args) {
        Ok(report) => match print_report(global, &report) {
            Ok(()) => ExitCode::Clean,
            Err(err) => output_error(global, &err),
        },
        Err(err) => output_error(global, &err),
    }
}

fn execute_run(global: &GlobalOpts, args: &RunArgs) -> Result<RunReport, Error> {
    let run_id = generate_run_id();
    let started_at = Utc::now();
    tracing::info!(event = event_names::RUN_STARTED, stage = %Stage::Init, run_id = %run_id, "starting run");

    let resolved = resolve_config(global.config.as_deref());
    let mut config = load_config(&resolved)?;
    apply_overrides(&mut config, args);
    validate_config(&config)?;

    let emitter: Option<Arc<dyn ProgressEmitter>> = args.progress.then(|| {
        let writer: Arc<dyn ProgressEmitter> = Arc::new(JsonlWriter::new(std::io::stderr()));
        Arc::new(RunEmitter::new(run_id.clone(), writer)) as Arc<dyn ProgressEmitter>
    });

    let seed = config.seed.unwrap_or_else(rand::random);
    let corpus = load_corpus(&args.train, &args.test, config.categories.clone())?;
    let summary = corpus.summary();
    if let Some(emitter) = &emitter {
        emitter.emit(
            ProgressEvent::new(progress_events::CORPUS_LOADED, Phase::Load)
                .with_detail("vocabulary", summary.vocabulary_size)
                .with_detail("training", summary.training_documents)
                .with_detail("test", summary.test_documents),
        );
    }
    tracing::info!(
        event = event_names::LOAD_FINISHED,
        stage = %Stage::Load,
        vocabulary = summary.vocabulary_size,
        training = summary.training_documents,
        test = summary.test_documents,
        skipped = summary.skipped_lines,
        "corpus loaded"
    );

    let mut sampler = GibbsSampler::new(&corpus, &config, ChaCha8Rng::seed_from_u64(seed))?;
    if let Some(emitter) = &emitter {
        sampler = sampler.with_emitter(Arc::clone(emitter));
    }
    let outcome = sampler.run()?;

    let report = RunReport::new(run_id, started_at, seed, &config, &corpus, outcome);
    tracing::info!(
        event = event_names::RUN_FINISHED,
        stage = %Stage::Report,
        accuracy = report.accuracy,
        purity = report.purity,
        "run finished"
    );
    if let Some(emitter) = &emitter {
        emitter.emit(
            ProgressEvent::new(progress_events::REPORT_READY, Phase::Report)
                .with_elapsed_ms((report.finished_at - started_at).num_milliseconds().max(0) as u64),
        );
    }
    Ok(report)
}

fn load_config(resolved: &ResolvedPath) -> Result<SamplerConfig, Error> {
    match resolved.load() {
        Ok(config) => {
            match &resolved.path {
                Some(path) => tracing::debug!(
                    event = event_names::CONFIG_LOADED,
                    stage = %Stage::Init,
                    path = %path.display(),
                    source = %resolved.source,
                    "config loaded"
                ),
                None => tracing::debug!(
                    event = event_names::CONFIG_DEFAULT_USED,
                    stage = %Stage::Init,
                    "using built-in config"
                ),
            }
            Ok(config)
        }
        Err(err) => {
            tracing::error!(event = event_names::CONFIG_ERROR, stage = %Stage::Init, error = %err, "config rejected");
            Err(err.into())
        }
    }
}

fn apply_overrides(config: &mut SamplerConfig, args: &RunArgs) {
    if let Some(sweeps) = args.sweeps {
        config.sweeps = sweeps;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some([first, second]) = args.categories.as_deref() {
        config.categories = [first.clone(), second.clone()];
    }
    if let Some(&[g0, g1]) = args.gamma.as_deref() {
        config.hyperparameters.hyper_gamma = [g0, g1];
    }
    if let Some(multi) = args.multi {
        config.hyperparameters.hyper_multi = multi;
    }
    if let Some(init) = args.init {
        config.init = init;
    }
    if args.audit {
        config.audit = true;
    }
}

fn print_report(global: &GlobalOpts, report: &RunReport) -> Result<(), Error> {
    match global.format {
        OutputFormat::Json => println!("{}", report.to_json_pretty()?),
        OutputFormat::Human => println!("{}", report),
    }
    Ok(())
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let resolved = resolve_config(global.config.as_deref());
    match load_config(&resolved) {
        Ok(config) => {
            match global.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "status": "ok",
                        "source": resolved.source.to_string(),
                        "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                        "config": config,
                    });
                    match serde_json::to_string_pretty(&output) {
                        Ok(text) => println!("{}", text),
                        Err(err) => return output_error(global, &err.into()),
                    }
                }
                OutputFormat::Human => {
                    match &resolved.path {
                        Some(path) => println!("config: {} ({})", path.display(), resolved.source),
                        None => println!("config: {}", resolved.source),
                    }
                    println!("categories: {} / {}", config.categories[0], config.categories[1]);
                    println!("sweeps: {}", config.sweeps);
                    println!(
                        "hyper_gamma: {:?}, hyper_multi: {}",
                        config.hyperparameters.hyper_gamma, config.hyperparameters.hyper_multi
                    );
                    println!("init: {}", config.init);
                    println!("status: ok");
                }
            }
            ExitCode::Clean
        }
        Err(err) => output_error(global, &err),
    }
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "nbg_version": env!("CARGO_PKG_VERSION"),
                "config_schema_version": nbg_config::CONFIG_SCHEMA_VERSION,
                "report_schema_version": nbg_core::report::REPORT_SCHEMA_VERSION,
            });
            println!("{}", info);
        }
        OutputFormat::Human => {
            println!("nbg {}", env!("CARGO_PKG_VERSION"));
            println!("config schema version: {}", nbg_config::CONFIG_SCHEMA_VERSION);
        }
    }
}

fn output_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let code = err.exit_code();
    tracing::debug!(event = event_names::INTERNAL_ERROR, code = %code, error = %err, "command failed");
    match global.format {
        OutputFormat::Json => println!("{}", StructuredError::from(err).to_json()),
        OutputFormat::Human => eprintln!("error: {}", err),
    }
    code
}
