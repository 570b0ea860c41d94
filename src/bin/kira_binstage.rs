use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_binstage::config::{ConfigLoader, ConfigOverrides, ResolvedConfig};
use kira_binstage::domain::{ProjectName, parse_project_list};
use kira_binstage::error::BinStageError;
use kira_binstage::fs_ops::{DryRunFs, LocalFs};
use kira_binstage::gtdbtk::{DryRunClassifier, SystemGtdbtk};
use kira_binstage::output::{HumanOutput, JsonOutput, OutputMode};
use kira_binstage::router::{BinRouter, RunSummary};

#[derive(Parser)]
#[command(name = "kira-binstage")]
#[command(about = "Quality-gate metagenomic bins and stage unclassified HQ genomes for GTDB-Tk")]
#[command(version, author)]
struct Cli {
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Classify bins and stage them for GTDB-Tk")]
    Run(RunArgs),
    #[command(about = "Print the resolved configuration")]
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long)]
    config: Option<String>,
}

#[derive(Args)]
struct RunArgs {
    /// Comma-separated project names; prompted for when omitted.
    projects: Option<String>,

    #[arg(long)]
    config: Option<String>,

    /// Directory holding one sub-directory per project (default: cwd).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    #[arg(long)]
    cpus: Option<usize>,

    #[arg(long)]
    min_completeness: Option<f64>,

    #[arg(long)]
    max_contamination: Option<f64>,

    #[arg(long)]
    gtdbtk: Option<PathBuf>,

    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<BinStageError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &BinStageError) -> u8 {
    match error {
        BinStageError::NoProjects
        | BinStageError::InvalidProjectName(_)
        | BinStageError::ConfigRead(_)
        | BinStageError::ConfigParse(_)
        | BinStageError::InvalidConfig(_) => 2,
        BinStageError::MissingTool(_) | BinStageError::ClassifierFailed(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run_stage(args),
        Commands::Config(args) => {
            let resolved = ConfigLoader::resolve(args.config.as_deref(), &ConfigOverrides::default())?;
            println!("{}", serde_json::to_string_pretty(&resolved.stage).into_diagnostic()?);
            Ok(())
        }
    }
}

fn run_stage(args: RunArgs) -> miette::Result<()> {
    let RunArgs {
        projects,
        config,
        base_dir,
        cpus,
        min_completeness,
        max_contamination,
        gtdbtk,
        dry_run,
        json,
    } = args;

    let overrides = ConfigOverrides {
        cpus,
        min_completeness,
        max_contamination,
        gtdbtk,
    };
    let resolved = ConfigLoader::resolve(config.as_deref(), &overrides)?;
    let projects = resolve_projects(projects)?;
    let base_dir = resolve_base_dir(base_dir)?;
    let output_mode = if json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let summary = if dry_run {
        let router = BinRouter::new(
            DryRunFs::new(LocalFs),
            DryRunClassifier,
            base_dir,
            resolved.stage,
        );
        router.run(&projects)?
    } else {
        let router = build_router(base_dir, resolved);
        router.run(&projects)?
    };

    print_summary(&summary, output_mode).into_diagnostic()
}

fn build_router(base_dir: Utf8PathBuf, resolved: ResolvedConfig) -> BinRouter<LocalFs, SystemGtdbtk> {
    BinRouter::new(
        LocalFs,
        SystemGtdbtk::new(resolved.gtdbtk),
        base_dir,
        resolved.stage,
    )
}

fn resolve_projects(raw: Option<String>) -> Result<Vec<ProjectName>, BinStageError> {
    let raw = match raw {
        Some(raw) => raw,
        None if io::stdin().is_terminal() => prompt_projects()
            .map_err(|err| BinStageError::Filesystem(format!("read project list: {err}")))?,
        None => return Err(BinStageError::NoProjects),
    };
    parse_project_list(&raw)
}

fn prompt_projects() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter a list of projects (comma-separated): ")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn resolve_base_dir(base_dir: Option<PathBuf>) -> Result<Utf8PathBuf, BinStageError> {
    let path = match base_dir {
        Some(path) => path,
        None => std::env::current_dir().map_err(|err| BinStageError::Filesystem(err.to_string()))?,
    };
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| BinStageError::Filesystem(format!("non UTF-8 path: {}", path.display())))
}

fn print_summary(summary: &RunSummary, output_mode: OutputMode) -> io::Result<()> {
    match output_mode {
        OutputMode::Json => JsonOutput::print_summary(summary),
        OutputMode::Human => HumanOutput::print_summary(summary),
    }
}
