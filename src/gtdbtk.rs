use std::path::{Path, PathBuf};
use std::process::Command;

use camino::Utf8Path;
use tracing::info;

use crate::error::BinStageError;

/// Runs whole-genome taxonomic classification over a directory of `.fna` files.
pub trait GenomeClassifier: Send + Sync {
    fn classify_workflow(
        &self,
        genome_dir: &Utf8Path,
        out_dir: &Utf8Path,
        cpus: usize,
    ) -> Result<(), BinStageError>;
}

#[derive(Debug, Clone)]
pub struct SystemGtdbtk {
    program: Option<PathBuf>,
}

impl SystemGtdbtk {
    /// Uses `program` when given, otherwise looks `gtdbtk` up on `PATH`.
    pub fn new(program: Option<PathBuf>) -> Self {
        Self {
            program: program.or_else(|| find_in_path("gtdbtk")),
        }
    }

    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    fn require_program(&self) -> Result<&PathBuf, BinStageError> {
        self.program
            .as_ref()
            .ok_or_else(|| BinStageError::MissingTool("gtdbtk".to_string()))
    }
}

pub fn classify_wf_args(genome_dir: &Utf8Path, out_dir: &Utf8Path, cpus: usize) -> Vec<String> {
    vec![
        "classify_wf".to_string(),
        "--genome_dir".to_string(),
        genome_dir.to_string(),
        "--out_dir".to_string(),
        out_dir.to_string(),
        "--cpus".to_string(),
        cpus.to_string(),
    ]
}

impl GenomeClassifier for SystemGtdbtk {
    fn classify_workflow(
        &self,
        genome_dir: &Utf8Path,
        out_dir: &Utf8Path,
        cpus: usize,
    ) -> Result<(), BinStageError> {
        let program = self.require_program()?;
        let args = classify_wf_args(genome_dir, out_dir, cpus);
        info!(cmd = %format!("{} {}", program.display(), args.join(" ")), "running classifier");

        // stdout/stderr are inherited.
        let status = Command::new(program)
            .args(&args)
            .status()
            .map_err(|err| BinStageError::ClassifierFailed(err.to_string()))?;
        if status.success() {
            return Ok(());
        }
        Err(BinStageError::ClassifierFailed(format!(
            "{} exited with {status}",
            program.display()
        )))
    }
}

/// Logs the command it would have run and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunClassifier;

impl GenomeClassifier for DryRunClassifier {
    fn classify_workflow(
        &self,
        genome_dir: &Utf8Path,
        out_dir: &Utf8Path,
        cpus: usize,
    ) -> Result<(), BinStageError> {
        let args = classify_wf_args(genome_dir, out_dir, cpus);
        info!(cmd = %format!("gtdbtk {}", args.join(" ")), "dry-run: would run classifier");
        Ok(())
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}
