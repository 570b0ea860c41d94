use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::classify::{QualityClassifier, RowVerdict};
use crate::config::StageConfig;
use crate::domain::{BinRecord, ProjectName};
use crate::error::BinStageError;
use crate::fs_ops::FileOps;
use crate::gtdbtk::GenomeClassifier;
use crate::layout::ProjectLayout;
use crate::table::QualityTable;
use crate::taxonomy::extract_consensus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Processed,
    Skipped { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowTally {
    pub rows: usize,
    pub short_rows: usize,
    pub untagged: usize,
    pub not_evaluable: usize,
    pub below_threshold: usize,
    pub high_quality: usize,
}

impl RowTally {
    fn record(&mut self, verdict: &RowVerdict) {
        self.rows += 1;
        match verdict {
            RowVerdict::ShortRow { .. } => self.short_rows += 1,
            RowVerdict::NoOriginTag => self.untagged += 1,
            RowVerdict::NotEvaluable => self.not_evaluable += 1,
            RowVerdict::BelowThreshold { .. } => self.below_threshold += 1,
            RowVerdict::HighQuality { .. } => self.high_quality += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: ProjectName,
    #[serde(flatten)]
    pub status: ProjectStatus,
    pub tally: RowTally,
    pub species_level: usize,
    pub missing_annotations: usize,
    pub missing_genomes: usize,
    pub genomes_staged: usize,
    pub classifier_invoked: bool,
}

impl ProjectReport {
    fn new(project: ProjectName) -> Self {
        Self {
            project,
            status: ProjectStatus::Processed,
            tally: RowTally::default(),
            species_level: 0,
            missing_annotations: 0,
            missing_genomes: 0,
            genomes_staged: 0,
            classifier_invoked: false,
        }
    }

    fn skipped(mut self, reason: String) -> Self {
        self.status = ProjectStatus::Skipped { reason };
        self
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ProjectStatus::Skipped { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub projects: Vec<ProjectReport>,
    pub finished_at: String,
}

pub struct BinRouter<F: FileOps, C: GenomeClassifier> {
    fs: F,
    classifier: C,
    base_dir: Utf8PathBuf,
    config: StageConfig,
}

impl<F: FileOps, C: GenomeClassifier> BinRouter<F, C> {
    pub fn new(fs: F, classifier: C, base_dir: Utf8PathBuf, config: StageConfig) -> Self {
        Self {
            fs,
            classifier,
            base_dir,
            config,
        }
    }

    pub fn layout(&self, project: &ProjectName) -> ProjectLayout {
        ProjectLayout::new(&self.base_dir, project)
    }

    /// Projects run in order. Copy and classifier failures stop the run;
    /// data problems only skip the affected row, bin or project.
    pub fn run(&self, projects: &[ProjectName]) -> Result<RunSummary, BinStageError> {
        let mut reports = Vec::with_capacity(projects.len());
        for project in projects {
            reports.push(self.process_project(project)?);
        }
        info!("done");
        Ok(RunSummary {
            projects: reports,
            finished_at: Utc::now().to_rfc3339(),
        })
    }

    pub fn process_project(&self, project: &ProjectName) -> Result<ProjectReport, BinStageError> {
        let layout = self.layout(project);
        let report = ProjectReport::new(project.clone());

        if !self.fs.exists(layout.table_path()) {
            warn!(project = %project, path = %layout.table_path(), "bin table not found");
            return Ok(report.skipped(format!("bin table not found: {}", layout.table_path())));
        }

        layout.ensure_staging_dirs(&self.fs)?;

        let table = match QualityTable::read(&self.fs, layout.table_path()) {
            Ok(table) => table,
            Err(err) if err.is_project_scoped() => {
                warn!(project = %project, "could not read header/rows: {err}");
                return Ok(report.skipped(err.to_string()));
            }
            Err(err) => return Err(err),
        };

        let classifier = match QualityClassifier::new(&table.header, &self.config.thresholds) {
            Ok(classifier) => classifier,
            Err(err) => {
                error!(project = %project, path = %layout.table_path(), "{err}");
                info!(header = ?table.header, "header columns");
                return Ok(report.skipped(err.to_string()));
            }
        };

        self.route_rows(&layout, &classifier, &table, report)
    }

    fn route_rows(
        &self,
        layout: &ProjectLayout,
        classifier: &QualityClassifier<'_>,
        table: &QualityTable,
        mut report: ProjectReport,
    ) -> Result<ProjectReport, BinStageError> {
        for row in &table.rows {
            let verdict = classifier.classify(row);
            report.tally.record(&verdict);
            match verdict {
                RowVerdict::ShortRow { fields } => {
                    warn!(
                        path = %layout.table_path(),
                        fields,
                        row = ?row,
                        "skipping short row"
                    );
                }
                RowVerdict::HighQuality { record } => {
                    self.stage_bin(layout, &record, &mut report)?;
                }
                other => debug!(row = ?row, verdict = ?other, "row not promoted"),
            }
        }

        if report.genomes_staged == 0 {
            info!(
                project = %report.project,
                "no unclassified HQ genomes found; skipping GTDB-Tk"
            );
            return Ok(report);
        }

        info!(
            project = %report.project,
            genomes = report.genomes_staged,
            "classifying unclassified HQ genomes"
        );
        self.classifier.classify_workflow(
            layout.genomes_dir(),
            layout.classifier_out_dir(),
            self.config.cpus,
        )?;
        report.classifier_invoked = true;
        Ok(report)
    }

    fn stage_bin(
        &self,
        layout: &ProjectLayout,
        record: &BinRecord,
        report: &mut ProjectReport,
    ) -> Result<(), BinStageError> {
        let annotation = layout.annotation_path(&record.id);
        let genome = layout.genome_path(&record.id);
        let has_annotation = self.fs.exists(&annotation);

        if has_annotation {
            self.copy_into(&annotation, layout.hq_dir())?;
        } else {
            report.missing_annotations += 1;
            warn!(path = %annotation, "HQ candidate missing tax file");
        }

        let species_level = extract_consensus(&self.fs, &annotation)
            .map(|consensus| consensus.is_species_level())
            .unwrap_or(false);
        if species_level {
            report.species_level += 1;
            return Ok(());
        }

        if has_annotation {
            self.copy_into(&annotation, layout.unclassified_dir())?;
        }
        if self.fs.exists(&genome) {
            self.fs
                .copy_file(&genome, &layout.staged_genome_path(&record.id))?;
            report.genomes_staged += 1;
        } else {
            report.missing_genomes += 1;
            warn!(path = %genome, "missing fasta for unclassified bin");
        }
        Ok(())
    }

    fn copy_into(&self, source: &Utf8Path, dir: &Utf8Path) -> Result<(), BinStageError> {
        let name = source
            .file_name()
            .ok_or_else(|| BinStageError::Filesystem(format!("no file name in {source}")))?;
        self.fs.copy_file(source, &dir.join(name))
    }
}
