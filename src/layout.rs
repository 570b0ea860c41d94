use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{BinId, ProjectName};
use crate::error::BinStageError;
use crate::fs_ops::FileOps;

/// Paths derived from a project name under a base directory. Nothing here
/// touches the filesystem except [`ProjectLayout::ensure_staging_dirs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    results_dir: Utf8PathBuf,
    table_path: Utf8PathBuf,
    bins_dir: Utf8PathBuf,
    hq_dir: Utf8PathBuf,
    unclassified_dir: Utf8PathBuf,
    genomes_dir: Utf8PathBuf,
    classifier_out_dir: Utf8PathBuf,
}

impl ProjectLayout {
    pub fn new(base: &Utf8Path, project: &ProjectName) -> Self {
        let results_dir = base.join(project.as_str()).join("results");
        let table_path = results_dir.join(format!("18.{project}.bintable"));
        let bins_dir = results_dir.join("bins");
        let hq_dir = bins_dir.join("hq");
        let unclassified_dir = hq_dir.join("unclassified");
        let genomes_dir = unclassified_dir.join("gtdbtk_genomes_dir");
        let classifier_out_dir = unclassified_dir.join("gtdbtk_results");
        Self {
            results_dir,
            table_path,
            bins_dir,
            hq_dir,
            unclassified_dir,
            genomes_dir,
            classifier_out_dir,
        }
    }

    pub fn results_dir(&self) -> &Utf8Path {
        &self.results_dir
    }

    pub fn table_path(&self) -> &Utf8Path {
        &self.table_path
    }

    pub fn bins_dir(&self) -> &Utf8Path {
        &self.bins_dir
    }

    pub fn hq_dir(&self) -> &Utf8Path {
        &self.hq_dir
    }

    pub fn unclassified_dir(&self) -> &Utf8Path {
        &self.unclassified_dir
    }

    pub fn genomes_dir(&self) -> &Utf8Path {
        &self.genomes_dir
    }

    pub fn classifier_out_dir(&self) -> &Utf8Path {
        &self.classifier_out_dir
    }

    pub fn annotation_path(&self, id: &BinId) -> Utf8PathBuf {
        self.bins_dir.join(id.annotation_file_name())
    }

    pub fn genome_path(&self, id: &BinId) -> Utf8PathBuf {
        self.bins_dir.join(id.genome_file_name())
    }

    pub fn staged_genome_path(&self, id: &BinId) -> Utf8PathBuf {
        self.genomes_dir.join(id.staged_genome_file_name())
    }

    pub fn staging_dirs(&self) -> [&Utf8Path; 4] {
        [
            &self.hq_dir,
            &self.unclassified_dir,
            &self.genomes_dir,
            &self.classifier_out_dir,
        ]
    }

    pub fn ensure_staging_dirs(&self, fs: &dyn FileOps) -> Result<(), BinStageError> {
        for dir in self.staging_dirs() {
            fs.create_dir_all(dir)?;
        }
        Ok(())
    }
}
