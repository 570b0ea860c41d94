use std::path::PathBuf;

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BinStageError {
    #[error("no projects provided")]
    #[diagnostic(help("pass a comma-separated list, e.g. `kira-binstage run projA,projB`"))]
    NoProjects,

    #[error("invalid project name: {0}")]
    InvalidProjectName(String),

    #[error("bin table not found: {0}")]
    MissingTable(Utf8PathBuf),

    #[error("bin table has no header line: {0}")]
    EmptyTable(Utf8PathBuf),

    #[error("failed to read bin table {path}: {message}")]
    TableRead { path: Utf8PathBuf, message: String },

    #[error("missing expected column `{column}` in header (columns: {header:?})")]
    MissingColumn { column: String, header: Vec<String> },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create directory {path}: {message}")]
    CreateDir { path: Utf8PathBuf, message: String },

    #[error("failed to copy {from} -> {to}: {message}")]
    Copy {
        from: Utf8PathBuf,
        to: Utf8PathBuf,
        message: String,
    },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("classifier failed: {0}")]
    ClassifierFailed(String),
}

impl BinStageError {
    /// Errors that only invalidate the current project, not the whole run.
    pub fn is_project_scoped(&self) -> bool {
        matches!(
            self,
            BinStageError::MissingTable(_)
                | BinStageError::EmptyTable(_)
                | BinStageError::TableRead { .. }
                | BinStageError::MissingColumn { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_scoped_errors() {
        assert!(BinStageError::MissingTable(Utf8PathBuf::from("x")).is_project_scoped());
        assert!(
            BinStageError::MissingColumn {
                column: "Completeness".to_string(),
                header: vec![],
            }
            .is_project_scoped()
        );
        assert!(!BinStageError::ClassifierFailed("exit 1".to_string()).is_project_scoped());
        assert!(
            !BinStageError::Copy {
                from: Utf8PathBuf::from("a"),
                to: Utf8PathBuf::from("b"),
                message: "denied".to_string(),
            }
            .is_project_scoped()
        );
    }
}
