use camino::Utf8Path;

use crate::error::BinStageError;
use crate::fs_ops::FileOps;

/// A bin quality report: one skipped preamble line, a tab-separated header,
/// then tab-separated data rows. Row width is not validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QualityTable {
    pub fn read(fs: &dyn FileOps, path: &Utf8Path) -> Result<Self, BinStageError> {
        if !fs.exists(path) {
            return Err(BinStageError::MissingTable(path.to_path_buf()));
        }
        let bytes = fs.read(path).map_err(|err| BinStageError::TableRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Self::parse(&text).ok_or_else(|| BinStageError::EmptyTable(path.to_path_buf()))
    }

    /// Returns `None` when there is no header line after the preamble.
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines();
        lines.next()?;
        let header = lines
            .next()?
            .split('\t')
            .map(|field| field.trim().to_string())
            .collect();

        let rows = lines
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();

        Some(Self { header, rows })
    }
}
