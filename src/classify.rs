use serde::Serialize;

use crate::config::Thresholds;
use crate::domain::{BinId, BinRecord, OriginTool};
use crate::error::BinStageError;

pub const COMPLETENESS_COLUMN: &str = "Completeness";
pub const CONTAMINATION_COLUMN: &str = "Contamination";

/// Positions of the columns the classifier needs, resolved once per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub bin_id: usize,
    pub completeness: usize,
    pub contamination: usize,
}

impl ColumnIndex {
    /// The bin identifier is whatever the first header column is called.
    pub fn resolve(header: &[String]) -> Result<Self, BinStageError> {
        let position = |column: &str| {
            header
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| BinStageError::MissingColumn {
                    column: column.to_string(),
                    header: header.to_vec(),
                })
        };
        if header.is_empty() {
            return Err(BinStageError::MissingColumn {
                column: "bin id".to_string(),
                header: Vec::new(),
            });
        }
        Ok(Self {
            bin_id: 0,
            completeness: position(COMPLETENESS_COLUMN)?,
            contamination: position(CONTAMINATION_COLUMN)?,
        })
    }

    pub fn min_row_len(&self) -> usize {
        self.bin_id.max(self.completeness).max(self.contamination) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RowVerdict {
    ShortRow { fields: usize },
    NoOriginTag,
    NotEvaluable,
    BelowThreshold { record: BinRecord },
    HighQuality { record: BinRecord },
}

impl RowVerdict {
    pub fn is_high_quality(&self) -> bool {
        matches!(self, RowVerdict::HighQuality { .. })
    }
}

pub struct QualityClassifier<'a> {
    columns: ColumnIndex,
    thresholds: &'a Thresholds,
}

impl<'a> QualityClassifier<'a> {
    pub fn new(header: &[String], thresholds: &'a Thresholds) -> Result<Self, BinStageError> {
        Ok(Self {
            columns: ColumnIndex::resolve(header)?,
            thresholds,
        })
    }

    pub fn columns(&self) -> ColumnIndex {
        self.columns
    }

    pub fn classify(&self, row: &[String]) -> RowVerdict {
        if row.len() < self.columns.min_row_len() {
            return RowVerdict::ShortRow { fields: row.len() };
        }

        let Some(origin) = OriginTool::detect(&row.join("\t")) else {
            return RowVerdict::NoOriginTag;
        };

        let (Some(completeness), Some(contamination)) = (
            parse_metric(&row[self.columns.completeness]),
            parse_metric(&row[self.columns.contamination]),
        ) else {
            return RowVerdict::NotEvaluable;
        };

        let record = BinRecord {
            id: BinId::new(&row[self.columns.bin_id]),
            completeness,
            contamination,
            origin,
        };
        if self.thresholds.is_high_quality(completeness, contamination) {
            RowVerdict::HighQuality { record }
        } else {
            RowVerdict::BelowThreshold { record }
        }
    }
}

fn parse_metric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
