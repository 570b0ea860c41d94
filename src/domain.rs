use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BinStageError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectName {
    type Err = BinStageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let is_valid = !normalized.is_empty()
            && normalized != "."
            && normalized != ".."
            && !normalized.contains(['/', '\\']);
        if !is_valid {
            return Err(BinStageError::InvalidProjectName(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// Splits a comma-separated project list, dropping empty entries.
pub fn parse_project_list(raw: &str) -> Result<Vec<ProjectName>, BinStageError> {
    let projects = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<Vec<ProjectName>, BinStageError>>()?;
    if projects.is_empty() {
        return Err(BinStageError::NoProjects);
    }
    Ok(projects)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinId(String);

impl BinId {
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn annotation_file_name(&self) -> String {
        format!("{}.fa.tax", self.0)
    }

    pub fn genome_file_name(&self) -> String {
        format!("{}.fa", self.0)
    }

    /// GTDB-Tk picks up `.fna` by default.
    pub fn staged_genome_file_name(&self) -> String {
        format!("{}.fna", self.0)
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginTool {
    Concoct,
    Metabat2,
}

impl OriginTool {
    pub const ALL: [OriginTool; 2] = [OriginTool::Concoct, OriginTool::Metabat2];

    pub fn tag(self) -> &'static str {
        match self {
            OriginTool::Concoct => "concoct",
            OriginTool::Metabat2 => "metabat2",
        }
    }

    /// Case-sensitive substring search over the whole row text.
    pub fn detect(row_text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| row_text.contains(tool.tag()))
    }
}

impl fmt::Display for OriginTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinRecord {
    pub id: BinId,
    pub completeness: f64,
    pub contamination: f64,
    pub origin: OriginTool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaxonomyConsensus(String);

impl TaxonomyConsensus {
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_species_level(&self) -> bool {
        self.0.starts_with("s_")
    }
}

impl fmt::Display for TaxonomyConsensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_project_name_trims() {
        let name: ProjectName = "  soil_2021 ".parse().unwrap();
        assert_eq!(name.as_str(), "soil_2021");
    }

    #[test]
    fn parse_project_name_rejects_paths() {
        assert_matches!(
            "../etc".parse::<ProjectName>(),
            Err(BinStageError::InvalidProjectName(_))
        );
        assert_matches!(
            "..".parse::<ProjectName>(),
            Err(BinStageError::InvalidProjectName(_))
        );
        assert_matches!(
            "   ".parse::<ProjectName>(),
            Err(BinStageError::InvalidProjectName(_))
        );
    }

    #[test]
    fn project_list_drops_empty_entries() {
        let projects = parse_project_list(" a, ,b,,").unwrap();
        let names: Vec<_> = projects.iter().map(ProjectName::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn project_list_empty_is_error() {
        assert_matches!(parse_project_list(" , "), Err(BinStageError::NoProjects));
        assert_matches!(parse_project_list(""), Err(BinStageError::NoProjects));
    }

    #[test]
    fn origin_detection_is_substring_and_case_sensitive() {
        assert_eq!(
            OriginTool::detect("bin.1\tmetabat2_bin.1\t96"),
            Some(OriginTool::Metabat2)
        );
        assert_eq!(OriginTool::detect("concoct.12\t99"), Some(OriginTool::Concoct));
        assert_eq!(OriginTool::detect("MetaBAT2.4\t99"), None);
        assert_eq!(OriginTool::detect("maxbin.001\t99"), None);
    }

    #[test]
    fn bin_file_names() {
        let id = BinId::new(" concoct.7 ");
        assert_eq!(id.annotation_file_name(), "concoct.7.fa.tax");
        assert_eq!(id.genome_file_name(), "concoct.7.fa");
        assert_eq!(id.staged_genome_file_name(), "concoct.7.fna");
    }

    #[test]
    fn species_level_prefix() {
        assert!(TaxonomyConsensus::new(" s__Escherichia coli").is_species_level());
        assert!(!TaxonomyConsensus::new("g__Escherichia").is_species_level());
        assert!(!TaxonomyConsensus::new("").is_species_level());
        assert!(!TaxonomyConsensus::new("S__upper").is_species_level());
    }
}
