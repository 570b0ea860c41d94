use std::fmt;
use std::io;

use camino::Utf8Path;
use tracing::warn;

use crate::domain::TaxonomyConsensus;
use crate::fs_ops::FileOps;

/// Why an annotation file produced no consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusIssue {
    Missing,
    Empty,
    Unreadable(String),
    Malformed,
}

impl fmt::Display for ConsensusIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsensusIssue::Missing => write!(f, "missing tax file"),
            ConsensusIssue::Empty => write!(f, "empty tax file"),
            ConsensusIssue::Unreadable(message) => write!(f, "unreadable tax file ({message})"),
            ConsensusIssue::Malformed => write!(f, "unexpected tax format (no ';' fields)"),
        }
    }
}

/// The second-to-last `;` field of the last line, trimmed.
pub fn parse_consensus(text: &str) -> Result<TaxonomyConsensus, ConsensusIssue> {
    let last = text.lines().last().ok_or(ConsensusIssue::Empty)?;
    let parts: Vec<&str> = last.split(';').collect();
    if parts.len() < 2 {
        return Err(ConsensusIssue::Malformed);
    }
    Ok(TaxonomyConsensus::new(parts[parts.len() - 2]))
}

pub fn read_consensus(
    fs: &dyn FileOps,
    path: &Utf8Path,
) -> Result<TaxonomyConsensus, ConsensusIssue> {
    let bytes = fs.read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ConsensusIssue::Missing,
        _ => ConsensusIssue::Unreadable(err.to_string()),
    })?;
    parse_consensus(&String::from_utf8_lossy(&bytes))
}

/// Like [`read_consensus`], but logs the reason and yields `None`.
pub fn extract_consensus(fs: &dyn FileOps, path: &Utf8Path) -> Option<TaxonomyConsensus> {
    match read_consensus(fs, path) {
        Ok(consensus) => Some(consensus),
        Err(issue) => {
            warn!(path = %path, "{issue}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consensus_from_last_line() {
        let text = "header line\n\
                    contig_1;k__Bacteria;p__Proteobacteria;s__Escherichia coli;0.98\n";
        let consensus = parse_consensus(text).unwrap();
        assert_eq!(consensus.as_str(), "s__Escherichia coli");
        assert!(consensus.is_species_level());
    }

    #[test]
    fn trailing_empty_field() {
        let consensus = parse_consensus("bin;k__Bacteria;g__Escherichia;").unwrap();
        assert_eq!(consensus.as_str(), "g__Escherichia");
        assert!(!consensus.is_species_level());
    }

    #[test]
    fn two_fields_is_enough() {
        let consensus = parse_consensus(" s__Foo ;").unwrap();
        assert_eq!(consensus.as_str(), "s__Foo");
    }

    #[test]
    fn empty_and_malformed() {
        assert_eq!(parse_consensus(""), Err(ConsensusIssue::Empty));
        assert_eq!(
            parse_consensus("k__Bacteria\nno separators here"),
            Err(ConsensusIssue::Malformed)
        );
        // A trailing blank line is the last line.
        assert_eq!(
            parse_consensus("a;s__Foo;b\n\n"),
            Err(ConsensusIssue::Malformed)
        );
    }
}
