use std::io::{self, Write};

use serde::Serialize;

use crate::router::{ProjectStatus, RunSummary};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct HumanOutput;

impl HumanOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        Self::write_summary(&mut stdout, summary)
    }

    pub fn write_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
        for report in &summary.projects {
            match &report.status {
                ProjectStatus::Skipped { reason } => {
                    writeln!(out, "{}: skipped ({reason})", report.project)?;
                }
                ProjectStatus::Processed => {
                    writeln!(
                        out,
                        "{}: {} rows, {} HQ ({} species-level), {} genomes staged{}",
                        report.project,
                        report.tally.rows,
                        report.tally.high_quality,
                        report.species_level,
                        report.genomes_staged,
                        if report.classifier_invoked {
                            ", GTDB-Tk run"
                        } else {
                            ""
                        }
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{ProjectReport, RowTally};

    #[test]
    fn human_summary_lines() {
        let summary = RunSummary {
            projects: vec![
                ProjectReport {
                    project: "a".parse().unwrap(),
                    status: ProjectStatus::Processed,
                    tally: RowTally {
                        rows: 3,
                        high_quality: 2,
                        ..RowTally::default()
                    },
                    species_level: 1,
                    missing_annotations: 0,
                    missing_genomes: 0,
                    genomes_staged: 1,
                    classifier_invoked: true,
                },
                ProjectReport {
                    project: "b".parse().unwrap(),
                    status: ProjectStatus::Skipped {
                        reason: "bin table not found".to_string(),
                    },
                    tally: RowTally::default(),
                    species_level: 0,
                    missing_annotations: 0,
                    missing_genomes: 0,
                    genomes_staged: 0,
                    classifier_invoked: false,
                },
            ],
            finished_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let mut buf = Vec::new();
        HumanOutput::write_summary(&mut buf, &summary).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "a: 3 rows, 2 HQ (1 species-level), 1 genomes staged, GTDB-Tk run\n\
             b: skipped (bin table not found)\n"
        );
    }

    #[test]
    fn json_summary_flattens_status() {
        let summary = RunSummary {
            projects: vec![ProjectReport {
                project: "a".parse().unwrap(),
                status: ProjectStatus::Skipped {
                    reason: "x".to_string(),
                },
                tally: RowTally::default(),
                species_level: 0,
                missing_annotations: 0,
                missing_genomes: 0,
                genomes_staged: 0,
                classifier_invoked: false,
            }],
            finished_at: String::new(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["projects"][0]["project"], "a");
        assert_eq!(value["projects"][0]["status"], "skipped");
        assert_eq!(value["projects"][0]["reason"], "x");
    }
}
