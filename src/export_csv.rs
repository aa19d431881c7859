//! Write sweep rows as CSV (one line per armor class) or as a JSON array.
//!
//! CSV columns: AC, TotalAttacks, FirstHitPercentage, HitPercentage, CritPercentage,
//! TotalDamage, DamagePerRound. Fractions are printed with six decimals.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::sweep::SweepRow;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write csv report: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write json report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}' (expected csv or json)")),
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "AC")]
    armor_class: i32,
    #[serde(rename = "TotalAttacks")]
    total_attacks: u64,
    #[serde(rename = "FirstHitPercentage", serialize_with = "six_places")]
    first_hit_percentage: f64,
    #[serde(rename = "HitPercentage", serialize_with = "six_places")]
    hit_percentage: f64,
    #[serde(rename = "CritPercentage", serialize_with = "six_places")]
    crit_percentage: f64,
    #[serde(rename = "TotalDamage")]
    total_damage: i64,
    #[serde(rename = "DamagePerRound", serialize_with = "six_places")]
    damage_per_round: f64,
}

impl From<&SweepRow> for CsvRow {
    fn from(row: &SweepRow) -> Self {
        let summary = &row.summary;
        Self {
            armor_class: row.armor_class,
            total_attacks: summary.total_attacks,
            first_hit_percentage: summary.first_hit_percentage,
            hit_percentage: summary.hit_percentage,
            crit_percentage: summary.crit_percentage,
            total_damage: summary.total_damage,
            damage_per_round: summary.damage_per_round,
        }
    }
}

fn six_places<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:.6}"))
}

pub fn write_csv<W: Write>(out: W, rows: &[SweepRow]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut out: W, rows: &[SweepRow]) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write_report<W: Write>(out: W, rows: &[SweepRow], format: ReportFormat) -> Result<(), ReportError> {
    match format {
        ReportFormat::Csv => write_csv(out, rows),
        ReportFormat::Json => write_json(out, rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::analysis::SummaryStatistics;

    fn row(armor_class: i32) -> SweepRow {
        SweepRow {
            armor_class,
            summary: SummaryStatistics {
                trials: 2,
                total_attacks: 2,
                first_hit_percentage: 0.5,
                hit_percentage: 0.5,
                crit_percentage: 0.0,
                total_damage: 10,
                damage_per_round: 5.0,
            },
        }
    }

    #[test]
    fn csv_has_header_and_six_decimal_fractions() {
        let mut out = Vec::new();
        write_csv(&mut out, &[row(20), row(21)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "AC,TotalAttacks,FirstHitPercentage,HitPercentage,CritPercentage,TotalDamage,DamagePerRound",
                "20,2,0.500000,0.500000,0.000000,10,5.000000",
                "21,2,0.500000,0.500000,0.000000,10,5.000000",
            ]
        );
    }

    #[test]
    fn empty_csv_writes_nothing() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn json_flattens_summary_into_each_row() {
        let mut out = Vec::new();
        write_report(&mut out, &[row(18)], ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["armor_class"], 18);
        assert_eq!(value[0]["total_attacks"], 2);
        assert_eq!(value[0]["damage_per_round"], 5.0);
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ReportFormat>(), Ok(ReportFormat::Csv));
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
