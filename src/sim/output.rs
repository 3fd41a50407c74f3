//! Output writers for simulation results.

use super::{ConfigRow, MatchLog, SimError};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Format of the per-match summary; the auction and trick tables are always CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown output format '{0}' (expected csv or jsonl)")]
pub struct OutputFormatParseError(String);

impl FromStr for OutputFormat {
    type Err = OutputFormatParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "jsonl" | "json" => Ok(OutputFormat::Jsonl),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

type CsvFile = csv::Writer<BufWriter<File>>;

fn csv_file(path: &Path) -> Result<CsvFile, SimError> {
    let file = File::create(path)?;
    Ok(csv::WriterBuilder::new().delimiter(b';').from_writer(BufWriter::new(file)))
}

enum SummarySink {
    Csv(CsvFile),
    Jsonl(BufWriter<File>),
}

/// Writes one experiment into `<dir>/<experiment_id>_*` files.
pub struct OutputWriter {
    config: CsvFile,
    auctions: CsvFile,
    tricks: CsvFile,
    summary: SummarySink,
    paths: Vec<PathBuf>,
}

impl OutputWriter {
    pub fn new(dir: &Path, experiment_id: &str, format: OutputFormat) -> Result<Self, SimError> {
        std::fs::create_dir_all(dir)?;
        let path = |name: &str| dir.join(format!("{experiment_id}_{name}"));

        let config_path = path("config.csv");
        let auctions_path = path("auctions.csv");
        let tricks_path = path("tricks.csv");
        let (summary, summary_path) = match format {
            OutputFormat::Csv => {
                let p = path("summary.csv");
                (SummarySink::Csv(csv_file(&p)?), p)
            }
            OutputFormat::Jsonl => {
                let p = path("summary.jsonl");
                (SummarySink::Jsonl(BufWriter::new(File::create(&p)?)), p)
            }
        };
        Ok(Self {
            config: csv_file(&config_path)?,
            auctions: csv_file(&auctions_path)?,
            tricks: csv_file(&tricks_path)?,
            summary,
            paths: vec![config_path, auctions_path, tricks_path, summary_path],
        })
    }

    pub fn write_config(&mut self, row: &ConfigRow) -> Result<(), SimError> {
        self.config.serialize(row)?;
        Ok(())
    }

    pub fn write_match(&mut self, log: &MatchLog) -> Result<(), SimError> {
        write_rows(&mut self.auctions, &log.auctions)?;
        write_rows(&mut self.tricks, &log.tricks)?;
        match &mut self.summary {
            SummarySink::Csv(w) => w.serialize(&log.summary)?,
            SummarySink::Jsonl(w) => {
                serde_json::to_writer(&mut *w, &log.summary)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }

    /// Flush every file.
    pub fn finish(mut self) -> Result<(), SimError> {
        self.config.flush()?;
        self.auctions.flush()?;
        self.tricks.flush()?;
        match &mut self.summary {
            SummarySink::Csv(w) => w.flush()?,
            SummarySink::Jsonl(w) => w.flush()?,
        }
        Ok(())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn write_rows<T: Serialize>(writer: &mut CsvFile, rows: &[T]) -> Result<(), SimError> {
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(())
}
