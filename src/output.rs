//! JSON writers for comparison reports and raw branch dumps

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::branch::report::ComparisonReport;
use crate::branch::types::Branch;
use crate::compare::BranchSnapshot;
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

impl OutputTarget {
    /// `-` selects stdout, anything else is a file path
    pub fn from_arg(arg: &Path) -> Self {
        if arg == Path::new("-") {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(arg.to_path_buf())
        }
    }

    fn describe(&self) -> String {
        match self {
            OutputTarget::File(path) => path.display().to_string(),
            OutputTarget::Stdout => "stdout".to_string(),
        }
    }
}

/// Write the report as pretty JSON
pub fn write_report(report: &ComparisonReport, target: &OutputTarget) -> Result<(), OutputError> {
    write_json(report, target)?;
    info!(
        "Wrote report with {} entries to {}",
        report.total_entries(),
        target.describe()
    );
    Ok(())
}

/// Write the fetched package sets keyed by configured branch name
pub fn write_raw(
    snapshot: &BranchSnapshot,
    settings: &Settings,
    target: &OutputTarget,
) -> Result<(), OutputError> {
    let mut raw = serde_json::Map::new();
    raw.insert(
        settings.branches.sisyphus.clone(),
        serde_json::to_value(snapshot.records(Branch::Sisyphus))?,
    );
    raw.insert(
        settings.branches.p11.clone(),
        serde_json::to_value(snapshot.records(Branch::P11))?,
    );

    write_json(&raw, target)?;
    info!("Wrote raw package sets to {}", target.describe());
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(value: &T, target: &OutputTarget) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        target: target.describe(),
        source,
    };

    match target {
        OutputTarget::File(path) => {
            let file = File::create(path).map_err(io_error)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer).map_err(io_error)?;
            writer.flush().map_err(io_error)
        }
        OutputTarget::Stdout => {
            let mut writer = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer).map_err(io_error)?;
            writer.flush().map_err(io_error)
        }
    }
}
