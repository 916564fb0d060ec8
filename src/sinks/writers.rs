use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::RunRecord;
use super::format::format_x100;
use crate::error::SinkError;

/// Appends one text record for a finished run:
/// `timestamp,target,duration_s,concurrency,total,success,failed,rate`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or written.
pub async fn append_run_log(path: &str, record: &RunRecord) -> Result<(), SinkError> {
    let line = run_log_line(record);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|err| SinkError::OpenRunLog {
            path: path.to_owned(),
            source: err,
        })?;
    file.write_all(line.as_bytes())
        .await
        .map_err(|err| SinkError::AppendRunLog {
            path: path.to_owned(),
            source: err,
        })?;
    file.flush().await.map_err(|err| SinkError::AppendRunLog {
        path: path.to_owned(),
        source: err,
    })?;
    Ok(())
}

/// Writes the run record as pretty JSON, replacing any previous file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_json_summary(path: &str, record: &RunRecord) -> Result<(), SinkError> {
    let bytes = serde_json::to_vec_pretty(record)
        .map_err(|err| SinkError::SerializeSummary { source: err })?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|err| SinkError::WriteSummary {
            path: path.to_owned(),
            source: err,
        })?;
    Ok(())
}

pub(super) fn run_log_line(record: &RunRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{}\n",
        record.timestamp,
        record.target,
        record.duration_s,
        record.concurrency,
        record.total,
        record.success,
        record.failed,
        format_x100(record.rate_x100),
    )
}
