use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open run log '{path}': {source}")]
    OpenRunLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to append to run log '{path}': {source}")]
    AppendRunLog {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize run summary: {source}")]
    SerializeSummary {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write run summary '{path}': {source}")]
    WriteSummary {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
