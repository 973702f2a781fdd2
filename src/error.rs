#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed pair '{pair}' in mapping '{spec}' (expected key:value)")]
    MalformedPair { pair: String, spec: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Record too long: {length} > {max_length}")]
    RecordTooLong { length: usize, max_length: usize },
}

impl ProcessingError {
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, ProcessingError::IoError(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
