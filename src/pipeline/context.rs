use std::collections::HashMap;
use std::time::Duration;

/// A record that flows through the pipeline: an opaque byte payload plus
/// string-keyed headers for metadata set by interceptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    payload: Vec<u8>,
    headers: HashMap<String, String>,
}

impl Record {
    /// Create a record from a payload, with no headers.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Record {
            payload: payload.into(),
            headers: HashMap::new(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload wholesale. Headers are untouched.
    pub fn set_payload(&mut self, payload: impl Into<Vec<u8>>) {
        self.payload = payload.into();
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// Runtime statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub records_processed: usize,
    pub records_output: usize,
    pub records_rewritten: usize,
    pub errors: usize,
    pub processing_time: Duration,
}
