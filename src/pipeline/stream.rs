// src/pipeline/stream.rs
use std::io::{BufRead, Write};
use std::time::Instant;

use crate::error::ProcessingError;
use crate::pipeline::config::{ErrorStrategy, PipelineConfig};
use crate::pipeline::context::{ProcessingStats, Record};
use crate::pipeline::interceptors::Interceptor;

/// Main pipeline orchestrator: feeds newline-delimited records through the
/// interceptor chain, one record in, one record out.
pub struct StreamPipeline {
    interceptors: Vec<Box<dyn Interceptor>>,
    config: PipelineConfig,
    stats: ProcessingStats,
}

impl StreamPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        StreamPipeline {
            interceptors: Vec::new(),
            config,
            stats: ProcessingStats::default(),
        }
    }

    pub fn add_interceptor(&mut self, interceptor: Box<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Process a single stream.
    ///
    /// Records are split on `\n` and handled as raw bytes, so payloads that
    /// are not valid UTF-8 still travel through unchanged.
    pub fn process_stream<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
        filename: Option<&str>,
    ) -> Result<ProcessingStats, ProcessingError> {
        let start_time = Instant::now();
        let mut file_stats = ProcessingStats::default();
        let mut buf: Vec<u8> = Vec::with_capacity(self.config.buffer_size.min(8192));

        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::UnexpectedEof {
                        break;
                    }
                    return Err(ProcessingError::IoError(e));
                }
            }

            // Strip the delimiter; records may end in \n or \r\n
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }

            file_stats.records_processed += 1;

            // Check record length
            if buf.len() > self.config.max_record_bytes {
                let error = ProcessingError::RecordTooLong {
                    length: buf.len(),
                    max_length: self.config.max_record_bytes,
                };
                match self.config.error_strategy {
                    ErrorStrategy::FailFast => return Err(error),
                    ErrorStrategy::Skip => {
                        file_stats.errors += 1;
                        if self.config.debug {
                            eprintln!(
                                "retag: record {}: {}",
                                file_stats.records_processed, error
                            );
                        }
                        continue;
                    }
                }
            }

            // Run the record through all stages in order
            let mut record = Record::new(buf.clone());
            for interceptor in &self.interceptors {
                record = interceptor.intercept(record);
            }

            if record.payload() != buf.as_slice() {
                file_stats.records_rewritten += 1;
            }

            if let Err(e) = self.write_record(output, &record) {
                // Downstream closed, stop quietly
                if e.is_broken_pipe() {
                    break;
                }
                return Err(e);
            }
            file_stats.records_output += 1;
        }

        file_stats.processing_time = start_time.elapsed();

        // Update accumulated stats
        self.stats.records_processed += file_stats.records_processed;
        self.stats.records_output += file_stats.records_output;
        self.stats.records_rewritten += file_stats.records_rewritten;
        self.stats.errors += file_stats.errors;
        self.stats.processing_time += file_stats.processing_time;

        if self.config.debug {
            eprintln!(
                "retag: {}: {} records in, {} out, {} rewritten, {} errors",
                filename.unwrap_or("<stdin>"),
                file_stats.records_processed,
                file_stats.records_output,
                file_stats.records_rewritten,
                file_stats.errors
            );
        }

        Ok(file_stats)
    }

    fn write_record<W: Write>(
        &self,
        output: &mut W,
        record: &Record,
    ) -> Result<(), ProcessingError> {
        if self.config.emit_headers && !record.headers().is_empty() {
            let mut pairs: Vec<String> = record
                .headers()
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            pairs.sort();
            write!(output, "{}\t", pairs.join(" "))?;
        }
        output.write_all(record.payload())?;
        output.write_all(b"\n")?;
        Ok(())
    }

    /// Get current accumulated stats
    pub fn get_stats(&self) -> &ProcessingStats {
        &self.stats
    }
}
