// src/pipeline/interceptors.rs
use crate::pipeline::context::Record;
use crate::replace::{extract_tag, rewrite_tag, ReplacementTable};

/// One stage in the per-record chain.
///
/// `intercept` never fails and never drops a record: every failure mode
/// degrades to returning the input unchanged, with the diagnostic going to
/// the log. Implementations hold no per-record state, so a stage can be
/// shared across threads.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, record: Record) -> Record;

    fn name(&self) -> &str;

    /// Apply the stage to each record independently, preserving order and
    /// length.
    fn intercept_batch(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().map(|r| self.intercept(r)).collect()
    }
}

/// Rewrites a record's type tag according to a replacement table.
///
/// The leftmost `"type":"<tag>"` in the payload drives the lookup; on a hit
/// every occurrence of that exact substring is replaced. Records without a
/// tag, with an unmapped tag, or with a payload that is not valid UTF-8 pass
/// through unchanged.
pub struct SearchReplaceInterceptor {
    table: ReplacementTable,
}

impl SearchReplaceInterceptor {
    pub fn new(table: ReplacementTable) -> Self {
        SearchReplaceInterceptor { table }
    }

    /// Build from a raw `"key:value,key:value"` configuration string.
    ///
    /// Fail-soft: a malformed string is logged and the stage runs with an
    /// empty table (pure pass-through) instead of taking the pipeline down.
    pub fn from_config(spec: &str) -> Self {
        let table = match ReplacementTable::parse(spec) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(error = %e, "mapping rejected, continuing with empty table");
                ReplacementTable::default()
            }
        };
        SearchReplaceInterceptor { table }
    }

    pub fn table(&self) -> &ReplacementTable {
        &self.table
    }
}

impl Interceptor for SearchReplaceInterceptor {
    fn intercept(&self, mut record: Record) -> Record {
        if self.table.is_empty() {
            return record;
        }

        let payload = match std::str::from_utf8(record.payload()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    interceptor = self.name(),
                    error = %e,
                    "payload is not valid UTF-8, passing record through"
                );
                return record;
            }
        };

        if let Some(rewritten) = rewrite_tag(payload, &self.table) {
            record.set_payload(rewritten);
        }
        record
    }

    fn name(&self) -> &str {
        "search_replace"
    }
}

/// Copies a record's type tag value into a header, leaving the payload
/// untouched. Records without a tag pass through without the header.
pub struct TagExtractInterceptor {
    header: String,
}

impl TagExtractInterceptor {
    pub fn new(header: impl Into<String>) -> Self {
        TagExtractInterceptor {
            header: header.into(),
        }
    }
}

impl Interceptor for TagExtractInterceptor {
    fn intercept(&self, mut record: Record) -> Record {
        let payload = match std::str::from_utf8(record.payload()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    interceptor = self.name(),
                    error = %e,
                    "payload is not valid UTF-8, passing record through"
                );
                return record;
            }
        };

        if let Some(tag) = extract_tag(payload) {
            let tag = tag.to_string();
            record.set_header(self.header.clone(), tag);
        }
        record
    }

    fn name(&self) -> &str {
        "tag_extract"
    }
}
