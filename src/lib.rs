// src/lib.rs
pub mod error;
pub mod pipeline;
pub mod replace;

pub use error::*;

pub use pipeline::config::{ErrorStrategy, PipelineConfig};
pub use pipeline::context::{ProcessingStats, Record};
pub use pipeline::interceptors::{Interceptor, SearchReplaceInterceptor, TagExtractInterceptor};
pub use pipeline::stream::StreamPipeline;
pub use replace::{extract_tag, rewrite_tag, ReplacementTable};
