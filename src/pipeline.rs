// src/pipeline.rs
pub mod config;
pub mod context;
pub mod interceptors;
pub mod stream;
