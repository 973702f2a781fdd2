use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use retag::{
    ErrorStrategy, PipelineConfig, ProcessingStats, SearchReplaceInterceptor, StreamPipeline,
    TagExtractInterceptor,
};

#[derive(Parser)]
#[command(name = "retag")]
#[command(about = "Rewrite type tags in streaming event records")]
#[command(version)]
struct Args {
    /// Tag mapping, format "old:new,old:new,..."
    #[arg(short = 's', long = "search-replace", value_name = "MAPPING")]
    search_replace: String,

    /// Also copy each record's type tag into this header
    #[arg(long = "extract-tag", value_name = "HEADER")]
    extract_tag: Option<String>,

    /// Emit headers in front of the payload ("k=v k=v<TAB>payload")
    #[arg(long)]
    headers: bool,

    /// Input file (default: stdin)
    #[arg(short = 'i', long = "input")]
    input_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,

    /// Debug mode - show processing details
    #[arg(long)]
    debug: bool,

    /// Fail on first error instead of skipping records
    #[arg(long)]
    fail_fast: bool,

    /// Maximum record length
    #[arg(long, default_value = "1048576")] // 1MB
    max_record_bytes: usize,

    /// Buffer size for I/O
    #[arg(long, default_value = "65536")] // 64KB
    buffer_size: usize,
}

impl Args {
    fn validate(&self) -> Result<(), String> {
        if self.search_replace.trim().is_empty() {
            return Err("--search-replace must not be empty".to_string());
        }
        if let Some(header) = &self.extract_tag {
            if header.trim().is_empty() {
                return Err("--extract-tag header name must not be empty".to_string());
            }
        }
        Ok(())
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = args.validate() {
        eprintln!("retag: {}", e);
        std::process::exit(1);
    }

    match run(args) {
        Ok(stats) => {
            if stats.errors > 0 {
                std::process::exit(1);
            }
            if stats.records_output == 0 {
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("retag: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<ProcessingStats> {
    let config = PipelineConfig {
        error_strategy: if args.fail_fast {
            ErrorStrategy::FailFast
        } else {
            ErrorStrategy::Skip
        },
        debug: args.debug,
        buffer_size: args.buffer_size,
        max_record_bytes: args.max_record_bytes,
        emit_headers: args.headers,
    };

    let mut pipeline = StreamPipeline::new(config);
    pipeline.add_interceptor(Box::new(SearchReplaceInterceptor::from_config(
        &args.search_replace,
    )));
    if let Some(header) = &args.extract_tag {
        pipeline.add_interceptor(Box::new(TagExtractInterceptor::new(header.clone())));
    }

    // Set up input
    let input_filename = args
        .input_file
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());
    let input: Box<dyn BufRead> = if let Some(input_path) = &args.input_file {
        let file = File::open(input_path)
            .with_context(|| format!("failed to open input file '{}'", input_path.display()))?;
        Box::new(BufReader::with_capacity(args.buffer_size, file))
    } else {
        Box::new(BufReader::with_capacity(args.buffer_size, io::stdin()))
    };

    // Set up output
    let mut output: Box<dyn Write> = if let Some(output_path) = &args.output_file {
        let file = File::create(output_path)
            .with_context(|| format!("failed to create output file '{}'", output_path.display()))?;
        Box::new(io::BufWriter::with_capacity(args.buffer_size, file))
    } else {
        Box::new(io::BufWriter::with_capacity(args.buffer_size, io::stdout()))
    };

    let stats = pipeline
        .process_stream(input, &mut output, input_filename.as_deref())
        .context("processing failed")?;

    // Flush, tolerating a downstream that already hung up
    if let Err(e) = output.flush() {
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(e).context("failed to flush output");
        }
    }

    // Print final stats if debug mode
    if args.debug {
        eprintln!("Final statistics:");
        eprintln!("  Records processed: {}", stats.records_processed);
        eprintln!("  Records output: {}", stats.records_output);
        eprintln!("  Records rewritten: {}", stats.records_rewritten);
        eprintln!("  Errors: {}", stats.errors);
        eprintln!("  Processing time: {:?}", stats.processing_time);

        if stats.records_processed > 0 {
            let rate = stats.records_processed as f64 / stats.processing_time.as_secs_f64();
            eprintln!("  Processing rate: {:.0} records/second", rate);
        }
    }

    Ok(stats)
}
