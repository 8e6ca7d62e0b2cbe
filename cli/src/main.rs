use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use openapi_xtp_core::{convert, emit_document, load_document, CollisionPolicy, ConvertOptions};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "openapi-xtp")]
#[command(about = "Convert an OpenAPI 3.x document into an XTP plugin schema")]
#[command(version)]
struct Cli {
    /// Input OpenAPI document (YAML or JSON)
    input: PathBuf,

    /// Output schema file (defaults to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Regex applied to each operationId; only matching operations become imports
    #[arg(long, default_value = ".*")]
    include: String,

    /// What to do when two schemas end up under the same name
    #[arg(long, value_enum, default_value_t = CollisionArg::Overwrite)]
    on_collision: CollisionArg,

    /// Max traversal depth for tree walks
    #[arg(long, default_value_t = 50)]
    max_depth: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CollisionArg {
    Overwrite,
    Error,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(val: CollisionArg) -> Self {
        match val {
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Error => CollisionPolicy::Error,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — logs go to stderr so stdout stays clean for the
    // emitted document
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;
    let doc = load_document(&text)
        .with_context(|| format!("Failed to parse document from: {}", cli.input.display()))?;

    // All fields set explicitly; clippy enforces exhaustiveness
    let options = ConvertOptions {
        include: cli.include,
        on_collision: cli.on_collision.into(),
        max_depth: cli.max_depth,
        version: ConvertOptions::default().version,
    };

    let result = convert(&doc, &options).context("Conversion failed")?;

    let rendered = match cli.format {
        OutputFormat::Yaml => emit_document(&result.document)?,
        OutputFormat::Json => {
            let mut s =
                serde_json::to_string_pretty(&result.document).context("Failed to render JSON")?;
            s.push('\n');
            s
        }
    };

    // Whole document or nothing — render first, then a single write.
    match cli.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!(
                "Wrote {} ({} imports)",
                path.display(),
                result.imported.len()
            );
        }
        None => {
            io::stdout()
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
