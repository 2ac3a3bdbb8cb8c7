//! `folio` binary entry point.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use folio_chunking::{Policy, SaveFormat, TextChunker, save_chunks};
use folio_cli::config::{AppConfig, DEFAULT_CONFIG_PATH};
use folio_cli::pipeline::{DocumentProcessor, ProcessOptions, find_pdfs, preview};
use folio_cli::logging;
use folio_pdf_process::blank_jpeg;
use folio_vision::{ImageAnalyzer, OpenAiVision, probe_api_key};
use tracing::{error, info};

/// Side length of the probe image sent by `check-key`.
const PROBE_IMAGE_SIZE: u32 = 16;

/// Strategy tokens accepted by `folio chunk`.
const CHUNK_MODES: [&str; 4] = ["fixed", "sentence", "paragraph", "table"];

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Turn PDFs into chunked text with a vision model")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Chunk a text file with one strategy.
    Chunk {
        /// Text file to chunk.
        input: PathBuf,
        /// Strategy: fixed, sentence, paragraph or table.
        #[arg(value_parser = CHUNK_MODES)]
        mode: String,
        /// Output file; `.csv` selects CSV, anything else JSON. Without it the
        /// chunks are printed as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Fail on surplus code-block placeholders and keep a table that
        /// runs to the end of the text.
        #[arg(long)]
        strict: bool,
    },
    /// Render, describe, chunk and save PDFs.
    Process {
        /// PDF to process; repeatable. Defaults to every PDF in `pdf.input_dir`.
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
        /// Skip the API key probe before processing.
        #[arg(long)]
        skip_key_check: bool,
    },
    /// Verify the configured API key with a tiny request.
    CheckKey,
}

impl Command {
    /// Whether the command appends to the daily log file. `chunk` logs to
    /// the console only, so it leaves no files behind besides its output.
    const fn writes_log_file(&self) -> bool {
        !matches!(self, Self::Chunk { .. })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    if let Some(log_path) = logging::init(&config.logging, cli.command.writes_log_file())? {
        info!(log = %log_path.display(), "logging initialised");
    }

    match cli.command {
        Command::Chunk {
            input,
            mode,
            output,
            strict,
        } => run_chunk(&config, &input, &mode, output, strict, &mut io::stdout().lock()),
        Command::Process {
            files,
            skip_key_check,
        } => run_process(&config, files, skip_key_check).await,
        Command::CheckKey => run_check_key(&config).await,
    }
}

/// The `chunk` command works without a config file; the others require one.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let optional = matches!(cli.command, Command::Chunk { .. });
    if optional && !cli.config.exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))
}

fn run_chunk(
    config: &AppConfig,
    input: &Path,
    mode: &str,
    output: Option<PathBuf>,
    strict: bool,
    out: &mut impl Write,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let mut chunking = config.chunking.clone();
    if strict {
        chunking.policy = Policy::Strict;
    }
    let mut chunker = TextChunker::from_config(&chunking)?;
    let kind = chunker.select(mode)?;
    let chunks = chunker.chunk(&text)?;

    match output {
        Some(path) => {
            save_chunks(&chunks, &path, SaveFormat::from_path(&path))?;
            info!(
                strategy = %kind,
                chunks = chunks.len(),
                path = %path.display(),
                "chunks saved"
            );
            writeln!(out, "{}", preview(&chunks))?;
        }
        None => writeln!(out, "{}", SaveFormat::Json.render(&chunks)?)?,
    }
    Ok(())
}

fn build_model(config: &AppConfig) -> Result<OpenAiVision> {
    let vision = config.vision_config()?;
    Ok(OpenAiVision::new(vision)?)
}

async fn check_key(model: &OpenAiVision) -> Result<bool> {
    let probe = blank_jpeg(PROBE_IMAGE_SIZE, PROBE_IMAGE_SIZE)
        .context("failed to encode probe image")?;
    Ok(probe_api_key(model, &probe).await)
}

async fn run_check_key(config: &AppConfig) -> Result<()> {
    let model = build_model(config)?;
    if check_key(&model).await? {
        println!("API key is valid");
        Ok(())
    } else {
        bail!("API key is invalid; check the model section of the configuration")
    }
}

async fn run_process(config: &AppConfig, files: Vec<PathBuf>, skip_key_check: bool) -> Result<()> {
    let model = build_model(config)?;
    if !skip_key_check && !check_key(&model).await? {
        bail!("API key is invalid; check the model section of the configuration");
    }

    let files = if files.is_empty() {
        find_pdfs(&config.pdf.input_dir)?
    } else {
        files
    };
    if files.is_empty() {
        info!(dir = %config.pdf.input_dir.display(), "no PDF files to process");
        return Ok(());
    }

    let analyzer = ImageAnalyzer::new(model, config.image_cache())
        .with_concurrency(config.model.concurrency);
    let chunker = TextChunker::from_config(&config.chunking)?;
    let options = ProcessOptions::from_config(config)?;
    let mut processor = DocumentProcessor::new(analyzer, chunker, options);

    let total = files.len();
    let mut failed = 0_usize;
    for (done, pdf) in files.iter().enumerate() {
        match processor.process_document(pdf).await {
            Ok(output) => info!(
                done = done + 1,
                total,
                chunks = output.chunks.len(),
                path = %output.chunks_path.display(),
                "document processed"
            ),
            Err(err) => {
                failed += 1;
                error!(
                    path = %pdf.display(),
                    error = %format!("{err:#}"),
                    "failed to process document"
                );
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} documents failed");
    }
    Ok(())
}
