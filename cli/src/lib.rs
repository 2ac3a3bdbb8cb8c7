//! Command-line front end for folio.
//!
//! The `folio` binary turns PDFs into chunked text: every page is rendered,
//! described by a vision model, joined into one document, chunked and saved
//! as JSON or CSV. It can also chunk an existing text file directly.
//!
//! # Usage
//!
//! ```bash
//! # Process every PDF in pdf.input_dir
//! DASHSCOPE_API_KEY=xxx cargo run -p folio-cli -- process
//!
//! # Chunk a text file by paragraphs
//! cargo run -p folio-cli -- chunk notes.md paragraph -o notes_chunks.csv
//! ```

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{AppConfig, ConfigError};
pub use pipeline::{DocumentProcessor, ProcessOptions, ProcessOutput};
