//! YAML configuration for the `folio` binary.
//!
//! ```yaml
//! model:
//!   name: qwen-vl-max
//!   api_key: DASHSCOPE_API_KEY   # name of the environment variable
//!   base_url: https://dashscope.aliyuncs.com/compatible-mode/v1
//! pdf:
//!   input_dir: input
//!   output_dir: output
//!   default_prompt: prompt
//!   chunk_strategy: fixed
//!   save_format: json
//! chunking:
//!   chunk_size: 500
//!   overlap: 50
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use folio_chunking::{ChunkingConfig, SaveFormat};
use folio_pdf_process::PdfRenderOptions;
use folio_vision::{ImageCache, VisionConfig};
use serde::Deserialize;
use thiserror::Error;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid YAML for [`AppConfig`].
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `model.name` is empty.
    #[error("model name must not be empty")]
    EmptyModelName,

    /// The environment variable named by `model.api_key` is unset or empty.
    #[error("set the {0} environment variable to your API key")]
    MissingApiKey(String),

    /// `model.base_url` is empty.
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,

    /// No prompt file was found under any searched location.
    #[error("prompt `{name}` not found (searched {searched:?})")]
    PromptNotFound {
        /// Prompt stem.
        name: String,
        /// Paths tried, in order.
        searched: Vec<PathBuf>,
    },
}

/// Whole-application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Vision model settings.
    pub model: ModelSection,
    /// Document processing settings.
    pub pdf: PdfSection,
    /// Chunking tunables.
    pub chunking: ChunkingConfig,
    /// Log output settings.
    pub logging: LoggingSection,
    /// Directory prompt files are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// `model:` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Model identifier.
    pub name: String,
    /// Name of the environment variable holding the API key.
    pub api_key: String,
    /// OpenAI-compatible base URL.
    pub base_url: String,
    /// Maximum cached image descriptions.
    pub image_cache_size: usize,
    /// Cache file location.
    pub cache_path: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Pages analyzed concurrently.
    pub concurrency: usize,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: String::new(),
            api_key: String::new(),
            base_url: String::new(),
            image_cache_size: 100,
            cache_path: PathBuf::from("cache/image_cache.json"),
            timeout_secs: 300,
            concurrency: 4,
        }
    }
}

/// `pdf:` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PdfSection {
    /// Directory scanned for `*.pdf` files.
    pub input_dir: PathBuf,
    /// Directory receiving extracted text and chunk files. Outputs go next
    /// to each PDF when unset.
    pub output_dir: Option<PathBuf>,
    /// Prompt file stem. The built-in prompt is used when unset.
    pub default_prompt: Option<String>,
    /// Strategy token passed to the chunker.
    pub chunk_strategy: String,
    /// `json` or `csv`.
    pub save_format: String,
    /// Overwrite an existing chunk file instead of numbering a new one.
    pub overwrite_output: bool,
    /// Render resolution.
    pub dpi: u16,
    /// Explicit pdfium library location.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for PdfSection {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: Some(PathBuf::from("output")),
            default_prompt: None,
            chunk_strategy: "fixed".to_string(),
            save_format: "json".to_string(),
            overwrite_output: true,
            dpi: 200,
            pdfium_library_path: None,
        }
    }
}

/// `logging:` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Directory for daily log files.
    pub dir: PathBuf,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for a missing file and
    /// [`ConfigError::Parse`] for malformed YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_yaml(&text, base_dir)
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML.
    pub fn from_yaml(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(text)?;
        config.base_dir = base_dir.into();
        Ok(config)
    }

    /// Validates the model section and resolves the API key from the environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::vision_config_with`].
    pub fn vision_config(&self) -> Result<VisionConfig, ConfigError> {
        self.vision_config_with(|name| std::env::var(name).ok())
    }

    /// Like [`AppConfig::vision_config`] with a custom variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyModelName`], [`ConfigError::MissingApiKey`]
    /// or [`ConfigError::EmptyBaseUrl`].
    pub fn vision_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<VisionConfig, ConfigError> {
        let model = &self.model;
        if model.name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName);
        }
        let api_key = lookup(&model.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(model.api_key.clone()))?;
        if model.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        Ok(
            VisionConfig::new(&model.name, api_key, &model.base_url)
                .with_timeout(Duration::from_secs(model.timeout_secs)),
        )
    }

    /// Opens the image cache described by the model section.
    #[must_use]
    pub fn image_cache(&self) -> ImageCache {
        ImageCache::load(&self.model.cache_path, self.model.image_cache_size)
    }

    /// Render options derived from the pdf section.
    #[must_use]
    pub fn render_options(&self) -> PdfRenderOptions {
        let options = PdfRenderOptions::default().with_dpi(self.pdf.dpi);
        match &self.pdf.pdfium_library_path {
            Some(path) => options.with_pdfium_library_path(path),
            None => options,
        }
    }

    /// Chunk file format.
    #[must_use]
    pub fn save_format(&self) -> SaveFormat {
        SaveFormat::from_token(&self.pdf.save_format)
    }

    /// Loads the configured prompt, or `None` when no prompt is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PromptNotFound`] if the prompt file is missing.
    pub fn prompt(&self) -> Result<Option<String>, ConfigError> {
        self.pdf
            .default_prompt
            .as_deref()
            .map(|name| load_prompt(&self.base_dir, name))
            .transpose()
    }
}

/// Reads `<name>.txt` from `base_dir`, falling back to `base_dir/prompts/`.
///
/// # Errors
///
/// Returns [`ConfigError::PromptNotFound`] if neither file can be read.
pub fn load_prompt(base_dir: &Path, name: &str) -> Result<String, ConfigError> {
    let file = format!("{name}.txt");
    let searched = vec![base_dir.join(&file), base_dir.join("prompts").join(&file)];

    for path in &searched {
        if let Ok(text) = std::fs::read_to_string(path) {
            return Ok(text);
        }
    }
    Err(ConfigError::PromptNotFound {
        name: name.to_string(),
        searched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_chunking::Policy;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
model:
  name: qwen-vl-max
  api_key: FOLIO_TEST_KEY
  base_url: https://example.com/v1
  image_cache_size: 20
pdf:
  input_dir: pdfs
  output_dir: out
  default_prompt: prompt
  chunk_strategy: paragraph
  save_format: csv
  overwrite_output: false
chunking:
  chunk_size: 300
  terminator: "。"
  policy: strict
logging:
  level: debug
"#;

    fn lookup(name: &str) -> Option<String> {
        (name == "FOLIO_TEST_KEY").then(|| "sk-test".to_string())
    }

    #[test]
    fn parses_all_sections() {
        let config = AppConfig::from_yaml(SAMPLE, ".").unwrap();
        assert_eq!(config.model.name, "qwen-vl-max");
        assert_eq!(config.model.image_cache_size, 20);
        assert_eq!(config.model.timeout_secs, 300);
        assert_eq!(config.pdf.input_dir, PathBuf::from("pdfs"));
        assert_eq!(config.pdf.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.pdf.chunk_strategy, "paragraph");
        assert!(!config.pdf.overwrite_output);
        assert_eq!(config.save_format(), SaveFormat::Csv);
        assert_eq!(config.chunking.chunk_size, 300);
        assert_eq!(config.chunking.overlap, 50);
        assert_eq!(config.chunking.terminator, '。');
        assert_eq!(config.chunking.policy, Policy::Strict);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_yaml("{}", ".").unwrap();
        assert_eq!(config.pdf.chunk_strategy, "fixed");
        assert_eq!(config.save_format(), SaveFormat::Json);
        assert_eq!(config.render_options().dpi, 200);
        assert_eq!(config.prompt().unwrap(), None);
    }

    #[test]
    fn resolves_vision_config() {
        let config = AppConfig::from_yaml(SAMPLE, ".").unwrap();
        let vision = config.vision_config_with(lookup).unwrap();
        assert_eq!(vision.model, "qwen-vl-max");
        assert_eq!(vision.api_key, "sk-test");
        assert_eq!(vision.timeout, Duration::from_secs(300));
    }

    #[test]
    fn validation_errors() {
        let mut config = AppConfig::from_yaml(SAMPLE, ".").unwrap();
        config.model.base_url.clear();
        assert!(matches!(
            config.vision_config_with(lookup),
            Err(ConfigError::EmptyBaseUrl)
        ));

        config.model.api_key = "FOLIO_UNSET_KEY".into();
        match config.vision_config_with(lookup) {
            Err(ConfigError::MissingApiKey(name)) => assert_eq!(name, "FOLIO_UNSET_KEY"),
            other => panic!("expected MissingApiKey, got {other:?}"),
        }

        config.model.name = "  ".into();
        assert!(matches!(
            config.vision_config_with(lookup),
            Err(ConfigError::EmptyModelName)
        ));
    }

    #[test]
    fn missing_file_and_bad_yaml() {
        let dir = tempdir().unwrap();
        let missing = AppConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::NotFound(_)));

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "model: [unclosed").unwrap();
        assert!(matches!(
            AppConfig::load(&bad).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn prompt_lookup_order() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("prompts")).unwrap();
        std::fs::write(dir.path().join("prompts").join("prompt.txt"), "from prompts").unwrap();
        assert_eq!(load_prompt(dir.path(), "prompt").unwrap(), "from prompts");

        std::fs::write(dir.path().join("prompt.txt"), "beside config").unwrap();
        assert_eq!(load_prompt(dir.path(), "prompt").unwrap(), "beside config");

        let err = load_prompt(dir.path(), "absent").unwrap_err();
        match err {
            ConfigError::PromptNotFound { name, searched } => {
                assert_eq!(name, "absent");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn load_resolves_prompt_against_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        std::fs::write(dir.path().join("prompt.txt"), "Read the page.").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.base_dir, dir.path());
        assert_eq!(config.prompt().unwrap().as_deref(), Some("Read the page."));
    }
}
