use crate::config::toml_config::TomlConfig;
use crate::core::compiler::EmitFormat;
use crate::core::Storage;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "playbook")]
#[command(author, version, about = "Convert playbook-lang files to SVG", long_about = None)]
pub struct CliConfig {
    /// Input .playbook file
    pub input: PathBuf,

    /// Output file (defaults to the input path with .svg or .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file with canvas, court and style settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// What to write
    #[arg(long, value_enum, default_value_t = EmitFormat::Svg)]
    pub emit: EmitFormat,

    /// Override canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Override canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Treat playbook warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Re-render whenever the input file changes
    #[arg(long)]
    pub watch: bool,

    /// Polling interval for --watch, in milliseconds
    #[arg(long, default_value = "500")]
    pub poll_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the config file if one was given and applies flag overrides on top.
    pub fn resolve_settings(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
        if self.strict {
            config.compile.strict = true;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        if let Some(config) = &self.config {
            validation::validate_extension("config", config, "toml")?;
        }
        if self.watch {
            validation::validate_at_least("poll_ms", self.poll_ms, 50)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
