use crate::core::svg::RenderSettings;
use crate::utils::error::{PlaybookError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional `playbook.toml`. Every table and field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub canvas: CanvasConfig,
    pub court: CourtConfig,
    pub style: StyleConfig,
    pub compile: CompileConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    pub half_extent: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub court_stroke: String,
    pub move_color: String,
    pub pass_color: String,
    pub screen_color: String,
    pub ball_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    pub strict: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let defaults = RenderSettings::default();
        Self {
            width: defaults.width,
            height: defaults.height,
        }
    }
}

impl Default for CourtConfig {
    fn default() -> Self {
        let defaults = RenderSettings::default();
        Self {
            half_extent: defaults.half_extent,
            padding: defaults.padding,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        let defaults = RenderSettings::default();
        Self {
            court_stroke: defaults.court_stroke,
            move_color: defaults.move_color,
            pass_color: defaults.pass_color,
            screen_color: defaults.screen_color,
            ball_color: defaults.ball_color,
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PlaybookError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PlaybookError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("canvas.width", self.canvas.width, 1, 10_000)?;
        validation::validate_range("canvas.height", self.canvas.height, 1, 10_000)?;
        validation::validate_length("court.half_extent", self.court.half_extent, 1.0, 10_000.0)?;
        validation::validate_length("court.padding", self.court.padding, 0.0, 1_000.0)?;

        validation::validate_color("style.court_stroke", &self.style.court_stroke)?;
        validation::validate_color("style.move_color", &self.style.move_color)?;
        validation::validate_color("style.pass_color", &self.style.pass_color)?;
        validation::validate_color("style.screen_color", &self.style.screen_color)?;
        validation::validate_color("style.ball_color", &self.style.ball_color)?;

        Ok(())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.canvas.width,
            height: self.canvas.height,
            half_extent: self.court.half_extent,
            padding: self.court.padding,
            court_stroke: self.style.court_stroke.clone(),
            move_color: self.style.move_color.clone(),
            pass_color: self.style.pass_color.clone(),
            screen_color: self.style.screen_color.clone(),
            ball_color: self.style.ball_color.clone(),
        }
    }

    pub fn strict(&self) -> bool {
        self.compile.strict
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
