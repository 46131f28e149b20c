use crate::core::checker::{self, Diagnostic};
use crate::core::lexer::{Lexer, SpannedToken};
use crate::core::parser::Parser;
use crate::core::scene_builder::SceneBuilder;
use crate::core::svg::{RenderSettings, SvgRenderer};
use crate::domain::ast::Playbook;
use crate::domain::ports::MarkupRenderer;
use crate::domain::scene::Scene;
use crate::utils::error::{PlaybookError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    #[default]
    Svg,
    /// Resolved scene as JSON
    Scene,
    /// Parsed playbook as JSON
    Ast,
}

impl EmitFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EmitFormat::Svg => "svg",
            EmitFormat::Scene | EmitFormat::Ast => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compilation {
    pub playbook: Playbook,
    pub scene: Scene,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    renderer: SvgRenderer,
    strict: bool,
}

impl Compiler {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            renderer: SvgRenderer::new(settings),
            strict: false,
        }
    }

    /// In strict mode any diagnostic fails the compilation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<SpannedToken>> {
        Lexer::new(source).tokenize()
    }

    pub fn parse(&self, source: &str) -> Result<Playbook> {
        let tokens = self.tokenize(source)?;
        tracing::debug!("Lexed {} tokens", tokens.len());
        Parser::new(tokens).parse()
    }

    pub fn compile(&self, source: &str) -> Result<Compilation> {
        let playbook = self.parse(source)?;

        let diagnostics = checker::check(&playbook);
        for diagnostic in &diagnostics {
            tracing::warn!("⚠️ {}", diagnostic);
        }
        if self.strict && !diagnostics.is_empty() {
            let message = diagnostics
                .iter()
                .map(|d| d.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PlaybookError::SemanticError { message });
        }

        let scene = SceneBuilder::build(&playbook);
        tracing::debug!(
            "Built scene with {} entities and {} interactions",
            scene.entities.len(),
            scene.interactions.len()
        );

        Ok(Compilation {
            playbook,
            scene,
            diagnostics,
        })
    }

    pub fn render(&self, source: &str) -> Result<String> {
        let compilation = self.compile(source)?;
        Ok(self.renderer.render_scene(&compilation.scene))
    }

    pub fn emit(&self, source: &str, format: EmitFormat) -> Result<(String, Compilation)> {
        let compilation = self.compile(source)?;
        let output = match format {
            EmitFormat::Svg => self.renderer.render_scene(&compilation.scene),
            EmitFormat::Scene => serde_json::to_string_pretty(&compilation.scene)?,
            EmitFormat::Ast => serde_json::to_string_pretty(&compilation.playbook)?,
        };
        Ok((output, compilation))
    }

    /// A renderer that produces `format` instead of always SVG.
    pub fn emitting(self, format: EmitFormat) -> FormatRenderer {
        FormatRenderer {
            compiler: self,
            format,
        }
    }
}

/// Binds a compiler to one output format, for callers that only see
/// [`MarkupRenderer`] such as a watch loop.
#[derive(Debug, Clone)]
pub struct FormatRenderer {
    compiler: Compiler,
    format: EmitFormat,
}

impl MarkupRenderer for FormatRenderer {
    fn render(&self, input: &str) -> Result<String> {
        self.compiler
            .emit(input, self.format)
            .map(|(output, _)| output)
    }
}

impl MarkupRenderer for Compiler {
    fn render(&self, input: &str) -> Result<String> {
        Compiler::render(self, input)
    }
}
