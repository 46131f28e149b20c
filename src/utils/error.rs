use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybookError {
    #[error("Lex error at {line}:{column}: {message}")]
    LexError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Parse error at {line}:{column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Semantic error: {message}")]
    SemanticError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Output error: {message}")]
    OutputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Semantic,
    Io,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlaybookError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LexError { .. } | Self::ParseError { .. } => ErrorCategory::Syntax,
            Self::SemanticError { .. } => ErrorCategory::Semantic,
            Self::IoError(_) => ErrorCategory::Io,
            Self::SerializationError(_) | Self::OutputError { .. } => ErrorCategory::Output,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Source errors are fixable by editing the playbook and re-running, so
    /// they rank below environment failures.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Semantic => ErrorSeverity::Medium,
            ErrorCategory::Syntax | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::LexError { .. } => "Remove the unexpected character at the reported position",
            Self::ParseError { .. } => {
                "Check the section syntax near the reported position, e.g. `players = { p1, p2 }`"
            }
            Self::SemanticError { .. } => {
                "Declare every referenced player in `players`, or run without --strict"
            }
            Self::IoError(_) => "Make sure the input file exists and the output directory is writable",
            Self::SerializationError(_) => "Try a different --emit format",
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Make sure the config file exists and is valid TOML"
            }
            Self::InvalidConfigValueError { .. } => "Fix the reported value in the config file or flags",
            Self::MissingConfigError { .. } => "Add the missing setting to the config file",
            Self::OutputError { .. } => "Check that the output target is still available",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::LexError { .. } | Self::ParseError { .. } => format!("Compile Error:\n{}", self),
            Self::SemanticError { message } => format!("Playbook check failed: {}", message),
            Self::IoError(e) => format!("Could not access a file: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaybookError>;
