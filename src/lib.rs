pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LocalStorage};

pub use adapters::{FileInput, FileOutput, ModifiedWatcher};
pub use config::TomlConfig;
pub use crate::core::{
    compiler::{Compiler, EmitFormat, FormatRenderer},
    engine::{ConversionEngine, ConversionReport, ConversionRequest},
    svg::RenderSettings,
    trigger::{RenderOutcome, RenderTrigger},
};
pub use utils::error::{PlaybookError, Result};
