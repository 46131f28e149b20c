pub mod checker;
pub mod compiler;
pub mod engine;
pub mod lexer;
pub mod parser;
pub mod scene_builder;
pub mod svg;
pub mod trigger;

pub use crate::domain::ast::Playbook;
pub use crate::domain::ports::{InputSource, MarkupRenderer, OutputSink, Storage};
pub use crate::domain::scene::Scene;
pub use crate::utils::error::Result;
