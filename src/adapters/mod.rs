// Adapters layer: concrete input sources and output sinks for the render trigger.

pub mod file;

pub use file::{FileInput, FileOutput, ModifiedWatcher};
