// Domain layer: playbook syntax tree, render scene and the ports the engine talks through.

pub mod ast;
pub mod ports;
pub mod scene;
