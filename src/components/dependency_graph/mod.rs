//! Dependency graph explorer: load, isolate, search and draw.

mod component;
pub mod controller;
pub mod draw_set;
pub mod error;
pub mod graph;
pub mod isolate;
mod loader;
pub mod render;
pub mod state;
pub mod types;

pub use component::DependencyGraphCanvas;
pub use error::GraphError;
pub use graph::Graph;
pub use loader::load_graph;
