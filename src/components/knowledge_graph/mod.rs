mod builder;
mod component;
mod config;
mod error;
mod export;
mod filter;
mod layout;
mod render;
mod simulation;
mod state;
mod types;

pub use builder::GraphBuilder;
pub use component::{KnowledgeGraphCanvas, fresh_seed};
pub use export::{EXPORT_FILE_NAME, download_json};
pub use filter::{CategoryFilter, GraphFilter};
pub use layout::LayoutStrategy;
pub use types::{Document, KnowledgeGraph, NodeCategory};
