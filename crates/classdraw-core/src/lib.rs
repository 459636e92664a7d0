//! # classdraw-core
//!
//! A library for recovering class structure from C-family source files and
//! describing it as a PlantUML class diagram.
//!
//! This crate provides the core functionality for:
//! - Classifying source lines into structural roles (class header,
//!   constructor, method, attribute)
//! - Building a [`StructuralModel`] of classes, members, and inheritance and
//!   composition relationships
//! - Emitting that model as deterministic PlantUML text, either as a class
//!   diagram or a component diagram
//! - Summarizing the model as plain text with counts and design pattern hints
//!
//! ## Architecture
//!
//! - [`extract`](mod@extract): line classification and model extraction
//! - [`emit`](mod@emit): PlantUML serialization
//! - [`model`]: the structural model types
//! - [`summary`]: text summaries of a model
//! - [`observer`]: progress hooks shared by both stages
//!
//! Neither stage touches the filesystem or spawns processes; reading sources,
//! writing `.puml` files, and running the renderer belong to the caller.
//!
//! ## Example
//!
//! ```
//! use classdraw_core::{emit, extract};
//!
//! let source = "\
//! class Engine {
//! };
//! class Car : public Vehicle {
//!   Engine engine;
//!   int getSpeed();
//! };";
//!
//! let model = extract(source);
//! assert_eq!(model.classes().len(), 2);
//!
//! let diagram = emit(&model);
//! assert!(diagram.contains("Car --|> Vehicle"));
//! assert!(diagram.contains("Car *-- Engine"));
//! ```
//!
//! ## Extensibility
//!
//! - [`ModelObserver`]: receive progress events from extraction and emission
//! - [`ExtractorConfig`]: drop statement-shaped member lines
//! - [`EmitterConfig`]: choose the diagram kind and adjust indentation, title,
//!   and edge output
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod emit;
pub mod extract;
pub mod model;
pub mod observer;
pub mod summary;

// Re-export primary types for convenience
pub use emit::{emit, DiagramEmitter, DiagramKind, EmitterConfig};
pub use extract::{classify, extract, Extractor, ExtractorConfig, LineShape};
pub use model::{
    Attribute, ClassDescriptor, Method, Relationship, RelationshipKind, StructuralModel,
};
pub use observer::{ModelObserver, NullObserver, StatsObserver};
pub use summary::{summarize, ClassSummary, CodebaseSummary, DesignPattern, DetailLevel};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
