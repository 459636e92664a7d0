//! PlantUML diagram emission.
//!
//! [`DiagramEmitter`] serializes a [`StructuralModel`] into PlantUML text. A
//! class diagram ([`DiagramKind::Class`]) is laid out as:
//!
//! 1. `@startuml` (and an optional `title`)
//! 2. One `class` block per class, attributes first, then methods
//! 3. One edge line per relationship, in model order
//! 4. `@enduml`
//!
//! A component diagram ([`DiagramKind::Component`]) has one `component` line
//! per class in model order and no edges.
//!
//! Output is a pure function of the model and the [`EmitterConfig`].

mod syntax;

use crate::model::{ClassDescriptor, Relationship, RelationshipKind, StructuralModel};
use crate::observer::{ModelObserver, NullObserver};
use std::fmt::Write as FmtWrite;
use tracing::debug;

pub use syntax::{
    escape, CLASS_KEYWORD, COMPONENT_KEYWORD, COMPOSITION_ARROW, END_MARKER, INHERITANCE_ARROW,
    START_MARKER,
};

/// Kind of diagram to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramKind {
    /// Class blocks with members, plus relationship edges
    #[default]
    Class,
    /// One component per class
    Component,
}

impl DiagramKind {
    /// Returns the kind name
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Class => "class",
            DiagramKind::Component => "component",
        }
    }
}

/// Configuration for diagram emission
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Diagram kind (default: class)
    pub kind: DiagramKind,
    /// Indentation for class members (default: 2 spaces)
    pub indent_str: String,
    /// Optional diagram title
    pub title: Option<String>,
    /// Emit relationship edges
    pub include_relationships: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            kind: DiagramKind::Class,
            indent_str: "  ".to_string(),
            title: None,
            include_relationships: true,
        }
    }
}

impl EmitterConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diagram kind
    pub fn kind(mut self, kind: DiagramKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets the diagram title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets whether relationship edges are emitted
    pub fn include_relationships(mut self, include: bool) -> Self {
        self.include_relationships = include;
        self
    }
}

/// Writes a [`StructuralModel`] as a PlantUML class diagram
#[derive(Debug, Clone, Default)]
pub struct DiagramEmitter {
    config: EmitterConfig,
}

impl DiagramEmitter {
    /// Creates an emitter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter with custom configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Emits the diagram text for `model`
    pub fn emit(&self, model: &StructuralModel) -> String {
        self.emit_with(model, &mut NullObserver)
    }

    /// Emits the diagram text, reporting completion to `observer`
    pub fn emit_with(&self, model: &StructuralModel, observer: &mut dyn ModelObserver) -> String {
        let mut output = String::new();
        self.write_to(model, &mut output)
            .expect("String write cannot fail");

        debug!(
            "Emitted {} diagram: {} class(es), {} edge(s), {} bytes",
            self.config.kind.as_str(),
            model.classes().len(),
            if self.draws_edges() {
                model.relationships().len()
            } else {
                0
            },
            output.len()
        );
        observer.diagram_emitted(model, &output);
        output
    }

    /// Writes the diagram text for `model` to `w`
    pub fn write_to(&self, model: &StructuralModel, w: &mut impl FmtWrite) -> std::fmt::Result {
        writeln!(w, "{}", START_MARKER)?;
        if let Some(title) = &self.config.title {
            writeln!(w, "title {}", title)?;
        }

        for class in model.classes() {
            match self.config.kind {
                DiagramKind::Class => self.write_class(w, class)?,
                DiagramKind::Component => {
                    writeln!(w, "{} {}", COMPONENT_KEYWORD, escape(&class.name))?
                }
            }
        }

        if self.draws_edges() {
            for relationship in model.relationships() {
                write_edge(w, relationship)?;
            }
        }

        writeln!(w, "{}", END_MARKER)
    }

    fn draws_edges(&self) -> bool {
        self.config.kind == DiagramKind::Class && self.config.include_relationships
    }

    fn write_class(&self, w: &mut impl FmtWrite, class: &ClassDescriptor) -> std::fmt::Result {
        writeln!(w, "{} {} {{", CLASS_KEYWORD, escape(&class.name))?;

        for attribute in &class.attributes {
            writeln!(
                w,
                "{}{} {}",
                self.config.indent_str,
                escape(&attribute.ty),
                escape(&attribute.name)
            )?;
        }

        for method in &class.methods {
            writeln!(
                w,
                "{}{} {}()",
                self.config.indent_str,
                escape(&method.return_type),
                escape(&method.name)
            )?;
        }

        writeln!(w, "}}")?;
        writeln!(w)
    }
}

fn write_edge(w: &mut impl FmtWrite, relationship: &Relationship) -> std::fmt::Result {
    let arrow = match relationship.kind {
        RelationshipKind::Inheritance => INHERITANCE_ARROW,
        RelationshipKind::Composition => COMPOSITION_ARROW,
    };
    writeln!(
        w,
        "{} {} {}",
        escape(&relationship.from),
        arrow,
        escape(&relationship.to)
    )
}

/// Emits the diagram text for `model` with a default [`DiagramEmitter`]
pub fn emit(model: &StructuralModel) -> String {
    DiagramEmitter::new().emit(model)
}
