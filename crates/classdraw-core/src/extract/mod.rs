//! Class structure extraction from C-family source text.
//!
//! This module turns the text of one source file into a [`StructuralModel`].
//! It is a heuristic, line-oriented scan rather than a parser: anything it
//! does not recognize is skipped, so it never fails.
//!
//! ## Algorithm Overview
//!
//! 1. Split the input into lines and classify each one with [`classify`]
//! 2. A class header appends a new class and makes it the current class;
//!    each base in its inheritance clause adds an inheritance edge
//! 3. Method and attribute lines attach to the current class
//! 4. An attribute whose type names a class seen earlier in the file adds a
//!    composition edge
//!
//! There is a single current-class slot and no brace tracking: a class
//! header always takes over attribution, even when it appears textually
//! inside another class. Statements inside inline bodies that happen to
//! have declaration shape (`return speed_;`) are recorded as members unless
//! [`ExtractorConfig::skip_statements`] is set.

mod line;

use crate::model::{Attribute, ClassDescriptor, Method, Relationship, StructuralModel};
use crate::observer::{ModelObserver, NullObserver};
use tracing::{debug, trace};

pub use line::{classify, LineShape};

/// Configuration for model extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    /// Drop member-shaped lines whose type is a statement keyword
    /// (`return`, `delete`, `throw`, ...). Off by default.
    pub skip_statements: bool,
}

impl ExtractorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether statement-shaped member lines are dropped
    pub fn skip_statements(mut self, skip: bool) -> Self {
        self.skip_statements = skip;
        self
    }
}

/// Recovers a [`StructuralModel`] from source text
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Creates an extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts the structural model from `source`
    pub fn extract(&self, source: &str) -> StructuralModel {
        self.extract_with(source, &mut NullObserver)
    }

    /// Extracts the structural model, reporting progress to `observer`
    pub fn extract_with(&self, source: &str, observer: &mut dyn ModelObserver) -> StructuralModel {
        let mut scan = Scan::new(observer);

        debug!("Starting extraction of {} bytes", source.len());

        for (index, raw) in source.lines().enumerate() {
            let line_number = index + 1;
            let mut shape = classify(raw, scan.current_name());
            if self.config.skip_statements && shape.is_statement() {
                shape = LineShape::Unrecognized;
            }

            match shape {
                LineShape::ClassHeader { name, bases } => {
                    trace!("Line {}: class {} with {} base(s)", line_number, name, bases.len());
                    scan.open_class(name, &bases);
                }
                LineShape::Method { return_type, name } => {
                    trace!("Line {}: method {} -> {}", line_number, name, return_type);
                    scan.add_method(name, return_type);
                }
                LineShape::Attribute { ty, name } => {
                    trace!("Line {}: attribute {}: {}", line_number, name, ty);
                    scan.add_attribute(name, ty);
                }
                shape if shape.is_skipped() => {
                    trace!("Line {}: skipped ({:?})", line_number, shape);
                }
                _ => {
                    scan.observer.line_ignored(line_number, raw.trim());
                }
            }
        }

        let model = scan.finish();
        debug!(
            "Extraction complete: {} classes, {} relationships",
            model.classes().len(),
            model.relationships().len()
        );
        model
    }
}

/// Accumulators for one extraction pass
struct Scan<'o> {
    classes: Vec<ClassDescriptor>,
    relationships: Vec<Relationship>,
    /// Index into `classes` of the class receiving members
    current: Option<usize>,
    observer: &'o mut dyn ModelObserver,
}

impl<'o> Scan<'o> {
    fn new(observer: &'o mut dyn ModelObserver) -> Self {
        Self {
            classes: Vec::new(),
            relationships: Vec::new(),
            current: None,
            observer,
        }
    }

    fn current_name(&self) -> Option<&str> {
        self.current.map(|i| self.classes[i].name.as_str())
    }

    fn open_class(&mut self, name: &str, bases: &[&str]) {
        let mut class = ClassDescriptor::new(name);
        for base in bases {
            class.bases.push((*base).to_string());
            self.push_relationship(Relationship::inheritance(name, *base));
        }

        self.observer.class_opened(&class);
        self.classes.push(class);
        self.current = Some(self.classes.len() - 1);
    }

    fn add_method(&mut self, name: &str, return_type: &str) {
        let Some(index) = self.current else {
            return;
        };
        let method = Method::new(name, return_type);
        let class = &mut self.classes[index];
        self.observer.method_recorded(&class.name, &method);
        class.methods.push(method);
    }

    fn add_attribute(&mut self, name: &str, ty: &str) {
        let Some(index) = self.current else {
            return;
        };
        let attribute = Attribute::new(name, ty);
        let class = &mut self.classes[index];
        self.observer.attribute_recorded(&class.name, &attribute);
        class.attributes.push(attribute);

        if self.classes.iter().any(|known| known.name == ty) {
            let owner = self.classes[index].name.clone();
            self.push_relationship(Relationship::composition(owner, ty));
        }
    }

    fn push_relationship(&mut self, relationship: Relationship) {
        self.observer.relationship_recorded(&relationship);
        self.relationships.push(relationship);
    }

    fn finish(self) -> StructuralModel {
        StructuralModel::new(self.classes, self.relationships)
    }
}

/// Extracts the structural model from `source` with a default [`Extractor`]
pub fn extract(source: &str) -> StructuralModel {
    Extractor::new().extract(source)
}
