//! Progress reporting hooks for extraction and emission.
//!
//! This module provides the [`ModelObserver`] trait. Observers receive events
//! as the extractor and emitter make progress; they only watch, nothing they
//! do can change the model or the emitted text.

use crate::model::{
    Attribute, ClassDescriptor, Method, Relationship, RelationshipKind, StructuralModel,
};

/// Receives progress events from the extractor and the emitter.
///
/// Every method has a no-op default, so implementors only override the
/// events they care about.
///
/// # Example
///
/// ```
/// use classdraw_core::{ClassDescriptor, Extractor, ModelObserver};
///
/// #[derive(Default)]
/// struct ClassNames(Vec<String>);
///
/// impl ModelObserver for ClassNames {
///     fn class_opened(&mut self, class: &ClassDescriptor) {
///         self.0.push(class.name.clone());
///     }
/// }
///
/// let mut names = ClassNames::default();
/// Extractor::new().extract_with("class A {};\nclass B : public A {};", &mut names);
/// assert_eq!(names.0, vec!["A", "B"]);
/// ```
pub trait ModelObserver {
    /// A class header opened a new descriptor (bases already filled in)
    fn class_opened(&mut self, class: &ClassDescriptor) {
        let _ = class;
    }

    /// A method was attached to `class`
    fn method_recorded(&mut self, class: &str, method: &Method) {
        let _ = (class, method);
    }

    /// An attribute was attached to `class`
    fn attribute_recorded(&mut self, class: &str, attribute: &Attribute) {
        let _ = (class, attribute);
    }

    /// A relationship was appended
    fn relationship_recorded(&mut self, relationship: &Relationship) {
        let _ = relationship;
    }

    /// A non-blank line matched no rule and was skipped (1-based line number)
    fn line_ignored(&mut self, line_number: usize, line: &str) {
        let _ = (line_number, line);
    }

    /// The emitter finished writing the diagram text for `model`
    fn diagram_emitted(&mut self, model: &StructuralModel, text: &str) {
        let _ = (model, text);
    }
}

/// An observer that ignores every event
pub struct NullObserver;

impl ModelObserver for NullObserver {}

/// An observer that counts what was recovered and emitted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatsObserver {
    /// Number of class headers seen
    pub class_count: usize,
    /// Number of methods recorded
    pub method_count: usize,
    /// Number of attributes recorded
    pub attribute_count: usize,
    /// Number of inheritance edges
    pub inheritance_count: usize,
    /// Number of composition edges
    pub composition_count: usize,
    /// Number of non-blank lines no rule matched
    pub ignored_lines: usize,
    /// Total bytes of diagram text emitted
    pub emitted_bytes: usize,
}

impl StatsObserver {
    /// Total number of relationships recorded
    pub fn relationship_count(&self) -> usize {
        self.inheritance_count + self.composition_count
    }
}

impl ModelObserver for StatsObserver {
    fn class_opened(&mut self, _class: &ClassDescriptor) {
        self.class_count += 1;
    }

    fn method_recorded(&mut self, _class: &str, _method: &Method) {
        self.method_count += 1;
    }

    fn attribute_recorded(&mut self, _class: &str, _attribute: &Attribute) {
        self.attribute_count += 1;
    }

    fn relationship_recorded(&mut self, relationship: &Relationship) {
        match relationship.kind {
            RelationshipKind::Inheritance => self.inheritance_count += 1,
            RelationshipKind::Composition => self.composition_count += 1,
        }
    }

    fn line_ignored(&mut self, _line_number: usize, _line: &str) {
        self.ignored_lines += 1;
    }

    fn diagram_emitted(&mut self, _model: &StructuralModel, text: &str) {
        self.emitted_bytes += text.len();
    }
}
