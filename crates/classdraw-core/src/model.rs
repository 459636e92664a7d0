//! Structural model recovered from a single source file.
//!
//! A [`StructuralModel`] is the pair of ordered class descriptors and ordered
//! relationships produced by one extraction pass. Once built it is read-only:
//! the extractor is the only code that assembles one from scratch, and callers
//! see it through accessors.

use std::fmt;

/// A method recovered from a class body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Method identifier
    pub name: String,
    /// Return type text as written, scope qualifiers included
    pub return_type: String,
}

impl Method {
    /// Creates a new method entry
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
        }
    }
}

/// An attribute (data member) recovered from a class body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute identifier
    pub name: String,
    /// Declared type text as written
    pub ty: String,
}

impl Attribute {
    /// Creates a new attribute entry
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// One recovered class-like unit and its members
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassDescriptor {
    /// Class identifier, never empty
    pub name: String,
    /// Methods in textual order
    pub methods: Vec<Method>,
    /// Attributes in textual order
    pub attributes: Vec<Attribute>,
    /// Base class names in the order written, access specifiers stripped
    pub bases: Vec<String>,
}

impl ClassDescriptor {
    /// Creates an empty descriptor for the named class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a base class name
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Adds a method
    pub fn with_method(mut self, name: impl Into<String>, return_type: impl Into<String>) -> Self {
        self.methods.push(Method::new(name, return_type));
        self
    }

    /// Adds an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, ty));
        self
    }

    /// Returns true if the class has neither methods nor attributes
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.attributes.is_empty()
    }
}

/// Kind of a directed edge between two classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// `to` is a base class of `from`
    Inheritance,
    /// `from` owns an attribute of type `to`
    Composition,
}

impl RelationshipKind {
    /// Returns the lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Inheritance => "inheritance",
            RelationshipKind::Composition => "composition",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed edge between two class names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// Source class
    pub from: String,
    /// Target class (may be unknown to the model for inheritance)
    pub to: String,
    /// Edge kind
    pub kind: RelationshipKind,
}

impl Relationship {
    /// Creates an inheritance edge: `to` is a base of `from`
    pub fn inheritance(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: RelationshipKind::Inheritance,
        }
    }

    /// Creates a composition edge: `from` contains `to`
    pub fn composition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: RelationshipKind::Composition,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.kind)
    }
}

/// Classes and relationships recovered from one file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuralModel {
    classes: Vec<ClassDescriptor>,
    relationships: Vec<Relationship>,
}

impl StructuralModel {
    /// Creates a model from already-ordered parts
    pub fn new(classes: Vec<ClassDescriptor>, relationships: Vec<Relationship>) -> Self {
        Self {
            classes,
            relationships,
        }
    }

    /// Classes in order of appearance
    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// Relationships in the order they were discovered
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// First class with the given name
    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Returns true if no class was recovered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.relationships.is_empty()
    }

    /// Splits the model into its classes and relationships
    pub fn into_parts(self) -> (Vec<ClassDescriptor>, Vec<Relationship>) {
        (self.classes, self.relationships)
    }
}
