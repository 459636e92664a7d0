//! Plain-text analysis summary of a [`StructuralModel`].
//!
//! [`summarize`] collects counts, per-class member totals, base lists, and
//! design pattern hints. [`CodebaseSummary::render`] writes them as text at
//! one of three [`DetailLevel`]s:
//!
//! 1. Purpose: one sentence with the class count and member averages
//! 2. Metrics and a per-class listing
//! 3. Design pattern hints
//!
//! Pattern hints are guesses from names alone, since the model carries no
//! bodies or specifiers.

use crate::model::{ClassDescriptor, RelationshipKind, StructuralModel};
use std::fmt::{self, Write as FmtWrite};

/// How much of a summary to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DetailLevel {
    /// Purpose sentence only
    Purpose,
    /// Purpose, metrics, and classes
    #[default]
    Metrics,
    /// Everything, including design pattern hints
    Patterns,
}

impl DetailLevel {
    /// Maps a numeric level to a detail level, clamping to `1..=3`
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => DetailLevel::Purpose,
            2 => DetailLevel::Metrics,
            _ => DetailLevel::Patterns,
        }
    }

    /// Numeric form of the level
    pub fn as_level(self) -> u8 {
        match self {
            DetailLevel::Purpose => 1,
            DetailLevel::Metrics => 2,
            DetailLevel::Patterns => 3,
        }
    }
}

/// A design pattern suggested by class and method names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignPattern {
    /// Has a `getInstance` method
    Singleton,
    /// Class name contains `Factory`
    Factory,
    /// Has `attach`, `detach`, and `notify` methods
    Observer,
}

impl DesignPattern {
    /// Returns the pattern name
    pub fn as_str(self) -> &'static str {
        match self {
            DesignPattern::Singleton => "Singleton",
            DesignPattern::Factory => "Factory",
            DesignPattern::Observer => "Observer",
        }
    }

    /// Returns the patterns suggested by `class`, in declaration order of
    /// the variants
    pub fn detect(class: &ClassDescriptor) -> Vec<DesignPattern> {
        let has_method = |name: &str| class.methods.iter().any(|m| m.name == name);
        let mut patterns = Vec::new();

        if has_method("getInstance") {
            patterns.push(DesignPattern::Singleton);
        }
        if class.name.contains("Factory") {
            patterns.push(DesignPattern::Factory);
        }
        if has_method("attach") && has_method("detach") && has_method("notify") {
            patterns.push(DesignPattern::Observer);
        }
        patterns
    }
}

impl fmt::Display for DesignPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    /// Class identifier
    pub name: String,
    /// Base class names in written order
    pub bases: Vec<String>,
    /// Number of recorded methods
    pub method_count: usize,
    /// Number of recorded attributes
    pub attribute_count: usize,
    /// Design pattern hints
    pub patterns: Vec<DesignPattern>,
}

impl ClassSummary {
    fn new(class: &ClassDescriptor) -> Self {
        Self {
            name: class.name.clone(),
            bases: class.bases.clone(),
            method_count: class.methods.len(),
            attribute_count: class.attributes.len(),
            patterns: DesignPattern::detect(class),
        }
    }

    /// One-sentence description of the class
    pub fn purpose(&self) -> String {
        let mut purpose = format!("The {} class ", self.name);
        if !self.bases.is_empty() {
            purpose.push_str("inherits from ");
            purpose.push_str(&self.bases.join(", "));
            purpose.push(' ');
        }
        purpose.push_str(&format!(
            "with {} methods and {} attributes.",
            self.method_count, self.attribute_count
        ));
        purpose
    }
}

/// Summary of a whole model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodebaseSummary {
    /// Per-class summaries in model order
    pub classes: Vec<ClassSummary>,
    /// Total methods across all classes
    pub method_count: usize,
    /// Total attributes across all classes
    pub attribute_count: usize,
    /// Number of inheritance edges
    pub inheritance_count: usize,
    /// Number of composition edges
    pub composition_count: usize,
}

impl CodebaseSummary {
    /// Number of classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Mean methods per class, zero for an empty model
    pub fn average_methods(&self) -> f64 {
        average(self.method_count, self.class_count())
    }

    /// Mean attributes per class, zero for an empty model
    pub fn average_attributes(&self) -> f64 {
        average(self.attribute_count, self.class_count())
    }

    /// Renders the summary as text
    pub fn render(&self, detail: DetailLevel) -> String {
        let mut output = String::new();
        self.write_to(detail, &mut output)
            .expect("String write cannot fail");
        output
    }

    /// Writes the summary text to `w`
    pub fn write_to(&self, detail: DetailLevel, w: &mut impl FmtWrite) -> fmt::Result {
        writeln!(w, "Purpose:")?;
        write!(w, "The codebase contains {} classes.", self.class_count())?;
        if !self.classes.is_empty() {
            write!(
                w,
                " The average class has {:.2} methods and {:.2} attributes.",
                self.average_methods(),
                self.average_attributes()
            )?;
        }
        writeln!(w)?;
        writeln!(w)?;

        if detail >= DetailLevel::Metrics {
            writeln!(w, "Metrics:")?;
            writeln!(w, "  Number of Classes: {}", self.class_count())?;
            writeln!(w, "  Number of Methods: {}", self.method_count)?;
            writeln!(w, "  Number of Attributes: {}", self.attribute_count)?;
            writeln!(w, "  Inheritance Relationships: {}", self.inheritance_count)?;
            writeln!(w, "  Composition Relationships: {}", self.composition_count)?;
            writeln!(w)?;

            if !self.classes.is_empty() {
                writeln!(w, "Classes:")?;
                for class in &self.classes {
                    writeln!(w, "  - {}", class.purpose())?;
                }
                writeln!(w)?;
            }
        }

        if detail >= DetailLevel::Patterns {
            let hinted: Vec<&ClassSummary> = self
                .classes
                .iter()
                .filter(|c| !c.patterns.is_empty())
                .collect();
            if !hinted.is_empty() {
                writeln!(w, "Design Patterns:")?;
                for class in hinted {
                    let names: Vec<&str> = class.patterns.iter().map(|p| p.as_str()).collect();
                    writeln!(w, "  - {}: {}", class.name, names.join(", "))?;
                }
                writeln!(w)?;
            }
        }

        Ok(())
    }
}

fn average(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Summarizes `model`
pub fn summarize(model: &StructuralModel) -> CodebaseSummary {
    let classes: Vec<ClassSummary> = model.classes().iter().map(ClassSummary::new).collect();
    let count_kind = |kind: RelationshipKind| {
        model
            .relationships()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    };

    CodebaseSummary {
        method_count: classes.iter().map(|c| c.method_count).sum(),
        attribute_count: classes.iter().map(|c| c.attribute_count).sum(),
        inheritance_count: count_kind(RelationshipKind::Inheritance),
        composition_count: count_kind(RelationshipKind::Composition),
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use pretty_assertions::assert_eq;

    const SUBJECTS: &str = "\
class Engine {
  int power;
};
class EventBus {
  void attach(Listener l);
  void detach(Listener l);
  void notify();
};
class WidgetFactory : public Factory {
  Widget create();
};
class Config {
  Config getInstance();
  Engine engine;
};";

    #[test]
    fn test_detail_level_from_level() {
        assert_eq!(DetailLevel::from_level(0), DetailLevel::Purpose);
        assert_eq!(DetailLevel::from_level(1), DetailLevel::Purpose);
        assert_eq!(DetailLevel::from_level(2), DetailLevel::Metrics);
        assert_eq!(DetailLevel::from_level(3), DetailLevel::Patterns);
        assert_eq!(DetailLevel::from_level(9), DetailLevel::Patterns);
        assert_eq!(DetailLevel::default().as_level(), 2);
    }

    #[test]
    fn test_pattern_hints() {
        let model = extract(SUBJECTS);
        let patterns: Vec<(&str, Vec<DesignPattern>)> = model
            .classes()
            .iter()
            .map(|c| (c.name.as_str(), DesignPattern::detect(c)))
            .collect();
        assert_eq!(
            patterns,
            vec![
                ("Engine", vec![]),
                ("EventBus", vec![DesignPattern::Observer]),
                ("WidgetFactory", vec![DesignPattern::Factory]),
                ("Config", vec![DesignPattern::Singleton]),
            ]
        );
    }

    #[test]
    fn test_observer_needs_all_three_methods() {
        let class = ClassDescriptor::new("Bus")
            .with_method("attach", "void")
            .with_method("notify", "void");
        assert!(DesignPattern::detect(&class).is_empty());
    }

    #[test]
    fn test_summarize_counts() {
        let summary = summarize(&extract(SUBJECTS));
        assert_eq!(summary.class_count(), 4);
        assert_eq!(summary.method_count, 5);
        assert_eq!(summary.attribute_count, 2);
        assert_eq!(summary.inheritance_count, 1);
        assert_eq!(summary.composition_count, 1);
        assert_eq!(summary.average_methods(), 1.25);
        assert_eq!(summary.average_attributes(), 0.5);
        assert_eq!(summary.classes[2].bases, vec!["Factory"]);
    }

    #[test]
    fn test_render_levels() {
        let summary = summarize(&extract(SUBJECTS));

        let purpose = summary.render(DetailLevel::Purpose);
        assert_eq!(
            purpose,
            "Purpose:\nThe codebase contains 4 classes. \
             The average class has 1.25 methods and 0.50 attributes.\n\n"
        );

        let metrics = summary.render(DetailLevel::Metrics);
        assert!(metrics.starts_with(&purpose));
        assert!(metrics.contains("  Number of Methods: 5\n"));
        assert!(metrics.contains("  Composition Relationships: 1\n"));
        assert!(metrics.contains(
            "  - The WidgetFactory class inherits from Factory with 1 methods and 0 attributes.\n"
        ));
        assert!(!metrics.contains("Design Patterns:"));

        let patterns = summary.render(DetailLevel::Patterns);
        assert!(patterns.starts_with(&metrics));
        assert!(patterns.ends_with(
            "Design Patterns:\n  - EventBus: Observer\n  - WidgetFactory: Factory\n  - Config: Singleton\n\n"
        ));
    }

    #[test]
    fn test_empty_model_summary() {
        let summary = summarize(&StructuralModel::default());
        assert_eq!(summary.average_methods(), 0.0);
        let text = summary.render(DetailLevel::Patterns);
        assert!(text.starts_with("Purpose:\nThe codebase contains 0 classes.\n\n"));
        assert!(!text.contains("Classes:"));
        assert!(!text.contains("Design Patterns:"));
    }
}
