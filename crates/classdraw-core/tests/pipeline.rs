use classdraw_core::{
    emit, extract, Attribute, DiagramEmitter, Extractor, ExtractorConfig, Method, Relationship,
    StatsObserver,
};
use pretty_assertions::assert_eq;

const SHAPES: &str = include_str!("fixtures/shapes.hpp");

#[test]
fn shapes_header_model() {
    let model = extract(SHAPES);

    let names: Vec<&str> = model.classes().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Point", "Shape", "Circle", "Polygon"]);

    let circle = model.class("Circle").unwrap();
    assert_eq!(circle.bases, vec!["Shape"]);
    assert_eq!(
        circle.attributes,
        vec![
            Attribute::new("center", "Point"),
            Attribute::new("radius", "double"),
        ]
    );
    assert_eq!(circle.methods, vec![Method::new("area", "double")]);

    let polygon = model.class("Polygon").unwrap();
    assert_eq!(polygon.bases, vec!["Shape", "Printable"]);
    // Statements in the inline body and in main() keep landing on Polygon
    assert_eq!(
        polygon.attributes,
        vec![
            Attribute::new("vertices", "std::vector<Point>"),
            Attribute::new("origin", "Point"),
            Attribute::new("count", "return"),
            Attribute::new("0", "return"),
        ]
    );
    assert_eq!(
        polygon.methods,
        vec![
            Method::new("vertexCount", "int"),
            Method::new("fill", "geometry::Color"),
        ]
    );

    assert_eq!(
        model.relationships(),
        &[
            Relationship::inheritance("Circle", "Shape"),
            Relationship::composition("Circle", "Point"),
            Relationship::inheritance("Polygon", "Shape"),
            Relationship::inheritance("Polygon", "Printable"),
            Relationship::composition("Polygon", "Point"),
        ]
    );
}

#[test]
fn shapes_header_diagram() {
    let expected = r"@startuml
class Point {
  double x
  double y
  double distanceTo()
}

class Shape {
  std::string name()
}

class Circle {
  Point center
  double radius
  double area()
}

class Polygon {
  std::vector\<Point\> vertices
  Point origin
  return count
  return 0
  int vertexCount()
  geometry::Color fill()
}

Circle --|> Shape
Circle *-- Point
Polygon --|> Shape
Polygon --|> Printable
Polygon *-- Point
@enduml
";

    assert_eq!(emit(&extract(SHAPES)), expected);
}

#[test]
fn one_observer_spans_both_stages() {
    let mut stats = StatsObserver::default();
    let model = Extractor::new().extract_with(SHAPES, &mut stats);
    let text = DiagramEmitter::new().emit_with(&model, &mut stats);

    assert_eq!(stats.class_count, 4);
    assert_eq!(stats.attribute_count, 8);
    assert_eq!(stats.method_count, 5);
    assert_eq!(stats.inheritance_count, 3);
    assert_eq!(stats.composition_count, 2);
    assert_eq!(stats.emitted_bytes, text.len());
}

#[test]
fn skipping_statements_keeps_declarations_only() {
    let extractor = Extractor::with_config(ExtractorConfig::new().skip_statements(true));
    let model = extractor.extract(SHAPES);

    let polygon = model.class("Polygon").unwrap();
    assert_eq!(
        polygon.attributes,
        vec![
            Attribute::new("vertices", "std::vector<Point>"),
            Attribute::new("origin", "Point"),
        ]
    );
    assert_eq!(model.relationships(), extract(SHAPES).relationships());
}

#[test]
fn independent_inputs_extract_concurrently() {
    let inputs = [
        SHAPES,
        "class Engine {\n};\nclass Car {\n  Engine e;\n};",
        "int main() {\n}",
    ];
    let sequential: Vec<String> = inputs.iter().map(|s| emit(&extract(s))).collect();

    let parallel: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|s| scope.spawn(move || emit(&extract(s))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
