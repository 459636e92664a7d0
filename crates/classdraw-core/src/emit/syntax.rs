//! PlantUML tokens used by the emitter.

use std::borrow::Cow;

/// Opens a diagram
pub const START_MARKER: &str = "@startuml";

/// Closes a diagram
pub const END_MARKER: &str = "@enduml";

/// Starts a class block
pub const CLASS_KEYWORD: &str = "class";

/// Declares one component
pub const COMPONENT_KEYWORD: &str = "component";

/// Child to parent, drawn with a hollow triangle at the parent
pub const INHERITANCE_ARROW: &str = "--|>";

/// Owner to owned, drawn with a filled diamond at the owner
pub const COMPOSITION_ARROW: &str = "*--";

/// Characters PlantUML reads as generic brackets inside class blocks
const RESERVED: [char; 2] = ['<', '>'];

/// Backslash-escapes `<` and `>`; everything else passes through unchanged
pub fn escape(token: &str) -> Cow<'_, str> {
    if !token.contains(RESERVED) {
        return Cow::Borrowed(token);
    }

    let mut escaped = String::with_capacity(token.len() + 4);
    for c in token.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}
