//! Line classification rules.
//!
//! Each trimmed line is mapped to exactly one [`LineShape`] by running the
//! rules in precedence order; the first rule that claims the line wins.

use regex::Regex;
use std::sync::LazyLock;

/// `class Name` or `class Outer::Name`, with whatever follows kept for the
/// inheritance clause
static CLASS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(?:\w+::)*(\w+)(.*)$").unwrap());

/// `<type> <name> ( ... )`
static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\w+::)*\w+(?:<[^;()]*>)?)\s+(\w+)\s*\([^)]*\)").unwrap()
});

/// `<type> <name> ;`
static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\w+::)*\w+(?:<[^;()]*>)?)\s+(\w+)\s*;").unwrap());

/// Keywords that may precede a base class name in an inheritance clause
const BASE_QUALIFIERS: &[&str] = &["public", "protected", "private", "virtual"];

/// Words that look like a type in a declaration but start a statement
const STATEMENT_KEYWORDS: &[&str] = &[
    "return",
    "delete",
    "throw",
    "goto",
    "else",
    "case",
    "new",
    "co_return",
];

/// Name of the program entry point, never a class member
const ENTRY_POINT: &str = "main";

/// Structural role of one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape<'a> {
    /// Empty after trimming
    Blank,
    /// Preprocessor directive (`#include`, `#pragma`, ...)
    Directive,
    /// A class header, with cleaned base names in written order
    ClassHeader {
        /// Class identifier
        name: &'a str,
        /// Base class names
        bases: Vec<&'a str>,
    },
    /// Constructor declaration of the current class
    Constructor,
    /// Method-shaped `main` declaration
    EntryPoint,
    /// Method declaration
    Method {
        /// Return type text
        return_type: &'a str,
        /// Method identifier
        name: &'a str,
    },
    /// Attribute declaration
    Attribute {
        /// Declared type text
        ty: &'a str,
        /// Attribute identifier
        name: &'a str,
    },
    /// Nothing recognized
    Unrecognized,
}

impl LineShape<'_> {
    /// Returns true if the line contributes nothing to the model and is not
    /// worth reporting (blank lines, directives, constructors, `main`)
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            LineShape::Blank | LineShape::Directive | LineShape::Constructor | LineShape::EntryPoint
        )
    }

    /// Returns true for a method or attribute whose type position holds a
    /// statement keyword, as in `return speed_;` inside an inline body.
    ///
    /// Such lines are still classified as members; callers decide whether
    /// to keep them.
    pub fn is_statement(&self) -> bool {
        match self {
            LineShape::Method { return_type: ty, .. } | LineShape::Attribute { ty, .. } => {
                STATEMENT_KEYWORDS.contains(ty)
            }
            _ => false,
        }
    }
}

/// One classification rule. Returns `None` to pass the line on to the next rule.
type Rule = for<'a> fn(&'a str, Option<&str>) -> Option<LineShape<'a>>;

/// Rules in precedence order
const RULES: &[Rule] = &[
    blank_or_directive,
    class_header,
    constructor,
    method,
    attribute,
];

/// Classifies a single line.
///
/// `current_class` is the name of the class whose body the scan is currently
/// attributing members to; member rules only apply when it is set.
pub fn classify<'a>(line: &'a str, current_class: Option<&str>) -> LineShape<'a> {
    let line = line.trim();
    RULES
        .iter()
        .find_map(|rule| rule(line, current_class))
        .unwrap_or(LineShape::Unrecognized)
}

fn blank_or_directive<'a>(line: &'a str, _current: Option<&str>) -> Option<LineShape<'a>> {
    if line.is_empty() {
        Some(LineShape::Blank)
    } else if line.starts_with('#') {
        Some(LineShape::Directive)
    } else {
        None
    }
}

fn class_header<'a>(line: &'a str, _current: Option<&str>) -> Option<LineShape<'a>> {
    let caps = CLASS_HEADER.captures(line)?;
    let name = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str()).trim_start();
    let rest = strip_word(rest, "final").unwrap_or(rest);

    let bases = match rest.strip_prefix(':') {
        Some(clause) => parse_bases(clause),
        None => Vec::new(),
    };

    Some(LineShape::ClassHeader { name, bases })
}

fn constructor<'a>(line: &'a str, current: Option<&str>) -> Option<LineShape<'a>> {
    let after_name = line.strip_prefix(current?)?;
    after_name
        .trim_start()
        .starts_with('(')
        .then_some(LineShape::Constructor)
}

fn method<'a>(line: &'a str, current: Option<&str>) -> Option<LineShape<'a>> {
    current?;
    let caps = METHOD.captures(line)?;
    let return_type = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();

    if name == ENTRY_POINT {
        return Some(LineShape::EntryPoint);
    }
    Some(LineShape::Method { return_type, name })
}

fn attribute<'a>(line: &'a str, current: Option<&str>) -> Option<LineShape<'a>> {
    current?;
    let caps = ATTRIBUTE.captures(line)?;
    let ty = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    Some(LineShape::Attribute { ty, name })
}

/// Strips `word` from the start of `text` if it stands alone as a word
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parses the text after the `:` of a class header into base names
fn parse_bases(clause: &str) -> Vec<&str> {
    let clause = clause.find('{').map_or(clause, |end| &clause[..end]);
    split_top_level(clause)
        .into_iter()
        .filter_map(clean_base)
        .collect()
}

/// Splits on commas that are not inside template brackets
fn split_top_level(clause: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in clause.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&clause[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&clause[start..]);
    parts
}

/// Removes access specifiers and `virtual`, then cuts at the first whitespace
/// outside template brackets. A leading global `::` is dropped, and so are
/// tokens that do not then start like an identifier (trailing comments).
fn clean_base(token: &str) -> Option<&str> {
    let mut rest = token.trim();
    while let Some(stripped) = BASE_QUALIFIERS
        .iter()
        .find_map(|qualifier| strip_word(rest, qualifier))
    {
        rest = stripped;
    }

    let mut depth = 0usize;
    let end = rest
        .char_indices()
        .find(|&(_, c)| {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
            depth == 0 && c.is_whitespace()
        })
        .map_or(rest.len(), |(i, _)| i);

    let name = rest[..end].trim_start_matches(':');
    name.starts_with(|c: char| c.is_alphanumeric() || c == '_')
        .then_some(name)
}
