//! Schema validation for markup trees.

use std::fmt::{Display, Formatter, Result as FmtResult};

use super::ast::{Element, Node};
use super::parser::ROOT_ELEMENT;

/// A single problem reported by a [`MarkupValidator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Slash-separated element path, e.g. `/msg/for/color`.
    pub path: String,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Decides whether a parsed tree may be rendered.
///
/// Implementations return every problem they find; an empty list means the
/// tree is valid. Diagnostics are surfaced to the caller unchanged.
pub trait MarkupValidator: Send + Sync {
    fn validate(&self, root: &Element) -> Vec<Diagnostic>;
}

/// Attribute rules for one element of the schema.
struct ElementRule {
    name: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
    /// Attributes whose value must be a variable name.
    names: &'static [&'static str],
    allows_children: bool,
}

const RULES: &[ElementRule] = &[
    ElementRule {
        name: "var",
        required: &["name"],
        optional: &[],
        names: &[],
        allows_children: false,
    },
    ElementRule {
        name: "b",
        required: &[],
        optional: &[],
        names: &[],
        allows_children: true,
    },
    ElementRule {
        name: "u",
        required: &[],
        optional: &[],
        names: &[],
        allows_children: true,
    },
    ElementRule {
        name: "color",
        required: &[],
        optional: &["fg", "bg"],
        names: &[],
        allows_children: true,
    },
    ElementRule {
        name: "for",
        required: &["from", "item"],
        optional: &["key", "separator", "sep", "last_separator", "last"],
        names: &["from", "item", "key"],
        allows_children: true,
    },
    ElementRule {
        name: "plural",
        required: &["var"],
        optional: &[],
        names: &[],
        allows_children: true,
    },
    ElementRule {
        name: "case",
        required: &["form"],
        optional: &[],
        names: &[],
        allows_children: true,
    },
];

/// The default validator, enforcing the styling schema.
///
/// - The root is `msg`; other elements are `var`, `b`, `u`, `color`, `for`,
///   `plural` and `case`.
/// - Required attributes are present and no unknown attributes appear.
/// - `var` is empty; `color` has `fg`, `bg` or both.
/// - `plural` holds one or more `case` elements and nothing but whitespace
///   besides; `case` appears nowhere else.
/// - `for` attributes naming variables are valid variable names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_element(
        &self,
        element: &Element,
        parent: Option<&str>,
        path: &str,
        out: &mut Vec<Diagnostic>,
    ) {
        let path = format!("{path}/{}", element.name);
        let mut report = |message: String| {
            out.push(Diagnostic {
                path: path.clone(),
                message,
            });
        };

        let Some(rule) = RULES.iter().find(|r| r.name == element.name) else {
            if element.name == ROOT_ELEMENT {
                report("<msg> may only appear as the template root".to_string());
            } else {
                report(format!("unknown element <{}>", element.name));
            }
            return;
        };

        for required in rule.required {
            if element.attribute(required).is_none() {
                report(format!(
                    "the \"{required}\" attribute is required on <{}>",
                    element.name
                ));
            }
        }
        for (attr, value) in &element.attributes {
            if !rule.required.contains(&attr.as_str()) && !rule.optional.contains(&attr.as_str())
            {
                report(format!(
                    "attribute \"{attr}\" is not allowed on <{}>",
                    element.name
                ));
            } else if rule.names.contains(&attr.as_str()) && !is_valid_variable_name(value) {
                report(format!("\"{value}\" is not a valid variable name"));
            }
        }
        if !rule.allows_children && !element.children.is_empty() {
            report(format!("<{}> must be empty", element.name));
        }

        match element.name.as_str() {
            "color"
                if ["fg", "bg"]
                    .iter()
                    .all(|channel| element.attribute(channel).is_none_or(str::is_empty)) =>
            {
                report(
                    "the \"fg\" attribute or the \"bg\" attribute or both must be supplied \
                     when using the <color> tag"
                        .to_string(),
                );
            }
            "case" if parent != Some("plural") => {
                report("<case> may only appear directly inside <plural>".to_string());
            }
            "plural" => {
                if element.child_elements().next().is_none() {
                    report("<plural> requires at least one <case>".to_string());
                }
                for child in &element.children {
                    match child {
                        Node::Element(e) if e.name != "case" => {
                            report(format!("<{}> is not allowed inside <plural>", e.name));
                        }
                        Node::Text(t) if !t.trim().is_empty() => {
                            report("text is not allowed directly inside <plural>".to_string());
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }

        self.check_children(element, &path, out);
    }

    fn check_children(&self, element: &Element, path: &str, out: &mut Vec<Diagnostic>) {
        for child in element.child_elements() {
            self.check_element(child, Some(element.name.as_str()), path, out);
        }
    }
}

impl MarkupValidator for SchemaValidator {
    fn validate(&self, root: &Element) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if root.name != ROOT_ELEMENT {
            diagnostics.push(Diagnostic {
                path: format!("/{}", root.name),
                message: format!("the root element must be <{ROOT_ELEMENT}>"),
            });
            return diagnostics;
        }
        let path = format!("/{ROOT_ELEMENT}");
        self.check_children(root, &path, &mut diagnostics);
        diagnostics
    }
}

/// Whether `name` is a valid variable name: one or more of `[A-Za-z0-9_.]`.
pub fn is_valid_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
