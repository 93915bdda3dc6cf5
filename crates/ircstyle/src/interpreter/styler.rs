//! Template rendering.
//!
//! A [`Styler`] parses a template, validates it, walks the tree emitting
//! text and IRC control codes, and finally cleans up redundant colour
//! sequences.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use bon::Builder;
use tracing::{debug, error, instrument, trace};

use crate::formula::{ScalarWrappers, Scope, evaluate, wrap_scalar, wrap_variable};
use crate::interpreter::codes::{BOLD, UNDERLINE, color_sequence};
use crate::interpreter::context::{ScopedContext, StyleContext};
use crate::interpreter::StyleError;
use crate::interpreter::error::compute_suggestions;
use crate::interpreter::normalize::normalize;
use crate::markup::{
    Element, MarkupValidator, Node, SchemaValidator, is_valid_variable_name, parse_markup,
};
use crate::service::{LocaleService, StandardLocaleService};
use crate::types::{ColorCode, Scalar, Value, normalize_name};

const DEFAULT_SEPARATOR: &str = ", ";
const DEFAULT_LAST_SEPARATOR: &str = " & ";

/// Significant digits shown for a computed real.
const REAL_DIGITS: i32 = 14;

/// Renders styling templates into IRC-formatted text.
///
/// A styler is immutable once built and may be shared between threads;
/// every render call starts from a fresh formatting context.
///
/// # Example
///
/// ```
/// use ircstyle::{Array, Styler, vars};
///
/// let styler = Styler::builder().build();
/// let out = styler
///     .render(
///         r#"The Beatles: <for from="names" item="name"><u><var name="name"/></u></for>."#,
///         &vars! { "names" => Array::from_values(["George", "John", "Paul", "Ringo"]) },
///     )
///     .unwrap();
/// assert_eq!(
///     out,
///     "The Beatles: \x1fGeorge\x1f, \x1fJohn\x1f, \x1fPaul\x1f & \x1fRingo\x1f."
/// );
/// ```
#[derive(Builder)]
pub struct Styler {
    /// Locale tag passed to the formatting service.
    #[builder(into, default = "en".to_string())]
    locale: String,

    #[builder(default = Arc::new(StandardLocaleService::new()) as Arc<dyn LocaleService>)]
    service: Arc<dyn LocaleService>,

    #[builder(default = Arc::new(SchemaValidator::new()) as Arc<dyn MarkupValidator>)]
    validator: Arc<dyn MarkupValidator>,

    /// How caller-supplied scalars become typed variables.
    #[builder(default)]
    wrappers: ScalarWrappers,
}

impl Default for Styler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Styler {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Render a template with the given variables.
    ///
    /// Templates containing neither `<` nor `&` are returned unchanged
    /// without being parsed. Otherwise the template is parsed, validated
    /// and rendered; any failure aborts the whole call.
    #[instrument(level = "debug", skip_all, fields(len = template.len()))]
    pub fn render(
        &self,
        template: &str,
        vars: &HashMap<String, Value>,
    ) -> Result<String, StyleError> {
        if !template.contains(['<', '&']) {
            debug!("no markup, returning template as-is");
            return Ok(template.to_string());
        }

        let root = parse_markup(template)?;
        let diagnostics = self.validator.validate(&root);
        if !diagnostics.is_empty() {
            error!(?diagnostics, "template failed validation");
            return Err(StyleError::InvalidMarkup { diagnostics });
        }

        self.render_tree(&root, vars)
    }

    /// Render an already parsed tree, skipping validation.
    ///
    /// Attribute problems the validator would have reported surface as
    /// errors while rendering instead.
    pub fn render_tree(
        &self,
        root: &Element,
        vars: &HashMap<String, Value>,
    ) -> Result<String, StyleError> {
        let mut entries: Vec<(&String, &Value)> = vars.iter().collect();
        entries.sort_unstable_by_key(|&(name, _)| name);
        let mut scope = Scope::new();
        for (name, value) in entries {
            scope.bind(name.clone(), wrap_variable(name, value.clone(), &self.wrappers)?);
        }

        let mut out = String::new();
        let mut context = StyleContext::new();
        self.render_children(root, &mut context, &scope, &mut out)?;
        let result = normalize(&out);
        debug!(len = result.len(), "rendered");
        Ok(result)
    }

    fn render_children(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        for child in &element.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(child) => self.render_element(child, context, scope, out)?,
            }
        }
        Ok(())
    }

    fn render_element(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        trace!(element = %element.name, "enter");
        match element.name.as_str() {
            "var" => self.render_var(element, scope, out),
            "b" => self.render_bold(element, context, scope, out),
            "u" => self.render_underline(element, context, scope, out),
            "color" => self.render_color(element, context, scope, out),
            "for" => self.render_loop(element, context, scope, out),
            "plural" => self.render_plural(element, context, scope, out),
            // `case` is only meaningful inside `plural`; `msg` and unknown
            // elements are transparent.
            _ => self.render_children(element, context, scope, out),
        }
    }

    fn render_var(
        &self,
        element: &Element,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        let formula = required(element, "name")?;
        let text = self.display(evaluate(formula, scope)?)?;
        out.push_str(&text);
        Ok(())
    }

    /// Display text for the result of a formula.
    fn display(&self, value: Value) -> Result<String, StyleError> {
        match value {
            Value::Typed(typed) => self.service.render(&typed, &self.locale),
            Value::Integer(n) => Ok(n.to_string()),
            Value::Real(f) => Ok(display_real(f)),
            Value::String(s) => Ok(s),
            Value::Array(_) => Err(StyleError::type_error(
                "cannot display an array, use <for> to iterate over it",
            )),
        }
    }

    fn render_bold(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        let mut scoped = ScopedContext::enter(context);
        let was_bold = scoped.saved().bold;
        if !was_bold {
            out.push_str(BOLD);
        }
        scoped.bold = true;
        self.render_children(element, &mut scoped, scope, out)?;
        if !was_bold {
            out.push_str(BOLD);
        }
        Ok(())
    }

    fn render_underline(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        let mut scoped = ScopedContext::enter(context);
        let was_underlined = scoped.saved().underline;
        if !was_underlined {
            out.push_str(UNDERLINE);
        }
        scoped.underline = true;
        self.render_children(element, &mut scoped, scope, out)?;
        if !was_underlined {
            out.push_str(UNDERLINE);
        }
        Ok(())
    }

    fn render_color(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        let channel = |name: &str| {
            element
                .attribute(name)
                .filter(|value| !value.is_empty())
                .map(resolve_color)
                .transpose()
        };
        let fg = channel("fg")?;
        let bg = channel("bg")?;
        if fg.is_none() && bg.is_none() {
            return Err(StyleError::MissingColor);
        }

        let mut scoped = ScopedContext::enter(context);
        let saved = scoped.saved();
        if fg.is_some() {
            scoped.foreground = fg;
        }
        if bg.is_some() {
            scoped.background = bg;
        }
        let changed = |now: Option<ColorCode>, before: Option<ColorCode>| {
            if now == before { None } else { now }
        };
        if let Some(codes) = color_sequence(
            changed(scoped.foreground, saved.foreground),
            changed(scoped.background, saved.background),
        ) {
            out.push_str(&codes);
        }

        self.render_children(element, &mut scoped, scope, out)?;

        // Restoring a channel that was unset has no code of its own.
        let restore = |now: Option<ColorCode>, before: Option<ColorCode>| {
            if now == before { None } else { before }
        };
        if let Some(codes) = color_sequence(
            restore(scoped.foreground, saved.foreground),
            restore(scoped.background, saved.background),
        ) {
            out.push_str(&codes);
        }
        Ok(())
    }

    fn render_loop(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        let source = required(element, "from")?;
        let item = required(element, "item")?;
        let key = element.attribute("key");
        for name in [Some(source), Some(item), key].into_iter().flatten() {
            check_name(name)?;
        }

        let separator = element
            .first_attribute(&["separator", "sep"])
            .unwrap_or(DEFAULT_SEPARATOR);
        let last_separator = element
            .first_attribute(&["last_separator", "last"])
            .or_else(|| element.first_attribute(&["separator", "sep"]))
            .unwrap_or(DEFAULT_LAST_SEPARATOR);

        let entries = match scope.get(source) {
            Some(Value::Array(array)) => array,
            Some(other) => {
                return Err(StyleError::type_error(format!(
                    "<for> expects '{source}' to be an array, found a {}",
                    other.kind_name()
                )));
            }
            None => {
                return Err(StyleError::UndefinedVariable {
                    name: source.to_string(),
                });
            }
        };
        trace!(source, len = entries.len(), "loop");

        let total = entries.len();
        for (index, (entry_key, entry)) in entries.iter().enumerate() {
            if index > 0 {
                out.push_str(if index + 1 == total {
                    last_separator
                } else {
                    separator
                });
            }
            let mut iteration = scope.child();
            if let Some(key) = key {
                let wrapped = self.wrappers.wrap_string(entry_key.to_string());
                iteration.bind(key, wrapped);
            }
            iteration.bind(item, wrap_scalar(entry.clone(), &self.wrappers));
            self.render_children(element, context, &iteration, out)?;
        }
        Ok(())
    }

    fn render_plural(
        &self,
        element: &Element,
        context: &mut StyleContext,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<(), StyleError> {
        let formula = required(element, "var")?;
        let count = plural_count(evaluate(formula, scope)?)?;

        // Every case is rendered up front, so errors in any branch surface
        // regardless of the count.
        let mut cases = Vec::new();
        for case in element.child_elements().filter(|child| child.name == "case") {
            let form = required(case, "form")?;
            let mut rendered = String::new();
            let mut case_context = *context;
            self.render_children(case, &mut case_context, scope, &mut rendered)?;
            cases.push((form, rendered));
        }

        let forms: BTreeSet<String> = cases.iter().map(|(form, _)| form.to_string()).collect();
        let chosen = self.service.choose_form(count, &self.locale, &forms)?;
        debug!(count, form = %chosen, "plural form");
        let text = cases
            .into_iter()
            .find_map(|(form, rendered)| (form == chosen).then_some(rendered))
            .ok_or_else(|| StyleError::MissingPluralCase {
                available: forms.iter().cloned().collect(),
                form: chosen,
            })?;
        out.push_str(&text);
        Ok(())
    }
}

fn required<'e>(element: &'e Element, attribute: &'static str) -> Result<&'e str, StyleError> {
    element
        .attribute(attribute)
        .ok_or_else(|| StyleError::MissingAttribute {
            element: element.name.clone(),
            attribute,
        })
}

fn check_name(name: &str) -> Result<(), StyleError> {
    if is_valid_variable_name(name) {
        Ok(())
    } else {
        Err(StyleError::InvalidVariableName {
            name: name.to_string(),
        })
    }
}

/// Resolve a `fg`/`bg` attribute: a number up to 99 or a colour name.
fn resolve_color(value: &str) -> Result<ColorCode, StyleError> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed
            .parse::<u8>()
            .ok()
            .and_then(ColorCode::new)
            .ok_or_else(|| StyleError::InvalidColorCode {
                code: trimmed.to_string(),
            });
    }
    ColorCode::from_name(trimmed).ok_or_else(|| StyleError::UnknownColor {
        name: value.to_string(),
        suggestions: compute_suggestions(
            &normalize_name(trimmed),
            ColorCode::names(),
        ),
    })
}

/// Display a computed real with [`REAL_DIGITS`] significant digits and no
/// trailing zeros, switching to `1.5E+20` notation for very large or very
/// small magnitudes.
fn display_real(f: f64) -> String {
    if !f.is_finite() || f == 0.0 {
        return f.to_string();
    }
    let scientific = format!("{:.*e}", (REAL_DIGITS - 1).unsigned_abs() as usize, f);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if exponent < -4 || exponent >= REAL_DIGITS {
        let mantissa = trim_fraction(mantissa);
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{mantissa}.0")
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{}", exponent.unsigned_abs());
    }
    let decimals = (REAL_DIGITS - 1 - exponent).unsigned_abs() as usize;
    trim_fraction(&format!("{f:.decimals$}")).to_string()
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// The count a `<plural>` selects on.
fn plural_count(value: Value) -> Result<i64, StyleError> {
    let scalar = match value {
        Value::Integer(n) => return Ok(n),
        Value::Real(f) => Scalar::Float(f),
        Value::Typed(typed) => typed.raw_value(),
        Value::Array(array) => {
            return i64::try_from(array.len())
                .map_err(|_| StyleError::type_error("array too large to count"));
        }
        Value::String(s) => Scalar::String(s),
    };
    match scalar {
        Scalar::Integer(n) => Ok(n),
        // Saturating cast, fractional part dropped.
        Scalar::Float(f) => Ok(f as i64),
        Scalar::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f as i64)
                })
                .ok_or_else(|| {
                    StyleError::type_error(format!("cannot pluralize on non-numeric string '{s}'"))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Array, TypedVariable};

    fn render(template: &str) -> Result<String, StyleError> {
        Styler::default().render(template, &HashMap::new())
    }

    #[test]
    fn numeric_and_named_colors() {
        assert_eq!(resolve_color("3").unwrap().to_string(), "03");
        assert_eq!(resolve_color("Light Blue").unwrap().to_string(), "12");
        assert!(matches!(
            resolve_color("100"),
            Err(StyleError::InvalidColorCode { .. })
        ));
    }

    #[test]
    fn unknown_color_suggests_neighbours() {
        let err = resolve_color("purpel").unwrap_err();
        assert_eq!(err.to_string(), "unknown color 'purpel', did you mean: purple?");
    }

    #[test]
    fn nested_bold_toggles_once() {
        assert_eq!(render("<b>a<b>b</b>c</b>").unwrap(), "\x02abc\x02");
    }

    #[test]
    fn color_restores_previous_foreground() {
        assert_eq!(
            render(r#"<color fg="red">a<color fg="blue">b</color>c</color>"#).unwrap(),
            "\x0304a\x0302b\x0304c"
        );
    }

    #[test]
    fn same_color_emits_nothing_new() {
        assert_eq!(
            render(r#"<color fg="red">a<color fg="4">b</color></color>"#).unwrap(),
            "\x0304ab"
        );
    }

    #[test]
    fn reals_show_fourteen_significant_digits() {
        assert_eq!(display_real(0.1 + 0.2), "0.3");
        assert_eq!(display_real(2.5), "2.5");
        assert_eq!(display_real(-1234.5678), "-1234.5678");
        assert_eq!(display_real(1.0 / 3.0), "0.33333333333333");
        assert_eq!(display_real(1e20), "1.0E+20");
        assert_eq!(display_real(0.00001), "1.0E-5");
        assert_eq!(display_real(0.0001), "0.0001");
        assert_eq!(display_real(0.0), "0");
    }

    #[test]
    fn empty_color_channel_is_ignored() {
        assert_eq!(
            render(r#"<color fg="" bg="red">x</color>"#).unwrap(),
            "\x03,04\x02\x02x"
        );
        assert!(matches!(
            render(r#"<color fg="" bg="">x</color>"#),
            Err(StyleError::InvalidMarkup { .. })
        ));
    }

    #[test]
    fn plural_count_truncates_numeric_strings() {
        assert_eq!(plural_count(Value::String("2.5".to_string())).unwrap(), 2);
        assert_eq!(plural_count(Value::String(" 7 ".to_string())).unwrap(), 7);
        assert_eq!(
            plural_count(Value::Typed(TypedVariable::String("-1.9".to_string()))).unwrap(),
            -1
        );
        assert!(plural_count(Value::String("many".to_string())).is_err());
    }

    #[test]
    fn plural_count_truncates_reals() {
        assert_eq!(plural_count(Value::Real(2.9)).unwrap(), 2);
        assert_eq!(
            plural_count(Value::Typed(TypedVariable::Duration(5))).unwrap(),
            5
        );
        assert_eq!(plural_count(Value::Array(Array::from_values([1, 2]))).unwrap(), 2);
    }
}
