//! Variable lookup, scalar wrapping and the count operator.

use bon::Builder;

use crate::formula::Scope;
use crate::interpreter::StyleError;
use crate::markup::is_valid_variable_name;
use crate::types::{TypedVariable, Value};

/// How raw scalars are turned into typed variables when they enter a scope.
///
/// Each instance carries its own mapping, so one renderer can, say, wrap
/// every integer as a [`TypedVariable::Duration`] without affecting others.
///
/// # Example
///
/// ```
/// use ircstyle::formula::{ScalarWrappers, wrap_scalar};
/// use ircstyle::{TypedVariable, Value};
///
/// fn as_duration(n: i64) -> TypedVariable {
///     TypedVariable::Duration(n.unsigned_abs())
/// }
///
/// let wrappers = ScalarWrappers::builder().integer(as_duration).build();
/// assert_eq!(
///     wrap_scalar(Value::Integer(90), &wrappers),
///     Value::Typed(TypedVariable::Duration(90))
/// );
/// ```
#[derive(Debug, Clone, Copy, Builder)]
pub struct ScalarWrappers {
    #[builder(default = TypedVariable::Integer as fn(i64) -> TypedVariable)]
    integer: fn(i64) -> TypedVariable,

    #[builder(default = TypedVariable::Float as fn(f64) -> TypedVariable)]
    float: fn(f64) -> TypedVariable,

    /// Also used for the keys bound by `<for key="...">`.
    #[builder(default = TypedVariable::String as fn(String) -> TypedVariable)]
    string: fn(String) -> TypedVariable,
}

impl Default for ScalarWrappers {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ScalarWrappers {
    pub fn wrap_integer(&self, n: i64) -> TypedVariable {
        (self.integer)(n)
    }

    pub fn wrap_float(&self, f: f64) -> TypedVariable {
        (self.float)(f)
    }

    pub fn wrap_string(&self, s: String) -> TypedVariable {
        (self.string)(s)
    }
}

/// Wrap a raw scalar into a typed variable.
///
/// Typed variables and arrays are returned unchanged; array entries are
/// wrapped later, when a loop binds them.
pub fn wrap_scalar(value: Value, wrappers: &ScalarWrappers) -> Value {
    match value {
        Value::Integer(n) => Value::Typed(wrappers.wrap_integer(n)),
        Value::Real(f) => Value::Typed(wrappers.wrap_float(f)),
        Value::String(s) => Value::Typed(wrappers.wrap_string(s)),
        other @ (Value::Typed(_) | Value::Array(_)) => other,
    }
}

/// Check a variable name and wrap its value for binding into a scope.
pub(crate) fn wrap_variable(
    name: &str,
    value: Value,
    wrappers: &ScalarWrappers,
) -> Result<Value, StyleError> {
    if !is_valid_variable_name(name) {
        return Err(StyleError::InvalidVariableName {
            name: name.to_string(),
        });
    }
    Ok(wrap_scalar(value, wrappers))
}

/// Resolve a variable name against the scope.
///
/// The name is an opaque key: `user.name` is looked up as-is, never as
/// `name` inside `user`.
pub fn resolve(name: &str, scope: &Scope<'_>) -> Result<Value, StyleError> {
    scope
        .get(name)
        .cloned()
        .ok_or_else(|| StyleError::UndefinedVariable {
            name: name.to_string(),
        })
}

/// The `#` operator: number of entries in an array.
pub fn count(value: Value) -> Result<Value, StyleError> {
    match value {
        Value::Array(array) => i64::try_from(array.len())
            .map(Value::Integer)
            .map_err(|_| StyleError::type_error("array too large to count")),
        other => Err(StyleError::type_error(format!(
            "cannot count the entries of a {}",
            other.kind_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Array;

    #[test]
    fn wraps_raw_scalars_with_defaults() {
        let wrappers = ScalarWrappers::default();
        assert_eq!(
            wrap_scalar(Value::from("x"), &wrappers),
            Value::Typed(TypedVariable::String("x".into()))
        );
        assert_eq!(
            wrap_scalar(Value::Real(1.5), &wrappers),
            Value::Typed(TypedVariable::Float(1.5))
        );
        let array = Value::Array(Array::from_values([1, 2]));
        assert_eq!(wrap_scalar(array.clone(), &wrappers), array);
    }

    #[test]
    fn rejects_invalid_names() {
        let err = wrap_variable("bad name", Value::Integer(1), &ScalarWrappers::default())
            .unwrap_err();
        assert!(matches!(err, StyleError::InvalidVariableName { .. }));
    }

    #[test]
    fn dotted_names_are_opaque_keys() {
        let mut scope = Scope::new();
        scope.bind("user.name", "Clicky");
        assert!(resolve("user.name", &scope).is_ok());
        assert!(matches!(
            resolve("user", &scope),
            Err(StyleError::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn count_requires_an_array() {
        assert_eq!(
            count(Value::Array(Array::from_values(["a", "b", "c"]))).unwrap(),
            Value::Integer(3)
        );
        assert!(count(Value::Integer(3)).is_err());
    }
}
