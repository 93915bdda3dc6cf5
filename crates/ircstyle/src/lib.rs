//! IRC text styling from XML-like templates.
//!
//! Templates mark up text with `<b>`, `<u>` and `<color>`, substitute
//! variables with `<var>`, iterate arrays with `<for>` and select wording
//! by count with `<plural>`. Rendering yields text with IRC control codes.
//!
//! ```
//! use ircstyle::{Styler, vars};
//!
//! let styler = Styler::default();
//! let out = styler
//!     .render(
//!         r#"<b>Hello</b> <color fg="red"><var name="who"/></color>"#,
//!         &vars! { "who" => "world" },
//!     )
//!     .unwrap();
//! assert_eq!(out, "\x02Hello\x02 \x0304world");
//! ```

pub mod formula;
pub mod interpreter;
pub mod markup;
pub mod service;
pub mod types;

pub use interpreter::{ErrorKind, StyleError, Styler, compute_suggestions, normalize};
pub use markup::{Diagnostic, MarkupValidator, SchemaValidator};
pub use service::{LocaleService, StandardLocaleService};
pub use types::{
    Array, ColorCode, Currency, DateTimeValue, FormatStyle, Scalar, TypedVariable, Value,
};

/// Creates a `HashMap<String, Value>` of template variables.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// arrays and typed variables can be passed directly.
///
/// # Example
///
/// ```
/// use ircstyle::{Value, vars};
///
/// let v = vars! { "count" => 3, "name" => "Alice" };
/// assert_eq!(v.len(), 2);
/// assert_eq!(v["count"], Value::Integer(3));
/// ```
#[macro_export]
macro_rules! vars {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
