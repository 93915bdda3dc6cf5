mod array;
mod color;
mod typed;
mod value;

pub use array::Array;
pub use color::ColorCode;
pub(crate) use color::normalize_name;
pub use typed::{Currency, DateTimeValue, FormatStyle, Scalar, TypedVariable};
pub use value::Value;
