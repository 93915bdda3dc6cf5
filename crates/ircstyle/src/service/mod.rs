//! Locale formatting service.
//!
//! The interpreter delegates two locale-dependent decisions to a
//! [`LocaleService`]: turning a [`TypedVariable`] into display text and
//! choosing which `<case>` of a `<plural>` element applies to a count.

mod datetime;
mod duration;
mod numbers;
mod plural;

use std::collections::BTreeSet;

use icu_locale_core::Locale;
use icu_locale_core::subtags::Region;
use tracing::trace;

use crate::interpreter::StyleError;
use crate::types::TypedVariable;

pub use datetime::format_datetime;
pub use duration::format_duration;
pub use numbers::{NumberSymbols, format_currency, format_float, local_currency, number_symbols};
pub use plural::plural_category;

/// Parse a locale tag, accepting POSIX spellings such as `fr_FR.UTF-8`.
pub fn parse_locale(tag: &str) -> Result<Locale, StyleError> {
    let trimmed = tag.split(['.', '@']).next().unwrap_or_default();
    trimmed
        .replace('_', "-")
        .parse::<Locale>()
        .map_err(|e| StyleError::InvalidLocale {
            locale: tag.to_string(),
            message: e.to_string(),
        })
}

/// Locale-dependent formatting used while rendering.
///
/// Implementations must be pure: the same input always yields the same
/// output.
pub trait LocaleService: Send + Sync {
    /// Display text for a typed variable.
    fn render(&self, value: &TypedVariable, locale: &str) -> Result<String, StyleError>;

    /// Pick one of `forms` for `count`.
    ///
    /// `forms` holds the `form` attribute of every `<case>` present. The
    /// returned name need not be one of them; the caller reports a missing
    /// case.
    fn choose_form(
        &self,
        count: i64,
        locale: &str,
        forms: &BTreeSet<String>,
    ) -> Result<String, StyleError>;
}

/// The built-in service: CLDR plural rules and English-style number, date
/// and duration patterns with per-language digit symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLocaleService;

impl StandardLocaleService {
    pub fn new() -> Self {
        Self
    }
}

impl LocaleService for StandardLocaleService {
    fn render(&self, value: &TypedVariable, locale: &str) -> Result<String, StyleError> {
        let parsed = parse_locale(locale)?;
        let language = parsed.id.language.as_str();
        Ok(match value {
            TypedVariable::Integer(n) => n.to_string(),
            TypedVariable::Float(f) => format_float(*f, language),
            TypedVariable::String(s) => s.clone(),
            TypedVariable::Currency(currency) => {
                let region = parsed.id.region.as_ref().map(Region::as_str);
                let code = currency
                    .code
                    .as_deref()
                    .unwrap_or_else(|| local_currency(language, region));
                format_currency(currency.amount, code, language)
            }
            TypedVariable::DateTime(moment) => format_datetime(moment)?,
            TypedVariable::Duration(seconds) => format_duration(*seconds),
        })
    }

    fn choose_form(
        &self,
        count: i64,
        locale: &str,
        forms: &BTreeSet<String>,
    ) -> Result<String, StyleError> {
        let exact = format!("={count}");
        if forms.contains(&exact) {
            return Ok(exact);
        }
        let category = plural_category(locale, count)?;
        trace!(count, locale, category, "plural category");
        if forms.contains(category) || !forms.contains("other") {
            Ok(category.to_string())
        } else {
            Ok("other".to_string())
        }
    }
}
