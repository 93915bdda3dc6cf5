//! CLDR plural category resolution.
//!
//! English has "one" and "other", Russian adds "few" and "many", and
//! Arabic uses all six categories: "zero", "one", "two", "few", "many",
//! "other".
//!
//! Plural rules are cached per thread per locale tag to avoid re-creating
//! `PluralRules` instances on every call. The cache is initialized lazily
//! on first access within each thread.

use std::cell::RefCell;

use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};
use tracing::debug;

use crate::interpreter::StyleError;
use crate::service::parse_locale;

thread_local! {
    /// Per-thread cache of `PluralRules` keyed by normalized locale tag.
    static PLURAL_RULES_CACHE: RefCell<Vec<(String, PluralRules)>> = const { RefCell::new(Vec::new()) };
}

/// Translate a `PluralCategory` enum to its string representation.
fn category_str(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Build `PluralRules` for a locale tag.
fn build_rules(tag: &str) -> Result<PluralRules, StyleError> {
    let locale = parse_locale(tag)?;
    PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).map_err(|e| {
        StyleError::InvalidLocale {
            locale: tag.to_string(),
            message: e.to_string(),
        }
    })
}

/// Get the CLDR plural category for a number in a given locale.
///
/// Accepts BCP 47 tags (`en-US`) as well as POSIX-style ones (`en_US`,
/// `en_US.UTF-8`).
///
/// # Examples
///
/// ```
/// use ircstyle::service::plural_category;
///
/// // English: 1 = "one", everything else = "other"
/// assert_eq!(plural_category("en_US", 1).unwrap(), "one");
/// assert_eq!(plural_category("en_US", 0).unwrap(), "other");
///
/// // Russian: complex rules for "one", "few", "many", "other"
/// assert_eq!(plural_category("ru", 2).unwrap(), "few");
/// assert_eq!(plural_category("ru", 5).unwrap(), "many");
/// ```
pub fn plural_category(locale: &str, n: i64) -> Result<&'static str, StyleError> {
    PLURAL_RULES_CACHE.with_borrow_mut(|cache| {
        if let Some((_, rules)) = cache.iter().find(|(tag, _)| tag == locale) {
            return Ok(category_str(rules.category_for(n)));
        }
        let rules = build_rules(locale)?;
        debug!(locale, "loaded plural rules");
        let category = category_str(rules.category_for(n));
        cache.push((locale.to_string(), rules));
        Ok(category)
    })
}
