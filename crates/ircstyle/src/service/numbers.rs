//! Locale-aware number and currency formatting.

/// Decimal and grouping symbols of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal: char,
    pub group: char,
}

/// Symbols used by a language, defaulting to English conventions.
pub fn number_symbols(language: &str) -> NumberSymbols {
    let (decimal, group) = match language {
        "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "el" | "ro" | "da" | "vi" => (',', '.'),
        "fr" => (',', '\u{202F}'),
        "ru" | "uk" | "pl" | "cs" | "sk" | "fi" | "sv" | "nb" | "hu" | "bg" => (',', '\u{A0}'),
        _ => ('.', ','),
    };
    NumberSymbols { decimal, group }
}

/// Languages that write the currency symbol after the amount.
fn symbol_follows_amount(language: &str) -> bool {
    matches!(
        language,
        "de" | "fr" | "es" | "it" | "ru" | "uk" | "pl" | "cs" | "sk" | "fi" | "sv" | "nb" | "da"
            | "ro" | "el" | "hu" | "bg"
    )
}

/// ISO 4217 code, display symbol and number of minor-unit digits.
const CURRENCIES: &[(&str, &str, usize)] = &[
    ("USD", "$", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("JPY", "¥", 0),
    ("CNY", "CN¥", 2),
    ("KRW", "₩", 0),
    ("INR", "₹", 2),
    ("RUB", "₽", 2),
    ("BRL", "R$", 2),
    ("CAD", "CA$", 2),
    ("AUD", "A$", 2),
    ("CHF", "CHF", 2),
];

/// Currency used in a region, falling back to one implied by the language.
pub fn local_currency(language: &str, region: Option<&str>) -> &'static str {
    let by_region = region.and_then(|region| match region {
        "US" => Some("USD"),
        "GB" => Some("GBP"),
        "JP" => Some("JPY"),
        "CN" => Some("CNY"),
        "KR" => Some("KRW"),
        "IN" => Some("INR"),
        "RU" => Some("RUB"),
        "BR" => Some("BRL"),
        "CA" => Some("CAD"),
        "AU" => Some("AUD"),
        "CH" => Some("CHF"),
        "DE" | "FR" | "ES" | "IT" | "NL" | "BE" | "AT" | "PT" | "FI" | "IE" | "GR" => Some("EUR"),
        _ => None,
    });
    by_region.unwrap_or(match language {
        "en" => "USD",
        "de" | "fr" | "es" | "it" | "nl" | "pt" | "fi" | "el" => "EUR",
        "ja" => "JPY",
        "zh" => "CNY",
        "ko" => "KRW",
        "ru" => "RUB",
        _ => "XXX",
    })
}

/// Insert group separators into a run of integer digits.
fn group_digits(digits: &str, group: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len().div_euclid(3));
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).rem_euclid(3) == 0 {
            out.push(group);
        }
        out.push(c);
    }
    out
}

/// Localize a plain `123456.789` rendering of a non-negative number.
fn localize_digits(plain: &str, symbols: NumberSymbols) -> String {
    match plain.split_once('.') {
        Some((int, frac)) => format!(
            "{}{}{frac}",
            group_digits(int, symbols.group),
            symbols.decimal
        ),
        None => group_digits(plain, symbols.group),
    }
}

/// Format a float with every significant digit and grouped thousands.
///
/// ```
/// use ircstyle::service::format_float;
///
/// assert_eq!(format_float(12345.67891, "en"), "12,345.67891");
/// assert_eq!(format_float(-0.5, "de"), "-0,5");
/// ```
pub fn format_float(value: f64, language: &str) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    let body = localize_digits(&value.abs().to_string(), number_symbols(language));
    if value < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

/// Format a monetary amount, rounded to the currency's minor units.
///
/// ```
/// use ircstyle::service::format_currency;
///
/// assert_eq!(format_currency(12345.67891, "EUR", "en"), "€12,345.68");
/// assert_eq!(format_currency(1234.5, "EUR", "de"), "1.234,50\u{a0}€");
/// assert_eq!(format_currency(3.0, "XYZ", "en"), "XYZ\u{a0}3.00");
/// ```
pub fn format_currency(amount: f64, code: &str, language: &str) -> String {
    let (symbol, digits) = CURRENCIES
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(code))
        .map_or((code, 2), |&(_, symbol, digits)| (symbol, digits));
    let plain = format!("{:.digits$}", amount.abs());
    let body = localize_digits(&plain, number_symbols(language));
    let sign = if amount < 0.0 && plain.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    let symbol_is_code = symbol.chars().all(|c| c.is_ascii_alphabetic());
    if symbol_follows_amount(language) {
        format!("{sign}{body}\u{A0}{symbol}")
    } else if symbol_is_code {
        format!("{sign}{symbol}\u{A0}{body}")
    } else {
        format!("{sign}{symbol}{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_thousands() {
        assert_eq!(group_digits("1234567", ','), "1,234,567");
        assert_eq!(group_digits("123", ','), "123");
        assert_eq!(group_digits("1000", ','), "1,000");
    }

    #[test]
    fn floats_use_locale_symbols() {
        assert_eq!(format_float(1234.5, "fr"), "1\u{202F}234,5");
        assert_eq!(format_float(3.0, "en"), "3");
        assert_eq!(format_float(1e20, "en"), "100,000,000,000,000,000,000");
    }

    #[test]
    fn currency_rounds_to_minor_units() {
        assert_eq!(format_currency(1234.6, "JPY", "en"), "¥1,235");
        assert_eq!(format_currency(-12.0, "USD", "en"), "-$12.00");
        assert_eq!(format_currency(-0.001, "USD", "en"), "$0.00");
    }

    #[test]
    fn local_currency_prefers_region() {
        assert_eq!(local_currency("en", Some("GB")), "GBP");
        assert_eq!(local_currency("en", None), "USD");
        assert_eq!(local_currency("fr", Some("CH")), "CHF");
    }
}
