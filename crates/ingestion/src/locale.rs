//! Locale-aware number parsing and rendering.
//!
//! The production export writes decimals with a comma (`1,5`) and the
//! deviation column with a percent suffix (`-3,2%`).

/// Parse a number that may use a comma as decimal separator.
///
/// Every comma is treated as a decimal point, so values with thousands
/// separators fail to parse. NaN is reported as `None`.
pub fn parse_locale_number(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if !v.is_nan() => Some(v),
        _ => None,
    }
}

/// Parse a percentage such as `5%` or `-3,2 %`. The value is not scaled.
pub fn parse_percent(raw: &str) -> Option<f64> {
    parse_locale_number(&raw.replace('%', ""))
}

/// Render a number in shortest round-trip form.
///
/// Integral values keep a `.0` suffix and magnitudes outside `[1e-4, 1e16)`
/// use scientific notation with a signed, two-digit exponent (`1e-07`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Render a number with a custom decimal separator.
pub fn format_number_with_decimal(value: f64, decimal_separator: char) -> String {
    let rendered = format_number(value);
    if decimal_separator == '.' {
        rendered
    } else {
        rendered.replace('.', &decimal_separator.to_string())
    }
}
