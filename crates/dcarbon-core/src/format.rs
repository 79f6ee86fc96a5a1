//! Number formatting shared by every table.

/// Format a number without trailing zeros: `50.0` → `50`, `12.50` → `12.5`.
pub fn format_number(value: f64) -> String {
    // Normalise -0.0 so it never prints as "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

/// Dollar amount with thousands separators: `1234567.5` → `$1,234,567.50`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    format!("{sign}${}.{frac:02}", group_thousands(whole))
}

/// Dollar amount with no cents when it is whole: `50000` → `$50,000`.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value >= 0.0 {
        format!("${}", group_thousands(value as u64))
    } else {
        format_currency(value)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"-"` for a missing value, the formatted value otherwise.
pub fn or_dash(value: Option<f64>, fmt: fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "-".to_string())
}
