/// Formats an amount with thousands separators and two decimals, e.g.
/// `1234567.891` becomes `1,234,567.89`.
pub fn format_amount(value: f64) -> String {
    with_separators(&format!("{value:.2}"))
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_amount(value))
}

/// Interest column text: gains carry an explicit `+`.
///
/// Losses keep their own `-` instead of rendering as `+-x.xx`, so the column
/// always shows a single sign.
pub fn format_gain(value: f64) -> String {
    if value < 0.0 {
        format_amount(value)
    } else {
        format!("+{}", format_amount(value))
    }
}

/// Y-axis tick text. Magnitudes collapse to K/M/B/T with two decimals.
pub fn axis_label(value: f64) -> String {
    if value >= 1e12 {
        return format!("${:.2}T", value * 1e-12);
    }
    if value >= 1e9 {
        return format!("${:.2}B", value * 1e-9);
    }
    if value >= 1e6 {
        return format!("${:.2}M", value * 1e-6);
    }
    if value >= 1e3 {
        return format!("${:.2}K", value * 1e-3);
    }
    format!("${}", with_separators(&format!("{value:.0}")))
}

fn with_separators(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return formatted.to_string();
    }

    let mut out = String::with_capacity(formatted.len() + whole.len() / 3);
    out.push_str(sign);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
