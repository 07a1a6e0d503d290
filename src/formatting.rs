use chrono::{Datelike, NaiveDate};

use crate::document::Rgb;

/// Names and volume multiples
pub const NAME_BLUE: Rgb = Rgb::new(0x00, 0x70, 0xC0);
pub const GREEN: Rgb = Rgb::new(0x00, 0xB0, 0x50);
pub const RED: Rgb = Rgb::new(0xC0, 0x00, 0x00);
pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// Text rendered where no value is available
pub const MISSING: &str = "-";

/// Colour of a signed value: green above zero, red below, black otherwise
pub fn sign_color(value: Option<f64>) -> Rgb {
    match value {
        Some(v) if v > 0.0 => GREEN,
        Some(v) if v < 0.0 => RED,
        _ => BLACK,
    }
}

/// Fractional change as a percentage, e.g. `+2.04%` or `-0.51%`
pub fn format_percent(variation: Option<f64>) -> String {
    match variation {
        Some(v) if v.is_finite() => {
            let pct = v * 100.0;
            if v > 0.0 {
                format!("+{:.2}%", pct)
            } else {
                format!("{:.2}%", pct)
            }
        }
        _ => MISSING.to_string(),
    }
}

/// Price with two decimals and spaces between thousands, e.g. `18 342.50`
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| p.is_finite()) else {
        return MISSING.to_string();
    };

    let fixed = format!("{:.2}", price.abs());
    let (integer, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    format!("{}{}.{}", sign, grouped, decimals)
}

/// Volume multiple, e.g. `2.35x`
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}x", ratio)
}

/// English ordinal suffix of a day of month
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Report date, e.g. `January 21st 2026`
pub fn format_report_date(date: NaiveDate) -> String {
    format!(
        "{} {}{} {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}
