//! Display formatting for prices, ratios and dollar amounts.

use crate::risk::{Availability, PositionView};

/// Format with `,` thousands separators and a fixed number of decimals.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Ticker-style price: precision shrinks as the price grows.
///
/// A zero price has not loaded yet and renders as `"..."`.
pub fn format_price(price: f64) -> String {
    if price == 0.0 {
        "...".to_string()
    } else if price >= 1000.0 {
        format_thousands(price, 2)
    } else if price >= 1.0 {
        format!("{price:.2}")
    } else if price >= 0.01 {
        format!("{price:.4}")
    } else {
        format!("{price:.6}")
    }
}

/// `$24.7K`, `$18.2M`, or plain dollars below a thousand.
pub fn format_compact_usd(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    // Tier on the rounded figure so 999_999 reads $1.0M, not $1000.0K
    let rounded_k = (abs / 100.0).round() / 10.0;
    let rounded_cents = (abs * 100.0).round() / 100.0;
    if abs >= 1_000_000.0 || rounded_k >= 1_000.0 {
        format!("{sign}${:.1}M", abs / 1_000_000.0)
    } else if rounded_cents >= 1_000.0 {
        format!("{sign}${:.1}K", abs / 1_000.0)
    } else {
        format!("{sign}${abs:.2}")
    }
}

/// Ratio cell: `"137.5%"`, `"∞"` without debt, `"—"` when unpriced.
pub fn format_ratio(view: &PositionView<'_>) -> String {
    match (view.availability, view.ratio) {
        (Availability::Priced, Some(ratio)) => format!("{ratio:.1}%"),
        (Availability::NoDebt, _) => "∞".to_string(),
        _ => "—".to_string(),
    }
}

/// Optional ratio for summary headers.
pub fn format_optional_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "—".to_string(), |r| format!("{r:.1}%"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::Classifier;
    use crate::types::{Position, PriceSnapshot};

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0, 2), "0.00");
        assert_eq!(format_thousands(999.6, 0), "1,000");
        assert_eq!(format_thousands(67_340.0, 2), "67,340.00");
        assert_eq!(format_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(-2_450.0, 0), "-2,450");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_price_tiers() {
        assert_eq!(format_price(0.0), "...");
        assert_eq!(format_price(67_340.0), "67,340.00");
        assert_eq!(format_price(645.2), "645.20");
        assert_eq!(format_price(1.0), "1.00");
        assert_eq!(format_price(0.0842), "0.0842");
        assert_eq!(format_price(0.001234), "0.001234");
    }

    #[test]
    fn test_format_compact_usd() {
        assert_eq!(format_compact_usd(24_700.0), "$24.7K");
        assert_eq!(format_compact_usd(18_200_000.0), "$18.2M");
        assert_eq!(format_compact_usd(950.0), "$950.00");
        assert_eq!(format_compact_usd(-1_500.0), "-$1.5K");
    }

    #[test]
    fn test_format_compact_usd_tier_rounding() {
        assert_eq!(format_compact_usd(999_999.0), "$1.0M");
        assert_eq!(format_compact_usd(999_950.0), "$1.0M");
        assert_eq!(format_compact_usd(999_949.0), "$999.9K");
        assert_eq!(format_compact_usd(999.999), "$1.0K");
        assert_eq!(format_compact_usd(999.99), "$999.99");
    }

    #[test]
    fn test_format_ratio_cells() {
        let prices = PriceSnapshot::new().with_price("USD", 1.0);
        let positions = vec![
            Position::new("a", "USD", 137.5, 100.0),
            Position::new("b", "USD", 1.0, 0.0),
            Position::new("c", "WSOL", 1.0, 1.0),
        ];
        let views = Classifier::default().assess(&positions, &prices);
        assert_eq!(format_ratio(&views[0]), "137.5%");
        assert_eq!(format_ratio(&views[1]), "∞");
        assert_eq!(format_ratio(&views[2]), "—");
        assert_eq!(format_optional_ratio(None), "—");
        assert_eq!(format_optional_ratio(Some(160.0)), "160.0%");
    }
}
