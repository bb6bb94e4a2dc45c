//! Number and label formatting shared by every view.

/// Abbreviate a CAD amount for the summary cards.
///
/// `|v| >= 1e6` renders in millions, `|v| >= 1e3` in thousands, anything
/// smaller as whole dollars: `CA$ 12M`, `CA$ 450K`, `CA$ 999`.
pub fn format_large_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e6 {
        format!("CA$ {}M", group_thousands(value / 1e6))
    } else if magnitude >= 1e3 {
        format!("CA$ {}K", group_thousands(value / 1e3))
    } else {
        format!("CA$ {}", group_thousands(value))
    }
}

/// Whole-dollar currency label used on treemap tooltips: `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let grouped = group_thousands(value.abs());
    if value.round() < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Y-axis tick label in millions: `12 M`, `(3) M` for negatives.
pub fn format_millions(value: f64) -> String {
    let millions = value / 1e6;
    if millions.round() < 0.0 {
        format!("({}) M", group_thousands(millions.abs()))
    } else {
        format!("{} M", group_thousands(millions))
    }
}

/// Round to a whole number and insert `,` every three digits.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Wrap a category name onto lines no wider than `width` characters.
///
/// Words longer than `width` keep their own line.
pub fn wrap_label(label: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut a label to `max_chars`, ending with an ellipsis when shortened.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }
    if max_chars == 0 {
        return String::new();
    }

    let kept = label
        .chars()
        .take(max_chars - 1)
        .collect::<String>();
    format!("{}…", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_by_magnitude() {
        assert_eq!(format_large_number(12_400_000.0), "CA$ 12M");
        assert_eq!(format_large_number(1_234_567_890.0), "CA$ 1,235M");
        assert_eq!(format_large_number(450_400.0), "CA$ 450K");
        assert_eq!(format_large_number(999.0), "CA$ 999");
        assert_eq!(format_large_number(-300_000_000.0), "CA$ -300M");
    }

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_currency(1_234_567.4), "$1,234,567");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(-2500.0), "-$2,500");
    }

    #[test]
    fn formats_axis_ticks_in_millions() {
        assert_eq!(format_millions(12_000_000.0), "12 M");
        assert_eq!(format_millions(-3_000_000.0), "(3) M");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(100.0), "100");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(-1_000_000.0), "-1,000,000");
    }

    #[test]
    fn wraps_long_labels() {
        let lines = wrap_label("Metal ores and non-metallic minerals", 16);
        assert_eq!(
            lines,
            vec!["Metal ores and", "non-metallic", "minerals"]
        );
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_label("Energy products", 20), "Energy products");
        assert_eq!(truncate_label("Energy products", 8), "Energy…");
    }
}
