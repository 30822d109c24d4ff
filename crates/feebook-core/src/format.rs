use chrono::{
    format::{Item, StrftimeItems},
    NaiveDate,
};

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Plain decimal rendering used by exports: no symbol, no grouping, no trailing `.0`.
pub fn plain_amount(amount: f64) -> String {
    if amount == 0.0 {
        return "0".into();
    }
    amount.to_string()
}

/// Human-facing formatter driven by the configured date pattern.
#[derive(Debug, Clone)]
pub struct DisplayFormatter {
    date_format: String,
}

impl DisplayFormatter {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new("%d %b %Y")
    }
}

impl CurrencyFormatter for DisplayFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let fixed = format!("{:.2}", amount.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        format!("{sign}{currency}{}.{fraction}", group_thousands(whole))
    }
}

impl DateFormatter for DisplayFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        let items: Vec<Item<'_>> = StrftimeItems::new(&self.date_format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return date.to_string();
        }
        date.format_with_items(items.into_iter()).to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_amount_drops_trailing_zero_fraction() {
        assert_eq!(plain_amount(1500.0), "1500");
        assert_eq!(plain_amount(1500.5), "1500.5");
        assert_eq!(plain_amount(-0.0), "0");
    }

    #[test]
    fn display_formatter_groups_and_prefixes_symbol() {
        let formatter = DisplayFormatter::default();
        assert_eq!(formatter.format_amount(1234567.5, "₹"), "₹1,234,567.50");
        assert_eq!(formatter.format_amount(-300.0, "$"), "-$300.00");
    }

    #[test]
    fn invalid_date_pattern_falls_back_to_iso() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        assert_eq!(DisplayFormatter::default().format_date(date), "01 Sep 2023");
        assert_eq!(DisplayFormatter::new("%Q").format_date(date), "2023-09-01");
    }
}
