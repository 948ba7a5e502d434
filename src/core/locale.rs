use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

const EN_US_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Locale data used when formatting axis and marker labels.
///
/// Month names are substituted for `%B`/`%b` before the remaining strftime
/// directives are handed to chrono.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub name: String,
    pub months: Vec<String>,
    pub short_months: Vec<String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl Locale {
    #[must_use]
    pub fn en_us() -> Self {
        Self {
            name: "en-US".to_owned(),
            months: EN_US_MONTHS.iter().map(|m| (*m).to_owned()).collect(),
            short_months: EN_US_MONTHS.iter().map(|m| m[..3].to_owned()).collect(),
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.months.len() != 12 || self.short_months.len() != 12 {
            return Err(ChartError::InvalidData(format!(
                "locale `{}` must define exactly 12 month names",
                self.name
            )));
        }
        Ok(self)
    }

    pub fn format_date(&self, date: DateTime<Utc>, pattern: &str) -> ChartResult<String> {
        let month = date.month0() as usize;
        let (Some(long), Some(short)) = (self.months.get(month), self.short_months.get(month))
        else {
            return Err(ChartError::InvalidData(format!(
                "locale `{}` has no name for month {}",
                self.name,
                month + 1
            )));
        };
        let pattern = pattern.replace("%B", long).replace("%b", short);
        let items = parse_pattern(&pattern)?;
        let mut out = String::new();
        write!(out, "{}", date.format_with_items(items.into_iter())).map_err(|_| {
            ChartError::InvalidData(format!("failed to format date with `{pattern}`"))
        })?;
        Ok(out)
    }
}

/// Rejects strftime patterns chrono cannot render.
pub fn validate_date_pattern(pattern: &str) -> ChartResult<()> {
    parse_pattern(pattern).map(|_| ())
}

fn parse_pattern(pattern: &str) -> ChartResult<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ChartError::InvalidData(format!(
            "invalid date format pattern `{pattern}`"
        )));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::{Locale, validate_date_pattern};
    use chrono::{TimeZone, Utc};

    #[test]
    fn default_locale_formats_short_month() {
        let date = Utc.with_ymd_and_hms(2023, 3, 7, 0, 0, 0).unwrap();
        let text = Locale::default().format_date(date, "%b %d").unwrap();
        assert_eq!(text, "Mar 07");
    }

    #[test]
    fn custom_month_names_are_substituted() {
        let mut locale = Locale::en_us();
        locale.name = "de-DE".to_owned();
        locale.short_months[2] = "Mär".to_owned();
        let date = Utc.with_ymd_and_hms(2023, 3, 7, 0, 0, 0).unwrap();
        assert_eq!(locale.format_date(date, "%d. %b").unwrap(), "07. Mär");
    }

    #[test]
    fn incomplete_locale_is_rejected() {
        let mut locale = Locale::en_us();
        locale.months.pop();
        assert!(locale.validate().is_err());
    }

    #[test]
    fn broken_pattern_is_rejected() {
        assert!(validate_date_pattern("%Q").is_err());
        assert!(validate_date_pattern("%Y-%m-%d").is_ok());
    }
}
