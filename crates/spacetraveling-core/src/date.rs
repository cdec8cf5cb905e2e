//! Locale-aware publication date formatting.

use chrono::{
    DateTime, Locale, Utc,
    format::{Item, StrftimeItems},
};

use crate::error::{CoreError, Result};

/// Formats publication timestamps for display.
///
/// The pattern is validated up front so that formatting itself cannot fail.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    locale: Locale,
    pattern: String,
}

impl DateFormatter {
    /// Create a formatter for a POSIX locale name (e.g. `pt_BR`) and a
    /// strftime pattern.
    pub fn new(locale: &str, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let parsed = Locale::try_from(locale)
            .map_err(|_| CoreError::date_format(format!("unknown date locale: {locale}")))?;

        if StrftimeItems::new_with_locale(&pattern, parsed).any(|item| matches!(item, Item::Error))
        {
            return Err(CoreError::date_format(format!(
                "invalid date pattern: {pattern}"
            )));
        }

        Ok(Self {
            locale: parsed,
            pattern,
        })
    }

    /// Format a timestamp.
    #[must_use]
    pub fn format(&self, at: &DateTime<Utc>) -> String {
        at.format_localized(&self.pattern, self.locale).to_string()
    }

    /// Format an optional timestamp, yielding an empty string for `None`.
    #[must_use]
    pub fn format_optional(&self, at: Option<&DateTime<Utc>>) -> String {
        at.map(|at| self.format(at)).unwrap_or_default()
    }

    /// The strftime pattern in use.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
