//! Turning an `/ask` payload into the text shown in the conversation.
//!
//! The formatter is a pure function over an [`AskResponse`] and a set of
//! [`Labels`].  Fields that are missing or empty are replaced by the locale's
//! fallback text, so the result is always displayable.

use std::fmt;
use std::str::FromStr;

use crate::types::AskResponse;

/// Captions and fallback texts used when rendering an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Caption in front of the answer.
    pub answer: String,
    /// Caption in front of the category.
    pub category: String,
    /// Caption in front of the subcategory.
    pub subcategory: String,
    /// Shown when the payload has no answer.
    pub missing_answer: String,
    /// Shown when the payload has no category.
    pub missing_category: String,
    /// Shown when the payload has no subcategory.
    pub missing_subcategory: String,
    /// The bot message appended when the endpoint cannot be reached.
    pub connection_error: String,
}

impl Labels {
    /// The Russian labels the support widget ships with.
    pub fn russian() -> Self {
        Self {
            answer: "Ответ".to_string(),
            category: "Категория".to_string(),
            subcategory: "Подкатегория".to_string(),
            missing_answer: "нет данных".to_string(),
            missing_category: "не указана".to_string(),
            missing_subcategory: "не указана".to_string(),
            connection_error: "Ошибка подключения к серверу.".to_string(),
        }
    }

    /// English labels.
    pub fn english() -> Self {
        Self {
            answer: "Answer".to_string(),
            category: "Category".to_string(),
            subcategory: "Subcategory".to_string(),
            missing_answer: "no data".to_string(),
            missing_category: "uncategorized".to_string(),
            missing_subcategory: "no subcategory".to_string(),
            connection_error: "Connection error.".to_string(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::russian()
    }
}

impl From<Locale> for Labels {
    fn from(locale: Locale) -> Self {
        match locale {
            Locale::Russian => Labels::russian(),
            Locale::English => Labels::english(),
        }
    }
}

/// The label presets that can be selected by name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// Russian (`ru`).
    #[default]
    Russian,

    /// English (`en`).
    English,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Russian => write!(f, "ru"),
            Locale::English => write!(f, "en"),
        }
    }
}

/// Error returned when parsing an unknown locale name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleParseError {
    /// The value that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for LocaleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown locale: {} (expected 'ru' or 'en')",
            self.invalid_value
        )
    }
}

impl std::error::Error for LocaleParseError {}

impl FromStr for Locale {
    type Err = LocaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" | "russian" => Ok(Locale::Russian),
            "en" | "english" => Ok(Locale::English),
            _ => Err(LocaleParseError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

/// Builds the display string for a payload.
///
/// The three fields are laid out as labelled lines separated by a blank line.
/// A field counts as present when it is `Some` and not the empty string; any
/// other value, `"0"` included, is shown verbatim.
pub fn format_answer(payload: &AskResponse, labels: &Labels) -> String {
    let answer = present_or(&payload.answer, &labels.missing_answer);
    let category = present_or(&payload.category, &labels.missing_category);
    let subcategory = present_or(&payload.subcategory, &labels.missing_subcategory);
    format!(
        "{}: {answer}\n\n{}: {category}\n\n{}: {subcategory}",
        labels.answer, labels.category, labels.subcategory,
    )
    .trim()
    .to_string()
}

/// [`format_answer`] with the default (Russian) labels.
pub fn format_answer_default(payload: &AskResponse) -> String {
    format_answer(payload, &Labels::default())
}

fn present_or<'a>(field: &'a Option<String>, fallback: &'a str) -> &'a str {
    match field.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_present() {
        let payload = AskResponse::new("X").with_category("Y").with_subcategory("Z");
        let text = format_answer_default(&payload);
        assert_eq!(text, "Ответ: X\n\nКатегория: Y\n\nПодкатегория: Z");
    }

    #[test]
    fn empty_payload_uses_fallbacks() {
        let text = format_answer(&AskResponse::default(), &Labels::english());
        assert!(text.contains("no data"));
        assert!(text.contains("uncategorized"));
        assert!(text.contains("no subcategory"));
        assert!(!text.contains("undefined"));
        assert!(!text.contains("null"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let payload = AskResponse {
            answer: Some(String::new()),
            category: Some(String::new()),
            subcategory: None,
        };
        assert_eq!(
            format_answer_default(&payload),
            "Ответ: нет данных\n\nКатегория: не указана\n\nПодкатегория: не указана"
        );
    }

    #[test]
    fn zero_answer_is_kept() {
        let payload = AskResponse::new("0").with_category("0");
        let text = format_answer(&payload, &Labels::english());
        assert_eq!(
            text,
            "Answer: 0\n\nCategory: 0\n\nSubcategory: no subcategory"
        );
    }

    #[test]
    fn whitespace_answer_is_kept() {
        // Only the outer edges of the whole string are trimmed.
        let payload = AskResponse::new(" ");
        let text = format_answer_default(&payload);
        assert!(text.starts_with("Ответ:  \n\n"));
    }

    #[test]
    fn locale_parsing() {
        assert_eq!("ru".parse::<Locale>().unwrap(), Locale::Russian);
        assert_eq!(" EN ".parse::<Locale>().unwrap(), Locale::English);
        let err = "de".parse::<Locale>().unwrap_err();
        assert_eq!(err.invalid_value, "de");
        assert_eq!(Locale::English.to_string(), "en");
        assert_eq!(Labels::from(Locale::English), Labels::english());
    }
}
