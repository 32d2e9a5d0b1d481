//! Answer sets.
//!
//! An answer set is a flat JSON object mapping logical field names to scalar
//! values. Values are kept as they were written and only interpreted when a
//! field asks for them: text fields use [`AnswerValue::as_text`], button
//! groups use [`AnswerValue::normalize`].

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Tokens (after trimming and lower-casing) that count as a "yes".
pub const TRUTHY_TOKENS: [&str; 5] = ["true", "yes", "on", "1", "y"];

/// One answer value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    /// Free text, boolean-like token or digit string
    Text(String),
    /// JSON integer; doubles as an explicit choice index
    Integer(i64),
    /// JSON boolean
    Boolean(bool),
    /// Non-integral JSON number, kept as its JSON text (`2.0` stays "2.0")
    Number(String),
}

/// Answer value reduced to what button groups care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAnswer {
    /// The answer reads as a "yes"
    pub truthy: bool,
    /// The answer names a zero-based widget position
    pub explicit_index: Option<i64>,
}

impl AnswerValue {
    /// Convert a JSON value; `null` and structured values have no answer form.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(AnswerValue::Text(s.clone())),
            Value::Bool(b) => Some(AnswerValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(AnswerValue::Integer(i))
                } else if n.as_u64().is_some() {
                    Some(AnswerValue::Integer(i64::MAX))
                } else {
                    Some(AnswerValue::Number(n.to_string()))
                }
            },
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// String form written into text and choice fields.
    pub fn as_text(&self) -> String {
        match self {
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Integer(i) => i.to_string(),
            AnswerValue::Boolean(b) => b.to_string(),
            AnswerValue::Number(n) => n.clone(),
        }
    }

    /// Truthiness and explicit index of this answer.
    ///
    /// Booleans carry intent only; they never become an explicit index.
    pub fn normalize(&self) -> NormalizedAnswer {
        let text = self.as_text();
        let trimmed = text.trim();
        let norm = trimmed.to_lowercase();
        let truthy = TRUTHY_TOKENS.contains(&norm.as_str());

        let explicit_index = match self {
            AnswerValue::Integer(i) => Some(*i),
            AnswerValue::Text(_) if is_digit_string(trimmed) => {
                // All ASCII digits, so the only possible failure is overflow
                Some(trimmed.parse::<i64>().unwrap_or(i64::MAX))
            },
            _ => None,
        };

        NormalizedAnswer {
            truthy,
            explicit_index,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other.as_text()),
        }
    }
}

fn is_digit_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Answers keyed by logical field name, in file order.
#[derive(Debug, Clone, Default)]
pub struct AnswerSet {
    values: IndexMap<String, AnswerValue>,
}

impl AnswerSet {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load answers from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::AnswersNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let answers = Self::from_json_str(&text)?;
        log::info!("Loaded {} answers from {}", answers.len(), path.display());
        Ok(answers)
    }

    /// Parse answers from JSON text.
    ///
    /// The document must be a JSON object. `null` entries are treated as
    /// unanswered; arrays and objects are skipped with a warning.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(entries) = root else {
            return Err(Error::InvalidAnswers(
                "top-level JSON value must be an object".to_string(),
            ));
        };

        let mut values = IndexMap::with_capacity(entries.len());
        for (name, value) in &entries {
            match AnswerValue::from_json(value) {
                Some(answer) => {
                    values.insert(name.clone(), answer);
                },
                None if value.is_null() => {},
                None => log::warn!("Answer for '{}' is not a scalar; ignoring it", name),
            }
        }
        Ok(Self { values })
    }

    /// Set one answer.
    pub fn insert(&mut self, name: impl Into<String>, value: AnswerValue) {
        self.values.insert(name.into(), value);
    }

    /// Answer for a logical field.
    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.values.get(name)
    }

    /// Field names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AnswerValue)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, AnswerValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.to_string())
    }

    #[test]
    fn test_truthy_tokens() {
        for token in ["yes", "YES", " True ", "on", "1", "y", "Y"] {
            assert!(text(token).normalize().truthy, "{token:?} should be truthy");
        }
        for token in ["no", "false", "off", "0", "n", "", "maybe", "2"] {
            assert!(!text(token).normalize().truthy, "{token:?} should be falsy");
        }
    }

    #[test]
    fn test_explicit_index_from_digits() {
        assert_eq!(text("2").normalize().explicit_index, Some(2));
        assert_eq!(text(" 07 ").normalize().explicit_index, Some(7));
        assert_eq!(text("0").normalize().explicit_index, Some(0));
        assert_eq!(text("-1").normalize().explicit_index, None);
        assert_eq!(text("1.5").normalize().explicit_index, None);
        assert_eq!(text("yes").normalize().explicit_index, None);
        assert_eq!(
            text("99999999999999999999999").normalize().explicit_index,
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_integer_answer() {
        let norm = AnswerValue::Integer(1).normalize();
        assert!(norm.truthy);
        assert_eq!(norm.explicit_index, Some(1));

        let norm = AnswerValue::Integer(3).normalize();
        assert!(!norm.truthy);
        assert_eq!(norm.explicit_index, Some(3));
    }

    #[test]
    fn test_boolean_answer_has_no_index() {
        let norm = AnswerValue::Boolean(true).normalize();
        assert!(norm.truthy);
        assert_eq!(norm.explicit_index, None);
        assert!(!AnswerValue::Boolean(false).normalize().truthy);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(text("Jane").as_text(), "Jane");
        assert_eq!(AnswerValue::Integer(42).as_text(), "42");
        assert_eq!(AnswerValue::Boolean(false).as_text(), "false");
        assert_eq!(AnswerValue::Number("1.5".to_string()).as_text(), "1.5");
    }

    #[test]
    fn test_from_json_str() {
        let answers = AnswerSet::from_json_str(
            r#"{"name": "Jane", "age": 41, "agree": true, "skip": null, "list": [1, 2], "ratio": 0.5}"#,
        )
        .unwrap();
        assert_eq!(answers.len(), 4);
        assert_eq!(answers.get("name"), Some(&text("Jane")));
        assert_eq!(answers.get("age"), Some(&AnswerValue::Integer(41)));
        assert_eq!(answers.get("agree"), Some(&AnswerValue::Boolean(true)));
        assert_eq!(answers.get("ratio"), Some(&AnswerValue::Number("0.5".to_string())));
        assert!(answers.get("skip").is_none());
        assert!(answers.get("list").is_none());
    }

    #[test]
    fn test_fractional_numbers_keep_their_text() {
        let answers = AnswerSet::from_json_str(r#"{"one": 1.0, "two": 2.0}"#).unwrap();
        let one = answers.get("one").unwrap();
        assert_eq!(one.as_text(), "1.0");
        // "1.0" is neither a truthy token nor a digit string
        assert_eq!(
            one.normalize(),
            NormalizedAnswer {
                truthy: false,
                explicit_index: None
            }
        );
        assert_eq!(answers.get("two").unwrap().as_text(), "2.0");
    }

    #[test]
    fn test_from_json_str_rejects_non_object() {
        assert!(matches!(
            AnswerSet::from_json_str("[1, 2, 3]"),
            Err(Error::InvalidAnswers(_))
        ));
        assert!(matches!(AnswerSet::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let err = AnswerSet::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, Error::AnswersNotFound(_)));
    }

    #[test]
    fn test_collect_answer_set() {
        let answers: AnswerSet = [("a", text("x")), ("b", AnswerValue::Integer(0))]
            .into_iter()
            .collect();
        assert_eq!(answers.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
