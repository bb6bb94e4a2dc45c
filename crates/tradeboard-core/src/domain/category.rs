use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Label of the rollup row aggregating every category.
pub const ROLLUP: &str = "All sections";

/// Goods/services classification with a case-folded comparison key.
///
/// Two categories are equal when their keys match, so `Energy products` and
/// `energy products ` refer to the same row. The label keeps the spelling it
/// was first constructed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category {
    label: String,
    key: String,
}

impl Category {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let label = normalize_category(input);
        if label.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        if label.eq_ignore_ascii_case(ROLLUP) {
            return Ok(Self::rollup());
        }

        let key = label.to_lowercase();
        Ok(Self { label, key })
    }

    pub fn rollup() -> Self {
        Self {
            label: ROLLUP.to_owned(),
            key: ROLLUP.to_lowercase(),
        }
    }

    pub fn is_rollup(&self) -> bool {
        self.key == ROLLUP.to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Canonical form of a raw category string.
///
/// Trims, collapses runs of whitespace and strips a trailing classification
/// code such as ` [C12]` left over from the statistical export.
pub fn normalize_category(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    strip_classification_code(&collapsed).to_owned()
}

fn strip_classification_code(value: &str) -> &str {
    let Some(inner) = value.strip_suffix(']') else {
        return value;
    };
    let Some(open) = inner.rfind(" [") else {
        return value;
    };

    let code = &inner[open + 2..];
    if !code.is_empty() && code.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        value[..open].trim_end()
    } else {
        value
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Category {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Category {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_classification_suffix() {
        assert_eq!(
            normalize_category("Energy products [C12]"),
            "Energy products"
        );
        assert_eq!(
            normalize_category("  Metal   ores and non-metallic minerals  "),
            "Metal ores and non-metallic minerals"
        );
    }

    #[test]
    fn keeps_brackets_that_are_not_codes() {
        assert_eq!(
            normalize_category("Services [travel, transport]"),
            "Services [travel, transport]"
        );
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let left = Category::parse("Energy Products").expect("parse");
        let right = Category::parse("energy products ").expect("parse");
        assert_eq!(left, right);
        assert_eq!(left.as_str(), "Energy Products");
    }

    #[test]
    fn rollup_is_detected_in_any_case() {
        let rollup = Category::parse("ALL SECTIONS").expect("parse");
        assert!(rollup.is_rollup());
        assert_eq!(rollup.as_str(), ROLLUP);
    }

    #[test]
    fn rejects_blank_category() {
        let err = Category::parse("   ").expect_err("must fail");
        assert!(matches!(err, ValidationError::EmptyCategory));
    }
}
