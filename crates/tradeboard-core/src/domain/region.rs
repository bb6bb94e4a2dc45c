use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// National aggregate used as the "whole country" geo value.
pub const CANADA: &str = "Canada";

/// Canonical province and territory names, in map order.
pub const PROVINCES_AND_TERRITORIES: [&str; 13] = [
    "Alberta",
    "British Columbia",
    "Manitoba",
    "New Brunswick",
    "Newfoundland and Labrador",
    "Northwest Territories",
    "Nova Scotia",
    "Nunavut",
    "Ontario",
    "Prince Edward Island",
    "Québec",
    "Saskatchewan",
    "Yukon",
];

const ALIASES: [(&str, &str); 3] = [
    ("quebec", "Québec"),
    ("yukon territory", "Yukon"),
    ("newfoundland", "Newfoundland and Labrador"),
];

/// A province, territory or the national aggregate, always in canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Parse a geo name, resolving aliases such as `Quebec` to `Québec`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let folded = trimmed.to_lowercase();

        if folded == CANADA.to_lowercase() {
            return Ok(Self::canada());
        }

        if let Some(name) = PROVINCES_AND_TERRITORIES
            .iter()
            .find(|name| name.to_lowercase() == folded)
        {
            return Ok(Self((*name).to_owned()));
        }

        if let Some((_, canonical)) = ALIASES.iter().find(|(alias, _)| *alias == folded) {
            return Ok(Self((*canonical).to_owned()));
        }

        Err(ValidationError::UnknownRegion {
            value: trimmed.to_owned(),
        })
    }

    pub fn canada() -> Self {
        Self(CANADA.to_owned())
    }

    /// All provinces and territories, excluding the national aggregate.
    pub fn provinces() -> impl Iterator<Item = Region> {
        PROVINCES_AND_TERRITORIES
            .iter()
            .map(|name| Self((*name).to_owned()))
    }

    pub fn is_canada(&self) -> bool {
        self.0 == CANADA
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Region {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Region {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.0
    }
}
