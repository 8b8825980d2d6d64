//! Group labels: category pairs for group metrics and boolean attributes
//! for intersectional analysis.

use serde::{Deserialize, Serialize};

use crate::column::ColumnName;
use crate::record::{CaseRecord, PREMIUM_FULL, PREMIUM_LIMITED, REQUESTER_GP, REQUESTER_SURGEON};

/// Two values of a categorical attribute, compared as `|rate(a) - rate(b)|`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupPair {
    pub a: String,
    pub b: String,
}

impl GroupPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// `GP` versus `Surgeon`.
    pub fn requester() -> Self {
        Self::new(REQUESTER_GP, REQUESTER_SURGEON)
    }

    /// `Limited` versus `Full` premium tier.
    pub fn premium() -> Self {
        Self::new(PREMIUM_LIMITED, PREMIUM_FULL)
    }
}

impl std::fmt::Display for GroupPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} vs {}", self.a, self.b)
    }
}

/// Boolean attributes that can be combined in intersectional analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolAttribute {
    PremiumLimited,
    RequesterGp,
    LocationRural,
    ClinicalNecessity,
}

impl BoolAttribute {
    pub fn as_str(&self) -> &'static str {
        self.column().as_str()
    }

    /// Schema column holding this attribute.
    pub fn column(&self) -> ColumnName {
        match self {
            BoolAttribute::PremiumLimited => ColumnName::PremiumLimited,
            BoolAttribute::RequesterGp => ColumnName::RequesterGp,
            BoolAttribute::LocationRural => ColumnName::LocationRural,
            BoolAttribute::ClinicalNecessity => ColumnName::ClinicalNecessity,
        }
    }

    /// Attribute value for one record.
    pub fn value(&self, record: &CaseRecord) -> bool {
        match self {
            BoolAttribute::PremiumLimited => record.is_premium_limited(),
            BoolAttribute::RequesterGp => record.is_requester_gp(),
            BoolAttribute::LocationRural => record.location_rural,
            BoolAttribute::ClinicalNecessity => record.clinical_necessity,
        }
    }
}

impl std::fmt::Display for BoolAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pairs() {
        assert_eq!(GroupPair::requester().to_string(), "GP vs Surgeon");
        assert_eq!(GroupPair::premium(), GroupPair::new("Limited", "Full"));
    }

    #[test]
    fn attribute_values_follow_records() {
        let record = CaseRecord {
            requester_type: "Surgeon".into(),
            premium_level: "Limited".into(),
            location_rural: true,
            ..Default::default()
        };
        assert!(BoolAttribute::PremiumLimited.value(&record));
        assert!(!BoolAttribute::RequesterGp.value(&record));
        assert!(BoolAttribute::LocationRural.value(&record));
        assert!(!BoolAttribute::ClinicalNecessity.value(&record));
        assert_eq!(BoolAttribute::RequesterGp.as_str(), "requester_gp");
    }

    #[test]
    fn attributes_parse_from_snake_case() {
        let attr: BoolAttribute = serde_json::from_str("\"location_rural\"").unwrap();
        assert_eq!(attr, BoolAttribute::LocationRural);
    }
}
