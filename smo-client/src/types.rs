//! Shared types for SMO records

use crate::validation::is_valid_rating;
use serde::{Deserialize, Serialize};

/// Rating within a scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Rating value
    pub value: f64,
    /// Low end of scale
    pub worst: f64,
    /// High end of scale
    pub best: f64,
}

impl Rating {
    /// Build a rating, or `None` when the triple is not a valid rating
    pub fn new(value: f64, worst: f64, best: f64) -> Option<Self> {
        is_valid_rating(value, worst, best).then_some(Self { value, worst, best })
    }
}

/// Tag with optional reference url and rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Reference url (only kept when syntactically valid)
    pub reference: Option<String>,
    /// Rating of the tag
    pub rating: Option<Rating>,
}

/// License statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License description (e.g. "CC-BY-30")
    pub description: String,
    /// License url
    pub reference: Option<String>,
}

/// Single-valued hReview fields
///
/// Declaration order is the order in which they are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleField {
    /// Reviewed resource (URN or URL)
    Info,
    /// Summary
    Summary,
    /// Version of the reviewed resource
    Version,
    /// Reviewer vCard
    Reviewer,
    /// Free-text comment
    Description,
    /// Review timestamp
    #[serde(rename = "dtreviewed")]
    DtReviewed,
    /// Review type
    Type,
    /// Permalink to the review
    Permalink,
}

impl SimpleField {
    /// All fields in serialization order
    pub const ALL: [SimpleField; 8] = [
        SimpleField::Info,
        SimpleField::Summary,
        SimpleField::Version,
        SimpleField::Reviewer,
        SimpleField::Description,
        SimpleField::DtReviewed,
        SimpleField::Type,
        SimpleField::Permalink,
    ];

    /// Local element name in the hReview namespace
    pub fn element_name(&self) -> &'static str {
        match self {
            SimpleField::Info => "info",
            SimpleField::Summary => "summary",
            SimpleField::Version => "version",
            SimpleField::Reviewer => "reviewer",
            SimpleField::Description => "description",
            SimpleField::DtReviewed => "dtreviewed",
            SimpleField::Type => "type",
            SimpleField::Permalink => "permalink",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for SimpleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Values of all simple fields, indexed by [`SimpleField`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleFields {
    values: [Option<String>; 8],
}

impl SimpleFields {
    /// Get a field value
    pub fn get(&self, field: SimpleField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Set a field value; empty values are ignored
    pub fn set(&mut self, field: SimpleField, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.values[field.index()] = Some(value);
        true
    }

    /// Non-empty fields in serialization order
    pub fn iter(&self) -> impl Iterator<Item = (SimpleField, &str)> + '_ {
        SimpleField::ALL
            .iter()
            .filter_map(move |field| self.get(*field).map(|value| (*field, value)))
    }
}

/// Kind of request sent to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Insert a new SMO
    Create,
    /// Replace an existing SMO
    Update,
    /// Remove an existing SMO
    Delete,
}

impl RequestKind {
    /// Service operation name
    pub fn operation(&self) -> &'static str {
        match self {
            RequestKind::Create => "insertSMO",
            RequestKind::Update => "updateSMO",
            RequestKind::Delete => "deleteSMO",
        }
    }

    /// Whether the payload carries the hReview block
    pub fn carries_review(&self) -> bool {
        !matches!(self, RequestKind::Delete)
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Create => write!(f, "create"),
            RequestKind::Update => write!(f, "update"),
            RequestKind::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for RequestKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" | "insert" => Ok(RequestKind::Create),
            "update" => Ok(RequestKind::Update),
            "delete" => Ok(RequestKind::Delete),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown request kind: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_new() {
        assert!(Rating::new(0.0, -1.0, 5.0).is_some());
        assert!(Rating::new(6.0, 0.0, 5.0).is_none());
        assert!(Rating::new(2.0, 2.0, 2.0).is_none());
    }

    #[test]
    fn test_simple_fields_order_and_overwrite() {
        let mut fields = SimpleFields::default();
        fields.set(SimpleField::Permalink, "http://example.org/p");
        fields.set(SimpleField::Info, "urn:isbn:1");
        fields.set(SimpleField::Summary, "first");
        fields.set(SimpleField::Summary, "second");
        assert!(!fields.set(SimpleField::Version, ""));

        let names: Vec<_> = fields.iter().map(|(f, _)| f.element_name()).collect();
        assert_eq!(names, vec!["info", "summary", "permalink"]);
        assert_eq!(fields.get(SimpleField::Summary), Some("second"));
        assert_eq!(fields.get(SimpleField::Version), None);
    }

    #[test]
    fn test_request_kind() {
        assert_eq!(RequestKind::Create.operation(), "insertSMO");
        assert_eq!(RequestKind::Update.operation(), "updateSMO");
        assert_eq!(RequestKind::Delete.operation(), "deleteSMO");
        assert!(!RequestKind::Delete.carries_review());
        assert_eq!("Insert".parse::<RequestKind>().unwrap(), RequestKind::Create);
        assert!("upsert".parse::<RequestKind>().is_err());
        // migrate keeps its own timestamp and is not a plain update
        assert!("migrate".parse::<RequestKind>().is_err());
    }
}
