//! SMO record builder
//!
//! A [`Record`] accumulates the fields of one review before it is handed to a
//! [`Submitter`](crate::Submitter). Structural values (supplier id, record id,
//! review timestamp) are rejected with [`Error::InvalidInput`]; optional
//! content that fails validation (ratings, tag and license urls, resource
//! identifiers) is dropped without an error.

use crate::types::{License, Rating, SimpleField, SimpleFields, Tag};
use crate::validation::{is_resource_uri, is_review_timestamp, is_url};
use crate::vcard::reviewer_vcard;
use crate::{Error, Result};
use tracing::debug;

/// One submitted metadata object (SMO)
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    supplier_id: String,
    record_id: Option<String>,
    user_id: Option<String>,
    fields: SimpleFields,
    rating: Option<Rating>,
    tags: Vec<Tag>,
    license: Option<License>,
    has_content: bool,
    has_resource: bool,
}

impl Record {
    /// Create an empty record for a (whitelisted) supplier
    pub fn new(supplier_id: impl Into<String>) -> Result<Self> {
        let supplier_id = supplier_id.into();
        if supplier_id.is_empty() {
            return Err(Error::InvalidInput("Use a valid SMB supplierId".to_string()));
        }

        Ok(Self {
            supplier_id,
            record_id: None,
            user_id: None,
            fields: SimpleFields::default(),
            rating: None,
            tags: Vec::new(),
            license: None,
            has_content: false,
            has_resource: false,
        })
    }

    /// Set the record id, prefixing it with `"<supplier_id>."` when needed
    pub fn set_record_id(&mut self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidInput("Use a non empty SMO ID".to_string()));
        }

        let prefix = format!("{}.", self.supplier_id);
        self.record_id = Some(if id.starts_with(&prefix) {
            id.to_string()
        } else {
            format!("{}{}", prefix, id)
        });
        Ok(())
    }

    /// Set the user id (ignored when blank)
    pub fn set_user_id(&mut self, id: &str) {
        let id = id.trim();
        if !id.is_empty() {
            self.user_id = Some(id.to_string());
        }
    }

    /// Set the reviewed resource; anything but a URN or URL is ignored
    pub fn set_resource_uri(&mut self, uri: &str) {
        if is_resource_uri(uri) {
            self.has_resource = true;
            self.fields.set(SimpleField::Info, uri);
        } else {
            debug!("Ignoring resource identifier that is neither URN nor URL: {:?}", uri);
        }
    }

    /// Set the free-text review
    pub fn set_comment(&mut self, text: &str) {
        if self.fields.set(SimpleField::Description, text) {
            self.has_content = true;
        }
    }

    /// Set the overall rating; invalid triples are dropped
    pub fn set_rating(&mut self, value: f64, worst: f64, best: f64) {
        match Rating::new(value, worst, best) {
            Some(rating) => {
                self.rating = Some(rating);
                self.has_content = true;
            }
            None => debug!(value, worst, best, "Dropping invalid rating"),
        }
    }

    /// Append a tag with optional reference url and `(value, worst, best)` rating
    pub fn set_tag(&mut self, name: &str, reference: Option<&str>, rating: Option<(f64, f64, f64)>) {
        if name.is_empty() {
            return;
        }

        let rating = rating.and_then(|(value, worst, best)| {
            let valid = Rating::new(value, worst, best);
            if valid.is_none() {
                debug!(tag = name, value, worst, best, "Dropping invalid tag rating");
            }
            valid
        });

        let reference = reference.filter(|r| !r.is_empty()).and_then(|r| {
            if is_url(r) {
                Some(r.to_string())
            } else {
                debug!(tag = name, "Dropping tag reference that is not a URL: {:?}", r);
                None
            }
        });

        self.has_content = true;
        self.tags.push(Tag {
            name: name.to_string(),
            reference,
            rating,
        });
    }

    /// Build and set the reviewer vCard.
    ///
    /// `id` becomes the user id unless one is already set.
    pub fn set_reviewer_vcard(
        &mut self,
        name: &str,
        firstname: Option<&str>,
        organisation: Option<&str>,
        id: Option<&str>,
    ) {
        if let Some(id) = id.filter(|id| !id.trim().is_empty()) {
            if self.user_id.is_none() {
                self.user_id = Some(id.trim().to_string());
            }
        }

        if !name.is_empty() {
            self.fields
                .set(SimpleField::Reviewer, reviewer_vcard(name, firstname, organisation));
        }
    }

    /// Set an already formatted vCard as reviewer
    pub fn set_raw_reviewer_vcard(&mut self, vcard: &str) {
        self.fields.set(SimpleField::Reviewer, vcard);
    }

    /// Set the review timestamp (`YYYY-MM-DDTHH:MM:SS` + `Z` or `±HH:MM`)
    pub fn set_reviewed_at(&mut self, timestamp: &str) -> Result<()> {
        if !is_review_timestamp(timestamp) {
            return Err(Error::InvalidInput(format!("Not a valid date: {}", timestamp)));
        }
        self.fields.set(SimpleField::DtReviewed, timestamp);
        Ok(())
    }

    /// Set the license description.
    ///
    /// The reference is replaced only by a URL; otherwise any earlier
    /// reference stays.
    pub fn set_license(&mut self, description: &str, reference: Option<&str>) {
        if description.is_empty() {
            return;
        }

        let license = self.license.get_or_insert_with(License::default);
        license.description = description.to_string();
        match reference {
            Some(r) if is_url(r) => license.reference = Some(r.to_string()),
            Some(r) => debug!("Keeping license reference, new one is not a URL: {:?}", r),
            None => {}
        }
    }

    /// Generic simple field setter.
    ///
    /// Resource, comment and timestamp go through their validating setters.
    pub fn set_field(&mut self, field: SimpleField, value: &str) -> Result<()> {
        match field {
            SimpleField::Info => self.set_resource_uri(value),
            SimpleField::Description => self.set_comment(value),
            SimpleField::DtReviewed => self.set_reviewed_at(value)?,
            other => {
                self.fields.set(other, value);
            }
        }
        Ok(())
    }

    /// Set summary
    pub fn set_summary(&mut self, summary: &str) {
        self.fields.set(SimpleField::Summary, summary);
    }

    /// Set version of the reviewed resource
    pub fn set_version(&mut self, version: &str) {
        self.fields.set(SimpleField::Version, version);
    }

    /// Set review type
    pub fn set_type(&mut self, review_type: &str) {
        self.fields.set(SimpleField::Type, review_type);
    }

    /// Set permalink
    pub fn set_permalink(&mut self, permalink: &str) {
        self.fields.set(SimpleField::Permalink, permalink);
    }

    // Submitter hooks

    pub(crate) fn stamp_reviewed_at(&mut self, timestamp: String) {
        self.fields.set(SimpleField::DtReviewed, timestamp);
    }

    pub(crate) fn assign_record_id(&mut self, id: String) {
        self.record_id = Some(id);
    }

    // Accessors

    /// Supplier id
    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }

    /// Record id (always `supplier_id.` prefixed when set locally)
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// User id
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Reviewed resource
    pub fn resource_uri(&self) -> Option<&str> {
        self.fields.get(SimpleField::Info)
    }

    /// Free-text review
    pub fn comment(&self) -> Option<&str> {
        self.fields.get(SimpleField::Description)
    }

    /// Review timestamp
    pub fn reviewed_at(&self) -> Option<&str> {
        self.fields.get(SimpleField::DtReviewed)
    }

    /// Any simple field
    pub fn field(&self, field: SimpleField) -> Option<&str> {
        self.fields.get(field)
    }

    /// All simple fields
    pub fn fields(&self) -> &SimpleFields {
        &self.fields
    }

    /// Overall rating
    pub fn rating(&self) -> Option<&Rating> {
        self.rating.as_ref()
    }

    /// Tags in insertion order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// License
    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    /// A comment, rating or tag has been set
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// A valid resource identifier has been set
    pub fn has_resource(&self) -> bool {
        self.has_resource
    }
}
