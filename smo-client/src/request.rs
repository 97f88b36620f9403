//! SMO request body serialization
//!
//! The service validates against an order-sensitive schema, so elements are
//! written in a fixed sequence:
//!
//! ```text
//! smd:smo
//! ├── smd:supplierId
//! ├── smd:userId            (optional)
//! ├── smd:smoId             (optional)
//! └── hreview:hReview       (not for deletes)
//!     ├── info, summary, version, reviewer, description, dtreviewed, type, permalink
//!     ├── rating, worst, best
//!     ├── tags/tag/{name, ref, rating@worst@best}
//!     └── license/{description, ref}
//! ```

use crate::record::Record;
use crate::types::{License, Rating, RequestKind, Tag};
use crate::{Error, Result, HREVIEW_NS, SMD_NS};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Serialize a record into the request body for `kind`
pub fn build_request_body(record: &Record, kind: RequestKind) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut root = BytesStart::new("smd:smo");
    root.push_attribute(("xmlns:smd", SMD_NS));
    root.push_attribute(("xmlns:hreview", HREVIEW_NS));
    write_event(&mut writer, Event::Start(root))?;

    write_element(&mut writer, "smd:supplierId", record.supplier_id())?;
    if let Some(user_id) = record.user_id() {
        write_element(&mut writer, "smd:userId", user_id)?;
    }
    if let Some(record_id) = record.record_id() {
        write_element(&mut writer, "smd:smoId", record_id)?;
    }

    if kind.carries_review() {
        write_review(&mut writer, record)?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("smd:smo")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))
}

fn write_review(writer: &mut XmlWriter, record: &Record) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new("hreview:hReview")))?;

    for (field, value) in record.fields().iter() {
        write_element(writer, &format!("hreview:{}", field.element_name()), value)?;
    }

    if let Some(rating) = record.rating() {
        write_element(writer, "hreview:rating", &format_number(rating.value))?;
        write_element(writer, "hreview:worst", &format_number(rating.worst))?;
        write_element(writer, "hreview:best", &format_number(rating.best))?;
    }

    if !record.tags().is_empty() {
        write_event(writer, Event::Start(BytesStart::new("hreview:tags")))?;
        for tag in record.tags() {
            write_tag(writer, tag)?;
        }
        write_event(writer, Event::End(BytesEnd::new("hreview:tags")))?;
    }

    if let Some(license) = record.license() {
        write_license(writer, license)?;
    }

    write_event(writer, Event::End(BytesEnd::new("hreview:hReview")))
}

fn write_tag(writer: &mut XmlWriter, tag: &Tag) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new("hreview:tag")))?;

    write_element(writer, "hreview:name", &tag.name)?;
    if let Some(ref reference) = tag.reference {
        write_element(writer, "hreview:ref", reference)?;
    }
    if let Some(ref rating) = tag.rating {
        write_scaled_rating(writer, rating)?;
    }

    write_event(writer, Event::End(BytesEnd::new("hreview:tag")))
}

/// Tag ratings carry their scale as attributes
fn write_scaled_rating(writer: &mut XmlWriter, rating: &Rating) -> Result<()> {
    let worst = format_number(rating.worst);
    let best = format_number(rating.best);

    let mut start = BytesStart::new("hreview:rating");
    start.push_attribute(("hreview:worst", worst.as_str()));
    start.push_attribute(("hreview:best", best.as_str()));
    write_event(writer, Event::Start(start))?;
    write_text(writer, &format_number(rating.value))?;
    write_event(writer, Event::End(BytesEnd::new("hreview:rating")))
}

fn write_license(writer: &mut XmlWriter, license: &License) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new("hreview:license")))?;

    write_element(writer, "hreview:description", &license.description)?;
    if let Some(ref reference) = license.reference {
        write_element(writer, "hreview:ref", reference)?;
    }

    write_event(writer, Event::End(BytesEnd::new("hreview:license")))
}

fn write_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(tag)))?;
    write_text(writer, text)?;
    write_event(writer, Event::End(BytesEnd::new(tag)))
}

/// Escaped text with line feeds as `&#xA;` references (vCard blocks)
fn write_text(writer: &mut XmlWriter, text: &str) -> Result<()> {
    let escaped = partial_escape(text).replace('\n', "&#xA;");
    write_event(writer, Event::Text(BytesText::from_escaped(escaped)))
}

fn write_event(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Serialization(e.to_string()))
}

/// Shortest decimal form: `5`, `-1`, `3.5`
fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    value.to_string()
}
