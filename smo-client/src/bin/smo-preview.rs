//! Dry-run binary: builds an SMO from a TOML description and prints the
//! request body that would be submitted.
//!
//! ```text
//! SMO_SUPPLIER_ID=kennisnet smo-preview review.toml [create|update|migrate|delete]
//! ```

use anyhow::{bail, Context};
use serde::Deserialize;
use smo_client::{preview, preview_migrate, ClientConfig, Record, RequestKind};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Deserialize)]
struct RatingDescription {
    value: f64,
    worst: f64,
    best: f64,
}

#[derive(Debug, Deserialize)]
struct TagDescription {
    name: String,
    #[serde(rename = "ref")]
    reference: Option<String>,
    rating: Option<RatingDescription>,
}

#[derive(Debug, Deserialize)]
struct ReviewerDescription {
    name: String,
    firstname: Option<String>,
    organisation: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LicenseDescription {
    description: String,
    #[serde(rename = "ref")]
    reference: Option<String>,
}

/// Record fields as written in the TOML description
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecordDescription {
    record_id: Option<String>,
    user_id: Option<String>,
    resource: Option<String>,
    comment: Option<String>,
    summary: Option<String>,
    version: Option<String>,
    #[serde(rename = "type")]
    review_type: Option<String>,
    permalink: Option<String>,
    reviewed_at: Option<String>,
    reviewer: Option<ReviewerDescription>,
    reviewer_vcard: Option<String>,
    rating: Option<RatingDescription>,
    tags: Vec<TagDescription>,
    license: Option<LicenseDescription>,
}

impl RecordDescription {
    fn apply(&self, record: &mut Record) -> smo_client::Result<()> {
        if let Some(ref id) = self.record_id {
            record.set_record_id(id)?;
        }
        if let Some(ref id) = self.user_id {
            record.set_user_id(id);
        }
        if let Some(ref uri) = self.resource {
            record.set_resource_uri(uri);
        }
        if let Some(ref comment) = self.comment {
            record.set_comment(comment);
        }
        if let Some(ref summary) = self.summary {
            record.set_summary(summary);
        }
        if let Some(ref version) = self.version {
            record.set_version(version);
        }
        if let Some(ref review_type) = self.review_type {
            record.set_type(review_type);
        }
        if let Some(ref permalink) = self.permalink {
            record.set_permalink(permalink);
        }
        if let Some(ref ts) = self.reviewed_at {
            record.set_reviewed_at(ts)?;
        }
        if let Some(ref reviewer) = self.reviewer {
            record.set_reviewer_vcard(
                &reviewer.name,
                reviewer.firstname.as_deref(),
                reviewer.organisation.as_deref(),
                reviewer.id.as_deref(),
            );
        }
        if let Some(ref vcard) = self.reviewer_vcard {
            record.set_raw_reviewer_vcard(vcard);
        }
        if let Some(ref rating) = self.rating {
            record.set_rating(rating.value, rating.worst, rating.best);
        }
        for tag in &self.tags {
            record.set_tag(
                &tag.name,
                tag.reference.as_deref(),
                tag.rating.as_ref().map(|r| (r.value, r.worst, r.best)),
            );
        }
        if let Some(ref license) = self.license {
            record.set_license(&license.description, license.reference.as_deref());
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(record_path) = args.next() else {
        bail!("usage: smo-preview <record.toml> [create|update|migrate|delete]");
    };
    // migrate sends an update but keeps the record's own timestamp
    let (kind, migrate) = match args.next().as_deref() {
        Some(arg) if arg.eq_ignore_ascii_case("migrate") => (RequestKind::Update, true),
        Some(arg) => (arg.parse::<RequestKind>()?, false),
        None => (RequestKind::Create, false),
    };

    // Load configuration
    let config = if let Ok(config_path) = std::env::var("SMO_CONFIG") {
        info!("Loading config from: {}", config_path);
        ClientConfig::from_file(&config_path)?
    } else {
        ClientConfig::from_env()?
    };
    info!(
        supplier_id = %config.supplier_id,
        wsdl = config.wsdl_location(),
        "Previewing {} request",
        if migrate { "migrate".to_string() } else { kind.to_string() }
    );

    let content = std::fs::read_to_string(&record_path)
        .with_context(|| format!("Failed to read {}", record_path))?;
    let description: RecordDescription =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", record_path))?;

    let mut record = config.new_record()?;
    description.apply(&mut record)?;

    if kind != RequestKind::Delete && !(record.has_content() && record.has_resource()) {
        tracing::warn!("Record lacks content or resource; the service call would be refused");
    }

    println!("<!-- operation: {} -->", kind.operation());
    let body = if migrate {
        preview_migrate(&record)?
    } else {
        preview(&record, kind)?
    };
    println!("{}", body);
    Ok(())
}
