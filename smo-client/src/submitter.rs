//! SMO submission (insert / update / migrate / delete)

use crate::record::Record;
use crate::request::build_request_body;
use crate::response::interpret_response;
use crate::transport::Transport;
use crate::types::RequestKind;
use crate::validation::is_review_timestamp;
use crate::{Error, Result};
use chrono::{Local, SecondsFormat};
use tracing::{error, info};

/// Current local time as `YYYY-MM-DDTHH:MM:SS±HH:MM`
pub fn now_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Submits records through a [`Transport`]
#[derive(Debug)]
pub struct Submitter<T> {
    transport: T,
}

impl<T: Transport> Submitter<T> {
    /// Create submitter
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Insert the record and store the record id assigned by the service.
    ///
    /// The review timestamp defaults to now when unset.
    pub fn create(&self, record: &mut Record) -> Result<()> {
        require_content(record)?;
        if record.reviewed_at().is_none() {
            record.stamp_reviewed_at(now_timestamp());
        }

        if let Some(record_id) = self.submit(record, RequestKind::Create)? {
            record.assign_record_id(record_id);
        }
        Ok(())
    }

    /// Replace an existing record; the review timestamp is always reset to now
    pub fn update(&self, record: &mut Record) -> Result<()> {
        require_record_id(record)?;
        require_content(record)?;
        record.stamp_reviewed_at(now_timestamp());

        self.submit(record, RequestKind::Update).map(|_| ())
    }

    /// Update that keeps the caller-supplied review timestamp.
    ///
    /// Used when re-pointing existing records to a new resource.
    pub fn migrate_update(&self, record: &Record) -> Result<()> {
        require_record_id(record)?;
        require_content(record)?;
        require_reviewed_at(record)?;

        self.submit(record, RequestKind::Update).map(|_| ())
    }

    /// Remove an existing record
    pub fn delete(&self, record: &Record) -> Result<()> {
        require_record_id(record)?;

        self.submit(record, RequestKind::Delete).map(|_| ())
    }

    fn submit(&self, record: &Record, kind: RequestKind) -> Result<Option<String>> {
        let body = build_request_body(record, kind)?;
        let operation = kind.operation();

        info!(
            supplier_id = record.supplier_id(),
            record_id = record.record_id().unwrap_or("-"),
            "Sending {}",
            operation
        );

        let response = self.transport.invoke(operation, &body).map_err(|e| {
            error!("{} failed: {}", operation, e);
            Error::from(e)
        })?;

        interpret_response(&response, kind)
    }
}

/// Request body that a submission of `kind` would send, without sending it
pub fn preview(record: &Record, kind: RequestKind) -> Result<String> {
    let mut record = record.clone();
    match kind {
        RequestKind::Update => record.stamp_reviewed_at(now_timestamp()),
        RequestKind::Create if record.reviewed_at().is_none() => {
            record.stamp_reviewed_at(now_timestamp())
        }
        _ => {}
    }
    build_request_body(&record, kind)
}

/// Request body that [`Submitter::migrate_update`] would send.
///
/// Keeps the record's own review timestamp, which must be present and valid.
pub fn preview_migrate(record: &Record) -> Result<String> {
    require_reviewed_at(record)?;
    build_request_body(record, RequestKind::Update)
}

fn require_content(record: &Record) -> Result<()> {
    if !record.has_content() || !record.has_resource() {
        return Err(Error::PreconditionFailed(
            "Provide at least a comment, rating or tag and a resource".to_string(),
        ));
    }
    Ok(())
}

fn require_reviewed_at(record: &Record) -> Result<()> {
    match record.reviewed_at() {
        None => Err(Error::InvalidInput("Missing date".to_string())),
        Some(ts) if !is_review_timestamp(ts) => {
            Err(Error::InvalidInput(format!("Not a valid date: {}", ts)))
        }
        Some(_) => Ok(()),
    }
}

fn require_record_id(record: &Record) -> Result<()> {
    if record.record_id().is_none() {
        return Err(Error::PreconditionFailed("Use an existing SMO id".to_string()));
    }
    Ok(())
}
