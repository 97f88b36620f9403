//! # SMO Client
//!
//! Builds and submits SMO records (submitted metadata objects: reviews with
//! ratings, comments, tags, reviewer and license) to the SMB service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   build_request_body   ┌────────────────┐
//! │    Record    │ ─────────────────────▶ │   Submitter    │
//! │  (setters)   │ ◀───────────────────── │ create/update/ │
//! └──────────────┘   assigned record id   │ migrate/delete │
//!                                         └───────┬────────┘
//!                                                 │ invoke(operation, body)
//!                                         ┌───────▼────────┐
//!                                         │   Transport    │
//!                                         │ (SOAP engine)  │
//!                                         └────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use smo_client::{Record, Submitter, Transport, TransportError};
//!
//! struct Soap;
//!
//! impl Transport for Soap {
//!     fn invoke(&self, _operation: &str, _body: &str) -> Result<String, TransportError> {
//!         // hand the body to the SOAP engine bound to the service WSDL
//!         Err(TransportError::new("not connected"))
//!     }
//! }
//!
//! fn main() -> smo_client::Result<()> {
//!     let mut record = Record::new("kennisnet")?;
//!     record.set_resource_uri("urn:isbn:0-486-27557-4");
//!     record.set_comment("this is ok");
//!     record.set_rating(4.0, 1.0, 5.0);
//!
//!     Submitter::new(Soap).create(&mut record)?;
//!     println!("stored as {:?}", record.record_id());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod record;
pub mod request;
pub mod response;
pub mod submitter;
pub mod transport;
pub mod types;
pub mod validation;
pub mod vcard;

pub use config::{ClientConfig, Environment};
pub use error::{Error, Result};
pub use record::Record;
pub use request::build_request_body;
pub use response::{interpret_response, parse_response, Node};
pub use submitter::{preview, preview_migrate, Submitter};
pub use transport::{Transport, TransportError};
pub use types::*;

/// SMO envelope namespace (`smd`)
pub const SMD_NS: &str = "http://xsd.kennisnet.nl/smd/1.0/";

/// hReview namespace
pub const HREVIEW_NS: &str = "http://xsd.kennisnet.nl/smd/hreview/1.0/";

/// SOAP 1.1 envelope namespace used in responses
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
