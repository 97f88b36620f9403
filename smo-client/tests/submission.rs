//! End-to-end submission tests against a stub transport

use smo_client::{Error, Record, RequestKind, Submitter, Transport, TransportError};
use std::cell::RefCell;

const INSERT_OK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:smd="http://xsd.kennisnet.nl/smd/1.0/" xmlns:hreview="http://xsd.kennisnet.nl/smd/hreview/1.0/">
  <soapenv:Body>
    <smd:response>
      <smd:responseSmo>
        <smd:smo>
          <smd:supplierId>kennisnet</smd:supplierId>
          <smd:smoId>kennisnet.b5e2f7a0</smd:smoId>
          <hreview:hReview>
            <hreview:info>urn:isbn:0-486-27557-4</hreview:info>
          </hreview:hReview>
        </smd:smo>
      </smd:responseSmo>
    </smd:response>
  </soapenv:Body>
</soapenv:Envelope>"#;

const NOT_FOUND: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:smd="http://xsd.kennisnet.nl/smd/1.0/">
  <soapenv:Body>
    <smd:errorResponse>
      <smd:error>
        <smd:code>404</smd:code>
        <smd:description>not found</smd:description>
      </smd:error>
    </smd:errorResponse>
  </soapenv:Body>
</soapenv:Envelope>"#;

/// Replays one canned reply and records every request
struct StubTransport {
    reply: Result<String, TransportError>,
    requests: RefCell<Vec<(String, String)>>,
}

impl StubTransport {
    fn replying(body: &str) -> Self {
        Self {
            reply: Ok(body.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(TransportError::new(message)),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn last_request(&self) -> (String, String) {
        self.requests.borrow().last().cloned().expect("no request sent")
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for StubTransport {
    fn invoke(&self, operation: &str, body: &str) -> Result<String, TransportError> {
        self.requests
            .borrow_mut()
            .push((operation.to_string(), body.to_string()));
        self.reply.clone()
    }
}

fn example_record() -> Record {
    let mut record = Record::new("kennisnet").unwrap();
    record.set_resource_uri("urn:isbn:0-486-27557-4");
    record.set_version("1.0");
    record.set_reviewed_at("2014-02-11T11:59:42+01:00").unwrap();
    record.set_comment("this is ok");
    record.set_rating(0.0, -1.0, 5.0);
    record.set_reviewer_vcard("butts", Some("seymour"), None, Some("1"));
    record.set_tag("keurmerk", None, None);
    record.set_tag("future", Some("http://technoratie.com/tags/future"), None);
    record.set_tag("leesbaarheid", None, Some((5.0, 1.0, 5.0)));
    record.set_license("CC-BY-30", Some("http://creativecommons.org/licenses/by/3.0/"));
    record
}

#[test]
fn test_create_stores_assigned_record_id() {
    let submitter = Submitter::new(StubTransport::replying(INSERT_OK));
    let mut record = example_record();
    assert_eq!(record.record_id(), None);

    submitter.create(&mut record).unwrap();

    assert_eq!(record.record_id(), Some("kennisnet.b5e2f7a0"));
    let (operation, body) = submitter.transport().last_request();
    assert_eq!(operation, "insertSMO");
    assert!(body.starts_with("<smd:smo "));
    assert!(body.contains("<smd:userId>1</smd:userId>"));
    assert!(body.contains("<hreview:dtreviewed>2014-02-11T11:59:42+01:00</hreview:dtreviewed>"));
}

#[test]
fn test_create_without_content_is_refused() {
    let submitter = Submitter::new(StubTransport::replying(INSERT_OK));
    let mut record = Record::new("kn").unwrap();
    record.set_resource_uri("http://example.org/resource");

    let err = submitter.create(&mut record).unwrap_err();
    assert!(matches!(err, Error::PreconditionFailed(_)));
    assert_eq!(submitter.transport().request_count(), 0);
}

#[test]
fn test_create_without_resource_is_refused() {
    let submitter = Submitter::new(StubTransport::replying(INSERT_OK));
    let mut record = Record::new("kn").unwrap();
    record.set_comment("orphan");
    record.set_resource_uri("no resource");

    assert!(matches!(
        submitter.create(&mut record),
        Err(Error::PreconditionFailed(_))
    ));
}

#[test]
fn test_remote_error_surfaces_code_and_message() {
    let submitter = Submitter::new(StubTransport::replying(NOT_FOUND));
    let mut record = example_record();

    match submitter.create(&mut record) {
        Err(Error::Remote { code, message }) => {
            assert_eq!(code, "404");
            assert_eq!(message, "not found");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    assert_eq!(record.record_id(), None);
}

#[test]
fn test_transport_failure_propagates_unchanged() {
    let submitter = Submitter::new(StubTransport::failing("connection reset"));
    let mut record = example_record();
    record.set_record_id("1").unwrap();

    match submitter.update(&mut record) {
        Err(Error::Transport(e)) => assert_eq!(e, TransportError::new("connection reset")),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(submitter.transport().request_count(), 1);
}

#[test]
fn test_unparseable_response_is_bad_response() {
    let submitter = Submitter::new(StubTransport::replying("<html><body>502 Bad Gateway"));
    let mut record = example_record();

    assert!(matches!(
        submitter.create(&mut record),
        Err(Error::BadResponse(_))
    ));
}

#[test]
fn test_delete_payload_has_only_identifiers() {
    let submitter = Submitter::new(StubTransport::replying(
        "<Envelope><Body><response/></Body></Envelope>",
    ));
    let mut record = example_record();
    record.set_record_id("smbphp.1").unwrap();

    submitter.delete(&record).unwrap();

    let (operation, body) = submitter.transport().last_request();
    assert_eq!(operation, RequestKind::Delete.operation());
    assert_eq!(
        body,
        "<smd:smo xmlns:smd=\"http://xsd.kennisnet.nl/smd/1.0/\" \
         xmlns:hreview=\"http://xsd.kennisnet.nl/smd/hreview/1.0/\">\
         <smd:supplierId>kennisnet</smd:supplierId>\
         <smd:userId>1</smd:userId>\
         <smd:smoId>kennisnet.smbphp.1</smd:smoId></smd:smo>"
    );
}

#[test]
fn test_migration_repoints_resource_keeping_date() {
    let submitter = Submitter::new(StubTransport::replying(
        "<Envelope><Body><response/></Body></Envelope>",
    ));

    let mut record = Record::new("kennisnet").unwrap();
    record.set_record_id("kennisnet.99").unwrap();
    record.set_user_id("reviewer-42");
    record.set_resource_uri("http://new.example.org/lesson/7");
    record.set_comment("nice lesson");
    record.set_reviewed_at("2012-05-01T08:00:00Z").unwrap();
    record.set_raw_reviewer_vcard("BEGIN:VCARD\nVERSION:3.0\nFN:J. Doe\nEND:VCARD");

    submitter.migrate_update(&record).unwrap();

    let (operation, body) = submitter.transport().last_request();
    assert_eq!(operation, "updateSMO");
    assert!(body.contains("<hreview:info>http://new.example.org/lesson/7</hreview:info>"));
    assert!(body.contains("<hreview:dtreviewed>2012-05-01T08:00:00Z</hreview:dtreviewed>"));
    assert!(body.contains(
        "<hreview:reviewer>BEGIN:VCARD&#xA;VERSION:3.0&#xA;FN:J. Doe&#xA;END:VCARD</hreview:reviewer>"
    ));
}

#[test]
fn test_silently_dropped_inputs_never_reach_the_wire() {
    let submitter = Submitter::new(StubTransport::replying(INSERT_OK));
    let mut record = Record::new("kn").unwrap();
    record.set_resource_uri("urn:isbn:0-486-27557-4");
    record.set_rating(6.0, 0.0, 5.0);
    record.set_tag("tag", Some("javascript:alert(1)"), Some((1.0, 1.0, 1.0)));
    record.set_license("CC0", Some("not a url"));

    submitter.create(&mut record).unwrap();

    let (_, body) = submitter.transport().last_request();
    assert!(!body.contains("<hreview:worst>"));
    assert!(body.contains("<hreview:tag><hreview:name>tag</hreview:name></hreview:tag>"));
    assert!(body.contains("<hreview:license><hreview:description>CC0</hreview:description></hreview:license>"));
}

#[test]
fn test_update_and_migrate_refuse_empty_record_with_id() {
    let submitter = Submitter::new(StubTransport::replying(INSERT_OK));

    let mut without_content = Record::new("kennisnet").unwrap();
    without_content.set_record_id("99").unwrap();
    without_content.set_resource_uri("urn:isbn:0-486-27557-4");
    without_content.set_reviewed_at("2012-05-01T08:00:00Z").unwrap();

    let mut without_resource = Record::new("kennisnet").unwrap();
    without_resource.set_record_id("99").unwrap();
    without_resource.set_comment("nice lesson");
    without_resource.set_reviewed_at("2012-05-01T08:00:00Z").unwrap();

    for record in [&mut without_content, &mut without_resource] {
        assert!(matches!(
            submitter.migrate_update(record),
            Err(Error::PreconditionFailed(_))
        ));
        assert!(matches!(
            submitter.update(record),
            Err(Error::PreconditionFailed(_))
        ));
        // a refused update leaves the timestamp alone
        assert_eq!(record.reviewed_at(), Some("2012-05-01T08:00:00Z"));
    }
    assert_eq!(submitter.transport().request_count(), 0);
}

#[test]
fn test_migrate_preview_matches_sent_body() {
    let submitter = Submitter::new(StubTransport::replying(
        "<Envelope><Body><response/></Body></Envelope>",
    ));
    let mut record = example_record();
    record.set_record_id("99").unwrap();
    record.set_reviewed_at("2001-01-01T00:00:00Z").unwrap();

    let previewed = smo_client::preview_migrate(&record).unwrap();
    assert!(previewed.contains("<hreview:dtreviewed>2001-01-01T00:00:00Z</hreview:dtreviewed>"));

    submitter.migrate_update(&record).unwrap();
    assert_eq!(submitter.transport().last_request(), ("updateSMO".to_string(), previewed));
}
