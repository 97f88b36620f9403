//! SMO service response handling
//!
//! Responses are SOAP envelopes. They are loaded into a generic [`Node`] tree
//! and inspected at two fixed paths:
//!
//! - `Envelope/Body/errorResponse/error/{code,description}` for failures
//! - `Envelope/Body/response/responseSmo/smo/smoId` for the id assigned on insert

use crate::types::RequestKind;
use crate::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::collections::BTreeMap;
use tracing::{info, warn};

const ERROR_PATH: [&str; 3] = ["Body", "errorResponse", "error"];
const RECORD_ID_PATH: [&str; 5] = ["Body", "response", "responseSmo", "smo", "smoId"];

/// Element of a parsed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Local element name
    pub name: String,
    /// Attributes keyed by local name, or `{namespace}local` when the
    /// attribute is bound to a namespace
    pub attributes: BTreeMap<String, String>,
    /// Namespace URI the element is bound to
    pub namespace: Option<String>,
    /// Child elements in document order
    pub children: Vec<Node>,
    /// Text content
    pub text: Option<String>,
}

impl Node {
    /// First child with the given local name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Descend through first children matching each name
    pub fn path(&self, names: &[&str]) -> Option<&Node> {
        names.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Text of a leaf reached through `names`
    pub fn text_at(&self, names: &[&str]) -> Option<&str> {
        self.path(names).and_then(|n| n.text.as_deref())
    }

    /// Attribute value.
    ///
    /// An unqualified attribute wins; otherwise the first namespaced
    /// attribute with that local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(key, _)| key.starts_with('{') && key.rsplit('}').next() == Some(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Value of the attribute `name` bound to `namespace`
    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&attribute_key(Some(namespace), name))
            .map(String::as_str)
    }
}

/// Error reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    /// Error code
    pub code: String,
    /// Error description
    pub description: String,
}

/// Parse a raw response body into its root element
pub fn parse_response(body: &str) -> Result<Node> {
    let mut reader = NsReader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| Error::BadResponse(format!("Response is not XML: {}", e)))?;
        let namespace = bound_namespace(&ns);

        match event {
            Event::Start(e) => {
                ensure_single_root(&root)?;
                stack.push(open_node(&reader, namespace, &e)?);
            }
            Event::Empty(e) => {
                ensure_single_root(&root)?;
                let node = open_node(&reader, namespace, &e)?;
                attach(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| Error::BadResponse("Unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, node);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| Error::BadResponse(format!("Bad text content: {}", e)))?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::BadResponse("Unexpected end of document".to_string()));
    }
    root.ok_or_else(|| Error::BadResponse("Response is not XML: no root element".to_string()))
}

fn ensure_single_root(root: &Option<Node>) -> Result<()> {
    if root.is_some() {
        return Err(Error::BadResponse("Multiple root elements".to_string()));
    }
    Ok(())
}

fn bound_namespace(ns: &ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

fn attribute_key(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local),
        None => local.to_string(),
    }
}

fn open_node<R>(
    reader: &NsReader<R>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<Node> {
    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::BadResponse(format!("Bad attribute: {}", e)))?;
        let key = attr.key;
        // namespace declarations are not data
        if key.as_namespace_binding().is_some() {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| Error::BadResponse(format!("Bad attribute value: {}", e)))?;
        let (attr_ns, local) = reader.resolve_attribute(key);
        let local = String::from_utf8_lossy(local.as_ref()).into_owned();
        let attr_ns = bound_namespace(&attr_ns);
        attributes.insert(attribute_key(attr_ns.as_deref(), &local), value.into_owned());
    }

    Ok(Node {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        namespace,
        children: Vec::new(),
        text: None,
    })
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn append_text(stack: &mut [Node], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(node) => {
            node.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::BadResponse("Text outside of root element".to_string())),
    }
}

/// Error block of an envelope, if present
pub fn remote_failure(envelope: &Node) -> Option<RemoteFailure> {
    let error_response = envelope.path(&ERROR_PATH[..2])?;
    let error = error_response.child(ERROR_PATH[2]);
    let leaf = |name: &str| {
        error
            .and_then(|e| e.child(name))
            .and_then(|n| n.text.clone())
            .unwrap_or_default()
    };

    Some(RemoteFailure {
        code: leaf("code"),
        description: leaf("description"),
    })
}

/// Record id assigned by the service on insert
pub fn assigned_record_id(envelope: &Node) -> Option<&str> {
    envelope.text_at(&RECORD_ID_PATH)
}

/// Interpret a raw response for `kind`.
///
/// Returns the record id the service assigned when `kind` is a create.
pub fn interpret_response(body: &str, kind: RequestKind) -> Result<Option<String>> {
    let envelope = parse_response(body)?;

    if let Some(failure) = remote_failure(&envelope) {
        warn!(
            code = %failure.code,
            "SMO {} rejected by service: {}",
            kind,
            failure.description
        );
        return Err(Error::Remote {
            code: failure.code,
            message: failure.description,
        });
    }

    if kind != RequestKind::Create {
        return Ok(None);
    }

    let record_id = assigned_record_id(&envelope)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::BadResponse("Insert response without smoId".to_string()))?;
    info!(record_id, "SMO inserted");
    Ok(Some(record_id.to_string()))
}
