//! Tolerant XML-to-struct converters for the commissioner platform's export
//! payloads.
//!
//! Every parser accepts the raw response text and degrades gracefully: an
//! `<error>` root is "no data", unknown attributes are probed under their
//! known alternate names, and malformed fragments are skipped rather than
//! failing the call. Only byte streams that are not XML at all surface as
//! [`crate::error::Error::ParseError`], and callers treat that as an empty
//! result with a logged warning.

pub mod assets;
pub mod imports;
pub mod league;
pub mod live;
pub mod pick;
pub mod standings;
pub mod trades;

use roxmltree::{Document, Node};

use crate::error::Error;

pub(crate) fn parse_document(xml: &str) -> Result<Document<'_>, Error> {
    Document::parse(xml).map_err(|err| Error::ParseError(err.to_string()))
}

pub(crate) fn is_error_root(doc: &Document) -> bool {
    doc.root_element()
        .tag_name()
        .name()
        .eq_ignore_ascii_case("error")
}

/// First attribute among `names` with a non-empty trimmed value.
pub(crate) fn attr_any<'a>(node: &Node<'a, '_>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| node.attribute(*name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}
