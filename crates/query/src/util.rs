//! Small shared helpers.

use bson::{Bson, Document};

/// Looks up a possibly-dotted field path in a document.
///
/// Returns `None` when any segment is missing or a non-document value
/// is reached before the final segment.
pub(crate) fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut current = doc;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        match value {
            Bson::Document(inner) => current = inner,
            _ => return None,
        }
    }
    None
}
