//! JSON front-matter extraction
//!
//! A document may begin with a `---` delimiter line, a JSON object, and a
//! closing `---` line:
//!
//! ```text
//! ---
//! {"title": "Hello", "layout": "post.html"}
//! ---
//! ## body starts here
//! ```
//!
//! Extraction is a plain byte scan over the raw document, independent of
//! the markdown parser. The block never reaches the rendered output.

use super::RenderContext;

/// Front-matter delimiter, including the line terminator.
pub const DELIMITER: &[u8] = b"---\n";

/// Split a raw document into its front-matter context and markdown body.
///
/// Returns an empty context and the input unchanged when the document does
/// not start with the delimiter or no closing delimiter follows. A block
/// that fails to parse as a JSON object is dropped from the body but
/// contributes no context keys.
pub fn extract(data: &[u8]) -> (RenderContext, &[u8]) {
    let Some(rest) = data.strip_prefix(DELIMITER) else {
        return (RenderContext::new(), data);
    };
    let Some(end) = find(rest, DELIMITER) else {
        return (RenderContext::new(), data);
    };

    let block = &rest[..end];
    let body = &rest[end + DELIMITER.len()..];
    match serde_json::from_slice(block) {
        Ok(context) => (context, body),
        Err(err) => {
            tracing::warn!("dropping malformed front-matter block: {}", err);
            (RenderContext::new(), body)
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
