//! `//pragma: key value` directives on the file header.

use indexmap::IndexMap;
use protosyn_core::Comments;

pub const PRAGMA_PREFIX: &str = "//pragma:";

/// Collects pragmas from the comments leading the `syntax` or `edition`
/// declaration. The first word after the prefix is the key and the trimmed
/// remainder the value. A repeated key keeps its first position and takes
/// the later value.
pub fn parse(comments: Comments<'_>) -> IndexMap<String, String> {
    let mut pragmas = IndexMap::new();
    for comment in comments.iter() {
        let Some(body) = comment.raw_text().strip_prefix(PRAGMA_PREFIX) else {
            continue;
        };
        let body = body.trim();
        if body.is_empty() {
            continue;
        }
        let (key, value) = body
            .split_once(char::is_whitespace)
            .map(|(k, v)| (k, v.trim()))
            .unwrap_or((body, ""));
        pragmas.insert(key.to_string(), value.to_string());
    }
    pragmas
}
