//! Image reference bookkeeping and Markdown link rewriting

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// An image link found in the Org source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    /// Link target as written in the document (and as pandoc copies it into
    /// the Markdown image syntax), without any `file:` prefix.
    pub original: String,
    /// Absolute location of the image on disk.
    pub resolved_path: PathBuf,
}

/// Drop repeated references, keeping the first appearance of each target.
pub fn unique_references(references: Vec<ImageReference>) -> Vec<ImageReference> {
    let mut seen = HashSet::new();
    references
        .into_iter()
        .filter(|reference| seen.insert(reference.original.clone()))
        .collect()
}

/// Point every Markdown image link `](original)` at `hosted_url`.
///
/// This is a plain substring replacement; the rest of the text is left
/// byte-for-byte untouched.
pub fn rewrite_image_reference(markdown: &str, original: &str, hosted_url: &str) -> String {
    markdown.replace(&format!("]({original})"), &format!("]({hosted_url})"))
}
