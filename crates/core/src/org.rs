//! Pure extraction functions over Org-mode source text
//!
//! Nothing here touches the filesystem: callers read the document and pass
//! its text in, and path resolution is purely lexical.

use regex::Regex;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use crate::images::ImageReference;

/// Title used when the document has no usable `#+title:` directive.
pub const UNTITLED: &str = "Untitled";

const TITLE_DIRECTIVE: &str = "#+title:";
const FILETAGS_DIRECTIVE: &str = "#+filetags:";

/// `[[file:path.ext]]` or `[[path.ext]]` for the supported image extensions.
static IMAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[(?:file:)?([^\[\]]+?\.(?:jpg|jpeg|png|gif|bmp|webp|svg))\]\]")
        .expect("image link pattern is valid")
});

/// Metadata recovered from the Org header lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgMetadata {
    pub title: String,
    pub categories: Vec<String>,
}

/// Return the value of a `#+directive:` line, matching the directive name
/// case-insensitively. The line is trimmed before matching.
fn directive_value<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let line = line.trim();
    let prefix = line.get(..directive.len())?;
    if prefix.eq_ignore_ascii_case(directive) {
        Some(line[directive.len()..].trim())
    } else {
        None
    }
}

/// First non-empty value of `directive` in the document, if any.
fn first_directive<'a>(org: &'a str, directive: &str) -> Option<&'a str> {
    org.lines()
        .filter_map(|line| directive_value(line, directive))
        .find(|value| !value.is_empty())
}

/// Extract the document title from `#+title:`, falling back to [`UNTITLED`].
pub fn extract_title(org: &str) -> String {
    first_directive(org, TITLE_DIRECTIVE)
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Extract the tag list from `#+filetags:`.
///
/// Tags may be separated by any run of spaces, tabs or colons, so
/// `:a: :b:c:`, `a b c` and `a:b c` all yield `["a", "b", "c"]`.
pub fn extract_categories(org: &str) -> Vec<String> {
    first_directive(org, FILETAGS_DIRECTIVE)
        .map(|tags| {
            tags.split(|c: char| c == ' ' || c == '\t' || c == ':')
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Extract title and categories in one call.
pub fn extract_metadata(org: &str) -> OrgMetadata {
    OrgMetadata {
        title: extract_title(org),
        categories: extract_categories(org),
    }
}

/// Collect the raw image link targets in order of appearance, with the
/// `file:` prefix removed.
pub fn find_image_links(org: &str) -> Vec<String> {
    org.lines()
        .flat_map(|line| IMAGE_LINK.captures_iter(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Join `link` onto `base_dir` unless it is already absolute, dropping `.`
/// components so `./img/a.png` resolves to `<base_dir>/img/a.png`.
pub fn resolve_path(base_dir: &Path, link: &str) -> PathBuf {
    let link = Path::new(link);
    let joined = if link.is_absolute() {
        link.to_path_buf()
    } else {
        base_dir.join(link)
    };

    joined
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Find every image link in the document and resolve it against the
/// directory that contains the Org file.
pub fn resolve_image_links(org: &str, base_dir: &Path) -> Vec<ImageReference> {
    find_image_links(org)
        .into_iter()
        .map(|link| ImageReference {
            resolved_path: resolve_path(base_dir, &link),
            original: link,
        })
        .collect()
}
