//! Cleanup passes applied to pandoc's Org → Markdown output
//!
//! Pandoc keeps Org constructs it cannot translate as raw ```` ```{=org} ````
//! blocks and decorates inline elements with attribute spans. Hatena's
//! Markdown renderer shows both verbatim, so they are stripped here.

use regex::Regex;
use std::sync::LazyLock;

const ORG_BLOCK_OPEN: &str = "```{=org}";
const CODE_FENCE: &str = "```";
const VERBATIM_ATTRIBUTE: &str = "{.verbatim}";
const ATTACH_TAG: &str = r#"[[ATTACH]{.smallcaps}]{.tag tag-name="ATTACH"}"#;

static ID_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{#[A-Za-z0-9-]+\}").expect("id pattern is valid"));

/// Run every cleanup pass in order, repeating until the text stops changing.
///
/// A removal can expose a new match for an earlier pass (`{#{#a}b}` leaves
/// `{#b}`), so a single sweep is not enough. Every pass that changes the
/// text also shortens it, which bounds the loop.
pub fn normalize_markdown(raw: &str) -> String {
    let mut markdown = normalize_once(raw);
    loop {
        let next = normalize_once(&markdown);
        if next == markdown {
            return markdown;
        }
        markdown = next;
    }
}

fn normalize_once(markdown: &str) -> String {
    let markdown = remove_org_blocks(markdown);
    let markdown = remove_verbatim_attributes(&markdown);
    let markdown = remove_attach_tags(&markdown);
    remove_id_attributes(&markdown)
}

/// Remove every ```` ```{=org} ```` block, delimiters included.
///
/// The text of a block (from the opening fence through the closing fence,
/// without the closing line's newline) is removed, so each block leaves a
/// single empty line behind. An unterminated block swallows the rest of
/// the document.
pub fn remove_org_blocks(markdown: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in markdown.split('\n') {
        if in_block {
            if line.starts_with(CODE_FENCE) {
                in_block = false;
                kept.push("");
            }
            continue;
        }
        if line.starts_with(ORG_BLOCK_OPEN) {
            in_block = true;
            continue;
        }
        kept.push(line);
    }

    if in_block {
        kept.push("");
    }

    kept.join("\n")
}

/// Remove pandoc's `{.verbatim}` attribute from inline code spans.
pub fn remove_verbatim_attributes(markdown: &str) -> String {
    markdown.replace(VERBATIM_ATTRIBUTE, "")
}

/// Remove the small-caps `ATTACH` tag Org attachments leave on headings.
pub fn remove_attach_tags(markdown: &str) -> String {
    markdown.replace(ATTACH_TAG, "")
}

/// Remove `{#ID}` heading anchors such as `{#29302AC1-B779-4976-B6E3-ACE995038F26}`
/// together with the whitespace in front of them.
pub fn remove_id_attributes(markdown: &str) -> String {
    ID_ATTRIBUTE.replace_all(markdown, "").into_owned()
}
