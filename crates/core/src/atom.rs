//! AtomPub request bodies and response parsing for Hatena Blog and Fotolife
//!
//! Builders take every value, including timestamps, as parameters so the
//! output is deterministic and can be compared against fixtures.

use chrono::{DateTime, SecondsFormat, Utc};
use roxmltree::Document;
use serde::Serialize;

use crate::error::Error;

/// Root of the Hatena Blog web UI and AtomPub API.
pub const HATENA_BLOG_URL: &str = "https://blog.hatena.ne.jp";

/// A blog post ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogEntry {
    pub title: String,
    /// Markdown body.
    pub body: String,
    pub categories: Vec<String>,
    pub is_draft: bool,
}

/// Escape `& < > " '` for element text and quoted attributes.
fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

fn parse_response(xml: &str) -> Result<Document<'_>, Error> {
    Document::parse(xml)
        .map_err(|e| Error::Protocol(format!("failed to parse response XML: {e}")))
}

/// Base URL of the AtomPub collection for a blog.
pub fn atom_base_url(hatena_id: &str, blog_domain: &str) -> String {
    format!("{HATENA_BLOG_URL}/{hatena_id}/{blog_domain}/atom")
}

/// Serialize `entry` into the Atom document Hatena Blog expects.
///
/// Title, author, body and categories are XML-escaped. Empty categories are
/// skipped and no `<category>` element is written when none remain.
pub fn build_entry_xml(entry: &BlogEntry, author: &str, updated: DateTime<Utc>) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:app="http://www.w3.org/2007/app">"#,
    );
    xml.push('\n');
    xml.push_str(&format!("  <title>{}</title>\n", escape(&entry.title)));
    xml.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape(author)
    ));
    xml.push_str(&format!(
        "  <content type=\"text/x-markdown\">{}</content>\n",
        escape(&entry.body)
    ));
    xml.push_str(&format!(
        "  <updated>{}</updated>\n",
        updated.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));

    for category in entry.categories.iter().filter(|c| !c.is_empty()) {
        xml.push_str(&format!("  <category term=\"{}\" />\n", escape(category)));
    }

    let draft = if entry.is_draft { "yes" } else { "no" };
    xml.push_str(&format!(
        "  <app:control><app:draft>{draft}</app:draft></app:control>\n"
    ));
    xml.push_str("</entry>\n");
    xml
}

/// Serialize an image upload for the Fotolife AtomAPI.
pub fn build_image_entry_xml(file_name: &str, mime_type: &str, base64_data: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<entry xmlns="http://purl.org/atom/ns#">
  <title>{}</title>
  <content mode="base64" type="{}">{}</content>
</entry>
"#,
        escape(file_name),
        escape(mime_type),
        base64_data
    )
}

/// Return the `href` of the first `<link rel="edit">` in an Atom document.
///
/// A body that is not well-formed XML is an `Error::Protocol`; a document
/// without a usable edit link is `Ok(None)`.
pub fn find_edit_link(xml: &str) -> Result<Option<String>, Error> {
    let document = parse_response(xml)?;
    let href = document
        .descendants()
        .filter(|node| node.has_tag_name("link"))
        .find(|node| node.attribute("rel") == Some("edit"))
        .and_then(|node| node.attribute("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string);
    Ok(href)
}

/// Entry identifier: the last path segment of the edit link.
pub fn entry_id_from_edit_url(edit_url: &str) -> &str {
    let trimmed = edit_url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Browser URL of the editor page for an entry.
pub fn edit_page_url(hatena_id: &str, blog_domain: &str, entry_id: &str) -> String {
    format!("{HATENA_BLOG_URL}/{hatena_id}/{blog_domain}/edit?entry={entry_id}")
}

/// Extract the hosted image URL from a Fotolife AtomAPI response.
pub fn find_image_url(xml: &str) -> Result<Option<String>, Error> {
    let document = parse_response(xml)?;
    let url = document
        .descendants()
        .find(|node| node.has_tag_name("imageurl"))
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn updated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn entry(title: &str, categories: &[&str], is_draft: bool) -> BlogEntry {
        BlogEntry {
            title: title.to_string(),
            body: "# Heading\n\nBody text".to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            is_draft,
        }
    }

    #[test]
    fn test_build_entry_xml_exact_shape() {
        let xml = build_entry_xml(&entry("Hello", &["rust", "org"], false), "alice", updated());
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" xmlns:app="http://www.w3.org/2007/app">
  <title>Hello</title>
  <author><name>alice</name></author>
  <content type="text/x-markdown"># Heading

Body text</content>
  <updated>2024-05-01T12:30:00Z</updated>
  <category term="rust" />
  <category term="org" />
  <app:control><app:draft>no</app:draft></app:control>
</entry>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_build_entry_xml_escapes_title() {
        let xml = build_entry_xml(&entry("Test & Title with <tags>", &[], false), "alice", updated());
        assert!(xml.contains("<title>Test &amp; Title with &lt;tags&gt;</title>"));
    }

    #[test]
    fn test_build_entry_xml_escapes_body_author_and_categories() {
        let mut e = entry("T", &[r#"C&"Q""#], false);
        e.body = "a < b && \"c\" > d".to_string();
        let xml = build_entry_xml(&e, "bob<script>", updated());
        assert!(xml.contains("<name>bob&lt;script&gt;</name>"));
        assert!(xml.contains("a &lt; b &amp;&amp; &quot;c&quot; &gt; d"));
        assert!(xml.contains(r#"<category term="C&amp;&quot;Q&quot;" />"#));
    }

    #[test]
    fn test_build_entry_xml_draft_flag() {
        let draft = build_entry_xml(&entry("T", &[], true), "alice", updated());
        assert!(draft.contains("<app:draft>yes</app:draft>"));
        let public = build_entry_xml(&entry("T", &[], false), "alice", updated());
        assert!(public.contains("<app:draft>no</app:draft>"));
    }

    #[test]
    fn test_build_entry_xml_without_categories() {
        let xml = build_entry_xml(&entry("T", &[], false), "alice", updated());
        assert!(!xml.contains("<category"));
        let xml = build_entry_xml(&entry("T", &["", ""], false), "alice", updated());
        assert!(!xml.contains("<category"));
    }

    #[test]
    fn test_build_entry_xml_skips_empty_categories() {
        let xml = build_entry_xml(&entry("T", &["a", "", "b"], false), "alice", updated());
        assert_eq!(xml.matches("<category").count(), 2);
        assert!(xml.find(r#"term="a""#) < xml.find(r#"term="b""#));
    }

    #[test]
    fn test_build_entry_xml_escapes_apostrophe() {
        let xml = build_entry_xml(&entry("it's", &["rock'n'roll"], false), "alice", updated());
        assert!(xml.contains("<title>it&#x27;s</title>"));
        assert!(xml.contains(r#"<category term="rock&#x27;n&#x27;roll" />"#));
    }

    #[test]
    fn test_build_entry_xml_is_well_formed() {
        let mut e = entry("<a & 'b'>", &["c\"d"], true);
        e.body = "x < y && z > \"w\"".to_string();
        let xml = build_entry_xml(&e, "alice", updated());
        let document = Document::parse(&xml).unwrap();
        let title = document
            .descendants()
            .find(|node| node.has_tag_name("title"))
            .and_then(|node| node.text());
        assert_eq!(title, Some("<a & 'b'>"));
    }

    #[test]
    fn test_build_image_entry_xml() {
        let xml = build_image_entry_xml("a&b.png", "image/png", "aGVsbG8=");
        assert!(xml.contains("<title>a&amp;b.png</title>"));
        assert!(xml.contains(r#"<content mode="base64" type="image/png">aGVsbG8=</content>"#));
    }

    #[test]
    fn test_find_edit_link() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<entry xmlns="http://www.w3.org/2005/Atom">
  <id>tag:blog.hatena.ne.jp,2013:blog-alice-1-2</id>
  <link rel="alternate" type="text/html" href="https://alice.hatenablog.com/entry/hello"/>
  <link rel="edit" href="https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry/6801883189"/>
</entry>"#;
        assert_eq!(
            find_edit_link(xml).unwrap().as_deref(),
            Some("https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry/6801883189")
        );
    }

    #[test]
    fn test_find_edit_link_attribute_order_and_quotes() {
        let xml = "<entry><link\n  href='https://x/atom/entry/42?a=1&amp;b=2'\n  rel='edit' /></entry>";
        assert_eq!(
            find_edit_link(xml).unwrap().as_deref(),
            Some("https://x/atom/entry/42?a=1&b=2")
        );
    }

    #[test]
    fn test_find_edit_link_missing() {
        assert_eq!(
            find_edit_link(r#"<entry><link rel="alternate" href="x"/></entry>"#),
            Ok(None)
        );
        assert_eq!(find_edit_link(r#"<entry><link rel="edit" href=""/></entry>"#), Ok(None));
        assert_eq!(find_edit_link("<entry/>"), Ok(None));
    }

    #[test]
    fn test_find_edit_link_malformed_xml() {
        let xml = r#"<entry><link rel="edit" href="https://x/atom/entry/7"/> <<< not xml"#;
        let err = find_edit_link(xml).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Protocol);
        assert!(err.to_string().contains("failed to parse response XML"));

        assert!(find_edit_link("not xml at all").is_err());
        assert!(find_edit_link("").is_err());
    }

    #[test]
    fn test_entry_id_from_edit_url() {
        assert_eq!(
            entry_id_from_edit_url("https://blog.hatena.ne.jp/a/b/atom/entry/6801883189"),
            "6801883189"
        );
        assert_eq!(entry_id_from_edit_url("https://x/atom/entry/42/"), "42");
        assert_eq!(entry_id_from_edit_url("42"), "42");
    }

    #[test]
    fn test_edit_page_url() {
        assert_eq!(
            edit_page_url("alice", "alice.hatenablog.com", "6801883189"),
            "https://blog.hatena.ne.jp/alice/alice.hatenablog.com/edit?entry=6801883189"
        );
    }

    #[test]
    fn test_atom_base_url() {
        assert_eq!(
            atom_base_url("alice", "alice.hatenablog.com"),
            "https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom"
        );
    }

    #[test]
    fn test_find_image_url() {
        let xml = r#"<entry xmlns="http://purl.org/atom/ns#" xmlns:hatena="http://www.hatena.ne.jp/info/xmlns#">
  <title>a.png</title>
  <hatena:imageurl>https://cdn-ak.f.st-hatena.com/images/fotolife/a/alice/20240501/20240501123000.png</hatena:imageurl>
</entry>"#;
        assert_eq!(
            find_image_url(xml).unwrap().as_deref(),
            Some("https://cdn-ak.f.st-hatena.com/images/fotolife/a/alice/20240501/20240501123000.png")
        );
        assert_eq!(find_image_url("<entry/>"), Ok(None));
        assert!(find_image_url("<entry><hatena:imageurl>").is_err());
    }
}
