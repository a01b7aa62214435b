//! Feed document rendering.

use crate::config::FEED_TEMPLATE;
use crate::error::{FeedError, FeedResult};
use crate::feed::{FeedDocument, FeedEntry};
use html_escape::encode_quoted_attribute as escape;
use std::fmt::Write as _;

/// Turns an assembled document into bytes using the named template.
pub trait Renderer {
    fn render(&self, template_name: &str, document: &FeedDocument) -> FeedResult<Vec<u8>>;
}

/// Built-in Atom 1.0 template, registered as `feedtemplate.xml`.
///
/// Entry fields arrive escaped from the sanitizer and are written as-is.
/// The description already carries `<br />` markup, so the entry body goes
/// out as escaped `type="html"` content.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomRenderer;

impl AtomRenderer {
    fn write_entry(out: &mut String, entry: &FeedEntry) -> std::fmt::Result {
        let link = escape(&entry.link);
        writeln!(out, "  <entry>")?;
        writeln!(out, "    <title>{}</title>", entry.title)?;
        writeln!(out, "    <link rel=\"alternate\" href=\"{link}\"/>")?;
        writeln!(out, "    <id>{link}</id>")?;
        writeln!(out, "    <author><name>{}</name></author>", entry.author)?;
        writeln!(out, "    <published>{}</published>", entry.pub_date)?;
        writeln!(out, "    <updated>{}</updated>", entry.pub_date)?;
        let body = format!(
            "<a href=\"{link}\"><img src=\"{thumb}\"/></a><p>[{duration}]</p><p>{description}</p>",
            thumb = escape(&entry.thumbnail),
            duration = entry.duration,
            description = entry.description,
        );
        writeln!(out, "    <content type=\"html\">{}</content>", escape(&body))?;
        writeln!(out, "  </entry>")
    }

    fn write_document(out: &mut String, document: &FeedDocument) -> std::fmt::Result {
        let user = escape(&document.user);
        writeln!(out, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        writeln!(out, "<feed xmlns=\"http://www.w3.org/2005/Atom\">")?;
        writeln!(out, "  <title>YouTube subscriptions for {user}</title>")?;
        writeln!(out, "  <id>urn:ytsubs:{user}</id>")?;
        writeln!(out, "  <updated>{}</updated>", document.update_time)?;
        writeln!(out, "  <author><name>{user}</name></author>")?;
        for entry in &document.entries {
            Self::write_entry(out, entry)?;
        }
        writeln!(out, "</feed>")
    }
}

impl Renderer for AtomRenderer {
    fn render(&self, template_name: &str, document: &FeedDocument) -> FeedResult<Vec<u8>> {
        if template_name != FEED_TEMPLATE {
            return Err(FeedError::render(format!("unknown template {template_name:?}")));
        }
        let mut out = String::new();
        Self::write_document(&mut out, document)
            .map_err(|err| FeedError::render(err.to_string()))?;
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> FeedDocument {
        FeedDocument {
            user: "a<b".into(),
            update_time: "2024-05-06T07:08:09+0000".into(),
            entries: vec![FeedEntry {
                id: "vid".into(),
                title: "Fish &amp; Chips".into(),
                link: "https://youtube.com/watch?v=vid".into(),
                author: "Chan".into(),
                pub_date: "2024-05-01T00:00:00Z".into(),
                description: "one<br />two".into(),
                thumbnail: "https://i/vid.jpg".into(),
                duration: "1:02:03".into(),
            }],
        }
    }

    #[test]
    fn renders_atom_document() {
        let bytes = AtomRenderer.render(FEED_TEMPLATE, &document()).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<title>YouTube subscriptions for a&lt;b</title>"));
        assert!(xml.contains("<updated>2024-05-06T07:08:09+0000</updated>"));
        assert!(xml.contains("<title>Fish &amp; Chips</title>"));
        assert!(xml.contains("href=\"https://youtube.com/watch?v=vid\""));
        assert!(xml.contains("&lt;p&gt;[1:02:03]&lt;/p&gt;"));
        assert!(xml.contains("one&lt;br /&gt;two"));
        assert_eq!(xml.matches("<entry>").count(), 1);
        assert!(xml.trim_end().ends_with("</feed>"));
    }

    #[test]
    fn unknown_template_is_render_error() {
        let err = AtomRenderer.render("other.xml", &document()).unwrap_err();
        assert!(matches!(err, FeedError::Render(_)));
    }
}
