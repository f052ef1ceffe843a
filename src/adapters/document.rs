use crate::core::{Document, Mount};
use crate::utils::error::{RenderError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

// Elements that cannot hold content and so cannot be mounts.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

static TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*?(/?)>").ok());

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mounts kept in a map, with every write recorded in order.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    mounts: Mutex<HashMap<String, String>>,
    mutations: Mutex<Vec<(String, String)>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty mounts for the given ids.
    pub fn with_mounts<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let document = Self::new();
        for id in ids {
            document.insert_mount(id, "");
        }
        document
    }

    pub fn insert_mount(&self, id: impl Into<String>, content: impl Into<String>) {
        lock(&self.mounts).insert(id.into(), content.into());
    }

    pub fn content(&self, id: &str) -> Option<String> {
        lock(&self.mounts).get(id).cloned()
    }

    /// Every `set_content` call as `(mount id, markup)`.
    pub fn mutations(&self) -> Vec<(String, String)> {
        lock(&self.mutations).clone()
    }
}

impl Document for MemoryDocument {
    fn find_element(&self, id: &str) -> Option<Mount> {
        lock(&self.mounts).contains_key(id).then(|| Mount { id: id.to_string() })
    }

    fn set_content(&self, mount: &Mount, markup: &str) -> Result<()> {
        let mut mounts = lock(&self.mounts);
        let Some(content) = mounts.get_mut(&mount.id) else {
            return Err(RenderError::DocumentError {
                mount: mount.id.clone(),
                message: "mount no longer exists".to_string(),
            });
        };
        *content = markup.to_string();
        lock(&self.mutations).push((mount.id.clone(), markup.to_string()));
        Ok(())
    }
}

/// An HTML page held as text; mounts are elements located by their `id`
/// attribute and their inner content is replaced in place.
///
/// Matching is lexical. Comments, scripts and `>` inside attribute values of
/// nested elements are not understood, which is fine for hand-written
/// placeholder markup such as `<div id="events-container"></div>`.
#[derive(Debug)]
pub struct HtmlDocument {
    html: Mutex<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Span {
    /// Inner content lies in `start..end`.
    Container { start: usize, end: usize },
    /// `<tag ... />`; `slash` is the offset of the `/` in `/>`.
    SelfClosing { slash: usize, tag: String },
}

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: Mutex::new(html.into()),
        }
    }

    pub fn html(&self) -> String {
        lock(&self.html).clone()
    }
}

impl Document for HtmlDocument {
    fn find_element(&self, id: &str) -> Option<Mount> {
        locate(&lock(&self.html), id).map(|_| Mount { id: id.to_string() })
    }

    fn set_content(&self, mount: &Mount, markup: &str) -> Result<()> {
        let mut html = lock(&self.html);
        match locate(&html, &mount.id) {
            Some(Span::Container { start, end }) => html.replace_range(start..end, markup),
            Some(Span::SelfClosing { slash, tag }) => {
                html.replace_range(slash..slash + 2, &format!(">{}</{}>", markup, tag))
            }
            None => {
                return Err(RenderError::DocumentError {
                    mount: mount.id.clone(),
                    message: "element not found or not closed".to_string(),
                })
            }
        }
        Ok(())
    }
}

fn locate(html: &str, id: &str) -> Option<Span> {
    let id_attr = Regex::new(&format!(
        r#"\s(?i:id)\s*=\s*(?:"{0}"|'{0}')"#,
        regex::escape(id)
    ))
    .ok()?;

    for attr in id_attr.find_iter(html) {
        let Some(lt) = html[..attr.start()].rfind('<') else {
            continue;
        };
        // The attribute must sit inside the tag that `lt` opens.
        match tag_end(html, lt) {
            Some(gt) if gt > attr.start() => {}
            _ => continue,
        }
        let tag: String = html[lt + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<String>()
            .to_ascii_lowercase();
        if tag.is_empty() || VOID_ELEMENTS.contains(&tag.as_str()) {
            continue;
        }

        let gt = tag_end(html, attr.end())?;
        if html[..gt].ends_with('/') {
            return Some(Span::SelfClosing { slash: gt - 1, tag });
        }

        let start = gt + 1;
        let end = start + matching_close(&html[start..], &tag)?;
        return Some(Span::Container { start, end });
    }
    None
}

// Offset of the `>` closing the tag, skipping quoted attribute values.
fn tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, byte) in html.bytes().enumerate().skip(from) {
        match (quote, byte) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(byte),
            (None, b'>') => return Some(offset),
            (None, _) => {}
        }
    }
    None
}

// Offset of the close tag balancing an already-open `tag`.
fn matching_close(body: &str, tag: &str) -> Option<usize> {
    let tags = TAG.as_ref()?;
    let mut depth = 1usize;
    for caps in tags.captures_iter(body) {
        if !caps[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        if &caps[1] == "/" {
            depth -= 1;
            if depth == 0 {
                return caps.get(0).map(|m| m.start());
            }
        } else if &caps[3] != "/" {
            depth += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_into(document: &HtmlDocument, id: &str, markup: &str) {
        let mount = document.find_element(id).expect("mount present");
        document.set_content(&mount, markup).unwrap();
    }

    #[test]
    fn test_replaces_inner_content_only() {
        let document = HtmlDocument::new(
            r#"<main><section id="events-container" class="grid"><p>Loading…</p></section><footer></footer></main>"#,
        );

        render_into(&document, "events-container", "<article>A</article>");

        assert_eq!(
            document.html(),
            r#"<main><section id="events-container" class="grid"><article>A</article></section><footer></footer></main>"#
        );
    }

    #[test]
    fn test_nested_same_tag_is_balanced() {
        let document = HtmlDocument::new(
            r#"<div id="team"><div class="old"><div>x</div></div></div><div id="after"></div>"#,
        );

        render_into(&document, "team", "new");

        assert_eq!(document.html(), r#"<div id="team">new</div><div id="after"></div>"#);
    }

    #[test]
    fn test_second_write_replaces_first() {
        let document = HtmlDocument::new(r#"<ul id='list'></ul>"#);

        render_into(&document, "list", "<li>1</li><li>2</li>");
        render_into(&document, "list", "No entries yet.");

        assert_eq!(document.html(), r#"<ul id='list'>No entries yet.</ul>"#);
    }

    #[test]
    fn test_self_closing_mount_is_expanded() {
        let document = HtmlDocument::new(r#"<div id="faq" />"#);

        render_into(&document, "faq", "<p>Q</p>");

        assert_eq!(document.html(), r#"<div id="faq" ><p>Q</p></div>"#);
    }

    #[test]
    fn test_quoted_gt_in_opening_tag() {
        let document = HtmlDocument::new(r#"<div title="a > b" id="x">old</div>"#);

        render_into(&document, "x", "new");

        assert_eq!(document.html(), r#"<div title="a > b" id="x">new</div>"#);
    }

    #[test]
    fn test_lookup_is_exact() {
        let document = HtmlDocument::new(
            r#"<div data-id="events"></div><div id="events-2"></div><img id="events">"#,
        );

        assert!(document.find_element("events").is_none());
        assert!(document.find_element("events-2").is_some());
    }

    #[test]
    fn test_id_value_is_case_sensitive() {
        let document = HtmlDocument::new(r#"<div ID="Events">keep</div><div Id="events">old</div>"#);

        render_into(&document, "events", "new");

        assert_eq!(document.html(), r#"<div ID="Events">keep</div><div Id="events">new</div>"#);
        assert!(HtmlDocument::new(r#"<div id="Events">keep</div>"#)
            .find_element("events")
            .is_none());
    }

    #[test]
    fn test_unclosed_mount_is_absent() {
        let document = HtmlDocument::new(r#"<div id="open"><p>never closed</p>"#);
        assert!(document.find_element("open").is_none());
    }

    #[test]
    fn test_memory_document_records_mutations() {
        let document = MemoryDocument::with_mounts(["a"]);
        let mount = document.find_element("a").unwrap();

        document.set_content(&mount, "one").unwrap();
        document.set_content(&mount, "two").unwrap();

        assert_eq!(document.content("a").unwrap(), "two");
        assert_eq!(document.mutations().len(), 2);
        assert!(document.find_element("b").is_none());
    }
}
