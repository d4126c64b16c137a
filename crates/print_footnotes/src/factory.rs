//! Constructors for the nodes the footnote machinery inserts.
//!
//! Every function creates fresh, detached nodes from its arguments alone and
//! returns their keys; the caller decides where they go. Generated nodes start
//! hidden.

use crate::config::FootnoteConfig;
use html::{Document, DomError, NodeKey};
use std::fmt;

/// 1-based position of a link in discovery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CitationIndex(u32);

impl CitationIndex {
    pub fn from_position(position: usize) -> Self {
        Self(u32::try_from(position).map_or(u32::MAX, |p| p.saturating_add(1)))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CitationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const CITATION_INDEX_ATTR: &str = "data-citation-index";

/// `<sup class=... aria-hidden="true" data-citation-index=N hidden>N</sup>`
pub fn make_index_marker(
    doc: &mut Document,
    index: CitationIndex,
    config: &FootnoteConfig,
) -> Result<NodeKey, DomError> {
    let label = index.to_string();
    let marker = doc.create_element_with_attrs(
        &config.marker_tag,
        &[
            ("class", config.print_only_class.as_str()),
            ("aria-hidden", "true"),
            (CITATION_INDEX_ATTR, label.as_str()),
        ],
    );
    doc.toggle_attr(marker, "hidden", true)?;
    doc.append_text(marker, &label)?;
    Ok(marker)
}

/// `<li value=N data-citation-index=N><a href=ADDRESS>ADDRESS</a></li>`
pub fn make_footnote_entry(
    doc: &mut Document,
    index: CitationIndex,
    address: &str,
) -> Result<NodeKey, DomError> {
    let label = index.to_string();
    let item = doc.create_element_with_attrs(
        "li",
        &[("value", label.as_str()), (CITATION_INDEX_ATTR, label.as_str())],
    );
    let link = doc.create_element_with_attrs("a", &[("href", address)]);
    doc.append_text(link, address)?;
    doc.append_child(item, link)?;
    Ok(item)
}

/// The `<nav>` wrapper and the `<ol>` entries are appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FootnoteList {
    pub nav: NodeKey,
    pub list: NodeKey,
}

pub fn make_footnote_list(
    doc: &mut Document,
    config: &FootnoteConfig,
) -> Result<FootnoteList, DomError> {
    let nav =
        doc.create_element_with_attrs("nav", &[("class", config.print_only_class.as_str())]);
    doc.toggle_attr(nav, "hidden", true)?;
    let list = doc.create_element_with_attrs("ol", &[("role", "list")]);
    doc.append_child(nav, list)?;
    Ok(FootnoteList { nav, list })
}

const HOST_STYLE: &str = ":host { display: inline-block; }\n:host([hidden]) { display: none; }\n";

/// Stamp the element template into a fresh shadow root: host styles, then the
/// slot that projects the light content.
pub fn stamp_template(doc: &mut Document, shadow: NodeKey) -> Result<NodeKey, DomError> {
    let style = doc.create_element("style");
    doc.append_text(style, HOST_STYLE)?;
    doc.append_child(shadow, style)?;
    let slot = doc.create_element("slot");
    doc.append_child(shadow, slot)?;
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::outline;

    #[test]
    fn citation_index_is_one_based() {
        assert_eq!(CitationIndex::from_position(0).get(), 1);
        assert_eq!(CitationIndex::from_position(41).to_string(), "42");
    }

    #[test]
    fn marker_is_hidden_and_assistive_hidden() {
        let mut doc = Document::new();
        let marker = make_index_marker(
            &mut doc,
            CitationIndex::from_position(2),
            &FootnoteConfig::default(),
        )
        .unwrap();
        assert_eq!(doc.parent(marker), None);
        assert_eq!(
            outline(&doc, marker).unwrap(),
            vec![
                "<sup class=\"improved-print__print-only\" aria-hidden=\"true\" data-citation-index=\"3\" hidden>",
                "  \"3\"",
            ]
        );
    }

    #[test]
    fn entry_shows_the_address_verbatim() {
        let mut doc = Document::new();
        let entry =
            make_footnote_entry(&mut doc, CitationIndex::from_position(0), "https://a.example/?q=1")
                .unwrap();
        assert_eq!(doc.attr(entry, "value"), Some("1"));
        assert_eq!(doc.text_content(entry), "https://a.example/?q=1");
        let link = doc.children(entry)[0];
        assert_eq!(doc.attr(link, "href"), Some("https://a.example/?q=1"));
    }

    #[test]
    fn list_starts_hidden_and_empty() {
        let mut doc = Document::new();
        let list = make_footnote_list(&mut doc, &FootnoteConfig::default()).unwrap();
        assert!(doc.has_attr(list.nav, "hidden"));
        assert_eq!(doc.children(list.nav), &[list.list]);
        assert!(doc.children(list.list).is_empty());
        assert_eq!(doc.attr(list.list, "role"), Some("list"));
    }

    #[test]
    fn template_ends_with_a_slot() {
        let mut doc = Document::new();
        let host = doc.create_element("improved-print");
        let shadow = doc.attach_shadow(host).unwrap();
        let slot = stamp_template(&mut doc, shadow).unwrap();
        assert_eq!(doc.children(shadow).last(), Some(&slot));
        assert!(doc.text_content(doc.children(shadow)[0]).contains(":host([hidden])"));
    }
}
