use crate::config::FootnoteConfig;
use crate::error::ConfigError;
use html::{Document, NodeKey, SelectorList};

/// A hyperlink found in the content region, with the address it points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRef {
    pub node: NodeKey,
    pub address: String,
}

/// Finds the links that get footnotes: selector matches with a non-blank
/// address and without the opt-out attribute, in document order.
#[derive(Clone, Debug)]
pub struct LinkScanner {
    selectors: SelectorList,
    address_attr: String,
    opt_out_attr: String,
}

impl LinkScanner {
    pub fn new(config: &FootnoteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: config.link_selectors()?,
            address_attr: config.address_attr.clone(),
            opt_out_attr: config.opt_out_attr.clone(),
        })
    }

    pub fn links<'a>(
        &'a self,
        doc: &'a Document,
        content: NodeKey,
    ) -> impl Iterator<Item = LinkRef> + 'a {
        doc.descendants(content).filter_map(move |node| {
            if !self.selectors.matches(doc, node) || doc.has_attr(node, &self.opt_out_attr) {
                return None;
            }
            let address = doc.attr(node, &self.address_attr)?;
            if address.trim().is_empty() {
                return None;
            }
            Some(LinkRef {
                node,
                address: address.to_string(),
            })
        })
    }

    pub fn scan(&self, doc: &Document, content: NodeKey) -> Vec<LinkRef> {
        let links: Vec<_> = self.links(doc, content).collect();
        log::debug!(
            target: "print_footnotes.scanner",
            "{} eligible link(s) under {content:?}",
            links.len()
        );
        links
    }
}
