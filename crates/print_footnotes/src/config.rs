use crate::error::ConfigError;
use html::SelectorList;

/// Class carried by every generated node so page stylesheets can target them.
pub const PRINT_ONLY_CLASS: &str = "improved-print__print-only";

/// Attribute a link sets to keep itself out of the footnote list.
pub const OPT_OUT_ATTR: &str = "no-print-footnote";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FootnoteConfig {
    /// Which content nodes count as hyperlinks.
    pub link_selector: String,
    /// Attribute holding a link's target address.
    pub address_attr: String,
    pub opt_out_attr: String,
    pub print_only_class: String,
    /// Media query that switches footnotes on.
    pub media: String,
    pub marker_tag: String,
}

impl Default for FootnoteConfig {
    fn default() -> Self {
        Self {
            link_selector: "a[href]".to_string(),
            address_attr: "href".to_string(),
            opt_out_attr: OPT_OUT_ATTR.to_string(),
            print_only_class: PRINT_ONLY_CLASS.to_string(),
            media: "print".to_string(),
            marker_tag: "sup".to_string(),
        }
    }
}

impl FootnoteConfig {
    pub fn with_link_selector(mut self, selector: &str) -> Self {
        self.link_selector = selector.to_string();
        self
    }

    pub fn with_opt_out_attr(mut self, attr: &str) -> Self {
        self.opt_out_attr = attr.to_string();
        self
    }

    pub fn with_media(mut self, media: &str) -> Self {
        self.media = media.to_string();
        self
    }

    pub fn with_marker_tag(mut self, tag: &str) -> Self {
        self.marker_tag = tag.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.link_selectors().map(|_| ())
    }

    pub(crate) fn link_selectors(&self) -> Result<SelectorList, ConfigError> {
        for (field, value) in [
            ("address_attr", &self.address_attr),
            ("opt_out_attr", &self.opt_out_attr),
            ("print_only_class", &self.print_only_class),
            ("media", &self.media),
            ("marker_tag", &self.marker_tag),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }
        Ok(SelectorList::parse(&self.link_selector)?)
    }
}
