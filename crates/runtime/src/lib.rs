//! Single-threaded page loop hosting `<improved-print>` elements.
//!
//! The page owns the document, the print media query, the frame queue and
//! every upgraded element. Work happens only inside `Page` methods:
//! media edges are queued on the bus and routed by [`Page::pump_events`];
//! deferred callbacks run in [`Page::run_frame`]. Lifecycle callbacks fire
//! when a host's connectedness changes through [`Page::connect`] or
//! [`Page::disconnect`].

use bus::{Bus, FrameQueue, HostEvent, MediaQueryList, MediaSignal};
use core_types::{ComponentId, IdAllocator};
use html::{Document, DomError, NodeKey, outline};
use print_footnotes::{
    ConfigError, ElementError, FootnoteConfig, HostContext, ImprovedPrint, TAG_NAME,
};
use std::collections::BTreeMap;
use std::fmt;

const TARGET: &str = "runtime.page";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageError {
    Config(ConfigError),
    Dom(DomError),
    Element(ElementError),
    NotAnElement(NodeKey),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Config(err) => write!(f, "{err}"),
            PageError::Dom(err) => write!(f, "{err}"),
            PageError::Element(err) => write!(f, "{err}"),
            PageError::NotAnElement(key) => write!(f, "node {} is not an element", key.0),
        }
    }
}

impl std::error::Error for PageError {}

impl From<ConfigError> for PageError {
    fn from(err: ConfigError) -> Self {
        PageError::Config(err)
    }
}

impl From<DomError> for PageError {
    fn from(err: DomError) -> Self {
        PageError::Dom(err)
    }
}

impl From<ElementError> for PageError {
    fn from(err: ElementError) -> Self {
        PageError::Element(err)
    }
}

pub struct Page {
    doc: Document,
    media: MediaQueryList,
    frames: FrameQueue,
    bus: Bus,
    config: FootnoteConfig,
    elements: BTreeMap<ComponentId, ImprovedPrint>,
    ids: IdAllocator,
}

impl Page {
    pub fn new() -> Self {
        let config = FootnoteConfig::default();
        Self::from_parts(Document::new(), config)
    }

    pub fn with_config(config: FootnoteConfig) -> Result<Self, PageError> {
        config.validate()?;
        Ok(Self::from_parts(Document::new(), config))
    }

    fn from_parts(doc: Document, config: FootnoteConfig) -> Self {
        Self {
            doc,
            media: MediaQueryList::new(&config.media),
            frames: FrameQueue::new(),
            bus: Bus::new(),
            config,
            elements: BTreeMap::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Direct tree access for building content. Connectedness changes made
    /// here are not observed; use `connect`/`disconnect` for those.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn media(&self) -> &MediaQueryList {
        &self.media
    }

    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }

    pub fn element(&self, id: ComponentId) -> Option<&ImprovedPrint> {
        self.elements.get(&id)
    }

    pub fn element_for(&self, host: NodeKey) -> Option<ComponentId> {
        self.elements
            .iter()
            .find(|(_, el)| el.host() == host)
            .map(|(id, _)| *id)
    }

    pub fn elements(&self) -> impl Iterator<Item = (ComponentId, &ImprovedPrint)> + '_ {
        self.elements.iter().map(|(id, el)| (*id, el))
    }

    /// Upgrade `host` into an element. Already-upgraded hosts return their
    /// existing id. A connected host gets its connected callback right away.
    pub fn upgrade(&mut self, host: NodeKey) -> Result<ComponentId, PageError> {
        if let Some(id) = self.element_for(host) {
            return Ok(id);
        }
        if !self.doc.is_element(host) {
            return Err(PageError::NotAnElement(host));
        }
        let id = ComponentId::from_raw(self.ids.next_raw());
        let element = ImprovedPrint::construct(&mut self.doc, host, id, self.config.clone())?;
        self.elements.insert(id, element);
        log::debug!(target: TARGET, "upgraded {host:?} as {id}");
        self.sync_lifecycle();
        Ok(id)
    }

    /// Upgrade every `<improved-print>` in the light tree, in document order.
    pub fn define_elements(&mut self) -> Result<Vec<ComponentId>, PageError> {
        let hosts: Vec<_> = self
            .doc
            .descendants(self.doc.root())
            .filter(|k| self.doc.element_name(*k) == Some(TAG_NAME))
            .collect();
        hosts.into_iter().map(|host| self.upgrade(host)).collect()
    }

    pub fn connect(&mut self, parent: NodeKey, node: NodeKey) -> Result<(), PageError> {
        self.doc.append_child(parent, node)?;
        self.sync_lifecycle();
        Ok(())
    }

    pub fn disconnect(&mut self, node: NodeKey) -> Result<(), PageError> {
        self.doc.remove(node)?;
        self.sync_lifecycle();
        Ok(())
    }

    /// Fire connected/disconnected callbacks for every element whose
    /// connectedness no longer matches its controller.
    fn sync_lifecycle(&mut self) {
        let mut cx = HostContext {
            doc: &mut self.doc,
            media: &mut self.media,
            frames: &mut self.frames,
            events: &self.bus.evt_tx,
        };
        for element in self.elements.values_mut() {
            let connected = cx.doc.is_connected(element.host());
            match (connected, element.controller().is_attached()) {
                (true, false) => element.connected_callback(&mut cx),
                (false, true) => element.disconnected_callback(&mut cx),
                _ => {}
            }
        }
    }

    /// Drive the media query and deliver the resulting edge. Returns `true`
    /// if the value changed.
    pub fn emulate_media(&mut self, matches: bool) -> bool {
        let changed = self.media.set_matches(matches);
        self.pump_events();
        changed
    }

    /// Route queued bus events to their elements. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let events = self.bus.drain();
        let count = events.len();
        let mut cx = HostContext {
            doc: &mut self.doc,
            media: &mut self.media,
            frames: &mut self.frames,
            events: &self.bus.evt_tx,
        };
        for event in events {
            match event {
                HostEvent::MediaChange {
                    subscription,
                    matches,
                    ..
                } => {
                    let target = self
                        .elements
                        .values_mut()
                        .find(|el| el.controller().subscription() == Some(subscription));
                    match target {
                        Some(element) => element.handle_media_change(subscription, matches, &mut cx),
                        None => log::trace!(target: TARGET, "no element for {subscription}"),
                    }
                }
            }
        }
        count
    }

    /// Run one rendering frame. Returns how many callbacks were delivered.
    pub fn run_frame(&mut self) -> usize {
        let due = self.frames.take_due();
        let count = due.len();
        let mut cx = HostContext {
            doc: &mut self.doc,
            media: &mut self.media,
            frames: &mut self.frames,
            events: &self.bus.evt_tx,
        };
        for cb in due {
            match self.elements.get_mut(&cb.target) {
                Some(element) => element.handle_frame(cb.token, &mut cx),
                None => log::trace!(target: TARGET, "{} has no element", cb.target),
            }
        }
        count
    }

    /// Emulate `window.print()`: enter print mode, snapshot the tree the way
    /// the printer would see it, leave print mode and let the deferred hide
    /// run on the next frame.
    pub fn print(&mut self) -> Result<Vec<String>, PageError> {
        let was_printing = self.media.matches();
        self.emulate_media(true);
        let snapshot = self.outline()?;
        if !was_printing {
            self.emulate_media(false);
            self.run_frame();
        }
        Ok(snapshot)
    }

    pub fn outline(&self) -> Result<Vec<String>, PageError> {
        Ok(outline(&self.doc, self.doc.root())?)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
