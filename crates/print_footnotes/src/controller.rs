//! Print-state controller.
//!
//! ```text
//! Uninitialized --attach--> Ready(Hidden) <--media edges--> Ready(Visible)
//! Ready(_) --detach--> TornDown --attach--> Ready(_)
//! ```
//!
//! Invariants:
//! - Markers, entries and the list container are built at most once per
//!   controller, on the first attach. Later transitions only flip `hidden`.
//! - `markers[i]` and `entries[i]` both carry citation index `i + 1`, and
//!   `markers[i]` is the last child appended to `links[i]`.
//! - Showing is immediate. Hiding waits for one frame; at most one hide is
//!   pending and showing again cancels it.
//! - The media subscription is taken last during attach, so no edge is seen
//!   while nodes are being built.
//! - Once detached, no node is touched until the next attach.

use crate::config::FootnoteConfig;
use crate::error::ConfigError;
use crate::factory::{
    CitationIndex, FootnoteList, make_footnote_entry, make_footnote_list, make_index_marker,
};
use crate::scanner::{LinkRef, LinkScanner};
use bus::{FrameScheduler, HostEvent, MediaSignal};
use core_types::{ComponentId, FrameToken, SubscriptionId};
use html::{Document, DomError, NodeKey};
use std::sync::mpsc::Sender;

const TARGET: &str = "print_footnotes.controller";

/// Host capabilities a controller needs while handling one event.
pub struct HostContext<'a> {
    pub doc: &'a mut Document,
    pub media: &'a mut dyn MediaSignal,
    pub frames: &'a mut dyn FrameScheduler,
    /// Where media edges for this host are delivered.
    pub events: &'a Sender<HostEvent>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintState {
    Uninitialized,
    Ready(Visibility),
    TornDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Attached,
    TornDown,
}

#[derive(Debug, Default)]
struct Footnotes {
    links: Vec<LinkRef>,
    markers: Vec<NodeKey>,
    entries: Vec<NodeKey>,
    list: Option<FootnoteList>,
}

impl Footnotes {
    /// Every node whose `hidden` flag follows the print state.
    fn toggled(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.markers
            .iter()
            .copied()
            .chain(self.list.map(|list| list.nav))
    }
}

#[derive(Debug)]
pub struct PrintController {
    id: ComponentId,
    content: NodeKey,
    render: NodeKey,
    config: FootnoteConfig,
    scanner: LinkScanner,
    lifecycle: Lifecycle,
    /// What the generated nodes currently show, attached or not.
    visibility: Visibility,
    footnotes: Option<Footnotes>,
    subscription: Option<SubscriptionId>,
    pending_hide: Option<FrameToken>,
}

impl PrintController {
    /// `content` is scanned for links; the footnote list is appended to `render`.
    pub fn new(
        id: ComponentId,
        content: NodeKey,
        render: NodeKey,
        config: FootnoteConfig,
    ) -> Result<Self, ConfigError> {
        let scanner = LinkScanner::new(&config)?;
        Ok(Self {
            id,
            content,
            render,
            config,
            scanner,
            lifecycle: Lifecycle::Uninitialized,
            visibility: Visibility::Hidden,
            footnotes: None,
            subscription: None,
            pending_hide: None,
        })
    }

    pub fn attach(&mut self, cx: &mut HostContext<'_>) {
        match self.lifecycle {
            Lifecycle::Attached => {
                log::debug!(target: TARGET, "{}: already attached", self.id);
                return;
            }
            Lifecycle::Uninitialized => {
                let footnotes = self.build(cx.doc).unwrap_or_else(|err| {
                    log::warn!(target: TARGET, "{}: footnotes disabled: {err}", self.id);
                    Footnotes::default()
                });
                log::debug!(
                    target: TARGET,
                    "{}: built {} footnote(s)",
                    self.id,
                    footnotes.markers.len()
                );
                self.footnotes = Some(footnotes);
            }
            Lifecycle::TornDown => {
                log::debug!(target: TARGET, "{}: reattached", self.id);
            }
        }

        self.subscription = Some(cx.media.subscribe(cx.events.clone()));
        self.lifecycle = Lifecycle::Attached;

        let current = if cx.media.matches() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        self.apply(cx.doc, current);
    }

    pub fn detach(&mut self, cx: &mut HostContext<'_>) {
        if self.lifecycle != Lifecycle::Attached {
            return;
        }
        if let Some(subscription) = self.subscription.take() {
            cx.media.unsubscribe(subscription);
        }
        if let Some(token) = self.pending_hide.take() {
            cx.frames.cancel_frame(token);
            log::debug!(target: TARGET, "{}: dropped pending hide {token}", self.id);
        }
        self.lifecycle = Lifecycle::TornDown;
        log::debug!(target: TARGET, "{}: detached", self.id);
    }

    pub fn on_media_change(
        &mut self,
        subscription: SubscriptionId,
        matches: bool,
        cx: &mut HostContext<'_>,
    ) {
        if self.lifecycle != Lifecycle::Attached || self.subscription != Some(subscription) {
            log::trace!(target: TARGET, "{}: ignoring stale {subscription}", self.id);
            return;
        }
        if matches {
            self.enter_print(cx);
        } else {
            self.exit_print(cx);
        }
    }

    pub fn on_frame(&mut self, token: FrameToken, cx: &mut HostContext<'_>) {
        if self.pending_hide != Some(token) {
            log::trace!(target: TARGET, "{}: ignoring stale {token}", self.id);
            return;
        }
        self.pending_hide = None;
        if self.lifecycle != Lifecycle::Attached {
            return;
        }
        self.apply(cx.doc, Visibility::Hidden);
    }

    fn enter_print(&mut self, cx: &mut HostContext<'_>) {
        if let Some(token) = self.pending_hide.take() {
            cx.frames.cancel_frame(token);
        }
        self.apply(cx.doc, Visibility::Visible);
    }

    fn exit_print(&mut self, cx: &mut HostContext<'_>) {
        if self.pending_hide.is_some() || self.visibility == Visibility::Hidden {
            return;
        }
        let has_nodes = self
            .footnotes
            .as_ref()
            .is_some_and(|f| f.toggled().next().is_some());
        if !has_nodes {
            self.visibility = Visibility::Hidden;
            return;
        }
        let token = cx.frames.request_frame(self.id);
        log::debug!(target: TARGET, "{}: hide deferred to {token}", self.id);
        self.pending_hide = Some(token);
    }

    fn apply(&mut self, doc: &mut Document, target: Visibility) {
        if self.visibility == target {
            return;
        }
        let hidden = target == Visibility::Hidden;
        if let Some(footnotes) = &self.footnotes {
            for node in footnotes.toggled() {
                if let Err(err) = doc.toggle_attr(node, "hidden", hidden) {
                    log::warn!(target: TARGET, "{}: cannot toggle {node:?}: {err}", self.id);
                }
            }
        }
        self.visibility = target;
        log::debug!(target: TARGET, "{}: footnotes {target:?}", self.id);
    }

    fn build(&self, doc: &mut Document) -> Result<Footnotes, DomError> {
        let links = self.scanner.scan(doc, self.content);
        if links.is_empty() {
            return Ok(Footnotes::default());
        }

        let list = make_footnote_list(doc, &self.config)?;
        let mut markers = Vec::with_capacity(links.len());
        let mut entries = Vec::with_capacity(links.len());
        for (position, link) in links.iter().enumerate() {
            let index = CitationIndex::from_position(position);

            let entry = make_footnote_entry(doc, index, &link.address)?;
            doc.append_child(list.list, entry)?;
            entries.push(entry);

            let marker = make_index_marker(doc, index, &self.config)?;
            doc.append_child(link.node, marker)?;
            markers.push(marker);
        }
        doc.append_child(self.render, list.nav)?;

        Ok(Footnotes {
            links,
            markers,
            entries,
            list: Some(list),
        })
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn content(&self) -> NodeKey {
        self.content
    }

    pub fn render(&self) -> NodeKey {
        self.render
    }

    pub fn state(&self) -> PrintState {
        match self.lifecycle {
            Lifecycle::Uninitialized => PrintState::Uninitialized,
            Lifecycle::Attached => PrintState::Ready(self.visibility),
            Lifecycle::TornDown => PrintState::TornDown,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == Lifecycle::Attached
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn pending_hide(&self) -> Option<FrameToken> {
        self.pending_hide
    }

    pub fn links(&self) -> &[LinkRef] {
        self.footnotes
            .as_ref()
            .map(|f| f.links.as_slice())
            .unwrap_or_default()
    }

    pub fn markers(&self) -> &[NodeKey] {
        self.footnotes
            .as_ref()
            .map(|f| f.markers.as_slice())
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[NodeKey] {
        self.footnotes
            .as_ref()
            .map(|f| f.entries.as_slice())
            .unwrap_or_default()
    }

    pub fn footnote_list(&self) -> Option<FootnoteList> {
        self.footnotes.as_ref().and_then(|f| f.list)
    }

    /// Citation index paired with the link it was assigned to.
    pub fn citations(&self) -> impl Iterator<Item = (CitationIndex, &LinkRef)> + '_ {
        self.links()
            .iter()
            .enumerate()
            .map(|(position, link)| (CitationIndex::from_position(position), link))
    }
}
