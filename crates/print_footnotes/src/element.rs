//! The `<improved-print>` element: an open shadow root holding the template,
//! with a print controller scanning the light content.

use crate::config::FootnoteConfig;
use crate::controller::{HostContext, PrintController};
use crate::error::ElementError;
use crate::factory::stamp_template;
use core_types::{ComponentId, FrameToken, SubscriptionId};
use html::{Document, NodeKey};

pub const TAG_NAME: &str = "improved-print";

#[derive(Debug)]
pub struct ImprovedPrint {
    host: NodeKey,
    shadow: NodeKey,
    controller: PrintController,
}

impl ImprovedPrint {
    /// Upgrade `host`: attach its shadow root and stamp the template. Nothing is
    /// scanned until the element is connected.
    pub fn construct(
        doc: &mut Document,
        host: NodeKey,
        id: ComponentId,
        config: FootnoteConfig,
    ) -> Result<Self, ElementError> {
        config.validate()?;
        let shadow = doc.attach_shadow(host)?;
        stamp_template(doc, shadow)?;
        let controller = PrintController::new(id, host, shadow, config)?;
        log::debug!(target: "print_footnotes.element", "{id}: upgraded {host:?}");
        Ok(Self {
            host,
            shadow,
            controller,
        })
    }

    pub fn connected_callback(&mut self, cx: &mut HostContext<'_>) {
        self.controller.attach(cx);
    }

    pub fn disconnected_callback(&mut self, cx: &mut HostContext<'_>) {
        self.controller.detach(cx);
    }

    pub fn handle_media_change(
        &mut self,
        subscription: SubscriptionId,
        matches: bool,
        cx: &mut HostContext<'_>,
    ) {
        self.controller.on_media_change(subscription, matches, cx);
    }

    pub fn handle_frame(&mut self, token: FrameToken, cx: &mut HostContext<'_>) {
        self.controller.on_frame(token, cx);
    }

    pub fn host(&self) -> NodeKey {
        self.host
    }

    pub fn shadow_root(&self) -> NodeKey {
        self.shadow
    }

    pub fn controller(&self) -> &PrintController {
        &self.controller
    }
}
