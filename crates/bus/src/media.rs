use crate::HostEvent;
use core_types::{IdAllocator, SubscriptionId};
use std::sync::mpsc::Sender;

/// Boolean environment signal with edge-triggered notifications.
pub trait MediaSignal {
    /// The query this signal evaluates, e.g. `print`.
    fn media(&self) -> &str;

    /// Latest match value.
    fn matches(&self) -> bool;

    /// Register a listener. Every later edge sends one
    /// [`HostEvent::MediaChange`] tagged with the returned id.
    fn subscribe(&mut self, listener: Sender<HostEvent>) -> SubscriptionId;

    /// Returns `true` if the subscription existed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// A single media query whose value is driven by the host (print preview,
/// `window.print()` emulation, tests).
#[derive(Debug)]
pub struct MediaQueryList {
    media: String,
    matches: bool,
    listeners: Vec<(SubscriptionId, Sender<HostEvent>)>,
    ids: IdAllocator,
}

impl MediaQueryList {
    pub fn new(media: &str) -> Self {
        Self {
            media: media.trim().to_ascii_lowercase(),
            matches: false,
            listeners: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn print() -> Self {
        Self::new("print")
    }

    /// Update the match value. Listeners hear about edges only; returns `true`
    /// when the value actually changed.
    pub fn set_matches(&mut self, matches: bool) -> bool {
        if self.matches == matches {
            return false;
        }
        self.matches = matches;
        log::debug!(
            target: "bus.media",
            "({}) now matches={matches}, notifying {} listener(s)",
            self.media,
            self.listeners.len()
        );
        let media = &self.media;
        self.listeners.retain(|(subscription, tx)| {
            let delivered = tx
                .send(HostEvent::MediaChange {
                    subscription: *subscription,
                    media: media.clone(),
                    matches,
                })
                .is_ok();
            if !delivered {
                log::debug!(target: "bus.media", "dropping closed listener {subscription}");
            }
            delivered
        });
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl MediaSignal for MediaQueryList {
    fn media(&self) -> &str {
        &self.media
    }

    fn matches(&self) -> bool {
        self.matches
    }

    fn subscribe(&mut self, listener: Sender<HostEvent>) -> SubscriptionId {
        let id = SubscriptionId::from_raw(self.ids.next_raw());
        self.listeners.push((id, listener));
        log::trace!(target: "bus.media", "({}) subscribed {id}", self.media);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        let removed = self.listeners.len() != before;
        log::trace!(target: "bus.media", "({}) unsubscribe {id}: {removed}", self.media);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bus;

    #[test]
    fn notifies_on_edges_only() {
        let bus = Bus::new();
        let mut mql = MediaQueryList::print();
        let id = mql.subscribe(bus.evt_tx.clone());

        assert!(mql.set_matches(true));
        assert!(!mql.set_matches(true));
        assert!(mql.set_matches(false));

        assert_eq!(
            bus.drain(),
            vec![
                HostEvent::MediaChange {
                    subscription: id,
                    media: "print".to_string(),
                    matches: true
                },
                HostEvent::MediaChange {
                    subscription: id,
                    media: "print".to_string(),
                    matches: false
                },
            ]
        );
    }

    #[test]
    fn unsubscribed_listeners_hear_nothing() {
        let bus = Bus::new();
        let mut mql = MediaQueryList::new(" PRINT ");
        assert_eq!(mql.media(), "print");
        let first = mql.subscribe(bus.evt_tx.clone());
        let second = mql.subscribe(bus.evt_tx.clone());
        assert_ne!(first, second);

        assert!(mql.unsubscribe(first));
        assert!(!mql.unsubscribe(first));
        mql.set_matches(true);

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            HostEvent::MediaChange { subscription, .. } if subscription == second
        ));
    }

    #[test]
    fn closed_receivers_are_pruned() {
        let mut mql = MediaQueryList::print();
        {
            let bus = Bus::new();
            mql.subscribe(bus.evt_tx.clone());
        }
        assert_eq!(mql.listener_count(), 1);
        mql.set_matches(true);
        assert_eq!(mql.listener_count(), 0);
    }
}
