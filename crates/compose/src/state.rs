//! Composition state: the ordered child handles and the mounted container.

use stackcard_core::{Card, CardConfig, CardId, StyleMap, Subscription};

use crate::layout::Arrangement;
use crate::placeholder::ErrorCard;
use crate::size::SizeObserver;

/// A mounted child bound to its position, config and generation.
pub struct ChildHandle {
    card: Box<dyn Card>,
    config: CardConfig,
    generation: u64,
    placeholder: bool,
    subscription: Option<Subscription>,
}

impl ChildHandle {
    pub(crate) fn new(card: Box<dyn Card>, config: CardConfig, generation: u64, placeholder: bool) -> Self {
        Self {
            card,
            config,
            generation,
            placeholder,
            subscription: None,
        }
    }

    pub fn card(&self) -> &dyn Card {
        self.card.as_ref()
    }

    pub(crate) fn card_mut(&mut self) -> &mut dyn Card {
        self.card.as_mut()
    }

    pub fn card_id(&self) -> CardId {
        self.card.id()
    }

    /// The child config this handle was created from.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an error placeholder is mounted here.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Whether this handle's rebuild listener is attached and unfired.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| s.is_active())
    }

    pub(crate) fn set_subscription(&mut self, subscription: Subscription) {
        self.release();
        self.subscription = Some(subscription);
    }

    /// Swap the mounted card, keeping position, config and generation.
    pub(crate) fn replace(&mut self, card: Box<dyn Card>, placeholder: bool) {
        self.release();
        self.card = card;
        self.placeholder = placeholder;
    }

    /// Cancel the rebuild listener. Returns `true` if a live one was removed.
    pub(crate) fn release(&mut self) -> bool {
        self.subscription.take().is_some_and(|s| s.cancel())
    }
}

/// The container element children are mounted into.
#[derive(Debug, Clone)]
pub struct Container {
    title: String,
    frame: StyleMap,
    arrangement: Arrangement,
    style: StyleMap,
}

impl Container {
    pub fn new(title: impl Into<String>, arrangement: Arrangement) -> Self {
        let mut frame = StyleMap::new();
        frame.set_property("overflow", "hidden");
        let style = arrangement.declarations();
        Self {
            title: title.into(),
            frame,
            arrangement,
            style,
        }
    }

    /// Header text; empty means no header.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Declarations on the outer card frame.
    pub fn frame(&self) -> &StyleMap {
        &self.frame
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Declarations on the element holding the children.
    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    pub(crate) fn rearrange(&mut self, arrangement: Arrangement) {
        self.style = arrangement.declarations();
        self.arrangement = arrangement;
    }
}

/// Everything a rendered composition owns.
#[derive(Default)]
pub struct CompositionState {
    pub(crate) handles: Vec<ChildHandle>,
    pub(crate) container: Option<Container>,
    pub(crate) observer: Option<SizeObserver>,
    pub(crate) fallback: Option<ErrorCard>,
}

impl CompositionState {
    /// Cancel every listener and disconnect the observer, leaving mounted
    /// cards in place. Returns the number of live listeners removed.
    pub(crate) fn release(&mut self) -> usize {
        let mut released = 0;
        for handle in &mut self.handles {
            if handle.release() {
                released += 1;
            }
        }
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
        released
    }

    /// Release everything and unmount all children.
    pub(crate) fn clear(&mut self) -> usize {
        let released = self.release();
        self.handles.clear();
        self.container = None;
        self.fallback = None;
        released
    }
}
