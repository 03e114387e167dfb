//! Partial rebuilds: re-create one child in place when it signals.
//!
//! A signal carries the index, generation and card id it was subscribed
//! with. It is honored only if all three still match the mounted child;
//! anything else (including a signal arriving while a full render is in
//! flight) is dropped as stale. A full render always rebuilds every
//! child anyway.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use stackcard_core::{Card, CardConfig, CardError, CompositionEvent, RebuildRequest};
use tracing::{debug, info, warn};

use crate::placeholder::ErrorCard;
use crate::stack::{CompositionPhase, StackCard};

/// What happened to one rebuild request.
#[derive(Debug, Clone)]
pub enum RebuildOutcome {
    /// A fresh card now sits at `index`.
    Replaced { index: usize, generation: u64 },
    /// Re-creation failed; an error placeholder sits at `index`.
    Failed { index: usize, error: CardError },
    /// The request no longer matched the composition and was ignored.
    Stale { index: usize, generation: u64 },
}

impl RebuildOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Replaced { index, .. } | Self::Failed { index, .. } | Self::Stale { index, .. } => {
                *index
            }
        }
    }
}

impl StackCard {
    /// Wait for the next rebuild signal from any child.
    ///
    /// Returns `None` only if the channel is closed, which cannot happen
    /// while the stack card is alive.
    pub async fn next_rebuild_request(&mut self) -> Option<RebuildRequest> {
        self.rebuild_rx.recv().await
    }

    /// Handle every rebuild signal queued so far.
    pub async fn process_rebuilds(&mut self) -> Vec<RebuildOutcome> {
        let mut requests = Vec::new();
        while let Ok(request) = self.rebuild_rx.try_recv() {
            requests.push(request);
        }
        if requests.is_empty() {
            return Vec::new();
        }
        self.rebuild(requests).await
    }

    /// Handle one rebuild request.
    pub async fn handle_rebuild(&mut self, request: RebuildRequest) -> RebuildOutcome {
        let index = request.index;
        let generation = request.generation;
        self.rebuild(vec![request])
            .await
            .pop()
            .unwrap_or(RebuildOutcome::Stale { index, generation })
    }

    async fn rebuild(&mut self, requests: Vec<RebuildRequest>) -> Vec<RebuildOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        let mut accepted: Vec<(usize, CardConfig)> = Vec::new();

        for request in requests {
            // One partial rebuild per index.
            let duplicate = accepted.iter().any(|(index, _)| *index == request.index);
            match self.accept(&request).filter(|_| !duplicate) {
                Some(config) => accepted.push((request.index, config)),
                None => outcomes.push(self.discard(request)),
            }
        }
        if accepted.is_empty() {
            return outcomes;
        }

        self.phase = CompositionPhase::PartialRendering;
        let factory = Arc::clone(&self.factory);
        let results = join_all(accepted.iter().map(|(index, config)| {
            let factory = &factory;
            async move {
                debug!(index, "Rebuilding card");
                factory.create_element(config).await
            }
        }))
        .await;

        for ((index, config), result) in accepted.into_iter().zip(results) {
            outcomes.push(self.swap_in(index, &config, result));
        }
        self.phase = CompositionPhase::Ready;
        outcomes
    }

    /// The child config to rebuild from, if `request` still matches.
    fn accept(&self, request: &RebuildRequest) -> Option<CardConfig> {
        if self.phase != CompositionPhase::Ready || request.generation != self.generation {
            return None;
        }
        let handle = self.state.handles.get(request.index)?;
        (handle.generation() == request.generation && handle.card_id() == request.card)
            .then(|| handle.config().clone())
    }

    fn discard(&self, request: RebuildRequest) -> RebuildOutcome {
        warn!(
            index = request.index,
            signal_generation = request.generation,
            current_generation = self.generation,
            "Ignoring stale rebuild signal"
        );
        self.events().publish(CompositionEvent::StaleSignalDiscarded {
            index: request.index,
            signal_generation: request.generation,
            current_generation: self.generation,
            timestamp: Utc::now(),
        });
        RebuildOutcome::Stale {
            index: request.index,
            generation: request.generation,
        }
    }

    fn swap_in(
        &mut self,
        index: usize,
        config: &CardConfig,
        result: Result<Box<dyn Card>, CardError>,
    ) -> RebuildOutcome {
        let generation = self.generation;
        let Some(handle) = self.state.handles.get_mut(index) else {
            return RebuildOutcome::Stale { index, generation };
        };

        let outcome = match result {
            Ok(card) => {
                handle.replace(card, false);
                info!(generation, index, "Card rebuilt");
                self.events().publish(CompositionEvent::ChildRebuilt {
                    generation,
                    index,
                    timestamp: Utc::now(),
                });
                RebuildOutcome::Replaced { index, generation }
            }
            Err(error) => {
                handle.replace(Box::new(ErrorCard::for_child(config, &error)), true);
                warn!(generation, index, error = %error, "Card rebuild failed, mounting placeholder");
                self.events().publish(CompositionEvent::ChildFailed {
                    generation,
                    index,
                    error_message: error.to_string(),
                    timestamp: Utc::now(),
                });
                RebuildOutcome::Failed { index, error }
            }
        };
        self.attach(index);
        outcome
    }
}
