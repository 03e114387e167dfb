//! The stack card: owns the ordered children and runs full renders.
//!
//! A full render is split in three steps so a newer config can overtake
//! an older one that is still creating children:
//!
//! ```text
//! set_config(raw) ──► PendingRender ──settle()──► SettledRender ──commit()──► RenderOutcome
//!   validate,            (no access to            all factory calls
//!   bump generation       the composition)        resolved, in order
//! ```
//!
//! `commit` mounts the settled children only if their generation is still
//! the current one; otherwise they are discarded on arrival.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use stackcard_config::{CompositionOptions, ConfigError, SizeStrategy, StackConfig};
use stackcard_core::{
    Card, CardError, CardFactory, CompositionError, CompositionEvent, Environment, EventBus,
    RebuildRequest, StyleMap,
};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::layout::LayoutEngine;
use crate::placeholder::ErrorCard;
use crate::propagate::{StylePropagator, forward_environment, theme_properties};
use crate::size::{DEFAULT_SIZE, ResizeReporter, SizeObserver, sum_child_sizes};
use crate::state::{ChildHandle, CompositionState, Container};

/// Errors surfaced by `set_config`.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Composition(#[from] CompositionError),
}

/// Lifecycle phase of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionPhase {
    Idle,
    Rendering,
    Ready,
    PartialRendering,
    TornDown,
}

/// What happened to a settled full render.
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// Children were mounted; `failed` of them are error placeholders.
    Committed {
        generation: u64,
        mounted: usize,
        failed: usize,
    },
    /// A newer render started (or the composition was torn down) first.
    Discarded { generation: u64, current_generation: u64 },
    /// Container setup failed; one error placeholder stands in for everything.
    Degraded {
        generation: u64,
        error: CompositionError,
    },
}

/// Static sizing hints for the host grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutHints {
    pub columns: u32,
    pub min_columns: u32,
    pub min_rows: u32,
}

/// A validated render waiting for its children to be created.
pub struct PendingRender {
    generation: u64,
    config: Arc<StackConfig>,
    factory: Arc<dyn CardFactory>,
}

impl PendingRender {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Create every child concurrently and wait for all of them, whether
    /// they succeed or not.
    pub async fn settle(self) -> SettledRender {
        let Self {
            generation,
            config,
            factory,
        } = self;

        let factory = factory.as_ref();
        // join_all yields outputs in input order, not completion order.
        let results = join_all(config.cards.iter().enumerate().map(|(index, card_config)| async move {
            debug!(
                generation,
                index,
                card_type = card_config.card_type().unwrap_or("<none>"),
                "Creating card"
            );
            factory.create_element(card_config).await
        }))
        .await;

        SettledRender {
            generation,
            config,
            results,
        }
    }
}

/// A render whose factory calls have all resolved.
pub struct SettledRender {
    generation: u64,
    config: Arc<StackConfig>,
    results: Vec<Result<Box<dyn Card>, CardError>>,
}

impl SettledRender {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A composition of cards presented to the host as one card.
pub struct StackCard {
    pub(crate) factory: Arc<dyn CardFactory>,
    options: CompositionOptions,
    layout: LayoutEngine,
    events: Arc<EventBus>,
    pub(crate) phase: CompositionPhase,
    pub(crate) generation: u64,
    config: Option<Arc<StackConfig>>,
    propagator: StylePropagator,
    pub(crate) state: CompositionState,
    environment: Option<Arc<Environment>>,
    root_style: StyleMap,
    viewport_width: u32,
    rebuild_tx: mpsc::UnboundedSender<RebuildRequest>,
    pub(crate) rebuild_rx: mpsc::UnboundedReceiver<RebuildRequest>,
}

impl StackCard {
    /// Create an idle composition backed by `factory`.
    pub fn new(factory: Arc<dyn CardFactory>) -> Self {
        let options = CompositionOptions::default();
        let (rebuild_tx, rebuild_rx) = mpsc::unbounded_channel();
        Self {
            factory,
            layout: LayoutEngine::new(options.responsive_breakpoint),
            viewport_width: options.viewport_width,
            options,
            events: Arc::new(EventBus::default()),
            phase: CompositionPhase::Idle,
            generation: 0,
            config: None,
            propagator: StylePropagator::default(),
            state: CompositionState::default(),
            environment: None,
            root_style: StyleMap::new(),
            rebuild_tx,
            rebuild_rx,
        }
    }

    pub fn with_options(mut self, options: CompositionOptions) -> Self {
        self.layout = LayoutEngine::new(options.responsive_breakpoint);
        self.viewport_width = options.viewport_width;
        self.options = options;
        self
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Mount the composition with its first config.
    pub async fn initialize(&mut self, raw: &serde_json::Value) -> Result<RenderOutcome, StackError> {
        info!("Initializing stack card");
        self.configure(raw).await
    }

    /// Validate, render and commit in one go.
    pub async fn configure(&mut self, raw: &serde_json::Value) -> Result<RenderOutcome, StackError> {
        let pending = self.set_config(raw)?;
        let settled = pending.settle().await;
        Ok(self.commit(settled))
    }

    /// Validate `raw` and start a full render.
    ///
    /// On a config error nothing is touched. Otherwise the current
    /// children stop listening for rebuilds, the generation is bumped,
    /// and the returned render must be settled and committed.
    pub fn set_config(&mut self, raw: &serde_json::Value) -> Result<PendingRender, StackError> {
        if self.phase == CompositionPhase::TornDown {
            return Err(CompositionError::TornDown.into());
        }
        let config = Arc::new(StackConfig::normalize(raw)?);

        let released = self.state.release();
        self.generation += 1;
        self.phase = CompositionPhase::Rendering;
        self.config = Some(Arc::clone(&config));

        info!(
            generation = self.generation,
            cards = config.cards.len(),
            released,
            "Full render started"
        );
        self.publish(CompositionEvent::RenderStarted {
            generation: self.generation,
            cards: config.cards.len(),
            timestamp: Utc::now(),
        });

        Ok(PendingRender {
            generation: self.generation,
            config,
            factory: Arc::clone(&self.factory),
        })
    }

    /// Mount a settled render, unless it has been superseded.
    ///
    /// The height observer is spawned on the current tokio runtime. Called
    /// outside one, the render still mounts but no observer is started and
    /// [`size`](Self::size) reports [`DEFAULT_SIZE`].
    pub fn commit(&mut self, settled: SettledRender) -> RenderOutcome {
        let SettledRender {
            generation,
            config,
            results,
        } = settled;

        if self.phase == CompositionPhase::TornDown || generation != self.generation {
            warn!(
                generation,
                current_generation = self.generation,
                "Discarding results of superseded render"
            );
            self.publish(CompositionEvent::RenderDiscarded {
                generation,
                current_generation: self.generation,
                timestamp: Utc::now(),
            });
            return RenderOutcome::Discarded {
                generation,
                current_generation: self.generation,
            };
        }

        let arrangement = match self.layout.resolve(&config, self.viewport_width) {
            Ok(arrangement) => arrangement,
            Err(e) => return self.degrade(generation, &config, e),
        };

        self.state.clear();
        self.propagator = StylePropagator::new(config.styles.clone(), config.parts.clone());

        let mut failed = 0;
        for (index, (card_config, result)) in config.cards.iter().zip(results).enumerate() {
            let handle = match result {
                Ok(card) => ChildHandle::new(card, card_config.clone(), generation, false),
                Err(e) => {
                    failed += 1;
                    warn!(generation, index, error = %e, "Card creation failed, mounting placeholder");
                    self.publish(CompositionEvent::ChildFailed {
                        generation,
                        index,
                        error_message: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    let placeholder = ErrorCard::for_child(card_config, &e);
                    ChildHandle::new(Box::new(placeholder), card_config.clone(), generation, true)
                }
            };
            self.state.handles.push(handle);
            self.attach(index);
        }

        self.state.container = Some(Container::new(config.title.clone(), arrangement));
        if let SizeStrategy::Height { unit_px } = self.options.size {
            match Handle::try_current() {
                Ok(runtime) => self.state.observer = Some(SizeObserver::observe(unit_px, &runtime)),
                Err(_) => warn!(generation, "No tokio runtime at commit, size stays at the default"),
            }
        }
        self.apply_theme();
        self.phase = CompositionPhase::Ready;

        let mounted = self.state.handles.len();
        info!(generation, mounted, failed, "Full render committed");
        self.publish(CompositionEvent::RenderCommitted {
            generation,
            mounted,
            failed,
            timestamp: Utc::now(),
        });

        RenderOutcome::Committed {
            generation,
            mounted,
            failed,
        }
    }

    /// Environment, styles and a fresh rebuild listener for the child at `index`.
    pub(crate) fn attach(&mut self, index: usize) {
        let Some(handle) = self.state.handles.get_mut(index) else {
            return;
        };
        if let Some(environment) = &self.environment {
            forward_environment(handle.card_mut(), environment);
        }
        self.propagator.apply(handle.card_mut());

        let request = RebuildRequest {
            index,
            generation: handle.generation(),
            card: handle.card_id(),
        };
        let subscription = handle
            .card()
            .rebuild_signal()
            .subscribe(request, self.rebuild_tx.clone());
        handle.set_subscription(subscription);
    }

    /// Replace everything with a single error placeholder.
    fn degrade(
        &mut self,
        generation: u64,
        config: &StackConfig,
        error: CompositionError,
    ) -> RenderOutcome {
        let released = self.state.clear();
        error!(generation, error = %error, released, "Stack composition failed");

        let origin = serde_json::to_value(config).unwrap_or(serde_json::Value::Null);
        let mut placeholder = ErrorCard::for_composition(origin, &error);
        if let Some(environment) = &self.environment {
            forward_environment(&mut placeholder, environment);
        }
        self.state.fallback = Some(placeholder);
        self.phase = CompositionPhase::Ready;

        self.publish(CompositionEvent::CompositionFailed {
            generation,
            error_message: error.to_string(),
            timestamp: Utc::now(),
        });
        RenderOutcome::Degraded { generation, error }
    }

    /// Forward a new environment to every current child.
    ///
    /// Children are never re-created; only the reference is handed over
    /// and the theme-derived properties are recomputed.
    pub fn set_environment(&mut self, environment: Arc<Environment>) {
        let mut updated = 0;
        for handle in &mut self.state.handles {
            if forward_environment(handle.card_mut(), &environment) {
                updated += 1;
            }
            self.propagator.apply(handle.card_mut());
        }
        if let Some(fallback) = self.state.fallback.as_mut() {
            forward_environment(fallback, &environment);
        }
        self.environment = Some(environment);
        self.apply_theme();

        debug!(children = updated, "Environment forwarded");
        self.publish(CompositionEvent::EnvironmentUpdated {
            children: updated,
            timestamp: Utc::now(),
        });
    }

    fn apply_theme(&mut self) {
        if let Some(props) = self.environment.as_deref().and_then(theme_properties) {
            self.root_style.merge(&props);
        }
    }

    /// Re-run the layout engine for a new viewport width.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
        if self.phase != CompositionPhase::Ready {
            return;
        }
        let Some(config) = self.config.clone() else {
            return;
        };
        if self.state.container.is_none() {
            return;
        }
        match self.layout.resolve(&config, width) {
            Ok(arrangement) => {
                if let Some(container) = self.state.container.as_mut() {
                    container.rearrange(arrangement);
                }
            }
            Err(e) => {
                let generation = self.generation;
                self.degrade(generation, &config, e);
            }
        }
    }

    /// The abstract size reported to the host.
    pub async fn size(&self) -> u32 {
        if self.state.fallback.is_some() {
            return DEFAULT_SIZE;
        }
        match self.options.size {
            SizeStrategy::ChildSum => {
                sum_child_sizes(self.state.handles.iter().map(|h| h.card())).await
            }
            SizeStrategy::Height { .. } => self
                .state
                .observer
                .as_ref()
                .map_or(DEFAULT_SIZE, |o| o.current()),
        }
    }

    /// Where the host reports the container's rendered height.
    pub fn resize_reporter(&self) -> Option<ResizeReporter> {
        self.state.observer.as_ref().map(|o| o.reporter())
    }

    /// Notified whenever the quantized size is recomputed.
    pub fn size_updates(&self) -> Option<watch::Receiver<u32>> {
        self.state.observer.as_ref().map(|o| o.updates())
    }

    pub fn layout_hints() -> LayoutHints {
        LayoutHints {
            columns: 12,
            min_columns: 3,
            min_rows: 1,
        }
    }

    /// Starting config for editors.
    pub fn stub_config() -> serde_json::Value {
        StackConfig::stub()
    }

    /// Detach: release every listener, disconnect the observer, unmount
    /// all children. The composition cannot be configured again.
    pub fn teardown(&mut self) {
        if self.phase == CompositionPhase::TornDown {
            return;
        }
        let released = self.state.clear();
        while self.rebuild_rx.try_recv().is_ok() {}
        self.phase = CompositionPhase::TornDown;

        info!(generation = self.generation, released, "Stack card torn down");
        self.publish(CompositionEvent::TornDown {
            generation: self.generation,
            released_subscriptions: released,
            timestamp: Utc::now(),
        });
    }

    fn publish(&self, event: CompositionEvent) {
        self.events.publish(event);
    }

    pub fn phase(&self) -> CompositionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The config of the latest full render.
    pub fn config(&self) -> Option<&StackConfig> {
        self.config.as_deref()
    }

    pub fn options(&self) -> &CompositionOptions {
        &self.options
    }

    pub fn handles(&self) -> &[ChildHandle] {
        &self.state.handles
    }

    pub fn container(&self) -> Option<&Container> {
        self.state.container.as_ref()
    }

    /// The placeholder shown when the whole composition failed.
    pub fn fallback(&self) -> Option<&ErrorCard> {
        self.state.fallback.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.state.fallback.is_some()
    }

    pub fn environment(&self) -> Option<&Arc<Environment>> {
        self.environment.as_ref()
    }

    /// Theme-derived custom properties on the composition root.
    pub fn root_style(&self) -> &StyleMap {
        &self.root_style
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }

    pub fn is_observing(&self) -> bool {
        self.state.observer.as_ref().is_some_and(|o| o.is_connected())
    }
}

impl Drop for StackCard {
    fn drop(&mut self) {
        self.state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedFactory;
    use serde_json::json;
    use stackcard_core::Theme;

    fn stack(factory: Arc<ScriptedFactory>) -> StackCard {
        StackCard::new(factory)
    }

    fn types(card: &StackCard) -> Vec<String> {
        card.handles()
            .iter()
            .map(|h| h.config().card_type().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn children_keep_config_order_when_completion_is_reversed() {
        let factory = Arc::new(ScriptedFactory::new());
        let mut card = stack(factory.clone());
        let outcome = card
            .configure(&json!({"cards": [
                {"type": "a", "delay_ms": 30},
                {"type": "b", "delay_ms": 20},
                {"type": "c", "delay_ms": 10}
            ]}))
            .await
            .unwrap();

        assert!(matches!(outcome, RenderOutcome::Committed { mounted: 3, failed: 0, .. }));
        assert_eq!(factory.completion_order(), vec!["c", "b", "a"]);
        assert_eq!(types(&card), vec!["a", "b", "c"]);
        assert_eq!(card.phase(), CompositionPhase::Ready);
    }

    #[tokio::test]
    async fn config_errors_leave_state_untouched() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({"cards": [{"type": "a"}]})).await.unwrap();
        let before = card.handles()[0].card_id();

        for bad in [json!({}), json!({"cards": []}), json!({"cards": "a"})] {
            let err = card.configure(&bad).await.err().unwrap();
            assert!(matches!(err, StackError::Config(_)));
        }
        assert_eq!(card.generation(), 1);
        assert_eq!(card.handles()[0].card_id(), before);
        assert!(card.handles()[0].is_subscribed());
    }

    #[tokio::test]
    async fn single_card_mounts() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({"cards": [{"type": "a"}]})).await.unwrap();
        assert_eq!(card.handles().len(), 1);
        assert!(!card.handles()[0].is_placeholder());
        assert!(card.handles()[0].is_subscribed());
    }

    #[tokio::test]
    async fn failed_child_becomes_placeholder_and_siblings_mount() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        let outcome = card
            .configure(&json!({"cards": [{"type": "a"}, {"type": "b", "fail": true}, {"type": "c"}]}))
            .await
            .unwrap();

        assert!(matches!(outcome, RenderOutcome::Committed { mounted: 3, failed: 1, .. }));
        let handles = card.handles();
        assert!(!handles[0].is_placeholder());
        assert!(handles[1].is_placeholder());
        assert_eq!(handles[1].card().card_type(), "error");
        assert_eq!(handles[1].config().card_type(), Some("b"));
        assert!(!handles[2].is_placeholder());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_render_is_discarded() {
        let factory = Arc::new(ScriptedFactory::new());
        let mut card = stack(factory);

        let first = card
            .set_config(&json!({"cards": [{"type": "old", "delay_ms": 50}]}))
            .unwrap();
        let second = card
            .set_config(&json!({"cards": [{"type": "new1"}, {"type": "new2"}]}))
            .unwrap();
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);

        let settled_second = second.settle().await;
        assert!(matches!(card.commit(settled_second), RenderOutcome::Committed { .. }));

        let settled_first = first.settle().await;
        let outcome = card.commit(settled_first);
        assert!(matches!(
            outcome,
            RenderOutcome::Discarded { generation: 1, current_generation: 2 }
        ));
        assert_eq!(types(&card), vec!["new1", "new2"]);
    }

    #[tokio::test]
    async fn invalid_grid_degrades_whole_composition() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        let outcome = card
            .configure(&json!({"cards": [{"type": "a"}], "grid": {"columns": "repeat(2, 1fr"}}))
            .await
            .unwrap();

        assert!(matches!(outcome, RenderOutcome::Degraded { .. }));
        assert!(card.is_degraded());
        assert!(card.handles().is_empty());
        assert!(card.container().is_none());
        assert!(!card.is_observing());
        let fallback = card.fallback().unwrap();
        assert_eq!(fallback.title(), crate::placeholder::STACK_ERROR_TITLE);
        assert_eq!(fallback.origin()["cards"][0]["type"], "a");
        assert_eq!(card.size().await, DEFAULT_SIZE);
    }

    #[tokio::test]
    async fn degraded_composition_recovers_on_next_config() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({"cards": [{"type": "a"}], "grid": {"columns": 0}}))
            .await
            .unwrap();
        assert!(card.is_degraded());

        card.configure(&json!({"cards": [{"type": "a"}]})).await.unwrap();
        assert!(!card.is_degraded());
        assert_eq!(card.handles().len(), 1);
    }

    #[tokio::test]
    async fn style_overrides_reach_every_child() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({
            "cards": [{"type": "a"}, {"type": "b", "fail": true}],
            "styles": {"accent": "red"}
        }))
        .await
        .unwrap();
        for handle in card.handles() {
            assert_eq!(handle.card().style().get("accent"), Some("red"));
        }
    }

    #[tokio::test]
    async fn environment_is_forwarded_without_recreating() {
        let factory = Arc::new(ScriptedFactory::new());
        let mut card = stack(factory.clone());
        card.configure(&json!({"cards": [{"type": "a"}, {"type": "b"}]})).await.unwrap();
        let ids: Vec<_> = card.handles().iter().map(|h| h.card_id()).collect();
        let calls = factory.call_count();

        let env = Arc::new(Environment::new().with_theme(Theme {
            dark_mode: true,
            primary_color: None,
        }));
        card.set_environment(Arc::clone(&env));

        assert_eq!(factory.call_count(), calls);
        for (handle, id) in card.handles().iter().zip(ids) {
            assert_eq!(handle.card_id(), id);
            assert!(Arc::ptr_eq(handle.card().environment().unwrap(), &env));
        }
        assert_eq!(card.root_style().get("--card-background"), Some("#1e1e1e"));
        assert_eq!(card.root_style().get("--primary-color"), Some("#1976d2"));
    }

    #[tokio::test]
    async fn environment_set_before_render_reaches_new_children() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        let env = Arc::new(Environment::new());
        card.set_environment(Arc::clone(&env));
        card.configure(&json!({"cards": [{"type": "a"}]})).await.unwrap();
        assert!(Arc::ptr_eq(card.handles()[0].card().environment().unwrap(), &env));
    }

    #[tokio::test]
    async fn child_sum_strategy() {
        let mut card = stack(Arc::new(ScriptedFactory::new()))
            .with_options(CompositionOptions::default().with_size(SizeStrategy::ChildSum));
        assert_eq!(card.size().await, DEFAULT_SIZE);

        card.configure(&json!({"cards": [
            {"type": "a", "size": 2},
            {"type": "b", "size": 1},
            {"type": "c", "size": 3}
        ]}))
        .await
        .unwrap();
        assert_eq!(card.size().await, 6);
        assert!(card.resize_reporter().is_none());
    }

    #[tokio::test]
    async fn height_strategy_updates_asynchronously() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        assert_eq!(card.size().await, DEFAULT_SIZE);
        card.configure(&json!({"cards": [{"type": "a"}]})).await.unwrap();
        assert_eq!(card.size().await, DEFAULT_SIZE);

        let mut updates = card.size_updates().unwrap();
        assert!(card.resize_reporter().unwrap().report(123.0));
        // Not applied synchronously with the report.
        assert_eq!(card.size().await, DEFAULT_SIZE);
        updates.changed().await.unwrap();
        assert_eq!(card.size().await, 3);
    }

    #[test]
    fn commit_outside_runtime_mounts_without_observer() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        let pending = card.set_config(&json!({"cards": [{"type": "a"}]})).unwrap();
        let settled = runtime.block_on(pending.settle());

        let outcome = card.commit(settled);
        assert!(matches!(outcome, RenderOutcome::Committed { mounted: 1, .. }));
        assert_eq!(card.phase(), CompositionPhase::Ready);
        assert!(!card.is_observing());
        assert!(card.resize_reporter().is_none());
        assert_eq!(runtime.block_on(card.size()), DEFAULT_SIZE);
    }

    #[tokio::test]
    async fn viewport_change_rearranges_container() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({"cards": [{"type": "a"}, {"type": "b"}], "grid": {"columns": 2}}))
            .await
            .unwrap();
        assert!(!card.container().unwrap().arrangement().is_single_column());

        card.set_viewport_width(480);
        assert!(card.container().unwrap().arrangement().is_single_column());

        card.set_viewport_width(1200);
        assert_eq!(card.container().unwrap().arrangement().column_count(2), 2);
    }

    #[tokio::test]
    async fn title_lands_on_container() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({"cards": [{"type": "a"}], "title": "Kitchen"}))
            .await
            .unwrap();
        assert_eq!(card.container().unwrap().title(), "Kitchen");
    }

    #[tokio::test]
    async fn teardown_is_terminal() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        card.configure(&json!({"cards": [{"type": "a"}]})).await.unwrap();
        let signal = card.handles()[0].card().rebuild_signal().clone();

        card.teardown();
        assert_eq!(card.phase(), CompositionPhase::TornDown);
        assert!(card.handles().is_empty());
        assert!(!card.is_observing());
        assert!(!signal.is_listening());

        let err = card.configure(&json!({"cards": [{"type": "a"}]})).await.err().unwrap();
        assert!(matches!(err, StackError::Composition(CompositionError::TornDown)));
    }

    #[tokio::test]
    async fn render_settled_after_teardown_is_discarded() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        let pending = card.set_config(&json!({"cards": [{"type": "a"}]})).unwrap();
        card.teardown();
        let outcome = card.commit(pending.settle().await);
        assert!(matches!(outcome, RenderOutcome::Discarded { .. }));
        assert!(card.handles().is_empty());
    }

    #[tokio::test]
    async fn events_are_published() {
        let mut card = stack(Arc::new(ScriptedFactory::new()));
        let mut rx = card.events().subscribe();
        card.configure(&json!({"cards": [{"type": "a", "fail": true}]})).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(match event.as_ref() {
                CompositionEvent::RenderStarted { .. } => "started",
                CompositionEvent::ChildFailed { .. } => "child_failed",
                CompositionEvent::RenderCommitted { .. } => "committed",
                _ => "other",
            });
        }
        assert_eq!(seen, vec!["started", "child_failed", "committed"]);
    }

    #[test]
    fn stub_and_hints() {
        assert_eq!(StackCard::stub_config()["spacing"], 8);
        assert_eq!(StackCard::layout_hints().min_rows, 1);
    }
}
