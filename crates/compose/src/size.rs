//! Size aggregation: the single abstract unit reported to the host.
//!
//! Two strategies, one active per composition:
//!
//! - **Height quantization**: a [`SizeObserver`] receives the container's
//!   rendered height from the host and recomputes `ceil(height / unit)` on
//!   a spawned task, so the size never changes synchronously with a render.
//! - **Child sum**: each child's own size, with 1 for children that cannot
//!   report one. This is the only place that fallback is applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use stackcard_core::Card;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Size of a card without a size capability, and of an empty composition.
pub const DEFAULT_SIZE: u32 = 1;

/// Size of one child, applying the documented fallback.
pub async fn child_size(card: &dyn Card) -> u32 {
    card.card_size().await.unwrap_or(DEFAULT_SIZE)
}

/// Sum of child sizes; [`DEFAULT_SIZE`] when nothing is mounted.
pub async fn sum_child_sizes<'a>(cards: impl IntoIterator<Item = &'a dyn Card>) -> u32 {
    let sizes = join_all(cards.into_iter().map(|card| child_size(card))).await;
    if sizes.is_empty() {
        return DEFAULT_SIZE;
    }
    sizes.into_iter().sum()
}

/// `ceil(height_px / unit_px)`. A zero unit is treated as 1px.
pub fn quantize(height_px: f32, unit_px: u32) -> u32 {
    let unit = unit_px.max(1) as f32;
    (height_px.max(0.0) / unit).ceil() as u32
}

/// The host's side of a size observer: report rendered heights here.
#[derive(Clone)]
pub struct ResizeReporter {
    feed: Arc<watch::Sender<Option<f32>>>,
    connected: Arc<AtomicBool>,
}

impl ResizeReporter {
    /// Report the container's rendered height. Returns `false` once the
    /// observer has been disconnected.
    pub fn report(&self, height_px: f32) -> bool {
        self.connected.load(Ordering::Acquire) && self.feed.send(Some(height_px)).is_ok()
    }
}

/// Watches reported container heights and keeps a quantized size.
pub struct SizeObserver {
    feed: Arc<watch::Sender<Option<f32>>>,
    size: watch::Receiver<u32>,
    task: Option<JoinHandle<()>>,
    connected: Arc<AtomicBool>,
}

impl SizeObserver {
    /// Start observing, with the quantizing task spawned on `runtime`.
    pub fn observe(unit_px: u32, runtime: &Handle) -> Self {
        let (feed_tx, mut feed_rx) = watch::channel(None::<f32>);
        let (size_tx, size_rx) = watch::channel(0u32);

        let task = runtime.spawn(async move {
            while feed_rx.changed().await.is_ok() {
                let Some(height) = *feed_rx.borrow_and_update() else {
                    continue;
                };
                let units = quantize(height, unit_px);
                debug!(height_px = height, units, "Container resized");
                size_tx.send_replace(units);
            }
        });

        Self {
            feed: Arc::new(feed_tx),
            size: size_rx,
            task: Some(task),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn reporter(&self) -> ResizeReporter {
        ResizeReporter {
            feed: Arc::clone(&self.feed),
            connected: Arc::clone(&self.connected),
        }
    }

    /// Latest quantized size, or [`DEFAULT_SIZE`] before any height arrived.
    pub fn current(&self) -> u32 {
        match *self.size.borrow() {
            0 => DEFAULT_SIZE,
            units => units,
        }
    }

    /// A receiver that changes whenever the quantized size is recomputed.
    pub fn updates(&self) -> watch::Receiver<u32> {
        self.size.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Stop observing. Reporters return `false` afterwards.
    pub fn disconnect(&mut self) {
        self.connected.store(false, Ordering::Release);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SizeObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}
