//! # stackcard-compose
//!
//! The composition manager: presents an ordered list of child cards as
//! one card. It creates every child concurrently, mounts them in config
//! order, rebuilds single children in place when they ask for it, and
//! reports one abstract size to the host.
//!
//! ```text
//! host ──config──► StackCard ──create_element──► CardFactory
//!                      │  ▲
//!          mounts      │  │ rebuild signals (index, generation, card id)
//!                      ▼  │
//!                  ChildHandle × N ──► Container (layout) ──► SizeObserver
//! ```

pub mod layout;
pub mod placeholder;
pub mod propagate;
pub mod rebuild;
pub mod size;
pub mod stack;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use layout::{Arrangement, GridTemplate, LayoutEngine, StackDirection};
pub use placeholder::{CARD_ERROR_TITLE, ErrorCard, STACK_ERROR_TITLE};
pub use propagate::{StylePropagator, forward_environment, theme_properties};
pub use rebuild::RebuildOutcome;
pub use size::{DEFAULT_SIZE, ResizeReporter, SizeObserver, quantize, sum_child_sizes};
pub use stack::{
    CompositionPhase, LayoutHints, PendingRender, RenderOutcome, SettledRender, StackCard,
    StackError,
};
pub use state::{ChildHandle, Container};
