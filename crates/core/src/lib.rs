//! # stackcard core
//!
//! Domain types, traits, and error definitions for composing dashboard
//! cards into one stacked container. This crate has **no framework
//! dependencies**; it defines the model every other crate builds on.
//!
//! ## Design Philosophy
//!
//! Each collaborator of the composition is a trait here:
//! - [`Card`]: one mounted child and its optional capabilities
//! - [`CardFactory`]: creates cards from child configs (injected, never global)
//!
//! Implementations live in their own crates, so the composition can be
//! driven by the built-in demo cards, a host runtime, or test doubles.

pub mod card;
pub mod environment;
pub mod error;
pub mod event;
pub mod factory;
pub mod signal;
pub mod style;

// Re-export key types at crate root for ergonomics
pub use card::{Card, CardConfig, CardId};
pub use environment::{Environment, Theme};
pub use error::{CardError, CompositionError, Error, Result};
pub use event::{CompositionEvent, EventBus};
pub use factory::{CardBuilder, CardFactory, CardRegistry};
pub use signal::{RebuildRequest, RebuildSignal, Subscription};
pub use style::{PartRegion, StyleMap};
