//! Hardware-independent core library for tactile
//!
//! This crate contains the stateful widget engine shared by the three touch
//! components (pull-to-refresh container, expandable card, image gallery):
//! the host interface they render through, the per-node lifecycle registry
//! that owns their state, the UTF-8 safe truncation engine, and an in-memory
//! retained scene graph that implements the host for tests and the simulator.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts.

#![no_std]

extern crate alloc;

pub mod error;
pub mod host;
pub mod lifecycle;
pub mod scene;
pub mod text;
pub mod ui;
pub mod widgets;

pub use error::{WidgetError, WidgetResult};
pub use host::{EventKind, EventMask, EventSource, HostError, HostEvent, NodeId, SceneHost};
pub use lifecycle::{LifecycleStats, WidgetRegistry};
pub use scene::Scene;
pub use widgets::WidgetSet;
