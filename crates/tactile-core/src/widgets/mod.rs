//! The three touch widgets and the set that routes host events to them
//!
//! Each widget kind keeps its instances in its own registry. An application
//! usually owns one [`WidgetSet`] and feeds it every event the host
//! produces:
//!
//! ```ignore
//! let mut widgets = WidgetSet::new();
//! let list = widgets.pull_refresh.create(&mut scene, root, config, &theme)?;
//!
//! scene.drag_to(list, -30);
//! scene.release(list);
//! let unhandled = widgets.pump(&mut scene);
//! ```

pub mod expandable_card;
pub mod gallery;
pub mod pull_refresh;

use alloc::vec::Vec;
use log::trace;

use crate::host::{EventSource, HostEvent, SceneHost};
use crate::lifecycle::LifecycleStats;

pub use expandable_card::{CardConfig, CardData, CardWidgets};
pub use gallery::{Carousel, GalleryConfig, GalleryImage, GalleryWidgets};
pub use pull_refresh::{
    PullRefreshConfig, PullRefreshWidgets, PullState, RefreshFlow, RefreshMachine,
};

/// One registry per widget kind
#[derive(Default)]
pub struct WidgetSet<'a> {
    pub pull_refresh: PullRefreshWidgets,
    pub cards: CardWidgets<'a>,
    pub galleries: GalleryWidgets<'a>,
}

impl<'a> WidgetSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one event to the widget that owns it. Returns `false` if no
    /// widget claimed it.
    pub fn dispatch(&mut self, host: &mut dyn SceneHost, event: &HostEvent) -> bool {
        let handled = self.pull_refresh.handle_event(host, event)
            || self.cards.handle_event(host, event)
            || self.galleries.handle_event(host, event);

        if !handled {
            trace!("Unhandled event {:?}", event);
        }
        handled
    }

    /// Dispatch queued events until the host has none left, including events
    /// raised while dispatching. Returns the events no widget claimed.
    pub fn pump<H: SceneHost + EventSource>(&mut self, host: &mut H) -> Vec<HostEvent> {
        let mut unhandled = Vec::new();
        while let Some(event) = host.poll_event() {
            if !self.dispatch(host, &event) {
                unhandled.push(event);
            }
        }
        unhandled
    }

    /// Lifecycle counters summed over all widget kinds
    pub fn stats(&self) -> LifecycleStats {
        [
            self.pull_refresh.stats(),
            self.cards.stats(),
            self.galleries.stats(),
        ]
        .iter()
        .fold(LifecycleStats::default(), |total, stats| LifecycleStats {
            created: total.created + stats.created,
            released: total.released + stats.released,
        })
    }

    /// Number of live widgets of every kind
    pub fn len(&self) -> usize {
        self.pull_refresh.len() + self.cards.len() + self.galleries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
