//! Interface to the retained scene graph that hosts the widgets
//!
//! Widgets never own a display. They create nodes in a host tree, push
//! properties to those nodes, and react to events the host delivers. Anything
//! that implements [`SceneHost`] can drive them: a real toolkit binding on
//! the device, or the in-memory [`Scene`](crate::scene::Scene) used by the
//! tests and the simulator.
//!
//! # Events
//!
//! A widget registers interest in a node's events with
//! [`SceneHost::subscribe`], naming an *owner* node. Every [`HostEvent`] the
//! host later produces for that node carries the owner back, which is how a
//! click on a card's button finds the card's state block. One-shot timers are
//! delivered the same way, to the owner given to
//! [`SceneHost::schedule_once`].

use alloc::string::String;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Size;
use thiserror_no_std::Error;

use crate::ui::styling::{BaseDir, TextAlign, TextSize};

/// Identifier for a node in the host tree.
///
/// A small, copyable handle made of a slot index and a generation counter.
/// When a node is deleted its slot may be reused, but the generation is
/// bumped, so a stale `NodeId` never aliases a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32, u32);

impl NodeId {
    /// Build a handle from a slot index and generation.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(index, generation)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Handle of a scheduled one-shot timer
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerId(pub u32);

/// What kind of element a node is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain box that lays out its children
    Container,
    /// Wrapped text
    Label,
    /// Clickable box, usually holding a label
    Button,
    /// Image display
    Image,
}

/// Size along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Fill the space the parent offers
    Fill,
    /// Shrink to the content
    Content,
    /// Fixed size in pixels
    Px(u32),
}

/// Direction in which a container places its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Column,
    Row,
}

/// Reference to an image the host knows how to draw.
///
/// The widgets only need the pixel size (for layout) and an opaque id the
/// host resolves to pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSource {
    pub id: u32,
    pub size: Size,
}

impl ImageSource {
    pub const fn new(id: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            size: Size::new(width, height),
        }
    }
}

bitflags::bitflags! {
    /// Scroll behaviour of a container.
    ///
    /// An empty set means the node does not scroll at all.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScrollFlags: u8 {
        /// Scrolls vertically
        const VERTICAL = 0b0000_0001;
        /// Scrolls horizontally
        const HORIZONTAL = 0b0000_0010;
        /// May be dragged past its edges (needed to pull down past the top)
        const ELASTIC = 0b0000_0100;
        /// Keeps moving after the finger is lifted
        const MOMENTUM = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Set of event kinds a subscription covers
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        const SCROLL = 0b0000_0001;
        const SCROLL_END = 0b0000_0010;
        const CLICKED = 0b0000_0100;
        const DELETE = 0b0000_1000;
    }
}

/// A single visual property pushed to a node
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Text(String),
    TextColor(Rgb565),
    BorderColor(Rgb565),
    BorderWidth(u32),
    Radius(u32),
    Padding(u32),
    /// Gap between children of a container
    RowGap(u32),
    Font(TextSize),
    TextAlign(TextAlign),
    BaseDir(BaseDir),
    Width(Dimension),
    Height(Dimension),
    Flow(Flow),
    Image(ImageSource),
    Hidden(bool),
    Scroll(ScrollFlags),
}

/// Kind of event delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The node's scroll offset changed
    Scroll,
    /// A scroll gesture on the node ended
    ScrollEnd,
    /// The node was clicked
    Clicked,
    /// The node is being deleted; its handle is already stale
    Delete,
    /// A one-shot timer fired; carries the tag given when it was scheduled
    Timer(u32),
}

impl EventKind {
    /// Subscription bit that enables this event, `None` for timers which
    /// need no subscription.
    pub fn mask(self) -> Option<EventMask> {
        match self {
            EventKind::Scroll => Some(EventMask::SCROLL),
            EventKind::ScrollEnd => Some(EventMask::SCROLL_END),
            EventKind::Clicked => Some(EventMask::CLICKED),
            EventKind::Delete => Some(EventMask::DELETE),
            EventKind::Timer(_) => None,
        }
    }
}

/// Event produced by the host for a subscribed node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEvent {
    /// Node the event happened on
    pub target: NodeId,
    /// Owner named in the subscription (or when the timer was scheduled)
    pub owner: NodeId,
    pub kind: EventKind,
}

/// Errors reported by a host
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The node handle does not refer to a live node
    #[error("Node handle is stale")]
    StaleNode,

    /// The host cannot hold another node
    #[error("Node capacity exceeded (max: {max})")]
    NodeCapacity {
        /// Maximum number of live nodes
        max: usize,
    },

    /// No room left for another pending timer
    #[error("Timer capacity exceeded (max: {max})")]
    TimerCapacity {
        /// Maximum number of pending timers
        max: usize,
    },
}

/// Operations a retained scene graph offers to the widgets.
///
/// All calls happen on the single UI thread. Calls that target a stale node
/// are ignored by the host; widgets never rely on them failing loudly.
pub trait SceneHost {
    /// Create a child of `parent`.
    fn create_node(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, HostError>;

    /// Delete a node and its whole subtree, emitting [`EventKind::Delete`]
    /// for every subscribed node in it.
    fn delete_node(&mut self, node: NodeId);

    /// Whether the handle refers to a live node.
    fn is_alive(&self, node: NodeId) -> bool;

    fn set_property(&mut self, node: NodeId, property: Property);

    /// Register for `events` on `node`; events will carry `owner`.
    fn subscribe(&mut self, node: NodeId, events: EventMask, owner: NodeId);

    /// Current vertical scroll offset in pixels, negative when the content
    /// is pulled down past its top edge. Zero for unknown nodes.
    fn scroll_offset(&self, node: NodeId) -> i32;

    /// Move the vertical scroll offset of `node` to `y`.
    fn scroll_to(&mut self, node: NodeId, y: i32, animate: bool);

    /// Scroll the ancestors of `node` until it is visible.
    fn scroll_into_view(&mut self, node: NodeId, animate: bool);

    /// Fire [`EventKind::Timer`] with `tag` at `owner` after `delay_ms`.
    fn schedule_once(&mut self, delay_ms: u32, owner: NodeId, tag: u32)
    -> Result<TimerId, HostError>;

    /// Monotonic millisecond tick. Wraps around; compare with
    /// `wrapping_sub`.
    fn now_ms(&self) -> u32;
}

/// Hosts that queue their events for the application to pull
pub trait EventSource {
    fn poll_event(&mut self) -> Option<HostEvent>;
}
