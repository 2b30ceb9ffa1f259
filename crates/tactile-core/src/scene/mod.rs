//! In-memory retained scene graph
//!
//! [`Scene`] is a small, deterministic implementation of
//! [`SceneHost`] + [`EventSource`]. It keeps a node arena with generational
//! handles, the properties widgets push, per-node scroll offsets, event
//! subscriptions, a FIFO event queue and a bounded table of one-shot timers
//! driven by a manually advanced clock.
//!
//! Input is injected through gesture helpers instead of a touch driver:
//!
//! ```ignore
//! let mut scene = Scene::new(Size::new(320, 240));
//! scene.drag_to(list, -30);   // finger pulls content down past the top
//! scene.release(list);        // finger lifted
//! scene.advance(300);         // let timers fire
//! while let Some(event) = scene.poll_event() { /* dispatch */ }
//! ```
//!
//! Scrolls are applied immediately; the `animate` flag of a scroll request
//! is recorded (see [`Scene::last_scroll_request`]) but not animated.

mod layout;
mod render;

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Size;
use log::{debug, trace, warn};

use crate::host::{
    Dimension, EventKind, EventMask, EventSource, Flow, HostError, HostEvent, ImageSource, NodeId,
    NodeKind, Property, SceneHost, ScrollFlags, TimerId,
};
use crate::ui::styling::{BaseDir, ColorPalette, TextAlign, TextSize};

pub use layout::Layout;

/// Maximum number of pending one-shot timers
pub const MAX_TIMERS: usize = 16;

/// Visual properties of one node, as last pushed by a widget
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProps {
    pub text: Option<String>,
    pub text_color: Option<Rgb565>,
    pub border_color: Option<Rgb565>,
    pub border_width: u32,
    pub radius: u32,
    pub padding: u32,
    pub row_gap: u32,
    pub font: TextSize,
    pub text_align: TextAlign,
    pub base_dir: BaseDir,
    pub width: Dimension,
    pub height: Dimension,
    pub flow: Flow,
    pub image: Option<ImageSource>,
    pub hidden: bool,
    pub scroll: ScrollFlags,
}

impl Default for NodeProps {
    fn default() -> Self {
        Self {
            text: None,
            text_color: None,
            border_color: None,
            border_width: 0,
            radius: 0,
            padding: 0,
            row_gap: 0,
            font: TextSize::default(),
            text_align: TextAlign::default(),
            base_dir: BaseDir::default(),
            width: Dimension::Fill,
            height: Dimension::Content,
            flow: Flow::Column,
            image: None,
            hidden: false,
            scroll: ScrollFlags::empty(),
        }
    }
}

impl NodeProps {
    fn apply(&mut self, property: Property) {
        match property {
            Property::Text(text) => self.text = Some(text),
            Property::TextColor(color) => self.text_color = Some(color),
            Property::BorderColor(color) => self.border_color = Some(color),
            Property::BorderWidth(width) => self.border_width = width,
            Property::Radius(radius) => self.radius = radius,
            Property::Padding(padding) => self.padding = padding,
            Property::RowGap(gap) => self.row_gap = gap,
            Property::Font(font) => self.font = font,
            Property::TextAlign(align) => self.text_align = align,
            Property::BaseDir(dir) => self.base_dir = dir,
            Property::Width(width) => self.width = width,
            Property::Height(height) => self.height = height,
            Property::Flow(flow) => self.flow = flow,
            Property::Image(image) => self.image = Some(image),
            Property::Hidden(hidden) => self.hidden = hidden,
            Property::Scroll(flags) => self.scroll = flags,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Subscription {
    events: EventMask,
    owner: NodeId,
}

/// One live node of the scene
#[derive(Debug)]
pub struct SceneNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    props: NodeProps,
    scroll_y: i32,
    subscriptions: Vec<Subscription>,
}

impl SceneNode {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        let mut props = NodeProps::default();
        if matches!(kind, NodeKind::Button | NodeKind::Image) {
            props.width = Dimension::Content;
        }

        Self {
            kind,
            parent,
            children: Vec::new(),
            props,
            scroll_y: 0,
            subscriptions: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn props(&self) -> &NodeProps {
        &self.props
    }

    /// Vertical scroll offset, negative while pulled past the top
    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    /// Whether any subscription on this node covers `kind`
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        kind.mask()
            .is_some_and(|mask| self.subscriptions.iter().any(|s| s.events.contains(mask)))
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    scheduled_at: u32,
    delay_ms: u32,
    owner: NodeId,
    tag: u32,
}

impl PendingTimer {
    fn remaining(&self, now: u32) -> u32 {
        self.delay_ms
            .saturating_sub(now.wrapping_sub(self.scheduled_at))
    }
}

/// A scroll request made through [`SceneHost::scroll_to`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub node: NodeId,
    pub y: i32,
    pub animate: bool,
}

/// In-memory scene graph host
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
    node_limit: Option<usize>,

    events: VecDeque<HostEvent>,
    timers: heapless::Vec<PendingTimer, MAX_TIMERS>,
    next_timer: u32,
    now_ms: u32,

    viewport: Size,
    palette: ColorPalette,
    last_scroll: Option<ScrollRequest>,
    last_scroll_into_view: Option<NodeId>,
}

impl Scene {
    /// Create a scene whose root container fills `viewport` and scrolls
    /// vertically.
    pub fn new(viewport: Size) -> Self {
        let mut root = SceneNode::new(NodeKind::Container, None);
        root.props.height = Dimension::Px(viewport.height);
        root.props.scroll = ScrollFlags::VERTICAL;

        Self {
            slots: alloc::vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: NodeId::new(0, 0),
            live: 1,
            node_limit: None,
            events: VecDeque::new(),
            timers: heapless::Vec::new(),
            next_timer: 0,
            now_ms: 0,
            viewport,
            palette: ColorPalette::default(),
            last_scroll: None,
            last_scroll_into_view: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Colors used for the background, button surfaces and default text
    pub fn set_palette(&mut self, palette: ColorPalette) {
        self.palette = palette;
    }

    /// Cap the number of live nodes (root included). `None` removes the cap.
    pub fn set_node_limit(&mut self, limit: Option<usize>) {
        self.node_limit = limit;
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Text last set on `id`, if any
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|node| node.props.text.as_deref())
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn last_scroll_request(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    pub fn last_scroll_into_view(&self) -> Option<NodeId> {
        self.last_scroll_into_view
    }

    /// Whether `id` and all of its ancestors are shown
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.node(node_id) {
                Some(node) if !node.props.hidden => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Compute screen rectangles for every visible node
    pub fn layout(&self) -> Layout {
        Layout::compute(self)
    }

    // ------------------------------------------------------------------------
    // Gesture injection
    // ------------------------------------------------------------------------

    /// Drag the content of `node` to scroll offset `offset`.
    ///
    /// Negative offsets (pulling past the top) are only possible on elastic
    /// containers; others clamp at zero. Non-scrolling nodes ignore the drag.
    pub fn drag_to(&mut self, node: NodeId, offset: i32) {
        let Some(flags) = self.node(node).map(|n| n.props.scroll) else {
            warn!("Drag on stale node {:?}", node);
            return;
        };
        if !flags.contains(ScrollFlags::VERTICAL) {
            trace!("Drag ignored, {:?} does not scroll", node);
            return;
        }

        let offset = if flags.contains(ScrollFlags::ELASTIC) {
            offset
        } else {
            offset.max(0)
        };
        self.set_scroll(node, offset);
    }

    /// Lift the finger after a drag on `node`
    pub fn release(&mut self, node: NodeId) {
        if self.is_alive(node) {
            self.emit(node, EventKind::ScrollEnd);
        }
    }

    /// Tap `node`. Hidden nodes (or nodes under a hidden ancestor) do not
    /// receive clicks.
    pub fn click(&mut self, node: NodeId) {
        if !self.is_visible(node) {
            debug!("Click on {:?} ignored, not visible", node);
            return;
        }
        self.emit(node, EventKind::Clicked);
    }

    /// Move the clock forward and queue the timers that became due, earliest
    /// first.
    pub fn advance(&mut self, ms: u32) {
        let start = self.now_ms;
        self.now_ms = self.now_ms.wrapping_add(ms);

        let mut due: Vec<PendingTimer> = self
            .timers
            .iter()
            .filter(|timer| timer.remaining(start) <= ms)
            .copied()
            .collect();
        due.sort_by_key(|timer| (timer.remaining(start), timer.id.0));

        self.timers.retain(|timer| timer.remaining(start) > ms);

        for timer in due {
            debug!("Timer {:?} fired for {:?}", timer.id, timer.owner);
            self.events.push_back(HostEvent {
                target: timer.owner,
                owner: timer.owner,
                kind: EventKind::Timer(timer.tag),
            });
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn emit(&mut self, target: NodeId, kind: EventKind) {
        let Some(mask) = kind.mask() else {
            return;
        };
        let Some(node) = self.node(target) else {
            return;
        };

        let owners: Vec<NodeId> = node
            .subscriptions
            .iter()
            .filter(|s| s.events.contains(mask))
            .map(|s| s.owner)
            .collect();

        for owner in owners {
            trace!("Queue {:?} on {:?} for {:?}", kind, target, owner);
            self.events.push_back(HostEvent {
                target,
                owner,
                kind,
            });
        }
    }

    fn set_scroll(&mut self, id: NodeId, y: i32) {
        let changed = match self.node_mut(id) {
            Some(node) if node.scroll_y != y => {
                node.scroll_y = y;
                true
            }
            _ => false,
        };
        if changed {
            self.emit(id, EventKind::Scroll);
        }
    }

    /// Node ids of the subtree under `id`, parents before children
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                order.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    fn free_slot(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index() as u32);
            self.live -= 1;
        }
    }
}

impl SceneHost for Scene {
    fn create_node(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, HostError> {
        if !self.is_alive(parent) {
            return Err(HostError::StaleNode);
        }
        if let Some(max) = self.node_limit
            && self.live >= max
        {
            warn!("Node limit {} reached", max);
            return Err(HostError::NodeCapacity { max });
        }

        let node = SceneNode::new(kind, Some(parent));
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(index, 0)
            }
        };

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(id);
        }
        self.live += 1;
        trace!("Created {:?} {:?} under {:?}", kind, id, parent);
        Ok(id)
    }

    fn delete_node(&mut self, node: NodeId) {
        if node == self.root {
            warn!("Refusing to delete the scene root");
            return;
        }
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };

        let doomed = self.subtree(node);
        for &id in &doomed {
            self.emit(id, EventKind::Delete);
        }

        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&child| child != node);
        }
        for &id in &doomed {
            self.free_slot(id);
        }

        let before = self.timers.len();
        self.timers.retain(|timer| !doomed.contains(&timer.owner));
        debug!(
            "Deleted {:?}: {} nodes, {} timers dropped",
            node,
            doomed.len(),
            before - self.timers.len()
        );
    }

    fn is_alive(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn set_property(&mut self, node: NodeId, property: Property) {
        let Some(target) = self.node_mut(node) else {
            trace!("Property on stale node {:?} ignored", node);
            return;
        };

        target.props.apply(property);

        if !target.props.scroll.contains(ScrollFlags::ELASTIC) && target.scroll_y < 0 {
            target.scroll_y = 0;
        }
    }

    fn subscribe(&mut self, node: NodeId, events: EventMask, owner: NodeId) {
        if let Some(target) = self.node_mut(node) {
            target.subscriptions.push(Subscription { events, owner });
        }
    }

    fn scroll_offset(&self, node: NodeId) -> i32 {
        self.node(node).map_or(0, |n| n.scroll_y)
    }

    fn scroll_to(&mut self, node: NodeId, y: i32, animate: bool) {
        if !self.is_alive(node) {
            return;
        }
        self.last_scroll = Some(ScrollRequest { node, y, animate });
        self.set_scroll(node, y);
    }

    fn scroll_into_view(&mut self, node: NodeId, animate: bool) {
        if !self.is_alive(node) {
            return;
        }
        self.last_scroll_into_view = Some(node);

        let mut ancestor = self.node(node).and_then(|n| n.parent);
        while let Some(container) = ancestor {
            let scrolls = self
                .node(container)
                .is_some_and(|n| n.props.scroll.contains(ScrollFlags::VERTICAL));

            if scrolls {
                let layout = self.layout();
                if let (Some(target), Some(view)) = (layout.rect(node), layout.rect(container)) {
                    let current = self.scroll_offset(container);
                    let above = view.top_left.y - target.top_left.y;
                    let below = (target.top_left.y + target.size.height as i32)
                        - (view.top_left.y + view.size.height as i32);

                    let wanted = if above > 0 {
                        (current - above).max(0)
                    } else if below > 0 {
                        current + below.min(-above)
                    } else {
                        current
                    };

                    if wanted != current {
                        trace!("Scroll {:?} to {} (animate: {})", container, wanted, animate);
                        self.set_scroll(container, wanted);
                    }
                }
            }

            ancestor = self.node(container).and_then(|n| n.parent);
        }
    }

    fn schedule_once(
        &mut self,
        delay_ms: u32,
        owner: NodeId,
        tag: u32,
    ) -> Result<TimerId, HostError> {
        if !self.is_alive(owner) {
            return Err(HostError::StaleNode);
        }

        let id = TimerId(self.next_timer);
        let timer = PendingTimer {
            id,
            scheduled_at: self.now_ms,
            delay_ms,
            owner,
            tag,
        };
        self.timers
            .push(timer)
            .map_err(|_| HostError::TimerCapacity { max: MAX_TIMERS })?;

        self.next_timer = self.next_timer.wrapping_add(1);
        debug!("Scheduled {:?} in {} ms for {:?}", id, delay_ms, owner);
        Ok(id)
    }

    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

impl EventSource for Scene {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(Size::new(320, 240))
    }

    fn drain(scene: &mut Scene) -> Vec<HostEvent> {
        core::iter::from_fn(|| scene.poll_event()).collect()
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut scene = scene();
        let root = scene.root();

        let first = scene.create_node(root, NodeKind::Label).unwrap();
        scene.delete_node(first);
        let second = scene.create_node(root, NodeKind::Label).unwrap();

        assert_eq!(first.index(), second.index(), "slot is reused");
        assert!(!scene.is_alive(first), "old handle must not alias the new node");
        assert!(scene.is_alive(second));

        scene.set_property(first, Property::Text("stale".into()));
        assert_eq!(scene.text(second), None);
    }

    #[test]
    fn test_delete_notifies_whole_subtree() {
        let mut scene = scene();
        let root = scene.root();
        let parent = scene.create_node(root, NodeKind::Container).unwrap();
        let child = scene.create_node(parent, NodeKind::Button).unwrap();
        scene.subscribe(parent, EventMask::DELETE, parent);
        scene.subscribe(child, EventMask::DELETE | EventMask::CLICKED, parent);

        scene.delete_node(parent);
        let events = drain(&mut scene);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].target, parent, "parent is notified first");
        assert_eq!(events[1].target, child);
        assert!(events.iter().all(|e| e.kind == EventKind::Delete && e.owner == parent));
        assert_eq!(scene.node_count(), 1, "only the root is left");
        assert!(scene.node(root).unwrap().children().is_empty());
    }

    #[test]
    fn test_root_cannot_be_deleted() {
        let mut scene = scene();
        let root = scene.root();
        scene.delete_node(root);
        assert!(scene.is_alive(root));
    }

    #[test]
    fn test_elastic_drag() {
        let mut scene = scene();
        let root = scene.root();
        let list = scene.create_node(root, NodeKind::Container).unwrap();
        scene.subscribe(list, EventMask::SCROLL, list);

        scene.drag_to(list, -20);
        assert!(drain(&mut scene).is_empty(), "non-scrolling nodes ignore drags");

        scene.set_property(list, Property::Scroll(ScrollFlags::VERTICAL));
        scene.drag_to(list, -20);
        assert_eq!(scene.scroll_offset(list), 0, "rigid container clamps at zero");

        scene.set_property(list, Property::Scroll(ScrollFlags::VERTICAL | ScrollFlags::ELASTIC));
        scene.drag_to(list, -20);
        assert_eq!(scene.scroll_offset(list), -20);
        assert_eq!(drain(&mut scene).len(), 1);

        scene.drag_to(list, -20);
        assert!(drain(&mut scene).is_empty(), "no event without a change");
    }

    #[test]
    fn test_hidden_nodes_ignore_clicks() {
        let mut scene = scene();
        let root = scene.root();
        let panel = scene.create_node(root, NodeKind::Container).unwrap();
        let button = scene.create_node(panel, NodeKind::Button).unwrap();
        scene.subscribe(button, EventMask::CLICKED, panel);

        scene.set_property(panel, Property::Hidden(true));
        scene.click(button);
        assert_eq!(scene.pending_events(), 0);

        scene.set_property(panel, Property::Hidden(false));
        scene.click(button);
        assert_eq!(
            scene.poll_event(),
            Some(HostEvent {
                target: button,
                owner: panel,
                kind: EventKind::Clicked
            })
        );
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut scene = scene();
        let root = scene.root();
        let owner = scene.create_node(root, NodeKind::Container).unwrap();

        scene.schedule_once(300, owner, 1).unwrap();
        scene.schedule_once(100, owner, 2).unwrap();

        scene.advance(99);
        assert_eq!(scene.pending_events(), 0);

        scene.advance(250);
        let tags: Vec<EventKind> = drain(&mut scene).iter().map(|e| e.kind).collect();
        assert_eq!(tags, [EventKind::Timer(2), EventKind::Timer(1)]);
        assert_eq!(scene.pending_timers(), 0);
    }

    #[test]
    fn test_timer_capacity_and_owner_deletion() {
        let mut scene = scene();
        let root = scene.root();
        let owner = scene.create_node(root, NodeKind::Container).unwrap();

        for tag in 0..MAX_TIMERS as u32 {
            scene.schedule_once(10, owner, tag).unwrap();
        }
        assert_eq!(
            scene.schedule_once(10, owner, 99),
            Err(HostError::TimerCapacity { max: MAX_TIMERS })
        );

        scene.delete_node(owner);
        assert_eq!(scene.pending_timers(), 0, "timers die with their owner");
        assert_eq!(scene.schedule_once(10, owner, 0), Err(HostError::StaleNode));
    }

    #[test]
    fn test_clock_wraps() {
        let mut scene = scene();
        let root = scene.root();
        let owner = scene.create_node(root, NodeKind::Container).unwrap();

        scene.advance(u32::MAX - 10);
        scene.schedule_once(50, owner, 7).unwrap();
        scene.advance(60);

        assert_eq!(scene.now_ms(), 49);
        assert_eq!(scene.poll_event().map(|e| e.kind), Some(EventKind::Timer(7)));
    }

    #[test]
    fn test_node_limit() {
        let mut scene = scene();
        let root = scene.root();
        scene.set_node_limit(Some(2));

        assert!(scene.create_node(root, NodeKind::Label).is_ok());
        assert_eq!(
            scene.create_node(root, NodeKind::Label),
            Err(HostError::NodeCapacity { max: 2 })
        );
    }
}
