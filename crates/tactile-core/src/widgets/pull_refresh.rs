//! Pull-to-refresh container
//!
//! A vertically scrolling container that fires a refresh callback when its
//! content is pulled down past a threshold and released. The gesture logic
//! lives in [`RefreshMachine`], a pure state machine with no host access;
//! [`PullRefreshWidgets`] feeds it host events and carries out the effects
//! (indicator updates, scroll resets, callbacks).
//!
//! ```text
//!          offset < 0            distance >= threshold
//!   Idle ──────────────► Pulling ─────────────────────► Ready
//!    ▲  ◄── release ────────┘        ◄── release ───────┘ │
//!    │                                 (cooldown active)   │ release
//!    └──────────── complete() ◄──────── Refreshing ◄───────┘
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use log::{debug, info, warn};

use crate::error::{WidgetError, WidgetResult};
use crate::host::{
    Dimension, EventKind, EventMask, HostError, HostEvent, NodeId, NodeKind, Property, SceneHost,
    ScrollFlags, TimerId,
};
use crate::lifecycle::{LifecycleStats, WidgetRegistry};
use crate::ui::styling::{ColorRole, FontClass, StyleResolver, TextAlign, WidgetStyle};
use embedded_graphics::pixelcolor::Rgb565;

/// Timer tag used by [`PullRefreshWidgets::complete_after`]
pub const COMPLETE_TIMER_TAG: u32 = 0x5052_4601;

const INDICATOR_PADDING: u32 = 10;
const ICON_PULL: &str = "v";
const ICON_REFRESH: &str = "*";

/// Gesture state of a pull-to-refresh container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullState {
    /// Not pulled
    #[default]
    Idle,
    /// Pulled, but not far enough to refresh
    Pulling,
    /// Pulled past the threshold; releasing now refreshes
    Ready,
    /// Refresh in progress, waiting for completion
    Refreshing,
}

impl PullState {
    pub fn threshold_reached(self) -> bool {
        matches!(self, PullState::Ready | PullState::Refreshing)
    }
}

/// A state change reported by the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PullState,
    pub to: PullState,
}

/// What a scroll-end signal did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Refresh started; the refresh callback must run now
    Triggered(Transition),
    /// The gesture was abandoned; scroll back to the top
    Reset(Option<Transition>),
    /// Nothing to do (disabled, or already refreshing)
    Ignored,
}

/// Pull gesture state machine
///
/// Feed it scroll offsets with [`on_scroll`](Self::on_scroll) and finger
/// releases with [`on_scroll_end`](Self::on_scroll_end). It never leaves
/// `Refreshing` on its own: only [`complete`](Self::complete) (or disabling)
/// ends a refresh.
#[derive(Debug, Clone)]
pub struct RefreshMachine {
    state: PullState,
    pull_distance: i32,
    threshold: i32,
    cooldown_ms: u32,
    triggered: bool,
    last_trigger: Option<u32>,
    enabled: bool,
}

impl RefreshMachine {
    pub fn new(threshold: i32, cooldown_ms: u32) -> Self {
        Self {
            state: PullState::Idle,
            pull_distance: 0,
            threshold,
            cooldown_ms,
            triggered: false,
            last_trigger: None,
            enabled: true,
        }
    }

    fn set_state(&mut self, to: PullState) -> Option<Transition> {
        if self.state == to {
            return None;
        }

        let from = self.state;
        self.state = to;
        debug!("Pull state changed: {:?} -> {:?}", from, to);
        Some(Transition { from, to })
    }

    /// New scroll offset sample (negative while pulled past the top).
    ///
    /// The distance is frozen while refreshing.
    pub fn on_scroll(&mut self, offset: i32) -> Option<Transition> {
        if !self.enabled || self.state == PullState::Refreshing {
            return None;
        }

        self.pull_distance = offset.saturating_neg().max(0);
        let next = if self.pull_distance == 0 {
            PullState::Idle
        } else if self.pull_distance < self.threshold {
            PullState::Pulling
        } else {
            PullState::Ready
        };
        self.set_state(next)
    }

    /// The finger was lifted at tick `now`
    pub fn on_scroll_end(&mut self, now: u32) -> ReleaseOutcome {
        if !self.enabled {
            return ReleaseOutcome::Ignored;
        }

        if self.state == PullState::Ready && !self.triggered && self.cooldown_elapsed(now) {
            self.triggered = true;
            self.last_trigger = Some(now);
            let transition = Transition {
                from: self.state,
                to: PullState::Refreshing,
            };
            self.state = PullState::Refreshing;
            return ReleaseOutcome::Triggered(transition);
        }

        if self.state == PullState::Refreshing {
            return ReleaseOutcome::Ignored;
        }
        ReleaseOutcome::Reset(self.set_state(PullState::Idle))
    }

    fn cooldown_elapsed(&self, now: u32) -> bool {
        self.last_trigger
            .is_none_or(|last| now.wrapping_sub(last) >= self.cooldown_ms)
    }

    /// End the current refresh (or any gesture) and return to `Idle`
    pub fn complete(&mut self) -> Option<Transition> {
        self.triggered = false;
        self.pull_distance = 0;
        self.set_state(PullState::Idle)
    }

    /// Enter `Refreshing` without a gesture
    pub fn start(&mut self) -> Option<Transition> {
        self.triggered = true;
        self.set_state(PullState::Refreshing)
    }

    /// Enable or disable. Disabling mid-gesture completes first; the returned
    /// transition is that completion.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<Transition> {
        self.enabled = enabled;
        if !enabled && self.state != PullState::Idle {
            return self.complete();
        }
        None
    }

    pub fn state(&self) -> PullState {
        self.state
    }

    pub fn pull_distance(&self) -> i32 {
        self.pull_distance
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn is_refreshing(&self) -> bool {
        self.state == PullState::Refreshing
    }
}

/// What the refresh callback tells the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshFlow {
    /// Work continues; `complete` (or a `complete_after` timer) ends it
    Pending,
    /// Work finished inside the callback; complete right away
    Done,
}

/// Called when a refresh starts. The host is lent so the callback can
/// schedule work, e.g. a completion timer on the container.
pub type RefreshCallback = Box<dyn FnMut(&mut dyn SceneHost, NodeId) -> RefreshFlow>;

/// Called on every state change with `(container, distance, threshold_reached)`
pub type PullStateCallback = Box<dyn FnMut(NodeId, i32, bool)>;

/// Configuration for a pull-to-refresh container
pub struct PullRefreshConfig {
    pub pull_text: String,
    pub release_text: String,
    pub refreshing_text: String,

    /// Pull distance in pixels that arms the refresh
    pub threshold: i32,
    /// Height of the indicator icon row
    pub indicator_size: u32,
    pub show_indicator: bool,
    /// Minimum time between two refreshes
    pub cooldown_ms: u32,

    pub style: WidgetStyle,

    /// Required
    pub refresh: Option<RefreshCallback>,
    pub on_state: Option<PullStateCallback>,
}

impl Default for PullRefreshConfig {
    fn default() -> Self {
        Self {
            pull_text: String::from("Pull to refresh"),
            release_text: String::from("Release to refresh"),
            refreshing_text: String::from("Refreshing..."),
            threshold: 25,
            indicator_size: 24,
            show_indicator: true,
            cooldown_ms: 1000,
            style: WidgetStyle::default(),
            refresh: None,
            on_state: None,
        }
    }
}

impl PullRefreshConfig {
    pub fn with_texts(mut self, pull: &str, release: &str, refreshing: &str) -> Self {
        self.pull_text = String::from(pull);
        self.release_text = String::from(release);
        self.refreshing_text = String::from(refreshing);
        self
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_cooldown_ms(mut self, cooldown_ms: u32) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn with_indicator(mut self, show: bool) -> Self {
        self.show_indicator = show;
        self
    }

    pub fn with_style(mut self, style: WidgetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn on_refresh(
        mut self,
        callback: impl FnMut(&mut dyn SceneHost, NodeId) -> RefreshFlow + 'static,
    ) -> Self {
        self.refresh = Some(Box::new(callback));
        self
    }

    pub fn on_state_change(mut self, callback: impl FnMut(NodeId, i32, bool) + 'static) -> Self {
        self.on_state = Some(Box::new(callback));
        self
    }
}

/// Indicator nodes created inside the container
#[derive(Debug, Clone, Copy)]
struct Indicator {
    label: NodeId,
    icon: NodeId,
}

struct PullRefreshState {
    machine: RefreshMachine,
    indicator: Option<Indicator>,
    primary: Rgb565,
    secondary: Rgb565,
    pull_text: String,
    release_text: String,
    refreshing_text: String,
    refresh: RefreshCallback,
    on_state: Option<PullStateCallback>,
}

impl PullRefreshState {
    /// Indicator update and state callback for one transition
    fn apply(&mut self, host: &mut dyn SceneHost, node: NodeId, transition: Transition) {
        self.update_indicator(host, transition.to);

        if let Some(callback) = self.on_state.as_mut() {
            callback(
                node,
                self.machine.pull_distance(),
                transition.to.threshold_reached(),
            );
        }
    }

    fn update_indicator(&self, host: &mut dyn SceneHost, state: PullState) {
        let Some(indicator) = self.indicator else {
            return;
        };

        let (text, color, icon) = match state {
            PullState::Idle => {
                host.set_property(indicator.label, Property::Hidden(true));
                host.set_property(indicator.icon, Property::Hidden(true));
                return;
            }
            PullState::Pulling => (&self.pull_text, self.primary, ICON_PULL),
            PullState::Ready => (&self.release_text, self.secondary, ICON_PULL),
            PullState::Refreshing => (&self.refreshing_text, self.primary, ICON_REFRESH),
        };

        host.set_property(indicator.label, Property::Text(text.clone()));
        host.set_property(indicator.label, Property::TextColor(color));
        host.set_property(indicator.label, Property::Hidden(false));

        host.set_property(indicator.icon, Property::Text(String::from(icon)));
        host.set_property(indicator.icon, Property::TextColor(color));
        host.set_property(indicator.icon, Property::Hidden(false));
    }

    fn complete(&mut self, host: &mut dyn SceneHost, node: NodeId) {
        info!("Pull-to-refresh completed on {:?}", node);
        if let Some(transition) = self.machine.complete() {
            self.apply(host, node, transition);
        }
        host.scroll_to(node, 0, true);
    }

    fn on_scroll(&mut self, host: &mut dyn SceneHost, node: NodeId) {
        let offset = host.scroll_offset(node);
        if let Some(transition) = self.machine.on_scroll(offset) {
            self.apply(host, node, transition);
        }
    }

    fn on_scroll_end(&mut self, host: &mut dyn SceneHost, node: NodeId) {
        match self.machine.on_scroll_end(host.now_ms()) {
            ReleaseOutcome::Triggered(transition) => {
                self.apply(host, node, transition);
                info!("Pull-to-refresh triggered on {:?}", node);

                if (self.refresh)(&mut *host, node) == RefreshFlow::Done {
                    self.complete(host, node);
                }
            }
            ReleaseOutcome::Reset(transition) => {
                host.scroll_to(node, 0, true);
                if let Some(transition) = transition {
                    self.apply(host, node, transition);
                }
            }
            ReleaseOutcome::Ignored => {}
        }
    }
}

/// All pull-to-refresh containers of an application
pub struct PullRefreshWidgets {
    registry: WidgetRegistry<PullRefreshState>,
}

impl Default for PullRefreshWidgets {
    fn default() -> Self {
        Self::new()
    }
}

impl PullRefreshWidgets {
    pub fn new() -> Self {
        Self {
            registry: WidgetRegistry::new("pull_refresh"),
        }
    }

    /// Create a pull-to-refresh container under `parent`.
    ///
    /// Content goes into the returned container node. Fails if `parent` is
    /// not alive or `config.refresh` is missing; a failed create leaves no
    /// node behind.
    pub fn create(
        &mut self,
        host: &mut dyn SceneHost,
        parent: NodeId,
        config: PullRefreshConfig,
        theme: &dyn StyleResolver,
    ) -> WidgetResult<NodeId> {
        let PullRefreshConfig {
            pull_text,
            release_text,
            refreshing_text,
            threshold,
            indicator_size,
            show_indicator,
            cooldown_ms,
            style,
            refresh,
            on_state,
        } = config;

        let Some(refresh) = refresh else {
            warn!("Pull-to-refresh needs a refresh callback");
            return Err(WidgetError::MissingCallback("refresh"));
        };
        if !host.is_alive(parent) {
            warn!("Pull-to-refresh parent {:?} is not alive", parent);
            return Err(WidgetError::InvalidParent);
        }

        let container = host.create_node(parent, NodeKind::Container)?;
        configure_container(host, container, &style);

        let indicator = if show_indicator {
            match build_indicator(host, container, &style, theme, indicator_size) {
                Ok(indicator) => Some(indicator),
                Err(err) => {
                    warn!("Pull-to-refresh indicator failed: {}", err);
                    host.delete_node(container);
                    return Err(err);
                }
            }
        } else {
            None
        };

        let state = PullRefreshState {
            machine: RefreshMachine::new(threshold, cooldown_ms),
            indicator,
            primary: theme.resolve_color(ColorRole::Primary),
            secondary: theme.resolve_color(ColorRole::Secondary),
            pull_text,
            release_text,
            refreshing_text,
            refresh,
            on_state,
        };

        host.subscribe(
            container,
            EventMask::SCROLL | EventMask::SCROLL_END | EventMask::DELETE,
            container,
        );
        if let Err(err) = self.registry.insert(container, state) {
            host.delete_node(container);
            return Err(err);
        }

        info!("Pull-to-refresh container created: {:?}", container);
        Ok(container)
    }

    /// Handle a host event. Returns `true` if the event belonged to one of
    /// these containers.
    pub fn handle_event(&mut self, host: &mut dyn SceneHost, event: &HostEvent) -> bool {
        let node = event.owner;

        if event.kind == EventKind::Delete {
            if event.target != node || !self.registry.contains(node) {
                return false;
            }
            self.registry.release(node);
            return true;
        }

        if !host.is_alive(node) {
            // Queued before the deletion; the delete releases the state
            return self.registry.contains(node);
        }
        let Some(state) = self.registry.get_mut(node) else {
            return false;
        };

        match event.kind {
            EventKind::Scroll => state.on_scroll(host, node),
            EventKind::ScrollEnd => state.on_scroll_end(host, node),
            EventKind::Timer(COMPLETE_TIMER_TAG) => state.complete(host, node),
            _ => return false,
        }
        true
    }

    /// Finish the refresh: back to idle, scrolled to the top
    pub fn complete(&mut self, host: &mut dyn SceneHost, node: NodeId) {
        if let Some(state) = self.registry.get_live_mut(&*host, node) {
            state.complete(host, node);
        }
    }

    /// Start (`true`) or finish (`false`) a refresh programmatically. Starting
    /// does not invoke the refresh callback.
    pub fn set_refreshing(&mut self, host: &mut dyn SceneHost, node: NodeId, refreshing: bool) {
        let Some(state) = self.registry.get_live_mut(&*host, node) else {
            return;
        };

        if refreshing {
            if let Some(transition) = state.machine.start() {
                state.apply(host, node, transition);
            }
        } else {
            state.complete(host, node);
        }
    }

    /// Enable or disable pulling. Disabling mid-gesture or mid-refresh
    /// completes it without telling the refresh work.
    pub fn set_enabled(&mut self, host: &mut dyn SceneHost, node: NodeId, enabled: bool) {
        let Some(state) = self.registry.get_live_mut(&*host, node) else {
            return;
        };

        let was_idle = state.machine.state() == PullState::Idle;
        if let Some(transition) = state.machine.set_enabled(enabled) {
            state.apply(host, node, transition);
        }
        if !enabled && !was_idle {
            host.scroll_to(node, 0, true);
        }
    }

    /// Complete the refresh after `delay_ms`, through a host timer
    pub fn complete_after(
        &mut self,
        host: &mut dyn SceneHost,
        node: NodeId,
        delay_ms: u32,
    ) -> WidgetResult<TimerId> {
        if self.registry.get_live(&*host, node).is_none() {
            return Err(WidgetError::Host(HostError::StaleNode));
        }
        Ok(host.schedule_once(delay_ms, node, COMPLETE_TIMER_TAG)?)
    }

    /// `false` for unknown or deleted handles
    pub fn is_refreshing(&self, host: &dyn SceneHost, node: NodeId) -> bool {
        self.registry
            .get_live(host, node)
            .is_some_and(|state| state.machine.is_refreshing())
    }

    /// `0` for unknown or deleted handles
    pub fn pull_distance(&self, host: &dyn SceneHost, node: NodeId) -> i32 {
        self.registry
            .get_live(host, node)
            .map_or(0, |state| state.machine.pull_distance())
    }

    /// `None` for unknown or deleted handles
    pub fn state(&self, host: &dyn SceneHost, node: NodeId) -> Option<PullState> {
        self.registry
            .get_live(host, node)
            .map(|state| state.machine.state())
    }

    /// `false` for unknown or deleted handles
    pub fn is_enabled(&self, host: &dyn SceneHost, node: NodeId) -> bool {
        self.registry
            .get_live(host, node)
            .is_some_and(|state| state.machine.is_enabled())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn stats(&self) -> LifecycleStats {
        self.registry.stats()
    }
}

fn configure_container(host: &mut dyn SceneHost, container: NodeId, style: &WidgetStyle) {
    // Pulling past the top edge only works on an elastic container,
    // whatever the style says.
    let scroll = style.scroll_flags(ScrollFlags::VERTICAL) | ScrollFlags::ELASTIC;

    host.set_property(container, Property::Width(Dimension::Fill));
    host.set_property(container, Property::Height(Dimension::Fill));
    host.set_property(container, Property::Padding(style.padding));
    host.set_property(container, Property::BorderWidth(0));
    host.set_property(container, Property::BaseDir(style.base_dir));
    host.set_property(container, Property::TextAlign(TextAlign::Center));
    host.set_property(container, Property::Scroll(scroll));
}

fn build_indicator(
    host: &mut dyn SceneHost,
    container: NodeId,
    style: &WidgetStyle,
    theme: &dyn StyleResolver,
    indicator_size: u32,
) -> WidgetResult<Indicator> {
    let font = theme.resolve_font(style, style.content_font, FontClass::Small);

    let label = host.create_node(container, NodeKind::Label)?;
    host.set_property(label, Property::Width(Dimension::Fill));
    host.set_property(label, Property::TextAlign(TextAlign::Center));
    host.set_property(label, Property::Padding(INDICATOR_PADDING));
    host.set_property(label, Property::Font(font));
    host.set_property(label, Property::Hidden(true));

    let icon = host.create_node(container, NodeKind::Label)?;
    host.set_property(icon, Property::Text(String::from(ICON_REFRESH)));
    host.set_property(icon, Property::Width(Dimension::Fill));
    host.set_property(icon, Property::Height(Dimension::Px(indicator_size)));
    host.set_property(icon, Property::TextAlign(TextAlign::Center));
    host.set_property(
        icon,
        Property::TextColor(theme.resolve_color(ColorRole::Primary)),
    );
    host.set_property(icon, Property::Hidden(true));

    Ok(Indicator { label, icon })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> RefreshMachine {
        RefreshMachine::new(25, 1000)
    }

    #[test]
    fn test_scroll_transition_table() {
        let cases = [
            (PullState::Idle, 0, PullState::Idle),
            (PullState::Idle, -1, PullState::Pulling),
            (PullState::Idle, -24, PullState::Pulling),
            (PullState::Idle, -25, PullState::Ready),
            (PullState::Pulling, -30, PullState::Ready),
            (PullState::Ready, -10, PullState::Pulling),
            (PullState::Ready, 0, PullState::Idle),
            (PullState::Pulling, 40, PullState::Idle),
        ];

        for (from, offset, expected) in cases {
            let mut m = machine();
            match from {
                PullState::Idle => {}
                PullState::Pulling => {
                    m.on_scroll(-5);
                }
                PullState::Ready => {
                    m.on_scroll(-30);
                }
                PullState::Refreshing => unreachable!(),
            }
            assert_eq!(m.state(), from);

            m.on_scroll(offset);
            assert_eq!(m.state(), expected, "{from:?} with offset {offset}");
        }
    }

    #[test]
    fn test_transitions_are_reported_once() {
        let mut m = machine();
        assert_eq!(
            m.on_scroll(-5),
            Some(Transition {
                from: PullState::Idle,
                to: PullState::Pulling
            })
        );
        assert_eq!(m.on_scroll(-6), None, "same state, no transition");
        assert_eq!(m.pull_distance(), 6);
    }

    #[test]
    fn test_refreshing_ignores_scroll_and_freezes_distance() {
        let mut m = machine();
        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(5000), ReleaseOutcome::Triggered(_)));

        assert_eq!(m.on_scroll(0), None);
        assert_eq!(m.on_scroll(-3), None);
        assert_eq!(m.state(), PullState::Refreshing);
        assert_eq!(m.pull_distance(), 30, "distance frozen while refreshing");
        assert_eq!(m.on_scroll_end(9000), ReleaseOutcome::Ignored);
        assert_eq!(m.state(), PullState::Refreshing, "only completion leaves Refreshing");
    }

    #[test]
    fn test_release_below_threshold_resets() {
        let mut m = machine();
        m.on_scroll(-10);

        assert_eq!(
            m.on_scroll_end(0),
            ReleaseOutcome::Reset(Some(Transition {
                from: PullState::Pulling,
                to: PullState::Idle
            }))
        );
        assert_eq!(m.on_scroll_end(0), ReleaseOutcome::Reset(None));
        assert!(!m.is_triggered());
    }

    #[test]
    fn test_first_trigger_needs_no_cooldown() {
        let mut m = machine();
        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(0), ReleaseOutcome::Triggered(_)));
    }

    #[test]
    fn test_cooldown_blocks_second_trigger() {
        let mut m = machine();
        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(100), ReleaseOutcome::Triggered(_)));
        m.complete();

        m.on_scroll(-30);
        assert!(
            matches!(m.on_scroll_end(600), ReleaseOutcome::Reset(_)),
            "500 ms after the last trigger is still cooling down"
        );
        assert_eq!(m.state(), PullState::Idle);

        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(1100), ReleaseOutcome::Triggered(_)));
    }

    #[test]
    fn test_cooldown_across_clock_wrap() {
        let mut m = machine();
        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(u32::MAX - 100), ReleaseOutcome::Triggered(_)));
        m.complete();

        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(200), ReleaseOutcome::Reset(_)));
        m.on_scroll(-30);
        assert!(matches!(m.on_scroll_end(900), ReleaseOutcome::Triggered(_)));
    }

    #[test]
    fn test_double_release_fires_once() {
        let mut m = machine();
        m.on_scroll(-30);

        let fired = [m.on_scroll_end(2000), m.on_scroll_end(2010)]
            .iter()
            .filter(|outcome| matches!(outcome, ReleaseOutcome::Triggered(_)))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_programmatic_start_and_complete() {
        let mut m = machine();
        assert_eq!(
            m.start(),
            Some(Transition {
                from: PullState::Idle,
                to: PullState::Refreshing
            })
        );
        assert!(m.is_triggered());

        m.complete();
        assert_eq!(m.state(), PullState::Idle);
        assert!(!m.is_triggered());
        assert_eq!(m.pull_distance(), 0);
    }

    #[test]
    fn test_disable_forces_completion() {
        let mut m = machine();
        m.on_scroll(-30);
        m.on_scroll_end(3000);

        let transition = m.set_enabled(false);
        assert_eq!(transition.map(|t| t.to), Some(PullState::Idle));
        assert!(!m.is_triggered());

        assert_eq!(m.on_scroll(-40), None, "disabled machine ignores scrolls");
        assert_eq!(m.on_scroll_end(9000), ReleaseOutcome::Ignored);
        assert_eq!(m.pull_distance(), 0);

        assert_eq!(m.set_enabled(true), None);
        m.on_scroll(-40);
        assert_eq!(m.state(), PullState::Ready);
    }

    #[test]
    fn test_threshold_25_scenario() {
        let mut m = machine();
        let mut refreshes = 0;

        m.on_scroll(-30);
        assert_eq!(m.state(), PullState::Ready);

        if let ReleaseOutcome::Triggered(_) = m.on_scroll_end(1500) {
            refreshes += 1;
        }
        assert_eq!(refreshes, 1);
        assert_eq!(m.state(), PullState::Refreshing);

        m.complete();
        assert_eq!(m.state(), PullState::Idle);
        assert_eq!(m.pull_distance(), 0);
    }

    #[test]
    fn test_default_config() {
        let config = PullRefreshConfig::default();
        assert_eq!(config.threshold, 25);
        assert_eq!(config.cooldown_ms, 1000);
        assert_eq!(config.indicator_size, 24);
        assert!(config.show_indicator);
        assert_eq!(config.pull_text, "Pull to refresh");
        assert!(config.refresh.is_none());
    }
}
