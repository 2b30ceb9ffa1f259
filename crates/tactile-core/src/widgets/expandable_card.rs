//! Expandable card
//!
//! A bordered card with a title, a body that shows a truncated preview while
//! collapsed, and a button that toggles between preview and full text. The
//! preview is computed once, on the first collapsed render, and kept until
//! the card is deleted.

use alloc::boxed::Box;
use alloc::string::String;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};
use crate::host::{
    Dimension, EventKind, EventMask, HostEvent, NodeId, NodeKind, Property, SceneHost,
    ScrollFlags,
};
use crate::lifecycle::{LifecycleStats, WidgetRegistry};
use crate::text::truncate;
use crate::ui::styling::{ColorRole, FontClass, StyleResolver, TextAlign, WidgetStyle};

const BUTTON_RADIUS: u32 = 5;
const BUTTON_PADDING: u32 = 8;

/// Text shown by a card. Borrowed for the lifetime of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct CardData<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Called after the card expands or collapses
pub type CardCallback<'a> = Box<dyn FnMut() + 'a>;

/// Configuration for an expandable card
pub struct CardConfig<'a> {
    pub expand_text: &'a str,
    pub collapse_text: &'a str,

    /// Preview length in characters, suffix included
    pub truncate_length: usize,
    pub truncate_suffix: &'a str,

    /// Height of the expanded body; `0` means as tall as the text
    pub max_content_height: u32,
    pub button_width: u32,
    pub button_height: u32,

    pub style: WidgetStyle,

    pub on_expand: Option<CardCallback<'a>>,
    pub on_collapse: Option<CardCallback<'a>>,
}

impl Default for CardConfig<'_> {
    fn default() -> Self {
        Self {
            expand_text: "Show More",
            collapse_text: "Show Less",
            truncate_length: 60,
            truncate_suffix: "...",
            max_content_height: 0,
            button_width: 100,
            button_height: 30,
            style: WidgetStyle::default(),
            on_expand: None,
            on_collapse: None,
        }
    }
}

impl<'a> CardConfig<'a> {
    /// Right-to-left preset with Hebrew button labels and a longer preview
    pub fn rtl() -> Self {
        Self {
            expand_text: "הרחב",
            collapse_text: "כווץ",
            truncate_length: 80,
            style: WidgetStyle::rtl(),
            ..Self::default()
        }
    }

    pub fn with_button_texts(mut self, expand: &'a str, collapse: &'a str) -> Self {
        self.expand_text = expand;
        self.collapse_text = collapse;
        self
    }

    pub fn with_truncation(mut self, length: usize, suffix: &'a str) -> Self {
        self.truncate_length = length;
        self.truncate_suffix = suffix;
        self
    }

    pub fn with_max_content_height(mut self, height: u32) -> Self {
        self.max_content_height = height;
        self
    }

    pub fn with_button_size(mut self, width: u32, height: u32) -> Self {
        self.button_width = width;
        self.button_height = height;
        self
    }

    pub fn with_style(mut self, style: WidgetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn on_expand(mut self, callback: impl FnMut() + 'a) -> Self {
        self.on_expand = Some(Box::new(callback));
        self
    }

    pub fn on_collapse(mut self, callback: impl FnMut() + 'a) -> Self {
        self.on_collapse = Some(Box::new(callback));
        self
    }
}

/// Child nodes of one card
#[derive(Debug, Clone, Copy)]
struct CardNodes {
    title: NodeId,
    content_box: NodeId,
    content: NodeId,
    button: NodeId,
    button_label: NodeId,
}

struct CardState<'a> {
    data: &'a CardData<'a>,
    nodes: CardNodes,
    expand_text: &'a str,
    collapse_text: &'a str,
    truncate_length: usize,
    truncate_suffix: &'a str,
    max_content_height: u32,
    on_expand: Option<CardCallback<'a>>,
    on_collapse: Option<CardCallback<'a>>,
    expanded: bool,
    preview: Option<String>,
}

impl CardState<'_> {
    fn render(&mut self, host: &mut dyn SceneHost) {
        let body = self.nodes.content_box;

        let text = if self.expanded {
            if self.max_content_height > 0 {
                host.set_property(body, Property::Height(Dimension::Px(self.max_content_height)));
                host.set_property(body, Property::Scroll(ScrollFlags::VERTICAL));
            } else {
                host.set_property(body, Property::Height(Dimension::Content));
                host.set_property(body, Property::Scroll(ScrollFlags::empty()));
            }
            String::from(self.data.content)
        } else {
            let (content, length, suffix) =
                (self.data.content, self.truncate_length, self.truncate_suffix);
            let preview = self
                .preview
                .get_or_insert_with(|| truncate(content, length, suffix).into_owned());

            host.set_property(body, Property::Height(Dimension::Content));
            host.set_property(body, Property::Scroll(ScrollFlags::empty()));
            host.scroll_to(body, 0, false);
            preview.clone()
        };
        host.set_property(self.nodes.content, Property::Text(text));

        let button_text = if self.expanded {
            self.collapse_text
        } else {
            self.expand_text
        };
        host.set_property(self.nodes.button_label, Property::Text(String::from(button_text)));

        debug!("Card updated - expanded: {}", self.expanded);
    }

    fn apply_theme(&self, host: &mut dyn SceneHost, card: NodeId, theme: &dyn StyleResolver) {
        host.set_property(
            self.nodes.title,
            Property::TextColor(theme.resolve_color(ColorRole::Primary)),
        );
        host.set_property(
            card,
            Property::BorderColor(theme.resolve_color(ColorRole::Secondary)),
        );
    }
}

/// All expandable cards of an application. `'a` is the lifetime of the
/// borrowed card text.
pub struct CardWidgets<'a> {
    registry: WidgetRegistry<CardState<'a>>,
}

impl Default for CardWidgets<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CardWidgets<'a> {
    pub fn new() -> Self {
        Self {
            registry: WidgetRegistry::new("expandable_card"),
        }
    }

    /// Create a collapsed card under `parent` showing `data`
    pub fn create(
        &mut self,
        host: &mut dyn SceneHost,
        parent: NodeId,
        data: &'a CardData<'a>,
        config: CardConfig<'a>,
        theme: &dyn StyleResolver,
    ) -> WidgetResult<NodeId> {
        if !host.is_alive(parent) {
            warn!("Card parent {:?} is not alive", parent);
            return Err(WidgetError::InvalidParent);
        }
        info!("Creating expandable card: {}", data.title);

        let card = host.create_node(parent, NodeKind::Container)?;
        let nodes = match build_card(host, card, data, &config, theme) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!("Card construction failed: {}", err);
                host.delete_node(card);
                return Err(err);
            }
        };

        let mut state = CardState {
            data,
            nodes,
            expand_text: config.expand_text,
            collapse_text: config.collapse_text,
            truncate_length: config.truncate_length,
            truncate_suffix: config.truncate_suffix,
            max_content_height: config.max_content_height,
            on_expand: config.on_expand,
            on_collapse: config.on_collapse,
            expanded: false,
            preview: None,
        };
        state.apply_theme(host, card, theme);
        state.render(host);

        host.subscribe(card, EventMask::DELETE, card);
        host.subscribe(nodes.button, EventMask::CLICKED, card);
        if let Err(err) = self.registry.insert(card, state) {
            host.delete_node(card);
            return Err(err);
        }

        info!("Card widget created: {:?}", card);
        Ok(card)
    }

    /// Handle a host event. Returns `true` if it belonged to one of these
    /// cards.
    pub fn handle_event(&mut self, host: &mut dyn SceneHost, event: &HostEvent) -> bool {
        let card = event.owner;

        if event.kind == EventKind::Delete {
            if event.target != card || !self.registry.contains(card) {
                return false;
            }
            self.registry.release(card);
            return true;
        }

        if !host.is_alive(card) {
            // Queued before the deletion; the delete releases the state
            return self.registry.contains(card);
        }
        let Some(state) = self.registry.get_mut(card) else {
            return false;
        };
        if event.kind != EventKind::Clicked || event.target != state.nodes.button {
            return false;
        }

        state.expanded = !state.expanded;
        state.render(host);

        let callback = if state.expanded {
            state.on_expand.as_mut()
        } else {
            state.on_collapse.as_mut()
        };
        if let Some(callback) = callback {
            callback();
        }

        if !state.expanded {
            host.scroll_into_view(card, true);
        }

        info!(
            "Card {}",
            if state.expanded { "expanded" } else { "collapsed" }
        );
        true
    }

    /// Expand or collapse without running callbacks. Returns `false` for an
    /// unknown or deleted handle.
    pub fn set_expanded(&mut self, host: &mut dyn SceneHost, card: NodeId, expanded: bool) -> bool {
        let Some(state) = self.registry.get_live_mut(&*host, card) else {
            return false;
        };

        state.expanded = expanded;
        state.render(host);
        true
    }

    pub fn toggle(&mut self, host: &mut dyn SceneHost, card: NodeId) {
        if let Some(state) = self.registry.get_live_mut(&*host, card) {
            state.expanded = !state.expanded;
            state.render(host);
        }
    }

    /// `false` for unknown or deleted handles
    pub fn is_expanded(&self, host: &dyn SceneHost, card: NodeId) -> bool {
        self.registry
            .get_live(host, card)
            .is_some_and(|state| state.expanded)
    }

    /// The cached collapsed preview, once it has been computed
    pub fn preview(&self, host: &dyn SceneHost, card: NodeId) -> Option<&str> {
        self.registry
            .get_live(host, card)
            .and_then(|state| state.preview.as_deref())
    }

    /// Re-apply theme colors to every live card
    pub fn update_theme(&mut self, host: &mut dyn SceneHost, theme: &dyn StyleResolver) {
        for (card, state) in self.registry.iter_mut() {
            if !host.is_alive(card) {
                continue;
            }
            state.apply_theme(host, card, theme);
        }
        debug!("Theme applied to {} cards", self.registry.len());
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

fn build_card(
    host: &mut dyn SceneHost,
    card: NodeId,
    data: &CardData<'_>,
    config: &CardConfig<'_>,
    theme: &dyn StyleResolver,
) -> WidgetResult<CardNodes> {
    let style = &config.style;
    let align = style.base_dir.leading_align();

    host.set_property(card, Property::Width(Dimension::Fill));
    host.set_property(card, Property::Height(Dimension::Content));
    host.set_property(card, Property::Padding(style.padding));
    host.set_property(card, Property::RowGap(style.margin));
    host.set_property(card, Property::BorderWidth(style.border_width));
    host.set_property(card, Property::Radius(style.border_radius));
    host.set_property(card, Property::BaseDir(style.base_dir));
    host.set_property(card, Property::Scroll(style.scroll_flags(ScrollFlags::VERTICAL)));

    let title = host.create_node(card, NodeKind::Label)?;
    host.set_property(title, Property::Text(String::from(data.title)));
    host.set_property(title, Property::Width(Dimension::Fill));
    host.set_property(
        title,
        Property::Font(theme.resolve_font(style, style.title_font, FontClass::Large)),
    );
    host.set_property(title, Property::BaseDir(style.base_dir));
    host.set_property(title, Property::TextAlign(align));

    let content_box = host.create_node(card, NodeKind::Container)?;
    host.set_property(content_box, Property::Width(Dimension::Fill));
    host.set_property(content_box, Property::Height(Dimension::Content));
    host.set_property(content_box, Property::BorderWidth(0));
    host.set_property(content_box, Property::Padding(0));

    let content = host.create_node(content_box, NodeKind::Label)?;
    host.set_property(content, Property::Width(Dimension::Fill));
    host.set_property(
        content,
        Property::Font(theme.resolve_font(style, style.content_font, FontClass::Normal)),
    );
    host.set_property(content, Property::BaseDir(style.base_dir));
    host.set_property(content, Property::TextAlign(align));

    let button = host.create_node(card, NodeKind::Button)?;
    host.set_property(button, Property::Width(Dimension::Px(config.button_width)));
    host.set_property(button, Property::Height(Dimension::Px(config.button_height)));
    host.set_property(button, Property::Radius(BUTTON_RADIUS.min(style.border_radius)));
    host.set_property(button, Property::Padding(BUTTON_PADDING));

    let button_label = host.create_node(button, NodeKind::Label)?;
    host.set_property(button_label, Property::Width(Dimension::Fill));
    host.set_property(button_label, Property::TextAlign(TextAlign::Center));
    host.set_property(
        button_label,
        Property::Font(theme.resolve_font(style, style.button_font, FontClass::Small)),
    );

    Ok(CardNodes {
        title,
        content_box,
        content,
        button,
        button_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CardConfig::default();
        assert_eq!(config.expand_text, "Show More");
        assert_eq!(config.collapse_text, "Show Less");
        assert_eq!(config.truncate_length, 60);
        assert_eq!(config.truncate_suffix, "...");
        assert_eq!(config.max_content_height, 0, "unlimited by default");
        assert_eq!((config.button_width, config.button_height), (100, 30));
        assert!(config.on_expand.is_none() && config.on_collapse.is_none());
    }

    #[test]
    fn test_rtl_preset() {
        let config = CardConfig::rtl();
        assert_eq!(config.style.base_dir.leading_align(), TextAlign::Right);
        assert_eq!(config.truncate_length, 80);
        assert_eq!(config.truncate_suffix, "...");
    }

    #[test]
    fn test_builders_keep_other_fields() {
        let config = CardConfig::default()
            .with_truncation(20, "~")
            .with_max_content_height(90);

        assert_eq!(config.truncate_length, 20);
        assert_eq!(config.truncate_suffix, "~");
        assert_eq!(config.max_content_height, 90);
        assert_eq!(config.expand_text, "Show More");
    }
}
