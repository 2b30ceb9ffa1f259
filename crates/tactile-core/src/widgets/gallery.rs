//! Image gallery
//!
//! Shows one image of a borrowed slice at a time, with a counter line and
//! previous/next buttons that wrap around. Navigation is a [`Carousel`]
//! over the slice; [`GalleryWidgets`] renders it into host nodes.

use alloc::format;
use alloc::string::String;

use embedded_graphics::pixelcolor::Rgb565;
use log::{debug, info, warn};

use crate::error::{WidgetError, WidgetResult};
use crate::host::{
    Dimension, EventKind, EventMask, Flow, HostEvent, ImageSource, NodeId, NodeKind, Property,
    SceneHost, ScrollFlags,
};
use crate::lifecycle::{LifecycleStats, WidgetRegistry};
use crate::ui::styling::{ColorRole, FontClass, StyleResolver, TextAlign, TextSize, WidgetStyle};

const CONTAINER_PADDING: u32 = 15;
const IMAGES_PADDING: u32 = 10;
const BUTTONS_PADDING: u32 = 10;
const BUTTON_WIDTH: u32 = 120;
const BUTTON_HEIGHT: u32 = 50;

/// One gallery entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryImage<'a> {
    /// Required; a gallery refuses entries without a source
    pub source: Option<ImageSource>,
    pub label: Option<&'a str>,
    pub border_color: Rgb565,
}

impl<'a> GalleryImage<'a> {
    pub const fn new(source: ImageSource, label: &'a str, border_color: Rgb565) -> Self {
        Self {
            source: Some(source),
            label: Some(label),
            border_color,
        }
    }
}

/// Bounded circular index over a non-empty, validated image slice
#[derive(Debug, Clone, Copy)]
pub struct Carousel<'a> {
    images: &'a [GalleryImage<'a>],
    index: usize,
}

impl<'a> Carousel<'a> {
    /// Starts at index 0. Fails on an empty slice or an entry without a
    /// source.
    pub fn new(images: &'a [GalleryImage<'a>]) -> WidgetResult<Self> {
        if images.is_empty() {
            return Err(WidgetError::EmptyGallery);
        }
        if let Some(index) = images.iter().position(|image| image.source.is_none()) {
            return Err(WidgetError::MissingImage { index });
        }

        for (index, image) in images.iter().enumerate() {
            if image.label.is_none() {
                debug!("Gallery image {} has no label", index);
            }
        }

        Ok(Self { images, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always `false`: construction rejects empty slices
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'a GalleryImage<'a> {
        &self.images[self.index]
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.images.len();
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.images.len() - 1) % self.images.len();
        self.index
    }

    /// Jump to `index`. Out-of-range (including negative) indices fail and
    /// leave the position unchanged.
    pub fn set_index(&mut self, index: i32) -> bool {
        match usize::try_from(index) {
            Ok(index) if index < self.images.len() => {
                self.index = index;
                true
            }
            _ => false,
        }
    }

    /// `"{position} / {count} - {label}"`, 1-based, empty label when missing
    pub fn counter_text(&self) -> String {
        let label = self.current().label.unwrap_or("");
        format!("{} / {} - {}", self.index + 1, self.len(), label)
    }

    /// Tallest image in the slice
    pub fn max_height(&self) -> u32 {
        self.images
            .iter()
            .filter_map(|image| image.source.map(|source| source.size.height))
            .max()
            .unwrap_or(0)
    }
}

/// Configuration for a gallery
#[derive(Debug, Clone, Copy)]
pub struct GalleryConfig<'a> {
    pub prev_text: &'a str,
    pub next_text: &'a str,
    /// Shown above the counter when present and not empty
    pub title: Option<&'a str>,
    pub style: WidgetStyle,
}

impl Default for GalleryConfig<'_> {
    fn default() -> Self {
        Self {
            prev_text: "< Previous",
            next_text: "Next >",
            title: None,
            style: WidgetStyle::default(),
        }
    }
}

impl<'a> GalleryConfig<'a> {
    /// Right-to-left preset with Hebrew button labels
    pub fn rtl() -> Self {
        Self {
            prev_text: "הקודם",
            next_text: "הבא",
            style: WidgetStyle::rtl(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_button_texts(mut self, prev: &'a str, next: &'a str) -> Self {
        self.prev_text = prev;
        self.next_text = next;
        self
    }

    pub fn with_style(mut self, style: WidgetStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct GalleryNodes {
    counter: NodeId,
    image: NodeId,
    prev: NodeId,
    next: NodeId,
}

struct GalleryState<'a> {
    carousel: Carousel<'a>,
    nodes: GalleryNodes,
}

impl GalleryState<'_> {
    fn render(&self, host: &mut dyn SceneHost) {
        let current = self.carousel.current();

        if let Some(source) = current.source {
            host.set_property(self.nodes.image, Property::Image(source));
        }
        host.set_property(self.nodes.image, Property::BorderColor(current.border_color));
        host.set_property(
            self.nodes.counter,
            Property::Text(self.carousel.counter_text()),
        );

        debug!(
            "Gallery updated to image {}/{}",
            self.carousel.index() + 1,
            self.carousel.len()
        );
    }
}

/// All galleries of an application. `'a` is the lifetime of the borrowed
/// image slices.
pub struct GalleryWidgets<'a> {
    registry: WidgetRegistry<GalleryState<'a>>,
}

impl Default for GalleryWidgets<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GalleryWidgets<'a> {
    pub fn new() -> Self {
        Self {
            registry: WidgetRegistry::new("gallery"),
        }
    }

    /// Create a gallery under `parent` showing the first of `images`
    pub fn create(
        &mut self,
        host: &mut dyn SceneHost,
        parent: NodeId,
        images: &'a [GalleryImage<'a>],
        config: GalleryConfig<'_>,
        theme: &dyn StyleResolver,
    ) -> WidgetResult<NodeId> {
        if !host.is_alive(parent) {
            warn!("Gallery parent {:?} is not alive", parent);
            return Err(WidgetError::InvalidParent);
        }
        let carousel = Carousel::new(images).inspect_err(|err| warn!("Gallery rejected: {}", err))?;
        info!("Creating image gallery with {} images", carousel.len());

        let container = host.create_node(parent, NodeKind::Container)?;
        let nodes = match build_gallery(host, container, &carousel, &config, theme) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!("Failed to build gallery: {}", err);
                host.delete_node(container);
                return Err(err);
            }
        };

        let state = GalleryState { carousel, nodes };
        state.render(host);

        host.subscribe(container, EventMask::DELETE, container);
        host.subscribe(nodes.prev, EventMask::CLICKED, container);
        host.subscribe(nodes.next, EventMask::CLICKED, container);
        if let Err(err) = self.registry.insert(container, state) {
            host.delete_node(container);
            return Err(err);
        }

        info!("Gallery widget created: {:?}", container);
        Ok(container)
    }

    /// Handle a host event. Returns `true` if it belonged to one of these
    /// galleries.
    pub fn handle_event(&mut self, host: &mut dyn SceneHost, event: &HostEvent) -> bool {
        let gallery = event.owner;

        if event.kind == EventKind::Delete {
            if event.target != gallery || !self.registry.contains(gallery) {
                return false;
            }
            self.registry.release(gallery);
            return true;
        }

        if !host.is_alive(gallery) {
            // Queued before the deletion; the delete releases the state
            return self.registry.contains(gallery);
        }
        let Some(state) = self.registry.get_mut(gallery) else {
            return false;
        };
        if event.kind != EventKind::Clicked {
            return false;
        }

        if event.target == state.nodes.prev {
            state.carousel.prev();
            info!("Previous clicked - showing image {}", state.carousel.index() + 1);
        } else if event.target == state.nodes.next {
            state.carousel.next();
            info!("Next clicked - showing image {}", state.carousel.index() + 1);
        } else {
            return false;
        }
        state.render(host);
        true
    }

    pub fn next(&mut self, host: &mut dyn SceneHost, gallery: NodeId) {
        if let Some(state) = self.registry.get_live_mut(&*host, gallery) {
            state.carousel.next();
            state.render(host);
        }
    }

    pub fn prev(&mut self, host: &mut dyn SceneHost, gallery: NodeId) {
        if let Some(state) = self.registry.get_live_mut(&*host, gallery) {
            state.carousel.prev();
            state.render(host);
        }
    }

    /// Show image `index`. Returns `false` (and changes nothing) for an
    /// unknown or deleted handle or an out-of-range index.
    pub fn set_index(&mut self, host: &mut dyn SceneHost, gallery: NodeId, index: i32) -> bool {
        let Some(state) = self.registry.get_live_mut(&*host, gallery) else {
            return false;
        };

        if !state.carousel.set_index(index) {
            warn!(
                "Index {} out of range [0, {})",
                index,
                state.carousel.len()
            );
            return false;
        }
        state.render(host);
        true
    }

    /// Current index, `-1` for unknown or deleted handles
    pub fn index(&self, host: &dyn SceneHost, gallery: NodeId) -> i32 {
        self.registry
            .get_live(host, gallery)
            .map_or(-1, |state| state.carousel.index() as i32)
    }

    /// Number of images, `0` for unknown or deleted handles
    pub fn count(&self, host: &dyn SceneHost, gallery: NodeId) -> usize {
        self.registry
            .get_live(host, gallery)
            .map_or(0, |state| state.carousel.len())
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

fn build_gallery(
    host: &mut dyn SceneHost,
    container: NodeId,
    carousel: &Carousel<'_>,
    config: &GalleryConfig<'_>,
    theme: &dyn StyleResolver,
) -> WidgetResult<GalleryNodes> {
    let style = &config.style;

    host.set_property(container, Property::Width(Dimension::Fill));
    host.set_property(container, Property::Height(Dimension::Fill));
    host.set_property(container, Property::Padding(CONTAINER_PADDING));
    host.set_property(container, Property::RowGap(CONTAINER_PADDING));
    host.set_property(container, Property::BorderWidth(0));
    host.set_property(container, Property::BaseDir(style.base_dir));
    host.set_property(container, Property::TextAlign(TextAlign::Center));
    // Navigation is by buttons only
    host.set_property(container, Property::Scroll(ScrollFlags::empty()));

    if let Some(title) = config.title.filter(|title| !title.is_empty()) {
        let label = host.create_node(container, NodeKind::Label)?;
        host.set_property(label, Property::Text(String::from(title)));
        host.set_property(label, Property::Width(Dimension::Content));
        host.set_property(
            label,
            Property::Font(theme.resolve_font(style, style.title_font, FontClass::Large)),
        );
        host.set_property(
            label,
            Property::TextColor(theme.resolve_color(ColorRole::Primary)),
        );
    }

    let counter = host.create_node(container, NodeKind::Label)?;
    host.set_property(counter, Property::Width(Dimension::Fill));
    host.set_property(counter, Property::TextAlign(TextAlign::Center));
    host.set_property(
        counter,
        Property::Font(theme.resolve_font(style, style.content_font, FontClass::Normal)),
    );

    // Room for the tallest image plus 30%
    let area_height = carousel.max_height() * 13 / 10;
    let area = host.create_node(container, NodeKind::Container)?;
    host.set_property(area, Property::Width(Dimension::Fill));
    host.set_property(area, Property::Height(Dimension::Px(area_height)));
    host.set_property(area, Property::BorderWidth(1));
    host.set_property(area, Property::Radius(style.border_radius));
    host.set_property(area, Property::Padding(IMAGES_PADDING));
    host.set_property(area, Property::TextAlign(TextAlign::Center));

    let image = host.create_node(area, NodeKind::Image)?;
    host.set_property(image, Property::BorderWidth(2));

    let buttons = host.create_node(container, NodeKind::Container)?;
    host.set_property(buttons, Property::Width(Dimension::Fill));
    host.set_property(buttons, Property::Height(Dimension::Content));
    host.set_property(buttons, Property::Flow(Flow::Row));
    host.set_property(buttons, Property::Padding(BUTTONS_PADDING));
    host.set_property(buttons, Property::RowGap(BUTTONS_PADDING));
    host.set_property(buttons, Property::BorderWidth(0));
    host.set_property(buttons, Property::TextAlign(TextAlign::Center));
    host.set_property(buttons, Property::Scroll(ScrollFlags::empty()));

    let button_font = theme.resolve_font(style, style.button_font, FontClass::Small);
    let prev = nav_button(
        host,
        buttons,
        config.prev_text,
        theme.resolve_color(ColorRole::Primary),
        button_font,
    )?;
    let next = nav_button(
        host,
        buttons,
        config.next_text,
        theme.resolve_color(ColorRole::Secondary),
        button_font,
    )?;

    Ok(GalleryNodes {
        counter,
        image,
        prev,
        next,
    })
}

fn nav_button(
    host: &mut dyn SceneHost,
    parent: NodeId,
    text: &str,
    color: Rgb565,
    font: TextSize,
) -> WidgetResult<NodeId> {
    let button = host.create_node(parent, NodeKind::Button)?;
    host.set_property(button, Property::Width(Dimension::Px(BUTTON_WIDTH)));
    host.set_property(button, Property::Height(Dimension::Px(BUTTON_HEIGHT)));
    host.set_property(button, Property::BorderColor(color));
    host.set_property(button, Property::Padding(BUTTONS_PADDING));

    let label = host.create_node(button, NodeKind::Label)?;
    host.set_property(label, Property::Text(String::from(text)));
    host.set_property(label, Property::Width(Dimension::Fill));
    host.set_property(label, Property::TextAlign(TextAlign::Center));
    host.set_property(label, Property::Font(font));

    Ok(button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::styling::colors::{BLUE, SLATE, WHITE};

    const IMAGES: [GalleryImage<'static>; 3] = [
        GalleryImage::new(ImageSource::new(1, 64, 40), "Harbor", BLUE),
        GalleryImage::new(ImageSource::new(2, 64, 50), "Forest", SLATE),
        GalleryImage::new(ImageSource::new(3, 64, 30), "Desert", WHITE),
    ];

    #[test]
    fn test_three_image_scenario() {
        let mut carousel = Carousel::new(&IMAGES).unwrap();
        assert_eq!(carousel.index(), 0);

        assert_eq!(carousel.prev(), 2, "prev wraps to the last image");
        carousel.next();
        assert_eq!(carousel.next(), 1);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let images = IMAGES;
        for count in 1..=images.len() {
            let mut carousel = Carousel::new(&images[..count]).unwrap();
            carousel.set_index((count - 1) as i32);
            let start = carousel.index();

            for _ in 0..count {
                carousel.next();
            }
            assert_eq!(carousel.index(), start, "next x{count}");

            for _ in 0..count {
                carousel.prev();
            }
            assert_eq!(carousel.index(), start, "prev x{count}");
        }
    }

    #[test]
    fn test_set_index_bounds() {
        let mut carousel = Carousel::new(&IMAGES).unwrap();
        carousel.set_index(1);

        assert!(!carousel.set_index(3), "count is out of range");
        assert!(!carousel.set_index(-1), "negative is out of range");
        assert_eq!(carousel.index(), 1, "failed jumps leave the index");
        assert!(carousel.set_index(2));
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_construction_validation() {
        assert!(matches!(Carousel::new(&[]), Err(WidgetError::EmptyGallery)));

        let mut broken = IMAGES;
        broken[1].source = None;
        assert!(matches!(
            Carousel::new(&broken),
            Err(WidgetError::MissingImage { index: 1 })
        ));
    }

    #[test]
    fn test_counter_text() {
        let mut images = IMAGES;
        images[2].label = None;
        let mut carousel = Carousel::new(&images).unwrap();

        assert_eq!(carousel.counter_text().as_str(), "1 / 3 - Harbor");
        carousel.prev();
        assert_eq!(carousel.counter_text().as_str(), "3 / 3 - ", "missing label is empty");
    }

    #[test]
    fn test_counter_keeps_long_labels() {
        let long = "x".repeat(200);
        let images = [GalleryImage::new(ImageSource::new(9, 8, 8), &long, BLUE)];
        let carousel = Carousel::new(&images).unwrap();
        assert_eq!(carousel.counter_text(), format!("1 / 1 - {long}"));

        // Two bytes per char
        let hebrew = "א".repeat(61);
        let images = [
            GalleryImage::new(ImageSource::new(9, 8, 8), "short", BLUE),
            GalleryImage::new(ImageSource::new(10, 8, 8), &hebrew, SLATE),
        ];
        let mut carousel = Carousel::new(&images).unwrap();
        carousel.next();
        let text = carousel.counter_text();
        assert!(text.starts_with("2 / 2 - "));
        assert!(text.ends_with(hebrew.as_str()));
    }

    #[test]
    fn test_max_height() {
        let carousel = Carousel::new(&IMAGES).unwrap();
        assert_eq!(carousel.max_height(), 50);
    }
}
