//! Expandable cards and galleries driven through the in-memory scene

use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::prelude::Size;
use tactile_core::host::{Dimension, ImageSource, NodeKind, ScrollFlags};
use tactile_core::ui::styling::colors::{ALERT, BLUE, SLATE, WHITE};
use tactile_core::ui::{ColorRole, StyleResolver, Theme, WidgetStyle};
use tactile_core::widgets::{CardConfig, CardData, GalleryConfig, GalleryImage, WidgetSet};
use tactile_core::{NodeId, Scene, SceneHost, WidgetError};

const LONG_TEXT: &str = "Touch widgets keep their own state in a side table keyed by the \
                         node that owns them, and release it when that node is deleted.";

const IMAGES: [GalleryImage<'static>; 3] = [
    GalleryImage::new(ImageSource::new(1, 64, 40), "Harbor", BLUE),
    GalleryImage::new(ImageSource::new(2, 64, 50), "Forest", SLATE),
    GalleryImage::new(ImageSource::new(3, 64, 30), "Desert", WHITE),
];

fn scene() -> Scene {
    Scene::new(Size::new(240, 320))
}

fn child(scene: &Scene, node: NodeId, index: usize) -> NodeId {
    scene.node(node).unwrap().children()[index]
}

/// Nodes of a card: (title, content_box, content label, button label)
fn card_nodes(scene: &Scene, card: NodeId) -> (NodeId, NodeId, NodeId, NodeId) {
    let content_box = child(scene, card, 1);
    let button = child(scene, card, 2);
    (
        child(scene, card, 0),
        content_box,
        child(scene, content_box, 0),
        child(scene, button, 0),
    )
}

#[test]
fn test_card_starts_collapsed_with_preview() {
    let data = CardData {
        title: "Lifecycle",
        content: LONG_TEXT,
    };
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let card = widgets
        .cards
        .create(&mut scene, root, &data, CardConfig::default(), &theme)
        .unwrap();
    let (title, _, content, button_label) = card_nodes(&scene, card);

    assert!(!widgets.cards.is_expanded(&scene, card));
    assert_eq!(scene.text(title), Some("Lifecycle"));
    assert_eq!(scene.text(button_label), Some("Show More"));

    let preview = scene.text(content).unwrap();
    assert_eq!(preview.chars().count(), 60);
    assert!(preview.ends_with("..."));
    assert!(LONG_TEXT.starts_with(&preview[..preview.len() - 3]));
    assert_eq!(widgets.cards.preview(&scene, card), Some(preview));
}

#[test]
fn test_short_card_text_is_not_cut() {
    let data = CardData {
        title: "Short",
        content: "Fits easily",
    };
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let card = widgets
        .cards
        .create(&mut scene, root, &data, CardConfig::default(), &theme)
        .unwrap();
    let (_, _, content, _) = card_nodes(&scene, card);

    assert_eq!(scene.text(content), Some("Fits easily"));
}

#[test]
fn test_card_click_toggles_and_runs_callbacks() {
    let data = CardData {
        title: "Lifecycle",
        content: LONG_TEXT,
    };
    let expands = Rc::new(Cell::new(0));
    let collapses = Rc::new(Cell::new(0));
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::dark();
    let mut widgets = WidgetSet::new();

    let config = {
        let (expands, collapses) = (expands.clone(), collapses.clone());
        CardConfig::default()
            .on_expand(move || expands.set(expands.get() + 1))
            .on_collapse(move || collapses.set(collapses.get() + 1))
    };
    let card = widgets
        .cards
        .create(&mut scene, root, &data, config, &theme)
        .unwrap();
    let (_, _, content, button_label) = card_nodes(&scene, card);
    let button = child(&scene, card, 2);

    scene.click(button);
    widgets.pump(&mut scene);
    assert!(widgets.cards.is_expanded(&scene, card));
    assert_eq!(scene.text(content), Some(LONG_TEXT));
    assert_eq!(scene.text(button_label), Some("Show Less"));
    assert_eq!((expands.get(), collapses.get()), (1, 0));
    assert_eq!(scene.last_scroll_into_view(), None, "expanding does not scroll");

    scene.click(button);
    widgets.pump(&mut scene);
    assert!(!widgets.cards.is_expanded(&scene, card));
    assert_eq!(scene.text(button_label), Some("Show More"));
    assert_eq!(scene.text(content), widgets.cards.preview(&scene, card));
    assert_eq!((expands.get(), collapses.get()), (1, 1));
    assert_eq!(scene.last_scroll_into_view(), Some(card));
}

#[test]
fn test_bounded_expanded_body_scrolls() {
    let data = CardData {
        title: "Bounded",
        content: LONG_TEXT,
    };
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let config = CardConfig::default().with_max_content_height(40);
    let card = widgets
        .cards
        .create(&mut scene, root, &data, config, &theme)
        .unwrap();
    let (_, content_box, _, _) = card_nodes(&scene, card);

    assert!(widgets.cards.set_expanded(&mut scene, card, true));
    let props = scene.node(content_box).unwrap().props();
    assert_eq!(props.height, Dimension::Px(40));
    assert_eq!(props.scroll, ScrollFlags::VERTICAL);

    widgets.cards.toggle(&mut scene, card);
    let props = scene.node(content_box).unwrap().props();
    assert_eq!(props.height, Dimension::Content);
    assert!(props.scroll.is_empty());
    assert_eq!(scene.scroll_offset(content_box), 0);
}

#[test]
fn test_programmatic_expand_skips_callbacks() {
    let data = CardData {
        title: "Quiet",
        content: LONG_TEXT,
    };
    let calls = Rc::new(Cell::new(0));
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let config = {
        let calls = calls.clone();
        CardConfig::default().on_expand(move || calls.set(calls.get() + 1))
    };
    let card = widgets
        .cards
        .create(&mut scene, root, &data, config, &theme)
        .unwrap();

    assert!(widgets.cards.set_expanded(&mut scene, card, true));
    assert!(widgets.cards.is_expanded(&scene, card));
    assert_eq!(calls.get(), 0);

    let stranger = scene.create_node(root, NodeKind::Container).unwrap();
    assert!(!widgets.cards.set_expanded(&mut scene, stranger, true));
    assert!(!widgets.cards.is_expanded(&scene, stranger));
    assert_eq!(widgets.cards.preview(&scene, stranger), None);
}

#[test]
fn test_card_theme_update() {
    let data = CardData {
        title: "Themed",
        content: "Body",
    };
    let mut scene = scene();
    let root = scene.root();
    let light = Theme::light();
    let mut widgets = WidgetSet::new();

    let card = widgets
        .cards
        .create(&mut scene, root, &data, CardConfig::default(), &light)
        .unwrap();
    let (title, _, _, _) = card_nodes(&scene, card);
    assert_eq!(
        scene.node(title).unwrap().props().text_color,
        Some(light.resolve_color(ColorRole::Primary))
    );

    let dark = light.toggled();
    widgets.cards.update_theme(&mut scene, &dark);
    assert_eq!(
        scene.node(title).unwrap().props().text_color,
        Some(dark.resolve_color(ColorRole::Primary))
    );
    assert_eq!(
        scene.node(card).unwrap().props().border_color,
        Some(dark.resolve_color(ColorRole::Secondary))
    );
}

#[test]
fn test_rtl_card_aligns_right() {
    let data = CardData {
        title: "כותרת",
        content: LONG_TEXT,
    };
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let card = widgets
        .cards
        .create(&mut scene, root, &data, CardConfig::rtl(), &theme)
        .unwrap();
    let (title, _, content, button_label) = card_nodes(&scene, card);

    assert_eq!(
        scene.node(title).unwrap().props().text_align,
        tactile_core::ui::TextAlign::Right
    );
    assert_eq!(scene.text(button_label), Some("הרחב"));
    assert_eq!(scene.text(content).unwrap().chars().count(), 80);
}

#[test]
fn test_gallery_navigation_by_clicks() {
    let images = IMAGES;
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let gallery = widgets
        .galleries
        .create(&mut scene, root, &images, GalleryConfig::default(), &theme)
        .unwrap();
    let counter = child(&scene, gallery, 0);
    let image = child(&scene, child(&scene, gallery, 1), 0);
    let buttons = child(&scene, gallery, 2);
    let (prev, next) = (child(&scene, buttons, 0), child(&scene, buttons, 1));

    assert_eq!(widgets.galleries.count(&scene, gallery), 3);
    assert_eq!(scene.text(counter), Some("1 / 3 - Harbor"));
    assert_eq!(scene.node(image).unwrap().props().image, images[0].source);

    scene.click(prev);
    widgets.pump(&mut scene);
    assert_eq!(widgets.galleries.index(&scene, gallery), 2, "prev wraps around");
    assert_eq!(scene.text(counter), Some("3 / 3 - Desert"));
    assert_eq!(scene.node(image).unwrap().props().border_color, Some(WHITE));

    scene.click(next);
    scene.click(next);
    widgets.pump(&mut scene);
    assert_eq!(widgets.galleries.index(&scene, gallery), 1);
    assert_eq!(scene.text(counter), Some("2 / 3 - Forest"));
    assert_eq!(scene.node(image).unwrap().props().image, images[1].source);
}

#[test]
fn test_gallery_set_index() {
    let images = IMAGES;
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let gallery = widgets
        .galleries
        .create(&mut scene, root, &images, GalleryConfig::default(), &theme)
        .unwrap();
    let counter = child(&scene, gallery, 0);

    assert!(widgets.galleries.set_index(&mut scene, gallery, 2));
    assert_eq!(scene.text(counter), Some("3 / 3 - Desert"));

    assert!(!widgets.galleries.set_index(&mut scene, gallery, 3));
    assert!(!widgets.galleries.set_index(&mut scene, gallery, -1));
    assert_eq!(widgets.galleries.index(&scene, gallery), 2);

    widgets.galleries.next(&mut scene, gallery);
    assert_eq!(widgets.galleries.index(&scene, gallery), 0);
    widgets.galleries.prev(&mut scene, gallery);
    assert_eq!(widgets.galleries.index(&scene, gallery), 2);

    let stranger = scene.create_node(root, NodeKind::Container).unwrap();
    assert_eq!(widgets.galleries.index(&scene, stranger), -1);
    assert_eq!(widgets.galleries.count(&scene, stranger), 0);
    assert!(!widgets.galleries.set_index(&mut scene, stranger, 0));
}

#[test]
fn test_gallery_title_and_image_area() {
    let images = IMAGES;
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::dark();
    let mut widgets = WidgetSet::new();

    let config = GalleryConfig::default().with_title("Places");
    let gallery = widgets
        .galleries
        .create(&mut scene, root, &images, config, &theme)
        .unwrap();

    let title = child(&scene, gallery, 0);
    assert_eq!(scene.text(title), Some("Places"));
    assert_eq!(scene.text(child(&scene, gallery, 1)), Some("1 / 3 - Harbor"));

    let area = child(&scene, gallery, 2);
    assert_eq!(scene.node(area).unwrap().props().height, Dimension::Px(65));

    let untitled = widgets
        .galleries
        .create(&mut scene, root, &images, GalleryConfig::default().with_title(""), &theme)
        .unwrap();
    assert_eq!(scene.node(untitled).unwrap().children().len(), 3, "empty title is skipped");
}

#[test]
fn test_rtl_gallery_counter_keeps_long_label() {
    let label = "תמונה של הנמל בשעת זריחה עם סירות דייגים ושחפים מעל המים הרגועים ליד המזח הישן של העיר";
    let images = [
        GalleryImage::new(ImageSource::new(1, 64, 40), label, BLUE),
        GalleryImage::new(ImageSource::new(2, 64, 50), "Forest", SLATE),
    ];
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let gallery = widgets
        .galleries
        .create(&mut scene, root, &images, GalleryConfig::rtl(), &theme)
        .unwrap();
    let counter = child(&scene, gallery, 0);

    assert!(label.len() > 128, "multi-byte label");
    assert_eq!(scene.text(counter), Some(format!("1 / 2 - {label}").as_str()));
}

#[test]
fn test_card_scroll_follows_style() {
    let data = CardData {
        title: "Scroll",
        content: LONG_TEXT,
    };
    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();

    let card = widgets
        .cards
        .create(&mut scene, root, &data, CardConfig::default(), &theme)
        .unwrap();
    assert_eq!(
        scene.node(card).unwrap().props().scroll,
        ScrollFlags::VERTICAL | ScrollFlags::ELASTIC
    );

    let style = WidgetStyle::default()
        .with_elastic_scroll(false)
        .with_momentum_scroll(true);
    let card = widgets
        .cards
        .create(&mut scene, root, &data, CardConfig::default().with_style(style), &theme)
        .unwrap();
    assert_eq!(
        scene.node(card).unwrap().props().scroll,
        ScrollFlags::VERTICAL | ScrollFlags::MOMENTUM
    );
}

#[test]
fn test_gallery_rejects_bad_images() {
    let empty: [GalleryImage<'static>; 0] = [];
    let mut broken = IMAGES;
    broken[2].source = None;
    broken[0].border_color = ALERT;

    let mut scene = scene();
    let root = scene.root();
    let theme = Theme::light();
    let mut widgets = WidgetSet::new();
    let before = scene.node_count();

    assert_eq!(
        widgets
            .galleries
            .create(&mut scene, root, &empty, GalleryConfig::default(), &theme),
        Err(WidgetError::EmptyGallery)
    );

    assert_eq!(
        widgets
            .galleries
            .create(&mut scene, root, &broken, GalleryConfig::default(), &theme),
        Err(WidgetError::MissingImage { index: 2 })
    );

    assert_eq!(scene.node_count(), before, "nothing was built");
    assert!(widgets.galleries.is_empty());
}
