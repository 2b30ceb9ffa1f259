//! Headless simulator for the tactile widgets.
//!
//! Scripts touch gestures against an in-memory scene, one demo per widget,
//! and writes a PNG frame after each step so the results can be inspected
//! without hardware.
//!
//! ```text
//! tactile-simulator --out frames --theme dark --rtl
//! ```
//!
//! Set `RUST_LOG=debug` to follow the widgets' state changes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::{info, warn};

use tactile_core::host::ImageSource;
use tactile_core::ui::styling::colors::{ALERT, BLUE, SLATE};
use tactile_core::ui::Theme;
use tactile_core::widgets::pull_refresh::COMPLETE_TIMER_TAG;
use tactile_core::widgets::{
    CardConfig, CardData, GalleryConfig, GalleryImage, PullRefreshConfig, RefreshFlow, WidgetSet,
};
use tactile_core::{NodeId, Scene, SceneHost};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const SCREEN_WIDTH_PX: u32 = 240;
const SCREEN_HEIGHT_PX: u32 = 320;

/// Pixel scale factor for the saved frames
const FRAME_SCALE: u32 = 2;

/// Simulated network delay before a refresh completes
const REFRESH_DELAY_MS: u32 = 300;

const GALLERY_IMAGES: [GalleryImage<'static>; 3] = [
    GalleryImage::new(ImageSource::new(1, 96, 64), "Harbor at dawn", BLUE),
    GalleryImage::new(ImageSource::new(2, 96, 72), "Pine forest", SLATE),
    GalleryImage::new(ImageSource::new(3, 96, 48), "Dunes", ALERT),
];

const CARDS: [CardData<'static>; 2] = [
    CardData {
        title: "Release notes",
        content: "Pull to refresh now honours a cooldown between triggers, cards keep \
                  their preview until deleted, and galleries wrap in both directions.",
    },
    CardData {
        title: "Short note",
        content: "Fits without truncation.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

#[derive(Debug, Parser)]
#[command(version, about = "Render scripted tactile widget demos to PNG frames")]
struct Args {
    /// Directory the frames are written to
    #[arg(short, long, default_value = "frames")]
    out: PathBuf,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeChoice::Light)]
    theme: ThemeChoice,

    /// Use the right-to-left presets
    #[arg(long)]
    rtl: bool,
}

/// Writes numbered frames of a scene into one directory
struct FrameWriter {
    dir: PathBuf,
    next: u32,
}

impl FrameWriter {
    fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            next: 0,
        })
    }

    fn capture(&mut self, scene: &Scene, name: &str) -> Result<()> {
        let mut display = SimulatorDisplay::<Rgb565>::new(scene.viewport());
        scene.draw(&mut display)?;

        let path = self.dir.join(format!("{:02}_{}.png", self.next, name));
        let settings = OutputSettingsBuilder::new().scale(FRAME_SCALE).build();
        display
            .to_rgb_output_image(&settings)
            .save_png(&path)
            .with_context(|| format!("writing {}", path.display()))?;

        info!("Frame {}", path.display());
        self.next += 1;
        Ok(())
    }
}

fn new_scene(theme: &Theme) -> Scene {
    let mut scene = Scene::new(Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX));
    scene.set_palette(theme.palette);
    scene
}

fn pull_refresh_demo(frames: &mut FrameWriter, theme: &Theme) -> Result<()> {
    let mut scene = new_scene(theme);
    let root = scene.root();
    let mut widgets = WidgetSet::new();

    let config = PullRefreshConfig::default().on_refresh(|host, list| {
        info!("Refresh started, completing in {} ms", REFRESH_DELAY_MS);
        match host.schedule_once(REFRESH_DELAY_MS, list, COMPLETE_TIMER_TAG) {
            Ok(_) => RefreshFlow::Pending,
            Err(err) => {
                warn!("Could not schedule completion: {}", err);
                RefreshFlow::Done
            }
        }
    });
    let list = widgets
        .pull_refresh
        .create(&mut scene, root, config, theme)
        .map_err(anyhow::Error::msg)
        .context("creating pull-to-refresh")?;
    frames.capture(&scene, "pull_idle")?;

    for (offset, name) in [(-12, "pull_pulling"), (-32, "pull_ready")] {
        scene.drag_to(list, offset);
        widgets.pump(&mut scene);
        frames.capture(&scene, name)?;
    }

    scene.release(list);
    widgets.pump(&mut scene);
    frames.capture(&scene, "pull_refreshing")?;

    scene.advance(REFRESH_DELAY_MS);
    widgets.pump(&mut scene);
    info!(
        "Refresh finished, state {:?}",
        widgets.pull_refresh.state(&scene, list)
    );
    frames.capture(&scene, "pull_done")
}

fn card_demo(frames: &mut FrameWriter, theme: &Theme, rtl: bool) -> Result<()> {
    let mut scene = new_scene(theme);
    let root = scene.root();
    let mut widgets = WidgetSet::new();

    let mut cards: Vec<NodeId> = Vec::new();
    for data in &CARDS {
        let config = if rtl {
            CardConfig::rtl()
        } else {
            CardConfig::default()
        }
        .on_expand(|| info!("Card expanded"))
        .on_collapse(|| info!("Card collapsed"));
        let card = widgets
            .cards
            .create(&mut scene, root, data, config, theme)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("creating card {:?}", data.title))?;
        cards.push(card);
    }
    frames.capture(&scene, "cards_collapsed")?;

    let Some(&first) = cards.first() else {
        return Ok(());
    };
    let button = scene
        .node(first)
        .and_then(|node| node.children().get(2).copied())
        .context("card has no toggle button")?;

    scene.click(button);
    widgets.pump(&mut scene);
    frames.capture(&scene, "cards_expanded")?;

    scene.click(button);
    widgets.pump(&mut scene);
    frames.capture(&scene, "cards_collapsed_again")?;

    widgets.cards.update_theme(&mut scene, &theme.toggled());
    frames.capture(&scene, "cards_toggled_theme")
}

fn gallery_demo(frames: &mut FrameWriter, theme: &Theme, rtl: bool) -> Result<()> {
    let mut scene = new_scene(theme);
    let root = scene.root();
    let mut widgets = WidgetSet::new();

    let config = if rtl {
        GalleryConfig::rtl()
    } else {
        GalleryConfig::default()
    }
    .with_title("Gallery");
    let gallery = widgets
        .galleries
        .create(&mut scene, root, &GALLERY_IMAGES, config, theme)
        .map_err(anyhow::Error::msg)
        .context("creating gallery")?;
    frames.capture(&scene, "gallery_first")?;

    let next = scene
        .node(gallery)
        .and_then(|node| node.children().last().copied())
        .and_then(|buttons| scene.node(buttons))
        .and_then(|buttons| buttons.children().get(1).copied())
        .context("gallery has no next button")?;

    for _ in 0..GALLERY_IMAGES.len() {
        scene.click(next);
        widgets.pump(&mut scene);
        let name = format!("gallery_{}", widgets.galleries.index(&scene, gallery) + 1);
        frames.capture(&scene, &name)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let theme = match args.theme {
        ThemeChoice::Light => Theme::light(),
        ThemeChoice::Dark => Theme::dark(),
    };
    info!(
        "Rendering demos into {} (theme: {:?}, rtl: {})",
        args.out.display(),
        args.theme,
        args.rtl
    );

    let mut frames = FrameWriter::new(&args.out)?;
    pull_refresh_demo(&mut frames, &theme)?;
    card_demo(&mut frames, &theme, args.rtl)?;
    gallery_demo(&mut frames, &theme, args.rtl)?;

    info!("Wrote {} frames", frames.next);
    Ok(())
}
