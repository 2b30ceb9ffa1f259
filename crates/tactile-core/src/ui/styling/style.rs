//! Per-widget style configuration
//!
//! [`WidgetStyle`] carries the layout and font choices every widget config
//! embeds. Colors come from the active theme through
//! [`StyleResolver`](super::StyleResolver), so one style value works under
//! both palettes.

use embedded_graphics::mono_font::{MonoFont, ascii};
use serde::{Deserialize, Serialize};

use crate::host::ScrollFlags;

/// Text size variants
///
/// Three preset sizes with corresponding embedded-graphics fonts:
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &ascii::FONT_5X8,
            TextSize::Medium => &ascii::FONT_6X10,
            TextSize::Large => &ascii::FONT_10X20,
        }
    }
}

/// Role a piece of text plays, used to pick a font when no override is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontClass {
    /// Buttons and indicators
    Small,
    /// Body text
    Normal,
    /// Titles
    Large,
}

/// Base text direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BaseDir {
    #[default]
    Ltr,
    Rtl,
}

impl BaseDir {
    /// Alignment that reads naturally in this direction.
    pub fn leading_align(self) -> TextAlign {
        match self {
            BaseDir::Ltr => TextAlign::Left,
            BaseDir::Rtl => TextAlign::Right,
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Layout and font configuration shared by every widget config.
///
/// # Examples
///
/// ```ignore
/// let style = WidgetStyle::default()
///     .with_padding(10)
///     .with_title_font(TextSize::Medium);
///
/// // Right-to-left preset
/// let rtl = WidgetStyle::rtl();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetStyle {
    /// Text direction of the widget's labels
    pub base_dir: BaseDir,

    /// Font override for titles (`None` = theme font)
    pub title_font: Option<TextSize>,
    /// Font override for body text (`None` = theme font)
    pub content_font: Option<TextSize>,
    /// Font override for buttons and indicators (`None` = theme font)
    pub button_font: Option<TextSize>,

    /// General padding in pixels
    pub padding: u32,
    /// Gap between stacked children in pixels
    pub margin: u32,
    pub border_radius: u32,
    pub border_width: u32,

    /// Bounce past the content edges on scrollable widgets
    pub elastic_scroll: bool,
    /// Keep scrolling after a flick on scrollable widgets
    pub momentum_scroll: bool,
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self {
            base_dir: BaseDir::Ltr,
            title_font: None,
            content_font: None,
            button_font: None,
            padding: 15,
            margin: 8,
            border_radius: 8,
            border_width: 1,
            elastic_scroll: true,
            momentum_scroll: false,
        }
    }
}

impl WidgetStyle {
    /// Right-to-left preset for Hebrew/Arabic content
    pub fn rtl() -> Self {
        Self {
            base_dir: BaseDir::Rtl,
            ..Self::default()
        }
    }

    pub fn with_base_dir(mut self, base_dir: BaseDir) -> Self {
        self.base_dir = base_dir;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_border(mut self, width: u32, radius: u32) -> Self {
        self.border_width = width;
        self.border_radius = radius;
        self
    }

    pub fn with_title_font(mut self, font: TextSize) -> Self {
        self.title_font = Some(font);
        self
    }

    pub fn with_content_font(mut self, font: TextSize) -> Self {
        self.content_font = Some(font);
        self
    }

    pub fn with_button_font(mut self, font: TextSize) -> Self {
        self.button_font = Some(font);
        self
    }

    pub fn with_elastic_scroll(mut self, enabled: bool) -> Self {
        self.elastic_scroll = enabled;
        self
    }

    pub fn with_momentum_scroll(mut self, enabled: bool) -> Self {
        self.momentum_scroll = enabled;
        self
    }

    /// `axes` plus the elastic and momentum behavior this style asks for
    pub fn scroll_flags(&self, axes: ScrollFlags) -> ScrollFlags {
        let mut flags = axes;
        if self.elastic_scroll {
            flags |= ScrollFlags::ELASTIC;
        }
        if self.momentum_scroll {
            flags |= ScrollFlags::MOMENTUM;
        }
        flags
    }
}
