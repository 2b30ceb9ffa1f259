//! Theme: the explicit style set handed to every widget
//!
//! A [`Theme`] value is owned by the application and passed by reference to
//! each widget's `create`. Widgets resolve the colors and fonts they need
//! once, at construction, through the [`StyleResolver`] trait; switching
//! themes later is an explicit call (see
//! [`CardWidgets::update_theme`](crate::widgets::expandable_card::CardWidgets::update_theme)).

use embedded_graphics::pixelcolor::Rgb565;

use super::colors::ColorPalette;
use super::style::{FontClass, TextSize, WidgetStyle};

/// Accent color role a widget asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Primary,
    Secondary,
}

/// Resolves theme-dependent colors and fonts for widgets
pub trait StyleResolver {
    fn resolve_color(&self, role: ColorRole) -> Rgb565;

    /// Pick a font: an explicit `override_font` wins, then the style's font
    /// for `class`, then the theme default.
    fn resolve_font(
        &self,
        style: &WidgetStyle,
        override_font: Option<TextSize>,
        class: FontClass,
    ) -> TextSize;
}

/// Application theme
///
/// # Examples
///
/// ```ignore
/// let theme = Theme::light();
/// let primary = theme.resolve_color(ColorRole::Primary);
///
/// // Flip at runtime
/// let theme = theme.toggled();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// The active color palette (dark or light)
    pub palette: ColorPalette,

    /// Font used when neither the caller nor the style picks one
    pub default_font: TextSize,

    dark: bool,
}

impl Default for Theme {
    /// Returns the light theme
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            palette: ColorPalette::dark(),
            default_font: TextSize::Medium,
            dark: true,
        }
    }

    pub fn light() -> Self {
        Self {
            palette: ColorPalette::light(),
            default_font: TextSize::Medium,
            dark: false,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// The opposite variant, keeping the default font
    pub fn toggled(&self) -> Self {
        let mut next = if self.dark { Self::light() } else { Self::dark() };
        next.default_font = self.default_font;
        next
    }
}

impl StyleResolver for Theme {
    fn resolve_color(&self, role: ColorRole) -> Rgb565 {
        match role {
            ColorRole::Primary => self.palette.primary,
            ColorRole::Secondary => self.palette.secondary,
        }
    }

    fn resolve_font(
        &self,
        style: &WidgetStyle,
        override_font: Option<TextSize>,
        class: FontClass,
    ) -> TextSize {
        if let Some(font) = override_font {
            return font;
        }

        let configured = match class {
            FontClass::Small => style.button_font,
            FontClass::Normal => style.content_font,
            FontClass::Large => style.title_font,
        };
        configured.unwrap_or(self.default_font)
    }
}
