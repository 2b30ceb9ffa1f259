//! Styling system for widgets
//!
//! - [`colors`] - Color constants and palette management
//! - [`style`] - Per-widget layout/font configuration and text presets
//! - [`theme`] - The theme value and the [`StyleResolver`] trait widgets use
//!
//! # Examples
//!
//! ```ignore
//! use tactile_core::ui::styling::*;
//!
//! let theme = Theme::dark();
//! let style = WidgetStyle::rtl().with_padding(10);
//! let title_font = theme.resolve_font(&style, None, FontClass::Large);
//! ```

pub mod colors;
pub mod style;
pub mod theme;

pub use colors::{ColorPalette, WHITE};
pub use style::{BaseDir, FontClass, TextAlign, TextSize, WidgetStyle};
pub use theme::{ColorRole, StyleResolver, Theme};
