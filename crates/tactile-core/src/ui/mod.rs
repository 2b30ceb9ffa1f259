//! Theming and style resolution for the widgets

pub mod styling;

pub use styling::{
    BaseDir, ColorPalette, ColorRole, FontClass, StyleResolver, TextAlign, TextSize,
    Theme, WidgetStyle,
};
