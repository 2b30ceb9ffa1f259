//! Color definitions and palette management
//!
//! Colors are RGB565, the native format of the 16-bit panels the widgets
//! target. To convert from 8-bit RGB: R>>3, G>>2, B>>3.

use embedded_graphics::pixelcolor::Rgb565;

// ============================================================================
// Accent Colors
// ============================================================================

/// Light theme primary accent - blue
pub const BLUE: Rgb565 = Rgb565::new(0x1E >> 3, 0x88 >> 2, 0xE5 >> 3);

/// Light theme secondary accent - dark grey
pub const SLATE: Rgb565 = Rgb565::new(0x61 >> 3, 0x61 >> 2, 0x61 >> 3);

/// Dark theme primary accent - pale sky blue
pub const SKY: Rgb565 = Rgb565::new(0xB3 >> 3, 0xE5 >> 2, 0xFC >> 3);

/// Dark theme secondary accent - pale cyan
pub const ICE: Rgb565 = Rgb565::new(0xB2 >> 3, 0xEB >> 2, 0xF2 >> 3);

/// Error and alert color - muted red
pub const ALERT: Rgb565 = Rgb565::new(190 >> 3, 95 >> 2, 95 >> 3);

// ============================================================================
// Surfaces
// ============================================================================

/// Dark background - very dark gray-blue
pub const NIGHT: Rgb565 = Rgb565::new(18 >> 3, 23 >> 2, 24 >> 3);

/// Dark surface for cards and buttons
pub const NIGHT_SURFACE: Rgb565 = Rgb565::new(26 >> 3, 32 >> 2, 33 >> 3);

/// Light surface for cards and buttons
pub const PAPER_SURFACE: Rgb565 = Rgb565::new(0xEE >> 3, 0xEE >> 2, 0xEE >> 3);

/// Border/stroke color - medium gray
pub const STROKE: Rgb565 = Rgb565::new(43 >> 3, 55 >> 2, 57 >> 3);

// ============================================================================
// Text Colors
// ============================================================================

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Light gray - for secondary text
pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// Dark gray - for subtle text
pub const DARK_GRAY: Rgb565 = Rgb565::new(10, 20, 10);

// ============================================================================
// Color Palette
// ============================================================================

/// A cohesive color palette for consistent widget theming.
///
/// `primary` and `secondary` are the two accent roles widgets ask for through
/// [`StyleResolver`](super::StyleResolver); the rest are used by the scene
/// renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    /// Primary accent color - titles, pull indicator, active elements
    pub primary: Rgb565,

    /// Secondary accent color - borders, "release to refresh" state
    pub secondary: Rgb565,

    /// Main background color
    pub background: Rgb565,

    /// Surface color for cards, buttons, and image frames
    pub surface: Rgb565,

    /// Error and alert color
    pub error: Rgb565,

    /// Primary text color - high contrast
    pub text_primary: Rgb565,

    /// Secondary text color
    pub text_secondary: Rgb565,

    /// Border color for separators and outlines
    pub border: Rgb565,
}

impl Default for ColorPalette {
    /// Returns the light palette
    fn default() -> Self {
        Self::light()
    }
}

impl ColorPalette {
    /// Light text on dark backgrounds, pale accents.
    pub fn dark() -> Self {
        Self {
            primary: SKY,
            secondary: ICE,
            background: NIGHT,
            surface: NIGHT_SURFACE,
            error: ALERT,
            text_primary: WHITE,
            text_secondary: LIGHT_GRAY,
            border: STROKE,
        }
    }

    /// Dark text on light backgrounds, saturated accents.
    pub fn light() -> Self {
        Self {
            primary: BLUE,
            secondary: SLATE,
            background: WHITE,
            surface: PAPER_SURFACE,
            error: ALERT,
            text_primary: NIGHT,
            text_secondary: DARK_GRAY,
            border: STROKE,
        }
    }
}
