//! Rendering the in-memory scene with embedded-graphics

use core::fmt::Write;

use embedded_graphics::Drawable;
use embedded_graphics::draw_target::{DrawTarget, DrawTargetExt};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Primitive, Size};
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::layout::{char_metrics, wrap_lines};
use super::{SceneNode, Scene};
use crate::host::NodeKind;
use crate::ui::styling::TextAlign;

impl Scene {
    /// Paint every visible node onto `target`, parents before children.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) -> Result<(), D::Error> {
        target.clear(self.palette.background)?;

        let layout = self.layout();
        for &id in layout.paint_order() {
            let (Some(node), Some(rect), Some(clip)) = (self.node(id), layout.rect(id), layout.clip(id))
            else {
                continue;
            };
            if clip.is_zero_sized() {
                continue;
            }

            let mut area = target.clipped(&clip);
            self.draw_node(&mut area, id.index(), node, rect)?;
        }
        Ok(())
    }

    fn draw_node<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        index: usize,
        node: &SceneNode,
        rect: Rectangle,
    ) -> Result<(), D::Error> {
        let props = node.props();
        let border = props.border_color.unwrap_or(self.palette.border);
        let radius = Size::new(props.radius, props.radius);

        match node.kind() {
            NodeKind::Container => {
                if props.border_width > 0 {
                    let style = PrimitiveStyleBuilder::new()
                        .stroke_color(border)
                        .stroke_width(props.border_width)
                        .build();
                    RoundedRectangle::with_equal_corners(rect, radius)
                        .into_styled(style)
                        .draw(target)?;
                }
            }
            NodeKind::Button => {
                let style = PrimitiveStyleBuilder::new()
                    .fill_color(self.palette.surface)
                    .stroke_color(border)
                    .stroke_width(props.border_width.max(1))
                    .build();
                RoundedRectangle::with_equal_corners(rect, radius)
                    .into_styled(style)
                    .draw(target)?;
            }
            NodeKind::Image => {
                let style = PrimitiveStyleBuilder::new()
                    .fill_color(self.palette.surface)
                    .stroke_color(border)
                    .stroke_width(props.border_width.max(2))
                    .build();
                rect.into_styled(style).draw(target)?;

                // Placeholder caption naming the image
                if let Some(image) = props.image {
                    let mut caption: heapless::String<16> = heapless::String::new();
                    write!(caption, "img {}", image.id).ok();
                    let text_style = MonoTextStyle::new(props.font.font(), self.palette.text_secondary);
                    Text::with_text_style(
                        &caption,
                        rect.center(),
                        text_style,
                        TextStyleBuilder::new()
                            .alignment(Alignment::Center)
                            .baseline(Baseline::Middle)
                            .build(),
                    )
                    .draw(target)?;
                }
            }
            NodeKind::Label => self.draw_label(target, node, rect)?,
        }

        log::trace!("Painted node {} at {:?}", index, rect.top_left);
        Ok(())
    }

    fn draw_label<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        node: &SceneNode,
        rect: Rectangle,
    ) -> Result<(), D::Error> {
        let props = node.props();
        let Some(text) = props.text.as_deref() else {
            return Ok(());
        };

        let font = props.font.font();
        let (advance, line_height) = char_metrics(font);
        let inner = Rectangle::new(
            rect.top_left + Point::new(props.padding as i32, props.padding as i32),
            Size::new(
                rect.size.width.saturating_sub(props.padding * 2),
                rect.size.height.saturating_sub(props.padding * 2),
            ),
        );
        let per_line = (inner.size.width / advance.max(1)) as usize;

        let color = props.text_color.unwrap_or(self.palette.text_primary);
        let character_style = MonoTextStyle::new(font, color);
        let (alignment, x) = match props.text_align {
            TextAlign::Left => (Alignment::Left, inner.top_left.x),
            TextAlign::Center => (Alignment::Center, inner.center().x),
            TextAlign::Right => (
                Alignment::Right,
                inner.top_left.x + inner.size.width as i32 - 1,
            ),
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();

        let mut y = inner.top_left.y;
        for line in wrap_lines(text, per_line) {
            Text::with_text_style(line, Point::new(x, y), character_style, text_style)
                .draw(target)?;
            y += line_height as i32;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::pixelcolor::RgbColor;

    use super::*;
    use crate::host::{Property, SceneHost};

    #[test]
    fn test_button_is_painted() {
        let mut scene = Scene::new(Size::new(48, 48));
        let root = scene.root();
        let button = scene.create_node(root, NodeKind::Button).unwrap();
        scene.set_property(button, Property::Padding(4));
        scene.set_property(button, Property::BorderColor(Rgb565::RED));

        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_overdraw(true);
        scene.draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(0, 4)), Some(Rgb565::RED), "left border");
        assert_eq!(
            display.get_pixel(Point::new(4, 4)),
            Some(scene.palette().surface),
            "button fill"
        );
    }

    #[test]
    fn test_scrolled_out_content_is_clipped() {
        let mut scene = Scene::new(Size::new(48, 48));
        let root = scene.root();
        let image = scene.create_node(root, NodeKind::Image).unwrap();
        scene.set_property(image, Property::BorderColor(Rgb565::GREEN));
        scene.set_property(image, Property::Image(crate::host::ImageSource::new(1, 20, 20)));
        scene.scroll_to(root, 30, false);

        let mut display = MockDisplay::<Rgb565>::new();
        display.set_allow_overdraw(true);
        scene.draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(scene.palette().background));
    }
}
