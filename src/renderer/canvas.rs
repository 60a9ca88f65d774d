use std::sync::Arc;

use crate::{bitmap::Bitmap, color::Color};

/// Maps image pixel space to canvas space.
pub type Transform = euclid::default::Transform2D<f64>;

/// Immutable, cheaply clonable bitmap used as a drawable glyph or sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    bitmap: Arc<Bitmap>,
}

impl Image {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            bitmap: Arc::new(bitmap),
        }
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl From<Bitmap> for Image {
    fn from(bitmap: Bitmap) -> Self {
        Self::new(bitmap)
    }
}

/// Destination for image draws.
///
/// `transform` places the image's pixel rectangle `(0, 0)..(width, height)`
/// on the canvas; `color` multiplies every pixel of the image.
pub trait Canvas {
    fn draw_image(&mut self, image: &Image, transform: &Transform, z: f64, color: Color);
}

/// One recorded [`Canvas::draw_image`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub image: Image,
    pub transform: Transform,
    pub z: f64,
    pub color: Color,
}

/// Canvas that records draw calls instead of executing them.
///
/// Useful to hand glyph draws to another renderer, or to replay them onto a
/// [`crate::renderer::BitmapCanvas`] in z order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Replays the calls onto `canvas`, lowest z first. Calls with equal z
    /// keep their recording order.
    pub fn replay(&self, canvas: &mut dyn Canvas) {
        let mut order: Vec<&DrawCall> = self.calls.iter().collect();
        order.sort_by(|a, b| a.z.total_cmp(&b.z));
        for call in order {
            canvas.draw_image(&call.image, &call.transform, call.z, call.color);
        }
    }
}

impl Canvas for DrawList {
    fn draw_image(&mut self, image: &Image, transform: &Transform, z: f64, color: Color) {
        self.calls.push(DrawCall {
            image: image.clone(),
            transform: *transform,
            z,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_orders_by_z_and_keeps_ties_stable() {
        let a = Image::new(Bitmap::new(1, 1, Color::RED));
        let b = Image::new(Bitmap::new(2, 1, Color::RED));
        let c = Image::new(Bitmap::new(3, 1, Color::RED));
        let identity = Transform::identity();

        let mut list = DrawList::new();
        list.draw_image(&a, &identity, 1.0, Color::WHITE);
        list.draw_image(&b, &identity, 0.0, Color::WHITE);
        list.draw_image(&c, &identity, 1.0, Color::WHITE);
        assert_eq!(list.len(), 3);

        let mut replayed = DrawList::new();
        list.replay(&mut replayed);
        let widths: Vec<usize> = replayed.calls().iter().map(|c| c.image.width()).collect();
        assert_eq!(widths, [2, 1, 3]);
    }
}
