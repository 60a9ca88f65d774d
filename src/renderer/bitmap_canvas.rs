use euclid::default::{Box2D, Point2D};

use crate::{
    bitmap::Bitmap,
    color::Color,
    renderer::canvas::{Canvas, Image, Transform},
};

/// CPU canvas that composites images into a [`Bitmap`] as they are drawn.
///
/// Draws execute immediately in call order, so `z` is ignored here; record
/// into a [`crate::renderer::DrawList`] and replay it to honor z. Images are
/// sampled with nearest-neighbour filtering at destination pixel centers,
/// which handles scaling and rotation alike.
pub struct BitmapCanvas {
    bitmap: Bitmap,
}

impl BitmapCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            bitmap: Bitmap::new(width, height, Color::TRANSPARENT_WHITE),
        }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }
}

impl Canvas for BitmapCanvas {
    fn draw_image(&mut self, image: &Image, transform: &Transform, _z: f64, color: Color) {
        let source = image.bitmap();
        if source.width() == 0 || source.height() == 0 {
            return;
        }
        // A degenerate transform (zero scale) covers no pixels.
        let Some(inverse) = transform.inverse() else {
            return;
        };

        let bounds = transform.outer_transformed_box(&Box2D::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(source.width() as f64, source.height() as f64),
        ));

        let min_x = bounds.min.x.floor().max(0.0) as usize;
        let min_y = bounds.min.y.floor().max(0.0) as usize;
        let max_x = (bounds.max.x.ceil().max(0.0) as usize).min(self.bitmap.width());
        let max_y = (bounds.max.y.ceil().max(0.0) as usize).min(self.bitmap.height());

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Point2D::new(x as f64 + 0.5, y as f64 + 0.5);
                let src = inverse.transform_point(center);
                if src.x < 0.0 || src.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (src.x as usize, src.y as usize);
                let Some(pixel) = source.get(sx, sy) else {
                    continue;
                };
                if pixel.alpha() == 0 {
                    continue;
                }
                self.bitmap
                    .blend(x as i32, y as i32, pixel.multiply(color), 255);
            }
        }
    }
}
