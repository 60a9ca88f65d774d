use crate::color::Color;

/// Row-major ARGB pixel buffer with the origin at the top-left.
///
/// Text blocks are built into a `Bitmap` that starts fully transparent and is
/// resized while lines are appended, so resizing always keeps the pixels that
/// overlap the old and new extents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new(0, 0, Color::TRANSPARENT_WHITE)
    }
}

impl Bitmap {
    /// Creates a bitmap where every pixel is `fill`.
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width.saturating_mul(height)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)` or `None` when outside the bitmap.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Overwrites a pixel. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Composites `color` over the pixel at `(x, y)` with the given coverage.
    ///
    /// Signed coordinates let callers draw glyphs that start left of or above
    /// the bitmap; the invisible part is clipped.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        self.pixels[idx] = color.over(self.pixels[idx], coverage);
    }

    /// Changes the size, keeping overlapping content and filling new pixels.
    pub fn resize(&mut self, width: usize, height: usize, fill: Color) {
        if width == self.width && height == self.height {
            return;
        }

        let mut pixels = vec![fill; width.saturating_mul(height)];
        let copy_width = width.min(self.width);
        for row in 0..height.min(self.height) {
            let src = row * self.width;
            let dst = row * width;
            pixels[dst..dst + copy_width].copy_from_slice(&self.pixels[src..src + copy_width]);
        }

        self.width = width;
        self.height = height;
        self.pixels = pixels;
    }

    /// Copies `source` into this bitmap with its top-left corner at `(x, y)`,
    /// replacing the covered pixels. Parts outside the bitmap are clipped.
    pub fn insert(&mut self, source: &Bitmap, x: i32, y: i32) {
        self.for_each_overlap(source, x, y, |dst, src| *dst = src);
    }

    /// Like [`Bitmap::insert`] but composites with source-over blending.
    pub fn composite(&mut self, source: &Bitmap, x: i32, y: i32) {
        self.for_each_overlap(source, x, y, |dst, src| *dst = src.over(*dst, 255));
    }

    /// Scales every pixel's alpha by `alpha / 255`.
    pub fn multiply_alpha(&mut self, alpha: u8) {
        if alpha == 0xff {
            return;
        }
        for pixel in &mut self.pixels {
            let scaled = (pixel.alpha() as u32 * alpha as u32 + 127) / 255;
            *pixel = pixel.with_alpha(scaled as u8);
        }
    }

    /// Whether every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.pixels.iter().all(|p| p.alpha() == 0)
    }

    fn for_each_overlap(
        &mut self,
        source: &Bitmap,
        x: i32,
        y: i32,
        mut f: impl FnMut(&mut Color, Color),
    ) {
        for row in 0..source.height {
            let dy = y as i64 + row as i64;
            if dy < 0 || dy >= self.height as i64 {
                continue;
            }
            for col in 0..source.width {
                let dx = x as i64 + col as i64;
                if dx < 0 || dx >= self.width as i64 {
                    continue;
                }
                let src = source.pixels[row * source.width + col];
                let idx = dy as usize * self.width + dx as usize;
                f(&mut self.pixels[idx], src);
            }
        }
    }
}
