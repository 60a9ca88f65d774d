/// 32-bit ARGB color, `0xAARRGGBB`.
///
/// Colors are stored non-premultiplied so a text bitmap can be drawn in white
/// and tinted later by multiplying with the final color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(pub u32);

impl Color {
    pub const NONE: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xff00_0000);
    pub const WHITE: Color = Color(0xffff_ffff);
    pub const RED: Color = Color(0xffff_0000);
    pub const GREEN: Color = Color(0xff00_ff00);
    pub const BLUE: Color = Color(0xff00_00ff);
    /// Fill value for freshly allocated text bitmaps.
    ///
    /// The color channels stay white so that partially covered edge pixels
    /// keep a neutral tint when the block is later multiplied by a color.
    pub const TRANSPARENT_WHITE: Color = Color(0x00ff_ffff);

    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::argb(0xff, red, green, blue)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00ff_ffff) | (alpha as u32) << 24)
    }

    /// Component-wise product, each channel scaled into `0..=255`.
    pub fn multiply(self, other: Color) -> Self {
        let mul = |a: u8, b: u8| ((a as u32 * b as u32 + 127) / 255) as u8;
        Self::argb(
            mul(self.alpha(), other.alpha()),
            mul(self.red(), other.red()),
            mul(self.green(), other.green()),
            mul(self.blue(), other.blue()),
        )
    }

    /// Source-over composition of `self` onto `dst`, with `self`'s alpha
    /// further scaled by `coverage`.
    pub fn over(self, dst: Color, coverage: u8) -> Color {
        let sa = self.alpha() as u32 * coverage as u32 / 255;
        if sa == 0 {
            return dst;
        }
        if sa == 255 {
            return self.with_alpha(0xff);
        }

        let da = dst.alpha() as u32;
        // out_a = sa + da * (1 - sa), all in 0..=255 fixed point.
        let dst_weight = da * (255 - sa) / 255;
        let out_a = sa + dst_weight;
        let channel = |s: u8, d: u8| ((s as u32 * sa + d as u32 * dst_weight) / out_a) as u8;

        Color::argb(
            out_a as u8,
            channel(self.red(), dst.red()),
            channel(self.green(), dst.green()),
            channel(self.blue(), dst.blue()),
        )
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip_through_argb() {
        let c = Color::argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.0, 0x1234_5678);
        assert_eq!(c.alpha(), 0x12);
        assert_eq!(c.red(), 0x34);
        assert_eq!(c.green(), 0x56);
        assert_eq!(c.blue(), 0x78);
    }

    #[test]
    fn multiply_by_white_is_identity() {
        let c = Color::argb(0x80, 0x10, 0x20, 0x30);
        assert_eq!(c.multiply(Color::WHITE), c);
        assert_eq!(c.multiply(Color::NONE), Color::NONE);
    }

    #[test]
    fn over_transparent_keeps_source() {
        let src = Color::argb(0x80, 0xff, 0x00, 0x00);
        let out = src.over(Color::TRANSPARENT_WHITE, 255);
        assert_eq!(out.alpha(), 0x80);
        assert_eq!(out.red(), 0xff);
        assert_eq!(out.green(), 0x00);

        assert_eq!(Color::RED.over(Color::BLUE, 255), Color::RED);
        assert_eq!(Color::RED.over(Color::BLUE, 0), Color::BLUE);
    }
}
