use image::{Rgba, RgbaImage};
use kumihan::{
    Bitmap, Color, FontFlags, TextSystem,
    renderer::BitmapCanvas,
    text::{Alignment, TextBlockConfig},
};

const TEXT: &str = "Kumihan lays out <b>wrapped</b> text blocks on the CPU.\n\
                    Words are packed greedily into lines, and lines can be \
                    <c=c04000>aligned</c> left, right, centered or <i>justified</i>.\n\
                    \n\
                    Inline entities &star; sit between words, and CJK text \
                    like 日本語の文章 breaks between any two glyphs.";

fn to_image(bitmap: &Bitmap) -> RgbaImage {
    RgbaImage::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
        let c = bitmap
            .get(x as usize, y as usize)
            .unwrap_or(Color::TRANSPARENT_WHITE);
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}

fn star(size: usize) -> Bitmap {
    let mut bitmap = Bitmap::new(size, size, Color::TRANSPARENT_WHITE);
    let mid = size / 2;
    for i in 0..size {
        bitmap.set(mid, i, Color::rgb(0xff, 0xc0, 0x00));
        bitmap.set(i, mid, Color::rgb(0xff, 0xc0, 0x00));
        bitmap.set(i, i, Color::rgb(0xff, 0xc0, 0x00));
        bitmap.set(size - 1 - i, i, Color::rgb(0xff, 0xc0, 0x00));
    }
    bitmap
}

#[allow(clippy::unwrap_used)]
fn main() {
    let system = TextSystem::with_system_fonts();
    system.register_entity("star", star(20));

    std::fs::create_dir_all("debug").expect("failed to create debug directory");

    for alignment in [
        Alignment::Left,
        Alignment::Right,
        Alignment::Center,
        Alignment::Justify,
    ] {
        let config = TextBlockConfig {
            font_height: 24,
            line_spacing: 4,
            width: 480,
            alignment,
            ..Default::default()
        };

        let timer = std::time::Instant::now();
        let bitmap = system.create_text(TEXT, &config).unwrap();
        let elapsed = timer.elapsed();

        println!(
            "{alignment:?}: {}x{} (elapsed: {elapsed:.2?})",
            bitmap.width(),
            bitmap.height()
        );

        let path = format!("debug/paragraph_{alignment:?}.png").to_lowercase();
        to_image(&bitmap)
            .save(&path)
            .expect("failed to save debug image");
        println!("Saved {path}");
    }

    // Glyph-cached font drawn rotated onto a canvas.
    let font = system.font(32, "sans-serif", FontFlags::BOLD).unwrap();
    let mut canvas = BitmapCanvas::new(400, 400);
    for step in 0..8 {
        let angle = step as f64 * 45.0;
        font.draw_rot(
            &mut canvas,
            "  kumihan",
            200.0,
            200.0,
            0.0,
            angle,
            1.0,
            1.0,
            Color::rgb(0x20, 0x60, 0xc0),
        );
    }
    println!("Glyph cache holds {} glyphs", font.glyph_cache().len());

    to_image(canvas.bitmap())
        .save("debug/rotated_font.png")
        .expect("failed to save debug image");
    println!("Saved debug/rotated_font.png");
}
