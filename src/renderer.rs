mod bitmap_canvas;
mod canvas;

pub use bitmap_canvas::BitmapCanvas;
pub use canvas::{Canvas, DrawCall, DrawList, Image, Transform};
