pub mod render;

pub use render::{SkiaSurface, render_word_pixmap};
