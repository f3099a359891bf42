use std::collections::HashMap;

use ab_glyph::{Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont, point};
use bytemuck::{cast_slice, cast_slice_mut};
use log::debug;
use tiny_skia::{Color, Paint, Pixmap, PremultipliedColorU8, Rect, Transform};

use readex_core::{ConfigError, Pos, Surface, TextMeasure};
use readex_cache::intern;

/// Lays `text` out as positioned glyphs with kerning applied, baseline at
/// the font ascent. Returns the glyphs and the total advance width, which is
/// the same number the measurement service reports, so layout and
/// rasterization can never disagree.
fn layout_glyphs<F: Font>(font: &F, scale: PxScale, text: &str) -> (Vec<Glyph>, f32) {
    let sf = font.as_scaled(scale);
    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::with_capacity(text.len());
    let mut last: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            pen_x += sf.kern(prev, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
        last = Some(id);
    }
    (glyphs, pen_x)
}

/// Rasterizes one word into a transparent premultiplied pixmap sized to its
/// advance width and the font's ascent-to-descent extent.
pub fn render_word_pixmap<F: Font>(font: &F, scale: PxScale, text: &str, color: Color) -> Pixmap {
    let sf = font.as_scaled(scale);
    let (glyphs, advance) = layout_glyphs(font, scale, text);
    let width = advance.ceil().max(1.0) as u32;
    let height = (sf.ascent() - sf.descent()).ceil().max(1.0) as u32;

    let mut pixmap = Pixmap::new(width, height).expect("word pixmap");
    let stride = width as usize;
    let pixels = pixmap.pixels_mut();

    for glyph in glyphs {
        if let Some(outline) = font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            outline.draw(|x, y, coverage| {
                if coverage <= f32::EPSILON {
                    return;
                }
                let ix = (bounds.min.x + x as f32).floor() as i32;
                let iy = (bounds.min.y + y as f32).floor() as i32;
                if ix < 0 || iy < 0 || ix >= width as i32 || iy >= height as i32 {
                    return;
                }
                let idx = iy as usize * stride + ix as usize;

                let alpha = (coverage * color.alpha()).clamp(0.0, 1.0);
                let sa = (alpha * 255.0) as u8;
                let sr = (color.red() * alpha * 255.0) as u8;
                let sg = (color.green() * alpha * 255.0) as u8;
                let sb = (color.blue() * alpha * 255.0) as u8;

                // source-over in premultiplied space, clamped so the
                // result stays a valid premultiplied color
                let bg = pixels[idx];
                let inv = 1.0 - alpha;
                let a8 = sa.saturating_add((bg.alpha() as f32 * inv) as u8);
                let r8 = sr
                    .saturating_add((bg.red() as f32 * inv) as u8)
                    .min(a8);
                let g8 = sg
                    .saturating_add((bg.green() as f32 * inv) as u8)
                    .min(a8);
                let b8 = sb
                    .saturating_add((bg.blue() as f32 * inv) as u8)
                    .min(a8);
                pixels[idx] = PremultipliedColorU8::from_rgba(r8, g8, b8, a8).unwrap();
            });
        }
    }

    pixmap
}

/// Intersection of a `src_w x src_h` blit placed at (`x`, `y`) with a
/// `dst_w x dst_h` canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlitSpan {
    dst_x: usize,
    dst_y: usize,
    src_x: usize,
    src_y: usize,
    w: usize,
    h: usize,
}

fn clip_blit(
    dst_w: usize,
    dst_h: usize,
    src_w: usize,
    src_h: usize,
    x: i32,
    y: i32,
) -> Option<BlitSpan> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(src_w as i32).min(dst_w as i32);
    let y1 = y.saturating_add(src_h as i32).min(dst_h as i32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(BlitSpan {
        dst_x: x0 as usize,
        dst_y: y0 as usize,
        src_x: (x0 - x) as usize,
        src_y: (y0 - y) as usize,
        w: (x1 - x0) as usize,
        h: (y1 - y0) as usize,
    })
}

/// Composites `src` over `dst` at (`x`, `y`). Both pixmaps are
/// premultiplied RGBA; fully opaque and fully transparent pixels take the
/// cheap path.
fn blit_premultiplied(dst: &mut Pixmap, src: &Pixmap, x: i32, y: i32) {
    let Some(span) = clip_blit(
        dst.width() as usize,
        dst.height() as usize,
        src.width() as usize,
        src.height() as usize,
        x,
        y,
    ) else {
        return;
    };

    let dst_w = dst.width() as usize;
    let src_w = src.width() as usize;
    let src_px: &[u32] = cast_slice(src.data());
    let dst_px: &mut [u32] = cast_slice_mut(dst.data_mut());

    for row in 0..span.h {
        let s0 = (span.src_y + row) * src_w + span.src_x;
        let d0 = (span.dst_y + row) * dst_w + span.dst_x;
        for i in 0..span.w {
            let s = src_px[s0 + i];
            let sa = (s >> 24) & 0xFF;
            if sa == 0 {
                continue;
            }
            if sa == 255 {
                dst_px[d0 + i] = s;
                continue;
            }
            let d = dst_px[d0 + i];
            let inv = 255 - sa;
            let sr = s & 0xFF;
            let sg = (s >> 8) & 0xFF;
            let sb = (s >> 16) & 0xFF;
            let dr = d & 0xFF;
            let dg = (d >> 8) & 0xFF;
            let db = (d >> 16) & 0xFF;
            let da = (d >> 24) & 0xFF;
            let r = sr + (dr * inv + 127) / 255;
            let g = sg + (dg * inv + 127) / 255;
            let b = sb + (db * inv + 127) / 255;
            let a = sa + (da * inv + 127) / 255;
            dst_px[d0 + i] = (a << 24) | (b << 16) | (g << 8) | r;
        }
    }
}

/// Software drawing surface and text-measurement service for one trial
/// family: a premultiplied RGBA canvas with the stimulus area on top and a
/// status band underneath. Rasterized words are cached by intern id, so a
/// word repeated across steps or trials is drawn from cache.
pub struct SkiaSurface {
    font: FontVec,
    scale: PxScale,
    stim_width: u32,
    stim_height: u32,
    status_height: u32,
    canvas: Pixmap,
    cache: HashMap<usize, Pixmap>,
    background: Color,
    foreground: Color,
}

impl SkiaSurface {
    pub fn new(
        width: u32,
        height: u32,
        font_data: Vec<u8>,
        font_px: f32,
    ) -> Result<Self, ConfigError> {
        let font = FontVec::try_from_vec(font_data)
            .map_err(|e| ConfigError::UnmeasurableFont(e.to_string()))?;
        let status_height = (font_px * 2.0).ceil() as u32;
        let canvas = Pixmap::new(width, height + status_height)
            .ok_or(ConfigError::InvalidGeometry { width, height })?;

        let mut surface = Self {
            font,
            scale: PxScale::from(font_px),
            stim_width: width,
            stim_height: height,
            status_height,
            canvas,
            cache: HashMap::new(),
            background: Color::WHITE,
            foreground: Color::BLACK,
        };
        if surface.line_height() <= 0.0 {
            return Err(ConfigError::UnmeasurableFont(
                "font reports a zero line height".to_owned(),
            ));
        }
        surface.canvas.fill(surface.background);
        Ok(surface)
    }

    /// Full canvas width, including nothing beyond the stimulus area.
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Full canvas height: stimulus area plus the status band.
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// The canvas as premultiplied RGBA bytes, ready to hand to a frame
    /// buffer of the same dimensions.
    pub fn frame(&self) -> &[u8] {
        self.canvas.data()
    }

    /// Rasterize a word list up front so the first reveal of each word does
    /// not pay the rasterization cost mid-trial.
    pub fn preload<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            self.cached(word);
        }
        debug!("word cache holds {} entries", self.cache.len());
    }

    fn cached(&mut self, text: &str) -> usize {
        let id = intern(text);
        if !self.cache.contains_key(&id) {
            let pixmap = render_word_pixmap(&self.font, self.scale, text, self.foreground);
            self.cache.insert(id, pixmap);
        }
        id
    }

    fn fill_rect(&mut self, rect: Option<Rect>, color: Color) {
        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.set_color(color);
        if let Some(rect) = rect {
            self.canvas
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

impl TextMeasure for SkiaSurface {
    fn measure(&self, text: &str) -> f32 {
        layout_glyphs(&self.font, self.scale, text).1
    }

    fn line_height(&self) -> f32 {
        let sf = self.font.as_scaled(self.scale);
        sf.height() + sf.line_gap()
    }
}

impl Surface for SkiaSurface {
    fn clear(&mut self) {
        self.fill_rect(
            Rect::from_xywh(0.0, 0.0, self.stim_width as f32, self.stim_height as f32),
            self.background,
        );
    }

    fn draw_text(&mut self, text: &str, pos: Pos) {
        let ascent = self.font.as_scaled(self.scale).ascent();
        let id = self.cached(text);
        let pixmap = &self.cache[&id];
        let x = pos.x.round() as i32;
        let y = (pos.y - ascent).round() as i32;
        blit_premultiplied(&mut self.canvas, pixmap, x, y);
    }

    fn draw_placeholder(&mut self, width: f32, pos: Pos) {
        self.fill_rect(
            Rect::from_xywh(pos.x, pos.y + 3.0, width.max(1.0), 2.0),
            self.foreground,
        );
    }

    fn set_status(&mut self, text: &str) {
        self.fill_rect(
            Rect::from_xywh(
                0.0,
                self.stim_height as f32,
                self.stim_width as f32,
                self.status_height as f32,
            ),
            self.background,
        );
        if text.is_empty() {
            return;
        }
        let id = self.cached(text);
        let pixmap = &self.cache[&id];
        let x = (self.stim_width as i32 - pixmap.width() as i32) / 2;
        let y = self.stim_height as i32 + (self.status_height as i32 - pixmap.height() as i32) / 2;
        blit_premultiplied(&mut self.canvas, pixmap, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_keeps_an_interior_blit_whole() {
        let span = clip_blit(100, 100, 10, 5, 20, 30).unwrap();
        assert_eq!(
            span,
            BlitSpan {
                dst_x: 20,
                dst_y: 30,
                src_x: 0,
                src_y: 0,
                w: 10,
                h: 5
            }
        );
    }

    #[test]
    fn clip_trims_negative_origins() {
        let span = clip_blit(100, 100, 10, 10, -4, -7).unwrap();
        assert_eq!(span.dst_x, 0);
        assert_eq!(span.dst_y, 0);
        assert_eq!(span.src_x, 4);
        assert_eq!(span.src_y, 7);
        assert_eq!(span.w, 6);
        assert_eq!(span.h, 3);
    }

    #[test]
    fn clip_trims_the_far_edges() {
        let span = clip_blit(100, 100, 10, 10, 95, 98).unwrap();
        assert_eq!(span.w, 5);
        assert_eq!(span.h, 2);
    }

    #[test]
    fn clip_rejects_fully_offscreen_blits() {
        assert_eq!(clip_blit(100, 100, 10, 10, 100, 0), None);
        assert_eq!(clip_blit(100, 100, 10, 10, 0, -10), None);
        assert_eq!(clip_blit(100, 100, 10, 10, -20, 50), None);
    }
}
