//! Pixel grids and the two compositing primitives.
//!
//! [`extract`] samples a window out of a larger picture and [`overlay`] paints
//! a sprite over a grid while skipping its transparent key. Both clip
//! silently: coordinates that fall outside either grid are ignored.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
};

/// Read-only pixel source.
///
/// `pixel` is only called with coordinates inside [`Raster::size`].
pub trait Raster {
    fn size(&self) -> Size;
    fn pixel(&self, x: u32, y: u32) -> Rgb565;
}

/// Pixel grid that can be written to.
pub trait RasterMut: Raster {
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb565);
}

/// Row-major `Rgb565` grid with a runtime size and a fixed capacity of `N`
/// pixels.
#[derive(Clone, Debug)]
pub struct Canvas<const N: usize> {
    size: Size,
    pixels: [Rgb565; N],
}

impl<const N: usize> Canvas<N> {
    /// A `width` x `height` canvas filled with `fill`.
    ///
    /// Width is capped at `N` and height at however many rows fit.
    pub fn new(width: u32, height: u32, fill: Rgb565) -> Self {
        let width = width.min(N as u32);
        let height = if width == 0 {
            0
        } else {
            height.min(N as u32 / width)
        };
        Self {
            size: Size::new(width, height),
            pixels: [fill; N],
        }
    }

    /// Pixels in use, row by row.
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels[..self.size.width as usize * self.size.height as usize]
    }

    pub fn fill(&mut self, color: Rgb565) {
        let len = self.pixels().len();
        self.pixels[..len].fill(color);
    }

    const fn index(&self, x: u32, y: u32) -> usize {
        (y * self.size.width + x) as usize
    }
}

impl<const N: usize> Raster for Canvas<N> {
    fn size(&self) -> Size {
        self.size
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb565 {
        self.pixels[self.index(x, y)]
    }
}

impl<const N: usize> RasterMut for Canvas<N> {
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb565) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }
}

/// A canvas that owns its pixels and carries the colour [`overlay`] skips.
#[derive(Clone, Debug)]
pub struct Sprite<const N: usize> {
    pub canvas: Canvas<N>,
    pub key: Rgb565,
}

impl<const N: usize> Sprite<N> {
    /// Fully transparent sprite.
    pub fn blank(width: u32, height: u32, key: Rgb565) -> Self {
        Self {
            canvas: Canvas::new(width, height, key),
            key,
        }
    }

    /// Build a sprite from character art, one string per row.
    ///
    /// `palette` maps each character to a colour; `None` leaves the pixel
    /// transparent. The art is placed at `offset` inside the sprite and
    /// clipped to it.
    pub fn paint_art(&mut self, offset: Point, art: &[&str], palette: impl Fn(char) -> Option<Rgb565>) {
        let size = self.canvas.size();
        for (row, line) in art.iter().enumerate() {
            let y = offset.y + row as i32;
            if y < 0 {
                continue;
            }
            if y >= size.height as i32 {
                break;
            }
            for (col, ch) in line.chars().enumerate() {
                let x = offset.x + col as i32;
                if x < 0 {
                    continue;
                }
                if x >= size.width as i32 {
                    break;
                }
                if let Some(color) = palette(ch) {
                    self.canvas.set_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}

impl<const N: usize> Raster for Sprite<N> {
    fn size(&self) -> Size {
        self.canvas.size()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb565 {
        self.canvas.pixel(x, y)
    }
}

/// Copy the window of `src` starting at `offset` into `dst`.
///
/// `dst` defines the window size. Rows and columns that fall outside `src`
/// leave the corresponding `dst` pixels untouched.
pub fn extract<D, S>(dst: &mut D, src: &S, offset: Point)
where
    D: RasterMut + ?Sized,
    S: Raster + ?Sized,
{
    let window = dst.size();
    let bounds = src.size();
    for y in 0..window.height {
        let sy = y as i32 + offset.y;
        if sy < 0 {
            continue;
        }
        if sy >= bounds.height as i32 {
            break;
        }
        for x in 0..window.width {
            let sx = x as i32 + offset.x;
            if sx < 0 {
                continue;
            }
            if sx >= bounds.width as i32 {
                break;
            }
            dst.set_pixel(x, y, src.pixel(sx as u32, sy as u32));
        }
    }
}

/// Paint `src` onto `dst` with its top-left corner at `offset`.
///
/// Pixels equal to `transparent` are not painted; pixels landing outside
/// `dst` are dropped.
pub fn overlay<D, S>(dst: &mut D, offset: Point, src: &S, transparent: Rgb565)
where
    D: RasterMut + ?Sized,
    S: Raster + ?Sized,
{
    let bounds = dst.size();
    let sprite = src.size();
    for y in 0..sprite.height {
        let dy = y as i32 + offset.y;
        if dy < 0 {
            continue;
        }
        if dy >= bounds.height as i32 {
            break;
        }
        for x in 0..sprite.width {
            let dx = x as i32 + offset.x;
            if dx < 0 {
                continue;
            }
            if dx >= bounds.width as i32 {
                break;
            }
            let p = src.pixel(x, y);
            if p != transparent {
                dst.set_pixel(dx as u32, dy as u32, p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 picture where every pixel encodes its own coordinates.
    fn numbered() -> Canvas<12> {
        let mut c = Canvas::new(4, 3, Rgb565::BLACK);
        for y in 0..3 {
            for x in 0..4 {
                c.set_pixel(x, y, Rgb565::new(x as u8, y as u8, 0));
            }
        }
        c
    }

    #[test]
    fn canvas_is_capped_to_capacity() {
        let c = Canvas::<10>::new(4, 9, Rgb565::BLACK);
        assert_eq!(c.size(), Size::new(4, 2));
        assert_eq!(c.pixels().len(), 8);

        let c = Canvas::<10>::new(30, 2, Rgb565::BLACK);
        assert_eq!(c.size(), Size::new(10, 1));

        let c = Canvas::<10>::new(0, 5, Rgb565::BLACK);
        assert_eq!(c.size(), Size::zero());
        assert!(c.pixels().is_empty());
    }

    #[test]
    fn extract_copies_window() {
        let src = numbered();
        let mut dst = Canvas::<4>::new(2, 2, Rgb565::WHITE);
        extract(&mut dst, &src, Point::new(1, 1));
        assert_eq!(dst.pixel(0, 0), Rgb565::new(1, 1, 0));
        assert_eq!(dst.pixel(1, 0), Rgb565::new(2, 1, 0));
        assert_eq!(dst.pixel(0, 1), Rgb565::new(1, 2, 0));
        assert_eq!(dst.pixel(1, 1), Rgb565::new(2, 2, 0));
    }

    #[test]
    fn extract_clips_at_source_edges() {
        let src = numbered();
        let mut dst = Canvas::<9>::new(3, 3, Rgb565::WHITE);
        extract(&mut dst, &src, Point::new(-1, 2));

        // Only source row 2, columns 0 and 1, are in range.
        assert_eq!(dst.pixel(1, 0), Rgb565::new(0, 2, 0));
        assert_eq!(dst.pixel(2, 0), Rgb565::new(1, 2, 0));
        assert_eq!(dst.pixel(0, 0), Rgb565::WHITE);
        for y in 1..3 {
            for x in 0..3 {
                assert_eq!(dst.pixel(x, y), Rgb565::WHITE);
            }
        }
    }

    #[test]
    fn extract_fully_out_of_range_is_a_no_op() {
        let src = numbered();
        for offset in [
            Point::new(4, 0),
            Point::new(0, 3),
            Point::new(-2, 0),
            Point::new(0, -2),
            Point::new(-100, 100),
        ] {
            let mut dst = Canvas::<4>::new(2, 2, Rgb565::WHITE);
            extract(&mut dst, &src, offset);
            assert!(dst.pixels().iter().all(|&p| p == Rgb565::WHITE), "offset {offset:?}");
        }
    }

    #[test]
    fn overlay_skips_transparent_key() {
        let mut sprite = Sprite::<4>::blank(2, 2, Rgb565::MAGENTA);
        sprite.canvas.set_pixel(0, 0, Rgb565::RED);
        sprite.canvas.set_pixel(1, 1, Rgb565::BLUE);

        let mut dst = Canvas::<9>::new(3, 3, Rgb565::GREEN);
        overlay(&mut dst, Point::new(1, 1), &sprite, sprite.key);

        assert_eq!(dst.pixel(1, 1), Rgb565::RED);
        assert_eq!(dst.pixel(2, 2), Rgb565::BLUE);
        assert_eq!(dst.pixel(2, 1), Rgb565::GREEN);
        assert_eq!(dst.pixel(1, 2), Rgb565::GREEN);
        assert_eq!(dst.pixel(0, 0), Rgb565::GREEN);
    }

    #[test]
    fn overlay_clips_at_destination_edges() {
        let mut sprite = Sprite::<4>::blank(2, 2, Rgb565::MAGENTA);
        sprite.canvas.fill(Rgb565::RED);

        let mut dst = Canvas::<9>::new(3, 3, Rgb565::GREEN);
        overlay(&mut dst, Point::new(2, -1), &sprite, sprite.key);

        assert_eq!(dst.pixel(2, 0), Rgb565::RED);
        let painted = dst.pixels().iter().filter(|&&p| p == Rgb565::RED).count();
        assert_eq!(painted, 1);
    }

    #[test]
    fn overlay_fully_out_of_range_is_a_no_op() {
        let mut sprite = Sprite::<4>::blank(2, 2, Rgb565::MAGENTA);
        sprite.canvas.fill(Rgb565::RED);
        for offset in [Point::new(3, 0), Point::new(0, 3), Point::new(-2, -2), Point::new(50, -50)] {
            let mut dst = Canvas::<9>::new(3, 3, Rgb565::GREEN);
            overlay(&mut dst, offset, &sprite, sprite.key);
            assert!(dst.pixels().iter().all(|&p| p == Rgb565::GREEN), "offset {offset:?}");
        }
    }

    #[test]
    fn paint_art_maps_palette_and_clips() {
        let mut sprite = Sprite::<9>::blank(3, 3, Rgb565::MAGENTA);
        sprite.paint_art(Point::new(1, 0), &["RR.R", ".B"], |c| match c {
            'R' => Some(Rgb565::RED),
            'B' => Some(Rgb565::BLUE),
            _ => None,
        });
        assert_eq!(sprite.pixel(0, 0), Rgb565::MAGENTA);
        assert_eq!(sprite.pixel(1, 0), Rgb565::RED);
        assert_eq!(sprite.pixel(2, 0), Rgb565::RED);
        assert_eq!(sprite.pixel(1, 1), Rgb565::MAGENTA);
        assert_eq!(sprite.pixel(2, 1), Rgb565::BLUE);
    }
}
