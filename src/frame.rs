use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use embedded_graphics::Pixel;

pub const WIDTH: usize = 32;
pub const HEIGHT: usize = 8;

/// Full display state for one refresh.
///
/// Each row is a `u32` with column 0 in the most significant bit, which is the
/// order the modules of the chain expect their row bytes in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    rows: [u32; HEIGHT],
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn mask(x: usize) -> u32 {
        1 << (WIDTH - 1 - x)
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }

        if on {
            self.rows[y] |= Self::mask(x);
        } else {
            self.rows[y] &= !Self::mask(x);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.rows[y] & Self::mask(x) != 0
    }

    pub fn rows(&self) -> &[u32; HEIGHT] {
        &self.rows
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }

    /// Coordinates of all lit pixels, row by row.
    pub fn lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }

            self.set(point.x as usize, point.y as usize, color.is_on());
        }
        Ok(())
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
