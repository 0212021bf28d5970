use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, Point};
use embedded_graphics::{Drawable, Pixel};

/// Height in pixels of every glyph.
pub const GLYPH_HEIGHT: usize = 7;

/// A fixed bitmap for one character. Each row is `width` bits wide, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    width: usize,
    rows: [u8; GLYPH_HEIGHT],
}

impl Glyph {
    const fn digit(rows: [u8; GLYPH_HEIGHT]) -> Self {
        Self { width: 3, rows }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < GLYPH_HEIGHT && self.rows[y] & (1 << (self.width - 1 - x)) != 0
    }

    /// Lit pixels of the glyph, relative to its top left corner.
    pub fn lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GLYPH_HEIGHT)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_set(x, y))
    }

    pub fn at(&self, origin: Point) -> PlacedGlyph<'_> {
        PlacedGlyph {
            glyph: self,
            origin,
        }
    }
}

/// A glyph anchored at a position on a draw target.
pub struct PlacedGlyph<'g> {
    glyph: &'g Glyph,
    origin: Point,
}

impl Drawable for PlacedGlyph<'_> {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        target.draw_iter(self.glyph.lit().map(|(x, y)| {
            Pixel(
                self.origin + Point::new(x as i32, y as i32),
                BinaryColor::On,
            )
        }))
    }
}

/// Digits 0-9 followed by the colon separator.
pub const FONT: [Glyph; 11] = [
    Glyph::digit([0b111, 0b101, 0b101, 0b101, 0b101, 0b101, 0b111]),
    Glyph::digit([0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
    Glyph::digit([0b111, 0b001, 0b001, 0b111, 0b100, 0b100, 0b111]),
    Glyph::digit([0b111, 0b001, 0b001, 0b111, 0b001, 0b001, 0b111]),
    Glyph::digit([0b101, 0b101, 0b101, 0b111, 0b001, 0b001, 0b001]),
    Glyph::digit([0b111, 0b100, 0b100, 0b111, 0b001, 0b001, 0b111]),
    Glyph::digit([0b111, 0b100, 0b100, 0b111, 0b101, 0b101, 0b111]),
    Glyph::digit([0b111, 0b001, 0b001, 0b001, 0b001, 0b001, 0b001]),
    Glyph::digit([0b111, 0b101, 0b101, 0b111, 0b101, 0b101, 0b111]),
    Glyph::digit([0b111, 0b101, 0b101, 0b111, 0b001, 0b001, 0b111]),
    Glyph {
        width: 1,
        rows: [0, 0, 1, 0, 1, 0, 0],
    },
];

/// Index of the colon separator in [`FONT`].
pub const COLON: usize = 10;

/// Every character a clock reading can contain.
pub const CLOCK_ALPHABET: &str = "0123456789:";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("No glyph for character {0:?}")]
pub struct UnsupportedCharacter(pub char);

pub fn glyph(chr: char) -> Result<&'static Glyph, UnsupportedCharacter> {
    match chr {
        '0'..='9' => Ok(&FONT[chr as usize - '0' as usize]),
        ':' => Ok(&FONT[COLON]),
        other => Err(UnsupportedCharacter(other)),
    }
}

/// Checks that every character of `text` has a glyph.
pub fn ensure_supported(text: &str) -> Result<(), UnsupportedCharacter> {
    text.chars().try_for_each(|chr| glyph(chr).map(drop))
}
