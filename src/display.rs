use embedded_graphics::prelude::Point;
use embedded_graphics::Drawable;

use crate::font::COLON;
use crate::font::FONT;
use crate::frame::Frame;

/// Shape of every string the composer accepts.
pub const TIME_TEMPLATE: &[u8; 8] = b"00:00:00";

/// Columns left empty before the first glyph, which centers `HH:MM:SS` on 32 columns.
pub const LEFT_PADDING: usize = 2;

/// Empty columns after each glyph.
pub const SPACING: usize = 1;

const fn layout() -> [usize; TIME_TEMPLATE.len()] {
    let mut offsets = [0; TIME_TEMPLATE.len()];
    let mut cursor = LEFT_PADDING;
    let mut i = 0;
    while i < TIME_TEMPLATE.len() {
        offsets[i] = cursor;
        let width = if TIME_TEMPLATE[i] == b':' {
            FONT[COLON].width()
        } else {
            FONT[0].width()
        };
        cursor += width + SPACING;
        i += 1;
    }
    offsets
}

/// Column of the left edge of each glyph in `HH:MM:SS`.
pub const LAYOUT: [usize; TIME_TEMPLATE.len()] = layout();

fn matches_template(time: &str) -> bool {
    time.len() == TIME_TEMPLATE.len()
        && time
            .bytes()
            .zip(TIME_TEMPLATE.iter())
            .all(|(b, t)| match t {
                b':' => b == b':',
                _ => b.is_ascii_digit(),
            })
}

/// Lays out a `HH:MM:SS` string on a blank frame.
pub fn compose(time: &str) -> Result<Frame, crate::error::Error> {
    // unsupported characters are reported as such, before the shape check
    crate::font::ensure_supported(time)?;

    if !matches_template(time) {
        return Err(crate::error::Error::MalformedTime(time.to_string()));
    }

    let mut frame = Frame::new();
    for (chr, &x) in time.chars().zip(LAYOUT.iter()) {
        crate::font::glyph(chr)?
            .at(Point::new(x as i32, 0))
            .draw(&mut frame)
            .unwrap_or_else(|never| match never {});
    }

    Ok(frame)
}
