use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::{DrawTarget, Point, RgbColor, Size};
use embedded_graphics::Pixel;
use embedded_graphics_simulator::SimulatorDisplay;

use super::{Brightness, MatrixDisplay};
use crate::error::Error;
use crate::frame::{Frame, HEIGHT, WIDTH};

pub const TITLE: &str = "LED Matrix Emulator - NTP Clock";

pub const DEFAULT_SCALE: u32 = 15;

/// Gap between two LED dots, in window pixels.
pub const LED_SPACING: u32 = 2;

const LED_OFF: Rgb888 = Rgb888::new(0x2a, 0x2a, 0x2a);

/// Dimmest red used for a lit LED, so that brightness 0 still differs from an unlit one.
const LED_MIN_RED: u32 = 0x40;

/// Emulates the LED matrix as a grid of dots.
///
/// With the `window` feature the dots are shown in an SDL window, otherwise
/// they are printed to stdout.
pub struct Emulator {
    surface: SimulatorDisplay<Rgb888>,
    scale: u32,
    output: Output,
    closed: bool,
}

#[cfg(feature = "window")]
struct Output {
    window: embedded_graphics_simulator::Window,
}

#[cfg(not(feature = "window"))]
struct Output {
    drawn: bool,
}

impl Emulator {
    pub fn new(scale: u32) -> Self {
        let scale = scale.max(1);

        #[cfg(feature = "window")]
        let output = {
            let output_settings = embedded_graphics_simulator::OutputSettingsBuilder::new()
                .scale(scale)
                .pixel_spacing(LED_SPACING)
                .build();
            Output {
                window: embedded_graphics_simulator::Window::new(TITLE, &output_settings),
            }
        };

        #[cfg(not(feature = "window"))]
        let output = Output { drawn: false };

        let emulator = Self {
            surface: SimulatorDisplay::new(Size::new(WIDTH as u32, HEIGHT as u32)),
            scale,
            output,
            closed: false,
        };
        let size = emulator.surface_size();
        tracing::info!(
            title = TITLE,
            width = size.width,
            height = size.height,
            "Created emulator surface"
        );
        emulator
    }

    /// Pixel size of the emulated matrix once scaled up for display.
    pub fn surface_size(&self) -> Size {
        let leds = Size::new(WIDTH as u32, HEIGHT as u32);
        Size::new(
            leds.width * self.scale + (leds.width - 1) * LED_SPACING,
            leds.height * self.scale + (leds.height - 1) * LED_SPACING,
        )
    }

    fn led_on(brightness: Brightness) -> Rgb888 {
        let red = LED_MIN_RED + u32::from(brightness.value()) * (0xff - LED_MIN_RED) / 0xff;
        Rgb888::new(red as u8, 0, 0)
    }

    /// Colour of the dot at LED `(x, y)` after the last render.
    pub fn led(&self, x: usize, y: usize) -> Rgb888 {
        self.surface.get_pixel(Point::new(x as i32, y as i32))
    }

    fn paint(&mut self, frame: &Frame, brightness: Brightness) {
        let on = Self::led_on(brightness);
        let pixels = (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .map(|(x, y)| {
                let color = if frame.get(x, y) { on } else { LED_OFF };
                Pixel(Point::new(x as i32, y as i32), color)
            });

        self.surface
            .draw_iter(pixels)
            .unwrap_or_else(|never| match never {});
    }

    #[cfg(feature = "window")]
    fn present(&mut self) -> Result<(), Error> {
        use embedded_graphics_simulator::SimulatorEvent;

        self.output.window.update(&self.surface);
        if self
            .output
            .window
            .events()
            .any(|event| matches!(event, SimulatorEvent::Quit))
        {
            tracing::info!("Emulator window closed");
            self.closed = true;
        }
        Ok(())
    }

    #[cfg(not(feature = "window"))]
    fn present(&mut self) -> Result<(), Error> {
        use std::io::Write;

        let mut text = String::with_capacity((WIDTH + 1) * HEIGHT + 8);
        if self.output.drawn {
            // back to the top left of the previous drawing
            text.push_str(&format!("\x1B[{HEIGHT}A\r"));
        }
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                text.push(if self.led(x, y) == LED_OFF { '·' } else { '●' });
            }
            text.push('\n');
        }

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(Error::Terminal)?;
        self.output.drawn = true;
        Ok(())
    }
}

impl MatrixDisplay for Emulator {
    fn render(&mut self, frame: &Frame, brightness: Brightness) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }

        self.paint(frame, brightness);
        self.present()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn shutdown(&mut self) -> Result<(), Error> {
        self.surface
            .clear(Rgb888::BLACK)
            .unwrap_or_else(|never| match never {});
        self.closed = true;
        Ok(())
    }
}

#[cfg(all(test, not(feature = "window")))]
mod tests {
    use super::*;

    #[test]
    fn test_render_at_default_brightness() {
        let mut emulator = Emulator::new(DEFAULT_SCALE);
        let frame = crate::display::compose("12:34:56").unwrap();

        emulator.render(&frame, Brightness::DEFAULT).unwrap();
        assert!(!emulator.is_closed());
        assert_eq!(emulator.surface_size(), Size::new(542, 134));

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let lit = emulator.led(x, y) != LED_OFF;
                assert_eq!(lit, frame.get(x, y), "LED ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_brightness_sets_red_level() {
        assert_eq!(Emulator::led_on(Brightness::new(0)), Rgb888::new(0x40, 0, 0));
        assert_eq!(Emulator::led_on(Brightness::new(255)), Rgb888::new(0xff, 0, 0));
        assert!(Emulator::led_on(Brightness::DEFAULT).r() > 0x40);
    }

    #[test]
    fn test_surface_scales() {
        let emulator = Emulator::new(1);
        assert_eq!(emulator.surface_size(), Size::new(32 + 31 * 2, 8 + 7 * 2));
    }

    #[test]
    fn test_render_after_shutdown_is_ignored() {
        let mut emulator = Emulator::new(DEFAULT_SCALE);
        emulator.shutdown().unwrap();
        assert!(emulator.is_closed());

        let frame = crate::display::compose("00:00:00").unwrap();
        emulator.render(&frame, Brightness::DEFAULT).unwrap();
        assert_eq!(emulator.led(2, 0), Rgb888::BLACK);
    }
}
