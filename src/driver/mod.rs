pub mod chain;
pub mod emulator;
pub mod hardware;

use crate::frame::Frame;

/// Something a frame can be shown on.
pub trait MatrixDisplay {
    /// Pushes `frame` to the output. Called once per second for as long as the clock runs.
    fn render(&mut self, frame: &Frame, brightness: Brightness) -> Result<(), crate::error::Error>;

    /// Whether the operator closed the output, which ends the clock like an interrupt does.
    fn is_closed(&self) -> bool {
        false
    }

    /// Blanks the output and releases the device.
    fn shutdown(&mut self) -> Result<(), crate::error::Error>;
}

impl<D: MatrixDisplay + ?Sized> MatrixDisplay for Box<D> {
    fn render(&mut self, frame: &Frame, brightness: Brightness) -> Result<(), crate::error::Error> {
        (**self).render(frame, brightness)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn shutdown(&mut self) -> Result<(), crate::error::Error> {
        (**self).shutdown()
    }
}

/// Display brightness, 0 (dimmest) to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Brightness(u8);

impl Brightness {
    pub const DEFAULT: Self = Self(128);

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// The 4 bit intensity register value of a MAX7219.
    pub const fn intensity(self) -> u8 {
        self.0 >> 4
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Brightness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BrightnessError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Brightness {0} is out of range 0-255")]
    OutOfRange(i64),
}

impl std::str::FromStr for Brightness {
    type Err = BrightnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| BrightnessError::NotANumber(s.to_string()))?;

        u8::try_from(value)
            .map(Self)
            .map_err(|_| BrightnessError::OutOfRange(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brightness() {
        assert_eq!("0".parse(), Ok(Brightness::new(0)));
        assert_eq!("128".parse(), Ok(Brightness::DEFAULT));
        assert_eq!("255".parse(), Ok(Brightness::new(255)));
    }

    #[test]
    fn test_reject_out_of_range() {
        assert_eq!(
            "256".parse::<Brightness>(),
            Err(BrightnessError::OutOfRange(256))
        );
        assert_eq!(
            "-1".parse::<Brightness>(),
            Err(BrightnessError::OutOfRange(-1))
        );
        assert!(matches!(
            "bright".parse::<Brightness>(),
            Err(BrightnessError::NotANumber(_))
        ));
    }

    #[test]
    fn test_intensity() {
        assert_eq!(Brightness::new(0).intensity(), 0);
        assert_eq!(Brightness::DEFAULT.intensity(), 8);
        assert_eq!(Brightness::new(255).intensity(), 15);
    }
}
