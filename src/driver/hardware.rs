use embedded_hal::blocking::spi::Write;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use max7219::connectors::SpiConnector;
use max7219::MAX7219;

use super::chain::{ChainOrientation, MODULES};
use super::{Brightness, MatrixDisplay};
use crate::error::Error;
use crate::frame::Frame;

/// A chain of MAX7219 driven 8x8 modules on an SPI bus.
pub struct Max7219Display<SPI>
where
    SPI: Write<u8>,
{
    matrix: MAX7219<SpiConnector<SPI>>,
    orientation: ChainOrientation,
    intensity: Option<u8>,
    powered: bool,
}

impl<SPI> Max7219Display<SPI>
where
    SPI: Write<u8>,
{
    pub fn new(spi: SPI, orientation: ChainOrientation) -> Result<Self, Error> {
        let mut matrix = MAX7219::from_spi(MODULES, spi).map_err(Error::Max7219)?;
        matrix.power_on().map_err(Error::Max7219)?;
        for addr in 0..MODULES {
            matrix.clear_display(addr).map_err(Error::Max7219)?;
        }

        Ok(Self {
            matrix,
            orientation,
            intensity: None,
            powered: true,
        })
    }

    fn set_intensity(&mut self, intensity: u8) -> Result<(), Error> {
        if self.intensity == Some(intensity) {
            return Ok(());
        }

        tracing::debug!(intensity, "Setting intensity");
        for addr in 0..MODULES {
            self.matrix
                .set_intensity(addr, intensity)
                .map_err(Error::Max7219)?;
        }
        self.intensity = Some(intensity);
        Ok(())
    }
}

/// Opens the SPI device and initializes the chain on it.
pub fn open(
    path: &std::path::Path,
    speed_hz: u32,
    orientation: ChainOrientation,
) -> Result<Max7219Display<linux_embedded_hal::Spidev>, Error> {
    let mut spi =
        linux_embedded_hal::Spidev::open(path).map_err(|source| Error::OpeningSpi {
            path: path.to_path_buf(),
            source,
        })?;

    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(speed_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.0
        .configure(&options)
        .map_err(|source| Error::ConfiguringSpi {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), speed_hz, ?orientation, "Opened SPI device");
    Max7219Display::new(spi, orientation)
}

impl<SPI> MatrixDisplay for Max7219Display<SPI>
where
    SPI: Write<u8>,
{
    fn render(&mut self, frame: &Frame, brightness: Brightness) -> Result<(), Error> {
        self.set_intensity(brightness.intensity())?;

        let buffers = self.orientation.pack(frame);
        for (addr, rows) in buffers.iter().enumerate() {
            self.matrix.write_raw(addr, rows).map_err(Error::Max7219)?;
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), Error> {
        if !self.powered {
            return Ok(());
        }

        for addr in 0..MODULES {
            self.matrix.clear_display(addr).map_err(Error::Max7219)?;
        }
        self.matrix.power_off().map_err(Error::Max7219)?;
        self.powered = false;
        tracing::debug!("Display powered off");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;

    const INTENSITY_REGISTER: u8 = 0x0A;
    const SHUTDOWN_REGISTER: u8 = 0x0C;

    #[derive(Clone, Default)]
    struct RecordingSpi {
        writes: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl Write<u8> for RecordingSpi {
        type Error = core::convert::Infallible;

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            self.writes.borrow_mut().push(words.to_vec());
            Ok(())
        }
    }

    impl RecordingSpi {
        /// Last value written to each register, per position in the shifted out frame.
        fn registers(&self) -> HashMap<(usize, u8), u8> {
            let mut registers = HashMap::new();
            for write in self.writes.borrow().iter() {
                for (position, pair) in write.chunks_exact(2).enumerate() {
                    if pair[0] != 0 {
                        registers.insert((position, pair[0]), pair[1]);
                    }
                }
            }
            registers
        }

        fn count_register_writes(&self, register: u8) -> usize {
            self.writes
                .borrow()
                .iter()
                .flat_map(|write| write.chunks_exact(2).map(|pair| pair[0]).collect::<Vec<_>>())
                .filter(|header| *header == register)
                .count()
        }
    }

    #[test]
    fn test_render_writes_every_row() {
        let spi = RecordingSpi::default();
        let mut display = Max7219Display::new(spi.clone(), ChainOrientation::default()).unwrap();

        let frame = crate::display::compose("12:34:56").unwrap();
        display.render(&frame, Brightness::DEFAULT).unwrap();

        let registers = spi.registers();
        let mut written = (0..MODULES)
            .map(|position| {
                let mut rows = [0u8; 8];
                for (r, row) in rows.iter_mut().enumerate() {
                    *row = registers
                        .get(&(position, r as u8 + 1))
                        .copied()
                        .unwrap_or_default();
                }
                rows
            })
            .collect::<Vec<_>>();
        let mut expected = ChainOrientation::default().pack(&frame).to_vec();
        written.sort();
        expected.sort();
        assert_eq!(written, expected);

        for position in 0..MODULES {
            assert_eq!(
                registers.get(&(position, INTENSITY_REGISTER)),
                Some(&Brightness::DEFAULT.intensity())
            );
        }
    }

    #[test]
    fn test_intensity_only_sent_on_change() {
        let spi = RecordingSpi::default();
        let mut display = Max7219Display::new(spi.clone(), ChainOrientation::default()).unwrap();
        let frame = crate::display::compose("00:00:00").unwrap();

        display.render(&frame, Brightness::new(200)).unwrap();
        let after_first = spi.count_register_writes(INTENSITY_REGISTER);
        assert!(after_first > 0);

        display.render(&frame, Brightness::new(200)).unwrap();
        assert_eq!(spi.count_register_writes(INTENSITY_REGISTER), after_first);

        display.render(&frame, Brightness::new(10)).unwrap();
        assert!(spi.count_register_writes(INTENSITY_REGISTER) > after_first);
    }

    #[test]
    fn test_shutdown_powers_off_once() {
        let spi = RecordingSpi::default();
        let mut display = Max7219Display::new(spi.clone(), ChainOrientation::default()).unwrap();
        display.shutdown().unwrap();

        for position in 0..MODULES {
            assert_eq!(spi.registers().get(&(position, SHUTDOWN_REGISTER)), Some(&0));
        }

        let writes = spi.writes.borrow().len();
        display.shutdown().unwrap();
        assert_eq!(spi.writes.borrow().len(), writes);
    }
}
