use tokio_util::sync::CancellationToken;

use crate::clock::ClockReading;
use crate::driver::{Brightness, MatrixDisplay};
use crate::error::Error;

/// Keeps the display in sync with the wall clock, one frame per second.
pub struct ClockTask<D>
where
    D: MatrixDisplay,
{
    display: D,
    brightness: Brightness,
    cancellation_token: CancellationToken,
    on_first_frame: Option<Box<dyn FnOnce()>>,
}

impl<D> ClockTask<D>
where
    D: MatrixDisplay,
{
    pub fn new(display: D, brightness: Brightness, cancellation_token: CancellationToken) -> Self {
        Self {
            display,
            brightness,
            cancellation_token,
            on_first_frame: None,
        }
    }

    /// Called once the first frame is on the display.
    pub fn on_first_frame(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_first_frame = Some(Box::new(f));
        self
    }

    /// Runs until cancelled or until the display is closed, then shuts the display down.
    pub async fn run(mut self) -> Result<(), Error> {
        let result = self.run_loop().await;

        match self.display.shutdown() {
            Ok(()) => result,
            Err(error) if result.is_err() => {
                tracing::warn!(?error, "Failed to shut down display");
                result
            }
            Err(error) => Err(error),
        }
    }

    async fn run_loop(&mut self) -> Result<(), Error> {
        let mut last_rendered = None;

        loop {
            if self.display.is_closed() {
                tracing::info!("Display closed, stopping clock");
                break;
            }

            let reading = ClockReading::now();
            // a wakeup may land in a second that is already on the display
            if last_rendered != Some(reading) {
                self.render(reading)?;
                last_rendered = Some(reading);
            }

            let wait = crate::clock::until_next_second(&chrono::Local::now());
            let Some(()) = self
                .cancellation_token
                .run_until_cancelled(tokio::time::sleep(wait))
                .await
            else {
                tracing::info!("Ending clock");
                break;
            };
        }

        Ok(())
    }

    fn render(&mut self, reading: ClockReading) -> Result<(), Error> {
        let time_str = reading.format();
        let frame = crate::display::compose(&time_str)?;
        self.display.render(&frame, self.brightness)?;
        tracing::trace!(time = %time_str, "Rendered clock");

        if let Some(f) = self.on_first_frame.take() {
            f();
        }
        Ok(())
    }
}
