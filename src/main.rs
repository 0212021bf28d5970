use tokio::signal::unix::SignalKind;
use tokio_util::sync::CancellationToken;

use crate::driver::MatrixDisplay;

mod cli;
mod clock;
mod clock_task;
mod display;
mod driver;
mod error;
mod font;
mod frame;
mod logging;
mod systemd;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::eyre::Result<()> {
    setup_panic();
    color_eyre::install().map_err(crate::error::Error::InstallingColorEyre)?;
    let cli = <crate::cli::Cli as clap::Parser>::parse();
    crate::logging::setup(cli.verbosity.clone());

    // every character a reading can produce needs a glyph before anything is drawn
    crate::font::ensure_supported(crate::font::CLOCK_ALPHABET)
        .map_err(crate::error::Error::UnsupportedGlyph)?;

    let process_state = crate::systemd::ProcessState::new();
    match run(&cli, &process_state).await {
        Ok(()) => {
            process_state.set_finished();
            tracing::info!("Clock stopped");
            Ok(())
        }
        Err(error) => {
            process_state.set_failed();
            Err(error.into())
        }
    }
}

fn setup_panic() {
    human_panic::setup_panic!(human_panic::Metadata::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
}

async fn run(
    cli: &crate::cli::Cli,
    process_state: &crate::systemd::ProcessState,
) -> Result<(), crate::error::Error> {
    let display: Box<dyn MatrixDisplay> = if cli.emulator {
        tracing::info!("Running in emulator mode");
        Box::new(crate::driver::emulator::Emulator::new(cli.scale))
    } else {
        let display = crate::driver::hardware::open(
            &cli.hardware.spi_device,
            cli.hardware.spi_speed_hz,
            cli.hardware.chain_orientation(),
        )?;
        tracing::info!("Running on hardware (MAX7219)");
        Box::new(display)
    };

    let cancellation_token = CancellationToken::new();
    let mut terminate =
        tokio::signal::unix::signal(SignalKind::terminate()).map_err(crate::error::Error::Signal)?;
    tokio::task::spawn({
        let cancellation_token = cancellation_token.clone();
        async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => tracing::info!("Ctrl-C received, shutting down"),
                    Err(error) => tracing::error!(?error, "Failed to listen for Ctrl-C, shutting down"),
                },
                _ = terminate.recv() => tracing::info!("SIGTERM received, shutting down"),
            }
            cancellation_token.cancel();
        }
    });

    tracing::info!(brightness = %cli.brightness, "Starting clock display, press Ctrl-C to exit");
    crate::clock_task::ClockTask::new(display, cli.brightness, cancellation_token)
        .on_first_frame({
            let process_state = process_state.clone();
            move || process_state.set_running()
        })
        .run()
        .await
}
