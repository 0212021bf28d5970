use clap::Parser;

use crate::driver::chain::{BlockOrientation, ChainOrientation};
use crate::driver::Brightness;

/// Shows the time as HH:MM:SS on four cascaded MAX7219 8x8 LED modules
#[derive(Debug, Parser)]
#[command(
    version,
    after_help = "Examples:\n  matrix-clock --emulator       Run in the emulator\n  matrix-clock                  Run on Raspberry Pi hardware\n  matrix-clock --brightness 64  Run with lower brightness"
)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// Use the emulator instead of real hardware
    #[clap(long, short)]
    pub emulator: bool,

    /// Display brightness
    #[clap(
        long,
        short,
        default_value_t = Brightness::DEFAULT,
        value_name = "0-255",
        allow_negative_numbers = true
    )]
    pub brightness: Brightness,

    #[command(flatten)]
    pub hardware: HardwareArgs,

    /// Emulator window pixels per LED
    #[clap(long, default_value_t = crate::driver::emulator::DEFAULT_SCALE, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub scale: u32,
}

#[derive(Debug, clap::Args)]
pub struct HardwareArgs {
    /// SPI device the chain is attached to
    #[clap(long, default_value = "/dev/spidev0.0")]
    pub spi_device: std::path::PathBuf,

    /// SPI clock speed
    #[clap(long, default_value_t = 1_000_000)]
    pub spi_speed_hz: u32,

    /// Rotation of each module (-90, 0, 90 or 180)
    #[clap(long, default_value_t = BlockOrientation::Minus90, allow_negative_numbers = true)]
    pub block_orientation: BlockOrientation,

    /// Modules are chained right to left
    #[clap(long)]
    pub reverse_order: bool,
}

impl HardwareArgs {
    pub fn chain_orientation(&self) -> ChainOrientation {
        ChainOrientation::new(self.block_orientation, self.reverse_order)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["matrix-clock"]).unwrap();
        assert!(!cli.emulator);
        assert_eq!(cli.brightness, Brightness::DEFAULT);
        assert_eq!(cli.scale, 15);
        assert_eq!(
            cli.hardware.spi_device,
            std::path::PathBuf::from("/dev/spidev0.0")
        );
        assert_eq!(cli.hardware.chain_orientation(), ChainOrientation::default());
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["matrix-clock", "-e", "-b", "64"]).unwrap();
        assert!(cli.emulator);
        assert_eq!(cli.brightness, Brightness::new(64));
    }

    #[test]
    fn test_brightness_bounds() {
        assert!(Cli::try_parse_from(["matrix-clock", "--brightness", "0"]).is_ok());
        assert!(Cli::try_parse_from(["matrix-clock", "--brightness", "255"]).is_ok());

        for bad in ["256", "-1", "max"] {
            let error = Cli::try_parse_from(["matrix-clock", "--brightness", bad]).unwrap_err();
            assert_eq!(
                error.kind(),
                clap::error::ErrorKind::ValueValidation,
                "{bad}"
            );
        }
    }

    #[test]
    fn test_orientation_args() {
        let cli = Cli::try_parse_from([
            "matrix-clock",
            "--block-orientation",
            "90",
            "--reverse-order",
        ])
        .unwrap();
        assert_eq!(
            cli.hardware.chain_orientation(),
            ChainOrientation::new(BlockOrientation::Plus90, true)
        );

        let cli = Cli::try_parse_from(["matrix-clock", "--block-orientation", "-90"]).unwrap();
        assert_eq!(cli.hardware.block_orientation, BlockOrientation::Minus90);

        assert!(Cli::try_parse_from(["matrix-clock", "--block-orientation", "45"]).is_err());
    }
}
