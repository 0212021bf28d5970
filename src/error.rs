#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Setting up error reporting failed")]
    InstallingColorEyre(#[source] color_eyre::Report),

    #[error("Unsupported glyph")]
    UnsupportedGlyph(#[from] crate::font::UnsupportedCharacter),

    #[error("Not a HH:MM:SS time: '{0}'")]
    MalformedTime(String),

    #[error("Failed to open SPI device '{}', is SPI enabled and accessible?", .path.display())]
    OpeningSpi {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to configure SPI device '{}'", .path.display())]
    ConfiguringSpi {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("MAX7219 communication failed: {0:?}")]
    Max7219(max7219::DataError),

    #[error("Failed to draw emulator output")]
    Terminal(#[source] std::io::Error),

    #[error("Failed to install signal handler")]
    Signal(#[source] std::io::Error),
}
