//! How the 8x8 modules of the chain are mounted.

use crate::frame::Frame;
use crate::frame::WIDTH;

pub const MODULE_SIZE: usize = 8;

/// Number of cascaded modules needed to cover the frame.
pub const MODULES: usize = WIDTH / MODULE_SIZE;

/// Eight row registers of a single module, column 0 of a row in bit 7.
pub type ModuleRows = [u8; MODULE_SIZE];

/// Rotation of each module relative to the frame.
///
/// The angles follow the usual convention for MAX7219 modules: the common
/// FC-16 boards, whose digit registers drive rows, are mounted at -90.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockOrientation {
    Deg0,
    Plus90,
    #[default]
    Minus90,
    Deg180,
}

impl BlockOrientation {
    /// Frame pixel, relative to the module, driving bit `7 - bit` of register `row`.
    fn source(self, row: usize, bit: usize) -> (usize, usize) {
        let last = MODULE_SIZE - 1;
        match self {
            BlockOrientation::Minus90 => (bit, row),
            BlockOrientation::Deg0 => (row, last - bit),
            BlockOrientation::Plus90 => (last - bit, last - row),
            BlockOrientation::Deg180 => (last - row, bit),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Block orientation must be one of -90, 0, 90, 180 (got '{0}')")]
pub struct OrientationError(String);

impl std::str::FromStr for BlockOrientation {
    type Err = OrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Deg0),
            "90" | "+90" => Ok(Self::Plus90),
            "-90" => Ok(Self::Minus90),
            "180" | "-180" => Ok(Self::Deg180),
            other => Err(OrientationError(other.to_string())),
        }
    }
}

impl std::fmt::Display for BlockOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let angle = match self {
            BlockOrientation::Deg0 => "0",
            BlockOrientation::Plus90 => "90",
            BlockOrientation::Minus90 => "-90",
            BlockOrientation::Deg180 => "180",
        };
        f.write_str(angle)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainOrientation {
    pub block: BlockOrientation,

    /// The module at chain address 0 is the rightmost one.
    pub reverse_order: bool,
}

impl ChainOrientation {
    pub fn new(block: BlockOrientation, reverse_order: bool) -> Self {
        Self {
            block,
            reverse_order,
        }
    }

    /// Splits the frame into register contents, indexed by chain address.
    pub fn pack(&self, frame: &Frame) -> [ModuleRows; MODULES] {
        let mut device_buffers = [[0u8; MODULE_SIZE]; MODULES];

        for block in 0..MODULES {
            let addr = if self.reverse_order {
                MODULES - 1 - block
            } else {
                block
            };

            for r in 0..MODULE_SIZE {
                device_buffers[addr][r] = match self.block {
                    BlockOrientation::Minus90 => {
                        let shift = WIDTH - MODULE_SIZE * (block + 1);
                        ((frame.rows()[r] >> shift) & 0xFF) as u8
                    }
                    orientation => (0..MODULE_SIZE).fold(0u8, |byte, bit| {
                        let (x, y) = orientation.source(r, bit);
                        if frame.get(block * MODULE_SIZE + x, y) {
                            byte | (0x80 >> bit)
                        } else {
                            byte
                        }
                    }),
                };
            }
        }

        device_buffers
    }
}
