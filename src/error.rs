//! Fault types raised by the bus, the CPU, the cartridge loader and the console.
//!
//! None of these are recoverable: an emulator either reproduces the hardware
//! exactly for a given byte sequence or it has a bug. Every fault carries the
//! address, opcode or header bytes needed to reproduce it from a trace.

use std::fmt;
use std::io;

/// Direction of a bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// No route claims the address.
    Unmapped { addr: u16, access: Access },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Unmapped { addr, access } => {
                write!(f, "unmapped {} at ${:04X}", access, addr)
            }
        }
    }
}

impl std::error::Error for BusError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The byte at `pc` is not in the opcode table.
    UnknownOpcode { opcode: u8, pc: u16 },
    /// A bus access made by the instruction at `pc` faulted.
    Bus { pc: u16, source: BusError },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::UnknownOpcode { opcode, pc } => {
                write!(f, "unknown opcode ${:02X} at PC ${:04X}", opcode, pc)
            }
            CpuError::Bus { pc, source } => {
                write!(f, "bus fault at PC ${:04X}: {}", pc, source)
            }
        }
    }
}

impl std::error::Error for CpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CpuError::Bus { source, .. } => Some(source),
            CpuError::UnknownOpcode { .. } => None,
        }
    }
}

#[derive(Debug)]
pub enum CartridgeError {
    Io(io::Error),
    /// Fewer than 16 bytes: no complete header.
    TooShort(usize),
    BadMagic([u8; 4]),
    /// The header promises more data than the image holds.
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartridgeError::Io(e) => write!(f, "cannot read ROM image: {}", e),
            CartridgeError::TooShort(len) => {
                write!(f, "image is {} bytes, shorter than the 16-byte iNES header", len)
            }
            CartridgeError::BadMagic(magic) => write!(
                f,
                "invalid iNES magic {:02X} {:02X} {:02X} {:02X}",
                magic[0], magic[1], magic[2], magic[3]
            ),
            CartridgeError::Truncated {
                section,
                needed,
                available,
            } => write!(
                f,
                "{} section needs {} bytes but only {} remain",
                section, needed, available
            ),
        }
    }
}

impl std::error::Error for CartridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartridgeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CartridgeError {
    fn from(e: io::Error) -> Self {
        CartridgeError::Io(e)
    }
}

/// Anything that stops the console.
#[derive(Debug)]
pub enum NesError {
    Cpu(CpuError),
    Cartridge(CartridgeError),
    /// OAM DMA hit an unmapped source address.
    Dma { page: u8, source: BusError },
}

impl fmt::Display for NesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NesError::Cpu(e) => write!(f, "CPU fault: {}", e),
            NesError::Cartridge(e) => write!(f, "cartridge rejected: {}", e),
            NesError::Dma { page, source } => {
                write!(f, "OAM DMA from page ${:02X} failed: {}", page, source)
            }
        }
    }
}

impl std::error::Error for NesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NesError::Cpu(e) => Some(e),
            NesError::Cartridge(e) => Some(e),
            NesError::Dma { source, .. } => Some(source),
        }
    }
}

impl From<CpuError> for NesError {
    fn from(e: CpuError) -> Self {
        NesError::Cpu(e)
    }
}

impl From<CartridgeError> for NesError {
    fn from(e: CartridgeError) -> Self {
        NesError::Cartridge(e)
    }
}
