//! NES hardware core: 2A03 CPU, route-table buses, 2C02 register and timing
//! model, iNES cartridges and the console that ties them together.

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod debug_flags;
pub mod disasm;
pub mod error;
pub mod input;
pub mod memory;
pub mod nes;
pub mod ppu;
pub mod trace;

pub use bus::Bus;
pub use cartridge::{Cartridge, Mirroring};
pub use cpu::{Cpu, CpuBus, Interrupt, StatusFlags};
pub use disasm::{disassemble, Disassembly};
pub use error::{Access, BusError, CartridgeError, CpuError, NesError};
pub use input::{Buttons, Controller};
pub use nes::Nes;
pub use ppu::Ppu;
