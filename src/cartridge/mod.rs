//! iNES cartridge images.
//!
//! Layout: 16-byte header, optional 512-byte trainer, PRG ROM (16 KiB units),
//! CHR ROM (8 KiB units; zero units means the board carries 8 KiB CHR RAM).
//! Only the fixed NROM mapping is modelled: PRG sits at $8000-$FFFF with a
//! 16 KiB image mirrored into both halves, CHR fills PPU $0000-$1FFF.

use std::fs;
use std::path::Path;

use crate::error::CartridgeError;

pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
pub const PRG_BANK_SIZE: usize = 0x4000;
pub const CHR_BANK_SIZE: usize = 0x2000;
pub const PRG_RAM_SIZE: usize = 0x2000;

const MAGIC: [u8; 4] = *b"NES\x1a";

const FLAG_VERTICAL: u8 = 0x01;
const FLAG_BATTERY: u8 = 0x02;
const FLAG_TRAINER: u8 = 0x04;
const FLAG_FOUR_SCREEN: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

impl Mirroring {
    /// Fold a nametable address ($2000-$3EFF) into an offset into VRAM.
    /// Two physical tables for horizontal/vertical boards, four when the
    /// cartridge supplies the extra 2 KiB.
    pub fn nametable_offset(self, addr: u16) -> usize {
        let addr = addr & 0x0FFF;
        let table = addr / 0x400;
        let offset = (addr % 0x400) as usize;
        let physical = match self {
            // $2000=$2400, $2800=$2C00
            Mirroring::Horizontal => table / 2,
            // $2000=$2800, $2400=$2C00
            Mirroring::Vertical => table % 2,
            Mirroring::FourScreen => table,
        } as usize;
        physical * 0x400 + offset
    }
}

pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    mirroring: Mirroring,
    battery: bool,
    mapper: u8,
}

impl Cartridge {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_SIZE {
            return Err(CartridgeError::TooShort(data.len()));
        }
        let magic = [data[0], data[1], data[2], data[3]];
        if magic != MAGIC {
            return Err(CartridgeError::BadMagic(magic));
        }

        let prg_rom_size = data[4] as usize * PRG_BANK_SIZE;
        let chr_rom_size = data[5] as usize * CHR_BANK_SIZE;
        let flags6 = data[6];
        let flags7 = data[7];

        let mirroring = if flags6 & FLAG_FOUR_SCREEN != 0 {
            Mirroring::FourScreen
        } else if flags6 & FLAG_VERTICAL != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let mapper = (flags7 & 0xF0) | (flags6 >> 4);
        if mapper != 0 {
            log::warn!("mapper {} is not emulated; mapping the image as NROM", mapper);
        }

        let mut cursor = HEADER_SIZE;
        if flags6 & FLAG_TRAINER != 0 {
            cursor = take(data, cursor, TRAINER_SIZE, "trainer")?.1;
        }
        let (prg_rom, cursor) = take(data, cursor, prg_rom_size, "PRG ROM")?;
        let (chr_rom, _) = take(data, cursor, chr_rom_size, "CHR ROM")?;

        let chr_is_ram = chr_rom_size == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_BANK_SIZE]
        } else {
            chr_rom.to_vec()
        };

        log::info!(
            "cartridge: mapper {}, PRG {} KiB, CHR {} KiB{}, {:?} mirroring",
            mapper,
            prg_rom.len() / 1024,
            chr.len() / 1024,
            if chr_is_ram { " (RAM)" } else { "" },
            mirroring
        );

        Ok(Cartridge {
            prg_rom: prg_rom.to_vec(),
            chr,
            chr_is_ram,
            prg_ram: vec![0; PRG_RAM_SIZE],
            mirroring,
            battery: flags6 & FLAG_BATTERY != 0,
            mapper,
        })
    }

    /// CPU read at $8000-$FFFF.
    pub fn read_prg(&self, addr: u16) -> u8 {
        if self.prg_rom.is_empty() {
            return 0;
        }
        let rom_addr = (addr.wrapping_sub(0x8000)) as usize;
        if self.prg_rom.len() == PRG_BANK_SIZE {
            // 16KB PRG: mirror at $C000
            self.prg_rom[rom_addr & 0x3FFF]
        } else {
            self.prg_rom[rom_addr % self.prg_rom.len()]
        }
    }

    /// CPU access at $6000-$7FFF.
    pub fn read_prg_ram(&self, addr: u16) -> u8 {
        self.prg_ram[(addr as usize) & (PRG_RAM_SIZE - 1)]
    }

    pub fn write_prg_ram(&mut self, addr: u16, data: u8) {
        self.prg_ram[(addr as usize) & (PRG_RAM_SIZE - 1)] = data;
    }

    /// PPU read at $0000-$1FFF.
    pub fn read_chr(&self, addr: u16) -> u8 {
        if self.chr.is_empty() {
            return 0;
        }
        self.chr[addr as usize % self.chr.len()]
    }

    /// Pattern-table write. Lands only on CHR RAM boards.
    pub fn write_chr(&mut self, addr: u16, data: u8) {
        if self.chr_is_ram {
            let len = self.chr.len();
            self.chr[addr as usize % len] = data;
        }
    }

    pub fn prg(&self) -> &[u8] {
        &self.prg_rom
    }

    pub fn chr(&self) -> &[u8] {
        &self.chr
    }

    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    pub fn has_battery(&self) -> bool {
        self.battery
    }

    pub fn mapper(&self) -> u8 {
        self.mapper
    }
}

fn take<'a>(
    data: &'a [u8],
    start: usize,
    len: usize,
    section: &'static str,
) -> Result<(&'a [u8], usize), CartridgeError> {
    let available = data.len().saturating_sub(start);
    if available < len {
        return Err(CartridgeError::Truncated {
            section,
            needed: len,
            available,
        });
    }
    Ok((&data[start..start + len], start + len))
}
