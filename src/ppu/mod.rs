//! 2C02 register interface and dot/scanline timing.
//!
//! The PPU advances one dot per `tick`. A frame is 262 scanlines of 341
//! dots: 0-239 visible, 240 post-render, 241-260 vertical blank, 261
//! pre-render. Pixel output is not produced; the scroll registers still
//! follow the rendering-time increments so $2007 and split-scroll tricks
//! observe the same `v` as on hardware.

pub mod memory;
pub mod registers;


use crate::bus::Bus;
use crate::debug_flags;
use crate::error::BusError;

pub use registers::{PpuControl, PpuMask, PpuRegisters, PpuStatus};
pub use registers::{OAMADDR, OAMDATA, PPUADDR, PPUCTRL, PPUDATA, PPUMASK, PPUSCROLL, PPUSTATUS};

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;
pub const OAM_SIZE: usize = 256;

pub struct Ppu {
    regs: PpuRegisters,
    oam: [u8; OAM_SIZE],
    // One-read latency for $2007 outside palette space
    read_buffer: u8,
    // Last value driven onto the CPU-facing data lines
    io_latch: u8,

    dot: u16,
    scanline: u16,
    frame: u64,
    nmi_pending: bool,

    bus: Bus,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Ppu {
            regs: PpuRegisters::new(),
            oam: [0; OAM_SIZE],
            read_buffer: 0,
            io_latch: 0,
            dot: 0,
            scanline: 0,
            frame: 0,
            nmi_pending: false,
            bus: Bus::new("ppu"),
        }
    }

    /// Cold start. The routes on the PPU bus are kept.
    pub fn power_up(&mut self) {
        self.regs = PpuRegisters::new();
        self.oam = [0; OAM_SIZE];
        self.read_buffer = 0;
        self.io_latch = 0;
        self.dot = 0;
        self.scanline = 0;
        self.frame = 0;
        self.nmi_pending = false;
    }

    /// Reset line: control, mask, scroll latch and read buffer clear. Status,
    /// OAM, VRAM and the beam position survive.
    pub fn reset(&mut self) {
        self.regs.control = PpuControl::empty();
        self.regs.mask = PpuMask::empty();
        self.regs.w = false;
        self.regs.t = 0;
        self.regs.x = 0;
        self.read_buffer = 0;
        self.nmi_pending = false;
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// CPU read of $2000 + `reg` (already masked to 0-7).
    pub fn read_register(&mut self, reg: u16) -> Result<u8, BusError> {
        let value = match reg & 7 {
            PPUSTATUS => {
                let status = self.regs.read_status();
                status.bits() | (self.io_latch & 0x1F)
            }
            OAMDATA => self.oam[self.regs.oam_addr as usize],
            PPUDATA => {
                let addr = self.regs.v & 0x3FFF;
                let value = if addr >= 0x3F00 {
                    // Palette reads bypass the buffer; the buffer picks up the
                    // nametable byte hidden underneath.
                    self.read_buffer = self.bus.read(addr - 0x1000)?;
                    self.bus.read(addr)?
                } else {
                    let buffered = self.read_buffer;
                    self.read_buffer = self.bus.read(addr)?;
                    buffered
                };
                self.regs.increment_vram_addr();
                value
            }
            // Write-only registers return the I/O latch
            _ => self.io_latch,
        };
        self.io_latch = value;
        Ok(value)
    }

    /// CPU write of $2000 + `reg`.
    pub fn write_register(&mut self, reg: u16, value: u8) -> Result<(), BusError> {
        self.io_latch = value;
        if debug_flags::ppu_write() {
            log::debug!(
                "PPU write ${:04X} = {:02X} at scanline {} dot {}",
                0x2000 | (reg & 7),
                value,
                self.scanline,
                self.dot
            );
        }
        match reg & 7 {
            PPUCTRL => {
                let was_enabled = self.regs.control.contains(PpuControl::NMI_ENABLE);
                self.regs.write_control(value);
                // Enabling NMI in the middle of VBlank fires immediately
                if !was_enabled
                    && self.regs.control.contains(PpuControl::NMI_ENABLE)
                    && self.regs.status.contains(PpuStatus::VBLANK)
                {
                    self.nmi_pending = true;
                }
            }
            PPUMASK => self.regs.mask = PpuMask::from_bits_truncate(value),
            OAMADDR => self.regs.oam_addr = value,
            OAMDATA => self.write_oam(value),
            PPUSCROLL => self.regs.write_scroll(value),
            PPUADDR => self.regs.write_addr(value),
            PPUDATA => {
                self.bus.write(self.regs.v & 0x3FFF, value)?;
                self.regs.increment_vram_addr();
            }
            // PPUSTATUS is read-only
            _ => {}
        }
        Ok(())
    }

    /// Store one byte at OAMADDR and advance it. $2004 writes and OAM DMA
    /// both land here.
    pub fn write_oam(&mut self, value: u8) {
        self.oam[self.regs.oam_addr as usize] = value;
        self.regs.oam_addr = self.regs.oam_addr.wrapping_add(1);
    }

    /// Advance one dot.
    pub fn tick(&mut self) {
        self.dot += 1;
        // Odd frames drop the last pre-render dot while rendering
        if self.scanline == PRE_RENDER_SCANLINE
            && self.dot == DOTS_PER_SCANLINE - 1
            && self.frame % 2 == 1
            && self.regs.rendering_enabled()
        {
            self.dot = DOTS_PER_SCANLINE;
        }
        if self.dot >= DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
            }
        }

        match (self.scanline, self.dot) {
            (VBLANK_SCANLINE, 1) => {
                self.regs.status.insert(PpuStatus::VBLANK);
                if self.regs.control.contains(PpuControl::NMI_ENABLE) {
                    self.nmi_pending = true;
                }
                if debug_flags::nmi() {
                    log::debug!(
                        "VBlank frame {} (NMI {})",
                        self.frame,
                        if self.nmi_pending { "raised" } else { "masked" }
                    );
                }
            }
            (PRE_RENDER_SCANLINE, 1) => {
                self.regs.status.remove(
                    PpuStatus::VBLANK | PpuStatus::SPRITE_0_HIT | PpuStatus::SPRITE_OVERFLOW,
                );
            }
            _ => {}
        }

        if self.regs.rendering_enabled()
            && (self.scanline < 240 || self.scanline == PRE_RENDER_SCANLINE)
        {
            self.update_scroll();
        }
    }

    // Loopy v increments at the points where the fetch pipeline would make them
    fn update_scroll(&mut self) {
        let dot = self.dot;
        if (1..=256).contains(&dot) || dot == 328 || dot == 336 {
            if dot % 8 == 0 {
                self.regs.increment_coarse_x();
            }
            if dot == 256 {
                self.regs.increment_y();
            }
        } else if dot == 257 {
            self.regs.copy_horizontal();
        } else if self.scanline == PRE_RENDER_SCANLINE && (280..=304).contains(&dot) {
            self.regs.copy_vertical();
        }
    }

    /// Take the pending NMI request, if any.
    pub fn poll_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn control(&self) -> PpuControl {
        self.regs.control
    }

    pub fn mask(&self) -> PpuMask {
        self.regs.mask
    }

    pub fn status(&self) -> PpuStatus {
        self.regs.status
    }

    pub fn oam(&self) -> &[u8; OAM_SIZE] {
        &self.oam
    }

    /// Read the PPU address space directly, bypassing the $2007 buffer.
    pub fn read_vram(&mut self, addr: u16) -> Result<u8, BusError> {
        self.bus.read(addr & 0x3FFF)
    }
}
