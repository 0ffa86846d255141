use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuControl: u8 {
        const NAMETABLE_X = 0b00000001;
        const NAMETABLE_Y = 0b00000010;
        const VRAM_INCREMENT = 0b00000100;
        const SPRITE_PATTERN = 0b00001000;
        const BG_PATTERN = 0b00010000;
        const SPRITE_SIZE = 0b00100000;
        const PPU_MASTER_SLAVE = 0b01000000;
        const NMI_ENABLE = 0b10000000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuMask: u8 {
        const GRAYSCALE = 0b00000001;
        const BG_LEFT_ENABLE = 0b00000010;
        const SPRITE_LEFT_ENABLE = 0b00000100;
        const BG_ENABLE = 0b00001000;
        const SPRITE_ENABLE = 0b00010000;
        const EMPHASIZE_RED = 0b00100000;
        const EMPHASIZE_GREEN = 0b01000000;
        const EMPHASIZE_BLUE = 0b10000000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW = 0b00100000;
        const SPRITE_0_HIT = 0b01000000;
        const VBLANK = 0b10000000;
    }
}

/// Register offsets within the 8-byte window at $2000.
pub const PPUCTRL: u16 = 0;
pub const PPUMASK: u16 = 1;
pub const PPUSTATUS: u16 = 2;
pub const OAMADDR: u16 = 3;
pub const OAMDATA: u16 = 4;
pub const PPUSCROLL: u16 = 5;
pub const PPUADDR: u16 = 6;
pub const PPUDATA: u16 = 7;

/// CPU-visible register file plus the internal "loopy" scroll latches.
///
/// `v` and `t` are 15-bit VRAM addresses laid out as `yyy NN YYYYY XXXXX`
/// (fine Y, nametable select, coarse Y, coarse X). `x` is the 3-bit fine X
/// scroll and `w` the shared first/second write toggle for $2005/$2006.
#[derive(Debug, Clone)]
pub struct PpuRegisters {
    pub control: PpuControl,
    pub mask: PpuMask,
    pub status: PpuStatus,
    pub oam_addr: u8,

    pub v: u16, // Current VRAM address
    pub t: u16, // Temporary VRAM address
    pub x: u8,  // Fine X scroll
    pub w: bool, // Write toggle
}

impl Default for PpuRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuRegisters {
    pub fn new() -> Self {
        Self {
            control: PpuControl::empty(),
            mask: PpuMask::empty(),
            status: PpuStatus::empty(),
            oam_addr: 0,
            v: 0,
            t: 0,
            x: 0,
            w: false,
        }
    }

    pub fn write_control(&mut self, value: u8) {
        self.control = PpuControl::from_bits_truncate(value);
        // t: ...GH.. ........ <- d: ......GH
        self.t = (self.t & 0xF3FF) | (((value & 0x03) as u16) << 10);
    }

    /// $2002 side effects: VBlank clears and the write toggle resets.
    /// Returns the status bits as they were before the read.
    pub fn read_status(&mut self) -> PpuStatus {
        let status = self.status;
        self.status.remove(PpuStatus::VBLANK);
        self.w = false;
        status
    }

    pub fn write_scroll(&mut self, value: u8) {
        if !self.w {
            // t: ....... ...ABCDE <- d: ABCDE...
            self.t = (self.t & 0xFFE0) | ((value >> 3) as u16);
            self.x = value & 0x07;
        } else {
            // t: FGH..AB CDE..... <- d: ABCDEFGH
            self.t = (self.t & 0x0C1F)
                | (((value & 0x07) as u16) << 12)
                | (((value >> 3) as u16) << 5);
        }
        self.w = !self.w;
    }

    pub fn write_addr(&mut self, value: u8) {
        if !self.w {
            // t: .CDEFGH ........ <- d: ..CDEFGH, bit 14 cleared
            self.t = (self.t & 0x00FF) | (((value & 0x3F) as u16) << 8);
        } else {
            self.t = (self.t & 0xFF00) | value as u16;
            self.v = self.t;
        }
        self.w = !self.w;
    }

    pub fn increment_vram_addr(&mut self) {
        let increment = if self.control.contains(PpuControl::VRAM_INCREMENT) { 32 } else { 1 };
        self.v = self.v.wrapping_add(increment) & 0x7FFF;
    }

    pub fn rendering_enabled(&self) -> bool {
        self.mask.intersects(PpuMask::BG_ENABLE | PpuMask::SPRITE_ENABLE)
    }

    pub fn increment_coarse_x(&mut self) {
        if self.v & 0x001F == 31 {
            self.v &= !0x001F;
            self.v ^= 0x0400;
        } else {
            self.v += 1;
        }
    }

    pub fn increment_y(&mut self) {
        if self.v & 0x7000 != 0x7000 {
            self.v += 0x1000;
            return;
        }
        self.v &= !0x7000;
        let mut coarse_y = (self.v & 0x03E0) >> 5;
        if coarse_y == 29 {
            coarse_y = 0;
            self.v ^= 0x0800;
        } else if coarse_y == 31 {
            // Out-of-range coarse Y wraps without switching nametables
            coarse_y = 0;
        } else {
            coarse_y += 1;
        }
        self.v = (self.v & !0x03E0) | (coarse_y << 5);
    }

    pub fn copy_horizontal(&mut self) {
        self.v = (self.v & 0xFBE0) | (self.t & 0x041F);
    }

    pub fn copy_vertical(&mut self) {
        self.v = (self.v & 0x841F) | (self.t & 0x7BE0);
    }
}
