//! PPU address space ($0000-$3FFF).
//!
//! $0000-$1FFF pattern tables (cartridge CHR), $2000-$3EFF nametables in
//! console VRAM folded through the cartridge's mirroring, $3F00-$3FFF the
//! 32-byte palette RAM.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::Bus;
use crate::cartridge::{Cartridge, Mirroring};
use crate::memory::Memory;

/// Enough for four-screen boards; two-screen mirroring uses the first 2 KiB.
pub const VRAM_SIZE: usize = 0x1000;
pub const PALETTE_SIZE: usize = 32;

/// Fold a palette address into palette RAM. The sprite backdrop entries
/// $3F10/$3F14/$3F18/$3F1C are the background ones at $3F00/$3F04/$3F08/$3F0C.
pub fn palette_index(addr: u16) -> usize {
    let index = (addr & 0x1F) as usize;
    if index >= 16 && index % 4 == 0 {
        index - 16
    } else {
        index
    }
}

/// Install the PPU-side routes. Without a cartridge the pattern tables stay
/// unmapped and nametables fall back to horizontal mirroring.
pub fn map_ppu_bus(
    bus: &mut Bus,
    cartridge: Option<&Rc<RefCell<Cartridge>>>,
    vram: &Rc<RefCell<Memory>>,
    palette: &Rc<RefCell<Memory>>,
) {
    bus.clear();

    let mirroring = match cartridge {
        Some(cart) => {
            let r = Rc::clone(cart);
            bus.map_read("chr", 0x0000..=0x1FFF, move |addr| Ok(r.borrow().read_chr(addr)));
            let w = Rc::clone(cart);
            bus.map_write("chr", 0x0000..=0x1FFF, move |addr, value| {
                w.borrow_mut().write_chr(addr, value);
                Ok(())
            });
            let mirroring = cart.borrow().mirroring();
            mirroring
        }
        None => Mirroring::Horizontal,
    };

    let r = Rc::clone(vram);
    bus.map_read("nametables", 0x2000..=0x3EFF, move |addr| {
        Ok(r.borrow().read(mirroring.nametable_offset(addr)))
    });
    let w = Rc::clone(vram);
    bus.map_write("nametables", 0x2000..=0x3EFF, move |addr, value| {
        w.borrow_mut().write(mirroring.nametable_offset(addr), value);
        Ok(())
    });

    let r = Rc::clone(palette);
    bus.map_read("palette", 0x3F00..=0x3FFF, move |addr| {
        Ok(r.borrow().read(palette_index(addr)))
    });
    let w = Rc::clone(palette);
    bus.map_write("palette", 0x3F00..=0x3FFF, move |addr, value| {
        // Palette entries are 6 bits wide
        w.borrow_mut().write(palette_index(addr), value & 0x3F);
        Ok(())
    });
}
