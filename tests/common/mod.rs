#![allow(dead_code)]

use nes_machine::Nes;

pub const RESET_ADDR: u16 = 0x8000;
pub const NMI_ADDR: u16 = 0x9000;
pub const IRQ_ADDR: u16 = 0x9800;

/// One 16 KiB PRG bank, CHR RAM, vertical mirroring. `program` starts at
/// $8000; `patches` place extra code at other CPU addresses. Unused PRG is
/// filled with NOP.
pub fn nrom(program: &[u8], patches: &[(u16, &[u8])]) -> Vec<u8> {
    let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 1, 0, 0x01, 0];
    image.resize(16, 0);

    let mut prg = vec![0xEA; 0x4000];
    prg[..program.len()].copy_from_slice(program);
    for (addr, bytes) in patches {
        let offset = (*addr as usize - 0x8000) & 0x3FFF;
        prg[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
    for (vector, target) in [(0x3FFA, NMI_ADDR), (0x3FFC, RESET_ADDR), (0x3FFE, IRQ_ADDR)] {
        prg[vector..vector + 2].copy_from_slice(&target.to_le_bytes());
    }

    image.extend_from_slice(&prg);
    image
}

/// Console with `image` inserted, powered up and past the reset sequence.
pub fn boot(image: &[u8]) -> Nes {
    let mut nes = Nes::new();
    nes.insert_cartridge(image).unwrap();
    nes.power_up();
    assert_eq!(nes.step().unwrap(), 7);
    nes
}
