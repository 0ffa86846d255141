mod common;

use common::{boot, nrom, IRQ_ADDR, NMI_ADDR, RESET_ADDR};
use nes_machine::cpu::Interrupt;
use nes_machine::error::{Access, BusError, CartridgeError, CpuError, NesError};
use nes_machine::{Buttons, Nes};

#[test]
fn test_power_up_runs_reset_vector() {
    let nes = boot(&nrom(&[0xEA], &[]));
    assert!(nes.cartridge().is_some());
    assert_eq!(nes.cpu().pc, RESET_ADDR);
    assert_eq!(nes.cpu().sp, 0xFD);
    assert_eq!(nes.cpu().status.bits(), 0x24);
    assert_eq!(nes.cpu().cycles(), 7);
    // 7 CPU cycles = 21 dots
    assert_eq!((nes.ppu().scanline(), nes.ppu().dot()), (0, 21));
}

#[test]
fn test_work_ram_mirrors() {
    // LDA #$42; STA $0001; LDX $1801
    let mut nes = boot(&nrom(&[0xA9, 0x42, 0x8D, 0x01, 0x00, 0xAE, 0x01, 0x18], &[]));
    for _ in 0..3 {
        nes.step().unwrap();
    }
    assert_eq!(nes.cpu().x, 0x42);
    assert_eq!(nes.ram().read(0x0001), 0x42);

    let bus = nes.cpu_bus_mut();
    bus.write(0x0FFF, 0x99).unwrap();
    assert_eq!(bus.read(0x07FF).unwrap(), 0x99);
}

#[test]
fn test_prg_mirror_and_rom_writes_ignored() {
    let mut nes = boot(&nrom(&[0xA9, 0x42], &[]));
    let bus = nes.cpu_bus_mut();
    assert_eq!(bus.read(0x8000).unwrap(), 0xA9);
    assert_eq!(bus.read(0xC000).unwrap(), 0xA9);
    bus.write(0x8000, 0x00).unwrap();
    assert_eq!(bus.read(0x8000).unwrap(), 0xA9);
}

#[test]
fn test_prg_ram() {
    let mut nes = boot(&nrom(&[0xEA], &[]));
    let bus = nes.cpu_bus_mut();
    bus.write(0x6000, 0x12).unwrap();
    bus.write(0x7FFF, 0x34).unwrap();
    assert_eq!(bus.read(0x6000).unwrap(), 0x12);
    assert_eq!(bus.read(0x7FFF).unwrap(), 0x34);
}

#[test]
fn test_io_region_map() {
    let mut nes = boot(&nrom(&[0xEA], &[]));
    let bus = nes.cpu_bus_mut();
    // Audio registers read as 0 and swallow writes
    assert_eq!(bus.read(0x4000).unwrap(), 0);
    assert_eq!(bus.read(0x4015).unwrap(), 0);
    bus.write(0x4003, 0xFF).unwrap();
    bus.write(0x4017, 0x40).unwrap();
    bus.write(0x401F, 0x00).unwrap();

    assert_eq!(
        bus.read(0x4018),
        Err(BusError::Unmapped {
            addr: 0x4018,
            access: Access::Read
        })
    );
    assert_eq!(
        bus.write(0x5000, 0),
        Err(BusError::Unmapped {
            addr: 0x5000,
            access: Access::Write
        })
    );
}

#[test]
fn test_unmapped_read_faults_the_instruction() {
    // LDA $5000
    let mut nes = boot(&nrom(&[0xAD, 0x00, 0x50], &[]));
    match nes.step() {
        Err(NesError::Cpu(CpuError::Bus { pc, source })) => {
            assert_eq!(pc, 0x8000);
            assert_eq!(
                source,
                BusError::Unmapped {
                    addr: 0x5000,
                    access: Access::Read
                }
            );
        }
        other => panic!("expected bus fault, got {:?}", other),
    }
}

#[test]
fn test_unknown_opcode_faults() {
    let mut nes = boot(&nrom(&[0xEA, 0x02], &[]));
    nes.step().unwrap();
    match nes.step() {
        Err(NesError::Cpu(CpuError::UnknownOpcode { opcode, pc })) => {
            assert_eq!(opcode, 0x02);
            assert_eq!(pc, 0x8001);
        }
        other => panic!("expected unknown opcode, got {:?}", other),
    }
}

#[test]
fn test_bad_image_keeps_console_empty() {
    let mut nes = Nes::new();
    let err = nes.insert_cartridge(b"NOPE\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00");
    assert!(matches!(
        err,
        Err(NesError::Cartridge(CartridgeError::BadMagic(_)))
    ));
    assert!(nes.cartridge().is_none());
    // Without a cartridge the ROM window is unmapped
    assert!(nes.cpu_bus_mut().read(0x8000).is_err());
}

#[test]
fn test_ppu_registers_through_cpu_bus() {
    let mut nes = boot(&nrom(&[0xEA], &[]));
    let bus = nes.cpu_bus_mut();
    // $3FFE and $3FFF mirror $2006 and $2007
    bus.write(0x3FFE, 0x20).unwrap();
    bus.write(0x3FFE, 0x00).unwrap();
    bus.write(0x2007, 0xAB).unwrap();

    bus.write(0x2006, 0x20).unwrap();
    bus.write(0x2006, 0x00).unwrap();
    let _stale = bus.read(0x2007).unwrap();
    assert_eq!(bus.read(0x3FFF).unwrap(), 0xAB);

    // PPU registers are never peeked
    assert_eq!(bus.peek(0x2002), None);
}

#[test]
fn test_nmi_once_per_frame() {
    // $8000: LDA #$80; STA $2000; JMP $8005
    // $9000: INC $10; RTI
    let program = [0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
    let handler: &[u8] = &[0xE6, 0x10, 0x40];
    let mut nes = boot(&nrom(&program, &[(NMI_ADDR, handler)]));

    for frame in 1..=3u8 {
        nes.run_frame().unwrap();
        assert_eq!(nes.ppu().frame(), frame as u64);
        assert_eq!(nes.ram().read(0x10), frame);
    }
}

#[test]
fn test_frame_length_in_cpu_cycles() {
    let mut nes = boot(&nrom(&[0x4C, 0x00, 0x80], &[]));
    nes.run_frame().unwrap();
    let cycles = nes.run_frame().unwrap();
    // 341 * 262 / 3 = 29780.67, give or take one instruction at each edge
    assert!((29_770..=29_790).contains(&cycles), "{} cycles", cycles);
}

#[test]
fn test_nmi_masked_until_enabled() {
    let mut nes = boot(&nrom(&[0x4C, 0x00, 0x80], &[]));
    nes.run_frame().unwrap();
    assert_eq!(nes.cpu().pc & 0xF000, 0x8000);
    assert_eq!(nes.cpu().pending_interrupt(), None);
    assert!(nes.ppu().status().bits() & 0x80 == 0);
}

#[test]
fn test_irq_line_from_host() {
    // CLI; JMP $8001
    let handler: &[u8] = &[0xE6, 0x20, 0x40];
    let mut nes = boot(&nrom(&[0x58, 0x4C, 0x01, 0x80], &[(IRQ_ADDR, handler)]));
    nes.step().unwrap();
    nes.cpu_mut().raise(Interrupt::Irq);
    assert_eq!(nes.step().unwrap(), 7);
    assert_eq!(nes.cpu().pc, IRQ_ADDR);
    nes.step().unwrap();
    assert_eq!(nes.ram().read(0x20), 1);
}

#[test]
fn test_oam_dma_copies_page_and_stalls() {
    // LDA #$02; STA $4014
    let mut nes = boot(&nrom(&[0xA9, 0x02, 0x8D, 0x14, 0x40], &[]));
    {
        let bus = nes.cpu_bus_mut();
        for i in 0..256u16 {
            bus.write(0x0200 + i, i as u8 ^ 0x5A).unwrap();
        }
    }
    nes.step().unwrap();
    // 7 + 2 + 4 = 13 cycles when the DMA starts: odd, one alignment cycle
    assert_eq!(nes.step().unwrap(), 4 + 514);
    assert_eq!(nes.cpu().cycles(), 13 + 514);

    let ppu = nes.ppu();
    for i in 0..256usize {
        assert_eq!(ppu.oam()[i], i as u8 ^ 0x5A);
    }
}

#[test]
fn test_oam_dma_from_unmapped_page() {
    // LDA #$50; STA $4014
    let mut nes = boot(&nrom(&[0xA9, 0x50, 0x8D, 0x14, 0x40], &[]));
    nes.step().unwrap();
    match nes.step() {
        Err(NesError::Dma { page, source }) => {
            assert_eq!(page, 0x50);
            assert_eq!(
                source,
                BusError::Unmapped {
                    addr: 0x5000,
                    access: Access::Read
                }
            );
        }
        other => panic!("expected DMA fault, got {:?}", other),
    }
}

#[test]
fn test_controller_read_by_program() {
    // LDA #$01; STA $4016; LDA #$00; STA $4016; LDA $4016; LDA $4016
    let program = [
        0xA9, 0x01, 0x8D, 0x16, 0x40, 0xA9, 0x00, 0x8D, 0x16, 0x40, 0xAD, 0x16, 0x40, 0xAD,
        0x16, 0x40,
    ];
    let mut nes = boot(&nrom(&program, &[]));
    nes.input_mut()
        .controller1
        .set_buttons(Buttons::B | Buttons::START);

    for _ in 0..5 {
        nes.step().unwrap();
    }
    // A not pressed
    assert_eq!(nes.cpu().a, 0x40);
    nes.step().unwrap();
    // B pressed
    assert_eq!(nes.cpu().a, 0x41);
}

#[test]
fn test_reset_keeps_ram() {
    let mut nes = boot(&nrom(&[0xA9, 0x42, 0x85, 0x10, 0x4C, 0x04, 0x80], &[]));
    nes.step().unwrap();
    nes.step().unwrap();
    nes.reset();
    nes.step().unwrap();
    assert_eq!(nes.cpu().pc, RESET_ADDR);
    assert_eq!(nes.cpu().sp, 0xFA);
    assert_eq!(nes.ram().read(0x10), 0x42);

    nes.power_up();
    nes.step().unwrap();
    assert_eq!(nes.ram().read(0x10), 0x00);
    assert_eq!(nes.cpu().sp, 0xFD);
}

#[test]
fn test_trace_line_reflects_console_state() {
    let mut nes = boot(&nrom(&[0xA2, 0x05], &[]));
    let line = nes.trace_line();
    assert!(line.starts_with("8000  A2 05     LDX #$05"), "{}", line);
    assert!(line.ends_with("SP:FD PPU:  0, 21 CYC:7"), "{}", line);
}

#[test]
fn test_trace_across_subroutine_branch_and_undocumented_opcode() {
    // $8000: JSR $80F8; NOP
    // $80F8: SEC; BCS $8100
    // $8100: LAX $10; RTS
    let subroutine: &[u8] = &[0x38, 0xB0, 0x05];
    let tail: &[u8] = &[0xA7, 0x10, 0x60];
    let mut nes = boot(&nrom(
        &[0x20, 0xF8, 0x80, 0xEA],
        &[(0x80F8, subroutine), (0x8100, tail)],
    ));
    nes.cpu_bus_mut().write(0x0010, 0x80).unwrap();

    let expected = [
        "8000  20 F8 80  JSR $80F8                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7",
        "80F8  38        SEC                             A:00 X:00 Y:00 P:24 SP:FB PPU:  0, 39 CYC:13",
        "80F9  B0 05     BCS $8100                       A:00 X:00 Y:00 P:25 SP:FB PPU:  0, 45 CYC:15",
        "8100  A7 10    *LAX $10 = 80                    A:00 X:00 Y:00 P:25 SP:FB PPU:  0, 57 CYC:19",
        "8102  60        RTS                             A:80 X:80 Y:00 P:A5 SP:FB PPU:  0, 66 CYC:22",
        "8003  EA        NOP                             A:80 X:80 Y:00 P:A5 SP:FD PPU:  0, 84 CYC:28",
    ];
    for (i, line) in expected.iter().enumerate() {
        assert_eq!(nes.trace_line(), *line, "line {}", i + 1);
        nes.step().unwrap();
    }
}

#[test]
fn test_disassembly_of_unbounded_count_stops_at_registers() {
    let mut nes = boot(&nrom(&[0xEA], &[]));
    let out = nes_machine::disasm::disassemble_from(nes.cpu_bus_mut(), 0x8000, usize::MAX);
    // Runs through ROM, wraps into work RAM and stops short of $2000
    assert!(!out.is_empty());
    let last = out[out.len() - 1].address;
    assert!(last < 0x2000, "last address {:04X}", last);
}
