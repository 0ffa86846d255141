//! nestest.log-compatible trace lines.
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
//! ```
//!
//! Every memory value shown is fetched with `peek`, so formatting a line
//! never disturbs the hardware. Locations that cannot be peeked (PPU
//! registers, controller ports) print as `??`.

use crate::cpu::{decode, AddressingMode, Cpu, CpuBus, Instruction, Mnemonic};

/// Trace line for the instruction at `cpu.pc`. `ppu_position` is
/// `(scanline, dot)`.
pub fn format_line(cpu: &Cpu, bus: &mut dyn CpuBus, ppu_position: (u16, u16)) -> String {
    let pc = cpu.pc;
    let (bytes, text, marker) = match bus.peek(pc).and_then(decode) {
        Some(instr) => {
            let raw: Vec<Option<u8>> = (0..instr.size as u16)
                .map(|i| bus.peek(pc.wrapping_add(i)))
                .collect();
            let bytes: Vec<String> = raw.iter().map(|b| hex8(*b)).collect();
            let operand = describe_operand(cpu, bus, instr, &raw[1..]);
            let text = if operand.is_empty() {
                instr.mnemonic.name().to_string()
            } else {
                format!("{} {}", instr.mnemonic.name(), operand)
            };
            (bytes.join(" "), text, if instr.illegal { '*' } else { ' ' })
        }
        None => (hex8(bus.peek(pc)), "???".to_string(), ' '),
    };

    format!(
        "{:04X}  {:<8} {}{:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
        pc,
        bytes,
        marker,
        text,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status.bits(),
        cpu.sp,
        ppu_position.0,
        ppu_position.1,
        cpu.cycles()
    )
}

fn hex8(value: Option<u8>) -> String {
    match value {
        Some(v) => format!("{:02X}", v),
        None => "??".to_string(),
    }
}

fn hex16(value: Option<u16>) -> String {
    match value {
        Some(v) => format!("{:04X}", v),
        None => "????".to_string(),
    }
}

// Operand text with the effective address and the value it currently holds
fn describe_operand(
    cpu: &Cpu,
    bus: &mut dyn CpuBus,
    instr: &Instruction,
    operand: &[Option<u8>],
) -> String {
    let lo = operand.first().copied().flatten().unwrap_or(0);
    let hi = operand.get(1).copied().flatten().unwrap_or(0);
    let word = u16::from_le_bytes([lo, hi]);
    let next = cpu.pc.wrapping_add(instr.size as u16);

    match instr.mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", lo),
        AddressingMode::ZeroPage => {
            format!("${:02X} = {}", lo, hex8(bus.peek(lo as u16)))
        }
        AddressingMode::ZeroPageX | AddressingMode::ZeroPageY => {
            let (index, name) = if instr.mode == AddressingMode::ZeroPageX {
                (cpu.x, 'X')
            } else {
                (cpu.y, 'Y')
            };
            let addr = lo.wrapping_add(index);
            format!(
                "${:02X},{} @ {:02X} = {}",
                lo,
                name,
                addr,
                hex8(bus.peek(addr as u16))
            )
        }
        AddressingMode::Absolute => {
            if matches!(instr.mnemonic, Mnemonic::Jmp | Mnemonic::Jsr) {
                format!("${:04X}", word)
            } else {
                format!("${:04X} = {}", word, hex8(bus.peek(word)))
            }
        }
        AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => {
            let (index, name) = if instr.mode == AddressingMode::AbsoluteX {
                (cpu.x, 'X')
            } else {
                (cpu.y, 'Y')
            };
            let addr = word.wrapping_add(index as u16);
            format!(
                "${:04X},{} @ {:04X} = {}",
                word,
                name,
                addr,
                hex8(bus.peek(addr))
            )
        }
        AddressingMode::Indirect => {
            let hi_addr = (word & 0xFF00) | (word.wrapping_add(1) & 0x00FF);
            let target = peek_word(bus, word, hi_addr);
            format!("(${:04X}) = {}", word, hex16(target))
        }
        AddressingMode::IndirectX => {
            let ptr = lo.wrapping_add(cpu.x);
            let target = peek_zero_page_word(bus, ptr);
            let value = target.and_then(|addr| bus.peek(addr));
            format!(
                "(${:02X},X) @ {:02X} = {} = {}",
                lo,
                ptr,
                hex16(target),
                hex8(value)
            )
        }
        AddressingMode::IndirectY => {
            let base = peek_zero_page_word(bus, lo);
            let addr = base.map(|b| b.wrapping_add(cpu.y as u16));
            let value = addr.and_then(|a| bus.peek(a));
            format!(
                "(${:02X}),Y = {} @ {} = {}",
                lo,
                hex16(base),
                hex16(addr),
                hex8(value)
            )
        }
        AddressingMode::Relative => {
            format!("${:04X}", next.wrapping_add(lo as i8 as u16))
        }
    }
}

fn peek_word(bus: &mut dyn CpuBus, lo_addr: u16, hi_addr: u16) -> Option<u16> {
    let lo = bus.peek(lo_addr)?;
    let hi = bus.peek(hi_addr)?;
    Some(u16::from_le_bytes([lo, hi]))
}

fn peek_zero_page_word(bus: &mut dyn CpuBus, ptr: u8) -> Option<u16> {
    peek_word(bus, ptr as u16, ptr.wrapping_add(1) as u16)
}
