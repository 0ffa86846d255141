//! Linear disassembler over the opcode table.

use std::fmt;

use crate::cpu::{decode, AddressingMode, CpuBus, Instruction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    pub address: u16,
    pub opcode: u8,
    /// `None` when the byte is not a defined opcode or the instruction runs
    /// past the end of the input.
    pub instruction: Option<&'static Instruction>,
    pub raw: Vec<u8>,
    pub operand: String,
}

impl Disassembly {
    fn undecoded(address: u16, opcode: u8) -> Self {
        Disassembly {
            address,
            opcode,
            instruction: None,
            raw: vec![opcode],
            operand: String::new(),
        }
    }

    /// Bytes consumed by this record.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: Vec<String> = self.raw.iter().map(|b| format!("{:02X}", b)).collect();
        write!(f, "{:04X}   {:<8}   ", self.address, bytes.join(" "))?;
        match self.instruction {
            Some(instr) if self.operand.is_empty() => f.write_str(instr.mnemonic.name()),
            Some(instr) => write!(f, "{} {}", instr.mnemonic.name(), self.operand),
            None => f.write_str("???"),
        }
    }
}

/// Operand text for `mode`. `operand` holds the bytes after the opcode and
/// `next` is the address of the following instruction (branch targets).
pub fn format_operand(mode: AddressingMode, operand: &[u8], next: u16) -> String {
    let lo = operand.first().copied().unwrap_or(0);
    let hi = operand.get(1).copied().unwrap_or(0);
    let word = u16::from_le_bytes([lo, hi]);
    match mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", lo),
        AddressingMode::ZeroPage => format!("${:02X}", lo),
        AddressingMode::ZeroPageX => format!("${:02X},X", lo),
        AddressingMode::ZeroPageY => format!("${:02X},Y", lo),
        AddressingMode::Absolute => format!("${:04X}", word),
        AddressingMode::AbsoluteX => format!("${:04X},X", word),
        AddressingMode::AbsoluteY => format!("${:04X},Y", word),
        AddressingMode::Indirect => format!("(${:04X})", word),
        AddressingMode::IndirectX => format!("(${:02X},X)", lo),
        AddressingMode::IndirectY => format!("(${:02X}),Y", lo),
        AddressingMode::Relative => {
            format!("${:04X}", next.wrapping_add(lo as i8 as u16))
        }
    }
}

/// Decode `bytes` as if loaded at `origin`.
pub fn disassemble(bytes: &[u8], origin: u16) -> Vec<Disassembly> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let address = origin.wrapping_add(offset as u16);
        let record = decode_at(&bytes[offset..], address);
        offset += record.len();
        out.push(record);
    }
    out
}

/// Decode `count` instructions from live memory without side effects.
/// Stops early at the first location `peek` refuses.
pub fn disassemble_from(bus: &mut dyn CpuBus, start: u16, count: usize) -> Vec<Disassembly> {
    let mut out = Vec::new();
    let mut address = start;
    for _ in 0..count {
        let Some(opcode) = bus.peek(address) else {
            break;
        };
        let size = decode(opcode).map_or(1, |instr| instr.size as u16);
        let mut bytes = vec![opcode];
        for i in 1..size {
            match bus.peek(address.wrapping_add(i)) {
                Some(b) => bytes.push(b),
                None => break,
            }
        }
        let record = decode_at(&bytes, address);
        address = address.wrapping_add(record.len() as u16);
        out.push(record);
    }
    out
}

fn decode_at(bytes: &[u8], address: u16) -> Disassembly {
    let opcode = bytes[0];
    let Some(instr) = decode(opcode) else {
        return Disassembly::undecoded(address, opcode);
    };
    let size = instr.size as usize;
    if bytes.len() < size {
        return Disassembly::undecoded(address, opcode);
    }
    let next = address.wrapping_add(size as u16);
    Disassembly {
        address,
        opcode,
        instruction: Some(instr),
        raw: bytes[..size].to_vec(),
        operand: format_operand(instr.mode, &bytes[1..size], next),
    }
}
