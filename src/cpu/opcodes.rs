//! Opcode table for the 2A03.
//!
//! Every defined opcode byte maps to exactly one [`Instruction`]. Bytes that
//! are not in the table (the JAM/KIL opcodes and the unstable undocumented
//! ones such as XAA or AHX) decode to `None` and fault in the CPU.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented read-modify-write and load/store combinations
    Lax,
    Sax,
    Dcp,
    Isc,
    Slo,
    Rla,
    Sre,
    Rra,
}

impl Mnemonic {
    pub fn name(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
            Lax => "LAX",
            Sax => "SAX",
            Dcp => "DCP",
            // nestest.log spells it ISB
            Isc => "ISB",
            Slo => "SLO",
            Rla => "RLA",
            Sre => "SRE",
            Rra => "RRA",
        }
    }

    pub fn is_branch(self) -> bool {
        use Mnemonic::*;
        matches!(self, Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub const fn operand_size(self) -> u8 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndirectX | IndirectY | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub opcode: u8,
    pub mode: AddressingMode,
    /// Total length including the opcode byte.
    pub size: u8,
    /// Base cost; branches and page crossings add to it at run time.
    pub cycles: u8,
    /// One extra cycle when the indexed address leaves the base page.
    pub page_penalty: bool,
    pub illegal: bool,
}

impl Instruction {
    const fn new(opcode: u8, mnemonic: Mnemonic, mode: AddressingMode, cycles: u8) -> Self {
        Instruction {
            mnemonic,
            opcode,
            mode,
            size: 1 + mode.operand_size(),
            cycles,
            page_penalty: false,
            illegal: false,
        }
    }

    const fn paged(mut self) -> Self {
        self.page_penalty = true;
        self
    }

    const fn undocumented(mut self) -> Self {
        self.illegal = true;
        self
    }
}

struct OpcodeTable {
    by_opcode: [Option<Instruction>; 256],
    by_mode: HashMap<(Mnemonic, AddressingMode), Instruction>,
}

impl OpcodeTable {
    fn build() -> Self {
        let mut by_opcode = [None; 256];
        let mut by_mode = HashMap::new();

        // Documented entries first so (Nop, Implied) and (Sbc, Immediate)
        // resolve to $EA and $E9 rather than their undocumented twins.
        for instr in table::DOCUMENTED.iter().chain(table::UNDOCUMENTED.iter()) {
            debug_assert!(
                by_opcode[instr.opcode as usize].is_none(),
                "opcode {:02X} defined twice",
                instr.opcode
            );
            by_opcode[instr.opcode as usize] = Some(*instr);
            by_mode.entry((instr.mnemonic, instr.mode)).or_insert(*instr);
        }

        OpcodeTable { by_opcode, by_mode }
    }
}

static TABLE: OnceLock<OpcodeTable> = OnceLock::new();

fn opcode_table() -> &'static OpcodeTable {
    TABLE.get_or_init(OpcodeTable::build)
}

pub fn decode(opcode: u8) -> Option<&'static Instruction> {
    opcode_table().by_opcode[opcode as usize].as_ref()
}

pub fn lookup(mnemonic: Mnemonic, mode: AddressingMode) -> Option<&'static Instruction> {
    opcode_table().by_mode.get(&(mnemonic, mode))
}

/// All defined instructions in opcode order.
pub fn instructions() -> impl Iterator<Item = &'static Instruction> {
    opcode_table().by_opcode.iter().flatten()
}

mod table {
    use super::AddressingMode::*;
    use super::Instruction;
    use super::Mnemonic::*;

    const fn op(
        opcode: u8,
        mnemonic: super::Mnemonic,
        mode: super::AddressingMode,
        cycles: u8,
    ) -> Instruction {
        Instruction::new(opcode, mnemonic, mode, cycles)
    }

    pub(super) const DOCUMENTED: &[Instruction] = &[
        op(0x69, Adc, Immediate, 2),
        op(0x65, Adc, ZeroPage, 3),
        op(0x75, Adc, ZeroPageX, 4),
        op(0x6D, Adc, Absolute, 4),
        op(0x7D, Adc, AbsoluteX, 4).paged(),
        op(0x79, Adc, AbsoluteY, 4).paged(),
        op(0x61, Adc, IndirectX, 6),
        op(0x71, Adc, IndirectY, 5).paged(),
        op(0x29, And, Immediate, 2),
        op(0x25, And, ZeroPage, 3),
        op(0x35, And, ZeroPageX, 4),
        op(0x2D, And, Absolute, 4),
        op(0x3D, And, AbsoluteX, 4).paged(),
        op(0x39, And, AbsoluteY, 4).paged(),
        op(0x21, And, IndirectX, 6),
        op(0x31, And, IndirectY, 5).paged(),
        op(0x0A, Asl, Accumulator, 2),
        op(0x06, Asl, ZeroPage, 5),
        op(0x16, Asl, ZeroPageX, 6),
        op(0x0E, Asl, Absolute, 6),
        op(0x1E, Asl, AbsoluteX, 7),
        op(0x90, Bcc, Relative, 2),
        op(0xB0, Bcs, Relative, 2),
        op(0xF0, Beq, Relative, 2),
        op(0x30, Bmi, Relative, 2),
        op(0xD0, Bne, Relative, 2),
        op(0x10, Bpl, Relative, 2),
        op(0x50, Bvc, Relative, 2),
        op(0x70, Bvs, Relative, 2),
        op(0x24, Bit, ZeroPage, 3),
        op(0x2C, Bit, Absolute, 4),
        op(0x00, Brk, Implied, 7),
        op(0x18, Clc, Implied, 2),
        op(0xD8, Cld, Implied, 2),
        op(0x58, Cli, Implied, 2),
        op(0xB8, Clv, Implied, 2),
        op(0xC9, Cmp, Immediate, 2),
        op(0xC5, Cmp, ZeroPage, 3),
        op(0xD5, Cmp, ZeroPageX, 4),
        op(0xCD, Cmp, Absolute, 4),
        op(0xDD, Cmp, AbsoluteX, 4).paged(),
        op(0xD9, Cmp, AbsoluteY, 4).paged(),
        op(0xC1, Cmp, IndirectX, 6),
        op(0xD1, Cmp, IndirectY, 5).paged(),
        op(0xE0, Cpx, Immediate, 2),
        op(0xE4, Cpx, ZeroPage, 3),
        op(0xEC, Cpx, Absolute, 4),
        op(0xC0, Cpy, Immediate, 2),
        op(0xC4, Cpy, ZeroPage, 3),
        op(0xCC, Cpy, Absolute, 4),
        op(0xC6, Dec, ZeroPage, 5),
        op(0xD6, Dec, ZeroPageX, 6),
        op(0xCE, Dec, Absolute, 6),
        op(0xDE, Dec, AbsoluteX, 7),
        op(0xCA, Dex, Implied, 2),
        op(0x88, Dey, Implied, 2),
        op(0x49, Eor, Immediate, 2),
        op(0x45, Eor, ZeroPage, 3),
        op(0x55, Eor, ZeroPageX, 4),
        op(0x4D, Eor, Absolute, 4),
        op(0x5D, Eor, AbsoluteX, 4).paged(),
        op(0x59, Eor, AbsoluteY, 4).paged(),
        op(0x41, Eor, IndirectX, 6),
        op(0x51, Eor, IndirectY, 5).paged(),
        op(0xE6, Inc, ZeroPage, 5),
        op(0xF6, Inc, ZeroPageX, 6),
        op(0xEE, Inc, Absolute, 6),
        op(0xFE, Inc, AbsoluteX, 7),
        op(0xE8, Inx, Implied, 2),
        op(0xC8, Iny, Implied, 2),
        op(0x4C, Jmp, Absolute, 3),
        op(0x6C, Jmp, Indirect, 5),
        op(0x20, Jsr, Absolute, 6),
        op(0xA9, Lda, Immediate, 2),
        op(0xA5, Lda, ZeroPage, 3),
        op(0xB5, Lda, ZeroPageX, 4),
        op(0xAD, Lda, Absolute, 4),
        op(0xBD, Lda, AbsoluteX, 4).paged(),
        op(0xB9, Lda, AbsoluteY, 4).paged(),
        op(0xA1, Lda, IndirectX, 6),
        op(0xB1, Lda, IndirectY, 5).paged(),
        op(0xA2, Ldx, Immediate, 2),
        op(0xA6, Ldx, ZeroPage, 3),
        op(0xB6, Ldx, ZeroPageY, 4),
        op(0xAE, Ldx, Absolute, 4),
        op(0xBE, Ldx, AbsoluteY, 4).paged(),
        op(0xA0, Ldy, Immediate, 2),
        op(0xA4, Ldy, ZeroPage, 3),
        op(0xB4, Ldy, ZeroPageX, 4),
        op(0xAC, Ldy, Absolute, 4),
        op(0xBC, Ldy, AbsoluteX, 4).paged(),
        op(0x4A, Lsr, Accumulator, 2),
        op(0x46, Lsr, ZeroPage, 5),
        op(0x56, Lsr, ZeroPageX, 6),
        op(0x4E, Lsr, Absolute, 6),
        op(0x5E, Lsr, AbsoluteX, 7),
        op(0xEA, Nop, Implied, 2),
        op(0x09, Ora, Immediate, 2),
        op(0x05, Ora, ZeroPage, 3),
        op(0x15, Ora, ZeroPageX, 4),
        op(0x0D, Ora, Absolute, 4),
        op(0x1D, Ora, AbsoluteX, 4).paged(),
        op(0x19, Ora, AbsoluteY, 4).paged(),
        op(0x01, Ora, IndirectX, 6),
        op(0x11, Ora, IndirectY, 5).paged(),
        op(0x48, Pha, Implied, 3),
        op(0x08, Php, Implied, 3),
        op(0x68, Pla, Implied, 4),
        op(0x28, Plp, Implied, 4),
        op(0x2A, Rol, Accumulator, 2),
        op(0x26, Rol, ZeroPage, 5),
        op(0x36, Rol, ZeroPageX, 6),
        op(0x2E, Rol, Absolute, 6),
        op(0x3E, Rol, AbsoluteX, 7),
        op(0x6A, Ror, Accumulator, 2),
        op(0x66, Ror, ZeroPage, 5),
        op(0x76, Ror, ZeroPageX, 6),
        op(0x6E, Ror, Absolute, 6),
        op(0x7E, Ror, AbsoluteX, 7),
        op(0x40, Rti, Implied, 6),
        op(0x60, Rts, Implied, 6),
        op(0xE9, Sbc, Immediate, 2),
        op(0xE5, Sbc, ZeroPage, 3),
        op(0xF5, Sbc, ZeroPageX, 4),
        op(0xED, Sbc, Absolute, 4),
        op(0xFD, Sbc, AbsoluteX, 4).paged(),
        op(0xF9, Sbc, AbsoluteY, 4).paged(),
        op(0xE1, Sbc, IndirectX, 6),
        op(0xF1, Sbc, IndirectY, 5).paged(),
        op(0x38, Sec, Implied, 2),
        op(0xF8, Sed, Implied, 2),
        op(0x78, Sei, Implied, 2),
        op(0x85, Sta, ZeroPage, 3),
        op(0x95, Sta, ZeroPageX, 4),
        op(0x8D, Sta, Absolute, 4),
        op(0x9D, Sta, AbsoluteX, 5),
        op(0x99, Sta, AbsoluteY, 5),
        op(0x81, Sta, IndirectX, 6),
        op(0x91, Sta, IndirectY, 6),
        op(0x86, Stx, ZeroPage, 3),
        op(0x96, Stx, ZeroPageY, 4),
        op(0x8E, Stx, Absolute, 4),
        op(0x84, Sty, ZeroPage, 3),
        op(0x94, Sty, ZeroPageX, 4),
        op(0x8C, Sty, Absolute, 4),
        op(0xAA, Tax, Implied, 2),
        op(0xA8, Tay, Implied, 2),
        op(0xBA, Tsx, Implied, 2),
        op(0x8A, Txa, Implied, 2),
        op(0x9A, Txs, Implied, 2),
        op(0x98, Tya, Implied, 2),
    ];

    pub(super) const UNDOCUMENTED: &[Instruction] = &[
        op(0x1A, Nop, Implied, 2).undocumented(),
        op(0x3A, Nop, Implied, 2).undocumented(),
        op(0x5A, Nop, Implied, 2).undocumented(),
        op(0x7A, Nop, Implied, 2).undocumented(),
        op(0xDA, Nop, Implied, 2).undocumented(),
        op(0xFA, Nop, Implied, 2).undocumented(),
        op(0x80, Nop, Immediate, 2).undocumented(),
        op(0x82, Nop, Immediate, 2).undocumented(),
        op(0x89, Nop, Immediate, 2).undocumented(),
        op(0xC2, Nop, Immediate, 2).undocumented(),
        op(0xE2, Nop, Immediate, 2).undocumented(),
        op(0x04, Nop, ZeroPage, 3).undocumented(),
        op(0x44, Nop, ZeroPage, 3).undocumented(),
        op(0x64, Nop, ZeroPage, 3).undocumented(),
        op(0x14, Nop, ZeroPageX, 4).undocumented(),
        op(0x34, Nop, ZeroPageX, 4).undocumented(),
        op(0x54, Nop, ZeroPageX, 4).undocumented(),
        op(0x74, Nop, ZeroPageX, 4).undocumented(),
        op(0xD4, Nop, ZeroPageX, 4).undocumented(),
        op(0xF4, Nop, ZeroPageX, 4).undocumented(),
        op(0x0C, Nop, Absolute, 4).undocumented(),
        op(0x1C, Nop, AbsoluteX, 4).paged().undocumented(),
        op(0x3C, Nop, AbsoluteX, 4).paged().undocumented(),
        op(0x5C, Nop, AbsoluteX, 4).paged().undocumented(),
        op(0x7C, Nop, AbsoluteX, 4).paged().undocumented(),
        op(0xDC, Nop, AbsoluteX, 4).paged().undocumented(),
        op(0xFC, Nop, AbsoluteX, 4).paged().undocumented(),
        op(0xEB, Sbc, Immediate, 2).undocumented(),
        op(0xA7, Lax, ZeroPage, 3).undocumented(),
        op(0xB7, Lax, ZeroPageY, 4).undocumented(),
        op(0xAF, Lax, Absolute, 4).undocumented(),
        op(0xBF, Lax, AbsoluteY, 4).paged().undocumented(),
        op(0xA3, Lax, IndirectX, 6).undocumented(),
        op(0xB3, Lax, IndirectY, 5).paged().undocumented(),
        op(0x87, Sax, ZeroPage, 3).undocumented(),
        op(0x97, Sax, ZeroPageY, 4).undocumented(),
        op(0x8F, Sax, Absolute, 4).undocumented(),
        op(0x83, Sax, IndirectX, 6).undocumented(),
        op(0xC7, Dcp, ZeroPage, 5).undocumented(),
        op(0xD7, Dcp, ZeroPageX, 6).undocumented(),
        op(0xCF, Dcp, Absolute, 6).undocumented(),
        op(0xDF, Dcp, AbsoluteX, 7).undocumented(),
        op(0xDB, Dcp, AbsoluteY, 7).undocumented(),
        op(0xC3, Dcp, IndirectX, 8).undocumented(),
        op(0xD3, Dcp, IndirectY, 8).undocumented(),
        op(0xE7, Isc, ZeroPage, 5).undocumented(),
        op(0xF7, Isc, ZeroPageX, 6).undocumented(),
        op(0xEF, Isc, Absolute, 6).undocumented(),
        op(0xFF, Isc, AbsoluteX, 7).undocumented(),
        op(0xFB, Isc, AbsoluteY, 7).undocumented(),
        op(0xE3, Isc, IndirectX, 8).undocumented(),
        op(0xF3, Isc, IndirectY, 8).undocumented(),
        op(0x07, Slo, ZeroPage, 5).undocumented(),
        op(0x17, Slo, ZeroPageX, 6).undocumented(),
        op(0x0F, Slo, Absolute, 6).undocumented(),
        op(0x1F, Slo, AbsoluteX, 7).undocumented(),
        op(0x1B, Slo, AbsoluteY, 7).undocumented(),
        op(0x03, Slo, IndirectX, 8).undocumented(),
        op(0x13, Slo, IndirectY, 8).undocumented(),
        op(0x27, Rla, ZeroPage, 5).undocumented(),
        op(0x37, Rla, ZeroPageX, 6).undocumented(),
        op(0x2F, Rla, Absolute, 6).undocumented(),
        op(0x3F, Rla, AbsoluteX, 7).undocumented(),
        op(0x3B, Rla, AbsoluteY, 7).undocumented(),
        op(0x23, Rla, IndirectX, 8).undocumented(),
        op(0x33, Rla, IndirectY, 8).undocumented(),
        op(0x47, Sre, ZeroPage, 5).undocumented(),
        op(0x57, Sre, ZeroPageX, 6).undocumented(),
        op(0x4F, Sre, Absolute, 6).undocumented(),
        op(0x5F, Sre, AbsoluteX, 7).undocumented(),
        op(0x5B, Sre, AbsoluteY, 7).undocumented(),
        op(0x43, Sre, IndirectX, 8).undocumented(),
        op(0x53, Sre, IndirectY, 8).undocumented(),
        op(0x67, Rra, ZeroPage, 5).undocumented(),
        op(0x77, Rra, ZeroPageX, 6).undocumented(),
        op(0x6F, Rra, Absolute, 6).undocumented(),
        op(0x7F, Rra, AbsoluteX, 7).undocumented(),
        op(0x7B, Rra, AbsoluteY, 7).undocumented(),
        op(0x63, Rra, IndirectX, 8).undocumented(),
        op(0x73, Rra, IndirectY, 8).undocumented(),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_opcode_count() {
        let documented = instructions().filter(|i| !i.illegal).count();
        assert_eq!(documented, 151);
        assert_eq!(instructions().count(), 151 + 80);
    }

    #[test]
    fn test_decode_round_trips_opcode() {
        for instr in instructions() {
            assert_eq!(decode(instr.opcode), Some(instr));
            assert!((1..=3).contains(&instr.size));
        }
    }

    #[test]
    fn test_jam_opcodes_are_undefined() {
        for opcode in [0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2] {
            assert!(decode(opcode).is_none(), "{:02X} should not decode", opcode);
        }
        // Unstable undocumented opcodes stay out of the table
        assert!(decode(0x8B).is_none());
        assert!(decode(0xAB).is_none());
    }

    #[test]
    fn test_lookup_prefers_documented_encoding() {
        assert_eq!(lookup(Mnemonic::Nop, AddressingMode::Implied).unwrap().opcode, 0xEA);
        assert_eq!(lookup(Mnemonic::Sbc, AddressingMode::Immediate).unwrap().opcode, 0xE9);
        assert_eq!(lookup(Mnemonic::Lda, AddressingMode::IndirectY).unwrap().opcode, 0xB1);
        assert!(lookup(Mnemonic::Sta, AddressingMode::Immediate).is_none());
    }

    #[test]
    fn test_instruction_shape() {
        let jmp = decode(0x6C).unwrap();
        assert_eq!(jmp.mnemonic, Mnemonic::Jmp);
        assert_eq!(jmp.mode, AddressingMode::Indirect);
        assert_eq!(jmp.size, 3);
        assert_eq!(jmp.cycles, 5);

        let lda = decode(0xBD).unwrap();
        assert!(lda.page_penalty);
        assert!(!decode(0x9D).unwrap().page_penalty);

        let dcp = decode(0xC7).unwrap();
        assert!(dcp.illegal);
        assert_eq!(dcp.mnemonic.to_string(), "DCP");
    }
}
