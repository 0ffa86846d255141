use bitflags::bitflags;

use crate::debug_flags;
use crate::error::{BusError, CpuError};

pub mod opcodes;

pub use opcodes::{decode, lookup, AddressingMode, Instruction, Mnemonic};


bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b00000001;
        const ZERO = 0b00000010;
        const INTERRUPT_DISABLE = 0b00000100;
        const DECIMAL = 0b00001000;
        const BREAK = 0b00010000;
        const UNUSED = 0b00100000;
        const OVERFLOW = 0b01000000;
        const NEGATIVE = 0b10000000;
    }
}

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_BASE: u16 = 0x0100;
const INTERRUPT_CYCLES: u8 = 7;
const POWER_UP_STATUS: u8 = 0x24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
    Reset,
}

impl Interrupt {
    pub fn vector(self) -> u16 {
        match self {
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
            Interrupt::Reset => RESET_VECTOR,
        }
    }

    fn priority(self) -> u8 {
        match self {
            Interrupt::Reset => 2,
            Interrupt::Nmi => 1,
            Interrupt::Irq => 0,
        }
    }
}

/// The CPU's view of its address space.
pub trait CpuBus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError>;
    fn write(&mut self, addr: u16, data: u8) -> Result<(), BusError>;

    /// Side-effect free read for tracing and disassembly.
    fn peek(&mut self, addr: u16) -> Option<u8> {
        self.read(addr).ok()
    }
}

/// Where an instruction's operand lives once its addressing mode is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    Accumulator,
    Address(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOperand {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl ResolvedOperand {
    fn at(addr: u16) -> Self {
        ResolvedOperand {
            operand: Operand::Address(addr),
            page_crossed: false,
        }
    }

    fn indexed(base: u16, addr: u16) -> Self {
        ResolvedOperand {
            operand: Operand::Address(addr),
            page_crossed: (base & 0xFF00) != (addr & 0xFF00),
        }
    }
}

pub struct Cpu {
    pub a: u8,      // Accumulator
    pub x: u8,      // X register
    pub y: u8,      // Y register
    pub sp: u8,     // Stack pointer
    pub pc: u16,    // Program counter
    pub status: StatusFlags,
    cycles: u64,
    pending: Option<Interrupt>,
    // Start of the instruction being executed, for fault reports
    instr_pc: u16,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: StatusFlags::from_bits_truncate(POWER_UP_STATUS),
            cycles: 0,
            pending: None,
            instr_pc: 0,
        }
    }

    /// Cold start: clear the registers and latch a reset. The next `step`
    /// services it, leaving SP at $FD and PC at the reset vector.
    pub fn power_up(&mut self) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0;
        self.status = StatusFlags::from_bits_truncate(POWER_UP_STATUS);
        self.cycles = 0;
        self.pending = Some(Interrupt::Reset);
    }

    pub fn reset(&mut self) {
        self.raise(Interrupt::Reset);
    }

    /// Latch an interrupt request. A pending request of higher priority
    /// is kept (Reset > NMI > IRQ).
    pub fn raise(&mut self, interrupt: Interrupt) {
        match self.pending {
            Some(current) if current.priority() >= interrupt.priority() => {}
            _ => self.pending = Some(interrupt),
        }
    }

    pub fn pending_interrupt(&self) -> Option<Interrupt> {
        self.pending
    }

    /// Total cycles since power-up.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Charge cycles the CPU spent halted (OAM DMA).
    pub fn stall(&mut self, cycles: u32) {
        self.cycles += cycles as u64;
    }

    pub fn step(&mut self, bus: &mut dyn CpuBus) -> Result<u8, CpuError> {
        self.instr_pc = self.pc;

        if let Some(interrupt) = self.pending {
            let masked = interrupt == Interrupt::Irq
                && self.status.contains(StatusFlags::INTERRUPT_DISABLE);
            if !masked {
                self.pending = None;
                self.service_interrupt(bus, interrupt)?;
                self.cycles += INTERRUPT_CYCLES as u64;
                return Ok(INTERRUPT_CYCLES);
            }
        }

        let opcode = self.bus_read(bus, self.pc)?;
        let instr = decode(opcode).ok_or(CpuError::UnknownOpcode {
            opcode,
            pc: self.instr_pc,
        })?;

        if debug_flags::trace() {
            log::trace!(
                "{:04X}  {:02X}  {:<4} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
                self.pc,
                opcode,
                instr.mnemonic.name(),
                self.a,
                self.x,
                self.y,
                self.status.bits(),
                self.sp,
                self.cycles
            );
        }

        self.pc = self.pc.wrapping_add(1);
        let resolved = self.resolve_operand(bus, instr)?;

        let mut cycles = instr.cycles;
        if instr.page_penalty && resolved.page_crossed {
            cycles += 1;
        }
        cycles += self.execute(bus, instr, resolved.operand)?;

        self.cycles += cycles as u64;
        Ok(cycles)
    }

    fn service_interrupt(
        &mut self,
        bus: &mut dyn CpuBus,
        interrupt: Interrupt,
    ) -> Result<(), CpuError> {
        match interrupt {
            // Reset runs the push sequence with writes suppressed
            Interrupt::Reset => self.sp = self.sp.wrapping_sub(3),
            Interrupt::Nmi | Interrupt::Irq => {
                self.push_word(bus, self.pc)?;
                let flags = (self.status - StatusFlags::BREAK) | StatusFlags::UNUSED;
                self.push(bus, flags.bits())?;
            }
        }
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);
        self.pc = self.read_word(bus, interrupt.vector())?;
        Ok(())
    }

    /// Consume the operand bytes of `instr` at PC and compute where its
    /// operand lives. PC must already point past the opcode byte.
    pub fn resolve_operand(
        &mut self,
        bus: &mut dyn CpuBus,
        instr: &Instruction,
    ) -> Result<ResolvedOperand, CpuError> {
        let resolved = match instr.mode {
            AddressingMode::Implied => ResolvedOperand {
                operand: Operand::Implied,
                page_crossed: false,
            },
            AddressingMode::Accumulator => ResolvedOperand {
                operand: Operand::Accumulator,
                page_crossed: false,
            },
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                ResolvedOperand::at(addr)
            }
            AddressingMode::ZeroPage => {
                let zp = self.fetch_byte(bus)?;
                ResolvedOperand::at(zp as u16)
            }
            AddressingMode::ZeroPageX => {
                let zp = self.fetch_byte(bus)?.wrapping_add(self.x);
                ResolvedOperand::at(zp as u16)
            }
            AddressingMode::ZeroPageY => {
                let zp = self.fetch_byte(bus)?.wrapping_add(self.y);
                ResolvedOperand::at(zp as u16)
            }
            AddressingMode::Absolute => {
                let addr = self.fetch_word(bus)?;
                ResolvedOperand::at(addr)
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus)?;
                ResolvedOperand::indexed(base, base.wrapping_add(self.x as u16))
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus)?;
                ResolvedOperand::indexed(base, base.wrapping_add(self.y as u16))
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word(bus)?;
                // The high byte is fetched without carrying into the page:
                // JMP ($30FF) reads $30FF and $3000.
                let lo = self.bus_read(bus, ptr)? as u16;
                let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let hi = self.bus_read(bus, hi_addr)? as u16;
                ResolvedOperand::at((hi << 8) | lo)
            }
            AddressingMode::IndirectX => {
                let zp = self.fetch_byte(bus)?.wrapping_add(self.x);
                let addr = self.read_zero_page_word(bus, zp)?;
                ResolvedOperand::at(addr)
            }
            AddressingMode::IndirectY => {
                let zp = self.fetch_byte(bus)?;
                let base = self.read_zero_page_word(bus, zp)?;
                ResolvedOperand::indexed(base, base.wrapping_add(self.y as u16))
            }
            AddressingMode::Relative => {
                let offset = self.fetch_byte(bus)? as i8;
                ResolvedOperand::at(self.pc.wrapping_add(offset as u16))
            }
        };
        Ok(resolved)
    }

    /// Run the semantics of `instr`. Returns cycles beyond the table cost
    /// (taken branches only).
    fn execute(
        &mut self,
        bus: &mut dyn CpuBus,
        instr: &Instruction,
        operand: Operand,
    ) -> Result<u8, CpuError> {
        match instr.mnemonic {
            Mnemonic::Adc => {
                let value = self.read_operand(bus, operand)?;
                self.adc(value);
            }
            Mnemonic::Sbc => {
                let value = self.read_operand(bus, operand)?;
                self.adc(!value);
            }
            Mnemonic::And => {
                let value = self.read_operand(bus, operand)?;
                self.a &= value;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Ora => {
                let value = self.read_operand(bus, operand)?;
                self.a |= value;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Eor => {
                let value = self.read_operand(bus, operand)?;
                self.a ^= value;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Asl => {
                self.modify(bus, operand, Cpu::asl)?;
            }
            Mnemonic::Lsr => {
                self.modify(bus, operand, Cpu::lsr)?;
            }
            Mnemonic::Rol => {
                self.modify(bus, operand, Cpu::rol)?;
            }
            Mnemonic::Ror => {
                self.modify(bus, operand, Cpu::ror)?;
            }
            Mnemonic::Inc => {
                self.modify(bus, operand, Cpu::increment)?;
            }
            Mnemonic::Dec => {
                self.modify(bus, operand, Cpu::decrement)?;
            }

            Mnemonic::Bcc => return Ok(self.branch(operand, !self.status.contains(StatusFlags::CARRY))),
            Mnemonic::Bcs => return Ok(self.branch(operand, self.status.contains(StatusFlags::CARRY))),
            Mnemonic::Bne => return Ok(self.branch(operand, !self.status.contains(StatusFlags::ZERO))),
            Mnemonic::Beq => return Ok(self.branch(operand, self.status.contains(StatusFlags::ZERO))),
            Mnemonic::Bpl => return Ok(self.branch(operand, !self.status.contains(StatusFlags::NEGATIVE))),
            Mnemonic::Bmi => return Ok(self.branch(operand, self.status.contains(StatusFlags::NEGATIVE))),
            Mnemonic::Bvc => return Ok(self.branch(operand, !self.status.contains(StatusFlags::OVERFLOW))),
            Mnemonic::Bvs => return Ok(self.branch(operand, self.status.contains(StatusFlags::OVERFLOW))),

            Mnemonic::Bit => {
                let value = self.read_operand(bus, operand)?;
                self.status.set(StatusFlags::ZERO, self.a & value == 0);
                self.status.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
                self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
            }
            Mnemonic::Cmp => {
                let value = self.read_operand(bus, operand)?;
                self.compare(self.a, value);
            }
            Mnemonic::Cpx => {
                let value = self.read_operand(bus, operand)?;
                self.compare(self.x, value);
            }
            Mnemonic::Cpy => {
                let value = self.read_operand(bus, operand)?;
                self.compare(self.y, value);
            }

            Mnemonic::Brk => {
                // The byte after BRK is padding; the return address skips it
                self.push_word(bus, self.pc.wrapping_add(1))?;
                let flags = self.status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push(bus, flags.bits())?;
                self.status.insert(StatusFlags::INTERRUPT_DISABLE);
                self.pc = self.read_word(bus, IRQ_VECTOR)?;
            }
            Mnemonic::Jmp => {
                self.pc = Self::address(operand);
            }
            Mnemonic::Jsr => {
                self.push_word(bus, self.pc.wrapping_sub(1))?;
                self.pc = Self::address(operand);
            }
            Mnemonic::Rts => {
                self.pc = self.pull_word(bus)?.wrapping_add(1);
            }
            Mnemonic::Rti => {
                let flags = self.pull(bus)?;
                self.restore_status(flags);
                self.pc = self.pull_word(bus)?;
            }

            Mnemonic::Pha => self.push(bus, self.a)?,
            Mnemonic::Php => {
                let flags = self.status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push(bus, flags.bits())?;
            }
            Mnemonic::Pla => {
                self.a = self.pull(bus)?;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Plp => {
                let flags = self.pull(bus)?;
                self.restore_status(flags);
            }

            Mnemonic::Clc => self.status.remove(StatusFlags::CARRY),
            Mnemonic::Cld => self.status.remove(StatusFlags::DECIMAL),
            Mnemonic::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Mnemonic::Clv => self.status.remove(StatusFlags::OVERFLOW),
            Mnemonic::Sec => self.status.insert(StatusFlags::CARRY),
            Mnemonic::Sed => self.status.insert(StatusFlags::DECIMAL),
            Mnemonic::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),

            Mnemonic::Lda => {
                self.a = self.read_operand(bus, operand)?;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Ldx => {
                self.x = self.read_operand(bus, operand)?;
                self.set_zero_negative_flags(self.x);
            }
            Mnemonic::Ldy => {
                self.y = self.read_operand(bus, operand)?;
                self.set_zero_negative_flags(self.y);
            }
            Mnemonic::Sta => self.write_operand(bus, operand, self.a)?,
            Mnemonic::Stx => self.write_operand(bus, operand, self.x)?,
            Mnemonic::Sty => self.write_operand(bus, operand, self.y)?,

            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_zero_negative_flags(self.x);
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_zero_negative_flags(self.y);
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_zero_negative_flags(self.x);
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_zero_negative_flags(self.y);
            }

            Mnemonic::Tax => {
                self.x = self.a;
                self.set_zero_negative_flags(self.x);
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.set_zero_negative_flags(self.y);
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.set_zero_negative_flags(self.x);
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Tya => {
                self.a = self.y;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Txs => self.sp = self.x,

            Mnemonic::Nop => {
                // Undocumented NOPs with an operand still perform the read
                if let Operand::Address(addr) = operand {
                    self.bus_read(bus, addr)?;
                }
            }

            Mnemonic::Lax => {
                let value = self.read_operand(bus, operand)?;
                self.a = value;
                self.x = value;
                self.set_zero_negative_flags(value);
            }
            Mnemonic::Sax => self.write_operand(bus, operand, self.a & self.x)?,
            Mnemonic::Dcp => {
                let value = self.modify(bus, operand, Cpu::decrement)?;
                self.compare(self.a, value);
            }
            Mnemonic::Isc => {
                let value = self.modify(bus, operand, Cpu::increment)?;
                self.adc(!value);
            }
            Mnemonic::Slo => {
                let value = self.modify(bus, operand, Cpu::asl)?;
                self.a |= value;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Rla => {
                let value = self.modify(bus, operand, Cpu::rol)?;
                self.a &= value;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Sre => {
                let value = self.modify(bus, operand, Cpu::lsr)?;
                self.a ^= value;
                self.set_zero_negative_flags(self.a);
            }
            Mnemonic::Rra => {
                let value = self.modify(bus, operand, Cpu::ror)?;
                self.adc(value);
            }
        }
        Ok(0)
    }

    fn bus_read(&self, bus: &mut dyn CpuBus, addr: u16) -> Result<u8, CpuError> {
        bus.read(addr).map_err(|source| CpuError::Bus {
            pc: self.instr_pc,
            source,
        })
    }

    fn bus_write(&self, bus: &mut dyn CpuBus, addr: u16, data: u8) -> Result<(), CpuError> {
        bus.write(addr, data).map_err(|source| CpuError::Bus {
            pc: self.instr_pc,
            source,
        })
    }

    fn fetch_byte(&mut self, bus: &mut dyn CpuBus) -> Result<u8, CpuError> {
        let byte = self.bus_read(bus, self.pc)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(byte)
    }

    fn fetch_word(&mut self, bus: &mut dyn CpuBus) -> Result<u16, CpuError> {
        let lo = self.fetch_byte(bus)? as u16;
        let hi = self.fetch_byte(bus)? as u16;
        Ok((hi << 8) | lo)
    }

    fn read_word(&self, bus: &mut dyn CpuBus, addr: u16) -> Result<u16, CpuError> {
        let lo = self.bus_read(bus, addr)? as u16;
        let hi = self.bus_read(bus, addr.wrapping_add(1))? as u16;
        Ok((hi << 8) | lo)
    }

    // Pointer fetch that stays inside page 0
    fn read_zero_page_word(&self, bus: &mut dyn CpuBus, zp: u8) -> Result<u16, CpuError> {
        let lo = self.bus_read(bus, zp as u16)? as u16;
        let hi = self.bus_read(bus, zp.wrapping_add(1) as u16)? as u16;
        Ok((hi << 8) | lo)
    }

    fn address(operand: Operand) -> u16 {
        match operand {
            Operand::Address(addr) => addr,
            Operand::Implied | Operand::Accumulator => 0,
        }
    }

    fn read_operand(&mut self, bus: &mut dyn CpuBus, operand: Operand) -> Result<u8, CpuError> {
        match operand {
            Operand::Accumulator => Ok(self.a),
            Operand::Address(addr) => self.bus_read(bus, addr),
            Operand::Implied => Ok(0),
        }
    }

    fn write_operand(
        &mut self,
        bus: &mut dyn CpuBus,
        operand: Operand,
        value: u8,
    ) -> Result<(), CpuError> {
        match operand {
            Operand::Accumulator => {
                self.a = value;
                Ok(())
            }
            Operand::Address(addr) => self.bus_write(bus, addr, value),
            Operand::Implied => Ok(()),
        }
    }

    /// Read-modify-write on the accumulator or a memory cell. Returns the
    /// value written back.
    fn modify(
        &mut self,
        bus: &mut dyn CpuBus,
        operand: Operand,
        op: fn(&mut Cpu, u8) -> u8,
    ) -> Result<u8, CpuError> {
        let value = self.read_operand(bus, operand)?;
        let result = op(self, value);
        self.write_operand(bus, operand, result)?;
        Ok(result)
    }

    fn push(&mut self, bus: &mut dyn CpuBus, value: u8) -> Result<(), CpuError> {
        let addr = STACK_BASE | self.sp as u16;
        self.bus_write(bus, addr, value)?;
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    fn pull(&mut self, bus: &mut dyn CpuBus) -> Result<u8, CpuError> {
        self.sp = self.sp.wrapping_add(1);
        let addr = STACK_BASE | self.sp as u16;
        self.bus_read(bus, addr)
    }

    fn push_word(&mut self, bus: &mut dyn CpuBus, value: u16) -> Result<(), CpuError> {
        self.push(bus, (value >> 8) as u8)?;
        self.push(bus, value as u8)
    }

    fn pull_word(&mut self, bus: &mut dyn CpuBus) -> Result<u16, CpuError> {
        let lo = self.pull(bus)? as u16;
        let hi = self.pull(bus)? as u16;
        Ok((hi << 8) | lo)
    }

    // PLP/RTI: B does not exist in the register, bit 5 always reads set
    fn restore_status(&mut self, value: u8) {
        self.status = (StatusFlags::from_bits_truncate(value) - StatusFlags::BREAK)
            | StatusFlags::UNUSED;
    }

    fn set_zero_negative_flags(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }

    fn branch(&mut self, operand: Operand, condition: bool) -> u8 {
        if !condition {
            return 0;
        }
        let target = Self::address(operand);
        let extra = if (self.pc & 0xFF00) != (target & 0xFF00) { 2 } else { 1 };
        self.pc = target;
        extra
    }

    // Binary only: the 2A03 has no decimal mode
    fn adc(&mut self, value: u8) {
        let carry = if self.status.contains(StatusFlags::CARRY) { 1 } else { 0 };
        let result = self.a as u16 + value as u16 + carry;

        self.status.set(StatusFlags::CARRY, result > 0xFF);
        self.status.set(
            StatusFlags::OVERFLOW,
            !(self.a ^ value) & (self.a ^ result as u8) & 0x80 != 0,
        );

        self.a = result as u8;
        self.set_zero_negative_flags(self.a);
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.status.set(StatusFlags::CARRY, reg >= value);
        self.status.set(StatusFlags::ZERO, reg == value);
        self.status.set(StatusFlags::NEGATIVE, result & 0x80 != 0);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        let result = value << 1;
        self.set_zero_negative_flags(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        let result = value >> 1;
        self.set_zero_negative_flags(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = self.status.contains(StatusFlags::CARRY) as u8;
        self.status.set(StatusFlags::CARRY, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.set_zero_negative_flags(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = self.status.contains(StatusFlags::CARRY) as u8;
        self.status.set(StatusFlags::CARRY, value & 0x01 != 0);
        let result = (value >> 1) | (carry_in << 7);
        self.set_zero_negative_flags(result);
        result
    }

    fn increment(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_zero_negative_flags(result);
        result
    }

    fn decrement(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_zero_negative_flags(result);
        result
    }
}
