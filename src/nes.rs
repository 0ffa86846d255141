//! The console: CPU, PPU, work RAM, controllers and the cartridge slot,
//! wired together through the CPU and PPU buses.
//!
//! CPU memory map:
//!
//! | range         | device                                   |
//! |---------------|------------------------------------------|
//! | $0000-$1FFF   | 2 KiB work RAM, mirrored every $800      |
//! | $2000-$3FFF   | PPU registers, mirrored every 8 bytes    |
//! | $4000-$4013   | APU channels (reads 0, writes dropped)   |
//! | $4014         | OAM DMA                                  |
//! | $4015         | APU status (reads 0, writes dropped)     |
//! | $4016/$4017   | controllers; $4017 writes go to the APU  |
//! | $4018-$401F   | test mode (writes dropped)               |
//! | $6000-$7FFF   | cartridge PRG RAM                        |
//! | $8000-$FFFF   | cartridge PRG ROM (writes dropped)       |
//!
//! Anything else is unmapped and faults.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::{Cpu, Interrupt};
use crate::debug_flags;
use crate::error::NesError;
use crate::input::InputPorts;
use crate::memory::Memory;
use crate::ppu::memory::{map_ppu_bus, PALETTE_SIZE, VRAM_SIZE};
use crate::ppu::Ppu;
use crate::trace;

pub const RAM_SIZE: usize = 0x800;
pub const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;
const OAM_DMA_CYCLES: u32 = 513;

pub struct Nes {
    cpu: Cpu,
    cpu_bus: Bus,
    ppu: Rc<RefCell<Ppu>>,
    ram: Rc<RefCell<Memory>>,
    vram: Rc<RefCell<Memory>>,
    palette: Rc<RefCell<Memory>>,
    input: Rc<RefCell<InputPorts>>,
    cartridge: Option<Rc<RefCell<Cartridge>>>,
    // Page written to $4014, serviced after the writing instruction
    dma_request: Rc<Cell<Option<u8>>>,
}

impl Default for Nes {
    fn default() -> Self {
        Self::new()
    }
}

impl Nes {
    pub fn new() -> Self {
        let mut nes = Nes {
            cpu: Cpu::new(),
            cpu_bus: Bus::new("cpu"),
            ppu: Rc::new(RefCell::new(Ppu::new())),
            ram: Rc::new(RefCell::new(Memory::new(RAM_SIZE))),
            vram: Rc::new(RefCell::new(Memory::new(VRAM_SIZE))),
            palette: Rc::new(RefCell::new(Memory::new(PALETTE_SIZE))),
            input: Rc::new(RefCell::new(InputPorts::new())),
            cartridge: None,
            dma_request: Rc::new(Cell::new(None)),
        };
        nes.wire();
        nes
    }

    /// Parse an iNES image and plug it in. On error the previous cartridge
    /// (if any) stays inserted.
    pub fn insert_cartridge(&mut self, bytes: &[u8]) -> Result<(), NesError> {
        let cartridge = Cartridge::parse(bytes).map_err(|e| {
            log::error!("cartridge rejected: {}", e);
            NesError::from(e)
        })?;
        self.insert(cartridge);
        Ok(())
    }

    pub fn insert(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(Rc::new(RefCell::new(cartridge)));
        self.wire();
    }

    pub fn power_up(&mut self) {
        *self.ram.borrow_mut() = Memory::new(RAM_SIZE);
        self.ppu.borrow_mut().power_up();
        self.dma_request.set(None);
        self.cpu.power_up();
    }

    pub fn reset(&mut self) {
        self.ppu.borrow_mut().reset();
        self.dma_request.set(None);
        self.cpu.reset();
    }

    /// Run one CPU instruction (or interrupt entry) and the matching PPU
    /// dots. Returns CPU cycles, including any OAM DMA stall.
    pub fn step(&mut self) -> Result<u32, NesError> {
        let mut cycles = match self.cpu.step(&mut self.cpu_bus) {
            Ok(cycles) => cycles as u32,
            Err(e) => {
                log::error!("{}", e);
                return Err(e.into());
            }
        };

        if let Some(page) = self.dma_request.take() {
            cycles += match self.oam_dma(page) {
                Ok(stall) => stall,
                Err(e) => {
                    log::error!("{}", e);
                    return Err(e);
                }
            };
        }

        let mut ppu = self.ppu.borrow_mut();
        for _ in 0..cycles * PPU_DOTS_PER_CPU_CYCLE {
            ppu.tick();
        }
        if ppu.poll_nmi() {
            self.cpu.raise(Interrupt::Nmi);
        }

        Ok(cycles)
    }

    /// Step until the PPU starts a new frame. Returns the CPU cycles spent.
    pub fn run_frame(&mut self) -> Result<u64, NesError> {
        let frame = self.ppu.borrow().frame();
        let mut cycles = 0u64;
        while self.ppu.borrow().frame() == frame {
            cycles += self.step()? as u64;
        }
        Ok(cycles)
    }

    // Copy 256 bytes from $XX00 into OAM; returns the stall length
    fn oam_dma(&mut self, page: u8) -> Result<u32, NesError> {
        let base = (page as u16) << 8;
        let mut data = [0u8; 256];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self
                .cpu_bus
                .read(base | i as u16)
                .map_err(|source| NesError::Dma { page, source })?;
        }

        let mut ppu = self.ppu.borrow_mut();
        for &byte in data.iter() {
            ppu.write_oam(byte);
        }

        // One alignment cycle when the write landed on an odd cycle
        let stall = OAM_DMA_CYCLES + (self.cpu.cycles() % 2) as u32;
        self.cpu.stall(stall);
        if debug_flags::dma() {
            log::debug!("OAM DMA from ${:04X}, {} cycle stall", base, stall);
        }
        Ok(stall)
    }

    /// nestest-format trace line for the instruction at PC.
    pub fn trace_line(&mut self) -> String {
        let position = {
            let ppu = self.ppu.borrow();
            (ppu.scanline(), ppu.dot())
        };
        trace::format_line(&self.cpu, &mut self.cpu_bus, position)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn cpu_bus_mut(&mut self) -> &mut Bus {
        &mut self.cpu_bus
    }

    pub fn ppu(&self) -> Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    pub fn ppu_mut(&self) -> RefMut<'_, Ppu> {
        self.ppu.borrow_mut()
    }

    pub fn input_mut(&self) -> RefMut<'_, InputPorts> {
        self.input.borrow_mut()
    }

    pub fn ram(&self) -> Ref<'_, Memory> {
        self.ram.borrow()
    }

    pub fn cartridge(&self) -> Option<Ref<'_, Cartridge>> {
        self.cartridge.as_ref().map(|c| c.borrow())
    }

    fn wire(&mut self) {
        self.wire_cpu_bus();
        let mut ppu = self.ppu.borrow_mut();
        map_ppu_bus(
            ppu.bus_mut(),
            self.cartridge.as_ref(),
            &self.vram,
            &self.palette,
        );
    }

    fn wire_cpu_bus(&mut self) {
        let bus = &mut self.cpu_bus;
        bus.clear();

        let ram = Rc::clone(&self.ram);
        bus.map_read("ram", 0x0000..=0x1FFF, move |addr| {
            Ok(ram.borrow().read((addr & 0x07FF) as usize))
        });
        let ram = Rc::clone(&self.ram);
        bus.map_write("ram", 0x0000..=0x1FFF, move |addr, value| {
            ram.borrow_mut().write((addr & 0x07FF) as usize, value);
            Ok(())
        });

        let ppu = Rc::clone(&self.ppu);
        bus.map_volatile_read("ppu", 0x2000..=0x3FFF, move |addr| {
            ppu.borrow_mut().read_register(addr & 0x0007)
        });
        let ppu = Rc::clone(&self.ppu);
        bus.map_write("ppu", 0x2000..=0x3FFF, move |addr, value| {
            ppu.borrow_mut().write_register(addr & 0x0007, value)
        });

        // Audio is not emulated
        bus.map_read("apu", 0x4000..=0x4015, |_| Ok(0));
        bus.map_write("apu", 0x4000..=0x4013, |_, _| Ok(()));
        bus.map_write("apu", 0x4015..=0x4015, |_, _| Ok(()));
        bus.map_write("apu", 0x4017..=0x4017, |_, _| Ok(()));
        bus.map_write("test-mode", 0x4018..=0x401F, |_, _| Ok(()));

        let dma = Rc::clone(&self.dma_request);
        bus.map_write("oam-dma", 0x4014..=0x4014, move |_, value| {
            dma.set(Some(value));
            Ok(())
        });

        let input = Rc::clone(&self.input);
        bus.map_volatile_read("joypad", 0x4016..=0x4017, move |addr| {
            Ok(input.borrow_mut().read(addr & 1))
        });
        let input = Rc::clone(&self.input);
        bus.map_write("joypad", 0x4016..=0x4016, move |_, value| {
            input.borrow_mut().write_strobe(value);
            Ok(())
        });

        if let Some(cartridge) = &self.cartridge {
            let cart = Rc::clone(cartridge);
            bus.map_read("prg-ram", 0x6000..=0x7FFF, move |addr| {
                Ok(cart.borrow().read_prg_ram(addr))
            });
            let cart = Rc::clone(cartridge);
            bus.map_write("prg-ram", 0x6000..=0x7FFF, move |addr, value| {
                cart.borrow_mut().write_prg_ram(addr, value);
                Ok(())
            });
            let cart = Rc::clone(cartridge);
            bus.map_read("prg-rom", 0x8000..=0xFFFF, move |addr| {
                Ok(cart.borrow().read_prg(addr))
            });
            bus.map_write("prg-rom", 0x8000..=0xFFFF, |addr, value| {
                log::trace!("write ${:02X} to PRG ROM at ${:04X} dropped", value, addr);
                Ok(())
            });
        }
    }
}
