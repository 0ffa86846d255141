//! Route-table bus.
//!
//! Each address space (the CPU's 16-bit space, the PPU's 14-bit space) gets
//! its own `Bus`. Reads and writes are dispatched through two independent,
//! ordered route lists; the first route whose range contains the address
//! handles the access. The bus owns only the handler closures: the memory
//! and devices behind them are shared handles owned by the console.
//!
//! Mirroring is the handler's job (e.g. `addr & 0x07FF` for work RAM), never
//! expressed by registering overlapping ranges.

use std::fmt;
use std::ops::RangeInclusive;

use crate::cpu::CpuBus;
use crate::error::{Access, BusError};

pub type ReadHandler = Box<dyn FnMut(u16) -> Result<u8, BusError>>;
pub type WriteHandler = Box<dyn FnMut(u16, u8) -> Result<(), BusError>>;

struct ReadRoute {
    name: &'static str,
    range: RangeInclusive<u16>,
    // Reading has side effects (PPU status, controller shift register).
    volatile: bool,
    handler: ReadHandler,
}

struct WriteRoute {
    name: &'static str,
    range: RangeInclusive<u16>,
    handler: WriteHandler,
}

pub struct Bus {
    name: &'static str,
    reads: Vec<ReadRoute>,
    writes: Vec<WriteRoute>,
}

fn overlaps(a: &RangeInclusive<u16>, b: &RangeInclusive<u16>) -> bool {
    a.start() <= b.end() && b.start() <= a.end()
}

impl Bus {
    pub fn new(name: &'static str) -> Self {
        Bus {
            name,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Route side-effect free reads of `range` to `handler`.
    pub fn map_read<F>(&mut self, name: &'static str, range: RangeInclusive<u16>, handler: F)
    where
        F: FnMut(u16) -> Result<u8, BusError> + 'static,
    {
        self.push_read(name, range, false, Box::new(handler));
    }

    /// Route reads whose act of reading changes device state.
    pub fn map_volatile_read<F>(
        &mut self,
        name: &'static str,
        range: RangeInclusive<u16>,
        handler: F,
    ) where
        F: FnMut(u16) -> Result<u8, BusError> + 'static,
    {
        self.push_read(name, range, true, Box::new(handler));
    }

    pub fn map_write<F>(&mut self, name: &'static str, range: RangeInclusive<u16>, handler: F)
    where
        F: FnMut(u16, u8) -> Result<(), BusError> + 'static,
    {
        if let Some(existing) = self.writes.iter().find(|r| overlaps(&r.range, &range)) {
            log::warn!(
                "{} bus: write route {} {:04X}-{:04X} is shadowed by {} {:04X}-{:04X}",
                self.name,
                name,
                range.start(),
                range.end(),
                existing.name,
                existing.range.start(),
                existing.range.end()
            );
        }
        self.writes.push(WriteRoute {
            name,
            range,
            handler: Box::new(handler),
        });
    }

    fn push_read(
        &mut self,
        name: &'static str,
        range: RangeInclusive<u16>,
        volatile: bool,
        handler: ReadHandler,
    ) {
        if let Some(existing) = self.reads.iter().find(|r| overlaps(&r.range, &range)) {
            log::warn!(
                "{} bus: read route {} {:04X}-{:04X} is shadowed by {} {:04X}-{:04X}",
                self.name,
                name,
                range.start(),
                range.end(),
                existing.name,
                existing.range.start(),
                existing.range.end()
            );
        }
        self.reads.push(ReadRoute {
            name,
            range,
            volatile,
            handler,
        });
    }

    /// Drop every route, e.g. before rewiring for a new cartridge.
    pub fn clear(&mut self) {
        self.reads.clear();
        self.writes.clear();
    }

    pub fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        match self.reads.iter_mut().find(|r| r.range.contains(&addr)) {
            Some(route) => (route.handler)(addr),
            None => Err(BusError::Unmapped {
                addr,
                access: Access::Read,
            }),
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match self.writes.iter_mut().find(|r| r.range.contains(&addr)) {
            Some(route) => (route.handler)(addr, value),
            None => Err(BusError::Unmapped {
                addr,
                access: Access::Write,
            }),
        }
    }

    /// Read without disturbing hardware. `None` for volatile or unmapped
    /// locations.
    pub fn peek(&mut self, addr: u16) -> Option<u8> {
        let route = self.reads.iter_mut().find(|r| r.range.contains(&addr))?;
        if route.volatile {
            return None;
        }
        (route.handler)(addr).ok()
    }

    /// Name of the route that would serve a read of `addr`.
    pub fn read_route_name(&self, addr: u16) -> Option<&'static str> {
        self.reads
            .iter()
            .find(|r| r.range.contains(&addr))
            .map(|r| r.name)
    }
}

impl CpuBus for Bus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        Bus::read(self, addr)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<(), BusError> {
        Bus::write(self, addr, data)
    }

    fn peek(&mut self, addr: u16) -> Option<u8> {
        Bus::peek(self, addr)
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reads: Vec<_> = self
            .reads
            .iter()
            .map(|r| format!("{} {:04X}-{:04X}", r.name, r.range.start(), r.range.end()))
            .collect();
        let writes: Vec<_> = self
            .writes
            .iter()
            .map(|r| format!("{} {:04X}-{:04X}", r.name, r.range.start(), r.range.end()))
            .collect();
        f.debug_struct("Bus")
            .field("name", &self.name)
            .field("reads", &reads)
            .field("writes", &writes)
            .finish()
    }
}
