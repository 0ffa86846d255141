/// Fixed-capacity byte buffer backing CPU work RAM, nametable VRAM and
/// palette RAM. Callers fold mirrors into range before indexing; an index
/// past the end wraps so a handler can never panic the bus.
#[derive(Debug, Clone)]
pub struct Memory {
    data: Box<[u8]>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        Memory {
            data: vec![0; size].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn read(&self, index: usize) -> u8 {
        self.data[index % self.data.len()]
    }

    pub fn write(&mut self, index: usize, data: u8) {
        let len = self.data.len();
        self.data[index % len] = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_back_what_was_written() {
        let mut ram = Memory::new(0x800);
        ram.write(0x123, 0x42);
        assert_eq!(ram.read(0x123), 0x42);
        assert_eq!(ram.len(), 0x800);
    }

    #[test]
    fn out_of_range_index_wraps() {
        let mut palette = Memory::new(32);
        palette.write(33, 0x0F);
        assert_eq!(palette.read(1), 0x0F);
    }
}
