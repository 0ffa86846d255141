// Standard NES joypad on $4016/$4017

use bitflags::bitflags;

bitflags! {
    /// Button bits in shift-out order (A first).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const A = 0b00000001;
        const B = 0b00000010;
        const SELECT = 0b00000100;
        const START = 0b00001000;
        const UP = 0b00010000;
        const DOWN = 0b00100000;
        const LEFT = 0b01000000;
        const RIGHT = 0b10000000;
    }
}

// Upper data lines float; most boards read back $40 there
const OPEN_BUS: u8 = 0x40;

#[derive(Debug, Clone, Default)]
pub struct Controller {
    buttons: Buttons,
    shift_register: u8,
    // Bits shifted out since the last latch; past 8 the pad reports 1s
    reads: u8,
    strobe: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, button: Buttons, pressed: bool) {
        self.buttons.set(button, pressed);
        if self.strobe {
            self.latch_buttons();
        }
    }

    pub fn set_buttons(&mut self, buttons: Buttons) {
        self.buttons = buttons;
        if self.strobe {
            self.latch_buttons();
        }
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    // Bit 0 of a $4016 write
    pub fn write_strobe(&mut self, value: u8) {
        let new_strobe = value & 0x01 != 0;
        if self.strobe && !new_strobe {
            self.latch_buttons();
        }
        self.strobe = new_strobe;
        if self.strobe {
            self.latch_buttons();
        }
    }

    pub fn read_data(&mut self) -> u8 {
        if self.strobe {
            // Strobe held high keeps reloading: always report A
            return OPEN_BUS | self.buttons.contains(Buttons::A) as u8;
        }
        let bit = if self.reads >= 8 {
            1
        } else {
            let bit = self.shift_register & 0x01;
            self.shift_register >>= 1;
            self.reads += 1;
            bit
        };
        OPEN_BUS | bit
    }

    fn latch_buttons(&mut self) {
        self.shift_register = self.buttons.bits();
        self.reads = 0;
    }
}

/// Both ports. The strobe line is shared.
#[derive(Debug, Clone, Default)]
pub struct InputPorts {
    pub controller1: Controller,
    pub controller2: Controller,
}

impl InputPorts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_strobe(&mut self, value: u8) {
        self.controller1.write_strobe(value);
        self.controller2.write_strobe(value);
    }

    /// Read $4016 (`port` 0) or $4017 (`port` 1).
    pub fn read(&mut self, port: u16) -> u8 {
        if port & 1 == 0 {
            self.controller1.read_data()
        } else {
            self.controller2.read_data()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_eight(pad: &mut Controller) -> Vec<u8> {
        (0..8).map(|_| pad.read_data() & 0x01).collect()
    }

    #[test]
    fn test_shift_out_order() {
        let mut pad = Controller::new();
        pad.set_buttons(Buttons::A | Buttons::START | Buttons::RIGHT);
        pad.write_strobe(1);
        pad.write_strobe(0);

        assert_eq!(read_eight(&mut pad), vec![1, 0, 0, 1, 0, 0, 0, 1]);
        // Exhausted register reports 1s
        assert_eq!(pad.read_data() & 0x01, 1);
    }

    #[test]
    fn test_strobe_high_repeats_a() {
        let mut pad = Controller::new();
        pad.set_button(Buttons::A, true);
        pad.write_strobe(1);
        assert_eq!(pad.read_data(), 0x41);
        assert_eq!(pad.read_data(), 0x41);
        pad.set_button(Buttons::A, false);
        assert_eq!(pad.read_data(), 0x40);
    }

    #[test]
    fn test_buttons_latched_on_falling_edge() {
        let mut pad = Controller::new();
        pad.write_strobe(1);
        pad.set_button(Buttons::B, true);
        pad.write_strobe(0);
        // Changes after the latch are not visible until the next strobe
        pad.set_button(Buttons::B, false);
        assert!(pad.buttons().is_empty());
        assert_eq!(read_eight(&mut pad), vec![0, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_ports_share_strobe() {
        let mut ports = InputPorts::new();
        ports.controller2.set_button(Buttons::A, true);
        ports.write_strobe(1);
        ports.write_strobe(0);
        assert_eq!(ports.read(0) & 1, 0);
        assert_eq!(ports.read(1) & 1, 1);
    }
}
