use crate::interrupts::{Interrupt, InterruptLines};

/// Host-side button snapshot. `true` means held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub select: bool,
    pub start: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
}

/// P1/JOYP register (FF00) and the joypad interrupt edge detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Joypad {
    pub buttons: Buttons,
    /// P1 bits 4-5. A cleared bit selects its button group.
    pub read_mask: u8,
}

impl Joypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> u8 {
        let b = &self.buttons;
        let mut val = 0xC0 | (self.read_mask << 4) | 0x0F;
        if self.read_mask & 0x01 == 0 {
            val &= !((b.down as u8) << 3 | (b.up as u8) << 2 | (b.left as u8) << 1 | b.right as u8);
        }
        if self.read_mask & 0x02 == 0 {
            val &= !((b.start as u8) << 3 | (b.select as u8) << 2 | (b.b as u8) << 1 | b.a as u8);
        }
        val
    }

    pub fn write(&mut self, val: u8) {
        self.read_mask = (val >> 4) & 0x03;
    }

    /// Apply a new button snapshot, keeping the current group selection.
    ///
    /// The interrupt is a falling-edge detector on the selected lines: it
    /// fires only when they go from all released (0xF) to anything lower.
    pub fn update(&mut self, buttons: Buttons, irq: &mut InterruptLines) {
        let before = self.read() & 0x0F;
        self.buttons = buttons;
        let after = self.read() & 0x0F;
        if before == 0x0F && after < before {
            irq.request(Interrupt::Joypad);
        }
    }
}
