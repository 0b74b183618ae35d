use crate::interrupts::{Interrupt, InterruptLines};

/// TIMA period in cycles for each TAC frequency selector.
const PERIODS: [u16; 4] = [1024, 16, 64, 256];

/// Cycles between a TIMA overflow and the TMA reload + interrupt.
pub const OVERFLOW_LAG: u8 = 4;

/// Divider/timer unit (FF04-FF07).
///
/// TIMA counts on divider period boundaries rather than on falling edges of a
/// divider bit, and an overflow leaves TIMA at zero for [`OVERFLOW_LAG`]
/// cycles. The reload only happens if TIMA is still zero when the lag runs
/// out, so a TIMA write inside the window cancels it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timer {
    /// 16-bit free-running divider. DIV register is the upper 8 bits.
    pub div: u16,
    /// TAC bit 2
    pub on: bool,
    /// TAC bits 0-1
    pub freq_selector: u8,
    /// TIMA
    pub counter: u8,
    /// TMA
    pub modulo: u8,
    /// Cycles left before an overflow reloads TIMA; 0 when idle.
    pub lag: u8,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period in cycles of the selected TIMA frequency.
    pub fn period(&self) -> u16 {
        PERIODS[(self.freq_selector & 0x03) as usize]
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => (self.div >> 8) as u8,
            0xFF05 => self.counter,
            0xFF06 => self.modulo,
            0xFF07 => 0xF8 | (self.on as u8) << 2 | self.freq_selector,
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0xFF04 => self.reset_div(),
            0xFF05 => self.counter = val,
            0xFF06 => self.modulo = val,
            0xFF07 => {
                self.on = val & 0x04 != 0;
                self.freq_selector = val & 0x03;
            }
            _ => {}
        }
    }

    /// Zero the internal divider (DIV write, STOP entry).
    pub fn reset_div(&mut self) {
        self.div = 0;
    }

    /// Advance the timer by exactly one cycle.
    pub fn advance(&mut self, irq: &mut InterruptLines) {
        self.div = self.div.wrapping_add(1);

        if !self.on {
            return;
        }

        if self.lag > 0 {
            self.lag -= 1;
            if self.lag == 0 && self.counter == 0 {
                self.counter = self.modulo;
                irq.request(Interrupt::Timer);
            }
        }

        if self.div & (self.period() - 1) == 0 {
            self.counter = self.counter.wrapping_add(1);
            if self.counter == 0 {
                self.lag = OVERFLOW_LAG;
            }
        }
    }

    /// Advance by `cycles`, one cycle at a time.
    pub fn step(&mut self, cycles: u32, irq: &mut InterruptLines) {
        for _ in 0..cycles {
            self.advance(irq);
        }
    }
}
