use crate::interrupts::{Interrupt, InterruptLines};
use log::debug;

/// Internal clock period per bit at 8192 Hz.
const SLOW_CLOCK_CYCLES: u16 = 512;
/// CGB high-speed serial clock (262144 Hz).
const FAST_CLOCK_CYCLES: u16 = 16;

/// Serial port (FF01/FF02) with no link partner attached.
///
/// With the internal clock a transfer shifts one bit per period and the
/// incoming side of a disconnected cable reads as all ones, so a finished
/// transfer always leaves 0xFF in SB. The start flag is not cleared on
/// completion, so the port keeps shifting and raises the interrupt again every
/// 8 bits until software writes SC bit 7 low. With the external clock nothing
/// ever arrives and the transfer stalls until software clears the start flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serial {
    /// SB shift register.
    pub data: u8,
    /// SC bit 7
    pub start: bool,
    /// SC bit 0
    pub internal_clock: bool,
    /// SC bit 1, CGB only
    pub fast_clock: bool,
    /// Cycles since the last shifted bit.
    pub clock: u16,
    /// Bits shifted in the current transfer (0-8).
    pub bits_transferred: u8,
    cgb_mode: bool,
    out_buf: Vec<u8>,
}

impl Serial {
    pub fn new(cgb: bool) -> Self {
        Self {
            data: 0,
            start: false,
            internal_clock: false,
            fast_clock: false,
            clock: 0,
            bits_transferred: 0,
            cgb_mode: cgb,
            out_buf: Vec::new(),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF01 => self.data,
            0xFF02 => {
                (self.start as u8) << 7 | 0x7C | (self.fast_clock as u8) << 1 | self.internal_clock as u8
            }
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        match addr {
            0xFF01 => self.data = val,
            0xFF02 => {
                let starting = !self.start && val & 0x80 != 0;
                self.start = val & 0x80 != 0;
                self.internal_clock = val & 0x01 != 0;
                if self.cgb_mode {
                    self.fast_clock = val & 0x02 != 0;
                }
                if starting {
                    self.out_buf.push(self.data);
                }
            }
            _ => {}
        }
    }

    /// Bytes that were in SB when a transfer was started, oldest first.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out_buf)
    }

    fn bit_period(&self) -> u16 {
        if self.fast_clock {
            FAST_CLOCK_CYCLES
        } else {
            SLOW_CLOCK_CYCLES
        }
    }

    /// Advance the port by exactly one cycle.
    pub fn advance(&mut self, irq: &mut InterruptLines) {
        if !self.start {
            self.bits_transferred = 0;
            self.clock = 0;
            return;
        }
        if !self.internal_clock {
            // No partner to drive the clock.
            return;
        }

        self.clock += 1;
        if self.clock < self.bit_period() {
            return;
        }
        self.clock = 0;
        self.data = (self.data << 1) | 0x01;
        self.bits_transferred += 1;
        if self.bits_transferred == 8 {
            self.bits_transferred = 0;
            irq.request(Interrupt::Serial);
            debug!("serial transfer complete, SB={:02X}", self.data);
        }
    }

    pub fn step(&mut self, cycles: u32, irq: &mut InterruptLines) {
        for _ in 0..cycles {
            self.advance(irq);
        }
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_port_keeps_counters_reset() {
        let mut serial = Serial::new(false);
        let mut irq = InterruptLines::new();
        serial.clock = 100;
        serial.bits_transferred = 3;
        serial.advance(&mut irq);
        assert_eq!((serial.clock, serial.bits_transferred), (0, 0));
    }

    #[test]
    fn fast_clock_ignored_on_dmg() {
        let mut serial = Serial::new(false);
        serial.write(0xFF02, 0x83);
        assert!(!serial.fast_clock);
        assert_eq!(serial.read(0xFF02), 0xFD);
    }

    #[test]
    fn start_logs_outgoing_byte_once() {
        let mut serial = Serial::new(false);
        serial.write(0xFF01, b'A');
        serial.write(0xFF02, 0x81);
        serial.write(0xFF02, 0x81);
        assert_eq!(serial.take_output(), vec![b'A']);
        assert!(serial.take_output().is_empty());
    }
}
