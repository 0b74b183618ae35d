// CPU flag bits as documented in gbdev.io/pandocs/The_CPU_Flags.html
pub const FLAG_Z: u8 = 0x80; // Zero
pub const FLAG_N: u8 = 0x40; // Subtract
pub const FLAG_H: u8 = 0x20; // Half Carry
pub const FLAG_C: u8 = 0x10; // Carry

/// The eight 8-bit CPU registers plus PC and SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
}

impl Registers {
    pub fn af(&self) -> u16 {
        ((self.a as u16) << 8) | self.f as u16
    }

    /// The low nibble of F is hard-wired to zero.
    pub fn set_af(&mut self, val: u16) {
        self.a = (val >> 8) as u8;
        self.f = (val as u8) & 0xF0;
    }

    pub fn bc(&self) -> u16 {
        ((self.b as u16) << 8) | self.c as u16
    }

    pub fn set_bc(&mut self, val: u16) {
        self.b = (val >> 8) as u8;
        self.c = val as u8;
    }

    pub fn de(&self) -> u16 {
        ((self.d as u16) << 8) | self.e as u16
    }

    pub fn set_de(&mut self, val: u16) {
        self.d = (val >> 8) as u8;
        self.e = val as u8;
    }

    pub fn hl(&self) -> u16 {
        ((self.h as u16) << 8) | self.l as u16
    }

    pub fn set_hl(&mut self, val: u16) {
        self.h = (val >> 8) as u8;
        self.l = val as u8;
    }

    pub fn flag(&self, mask: u8) -> bool {
        self.f & mask != 0
    }

    pub fn set_flag(&mut self, mask: u8, on: bool) {
        if on {
            self.f |= mask;
        } else {
            self.f &= !mask;
        }
    }
}

/// Interrupt master enable with the one-instruction EI latency made explicit.
///
/// `EI` only marks the latch as `requested`; the orchestrator arms it at the
/// top of the following dispatch, so the instruction right after `EI` always
/// runs before any interrupt can be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImeLatch {
    requested: bool,
    armed: bool,
}

impl ImeLatch {
    pub fn enabled(&self) -> bool {
        self.armed
    }

    pub fn requested(&self) -> bool {
        self.requested
    }

    /// Effect of `EI`.
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Effect of `RETI`: enables without the latency.
    pub fn enable_now(&mut self) {
        self.requested = false;
        self.armed = true;
    }

    /// Effect of `DI` and of interrupt entry. A pending request is dropped too.
    pub fn disable(&mut self) {
        self.requested = false;
        self.armed = false;
    }

    /// Promote a request made on the previous dispatch. Returns true when the
    /// latch was armed by this call.
    pub fn resolve(&mut self) -> bool {
        if self.requested {
            self.requested = false;
            self.armed = true;
            true
        } else {
            false
        }
    }
}
