/// Interrupt sources in priority order (gbdev.io/pandocs/Interrupts.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Interrupt {
    VBlank = 1 << 0,
    LcdStat = 1 << 1,
    Timer = 1 << 2,
    Serial = 1 << 3,
    Joypad = 1 << 4,
}

impl Interrupt {
    /// All sources, highest priority first.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Jump target used when the interrupt is serviced.
    pub const fn vector(self) -> u16 {
        0x0040 + (self as u8).trailing_zeros() as u16 * 0x08
    }
}

/// IE/IF state: one enable bit and one pending flag per source.
///
/// Peripherals only ever set pending flags; clearing happens at a dispatch
/// boundary when the interrupt is serviced (or when software writes IF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterruptLines {
    pub vblank_enabled: bool,
    pub lcd_stat_enabled: bool,
    pub timer_enabled: bool,
    pub serial_enabled: bool,
    pub joypad_enabled: bool,
    /// IE bits 5-7 have no function but keep whatever was written.
    pub unused_enable_bits: u8,

    pub vblank_pending: bool,
    pub lcd_stat_pending: bool,
    pub timer_pending: bool,
    pub serial_pending: bool,
    pub joypad_pending: bool,
}

impl InterruptLines {
    pub fn new() -> Self {
        Self::default()
    }

    fn enable_slot(&mut self, irq: Interrupt) -> &mut bool {
        match irq {
            Interrupt::VBlank => &mut self.vblank_enabled,
            Interrupt::LcdStat => &mut self.lcd_stat_enabled,
            Interrupt::Timer => &mut self.timer_enabled,
            Interrupt::Serial => &mut self.serial_enabled,
            Interrupt::Joypad => &mut self.joypad_enabled,
        }
    }

    fn pending_slot(&mut self, irq: Interrupt) -> &mut bool {
        match irq {
            Interrupt::VBlank => &mut self.vblank_pending,
            Interrupt::LcdStat => &mut self.lcd_stat_pending,
            Interrupt::Timer => &mut self.timer_pending,
            Interrupt::Serial => &mut self.serial_pending,
            Interrupt::Joypad => &mut self.joypad_pending,
        }
    }

    pub fn is_enabled(&self, irq: Interrupt) -> bool {
        self.read_ie() & irq.bit() != 0
    }

    pub fn is_pending(&self, irq: Interrupt) -> bool {
        self.read_if() & irq.bit() != 0
    }

    pub fn set_enabled(&mut self, irq: Interrupt, on: bool) {
        *self.enable_slot(irq) = on;
    }

    /// Raise the pending flag for `irq`.
    pub fn request(&mut self, irq: Interrupt) {
        *self.pending_slot(irq) = true;
    }

    pub fn clear(&mut self, irq: Interrupt) {
        *self.pending_slot(irq) = false;
    }

    /// True when some source is both enabled and pending, regardless of IME.
    pub fn ready(&self) -> bool {
        self.highest_ready().is_some()
    }

    /// Highest-priority source that is enabled and pending.
    pub fn highest_ready(&self) -> Option<Interrupt> {
        let live = self.read_ie() & self.read_if() & 0x1F;
        Interrupt::ALL
            .into_iter()
            .find(|irq| live & irq.bit() != 0)
    }

    pub fn read_ie(&self) -> u8 {
        (self.unused_enable_bits & 0xE0)
            | (self.joypad_enabled as u8) << 4
            | (self.serial_enabled as u8) << 3
            | (self.timer_enabled as u8) << 2
            | (self.lcd_stat_enabled as u8) << 1
            | self.vblank_enabled as u8
    }

    pub fn write_ie(&mut self, val: u8) {
        self.unused_enable_bits = val & 0xE0;
        for irq in Interrupt::ALL {
            *self.enable_slot(irq) = val & irq.bit() != 0;
        }
    }

    /// The upper three bits of IF always read back as 1.
    pub fn read_if(&self) -> u8 {
        0xE0 | (self.joypad_pending as u8) << 4
            | (self.serial_pending as u8) << 3
            | (self.timer_pending as u8) << 2
            | (self.lcd_stat_pending as u8) << 1
            | self.vblank_pending as u8
    }

    pub fn write_if(&mut self, val: u8) {
        for irq in Interrupt::ALL {
            *self.pending_slot(irq) = val & irq.bit() != 0;
        }
    }
}
