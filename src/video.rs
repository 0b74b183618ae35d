use crate::interrupts::{Interrupt, InterruptLines};

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;

/// Dots in one full frame (154 lines of 456 dots).
const FRAME_CYCLES: u32 = 70_224;
/// First dot of line 144, where VBlank begins.
const VBLANK_START: u32 = 144 * 456;

pub const VRAM_BANK_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xA0;

/// Video memory owned by the memory map and lent to the display unit.
pub struct VideoMemory {
    pub vram: [[u8; VRAM_BANK_SIZE]; 2],
    pub vram_bank: usize,
    pub oam: [u8; OAM_SIZE],
}

impl VideoMemory {
    pub fn new() -> Self {
        Self {
            vram: [[0; VRAM_BANK_SIZE]; 2],
            vram_bank: 0,
            oam: [0; OAM_SIZE],
        }
    }
}

impl Default for VideoMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel pipeline collaborator.
///
/// The core hands it real-time cycles once per dispatch (already halved in
/// double-speed mode) and forwards the LCD register window FF40-FF4B, except
/// FF46 which belongs to the DMA scheduler.
pub trait DisplayUnit: Send {
    fn advance(&mut self, cycles: u32, mem: &VideoMemory, irq: &mut InterruptLines);
    fn read_reg(&self, addr: u16) -> u8;
    fn write_reg(&mut self, addr: u16, val: u8);
    /// RGB888 pixels, row major.
    fn framebuffer(&self) -> &[u8];
    /// Read and clear the "frame finished" flag.
    fn take_flip_request(&mut self) -> bool;
}

/// Stand-in display that keeps frame timing but draws nothing.
///
/// Raises VBlank on schedule so software waiting on it keeps running, and
/// tracks LY so polling loops see it move.
pub struct FrameClock {
    regs: [u8; 0x0C],
    frame_cycle: u32,
    flip_requested: bool,
    framebuffer: Vec<u8>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            regs: [0; 0x0C],
            frame_cycle: 0,
            flip_requested: false,
            framebuffer: vec![0xFF; SCREEN_WIDTH * SCREEN_HEIGHT * 3],
        }
    }

    fn lcd_on(&self) -> bool {
        self.regs[0] & 0x80 != 0
    }

    pub fn ly(&self) -> u8 {
        (self.frame_cycle / 456) as u8
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayUnit for FrameClock {
    fn advance(&mut self, cycles: u32, _mem: &VideoMemory, irq: &mut InterruptLines) {
        if !self.lcd_on() {
            return;
        }
        let before = self.frame_cycle;
        let after = before + cycles;
        if before < VBLANK_START && after >= VBLANK_START {
            irq.request(Interrupt::VBlank);
            self.flip_requested = true;
        }
        self.frame_cycle = after % FRAME_CYCLES;
    }

    fn read_reg(&self, addr: u16) -> u8 {
        match addr {
            0xFF44 => self.ly(),
            0xFF40..=0xFF4B => self.regs[(addr - 0xFF40) as usize],
            _ => 0xFF,
        }
    }

    fn write_reg(&mut self, addr: u16, val: u8) {
        match addr {
            0xFF44 => {}
            0xFF40 => {
                if val & 0x80 == 0 {
                    self.frame_cycle = 0;
                }
                self.regs[0] = val;
            }
            0xFF41..=0xFF4B => self.regs[(addr - 0xFF40) as usize] = val,
            _ => {}
        }
    }

    fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    fn take_flip_request(&mut self) -> bool {
        std::mem::take(&mut self.flip_requested)
    }
}
