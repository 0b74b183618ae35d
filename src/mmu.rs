use crate::{
    audio::{AudioUnit, SilentAudio},
    cartridge::MemoryBankController,
    dma::{DmaBus, OamDma},
    hardware::{BOOT_DIV, Model},
    interrupts::InterruptLines,
    joypad::Joypad,
    serial::Serial,
    speed::SpeedSwitch,
    timer::Timer,
    video::{DisplayUnit, FrameClock, VideoMemory},
};

const WRAM_BANK_SIZE: usize = 0x1000;

/// Register values the boot ROM leaves in the sound and LCD windows.
const POST_BOOT_IO: [(u16, u8); 19] = [
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF14, 0xBF),
    (0xFF17, 0x3F),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
    (0xFF40, 0x91),
    (0xFF47, 0xFC),
    (0xFF48, 0xFF),
    (0xFF49, 0xFF),
];

/// CGB infrared port (FF56). Nothing is ever received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InfraredPort {
    pub read_enable: bool,
    pub send: bool,
}

impl InfraredPort {
    pub fn read(&self) -> u8 {
        let mut out = 0;
        if self.read_enable {
            out |= 0xC2;
        }
        if self.send {
            out |= 0x01;
        }
        out
    }

    pub fn write(&mut self, val: u8) {
        self.read_enable = val & 0xC0 == 0xC0;
        self.send = val & 0x01 == 0x01;
    }
}

pub struct Mmu {
    pub wram: [[u8; WRAM_BANK_SIZE]; 8],
    pub wram_bank: usize,
    pub hram: [u8; 0x7F],
    pub video: VideoMemory,
    pub cart: Option<Box<dyn MemoryBankController>>,
    pub interrupts: InterruptLines,
    pub timer: Timer,
    pub serial: Serial,
    pub dma: OamDma,
    pub joypad: Joypad,
    pub speed: SpeedSwitch,
    pub ir: InfraredPort,
    pub display: Box<dyn DisplayUnit>,
    pub audio: Box<dyn AudioUnit>,
    model: Model,
}

impl Mmu {
    pub fn new(model: Model) -> Self {
        Self::with_units(model, Box::new(FrameClock::new()), Box::new(SilentAudio::new()))
    }

    /// Memory map in its raw power-on state with the given collaborators.
    pub fn with_units(
        model: Model,
        display: Box<dyn DisplayUnit>,
        audio: Box<dyn AudioUnit>,
    ) -> Self {
        Self {
            wram: [[0; WRAM_BANK_SIZE]; 8],
            wram_bank: 1,
            hram: [0; 0x7F],
            video: VideoMemory::new(),
            cart: None,
            interrupts: InterruptLines::new(),
            timer: Timer::new(),
            serial: Serial::new(model.is_cgb()),
            dma: OamDma::new(),
            joypad: Joypad::new(),
            speed: SpeedSwitch::new(model.is_cgb()),
            ir: InfraredPort::default(),
            display,
            audio,
            model,
        }
    }

    /// Apply the I/O state the boot ROM leaves behind.
    pub fn apply_boot_state(&mut self) {
        self.timer.div = BOOT_DIV;
        for (addr, val) in POST_BOOT_IO {
            self.write_byte(addr, val);
        }
        self.interrupts.vblank_pending = true;
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn is_cgb(&self) -> bool {
        self.model.is_cgb()
    }

    pub fn load_cart<C: MemoryBankController + 'static>(&mut self, cart: C) {
        self.cart = Some(Box::new(cart));
    }

    pub fn read_byte(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => match self.cart.as_mut() {
                Some(cart) => cart.read(addr),
                None => 0xFF,
            },
            0x8000..=0x9FFF => self.video.vram[self.video.vram_bank][(addr - 0x8000) as usize],
            0xC000..=0xCFFF => self.wram[0][(addr - 0xC000) as usize],
            0xD000..=0xDFFF => self.wram[self.wram_bank][(addr - 0xD000) as usize],
            0xE000..=0xFDFF => self.read_byte(addr - 0x2000),
            0xFE00..=0xFE9F => self.video.oam[(addr - 0xFE00) as usize],
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00 => self.joypad.read(),
            0xFF01 | 0xFF02 => self.serial.read(addr),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.interrupts.read_if(),
            0xFF10..=0xFF3F => self.audio.read_reg(addr),
            0xFF46 => self.dma.read(),
            0xFF40..=0xFF4B => self.display.read_reg(addr),
            0xFF4D => self.speed.read(),
            0xFF4F if self.is_cgb() => 0xFE | self.video.vram_bank as u8,
            0xFF56 if self.is_cgb() => self.ir.read(),
            0xFF70 if self.is_cgb() => 0xF8 | self.wram_bank as u8,
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.interrupts.read_ie(),
            _ => 0xFF,
        }
    }

    pub fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.write(addr, val);
                }
            }
            0x8000..=0x9FFF => {
                self.video.vram[self.video.vram_bank][(addr - 0x8000) as usize] = val
            }
            0xC000..=0xCFFF => self.wram[0][(addr - 0xC000) as usize] = val,
            0xD000..=0xDFFF => self.wram[self.wram_bank][(addr - 0xD000) as usize] = val,
            0xE000..=0xFDFF => self.write_byte(addr - 0x2000, val),
            0xFE00..=0xFE9F => self.video.oam[(addr - 0xFE00) as usize] = val,
            0xFEA0..=0xFEFF => {}
            0xFF00 => self.joypad.write(val),
            0xFF01 | 0xFF02 => self.serial.write(addr, val),
            0xFF04..=0xFF07 => self.timer.write(addr, val),
            0xFF0F => self.interrupts.write_if(val),
            0xFF10..=0xFF3F => self.audio.write_reg(addr, val),
            0xFF46 => self.dma.start(val),
            0xFF40..=0xFF4B => self.display.write_reg(addr, val),
            0xFF4D => self.speed.write(val),
            0xFF4F if self.is_cgb() => self.video.vram_bank = (val & 0x01) as usize,
            0xFF56 if self.is_cgb() => self.ir.write(val),
            0xFF70 if self.is_cgb() => {
                let bank = (val & 0x07) as usize;
                self.wram_bank = if bank == 0 { 1 } else { bank };
            }
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = val,
            0xFFFF => self.interrupts.write_ie(val),
            _ => {}
        }
    }

    /// Move one byte of a running OAM DMA transfer.
    pub fn dma_step(&mut self) {
        let mut dma = self.dma;
        dma.advance(self);
        self.dma = dma;
    }

    pub fn take_serial(&mut self) -> Vec<u8> {
        self.serial.take_output()
    }
}

impl DmaBus for Mmu {
    fn dma_read(&mut self, addr: u16) -> u8 {
        self.read_byte(addr)
    }

    fn oam_write(&mut self, index: u8, val: u8) {
        self.video.oam[index as usize] = val;
    }
}
