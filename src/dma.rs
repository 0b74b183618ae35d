use log::debug;

/// Bytes copied by one OAM DMA transfer.
pub const OAM_DMA_LEN: u8 = 0xA0;

/// Memory access the DMA engine needs while a transfer is running.
pub trait DmaBus {
    /// Read a source byte through the normal memory map.
    fn dma_read(&mut self, addr: u16) -> u8;
    /// Store a byte into object attribute memory at `index`.
    fn oam_write(&mut self, index: u8, val: u8);
}

/// OAM DMA scheduler (FF46): one byte per cycle into FE00-FE9F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OamDma {
    pub active: bool,
    /// Next byte to copy, 0..=0x9F while active.
    pub index: u8,
    pub source: u16,
    /// Last value written to FF46.
    page: u8,
}

impl OamDma {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> u8 {
        self.page
    }

    /// FF46 write. Starting a new transfer replaces one already in flight.
    pub fn start(&mut self, page: u8) {
        self.page = page;
        self.source = (page as u16) << 8;
        self.index = 0;
        self.active = true;
        debug!("OAM DMA started src={:04X}", self.source);
    }

    /// Copy one byte if a transfer is active.
    pub fn advance<B: DmaBus + ?Sized>(&mut self, bus: &mut B) {
        if !self.active {
            return;
        }
        let val = bus.dma_read(self.source.wrapping_add(self.index as u16));
        bus.oam_write(self.index, val);
        self.index += 1;
        if self.index == OAM_DMA_LEN {
            self.active = false;
            debug!("OAM DMA finished src={:04X}", self.source);
        }
    }
}
