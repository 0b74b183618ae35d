/// Audio synthesis collaborator.
///
/// Receives real-time cycles once per dispatch and owns the sound register
/// window FF10-FF3F (including wave RAM).
pub trait AudioUnit: Send {
    fn advance(&mut self, cycles: u32);
    fn read_reg(&self, addr: u16) -> u8;
    fn write_reg(&mut self, addr: u16, val: u8);
    /// Move up to `out.len()` queued stereo samples into `out`, returning how
    /// many were written.
    fn drain_samples(&mut self, out: &mut [i16]) -> usize;
    /// Samples currently queued.
    fn queued_samples(&self) -> usize;
}

/// Stand-in audio unit: remembers register writes, produces no samples.
pub struct SilentAudio {
    regs: [u8; 0x30],
}

impl SilentAudio {
    pub fn new() -> Self {
        Self { regs: [0; 0x30] }
    }
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioUnit for SilentAudio {
    fn advance(&mut self, _cycles: u32) {}

    fn read_reg(&self, addr: u16) -> u8 {
        match addr {
            0xFF10..=0xFF3F => self.regs[(addr - 0xFF10) as usize],
            _ => 0xFF,
        }
    }

    fn write_reg(&mut self, addr: u16, val: u8) {
        if let 0xFF10..=0xFF3F = addr {
            self.regs[(addr - 0xFF10) as usize] = val;
        }
    }

    fn drain_samples(&mut self, _out: &mut [i16]) -> usize {
        0
    }

    fn queued_samples(&self) -> usize {
        0
    }
}
