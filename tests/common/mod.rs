#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tickboy::{
    audio::AudioUnit,
    exec::MinimalExecutor,
    gameboy::GameBoy,
    hardware::Model,
    interrupts::InterruptLines,
    video::{DisplayUnit, VideoMemory},
};

pub const PROGRAM_BASE: u16 = 0xC000;

/// Post-boot machine with `program` copied to WRAM and PC pointing at it.
/// Pending interrupts left by the boot state are cleared.
pub fn machine_with_program(model: Model, program: &[u8]) -> GameBoy {
    let mut gb = GameBoy::new(model, Box::new(MinimalExecutor::new()));
    load_program(&mut gb, program);
    gb
}

pub fn load_program(gb: &mut GameBoy, program: &[u8]) {
    for (i, byte) in program.iter().enumerate() {
        gb.mmu.write_byte(PROGRAM_BASE + i as u16, *byte);
    }
    gb.cpu.regs.pc = PROGRAM_BASE;
    gb.mmu.write_byte(0xFF0F, 0x00);
    gb.mmu.write_byte(0xFFFF, 0x00);
}

/// Display that records every cycle count it is advanced by.
pub struct RecordingDisplay {
    pub advances: Arc<Mutex<Vec<u32>>>,
}

impl DisplayUnit for RecordingDisplay {
    fn advance(&mut self, cycles: u32, _mem: &VideoMemory, _irq: &mut InterruptLines) {
        if let Ok(mut log) = self.advances.lock() {
            log.push(cycles);
        }
    }

    fn read_reg(&self, _addr: u16) -> u8 {
        0xFF
    }

    fn write_reg(&mut self, _addr: u16, _val: u8) {}

    fn framebuffer(&self) -> &[u8] {
        &[]
    }

    fn take_flip_request(&mut self) -> bool {
        false
    }
}

/// Audio unit that records every cycle count it is advanced by.
pub struct RecordingAudio {
    pub advances: Arc<Mutex<Vec<u32>>>,
}

impl AudioUnit for RecordingAudio {
    fn advance(&mut self, cycles: u32) {
        if let Ok(mut log) = self.advances.lock() {
            log.push(cycles);
        }
    }

    fn read_reg(&self, _addr: u16) -> u8 {
        0xFF
    }

    fn write_reg(&mut self, _addr: u16, _val: u8) {}

    fn drain_samples(&mut self, _out: &mut [i16]) -> usize {
        0
    }

    fn queued_samples(&self) -> usize {
        0
    }
}

pub struct AdvanceLogs {
    pub display: Arc<Mutex<Vec<u32>>>,
    pub audio: Arc<Mutex<Vec<u32>>>,
}

/// Machine whose display and audio units log the cycles they receive.
pub fn machine_with_recording_units(model: Model, program: &[u8]) -> (GameBoy, AdvanceLogs) {
    let logs = AdvanceLogs {
        display: Arc::new(Mutex::new(Vec::new())),
        audio: Arc::new(Mutex::new(Vec::new())),
    };
    let mut gb = GameBoy::with_units(
        model,
        Box::new(MinimalExecutor::new()),
        Box::new(RecordingDisplay {
            advances: Arc::clone(&logs.display),
        }),
        Box::new(RecordingAudio {
            advances: Arc::clone(&logs.audio),
        }),
    );
    load_program(&mut gb, program);
    (gb, logs)
}

/// Cloneable in-memory sink for debugger output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buf = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn clear(&self) {
        if let Ok(mut buf) = self.0.lock() {
            buf.clear();
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("poisoned"))?
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
