use std::io::Write;
use std::path::Path;

use log::{info, warn};

use crate::{
    cartridge::Cartridge,
    config::ModelPreference,
    debugger::{CommandError, Debugger, PathError, Value},
    error::CoreError,
    exec::MinimalExecutor,
    gameboy::GameBoy,
    joypad::Buttons,
    snapshot::StateSerializer,
};

/// Host-facing wrapper: a machine, its debugger session and an optional
/// save-state serializer.
pub struct Emulator {
    gb: GameBoy,
    debugger: Debugger,
    serializer: Option<Box<dyn StateSerializer>>,
    dev_mode: bool,
}

impl Emulator {
    pub fn new(gb: GameBoy) -> Self {
        Self::with_debugger(gb, Debugger::new())
    }

    pub fn with_debugger(gb: GameBoy, debugger: Debugger) -> Self {
        Self {
            gb,
            debugger,
            serializer: None,
            dev_mode: false,
        }
    }

    /// Machine for a ROM image, driven by [`MinimalExecutor`].
    pub fn from_rom(rom: Vec<u8>, preference: ModelPreference) -> Result<Self, CoreError> {
        Ok(Self::from_cartridge(Cartridge::from_bytes(rom)?, preference))
    }

    pub fn from_file<P: AsRef<Path>>(
        path: P,
        preference: ModelPreference,
    ) -> Result<Self, CoreError> {
        Ok(Self::from_cartridge(Cartridge::from_file(path)?, preference))
    }

    fn from_cartridge(cart: Cartridge, preference: ModelPreference) -> Self {
        let model = preference.resolve(cart.cgb);
        info!("loaded \"{}\" as {model:?}", cart.title);
        let mut gb = GameBoy::new(model, Box::new(MinimalExecutor::new()));
        gb.mmu.load_cart(cart);
        Self::new(gb)
    }

    pub fn machine(&self) -> &GameBoy {
        &self.gb
    }

    pub fn machine_mut(&mut self) -> &mut GameBoy {
        &mut self.gb
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    pub fn in_dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn set_dev_mode(&mut self, on: bool) {
        self.dev_mode = on;
    }

    /// One orchestrator step, bypassing the debugger.
    pub fn step_once(&mut self) {
        self.gb.step();
    }

    /// One unit of debugger work; see [`Debugger::step`].
    pub fn debug_step_once(&mut self) {
        self.debugger.step(&mut self.gb);
    }

    pub fn feed_key_event(&mut self, code: u8, pressed: bool) {
        self.debugger.process_key_event(code, pressed);
    }

    pub fn update_key_state(&mut self, keys: &[bool; 256]) {
        self.debugger.update_key_state(keys);
    }

    /// Latch new button state into the joypad, raising its interrupt on a
    /// fresh press.
    pub fn update_input(&mut self, buttons: Buttons) {
        self.gb
            .mmu
            .joypad
            .update(buttons, &mut self.gb.mmu.interrupts);
    }

    /// Run a `break ...` style command line outside the interactive prompt.
    pub fn set_breakpoint_command(&mut self, tokens: &[&str]) -> Result<(), CommandError> {
        let mut full = Vec::with_capacity(tokens.len() + 1);
        full.push("break");
        full.extend_from_slice(tokens);
        self.debugger.execute(&mut self.gb, &full)
    }

    pub fn evaluate_path(&self, path: &str) -> Result<Value, PathError> {
        self.debugger.evaluate_path(&self.gb, path)
    }

    pub fn invoke_path(&mut self, path: &str) -> Result<Option<Value>, PathError> {
        self.debugger.invoke_path(&mut self.gb, path)
    }

    pub fn framebuffer(&self) -> &[u8] {
        self.gb.mmu.display.framebuffer()
    }

    pub fn take_flip_request(&mut self) -> bool {
        self.gb.mmu.display.take_flip_request()
    }

    pub fn read_audio(&mut self, out: &mut [i16]) -> usize {
        self.gb.mmu.audio.drain_samples(out)
    }

    pub fn queued_audio(&self) -> usize {
        self.gb.mmu.audio.queued_samples()
    }

    pub fn take_serial(&mut self) -> Vec<u8> {
        self.gb.mmu.take_serial()
    }

    /// Copy pending serial output to `out`. Write failures are logged and the
    /// bytes dropped. Returns how many bytes were taken.
    pub fn echo_serial<W: Write>(&mut self, out: &mut W) -> usize {
        let bytes = self.take_serial();
        if bytes.is_empty() {
            return 0;
        }
        if let Err(e) = out.write_all(&bytes).and_then(|()| out.flush()) {
            warn!("serial echo failed: {e}");
        }
        bytes.len()
    }

    pub fn cart_ram(&self) -> Vec<u8> {
        self.gb
            .mmu
            .cart
            .as_ref()
            .map(|cart| cart.ram().to_vec())
            .unwrap_or_default()
    }

    pub fn set_cart_ram(&mut self, data: &[u8]) -> Result<(), CoreError> {
        let ram: &mut [u8] = match self.gb.mmu.cart.as_mut() {
            Some(cart) => cart.ram_mut(),
            None => &mut [],
        };
        if ram.len() != data.len() {
            return Err(CoreError::RamSizeMismatch {
                expected: ram.len(),
                actual: data.len(),
            });
        }
        ram.copy_from_slice(data);
        Ok(())
    }

    pub fn set_serializer(&mut self, serializer: Box<dyn StateSerializer>) {
        self.serializer = Some(serializer);
    }

    pub fn make_snapshot(&self) -> Result<Vec<u8>, CoreError> {
        let serializer = self.serializer.as_ref().ok_or(CoreError::NoSerializer)?;
        Ok(serializer.serialize(&self.gb))
    }

    pub fn load_snapshot(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
        let serializer = self.serializer.as_ref().ok_or(CoreError::NoSerializer)?;
        serializer.deserialize(bytes, &mut self.gb)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::hardware::Model;

    fn rom(cgb_flag: u8, ram_code: u8) -> Vec<u8> {
        let mut rom = vec![0; 0x8000];
        rom[0x134..0x138].copy_from_slice(b"TEST");
        rom[0x143] = cgb_flag;
        rom[0x149] = ram_code;
        rom
    }

    #[test]
    fn header_picks_model() {
        let emu = Emulator::from_rom(rom(0x80, 0), ModelPreference::Auto).unwrap();
        assert_eq!(emu.machine().model, Model::Cgb);
        let emu = Emulator::from_rom(rom(0x80, 0), ModelPreference::Dmg).unwrap();
        assert_eq!(emu.machine().model, Model::Dmg);
    }

    #[test]
    fn cart_ram_size_must_match() {
        let mut emu = Emulator::from_rom(rom(0, 0x02), ModelPreference::Auto).unwrap();
        assert_eq!(emu.cart_ram().len(), 0x2000);
        assert!(matches!(
            emu.set_cart_ram(&[1, 2, 3]),
            Err(CoreError::RamSizeMismatch {
                expected: 0x2000,
                actual: 3
            })
        ));
        let image = vec![0x5A; 0x2000];
        emu.set_cart_ram(&image).unwrap();
        assert_eq!(emu.cart_ram(), image);
    }

    #[test]
    fn snapshots_need_a_serializer() {
        let mut emu = Emulator::from_rom(rom(0, 0), ModelPreference::Auto).unwrap();
        assert!(matches!(emu.make_snapshot(), Err(CoreError::NoSerializer)));
        assert!(matches!(emu.load_snapshot(&[]), Err(CoreError::NoSerializer)));
    }

    #[test]
    fn loads_rom_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&rom(0x80, 0x02)).unwrap();
        let emu = Emulator::from_file(file.path(), ModelPreference::Auto).unwrap();
        assert_eq!(emu.machine().model, Model::Cgb);
        assert_eq!(emu.cart_ram().len(), 0x2000);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.gb");
        assert!(matches!(
            Emulator::from_file(&missing, ModelPreference::Auto),
            Err(CoreError::Io(_))
        ));
    }

    /// Saves and restores PC only, rejecting images of the wrong length.
    struct PcSerializer;

    impl StateSerializer for PcSerializer {
        fn serialize(&self, gb: &GameBoy) -> Vec<u8> {
            gb.cpu.regs.pc.to_le_bytes().to_vec()
        }

        fn deserialize(&self, bytes: &[u8], gb: &mut GameBoy) -> Result<(), CoreError> {
            let pc: [u8; 2] = bytes.try_into().map_err(|_| {
                CoreError::Snapshot(format!("expected 2 bytes, got {}", bytes.len()))
            })?;
            gb.cpu.regs.pc = u16::from_le_bytes(pc);
            Ok(())
        }
    }

    #[test]
    fn snapshot_round_trips_through_serializer() {
        let mut emu = Emulator::from_rom(rom(0, 0), ModelPreference::Auto).unwrap();
        emu.set_serializer(Box::new(PcSerializer));
        emu.machine_mut().cpu.regs.pc = 0x1234;
        let image = emu.make_snapshot().unwrap();

        emu.machine_mut().cpu.regs.pc = 0x4000;
        let err = emu.load_snapshot(&[0xAA]).unwrap_err();
        assert_eq!(err.to_string(), "snapshot rejected: expected 2 bytes, got 1");
        assert_eq!(emu.machine().cpu.regs.pc, 0x4000);

        emu.load_snapshot(&image).unwrap();
        assert_eq!(emu.machine().cpu.regs.pc, 0x1234);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn send_serial(emu: &mut Emulator, bytes: &[u8]) {
        let mmu = &mut emu.machine_mut().mmu;
        for &b in bytes {
            mmu.serial.write(0xFF01, b);
            mmu.serial.write(0xFF02, 0x81);
            mmu.serial.step(512 * 8, &mut mmu.interrupts);
            mmu.serial.write(0xFF02, 0x01);
        }
    }

    #[test]
    fn serial_echo_survives_write_errors() {
        let mut emu = Emulator::from_rom(rom(0, 0), ModelPreference::Auto).unwrap();
        send_serial(&mut emu, b"hi");
        assert_eq!(emu.echo_serial(&mut BrokenPipe), 2);
        assert!(emu.take_serial().is_empty());

        send_serial(&mut emu, b"ok");
        let mut sink = Vec::new();
        assert_eq!(emu.echo_serial(&mut sink), 2);
        assert_eq!(sink, b"ok");
        assert_eq!(emu.echo_serial(&mut sink), 0);
    }
}
