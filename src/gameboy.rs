use log::trace;

use crate::{
    audio::AudioUnit,
    cpu::Cpu,
    exec::ExecutionUnit,
    hardware::Model,
    mmu::Mmu,
    video::DisplayUnit,
};

/// Cycles spent per step while parked in HALT or leaving STOP.
const IDLE_STEP_CYCLES: u32 = 4;

/// CPU, memory map and execution unit wired into one machine.
pub struct GameBoy {
    pub cpu: Cpu,
    pub mmu: Mmu,
    pub exec: Box<dyn ExecutionUnit>,
    pub model: Model,
}

impl GameBoy {
    /// Post-boot machine with the idle display/audio stand-ins.
    pub fn new(model: Model, exec: Box<dyn ExecutionUnit>) -> Self {
        let mut mmu = Mmu::new(model);
        mmu.apply_boot_state();
        Self {
            cpu: Cpu::new(model),
            mmu,
            exec,
            model,
        }
    }

    /// Post-boot machine with caller-provided display and audio units.
    pub fn with_units(
        model: Model,
        exec: Box<dyn ExecutionUnit>,
        display: Box<dyn DisplayUnit>,
        audio: Box<dyn AudioUnit>,
    ) -> Self {
        let mut mmu = Mmu::with_units(model, display, audio);
        mmu.apply_boot_state();
        Self {
            cpu: Cpu::new(model),
            mmu,
            exec,
            model,
        }
    }

    /// Advance exactly one dispatch step.
    ///
    /// Order within a step: interrupt readiness (and entry when IME is set),
    /// HALT parking, STOP wake-up, the deferred `EI`, then one instruction.
    ///
    /// STOP is left unconditionally after 4 cycles. Real hardware waits for a
    /// joypad line to go low unless a speed switch is pending; this is a known
    /// deviation.
    pub fn step(&mut self) {
        let ready = self.service_interrupts();

        if self.cpu.halted {
            self.run_cycles(IDLE_STEP_CYCLES);
            if !ready {
                return;
            }
            self.cpu.halted = false;
            trace!("HALT exit at {:04X}", self.cpu.regs.pc);
        }

        if self.cpu.stopped {
            self.mmu.timer.reset_div();
            self.mmu.speed.commit();
            self.run_cycles(IDLE_STEP_CYCLES);
            self.cpu.stopped = false;
            trace!("STOP exit at {:04X}", self.cpu.regs.pc);
        }

        // EI takes effect one instruction late.
        self.cpu.ime.resolve();

        #[cfg(feature = "cpu-trace")]
        trace!("{}", self.cpu.status_line());

        self.cpu.steps += 1;
        let cycles = self.exec.dispatch_one(&mut self.cpu, &mut self.mmu);
        self.run_cycles(cycles);
    }

    /// Returns whether an enabled interrupt is pending. When IME is set the
    /// highest-priority one is entered through the execution unit.
    fn service_interrupts(&mut self) -> bool {
        let Some(irq) = self.mmu.interrupts.highest_ready() else {
            return false;
        };
        if self.cpu.ime.enabled() {
            trace!(
                "interrupt {irq:?} taken at {:04X} -> {:04X}",
                self.cpu.regs.pc,
                irq.vector()
            );
            let cycles = self
                .exec
                .enter_interrupt(&mut self.cpu, &mut self.mmu, irq);
            self.run_cycles(cycles);
        }
        true
    }

    /// Clock the peripherals for `cycles` base-rate cycles.
    ///
    /// Timer, serial and OAM DMA follow the CPU clock one cycle at a time.
    /// Display and audio run on real time, so in double-speed mode they only
    /// see half of the cycles.
    pub fn run_cycles(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.cpu.cycles += 1;
            self.mmu.timer.advance(&mut self.mmu.interrupts);
            self.mmu.serial.advance(&mut self.mmu.interrupts);
            if self.mmu.dma.active {
                self.mmu.dma_step();
            }
        }

        let real_time = if self.mmu.speed.fast_mode {
            cycles >> 1
        } else {
            cycles
        };
        self.mmu.audio.advance(real_time);
        self.mmu
            .display
            .advance(real_time, &self.mmu.video, &mut self.mmu.interrupts);
    }
}
