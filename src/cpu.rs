use crate::hardware::{BOOT_PC, BOOT_SP, Model};
use crate::registers::{ImeLatch, Registers};

/// Architectural CPU state. Instruction semantics live behind
/// [`ExecutionUnit`](crate::exec::ExecutionUnit).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: ImeLatch,
    pub halted: bool,
    pub stopped: bool,
    /// Instructions dispatched so far.
    pub steps: u64,
    /// Base-rate cycles elapsed so far.
    pub cycles: u64,
}

impl Cpu {
    /// Create a CPU initialized to the post-boot register state for `model`.
    pub fn new(model: Model) -> Self {
        let [af, bc, de, hl] = model.boot_registers();
        let mut regs = Registers::default();
        regs.set_af(af);
        regs.set_bc(bc);
        regs.set_de(de);
        regs.set_hl(hl);
        regs.sp = BOOT_SP;
        regs.pc = BOOT_PC;
        Self {
            regs,
            ..Self::default()
        }
    }

    /// Formatted CPU state string for debugging.
    pub fn status_line(&self) -> String {
        let r = &self.regs;
        format!(
            "AF:{:04X} BC:{:04X} DE:{:04X} HL:{:04X} PC:{:04X} SP:{:04X} IME:{} HALT:{} STOP:{} STEP:{} CY:{}",
            r.af(),
            r.bc(),
            r.de(),
            r.hl(),
            r.pc,
            r.sp,
            self.ime.enabled() as u8,
            self.halted as u8,
            self.stopped as u8,
            self.steps,
            self.cycles
        )
    }
}
