use std::collections::HashSet;

use log::warn;

use crate::{cpu::Cpu, interrupts::Interrupt, mmu::Mmu};

/// Cycles taken by interrupt entry (5 M-cycles).
pub const INTERRUPT_ENTRY_CYCLES: u32 = 20;

/// Instruction decode/execute collaborator.
///
/// The orchestrator calls [`dispatch_one`](Self::dispatch_one) once per step
/// and then clocks the peripherals for the cycles it reports. Implementations
/// are free to touch any register or memory; `HALT`, `STOP` and `EI` are
/// expressed by setting `cpu.halted`, `cpu.stopped` or `cpu.ime.request()`.
pub trait ExecutionUnit: Send {
    /// Execute the instruction at PC and return the cycles it consumed.
    fn dispatch_one(&mut self, cpu: &mut Cpu, bus: &mut Mmu) -> u32;

    /// Transfer control to the handler for `irq`: clear IME and the pending
    /// flag, push PC, jump to the vector.
    fn enter_interrupt(&mut self, cpu: &mut Cpu, bus: &mut Mmu, irq: Interrupt) -> u32 {
        cpu.ime.disable();
        bus.interrupts.clear(irq);
        let pc = cpu.regs.pc;
        push16(cpu, bus, pc);
        cpu.regs.pc = irq.vector();
        INTERRUPT_ENTRY_CYCLES
    }
}

pub fn fetch8(cpu: &mut Cpu, bus: &mut Mmu) -> u8 {
    let val = bus.read_byte(cpu.regs.pc);
    cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
    val
}

pub fn fetch16(cpu: &mut Cpu, bus: &mut Mmu) -> u16 {
    let lo = fetch8(cpu, bus) as u16;
    let hi = fetch8(cpu, bus) as u16;
    (hi << 8) | lo
}

pub fn push16(cpu: &mut Cpu, bus: &mut Mmu, val: u16) {
    cpu.regs.sp = cpu.regs.sp.wrapping_sub(1);
    bus.write_byte(cpu.regs.sp, (val >> 8) as u8);
    cpu.regs.sp = cpu.regs.sp.wrapping_sub(1);
    bus.write_byte(cpu.regs.sp, val as u8);
}

pub fn pop16(cpu: &mut Cpu, bus: &mut Mmu) -> u16 {
    let lo = bus.read_byte(cpu.regs.sp) as u16;
    cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
    let hi = bus.read_byte(cpu.regs.sp) as u16;
    cpu.regs.sp = cpu.regs.sp.wrapping_add(1);
    (hi << 8) | lo
}

/// Execution unit covering control flow, the mode-changing opcodes and a few
/// loads. Anything else runs as a 4-cycle no-op.
#[derive(Debug, Default)]
pub struct MinimalExecutor {
    warned: HashSet<u8>,
}

impl MinimalExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExecutionUnit for MinimalExecutor {
    fn dispatch_one(&mut self, cpu: &mut Cpu, bus: &mut Mmu) -> u32 {
        let opcode = fetch8(cpu, bus);
        match opcode {
            0x00 => 4,
            0x10 => {
                // STOP is two bytes long.
                fetch8(cpu, bus);
                cpu.stopped = true;
                4
            }
            0x18 => {
                let offset = fetch8(cpu, bus) as i8;
                cpu.regs.pc = cpu.regs.pc.wrapping_add_signed(offset as i16);
                12
            }
            0x3E => {
                cpu.regs.a = fetch8(cpu, bus);
                8
            }
            0x76 => {
                cpu.halted = true;
                4
            }
            0xC3 => {
                cpu.regs.pc = fetch16(cpu, bus);
                16
            }
            0xC9 => {
                cpu.regs.pc = pop16(cpu, bus);
                16
            }
            0xCD => {
                let target = fetch16(cpu, bus);
                let ret = cpu.regs.pc;
                push16(cpu, bus, ret);
                cpu.regs.pc = target;
                24
            }
            0xD9 => {
                cpu.regs.pc = pop16(cpu, bus);
                cpu.ime.enable_now();
                16
            }
            0xE0 => {
                let addr = 0xFF00 | fetch8(cpu, bus) as u16;
                bus.write_byte(addr, cpu.regs.a);
                12
            }
            0xEA => {
                let addr = fetch16(cpu, bus);
                bus.write_byte(addr, cpu.regs.a);
                16
            }
            0xF0 => {
                let addr = 0xFF00 | fetch8(cpu, bus) as u16;
                cpu.regs.a = bus.read_byte(addr);
                12
            }
            0xF3 => {
                cpu.ime.disable();
                4
            }
            0xFA => {
                let addr = fetch16(cpu, bus);
                cpu.regs.a = bus.read_byte(addr);
                16
            }
            0xFB => {
                cpu.ime.request();
                4
            }
            other => {
                if self.warned.insert(other) {
                    warn!(
                        "opcode {other:02X} at {:04X} not implemented, treated as NOP",
                        cpu.regs.pc.wrapping_sub(1)
                    );
                }
                4
            }
        }
    }
}
