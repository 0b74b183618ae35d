mod common;

use common::{PROGRAM_BASE, machine_with_program, machine_with_recording_units};
use tickboy::exec::pop16;
use tickboy::hardware::Model;
use tickboy::interrupts::Interrupt;

const NOP: u8 = 0x00;
const HALT: u8 = 0x76;
const EI: u8 = 0xFB;

#[test]
fn halt_parks_until_an_enabled_interrupt_is_pending() {
    let mut gb = machine_with_program(Model::Dmg, &[HALT, 0x3E, 0x42]);
    gb.step();
    assert!(gb.cpu.halted);

    let cycles = gb.cpu.cycles;
    let steps = gb.cpu.steps;
    gb.step();
    assert!(gb.cpu.halted);
    assert_eq!(gb.cpu.cycles, cycles + 4);
    assert_eq!(gb.cpu.steps, steps);

    // Pending but not enabled: still parked.
    gb.mmu.interrupts.request(Interrupt::Serial);
    gb.step();
    assert!(gb.cpu.halted);

    gb.mmu.interrupts.set_enabled(Interrupt::Serial, true);
    gb.step();
    assert!(!gb.cpu.halted);
    // IME is off, so execution resumes after HALT without entering a handler.
    assert_eq!(gb.cpu.regs.a, 0x42);
    assert_eq!(gb.cpu.regs.pc, PROGRAM_BASE + 3);
    assert!(gb.mmu.interrupts.serial_pending);
}

#[test]
fn halt_with_ime_enters_handler() {
    let mut gb = machine_with_program(Model::Dmg, &[HALT, NOP]);
    gb.cpu.ime.enable_now();
    gb.step();
    gb.mmu.write_byte(0xFFFF, 0x04);
    gb.mmu.interrupts.request(Interrupt::Timer);
    gb.step();

    assert!(!gb.cpu.halted);
    assert!(!gb.cpu.ime.enabled());
    assert!(!gb.mmu.interrupts.timer_pending);
    // Handler's first byte (open bus, a no-op) was dispatched in the same step.
    assert_eq!(gb.cpu.regs.pc, 0x51);
    assert_eq!(pop16(&mut gb.cpu, &mut gb.mmu), PROGRAM_BASE + 1);
}

#[test]
fn ei_takes_effect_one_instruction_late() {
    let mut gb = machine_with_program(Model::Dmg, &[EI, NOP, NOP]);
    gb.mmu.write_byte(0xFFFF, 0x04);
    gb.mmu.interrupts.request(Interrupt::Timer);

    gb.step();
    assert!(!gb.cpu.ime.enabled());
    assert!(gb.cpu.ime.requested());

    gb.step();
    assert!(gb.cpu.ime.enabled());
    assert_eq!(gb.cpu.regs.pc, PROGRAM_BASE + 2);
    assert!(gb.mmu.interrupts.timer_pending);

    gb.step();
    assert!(!gb.mmu.interrupts.timer_pending);
    assert_eq!(pop16(&mut gb.cpu, &mut gb.mmu), PROGRAM_BASE + 2);
}

#[test]
fn highest_priority_interrupt_wins() {
    let mut gb = machine_with_program(Model::Dmg, &[NOP]);
    gb.cpu.ime.enable_now();
    gb.mmu.write_byte(0xFFFF, 0x1F);
    gb.mmu.write_byte(0xFF0F, 0x1C);
    gb.step();
    assert!(!gb.mmu.interrupts.timer_pending);
    assert!(gb.mmu.interrupts.serial_pending);
    assert!(gb.mmu.interrupts.joypad_pending);
    assert_eq!(pop16(&mut gb.cpu, &mut gb.mmu), PROGRAM_BASE);
}

#[test]
fn stop_commits_speed_switch_and_resets_div() {
    // LD A,1; LDH (4D),A; STOP; NOP
    let program = [0x3E, 0x01, 0xE0, 0x4D, 0x10, 0x00, NOP];
    let mut gb = machine_with_program(Model::Cgb, &program);
    gb.step();
    gb.step();
    assert!(gb.mmu.speed.prepared);

    gb.step();
    assert!(gb.cpu.stopped);
    assert!(!gb.mmu.speed.fast_mode);

    gb.step();
    assert!(!gb.cpu.stopped);
    assert!(gb.mmu.speed.fast_mode);
    assert!(!gb.mmu.speed.prepared);
    assert_eq!(gb.mmu.read_byte(0xFF4D), 0xFE);
    // 4 wake-up cycles plus the NOP.
    assert_eq!(gb.mmu.timer.div, 8);
    assert_eq!(gb.cpu.regs.pc, PROGRAM_BASE + 7);
}

#[test]
fn stop_without_prepared_switch_keeps_speed() {
    let mut gb = machine_with_program(Model::Cgb, &[0x10, 0x00, NOP]);
    gb.step();
    gb.step();
    assert!(!gb.mmu.speed.fast_mode);
    assert_eq!(gb.mmu.timer.div, 8);
}

#[test]
fn double_speed_halves_display_and_audio_time_only() {
    let (mut gb, logs) = machine_with_recording_units(Model::Cgb, &[NOP, NOP]);
    gb.step();
    gb.mmu.speed.fast_mode = true;
    let div = gb.mmu.timer.div;
    gb.step();

    assert_eq!(gb.mmu.timer.div, div.wrapping_add(4));
    assert_eq!(*logs.display.lock().unwrap(), vec![4, 2]);
    assert_eq!(*logs.audio.lock().unwrap(), vec![4, 2]);
}

#[test]
fn timer_overflow_wakes_halt() {
    let mut gb = machine_with_program(Model::Dmg, &[HALT, NOP]);
    gb.mmu.write_byte(0xFFFF, 0x04);
    gb.mmu.write_byte(0xFF05, 0xFF);
    gb.mmu.write_byte(0xFF06, 0x10);
    gb.mmu.write_byte(0xFF07, 0x05);

    gb.step();
    assert!(gb.cpu.halted);
    let mut woke = false;
    for _ in 0..16 {
        gb.step();
        if !gb.cpu.halted {
            woke = true;
            break;
        }
    }
    assert!(woke);
    assert!(gb.mmu.interrupts.timer_pending);
    assert_eq!(gb.mmu.read_byte(0xFF05), 0x10);
}
