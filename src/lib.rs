//! Cycle-accurate Game Boy / Game Boy Color timing core.
//!
//! The crate models the timer, serial port, OAM DMA, joypad and CGB speed
//! switch, the step orchestrator that clocks them against instruction
//! dispatch, and an interactive debugger that inspects the machine by dotted
//! path. Instruction decoding, the display and audio are collaborators behind
//! traits; hosts drive everything through the [`emulator`] facade.

/// Idle audio stand-in and the audio collaborator trait.
pub mod audio;

/// Cartridge image and the bank-controller trait.
pub mod cartridge;

/// TOML configuration for the binary.
pub mod config;

/// CPU architectural state and counters.
pub mod cpu;

/// Introspection, breakpoints and the key-driven command loop.
pub mod debugger;

/// OAM DMA transfer engine.
pub mod dma;

/// Host-facing facade.
pub mod emulator;

pub mod error;

/// Instruction execution seam.
pub mod exec;

/// Machine wiring and the per-step orchestrator.
pub mod gameboy;

/// Hardware revisions and their power-on constants.
pub mod hardware;

/// Interrupt sources and the IE/IF lines.
pub mod interrupts;

/// Joypad register with edge-triggered interrupt.
pub mod joypad;

/// Memory map and I/O routing.
pub mod mmu;

pub mod registers;

/// Serial port with a disconnected cable.
pub mod serial;

pub mod snapshot;

/// CGB double-speed switch (KEY1).
pub mod speed;

/// Divider/timer unit.
pub mod timer;

/// Display collaborator trait and the idle frame clock.
pub mod video;
