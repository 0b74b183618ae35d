use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::warn;

use tickboy::{
    config::{self, EmulatorConfig, ModelPreference},
    debugger::Mode,
    emulator::Emulator,
};

#[derive(Parser)]
struct Args {
    /// Path to ROM file
    rom: PathBuf,

    /// Force DMG mode
    #[arg(long, conflicts_with = "cgb")]
    dmg: bool,

    /// Force CGB mode
    #[arg(long, conflicts_with = "dmg")]
    cgb: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in the interactive debugger, reading commands from stdin
    #[arg(long)]
    debug: bool,

    /// Echo serial output to stdout
    #[arg(long)]
    serial: bool,

    /// Stop after this many dispatched instructions
    #[arg(long)]
    steps: Option<u64>,

    /// Breakpoint to install, e.g. "timer.counter == 0"
    #[arg(long = "break")]
    breakpoints: Vec<String>,
}

fn merge_args(mut cfg: EmulatorConfig, args: &Args) -> EmulatorConfig {
    if args.dmg {
        cfg.model = ModelPreference::Dmg;
    } else if args.cgb {
        cfg.model = ModelPreference::Cgb;
    }
    cfg.dev_mode |= args.debug;
    cfg.serial_echo |= args.serial;
    if args.steps.is_some() {
        cfg.max_steps = args.steps;
    }
    cfg.breakpoints.extend(args.breakpoints.iter().cloned());
    cfg
}

/// Forward stdin lines to the main loop until EOF.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn type_line(emu: &mut Emulator, line: &str) {
    for b in line.bytes().chain(std::iter::once(b'\n')) {
        emu.feed_key_event(b, true);
        emu.feed_key_event(b, false);
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let cfg = merge_args(config::load_from_file(&config_path), &args);

    let mut emu = match Emulator::from_file(&args.rom, cfg.model) {
        Ok(emu) => emu,
        Err(e) => {
            eprintln!("Failed to load ROM: {e}");
            return;
        }
    };
    emu.set_dev_mode(cfg.dev_mode);
    for line in &cfg.breakpoints {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Err(e) = emu.set_breakpoint_command(&tokens) {
            warn!("Ignoring breakpoint \"{line}\": {e}");
        }
    }

    let input = cfg.dev_mode.then(spawn_stdin_reader);
    let mut stdout = std::io::stdout();

    loop {
        if let Some(max) = cfg.max_steps
            && emu.machine().cpu.steps >= max
        {
            break;
        }

        match &input {
            Some(rx) => {
                if emu.debugger().mode() == Mode::EditingCommandLine {
                    match rx.recv_timeout(Duration::from_millis(50)) {
                        Ok(line) => type_line(&mut emu, &line),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                } else if let Ok(line) = rx.try_recv() {
                    type_line(&mut emu, &line);
                }
                emu.debug_step_once();
            }
            None => emu.step_once(),
        }

        if cfg.serial_echo {
            emu.echo_serial(&mut stdout);
        }
    }

    println!("{}", emu.machine().cpu.status_line());
}
