use std::io::{self, Write};

use log::{debug, info, warn};

use super::command::{BreakOp, Command, CommandError, normalize_literal};
use super::inspect::{PathError, Registry, Value};
use crate::gameboy::GameBoy;

/// Key that drops back to the command prompt from any mode.
pub const BREAK_IN_KEY: u8 = b'`';
pub const KEY_BACKSPACE: u8 = 0x08;
pub const KEY_DELETE: u8 = 0x7F;
pub const KEY_NEWLINE: u8 = b'\n';
pub const KEY_RETURN: u8 = b'\r';

const PROMPT: &str = "\n> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    AwaitingCommand,
    EditingCommandLine,
    RunningUnchecked,
    RunningWithBreakpoints,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub path: String,
    pub op: BreakOp,
    /// Rendered comparison value. For `Change` this is the last observed value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointHit {
    pub path: String,
    pub op: BreakOp,
    pub expected: String,
    pub observed: String,
}

/// Result of one breakpoint-checked step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Stepped,
    Hit(BreakpointHit),
    /// A breakpoint's path stopped resolving; nothing was executed.
    Lost(String),
}

/// Interactive command loop driven by key events.
pub struct Debugger {
    mode: Mode,
    registry: Registry,
    breakpoints: Vec<Breakpoint>,
    line_buf: Vec<u8>,
    keys: [bool; 256],
    pending_keys: Vec<u8>,
    out: Box<dyn Write + Send>,
}

impl Debugger {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Debugger whose prompt, echo and reports go to `out`.
    pub fn with_output(out: Box<dyn Write + Send>) -> Self {
        Self {
            mode: Mode::default(),
            registry: Registry::standard(),
            breakpoints: Vec::new(),
            line_buf: Vec::new(),
            keys: [false; 256],
            pending_keys: Vec::new(),
            out,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Text typed on the current command line so far.
    pub fn pending_line(&self) -> String {
        String::from_utf8_lossy(&self.line_buf).into_owned()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn evaluate_path(&self, gb: &GameBoy, path: &str) -> Result<Value, PathError> {
        self.registry.evaluate(gb, path)
    }

    pub fn invoke_path(&self, gb: &mut GameBoy, path: &str) -> Result<Option<Value>, PathError> {
        self.registry.invoke(gb, path)
    }

    /// Feed one key transition. Only presses of a key that was up count.
    pub fn process_key_event(&mut self, key: u8, pressed: bool) {
        let slot = &mut self.keys[key as usize];
        let rising = pressed && !*slot;
        *slot = pressed;
        if rising {
            self.on_key_pressed(key);
        }
    }

    /// Feed a full snapshot of key state, one entry per key code.
    pub fn update_key_state(&mut self, keys: &[bool; 256]) {
        for (code, pressed) in keys.iter().enumerate() {
            self.process_key_event(code as u8, *pressed);
        }
    }

    fn on_key_pressed(&mut self, key: u8) {
        if key == BREAK_IN_KEY {
            if self.mode != Mode::AwaitingCommand {
                info!("debugger break-in");
            }
            self.mode = Mode::AwaitingCommand;
            self.pending_keys.clear();
            return;
        }
        if matches!(self.mode, Mode::AwaitingCommand | Mode::EditingCommandLine) {
            self.pending_keys.push(key);
        }
    }

    /// Advance the session by one unit of work: a prompt, a batch of typed
    /// keys, or one machine step depending on the mode.
    pub fn step(&mut self, gb: &mut GameBoy) {
        match self.mode {
            Mode::RunningUnchecked => gb.step(),
            Mode::RunningWithBreakpoints => {
                self.tick(gb);
            }
            Mode::AwaitingCommand => {
                self.line_buf.clear();
                self.emit(format_args!("{PROMPT}"));
                self.mode = Mode::EditingCommandLine;
            }
            Mode::EditingCommandLine => self.edit_line(gb),
        }
    }

    fn edit_line(&mut self, gb: &mut GameBoy) {
        let keys = std::mem::take(&mut self.pending_keys);
        for key in keys {
            match key {
                KEY_BACKSPACE | KEY_DELETE => {
                    if self.line_buf.pop().is_some() {
                        self.emit(format_args!("\x08 \x08"));
                    }
                }
                KEY_NEWLINE | KEY_RETURN => {
                    self.emit(format_args!("\n"));
                    self.mode = Mode::AwaitingCommand;
                    let line = String::from_utf8_lossy(&self.line_buf).into_owned();
                    self.run_line(gb, &line);
                    // Whatever was typed after the newline is discarded.
                    return;
                }
                _ => {
                    self.line_buf.push(key);
                    self.emit(format_args!("{}", key as char));
                }
            }
        }
    }

    fn run_line(&mut self, gb: &mut GameBoy, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Err(err) = self.execute(gb, &tokens) {
            self.emit(format_args!("{err}\n"));
        }
    }

    /// Parse and run one tokenized command.
    pub fn execute(&mut self, gb: &mut GameBoy, tokens: &[&str]) -> Result<(), CommandError> {
        let Some(cmd) = Command::parse(tokens)? else {
            return Ok(());
        };
        debug!("debugger command {cmd:?}");
        match cmd {
            Command::Run => {
                self.mode = if self.breakpoints.is_empty() {
                    Mode::RunningUnchecked
                } else {
                    Mode::RunningWithBreakpoints
                };
            }
            Command::Examine { path } => {
                let val = self.registry.evaluate(gb, &path)?;
                self.emit(format_args!("{val}\n"));
            }
            Command::Break { path, op, value } => {
                self.set_breakpoint(gb, &path, op, value.as_deref())?;
            }
            Command::Call { path } => {
                if let Some(val) = self.registry.invoke(gb, &path)? {
                    self.emit(format_args!("{val}\n"));
                }
            }
        }
        Ok(())
    }

    /// Install a breakpoint on `path`. `Change` records the current value;
    /// `Eq`/`Neq` need an explicit one.
    pub fn set_breakpoint(
        &mut self,
        gb: &GameBoy,
        path: &str,
        op: BreakOp,
        value: Option<&str>,
    ) -> Result<(), CommandError> {
        let current = self.registry.evaluate(gb, path)?.to_string();
        let value = match (op, value) {
            (BreakOp::Change, _) => current,
            (_, Some(v)) => normalize_literal(v),
            (_, None) => return Err(CommandError::MissingValue(op)),
        };
        info!("breakpoint on {path} {op} {value}");
        self.breakpoints.push(Breakpoint {
            path: path.to_string(),
            op,
            value,
        });
        Ok(())
    }

    /// Check every breakpoint, then dispatch one step if none fired.
    pub fn tick(&mut self, gb: &mut GameBoy) -> TickOutcome {
        for i in 0..self.breakpoints.len() {
            let observed = match self.registry.evaluate(gb, &self.breakpoints[i].path) {
                Ok(val) => val.to_string(),
                Err(err) => {
                    let path = self.breakpoints[i].path.clone();
                    warn!("breakpoint path {path} no longer resolves: {err}");
                    self.emit(format_args!("breakpoint path {path} no longer resolves\n"));
                    self.mode = Mode::AwaitingCommand;
                    return TickOutcome::Lost(path);
                }
            };
            let bp = &mut self.breakpoints[i];
            let fired = match bp.op {
                BreakOp::Change => bp.value != observed,
                BreakOp::Eq => bp.value == observed,
                BreakOp::Neq => bp.value != observed,
            };
            if !fired {
                continue;
            }
            let hit = BreakpointHit {
                path: bp.path.clone(),
                op: bp.op,
                expected: bp.value.clone(),
                observed: observed.clone(),
            };
            if bp.op == BreakOp::Change {
                bp.value = observed;
            }
            self.report(&hit);
            self.mode = Mode::AwaitingCommand;
            return TickOutcome::Hit(hit);
        }
        gb.step();
        TickOutcome::Stepped
    }

    fn report(&mut self, hit: &BreakpointHit) {
        match hit.op {
            BreakOp::Change => self.emit(format_args!(
                "hit breakpoint: {} changed from {} to {}\n",
                hit.path, hit.expected, hit.observed
            )),
            BreakOp::Eq => self.emit(format_args!(
                "hit breakpoint: {} == {}\n",
                hit.path, hit.observed
            )),
            BreakOp::Neq => self.emit(format_args!(
                "hit breakpoint: {} != {} (now {})\n",
                hit.path, hit.expected, hit.observed
            )),
        }
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(err) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            warn!("debugger output failed: {err}");
        }
    }
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}
