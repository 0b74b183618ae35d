//! Name-path access to machine state.
//!
//! Every readable member is registered up front as a typed getter under a
//! dotted path (`timer.counter`, `cpu.regs.pc`, ...). Groups are composite
//! values: they can be walked through and printed as a whole. Methods hang off
//! groups and come in two flavours, ones that only observe the machine and
//! ones that need it mutably.

use std::fmt;

use thiserror::Error;

use crate::gameboy::GameBoy;

/// A rendered state value. Comparisons in the debugger use its `Display` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Uint(u64),
    Text(String),
    Composite(Vec<(&'static str, Value)>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Composite(fields) => {
                f.write_str("{")?;
                for (i, (name, val)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{name}:{val}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Uint(n as u64)
            }
        })*
    };
}

value_from_uint!(u8, u16, u32, u64, usize);

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("field {segment} not found")]
    NotFound { segment: String },
    #[error("field {segment} is not a composite value")]
    NotComposite { segment: String },
    #[error("method {path} not found")]
    MethodNotFound { path: String },
}

pub type Getter = fn(&GameBoy) -> Value;
pub type SharedMethod = fn(&GameBoy) -> Option<Value>;
pub type ExclusiveMethod = fn(&mut GameBoy) -> Option<Value>;

enum Member {
    Field(Getter),
    Group(Group),
}

/// A composite node: named members plus the methods callable on it.
#[derive(Default)]
pub struct Group {
    members: Vec<(&'static str, Member)>,
    shared: Vec<(&'static str, SharedMethod)>,
    exclusive: Vec<(&'static str, ExclusiveMethod)>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, get: Getter) -> Self {
        self.members.push((name, Member::Field(get)));
        self
    }

    pub fn group(mut self, name: &'static str, group: Group) -> Self {
        self.members.push((name, Member::Group(group)));
        self
    }

    pub fn method(mut self, name: &'static str, call: SharedMethod) -> Self {
        self.shared.push((name, call));
        self
    }

    pub fn method_mut(mut self, name: &'static str, call: ExclusiveMethod) -> Self {
        self.exclusive.push((name, call));
        self
    }

    fn member(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, m)| m)
    }

    fn evaluate(&self, gb: &GameBoy) -> Value {
        Value::Composite(
            self.members
                .iter()
                .map(|(name, member)| (*name, member.evaluate(gb)))
                .collect(),
        )
    }
}

impl Member {
    fn evaluate(&self, gb: &GameBoy) -> Value {
        match self {
            Member::Field(get) => get(gb),
            Member::Group(group) => group.evaluate(gb),
        }
    }
}

/// Resolved target of a method path.
enum Method {
    Shared(SharedMethod),
    Exclusive(ExclusiveMethod),
}

pub struct Registry {
    root: Group,
}

impl Registry {
    pub fn new(root: Group) -> Self {
        Self { root }
    }

    fn segments(path: &str) -> Result<Vec<&str>, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(path.split('.').collect())
    }

    /// Walk `segments`, each of which must name a group.
    fn walk<'a>(&'a self, segments: &[&str]) -> Result<&'a Group, PathError> {
        let mut group = &self.root;
        for seg in segments {
            match group.member(seg) {
                Some(Member::Group(next)) => group = next,
                Some(Member::Field(_)) => {
                    return Err(PathError::NotComposite {
                        segment: seg.to_string(),
                    });
                }
                None => {
                    return Err(PathError::NotFound {
                        segment: seg.to_string(),
                    });
                }
            }
        }
        Ok(group)
    }

    /// Read the value at a dotted path.
    pub fn evaluate(&self, gb: &GameBoy, path: &str) -> Result<Value, PathError> {
        let segments = Self::segments(path)?;
        let (last, parents) = segments.split_last().ok_or(PathError::Empty)?;
        let group = self.walk(parents)?;
        match group.member(last) {
            Some(member) => Ok(member.evaluate(gb)),
            None => Err(PathError::NotFound {
                segment: last.to_string(),
            }),
        }
    }

    fn method(&self, path: &str) -> Result<Method, PathError> {
        let segments = Self::segments(path)?;
        let (last, parents) = segments.split_last().ok_or(PathError::Empty)?;
        let group = self.walk(parents)?;
        if let Some((_, call)) = group.shared.iter().find(|(n, _)| n == last) {
            return Ok(Method::Shared(*call));
        }
        if let Some((_, call)) = group.exclusive.iter().find(|(n, _)| n == last) {
            return Ok(Method::Exclusive(*call));
        }
        Err(PathError::MethodNotFound {
            path: path.to_string(),
        })
    }

    /// Call the zero-argument method at a dotted path.
    pub fn invoke(&self, gb: &mut GameBoy, path: &str) -> Result<Option<Value>, PathError> {
        Ok(match self.method(path)? {
            Method::Shared(call) => call(gb),
            Method::Exclusive(call) => call(gb),
        })
    }

    /// Registry describing the whole [`GameBoy`].
    pub fn standard() -> Self {
        let regs = Group::new()
            .field("a", |gb| gb.cpu.regs.a.into())
            .field("f", |gb| gb.cpu.regs.f.into())
            .field("b", |gb| gb.cpu.regs.b.into())
            .field("c", |gb| gb.cpu.regs.c.into())
            .field("d", |gb| gb.cpu.regs.d.into())
            .field("e", |gb| gb.cpu.regs.e.into())
            .field("h", |gb| gb.cpu.regs.h.into())
            .field("l", |gb| gb.cpu.regs.l.into())
            .field("pc", |gb| gb.cpu.regs.pc.into())
            .field("sp", |gb| gb.cpu.regs.sp.into())
            .method("af", |gb| Some(gb.cpu.regs.af().into()))
            .method("bc", |gb| Some(gb.cpu.regs.bc().into()))
            .method("de", |gb| Some(gb.cpu.regs.de().into()))
            .method("hl", |gb| Some(gb.cpu.regs.hl().into()));

        let cpu = Group::new()
            .group("regs", regs)
            .field("ime", |gb| gb.cpu.ime.enabled().into())
            .field("ime_requested", |gb| gb.cpu.ime.requested().into())
            .field("halted", |gb| gb.cpu.halted.into())
            .field("stopped", |gb| gb.cpu.stopped.into())
            .field("steps", |gb| gb.cpu.steps.into())
            .field("cycles", |gb| gb.cpu.cycles.into())
            .method("status_line", |gb| Some(gb.cpu.status_line().into()));

        let interrupts = Group::new()
            .field("vblank_enabled", |gb| gb.mmu.interrupts.vblank_enabled.into())
            .field("lcd_stat_enabled", |gb| {
                gb.mmu.interrupts.lcd_stat_enabled.into()
            })
            .field("timer_enabled", |gb| gb.mmu.interrupts.timer_enabled.into())
            .field("serial_enabled", |gb| gb.mmu.interrupts.serial_enabled.into())
            .field("joypad_enabled", |gb| gb.mmu.interrupts.joypad_enabled.into())
            .field("vblank_pending", |gb| gb.mmu.interrupts.vblank_pending.into())
            .field("lcd_stat_pending", |gb| {
                gb.mmu.interrupts.lcd_stat_pending.into()
            })
            .field("timer_pending", |gb| gb.mmu.interrupts.timer_pending.into())
            .field("serial_pending", |gb| gb.mmu.interrupts.serial_pending.into())
            .field("joypad_pending", |gb| gb.mmu.interrupts.joypad_pending.into())
            .method("read_ie", |gb| Some(gb.mmu.interrupts.read_ie().into()))
            .method("read_if", |gb| Some(gb.mmu.interrupts.read_if().into()))
            .method("ready", |gb| Some(gb.mmu.interrupts.ready().into()));

        let timer = Group::new()
            .field("div", |gb| gb.mmu.timer.div.into())
            .field("on", |gb| gb.mmu.timer.on.into())
            .field("freq_selector", |gb| gb.mmu.timer.freq_selector.into())
            .field("counter", |gb| gb.mmu.timer.counter.into())
            .field("modulo", |gb| gb.mmu.timer.modulo.into())
            .field("lag", |gb| gb.mmu.timer.lag.into())
            .method("period", |gb| Some(gb.mmu.timer.period().into()))
            .method_mut("reset_div", |gb| {
                gb.mmu.timer.reset_div();
                None
            });

        let serial = Group::new()
            .field("data", |gb| gb.mmu.serial.data.into())
            .field("start", |gb| gb.mmu.serial.start.into())
            .field("internal_clock", |gb| gb.mmu.serial.internal_clock.into())
            .field("fast_clock", |gb| gb.mmu.serial.fast_clock.into())
            .field("clock", |gb| gb.mmu.serial.clock.into())
            .field("bits_transferred", |gb| gb.mmu.serial.bits_transferred.into())
            .method_mut("take_output", |gb| {
                let bytes = gb.mmu.take_serial();
                Some(String::from_utf8_lossy(&bytes).into_owned().into())
            });

        let dma = Group::new()
            .field("active", |gb| gb.mmu.dma.active.into())
            .field("index", |gb| gb.mmu.dma.index.into())
            .field("source", |gb| gb.mmu.dma.source.into());

        let buttons = Group::new()
            .field("select", |gb| gb.mmu.joypad.buttons.select.into())
            .field("start", |gb| gb.mmu.joypad.buttons.start.into())
            .field("up", |gb| gb.mmu.joypad.buttons.up.into())
            .field("down", |gb| gb.mmu.joypad.buttons.down.into())
            .field("left", |gb| gb.mmu.joypad.buttons.left.into())
            .field("right", |gb| gb.mmu.joypad.buttons.right.into())
            .field("a", |gb| gb.mmu.joypad.buttons.a.into())
            .field("b", |gb| gb.mmu.joypad.buttons.b.into());

        let joypad = Group::new()
            .group("buttons", buttons)
            .field("read_mask", |gb| gb.mmu.joypad.read_mask.into())
            .method("read", |gb| Some(gb.mmu.joypad.read().into()));

        let speed = Group::new()
            .field("fast_mode", |gb| gb.mmu.speed.fast_mode.into())
            .field("prepared", |gb| gb.mmu.speed.prepared.into())
            .method_mut("commit", |gb| {
                gb.mmu.speed.commit();
                None
            });

        let root = Group::new()
            .field("model", |gb| format!("{:?}", gb.model).into())
            .group("cpu", cpu)
            .group("interrupts", interrupts)
            .group("timer", timer)
            .group("serial", serial)
            .group("dma", dma)
            .group("joypad", joypad)
            .group("speed", speed)
            .method_mut("step", |gb| {
                gb.step();
                None
            });

        Self::new(root)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
