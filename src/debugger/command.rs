use std::fmt;

use thiserror::Error;

use super::inspect::PathError;

/// Breakpoint comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakOp {
    /// Fires whenever the value differs from the last observed one.
    #[default]
    Change,
    Eq,
    Neq,
}

impl BreakOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "change" => Some(BreakOp::Change),
            "=" | "==" => Some(BreakOp::Eq),
            "!=" => Some(BreakOp::Neq),
            _ => None,
        }
    }

    pub fn needs_value(self) -> bool {
        !matches!(self, BreakOp::Change)
    }
}

impl fmt::Display for BreakOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BreakOp::Change => "change",
            BreakOp::Eq => "==",
            BreakOp::Neq => "!=",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown cmd")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("bad OP arg for break: {0}")]
    BadOperator(String),
    #[error("need val for break op of {0}")]
    MissingValue(BreakOp),
    #[error("method args not yet impl")]
    MethodArgs,
    #[error(transparent)]
    Path(#[from] PathError),
}

pub const USAGE_EXAMINE: &str = "x FIELD_PATH";
pub const USAGE_BREAK: &str = "break FIELD_PATH [OP] [VAL]";
pub const USAGE_CALL: &str = "call METHOD_PATH";

/// A parsed debugger command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Examine {
        path: String,
    },
    Break {
        path: String,
        op: BreakOp,
        value: Option<String>,
    },
    Call {
        path: String,
    },
}

impl Command {
    /// Parse whitespace-split tokens. An empty line is `Ok(None)`.
    pub fn parse(tokens: &[&str]) -> Result<Option<Self>, CommandError> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let cmd = match *name {
            "run" => Command::Run,
            "x" => match args {
                [path] => Command::Examine {
                    path: path.to_string(),
                },
                _ => return Err(CommandError::Usage(USAGE_EXAMINE)),
            },
            "break" => {
                let (path, rest) = args
                    .split_first()
                    .ok_or(CommandError::Usage(USAGE_BREAK))?;
                let op = match rest.first() {
                    Some(tok) => {
                        BreakOp::parse(tok).ok_or_else(|| CommandError::BadOperator(tok.to_string()))?
                    }
                    None => BreakOp::Change,
                };
                let value = rest.get(1).map(|v| normalize_literal(v));
                if op.needs_value() && value.is_none() {
                    return Err(CommandError::MissingValue(op));
                }
                if rest.len() > 2 {
                    return Err(CommandError::Usage(USAGE_BREAK));
                }
                Command::Break {
                    path: path.to_string(),
                    op,
                    value,
                }
            }
            "call" => match args {
                [path] => Command::Call {
                    path: path.to_string(),
                },
                [] => return Err(CommandError::Usage(USAGE_CALL)),
                _ => return Err(CommandError::MethodArgs),
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

/// Values compare by their printed decimal form, so `0x1F` is rewritten to
/// `31`. Anything that is not a hex literal is kept verbatim.
pub fn normalize_literal(token: &str) -> String {
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .or_else(|| token.strip_prefix('$'));
    if let Some(digits) = hex
        && let Ok(n) = u64::from_str_radix(digits, 16)
    {
        return n.to_string();
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_no_command() {
        assert_eq!(Command::parse(&[]), Ok(None));
    }

    #[test]
    fn break_defaults_to_change() {
        let cmd = Command::parse(&["break", "timer.counter"]).unwrap();
        assert_eq!(
            cmd,
            Some(Command::Break {
                path: "timer.counter".into(),
                op: BreakOp::Change,
                value: None,
            })
        );
    }

    #[test]
    fn equality_ops_need_a_value() {
        assert_eq!(
            Command::parse(&["break", "timer.counter", "=="]),
            Err(CommandError::MissingValue(BreakOp::Eq))
        );
        assert_eq!(
            Command::parse(&["break", "timer.counter", "<", "3"]),
            Err(CommandError::BadOperator("<".into()))
        );
    }

    #[test]
    fn hex_values_are_normalized() {
        let cmd = Command::parse(&["break", "cpu.regs.pc", "=", "0x150"]).unwrap();
        assert!(matches!(
            cmd,
            Some(Command::Break { value: Some(ref v), .. }) if v == "336"
        ));
        assert_eq!(normalize_literal("true"), "true");
        assert_eq!(normalize_literal("0xZZ"), "0xZZ");
    }

    #[test]
    fn usage_errors() {
        assert_eq!(
            Command::parse(&["x"]),
            Err(CommandError::Usage(USAGE_EXAMINE))
        );
        assert_eq!(
            Command::parse(&["call", "step", "1"]),
            Err(CommandError::MethodArgs)
        );
        assert_eq!(
            Command::parse(&["brun"]).unwrap_err().to_string(),
            "unknown cmd"
        );
    }
}
