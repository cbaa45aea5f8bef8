use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A formula argument as written in the source, optionally complemented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub name: String,
    pub complement: bool,
}

impl Literal {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            complement: false,
        }
    }

    #[must_use]
    pub fn complement(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            complement: true,
        }
    }

    /// Reads `name` or `~name`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        text.strip_prefix('~').map_or_else(
            || Self::new(text),
            |name| Self::complement(name.trim_start_matches('~')),
        )
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complement {
            write!(f, "~{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Xor,
    Not,
    Null,
    Imply,
    Iff,
    Atleast { min: u32 },
    Cardinality { min: u32, max: u32 },
}

impl Operator {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Null => "null",
            Self::Imply => "imply",
            Self::Iff => "iff",
            Self::Atleast { .. } => "atleast",
            Self::Cardinality { .. } => "cardinality",
        }
    }

    /// MEF element wrapping the arguments; `None` for pass-through formulas.
    #[must_use]
    pub fn element(&self) -> Option<&'static str> {
        match self {
            Self::Null => None,
            _ => Some(self.as_str()),
        }
    }

    fn check_arity(self, num_args: usize) -> Result<()> {
        let (expected, ok) = match self {
            Self::Not | Self::Null => ("exactly 1", num_args == 1),
            Self::Xor | Self::Imply | Self::Iff => ("exactly 2", num_args == 2),
            Self::And | Self::Or => ("at least 2", num_args >= 2),
            Self::Atleast { min } => {
                if (min as usize) >= num_args {
                    return Err(Error::InvalidAtleast { min, num_args });
                }
                ("at least 2", num_args >= 2)
            }
            Self::Cardinality { min, max } => {
                if min > max || (max as usize) > num_args {
                    return Err(Error::InvalidCardinality { min, max, num_args });
                }
                ("at least 1", num_args >= 1)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(Error::Arity {
                operator: self.as_str(),
                expected,
                actual: num_args,
            })
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Boolean formula over named arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    operator: Operator,
    arguments: Vec<Literal>,
}

impl Formula {
    pub fn new(operator: Operator, arguments: Vec<Literal>) -> Result<Self> {
        if arguments.is_empty() {
            return Err(Error::EmptyFormula);
        }
        let mut seen = HashSet::with_capacity(arguments.len());
        for arg in &arguments {
            if !seen.insert(arg) {
                return Err(Error::RepeatedArgument(arg.to_string()));
            }
        }
        operator.check_arity(arguments.len())?;
        Ok(Self {
            operator,
            arguments,
        })
    }

    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn arguments(&self) -> &[Literal] {
        &self.arguments
    }
}

/// Failure probability, written back exactly as it was given.
#[derive(Debug, Clone, PartialEq)]
pub struct Probability {
    value: f64,
    text: String,
}

impl Probability {
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Probability {
    fn from(value: f64) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

impl FromStr for Probability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let value = text
            .parse()
            .map_err(|_| Error::InvalidProbability(text.to_string()))?;
        Ok(Self {
            value,
            text: text.to_string(),
        })
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicEvent {
    pub name: String,
    pub probability: Probability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseEvent {
    pub name: String,
    pub state: bool,
}

/// Index of an event inside its fault tree table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventRef {
    Gate(usize),
    BasicEvent(usize),
    HouseEvent(usize),
    Undefined(usize),
}

impl EventRef {
    /// MEF element used to reference the event from a formula.
    #[must_use]
    pub const fn element(&self) -> &'static str {
        match self {
            Self::Gate(_) => "gate",
            Self::BasicEvent(_) => "basic-event",
            Self::HouseEvent(_) => "house-event",
            Self::Undefined(_) => "event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    pub event: EventRef,
    pub complement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub name: String,
    pub formula: Formula,
    pub arguments: Vec<Argument>,
}

impl Gate {
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.formula.operator()
    }

    pub fn gate_arguments(&self) -> impl Iterator<Item = usize> + '_ {
        self.arguments.iter().filter_map(|arg| match arg.event {
            EventRef::Gate(index) => Some(index),
            _ => None,
        })
    }

    pub fn complement_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|arg| arg.complement)
    }
}
