use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Redefinition of an event: {0}")]
    Redefinition(String),

    #[error("Formula has no arguments")]
    EmptyFormula,

    #[error("Repeated arguments: {0}")]
    RepeatedArgument(String),

    #[error("Operator '{operator}' expects {expected} arguments, got {actual}")]
    Arity {
        operator: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("Invalid k/n for the combination formula: {min}/{num_args}")]
    InvalidAtleast { min: u32, num_args: usize },

    #[error("Invalid l/h for the cardinality formula: {min}/{max} with {num_args} arguments")]
    InvalidCardinality { min: u32, max: u32, num_args: usize },

    #[error("Invalid probability {0}: expected a number in [0, 1]")]
    InvalidProbability(String),

    #[error("Detected multiple top gates:\n{0:?}")]
    MultipleTopGates(Vec<String>),

    #[error("No top gate is detected")]
    NoTopGate,

    #[error("Detected a cycle: {}", .0.join("->"))]
    Cycle(Vec<String>),

    #[error("Detected detached gates that may be in a cycle\n{gates:?}\nDetected a cycle: {}", .cycle.join("->"))]
    DetachedCycle {
        gates: Vec<String>,
        cycle: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
