//! Fault tree model and Open-PSA Model Exchange Format output shared by
//! the translators.

pub mod builder;
pub mod error;
pub mod model;
pub mod tree;
pub mod xml;

pub use builder::FaultTreeBuilder;
pub use error::{Error, Result};
pub use model::{
    Argument, BasicEvent, EventRef, Formula, Gate, HouseEvent, Literal, Operator, Probability,
};
pub use tree::FaultTree;
pub use xml::{to_xml_string, write_mef, XmlOptions};
