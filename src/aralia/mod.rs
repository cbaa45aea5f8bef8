//! Aralia fault tree notation.
//!
//! ```text
//! FaultTreeName
//! top := (g1 | e1)                  OR
//! g1 := (e2 & ~h1)                  AND
//! g2 := @(2, [e1, e2, e3])          ATLEAST
//! g3 := #(1, 2, [e1, e2, e3])       CARDINALITY
//! g4 := ~(e1)                       NOT
//! g5 := (e1 ^ e2)                   XOR
//! g6 := e1                          NULL
//! g7 := (e1 => e2)                  IMPLY
//! g8 := (e1 <=> e2)                 IFF
//! p(e1) = 0.1                       basic event probability
//! s(h1) = true                      house event state
//! ```
//!
//! Arguments that are never defined become undefined events with a warning.

mod error;
mod grammar;

use std::io::BufRead;

use tracing::debug;

use mef_core::{FaultTree, FaultTreeBuilder, Probability};

pub use error::{Error, ErrorKind, Result};
pub use grammar::parse_formula;

use grammar::{FT_NAME, GATE, PROBABILITY, STATE};

#[derive(Debug, Default)]
struct Interpreter {
    name: Option<String>,
    builder: FaultTreeBuilder,
}

impl Interpreter {
    fn line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if let Some(caps) = GATE.captures(line) {
            let formula = parse_formula(&caps["formula"])?;
            self.builder.add_gate(&caps["name"], formula)?;
        } else if let Some(caps) = PROBABILITY.captures(line) {
            let probability: Probability = caps["prob"].parse()?;
            self.builder.add_basic_event(&caps["name"], probability)?;
        } else if let Some(caps) = STATE.captures(line) {
            self.builder
                .add_house_event(&caps["name"], &caps["state"] == "true")?;
        } else if let Some(caps) = FT_NAME.captures(line) {
            let name = &caps["name"];
            if let Some(existing) = &self.name {
                return Err(Error::format(format!(
                    "Redefinition of the fault tree name:\n{existing} to {name}"
                )));
            }
            self.name = Some(name.to_string());
        } else {
            return Err(Error::parsing("Cannot interpret the line."));
        }
        Ok(())
    }

    fn finish(self, multi_top: bool) -> Result<FaultTree> {
        let name = self
            .name
            .ok_or_else(|| Error::format("The fault tree name is not given."))?;
        debug!(fault_tree = %name, gates = self.builder.num_gates(), "input read");
        Ok(self.builder.multi_top(multi_top).build(name)?)
    }
}

/// Reads a whole Aralia description into a validated fault tree.
pub fn parse_reader<R: BufRead>(reader: R, multi_top: bool) -> Result<FaultTree> {
    let mut interpreter = Interpreter::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        interpreter
            .line(&line)
            .map_err(|err| err.at_line(index + 1, &line))?;
    }
    interpreter.finish(multi_top)
}

pub fn parse_str(input: &str, multi_top: bool) -> Result<FaultTree> {
    parse_reader(input.as_bytes(), multi_top)
}

#[cfg(test)]
mod tests {
    use mef_core::{EventRef, Operator};

    use super::*;

    fn parse(lines: &[&str]) -> Result<FaultTree> {
        parse_str(&lines.join("\n"), false)
    }

    fn kind(lines: &[&str]) -> ErrorKind {
        parse(lines).unwrap_err().kind()
    }

    fn argument_names(tree: &FaultTree, gate: &str) -> Vec<String> {
        tree.gate(gate)
            .unwrap()
            .formula
            .arguments()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn correct_tree() {
        let tree = parse(&[
            "ValidFaultTree",
            "",
            "root := g1 | g2 | g3 | g4 | g7 | g9 | g10 | g11 | e1",
            "g1 := e2 & g3 & g5",
            "g2 := h1 & g6",
            "g3 := (g6 ^ e2)",
            "g4 := @(2, [g5, e3, e4])",
            "g5 := ~(e3)",
            "g6 := (e3 | e4)",
            "",
            "g7 := g8",
            "",
            "g8 := ~e2 & ~e3",
            "",
            "g9 := (g8 => g2)",
            "g10 := e1 <=> e2",
            "g11 := #(2, 4, [e1, e2, e3, e4, g5])",
            "p(e1) = 0.1",
            "p(e2) = 0.2",
            "p(e3) = 0.3",
            "s(h1) = true",
            "s(h2) = false",
        ])
        .unwrap();
        assert_eq!(tree.name(), "ValidFaultTree");
        assert_eq!(tree.gates().len(), 12);
        assert_eq!(tree.basic_events().len(), 3);
        assert_eq!(tree.house_events().len(), 2);
        assert_eq!(tree.undefined_events(), ["e4".to_string()]);
        assert_eq!(tree.top_gates().next().unwrap().name, "root");
        assert!(tree.is_orphan(EventRef::HouseEvent(1)));
    }

    #[test]
    fn name_redefinition() {
        assert_eq!(
            kind(&["FaultTreeName", "AnotherFaultTree", "g1 := e1"]),
            ErrorKind::Format
        );
    }

    #[test]
    fn missing_name() {
        assert_eq!(
            kind(&["g1 := g2 & e1", "g2 := h1 & e1"]),
            ErrorKind::Format
        );
    }

    #[test]
    fn invalid_names() {
        for name in ["Peri.od", "EndWithDash-", "Double--Dash", "42StartWithNumbers", "~Not"] {
            let err = parse(&[name]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parsing, "{name}");
            assert_eq!(err.line(), Some(1));
        }
    }

    #[test]
    fn illegal_lines() {
        for line in ["g1 = e1 & e2", "g1 : e1 & e2", "g1 := g2 + e1", "p(e1) = 1.5", "s(h1) = yes"] {
            assert_eq!(kind(&["FT", line]), ErrorKind::Parsing, "{line}");
        }
    }

    #[test]
    fn error_reports_line() {
        let err = parse(&["FT", "g1 := g2 & e1", "g2 := e1 & e1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FaultTree);
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().ends_with("In line 3:\ng2 := e1 & e1"));
    }

    #[test]
    fn probability_text_is_kept() {
        let tree = parse(&["FT", "g1 := e1 & e2", "p(e1) = 0.99999999999999999", "p(e2) = 0.10"]).unwrap();
        let texts: Vec<&str> = tree
            .basic_events()
            .iter()
            .map(|event| event.probability.as_str())
            .collect();
        assert_eq!(texts, ["0.99999999999999999", "0.10"]);
    }

    #[test]
    fn unreadable_input_is_io_error() {
        let input: &[u8] = b"FT\ng1 := e1 & \xff\xfe\n";
        let err = parse_reader(input, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn case_sensitive_names() {
        assert!(parse(&["FT", "g1 := g2 & G2", "g2 := E1 & e1", "G2 := E1 & e1"]).is_ok());
    }

    #[test]
    fn event_redefinition() {
        assert_eq!(
            kind(&["FT", "g1 := g2 & e1", "g2 := h1 & e1", "g2 := e2 & e1"]),
            ErrorKind::FaultTree
        );
    }

    #[test]
    fn gate_kinds() {
        let tree = parse(&["FT", "g1 := @(2, [e1, e2, e3, e4, e5])"]).unwrap();
        let gate = &tree.gates()[0];
        assert_eq!(gate.name, "g1");
        assert_eq!(gate.operator(), Operator::Atleast { min: 2 });
        assert_eq!(argument_names(&tree, "g1"), ["e1", "e2", "e3", "e4", "e5"]);

        let tree = parse(&["FT", "g1 := #(2, 4, [e1, e2, e3, e4, e5])"]).unwrap();
        assert_eq!(
            tree.gates()[0].operator(),
            Operator::Cardinality { min: 2, max: 4 }
        );

        let tree = parse(&["FT", "g1 := a"]).unwrap();
        assert_eq!(tree.gates()[0].operator(), Operator::Null);
        assert_eq!(argument_names(&tree, "g1"), ["a"]);
    }

    #[test]
    fn complement_arguments() {
        for line in [
            "g1 := e1 | ~e2",
            "g1 := e1 ^ ~e2",
            "g1 := e1 => ~e2",
            "g1 := e1 & ~e2",
            "g1 := @(2, [e1, ~e2, e3])",
            "g1 := ~e2",
            "g1 := ~(~e2)",
            "g1 := ~e2 & e2",
        ] {
            let tree = parse(&["FT", line]).unwrap();
            let gate = &tree.gates()[0];
            assert!(argument_names(&tree, "g1").contains(&"~e2".to_string()), "{line}");
            let complements: Vec<_> = gate.complement_arguments().collect();
            assert_eq!(complements.len(), 1, "{line}");
            assert_eq!(tree.event_name(complements[0].event), "e2");
        }
    }

    #[test]
    fn top_gate_detection() {
        assert_eq!(
            kind(&["FT", "g1 := g2 & e1", "g2 := g1 & e1"]),
            ErrorKind::FaultTree
        );
        let lines = ["FT", "g1 := e2 & e1", "g2 := h1 & e1"];
        assert_eq!(kind(&lines), ErrorKind::FaultTree);
        assert!(parse_str(&lines.join("\n"), true).is_ok());
    }

    #[test]
    fn orphan_events_are_allowed() {
        let mut lines = vec!["FT", "g1 := g2 & e1", "g2 := h1 & e1", "p(e1) = 0.5", "s(h1) = false"];
        assert!(parse(&lines).is_ok());
        lines.push("p(e2) = 0.1");
        assert!(parse(&lines).is_ok());
        lines.push("s(h2) = true");
        assert!(parse(&lines).is_ok());
    }

    #[test]
    fn cycles() {
        let err = parse(&["FT", "g1 := g2 & e1", "g2 := g3 & e1", "g3 := g2 & e1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FaultTree);
        assert!(err.to_string().contains("g2->g3->g2"));

        let err = parse(&["FT", "g1 := e2 & e1", "g2 := g3 & e1", "g3 := g2 & e1"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FaultTree);
        assert!(err.to_string().contains("detached"));
    }
}
