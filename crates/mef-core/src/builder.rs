use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Argument, BasicEvent, EventRef, Formula, Gate, HouseEvent, Probability};
use crate::tree::{EventGraph, FaultTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Temporary,
    Permanent,
}

/// Collects event definitions in any order and links them on [`build`].
///
/// Gate arguments are kept by name until the whole input is known, so a gate
/// may use events defined after it.
///
/// [`build`]: FaultTreeBuilder::build
#[derive(Debug, Default)]
pub struct FaultTreeBuilder {
    multi_top: bool,
    gates: Vec<(String, Formula)>,
    basic_events: Vec<BasicEvent>,
    house_events: Vec<HouseEvent>,
    defined: HashMap<String, EventRef>,
}

impl FaultTreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows more than one top gate.
    #[must_use]
    pub fn multi_top(mut self, multi_top: bool) -> Self {
        self.multi_top = multi_top;
        self
    }

    fn define(&mut self, name: &str, event: EventRef) -> Result<()> {
        if self.defined.contains_key(name) {
            return Err(Error::Redefinition(name.to_string()));
        }
        self.defined.insert(name.to_string(), event);
        Ok(())
    }

    pub fn add_basic_event(
        &mut self,
        name: impl Into<String>,
        probability: impl Into<Probability>,
    ) -> Result<()> {
        let name = name.into();
        let probability = probability.into();
        if !(0.0..=1.0).contains(&probability.value()) {
            return Err(Error::InvalidProbability(probability.to_string()));
        }
        self.define(&name, EventRef::BasicEvent(self.basic_events.len()))?;
        self.basic_events.push(BasicEvent { name, probability });
        Ok(())
    }

    pub fn add_house_event(&mut self, name: impl Into<String>, state: bool) -> Result<()> {
        let name = name.into();
        self.define(&name, EventRef::HouseEvent(self.house_events.len()))?;
        self.house_events.push(HouseEvent { name, state });
        Ok(())
    }

    pub fn add_gate(&mut self, name: impl Into<String>, formula: Formula) -> Result<()> {
        let name = name.into();
        self.define(&name, EventRef::Gate(self.gates.len()))?;
        self.gates.push((name, formula));
        Ok(())
    }

    #[must_use]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Resolves arguments, finds the top gates, and rejects cycles.
    pub fn build(self, name: impl Into<String>) -> Result<FaultTree> {
        let name = name.into();
        let mut graph = EventGraph::default();
        let mut undefined: Vec<String> = Vec::new();
        let mut undefined_index: HashMap<String, usize> = HashMap::new();

        for index in 0..self.gates.len() {
            graph.node(EventRef::Gate(index));
        }

        let mut gates = Vec::with_capacity(self.gates.len());
        for (index, (gate_name, formula)) in self.gates.into_iter().enumerate() {
            let mut arguments = Vec::with_capacity(formula.arguments().len());
            for literal in formula.arguments() {
                let event = if let Some(&event) = self.defined.get(&literal.name) {
                    event
                } else if let Some(&i) = undefined_index.get(&literal.name) {
                    EventRef::Undefined(i)
                } else {
                    warn!(event = %literal.name, "Unidentified event");
                    let i = undefined.len();
                    undefined.push(literal.name.clone());
                    undefined_index.insert(literal.name.clone(), i);
                    EventRef::Undefined(i)
                };
                graph.link(EventRef::Gate(index), event);
                arguments.push(Argument {
                    event,
                    complement: literal.complement,
                });
            }
            gates.push(Gate {
                name: gate_name,
                formula,
                arguments,
            });
        }

        for (i, event) in self.basic_events.iter().enumerate() {
            if graph.num_parents(EventRef::BasicEvent(i)) == 0 {
                warn!(event = %event.name, "Orphan basic event");
            }
        }
        for (i, event) in self.house_events.iter().enumerate() {
            if graph.num_parents(EventRef::HouseEvent(i)) == 0 {
                warn!(event = %event.name, "Orphan house event");
            }
        }

        let top_gates = detect_top(&gates, &graph, self.multi_top)?;
        detect_cycle(&gates, &top_gates)?;
        debug!(
            fault_tree = %name,
            gates = gates.len(),
            basic_events = self.basic_events.len(),
            house_events = self.house_events.len(),
            undefined_events = undefined.len(),
            "fault tree populated"
        );

        Ok(FaultTree {
            name,
            gates,
            basic_events: self.basic_events,
            house_events: self.house_events,
            undefined_events: undefined,
            top_gates,
            graph,
        })
    }
}

fn detect_top(gates: &[Gate], graph: &EventGraph, multi_top: bool) -> Result<Vec<usize>> {
    let top_gates: Vec<usize> = (0..gates.len())
        .filter(|&i| graph.num_parents(EventRef::Gate(i)) == 0)
        .collect();
    if top_gates.is_empty() {
        return Err(Error::NoTopGate);
    }
    if top_gates.len() > 1 && !multi_top {
        return Err(Error::MultipleTopGates(
            top_gates.iter().map(|&i| gates[i].name.clone()).collect(),
        ));
    }
    Ok(top_gates)
}

/// Depth-first search with an explicit stack; returns the cycle path in
/// reverse order.
fn visit(gates: &[Gate], root: usize, marks: &mut [Option<Mark>]) -> Option<Vec<usize>> {
    match marks[root] {
        Some(Mark::Permanent) => return None,
        Some(Mark::Temporary) => return Some(vec![root]),
        None => marks[root] = Some(Mark::Temporary),
    }

    let mut stack = vec![(root, gates[root].gate_arguments())];
    while let Some((gate, children)) = stack.last_mut() {
        let gate = *gate;
        let Some(child) = children.next() else {
            marks[gate] = Some(Mark::Permanent);
            stack.pop();
            continue;
        };
        match marks[child] {
            Some(Mark::Permanent) => {}
            Some(Mark::Temporary) => {
                let mut cycle = vec![child];
                cycle.extend(stack.iter().rev().map(|(index, _)| *index));
                return Some(cycle);
            }
            None => {
                marks[child] = Some(Mark::Temporary);
                stack.push((child, gates[child].gate_arguments()));
            }
        }
    }
    None
}

/// Top-down names of the gates on the cycle, starting and ending at the
/// first repeated gate.
fn cycle_path(gates: &[Gate], mut cycle: Vec<usize>) -> Vec<String> {
    let start = cycle[0];
    cycle.reverse();
    let from = cycle.iter().position(|&i| i == start).unwrap_or(0);
    cycle[from..]
        .iter()
        .map(|&i| gates[i].name.clone())
        .collect()
}

fn detect_cycle(gates: &[Gate], top_gates: &[usize]) -> Result<()> {
    let mut marks = vec![None; gates.len()];
    for &top in top_gates {
        if let Some(cycle) = visit(gates, top, &mut marks) {
            return Err(Error::Cycle(cycle_path(gates, cycle)));
        }
    }

    let detached: Vec<usize> = (0..gates.len()).filter(|&i| marks[i].is_none()).collect();
    if detached.is_empty() {
        return Ok(());
    }
    for &gate in &detached {
        if let Some(cycle) = visit(gates, gate, &mut marks) {
            return Err(Error::DetachedCycle {
                gates: detached.iter().map(|&i| gates[i].name.clone()).collect(),
                cycle: cycle_path(gates, cycle),
            });
        }
    }
    Ok(())
}
