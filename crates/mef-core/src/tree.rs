use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::model::{BasicEvent, EventRef, Gate, HouseEvent};

/// Gate to argument relation of a fault tree.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventGraph {
    graph: DiGraph<EventRef, ()>,
    nodes: HashMap<EventRef, NodeIndex>,
}

impl EventGraph {
    pub(crate) fn node(&mut self, event: EventRef) -> NodeIndex {
        *self
            .nodes
            .entry(event)
            .or_insert_with(|| self.graph.add_node(event))
    }

    pub(crate) fn link(&mut self, parent: EventRef, child: EventRef) {
        let parent = self.node(parent);
        let child = self.node(child);
        self.graph.update_edge(parent, child, ());
    }

    pub(crate) fn num_parents(&self, event: EventRef) -> usize {
        self.nodes.get(&event).map_or(0, |&node| {
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .count()
        })
    }

    /// Parents first. `None` if the graph has a cycle.
    pub(crate) fn sorted(&self) -> Option<Vec<EventRef>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|node| self.graph[node]).collect())
    }
}

/// A validated, fully linked fault tree.
///
/// Built by [`crate::FaultTreeBuilder`]; every gate argument refers to an
/// entry of one of the event tables, the gate graph is acyclic, and
/// `top_gates` lists the gates no other gate uses.
#[derive(Debug, Clone)]
pub struct FaultTree {
    pub(crate) name: String,
    pub(crate) gates: Vec<Gate>,
    pub(crate) basic_events: Vec<BasicEvent>,
    pub(crate) house_events: Vec<HouseEvent>,
    pub(crate) undefined_events: Vec<String>,
    pub(crate) top_gates: Vec<usize>,
    pub(crate) graph: EventGraph,
}

impl FaultTree {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    #[must_use]
    pub fn basic_events(&self) -> &[BasicEvent] {
        &self.basic_events
    }

    #[must_use]
    pub fn house_events(&self) -> &[HouseEvent] {
        &self.house_events
    }

    /// Names referenced by gates but never defined, in order of first use.
    #[must_use]
    pub fn undefined_events(&self) -> &[String] {
        &self.undefined_events
    }

    pub fn top_gates(&self) -> impl Iterator<Item = &Gate> {
        self.top_gates.iter().map(|&index| &self.gates[index])
    }

    #[must_use]
    pub fn gate(&self, name: &str) -> Option<&Gate> {
        self.gates.iter().find(|gate| gate.name == name)
    }

    #[must_use]
    pub fn event_name(&self, event: EventRef) -> &str {
        match event {
            EventRef::Gate(i) => &self.gates[i].name,
            EventRef::BasicEvent(i) => &self.basic_events[i].name,
            EventRef::HouseEvent(i) => &self.house_events[i].name,
            EventRef::Undefined(i) => &self.undefined_events[i],
        }
    }

    #[must_use]
    pub fn num_parents(&self, event: EventRef) -> usize {
        self.graph.num_parents(event)
    }

    #[must_use]
    pub fn is_orphan(&self, event: EventRef) -> bool {
        self.num_parents(event) == 0
    }

    /// Whether the event appears under more than one gate.
    #[must_use]
    pub fn is_common(&self, event: EventRef) -> bool {
        self.num_parents(event) > 1
    }

    /// Gates ordered so that each gate precedes the gates it uses.
    #[must_use]
    pub fn sorted_gates(&self) -> Vec<&Gate> {
        let order = self.graph.sorted().unwrap_or_default();
        let sorted: Vec<&Gate> = order
            .into_iter()
            .filter_map(|event| match event {
                EventRef::Gate(index) => Some(&self.gates[index]),
                _ => None,
            })
            .collect();
        debug_assert_eq!(sorted.len(), self.gates.len());
        sorted
    }
}
