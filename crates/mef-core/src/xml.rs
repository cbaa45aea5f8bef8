//! Open-PSA MEF XML output.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event as XmlEvent};
use quick_xml::Writer;

use crate::error::Result;
use crate::model::{Argument, EventRef, Gate, Operator};
use crate::tree::FaultTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlOptions {
    /// Levels of argument gates written inline as nested formulas.
    pub nest: usize,
    /// Spaces per indentation level; zero writes a single line.
    pub indent: usize,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self { nest: 0, indent: 2 }
    }
}

struct MefWriter<'a, W: Write> {
    tree: &'a FaultTree,
    xml: Writer<W>,
}

impl<W: Write> MefWriter<'_, W> {
    fn start(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.xml.write_event(XmlEvent::Start(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.xml.write_event(XmlEvent::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.xml.write_event(XmlEvent::Empty(element))?;
        Ok(())
    }

    fn document(&mut self, nest: usize) -> Result<()> {
        let tree = self.tree;
        self.xml
            .write_event(XmlEvent::Decl(BytesDecl::new("1.0", None, None)))?;
        self.start(BytesStart::new("opsa-mef"))?;

        self.start(BytesStart::new("define-fault-tree").with_attributes([("name", tree.name())]))?;
        for gate in tree.sorted_gates() {
            self.start(BytesStart::new("define-gate").with_attributes([("name", gate.name.as_str())]))?;
            self.formula(gate, nest)?;
            self.end("define-gate")?;
        }
        self.end("define-fault-tree")?;

        self.start(BytesStart::new("model-data"))?;
        for event in tree.basic_events() {
            let value = event.probability.as_str();
            self.start(
                BytesStart::new("define-basic-event").with_attributes([("name", event.name.as_str())]),
            )?;
            self.empty(BytesStart::new("float").with_attributes([("value", value)]))?;
            self.end("define-basic-event")?;
        }
        for event in tree.house_events() {
            let value = if event.state { "true" } else { "false" };
            self.start(
                BytesStart::new("define-house-event").with_attributes([("name", event.name.as_str())]),
            )?;
            self.empty(BytesStart::new("constant").with_attributes([("value", value)]))?;
            self.end("define-house-event")?;
        }
        self.end("model-data")?;

        self.end("opsa-mef")
    }

    fn formula(&mut self, gate: &Gate, nest: usize) -> Result<()> {
        let operator = gate.operator();
        if let Some(element) = operator.element() {
            let mut start = BytesStart::new(element);
            match operator {
                Operator::Atleast { min } => {
                    start.push_attribute(("min", min.to_string().as_str()));
                }
                Operator::Cardinality { min, max } => {
                    start.push_attribute(("min", min.to_string().as_str()));
                    start.push_attribute(("max", max.to_string().as_str()));
                }
                _ => {}
            }
            self.start(start)?;
        }
        for argument in &gate.arguments {
            self.argument(*argument, nest)?;
        }
        if let Some(element) = operator.element() {
            self.end(element)?;
        }
        Ok(())
    }

    fn argument(&mut self, argument: Argument, nest: usize) -> Result<()> {
        let tree = self.tree;
        if argument.complement {
            self.start(BytesStart::new("not"))?;
        }
        match argument.event {
            EventRef::Gate(index) if nest > 0 => {
                self.formula(&tree.gates()[index], nest - 1)?;
            }
            event => {
                let name = tree.event_name(event);
                self.empty(BytesStart::new(event.element()).with_attributes([("name", name)]))?;
            }
        }
        if argument.complement {
            self.end("not")?;
        }
        Ok(())
    }
}

/// Writes the fault tree and its model data as a complete MEF document.
pub fn write_mef<W: Write>(tree: &FaultTree, out: W, options: &XmlOptions) -> Result<()> {
    let xml = if options.indent == 0 {
        Writer::new(out)
    } else {
        Writer::new_with_indent(out, b' ', options.indent)
    };
    let mut writer = MefWriter { tree, xml };
    writer.document(options.nest)?;
    writer.xml.get_mut().write_all(b"\n")?;
    Ok(())
}

pub fn to_xml_string(tree: &FaultTree, options: &XmlOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_mef(tree, &mut buf, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
