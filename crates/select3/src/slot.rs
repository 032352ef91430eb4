//! Projected children.
//!
//! A host can project options into the control, either directly or nested in
//! groups. The control only keeps the options; everything else is skipped.

use crate::option::SelectOption;

/// A child element projected into the control.
#[derive(Debug, Clone)]
pub enum SlotNode {
    /// An option element.
    Option(SelectOption),
    /// A container whose descendants are searched for options.
    Group(Vec<SlotNode>),
    /// Any other content.
    Other,
}

impl SlotNode {
    /// Shorthand for a fresh, unselected option node.
    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        SlotNode::Option(SelectOption::new(value, label))
    }
}

impl From<SelectOption> for SlotNode {
    fn from(option: SelectOption) -> Self {
        SlotNode::Option(option)
    }
}

/// Collect every option among `nodes`, depth first, in document order.
pub fn flatten_options(nodes: &[SlotNode]) -> Vec<SelectOption> {
    let mut options = Vec::new();
    collect(nodes, &mut options);
    options
}

fn collect(nodes: &[SlotNode], out: &mut Vec<SelectOption>) {
    for node in nodes {
        match node {
            SlotNode::Option(option) => out.push(option.clone()),
            SlotNode::Group(children) => collect(children, out),
            SlotNode::Other => {}
        }
    }
}
