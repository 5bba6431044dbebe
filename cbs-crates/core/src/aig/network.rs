use super::AigError;
use super::AigGraph;
use super::NodeKind;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
use crate::containers::KeyedVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AigNode {
    Constant,
    Input { index: usize },
    And { fanins: [Literal; 2] },
}

/// An And-Inverter Graph built node by node.
///
/// Nodes are created in topological order, so the fanins of a gate always have smaller ids than
/// the gate itself. Reference counts are maintained while building: every gate fanin and every
/// output adds a reference to its node.
///
/// # Example
/// ```rust
/// # use cbs_core::aig::Aig;
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// let b = aig.add_input();
/// let gate = aig.add_and(a, b).unwrap();
///
/// let values = aig.evaluate(&[true, true]).unwrap();
/// assert!(gate.evaluate(values[gate.node()]));
/// ```
#[derive(Debug, Clone)]
pub struct Aig {
    nodes: KeyedVec<NodeId, AigNode>,
    references: KeyedVec<NodeId, u32>,
    inputs: Vec<NodeId>,
    outputs: Vec<Literal>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

impl Aig {
    /// Creates a graph containing only the constant node.
    pub fn new() -> Aig {
        let mut aig = Aig {
            nodes: KeyedVec::default(),
            references: KeyedVec::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        };
        let _ = aig.nodes.push(AigNode::Constant);
        let _ = aig.references.push(0);
        aig
    }

    /// Adds a primary input and returns its positive literal.
    pub fn add_input(&mut self) -> Literal {
        let node = self.nodes.push(AigNode::Input {
            index: self.inputs.len(),
        });
        let _ = self.references.push(0);
        self.inputs.push(node);
        Literal::positive(node)
    }

    /// Adds the gate `first & second` and returns its positive literal.
    pub fn add_and(&mut self, first: Literal, second: Literal) -> Result<Literal, AigError> {
        self.check_literal(first)?;
        self.check_literal(second)?;

        let node = self.nodes.push(AigNode::And {
            fanins: [first, second],
        });
        let _ = self.references.push(0);
        self.references[first.node()] += 1;
        self.references[second.node()] += 1;

        Ok(Literal::positive(node))
    }

    /// `first | second`, expressed as `~(~first & ~second)`.
    pub fn add_or(&mut self, first: Literal, second: Literal) -> Result<Literal, AigError> {
        Ok(!self.add_and(!first, !second)?)
    }

    /// `first ^ second`, expressed with three gates.
    pub fn add_xor(&mut self, first: Literal, second: Literal) -> Result<Literal, AigError> {
        let only_first = self.add_and(first, !second)?;
        let only_second = self.add_and(!first, second)?;
        self.add_or(only_first, only_second)
    }

    /// `select ? then : otherwise`.
    pub fn add_mux(
        &mut self,
        select: Literal,
        then: Literal,
        otherwise: Literal,
    ) -> Result<Literal, AigError> {
        let when_true = self.add_and(select, then)?;
        let when_false = self.add_and(!select, otherwise)?;
        self.add_or(when_true, when_false)
    }

    /// Registers `literal` as an output of the graph and returns the index of the output.
    pub fn add_output(&mut self, literal: Literal) -> Result<usize, AigError> {
        self.check_literal(literal)?;
        self.references[literal.node()] += 1;
        self.outputs.push(literal);
        Ok(self.outputs.len() - 1)
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_ands(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, AigNode::And { .. }))
            .count()
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Literal] {
        &self.outputs
    }

    /// Computes the value of every node given the values of the primary inputs (in input order).
    pub fn evaluate(&self, input_values: &[bool]) -> Result<KeyedVec<NodeId, bool>, AigError> {
        if input_values.len() != self.inputs.len() {
            return Err(AigError::InputCountMismatch {
                expected: self.inputs.len(),
                provided: input_values.len(),
            });
        }

        let mut values: KeyedVec<NodeId, bool> = KeyedVec::default();
        for node in self.nodes.iter() {
            let value = match node {
                AigNode::Constant => false,
                AigNode::Input { index } => input_values[*index],
                AigNode::And { fanins } => fanins
                    .iter()
                    .all(|fanin| fanin.evaluate(values[fanin.node()])),
            };
            let _ = values.push(value);
        }
        Ok(values)
    }

    fn check_literal(&self, literal: Literal) -> Result<(), AigError> {
        if literal.node().id() as usize >= self.nodes.len() {
            return Err(AigError::UnknownNode {
                literal,
                num_nodes: self.nodes.len(),
            });
        }
        Ok(())
    }
}

impl AigGraph for Aig {
    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn node_kind(&self, node: NodeId) -> NodeKind {
        match self.nodes[node] {
            AigNode::Constant => NodeKind::Constant,
            AigNode::Input { .. } => NodeKind::Input,
            AigNode::And { .. } => NodeKind::And,
        }
    }

    fn fanins(&self, node: NodeId) -> [Literal; 2] {
        match self.nodes[node] {
            AigNode::And { fanins } => fanins,
            other => panic!("Only AND gates have fanins, {node} is {other:?}"),
        }
    }

    fn reference_count(&self, node: NodeId) -> u32 {
        self.references[node]
    }

    fn input_index(&self, node: NodeId) -> Option<usize> {
        match self.nodes[node] {
            AigNode::Input { index } => Some(index),
            _ => None,
        }
    }
}
