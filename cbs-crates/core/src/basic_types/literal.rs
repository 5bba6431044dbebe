use super::NodeId;
use crate::cbs_assert_moderate;
use crate::containers::StorageKey;

/// A node together with an inversion flag, encoded as `2 * node + complemented`.
///
/// A literal is true when the value of its node differs from its complementation flag; the
/// positive literal of a node is true exactly when the node is true.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    code: u32,
}

impl Literal {
    /// The positive literal of the constant node, which is always false.
    pub const FALSE: Literal = Literal { code: 0 };
    /// The complemented literal of the constant node, which is always true.
    pub const TRUE: Literal = Literal { code: 1 };

    pub fn new(node: NodeId, is_complemented: bool) -> Literal {
        Literal {
            code: node.id() * 2 + (is_complemented as u32),
        }
    }

    pub fn positive(node: NodeId) -> Literal {
        Literal::new(node, false)
    }

    pub fn negative(node: NodeId) -> Literal {
        Literal::new(node, true)
    }

    /// The literal of `node` which is true exactly when `node` takes `value`.
    pub fn with_value(node: NodeId, value: bool) -> Literal {
        Literal::new(node, !value)
    }

    pub fn node(self) -> NodeId {
        NodeId::new(self.code / 2)
    }

    pub fn is_complemented(self) -> bool {
        (self.code & 1) == 1
    }

    /// The value the node of this literal has to take for the literal to be true.
    pub fn polarity(self) -> bool {
        !self.is_complemented()
    }

    /// Evaluates the literal given the value of its node.
    pub fn evaluate(self, node_value: bool) -> bool {
        node_value != self.is_complemented()
    }

    pub fn is_constant(self) -> bool {
        self.node().is_constant()
    }

    pub fn to_u32(self) -> u32 {
        self.code
    }

    pub fn from_u32(code: u32) -> Literal {
        let literal = Literal { code };
        cbs_assert_moderate!(Literal::new(literal.node(), literal.is_complemented()) == literal);
        literal
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl StorageKey for Literal {
    fn index(&self) -> usize {
        self.code as usize
    }

    fn create_from_index(index: usize) -> Self {
        Literal::from_u32(index as u32)
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_complemented() {
            write!(f, "~{}", self.node())
        } else {
            write!(f, "{}", self.node())
        }
    }
}
