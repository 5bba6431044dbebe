use crate::containers::StorageKey;

/// The identifier of a node in an And-Inverter Graph.
///
/// Node `0` is reserved for the constant-false node.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    id: u32,
}

impl NodeId {
    pub const CONSTANT: NodeId = NodeId { id: 0 };

    pub const fn new(id: u32) -> NodeId {
        NodeId { id }
    }

    pub fn id(self) -> u32 {
        self.id
    }

    pub fn is_constant(self) -> bool {
        self.id == 0
    }
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId::new(index as u32)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.id)
    }
}
