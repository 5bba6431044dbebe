mod literal;
mod node_id;

pub use literal::Literal;
pub use node_id::NodeId;
