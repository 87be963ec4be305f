pub mod dist;
mod edge;
mod node;
mod sd;
mod slot_mask;

pub mod parameters;

pub use edge::Edge;
pub use node::NodeId;
pub use sd::SD;
pub use slot_mask::SlotMask;
