use std::fmt::Display;

use super::NodeId;

/// Source and destination of a demand. Unlike `Edge`, the order matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SD {
    pub src: NodeId,
    pub dst: NodeId,
}

impl Display for SD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}->{})", self.src, self.dst)
    }
}

impl SD {
    pub fn new(src: NodeId, dst: NodeId) -> Self {
        Self { src, dst }
    }
}
