use std::fmt::Display;

use super::NodeId;

/// Represents an undirected edge between two nodes.
///
/// The endpoints are stored in ascending order, so `Edge::new(a, b)` and
/// `Edge::new(b, a)` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// The smaller endpoint.
    pub src: NodeId,
    /// The larger endpoint.
    pub dst: NodeId,
}

impl Display for Edge {
    /// Formats the edge for display.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.src, self.dst)
    }
}

impl Edge {
    /// Creates a new undirected edge between the two given nodes.
    ///
    /// # Arguments
    ///
    /// * `a` - One endpoint.
    /// * `b` - The other endpoint.
    ///
    /// # Returns
    ///
    /// A new `Edge` whose endpoints are ordered.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self { src: a, dst: b }
        } else {
            Self { src: b, dst: a }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_unordered() {
        let ab = Edge::new("A".into(), "B".into());
        let ba = Edge::new("B".into(), "A".into());
        assert_eq!(ab, ba);
        assert_eq!(ab.src, NodeId::from("A"));
    }
}
