use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A value in the recomputation graph. The first three are user inputs,
/// the rest are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Categories,
    Range,
    Tab,
    Bounds,
    Filtered,
    Artifact,
}

impl Node {
    pub const ALL: [Node; 6] = [
        Node::Categories,
        Node::Range,
        Node::Tab,
        Node::Bounds,
        Node::Filtered,
        Node::Artifact,
    ];

    /// Direct dependencies of this node.
    pub fn inputs(self) -> &'static [Node] {
        match self {
            Node::Categories | Node::Range | Node::Tab => &[],
            Node::Bounds => &[Node::Categories],
            Node::Filtered => &[Node::Categories, Node::Range],
            Node::Artifact => &[Node::Filtered, Node::Tab],
        }
    }

    pub fn is_input(self) -> bool {
        self.inputs().is_empty()
    }
}

/// Static dependency graph with a precomputed topological order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    order: Vec<Node>,
    dependents: BTreeMap<Node, Vec<Node>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        let mut dependents: BTreeMap<Node, Vec<Node>> = BTreeMap::new();
        let mut pending: BTreeMap<Node, usize> = BTreeMap::new();
        for node in Node::ALL {
            pending.insert(node, node.inputs().len());
            for &dep in node.inputs() {
                dependents.entry(dep).or_default().push(node);
            }
        }

        // Kahn's algorithm.
        let mut ready: VecDeque<Node> = Node::ALL.into_iter().filter(|n| n.is_input()).collect();
        let mut order = Vec::with_capacity(Node::ALL.len());
        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &next in dependents.get(&node).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(n) = pending.get_mut(&next) {
                    *n -= 1;
                    if *n == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }
        debug_assert_eq!(order.len(), Node::ALL.len(), "dependency cycle");

        Self { order, dependents }
    }

    /// Every node, dependencies first.
    pub fn order(&self) -> &[Node] {
        &self.order
    }

    /// Derived nodes reachable from `changed`, in topological order.
    pub fn dirty(&self, changed: &[Node]) -> Vec<Node> {
        let mut reached: BTreeSet<Node> = BTreeSet::new();
        let mut stack: Vec<Node> = changed.to_vec();
        while let Some(node) = stack.pop() {
            for &next in self.dependents.get(&node).map(Vec::as_slice).unwrap_or(&[]) {
                if reached.insert(next) {
                    stack.push(next);
                }
            }
        }
        self.order
            .iter()
            .copied()
            .filter(|n| reached.contains(n))
            .collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
