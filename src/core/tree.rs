// mapping tree: arena of auto-generated maps with parent/child linkage
use crate::core::types::TypePair;
use crate::mapping::host::MapHandle;

pub type NodeIndex = usize;

/// One auto-discovered type-pair map.
///
/// `parent` is a lookup relation only; children are owned by the tree and kept in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingNode {
    pub pair: TypePair,
    pub parent_pair: TypePair,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub handle: MapHandle,
}

impl MappingNode {
    pub fn new(
        pair: TypePair,
        parent_pair: TypePair,
        parent: Option<NodeIndex>,
        handle: MapHandle,
    ) -> Self {
        Self { pair, parent_pair, parent, children: Vec::new(), handle }
    }
}

/// Built during one top-level auto-map call; nodes are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTree {
    nodes: Vec<MappingNode>,
}

impl MappingTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    //index the next push will receive
    pub fn next_index(&self) -> NodeIndex {
        self.nodes.len()
    }

    /// Append a node and link it under its parent.
    pub fn push(&mut self, node: MappingNode) -> NodeIndex {
        let index = self.nodes.len();
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(index);
        }
        self.nodes.push(node);
        index
    }

    pub fn root(&self) -> Option<&MappingNode> {
        self.nodes.first()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&MappingNode> {
        self.nodes.get(index)
    }

    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = &MappingNode> + '_ {
        self.nodes
            .get(index)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|&c| self.nodes.get(c))
    }

    pub fn parent(&self, index: NodeIndex) -> Option<&MappingNode> {
        self.nodes.get(index)?.parent.and_then(|p| self.nodes.get(p))
    }

    /// `index` itself, then its parent, up to the root.
    pub fn ancestors(
        &self,
        index: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, &MappingNode)> + '_ {
        let mut current = self.nodes.get(index).map(|n| (index, n));
        std::iter::from_fn(move || {
            let here = current?;
            current = here.1.parent.and_then(|p| self.nodes.get(p).map(|n| (p, n)));
            Some(here)
        })
    }

    pub fn depth(&self, index: NodeIndex) -> usize {
        self.ancestors(index).count().saturating_sub(1)
    }

    /// Pre-order, siblings in insertion order.
    pub fn depth_first(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeIndex> = if self.nodes.is_empty() { Vec::new() } else { vec![0] };
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(self.nodes[i].children.iter().rev());
        }
        order
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &MappingNode)> + '_ {
        self.nodes.iter().enumerate()
    }
}
