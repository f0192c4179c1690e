// auto-map entry point: walker + registrar
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{AutoMapError, Result};
use crate::core::registry::TypeRegistry;
use crate::core::tree::{MappingNode, MappingTree, NodeIndex};
use crate::core::types::{TypeId, TypePair};
use crate::mapping::host::{MapHandle, MappingHost, TypeMapConfig};

/// What to do when a pair shows up again among its own ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    #[default]
    Fail,
    /// Drop the back-edge; the ancestor's map already covers the pair.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoMapOptions {
    pub cycle_policy: CyclePolicy,
    /// Deepest node allowed below the root; `None` walks the whole graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

/// Result of one auto-map call: the root's handle plus the tree of generated maps.
#[derive(Debug, Clone)]
pub struct AutoMap {
    pub handle: MapHandle,
    pub tree: MappingTree,
}

struct Pending {
    pair: TypePair,
    parent: Option<NodeIndex>,
}

/// Register a map for `source -> destination` and, recursively, for every nested complex
/// property pair.
///
/// Every visited pair becomes one node, registered with the host before its own children
/// are discovered. Identity pairs get a node but are not walked. A pair reachable along two
/// different paths is registered twice.
pub fn auto_map<H>(
    host: &mut H,
    registry: &TypeRegistry,
    source: TypeId,
    destination: TypeId,
    options: &AutoMapOptions,
) -> Result<AutoMap>
where
    H: MappingHost + ?Sized,
{
    let root = TypePair::new(source, destination);
    let (source_name, destination_name) = (registry.name(source)?, registry.name(destination)?);
    debug!(source = source_name, destination = destination_name, "auto-map");

    let mut tree = MappingTree::new();
    //explicit worklist: depth costs heap, not call stack
    let mut pending = vec![Pending { pair: root, parent: None }];

    while let Some(Pending { pair, parent }) = pending.pop() {
        if let Some(parent) = parent {
            if let Some(path) = cycle_path(registry, &tree, parent, pair)? {
                match options.cycle_policy {
                    CyclePolicy::Fail => return Err(AutoMapError::CyclicTypeGraph { path }),
                    CyclePolicy::Skip => {
                        warn!(%path, "cyclic type graph, back-edge skipped");
                        continue;
                    }
                }
            }
            let depth = tree.depth(parent) + 1;
            if let Some(limit) = options.max_depth.filter(|&limit| depth > limit) {
                return Err(AutoMapError::DepthLimitExceeded { limit });
            }
        }

        let parent_pair = parent
            .and_then(|p| tree.node(p))
            .map_or(TypePair::NO_PARENT, |n| n.pair);
        let node = tree.next_index();
        let handle = host.register_type_map_config(TypeMapConfig { pair, parent_pair, node });
        tree.push(MappingNode::new(pair, parent_pair, parent, handle));
        debug!(node, ?pair, ?parent_pair, "registered auto map");

        if pair.is_identity() {
            continue;
        }

        let children = registry.complex_correspondences(pair)?;
        //reversed so the first property is popped first
        pending.extend(
            children
                .into_iter()
                .rev()
                .map(|child| Pending { pair: child, parent: Some(node) }),
        );
    }

    let handle = tree.root().map_or(MapHandle(0), |n| n.handle);
    Ok(AutoMap { handle, tree })
}

//"A -> B -> A" when `pair` already sits on the ancestor chain of `parent`
fn cycle_path(
    registry: &TypeRegistry,
    tree: &MappingTree,
    parent: NodeIndex,
    pair: TypePair,
) -> Result<Option<String>> {
    let chain: Vec<TypePair> = tree.ancestors(parent).map(|(_, n)| n.pair).collect();
    let Some(hit) = chain.iter().position(|p| *p == pair) else {
        return Ok(None);
    };

    let mut names = Vec::with_capacity(hit + 2);
    for p in chain[..=hit].iter().rev().chain(std::iter::once(&pair)) {
        names.push(format!("({}, {})", registry.name(p.source)?, registry.name(p.destination)?));
    }
    Ok(Some(names.join(" -> ")))
}
