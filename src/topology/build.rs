/// Arena topology built from flat device facts.
///
/// Nodes live in one indexable arena and link via indices, so construction
/// is two simple passes: create every node, then wire children to parents.
use std::collections::HashMap;

use crate::device::DeviceFact;

use super::errors::TopologyError;

/// One device in the topology. Immutable after the build finishes.
#[derive(Debug, Clone)]
pub struct DeviceNode {
    /// The originating raw fact.
    pub fact: DeviceFact,
    /// Arena index of the owning node. Roots have none.
    pub parent: Option<usize>,
    /// Arena indices of children, in discovery order.
    pub children: Vec<usize>,
}

/// A forest of device nodes for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// All nodes, in discovery order.
    pub nodes: Vec<DeviceNode>,
    /// Arena indices of nodes with no parent, in discovery order.
    pub roots: Vec<usize>,
    /// Non-fatal notes accumulated during the build.
    pub warnings: Vec<String>,
}

/// Build a topology from raw facts.
///
/// Duplicate identifiers are non-fatal: the later fact overwrites the
/// earlier one (most recent OS report wins) and a warning is recorded.
///
/// # Errors
///
/// Returns `TopologyError::OrphanParent` when a fact names a parent absent
/// from the snapshot, and `TopologyError::Cycle` when parent references loop.
pub fn build(facts: Vec<DeviceFact>) -> Result<Topology, TopologyError> {
    let mut nodes: Vec<DeviceNode> = Vec::with_capacity(facts.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(facts.len());
    let mut warnings = Vec::new();

    // Pass 1: one arena slot per unique identifier.
    for fact in facts {
        if let Some(&slot) = index.get(&fact.id) {
            warnings.push(format!(
                "duplicate report for '{}'; keeping the most recent",
                fact.id
            ));
            nodes[slot].fact = fact;
        } else {
            index.insert(fact.id.clone(), nodes.len());
            nodes.push(DeviceNode {
                fact,
                parent: None,
                children: Vec::new(),
            });
        }
    }

    // Pass 2: link children to parents, preserving discovery order.
    let mut roots = Vec::new();
    for i in 0..nodes.len() {
        match nodes[i].fact.parent.clone() {
            None => roots.push(i),
            Some(parent_id) => {
                let Some(&p) = index.get(&parent_id) else {
                    return Err(TopologyError::OrphanParent {
                        id: nodes[i].fact.id.clone(),
                        parent: parent_id,
                    });
                };
                if p == i {
                    return Err(TopologyError::Cycle {
                        id: nodes[i].fact.id.clone(),
                    });
                }
                nodes[i].parent = Some(p);
                nodes[p].children.push(i);
            }
        }
    }

    // The parent relation must form a forest: every chain ends at a root.
    for i in 0..nodes.len() {
        let mut hops = 0;
        let mut cursor = nodes[i].parent;
        while let Some(p) = cursor {
            hops += 1;
            if hops > nodes.len() {
                return Err(TopologyError::Cycle {
                    id: nodes[i].fact.id.clone(),
                });
            }
            cursor = nodes[p].parent;
        }
    }

    Ok(Topology {
        nodes,
        roots,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceFact, DeviceKind};

    fn fact(id: &str, kind: DeviceKind, parent: Option<&str>) -> DeviceFact {
        DeviceFact {
            parent: parent.map(str::to_owned),
            ..DeviceFact::bare(id, kind)
        }
    }

    #[test]
    fn test_forest_counts() {
        let facts = vec![
            fact("disk0", DeviceKind::Disk, None),
            fact("disk0s1", DeviceKind::Partition, Some("disk0")),
            fact("disk0s2", DeviceKind::Partition, Some("disk0")),
            fact("disk1", DeviceKind::Disk, None),
        ];
        let topology = build(facts).unwrap();
        assert_eq!(topology.nodes.len(), 4);
        assert_eq!(topology.roots, vec![0, 3]);
        assert!(topology.warnings.is_empty());
    }

    #[test]
    fn test_disk_partition_volume_chain() {
        let facts = vec![
            fact("diskA", DeviceKind::Disk, None),
            fact("part1", DeviceKind::Partition, Some("diskA")),
            fact("vol1", DeviceKind::Volume, Some("part1")),
        ];
        let topology = build(facts).unwrap();
        assert_eq!(topology.roots, vec![0]);
        assert_eq!(topology.nodes[0].children, vec![1]);
        assert_eq!(topology.nodes[1].children, vec![2]);
        assert_eq!(topology.nodes[2].children, Vec::<usize>::new());
        assert_eq!(topology.nodes[2].parent, Some(1));
    }

    #[test]
    fn test_orphan_parent_is_fatal() {
        let facts = vec![
            fact("diskA", DeviceKind::Disk, None),
            fact("part1", DeviceKind::Partition, Some("diskZ")),
        ];
        let err = build(facts).unwrap_err();
        match err {
            TopologyError::OrphanParent { ref id, ref parent } => {
                assert_eq!(id, "part1");
                assert_eq!(parent, "diskZ");
            }
            TopologyError::Cycle { .. } => panic!("expected orphan error"),
        }
        assert!(err.to_string().contains("diskZ"));
    }

    #[test]
    fn test_duplicate_id_keeps_latest_with_warning() {
        let mut first = fact("disk0", DeviceKind::Disk, None);
        first.size = Some(100);
        let mut second = fact("disk0", DeviceKind::Disk, None);
        second.size = Some(200);

        let topology = build(vec![first, second]).unwrap();
        assert_eq!(topology.nodes.len(), 1);
        assert_eq!(topology.nodes[0].fact.size, Some(200));
        assert_eq!(topology.warnings.len(), 1);
        assert!(topology.warnings[0].contains("disk0"));
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let facts = vec![fact("disk0", DeviceKind::Disk, Some("disk0"))];
        assert!(matches!(
            build(facts),
            Err(TopologyError::Cycle { id }) if id == "disk0"
        ));
    }

    #[test]
    fn test_mutual_parents_are_a_cycle() {
        let facts = vec![
            fact("a", DeviceKind::Virtual, Some("b")),
            fact("b", DeviceKind::Virtual, Some("a")),
        ];
        assert!(matches!(build(facts), Err(TopologyError::Cycle { .. })));
    }

    #[test]
    fn test_virtual_with_parent_is_not_a_root() {
        let facts = vec![
            fact("disk0", DeviceKind::Disk, None),
            fact("disk0s2", DeviceKind::Partition, Some("disk0")),
            fact("disk3", DeviceKind::Virtual, Some("disk0s2")),
        ];
        let topology = build(facts).unwrap();
        assert_eq!(topology.roots, vec![0]);
        assert_eq!(topology.nodes[1].children, vec![2]);
    }

    #[test]
    fn test_child_order_follows_fact_order() {
        let facts = vec![
            fact("disk0", DeviceKind::Disk, None),
            fact("disk0s3", DeviceKind::Partition, Some("disk0")),
            fact("disk0s1", DeviceKind::Partition, Some("disk0")),
            fact("disk0s2", DeviceKind::Partition, Some("disk0")),
        ];
        let topology = build(facts).unwrap();
        assert_eq!(topology.nodes[0].children, vec![1, 2, 3]);
    }
}
