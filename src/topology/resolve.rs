/// Per-node display fields derived from facts and tree position.
///
/// Resolution is a pure function of each node's fact plus its depth in the
/// tree. Every recognized column gets two values: a formatted display string
/// and a raw (byte-exact) string for machine output and numeric sorting.
/// Missing optionals resolve to the empty string, never a placeholder, to
/// keep output diffable against the Linux reference tool.
use std::collections::HashMap;

use crate::render::columns::Column;

use super::build::Topology;

/// Options that shape field formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Render SIZE as a plain byte count instead of binary units.
    pub bytes: bool,
    /// Render NAME as a full /dev path.
    pub paths: bool,
}

/// Resolved fields for one node.
#[derive(Debug, Clone)]
pub struct NodeFields {
    /// Number of ownership hops to a root.
    pub depth: usize,
    display: HashMap<Column, String>,
    raw: HashMap<Column, String>,
}

impl NodeFields {
    /// The formatted value for a column. Empty when the fact lacks it.
    #[must_use]
    pub fn display(&self, column: Column) -> &str {
        self.display.get(&column).map_or("", String::as_str)
    }

    /// The raw (byte-exact) value for a column.
    #[must_use]
    pub fn raw(&self, column: Column) -> &str {
        self.raw.get(&column).map_or("", String::as_str)
    }
}

/// Resolve every node in the topology, in arena order.
#[must_use]
pub fn resolve(topology: &Topology, opts: ResolveOptions) -> Vec<NodeFields> {
    topology
        .nodes
        .iter()
        .enumerate()
        .map(|(i, _)| resolve_node(topology, i, opts))
        .collect()
}

fn resolve_node(topology: &Topology, idx: usize, opts: ResolveOptions) -> NodeFields {
    let fact = &topology.nodes[idx].fact;
    let mut display = HashMap::with_capacity(Column::ALL.len());
    let mut raw = HashMap::with_capacity(Column::ALL.len());

    for column in Column::ALL {
        let raw_value = match column {
            Column::Name => {
                if opts.paths {
                    format!("/dev/{}", fact.id)
                } else {
                    fact.id.clone()
                }
            }
            Column::Size => fact.size.map(|s| s.to_string()).unwrap_or_default(),
            Column::Type => fact.kind.as_str().to_owned(),
            Column::FsType => fact.fs_type.clone().unwrap_or_default(),
            Column::Label => fact.label.clone().unwrap_or_default(),
            Column::Uuid => fact.uuid.clone().unwrap_or_default(),
            Column::MountPoint => fact.mount_point.clone().unwrap_or_default(),
            Column::ReadOnly => flag(fact.read_only),
            Column::Removable => flag(fact.removable),
            Column::Transport => fact.protocol.clone().unwrap_or_default(),
        };
        let display_value = if column == Column::Size && !opts.bytes {
            fact.size.map(format_size).unwrap_or_default()
        } else {
            raw_value.clone()
        };
        display.insert(column, display_value);
        raw.insert(column, raw_value);
    }

    NodeFields {
        depth: depth_of(topology, idx),
        display,
        raw,
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_owned()
}

/// Ownership hops to a root. The build guarantees the chain terminates.
fn depth_of(topology: &Topology, idx: usize) -> usize {
    let mut depth = 0;
    let mut cursor = topology.nodes[idx].parent;
    while let Some(p) = cursor {
        depth += 1;
        cursor = topology.nodes[p].parent;
    }
    depth
}

/// Format a byte count in binary (1024-based) units with one decimal place.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (1 << 40, "T"),
        (1 << 30, "G"),
        (1 << 20, "M"),
        (1 << 10, "K"),
    ];
    for (factor, suffix) in UNITS {
        if bytes >= factor {
            #[allow(clippy::cast_precision_loss)]
            return format!("{:.1}{suffix}", bytes as f64 / factor as f64);
        }
    }
    format!("{bytes}B")
}
