/// Rendering layer: serialize a resolved topology to text or JSON.
pub mod columns;
pub mod errors;
mod json;
mod text;

pub use columns::{Column, OutputFormat, parse_columns};
pub use errors::RenderError;

use crate::topology::{NodeFields, Topology};

/// Rendering configuration for one invocation.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Ordered column selection.
    pub columns: Vec<Column>,
    /// Output format.
    pub format: OutputFormat,
    /// Optional column to sort siblings by. Sorting never reorders across
    /// parent boundaries.
    pub sort: Option<Column>,
    /// Show devices with no size and no visible children.
    pub include_empty: bool,
    /// Render whole disks only, without their children.
    pub nodeps: bool,
    /// Use ASCII branch glyphs instead of Unicode.
    pub ascii: bool,
    /// Omit the header line.
    pub no_header: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            columns: Column::DEFAULT.to_vec(),
            format: OutputFormat::default(),
            sort: None,
            include_empty: false,
            nodeps: false,
            ascii: false,
            no_header: false,
        }
    }
}

/// Serialize the resolved tree per the request.
///
/// # Errors
///
/// Returns `RenderError` when the request names an unrecognized column or
/// format. Requests built through [`parse_columns`] and the `FromStr` impls
/// are validated up front, so rendering itself cannot fail for them.
pub fn render(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
) -> Result<String, RenderError> {
    match request.format {
        OutputFormat::Json => Ok(json::render_json(topology, fields, request)),
        OutputFormat::Tree | OutputFormat::Table | OutputFormat::Raw => {
            Ok(text::render_text(topology, fields, request))
        }
    }
}

/// Root indices in render order: visibility-filtered, then sibling-sorted.
pub(crate) fn ordered_roots(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
) -> Vec<usize> {
    let mut roots: Vec<usize> = topology
        .roots
        .iter()
        .copied()
        .filter(|&r| is_visible(topology, request, r))
        .collect();
    sort_siblings(&mut roots, fields, request);
    roots
}

/// Child indices of a node in render order. Empty when `nodeps` is set.
pub(crate) fn ordered_children(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
    idx: usize,
) -> Vec<usize> {
    if request.nodeps {
        return Vec::new();
    }
    let mut children: Vec<usize> = topology.nodes[idx]
        .children
        .iter()
        .copied()
        .filter(|&c| is_visible(topology, request, c))
        .collect();
    sort_siblings(&mut children, fields, request);
    children
}

/// A node is hidden when empty devices are excluded and it has neither a
/// nonzero size nor any visible descendant.
fn is_visible(topology: &Topology, request: &RenderRequest, idx: usize) -> bool {
    if request.include_empty {
        return true;
    }
    let node = &topology.nodes[idx];
    node.fact.size.unwrap_or(0) > 0
        || node
            .children
            .iter()
            .any(|&c| is_visible(topology, request, c))
}

/// Stable sort within one sibling list. SIZE compares numerically on the raw
/// byte count; all other columns compare lexically on the raw value.
fn sort_siblings(siblings: &mut [usize], fields: &[NodeFields], request: &RenderRequest) {
    let Some(column) = request.sort else {
        return;
    };
    if column == Column::Size {
        siblings.sort_by_key(|&i| fields[i].raw(Column::Size).parse::<u64>().unwrap_or(0));
    } else {
        siblings.sort_by(|&a, &b| fields[a].raw(column).cmp(fields[b].raw(column)));
    }
}
