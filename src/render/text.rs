/// TREE, TABLE, and RAW emitters.
///
/// TREE and TABLE are two-pass: every visible row is formatted first, column
/// widths are the maximum formatted width (header included), and only then
/// are lines emitted. RAW is tab-separated byte-exact values.
use super::columns::{Column, OutputFormat};
use super::{RenderRequest, ordered_children, ordered_roots};
use crate::topology::{NodeFields, Topology};

/// Branch glyphs: (middle sibling, last sibling). Two display columns each,
/// so a node's total indent is `depth * 2`.
const GLYPHS_UNICODE: (&str, &str) = ("├─", "└─");
const GLYPHS_ASCII: (&str, &str) = ("|-", "`-");

struct Row {
    node: usize,
    prefix: String,
}

pub(crate) fn render_text(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
) -> String {
    let rows = collect_rows(topology, fields, request);
    let raw = request.format == OutputFormat::Raw;
    let tree = request.format == OutputFormat::Tree;

    let mut lines: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    if !request.no_header {
        lines.push(
            request
                .columns
                .iter()
                .map(|c| c.header().to_owned())
                .collect(),
        );
    }
    for row in &rows {
        lines.push(
            request
                .columns
                .iter()
                .map(|&col| {
                    let value = if raw {
                        fields[row.node].raw(col)
                    } else {
                        fields[row.node].display(col)
                    };
                    if tree && col == Column::Name {
                        format!("{}{}", row.prefix, value)
                    } else {
                        value.to_owned()
                    }
                })
                .collect(),
        );
    }

    if raw {
        let mut out = String::new();
        for cells in &lines {
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        return out;
    }

    // Width pass over the fully formatted rows.
    let mut widths = vec![0usize; request.columns.len()];
    for cells in &lines {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for cells in &lines {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(cell);
            if i + 1 < cells.len() {
                line.push_str(&" ".repeat(widths[i] - cell.chars().count()));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Depth-first pre-order over visible, sorted nodes. A child always appears
/// after its parent.
fn collect_rows(topology: &Topology, fields: &[NodeFields], request: &RenderRequest) -> Vec<Row> {
    let mut rows = Vec::new();
    for root in ordered_roots(topology, fields, request) {
        push_rows(topology, fields, request, root, 0, false, &mut rows);
    }
    rows
}

fn push_rows(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
    idx: usize,
    depth: usize,
    is_last: bool,
    rows: &mut Vec<Row>,
) {
    let prefix = if depth == 0 {
        String::new()
    } else {
        let (middle, last) = if request.ascii {
            GLYPHS_ASCII
        } else {
            GLYPHS_UNICODE
        };
        format!(
            "{}{}",
            "  ".repeat(depth - 1),
            if is_last { last } else { middle }
        )
    };
    rows.push(Row { node: idx, prefix });

    let children = ordered_children(topology, fields, request, idx);
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        push_rows(topology, fields, request, child, depth + 1, i + 1 == count, rows);
    }
}
