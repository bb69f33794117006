/// Nested JSON output, one object per device.
use serde_json::{Map, Value};

use super::{RenderRequest, ordered_children, ordered_roots};
use crate::topology::{NodeFields, Topology};

/// Render `{"blockdevices": [...]}` with the requested columns as lowercased
/// keys and children nested under each node. Key order follows the column
/// selection.
pub(crate) fn render_json(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
) -> String {
    let devices: Vec<Value> = ordered_roots(topology, fields, request)
        .into_iter()
        .map(|root| node_value(topology, fields, request, root))
        .collect();

    let mut top = Map::new();
    top.insert("blockdevices".to_owned(), Value::Array(devices));

    let mut out = serde_json::to_string_pretty(&Value::Object(top)).unwrap_or_default();
    out.push('\n');
    out
}

fn node_value(
    topology: &Topology,
    fields: &[NodeFields],
    request: &RenderRequest,
    idx: usize,
) -> Value {
    let mut obj = Map::new();
    for &column in &request.columns {
        obj.insert(
            column.json_key().to_owned(),
            Value::String(fields[idx].display(column).to_owned()),
        );
    }
    let children = ordered_children(topology, fields, request, idx);
    if !children.is_empty() {
        obj.insert(
            "children".to_owned(),
            Value::Array(
                children
                    .into_iter()
                    .map(|child| node_value(topology, fields, request, child))
                    .collect(),
            ),
        );
    }
    Value::Object(obj)
}
