//! Cross-reference linker: turns a type reference into an HTML link.

use crate::context::DocContext;
use crate::model::{normalize_id, DescRef};

const PROTOBUF_REFERENCE: &str =
    "https://developers.google.com/protocol-buffers/docs/reference/google.protobuf";

/// Standard types documented upstream, never rendered locally.
const WELL_KNOWN_TYPES: &[(&str, &str)] = &[
    ("google.protobuf.Duration", "duration"),
    ("google.protobuf.Timestamp", "timestamp"),
    ("google.protobuf.Any", "any"),
    ("google.protobuf.BytesValue", "bytesvalue"),
    ("google.protobuf.StringValue", "stringvalue"),
    ("google.protobuf.BoolValue", "boolvalue"),
    ("google.protobuf.Int32Value", "int32value"),
    ("google.protobuf.Int64Value", "int64value"),
    ("google.protobuf.Uint32Value", "uint32value"),
    ("google.protobuf.Uint64Value", "uint64value"),
    ("google.protobuf.FloatValue", "floatvalue"),
    ("google.protobuf.DoubleValue", "doublevalue"),
    ("google.protobuf.Empty", "empty"),
    ("google.protobuf.EnumValue", "enumvalue"),
    ("google.protobuf.ListValue", "listvalue"),
    ("google.protobuf.NullValue", "nullvalue"),
    ("google.protobuf.Struct", "struct"),
];

/// Documentation URL of a well-known type, by absolute name without the
/// leading dot.
pub fn well_known_url(absolute: &str) -> Option<String> {
    WELL_KNOWN_TYPES
        .iter()
        .find(|(name, _)| *name == absolute)
        .map(|(_, anchor)| format!("{}#{}", PROTOBUF_REFERENCE, anchor))
}

pub fn is_well_known(absolute: &str) -> bool {
    WELL_KNOWN_TYPES.iter().any(|(name, _)| *name == absolute)
}

/// Render `text` as a link to `target`.
///
/// Scalars (`None`) and map entries come back unlinked. With `abbreviate`,
/// only the last dotted component of `text` is displayed.
pub fn resolve(ctx: &DocContext<'_>, target: Option<DescRef>, text: &str, abbreviate: bool) -> String {
    let Some(target) = target else {
        return text.to_string();
    };
    let model = ctx.model;
    if model.is_map_entry(target) {
        return text.to_string();
    }

    let display = if abbreviate { last_component(text) } else { text };
    let common = model.common(target);

    if let Some(url) = well_known_url(&model.absolute_name(common)) {
        return anchor_tag(&url, display);
    }

    if !common.hidden {
        if let Some(home) = model.home_location(target) {
            if ctx.home_location() != Some(home) {
                let href = format!("{}#{}", home, normalize_id(&common.dotted_name));
                return anchor_tag(&href, display);
            }
        }
    }

    let href = format!("#{}", normalize_id(&ctx.relative_name(common)));
    anchor_tag(&href, display)
}

pub fn anchor_tag(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", href, text)
}

fn last_component(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx < name.len() - 1 => &name[idx + 1..],
        _ => name,
    }
}
