//! Grouping and ordering of a document's types.
//!
//! Filters out what never gets its own section, removes duplicate display
//! names and sorts the rest so nested types follow their parent.

use std::collections::{HashMap, HashSet};

use crate::closure::Contents;
use crate::context::DocContext;
use crate::linker;
use crate::model::{Common, EnumId, MessageId, ServiceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeEntry {
    Message(MessageId),
    Enum(EnumId),
}

/// Render order of one document.
#[derive(Debug, Default)]
pub struct Layout {
    /// Messages and enums with their display names, in render order.
    pub types: Vec<(String, TypeEntry)>,
    pub services: Vec<(String, ServiceId)>,
}

impl Layout {
    /// Whether the document gets separate Services and Types sections.
    pub fn grouping(&self) -> bool {
        !self.types.is_empty() && !self.services.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.types.len() + self.services.len()
    }
}

pub fn layout(ctx: &DocContext<'_>, contents: &Contents) -> Layout {
    let model = ctx.model;
    let mut names: Vec<String> = Vec::new();
    let mut entries: HashMap<String, TypeEntry> = HashMap::new();

    let mut register = |common: &Common, entry: TypeEntry| {
        if common.hidden || linker::is_well_known(&model.absolute_name(common)) {
            return;
        }
        let name = ctx.relative_name(common);
        if !entries.contains_key(&name) {
            names.push(name.clone());
            entries.insert(name, entry);
        }
    };

    for &id in &contents.messages {
        let message = model.message(id);
        if message.map_entry {
            continue;
        }
        register(&message.common, TypeEntry::Message(id));
    }
    for &id in &contents.enums {
        register(&model.enum_type(id).common, TypeEntry::Enum(id));
    }

    let types = hierarchical_order(&names)
        .into_iter()
        .map(|name| {
            let entry = entries[&name];
            (name, entry)
        })
        .collect();

    let services = contents
        .services
        .iter()
        .filter_map(|&id| {
            let common = &model.service(id).common;
            (!common.hidden).then(|| (ctx.relative_name(common), id))
        })
        .collect();

    Layout { types, services }
}

/// Stable pre-order grouping of dotted names.
///
/// Names keep their first-seen order, except that every `name.*` name is
/// pulled up to follow `name` directly.
pub fn hierarchical_order(names: &[String]) -> Vec<String> {
    fn place(key: &str, names: &[String], seen: &mut HashSet<String>, sorted: &mut Vec<String>) {
        if !seen.insert(key.to_string()) {
            return;
        }
        sorted.push(key.to_string());

        let prefix = format!("{}.", key);
        for name in names {
            if name.starts_with(&prefix) {
                place(name, names, seen, sorted);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut sorted = Vec::with_capacity(names.len());
    for name in names {
        place(name, names, &mut seen, &mut sorted);
    }
    sorted
}

/// Heading level (`hN`) for a type with the given display name.
pub fn heading_depth(name: &str, grouping: bool) -> usize {
    let dots = name.matches('.').count();
    2 + dots.min(4) + usize::from(grouping)
}

/// Entries of a container split into two render passes: active ones,
/// then deprecated ones, each in declaration order.
pub fn deprecation_passes<T>(items: &[T], deprecated: impl Fn(&T) -> Option<bool>) -> [Vec<&T>; 2] {
    let (gone, active): (Vec<&T>, Vec<&T>) =
        items.iter().partition(|item| deprecated(*item).unwrap_or(false));
    [active, gone]
}
