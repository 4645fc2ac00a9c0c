//! Dependency closure: which types must be rendered alongside a file.
//!
//! A field whose type has no home location anywhere would produce a dead
//! link, so that type is pulled into the referring document. The walk uses a
//! worklist and a set of already-present display names, so cyclic and
//! self-referential graphs terminate.

use std::collections::HashSet;

use tracing::trace;

use crate::context::DocContext;
use crate::model::{DescRef, EnumId, FieldType, FileId, MessageId, ServiceId};

/// Types selected for one output document, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Contents {
    pub messages: Vec<MessageId>,
    pub enums: Vec<EnumId>,
    pub services: Vec<ServiceId>,
}

impl Contents {
    /// Add everything `file` declares, then its unsituated dependencies.
    pub fn add_file(&mut self, ctx: &DocContext<'_>, file: FileId) {
        let file = ctx.model.file(file);
        self.messages.extend_from_slice(&file.messages);
        self.enums.extend_from_slice(&file.enums);
        self.services.extend_from_slice(&file.services);
        self.include_unsituated(ctx, &file.messages);
    }

    /// Append every type reachable through fields of `roots` that has no
    /// home location and is not already present by display name.
    pub fn include_unsituated(&mut self, ctx: &DocContext<'_>, roots: &[MessageId]) {
        let model = ctx.model;
        let mut seen_messages: HashSet<String> = self
            .messages
            .iter()
            .map(|&m| ctx.relative_name(&model.message(m).common))
            .collect();
        let mut seen_enums: HashSet<String> = self
            .enums
            .iter()
            .map(|&e| ctx.relative_name(&model.enum_type(e).common))
            .collect();

        let mut worklist: Vec<MessageId> = roots.iter().rev().copied().collect();
        while let Some(current) = worklist.pop() {
            for field in &model.message(current).fields {
                match field.field_type {
                    FieldType::Scalar(_) => {}
                    FieldType::Message(dep) => {
                        if model.home_location(DescRef::Message(dep)).is_some() {
                            continue;
                        }
                        let name = ctx.relative_name(&model.message(dep).common);
                        if seen_messages.insert(name) {
                            trace!(from = %model.message(current).common.dotted_name,
                                   to = %model.message(dep).common.dotted_name,
                                   "pulling in unsituated message");
                            self.messages.push(dep);
                            worklist.push(dep);
                        }
                    }
                    FieldType::Enum(dep) => {
                        if model.home_location(DescRef::Enum(dep)).is_some() {
                            continue;
                        }
                        let name = ctx.relative_name(&model.enum_type(dep).common);
                        if seen_enums.insert(name) {
                            self.enums.push(dep);
                        }
                    }
                }
            }
        }
    }
}
