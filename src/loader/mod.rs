//! Descriptor loader: JSON descriptor documents into a [`Model`].
//!
//! Loading runs in two passes. The first allocates every message, enum and
//! service and registers it under its absolute name; the second resolves the
//! type names used by fields and methods.

pub mod annotations;
pub mod schema;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::*;
use schema::*;

/// Read and parse one descriptor document.
pub fn read_descriptor_set(path: &Path) -> Result<DescriptorSet> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Build a model from a single JSON document.
pub fn from_json_str(json: &str) -> Result<Model> {
    let set: DescriptorSet = serde_json::from_str(json)?;
    build(vec![set])
}

/// Build a model from one or more descriptor documents.
pub fn build(sets: Vec<DescriptorSet>) -> Result<Model> {
    let mut builder = Builder::default();
    let mut pending_messages: Vec<(MessageId, &MessageProto)> = Vec::new();
    let mut pending_services: Vec<(ServiceId, &ServiceProto)> = Vec::new();
    let mut wanted: HashSet<&str> = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for set in &sets {
        for file in &set.files {
            // Each document's `files_to_generate` covers that document only.
            let requested = set
                .files_to_generate
                .as_ref()
                .is_none_or(|names| names.contains(&file.name));
            if requested {
                wanted.insert(file.name.as_str());
            }
            // Documents produced for different targets repeat shared imports.
            if !seen.insert(file.name.as_str()) {
                continue;
            }
            builder.add_file(file, &mut pending_messages, &mut pending_services)?;
        }
    }

    for (id, proto) in pending_messages {
        builder.resolve_fields(id, proto)?;
    }
    for (id, proto) in pending_services {
        builder.resolve_methods(id, proto)?;
    }

    builder.pick_representatives();

    let mut model = builder.model;
    model.to_generate = (0..model.files.len())
        .map(FileId)
        .filter(|id| wanted.contains(model.files[id.0].name.as_str()))
        .collect();

    debug!(
        packages = model.packages.len(),
        files = model.files.len(),
        messages = model.messages.len(),
        enums = model.enums.len(),
        services = model.services.len(),
        "descriptor model loaded"
    );
    Ok(model)
}

// -- Builder -------------------------------------------------------------------

#[derive(Default)]
struct Builder {
    model: Model,
    package_ids: HashMap<String, PackageId>,
}

/// Where a node being allocated sits in the graph.
struct Scope<'a> {
    package: PackageId,
    file: FileId,
    file_name: &'a str,
    package_name: &'a str,
}

impl Scope<'_> {
    fn absolute(&self, dotted: &str) -> String {
        if self.package_name.is_empty() {
            format!(".{}", dotted)
        } else {
            format!(".{}.{}", self.package_name, dotted)
        }
    }

    fn common(&self, name: &str, dotted_name: String, comments: &CommentsProto) -> Common {
        let annotated = annotations::extract(&comments.leading);
        Common {
            name: name.to_string(),
            dotted_name,
            package: self.package,
            file: self.file,
            hidden: annotated.hidden,
            class: annotated.class,
            location: location(self.file_name, comments, annotated.text),
        }
    }
}

fn location(file: &str, comments: &CommentsProto, leading: String) -> Location {
    let span = match comments.span.as_slice() {
        [line, col, ..] => Some((*line, *col)),
        _ => None,
    };
    Location {
        file: file.to_string(),
        span,
        leading,
        trailing: comments.trailing.clone(),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

impl Builder {
    fn package_id(&mut self, name: &str, file: FileId) -> PackageId {
        if let Some(&id) = self.package_ids.get(name) {
            return id;
        }
        let id = PackageId(self.model.packages.len());
        self.model.packages.push(Package {
            name: name.to_string(),
            files: Vec::new(),
            representative: file,
        });
        self.package_ids.insert(name.to_string(), id);
        id
    }

    fn add_file<'p>(
        &mut self,
        proto: &'p FileProto,
        pending_messages: &mut Vec<(MessageId, &'p MessageProto)>,
        pending_services: &mut Vec<(ServiceId, &'p ServiceProto)>,
    ) -> Result<()> {
        let file_id = FileId(self.model.files.len());
        let package = self.package_id(&proto.package, file_id);
        self.model.packages[package.0].files.push(file_id);

        let annotated = annotations::extract(&proto.comments.leading);
        let matter = annotations::front_matter(&proto.name, &annotated.directives)?;
        self.model.files.push(File {
            name: proto.name.clone(),
            package,
            matter,
            location: location(&proto.name, &proto.comments, annotated.text),
            messages: Vec::new(),
            enums: Vec::new(),
            services: Vec::new(),
        });

        let scope = Scope {
            package,
            file: file_id,
            file_name: &proto.name,
            package_name: &proto.package,
        };

        for message in &proto.messages {
            self.add_message(&scope, "", message, pending_messages);
        }
        for e in &proto.enums {
            self.add_enum(&scope, "", e);
        }
        for service in &proto.services {
            let id = ServiceId(self.model.services.len());
            let common = scope.common(&service.name, service.name.clone(), &service.comments);
            self.model
                .by_name
                .insert(scope.absolute(&common.dotted_name), DescRef::Service(id));
            self.model.services.push(Service {
                common,
                methods: Vec::new(),
            });
            self.model.files[file_id.0].services.push(id);
            pending_services.push((id, service));
        }

        Ok(())
    }

    fn add_message<'p>(
        &mut self,
        scope: &Scope<'_>,
        prefix: &str,
        proto: &'p MessageProto,
        pending: &mut Vec<(MessageId, &'p MessageProto)>,
    ) {
        let id = MessageId(self.model.messages.len());
        let dotted = join(prefix, &proto.name);
        let common = scope.common(&proto.name, dotted.clone(), &proto.comments);
        self.model
            .by_name
            .insert(scope.absolute(&dotted), DescRef::Message(id));
        self.model.messages.push(Message {
            common,
            fields: Vec::new(),
            map_entry: proto.options.map_entry,
        });
        self.model.files[scope.file.0].messages.push(id);
        pending.push((id, proto));

        for nested in &proto.nested_messages {
            self.add_message(scope, &dotted, nested, pending);
        }
        for nested in &proto.nested_enums {
            self.add_enum(scope, &dotted, nested);
        }
    }

    fn add_enum(&mut self, scope: &Scope<'_>, prefix: &str, proto: &EnumProto) {
        let id = EnumId(self.model.enums.len());
        let dotted = join(prefix, &proto.name);
        let common = scope.common(&proto.name, dotted.clone(), &proto.comments);
        let values = proto
            .values
            .iter()
            .map(|v| EnumValue {
                common: scope.common(&v.name, join(&dotted, &v.name), &v.comments),
                number: v.number,
                deprecated: v.options.as_ref().map(|o| o.deprecated),
            })
            .collect();
        self.model
            .by_name
            .insert(scope.absolute(&dotted), DescRef::Enum(id));
        self.model.enums.push(Enum { common, values });
        self.model.files[scope.file.0].enums.push(id);
    }

    fn resolve(&self, file: FileId, referrer: &str, type_name: &str) -> Result<DescRef> {
        self.model
            .by_name
            .get(type_name)
            .copied()
            .ok_or_else(|| Error::UnresolvedType {
                file: self.model.files[file.0].name.clone(),
                referrer: referrer.to_string(),
                type_name: type_name.to_string(),
            })
    }

    fn scope_of(&self, common: &Common) -> (PackageId, FileId) {
        (common.package, common.file)
    }

    fn resolve_fields(&mut self, id: MessageId, proto: &MessageProto) -> Result<()> {
        let (package, file) = self.scope_of(&self.model.messages[id.0].common);
        let parent = self.model.messages[id.0].common.dotted_name.clone();
        let file_name = self.model.files[file.0].name.clone();
        let scope = Scope {
            package,
            file,
            file_name: &file_name,
            package_name: "",
        };

        let mut fields = Vec::with_capacity(proto.fields.len());
        for f in &proto.fields {
            let dotted = join(&parent, &f.name);
            let field_type = match scalar(f.kind) {
                Some(s) => FieldType::Scalar(s),
                None => {
                    let type_name = f.type_name.as_deref().unwrap_or_default();
                    match self.resolve(file, &dotted, type_name)? {
                        DescRef::Enum(e) => FieldType::Enum(e),
                        DescRef::Message(m) => FieldType::Message(m),
                        DescRef::Service(_) => {
                            return Err(Error::UnresolvedType {
                                file: file_name.clone(),
                                referrer: dotted,
                                type_name: type_name.to_string(),
                            })
                        }
                    }
                }
            };
            let required = f
                .options
                .as_ref()
                .is_some_and(|o| o.field_behavior.iter().any(|b| b == "REQUIRED"));
            fields.push(Field {
                common: scope.common(&f.name, dotted, &f.comments),
                number: f.number,
                field_type,
                repeated: f.label == Label::Repeated,
                oneof_index: f.oneof_index,
                deprecated: f.options.as_ref().map(|o| o.deprecated),
                required,
            });
        }

        self.model.messages[id.0].fields = fields;
        Ok(())
    }

    fn resolve_methods(&mut self, id: ServiceId, proto: &ServiceProto) -> Result<()> {
        let (package, file) = self.scope_of(&self.model.services[id.0].common);
        let parent = self.model.services[id.0].common.dotted_name.clone();
        let file_name = self.model.files[file.0].name.clone();
        let scope = Scope {
            package,
            file,
            file_name: &file_name,
            package_name: "",
        };

        let mut methods = Vec::with_capacity(proto.methods.len());
        for m in &proto.methods {
            let dotted = join(&parent, &m.name);
            methods.push(Method {
                input: self.resolve(file, &dotted, &m.input_type)?,
                output: self.resolve(file, &dotted, &m.output_type)?,
                common: scope.common(&m.name, dotted, &m.comments),
                deprecated: m.options.as_ref().map(|o| o.deprecated),
            });
        }

        self.model.services[id.0].methods = methods;
        Ok(())
    }

    /// The first file carrying front matter or a package comment speaks for
    /// the whole package.
    fn pick_representatives(&mut self) {
        for package in &mut self.model.packages {
            let files = &self.model.files;
            if let Some(&file) = package.files.iter().find(|f| {
                let file = &files[f.0];
                !file.matter.is_empty() || !file.location.leading.is_empty()
            }) {
                package.representative = file;
            }
        }
    }
}

fn scalar(kind: FieldKind) -> Option<Scalar> {
    match kind {
        FieldKind::Double => Some(Scalar::Double),
        FieldKind::Float => Some(Scalar::Float),
        FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Sfixed32 => Some(Scalar::Int32),
        FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Sfixed64 => Some(Scalar::Int64),
        FieldKind::Uint32 | FieldKind::Fixed32 => Some(Scalar::Uint32),
        FieldKind::Uint64 | FieldKind::Fixed64 => Some(Scalar::Uint64),
        FieldKind::Bool => Some(Scalar::Bool),
        FieldKind::String => Some(Scalar::String),
        FieldKind::Bytes => Some(Scalar::Bytes),
        FieldKind::Message | FieldKind::Group | FieldKind::Enum => None,
    }
}
