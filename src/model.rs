//! Descriptor graph: packages, files, messages, enums and services.
//!
//! The model is built once by the [`loader`](crate::loader) and never mutated
//! afterwards. Nodes refer to each other through small copyable ids, so
//! recursive and cyclic message graphs need no shared ownership.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(pub(crate) usize);

/// A node that can be the target of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescRef {
    Message(MessageId),
    Enum(EnumId),
    Service(ServiceId),
}

/// Per-package choice between one document per file and one per package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Unset,
    PerFile,
    PerPackage,
    /// `$mode: none`, the file is left out of the generated output.
    Suppressed,
}

impl Mode {
    pub fn parse(value: &str) -> Option<Mode> {
        match value {
            "file" => Some(Mode::PerFile),
            "package" => Some(Mode::PerPackage),
            "none" => Some(Mode::Suppressed),
            _ => None,
        }
    }
}

/// Front matter declared in a file's package comment.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    pub mode: Mode,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub description: Option<String>,
    /// Where this file's documentation lives when it is not rendered locally.
    pub home_location: Option<String>,
    /// Lines copied verbatim into the YAML front matter.
    pub extra: Vec<String>,
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        self.mode == Mode::Unset
            && self.title.is_none()
            && self.overview.is_none()
            && self.description.is_none()
            && self.home_location.is_none()
            && self.extra.is_empty()
    }
}

/// Source comments attached to one element.
#[derive(Debug, Clone, Default)]
pub struct Location {
    /// Name of the `.proto` file the comment comes from.
    pub file: String,
    /// Zero-based start line and column.
    pub span: Option<(i32, i32)>,
    pub leading: String,
    pub trailing: String,
}

/// Attributes every named element carries.
#[derive(Debug, Clone)]
pub struct Common {
    pub name: String,
    /// Path through the enclosing types, e.g. `Outer.Inner.field`.
    pub dotted_name: String,
    pub package: PackageId,
    pub file: FileId,
    pub hidden: bool,
    pub class: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    String,
    Bytes,
}

impl Scalar {
    pub fn name(self) -> &'static str {
        match self {
            Scalar::Double => "double",
            Scalar::Float => "float",
            Scalar::Int32 => "int32",
            Scalar::Int64 => "int64",
            Scalar::Uint32 => "uint32",
            Scalar::Uint64 => "uint64",
            Scalar::Bool => "bool",
            Scalar::String => "string",
            Scalar::Bytes => "bytes",
        }
    }
}

/// The type of a field: a scalar, or a reference to another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Scalar),
    Message(MessageId),
    Enum(EnumId),
}

impl FieldType {
    pub fn target(self) -> Option<DescRef> {
        match self {
            FieldType::Scalar(_) => None,
            FieldType::Message(id) => Some(DescRef::Message(id)),
            FieldType::Enum(id) => Some(DescRef::Enum(id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub common: Common,
    pub number: i32,
    pub field_type: FieldType,
    pub repeated: bool,
    pub oneof_index: Option<i32>,
    /// `None` when the field has no options at all.
    pub deprecated: Option<bool>,
    pub required: bool,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub common: Common,
    pub fields: Vec<Field>,
    /// Synthetic `XEntry` message generated for a map field.
    pub map_entry: bool,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub common: Common,
    pub number: i32,
    pub deprecated: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub common: Common,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub common: Common,
    pub input: DescRef,
    pub output: DescRef,
    pub deprecated: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub common: Common,
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone)]
pub struct File {
    pub name: String,
    pub package: PackageId,
    pub matter: FrontMatter,
    /// Comment on the `package` statement, front matter lines removed.
    pub location: Location,
    /// Every message declared in the file, nested ones included.
    pub messages: Vec<MessageId>,
    /// Every enum declared in the file, nested ones included.
    pub enums: Vec<EnumId>,
    pub services: Vec<ServiceId>,
}

#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub files: Vec<FileId>,
    /// File that provides the package-wide front matter and comment.
    pub representative: FileId,
}

#[derive(Debug, Default)]
pub struct Model {
    pub(crate) packages: Vec<Package>,
    pub(crate) files: Vec<File>,
    pub(crate) messages: Vec<Message>,
    pub(crate) enums: Vec<Enum>,
    pub(crate) services: Vec<Service>,
    /// Absolute, dot-prefixed names (`.pkg.Outer.Inner`) of every linkable node.
    pub(crate) by_name: HashMap<String, DescRef>,
    pub(crate) to_generate: HashSet<FileId>,
}

impl Model {
    pub fn packages(&self) -> impl Iterator<Item = PackageId> + '_ {
        (0..self.packages.len()).map(PackageId)
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.0]
    }

    pub fn enum_type(&self, id: EnumId) -> &Enum {
        &self.enums[id.0]
    }

    pub fn service(&self, id: ServiceId) -> &Service {
        &self.services[id.0]
    }

    pub fn common(&self, desc: DescRef) -> &Common {
        match desc {
            DescRef::Message(id) => &self.message(id).common,
            DescRef::Enum(id) => &self.enum_type(id).common,
            DescRef::Service(id) => &self.service(id).common,
        }
    }

    /// Look up a node by its dot-prefixed absolute name.
    pub fn lookup(&self, absolute: &str) -> Option<DescRef> {
        self.by_name.get(absolute).copied()
    }

    /// Package-qualified name without the leading dot.
    pub fn absolute_name(&self, common: &Common) -> String {
        let package = &self.package(common.package).name;
        if package.is_empty() {
            common.dotted_name.clone()
        } else {
            format!("{}.{}", package, common.dotted_name)
        }
    }

    pub fn is_map_entry(&self, desc: DescRef) -> bool {
        matches!(desc, DescRef::Message(id) if self.message(id).map_entry)
    }

    /// Home location of the package, taken from its representative file.
    pub fn package_home_location(&self, id: PackageId) -> Option<&str> {
        let file = self.file(self.package(id).representative);
        file.matter.home_location.as_deref()
    }

    /// External location documenting `desc`: the declaring file's override,
    /// else the package-wide one.
    pub fn home_location(&self, desc: DescRef) -> Option<&str> {
        let common = self.common(desc);
        self.file(common.file)
            .matter
            .home_location
            .as_deref()
            .or_else(|| self.package_home_location(common.package))
    }

    pub fn should_generate(&self, file: FileId) -> bool {
        self.to_generate.contains(&file)
    }
}

/// Anchor id for a dotted name.
pub fn normalize_id(name: &str) -> String {
    name.replace([' ', '.'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_id_replaces_dots_and_spaces() {
        assert_eq!(normalize_id("Outer.Inner field"), "Outer-Inner-field");
        assert_eq!(normalize_id("Plain"), "Plain");
    }

    #[test]
    fn mode_values() {
        assert_eq!(Mode::parse("file"), Some(Mode::PerFile));
        assert_eq!(Mode::parse("package"), Some(Mode::PerPackage));
        assert_eq!(Mode::parse("none"), Some(Mode::Suppressed));
        assert_eq!(Mode::parse("all"), None);
    }

    #[test]
    fn field_type_targets() {
        assert_eq!(FieldType::Scalar(Scalar::Bool).target(), None);
        assert_eq!(
            FieldType::Enum(EnumId(3)).target(),
            Some(DescRef::Enum(EnumId(3)))
        );
    }
}
