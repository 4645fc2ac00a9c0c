//! JSON shape of a descriptor document, modelled after `FileDescriptorSet`.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub files: Vec<FileProto>,
    /// Files to render; every file when absent.
    #[serde(default)]
    pub files_to_generate: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentsProto {
    /// `[start_line, start_column, ...]`, zero based.
    #[serde(default)]
    pub span: Vec<i32>,
    #[serde(default)]
    pub leading: String,
    #[serde(default)]
    pub trailing: String,
}

#[derive(Debug, Deserialize)]
pub struct FileProto {
    pub name: String,
    #[serde(default)]
    pub package: String,
    /// Comments on the `package` statement.
    #[serde(default)]
    pub comments: CommentsProto,
    #[serde(default)]
    pub messages: Vec<MessageProto>,
    #[serde(default)]
    pub enums: Vec<EnumProto>,
    #[serde(default)]
    pub services: Vec<ServiceProto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageOptions {
    #[serde(default)]
    pub map_entry: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageProto {
    pub name: String,
    #[serde(default)]
    pub comments: CommentsProto,
    #[serde(default)]
    pub options: MessageOptions,
    #[serde(default)]
    pub fields: Vec<FieldProto>,
    #[serde(default)]
    pub nested_messages: Vec<MessageProto>,
    #[serde(default)]
    pub nested_enums: Vec<EnumProto>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Optional,
    Required,
    Repeated,
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldOptions {
    #[serde(default)]
    pub deprecated: bool,
    /// `google.api.field_behavior` values, e.g. `REQUIRED`.
    #[serde(default)]
    pub field_behavior: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FieldProto {
    pub name: String,
    #[serde(default)]
    pub number: i32,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub label: Label,
    #[serde(default)]
    pub oneof_index: Option<i32>,
    #[serde(default)]
    pub options: Option<FieldOptions>,
    #[serde(default)]
    pub comments: CommentsProto,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryOptions {
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Deserialize)]
pub struct EnumProto {
    pub name: String,
    #[serde(default)]
    pub comments: CommentsProto,
    #[serde(default)]
    pub values: Vec<EnumValueProto>,
}

#[derive(Debug, Deserialize)]
pub struct EnumValueProto {
    pub name: String,
    #[serde(default)]
    pub number: i32,
    #[serde(default)]
    pub options: Option<EntryOptions>,
    #[serde(default)]
    pub comments: CommentsProto,
}

#[derive(Debug, Deserialize)]
pub struct ServiceProto {
    pub name: String,
    #[serde(default)]
    pub comments: CommentsProto,
    #[serde(default)]
    pub methods: Vec<MethodProto>,
}

#[derive(Debug, Deserialize)]
pub struct MethodProto {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    #[serde(default)]
    pub options: Option<EntryOptions>,
    #[serde(default)]
    pub comments: CommentsProto,
}
