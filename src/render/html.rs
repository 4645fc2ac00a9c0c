//! HTML sections for messages, enums and services.

use crate::comment::spell::Speller;
use crate::comment::Pipeline;
use crate::config::Options;
use crate::context::DocContext;
use crate::diagnostics::Diagnostics;
use crate::grouping::{self, deprecation_passes};
use crate::linker;
use crate::model::{normalize_id, Common, EnumId, Field, FieldType, Location, MessageId, ServiceId};

/// Buffer for one output document.
pub struct DocumentWriter<'a, 'm> {
    pub(super) ctx: &'a DocContext<'m>,
    pub(super) options: &'a Options,
    comments: Pipeline<'a, 'm>,
    diagnostics: &'a mut Diagnostics,
    out: String,
}

impl<'a, 'm> DocumentWriter<'a, 'm> {
    pub fn new(
        ctx: &'a DocContext<'m>,
        options: &'a Options,
        speller: Option<&'a dyn Speller>,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            ctx,
            options,
            comments: Pipeline::new(ctx, speller),
            diagnostics,
            out: String::new(),
        }
    }

    /// Append one line.
    pub fn emit(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    /// Append the rendered comment at `loc`, or nothing (plus a warning)
    /// when there is none.
    pub fn comment(&mut self, loc: &Location, name: &str) {
        if let Some(html) = self.comments.render(self.diagnostics, loc, name) {
            self.out.push_str(&html);
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    // -- Sections ------------------------------------------------------------

    fn section_heading(&mut self, common: &Common) {
        let name = self.ctx.relative_name(common);
        let short = name.rsplit('.').next().unwrap_or(&name);
        let depth = grouping::heading_depth(&name, self.ctx.grouping);
        self.emit(&format!(
            "<h{depth} id=\"{}\">{}</h{depth}>",
            normalize_id(&name),
            short
        ));
        match &common.class {
            Some(class) => self.emit(&format!("<section class=\"{}\">", class)),
            None => self.emit("<section>"),
        }
    }

    pub fn message(&mut self, id: MessageId) {
        let model = self.ctx.model;
        let message = model.message(id);
        self.section_heading(&message.common);
        self.comment(&message.common.location, &message.common.name);

        if !message.fields.is_empty() {
            self.table_head("message-fields", "Field");
            for pass in deprecation_passes(&message.fields, |f| f.deprecated) {
                let mut oneof = None;
                for field in pass.into_iter().filter(|f| !f.common.hidden) {
                    self.field_row(field, &mut oneof);
                }
            }
            self.table_tail();
        }

        self.emit("</section>");
    }

    fn field_row(&mut self, field: &Field, oneof: &mut Option<i32>) {
        let name = if self.options.camel_case_fields {
            camel_case(&field.common.name)
        } else {
            field.common.name.clone()
        };

        let mut class = row_class(field.deprecated, field.common.class.as_deref());
        if let Some(index) = field.oneof_index {
            if *oneof == Some(index) {
                class.push_str("oneof");
            } else {
                class.push_str("oneof oneof-start");
                *oneof = Some(index);
            }
        }

        let id = normalize_id(&self.ctx.relative_name(&field.common));
        self.open_row(&id, &class);

        let link = linker::anchor_tag(&format!("#{}", id), &name);
        self.emit(&format!(
            "<td><div class=\"field\"><div class=\"name\"><code>{}</code></div>",
            link
        ));
        let type_name = self.field_type_name(field);
        let type_html = linker::resolve(self.ctx, field.field_type.target(), &type_name, true);
        self.emit(&format!("<div class=\"type\">{}</div>", type_html));
        if field.required {
            self.emit("<div class=\"required\">Required</div>");
        }
        self.emit("</div></td>");

        self.emit("<td>");
        self.comment(&field.common.location, &field.common.name);
        self.emit("</td>");
        self.emit("</tr>");
    }

    /// Display name of a field's type, HTML-escaped for map types.
    pub fn field_type_name(&self, field: &Field) -> String {
        let model = self.ctx.model;
        let mut name = match field.field_type {
            FieldType::Scalar(scalar) => scalar.name().to_string(),
            FieldType::Message(id) => {
                let message = model.message(id);
                if let [key, value, ..] = message.fields.as_slice() {
                    if message.map_entry {
                        let key = self.field_type_name(key);
                        let value = linker::resolve(
                            self.ctx,
                            value.field_type.target(),
                            &self.field_type_name(value),
                            true,
                        );
                        return format!("map&lt;{},&nbsp;{}&gt;", key, value);
                    }
                }
                self.ctx.relative_name(&message.common)
            }
            FieldType::Enum(id) => self.ctx.relative_name(&model.enum_type(id).common),
        };

        if field.repeated {
            name.push_str("[]");
        }
        if field.oneof_index.is_some() {
            name.push_str(" (oneof)");
        }
        name
    }

    pub fn enumeration(&mut self, id: EnumId) {
        let model = self.ctx.model;
        let enumeration = model.enum_type(id);
        self.section_heading(&enumeration.common);
        self.comment(&enumeration.common.location, &enumeration.common.name);

        if !enumeration.values.is_empty() {
            self.table_head("enum-values", "Name");
            for pass in deprecation_passes(&enumeration.values, |v| v.deprecated) {
                for value in pass.into_iter().filter(|v| !v.common.hidden) {
                    let class = row_class(value.deprecated, value.common.class.as_deref());
                    let id = normalize_id(&self.ctx.relative_name(&value.common));
                    self.open_row(&id, &class);
                    let link = linker::anchor_tag(&format!("#{}", id), &value.common.name);
                    self.emit(&format!("<td><code>{}</code></td>", link));
                    self.emit("<td>");
                    self.comment(&value.common.location, &value.common.name);
                    self.emit("</td>");
                    self.emit("</tr>");
                }
            }
            self.table_tail();
        }

        self.emit("</section>");
    }

    pub fn service(&mut self, id: ServiceId) {
        let model = self.ctx.model;
        let service = model.service(id);
        self.section_heading(&service.common);
        self.comment(&service.common.location, &service.common.name);

        for pass in deprecation_passes(&service.methods, |m| m.deprecated) {
            for method in pass.into_iter().filter(|m| !m.common.hidden) {
                let class = row_class(method.deprecated, method.common.class.as_deref());
                let id = normalize_id(&self.ctx.relative_name(&method.common));
                let class_attr = match class.trim_end() {
                    "" => String::new(),
                    class => format!(" class=\"{}\"", class),
                };
                self.emit(&format!(
                    "<pre id=\"{}\"{}><code class=\"language-proto\">rpc {}({}) returns ({})",
                    id,
                    class_attr,
                    method.common.name,
                    self.ctx.relative_name(model.common(method.input)),
                    self.ctx.relative_name(model.common(method.output)),
                ));
                self.emit("</code></pre>");
                self.comment(&method.common.location, &method.common.name);
            }
        }

        self.emit("</section>");
    }

    // -- Tables --------------------------------------------------------------

    fn table_head(&mut self, class: &str, first_column: &str) {
        self.emit(&format!("<table class=\"{}\">", class));
        self.emit("<thead>");
        self.emit("<tr>");
        self.emit(&format!("<th>{}</th>", first_column));
        self.emit("<th>Description</th>");
        self.emit("</tr>");
        self.emit("</thead>");
        self.emit("<tbody>");
    }

    fn table_tail(&mut self) {
        self.emit("</tbody>");
        self.emit("</table>");
    }

    fn open_row(&mut self, id: &str, class: &str) {
        match class.trim_end() {
            "" => self.emit(&format!("<tr id=\"{}\">", id)),
            class => self.emit(&format!("<tr id=\"{}\" class=\"{}\">", id, class)),
        }
    }
}

fn row_class(deprecated: Option<bool>, class: Option<&str>) -> String {
    let mut out = String::new();
    if deprecated == Some(true) {
        out.push_str("deprecated ");
    }
    if let Some(class) = class {
        out.push_str(class);
        out.push(' ');
    }
    out
}

/// `snake_case` to `camelCase`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            upper = false;
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use crate::model::{FileId, Model, PackageId};

    const MODEL: &str = r#"{"files": [{"name": "p/p.proto", "package": "p",
        "messages": [
            {"name": "Holder", "comments": {"span": [4, 0], "leading": " Holds things.\n"},
             "fields": [
                {"name": "old_name", "number": 1, "type": "string",
                 "options": {"deprecated": true}, "comments": {"leading": " Gone.\n"}},
                {"name": "labels", "number": 2, "type": "message", "label": "repeated",
                 "type_name": ".p.Holder.LabelsEntry", "comments": {"leading": " Labels.\n"}},
                {"name": "first", "number": 3, "type": "int32", "oneof_index": 0,
                 "comments": {"leading": " A.\n"}},
                {"name": "second", "number": 4, "type": "enum", "type_name": ".p.Kind",
                 "oneof_index": 0, "comments": {"leading": " B.\n"}},
                {"name": "items", "number": 5, "type": "message", "label": "repeated",
                 "type_name": ".p.Item",
                 "options": {"field_behavior": ["REQUIRED"]},
                 "comments": {"leading": " $class: experimental\n Items.\n"}},
                {"name": "secret", "number": 6, "type": "bool",
                 "comments": {"leading": " $hide_from_docs\n"}}
             ],
             "nested_messages": [{"name": "LabelsEntry", "options": {"map_entry": true},
                "fields": [{"name": "key", "number": 1, "type": "string"},
                           {"name": "value", "number": 2, "type": "message", "type_name": ".p.Item"}]}]},
            {"name": "Item", "comments": {"leading": " An item.\n"}}
        ],
        "enums": [{"name": "Kind", "comments": {"leading": " Kinds.\n"}, "values": [
            {"name": "OLD", "number": 0, "options": {"deprecated": true}, "comments": {"leading": " Old.\n"}},
            {"name": "NEW", "number": 1, "comments": {"leading": " New.\n"}}
        ]}],
        "services": [{"name": "Store", "comments": {"leading": " Store.\n"}, "methods": [
            {"name": "Get", "input_type": ".p.Item", "output_type": ".p.Holder",
             "comments": {"leading": " Gets.\n"}}
        ]}]
    }]}"#;

    fn render(f: impl FnOnce(&mut DocumentWriter<'_, '_>, &Model)) -> (String, Diagnostics) {
        let model = loader::from_json_str(MODEL).unwrap();
        let ctx = DocContext::new(&model, PackageId(0), Some(FileId(0)));
        let options = Options::default();
        let mut diag = Diagnostics::default();
        let mut w = DocumentWriter::new(&ctx, &options, None, &mut diag);
        f(&mut w, &model);
        let out = w.finish();
        (out, diag)
    }

    fn holder(model: &Model) -> MessageId {
        model.file(FileId(0)).messages[0]
    }

    #[test]
    fn map_field_type_name() {
        let (out, _) = render(|w, model| {
            let field = &model.message(holder(model)).fields[1];
            let name = w.field_type_name(field);
            w.emit(&name);
        });
        assert_eq!(out, "map&lt;string,&nbsp;<a href=\"#Item\">Item</a>&gt;\n");
    }

    #[test]
    fn repeated_and_oneof_suffixes() {
        let (out, _) = render(|w, model| {
            let fields = &model.message(holder(model)).fields;
            let names = [w.field_type_name(&fields[3]), w.field_type_name(&fields[4])].join("|");
            w.emit(&names);
        });
        assert_eq!(out, "Kind (oneof)|Item[]\n");
    }

    #[test]
    fn message_rows_active_first() {
        let (out, diag) = render(|w, model| w.message(holder(model)));
        assert!(out.starts_with("<h2 id=\"Holder\">Holder</h2>\n<section>\n<p>Holds things.</p>\n"));
        assert!(out.contains("<table class=\"message-fields\">"));

        let rows: Vec<&str> = out.lines().filter(|l| l.starts_with("<tr id=")).collect();
        assert_eq!(
            rows,
            vec![
                "<tr id=\"Holder-labels\">",
                "<tr id=\"Holder-first\" class=\"oneof oneof-start\">",
                "<tr id=\"Holder-second\" class=\"oneof\">",
                "<tr id=\"Holder-items\" class=\"experimental\">",
                "<tr id=\"Holder-old_name\" class=\"deprecated\">",
            ]
        );
        assert!(out.contains("<div class=\"type\"><a href=\"#Item\">Item[]</a></div>\n<div class=\"required\">Required</div>"));
        assert!(!out.contains("secret"));
        assert!(out.ends_with("</tbody>\n</table>\n</section>\n"));
        assert_eq!(diag.count(), 0);
    }

    #[test]
    fn enum_values_table() {
        let (out, _) = render(|w, model| w.enumeration(model.file(FileId(0)).enums[0]));
        let rows: Vec<&str> = out.lines().filter(|l| l.starts_with("<tr id=")).collect();
        assert_eq!(rows, vec!["<tr id=\"Kind-NEW\">", "<tr id=\"Kind-OLD\" class=\"deprecated\">"]);
        assert!(out.contains("<td><code><a href=\"#Kind-NEW\">NEW</a></code></td>"));
    }

    #[test]
    fn service_methods() {
        let (out, _) = render(|w, model| w.service(model.file(FileId(0)).services[0]));
        assert!(out.contains(
            "<pre id=\"Store-Get\"><code class=\"language-proto\">rpc Get(Item) returns (Holder)\n</code></pre>\n<p>Gets.</p>\n"
        ));
    }

    #[test]
    fn missing_comments_warn() {
        let (_, diag) = render(|w, model| {
            let item = model.file(FileId(0)).messages[2];
            let mut loc = model.message(item).common.location.clone();
            loc.leading.clear();
            w.comment(&loc, "Item");
        });
        assert_eq!(diag.count(), 1);
    }

    #[test]
    fn camel_case_names() {
        assert_eq!(camel_case("old_field_name"), "oldFieldName");
        assert_eq!(camel_case("plain"), "plain");
        assert_eq!(camel_case("trailing_"), "trailing");
    }
}
