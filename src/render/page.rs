//! Whole-document composition: header, entity sections, footer.

use super::html_escape;
use super::DocumentWriter;
use crate::comment::spell::Speller;
use crate::config::{Options, OutputMode};
use crate::context::DocContext;
use crate::diagnostics::Diagnostics;
use crate::grouping::{Layout, TypeEntry};
use crate::model::FileId;

const GENERATOR: &str = "protoc-gen-docs";

const STYLE: &str = "<style>
body { font-family: system-ui, sans-serif; max-width: 60em; margin: 2em auto; padding: 0 1em; }
code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }
pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5em; }
th, td { border: 1px solid #ddd; padding: 0.4em 0.6em; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
tr.oneof > td { border-top: 1px dashed #849396; border-bottom: 1px dashed #849396; }
tr.oneof-start { border-top: 2px solid #888; }
.deprecated { background: silver; }
.experimental { background: yellow; }
.field .type { font-size: 0.9em; color: #555; }
.field .required { font-size: 0.8em; font-weight: bold; color: #b00; }
</style>";

/// Render one document. `ctx.grouping` must already reflect `layout`.
pub fn document(
    ctx: &DocContext<'_>,
    options: &Options,
    speller: Option<&dyn Speller>,
    diagnostics: &mut Diagnostics,
    top: Option<FileId>,
    layout: &Layout,
) -> String {
    let mut w = DocumentWriter::new(ctx, options, speller, diagnostics);
    write_header(&mut w, top, layout.entry_count());

    if !layout.services.is_empty() {
        if ctx.grouping {
            w.emit("<h2 id=\"Services\">Services</h2>");
        }
        for &(_, id) in &layout.services {
            w.service(id);
        }
    }

    if !layout.types.is_empty() {
        if ctx.grouping {
            w.emit("<h2 id=\"Types\">Types</h2>");
        }
        for &(_, entry) in &layout.types {
            match entry {
                TypeEntry::Message(id) => w.message(id),
                TypeEntry::Enum(id) => w.enumeration(id),
            }
        }
    }

    write_footer(&mut w);
    w.finish()
}

fn write_header(w: &mut DocumentWriter<'_, '_>, top: Option<FileId>, entries: usize) {
    let ctx = *w.ctx;
    let options = w.options;
    let model = ctx.model;
    let name = ctx.package_name();
    let matter = top.map(|f| &model.file(f).matter);
    let title = matter.and_then(|m| m.title.as_deref());
    let overview = matter.and_then(|m| m.overview.as_deref());
    let description = matter.and_then(|m| m.description.as_deref());

    match options.mode {
        OutputMode::FragmentWithFrontMatter => {
            w.emit("---");
            w.emit(&format!("title: {}", title.unwrap_or(name)));
            if let Some(overview) = overview {
                w.emit(&format!("overview: {}", overview));
            }
            if let Some(description) = description {
                w.emit(&format!("description: {}", description));
            }
            if let Some(location) = matter.and_then(|m| m.home_location.as_deref()) {
                w.emit(&format!("location: {}", location));
            }
            w.emit(&format!("layout: {}", GENERATOR));
            w.emit(&format!("generator: {}", GENERATOR));

            if options.front_matter_extras {
                // Per package, extras may come from any of its files.
                let extras: Vec<&String> = if options.per_file {
                    matter.map(|m| m.extra.iter().collect()).unwrap_or_default()
                } else {
                    model
                        .package(ctx.package)
                        .files
                        .iter()
                        .flat_map(|&f| &model.file(f).matter.extra)
                        .collect()
                };
                for line in extras {
                    w.emit(line);
                }
            }

            w.emit(&format!("number_of_entries: {}", entries));
            w.emit("---");
        }
        OutputMode::Page => {
            w.emit("<!DOCTYPE html>");
            w.emit("<html itemscope itemtype=\"https://schema.org/WebPage\">");
            w.emit(&format!("<!-- Generated by {} -->", GENERATOR));
            w.emit("<head>");
            w.emit("<meta charset=\"utf-8\">");
            w.emit("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1, shrink-to-fit=no\">");

            if let Some(title) = title {
                let title = html_escape(title);
                w.emit(&format!("<meta name=\"title\" content=\"{}\">", title));
                w.emit(&format!("<meta name=\"og:title\" content=\"{}\">", title));
                w.emit(&format!("<title>{}</title>", title));
            }
            if let Some(summary) = overview.or(description) {
                let summary = html_escape(summary);
                w.emit(&format!("<meta name=\"description\" content=\"{}\">", summary));
                w.emit(&format!("<meta name=\"og:description\" content=\"{}\">", summary));
            }

            match &options.stylesheet {
                Some(href) => w.emit(&format!("<link rel=\"stylesheet\" href=\"{}\">", html_escape(href))),
                None => w.emit(STYLE),
            }

            w.emit("</head>");
            w.emit("<body>");
            if let Some(title) = title {
                w.emit(&format!("<h1>{}</h1>", html_escape(title)));
            }
        }
        OutputMode::Fragment => {
            w.emit(&format!("<!-- Generated by {} -->", GENERATOR));
            if let Some(title) = title {
                w.emit(&format!("<h1>{}</h1>", html_escape(title)));
            }
        }
    }

    if options.per_file {
        if let Some(top) = top {
            w.comment(&model.file(top).location, name);
        }
    } else {
        let representative = model.package(ctx.package).representative;
        w.comment(&model.file(representative).location, name);
    }
}

fn write_footer(w: &mut DocumentWriter<'_, '_>) {
    if w.options.mode == OutputMode::Page {
        w.emit("</body>");
        w.emit("</html>");
    }
}
