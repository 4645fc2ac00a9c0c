//! Document planning: which documents a run produces and what goes in each.

use tracing::{debug, info};

use crate::closure::Contents;
use crate::comment::spell::{DictionarySpeller, Speller};
use crate::config::Options;
use crate::context::DocContext;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::grouping;
use crate::model::{FileId, Mode, Model, PackageId};
use crate::render::page;

/// One generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path relative to the output directory, `/`-separated.
    pub name: String,
    pub content: String,
}

pub struct Generator<'m> {
    model: &'m Model,
    options: Options,
    speller: Option<Box<dyn Speller>>,
    diagnostics: Diagnostics,
    output: Vec<OutputFile>,
}

impl<'m> Generator<'m> {
    pub fn new(model: &'m Model, options: Options) -> Self {
        Self {
            model,
            options,
            speller: None,
            diagnostics: Diagnostics::default(),
            output: Vec::new(),
        }
    }

    /// Use `speller` instead of loading `Options::dictionaries`.
    pub fn with_speller(mut self, speller: Box<dyn Speller>) -> Self {
        self.speller = Some(speller);
        self
    }

    /// Generate every document.
    ///
    /// On error, documents of the packages finished so far remain available
    /// through [`partial_output`](Self::partial_output).
    pub fn run(&mut self) -> Result<Vec<OutputFile>> {
        if self.speller.is_none() && !self.options.dictionaries.is_empty() {
            let speller = DictionarySpeller::from_files(&self.options.dictionaries)?;
            info!(dictionaries = self.options.dictionaries.len(), "spell checking enabled");
            self.speller = Some(Box::new(speller));
        }

        for package in self.model.packages() {
            self.generate_package(package)?;
        }

        let count = self.diagnostics.count();
        if self.options.warnings_as_errors && count > 0 {
            return Err(Error::WarningsAsErrors(count));
        }
        Ok(std::mem::take(&mut self.output))
    }

    pub fn partial_output(&self) -> &[OutputFile] {
        &self.output
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    fn generate_package(&mut self, package: PackageId) -> Result<()> {
        let model = self.model;
        let pkg = model.package(package);
        let mode = resolve_package_mode(model, package)?;

        let files: Vec<FileId> = pkg
            .files
            .iter()
            .copied()
            .filter(|&f| {
                let own = model.file(f).matter.mode;
                let effective = if own == Mode::Unset { mode } else { own };
                effective != Mode::Suppressed && model.should_generate(f)
            })
            .collect();

        debug!(package = %pkg.name, ?mode, files = files.len(), "generating package");
        if files.is_empty() {
            return Ok(());
        }

        match mode {
            Mode::PerPackage => {
                let top = pkg.representative;
                let ctx = DocContext::new(model, package, Some(top));
                let mut contents = Contents::default();
                for &file in &files {
                    contents.add_file(&ctx, file);
                }
                let name = per_package_name(&pkg.name, &model.file(top).name);
                self.write_document(ctx, top, &contents, name);
            }
            Mode::Unset | Mode::PerFile | Mode::Suppressed => {
                for &file in &files {
                    let ctx = DocContext::new(model, package, Some(file));
                    let mut contents = Contents::default();
                    contents.add_file(&ctx, file);
                    let name = per_file_name(&model.file(file).name);
                    self.write_document(ctx, file, &contents, name);
                }
            }
        }
        Ok(())
    }

    fn write_document(&mut self, mut ctx: DocContext<'m>, top: FileId, contents: &Contents, name: String) {
        let layout = grouping::layout(&ctx, contents);
        ctx.grouping = layout.grouping();

        let content = page::document(
            &ctx,
            &self.options,
            self.speller.as_deref(),
            &mut self.diagnostics,
            Some(top),
            &layout,
        );
        debug!(%name, entries = layout.entry_count(), bytes = content.len(), "rendered document");
        self.output.push(OutputFile { name, content });
    }
}

/// Rendering mode shared by every file of a package.
///
/// The first explicit mode wins. A later `none` opts that file out, a later
/// explicit mode replaces an earlier `none`, and any other disagreement is
/// an error naming both files.
pub fn resolve_package_mode(model: &Model, package: PackageId) -> Result<Mode> {
    let pkg = model.package(package);
    let mut mode = Mode::Unset;
    let mut setter: Option<FileId> = None;

    for &id in &pkg.files {
        let own = model.file(id).matter.mode;
        if own == Mode::Unset {
            continue;
        }
        if mode == Mode::Unset || mode == Mode::Suppressed {
            mode = own;
            setter = Some(id);
        } else if own != mode && own != Mode::Suppressed {
            return Err(Error::ModeConflict {
                package: pkg.name.clone(),
                first_file: setter.map(|f| model.file(f).name.clone()).unwrap_or_default(),
                first: mode,
                file: model.file(id).name.clone(),
                second: own,
            });
        }
    }

    Ok(mode)
}

/// `dir/foo.proto` becomes `dir/foo.pb.html`.
pub fn per_file_name(file: &str) -> String {
    let base = file.rfind('/').map_or(0, |i| i + 1);
    let stem = match file[base..].rfind('.') {
        Some(dot) => &file[..base + dot],
        None => file,
    };
    format!("{}.pb.html", stem)
}

/// `PACKAGE.pb.html` next to the package's representative file.
pub fn per_package_name(package: &str, representative: &str) -> String {
    match representative.rfind('/') {
        Some(i) => format!("{}/{}.pb.html", &representative[..i], package),
        None => format!("{}.pb.html", package),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::spell::WordListSpeller;
    use crate::config::OutputMode;
    use crate::loader;

    fn file(name: &str, mode: Option<&str>, body: &str) -> String {
        let comment = match mode {
            Some(mode) => format!(r#""comments": {{"leading": " $mode: {}\n Docs.\n"}},"#, mode),
            None => String::new(),
        };
        format!(r#"{{"name": "{}", "package": "p", {} {}}}"#, name, comment, body)
    }

    fn model(files: &[String]) -> Model {
        loader::from_json_str(&format!(r#"{{"files": [{}]}}"#, files.join(","))).unwrap()
    }

    fn names(output: &[OutputFile]) -> Vec<&str> {
        output.iter().map(|o| o.name.as_str()).collect()
    }

    fn quiet() -> Options {
        Options {
            mode: OutputMode::Fragment,
            ..Options::default()
        }
    }

    #[test]
    fn output_names() {
        assert_eq!(per_file_name("acme/v1/foo.proto"), "acme/v1/foo.pb.html");
        assert_eq!(per_file_name("foo"), "foo.pb.html");
        assert_eq!(per_file_name("a.b/foo"), "a.b/foo.pb.html");
        assert_eq!(per_package_name("acme.v1", "acme/v1/foo.proto"), "acme/v1/acme.v1.pb.html");
        assert_eq!(per_package_name("acme", "foo.proto"), "acme.pb.html");
    }

    #[test]
    fn unset_modes_generate_per_file() {
        let m = model(&[file("p/a.proto", None, r#""messages": []"#), file("p/b.proto", None, r#""messages": []"#)]);
        assert_eq!(resolve_package_mode(&m, PackageId(0)).unwrap(), Mode::Unset);
        let out = Generator::new(&m, quiet()).run().unwrap();
        assert_eq!(names(&out), vec!["p/a.pb.html", "p/b.pb.html"]);
    }

    #[test]
    fn package_mode_makes_one_document() {
        let m = model(&[
            file("p/a.proto", None, r#""messages": [{"name": "A"}]"#),
            file("p/b.proto", Some("package"), r#""messages": [{"name": "B"}]"#),
        ]);
        let out = Generator::new(&m, quiet()).run().unwrap();
        assert_eq!(names(&out), vec!["p/p.pb.html"]);
        assert!(out[0].content.contains("id=\"A\""));
        assert!(out[0].content.contains("id=\"B\""));
    }

    #[test]
    fn none_opts_a_single_file_out() {
        let m = model(&[
            file("p/a.proto", Some("file"), r#""messages": []"#),
            file("p/b.proto", Some("none"), r#""messages": []"#),
            file("p/c.proto", None, r#""messages": []"#),
        ]);
        assert_eq!(resolve_package_mode(&m, PackageId(0)).unwrap(), Mode::PerFile);
        let out = Generator::new(&m, quiet()).run().unwrap();
        assert_eq!(names(&out), vec!["p/a.pb.html", "p/c.pb.html"]);
    }

    #[test]
    fn explicit_mode_replaces_earlier_none() {
        let m = model(&[
            file("p/a.proto", Some("none"), r#""messages": []"#),
            file("p/b.proto", Some("package"), r#""messages": []"#),
            file("p/c.proto", None, r#""messages": []"#),
        ]);
        assert_eq!(resolve_package_mode(&m, PackageId(0)).unwrap(), Mode::PerPackage);
        let out = Generator::new(&m, quiet()).run().unwrap();
        // a.proto keeps its own `none` and is the representative file.
        assert_eq!(names(&out), vec!["p/p.pb.html"]);
    }

    #[test]
    fn conflicting_modes_name_both_files() {
        let m = model(&[
            file("p/a.proto", Some("file"), r#""messages": []"#),
            file("p/b.proto", Some("package"), r#""messages": []"#),
        ]);
        let err = resolve_package_mode(&m, PackageId(0)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("package p"));
        assert!(msg.contains("p/a.proto sets PerFile"));
        assert!(msg.contains("p/b.proto sets PerPackage"));
    }

    #[test]
    fn package_mode_then_unset_covers_both_files() {
        let m = model(&[
            file("p/a.proto", Some("package"), r#""messages": [{"name": "A"}]"#),
            file("p/b.proto", None, r#""messages": [{"name": "B"}]"#),
        ]);
        assert_eq!(resolve_package_mode(&m, PackageId(0)).unwrap(), Mode::PerPackage);
        let out = Generator::new(&m, quiet()).run().unwrap();
        assert_eq!(names(&out), vec!["p/p.pb.html"]);
        assert!(out[0].content.contains("id=\"A\""));
        assert!(out[0].content.contains("id=\"B\""));
    }

    #[test]
    fn package_then_file_is_fatal() {
        let m = model(&[
            file("p/a.proto", Some("package"), r#""messages": []"#),
            file("p/b.proto", Some("file"), r#""messages": []"#),
        ]);
        let mut generator = Generator::new(&m, quiet());
        let err = generator.run().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::ModeConflict { .. }));
        assert!(msg.contains("p/a.proto sets PerPackage"));
        assert!(msg.contains("p/b.proto sets PerFile"));
        assert!(generator.partial_output().is_empty());
    }

    #[test]
    fn earlier_packages_survive_a_fatal_error() {
        let json = r#"{"files": [
            {"name": "q/q.proto", "package": "q", "messages": [{"name": "Q"}]},
            {"name": "p/a.proto", "package": "p", "comments": {"leading": " $mode: file\n"}},
            {"name": "p/b.proto", "package": "p", "comments": {"leading": " $mode: package\n"}}
        ]}"#;
        let m = loader::from_json_str(json).unwrap();
        let mut generator = Generator::new(&m, quiet());
        assert!(matches!(generator.run(), Err(Error::ModeConflict { .. })));
        assert_eq!(names(generator.partial_output()), vec!["q/q.pb.html"]);
    }

    #[test]
    fn files_to_generate_filter() {
        let json = r#"{"files": [
            {"name": "p/a.proto", "package": "p"},
            {"name": "p/b.proto", "package": "p"}
        ], "files_to_generate": ["p/b.proto"]}"#;
        let m = loader::from_json_str(json).unwrap();
        let out = Generator::new(&m, quiet()).run().unwrap();
        assert_eq!(names(&out), vec!["p/b.pb.html"]);
    }

    #[test]
    fn deprecated_fields_render_last() {
        let m = model(&[file(
            "p/a.proto",
            None,
            r#""messages": [{"name": "M", "comments": {"leading": " M.\n"}, "fields": [
                {"name": "old", "number": 1, "type": "string", "options": {"deprecated": true},
                 "comments": {"leading": " Old.\n"}},
                {"name": "new", "number": 2, "type": "string", "comments": {"leading": " New.\n"}}
            ]}]"#,
        )]);
        let out = Generator::new(&m, quiet()).run().unwrap();
        let content = &out[0].content;
        let new = content.find("id=\"M-new\"").unwrap();
        let old = content.find("id=\"M-old\"").unwrap();
        assert!(new < old);
    }

    #[test]
    fn warnings_counted_and_optionally_fatal() {
        // The package comment and message comment are both missing.
        let m = model(&[file("p/a.proto", None, r#""messages": [{"name": "M"}]"#)]);

        let mut generator = Generator::new(&m, quiet());
        assert_eq!(generator.run().unwrap().len(), 1);
        assert_eq!(generator.diagnostics().count(), 2);

        let options = Options {
            warnings_as_errors: true,
            ..quiet()
        };
        let err = Generator::new(&m, options).run().unwrap_err();
        assert_eq!(err.to_string(), "treating 2 warnings as errors");
    }

    #[test]
    fn speller_reports_misspellings() {
        let m = model(&[file(
            "p/a.proto",
            Some("file"),
            r#""messages": [{"name": "M", "comments": {"leading": " A mesage.\n"}}]"#,
        )]);
        let mut speller = WordListSpeller::new();
        speller.add_word_list("a\nmessage\ndocs");
        let mut generator = Generator::new(&m, quiet()).with_speller(Box::new(speller));
        generator.run().unwrap();
        let warnings: Vec<String> = generator
            .diagnostics()
            .warnings()
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(warnings, vec!["mesage is misspelled"]);
    }

    #[test]
    fn dictionaries_option_loads_a_speller() {
        let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
        let m = model(&[file(
            "p/a.proto",
            Some("file"),
            r#""messages": [{"name": "M", "comments": {"leading": " The mesage and messages.\n"}}]"#,
        )]);
        let options = Options {
            dictionaries: vec![format!("{}/words.dic", fixtures).into()],
            ..quiet()
        };
        let mut generator = Generator::new(&m, options);
        generator.run().unwrap();
        let warnings: Vec<String> = generator
            .diagnostics()
            .warnings()
            .iter()
            .map(|w| w.to_string())
            .collect();
        // "Docs" in the package comment is not in the fixture dictionary.
        assert_eq!(warnings, vec!["Docs is misspelled", "mesage is misspelled"]);
    }

    #[test]
    fn missing_dictionary_fails_the_run() {
        let m = model(&[file("p/a.proto", None, r#""messages": []"#)]);
        let options = Options {
            dictionaries: vec!["/nonexistent/words.dic".into()],
            ..quiet()
        };
        let err = Generator::new(&m, options).run().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/words.dic"));
    }
}
