//! Per-document rendering context.

use crate::model::{Common, FileId, Model, PackageId};

/// What is being rendered right now: the package that owns the document,
/// the file whose front matter heads it, and whether the document is split
/// into Services and Types sections.
#[derive(Clone, Copy)]
pub struct DocContext<'m> {
    pub model: &'m Model,
    pub package: PackageId,
    pub front_matter: Option<FileId>,
    pub grouping: bool,
}

impl<'m> DocContext<'m> {
    pub fn new(model: &'m Model, package: PackageId, front_matter: Option<FileId>) -> Self {
        Self {
            model,
            package,
            front_matter,
            grouping: false,
        }
    }

    /// Dotted name, package-qualified only for nodes of other packages.
    pub fn relative_name(&self, common: &Common) -> String {
        if common.package == self.package {
            common.dotted_name.clone()
        } else {
            self.model.absolute_name(common)
        }
    }

    /// Home location of the document being rendered.
    pub fn home_location(&self) -> Option<&'m str> {
        self.front_matter
            .and_then(|f| self.model.file(f).matter.home_location.as_deref())
    }

    pub fn package_name(&self) -> &'m str {
        &self.model.package(self.package).name
    }
}
