//! Run-wide warning collection.

use std::fmt;

use crate::model::Location;

/// A non-fatal problem found while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// `file:line:col: ` or `file:line: `, empty when the position is unknown.
    pub place: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.place, self.message)
    }
}

/// Warnings accumulated over a whole run, threaded through every renderer.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning against `loc`.
    ///
    /// A negative `line_offset` points at a line inside the comment, counted
    /// back from its end; otherwise the element's own line and column are used.
    pub fn warn(&mut self, loc: &Location, line_offset: i32, message: impl Into<String>) {
        let place = match loc.span {
            Some((line, _)) if line_offset < 0 => {
                format!("{}:{}: ", loc.file, line + line_offset + 1)
            }
            Some((line, col)) => format!("{}:{}:{}: ", loc.file, line + 1, col + 1),
            None => String::new(),
        };
        self.warnings.push(Warning {
            place,
            message: message.into(),
        });
    }

    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
