//! protoc-gen-docs: cross-linked HTML documentation for protobuf packages.
//!
//! A run loads one or more JSON descriptor documents into a [`Model`],
//! then a [`Generator`] turns every package into per-file or per-package
//! HTML documents. Types a document depends on are pulled in when they
//! have no documentation home of their own, references become links, and
//! comments are rendered from Markdown.

pub mod closure;
pub mod comment;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod linker;
pub mod loader;
pub mod model;
pub mod render;

pub use config::{Options, OutputMode};
pub use error::{Error, Result};
pub use generator::{Generator, OutputFile};
pub use model::Model;
