//! Document-to-config compiler for pipedoc.
//!
//! This crate ties the markdown passes together with hierarchy resolution,
//! artifact naming, metadata decoding and tree assembly into end-to-end
//! compiles (e.g., [`compile`], [`Compiler::compile_file`]).

pub mod assembler;
pub mod compiler;
pub mod hierarchy;
pub mod metadata;
pub mod naming;

pub use compiler::{Compilation, Compiler, compile, resolved_sections};
