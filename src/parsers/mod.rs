//! Source code parsers using tree-sitter
//!
//! Only Python gets a syntax tree. The unused-import fixer, the docstring
//! fixer, fix validation and import-style extraction all build on it; every
//! other language is handled textually.

pub mod python;

/// One name bound by an import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Dotted module or member name as written (alias ignored), `*` for wildcards
    pub name: String,
    /// 1-based line of the import statement
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Function,
    Class,
}

/// A function or class definition, at any nesting depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub name: String,
    /// 1-based line of the `def`/`class` keyword
    pub line: usize,
    pub has_docstring: bool,
}

/// Everything extracted from one parsed module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModule {
    pub imports: Vec<ImportBinding>,
    pub definitions: Vec<Definition>,
    /// Sorted 1-based lines of every import statement
    pub import_lines: Vec<usize>,
}
