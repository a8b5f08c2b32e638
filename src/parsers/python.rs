//! Python parser using tree-sitter
//!
//! Extracts import bindings, definitions and import-statement lines. Any
//! ERROR or MISSING node in the tree is reported as a [`ParseError`] so that
//! syntax-tree detectors can skip broken input. The grammar still accepts the
//! Python 2 `print` and `exec` statements, so those are rejected too.

use crate::error::ParseError;
use crate::parsers::{Definition, DefinitionKind, ImportBinding, ParsedModule};
use std::collections::VecDeque;
use tree_sitter::{Node, Parser, Tree};

/// Statement kinds the grammar parses but Python 3 rejects
const LEGACY_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// Parse Python source and extract what the fixers and style learner need
pub fn parse(source: &str) -> Result<ParsedModule, ParseError> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();
    let bytes = source.as_bytes();

    let mut module = ParsedModule::default();
    walk(root, &mut |node| match node.kind() {
        "import_statement" | "import_from_statement" => {
            let line = node.start_position().row + 1;
            module.import_lines.push(line);
            extract_import_names(node, bytes, line, &mut module.imports);
        }
        "function_definition" | "class_definition" => {
            if let Some(def) = parse_definition(node, bytes) {
                module.definitions.push(def);
            }
        }
        _ => {}
    });
    module.import_lines.sort_unstable();

    Ok(module)
}

/// Report whether `source` is syntactically valid Python
pub fn check_syntax(source: &str) -> Result<(), ParseError> {
    parse_tree(source).map(|_| ())
}

fn parse_tree(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError {
            line: 0,
            column: 0,
            message: format!("Failed to set Python language: {}", e),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError {
        line: 0,
        column: 0,
        message: "Failed to parse Python source".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(root, source.as_bytes()));
    }
    if let Some(node) = first_legacy_statement(root) {
        let pos = node.start_position();
        return Err(ParseError {
            line: pos.row + 1,
            column: pos.column + 1,
            message: format!(
                "invalid syntax: Python 2 {} statement",
                node.kind().trim_end_matches("_statement")
            ),
        });
    }
    Ok(tree)
}

/// Earliest `print`/`exec` statement in source order
fn first_legacy_statement(node: Node) -> Option<Node> {
    if LEGACY_STATEMENTS.contains(&node.kind()) {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_legacy_statement)
}

/// Build a ParseError pointing at the first ERROR/MISSING node
fn syntax_error(root: Node, source: &[u8]) -> ParseError {
    let node = first_error(root).unwrap_or(root);
    let pos = node.start_position();
    let message = if node.is_missing() {
        format!("invalid syntax: missing '{}'", node.kind())
    } else {
        let snippet = node
            .utf8_text(source)
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .trim();
        if snippet.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near '{}'", snippet)
        }
    };
    ParseError {
        line: pos.row + 1,
        column: pos.column + 1,
        message,
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Breadth-first traversal of every node in the tree.
/// Outer definitions are visited before nested ones.
fn walk<'a>(root: Node<'a>, visit: &mut impl FnMut(Node<'a>)) {
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        visit(node);
        let mut cursor = node.walk();
        queue.extend(node.children(&mut cursor));
    }
}

/// Collect the imported names. `import a.b as c` binds `a.b` here, matching
/// the textual-occurrence check the unused-import fixer runs.
fn extract_import_names(node: Node, source: &[u8], line: usize, out: &mut Vec<ImportBinding>) {
    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        let name_node = match child.kind() {
            "aliased_import" => child.child_by_field_name("name"),
            _ => Some(child),
        };
        if let Some(text) = name_node.and_then(|n| n.utf8_text(source).ok()) {
            out.push(ImportBinding {
                name: text.to_string(),
                line,
            });
        }
    }

    if node.kind() == "import_from_statement" {
        let mut cursor = node.walk();
        if node
            .children(&mut cursor)
            .any(|c| c.kind() == "wildcard_import")
        {
            out.push(ImportBinding {
                name: "*".to_string(),
                line,
            });
        }
    }
}

fn parse_definition(node: Node, source: &[u8]) -> Option<Definition> {
    let name = node
        .child_by_field_name("name")?
        .utf8_text(source)
        .ok()?
        .to_string();
    let kind = if node.kind() == "class_definition" {
        DefinitionKind::Class
    } else {
        DefinitionKind::Function
    };
    let has_docstring = node
        .child_by_field_name("body")
        .is_some_and(starts_with_docstring);

    Some(Definition {
        kind,
        name,
        line: node.start_position().row + 1,
        has_docstring,
    })
}

/// First body statement is a bare string expression
fn starts_with_docstring(body: Node) -> bool {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");

    let Some(stmt) = first else {
        return false;
    };
    if stmt.kind() != "expression_statement" {
        return false;
    }
    stmt.named_child(0)
        .is_some_and(|expr| matches!(expr.kind(), "string" | "concatenated_string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_use_dotted_name_not_alias() {
        let module = parse("import os\nimport numpy as np\nfrom a.b import c, d as e\n")
            .expect("valid python");
        let names: Vec<(&str, usize)> = module
            .imports
            .iter()
            .map(|i| (i.name.as_str(), i.line))
            .collect();
        assert_eq!(
            names,
            vec![("os", 1), ("numpy", 2), ("c", 3), ("d", 3)]
        );
        assert_eq!(module.import_lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_wildcard_and_nested_imports() {
        let source = "from os import *\n\ndef f():\n    import json\n    return json\n";
        let module = parse(source).expect("valid python");
        assert!(module.imports.iter().any(|i| i.name == "*" && i.line == 1));
        assert!(module.imports.iter().any(|i| i.name == "json" && i.line == 4));
        assert_eq!(module.import_lines, vec![1, 4]);
    }

    #[test]
    fn test_docstring_detection() {
        let source = r#"
class Documented:
    """Has one."""

    def method(self):
        # comment first
        """Still a docstring."""
        return 1

def bare(x):
    return x

async def fetch():
    pass
"#;
        let module = parse(source).expect("valid python");
        let by_name = |n: &str| {
            module
                .definitions
                .iter()
                .find(|d| d.name == n)
                .cloned()
                .expect("definition")
        };
        assert!(by_name("Documented").has_docstring);
        assert_eq!(by_name("Documented").kind, DefinitionKind::Class);
        assert!(by_name("method").has_docstring);
        assert!(!by_name("bare").has_docstring);
        assert_eq!(by_name("bare").line, 10);
        assert!(!by_name("fetch").has_docstring);
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let err = check_syntax("def f(:\n    pass\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("invalid syntax"));
        assert!(parse("x = (1,\n").is_err());
    }

    #[test]
    fn test_python2_statements_are_rejected() {
        let err = check_syntax("x = 1\nprint 'hi'\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 1);
        assert!(err.message.contains("print"));

        let err = check_syntax("exec 'x = 1'\n").unwrap_err();
        assert!(err.message.contains("exec"));

        assert!(check_syntax("print('hi')\n").is_ok());
        assert!(parse("import os\nprint 'hi'\n").is_err());
    }

    #[test]
    fn test_definitions_are_breadth_first() {
        let source = "def outer():\n    def inner():\n        pass\n    return inner\n\nclass Later:\n    pass\n";
        let module = parse(source).expect("valid python");
        let names: Vec<&str> = module.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "Later", "inner"]);
    }

    #[test]
    fn test_valid_code_passes_check() {
        assert!(check_syntax("x = 1\nif x is None:\n    pass\n").is_ok());
        assert!(check_syntax("").is_ok());
    }
}
