//! Language tags and content-based language detection
//!
//! Detection is a substring heuristic, not real identification. The rule
//! order below is load-bearing: analyzer selection and stored snippet
//! languages both depend on it, including the fallback to Python.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Languages a snippet can be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
            Language::Java,
            Language::Cpp,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }

    /// JavaScript and TypeScript share linters, pattern tables and fixes
    pub fn is_js_family(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }

    /// Guess a language from a file extension (used by the CLI as a hint)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Classify a snippet. A parseable `hint` always wins.
    pub fn detect(code: &str, hint: Option<&str>) -> Self {
        if let Some(lang) = hint.and_then(|h| h.parse::<Language>().ok()) {
            return lang;
        }

        let has = |marker: &str| code.contains(marker);

        if has("def ") || has("import ") || (has("class ") && has(":")) {
            return Language::Python;
        }
        if has("function ") || has("const ") || has("let ") || has("var ") {
            if has("interface ") || (has(": ") && has("=>")) {
                return Language::TypeScript;
            }
            return Language::JavaScript;
        }
        if has("public class ") || has("private ") || has("void main") {
            return Language::Java;
        }
        if has("#include") || has("std::") || has("cout") {
            return Language::Cpp;
        }

        Language::Python
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::JavaScript),
            "typescript" => Ok(Language::TypeScript),
            "java" => Ok(Language::Java),
            "cpp" => Ok(Language::Cpp),
            other => Err(format!(
                "Unknown language '{}'. Valid languages: python, javascript, typescript, java, cpp",
                other
            )),
        }
    }
}

/// Free-function form of [`Language::detect`]
pub fn detect_language(code: &str, hint: Option<&str>) -> Language {
    Language::detect(code, hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_wins_regardless_of_content() {
        let cpp = "#include <iostream>\nint main() { std::cout << 1; }";
        for lang in Language::all() {
            assert_eq!(Language::detect(cpp, Some(lang.as_str())), *lang);
        }
        assert_eq!(Language::detect("def f(): pass", Some("CPP")), Language::Cpp);
        assert_eq!(Language::detect("x", Some("TypeScript")), Language::TypeScript);
    }

    #[test]
    fn test_invalid_hint_falls_through_to_heuristics() {
        assert_eq!(Language::detect("const x = 1;", Some("rust")), Language::JavaScript);
    }

    #[test]
    fn test_python_markers() {
        assert_eq!(Language::detect("def foo():\n    return 1", None), Language::Python);
        assert_eq!(Language::detect("import os", None), Language::Python);
        assert_eq!(Language::detect("class Foo:\n    pass", None), Language::Python);
    }

    #[test]
    fn test_python_checked_before_javascript() {
        // `import ` appears in ES modules too; the Python rule runs first
        assert_eq!(
            Language::detect("import React from 'react';\nconst a = 1;", None),
            Language::Python
        );
    }

    #[test]
    fn test_javascript_and_typescript_markers() {
        assert_eq!(Language::detect("const a = 1;", None), Language::JavaScript);
        assert_eq!(Language::detect("function f() { return 1 }", None), Language::JavaScript);
        assert_eq!(
            Language::detect("interface A { x: number }\nlet a = 1;", None),
            Language::TypeScript
        );
        assert_eq!(
            Language::detect("const f = (x: number) => x;", None),
            Language::TypeScript
        );
    }

    #[test]
    fn test_java_and_cpp_markers() {
        assert_eq!(
            Language::detect("public class Main { void main() {} }", None),
            Language::Java
        );
        assert_eq!(Language::detect("#include <vector>\nint main() {}", None), Language::Cpp);
        assert_eq!(Language::detect("std::vector<int> v;", None), Language::Cpp);
    }

    #[test]
    fn test_default_is_python() {
        assert_eq!(Language::detect("", None), Language::Python);
        assert_eq!(Language::detect("SELECT 1", None), Language::Python);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("rs"), None);
    }
}
