//! Language table and heuristic language detection.
//!
//! Detection is best-effort and never fails: rules are evaluated in order,
//! case-insensitively, and the first rule whose patterns all match wins.
//! Code that matches nothing is assumed to be [`FALLBACK_LANGUAGE`].

use std::sync::LazyLock;

use regex::Regex;

/// Language assumed when no rule matches.
pub const FALLBACK_LANGUAGE: &str = "python";

/// Languages the service knows about, with their canonical file extension.
///
/// Languages outside this table are still accepted when supplied
/// explicitly; they are passed through to the backend unchanged.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("python", ".py"),
    ("javascript", ".js"),
    ("typescript", ".ts"),
    ("java", ".java"),
    ("cpp", ".cpp"),
    ("csharp", ".cs"),
    ("go", ".go"),
    ("rust", ".rs"),
    ("php", ".php"),
    ("ruby", ".rb"),
    ("swift", ".swift"),
    ("kotlin", ".kt"),
    ("scala", ".scala"),
    ("r", ".r"),
    ("matlab", ".m"),
    ("sql", ".sql"),
    ("html", ".html"),
    ("css", ".css"),
    ("scss", ".scss"),
    ("sass", ".sass"),
];

/// Ordered detection rules. Every pattern of a rule must match.
const RULES: &[(&str, &[&str])] = &[
    ("php", &[r"<\?php"]),
    ("html", &[r"<!doctype\s+html|<html[\s>]"]),
    ("cpp", &[r#"#include\s*[<"]"#, r"\bint\s+main\s*\(|\bstd::"]),
    ("csharp", &[r"\busing\s+system(\.\w+)*\s*;|\bnamespace\s+[\w.]+"]),
    ("go", &[r"^\s*package\s+\w+\s*$", r"\bfunc\s+"]),
    ("rust", &[r"\bfn\s+\w+", r"\blet\s+(mut\s+)?\w+"]),
    (
        "typescript",
        &[
            r"\b(function|const|let)\b|=>",
            r":\s*(string|number|boolean|void|any)\b|\binterface\s+\w+\s*\{|\btype\s+\w+\s*=",
        ],
    ),
    ("javascript", &[r"\bfunction\b|=>|\bconsole\.log\b", r"\b(var|let|const)\s+\w+"]),
    ("kotlin", &[r"\bfun\s+\w+", r"\bval\s+\w+"]),
    ("scala", &[r"\bdef\s+\w+", r"\bval\s+\w+"]),
    ("swift", &[r"\bfunc\s+\w+", r"^\s*import\s+\w+"]),
    ("java", &[r"\b(public|private|protected)\s+\w+"]),
    ("ruby", &[r"^\s*def\s+\w+", r"^\s*end\s*$"]),
    (
        "python",
        &[r"^\s*def\s+\w+\s*\(|^\s*(from\s+[\w.]+\s+)?import\s+[\w.]+|^\s*class\s+\w+.*:\s*$"],
    ),
    (
        "sql",
        &[r"\b(select\s+.+\s+from|insert\s+into|update\s+\w+\s+set|create\s+table|delete\s+from)\b"],
    ),
    ("css", &[r"[.#]?[\w-]+\s*\{", r"[\w-]+\s*:\s*[^;]+;"]),
];

struct CompiledRule {
    language: &'static str,
    patterns: Vec<Regex>,
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(language, patterns)| CompiledRule {
            language,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(&format!("(?im){p}")).expect("valid regex"))
                .collect(),
        })
        .collect()
});

/// Guess the language of a code sample.
pub fn detect_language(code: &str) -> &'static str {
    COMPILED_RULES
        .iter()
        .find(|rule| rule.patterns.iter().all(|re| re.is_match(code)))
        .map(|rule| rule.language)
        .unwrap_or(FALLBACK_LANGUAGE)
}
