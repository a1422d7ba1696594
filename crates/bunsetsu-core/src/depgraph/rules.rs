//! Line tokenizer shared by the grammar rule files.
//!
//! Tokens are separated by blanks. A token opening with `"` runs to the
//! closing quote and keeps both quotes. `\\` and `\"` escape, a backslash
//! before a newline joins lines. Lines whose first token starts with `#`
//! are comments. `\include path` splices another file (relative to the
//! including one) and `\eof` ends the current file.

use std::fs;
use std::path::Path;

use super::GraphError;

const MAX_INCLUDE_DEPTH: usize = 4;

/// A tokenized line with its origin for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    pub origin: String,
    pub line: usize,
    pub tokens: Vec<String>,
}

/// Tokenize rule text without following `\include`.
pub fn tokenize_rules(text: &str, origin: &str) -> Vec<RuleLine> {
    let mut out = Vec::new();
    for (line, tokens) in split_lines(text) {
        if tokens[0].starts_with('#') {
            continue;
        }
        if tokens[0] == "\\eof" {
            break;
        }
        out.push(RuleLine {
            origin: origin.to_string(),
            line,
            tokens,
        });
    }
    out
}

/// Read a rule file, following `\include` directives.
pub fn read_rule_file(path: &Path) -> Result<Vec<RuleLine>, GraphError> {
    let mut out = Vec::new();
    read_into(path, 0, &mut out)?;
    Ok(out)
}

fn read_into(path: &Path, depth: usize, out: &mut Vec<RuleLine>) -> Result<(), GraphError> {
    let text = fs::read_to_string(path)?;
    let origin = path.display().to_string();
    for (line, tokens) in split_lines(&text) {
        match tokens[0].as_str() {
            "\\eof" => break,
            "\\include" => {
                if tokens.len() != 2 {
                    return Err(GraphError::MalformedRule {
                        origin,
                        line,
                        reason: "include takes one path".into(),
                    });
                }
                if depth + 1 >= MAX_INCLUDE_DEPTH {
                    return Err(GraphError::IncludeDepth {
                        origin,
                        line,
                        max: MAX_INCLUDE_DEPTH,
                    });
                }
                let target = path
                    .parent()
                    .map(|dir| dir.join(&tokens[1]))
                    .unwrap_or_else(|| tokens[1].clone().into());
                read_into(&target, depth + 1, out)?;
            }
            t if t.starts_with('#') => {}
            _ => out.push(RuleLine {
                origin: origin.clone(),
                line,
                tokens,
            }),
        }
    }
    Ok(())
}

/// Split into non-empty token lines, numbered by the line they start on.
fn split_lines(text: &str) -> Vec<(usize, Vec<String>)> {
    let mut lines = Vec::new();
    let mut tokens: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_token = false;
    let mut in_quote = false;
    let mut lineno = 1;
    let mut start = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let (c, escaped) = if c == '\\' {
            match chars.peek() {
                Some('\\') | Some('"') => (chars.next().unwrap_or(c), true),
                Some('\n') => {
                    chars.next();
                    lineno += 1;
                    (' ', false)
                }
                _ => (c, false),
            }
        } else {
            (c, false)
        };

        if c == '\n' {
            if in_token {
                tokens.push(std::mem::take(&mut cur));
            }
            if !tokens.is_empty() {
                lines.push((start, std::mem::take(&mut tokens)));
            }
            in_token = false;
            in_quote = false;
            lineno += 1;
            start = lineno;
            continue;
        }
        if in_quote {
            cur.push(c);
            if c == '"' && !escaped {
                tokens.push(std::mem::take(&mut cur));
                in_token = false;
                in_quote = false;
            }
            continue;
        }
        if c == ' ' || c == '\t' || c == '\r' {
            if in_token {
                tokens.push(std::mem::take(&mut cur));
                in_token = false;
            }
            if tokens.is_empty() {
                start = lineno;
            }
            continue;
        }
        if c == '"' && !escaped && !in_token {
            in_quote = true;
        }
        cur.push(c);
        in_token = true;
    }
    if in_token {
        tokens.push(cur);
    }
    if !tokens.is_empty() {
        lines.push((start, tokens));
    }
    lines
}
