use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::rules::{read_rule_file, tokenize_rules, RuleLine};
use super::{
    Branch, DepGraph, GraphError, Node, Transition, WordSeqRule, RATIO_BASE, TERMINAL_NAME,
};
use crate::segclass::DepClass;
use crate::wtype::{ct, pos, WType};

const NORMAL_CONNECTION: i32 = 1;
const WEAKER_CONNECTION: i32 = 2;
const WEAK_CONNECTION: i32 = 8;

/// Accumulates rule and branch lines into a [`DepGraph`].
///
/// Node ids are assigned in order of first mention; `@` is always 0.
/// Condition strings are interned so branches share their storage.
pub struct GraphBuilder {
    nodes: Vec<Node>,
    names: Vec<String>,
    ids: HashMap<String, usize>,
    rules: Vec<WordSeqRule>,
    pool: HashMap<Vec<char>, Arc<[char]>>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        let mut b = Self {
            nodes: Vec::new(),
            names: Vec::new(),
            ids: HashMap::new(),
            rules: Vec::new(),
            pool: HashMap::new(),
        };
        b.find_or_create_node(TERMINAL_NAME);
        b
    }

    pub fn find_or_create_node(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::default());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    fn intern(&mut self, s: &str) -> Arc<[char]> {
        let chars: Vec<char> = s.chars().collect();
        self.pool
            .entry(chars)
            .or_insert_with_key(|k| Arc::from(k.as_slice()))
            .clone()
    }

    /// Branch of `node` with exactly these conditions, created if new.
    pub fn find_or_create_branch(&mut self, node: usize, conds: &[&str]) -> usize {
        let conds: Vec<Arc<[char]>> = conds.iter().map(|c| self.intern(c)).collect();
        let branches = &mut self.nodes[node].branches;
        if let Some(i) = branches.iter().position(|b| b.conds == conds) {
            return i;
        }
        branches.push(Branch {
            conds,
            transitions: Vec::new(),
        });
        branches.len() - 1
    }

    /// Decode a transition token such as `:CyHvSk@node`.
    ///
    /// Attribute letters come before `@`; unknown ones are logged and
    /// skipped.
    pub fn parse_transition(
        &mut self,
        token: &str,
        line: &RuleLine,
    ) -> Result<Transition, GraphError> {
        let Some((attrs, dest)) = token.split_once('@') else {
            return Err(GraphError::MalformedTransition {
                origin: line.origin.clone(),
                line: line.line,
                token: token.to_string(),
            });
        };
        let mut conn = NORMAL_CONNECTION;
        let mut tr = Transition {
            next: 0,
            ratio: RATIO_BASE,
            pos: pos::NONE,
            ct: ct::NONE,
            dc: DepClass::None,
            head_pos: pos::NONE,
            weak: false,
        };
        let mut chars = attrs.chars();
        while let Some(c) = chars.next() {
            match c {
                ':' => {
                    conn = WEAKER_CONNECTION;
                    tr.weak = true;
                }
                '.' => {
                    conn = WEAK_CONNECTION;
                    tr.weak = true;
                }
                'C' => {
                    let code = chars.next();
                    tr.ct = match code {
                        Some('z') => ct::MIZEN,
                        Some('y') => ct::RENYOU,
                        Some('s') => ct::SYUSI,
                        Some('t') => ct::RENTAI,
                        Some('k') => ct::KATEI,
                        Some('m') => ct::MEIREI,
                        Some('g') => ct::HEAD,
                        _ => {
                            unknown_attr(line, token, "inflection code");
                            tr.ct
                        }
                    };
                }
                'H' => {
                    tr.head_pos = match chars.next() {
                        Some('n') => pos::NOUN,
                        Some('v') => pos::V,
                        Some('j') => pos::AJV,
                        _ => {
                            unknown_attr(line, token, "head pos code");
                            tr.head_pos
                        }
                    };
                }
                'S' => {
                    tr.dc = match chars.next() {
                        Some('f') => DepClass::Fuzokugo,
                        Some('k') => DepClass::Kakujoshi,
                        Some('y') => DepClass::Renyou,
                        Some('t') => DepClass::Rentai,
                        Some('e') => DepClass::End,
                        Some('r') => DepClass::Raw,
                        _ => {
                            unknown_attr(line, token, "dependency class");
                            tr.dc
                        }
                    };
                }
                other => {
                    unknown_attr(line, token, &format!("attribute {other}"));
                }
            }
        }
        tr.next = self.find_or_create_node(&format!("@{dest}"));
        tr.ratio = RATIO_BASE / conn;
        Ok(tr)
    }

    /// `@node "cond"... transition...`
    pub fn add_branch_line(&mut self, line: &RuleLine) -> Result<(), GraphError> {
        let node = self.find_or_create_node(&line.tokens[0]);
        let mut rest = line.tokens[1..].iter().peekable();

        let mut conds: Vec<&str> = Vec::new();
        while let Some(tok) = rest.next_if(|t| t.starts_with('"')) {
            let inner = tok
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(&tok[1..]);
            conds.push(inner);
        }
        if conds.is_empty() {
            warn!(
                origin = %line.origin,
                line = line.line,
                node = %line.tokens[0],
                "branch without any transition condition"
            );
            conds.push("");
        }
        let branch = self.find_or_create_branch(node, &conds);

        for tok in rest {
            let tr = self.parse_transition(tok, line)?;
            self.nodes[node].branches[branch].transitions.push(tr);
        }
        Ok(())
    }

    /// `wtypeName [ratio] @node`
    pub fn add_rule_line(&mut self, line: &RuleLine) -> Result<(), GraphError> {
        let malformed = |reason: &str| GraphError::MalformedRule {
            origin: line.origin.clone(),
            line: line.line,
            reason: reason.to_string(),
        };
        let (name, ratio, node) = match line.tokens.as_slice() {
            [name, node] => (name, RATIO_BASE, node),
            [name, ratio, node] => {
                let ratio = ratio
                    .parse::<i32>()
                    .map_err(|e| malformed(&format!("ratio {ratio}: {e}")))?;
                (name, ratio, node)
            }
            _ => return Err(malformed("expected `type [ratio] @node`")),
        };
        if !node.starts_with('@') {
            return Err(malformed("node name must start with @"));
        }
        let wt = WType::by_name(name).ok_or_else(|| GraphError::UnknownWordType {
            origin: line.origin.clone(),
            line: line.line,
            name: name.clone(),
        })?;
        let node = self.find_or_create_node(node);
        self.rules.push(WordSeqRule { wt, ratio, node });
        Ok(())
    }

    /// Dispatch a line: lines starting with `@` are branches, others rules.
    pub fn add_line(&mut self, line: &RuleLine) -> Result<(), GraphError> {
        if line.tokens[0].starts_with('@') {
            self.add_branch_line(line)
        } else {
            self.add_rule_line(line)
        }
    }

    pub fn add_text(&mut self, text: &str, origin: &str) -> Result<&mut Self, GraphError> {
        for line in tokenize_rules(text, origin) {
            self.add_line(&line)?;
        }
        Ok(self)
    }

    pub fn add_file(&mut self, path: &Path) -> Result<&mut Self, GraphError> {
        for line in read_rule_file(path)? {
            self.add_line(&line)?;
        }
        Ok(self)
    }

    /// Names of non-terminal nodes that never got a branch.
    pub fn check_nodes(&self) -> Vec<&str> {
        let mut empty = Vec::new();
        for (id, node) in self.nodes.iter().enumerate().skip(1) {
            if node.branches.is_empty() {
                warn!(node = %self.names[id], "node has no branch");
                empty.push(self.names[id].as_str());
            }
        }
        empty
    }

    pub fn build(self) -> DepGraph {
        self.check_nodes();
        debug!(
            nodes = self.nodes.len(),
            rules = self.rules.len(),
            strings = self.pool.len(),
            "built grammar graph"
        );
        DepGraph {
            rules: self.rules,
            nodes: self.nodes,
            names: self.names,
        }
    }
}

fn unknown_attr(line: &RuleLine, token: &str, what: &str) {
    warn!(origin = %line.origin, line = line.line, token, "unknown transition {what}");
}
