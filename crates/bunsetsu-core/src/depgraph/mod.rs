//! Dependent-word grammar graph.
//!
//! Nodes hold branches; a branch is an ordered list of condition strings
//! (particles, auxiliaries, inflection endings) followed by the transitions
//! taken once all of them have matched. Independent words enter the graph
//! through the word-sequence rule table, which maps a word type to its
//! starting node. Node 0 (`@`) is the terminal.

mod builder;
mod codec;
mod rules;
#[cfg(test)]
mod tests;

pub use builder::GraphBuilder;
pub use rules::{read_rule_file, tokenize_rules, RuleLine};

use std::sync::Arc;

use crate::codec::CodecError;
use crate::segclass::DepClass;
use crate::wtype::WType;

/// Fixed-point base of transition and rule ratios.
pub const RATIO_BASE: i32 = 256;

/// Name of the terminal node.
pub const TERMINAL_NAME: &str = "@";

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{origin}:{line}: include nested deeper than {max}")]
    IncludeDepth {
        origin: String,
        line: usize,
        max: usize,
    },

    #[error("{origin}:{line}: unknown word type {name}")]
    UnknownWordType {
        origin: String,
        line: usize,
        name: String,
    },

    #[error("{origin}:{line}: malformed transition {token}")]
    MalformedTransition {
        origin: String,
        line: usize,
        token: String,
    },

    #[error("{origin}:{line}: malformed rule: {reason}")]
    MalformedRule {
        origin: String,
        line: usize,
        reason: String,
    },

    #[error("invalid graph image: {0}")]
    Decode(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// One outgoing edge of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Destination node; 0 ends the attached-word chain.
    pub next: usize,
    pub ratio: i32,
    pub pos: u8,
    pub ct: u8,
    pub dc: DepClass,
    /// Overrides the head part of speech when not `pos::NONE`.
    pub head_pos: u8,
    pub weak: bool,
}

impl Transition {
    pub fn is_terminal(&self) -> bool {
        self.next == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Condition strings, matched in order.
    pub conds: Vec<Arc<[char]>>,
    pub transitions: Vec<Transition>,
}

impl Branch {
    /// Characters consumed when every condition matches at `pos`.
    pub fn match_at(&self, input: &[char], pos: usize) -> Option<usize> {
        let mut at = pos;
        for cond in &self.conds {
            let end = at.checked_add(cond.len())?;
            if input.get(at..end)? != &cond[..] {
                return None;
            }
            at = end;
        }
        Some(at - pos)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub branches: Vec<Branch>,
}

/// Entry point for an independent word type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSeqRule {
    pub wt: WType,
    pub ratio: i32,
    pub node: usize,
}

/// Compiled grammar graph. Immutable once built or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepGraph {
    rules: Vec<WordSeqRule>,
    nodes: Vec<Node>,
    /// Node names; empty for graphs decoded from the binary form.
    names: Vec<String>,
}

impl DepGraph {
    pub fn rules(&self) -> &[WordSeqRule] {
        &self.rules
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn node_id(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn branch_count(&self) -> usize {
        self.nodes.iter().map(|n| n.branches.len()).sum()
    }

    pub fn transition_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| &n.branches)
            .map(|b| b.transitions.len())
            .sum()
    }

    /// Every branch of `node` whose full condition list matches at `pos`,
    /// with the number of characters it consumes.
    pub fn match_branches<'a>(
        &'a self,
        node: usize,
        input: &[char],
        pos: usize,
    ) -> Vec<(&'a Branch, usize)> {
        let Some(node) = self.nodes.get(node) else {
            return Vec::new();
        };
        node.branches
            .iter()
            .filter_map(|b| b.match_at(input, pos).map(|len| (b, len)))
            .collect()
    }
}
