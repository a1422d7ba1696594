//! Binary form of the grammar graph.
//!
//! ```text
//! rule_count
//! rule_count * { wtype[6] pad[2] ratio node }
//! node_count
//! node_count * { branch_count
//!     branch_count * { str_count  str_count * { len  char[len] }
//!                      tr_count   tr_count * { next ratio pos ct dc head_pos weak } } }
//! ```
//!
//! Every integer and character is a 4-byte big-endian word.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::{Branch, DepGraph, GraphError, Node, Transition, WordSeqRule};
use crate::codec::{write_i32_be, Reader};
use crate::segclass::DepClass;
use crate::wtype::WType;

impl DepGraph {
    pub fn to_bytes(&self) -> Result<Vec<u8>, GraphError> {
        let mut out = Vec::new();
        write_len(&mut out, self.rules.len())?;
        for rule in &self.rules {
            out.extend_from_slice(&rule.wt.to_bytes());
            out.extend_from_slice(&[0, 0]);
            write_i32_be(&mut out, rule.ratio);
            write_len(&mut out, rule.node)?;
        }
        write_len(&mut out, self.nodes.len())?;
        for node in &self.nodes {
            write_len(&mut out, node.branches.len())?;
            for branch in &node.branches {
                write_len(&mut out, branch.conds.len())?;
                for cond in &branch.conds {
                    write_len(&mut out, cond.len())?;
                    for &c in cond.iter() {
                        write_i32_be(&mut out, c as i32);
                    }
                }
                write_len(&mut out, branch.transitions.len())?;
                for tr in &branch.transitions {
                    write_len(&mut out, tr.next)?;
                    write_i32_be(&mut out, tr.ratio);
                    write_i32_be(&mut out, tr.pos.into());
                    write_i32_be(&mut out, tr.ct.into());
                    write_i32_be(&mut out, tr.dc.code());
                    write_i32_be(&mut out, tr.head_pos.into());
                    write_i32_be(&mut out, tr.weak.into());
                }
            }
        }
        Ok(out)
    }

    /// Decode the binary form. Trailing bytes are ignored so the graph can
    /// be read straight out of an aligned container section.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GraphError> {
        let mut r = Reader::new(bytes);
        let mut pool: HashMap<Vec<char>, Arc<[char]>> = HashMap::new();

        let nr_rules = r.read_len()?;
        let mut rules = Vec::with_capacity(nr_rules.min(r.remaining() / 16));
        for _ in 0..nr_rules {
            let b = r.read_bytes(8)?;
            let wt = WType::from_bytes([b[0], b[1], b[2], b[3], b[4], b[5]]);
            let ratio = r.read_i32()?;
            let node = r.read_len()?;
            rules.push(WordSeqRule { wt, ratio, node });
        }

        let nr_nodes = r.read_len()?;
        let mut nodes = Vec::with_capacity(nr_nodes.min(r.remaining() / 4));
        for _ in 0..nr_nodes {
            let nr_branches = r.read_len()?;
            let mut branches = Vec::with_capacity(nr_branches.min(r.remaining() / 8));
            for _ in 0..nr_branches {
                let nr_strs = r.read_len()?;
                let mut conds = Vec::with_capacity(nr_strs.min(r.remaining() / 4));
                for _ in 0..nr_strs {
                    let len = r.read_len()?;
                    let mut s = Vec::with_capacity(len.min(r.remaining() / 4));
                    for _ in 0..len {
                        let v = r.read_i32()?;
                        let c = u32::try_from(v)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| GraphError::Decode(format!("invalid character {v}")))?;
                        s.push(c);
                    }
                    let cond = pool
                        .entry(s)
                        .or_insert_with_key(|k| Arc::from(k.as_slice()))
                        .clone();
                    conds.push(cond);
                }
                let nr_trans = r.read_len()?;
                let mut transitions = Vec::with_capacity(nr_trans.min(r.remaining() / 28));
                for _ in 0..nr_trans {
                    transitions.push(read_transition(&mut r)?);
                }
                branches.push(Branch { conds, transitions });
            }
            nodes.push(Node { branches });
        }

        let graph = Self {
            rules,
            nodes,
            names: Vec::new(),
        };
        graph.check_references()?;
        Ok(graph)
    }

    pub fn open(path: &Path) -> Result<Self, GraphError> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }

    fn check_references(&self) -> Result<(), GraphError> {
        let n = self.nodes.len();
        if let Some(rule) = self.rules.iter().find(|r| r.node >= n) {
            return Err(GraphError::Decode(format!(
                "rule points at node {} of {n}",
                rule.node
            )));
        }
        let bad = self
            .nodes
            .iter()
            .flat_map(|node| &node.branches)
            .flat_map(|b| &b.transitions)
            .find(|t| t.next >= n);
        if let Some(t) = bad {
            return Err(GraphError::Decode(format!(
                "transition points at node {} of {n}",
                t.next
            )));
        }
        Ok(())
    }
}

fn read_transition(r: &mut Reader<'_>) -> Result<Transition, GraphError> {
    let next = r.read_len()?;
    let ratio = r.read_i32()?;
    let pos = small(r.read_i32()?, "pos")?;
    let ct = small(r.read_i32()?, "ct")?;
    let dc_code = r.read_i32()?;
    let dc = DepClass::from_code(dc_code)
        .ok_or_else(|| GraphError::Decode(format!("invalid dependency class {dc_code}")))?;
    let head_pos = small(r.read_i32()?, "head_pos")?;
    let weak = r.read_i32()? != 0;
    Ok(Transition {
        next,
        ratio,
        pos,
        ct,
        dc,
        head_pos,
        weak,
    })
}

fn small(v: i32, field: &str) -> Result<u8, GraphError> {
    u8::try_from(v).map_err(|_| GraphError::Decode(format!("{field} out of range: {v}")))
}

fn write_len(out: &mut Vec<u8>, n: usize) -> Result<(), GraphError> {
    let v = i32::try_from(n).map_err(|_| GraphError::Decode(format!("{n} exceeds i32::MAX")))?;
    write_i32_be(out, v);
    Ok(())
}
