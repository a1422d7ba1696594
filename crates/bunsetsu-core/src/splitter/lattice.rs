//! Segment lattice over usable meta-words.
//!
//! Node lists are indexed by the position a path has reached. Each node
//! carries the product of transition probabilities along its path
//! (`real`) and that product weighted by the meta-word score
//! (`adjusted`), which is what paths are compared by.

use std::cmp::Ordering;

use tracing::{debug, debug_span, warn};

use super::metaword::{is_weak_conn, Check, MetaWord, MetaWordKind, MwId};
use super::{BorderState, SplitterContext};
use crate::feature::{FeatureError, FeatureList};
use crate::resources::Resources;
use crate::segclass::SegClass;
use crate::settings::settings;

/// Probability given to feature combinations absent from the table.
const PROBABILITY_FLOOR: f64 = 1e-6;

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    /// Position the meta-word starts at.
    border: usize,
    seg_class: SegClass,
    real: f64,
    adjusted: f64,
    before: Option<NodeId>,
    mw: Option<MwId>,
}

pub(super) struct Lattice<'a> {
    ctx: &'a SplitterContext,
    res: &'a Resources,
    from: usize,
    to: usize,
    nodes: Vec<Node>,
    lists: Vec<Vec<NodeId>>,
}

/// Features of the step from a `prev` segment to a `cur` one.
pub(super) fn transition_features(
    cur: SegClass,
    prev: SegClass,
    mw: Option<&MetaWord>,
    prev_mw: Option<&MetaWord>,
) -> Result<FeatureList, FeatureError> {
    let mut fl = FeatureList::new();
    fl.set_cur_class(cur)?;
    fl.set_class_trans(prev, cur)?;
    if let Some(mw) = mw {
        fl.set_dep_class(mw.dep_class)?;
        fl.set_dep_word(mw.dep_word_hash)?;
        fl.set_mw_features(mw.mw_features)?;
        fl.set_noun_cos(mw.core_wt)?;
    }
    if prev_mw.is_some_and(is_weak_conn) {
        fl.set_prev_weak()?;
    }
    fl.sort();
    Ok(fl)
}

fn poisson(lambda: f64, r: usize) -> f64 {
    let mut p = lambda.powi(r as i32) * (-lambda).exp();
    for i in 2..=r {
        p /= i as f64;
    }
    p
}

impl<'a> Lattice<'a> {
    pub(super) fn new(ctx: &'a SplitterContext, res: &'a Resources, from: usize, to: usize) -> Self {
        Self {
            ctx,
            res,
            from,
            to,
            nodes: Vec::new(),
            lists: vec![Vec::new(); to + 1],
        }
    }

    fn mw(&self, id: MwId) -> &'a MetaWord {
        let ctx: &'a SplitterContext = self.ctx;
        &ctx.metawords[id]
    }

    /// Prior over the segment length.
    fn form_bias(&self, mut mw: &'a MetaWord) -> f64 {
        while let MetaWordKind::Wrap(inner) = mw.kind {
            mw = self.mw(inner);
        }
        let s = &settings().splitter;
        let mut r = mw.len.clamp(s.min_segment_len, s.max_segment_len);
        if mw.seg_class == SegClass::RentaiShushoku {
            r = r.max(s.min_rentai_segment_len);
        }
        poisson(s.poisson_lambda, r)
    }

    fn probability(&self, features: Result<FeatureList, FeatureError>) -> f64 {
        let fl = match features {
            Ok(fl) => fl,
            Err(e) => {
                warn!(error = %e, "lattice feature list overflow");
                return PROBABILITY_FLOOR;
            }
        };
        let p = self
            .res
            .trans_info
            .find(&fl)
            .and_then(|f| f.probability())
            .unwrap_or(0.0);
        if p <= 0.0 {
            PROBABILITY_FLOOR
        } else {
            p
        }
    }

    fn alloc_node(&mut self, before: Option<NodeId>, mw: Option<MwId>, border: usize) -> NodeId {
        let seg_class = mw.map_or(SegClass::Head, |id| self.mw(id).seg_class);
        let (real, adjusted) = match before {
            Some(b) => {
                let prev = &self.nodes[b];
                let prev_mw = prev.mw.map(|id| self.mw(id));
                let cur_mw = mw.map(|id| self.mw(id));
                let fl = transition_features(seg_class, prev.seg_class, cur_mw, prev_mw);
                let mut p = self.probability(fl);
                if let Some(m) = cur_mw {
                    p *= self.form_bias(m);
                }
                let real = prev.real * p;
                let weight = cur_mw.map_or(1000.0, |m| m.score as f64);
                (real, real * weight)
            }
            None => (1.0, 1.0),
        };
        let id = self.nodes.len();
        self.nodes.push(Node {
            border,
            seg_class,
            real,
            adjusted,
            before,
            mw,
        });
        id
    }

    fn kind_of(&self, node: NodeId) -> Option<&'a MetaWordKind> {
        self.nodes[node].mw.map(|id| &self.mw(id).kind)
    }

    /// Paths ending at the same place prefer learned sequences, then whole
    /// compounds over compound parts, then the higher adjusted probability.
    fn cmp_node(&self, lhs: NodeId, rhs: NodeId) -> Ordering {
        let (mut l, mut r) = (Some(lhs), Some(rhs));
        while let (Some(ln), Some(rn)) = (l, r) {
            let (Some(lm), Some(rm)) = (self.nodes[ln].mw, self.nodes[rn].mw) else {
                break;
            };
            if self.mw(lm).end() != self.mw(rm).end() {
                break;
            }
            let (lk, rk) = (self.kind_of(ln), self.kind_of(rn));
            let l_ochaire = matches!(lk, Some(MetaWordKind::Ochaire { .. }));
            let r_ochaire = matches!(rk, Some(MetaWordKind::Ochaire { .. }));
            if l_ochaire != r_ochaire {
                return if l_ochaire {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            match (lk, rk) {
                (Some(MetaWordKind::CompoundHead(..)), Some(MetaWordKind::CompoundPart(_))) => {
                    return Ordering::Greater
                }
                (Some(MetaWordKind::CompoundPart(_)), Some(MetaWordKind::CompoundHead(..))) => {
                    return Ordering::Less
                }
                _ => {}
            }
            l = self.nodes[ln].before;
            r = self.nodes[rn].before;
        }
        self.nodes[lhs]
            .adjusted
            .partial_cmp(&self.nodes[rhs].adjusted)
            .unwrap_or(Ordering::Equal)
    }

    /// Keep one node per (class, border) at a position.
    fn push_node(&mut self, node: NodeId, position: usize) {
        let n = &self.nodes[node];
        let same = self.lists[position].iter().position(|&other| {
            let o = &self.nodes[other];
            o.seg_class == n.seg_class && o.border == n.border
        });
        match same {
            Some(k) => {
                if self.cmp_node(node, self.lists[position][k]) != Ordering::Less {
                    self.lists[position][k] = node;
                }
            }
            None => self.lists[position].push(node),
        }
    }

    fn remove_min_node(&mut self, position: usize) {
        let list = &self.lists[position];
        if list.is_empty() {
            return;
        }
        let mut min = 0;
        for k in 1..list.len() {
            if self.cmp_node(list[k], list[min]) == Ordering::Less {
                min = k;
            }
        }
        self.lists[position].remove(min);
    }

    pub(super) fn build(&mut self) {
        let _span = debug_span!("build_lattice", from = self.from, to = self.to).entered();
        let node_max = settings().splitter.lattice_node_max;
        let ctx = self.ctx;

        let start = self.alloc_node(None, None, self.from);
        self.push_node(start, self.from);

        for i in self.from..self.to {
            for left in self.lists[i].clone() {
                for &mw in &ctx.mw_at[i] {
                    let m = self.mw(mw);
                    if m.can_use != Check::Ok {
                        continue;
                    }
                    let position = i + m.len;
                    if position > self.to {
                        continue;
                    }
                    let node = self.alloc_node(Some(left), Some(mw), i);
                    self.push_node(node, position);
                    if self.lists[position].len() >= node_max {
                        self.remove_min_node(position);
                    }
                }
            }
        }

        // Transition into the end of the string.
        for k in 0..self.lists[self.to].len() {
            let id = self.lists[self.to][k];
            let node = &self.nodes[id];
            let fl = transition_features(
                SegClass::Tail,
                node.seg_class,
                None,
                node.mw.map(|m| self.mw(m)),
            );
            let p = self.probability(fl);
            self.nodes[id].adjusted *= p;
        }
        debug!(nodes = self.nodes.len(), reached = self.lists[self.to].len());
    }

    /// Walk back from the best node at the rightmost reached position,
    /// recording classes and boundaries.
    pub(super) fn choose_path(&self, state: &mut BorderState) {
        let Some(last) = (self.from..=self.to).rev().find(|&p| !self.lists[p].is_empty()) else {
            return;
        };
        let mut best: Option<NodeId> = None;
        for &node in &self.lists[last] {
            if best.map_or(true, |b| self.cmp_node(node, b) == Ordering::Greater) {
                best = Some(node);
            }
        }
        let Some(mut node) = best else {
            return;
        };
        while let Some(before) = self.nodes[node].before {
            let n = &self.nodes[node];
            state.best_seg_class[n.border] = n.seg_class;
            if let Some(mw) = n.mw {
                self.ctx
                    .mark_border_by_metaword(mw, &mut state.seg_border, &mut state.best_mw);
            }
            node = before;
        }
    }
}
