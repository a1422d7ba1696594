//! Constraint check of meta-words against fixed boundaries, then the
//! lattice search over the ones that pass.

use super::lattice::Lattice;
use super::metaword::{Check, CheckKind, MetaWordKind, MwId};
use super::{BorderState, SplitterContext};
use crate::resources::Resources;

impl SplitterContext {
    /// A meta-word starting before `border` must cover exactly
    /// `[from, border)`; one starting at or after it is unconstrained.
    fn border_check(&self, id: MwId, from: usize, border: usize) -> Check {
        let mw = &self.metawords[id];
        if mw.from < border {
            if mw.from == from && mw.end() == border {
                Check::Ok
            } else {
                Check::Ng
            }
        } else {
            Check::Ok
        }
    }

    fn check_metaword(&mut self, id: MwId, from: usize, border: usize) {
        if self.metawords[id].can_use != Check::Unchecked {
            return;
        }
        let kind = self.metawords[id].kind.clone();
        let result = match kind.check_kind() {
            CheckKind::Single => self.border_check(id, from, border),
            CheckKind::Border => {
                let (first, rest) = (kind.first(), kind.rest());
                // The pair must not be split at the fixed boundary.
                let split = matches!(
                    (first, rest),
                    (Some(a), Some(_)) if self.metawords[a].end() == border
                );
                if split {
                    Check::Ng
                } else {
                    let mut ok = true;
                    if let Some(a) = first {
                        self.check_metaword(a, from, border);
                        ok &= self.metawords[a].can_use == Check::Ok;
                    }
                    if let Some(b) = rest {
                        let b_from = self.metawords[b].from;
                        self.check_metaword(b, b_from, border);
                        ok &= self.metawords[b].can_use == Check::Ok;
                    }
                    if ok {
                        Check::Ok
                    } else {
                        Check::Ng
                    }
                }
            }
            CheckKind::Wrap => match kind.first() {
                Some(inner) => {
                    self.check_metaword(inner, from, border);
                    self.metawords[inner].can_use
                }
                None => Check::Ng,
            },
            CheckKind::Number => self.check_chain(id, from, border, |k| {
                matches!(k, MetaWordKind::Number(..))
            }),
            CheckKind::Compound => self.check_chain(id, from, border, |k| {
                matches!(k, MetaWordKind::CompoundHead(..) | MetaWordKind::Compound(..))
            }),
            CheckKind::Ochaire => {
                let result = self.border_check(id, from, border);
                let mut next = kind.first();
                while let Some(n) = next {
                    self.metawords[n].can_use = result;
                    next = self.metawords[n].kind.first();
                }
                result
            }
            CheckKind::None => return,
        };
        self.metawords[id].can_use = result;
    }

    /// Every left child along a `rest` chain must pass the border check.
    fn check_chain(
        &self,
        id: MwId,
        from: usize,
        border: usize,
        in_chain: fn(&MetaWordKind) -> bool,
    ) -> Check {
        let mut itr = Some(id);
        while let Some(cur) = itr {
            let kind = &self.metawords[cur].kind;
            if !in_chain(kind) {
                break;
            }
            if let Some(first) = kind.first() {
                if self.border_check(first, from, border) == Check::Ng {
                    return Check::Ng;
                }
            }
            itr = kind.rest();
        }
        Check::Ok
    }

    /// Re-check every meta-word starting in `[from, to)`.
    fn check_all(&mut self, from: usize, from2: usize, to: usize) {
        for i in from..to {
            for &id in &self.mw_at[i] {
                self.metawords[id].can_use = Check::Unchecked;
            }
        }
        for i in from..to {
            for id in self.mw_at[i].clone() {
                self.check_metaword(id, from, from2);
            }
        }
    }

    pub(super) fn eval_border(
        &mut self,
        res: &Resources,
        state: &mut BorderState,
        from: usize,
        from2: usize,
        to: usize,
    ) {
        self.check_all(from, from2, to);
        let usable = self.mw_at[from]
            .iter()
            .any(|&id| self.metawords[id].can_use == Check::Ok);
        let start = if usable { from } else { from2 };
        let mut lattice = Lattice::new(self, res, start, to);
        lattice.build();
        lattice.choose_path(state);
    }
}
