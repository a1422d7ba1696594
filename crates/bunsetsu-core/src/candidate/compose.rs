use tracing::debug;

use super::{flag, Candidate, Element, Segment};
use crate::resources::Resources;
use crate::settings::settings;
use crate::splitter::{MwId, MwStatus, SplitterContext, WordList};
use crate::wtype::{ct, pos};
use crate::xchar::{char_type, hira_to_kata, to_chars, to_string, xct, xstr_hash_str};

/// Index of the independent word among a word list's parts.
const PART_CORE: usize = 1;

struct Composer<'a> {
    ctx: &'a SplitterContext,
    res: &'a Resources,
    seg: &'a Segment,
    chars: Vec<char>,
    out: Vec<Candidate>,
}

/// Fill `seg.cands` from the meta-words spanning the segment, then add the
/// single-word, raw kana and guessed katakana candidates.
///
/// Candidates come out unscored and possibly duplicated; `sort_candidate`
/// settles both.
pub fn make_candidates(ctx: &SplitterContext, res: &Resources, seg: &mut Segment) {
    let chars = to_chars(&seg.reading);
    let mut c = Composer {
        ctx,
        res,
        seg,
        chars,
        out: Vec::new(),
    };

    let cap = settings().ordering.candidate_score_cap;
    let limit = seg
        .mw_array
        .first()
        .map_or(0, |&id| (ctx.metaword(id).score as i64).min(cap) / 3);

    if let Some(best) = seg.best_mw {
        c.from_metaword(best, best);
    }
    for &mw in &seg.mw_array {
        if ctx.metaword(mw).score as i64 > limit && Some(mw) != seg.best_mw {
            c.from_metaword(mw, mw);
        }
    }
    c.push_singleword();
    c.push_noconv();
    c.push_guessed();

    debug!(
        from = seg.from,
        len = seg.len,
        metawords = seg.mw_array.len(),
        candidates = c.out.len(),
        "made candidates"
    );
    let cands = c.out;
    seg.cands = cands;
}

impl Composer<'_> {
    fn best_flag(&self, mw: MwId) -> u32 {
        if self.seg.best_mw == Some(mw) {
            flag::BEST
        } else {
            flag::NONE
        }
    }

    fn from_metaword(&mut self, mw: MwId, top: MwId) {
        let ctx = self.ctx;
        let m = ctx.metaword(mw);
        if let Some(wl) = m.wl() {
            let mut cand = Candidate::plain(String::new(), self.best_flag(mw));
            cand.mw = Some(top);
            self.push_word_list(&mut cand, ctx.word_list(wl));
            self.enumerate(&mut cand, 0, 0);
            return;
        }
        match m.kind.status() {
            MwStatus::Wrapped => {
                if let Some(inner) = m.kind.first() {
                    self.from_metaword(inner, top);
                }
            }
            MwStatus::Combined => self.from_combined(mw, top),
            MwStatus::Compound => {
                if let Some(hint) = m.kind.hint() {
                    let mut cand = Candidate::plain(hint.to_string(), flag::COMPOUND);
                    cand.mw = Some(top);
                    self.out.push(cand);
                }
            }
            MwStatus::CompoundPart | MwStatus::Ochaire => {
                let Some(hint) = m.kind.hint() else {
                    return;
                };
                let bits = if m.kind.status() == MwStatus::Ochaire {
                    flag::OCHAIRE
                } else {
                    flag::COMPOUND_PART
                };
                let mut surface = hint.to_string();
                if m.len < self.seg.len {
                    surface.push_str(&to_string(&self.chars[m.len..]));
                }
                let mut cand = Candidate::plain(surface, bits);
                cand.mw = Some(top);
                self.out.push(cand);
            }
            MwStatus::None => {}
        }
    }

    /// Two word lists rendered as one candidate: the left child and the
    /// first word of the rest of the chain.
    fn from_combined(&mut self, mw: MwId, top: MwId) {
        let ctx = self.ctx;
        let m = ctx.metaword(mw);
        let mut cand = Candidate::plain(String::new(), self.best_flag(mw));
        cand.mw = Some(top);
        cand.score = m.score as i64;

        let left = m.kind.first().and_then(|id| ctx.metaword(id).wl());
        let right = m
            .kind
            .rest()
            .and_then(|id| ctx.metaword(id).kind.first())
            .and_then(|id| ctx.metaword(id).wl());
        for wl in [left, right].into_iter().flatten() {
            self.push_word_list(&mut cand, ctx.word_list(wl));
        }
        self.enumerate(&mut cand, 0, 0);
    }

    /// Append one element per non-empty part of `wl`.
    fn push_word_list(&self, cand: &mut Candidate, wl: &WordList) {
        let mut at = wl.from;
        for (k, part) in wl.parts().iter().enumerate() {
            if part.len == 0 {
                continue;
            }
            if k == PART_CORE {
                cand.core_elm_index = Some(cand.elements.len());
            }
            cand.elements.push(Element {
                reading: self.ctx.reading(at, part.len),
                wt: part.wt,
                nth: None,
                surface: String::new(),
                freq: 0,
                id: None,
            });
            at += part.len;
        }
    }

    /// Assign dictionary words to elements `n..` in every combination the
    /// slot types allow. Untyped or unknown readings stay as kana. Whatever
    /// the elements leave uncovered is appended as-is.
    fn enumerate(&mut self, cand: &mut Candidate, n: usize, covered: usize) {
        if n == cand.elements.len() {
            let mut done = cand.clone();
            done.surface
                .push_str(&to_string(&self.chars[covered.min(self.chars.len())..]));
            self.out.push(done);
            return;
        }

        let reading = cand.elements[n].reading.clone();
        let len = cand.elements[n].len();
        let slot = cand.elements[n].wt;
        let res = self.res;
        let entry = if matches!(slot.pos, pos::INVAL | pos::NONE) {
            None
        } else {
            res.words
                .lookup(&reading, self.ctx.is_reverse())
                .filter(|e| e.has_words())
        };
        let base = cand.surface.len();

        let Some(entry) = entry else {
            let e = &mut cand.elements[n];
            e.nth = None;
            e.id = None;
            e.surface = reading.clone();
            cand.surface.push_str(&reading);
            self.enumerate(cand, n + 1, covered + len);
            cand.surface.truncate(base);
            return;
        };

        let want = slot.with_ct(ct::NONE);
        for (i, word) in entry.words.iter().enumerate() {
            if !want.include(word.wt) {
                continue;
            }
            let e = &mut cand.elements[n];
            e.nth = Some(i);
            e.surface = word.surface.clone();
            e.freq = word.freq;
            e.id = Some(xstr_hash_str(&word.surface));
            cand.surface.push_str(&word.surface);
            self.enumerate(cand, n + 1, covered + len);
            cand.surface.truncate(base);
        }
    }

    /// Dictionary words spelled by the whole segment, in plain form.
    fn push_singleword(&mut self) {
        let res = self.res;
        let Some(entry) = res.words.lookup(&self.seg.reading, self.ctx.is_reverse()) else {
            return;
        };
        for word in &entry.words {
            if matches!(word.wt.ct, ct::SYUSI | ct::NONE) {
                self.out
                    .push(Candidate::plain(word.surface.clone(), flag::SINGLEWORD));
            }
        }
    }

    fn push_noconv(&mut self) {
        self.out
            .push(Candidate::plain(self.seg.reading.clone(), flag::HIRAGANA));
        self.out.push(Candidate::plain(
            to_string(&hira_to_kata(&self.chars)),
            flag::KATAKANA,
        ));
    }

    /// Katakana for everything but a trailing particle character.
    fn push_guessed(&mut self) {
        let n = self.chars.len();
        if n < 2 {
            return;
        }
        let last = self.chars[n - 1];
        if char_type(last) & xct::DEP == 0 {
            return;
        }
        let mut kata = hira_to_kata(&self.chars[..n - 1]);
        kata.push(last);
        self.out.push(Candidate::plain(to_string(&kata), flag::GUESS));
    }
}
