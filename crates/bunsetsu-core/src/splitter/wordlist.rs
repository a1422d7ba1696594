//! Word lists: an independent word with its optional prefix and suffix and
//! the attached-word chain the grammar graph accepts after it.

use tracing::{debug, debug_span, warn};

use crate::depgraph::{Branch, RATIO_BASE};
use crate::dict::SeqEntry;
use crate::feature::mw_feature;
use crate::resources::Resources;
use crate::segclass::{DepClass, SegClass};
use crate::settings::settings;
use crate::wtype::{ct, named, pos, scos, WType};
use crate::xchar::{to_string, xct, xstr_hash};

/// Index into the context's word-list arena.
pub type WlId = usize;

/// Grammar walks nested deeper than this are abandoned.
const MAX_WALK_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPart {
    pub from: usize,
    pub len: usize,
    pub wt: WType,
    pub freq: i32,
}

impl WordPart {
    fn at(from: usize) -> Self {
        Self {
            from,
            len: 0,
            wt: WType::NONE,
            freq: 1,
        }
    }

    pub fn end(&self) -> usize {
        self.from + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordList {
    pub from: usize,
    pub len: usize,
    pub is_compound: bool,
    /// Characters matched through weak connections.
    pub weak_len: usize,
    pub score: i32,
    pub seg_class: SegClass,
    pub head_pos: u8,
    pub tail_ct: u8,
    pub dep_class: DepClass,
    pub dep_word_hash: i32,
    /// `mw_feature` bits.
    pub features: u32,
    /// Grammar node the attached-word walk started from.
    pub node: Option<usize>,
    pub rule_ratio: i32,
    pub dep_ratio: i32,
    pub prefix: WordPart,
    pub core: WordPart,
    pub postfix: WordPart,
    pub dep: WordPart,
}

impl WordList {
    fn setup(from: usize, len: usize, is_compound: bool, is_weak: bool) -> Self {
        let end = from + len;
        Self {
            from,
            len,
            is_compound,
            weak_len: 0,
            score: 0,
            seg_class: SegClass::Head,
            head_pos: pos::NONE,
            tail_ct: ct::NONE,
            dep_class: DepClass::None,
            dep_word_hash: 0,
            features: if is_weak { mw_feature::WEAK_SEQ } else { 0 },
            node: None,
            rule_ratio: RATIO_BASE,
            dep_ratio: RATIO_BASE,
            prefix: WordPart::at(from),
            core: WordPart {
                len,
                ..WordPart::at(from)
            },
            postfix: WordPart::at(end),
            dep: WordPart::at(end),
        }
    }

    pub fn end(&self) -> usize {
        self.from + self.len
    }

    /// Parts in reading order: prefix, core, postfix, attached words.
    pub fn parts(&self) -> [WordPart; 4] {
        [self.prefix, self.core, self.postfix, self.dep]
    }

    fn push_front(&mut self, len: usize, wt: WType) {
        self.from -= len;
        self.len += len;
        self.prefix.from = self.from;
        self.prefix.len += len;
        self.prefix.wt = wt;
    }

    fn push_back(&mut self, len: usize, wt: WType) {
        self.len += len;
        self.postfix.len += len;
        self.postfix.wt = wt;
    }

    fn same_shape(&self, other: &WordList) -> bool {
        self.node == other.node
            && self.from == other.from
            && self.len == other.len
            && self.features == other.features
            && self.tail_ct == other.tail_ct
            && self.core.len == other.core.len
            && self.is_compound == other.is_compound
            && self.core.wt == other.core.wt
            && self.head_pos == other.head_pos
            && self.dep_class == other.dep_class
    }

    /// `(1 + freq) * (1 + indep_len)^2` scaled by both grammar ratios.
    fn compute_score(&self) -> i32 {
        let indep = 1 + self.prefix.len + self.core.len + self.postfix.len;
        let s = (1 + self.core.freq as i64) * (indep * indep) as i64 * self.rule_ratio as i64
            / RATIO_BASE as i64
            * self.dep_ratio as i64
            / RATIO_BASE as i64;
        s.clamp(1, i32::MAX as i64) as i32
    }
}

/// Every word list of a string, indexed by start position.
#[derive(Debug, Default)]
pub struct WordLists {
    pub lists: Vec<WordList>,
    pub by_from: Vec<Vec<WlId>>,
}

struct Builder<'a> {
    res: &'a Resources,
    chars: &'a [char],
    types: &'a [u32],
    reverse: bool,
    /// Longest suffix reading starting at each position.
    seq_len: Vec<usize>,
    /// Longest prefix reading ending at each position.
    rev_seq_len: Vec<usize>,
    out: WordLists,
}

/// One dictionary hit, replayed after every position has been scanned.
struct Hit<'a> {
    seq: &'a SeqEntry,
    from: usize,
    len: usize,
    is_compound: bool,
    is_weak: bool,
}

pub fn make_word_list_all(
    res: &Resources,
    chars: &[char],
    types: &[u32],
    reverse: bool,
) -> WordLists {
    let n = chars.len();
    let _span = debug_span!("make_word_list_all", len = n).entered();
    let max = settings().splitter.max_word_len;

    let mut b = Builder {
        res,
        chars,
        types,
        reverse,
        seq_len: vec![0; n + 1],
        rev_seq_len: vec![0; n + 1],
        out: WordLists {
            lists: Vec::new(),
            by_from: vec![Vec::new(); n + 1],
        },
    };

    let mut hits = Vec::new();
    for i in 0..n {
        for j in (1..=max.min(n - i)).rev() {
            let Some(seq) = b.seq(i, j) else {
                continue;
            };
            if seq.has_suffix() {
                b.seq_len[i] = b.seq_len[i].max(j);
            }
            if seq.has_prefix() {
                b.rev_seq_len[i + j] = b.rev_seq_len[i + j].max(j);
            }
            if seq.is_indep() && seq.has_words() {
                let is_weak = res.weak_words.contains(xstr_hash(&chars[i..i + j]));
                hits.push(Hit {
                    seq,
                    from: i,
                    len: j,
                    is_compound: false,
                    is_weak,
                });
            }
            if seq.has_compounds() {
                hits.push(Hit {
                    seq,
                    from: i,
                    len: j,
                    is_compound: true,
                    is_weak: false,
                });
            }
        }
    }

    // Prefix and suffix lengths are only complete once the scan is done.
    for hit in hits.iter().rev() {
        b.make_word_list(hit);
    }

    for i in 0..n {
        let after_close = i > 0
            && types[i - 1] & (xct::CLOSE | xct::SYMBOL) != 0
            && types[i - 1] & xct::PUNCTUATION == 0;
        if i == 0 || after_close {
            b.following(&WordList::setup(i, 0, false, false));
        }
    }

    debug!(hits = hits.len(), word_lists = b.out.lists.len());
    b.out
}

impl<'a> Builder<'a> {
    fn seq(&self, from: usize, len: usize) -> Option<&'a SeqEntry> {
        let res: &'a Resources = self.res;
        res.words
            .lookup(&to_string(&self.chars[from..from + len]), self.reverse)
    }

    fn make_word_list(&mut self, hit: &Hit<'a>) {
        let res = self.res;
        let mut tmpl = WordList::setup(hit.from, hit.len, hit.is_compound, hit.is_weak);
        for rule in res.graph.rules() {
            let freq = if hit.is_compound {
                hit.seq.compound_freq(rule.wt)
            } else {
                hit.seq.wtype_freq(rule.wt)
            };
            if freq == 0 {
                continue;
            }
            tmpl.core.wt = rule.wt;
            tmpl.core.freq = freq;
            tmpl.node = Some(rule.node);
            tmpl.rule_ratio = rule.ratio;
            tmpl.head_pos = rule.wt.pos;
            tmpl.postfix.from = tmpl.core.end();

            if matches!(rule.wt.pos, pos::NOUN | pos::NUMBER) {
                self.pre_words(&tmpl);
                self.suc_words(&tmpl);
            }
            self.following(&tmpl);
        }
    }

    /// Numeral prefixes such as 第.
    fn pre_words(&mut self, tmpl: &WordList) {
        if !named::NUM_NOUN.include(tmpl.core.wt) {
            return;
        }
        let at = tmpl.core.from;
        for i in 1..=self.rev_seq_len[at] {
            let Some(pre) = self.seq(at - i, i) else {
                continue;
            };
            if !pre.has_prefix() || pre.wtype_freq(named::NUM_PREFIX) == 0 {
                continue;
            }
            let mut wl = *tmpl;
            wl.push_front(i, named::NUM_PREFIX);
            self.following(&wl);
            self.suc_words(&wl);
        }
    }

    fn suc_words(&mut self, tmpl: &WordList) {
        let wt = tmpl.core.wt;
        let kinds = [
            (named::NUM_NOUN.include(wt), named::NUM_POSTFIX),
            (named::NAME_NOUN.include(wt), named::NAME_POSTFIX),
            (wt.is_sv(), named::SV_POSTFIX),
        ];
        let right = tmpl.core.end();
        for i in 1..=self.seq_len[right] {
            let Some(suc) = self.seq(right, i) else {
                continue;
            };
            if !suc.has_suffix() {
                continue;
            }
            for &(applies, postfix) in &kinds {
                if applies && suc.wtype_freq(postfix) > 0 {
                    let mut wl = *tmpl;
                    wl.push_back(i, postfix);
                    self.following(&wl);
                }
            }
        }
    }

    fn following(&mut self, tmpl: &WordList) {
        let res = self.res;
        let mut wl = *tmpl;
        wl.dep.from = wl.postfix.end();
        let rest = wl.end();
        match wl.node {
            Some(node) => self.scan(&wl, rest, node, 0),
            None => {
                // Attached words with no independent word in front.
                for rule in res.graph.rules() {
                    if rule.wt.pos != pos::NOUN || rule.wt.scos != scos::T35 {
                        continue;
                    }
                    let mut nwl = wl;
                    nwl.core.wt = rule.wt;
                    nwl.node = Some(rule.node);
                    nwl.rule_ratio = rule.ratio;
                    nwl.head_pos = rule.wt.pos;
                    self.scan(&nwl, rest, rule.node, 0);
                }
            }
        }
    }

    fn scan(&mut self, wl: &WordList, at: usize, node: usize, depth: usize) {
        if depth > MAX_WALK_DEPTH {
            warn!(node, at, "attached-word walk too deep");
            return;
        }
        let res = self.res;
        for (branch, len) in res.graph.match_branches(node, self.chars, at) {
            let mut next = *wl;
            next.dep.len += len;
            self.walk_branch(&mut next, at + len, len, branch, depth);
        }
    }

    fn walk_branch(
        &mut self,
        wl: &mut WordList,
        rest: usize,
        cond_len: usize,
        branch: &'a Branch,
        depth: usize,
    ) {
        let n = self.chars.len();
        for tr in &branch.transitions {
            let saved = (wl.dep_ratio, wl.weak_len, wl.head_pos, wl.dep_class);

            wl.dep_ratio = (wl.dep_ratio as i64 * tr.ratio as i64 / RATIO_BASE as i64) as i32;
            if tr.weak || (tr.dc == DepClass::End && rest < n) {
                wl.weak_len += cond_len;
            } else {
                let bonus = (cond_len * cond_len * cond_len * 3) as i64;
                wl.dep_ratio = (wl.dep_ratio as i64 + bonus).min(i32::MAX as i64) as i32;
            }
            wl.tail_ct = tr.ct;
            if tr.dc != DepClass::None {
                wl.dep_class = tr.dc;
            }
            if tr.head_pos != pos::NONE {
                wl.head_pos = tr.head_pos;
            }

            if tr.is_terminal() {
                let mut done = *wl;
                done.len += done.dep.len;
                if done.dep.len == 1 && rest > 0 && self.types[rest - 1] & xct::STRONG != 0 {
                    let s = &settings().splitter;
                    done.dep_ratio = (done.dep_ratio as i64 * s.dep_strong_bonus_num
                        / s.dep_strong_bonus_den) as i32;
                }
                self.commit(done);
            } else {
                self.scan(wl, rest, tr.next, depth + 1);
            }

            (wl.dep_ratio, wl.weak_len, wl.head_pos, wl.dep_class) = saved;
        }
    }

    fn commit(&mut self, mut wl: WordList) {
        if wl.len == 0 {
            return;
        }
        let s = &settings().splitter;
        if wl.core.wt.pos == pos::NOUN && wl.core.wt.is_sv() {
            wl.features |= mw_feature::SV;
        }
        if wl.postfix.len > 0 || wl.prefix.len > 0 {
            wl.features |= mw_feature::SUFFIX;
        }
        if wl.core.wt.pos == pos::NUMBER {
            wl.features |= mw_feature::NUM;
        }
        if wl.core.len == 1 {
            wl.features |= mw_feature::CORE1;
        }
        if wl.core.len == 0 {
            wl.features |= mw_feature::DEP_ONLY;
        }
        if wl.core.freq as i64 > s.high_freq_threshold {
            wl.features |= mw_feature::HIGH_FREQ;
        }
        wl.seg_class = SegClass::classify(wl.core.len > 0, wl.head_pos, wl.dep_class);
        wl.dep_word_hash = xstr_hash(&self.chars[wl.dep.from..wl.dep.end()]);

        let dup = self.out.by_from[wl.from]
            .iter()
            .any(|&id| self.out.lists[id].same_shape(&wl));
        if dup {
            return;
        }
        wl.score = wl.compute_score();
        let id = self.out.lists.len();
        self.out.lists.push(wl);
        self.out.by_from[wl.from].push(id);
    }
}
