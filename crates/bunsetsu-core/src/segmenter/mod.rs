//! Conversion session over shared resources.
//!
//! `Segmenter` owns one splitter context at a time: `set_string` searches
//! the whole reading, `resize_segment` moves one boundary and searches the
//! rest again, and `commit` turns the chosen candidates into learning.


use std::path::Path;
use std::sync::Arc;

use tracing::{debug, debug_span, info};

use crate::candidate::{make_candidates, Segment};
use crate::error::EngineError;
use crate::learning::{open_with_wal, LearningOp, LearningStore, LearningWal};
use crate::ordering::{proc_commit, sort_candidate, sort_metaword};
use crate::resources::Resources;
use crate::splitter::SplitterContext;
use crate::xchar::to_chars;

pub struct Segmenter {
    res: Arc<Resources>,
    store: LearningStore,
    wal: Option<LearningWal>,
    ctx: Option<SplitterContext>,
    segments: Vec<Segment>,
}

impl Segmenter {
    /// Session with an empty, in-memory learning store.
    pub fn new(res: Arc<Resources>) -> Self {
        Self::with_store(res, LearningStore::new())
    }

    pub fn with_store(res: Arc<Resources>, store: LearningStore) -> Self {
        Self {
            res,
            store,
            wal: None,
            ctx: None,
            segments: Vec::new(),
        }
    }

    /// Session whose learning is persisted at `path`, replaying any commit
    /// log left next to it.
    pub fn open_history(res: Arc<Resources>, path: &Path) -> Result<Self, EngineError> {
        let (store, wal) = open_with_wal(path)?;
        info!(path = %path.display(), pending = wal.entry_count(), "opened learning store");
        Ok(Self {
            wal: Some(wal),
            ..Self::with_store(res, store)
        })
    }

    pub fn resources(&self) -> &Resources {
        &self.res
    }

    pub fn store(&self) -> &LearningStore {
        &self.store
    }

    pub fn context(&self) -> Option<&SplitterContext> {
        self.ctx.as_ref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Result<&Segment, EngineError> {
        self.segments
            .get(index)
            .ok_or(EngineError::SegmentOutOfRange {
                index,
                count: self.segments.len(),
            })
    }

    /// Concatenated surfaces of the chosen (or first) candidates.
    pub fn converted(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| s.chosen())
            .map(|c| c.surface.as_str())
            .collect()
    }

    /// Search `reading` and rank the candidates of every segment.
    pub fn set_string(&mut self, reading: &str) {
        self.start(reading, false);
    }

    /// Like [`set_string`](Self::set_string) for already converted text:
    /// dictionary lookups go from surface to reading.
    pub fn set_reconversion_string(&mut self, text: &str) {
        self.start(text, true);
    }

    fn start(&mut self, reading: &str, reverse: bool) {
        let chars = to_chars(reading);
        let _span = debug_span!("set_string", len = chars.len(), reverse).entered();
        let mut ctx = SplitterContext::new(&self.res, &self.store, &chars, reverse);
        self.segments.clear();
        let n = ctx.len();
        self.rebuild(&mut ctx, 0, 0, n);
        ctx.record_initial_segments();
        self.ctx = Some(ctx);
        debug!(segments = self.segments.len(), "converted");
    }

    /// Search `[from, n)` with no boundary allowed inside `[from, from2)`,
    /// then replace every segment from `from` on.
    fn rebuild(&mut self, ctx: &mut SplitterContext, from: usize, from2: usize, n: usize) {
        ctx.mark_border(&self.res, from, from2, n);
        let first = self.segments.len();
        for (start, len) in ctx.segment_bounds() {
            if start >= from {
                self.segments.push(Segment::new(ctx, start, len));
            }
        }
        sort_metaword(ctx, &self.res, &mut self.segments);
        for seg in &mut self.segments[first..] {
            make_candidates(ctx, &self.res, seg);
        }
        sort_candidate(ctx, &self.res, &self.store, &mut self.segments, first);
    }

    /// Grow (`delta > 0`) or shrink segment `index` and search the rest of
    /// the reading again. Committed segments cannot be resized.
    pub fn resize_segment(&mut self, index: usize, delta: i32) -> Result<(), EngineError> {
        let (from, len) = self.segment(index).map(|s| (s.from, s.len))?;
        let n = self.ctx.as_ref().map_or(0, SplitterContext::len);
        let frozen = self.ctx.as_ref().map_or(0, SplitterContext::frozen_len);
        let new_len = len as i64 + delta as i64;
        if new_len < 1 || from as i64 + new_len > n as i64 || from < frozen {
            return Err(EngineError::InvalidResize { index, delta });
        }
        let Some(mut ctx) = self.ctx.take() else {
            return Err(EngineError::InvalidResize { index, delta });
        };
        let new_end = from + new_len as usize;
        let _span = debug_span!("resize_segment", index, delta).entered();

        self.segments.truncate(index);
        ctx.move_border(from, new_end);
        self.rebuild(&mut ctx, from, new_end, n);
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Pick candidate `cand` for segment `index`.
    pub fn select(&mut self, index: usize, cand: usize) -> Result<(), EngineError> {
        let count = self.segments.len();
        let seg = self
            .segments
            .get_mut(index)
            .ok_or(EngineError::SegmentOutOfRange { index, count })?;
        if cand >= seg.cands.len() {
            return Err(EngineError::CandidateOutOfRange {
                segment: index,
                index: cand,
                count: seg.cands.len(),
            });
        }
        seg.committed = Some(cand);
        Ok(())
    }

    /// Commit the current choices: segments nobody picked for commit with
    /// their first candidate. Returns what was learned. The segmentation
    /// stays fixed until the next `set_string`.
    pub fn commit(&mut self) -> Result<Vec<LearningOp>, EngineError> {
        let Some(ctx) = &mut self.ctx else {
            return Ok(Vec::new());
        };
        for seg in &mut self.segments {
            if seg.committed.is_none() && !seg.cands.is_empty() {
                seg.committed = Some(0);
            }
        }
        let ops = proc_commit(ctx, &self.store, &self.segments);
        self.store.apply_all(&ops);
        if let Some(wal) = &mut self.wal {
            wal.append(&ops)?;
            if wal.needs_compact() {
                wal.compact(&self.store)?;
            }
        }
        debug!(ops = ops.len(), "committed");
        Ok(ops)
    }

    /// Write the learning store and empty the commit log.
    pub fn flush(&mut self) -> Result<(), EngineError> {
        if let Some(wal) = &mut self.wal {
            wal.compact(&self.store)?;
        }
        Ok(())
    }
}
