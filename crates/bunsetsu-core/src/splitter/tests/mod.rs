mod border;

use super::*;
use crate::learning::LearningStore;
use crate::testutil::stock_resources;
use crate::xchar::to_chars;

fn context(reading: &str) -> SplitterContext {
    context_with(&LearningStore::new(), reading)
}

fn context_with(store: &LearningStore, reading: &str) -> SplitterContext {
    let res = stock_resources();
    SplitterContext::new(&res, store, &to_chars(reading), false)
}

/// Meta-words starting at `from`.
fn at(ctx: &SplitterContext, from: usize) -> Vec<&MetaWord> {
    ctx.metawords_at(from)
        .iter()
        .map(|&id| ctx.metaword(id))
        .collect()
}
