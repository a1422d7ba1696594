//! Small grammar and dictionary shared by unit tests.

use crate::depgraph::{DepGraph, GraphBuilder};
use crate::dict::MemoryWordDictionary;
use crate::learning::LearningStore;
use crate::resources::Resources;
use crate::splitter::SplitterContext;
use crate::xchar::to_chars;

pub(crate) const STOCK_GRAMMAR: &str = r#"
名詞 @名詞
名詞35 @名詞
名詞40 @名詞
数詞1 @数詞
数詞10 @数詞
数詞10000 @数詞
動詞 @動詞
形容詞 @形容詞

@名詞 Sr@
@名詞 "が" Sk@
@名詞 "を" Sk@
@名詞 "に" Sk@
@名詞 "は" Sy@
@名詞 "の" St@
@数詞 Sr@
@動詞 Cy@
@動詞 "る" Se@
@形容詞 "い" Se@
"#;

pub(crate) const STOCK_WORDS: &str = "\
かんじ #T35*500 漢字 #T35*200 感じ
かん #T35*300 缶
じ #T35*50 字
わたし #T35*800 私
がっこう #T35*600 学校
あい #T35*100 愛
うえ #T35*200 上
とうきょうだいがく #CN*300 _5東京_4大学
じゅう #N10*100 十
さん #N1*100 三
まん #N10000*100 万
えん #NNSUC*100 円
だい #NNPRE*50 第
たべ #KS*300 食べ
かた #D2T40*200 方
やす #D2KY*100 易
";

pub(crate) fn stock_graph() -> DepGraph {
    let mut b = GraphBuilder::new();
    b.add_text(STOCK_GRAMMAR, "stock").unwrap();
    b.build()
}

/// Stock grammar and words with empty statistics tables.
pub(crate) fn stock_resources() -> Resources {
    let words = MemoryWordDictionary::from_text(STOCK_WORDS).unwrap();
    Resources::new(Box::new(words), stock_graph())
}

/// Stock resources plus personal names and a noun suffix.
pub(crate) fn name_resources() -> Resources {
    let text = format!("{STOCK_WORDS}やまだ #JNS*200 山田\nたろう #JNM*200 太郎\nよう #N2T*100 用\n");
    let words = MemoryWordDictionary::from_text(&text).unwrap();
    let mut b = GraphBuilder::new();
    b.add_text(STOCK_GRAMMAR, "stock").unwrap();
    b.add_text("名詞化接尾語 @名詞\n", "suffix").unwrap();
    Resources::new(Box::new(words), b.build())
}

/// Context for `reading` with the whole string searched once.
pub(crate) fn searched(res: &Resources, store: &LearningStore, reading: &str) -> SplitterContext {
    let chars = to_chars(reading);
    let mut ctx = SplitterContext::new(res, store, &chars, false);
    let n = ctx.len();
    ctx.mark_border(res, 0, 0, n);
    ctx.record_initial_segments();
    ctx
}
