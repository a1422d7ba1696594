use std::sync::Arc;

use bunsetsu_core::depgraph::GraphBuilder;
use bunsetsu_core::dict::MemoryWordDictionary;
use bunsetsu_core::learning::LearningStore;
use bunsetsu_core::splitter::SplitterContext;
use bunsetsu_core::xchar::to_chars;
use bunsetsu_core::{Resources, Segmenter};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const GRAMMAR: &str = r#"
名詞 @名詞
名詞35 @名詞
数詞1 @数詞
数詞10 @数詞
動詞 @動詞

@名詞 Sr@
@名詞 "が" Sk@
@名詞 "を" Sk@
@名詞 "に" Sk@
@名詞 "は" Sy@
@名詞 "の" St@
@数詞 Sr@
@動詞 Cy@
@動詞 "る" Se@
"#;

const WORDS: &str = "\
かんじ #T35*500 漢字 #T35*200 感じ
かん #T35*300 缶
じ #T35*50 字
わたし #T35*800 私
がっこう #T35*600 学校
きょう #T35*700 今日
てんき #T35*600 天気
いい #T35*300 良い
じゅう #N10*100 十
さん #N1*100 三
たべ #KS*300 食べ
";

fn bench_resources() -> Arc<Resources> {
    let mut graph = GraphBuilder::new();
    graph.add_text(GRAMMAR, "bench").unwrap();
    let words = MemoryWordDictionary::from_text(WORDS).unwrap();
    Arc::new(Resources::new(Box::new(words), graph.build()))
}

const INPUTS: &[(&str, &str)] = &[
    ("short", "かんじ"),
    ("two_words", "わたしかんじ"),
    ("particles", "きょうはてんきがいい"),
    ("numeral", "じゅうさんがっこう"),
    ("long", "わたしはがっこうでかんじをたべるきょうはてんきがいい"),
];

fn bench_mark_border(c: &mut Criterion) {
    let res = bench_resources();
    let store = LearningStore::new();
    let mut group = c.benchmark_group("mark_border");
    for &(name, reading) in INPUTS {
        let chars = to_chars(reading);
        group.bench_with_input(BenchmarkId::new("search", name), &chars, |b, chars| {
            b.iter(|| {
                let mut ctx = SplitterContext::new(&res, &store, chars, false);
                let n = ctx.len();
                ctx.mark_border(&res, 0, 0, n);
                ctx.segment_bounds()
            });
        });
    }
    group.finish();
}

fn bench_set_string(c: &mut Criterion) {
    let res = bench_resources();
    let mut group = c.benchmark_group("set_string");
    for &(name, reading) in INPUTS {
        group.bench_with_input(BenchmarkId::new("convert", name), reading, |b, reading| {
            let mut seg = Segmenter::new(Arc::clone(&res));
            b.iter(|| {
                seg.set_string(reading);
                seg.converted()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mark_border, bench_set_string);
criterion_main!(benches);
