mod builder;
mod codec;
mod matching;

use super::{DepGraph, GraphBuilder};

pub(super) const SAMPLE: &str = r#"
# independent words
名詞 @名詞
動詞連用形 200 @連用
形容詞 @形容詞

# dependent words
@名詞 "が" @ Sk@
@名詞 "の" St@
@名詞 "で" "は" Sy@
@名詞 "で" Sy@ :@名詞
@連用 "ま" "す" Se@
@連用 Sr@
@形容詞 "い" Se@
"#;

pub(super) fn sample_graph() -> DepGraph {
    let mut b = GraphBuilder::new();
    b.add_text(SAMPLE, "sample").unwrap();
    b.build()
}
