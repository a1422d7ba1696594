use super::sample_graph;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn test_full_condition_list_must_match() {
    let g = sample_graph();
    let noun = g.node_id("@名詞").unwrap();
    let input = chars("かんじでは");

    let hits = g.match_branches(noun, &input, 3);
    let mut lens: Vec<usize> = hits.iter().map(|(_, len)| *len).collect();
    lens.sort_unstable();
    // "で" alone and "で","は" in sequence
    assert_eq!(lens, vec![1, 2]);

    let input = chars("かんじでも");
    let hits = g.match_branches(noun, &input, 3);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].1, 1);
}

#[test]
fn test_no_match_past_end() {
    let g = sample_graph();
    let noun = g.node_id("@名詞").unwrap();
    let input = chars("かんじ");
    assert!(g.match_branches(noun, &input, 3).is_empty());
    assert!(g.match_branches(noun, &input, 10).is_empty());
}

#[test]
fn test_empty_condition_matches_without_consuming() {
    let g = sample_graph();
    let renyou = g.node_id("@連用").unwrap();
    let input = chars("かき");
    let hits = g.match_branches(renyou, &input, 2);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].1, 0);
}

#[test]
fn test_unknown_node_matches_nothing() {
    let g = sample_graph();
    assert!(g.match_branches(999, &chars("が"), 0).is_empty());
}
