use super::{sample_graph, SAMPLE};
use crate::depgraph::{GraphBuilder, GraphError, RuleLine, RATIO_BASE};
use crate::segclass::DepClass;
use crate::wtype::{ct, named, pos};

fn line(tokens: &[&str]) -> RuleLine {
    RuleLine {
        origin: "t".into(),
        line: 1,
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn test_terminal_is_node_zero() {
    let b = GraphBuilder::new();
    let g = b.build();
    assert_eq!(g.node_id("@"), Some(0));
    assert_eq!(g.nodes().len(), 1);
}

#[test]
fn test_nodes_deduplicated_by_name() {
    let mut b = GraphBuilder::new();
    let a = b.find_or_create_node("@a");
    let c = b.find_or_create_node("@c");
    assert_eq!(b.find_or_create_node("@a"), a);
    assert_ne!(a, c);
    assert_eq!(a, 1);
}

#[test]
fn test_branches_deduplicated_by_condition_list() {
    let mut b = GraphBuilder::new();
    let n = b.find_or_create_node("@n");
    let x = b.find_or_create_branch(n, &["で", "は"]);
    let y = b.find_or_create_branch(n, &["で"]);
    assert_eq!(b.find_or_create_branch(n, &["で", "は"]), x);
    assert_ne!(x, y);
    // same strings in another order are a different branch
    assert_ne!(b.find_or_create_branch(n, &["は", "で"]), x);
}

#[test]
fn test_sample_structure() {
    let g = sample_graph();
    assert_eq!(g.rules().len(), 3);
    let noun = g.node_id("@名詞").unwrap();
    assert_eq!(g.rules()[0].node, noun);
    assert_eq!(g.rules()[0].ratio, RATIO_BASE);
    assert_eq!(g.rules()[1].ratio, 200);
    assert!(g.rules()[1].wt.include(named::V_RENYOU));

    // "で" appears on two lines but they are separate condition lists
    assert_eq!(g.node(noun).unwrap().branches.len(), 4);
    let de = &g.node(noun).unwrap().branches[3];
    assert_eq!(de.transitions.len(), 2);
    assert_eq!(de.transitions[0].dc, DepClass::Renyou);
    assert!(de.transitions[0].is_terminal());
    assert!(de.transitions[1].weak);
    assert_eq!(de.transitions[1].next, noun);
    assert_eq!(de.transitions[1].ratio, RATIO_BASE / 2);
}

#[test]
fn test_transition_attributes() {
    let mut b = GraphBuilder::new();
    let l = line(&["@x"]);
    let t = b.parse_transition(".CyHvSk@next", &l).unwrap();
    assert!(t.weak);
    assert_eq!(t.ratio, RATIO_BASE / 8);
    assert_eq!(t.ct, ct::RENYOU);
    assert_eq!(t.head_pos, pos::V);
    assert_eq!(t.dc, DepClass::Kakujoshi);
    assert_eq!(t.next, b.find_or_create_node("@next"));

    let plain = b.parse_transition("@", &l).unwrap();
    assert!(plain.is_terminal());
    assert!(!plain.weak);
    assert_eq!(plain.ratio, RATIO_BASE);

    // unknown attributes are skipped with a warning
    let odd = b.parse_transition("QSe@", &l).unwrap();
    assert_eq!(odd.dc, DepClass::End);

    assert!(matches!(
        b.parse_transition("Sk", &l),
        Err(GraphError::MalformedTransition { .. })
    ));
}

#[test]
fn test_empty_condition_fallback() {
    let g = sample_graph();
    let renyou = g.node_id("@連用").unwrap();
    let branches = &g.node(renyou).unwrap().branches;
    let empty = branches.iter().find(|b| b.conds.len() == 1 && b.conds[0].is_empty());
    assert!(empty.is_some());
}

#[test]
fn test_rule_errors() {
    let mut b = GraphBuilder::new();
    assert!(matches!(
        b.add_rule_line(&line(&["存在しない品詞", "@n"])),
        Err(GraphError::UnknownWordType { .. })
    ));
    assert!(matches!(
        b.add_rule_line(&line(&["名詞", "x", "@n"])),
        Err(GraphError::MalformedRule { .. })
    ));
    assert!(matches!(
        b.add_rule_line(&line(&["名詞", "n"])),
        Err(GraphError::MalformedRule { .. })
    ));
}

#[test]
fn test_check_nodes_reports_empty() {
    let mut b = GraphBuilder::new();
    b.add_text("@a \"x\" @b\n", "t").unwrap();
    assert_eq!(b.check_nodes(), vec!["@b"]);
}

#[test]
fn test_split_rule_files() {
    let dir = tempfile::tempdir().unwrap();
    let (indep, dep): (Vec<&str>, Vec<&str>) = SAMPLE
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with("# "))
        .partition(|l| !l.starts_with('@'));
    std::fs::write(dir.path().join("indep.txt"), indep.join("\n")).unwrap();
    std::fs::write(dir.path().join("dep.txt"), dep.join("\n")).unwrap();

    let mut b = GraphBuilder::new();
    b.add_file(&dir.path().join("dep.txt"))
        .unwrap()
        .add_file(&dir.path().join("indep.txt"))
        .unwrap();
    let g = b.build();
    let whole = sample_graph();
    assert_eq!(g.rules().len(), whole.rules().len());
    assert_eq!(g.branch_count(), whole.branch_count());
    assert_eq!(g.transition_count(), whole.transition_count());
}
