use super::sample_graph;
use crate::codec::{ints_to_be_bytes, read_i32_at};
use crate::depgraph::{DepGraph, GraphError};

#[test]
fn test_round_trip_structure() {
    let g = sample_graph();
    let bytes = g.to_bytes().unwrap();
    let back = DepGraph::from_bytes(&bytes).unwrap();
    assert_eq!(back.rules(), g.rules());
    assert_eq!(back.nodes(), g.nodes());
    // re-encoding is byte identical
    assert_eq!(back.to_bytes().unwrap(), bytes);
}

#[test]
fn test_header_layout() {
    let g = sample_graph();
    let bytes = g.to_bytes().unwrap();
    assert_eq!(read_i32_at(&bytes, 0), Some(3));
    // first rule: 6 type bytes, 2 padding bytes, ratio, node
    assert_eq!(&bytes[4..10], &g.rules()[0].wt.to_bytes());
    assert_eq!(&bytes[10..12], &[0, 0]);
    assert_eq!(read_i32_at(&bytes, 3), Some(256));
    assert_eq!(read_i32_at(&bytes, 4), Some(g.rules()[0].node as i32));
}

#[test]
fn test_trailing_padding_ignored() {
    let g = sample_graph();
    let mut bytes = g.to_bytes().unwrap();
    bytes.extend_from_slice(&[0; 7]);
    let back = DepGraph::from_bytes(&bytes).unwrap();
    assert_eq!(back.nodes(), g.nodes());
}

#[test]
fn test_truncated_and_dangling() {
    let bytes = sample_graph().to_bytes().unwrap();
    assert!(matches!(
        DepGraph::from_bytes(&bytes[..bytes.len() - 2]),
        Err(GraphError::Codec(_))
    ));

    // one rule pointing at node 5, one empty node
    let mut bad = ints_to_be_bytes(&[1]);
    bad.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]);
    bad.extend_from_slice(&ints_to_be_bytes(&[256, 5, 1, 0]));
    assert!(matches!(
        DepGraph::from_bytes(&bad),
        Err(GraphError::Decode(_))
    ));
}

#[test]
fn test_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dep.bin");
    let g = sample_graph();
    g.save(&path).unwrap();
    assert_eq!(DepGraph::open(&path).unwrap().nodes(), g.nodes());
}
