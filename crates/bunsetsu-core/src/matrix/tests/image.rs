use proptest::prelude::*;

use crate::matrix::{MatrixError, MatrixImage, ProbeLimits, SparseMatrix};

fn limits() -> ProbeLimits {
    ProbeLimits {
        max_failure: 50,
        max_growth_rounds: 64,
    }
}

fn build(cells: &[(i32, i32, i32)]) -> MatrixImage {
    let mut m: SparseMatrix = SparseMatrix::new();
    for &(r, c, v) in cells {
        m.set(r, c, v, None);
    }
    m.make_matrix(limits()).unwrap();
    MatrixImage::from_ints(m.image().unwrap()).with_limits(limits())
}

#[test]
fn test_zero_matrix() {
    let image = build(&[]);
    assert_eq!(image.peek(0, 0), 0);
    assert_eq!(image.peek(5, 7), 0);
    assert_eq!(image.row_slots(), 0);
}

#[test]
fn test_dense_100_by_100() {
    let cells: Vec<(i32, i32, i32)> = (0..100)
        .flat_map(|r| (0..100).map(move |c| (r, c, r + c)))
        .collect();
    let image = build(&cells);
    for r in 0..100 {
        for c in 0..100 {
            assert_eq!(image.peek(r, c), r + c, "({r}, {c})");
        }
    }
}

#[test]
fn test_absent_pairs_are_zero() {
    let image = build(&[(1, 2, 3), (1, 5, 6), (40, 2, 9)]);
    assert_eq!(image.peek(1, 2), 3);
    assert_eq!(image.peek(40, 2), 9);
    assert_eq!(image.peek(1, 3), 0);
    assert_eq!(image.peek(2, 2), 0);
    assert_eq!(image.peek(-1, -1), 0);
    assert_eq!(image.peek(i32::MIN, 2), 0);
}

#[test]
fn test_negative_and_large_keys() {
    let image = build(&[(-5, i32::MAX, 1), (i32::MIN, -200, 2), (7, 0, -3)]);
    assert_eq!(image.peek(-5, i32::MAX), 1);
    assert_eq!(image.peek(i32::MIN, -200), 2);
    assert_eq!(image.peek(7, 0), -3);
}

#[test]
fn test_big_endian_round_trip() {
    let image = build(&[(3, 4, 12), (100, 1, -7)]);
    let mut bytes = image.to_be_bytes();
    // container sections may carry alignment padding
    bytes.extend_from_slice(&[0; 4]);
    let stored = MatrixImage::from_be_bytes(bytes).unwrap().with_limits(limits());
    assert_eq!(stored.peek(3, 4), 12);
    assert_eq!(stored.peek(100, 1), -7);
    assert_eq!(stored.peek(4, 3), 0);
    assert_eq!(stored.to_ints(), image.to_ints());
}

#[test]
fn test_mapped_image() {
    let image = build(&[(1, 1, 11), (2, 2, 22)]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.img");
    std::fs::write(&path, image.to_be_bytes()).unwrap();
    let mapped = MatrixImage::open(&path).unwrap().with_limits(limits());
    assert_eq!(mapped.peek(1, 1), 11);
    assert_eq!(mapped.peek(2, 2), 22);
}

#[test]
fn test_truncated_image_rejected() {
    let image = build(&[(1, 1, 11)]);
    let mut bytes = image.to_be_bytes();
    bytes.truncate(bytes.len() - 4);
    assert!(matches!(
        MatrixImage::from_be_bytes(bytes),
        Err(MatrixError::Malformed(_))
    ));
    assert!(matches!(
        MatrixImage::from_be_bytes(vec![0, 0, 0]),
        Err(MatrixError::Malformed(_))
    ));
    let negative = crate::codec::ints_to_be_bytes(&[-2, 0]);
    assert!(matches!(
        MatrixImage::from_be_bytes(negative),
        Err(MatrixError::Malformed(_))
    ));
}

proptest! {
    #[test]
    fn test_prop_peek_matches_sparse(
        cells in proptest::collection::btree_map(
            (0i32..500, 0i32..500),
            1i32..1000,
            0..200,
        ),
        probes in proptest::collection::vec((0i32..500, 0i32..500), 20),
    ) {
        let list: Vec<(i32, i32, i32)> =
            cells.iter().map(|(&(r, c), &v)| (r, c, v)).collect();
        let image = build(&list);
        for (&(r, c), &v) in &cells {
            prop_assert_eq!(image.peek(r, c), v);
        }
        for (r, c) in probes {
            let expected = cells.get(&(r, c)).copied().unwrap_or(0);
            prop_assert_eq!(image.peek(r, c), expected);
        }
    }
}
