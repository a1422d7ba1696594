use crate::matrix::{MatrixError, ProbeLimits, SparseMatrix, EMPTY_KEY};

fn limits() -> ProbeLimits {
    ProbeLimits {
        max_failure: 50,
        max_growth_rounds: 64,
    }
}

#[test]
fn test_empty_matrix_image() {
    let mut m: SparseMatrix = SparseMatrix::new();
    m.make_matrix(limits()).unwrap();
    assert_eq!(m.image().unwrap(), vec![0, 0]);
}

#[test]
fn test_set_overwrites() {
    let mut m: SparseMatrix<&str> = SparseMatrix::new();
    m.set(1, 2, 10, Some("a"));
    m.set(1, 2, 20, None);
    assert_eq!(m.value(1, 2), 20);
    assert_eq!(m.payload(1, 2), None);
    assert_eq!(m.cell_count(), 1);
    assert_eq!(m.row_count(), 1);
}

#[test]
fn test_payload_kept() {
    let mut m: SparseMatrix<String> = SparseMatrix::new();
    m.set(3, 4, 1, Some("x".into()));
    assert_eq!(m.payload(3, 4).map(String::as_str), Some("x"));
    assert!(m.get(4, 3).is_none());
}

#[test]
fn test_image_header_counts_slots() {
    let mut m: SparseMatrix = SparseMatrix::new();
    for r in 0..10 {
        for c in 0..3 {
            m.set(r, c, 1, None);
        }
    }
    m.make_matrix(limits()).unwrap();
    let image = m.image().unwrap();
    let rows = image[0] as usize;
    let cells = image[1] as usize;
    assert!(rows >= 10);
    assert!(cells >= 30);
    assert_eq!(image.len(), 2 + (rows + cells) * 2);
    // row shifts are non-decreasing and stay inside the cell area
    let shifts: Vec<i32> = (0..rows).map(|h| image[2 + h * 2 + 1]).collect();
    assert!(shifts.windows(2).all(|w| w[0] <= w[1]));
    assert!(shifts.iter().all(|&s| s as usize <= cells));
}

#[test]
fn test_empty_cells_are_marked() {
    let mut m: SparseMatrix = SparseMatrix::new();
    // all four collide in 4 slots; the row grows to 5 with one hole
    for c in [0, 4, 8, 12] {
        m.set(0, c, 5, None);
    }
    m.make_matrix(ProbeLimits {
        max_failure: 0,
        max_growth_rounds: 64,
    })
    .unwrap();
    let image = m.image().unwrap();
    let rows = image[0] as usize;
    let cells = image[1] as usize;
    assert_eq!(cells, 5);
    let base = 2 + rows * 2;
    let mut holes = 0;
    for i in 0..cells {
        let (key, value) = (image[base + i * 2], image[base + i * 2 + 1]);
        if key == EMPTY_KEY {
            assert_eq!(value, EMPTY_KEY);
            holes += 1;
        } else {
            assert_eq!(value, 5);
        }
    }
    assert_eq!(holes, 1);
}

#[test]
fn test_reserved_key_rejected() {
    let mut m: SparseMatrix = SparseMatrix::new();
    m.set(EMPTY_KEY, 0, 1, None);
    assert!(matches!(
        m.make_matrix(limits()),
        Err(MatrixError::ReservedKey(-1))
    ));

    let mut m: SparseMatrix = SparseMatrix::new();
    m.set(0, EMPTY_KEY, 1, None);
    assert!(matches!(
        m.make_matrix(limits()),
        Err(MatrixError::ReservedKey(-1))
    ));
}

#[test]
fn test_growth_limit() {
    let mut m: SparseMatrix = SparseMatrix::new();
    for c in 0..20 {
        m.set(0, c, 1, None);
    }
    // sequential keys land in distinct slots, multiples of four do not
    let mut colliding: SparseMatrix = SparseMatrix::new();
    for i in 0..4 {
        colliding.set(0, i * 4, 1, None);
    }
    let tight = ProbeLimits {
        max_failure: 0,
        max_growth_rounds: 0,
    };
    assert!(m.make_matrix(tight).is_ok());
    assert!(matches!(
        colliding.make_matrix(tight),
        Err(MatrixError::GrowthLimit {
            elements: 4,
            rounds: 0
        })
    ));
}

#[test]
fn test_set_invalidates_cram() {
    let mut m: SparseMatrix = SparseMatrix::new();
    m.set(1, 1, 1, None);
    let first = m.image().unwrap();
    m.set(2, 2, 2, None);
    let second = m.image().unwrap();
    assert_ne!(first, second);
}
