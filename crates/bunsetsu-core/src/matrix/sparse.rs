use std::collections::BTreeMap;

use tracing::debug;

use super::{probe, MatrixError, MatrixImage, ProbeLimits, EMPTY_KEY};

/// One cell of the build-time matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<P> {
    pub value: i32,
    pub payload: Option<P>,
}

/// Rows and cells after cramming, in image order.
struct Crammed {
    /// `(row key, shift)` per row slot.
    rows: Vec<(i32, i32)>,
    /// `(column key, value)` per cell slot.
    cells: Vec<(i32, i32)>,
}

/// Mutable sparse matrix keyed by `(row, column)`.
pub struct SparseMatrix<P = ()> {
    rows: BTreeMap<i32, BTreeMap<i32, Cell<P>>>,
    crammed: Option<Crammed>,
}

impl<P> Default for SparseMatrix<P> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            crammed: None,
        }
    }
}

impl<P> SparseMatrix<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a cell, creating its row on first use.
    pub fn set(&mut self, row: i32, col: i32, value: i32, payload: Option<P>) {
        self.rows
            .entry(row)
            .or_default()
            .insert(col, Cell { value, payload });
        self.crammed = None;
    }

    pub fn get(&self, row: i32, col: i32) -> Option<&Cell<P>> {
        self.rows.get(&row)?.get(&col)
    }

    /// Value of a cell, 0 when absent.
    pub fn value(&self, row: i32, col: i32) -> i32 {
        self.get(row, col).map(|c| c.value).unwrap_or(0)
    }

    pub fn payload(&self, row: i32, col: i32) -> Option<&P> {
        self.get(row, col)?.payload.as_ref()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Cells in `(row, column)` order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Cell<P>)> {
        self.rows
            .iter()
            .flat_map(|(&r, cols)| cols.iter().map(move |(&c, cell)| (r, c, cell)))
    }

    /// Cram the row index and every row into hashed arrays.
    pub fn make_matrix(&mut self, limits: ProbeLimits) -> Result<(), MatrixError> {
        let row_keys: Vec<(i32, i32)> = self.rows.keys().map(|&r| (r, 0)).collect();
        let mut rows = cram(&row_keys, limits)?;

        let mut cells = Vec::new();
        let mut shift: usize = 0;
        for slot in rows.iter_mut() {
            slot.1 = to_i32(shift)?;
            if slot.0 == EMPTY_KEY {
                continue;
            }
            let entries: Vec<(i32, i32)> = self
                .rows
                .get(&slot.0)
                .map(|cols| cols.iter().map(|(&c, cell)| (c, cell.value)).collect())
                .unwrap_or_default();
            let crammed = cram(&entries, limits)?;
            shift += crammed.len();
            cells.extend(crammed);
        }
        debug!(
            rows = self.rows.len(),
            row_slots = rows.len(),
            cell_slots = cells.len(),
            "crammed matrix"
        );
        self.crammed = Some(Crammed { rows, cells });
        Ok(())
    }

    /// Flat int image, cramming first if needed.
    pub fn image(&mut self) -> Result<Vec<i32>, MatrixError> {
        if self.crammed.is_none() {
            self.make_matrix(ProbeLimits::default())?;
        }
        let Some(c) = &self.crammed else {
            return Err(MatrixError::Malformed("matrix was not crammed".into()));
        };
        let mut image = Vec::with_capacity(2 + (c.rows.len() + c.cells.len()) * 2);
        image.push(to_i32(c.rows.len())?);
        image.push(to_i32(c.cells.len())?);
        for &(row, shift) in &c.rows {
            image.push(row);
            image.push(shift);
        }
        for &(col, value) in &c.cells {
            image.push(col);
            image.push(if col == EMPTY_KEY { EMPTY_KEY } else { value });
        }
        Ok(image)
    }

    pub fn to_image(&mut self) -> Result<MatrixImage, MatrixError> {
        Ok(MatrixImage::from_ints(self.image()?))
    }
}

fn to_i32(n: usize) -> Result<i32, MatrixError> {
    i32::try_from(n).map_err(|_| MatrixError::Malformed(format!("{n} exceeds i32::MAX")))
}

/// Place `(key, value)` pairs into an open-addressed array.
///
/// Starts at one slot per element and grows by 9/8 whenever an element
/// cannot find a free slot within `max_failure` retries.
fn cram(entries: &[(i32, i32)], limits: ProbeLimits) -> Result<Vec<(i32, i32)>, MatrixError> {
    if let Some(&(key, _)) = entries.iter().find(|(k, _)| *k == EMPTY_KEY) {
        return Err(MatrixError::ReservedKey(key));
    }
    if entries.is_empty() {
        return Ok(Vec::new());
    }
    let mut len = entries.len();
    let mut rounds = 0;
    loop {
        if let Some(table) = try_cram(entries, len, limits.max_failure) {
            return Ok(table);
        }
        rounds += 1;
        if rounds > limits.max_growth_rounds {
            return Err(MatrixError::GrowthLimit {
                elements: entries.len(),
                rounds: limits.max_growth_rounds,
            });
        }
        len = (len + 1) * 9 / 8;
    }
}

fn try_cram(entries: &[(i32, i32)], len: usize, max_failure: usize) -> Option<Vec<(i32, i32)>> {
    let mut table = vec![(EMPTY_KEY, EMPTY_KEY); len];
    for &(key, value) in entries {
        let slot = (0..=max_failure)
            .map(|nth| probe(key, len, nth))
            .find(|&h| table[h].0 == EMPTY_KEY)?;
        table[slot] = (key, value);
    }
    Some(table)
}
