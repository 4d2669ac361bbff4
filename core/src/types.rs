use ndarray::Array2;

use crate::*;

/// Single coordinate axis used for board width and height.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Linear cell address, `row * width + column`.
pub type CellIndex = usize;

/// Wall-clock timestamp in milliseconds since the Unix epoch.
pub type Millis = u64;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self, width: usize) -> Self::Output;
}

impl ToNdIndex for CellIndex {
    type Output = [usize; 2];

    fn to_nd_index(self, width: usize) -> Self::Output {
        [self / width, self % width]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Neighbors of `index` on a `width` x `height` grid, in row-major order.
///
/// Corners have 3 neighbors, edges 5 and interior cells 8.
pub fn neighbors(index: CellIndex, width: Coord, height: Coord) -> Result<NeighborIter> {
    if width == 0 || height == 0 {
        return Err(GameError::EmptyBoard);
    }
    let (width, height) = (usize::from(width), usize::from(height));
    if index >= width * height {
        return Err(GameError::InvalidIndex);
    }
    Ok(NeighborIter::new(index, (height, width)))
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: CellIndex) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(index, self.dim())
    }
}

pub trait NeighborCellIterExt<T>: NeighborIterExt {
    fn iter_neighbor_cells_with_index(
        &self,
        index: CellIndex,
    ) -> impl Iterator<Item = (CellIndex, T)>;

    fn iter_neighbor_cells(&self, index: CellIndex) -> impl Iterator<Item = T> {
        self.iter_neighbor_cells_with_index(index)
            .map(|(_, cell)| cell)
    }
}

impl<T: Copy> NeighborCellIterExt<T> for Array2<T> {
    fn iter_neighbor_cells_with_index(
        &self,
        index: CellIndex,
    ) -> impl Iterator<Item = (CellIndex, T)> {
        let width = self.ncols();
        self.iter_neighbors(index)
            .map(move |index| (index, self[index.to_nd_index(width)]))
    }
}

/// `(row, column)` offsets, row-major.
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `(row, column)`, returning a value only when it remains in bounds.
fn apply_delta(
    position: (usize, usize),
    delta: (isize, isize),
    bounds: (usize, usize),
) -> Option<(usize, usize)> {
    let (row, col) = position;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: (usize, usize),
    bounds: (usize, usize),
    index: u8,
}

impl NeighborIter {
    /// `bounds` is `(rows, columns)`, matching `Array2::dim`.
    fn new(center: CellIndex, bounds: (usize, usize)) -> Self {
        let cols = bounds.1.max(1);
        Self {
            center: (center / cols, center % cols),
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if let Some((row, col)) = next_item {
                return Some(row * self.bounds.1 + col);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(DISPLACEMENTS.len() - usize::from(self.index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn collect(index: CellIndex, width: Coord, height: Coord) -> Vec<CellIndex> {
        neighbors(index, width, height).unwrap().collect()
    }

    #[test]
    fn corner_edge_and_interior_counts() {
        for (width, height) in [(3, 3), (5, 4), (30, 16)] {
            let w = usize::from(width);
            let h = usize::from(height);
            let corners = [0, w - 1, (h - 1) * w, h * w - 1];
            for corner in corners {
                assert_eq!(collect(corner, width, height).len(), 3);
            }
            assert_eq!(collect(1, width, height).len(), 5);
            assert_eq!(collect(w, width, height).len(), 5);
            assert_eq!(collect(2 * w - 1, width, height).len(), 5);
            assert_eq!(collect(w + 1, width, height).len(), 8);
        }
    }

    #[test]
    fn neighbors_do_not_wrap_across_rows() {
        assert_eq!(collect(0, 3, 3), [1, 3, 4]);
        assert_eq!(collect(2, 3, 3), [1, 4, 5]);
        assert_eq!(collect(4, 3, 3), [0, 1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(collect(3, 3, 3), [0, 1, 4, 6, 7]);
    }

    #[test]
    fn degenerate_boards() {
        assert!(collect(0, 1, 1).is_empty());
        assert_eq!(collect(2, 5, 1), [1, 3]);
        assert_eq!(collect(0, 1, 4), [1]);
    }

    #[test]
    fn neighbors_rejects_invalid_input() {
        assert_eq!(neighbors(9, 3, 3).unwrap_err(), GameError::InvalidIndex);
        assert_eq!(neighbors(0, 0, 3).unwrap_err(), GameError::EmptyBoard);
    }

    #[test]
    fn neighbor_cells_follow_row_major_layout() {
        let grid = Array2::from_shape_fn((2, 3), |(row, col)| row * 3 + col);
        let cells: Vec<_> = grid.iter_neighbor_cells(5).collect();
        assert_eq!(cells, [1, 2, 4]);
    }
}
