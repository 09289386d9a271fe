use crate::cells::Cartesian2DCoordinate;
use crate::units::SideLength;

/// Row major iteration over every coordinate of a square grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    side_length: usize,
    cells_count: usize,
}

impl CellIter {
    pub fn new(side_length: SideLength) -> CellIter {
        CellIter {
            current_cell_number: 0,
            side_length: side_length.0,
            cells_count: side_length.0 * side_length.0,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_grid_coordinate(self.side_length, self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Whole rows of coordinates, top row first. Each row runs west to east.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    next_row: usize,
    side_length: usize,
}

impl RowIter {
    pub fn new(side_length: SideLength) -> RowIter {
        RowIter {
            next_row: 0,
            side_length: side_length.0,
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row < self.side_length {
            let y = self.next_row;
            self.next_row += 1;
            Some((0..self.side_length).map(|x| Cartesian2DCoordinate::new(x, y)).collect())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.side_length - self.next_row;
        (remaining, Some(remaining))
    }
}

#[inline]
pub fn index_to_grid_coordinate(side_length: usize, one_dimensional_index: usize) -> Cartesian2DCoordinate {
    let y = one_dimensional_index / side_length;
    let x = one_dimensional_index - (y * side_length);
    Cartesian2DCoordinate::new(x, y)
}
