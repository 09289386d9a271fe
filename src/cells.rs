use smallvec::SmallVec;
use std::convert::From;

use crate::units::{ColumnIndex, RowIndex};

pub type DirectionSmallVec = SmallVec<[Direction; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: usize,
    pub y: usize,
}

impl Cartesian2DCoordinate {
    pub fn new(x: usize, y: usize) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        Cartesian2DCoordinate::new(col_index.0, row_index.0)
    }

    #[inline]
    pub fn column(&self) -> ColumnIndex {
        ColumnIndex(self.x)
    }

    #[inline]
    pub fn row(&self) -> RowIndex {
        RowIndex(self.y)
    }
}

impl From<(usize, usize)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (usize, usize)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// The four sides of a square cell.
///
/// The declaration order is the order neighbours are reported in, so a seeded maze is the same on
/// every run.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// (column, row) offset of the adjacent cell in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Creates a new coordinate offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable (moving off the top or left edge).
    /// The far edges depend on the grid size and are checked by the grid.
    pub fn offset_coordinate(self, coord: Cartesian2DCoordinate) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (coord.x, coord.y);
        match self {
            Direction::Up => {
                if y > 0 {
                    Some(Cartesian2DCoordinate::new(x, y - 1))
                } else {
                    None
                }
            }
            Direction::Right => x.checked_add(1).map(|x| Cartesian2DCoordinate::new(x, y)),
            Direction::Down => y.checked_add(1).map(|y| Cartesian2DCoordinate::new(x, y)),
            Direction::Left => {
                if x > 0 {
                    Some(Cartesian2DCoordinate::new(x - 1, y))
                } else {
                    None
                }
            }
        }
    }
}

/// Wall presence on each side of a cell, `true` when the wall is standing.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub fn all_standing() -> Walls {
        Walls {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }

    #[inline]
    pub fn has_wall(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    fn wall_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Up => &mut self.top,
            Direction::Right => &mut self.right,
            Direction::Down => &mut self.bottom,
            Direction::Left => &mut self.left,
        }
    }

    pub fn standing_count(&self) -> usize {
        Direction::ALL.iter().filter(|&&dir| self.has_wall(dir)).count()
    }
}

impl Default for Walls {
    fn default() -> Walls {
        Walls::all_standing()
    }
}

/// A single position on a maze grid.
///
/// The coordinate is fixed at construction. Walls only ever come down and the visited flag only
/// ever goes up; a fresh grid is the only way back to a closed, unvisited cell.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Cell {
    coordinate: Cartesian2DCoordinate,
    walls: Walls,
    visited: bool,
}

impl Cell {
    pub fn new(coordinate: Cartesian2DCoordinate) -> Cell {
        Cell {
            coordinate,
            walls: Walls::all_standing(),
            visited: false,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Cartesian2DCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn column(&self) -> ColumnIndex {
        self.coordinate.column()
    }

    #[inline]
    pub fn row(&self) -> RowIndex {
        self.coordinate.row()
    }

    #[inline]
    pub fn walls(&self) -> Walls {
        self.walls
    }

    #[inline]
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls.has_wall(direction)
    }

    /// Knock down the wall on one side. Removing a wall that is already gone does nothing.
    pub fn remove_wall(&mut self, direction: Direction) {
        *self.walls.wall_mut(direction) = false;
    }

    /// Knock down the wall facing back towards a cell that carved into this one from `direction`.
    pub fn remove_opposite_wall(&mut self, direction: Direction) {
        self.remove_wall(direction.opposite());
    }

    /// Sides with no wall standing.
    pub fn open_sides(&self) -> DirectionSmallVec {
        Direction::ALL
            .iter()
            .cloned()
            .filter(|&dir| !self.has_wall(dir))
            .collect()
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    #[inline]
    pub fn mark_visited(&mut self) {
        self.visited = true;
    }
}
