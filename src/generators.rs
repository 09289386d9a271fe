use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cell::Cell as FlagCell;
use std::rc::Rc;

use crate::cells::Direction;
use crate::errors::*;
use crate::grid::Grid;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CarveState {
    Idle,
    Carving,
    Done,
}

/// What a single decision point of the carve did.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CarveStep {
    /// Knocked through from `from` into the unvisited `to`, which is now current. Reaching the
    /// last unvisited cell ends the carve on this step.
    Carved {
        from: usize,
        to: usize,
        direction: Direction,
    },
    /// `from` had no unvisited neighbours left, the carve stepped back to `to`.
    Backtracked { from: usize, to: usize },
    /// The stack ran dry before the last carve ended it. Cannot happen on a square grid.
    Finished,
    /// A regenerate request was seen, the stack was thrown away.
    Aborted,
    /// Nothing to do, the carver is idle or already done.
    Stalled,
}

/// Cooperative "throw this maze away and start again" flag.
///
/// Clones share the flag, so an input handler can hold one while the session holds another. The
/// carver looks at it once per decision point.
#[derive(Clone, Debug, Default)]
pub struct RegenerateSignal {
    requested: Rc<FlagCell<bool>>,
}

impl RegenerateSignal {
    pub fn new() -> RegenerateSignal {
        RegenerateSignal::default()
    }

    pub fn request(&self) {
        self.requested.set(true);
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Clears the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.requested.replace(false)
    }
}

/// Depth first "recursive backtracker" maze carving, with an explicit stack in place of recursion.
///
/// From the current cell pick a random unvisited neighbour, knock down the wall between them and
/// move there. When the current cell has no unvisited neighbours left, step back along the path
/// until one that does turns up. Every cell is visited exactly once and a cell is only ever joined
/// to an unvisited one, so the passages form a spanning tree: a perfect maze.
///
/// Long winding corridors with few dead ends are typical of this algorithm.
#[derive(Debug, Clone)]
pub struct RecursiveBacktracker {
    stack: Vec<usize>,
    visited_count: usize,
    state: CarveState,
}

impl Default for RecursiveBacktracker {
    fn default() -> Self {
        RecursiveBacktracker::new()
    }
}

impl RecursiveBacktracker {
    pub fn new() -> RecursiveBacktracker {
        RecursiveBacktracker {
            stack: Vec::new(),
            visited_count: 0,
            state: CarveState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> CarveState {
        self.state
    }

    /// The cell the carve is standing on.
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.stack.last().cloned()
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    /// How far back the carve can still retreat.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.stack.len()
    }

    /// Start carving `grid` from `start`. The grid must be fresh: nothing visited, every wall up.
    ///
    /// A single cell grid is done straight away.
    pub fn begin(&mut self, grid: &mut Grid, start: usize) -> Result<()> {
        if start >= grid.size() {
            return Err(ErrorKind::InvalidStartIndex(start, grid.size()).into());
        }
        debug_assert_eq!(grid.visited_count(), 0, "carving must begin on a fresh grid");

        self.stack.clear();
        self.stack.reserve(grid.size());

        grid[start].mark_visited();
        self.stack.push(start);
        self.visited_count = 1;
        self.state = if self.visited_count == grid.size() {
            CarveState::Done
        } else {
            CarveState::Carving
        };
        Ok(())
    }

    /// Advance the carve by exactly one decision point: one wall removal or one backtrack.
    ///
    /// The regenerate signal is looked at here and only here, after the candidates are known and
    /// before any wall comes down. On abort the stack is dropped and the carver goes back to idle;
    /// the grid it was working on is half carved and must be thrown away.
    pub fn step<R: Rng + ?Sized>(&mut self,
                                 grid: &mut Grid,
                                 rng: &mut R,
                                 regenerate: &RegenerateSignal)
                                 -> CarveStep {
        let current = match (self.state, self.current()) {
            (CarveState::Carving, Some(index)) => index,
            _ => return CarveStep::Stalled,
        };

        let candidates = grid.unvisited_neighbours_of(current);

        if regenerate.is_requested() {
            self.abort();
            return CarveStep::Aborted;
        }

        match candidates.choose(rng) {
            Some(&(direction, next)) => {
                let carved = grid.carve_passage(current, direction);
                debug_assert_eq!(carved, Ok(next));
                grid[next].mark_visited();
                self.visited_count += 1;
                trace!("carved {:?} from {} to {}", direction, current, next);

                // The last cell reached ends the carve, the remaining frames have nothing left
                // to open.
                if self.visited_count == grid.size() {
                    self.stack.clear();
                    self.state = CarveState::Done;
                } else {
                    self.stack.push(next);
                }
                CarveStep::Carved {
                    from: current,
                    to: next,
                    direction,
                }
            }
            None => {
                let _ = self.stack.pop();
                match self.current() {
                    Some(previous) => {
                        trace!("backtracked from {} to {}", current, previous);
                        CarveStep::Backtracked {
                            from: current,
                            to: previous,
                        }
                    }
                    None => {
                        debug_assert_eq!(self.visited_count, grid.size());
                        self.state = CarveState::Done;
                        CarveStep::Finished
                    }
                }
            }
        }
    }

    /// Drop all in-progress state and go back to idle.
    pub fn abort(&mut self) {
        self.stack.clear();
        self.visited_count = 0;
        self.state = CarveState::Idle;
    }
}

/// Carve a whole perfect maze into a fresh grid in one go, starting from a random cell.
pub fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<()> {
    let start = grid.random_cell(rng);
    let mut carver = RecursiveBacktracker::new();
    carver.begin(grid, start)?;

    // A fresh signal nobody else holds, so this carve runs to the end.
    let never_regenerate = RegenerateSignal::new();
    while carver.state() == CarveState::Carving {
        let _ = carver.step(grid, rng, &never_regenerate);
    }
    Ok(())
}
