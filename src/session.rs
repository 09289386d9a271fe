use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::*;
use crate::generators::{CarveState, CarveStep, RecursiveBacktracker, RegenerateSignal};
use crate::grid::Grid;
use crate::snapshot::GridSnapshot;
use crate::units::SideLength;

/// Owns the maze being carved: one grid, one carver and the random source they share.
///
/// Everything runs on the caller's thread. Between calls a renderer may read the grid or take a
/// snapshot; nothing outside the session ever gets mutable access.
#[derive(Debug)]
pub struct MazeSession<R: Rng = StdRng> {
    grid: Option<Grid>,
    carver: RecursiveBacktracker,
    rng: R,
    regenerate: RegenerateSignal,
    generation: u64,
}

impl MazeSession<StdRng> {
    /// A session with a random source seeded from the operating system.
    pub fn new() -> MazeSession<StdRng> {
        MazeSession::with_rng(StdRng::from_entropy())
    }

    /// A session that carves the same sequence of mazes every time for the same seed.
    pub fn seeded(seed: u64) -> MazeSession<StdRng> {
        MazeSession::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MazeSession<StdRng> {
    fn default() -> Self {
        MazeSession::new()
    }
}

impl<R: Rng> MazeSession<R> {
    pub fn with_rng(rng: R) -> MazeSession<R> {
        MazeSession {
            grid: None,
            carver: RecursiveBacktracker::new(),
            rng,
            regenerate: RegenerateSignal::new(),
            generation: 0,
        }
    }

    /// Build a fresh `side_length * side_length` grid and start carving it from a random cell.
    ///
    /// Any maze already held, finished or not, is discarded.
    pub fn generate(&mut self, side_length: SideLength) -> Result<GridSnapshot> {
        let grid = Grid::build(side_length)?;
        // A request raised against the previous maze is satisfied by this one.
        let _ = self.regenerate.take();
        self.start(grid)?;
        self.snapshot()
    }

    /// Throw the current maze away, finished or half carved, and start a new one of the same size.
    pub fn regenerate(&mut self) -> Result<GridSnapshot> {
        let side_length = self.side_length()?;
        info!("regenerating {}x{} maze", side_length.0, side_length.0);
        self.carver.abort();
        self.generate(side_length)
    }

    /// Advance the carve by one decision point. Returns true once the maze is complete.
    ///
    /// A regenerate raised through a [`RegenerateSignal`] handle is honoured here: the carve in
    /// progress is abandoned and a fresh grid started, which is not done.
    pub fn step(&mut self) -> Result<bool> {
        let outcome = {
            let grid = self.grid.as_mut().ok_or(ErrorKind::NotInitialized)?;
            self.carver.step(grid, &mut self.rng, &self.regenerate)
        };

        match outcome {
            CarveStep::Aborted => {
                debug!("carve aborted after {} cells", self.visited_count());
                self.regenerate()?;
                Ok(false)
            }
            CarveStep::Carved { .. } |
            CarveStep::Finished if self.is_done() => {
                info!("maze {} complete", self.generation);
                Ok(true)
            }
            CarveStep::Stalled => {
                // Done mazes still answer a regenerate request made after they finished.
                if self.regenerate.is_requested() {
                    self.regenerate()?;
                    Ok(false)
                } else {
                    Ok(self.carver.state() == CarveState::Done)
                }
            }
            CarveStep::Carved { .. } |
            CarveStep::Finished |
            CarveStep::Backtracked { .. } => Ok(false),
        }
    }

    /// Step until the maze is complete, handing every step and the grid as it stands to
    /// `observer`. The observer may raise the regenerate signal; the carve then starts over and
    /// keeps going.
    pub fn run_to_completion<F>(&mut self, mut observer: F) -> Result<GridSnapshot>
        where F: FnMut(&Grid, Option<usize>)
    {
        loop {
            let done = self.step()?;
            observer(self.grid()?, self.carver.current());
            if done {
                return self.snapshot();
            }
        }
    }

    /// Read only view of the grid being carved.
    pub fn grid(&self) -> Result<&Grid> {
        self.grid.as_ref().ok_or_else(|| ErrorKind::NotInitialized.into())
    }

    pub fn snapshot(&self) -> Result<GridSnapshot> {
        self.grid().map(|grid| grid.snapshot(self.carver.current()))
    }

    pub fn side_length(&self) -> Result<SideLength> {
        self.grid().map(Grid::side_length)
    }

    #[inline]
    pub fn state(&self) -> CarveState {
        self.carver.state()
    }

    /// The cell the carver stands on, None before carving and once done.
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.carver.current()
    }

    pub fn is_done(&self) -> bool {
        self.carver.state() == CarveState::Done
    }

    /// Count of grids built so far; every generate and regenerate makes a new one.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A handle input handlers can use to ask for a new maze while carving is under way.
    pub fn regenerate_signal(&self) -> RegenerateSignal {
        self.regenerate.clone()
    }

    fn visited_count(&self) -> usize {
        self.grid.as_ref().map_or(0, Grid::visited_count)
    }

    fn start(&mut self, mut grid: Grid) -> Result<()> {
        let start = grid.random_cell(&mut self.rng);
        self.carver.begin(&mut grid, start)?;
        self.generation += 1;
        debug!("maze {}: {}x{} grid, carving from cell {}",
               self.generation, grid.side_length().0, grid.side_length().0, start);
        // The old grid, if any, is dropped here, never reused.
        self.grid = Some(grid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use std::cell::RefCell;

    fn assert_perfect(snapshot: &GridSnapshot) {
        let graph = snapshot.passage_graph();
        assert_eq!(graph.edge_count(), snapshot.size() - 1);
        assert_eq!(connected_components(&graph), 1);
        assert!(!is_cyclic_undirected(&graph));
        assert!(snapshot.is_complete());
    }

    fn finish(session: &mut MazeSession) -> usize {
        let mut steps = 0;
        while !session.step().unwrap() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn operations_before_generate_are_not_initialized() {
        let mut session = MazeSession::seeded(0);
        let not_initialized = |r: Result<()>| match r {
            Err(Error(ErrorKind::NotInitialized, _)) => (),
            other => panic!("expected not initialized, got {:?}", other),
        };
        not_initialized(session.regenerate().map(|_| ()));
        not_initialized(session.step().map(|_| ()));
        not_initialized(session.snapshot().map(|_| ()));
        not_initialized(session.grid().map(|_| ()));
        assert_eq!(session.state(), CarveState::Idle);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn generate_rejects_empty_grid() {
        let mut session = MazeSession::seeded(0);
        match session.generate(SideLength(0)) {
            Err(Error(ErrorKind::InvalidSize(0), _)) => (),
            other => panic!("expected invalid size, got {:?}", other),
        }
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn generate_starts_carving_from_one_visited_cell() {
        let mut session = MazeSession::seeded(11);
        let snapshot = session.generate(SideLength(6)).unwrap();
        assert_eq!(session.state(), CarveState::Carving);
        assert_eq!(snapshot.visited_count(), 1);
        assert_eq!(snapshot.passages().len(), 0);

        let current = snapshot.current().expect("carving has a current cell");
        assert!(snapshot.cell(current).unwrap().visited);
        assert!(snapshot.cell(current).unwrap().is_current);
    }

    #[test]
    fn stepping_carves_a_perfect_maze() {
        let mut session = MazeSession::seeded(5);
        session.generate(SideLength(7)).unwrap();
        let steps = finish(&mut session);

        // 48 carves, the last of which reports done, plus fewer than 48 backtracks
        assert!(steps >= 49 - 2 && steps < 2 * (49 - 1));
        assert!(session.is_done());
        assert_eq!(session.current(), None);
        assert_perfect(&session.snapshot().unwrap());

        // done stays done
        assert!(session.step().unwrap());
    }

    #[test]
    fn step_reports_done_once_every_cell_is_visited() {
        let mut session = MazeSession::seeded(5);
        session.generate(SideLength(40)).unwrap();

        let mut premature = 0;
        loop {
            let done = session.step().unwrap();
            let complete = session.snapshot().unwrap().is_complete();
            assert_eq!(done, session.is_done());
            if done {
                assert!(complete);
                break;
            }
            if complete {
                premature += 1;
            }
        }
        assert_eq!(premature, 0);
    }

    #[test]
    fn single_cell_maze_is_done_immediately() {
        let mut session = MazeSession::seeded(1);
        let snapshot = session.generate(SideLength(1)).unwrap();
        assert!(session.is_done());
        assert!(session.step().unwrap());
        assert_eq!(snapshot.passages().len(), 0);
        assert_eq!(snapshot.cell(0).unwrap().walls.standing_count(), 4);
    }

    #[test]
    fn regenerate_discards_the_old_grid() {
        let mut session = MazeSession::seeded(8);
        session.generate(SideLength(5)).unwrap();
        for _ in 0..10 {
            let _ = session.step().unwrap();
        }
        assert!(session.grid().unwrap().visited_count() > 1);

        let fresh = session.regenerate().unwrap();
        assert_eq!(session.generation(), 2);
        assert_eq!(session.state(), CarveState::Carving);
        assert_eq!(fresh.side_length(), SideLength(5));
        assert_eq!(fresh.visited_count(), 1);
        assert!(fresh.passages().is_empty());

        finish(&mut session);
        assert_perfect(&session.snapshot().unwrap());
    }

    #[test]
    fn regenerate_after_done() {
        let mut session = MazeSession::seeded(8);
        session.generate(SideLength(3)).unwrap();
        finish(&mut session);

        let fresh = session.regenerate().unwrap();
        assert_eq!(fresh.visited_count(), 1);
        assert!(!session.is_done());
    }

    #[test]
    fn signal_is_observed_at_the_next_step() {
        let mut session = MazeSession::seeded(21);
        session.generate(SideLength(6)).unwrap();
        for _ in 0..8 {
            let _ = session.step().unwrap();
        }
        let signal = session.regenerate_signal();
        signal.request();

        // Nothing changes until the carve reaches its next decision point.
        assert_eq!(session.generation(), 1);
        assert!(!session.step().unwrap());
        assert_eq!(session.generation(), 2);
        assert!(!signal.is_requested());
        assert_eq!(session.snapshot().unwrap().visited_count(), 1);

        finish(&mut session);
        assert_perfect(&session.snapshot().unwrap());
    }

    #[test]
    fn signal_after_done_starts_over() {
        let mut session = MazeSession::seeded(4);
        session.generate(SideLength(3)).unwrap();
        finish(&mut session);

        session.regenerate_signal().request();
        assert!(!session.step().unwrap());
        assert_eq!(session.generation(), 2);
        assert_eq!(session.state(), CarveState::Carving);
    }

    #[test]
    fn run_to_completion_reports_every_step() {
        let mut session = MazeSession::seeded(13);
        session.generate(SideLength(4)).unwrap();

        let mut frames = 0;
        let mut complete_frames = 0;
        let finished = session.run_to_completion(|grid, current| {
            frames += 1;
            if let Some(index) = current {
                assert!(grid[index].is_visited());
            }
            if grid.visited_count() == grid.size() {
                complete_frames += 1;
                assert_eq!(current, None);
            }
        }).unwrap();

        // the maze is handed back on the frame that visits the last cell
        assert_eq!(complete_frames, 1);
        assert!(frames >= 16 - 1 && frames < 2 * (16 - 1));
        assert_perfect(&finished);
        assert_eq!(finished.current(), None);
    }

    #[test]
    fn observer_can_restart_the_carve() {
        let mut session = MazeSession::seeded(17);
        session.generate(SideLength(5)).unwrap();
        let signal = session.regenerate_signal();

        let frames = RefCell::new(0);
        let finished = session.run_to_completion(|_, _| {
            *frames.borrow_mut() += 1;
            if *frames.borrow() == 5 {
                signal.request();
            }
        }).unwrap();

        assert_eq!(session.generation(), 2);
        assert_perfect(&finished);
    }

    #[test]
    fn same_seed_same_mazes() {
        let carve = |seed| {
            let mut session = MazeSession::seeded(seed);
            session.generate(SideLength(9)).unwrap();
            finish(&mut session);
            let first = session.snapshot().unwrap();
            session.regenerate().unwrap();
            finish(&mut session);
            (first, session.snapshot().unwrap())
        };
        let (a1, a2) = carve(77);
        let (b1, b2) = carve(77);
        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
    }
}
