use std::fmt;

use crate::cells::{Cartesian2DCoordinate, Direction};
use crate::snapshot::{CellSnapshot, GridSnapshot};

/// Render the contents of a grid cell as text.
/// The String should be 3 glyphs long, padded if required.
pub trait CellBodyDisplay {
    fn render_cell_body(&self, cell: &CellSnapshot) -> String;
}

/// Marks where the carver stands and what it has not reached yet, for animated drawing.
#[derive(Debug, Copy, Clone)]
pub struct CarveProgressDisplay;

impl CellBodyDisplay for CarveProgressDisplay {
    fn render_cell_body(&self, cell: &CellSnapshot) -> String {
        if cell.is_current {
            String::from(" @ ")
        } else if !cell.visited {
            String::from("░░░")
        } else {
            String::from("   ")
        }
    }
}

/// Empty rooms, just the walls.
#[derive(Debug, Copy, Clone)]
pub struct PlainDisplay;

impl CellBodyDisplay for PlainDisplay {
    fn render_cell_body(&self, _: &CellSnapshot) -> String {
        String::from("   ")
    }
}

const WALL_L: &str = "╴";
const WALL_R: &str = "╶";
const WALL_U: &str = "╵";
const WALL_D: &str = "╷";
const WALL_LR_3: &str = "───";
const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";
const WALL_RD: &str = "┌";
const WALL_LRU: &str = "┴";
const WALL_LRD: &str = "┬";
const WALL_LRUD: &str = "┼";
const WALL_RUD: &str = "├";
const WALL_LUD: &str = "┤";

impl GridSnapshot {
    /// Box drawing text rendering of the maze, one line of cell bodies and one line of walls per
    /// grid row, plus the top boundary.
    pub fn render_text<D: CellBodyDisplay + ?Sized>(&self, display: &D) -> String {
        let side = self.side_length().0;
        let open = |coord: Cartesian2DCoordinate, dir| self.is_passage_open(coord, dir);
        let neighbour = |coord: Cartesian2DCoordinate, dir: Direction| {
            dir.offset_coordinate(coord).filter(|c| c.x < side && c.y < side)
        };

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        for x in 0..side {
            output.push_str(WALL_LR_3);
            if open(Cartesian2DCoordinate::new(x, 0), Direction::Right) {
                output.push_str(WALL_LR);
            } else if x == side - 1 {
                output.push_str(WALL_LD);
            } else {
                output.push_str(WALL_LRD);
            }
        }
        output.push('\n');

        for row in self.iter_row() {
            let is_last_row = row.first().map_or(true, |c| c.y == side - 1);

            // The west most boundary of the row. The top section of each cell is the bottom
            // section of the row above.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for cell_coord in row {
                let x = cell_coord.x;
                let is_last_column = x == side - 1;
                let east_open = open(cell_coord, Direction::Right);
                let south_open = open(cell_coord, Direction::Down);

                if let Some(cell) = self.cell_at(cell_coord) {
                    row_middle_section_render.push_str(&display.render_cell_body(cell));
                }
                row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

                if x == 0 {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east = neighbour(cell_coord, Direction::Right)
                            .map_or(false, |c| open(c, Direction::Down));
                        let access_se_from_south = neighbour(cell_coord, Direction::Down)
                            .map_or(false, |c| open(c, Direction::Right));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section, show_right_section, show_up_section, show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };
                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_text(&CarveProgressDisplay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::grid::Grid;
    use crate::units::SideLength;

    fn grid(n: usize) -> Grid {
        Grid::build(SideLength(n)).unwrap()
    }

    #[test]
    fn closed_single_cell() {
        let g = grid(1);
        let text = g.snapshot(None).render_text(&PlainDisplay);
        assert_eq!(text, "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn progress_marks_current_and_unvisited() {
        let mut g = grid(2);
        g[0].mark_visited();
        g[1].mark_visited();
        g.carve_passage(0, Direction::Right).unwrap();
        let text = g.snapshot(Some(1)).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "┌───────┐");
        assert_eq!(lines[1], "│     @ │");
        assert_eq!(lines[3], "│░░░│░░░│");
    }

    #[test]
    fn carved_two_by_two() {
        // ┌───────┐
        // │       │
        // │   ┌───┤
        // │   │   │
        // └───┴───┘
        let mut g = grid(2);
        g.carve_passage(0, Direction::Right).unwrap();
        g.carve_passage(0, Direction::Down).unwrap();
        let text = g.snapshot(None).render_text(&PlainDisplay);
        assert_eq!(text, "┌───────┐\n│       │\n│   ┌───┤\n│   │   │\n└───┴───┘\n");
    }

    #[test]
    fn grid_display_matches_snapshot() {
        let g = grid(3);
        assert_eq!(g.to_string(), g.snapshot(None).to_string());
    }
}
