// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidSize(side_length: usize) {
            description("invalid grid size")
            display("invalid grid side length {}, a maze grid needs at least 1 cell per side", side_length)
        }

        NotInitialized {
            description("no maze generated yet")
            display("no maze has been generated yet, call generate first")
        }

        // The session never asks for a start outside the grid, seeing this is a bug.
        InvalidStartIndex(index: usize, cells_count: usize) {
            description("carve start index out of range")
            display("carve start index {} is outside the grid of {} cells", index, cells_count)
        }
    }
}
