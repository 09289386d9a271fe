use docopt::Docopt;
use log::info;
use serde_derive::Deserialize;
use mazes::{
    grid_displays::PlainDisplay,
    renderers,
    session::MazeSession,
    snapshot::GridSnapshot,
    units::SideLength,
};
use std::{
    io,
    io::prelude::*,
    fs::File,
    time::Duration,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--grid-size=<n>] [--seed=<s>] [--animate] [--step-delay=<ms>]
    mazes_driver render [--grid-size=<n>] [--seed=<s>] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n [default: 40].
    --seed=<s>             Seed the random source so every run carves the same mazes.
    --animate              Redraw the maze after every carve step, highlighting the current cell.
    --step-delay=<ms>      Milliseconds between animated carve steps [default: 10].
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.

Without `render` the maze is drawn in the terminal: Enter carves a new maze, Escape or q quits.
Set RUST_LOG (e.g. RUST_LOG=debug) for more logging on stderr.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: usize,
    flag_seed: Option<u64>,
    flag_animate: bool,
    flag_step_delay: u64,
    cmd_render: bool,
    flag_text_out: String,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let mut session = match args.flag_seed {
        Some(seed) => MazeSession::seeded(seed),
        None => MazeSession::new(),
    };
    session.generate(SideLength(args.flag_grid_size))?;
    info!("{}x{} maze session started", args.flag_grid_size, args.flag_grid_size);

    if args.cmd_render {
        let maze = session.run_to_completion(|_, _| ())?;
        write_outputs(&maze, &args)
    } else {
        let render_options = renderers::RenderOptionsBuilder::new()
            .animate(args.flag_animate)
            .step_delay(Duration::from_millis(args.flag_step_delay))
            .build();
        renderers::render_interactive(&mut session, &render_options)?;
        Ok(())
    }
}

fn write_outputs(maze: &GridSnapshot, args: &MazeArgs) -> Result<()> {

    let text = maze.render_text(&PlainDisplay);
    if args.flag_text_out.is_empty() {
        println!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_save_edges.is_empty() {
        write_text_to_file(&maze.edge_list(), &args.flag_save_edges)
            .chain_err(|| format!("Failed to write maze graph to text file {}", args.flag_save_edges))?;
    }

    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
