use clap::Parser;
use crossword_fill::{
    render_grid, Crossword, FillFailure, FillSettings, GridConfig, Propagation, PuzzleError, WordList,
};
use log::{error, info};
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fill a crossword grid with words from a word list.
#[derive(Debug, Parser)]
#[command(name = "crossword-fill", version)]
struct Args {
    /// Grid structure file: a space is a blocked cell, anything else is a cell to fill
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,

    /// Revise each arc once instead of running full AC-3 (for benchmarking)
    #[arg(long)]
    single_pass: bool,

    /// Give up after trying this many candidate words
    #[arg(long, value_name = "N")]
    max_states: Option<u64>,
}

fn load(args: &Args) -> Result<(GridConfig, WordList), PuzzleError> {
    let grid_config = GridConfig::load(&args.structure)?;
    let word_list = WordList::load(&args.words)?;
    info!(
        "Loaded {}x{} grid with {} entries and {} words",
        grid_config.width,
        grid_config.height,
        grid_config.variable_count(),
        word_list.len()
    );
    Ok((grid_config, word_list))
}

fn error_message(err: impl Display) -> String {
    format!("error: {}", err)
}

/// Report a setup or I/O failure on stderr (and the log) and give the exit code for it.
fn fail(err: impl Display) -> ExitCode {
    let message = error_message(err);
    error!("{}", message);
    eprintln!("{}", message);
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let (grid_config, word_list) = match load(&args) {
        Ok(inputs) => inputs,
        Err(err) => return fail(err),
    };

    let mut crossword = match Crossword::new(&grid_config, &word_list) {
        Ok(crossword) => crossword,
        Err(err) => return fail(err),
    };

    let mut settings = FillSettings::default();
    if args.single_pass {
        settings = settings.with_propagation(Propagation::SinglePass);
    }
    if let Some(max_states) = args.max_states {
        settings = settings.with_max_states(max_states);
    }

    match crossword.solve(&settings) {
        Ok(result) => {
            info!("{:?}", result.statistics);

            let display_grid = render_grid(&grid_config, &word_list, &result.choices);
            println!("{}", display_grid);

            if let Some(output) = &args.output {
                if let Err(err) = fs::write(output, display_grid + "\n") {
                    return fail(format!("unable to write {}: {}", output.display(), err));
                }
                info!("Written grid to {}", output.display());
            }

            ExitCode::SUCCESS
        }
        Err(FillFailure::Unsatisfiable) => {
            println!("No solution.");
            ExitCode::from(1)
        }
        Err(failure @ FillFailure::SearchExhausted { .. }) => {
            println!("No solution found: {}.", failure);
            ExitCode::from(1)
        }
    }
}
