use std::io::{self, Read, Write};

use clap::Parser;
use ntm::{load, Branch, Engine, LoadError, Loaded};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Print a per-step trace (state, head, tape) to stderr for every run.
    #[clap(short = 'd', long)]
    debug: bool,
}

/// Reads the machine description from stdin and loads it, folding a failed
/// read into the same `LoadError` a failed parse would produce — the caller
/// only needs one error path.
fn load_from_stdin() -> Result<Loaded, LoadError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    load(&input)
}

fn main() {
    let cli = Cli::parse();

    let loaded = match load_from_stdin() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error loading machine description: {e}");
            std::process::exit(1);
        }
    };

    let engine = Engine::new(&loaded.table, loaded.max_steps);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for run_input in &loaded.run_inputs {
        let verdict = if cli.debug {
            engine.run_traced(run_input.as_bytes(), &mut |branch: &Branch| {
                eprintln!(
                    "step {}: state={} head={:?}",
                    branch.steps, branch.state, branch.head
                );
            })
        } else {
            engine.run(run_input.as_bytes())
        };

        writeln!(out, "{verdict}").expect("stdout write failed");
    }
}
