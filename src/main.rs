use clap::Parser;
use env_logger::Env;
use log::debug;

use std::io::{self, Write};

use crate::args::Args;

mod args;
mod tideman;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
    debug!("args: {:?}", args);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    if let Err(e) = tideman::run(&args, &mut input, &mut output) {
        // The output may be partially written (prompts, summary).
        let _ = output.flush();
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
