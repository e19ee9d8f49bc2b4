use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.verbose, args.quiet);
    cli::run(args)
}
