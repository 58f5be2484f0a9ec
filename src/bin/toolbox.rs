//! File commands.
//!
//! ```bash
//! toolbox writeFile out.txt join , a b c -
//! toolbox writeFile copy.txt readFile out.txt
//! ```

use std::process::ExitCode;

use clap::Parser;
use krikata::cli::{self, CliArgs};
use krikata::demos::toolbox;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    cli::run(&toolbox::language(), args).await
}
