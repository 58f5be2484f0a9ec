//! Prefix calculator.
//!
//! ```bash
//! calc add 1 mul 2 3
//! calc --grammar
//! calc --repl
//! ```

use std::process::ExitCode;

use clap::Parser;
use krikata::cli::{self, CliArgs};
use krikata::demos::calc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    match calc::language() {
        Ok(language) => cli::run(&language, args).await,
        Err(error) => {
            eprintln!("{}", error.summary());
            ExitCode::FAILURE
        }
    }
}
