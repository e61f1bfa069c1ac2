use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    use kanmon::util::cli::*;

    dotenv::dotenv().ok();

    let opts = Options::parse();
    match run_cli_action(opts) {
        Ok(()) => {
            println!("OK!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
