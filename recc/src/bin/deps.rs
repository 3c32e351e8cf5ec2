//! Prints the set of files a compiler command depends on, one per line,
//! using the same discovery the `recc` binary performs before dispatching
//! remotely.

use clap::Parser;
use tracing::error;

use recc::parser::ParsedCommand;
use recc::{deps, Config, Error};

/// Determines the files needed to execute the given compiler command and
/// prints them newline-separated.
#[derive(Parser)]
#[command(name = "deps", version, about, long_about = None)]
struct Cli {
    /// The compiler command, e.g. `gcc -c hello.cpp`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let verbose = std::env::var("RECC_VERBOSE").is_ok_and(|v| !v.is_empty());
    recc::init_logging(verbose);
    let config = Config::load();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd.to_string_lossy().into_owned(),
        Err(e) => {
            error!("cannot determine working directory: {}", e);
            std::process::exit(1);
        }
    };

    let parsed = match ParsedCommand::parse(&cli.command, &cwd, &config) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    if !parsed.is_compiler_command() {
        error!("not a recognized compiler command");
        std::process::exit(1);
    }

    match deps::get_file_info(&parsed, &config).await {
        Ok(info) => {
            for dependency in &info.dependencies {
                println!("{}", dependency);
            }
        }
        Err(Error::SubprocessFailed { exit_code }) => std::process::exit(exit_code),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
