use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dri::{commands, diagnostics, logging};

#[derive(Parser)]
#[command(name = "dri", about = "Stable identifiers for documentable program elements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of each identifier
    Encode {
        /// Identifier file (.toml or .json) or directory of them
        input: PathBuf,
        /// Emit a JSON array of {key, dri}
        #[arg(long)]
        json: bool,
    },
    /// Print each identifier's breadcrumb chain up to the root
    Parents {
        /// Identifier file (.toml or .json) or directory of them
        input: PathBuf,
    },
    /// Index identifiers and write .dri.lock
    Init {
        /// Identifier file (.toml or .json) or directory of them
        input: PathBuf,
    },
    /// Verify every locked identifier still encodes to its recorded key
    Check,
}

/// Exit code for runtime errors, distinct from the check outcomes.
const RUNTIME_ERROR: u8 = 3;

fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode { input, json } => commands::cmd_encode(&input, json).map(|()| ExitCode::SUCCESS),
        Commands::Parents { input } => commands::cmd_parents(&input).map(|()| ExitCode::SUCCESS),
        Commands::Init { input } => commands::cmd_init(&input).map(|()| ExitCode::SUCCESS),
        Commands::Check => commands::cmd_check(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(RUNTIME_ERROR)
        },
    }
}
