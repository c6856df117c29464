//! Teller CLI - console banking over a local store

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{accounts, audit, doctor, login, open, statement, status};

/// Teller - console banking over a local store
#[derive(Parser)]
#[command(name = "teller", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account
    Open {
        /// Account holder name
        #[arg(long)]
        name: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<String>,
        /// City
        #[arg(long)]
        city: Option<String>,
        /// Street address
        #[arg(long)]
        address: Option<String>,
        /// Contact number (10 digits)
        #[arg(long)]
        contact: Option<String>,
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Opening deposit
        #[arg(long)]
        deposit: Option<String>,
        /// Password (or set TELLER_PASSWORD)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all accounts
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in to an account and run an interactive session
    Login {
        /// Account number
        account: Option<String>,
        /// Password (or set TELLER_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Export an account statement
    Statement {
        /// Account number
        account: Option<String>,
        /// Password (or set TELLER_PASSWORD)
        #[arg(long)]
        password: Option<String>,
        /// Write CSV to this path instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run store health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the audit trail
    Audit {
        #[command(subcommand)]
        command: audit::AuditCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Open {
            name,
            date_of_birth,
            city,
            address,
            contact,
            email,
            deposit,
            password,
            json,
        } => open::run(
            name,
            date_of_birth,
            city,
            address,
            contact,
            email,
            deposit,
            password,
            json,
        ),
        Commands::Accounts { json } => accounts::run(json),
        Commands::Login { account, password } => login::run(account, password),
        Commands::Statement {
            account,
            password,
            output,
            json,
        } => statement::run(account, password, output, json),
        Commands::Status { json } => status::run(json),
        Commands::Doctor { verbose, json } => doctor::run(verbose, json),
        Commands::Audit { command } => audit::run(command),
    }
}
