//! CLI entry point.
//!
//! Usage: `ENTITY_RISE_ID=0x... rise-batch-pay <payments.csv>`

use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process;

use rise_batch_pay::{Config, TerminalPrompt};

#[derive(Parser)]
#[command(name = "rise-batch-pay")]
#[command(about = "Send a batch of DAI payments to Rise payees", long_about = None)]
struct Cli {
    /// CSV with outgoing_amount, outgoing_token and Description columns
    payments_csv: PathBuf,
}

#[tokio::main]
async fn main() {
    rise_batch_pay::init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    if !cli.payments_csv.exists() {
        tracing::error!("File {} does not exist", cli.payments_csv.display());
        process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    };

    let mut prompt = TerminalPrompt::stdio();
    if let Err(e) = rise_batch_pay::run(&config, &cli.payments_csv, &mut prompt, std::io::stdout()).await {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
