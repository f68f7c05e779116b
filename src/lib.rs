//! Batch DAI payouts through the Rise payments platform.
//!
//! Reads a CSV of outgoing payments, checks every recipient against the
//! organization's payee directory, asks the operator to confirm, has a local
//! Frame wallet sign the batch and submits it to the Rise API.
//!
//! # Example
//!
//! ```no_run
//! use rise_batch_pay::{Config, TerminalPrompt};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let mut prompt = TerminalPrompt::stdio();
//!     rise_batch_pay::run(&config, "payments.csv", &mut prompt, std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

use std::io::Write;
use std::path::Path;

mod amount;
mod config;
mod datasource;
mod error;
mod logging;
mod orchestrator;
mod payment;
mod prompt;
mod report;
mod rise_client;
mod schema;
mod signer;

pub use amount::{USDC_DECIMALS, UsdcAmount};
pub use config::{
    Config, DEFAULT_FRAME_URL, PRODUCTION_API_BASE, STAGING_API_BASE, SignerConfig,
};
pub use datasource::{
    SUPPORTED_TOKEN, find_rise_id, payment_amount, payments_from_csv, payments_from_reader,
};
pub use error::{ApiError, ConfigError, Error, IngestError, RunError, SignerError};
pub use logging::init as init_logging;
pub use orchestrator::BatchRun;
pub use payment::{Payment, RiseId};
pub use prompt::{Confirm, TerminalPrompt};
pub use report::{Reporter, explorer_link};
pub use rise_client::{PaymentsApi, RiseApi};
pub use schema::{Team, TeamMember};
pub use signer::{FrameSigner, Signer};

/// Pay everything listed in `payments_path` on behalf of `config.entity`.
///
/// Steps run strictly in order: connect the signer, sign in to Rise and load
/// payees, parse the file, confirm with the operator, submit.
pub async fn run<P: AsRef<Path>, W: Write>(
    config: &Config,
    payments_path: P,
    confirm: &mut dyn Confirm,
    out: W,
) -> Result<(), Error> {
    tracing::info!(entity = %config.entity, "Connecting to the entity");

    let signer = FrameSigner::connect(&config.signer, confirm).await?;
    let api = RiseApi::connect(
        &config.api_base,
        config.entity.clone(),
        signer,
        config.http_timeout,
    )
    .await?;

    tracing::info!(file = %payments_path.as_ref().display(), "Using payments file");
    let payments = payments_from_csv(payments_path)?;

    BatchRun::new(&api, confirm, Reporter::new(out), config.entity.clone())
        .execute(&payments)
        .await
}
