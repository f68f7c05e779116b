//! CSV ingestion of outgoing payments.
//!
//! Each row carries an `outgoing_amount` in dollars, an `outgoing_token` that
//! must be DAI, and a free-text `Description` holding exactly one recipient
//! address. Any bad row fails the whole file.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::amount::UsdcAmount;
use crate::error::IngestError;
use crate::payment::{Payment, RiseId};

/// The only source token accepted in the payments file.
pub const SUPPORTED_TOKEN: &str = "DAI";

const ADDRESS_HEX_DIGITS: usize = 40;

/// One row of the payments file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    outgoing_amount: String,
    outgoing_token: String,
    #[serde(rename = "Description")]
    description: String,
}

/// Read payments from a CSV file, preserving row order.
pub fn payments_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Payment>, IngestError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_payments(reader)
}

/// Read payments from any CSV source, preserving row order.
pub fn payments_from_reader<R: Read>(source: R) -> Result<Vec<Payment>, IngestError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    collect_payments(reader)
}

fn collect_payments<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Payment>, IngestError> {
    let mut payments = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        sanity_checks(&row)?;
        payments.push(Payment::new(
            find_rise_id(&row.description)?,
            payment_amount(&row.outgoing_amount)?,
        ));
    }

    if payments.is_empty() {
        return Err(IngestError::Empty);
    }
    if UsdcAmount::checked_total(payments.iter().map(Payment::amount)).is_none() {
        return Err(IngestError::TotalOverflow);
    }

    tracing::debug!(count = payments.len(), "Payments file parsed");
    Ok(payments)
}

fn sanity_checks(row: &CsvRow) -> Result<(), IngestError> {
    if row.outgoing_token != SUPPORTED_TOKEN {
        return Err(IngestError::UnsupportedToken(row.outgoing_token.clone()));
    }
    Ok(())
}

/// Convert a DAI dollar amount into USDC smallest units.
pub fn payment_amount(amount: &str) -> Result<UsdcAmount, IngestError> {
    UsdcAmount::parse_usd(amount)
}

/// Extract the single recipient address mentioned in `text`.
///
/// Matches are `0x` followed by 40 hex digits of either case, scanned
/// left to right without overlap.
pub fn find_rise_id(text: &str) -> Result<RiseId, IngestError> {
    let mut matches = address_matches(text);

    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(RiseId::new(found)),
        (None, _) => Err(IngestError::RiseIdNotFound(text.to_string())),
        (Some(_), Some(_)) => Err(IngestError::MultipleRiseIds(text.to_string())),
    }
}

fn address_matches(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let len = ADDRESS_HEX_DIGITS + 2;
    let mut pos = 0;

    std::iter::from_fn(move || {
        while pos + len <= bytes.len() {
            let candidate = &bytes[pos..pos + len];
            if candidate.starts_with(b"0x") && candidate[2..].iter().all(u8::is_ascii_hexdigit) {
                let start = pos;
                pos += len;
                // All bytes are ASCII, so the slice sits on char boundaries.
                return Some(&text[start..start + len]);
            }
            pos += 1;
        }
        None
    })
}
