//! Operator-facing output: payment tables, the batch summary tree and the
//! final explorer link. Diagnostics go through `tracing`; this is what the
//! operator reads before confirming.

use std::io::{self, Write};

use crate::amount::UsdcAmount;
use crate::payment::{Payment, RiseId};

const EXPLORER_BASE: &str = "https://arbiscan.io/address";

pub struct Reporter<W> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Table describing one payment awaiting confirmation.
    pub fn payment_table(
        &mut self,
        index: usize,
        payment: &Payment,
        full_name: &str,
    ) -> io::Result<()> {
        let headers = ["#", "RiseId", "Full name", "Amount"];
        let row = [
            index.to_string(),
            payment.recipient().to_string(),
            full_name.to_string(),
            format!("{} $", payment.amount()),
        ];

        let widths: Vec<usize> = headers
            .iter()
            .zip(&row)
            .map(|(h, c)| h.chars().count().max(c.chars().count()))
            .collect();

        let line = |cells: [&str; 4]| {
            format!(
                "| {:<w0$} | {:<w1$} | {:<w2$} | {:>w3$} |",
                cells[0],
                cells[1],
                cells[2],
                cells[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )
        };
        let rule = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );

        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "{}", line(headers))?;
        writeln!(self.out, "{}", rule)?;
        writeln!(
            self.out,
            "{}",
            line([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()])
        )?;
        writeln!(self.out, "{}", rule)
    }

    /// Tree of every confirmed payment under the paying entity, then the total.
    pub fn batch_summary(
        &mut self,
        entity: &RiseId,
        payments: &[Payment],
        total: UsdcAmount,
    ) -> io::Result<()> {
        writeln!(self.out, "Check the batch summary:")?;
        writeln!(self.out, "{}", entity)?;
        for (i, payment) in payments.iter().enumerate() {
            let branch = if i + 1 == payments.len() { "└──" } else { "├──" };
            writeln!(
                self.out,
                "{} {} {} <- {} $",
                branch,
                i + 1,
                payment.recipient(),
                payment.amount()
            )?;
        }

        writeln!(self.out, "Total amount: {} $", total)
    }

    pub fn done(&mut self, entity: &RiseId) -> io::Result<()> {
        writeln!(
            self.out,
            "Check explorer for the transaction: {}",
            explorer_link(entity)
        )?;
        writeln!(self.out, "Done!")?;
        self.out.flush()
    }
}

/// Token-transfer page of the entity on Arbiscan.
pub fn explorer_link(entity: &RiseId) -> String {
    format!(
        "{}/{}#tokentxns",
        EXPLORER_BASE,
        entity.as_str().to_lowercase()
    )
}
