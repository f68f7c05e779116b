//! Drives one batch from parsed payments to submission.
//!
//! [`BatchRun`] checks every recipient against the payee directory, asks the
//! operator to confirm each payment and then the whole batch, and only then
//! hands the batch to the API.

use std::collections::HashSet;
use std::io::Write;

use crate::amount::UsdcAmount;
use crate::error::{ApiError, Error, RunError};
use crate::payment::{Payment, RiseId};
use crate::prompt::Confirm;
use crate::report::Reporter;
use crate::rise_client::PaymentsApi;

pub struct BatchRun<'a, A: ?Sized, W> {
    api: &'a A,
    confirm: &'a mut dyn Confirm,
    reporter: Reporter<W>,
    entity: RiseId,
}

impl<'a, A, W> BatchRun<'a, A, W>
where
    A: PaymentsApi + ?Sized,
    W: Write,
{
    pub fn new(api: &'a A, confirm: &'a mut dyn Confirm, reporter: Reporter<W>, entity: RiseId) -> Self {
        Self {
            api,
            confirm,
            reporter,
            entity,
        }
    }

    /// Run the confirmation flow and submit the batch.
    ///
    /// Fails without contacting the batch endpoint if any recipient is not a
    /// payee or the operator declines any prompt.
    pub async fn execute(mut self, payments: &[Payment]) -> Result<(), Error> {
        self.check_recipients(payments)?;
        let total = UsdcAmount::checked_total(payments.iter().map(Payment::amount))
            .ok_or(ApiError::AmountOverflow)?;

        for (i, payment) in payments.iter().enumerate() {
            let payee = self.api.get_payee(payment.recipient())?;
            self.reporter
                .payment_table(i + 1, payment, &payee.full_name())
                .map_err(RunError::from)?;
            self.require("Confirm payment?")?;
            tracing::debug!(recipient = %payment.recipient(), "Payment confirmed");
        }

        self.reporter
            .batch_summary(&self.entity, payments, total)
            .map_err(RunError::from)?;
        self.require("Confirm payment?")?;

        self.api.batch_payment(payments).await?;

        self.reporter.done(&self.entity).map_err(RunError::from)?;
        Ok(())
    }

    fn check_recipients(&self, payments: &[Payment]) -> Result<(), RunError> {
        let allowed: HashSet<&RiseId> = self.api.allowed_recipients().iter().collect();

        match payments.iter().find(|p| !allowed.contains(p.recipient())) {
            Some(payment) => Err(RunError::NotAPayee(payment.recipient().clone())),
            None => Ok(()),
        }
    }

    fn require(&mut self, question: &str) -> Result<(), RunError> {
        if self.confirm.confirm(question)? {
            Ok(())
        } else {
            Err(RunError::Cancelled)
        }
    }
}
