//! Wire schemas for the Rise payments API.
//!
//! Every successful response wraps its payload in a top-level `data` field;
//! error responses may carry a `message`. Both are handled here so the client
//! only deals with typed values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::UsdcAmount;
use crate::error::ApiError;
use crate::payment::{Payment, RiseId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(rename = "riseId")]
    pub rise_id: RiseId,
}

/// Team member eligible to be paid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamMember {
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub middlename: Option<String>,
    #[serde(default)]
    pub lastname: String,
    #[serde(rename = "riseId")]
    pub rise_id: RiseId,
}

impl TeamMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// `GET /auth/api/siwe` payload.
#[derive(Debug, Deserialize)]
pub struct AuthChallenge {
    pub message: String,
}

/// `POST /auth/api/siwe` body.
#[derive(Debug, Serialize)]
pub struct SignIn<'a> {
    pub wallet: &'a str,
    pub message: &'a str,
    pub signature: &'a str,
}

/// `POST /auth/api/siwe` payload.
#[derive(Debug, Deserialize)]
pub struct AuthToken {
    pub token: String,
}

/// `PUT /payments/batch-pay` body.
#[derive(Debug, Serialize)]
pub struct BatchPaymentRequest<'a> {
    pub wallet: &'a str,
    pub rise_id: &'a RiseId,
    /// Sum of all payment amounts, as a decimal string.
    pub total_amount: String,
    pub payments: &'a [Payment],
}

impl<'a> BatchPaymentRequest<'a> {
    pub fn new(
        wallet: &'a str,
        rise_id: &'a RiseId,
        payments: &'a [Payment],
    ) -> Result<Self, ApiError> {
        let total = UsdcAmount::checked_total(payments.iter().map(Payment::amount))
            .ok_or(ApiError::AmountOverflow)?;
        Ok(Self {
            wallet,
            rise_id,
            total_amount: total.to_decimal_string(),
            payments,
        })
    }
}

/// `POST /payments/batch-pay` body.
#[derive(Debug, Serialize)]
pub struct SignedBatchPayment<'a> {
    #[serde(flatten)]
    pub batch: &'a BatchPaymentRequest<'a>,
    pub request: &'a Value,
    pub signature: &'a str,
}

/// `PUT /payments/batch-pay` payload: EIP-712 typed data to be signed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPaymentMessage {
    typed_data: Value,
}

impl BatchPaymentMessage {
    pub fn from_typed_data(typed_data: Value) -> Result<Self, ApiError> {
        match typed_data.get("message") {
            Some(Value::Object(_)) => Ok(Self { typed_data }),
            _ => Err(ApiError::Decode(format!(
                "batch payment response has no `message` object: {}",
                typed_data
            ))),
        }
    }

    /// Full typed-data document handed to the signer.
    pub fn typed_data(&self) -> &Value {
        &self.typed_data
    }

    /// The `message` member echoed back on submission.
    pub fn message(&self) -> &Value {
        &self.typed_data["message"]
    }
}

/// Unwrap the `data` envelope of a successful response.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::Decode(String::from_utf8_lossy(body).into_owned()))?;

    let data = match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data"),
        other => {
            let pretty = serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string());
            return Err(ApiError::MissingData(pretty));
        }
    };

    serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Build the error for a non-2xx response, quoting the server's `message`
/// when the body is JSON and carries one.
pub fn status_error(method: &str, url: &str, body: &[u8]) -> ApiError {
    let mut msg = format!("Unable to {} {}", method, url);

    let server_message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").cloned());
    match server_message {
        Some(Value::String(s)) => msg = format!("{}: {}", msg, s),
        Some(other) if !other.is_null() => msg = format!("{}: {}", msg, other),
        _ => {}
    }

    ApiError::Status(msg)
}
