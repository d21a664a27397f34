//! Requests in, normalized results out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::MinorUnits;
use crate::error::{WalletError, WalletResult};

/// One of the three domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransactionRequest {
    #[serde(rename_all = "camelCase")]
    RegisterUser { risk_profile: u8 },
    #[serde(rename_all = "camelCase")]
    InvestInAsset { asset_id: String, amount_minor_units: MinorUnits },
    #[serde(rename_all = "camelCase")]
    ContributeToPool { pool_id: String, amount_minor_units: MinorUnits },
}

impl TransactionRequest {
    pub fn register_user(risk_profile: u8) -> Self {
        Self::RegisterUser { risk_profile }
    }

    pub fn invest_in_asset(asset_id: impl Into<String>, amount: impl Into<MinorUnits>) -> Self {
        Self::InvestInAsset { asset_id: asset_id.into(), amount_minor_units: amount.into() }
    }

    pub fn contribute_to_pool(pool_id: impl Into<String>, amount: impl Into<MinorUnits>) -> Self {
        Self::ContributeToPool { pool_id: pool_id.into(), amount_minor_units: amount.into() }
    }

    /// Decode a request from its JSON form. Negative or fractional amounts
    /// fail here, before anything else looks at the request.
    pub fn from_json(value: Value) -> WalletResult<Self> {
        let request: Self = serde_json::from_value(value).map_err(|e| WalletError::InvalidRequest(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    /// Structural checks only; minimums and capacity belong to the caller.
    pub fn validate(&self) -> WalletResult<()> {
        match self {
            Self::RegisterUser { .. } => Ok(()),
            Self::InvestInAsset { asset_id, .. } => require_id("assetId", asset_id),
            Self::ContributeToPool { pool_id, .. } => require_id("poolId", pool_id),
        }
    }

    pub fn amount(&self) -> Option<MinorUnits> {
        match self {
            Self::RegisterUser { .. } => None,
            Self::InvestInAsset { amount_minor_units, .. } | Self::ContributeToPool { amount_minor_units, .. } => {
                Some(*amount_minor_units)
            }
        }
    }
}

fn require_id(field: &str, id: &str) -> WalletResult<()> {
    if id.trim().is_empty() {
        return Err(WalletError::InvalidRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxStatus {
    Success,
    Failure,
    Unknown(String),
}

impl TxStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TxStatus::Success => "success",
            TxStatus::Failure => "failure",
            TxStatus::Unknown(s) => s,
        }
    }
}

impl From<String> for TxStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => TxStatus::Success,
            "failure" => TxStatus::Failure,
            _ => TxStatus::Unknown(value),
        }
    }
}

impl From<TxStatus> for String {
    fn from(status: TxStatus) -> Self { status.as_str().to_string() }
}

/// Outcome of exactly one submission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResult {
    success: bool,
    digest: String,
    status: TxStatus,
    events: Vec<Value>,
}

impl TransactionResult {
    pub(crate) fn simulated(digest: String) -> Self {
        Self { success: true, digest, status: TxStatus::Success, events: Vec::new() }
    }

    /// Extract `{digest, status, events}` from whatever the provider returned.
    ///
    /// Status is read from `effects.status.status` (full execution response),
    /// then `effects.status`, then a top-level `status`.
    pub fn from_provider_response(raw: &Value) -> WalletResult<Self> {
        let digest = raw
            .get("digest")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| WalletError::MalformedProviderResponse("missing digest".into()))?;
        let status = raw
            .pointer("/effects/status/status")
            .and_then(Value::as_str)
            .or_else(|| raw.pointer("/effects/status").and_then(Value::as_str))
            .or_else(|| raw.get("status").and_then(Value::as_str))
            .ok_or_else(|| WalletError::MalformedProviderResponse("missing status".into()))?;
        let events = match raw.get("events") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(events)) => events.clone(),
            Some(_) => return Err(WalletError::MalformedProviderResponse("events is not a list".into())),
        };
        let status = TxStatus::from(status.to_string());
        Ok(Self { success: status == TxStatus::Success, digest: digest.to_string(), status, events })
    }

    pub fn success(&self) -> bool { self.success }
    pub fn digest(&self) -> &str { &self.digest }
    pub fn status(&self) -> &TxStatus { &self.status }
    pub fn events(&self) -> &[Value] { &self.events }
}
