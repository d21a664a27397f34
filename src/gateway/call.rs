//! Provider-native calls addressed to the platform's `core` module.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::request::TransactionRequest;
use crate::amount::MinorUnits;
use crate::config::ChainConfig;

pub const MODULE: &str = "core";

/// The three fixed entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    RegisterUser,
    InvestInAsset,
    ContributeToPool,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::RegisterUser => "register_user",
            Endpoint::InvestInAsset => "invest_in_asset",
            Endpoint::ContributeToPool => "contribute_to_pool",
        }
    }

    pub fn of(request: &TransactionRequest) -> Self {
        match request {
            TransactionRequest::RegisterUser { .. } => Endpoint::RegisterUser,
            TransactionRequest::InvestInAsset { .. } => Endpoint::InvestInAsset,
            TransactionRequest::ContributeToPool { .. } => Endpoint::ContributeToPool,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Positional argument of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CallArg {
    /// Plain value encoded by the provider.
    Pure { value: u64 },
    /// Reference to an on-chain object by id.
    Object { id: String },
    /// Coin split off the gas coin, in minor units.
    SplitGas { amount: MinorUnits },
}

/// What the provider is asked to sign and execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    /// `{package}::core::{endpoint}`
    pub target: String,
    pub endpoint: Endpoint,
    pub arguments: Vec<CallArg>,
    pub show_effects: bool,
    pub show_events: bool,
}

impl MoveCall {
    /// Build the call for `request`. Amounts are already minor units and
    /// are passed through untouched.
    pub fn build(chain: &ChainConfig, request: &TransactionRequest) -> Self {
        let endpoint = Endpoint::of(request);
        let arguments = match request {
            TransactionRequest::RegisterUser { risk_profile } => vec![CallArg::Pure { value: u64::from(*risk_profile) }],
            TransactionRequest::InvestInAsset { asset_id, amount_minor_units } => vec![
                CallArg::Object { id: asset_id.clone() },
                CallArg::SplitGas { amount: *amount_minor_units },
                CallArg::Object { id: chain.platform_id.clone() },
            ],
            TransactionRequest::ContributeToPool { pool_id, amount_minor_units } => vec![
                CallArg::Object { id: pool_id.clone() },
                CallArg::SplitGas { amount: *amount_minor_units },
            ],
        };
        Self {
            target: format!("{}::{}::{}", chain.package_id, MODULE, endpoint),
            endpoint,
            arguments,
            show_effects: true,
            show_events: true,
        }
    }
}
