//! Catalog - the platform's asset classes and investment pools
//!
//! The listing is fixed seed data until on-chain queries exist. The
//! `check_*` methods are the caller-side business rules that run before a
//! request ever reaches the gateway (which only checks structure).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::MinorUnits;
use crate::gateway::TransactionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RiskLevel {
    Conservative = 1,
    Moderate = 2,
    Aggressive = 3,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Conservative => "Conservative",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Aggressive => "Aggressive",
        }
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self { level as u8 }
}

impl TryFrom<u8> for RiskLevel {
    type Error = String;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RiskLevel::Conservative),
            2 => Ok(RiskLevel::Moderate),
            3 => Ok(RiskLevel::Aggressive),
            other => Err(format!("unknown risk level {other}")),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{0} is not accepting investments")]
    Inactive(String),
    #[error("Minimum investment is {}", .0.display())]
    BelowMinimumInvestment(MinorUnits),
    #[error("Only {} units are available", .0)]
    InsufficientSupply(u64),
    #[error("Minimum contribution is {}", .0.display())]
    BelowMinimumContribution(MinorUnits),
    #[error("Maximum contribution is {}", .0.display())]
    AboveCapacity(MinorUnits),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClass {
    pub id: String,
    pub name: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub total_supply: u64,
    pub available_supply: u64,
    pub price_per_unit: MinorUnits,
    pub min_investment: MinorUnits,
    /// Basis points (100 = 1%).
    pub creator_fee_bps: u32,
    pub is_active: bool,
}

impl AssetClass {
    /// Validate `amount` and build the gateway request for it.
    pub fn check_investment(&self, amount: MinorUnits) -> Result<TransactionRequest, CatalogError> {
        if !self.is_active {
            return Err(CatalogError::Inactive(self.name.clone()));
        }
        if amount < self.min_investment {
            return Err(CatalogError::BelowMinimumInvestment(self.min_investment));
        }
        if self.price_per_unit.get() > 0 && amount.get() / self.price_per_unit.get() > self.available_supply {
            return Err(CatalogError::InsufficientSupply(self.available_supply));
        }
        Ok(TransactionRequest::invest_in_asset(self.id.clone(), amount))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub target_size: MinorUnits,
    pub current_size: MinorUnits,
    pub min_contribution: MinorUnits,
    /// Basis points (2000 = 20%).
    pub returns_bps: u32,
    pub is_active: bool,
}

impl InvestmentPool {
    pub fn remaining_capacity(&self) -> MinorUnits {
        self.target_size.checked_sub(self.current_size).unwrap_or(MinorUnits::ZERO)
    }

    /// Percentage of the target already raised, 0..=100.
    pub fn progress_percent(&self) -> u8 {
        if self.target_size.is_zero() {
            return 100;
        }
        (u128::from(self.current_size.get()) * 100 / u128::from(self.target_size.get())).min(100) as u8
    }

    pub fn check_contribution(&self, amount: MinorUnits) -> Result<TransactionRequest, CatalogError> {
        if !self.is_active {
            return Err(CatalogError::Inactive(self.name.clone()));
        }
        if amount < self.min_contribution {
            return Err(CatalogError::BelowMinimumContribution(self.min_contribution));
        }
        let capacity = self.remaining_capacity();
        if amount > capacity {
            return Err(CatalogError::AboveCapacity(capacity));
        }
        Ok(TransactionRequest::contribute_to_pool(self.id.clone(), amount))
    }
}

pub fn asset_classes() -> Vec<AssetClass> {
    vec![
        AssetClass {
            id: "0x123".into(),
            name: "Real Estate Fund".into(),
            description: "Diversified real estate investments across commercial properties".into(),
            risk_level: RiskLevel::Moderate,
            total_supply: 100_000,
            available_supply: 75_000,
            price_per_unit: MinorUnits(1_000_000),
            min_investment: MinorUnits(1_000_000),
            creator_fee_bps: 100,
            is_active: true,
        },
        AssetClass {
            id: "0x456".into(),
            name: "Tech Stocks".into(),
            description: "Curated portfolio of high-growth technology companies".into(),
            risk_level: RiskLevel::Aggressive,
            total_supply: 50_000,
            available_supply: 30_000,
            price_per_unit: MinorUnits(500_000),
            min_investment: MinorUnits(500_000),
            creator_fee_bps: 150,
            is_active: true,
        },
        AssetClass {
            id: "0x789".into(),
            name: "Conservative Bond Fund".into(),
            description: "Low-risk bonds and fixed income securities".into(),
            risk_level: RiskLevel::Conservative,
            total_supply: 200_000,
            available_supply: 180_000,
            price_per_unit: MinorUnits(250_000),
            min_investment: MinorUnits(250_000),
            creator_fee_bps: 50,
            is_active: true,
        },
    ]
}

pub fn investment_pools() -> Vec<InvestmentPool> {
    vec![
        InvestmentPool {
            id: "0xabc".into(),
            name: "Startup Accelerator Pool".into(),
            description: "Collective investment in early-stage startups".into(),
            risk_level: RiskLevel::Aggressive,
            target_size: MinorUnits(10_000_000_000),
            current_size: MinorUnits(2_500_000_000),
            min_contribution: MinorUnits(100_000_000),
            returns_bps: 2000,
            is_active: true,
        },
        InvestmentPool {
            id: "0xdef".into(),
            name: "Green Energy Fund".into(),
            description: "Investments in sustainable energy projects".into(),
            risk_level: RiskLevel::Moderate,
            target_size: MinorUnits(5_000_000_000),
            current_size: MinorUnits(1_000_000_000),
            min_contribution: MinorUnits(50_000_000),
            returns_bps: 1200,
            is_active: true,
        },
    ]
}

pub fn find_asset(id: &str) -> Option<AssetClass> {
    asset_classes().into_iter().find(|a| a.id == id)
}

pub fn find_pool(id: &str) -> Option<InvestmentPool> {
    investment_pools().into_iter().find(|p| p.id == id)
}
