//! Audit log (simulated chain) types

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationResult, ensure_not_blank};

/// Body of `POST /api/blockchain/store`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRequest {
    pub data_content: String,
    pub wallet_address: String,
}

impl AuditRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        ensure_not_blank("data_content", &self.data_content)?;
        ensure_not_blank("wallet_address", &self.wallet_address)
    }
}

/// The two digests and the timestamp that went into them
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditDigests {
    pub data_hash: String,
    pub transaction_hash: String,
    pub hashed_at: String,
}

/// Response of a store call: digests plus a simulated receipt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditReceipt {
    #[serde(flatten)]
    pub digests: AuditDigests,
    pub block_number: u64,
    pub gas_used: u64,
    pub confirmation_time: String,
    pub storage_cost: String,
}
