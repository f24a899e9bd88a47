//! Audit hasher behind the simulated blockchain endpoint
//!
//! Digests include the timestamp they were taken at. The timestamp is
//! returned and stored alongside them, so any recorded row can be
//! re-hashed with [`AuditHasher::verify`].

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use shared::{AuditDigests, AuditReceipt};

/// Hex characters kept from the second digest
const TRANSACTION_HASH_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditHasher;

impl AuditHasher {
    /// Canonical timestamp form used inside the hash preimages
    pub fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Compute both digests for `content` and `address` at `at`
    pub fn digest(&self, content: &str, address: &str, at: &DateTime<Utc>) -> AuditDigests {
        let hashed_at = Self::format_timestamp(at);

        let data_hash = sha256_hex(&format!("{content}_{hashed_at}"));
        let full = sha256_hex(&format!("{data_hash}_{address}_{hashed_at}"));
        let transaction_hash = format!("0x{}", &full[..TRANSACTION_HASH_CHARS]);

        AuditDigests {
            data_hash,
            transaction_hash,
            hashed_at,
        }
    }

    /// Recompute the digests from the recorded timestamp and compare
    pub fn verify(&self, content: &str, address: &str, digests: &AuditDigests) -> bool {
        match DateTime::parse_from_rfc3339(&digests.hashed_at) {
            Ok(at) => self.digest(content, address, &at.with_timezone(&Utc)) == *digests,
            Err(_) => false,
        }
    }

    /// Wrap digests in a simulated chain receipt
    pub fn receipt<R: Rng + ?Sized>(&self, digests: AuditDigests, rng: &mut R) -> AuditReceipt {
        AuditReceipt {
            digests,
            block_number: rng.gen_range(1_000_000..2_000_000),
            gas_used: rng.gen_range(21_000..50_000),
            confirmation_time: "~15s".to_string(),
            storage_cost: format!("{:.4} ETH", rng.gen_range(0.001..0.01)),
        }
    }
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
