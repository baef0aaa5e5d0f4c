//! Complexity records and their block-level aggregate.

use serde::{Deserialize, Serialize};

use crate::crypto::Digest;

/// Spent complexity of one transaction, as reported by
/// `GET /transactions/info/{id}`.
///
/// Transactions that never ran a script report `0`; older nodes omit the
/// field entirely, which is read as `0` too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityRecord {
    pub id: Digest,
    #[serde(default)]
    pub spent_complexity: u64,
}

impl ComplexityRecord {
    pub fn new(id: Digest, spent_complexity: u64) -> Self {
        Self {
            id,
            spent_complexity,
        }
    }
}

/// Per-transaction records of one block, in block order, plus their sum.
///
/// The total is accumulated as `u128`, wide enough that no realistic block
/// can overflow it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateResult {
    records: Vec<ComplexityRecord>,
    total: u128,
}

impl AggregateResult {
    pub fn new(records: Vec<ComplexityRecord>) -> Self {
        let total = records
            .iter()
            .map(|r| u128::from(r.spent_complexity))
            .sum();
        Self { records, total }
    }

    pub fn records(&self) -> &[ComplexityRecord] {
        &self.records
    }

    pub fn total(&self) -> u128 {
        self.total
    }

    /// Records with non-zero complexity, in block order.
    pub fn non_zero(&self) -> impl Iterator<Item = &ComplexityRecord> {
        self.records.iter().filter(|r| r.spent_complexity > 0)
    }
}
