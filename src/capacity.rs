//! Approximate size of the managed subtree against a storage budget.

use serde::Serialize;

use crate::model::{ONE_GIB, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CapacityMeter {
    pub used_bytes: u64,
    pub budget_bytes: u64,
}

impl CapacityMeter {
    /// Sum of file sizes; when the listing carries no sizes at all, fall back to the
    /// repository size reported by the remote (KiB).
    pub fn from_snapshot(snapshot: &Snapshot, budget_bytes: u64) -> Self {
        let summed = snapshot.total_file_bytes();
        let used_bytes = if summed > 0 {
            summed
        } else {
            snapshot.repo.size_kib.saturating_mul(1024)
        };
        Self {
            used_bytes,
            budget_bytes,
        }
    }

    pub fn one_gib(snapshot: &Snapshot) -> Self {
        Self::from_snapshot(snapshot, ONE_GIB)
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.budget_bytes.saturating_sub(self.used_bytes)
    }

    /// Fill percentage, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.budget_bytes == 0 {
            return 100.0;
        }
        (self.used_bytes as f64 / self.budget_bytes as f64 * 100.0).min(100.0)
    }

    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            format_bytes(self.used_bytes),
            format_bytes(self.budget_bytes)
        )
    }
}

/// `0 B`, `512 B`, `1.50 KB`, `10.0 MB`, `100 GB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*} {}", decimals, value, UNITS[unit])
}

#[cfg(test)]
#[path = "tests/capacity_tests.rs"]
mod tests;
