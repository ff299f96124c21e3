//! Point-in-time inventory availability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sku::SkuCode;

/// One SKU's availability as reported by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevel {
    pub sku_code: SkuCode,
    pub quantity: u32,
}

/// Availability per SKU at the moment the inventory service answered.
///
/// Built fresh for every orchestration and never cached; it is stale the
/// instant it is read. SKUs the service does not know are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    levels: HashMap<SkuCode, u32>,
}

impl InventorySnapshot {
    /// Builds a snapshot from the service's response.
    ///
    /// If the response repeats a SKU, the last entry wins.
    pub fn from_levels(levels: impl IntoIterator<Item = InventoryLevel>) -> Self {
        let mut map = HashMap::new();
        for level in levels {
            map.insert(level.sku_code, level.quantity);
        }
        Self { levels: map }
    }

    /// Available quantity for a SKU, or `None` if the service did not
    /// report it at all.
    pub fn available(&self, sku_code: &SkuCode) -> Option<u32> {
        self.levels.get(sku_code).copied()
    }

    /// Number of SKUs covered by the snapshot.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the snapshot covers no SKUs at all.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
