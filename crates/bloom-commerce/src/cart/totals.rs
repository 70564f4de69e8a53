//! Derived cart totals.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Totals derived from the current cart contents.
///
/// Always recomputed from the lines, never cached; carts are small.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of quantities across all lines.
    pub total_items: u32,
    /// Sum of price × quantity across all lines.
    pub total_amount: Money,
}

impl CartTotals {
    /// Check if there is anything to check out.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}
