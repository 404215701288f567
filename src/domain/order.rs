//! User-defined display order.
//!
//! A saved order is a hint, not an authority: entities it names are placed
//! in the saved sequence, entities it does not name follow in their original
//! relative order, and names that no longer match anything are ignored.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::host::Host;
use super::id::{HostId, InstanceId};
use super::instance::Instance;

/// Anything that can be placed by a saved order.
pub trait OrderKey {
    /// Identifier matched against saved order entries.
    fn order_key(&self) -> &str;
}

impl OrderKey for Host {
    fn order_key(&self) -> &str {
        self.id.as_str()
    }
}

impl OrderKey for Instance {
    fn order_key(&self) -> &str {
        self.id.as_str()
    }
}

impl OrderKey for HostId {
    fn order_key(&self) -> &str {
        self.as_str()
    }
}

impl OrderKey for InstanceId {
    fn order_key(&self) -> &str {
        self.as_str()
    }
}

impl OrderKey for String {
    fn order_key(&self) -> &str {
        self
    }
}

/// Order `items` according to `saved`.
///
/// Items named in `saved` come first, in saved order (first occurrence wins
/// for duplicated names); the rest keep their input order. An empty saved
/// order returns the input untouched.
#[must_use]
pub fn apply_order<T: OrderKey>(mut items: Vec<T>, saved: &[String]) -> Vec<T> {
    if saved.is_empty() {
        return items;
    }

    let mut rank: HashMap<&str, usize> = HashMap::with_capacity(saved.len());
    for (position, id) in saved.iter().enumerate() {
        rank.entry(id.as_str()).or_insert(position);
    }

    // Stable sort: unranked items share usize::MAX and keep input order.
    items.sort_by_key(|item| rank.get(item.order_key()).copied().unwrap_or(usize::MAX));
    items
}

/// Direction of a single-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(format!("unknown direction '{other}', expected 'up' or 'down'")),
        }
    }
}

/// Move `target` one step within the effective order of `siblings`.
///
/// The effective order is `siblings` ordered by `saved`, so entities the
/// saved order has never seen are already at the tail before the swap.
/// Returns the full new order, or `None` when the target is not a sibling
/// or already sits at the boundary in `direction`.
#[must_use]
pub fn move_within(
    siblings: Vec<String>,
    saved: &[String],
    target: &str,
    direction: Direction,
) -> Option<Vec<String>> {
    let mut order = apply_order(siblings, saved);
    let index = order.iter().position(|id| id == target)?;
    let swap_with = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };
    if swap_with >= order.len() {
        return None;
    }
    order.swap(index, swap_with);
    Some(order)
}
