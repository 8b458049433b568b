//! Inventory domain module: stock movements and the balance report.
//!
//! Movements are the only source of truth for stock levels. Balances are never
//! stored; they are derived on demand by [`balance::compute_balances`], a pure
//! function over snapshots of products, locations and movements.

pub mod balance;
pub mod movement;

pub use balance::{BalanceReport, BalanceRow, compute_balances};
pub use movement::{Movement, MovementKind, RecordMovement, parse_timestamp};
