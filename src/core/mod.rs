//! Pure services over ledger snapshots, plus the clock and path helpers they
//! share with the outer layers.

pub mod clock;
pub mod services;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
