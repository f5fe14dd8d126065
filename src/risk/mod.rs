//! Position risk classification.
//!
//! Pure functions over an immutable ledger and price snapshot.
//!
//! # Architecture
//!
//! ```text
//! +-----------------------------+
//! | &[Position] + PriceSnapshot |  <- inputs, never mutated
//! +-----------------------------+
//!               |
//!               v
//! +-----------------------------+
//! | Classifier (ZeroDebtPolicy) |  <- assess(): one PositionView per position
//! +-----------------------------+
//!       |          |        |
//!       v          v        v
//!  aggregate()   rank()   filter()
//!   Summary      sorted   PositionFilter
//! ```
//!
//! Re-running any operation on the same inputs yields bit-identical output.

mod category;
mod classifier;
mod summary;
mod view;

pub use category::{CategoryStyle, RiskCategory};
pub use classifier::{classify, classify_ratio, Availability, Classifier, PositionView, ZeroDebtPolicy};
pub use summary::{CategoryCounts, DistributionRow, Summary};
pub use view::{filter_views, rank_views, PositionFilter};
