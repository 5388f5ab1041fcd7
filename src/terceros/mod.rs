//! Third-party operations: Modelo 347 and its disclosure threshold.
//!
//! # Example
//!
//! ```ignore
//! use tributa::terceros::*;
//!
//! let report = build_347(&source, &declarant, 2024)?;
//! for c in report.counterparties() {
//!     println!("{} {} {}", c.operation.code(), c.name, c.annual_total);
//! }
//! ```

mod modelo347;
mod threshold;

pub use modelo347::{
    DeclaredCounterparty, OperationCode, ThirdPartyReport, build_347, compute_347,
};
pub use threshold::{THIRD_PARTY_THRESHOLD, ThresholdCheck, check_threshold, qualifies};
