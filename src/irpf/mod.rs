//! Income-tax advance payment: Modelo 130.
//!
//! # Example
//!
//! ```ignore
//! use tributa::irpf::*;
//!
//! // The first-year flag is always explicit.
//! let inputs = IncomeTaxInputs::new(false);
//! let q2 = build_130(&source, &declarant, 2024, Quarter::Q2, &inputs)?;
//! println!("{} {}", q2.total(), q2.result_type());
//! ```

mod modelo130;

pub use modelo130::{
    ADVANCE_PAYMENT_RATE, FIRST_YEAR_RELIEF_CAP, FIRST_YEAR_RELIEF_RATE, IncomeTaxAdvance,
    IncomeTaxInputs, PriorPayments, build_130, compute_130,
};
