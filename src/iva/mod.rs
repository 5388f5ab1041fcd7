//! VAT declarations: Modelo 303 (quarterly) and Modelo 390 (annual summary).
//!
//! # Example
//!
//! ```ignore
//! use tributa::iva::*;
//!
//! let q1 = build_303(&source, &declarant, 2024, Quarter::Q1, &VatInputs::default())?;
//! assert_eq!(q1.result_type(), ResultType::ToPay);
//!
//! let annual = build_390(&source, &declarant, 2024, &AnnualVatInputs::default())?;
//! assert_eq!(annual.quarters().len(), 4);
//! ```

mod modelo303;
mod modelo390;

pub use modelo303::{TierLine, VatDeclaration, VatInputs, build_303, compute_303};
pub use modelo390::{AnnualVatInputs, AnnualVatSummary, build_390, compute_390};
