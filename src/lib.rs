//! # tributa
//!
//! Spanish tax declarations from business records: Modelo 303 (quarterly
//! VAT), Modelo 130 (quarterly IRPF advance), Modelo 390 (annual VAT
//! summary) and Modelo 347 (third-party operations), exported in the BOE
//! tagged-text format read by the AEAT import tool.
//!
//! All monetary values use [`rust_decimal::Decimal`], rounded half away from
//! zero to two decimals. Records come from a [`RecordSource`]; a failing
//! source is reported as [`DeclaracionError::DataUnavailable`] and never
//! turned into an empty declaration.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tributa::core::*;
//! use rust_decimal_macros::dec;
//!
//! let sale = FinancialRecordBuilder::new(
//!     RecordKind::IssuedInvoice,
//!     NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
//! )
//! .base(dec!(1000))
//! .vat_rate(dec!(21))
//! .build();
//!
//! let period = DeclarationPeriod::quarterly(2024, Quarter::Q1).unwrap();
//! let totals = aggregate(&[sale], period.range()).unwrap();
//! assert_eq!(totals.tier(VatTier::General).vat, dec!(210.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Records, periods, aggregation, record source, config |
//! | `iva` | Modelo 303 and Modelo 390 |
//! | `irpf` | Modelo 130 |
//! | `terceros` | Modelo 347 and the disclosure threshold |
//! | `boe` | BOE file export for the enabled models |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "iva")]
pub mod iva;

#[cfg(feature = "irpf")]
pub mod irpf;

#[cfg(feature = "terceros")]
pub mod terceros;

#[cfg(feature = "boe")]
pub mod boe;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
