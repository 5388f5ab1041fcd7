//! BOE tagged-text export for the tax authority's import tool.
//!
//! Every model is described by a static [`BoeSchema`] and rendered by the
//! single generic [`render`] function. Layouts for a model are compiled in
//! when that model's feature is enabled.
//!
//! # Example
//!
//! ```ignore
//! use tributa::boe;
//!
//! let file = boe::modelo_303(&declaration, &config);
//! std::fs::write(&file.file_name, &file.content)?;
//! ```

#[cfg(feature = "irpf")]
mod m130;
#[cfg(feature = "iva")]
mod m303;
#[cfg(feature = "terceros")]
mod m347;
#[cfg(feature = "iva")]
mod m390;
mod schema;
mod writer;

#[cfg(feature = "irpf")]
pub use m130::{SCHEMA_130, modelo_130};
#[cfg(feature = "iva")]
pub use m303::{SCHEMA_303, modelo_303};
#[cfg(feature = "terceros")]
pub use m347::{SCHEMA_347, modelo_347};
#[cfg(feature = "iva")]
pub use m390::{SCHEMA_390, modelo_390};
pub use schema::{
    Align, BoeSchema, EJERCICIO, FieldKind, FieldSpec, FieldValue, FieldValues, NIF, NOMBRE,
    PERIODO, PageSpec, values,
};
pub use writer::{BoeDeclaration, BoeFile, file_name, render, render_file};
