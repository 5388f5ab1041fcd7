use serde::{Deserialize, Serialize};

use super::error::DeclaracionError;
use super::tax_id::{normalize_tax_id, validate_tax_id};
use super::types::Declarant;

/// Configuration shared by every declaration of one taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationConfig {
    /// NIF / CIF / NIE of the declarant.
    pub declarant_tax_id: String,
    /// Surname and name, or company name.
    pub declarant_name: String,
    /// Program version rendered in the `<AUX>` block, 4 chars.
    pub program_version: String,
    /// Tax id of the software developer for the `<AUX>` block.
    /// Falls back to the declarant's tax id.
    pub developer_tax_id: Option<String>,
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            declarant_tax_id: String::new(),
            declarant_name: String::new(),
            program_version: "1.00".into(),
            developer_tax_id: None,
        }
    }
}

impl DeclarationConfig {
    /// Load a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DeclaracionError> {
        serde_json::from_str(json).map_err(|e| DeclaracionError::Config(e.to_string()))
    }

    /// Check that the declarant tax id is valid and the name is present.
    pub fn validate(&self) -> Result<(), DeclaracionError> {
        validate_tax_id(&self.declarant_tax_id)
            .map_err(|e| DeclaracionError::Config(e.to_string()))?;
        if self.declarant_name.trim().is_empty() {
            return Err(DeclaracionError::Config(
                "declarant name must not be empty".into(),
            ));
        }
        if let Some(dev) = &self.developer_tax_id {
            validate_tax_id(dev).map_err(|e| DeclaracionError::Config(e.to_string()))?;
        }
        Ok(())
    }

    /// The filing taxpayer, with a normalized tax id.
    pub fn declarant(&self) -> Declarant {
        Declarant::new(&self.declarant_tax_id, self.declarant_name.clone())
    }

    /// Tax id printed in the `<AUX>` block.
    pub fn aux_tax_id(&self) -> String {
        normalize_tax_id(
            self.developer_tax_id
                .as_deref()
                .unwrap_or(&self.declarant_tax_id),
        )
    }
}

/// Builder for [`DeclarationConfig`].
///
/// # Example
///
/// ```
/// use tributa::core::DeclarationConfigBuilder;
///
/// let config = DeclarationConfigBuilder::new("12345678Z", "GARCIA LOPEZ JUAN")
///     .program_version("2.10")
///     .build();
/// assert_eq!(config.declarant().tax_id, "12345678Z");
/// ```
pub struct DeclarationConfigBuilder {
    config: DeclarationConfig,
}

impl DeclarationConfigBuilder {
    /// Create a builder with the declarant's tax id and name.
    pub fn new(tax_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            config: DeclarationConfig {
                declarant_tax_id: tax_id.into(),
                declarant_name: name.into(),
                ..Default::default()
            },
        }
    }

    /// Set the 4-char program version.
    pub fn program_version(mut self, version: impl Into<String>) -> Self {
        self.config.program_version = version.into();
        self
    }

    /// Set the developer tax id for the `<AUX>` block.
    pub fn developer_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.config.developer_tax_id = Some(tax_id.into());
        self
    }

    pub fn build(self) -> DeclarationConfig {
        self.config
    }
}
