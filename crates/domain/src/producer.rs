//! Producer — a rural producer identified by a CPF or CNPJ.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{LedgerError, ValidationError};
use crate::field::{check_length, patched};
use crate::id::ProducerId;
use crate::time::{Timestamp, now};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;

/// A rural producer. `document` is unique across all producers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub id: ProducerId,
    pub document: Document,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Producer {
    /// Create a builder for constructing a [`Producer`].
    #[must_use]
    pub fn builder() -> ProducerBuilder {
        ProducerBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// The document is already validated by construction.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FieldLength`] when `name` is shorter than
    /// 3 or longer than 100 characters.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_length("name", &self.name, NAME_MIN_LEN, NAME_MAX_LEN)?;
        Ok(())
    }

    /// Produce the complete candidate record for a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedIdentifier`] when the patch carries
    /// a document that is not a valid CPF or CNPJ.
    pub fn merge(&self, patch: ProducerPatch) -> Result<Self, LedgerError> {
        let document = match patch.document {
            Some(raw) => Document::parse(&raw)?,
            None => self.document.clone(),
        };
        Ok(Self {
            id: self.id,
            document,
            name: patched(patch.name, &self.name),
            created_at: self.created_at,
            updated_at: now(),
        })
    }
}

/// Partial update of a [`Producer`]. The document is raw user input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProducerPatch {
    pub document: Option<String>,
    pub name: Option<String>,
}

/// Step-by-step builder for [`Producer`].
#[derive(Debug, Default)]
pub struct ProducerBuilder {
    id: Option<ProducerId>,
    document: Option<String>,
    name: Option<String>,
}

impl ProducerBuilder {
    #[must_use]
    pub fn id(mut self, id: ProducerId) -> Self {
        self.id = Some(id);
        self
    }

    /// Raw CPF / CNPJ; separators are allowed and stripped on build.
    #[must_use]
    pub fn document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into().trim().to_string());
        self
    }

    /// Consume the builder, validate, and return a [`Producer`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedIdentifier`] if the document is
    /// missing or invalid, or [`ValidationError::FieldLength`] for a bad name.
    pub fn build(self) -> Result<Producer, LedgerError> {
        let document = self
            .document
            .as_deref()
            .map_or(Err(ValidationError::MalformedIdentifier), Document::parse)?;
        let ts = now();
        let producer = Producer {
            id: self.id.unwrap_or_default(),
            document,
            name: self.name.unwrap_or_default(),
            created_at: ts,
            updated_at: ts,
        };
        producer.validate()?;
        Ok(producer)
    }
}
