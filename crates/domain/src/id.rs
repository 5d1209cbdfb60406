//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }

            /// Parse user input, mapping failures to [`ValidationError::InvalidId`].
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::InvalidId`] when `s` is not a UUID.
            pub fn parse(s: &str) -> Result<Self, ValidationError> {
                Self::from_str(s).map_err(|_| ValidationError::InvalidId(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Producer`](crate::producer::Producer).
    ProducerId
);

define_id!(
    /// Unique identifier for a [`Farm`](crate::farm::Farm).
    FarmId
);

define_id!(
    /// Unique identifier for a [`Crop`](crate::crop::Crop).
    CropId
);

define_id!(
    /// Unique identifier for a [`Harvest`](crate::harvest::Harvest).
    HarvestId
);

define_id!(
    /// Unique identifier for a [`CropPlanting`](crate::planting::CropPlanting).
    PlantingId
);
