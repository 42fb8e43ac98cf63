use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// The 36 foot locations of the reference naming scheme, in region order.
pub const FOOT_LOCATIONS: [&str; 36] = [
    "Dorsal Toe 1",
    "Dorsal Toe 2",
    "Dorsal Toe 3",
    "Dorsal Toe 4",
    "Dorsal Toe 5",
    "Dorsal MTP 1",
    "Dorsal MTP 2",
    "Dorsal MTP 3",
    "Dorsal MTP 4",
    "Dorsal MTP 5",
    "Dorsal Midfoot",
    "Dorsal Ankle",
    "Plantar Toe 1",
    "Plantar Toe 2",
    "Plantar Toe 3",
    "Plantar Toe 4",
    "Plantar Toe 5",
    "Plantar MTP 1",
    "Plantar MTP 2",
    "Plantar MTP 3",
    "Plantar MTP 4",
    "Plantar MTP 5",
    "Medial Arch",
    "Plantar lateral",
    "Plantar Heel",
    "Posterior Heel",
    "Posterior Insertion",
    "Posterior Midportion",
    "Posterior Leg",
    "Medial MTP",
    "Medial Midfoot",
    "Posterior Medial",
    "Medial Leg",
    "Lateral Midfoot",
    "Posterior Lateral",
    "Lateral Leg",
];

/// Ordered, human-readable region names. Region `r` is labelled `labels[r]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionLabels(Vec<String>);

impl RegionLabels {
    /// Creates a label list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoLabels`] if the list is empty.
    pub fn new<I, S>(labels: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(ConfigurationError::NoLabels);
        }
        Ok(Self(labels))
    }

    /// The default foot location names.
    #[must_use]
    pub fn foot() -> Self {
        Self(FOOT_LOCATIONS.iter().map(|&s| s.to_owned()).collect())
    }

    /// Number of regions `K`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no labels. Only possible for a
    /// deserialized list that has not been validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label of region `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Iterates labels in region order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Checks that the list names exactly `region_count` regions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::LabelCountMismatch`] otherwise.
    pub fn ensure_count(&self, region_count: usize) -> Result<(), ConfigurationError> {
        if self.len() == region_count {
            Ok(())
        } else {
            Err(ConfigurationError::LabelCountMismatch {
                labels: self.len(),
                region_count,
            })
        }
    }
}

impl Default for RegionLabels {
    fn default() -> Self {
        Self::foot()
    }
}
