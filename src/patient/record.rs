//! Patient record and its stored document form
//!
//! A record is stored as one JSON object whose attribute names are fixed:
//!
//! ```text
//! { "NIN", "FirstName", "LastName", "DateOfBirth", "Sex", "MotherNIN",
//!   "FatherNIN", "FamilyMedicalHistory", "Allergy", "ChronicIllnesses",
//!   "AmendedFrom" }
//! ```
//!
//! Decoding is strict: every attribute must be present, every value must be
//! a string, and unknown attributes are rejected.

use serde::{Deserialize, Serialize};

/// One patient entry, keyed by national identity number.
///
/// References to other patients (`mother_nin`, `father_nin`,
/// `amended_from`) are plain strings and are never resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Patient {
    #[serde(rename = "NIN")]
    pub nin: String,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    /// Caller supplied, not checked as a calendar date
    #[serde(rename = "DateOfBirth")]
    pub date_of_birth: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "MotherNIN")]
    pub mother_nin: String,
    #[serde(rename = "FatherNIN")]
    pub father_nin: String,
    #[serde(rename = "FamilyMedicalHistory")]
    pub family_medical_history: String,
    #[serde(rename = "Allergy")]
    pub allergy: String,
    #[serde(rename = "ChronicIllnesses")]
    pub chronic_illnesses: String,
    /// NIN of the record this one amends; empty when not an amendment
    #[serde(rename = "AmendedFrom")]
    pub amended_from: String,
}

impl Patient {
    /// Serialize to the stored document form.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Parse a stored document.
    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
