//! Generated person record types.
//!
//! This module defines the output of record generation. Field names follow
//! the public wire format (camelCase) so the types serialise verbatim into
//! HTTP responses and CLI output.

use serde::{Deserialize, Serialize};

/// Country written into every generated location.
pub const COUNTRY: &str = "Philippines";

/// Gender of a generated person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Drawn when the gender draw yields `0`.
    Male,
    /// Drawn when the gender draw yields `1`.
    Female,
}

/// Title, first and last name of a generated person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// Honorific such as `Mr.` or `Engr.`.
    pub title: String,
    /// Given name.
    pub first: String,
    /// Family name.
    pub last: String,
}

/// A timestamp paired with the number of whole years it lies in the past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedAge {
    /// RFC 3339 timestamp in UTC.
    pub iso_date: String,
    /// Whole years between the timestamp and the reference date.
    pub age: u32,
}

/// Where a generated person lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// City drawn from the region.
    pub city: String,
    /// Region the city belongs to.
    pub region: String,
    /// Always [`COUNTRY`].
    pub country: String,
    /// Postal code of the city.
    pub postal_code: String,
}

/// A generated person record.
///
/// # Example
///
/// ```
/// use pinoy_gen::{DatedAge, Gender, Location, PersonName, PersonRecord};
///
/// let record = PersonRecord {
///     name: PersonName {
///         title: "Mr.".to_owned(),
///         first: "Juan".to_owned(),
///         last: "Dela Cruz".to_owned(),
///     },
///     gender: Gender::Male,
///     date_of_birth: DatedAge { iso_date: "1990-01-01T00:00:00Z".to_owned(), age: 34 },
///     location: Location {
///         city: "Manila".to_owned(),
///         region: "National Capital Region".to_owned(),
///         country: "Philippines".to_owned(),
///         postal_code: "1000".to_owned(),
///     },
///     phone: "09170000001".to_owned(),
///     email: "juan.delacruz@gmail.com".to_owned(),
///     registration: DatedAge { iso_date: "2022-01-01T00:00:00Z".to_owned(), age: 2 },
/// };
///
/// assert_eq!(record.gender, Gender::Male);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    /// Title, first and last name.
    pub name: PersonName,
    /// Gender used to pick the title and first name.
    pub gender: Gender,
    /// Date of birth and age.
    pub date_of_birth: DatedAge,
    /// City, region, country and postal code.
    pub location: Location,
    /// Mobile number.
    pub phone: String,
    /// Email address derived from the name.
    pub email: String,
    /// Registration date and years since registration.
    pub registration: DatedAge,
}

/// Response wrapper pairing generated records with their metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationEnvelope {
    /// Seed that produced `results`; replaying it reproduces them.
    pub seed: String,
    /// Number of records in `results`.
    pub count: usize,
    /// Configured version label.
    pub version: String,
    /// Generated records in draw order.
    pub results: Vec<PersonRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_serializes_lowercase() {
        let male = serde_json::to_string(&Gender::Male).expect("serialize");
        let female = serde_json::to_string(&Gender::Female).expect("serialize");
        assert_eq!(male, "\"male\"");
        assert_eq!(female, "\"female\"");
    }

    #[test]
    fn record_serializes_to_camel_case() {
        let record = PersonRecord {
            name: PersonName {
                title: "Ms.".to_owned(),
                first: "Maria".to_owned(),
                last: "Santos".to_owned(),
            },
            gender: Gender::Female,
            date_of_birth: DatedAge {
                iso_date: "1990-01-01T00:00:00Z".to_owned(),
                age: 34,
            },
            location: Location {
                city: "Cebu City".to_owned(),
                region: "Central Visayas".to_owned(),
                country: COUNTRY.to_owned(),
                postal_code: "6000".to_owned(),
            },
            phone: "09170000000".to_owned(),
            email: "maria.santos@gmail.com".to_owned(),
            registration: DatedAge {
                iso_date: "2023-01-01T00:00:00Z".to_owned(),
                age: 1,
            },
        };
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"dateOfBirth\""));
        assert!(json.contains("\"isoDate\""));
        assert!(json.contains("\"postalCode\""));
        assert!(json.contains("\"registration\""));

        let back: PersonRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn envelope_fields_keep_wire_names() {
        let envelope = GenerationEnvelope {
            seed: "abc".to_owned(),
            count: 0,
            version: "debug".to_owned(),
            results: vec![],
        };
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"seed": "abc", "count": 0, "version": "debug", "results": []})
        );
    }
}
