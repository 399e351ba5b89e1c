//! Reference dataset types and JSON loading.
//!
//! The reference dataset is the sampling universe for generated records:
//! gendered titles and first names, last names, and regions with their
//! cities. It is loaded once, validated, and then shared read-only by every
//! generation call.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::email::normalize_name_part;
use crate::error::DatasetError;
use crate::record::Gender;

/// Current supported dataset version.
const SUPPORTED_VERSION: u32 = 1;

/// Dataset bundled with the crate.
const EMBEDDED_DATASET: &str = include_str!("../data/philippines.json");

/// Immutable reference data used to compose person records.
///
/// Construction always validates the data, so every list reachable from a
/// `ReferenceDataset` is non-empty.
///
/// # Example
///
/// ```
/// use pinoy_gen::{Gender, ReferenceDataset};
///
/// let json = r#"{
///     "version": 1,
///     "titles": {"male": ["Mr."], "female": ["Ms."]},
///     "firstNames": {"male": ["Juan"], "female": ["Maria"]},
///     "lastNames": ["Dela Cruz"],
///     "locations": [
///         {"region": "National Capital Region",
///          "cities": [{"name": "Manila", "postalCode": "1000"}]}
///     ]
/// }"#;
///
/// let dataset = ReferenceDataset::from_json(json).expect("valid dataset");
/// assert_eq!(dataset.titles(Gender::Female), ["Ms."]);
/// assert_eq!(dataset.locations().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDataset {
    titles: Gendered,
    first_names: Gendered,
    last_names: Vec<String>,
    locations: Vec<Region>,
}

impl ReferenceDataset {
    /// Parses a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if:
    /// - The JSON is malformed or missing required fields
    /// - The version is unsupported
    /// - Any list is empty, or a region has no cities
    /// - Any entry is blank
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(json).map_err(|e| DatasetError::ParseError {
            message: e.to_string(),
        })?;

        Self::from_raw(raw)
    }

    /// Loads a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let contents = fs::read_to_string(path).map_err(|e| DatasetError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    /// Loads the Philippine dataset bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the bundled data fails validation.
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    fn from_raw(raw: RawDataset) -> Result<Self, DatasetError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(DatasetError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        validate_list("titles.male", &raw.titles.male)?;
        validate_list("titles.female", &raw.titles.female)?;
        validate_list("firstNames.male", &raw.first_names.male)?;
        validate_list("firstNames.female", &raw.first_names.female)?;
        validate_list("lastNames", &raw.last_names)?;
        validate_addressable("firstNames.male", &raw.first_names.male)?;
        validate_addressable("firstNames.female", &raw.first_names.female)?;
        validate_addressable("lastNames", &raw.last_names)?;

        if raw.locations.is_empty() {
            return Err(DatasetError::EmptyList { list: "locations" });
        }

        let locations = raw
            .locations
            .into_iter()
            .enumerate()
            .map(|(index, region)| Region::from_raw(index, region))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            titles: raw.titles,
            first_names: raw.first_names,
            last_names: raw.last_names,
            locations,
        })
    }

    /// Returns the titles available for the given gender.
    #[must_use]
    pub fn titles(&self, gender: Gender) -> &[String] {
        self.titles.for_gender(gender)
    }

    /// Returns the first names available for the given gender.
    #[must_use]
    pub fn first_names(&self, gender: Gender) -> &[String] {
        self.first_names.for_gender(gender)
    }

    /// Returns the last names.
    #[must_use]
    pub fn last_names(&self) -> &[String] {
        &self.last_names
    }

    /// Returns the regions in dataset order.
    #[must_use]
    pub fn locations(&self) -> &[Region] {
        &self.locations
    }
}

/// A region and the cities that can be drawn within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    name: String,
    cities: Vec<City>,
}

impl Region {
    fn from_raw(index: usize, raw: RawRegion) -> Result<Self, DatasetError> {
        if raw.region.trim().is_empty() {
            return Err(DatasetError::BlankEntry {
                list: "locations",
                index,
            });
        }
        if raw.cities.is_empty() {
            return Err(DatasetError::EmptyRegion { region: raw.region });
        }
        for (city_index, city) in raw.cities.iter().enumerate() {
            if city.name.trim().is_empty() || city.postal_code.trim().is_empty() {
                return Err(DatasetError::BlankCity {
                    region: raw.region,
                    index: city_index,
                });
            }
        }

        Ok(Self {
            name: raw.region,
            cities: raw.cities,
        })
    }

    /// Returns the region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cities in this region.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }
}

/// A city and its postal code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    name: String,
    postal_code: String,
}

impl City {
    /// Returns the city name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the city's postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

/// A pair of lists keyed by gender.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Gendered {
    male: Vec<String>,
    female: Vec<String>,
}

impl Gendered {
    fn for_gender(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

fn validate_list(list: &'static str, entries: &[String]) -> Result<(), DatasetError> {
    if entries.is_empty() {
        return Err(DatasetError::EmptyList { list });
    }
    match entries.iter().position(|entry| entry.trim().is_empty()) {
        Some(index) => Err(DatasetError::BlankEntry { list, index }),
        None => Ok(()),
    }
}

/// Names feed email local parts, so each must survive normalisation.
fn validate_addressable(list: &'static str, names: &[String]) -> Result<(), DatasetError> {
    match names
        .iter()
        .position(|name| normalize_name_part(name).is_empty())
    {
        Some(index) => Err(DatasetError::UnaddressableName {
            list,
            index,
            name: names.get(index).cloned().unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    version: u32,
    titles: Gendered,
    first_names: Gendered,
    last_names: Vec<String>,
    locations: Vec<RawRegion>,
}

/// Raw JSON representation of a region.
#[derive(Debug, Deserialize)]
struct RawRegion {
    region: String,
    cities: Vec<City>,
}
