//! Deterministic person record generation.
//!
//! This module turns a seed into a reproducible sequence of person records.
//! Fields are drawn from the reference dataset in a fixed order; changing the
//! order changes every replayed sequence, so it is part of the contract:
//!
//! 1. region
//! 2. gender
//! 3. title, then first name (both gendered)
//! 4. last name
//! 5. age, then birth month and day offsets
//! 6. city within the region
//! 7. phone number
//! 8. email (derived, no draw)
//! 9. registration age, then month and day offsets

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, SecondsFormat, Utc};

use crate::dataset::ReferenceDataset;
use crate::email::synthesize_email;
use crate::error::{DatasetError, GenerationError};
use crate::record::{
    COUNTRY, DatedAge, Gender, GenerationEnvelope, Location, PersonName, PersonRecord,
};
use crate::rng::RandomSource;
use crate::seed::GenerationSeed;

/// Youngest generated age in years.
const MIN_AGE: u32 = 18;

/// Number of distinct ages; ages fall in `[18, 60)`.
const AGE_SPAN: u32 = 42;

/// Month offset span for date jitter.
const MONTH_SPAN: u32 = 12;

/// Day offset span for date jitter; keeps offsets valid in every month.
const DAY_SPAN: u32 = 28;

/// Years since registration fall in `[0, 5)`.
const REGISTRATION_SPAN: u32 = 5;

/// Mobile carrier prefix for generated phone numbers.
const PHONE_PREFIX: &str = "0917";

/// Exclusive upper bound of the subscriber number.
const PHONE_SPAN: u32 = 9_999_999;

/// Version label used when none is configured.
pub const DEFAULT_VERSION: &str = "debug";

/// Capability contract for record generators.
///
/// One implementation exists today ([`PinoyGenerator`]); the trait lets the
/// HTTP layer hold a generator without naming the locale it serves.
pub trait RecordGenerator: Send + Sync {
    /// Generates `count` records from `seed`, or from a fresh seed when
    /// `seed` is absent or empty.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the dataset lacks required data,
    /// when a fresh seed cannot be created, or when date arithmetic fails.
    /// No records are returned on failure.
    fn generate(
        &self,
        count: usize,
        seed: Option<&str>,
    ) -> Result<GenerationEnvelope, GenerationError>;
}

/// Settings consumed by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    reference_year: i32,
    reference_date: DateTime<Utc>,
    version: String,
}

impl GeneratorSettings {
    /// Anchors ages on January 1st of `reference_year`, UTC midnight.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidReferenceYear`] if the year cannot
    /// be represented as a calendar date.
    ///
    /// # Example
    ///
    /// ```
    /// use pinoy_gen::GeneratorSettings;
    ///
    /// let settings = GeneratorSettings::new(2024, "v1").expect("valid year");
    /// assert_eq!(settings.reference_year(), 2024);
    /// assert_eq!(settings.version(), "v1");
    /// ```
    pub fn new(reference_year: i32, version: impl Into<String>) -> Result<Self, GenerationError> {
        let reference_date = NaiveDate::from_ymd_opt(reference_year, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or(GenerationError::InvalidReferenceYear {
                year: reference_year,
            })?;

        Ok(Self {
            reference_year,
            reference_date,
            version: version.into(),
        })
    }

    /// Anchors ages on January 1st of the current UTC year.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidReferenceYear`] if the current year
    /// is out of range.
    pub fn current_year(version: impl Into<String>) -> Result<Self, GenerationError> {
        Self::new(Utc::now().year(), version)
    }

    /// Returns the reference year.
    #[must_use]
    pub const fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Returns the reference instant ages are measured from.
    #[must_use]
    pub const fn reference_date(&self) -> DateTime<Utc> {
        self.reference_date
    }

    /// Returns the version label echoed in envelopes.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Generator of Philippine-localised person records.
#[derive(Debug, Clone)]
pub struct PinoyGenerator {
    dataset: Arc<ReferenceDataset>,
    settings: GeneratorSettings,
}

impl PinoyGenerator {
    /// Creates a generator over a shared, validated dataset.
    #[must_use]
    pub const fn new(dataset: Arc<ReferenceDataset>, settings: GeneratorSettings) -> Self {
        Self { dataset, settings }
    }

    /// Returns the generator settings.
    #[must_use]
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generates `count` records for an already resolved seed.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if a draw hits an empty list or a date
    /// leaves the representable range.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use pinoy_gen::{GenerationSeed, GeneratorSettings, PinoyGenerator, ReferenceDataset};
    ///
    /// let dataset = Arc::new(ReferenceDataset::embedded().expect("dataset"));
    /// let settings = GeneratorSettings::new(2024, "debug").expect("settings");
    /// let generator = PinoyGenerator::new(dataset, settings);
    /// let seed = GenerationSeed::from_text("8959bcbac47d82c434fd8f154dab3e04");
    ///
    /// let first = generator.generate_with_seed(3, &seed).expect("generated");
    /// let second = generator.generate_with_seed(3, &seed).expect("generated");
    /// assert_eq!(first, second);
    /// ```
    pub fn generate_with_seed(
        &self,
        count: usize,
        seed: &GenerationSeed,
    ) -> Result<Vec<PersonRecord>, GenerationError> {
        let mut rng = RandomSource::from_numeric_seed(seed.numeric());
        let mut records = Vec::with_capacity(count);

        for _ in 0..count {
            records.push(self.generate_single_record(&mut rng)?);
        }

        Ok(records)
    }

    /// Draws one record. The statement order below is the draw order.
    fn generate_single_record(
        &self,
        rng: &mut RandomSource,
    ) -> Result<PersonRecord, GenerationError> {
        let dataset = &*self.dataset;

        let region = rng
            .pick(dataset.locations())
            .ok_or(DatasetError::EmptyList { list: "locations" })?;

        let gender = if draw(rng, 2) == 0 {
            Gender::Male
        } else {
            Gender::Female
        };

        let title = pick_name(rng, dataset.titles(gender), titles_list(gender))?;
        let first = pick_name(rng, dataset.first_names(gender), first_names_list(gender))?;
        let last = pick_name(rng, dataset.last_names(), "lastNames")?;

        let age = draw(rng, AGE_SPAN) + MIN_AGE;
        let date_of_birth = self.dated_age(rng, age, "dateOfBirth")?;

        let city = rng
            .pick(region.cities())
            .ok_or_else(|| DatasetError::EmptyRegion {
                region: region.name().to_owned(),
            })?;
        let location = Location {
            city: city.name().to_owned(),
            region: region.name().to_owned(),
            country: COUNTRY.to_owned(),
            postal_code: city.postal_code().to_owned(),
        };

        let phone = format!("{PHONE_PREFIX}{:07}", draw(rng, PHONE_SPAN));
        let email = synthesize_email(&first, &last);

        let registered_years = draw(rng, REGISTRATION_SPAN);
        let registration = self.dated_age(rng, registered_years, "registration")?;

        Ok(PersonRecord {
            name: PersonName { title, first, last },
            gender,
            date_of_birth,
            location,
            phone,
            email,
            registration,
        })
    }

    /// Draws month and day offsets and subtracts them, plus `years`, from
    /// the reference date.
    fn dated_age(
        &self,
        rng: &mut RandomSource,
        years: u32,
        field: &'static str,
    ) -> Result<DatedAge, GenerationError> {
        let months = draw(rng, MONTH_SPAN);
        let days = draw(rng, DAY_SPAN);

        let date = years
            .checked_mul(MONTH_SPAN)
            .and_then(|total| total.checked_add(months))
            .and_then(|total| {
                self.settings
                    .reference_date
                    .checked_sub_months(Months::new(total))
            })
            .and_then(|date| date.checked_sub_days(Days::new(u64::from(days))))
            .ok_or(GenerationError::DateOutOfRange { field })?;

        Ok(DatedAge {
            iso_date: date.to_rfc3339_opts(SecondsFormat::Secs, true),
            age: years,
        })
    }
}

impl RecordGenerator for PinoyGenerator {
    fn generate(
        &self,
        count: usize,
        seed: Option<&str>,
    ) -> Result<GenerationEnvelope, GenerationError> {
        let seed = GenerationSeed::resolve(seed)?;
        let results = self.generate_with_seed(count, &seed)?;

        Ok(GenerationEnvelope {
            seed: seed.into_text(),
            count: results.len(),
            version: self.settings.version.clone(),
            results,
        })
    }
}

/// Converts a caller-supplied count into a record count.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidCount`] for negative counts.
///
/// # Example
///
/// ```
/// use pinoy_gen::{GenerationError, checked_count};
///
/// assert_eq!(checked_count(5), Ok(5));
/// assert_eq!(checked_count(-1), Err(GenerationError::InvalidCount { count: -1 }));
/// ```
pub fn checked_count(count: i64) -> Result<usize, GenerationError> {
    usize::try_from(count).map_err(|_| GenerationError::InvalidCount { count })
}

/// One bounded draw narrowed back to `u32`; the result is below `max`.
fn draw(rng: &mut RandomSource, max: u32) -> u32 {
    u32::try_from(rng.next_bounded(u64::from(max))).unwrap_or_default()
}

fn pick_name(
    rng: &mut RandomSource,
    names: &[String],
    list: &'static str,
) -> Result<String, GenerationError> {
    rng.pick(names)
        .cloned()
        .ok_or(GenerationError::DatasetUnavailable(DatasetError::EmptyList {
            list,
        }))
}

const fn titles_list(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "titles.male",
        Gender::Female => "titles.female",
    }
}

const fn first_names_list(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "firstNames.male",
        Gender::Female => "firstNames.female",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::dataset::City;

    const CONFORMANCE_SEED: &str = "8959bcbac47d82c434fd8f154dab3e04";

    #[fixture]
    fn generator() -> PinoyGenerator {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset");
        let settings = GeneratorSettings::new(2024, "test").expect("valid year");
        PinoyGenerator::new(Arc::new(dataset), settings)
    }

    /// Generates records for `seed` and asserts a predicate holds for all.
    fn assert_all_records<F>(generator: &PinoyGenerator, seed: &str, predicate: F)
    where
        F: Fn(&PersonRecord) -> bool,
    {
        let envelope = generator
            .generate(200, Some(seed))
            .expect("generation should succeed");

        for record in &envelope.results {
            assert!(predicate(record), "Predicate failed for record: {record:?}");
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(1000)]
    fn generates_requested_count(generator: PinoyGenerator, #[case] count: usize) {
        let envelope = generator
            .generate(count, Some(CONFORMANCE_SEED))
            .expect("generated");

        assert_eq!(envelope.results.len(), count);
        assert_eq!(envelope.count, count);
    }

    #[rstest]
    fn generation_is_deterministic(generator: PinoyGenerator) {
        let first = generator.generate(25, Some(CONFORMANCE_SEED)).expect("generated");
        let second = generator.generate(25, Some(CONFORMANCE_SEED)).expect("generated");

        assert_eq!(first, second);
        let first_json = serde_json::to_string(&first.results).expect("serialize");
        let second_json = serde_json::to_string(&second.results).expect("serialize");
        assert_eq!(first_json, second_json);
    }

    #[rstest]
    fn conformance_seed_yields_known_first_record(generator: PinoyGenerator) {
        let envelope = generator.generate(1, Some(CONFORMANCE_SEED)).expect("generated");

        let expected = PersonRecord {
            name: PersonName {
                title: "Engr.".to_owned(),
                first: "Jericho".to_owned(),
                last: "Mercado".to_owned(),
            },
            gender: Gender::Male,
            date_of_birth: DatedAge {
                iso_date: "2003-12-01T00:00:00Z".to_owned(),
                age: 20,
            },
            location: Location {
                city: "Cotabato City".to_owned(),
                region: "Bangsamoro Autonomous Region in Muslim Mindanao".to_owned(),
                country: COUNTRY.to_owned(),
                postal_code: "9600".to_owned(),
            },
            phone: "09175610328".to_owned(),
            email: "jericho.mercado@gmail.com".to_owned(),
            registration: DatedAge {
                iso_date: "2019-09-17T00:00:00Z".to_owned(),
                age: 4,
            },
        };
        assert_eq!(envelope.results, vec![expected]);
    }

    #[rstest]
    #[case(1, ("Mrs.", "Andrea", "Agustin"), "Angeles", "09173621351", "1992-03-28T00:00:00Z")]
    #[case(2, ("Ms.", "Bea", "Del Rosario"), "Kidapawan", "09171451706", "2001-12-22T00:00:00Z")]
    fn conformance_seed_continues_the_stream(
        generator: PinoyGenerator,
        #[case] index: usize,
        #[case] name: (&str, &str, &str),
        #[case] city: &str,
        #[case] phone: &str,
        #[case] born: &str,
    ) {
        let envelope = generator.generate(3, Some(CONFORMANCE_SEED)).expect("generated");
        let record = envelope.results.get(index).expect("record present");

        assert_eq!(record.gender, Gender::Female);
        assert_eq!(
            (
                record.name.title.as_str(),
                record.name.first.as_str(),
                record.name.last.as_str()
            ),
            name
        );
        assert_eq!(record.location.city, city);
        assert_eq!(record.phone, phone);
        assert_eq!(record.date_of_birth.iso_date, born);
    }

    #[rstest]
    fn shorter_run_is_prefix_of_longer_run(generator: PinoyGenerator) {
        let short = generator.generate(3, Some(CONFORMANCE_SEED)).expect("generated");
        let long = generator.generate(10, Some(CONFORMANCE_SEED)).expect("generated");

        assert_eq!(short.results.as_slice(), long.results.get(..3).expect("prefix"));
    }

    #[rstest]
    fn different_seeds_produce_different_records(generator: PinoyGenerator) {
        let a = generator.generate(5, Some("seed-a")).expect("generated");
        let b = generator.generate(5, Some("seed-b")).expect("generated");

        assert_ne!(a.results, b.results);
    }

    #[rstest]
    fn envelope_echoes_supplied_seed(generator: PinoyGenerator) {
        let envelope = generator.generate(1, Some(CONFORMANCE_SEED)).expect("generated");

        assert_eq!(envelope.seed, CONFORMANCE_SEED);
        assert_eq!(envelope.version, "test");
    }

    #[rstest]
    fn fresh_seed_replays_identically(generator: PinoyGenerator) {
        let envelope = generator.generate(4, None).expect("generated");
        assert_eq!(envelope.seed.len(), 32);

        let replay = generator
            .generate(4, Some(&envelope.seed))
            .expect("replayed");
        assert_eq!(envelope.results, replay.results);
    }

    #[rstest]
    fn empty_seed_is_treated_as_missing(generator: PinoyGenerator) {
        let envelope = generator.generate(1, Some("")).expect("generated");
        assert_eq!(envelope.seed.len(), 32);
    }

    #[rstest]
    fn titles_and_first_names_match_gender(generator: PinoyGenerator) {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset");
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            dataset.titles(record.gender).contains(&record.name.title)
                && dataset.first_names(record.gender).contains(&record.name.first)
        });
    }

    #[rstest]
    fn both_genders_appear(generator: PinoyGenerator) {
        let envelope = generator.generate(200, Some(CONFORMANCE_SEED)).expect("generated");
        let genders: HashSet<_> = envelope.results.iter().map(|r| r.gender).collect();
        assert_eq!(genders.len(), 2);
    }

    #[rstest]
    fn ages_stay_within_bounds(generator: PinoyGenerator) {
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            (18..60).contains(&record.date_of_birth.age) && record.registration.age < 5
        });
    }

    #[rstest]
    fn emails_are_built_from_the_record_name(generator: PinoyGenerator) {
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            record.email == synthesize_email(&record.name.first, &record.name.last)
                && record.email == record.email.to_lowercase()
                && record.email.ends_with("@gmail.com")
        });
    }

    #[rstest]
    fn locations_match_the_dataset(generator: PinoyGenerator) {
        let dataset = ReferenceDataset::embedded().expect("embedded dataset");
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            record.location.country == COUNTRY
                && dataset
                    .locations()
                    .iter()
                    .find(|region| region.name() == record.location.region)
                    .and_then(|region| {
                        region
                            .cities()
                            .iter()
                            .find(|city| city.name() == record.location.city)
                    })
                    .map(City::postal_code)
                    == Some(record.location.postal_code.as_str())
        });
    }

    #[rstest]
    fn phones_use_carrier_prefix(generator: PinoyGenerator) {
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            record.phone.len() == 11
                && record.phone.starts_with(PHONE_PREFIX)
                && record.phone.chars().all(|c| c.is_ascii_digit())
        });
    }

    #[rstest]
    fn dates_are_utc_rfc3339_before_reference(generator: PinoyGenerator) {
        let reference = generator.settings().reference_date();
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            [&record.date_of_birth, &record.registration]
                .iter()
                .all(|dated| {
                    dated.iso_date.ends_with('Z')
                        && DateTime::parse_from_rfc3339(&dated.iso_date)
                            .is_ok_and(|parsed| parsed <= reference)
                })
        });
    }

    #[rstest]
    fn birth_year_matches_age(generator: PinoyGenerator) {
        // Offsets are under a year, so the birth year is the reference year
        // minus the age, or one earlier when the offsets cross January 1st.
        assert_all_records(&generator, CONFORMANCE_SEED, |record| {
            let Ok(parsed) = DateTime::parse_from_rfc3339(&record.date_of_birth.iso_date) else {
                return false;
            };
            let age = i32::try_from(record.date_of_birth.age).unwrap_or(i32::MAX);
            let expected = 2024 - age;
            parsed.year() == expected || parsed.year() == expected - 1
        });
    }

    #[test]
    fn settings_reject_out_of_range_year() {
        let result = GeneratorSettings::new(i32::MAX, "debug");
        assert_eq!(
            result,
            Err(GenerationError::InvalidReferenceYear { year: i32::MAX })
        );
    }

    #[test]
    fn settings_anchor_on_january_first() {
        let settings = GeneratorSettings::new(2024, "debug").expect("valid year");
        assert_eq!(
            settings.reference_date().to_rfc3339_opts(SecondsFormat::Secs, true),
            "2024-01-01T00:00:00Z"
        );
    }

    #[rstest]
    #[case(0, Ok(0))]
    #[case(1000, Ok(1000))]
    #[case(-1, Err(GenerationError::InvalidCount { count: -1 }))]
    fn checked_count_rejects_negatives(
        #[case] raw: i64,
        #[case] expected: Result<usize, GenerationError>,
    ) {
        assert_eq!(checked_count(raw), expected);
    }
}
