//! Builders turning loaded settings into the generator shared by handlers.

use std::sync::Arc;

use pinoy_gen::{GeneratorSettings, PinoyGenerator, RecordGenerator, ReferenceDataset};
use tracing::info;

use super::{ServerSettings, StartupError};

/// Load the reference dataset from the configured path, or the embedded copy.
///
/// # Errors
/// Returns [`StartupError::Dataset`] when the dataset is missing or invalid.
pub fn load_dataset(settings: &ServerSettings) -> Result<ReferenceDataset, StartupError> {
    let dataset = match settings.dataset_path() {
        Some(path) => {
            info!(path = %path.display(), "loading reference dataset from file");
            ReferenceDataset::from_file(path)?
        }
        None => {
            info!("loading embedded reference dataset");
            ReferenceDataset::embedded()?
        }
    };
    info!(
        regions = dataset.locations().len(),
        last_names = dataset.last_names().len(),
        "reference dataset loaded"
    );
    Ok(dataset)
}

/// Build the record generator described by `settings`.
///
/// # Errors
/// Returns [`StartupError`] when the dataset cannot be loaded or the
/// reference year cannot anchor a calendar date.
pub fn build_generator(
    settings: &ServerSettings,
) -> Result<Arc<dyn RecordGenerator>, StartupError> {
    let dataset = load_dataset(settings)?;
    let generator_settings =
        GeneratorSettings::new(settings.reference_year(), settings.version_label())?;
    Ok(Arc::new(PinoyGenerator::new(
        Arc::new(dataset),
        generator_settings,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinoy_gen::{DatasetError, GenerationError};
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    #[fixture]
    fn settings() -> ServerSettings {
        ServerSettings {
            port: None,
            env: None,
            version_label: None,
            reference_year: Some(2024),
            dataset_path: None,
            rate_limit: None,
        }
    }

    #[rstest]
    fn builds_generator_from_embedded_dataset(settings: ServerSettings) {
        let generator = build_generator(&settings).expect("generator builds");

        let envelope = generator.generate(3, Some("startup")).expect("generates");

        assert_eq!(envelope.results.len(), 3);
        assert_eq!(envelope.version, "debug");
    }

    #[rstest]
    fn missing_dataset_file_is_a_startup_error(mut settings: ServerSettings) {
        settings.dataset_path = Some(PathBuf::from("/nonexistent/rpug/philippines.json"));

        let err = build_generator(&settings).err().expect("startup fails");

        assert!(matches!(
            err,
            StartupError::Dataset(DatasetError::IoError { .. })
        ));
    }

    #[rstest]
    fn unrepresentable_reference_year_is_rejected(mut settings: ServerSettings) {
        settings.reference_year = Some(i32::MAX);

        let err = build_generator(&settings).err().expect("startup fails");

        assert!(matches!(
            err,
            StartupError::Generation(GenerationError::InvalidReferenceYear { .. })
        ));
    }
}
