use metrics_exporter_prometheus::PrometheusHandle;
use risk_advisor::config::StoreBackend;
use risk_advisor::workflows::assessment::{
    AssessmentRow, AssessmentStore, CsvAssessmentStore, InMemoryAssessmentStore, ScoringConfig,
    ScoringProfile, StoreError,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) scoring: Arc<ScoringConfig>,
}

/// Store selected at startup from configuration or CLI flags.
#[derive(Debug)]
pub(crate) enum ConfiguredStore {
    Csv(CsvAssessmentStore),
    Memory(InMemoryAssessmentStore),
}

impl ConfiguredStore {
    pub(crate) fn from_backend(backend: &StoreBackend) -> Self {
        match backend {
            StoreBackend::Csv(path) => Self::Csv(CsvAssessmentStore::new(path.clone())),
            StoreBackend::Memory => Self::Memory(InMemoryAssessmentStore::new()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Csv(store) => store.path().display().to_string(),
            Self::Memory(_) => "memory".to_string(),
        }
    }
}

impl AssessmentStore for ConfiguredStore {
    fn append_record(&self, row: &AssessmentRow) -> Result<(), StoreError> {
        match self {
            Self::Csv(store) => store.append_record(row),
            Self::Memory(store) => store.append_record(row),
        }
    }

    fn load_all(&self) -> Result<Vec<AssessmentRow>, StoreError> {
        match self {
            Self::Csv(store) => store.load_all(),
            Self::Memory(store) => store.load_all(),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self {
            Self::Csv(store) => store.clear(),
            Self::Memory(store) => store.clear(),
        }
    }
}

/// CLI override for the configured backend; `memory` selects the in-process store.
pub(crate) fn backend_override(path: Option<PathBuf>, configured: StoreBackend) -> StoreBackend {
    match path {
        Some(path) if path.as_os_str().eq_ignore_ascii_case("memory") => StoreBackend::Memory,
        Some(path) => StoreBackend::Csv(path),
        None => configured,
    }
}

pub(crate) fn parse_profile(raw: &str) -> Result<ScoringProfile, String> {
    raw.parse::<ScoringProfile>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_override_selects_in_process_store() {
        let backend = backend_override(
            Some(PathBuf::from("memory")),
            StoreBackend::Csv(PathBuf::from("assessments_data.csv")),
        );
        assert_eq!(backend, StoreBackend::Memory);
        assert_eq!(ConfiguredStore::from_backend(&backend).describe(), "memory");
    }

    #[test]
    fn parse_profile_reports_unknown_values() {
        assert_eq!(parse_profile("v2"), Ok(ScoringProfile::V2));
        assert!(parse_profile("v8").is_err_and(|err| err.contains("v8")));
    }
}
