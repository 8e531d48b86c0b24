//! Loading daily records and the user profile
//!
//! The engine itself never touches storage. This module is the boundary
//! with whatever persists the data: metrics arrive as a JSON array or a CSV
//! file with camelCase headers, the profile as JSON or TOML.

use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SourceError, VitalRsError};
use crate::models::{DailyMetrics, UserProfile};

/// Supplier of stored records for an analysis cycle
pub trait MetricsSource {
    /// All stored daily records, oldest first
    fn load_metrics(&self) -> Result<Vec<DailyMetrics>>;

    fn load_profile(&self) -> Result<UserProfile>;
}

/// On-disk formats understood for daily metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsFormat {
    Json,
    Csv,
}

impl MetricsFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(MetricsFormat::Json),
            "csv" => Ok(MetricsFormat::Csv),
            _ => Err(SourceError::UnsupportedFormat { format: extension }.into()),
        }
    }
}

/// Metrics and profile stored as plain files
#[derive(Debug, Clone)]
pub struct FileSource {
    metrics_path: PathBuf,
    profile_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(metrics_path: impl Into<PathBuf>) -> Self {
        Self {
            metrics_path: metrics_path.into(),
            profile_path: None,
        }
    }

    pub fn with_profile(mut self, profile_path: impl Into<PathBuf>) -> Self {
        self.profile_path = Some(profile_path.into());
        self
    }

    fn read(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(SourceError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(fs::read_to_string(path)?)
    }

    fn parse_csv(content: &str) -> Result<Vec<DailyMetrics>> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}

impl MetricsSource for FileSource {
    fn load_metrics(&self) -> Result<Vec<DailyMetrics>> {
        let format = MetricsFormat::from_path(&self.metrics_path)?;
        let content = Self::read(&self.metrics_path)?;

        let records = match format {
            MetricsFormat::Json => serde_json::from_str(&content)?,
            MetricsFormat::Csv => Self::parse_csv(&content)?,
        };

        let records = ordered_unique(records)?;
        tracing::info!(
            path = %self.metrics_path.display(),
            format = ?format,
            records = records.len(),
            "daily metrics loaded"
        );
        Ok(records)
    }

    fn load_profile(&self) -> Result<UserProfile> {
        let Some(path) = &self.profile_path else {
            tracing::debug!("no profile configured, using defaults");
            return Ok(UserProfile::default());
        };

        let content = Self::read(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&content).map_err(|e| {
                SourceError::Parse {
                    format: "toml".to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }
}

/// Sort records by date and reject duplicate dates
pub fn ordered_unique(mut records: Vec<DailyMetrics>) -> Result<Vec<DailyMetrics>> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.date) {
            return Err(VitalRsError::Validation(format!(
                "duplicate record for {}",
                record.date
            )));
        }
    }
    records.sort_by_key(|m| m.date);
    Ok(records)
}

/// In-memory source, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub metrics: Vec<DailyMetrics>,
    pub profile: UserProfile,
}

impl MetricsSource for MemorySource {
    fn load_metrics(&self) -> Result<Vec<DailyMetrics>> {
        ordered_unique(self.metrics.clone())
    }

    fn load_profile(&self) -> Result<UserProfile> {
        Ok(self.profile.clone())
    }
}
