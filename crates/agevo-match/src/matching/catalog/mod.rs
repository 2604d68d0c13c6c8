//! Grant catalog import from JSON or CSV exports.
//!
//! Every record passes through [`Grant::try_from`], so a catalog containing a grant without
//! one of its eligibility lists fails to load instead of silently scoring that criterion as
//! a miss.

mod parser;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use super::domain::{Grant, GrantId, GrantValidationError, UnknownValue};

const SAMPLE_CATALOG: &str = include_str!("../../../data/bandi_sample.json");

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Value { line: usize, source: UnknownValue },
    Date { line: usize, value: String },
    Invalid(GrantValidationError),
    UnsupportedFormat(PathBuf),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read grant catalog: {}", err),
            CatalogImportError::Json(err) => write!(f, "invalid grant catalog JSON: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid grant catalog CSV: {}", err),
            CatalogImportError::Value { line, source } => {
                write!(f, "grant catalog line {}: {}", line, source)
            }
            CatalogImportError::Date { line, value } => write!(
                f,
                "grant catalog line {}: '{}' is not a YYYY-MM-DD date",
                line, value
            ),
            CatalogImportError::Invalid(err) => write!(f, "invalid grant record: {}", err),
            CatalogImportError::UnsupportedFormat(path) => write!(
                f,
                "unsupported grant catalog format for {} (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Json(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Value { source, .. } => Some(source),
            CatalogImportError::Invalid(err) => Some(err),
            CatalogImportError::Date { .. } | CatalogImportError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<GrantValidationError> for CatalogImportError {
    fn from(err: GrantValidationError) -> Self {
        Self::Invalid(err)
    }
}

/// In-memory list of grants as published by the catalog source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrantCatalog {
    grants: Vec<Grant>,
}

impl GrantCatalog {
    pub fn new(grants: Vec<Grant>) -> Self {
        Self { grants }
    }

    /// The bundled demonstration catalog.
    pub fn sample() -> Result<Self, CatalogImportError> {
        Self::from_json_reader(SAMPLE_CATALOG.as_bytes())
    }

    /// Load a catalog, picking the decoder from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogImportError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let catalog = match extension.as_deref() {
            Some("json") => Self::from_json_reader(std::fs::File::open(path)?)?,
            Some("csv") => Self::from_csv_reader(std::fs::File::open(path)?)?,
            _ => return Err(CatalogImportError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            path = %path.display(),
            grants = catalog.len(),
            active = catalog.active().len(),
            "grant catalog loaded"
        );

        Ok(catalog)
    }

    /// Decode a JSON array of grant records.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let grants: Vec<Grant> = serde_json::from_reader(reader)?;
        Ok(Self::new(grants))
    }

    /// Decode a CSV export with `;`-separated eligibility columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let grants = parser::parse_rows(reader)?
            .into_iter()
            .map(Grant::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(grants))
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    pub fn into_grants(self) -> Vec<Grant> {
        self.grants
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Grants open to applications, in catalog order.
    pub fn active(&self) -> Vec<&Grant> {
        self.grants.iter().filter(|grant| grant.is_active()).collect()
    }

    pub fn get(&self, id: &GrantId) -> Option<&Grant> {
        self.grants.iter().find(|grant| &grant.id == id)
    }
}
