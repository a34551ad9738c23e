//! Rule-table loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading rule tables
//! from YAML files on disk or from the copies embedded in the binary.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{FiscalYearMetadata, GstRules, JurisdictionTable, PayrollRules, RuleTables};

const BUILTIN_FISCAL_YEAR: &str = include_str!("../../config/fy2023-24/fiscal_year.yaml");
const BUILTIN_PAYROLL: &str = include_str!("../../config/fy2023-24/payroll.yaml");
const BUILTIN_GST: &str = include_str!("../../config/fy2023-24/gst.yaml");
const BUILTIN_JURISDICTIONS: [(&str, &str); 4] = [
    (
        "jurisdictions/india.yaml",
        include_str!("../../config/fy2023-24/jurisdictions/india.yaml"),
    ),
    (
        "jurisdictions/usa.yaml",
        include_str!("../../config/fy2023-24/jurisdictions/usa.yaml"),
    ),
    (
        "jurisdictions/uk.yaml",
        include_str!("../../config/fy2023-24/jurisdictions/uk.yaml"),
    ),
    (
        "jurisdictions/australia.yaml",
        include_str!("../../config/fy2023-24/jurisdictions/australia.yaml"),
    ),
];

/// Loads and provides access to rule tables.
///
/// # Directory Structure
///
/// ```text
/// config/fy2023-24/
/// ├── fiscal_year.yaml      # Version metadata
/// ├── payroll.yaml          # Provident fund / state insurance constants
/// ├── gst.yaml              # Supported GST rates
/// └── jurisdictions/
///     ├── india.yaml        # Slabs, rebates, cess, surcharge, corporate rates
///     └── ...
/// ```
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fy2023-24")?;
/// println!("Fiscal year: {}", loader.tables().metadata().fiscal_year);
/// # Ok::<(), tax_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: RuleTables,
}

impl ConfigLoader {
    /// Loads rule tables from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or describes a structurally invalid table.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<FiscalYearMetadata>(&path.join("fiscal_year.yaml"))?;
        let payroll = Self::load_yaml::<PayrollRules>(&path.join("payroll.yaml"))?;
        let gst = Self::load_yaml::<GstRules>(&path.join("gst.yaml"))?;
        let jurisdictions = Self::load_jurisdictions(&path.join("jurisdictions"))?;

        let tables = RuleTables::new(metadata, jurisdictions, payroll, gst)?;
        tracing::debug!(
            path = %path.display(),
            fiscal_year = %tables.metadata().fiscal_year,
            "Loaded rule tables"
        );

        Ok(Self { tables })
    }

    /// Loads the rule tables compiled into the binary.
    ///
    /// # Example
    ///
    /// ```
    /// use tax_engine::config::ConfigLoader;
    /// use tax_engine::models::{EntityType, Jurisdiction, Regime};
    ///
    /// let loader = ConfigLoader::builtin().unwrap();
    /// let rules = loader
    ///     .tables()
    ///     .rules_for(Jurisdiction::India, EntityType::Individual, Regime::New)
    ///     .unwrap();
    /// assert_eq!(rules.slabs.len(), 6);
    /// ```
    pub fn builtin() -> EngineResult<Self> {
        let metadata = Self::parse_yaml::<FiscalYearMetadata>("fiscal_year.yaml", BUILTIN_FISCAL_YEAR)?;
        let payroll = Self::parse_yaml::<PayrollRules>("payroll.yaml", BUILTIN_PAYROLL)?;
        let gst = Self::parse_yaml::<GstRules>("gst.yaml", BUILTIN_GST)?;
        let jurisdictions = BUILTIN_JURISDICTIONS
            .iter()
            .map(|(name, content)| Self::parse_yaml::<JurisdictionTable>(name, content))
            .collect::<EngineResult<Vec<_>>>()?;

        let tables = RuleTables::new(metadata, jurisdictions, payroll, gst)?;
        Ok(Self { tables })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(name: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads all jurisdiction files from the jurisdictions directory.
    fn load_jurisdictions(dir: &Path) -> EngineResult<Vec<JurisdictionTable>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tables = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tables.push(Self::load_yaml::<JurisdictionTable>(&path)?);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no jurisdiction files found)", dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the loaded rule tables.
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }
}
