//! Configuration loading with layered sources.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::report::{DEFAULT_DATE_FORMAT, PLACEHOLDER};
use crate::{CatalogQuery, DEFAULT_PER_PAGE, DEFAULT_VISIBLE_PAGES, ReportOptions};

/// Project-level config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "formulary.toml";

/// Prefix for environment overrides, e.g. `FORMULARY_REPORT__PLACEHOLDER`.
pub const ENV_PREFIX: &str = "FORMULARY_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormularyConfig {
    pub report: ReportConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Shown in place of a missing answer.
    pub placeholder: String,
    /// `chrono` format string for the date column.
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            placeholder: PLACEHOLDER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub per_page: usize,
    pub visible_pages: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            visible_pages: DEFAULT_VISIBLE_PAGES,
        }
    }
}

impl FormularyConfig {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            placeholder: self.report.placeholder.clone(),
            date_format: self.report.date_format.clone(),
        }
    }

    /// A first-page catalog query using the configured page sizes.
    pub fn catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            per_page: self.catalog.per_page,
            visible_pages: self.catalog.visible_pages,
            ..CatalogQuery::default()
        }
    }
}

/// Merges configuration sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. `FORMULARY_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project file: `./formulary.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FormularyConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged sources, before extraction.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FormularyConfig::default()));

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Defaults only, ignoring files and environment.
    pub fn load_defaults() -> FormularyConfig {
        FormularyConfig::default()
    }

    /// The project config file, if it exists.
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE);
        path.exists().then_some(path)
    }
}
