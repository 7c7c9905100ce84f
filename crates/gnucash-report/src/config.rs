//! Report configuration.
//!
//! The configuration is an INI file with an `[OPTIONS]` section and one
//! section per report:
//!
//! ```ini
//! [OPTIONS]
//! input   = books/household.gnucash
//! verbose = false
//! strict  = false
//!
//! [ASSET BALANCE]
//! report   = true
//! output   = out/balance.csv
//! accounts = Assets:Current Assets, Assets:Investments
//! depth    = 3
//! exclude  = Assets:Investments:Retired
//! dates    = 2021-01-01, 2021-01-31, 2021-02-01, 2021-02-28
//! ```
//!
//! The report sections are `[ASSET BALANCE]`, `[ASSET CATEGORY]`,
//! `[ASSET INVESTMENT]` and `[INCOME STATEMENT]`. A report whose section is
//! missing, or whose `report` key is false, is not run. Keys are
//! case-insensitive, `#` and `;` start comment lines, and lists are
//! comma-separated on one line. Relative paths are taken from the directory of
//! the configuration file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ::config::{File, FileFormat, Source};
use chrono::NaiveDate;
use gnucash_report_engine::{DisplayDepth, ReportKind};
use thiserror::Error;

const OPTIONS_SECTION: &str = "OPTIONS";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors in the configuration file. All of them abort the run before any
/// report is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The config path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI, or a key sits outside of any section.
    #[error("malformed config: {0}")]
    Parse(#[from] ::config::ConfigError),

    /// A required section is absent.
    #[error("missing section [{0}]")]
    MissingSection(String),

    /// A required key is absent or empty.
    #[error("missing key `{key}` in [{section}]")]
    MissingKey {
        /// Section name.
        section: String,
        /// Key name.
        key: String,
    },

    /// A boolean key has an unrecognised value.
    #[error("invalid boolean {value:?} for `{key}` in [{section}]")]
    InvalidBool {
        /// Section name.
        section: String,
        /// Key name.
        key: String,
        /// The offending value.
        value: String,
    },

    /// A numeric key is not a non-negative integer.
    #[error("invalid number {value:?} for `{key}` in [{section}]")]
    InvalidNumber {
        /// Section name.
        section: String,
        /// Key name.
        key: String,
        /// The offending value.
        value: String,
    },

    /// A date is not `YYYY-MM-DD`.
    #[error("invalid date {value:?} in [{section}], expected YYYY-MM-DD")]
    InvalidDate {
        /// Section name.
        section: String,
        /// The offending value.
        value: String,
    },

    /// Dates must come in start/end pairs.
    #[error("unexpected number of dates in [{section}] ({count}), they should be in pairs")]
    OddDates {
        /// Section name.
        section: String,
        /// How many dates were given.
        count: usize,
    },
}

/// How a report's trees are laid out as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Account columns down to a display depth.
    Pivot(DisplayDepth),
    /// One column per commodity namespace.
    Category,
}

/// Settings of one enabled report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Which report this is.
    pub kind: ReportKind,
    /// CSV file to write.
    pub output: PathBuf,
    /// Account paths, one tree each.
    pub accounts: Vec<String>,
    /// Account paths left out of every tree.
    pub exclude: Vec<String>,
    /// Table layout.
    pub layout: Layout,
    /// `(start, end)` date pairs, one report row each.
    pub dates: Vec<(NaiveDate, NaiveDate)>,
}

/// The whole configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The GNUCash book to read.
    pub input: PathBuf,
    /// Log debug output.
    pub verbose: bool,
    /// Treat unresolved account paths as errors.
    pub strict: bool,
    /// Enabled reports, in run order.
    pub reports: Vec<ReportConfig>,
}

impl Config {
    /// Load the configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&source, base_dir)
    }

    /// Parse configuration text, resolving relative paths against `base_dir`.
    pub fn parse(source: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let sections = read_sections(source)?;

        let options = find_section(&sections, OPTIONS_SECTION)
            .ok_or_else(|| ConfigError::MissingSection(OPTIONS_SECTION.to_string()))?;
        let input = resolve_path(base_dir, options.require("input")?);
        let verbose = options.bool("verbose")?.unwrap_or(false);
        let strict = options.bool("strict")?.unwrap_or(false);

        let mut reports = Vec::new();
        for kind in ReportKind::ALL {
            let name = section_name(kind);
            let Some(section) = find_section(&sections, &name) else {
                continue;
            };
            if !section.bool("report")?.unwrap_or(true) {
                continue;
            }
            reports.push(ReportConfig::from_section(kind, section, base_dir)?);
        }

        Ok(Self {
            input,
            verbose,
            strict,
            reports,
        })
    }

    /// Settings for one report, if it is enabled.
    pub fn report(&self, kind: ReportKind) -> Option<&ReportConfig> {
        self.reports.iter().find(|report| report.kind == kind)
    }
}

impl ReportConfig {
    fn from_section(
        kind: ReportKind,
        section: &Section,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let output = resolve_path(base_dir, section.require("output")?);
        let accounts = section.list("accounts");
        let exclude = section.list("exclude");

        let layout = if kind.is_pivot() {
            Layout::Pivot(section.depth("depth")?)
        } else {
            Layout::Category
        };

        let dates = section
            .list("dates")
            .iter()
            .map(|value| {
                NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
                    ConfigError::InvalidDate {
                        section: section.name.to_string(),
                        value: value.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if dates.len() % 2 != 0 {
            return Err(ConfigError::OddDates {
                section: section.name.to_string(),
                count: dates.len(),
            });
        }
        let dates = dates.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();

        Ok(Self {
            kind,
            output,
            accounts,
            exclude,
            layout,
            dates,
        })
    }
}

/// Section title of a report, e.g. `ASSET BALANCE`.
pub fn section_name(kind: ReportKind) -> String {
    kind.name().to_uppercase()
}

fn resolve_path(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Read the INI sections of `source`, with keys lowercased.
fn read_sections(source: &str) -> Result<Vec<Section>, ConfigError> {
    File::from_str(source, FileFormat::Ini)
        .collect()?
        .into_iter()
        .map(|(name, value)| -> Result<Section, ConfigError> {
            let entries = value
                .into_table()?
                .into_iter()
                .map(|(key, value)| value.into_string().map(|value| (key.to_lowercase(), value)))
                .collect::<Result<HashMap<_, _>, _>>()?;
            Ok(Section { name, entries })
        })
        .collect()
}

fn find_section<'s>(sections: &'s [Section], name: &str) -> Option<&'s Section> {
    sections
        .iter()
        .find(|section| section.name.eq_ignore_ascii_case(name))
}

/// Typed access to one INI section.
#[derive(Debug)]
struct Section {
    name: String,
    entries: HashMap<String, String>,
}

impl Section {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            section: self.name.to_string(),
            key: key.to_string(),
        })
    }

    fn bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(Some(true)),
            "0" | "no" | "false" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBool {
                section: self.name.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Comma-separated items, trimmed, empty items dropped.
    fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn depth(&self, key: &str) -> Result<DisplayDepth, ConfigError> {
        let items = self.list(key);
        if items.is_empty() {
            return Err(ConfigError::MissingKey {
                section: self.name.to_string(),
                key: key.to_string(),
            });
        }

        let depths = items
            .iter()
            .map(|item| {
                item.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                    section: self.name.to_string(),
                    key: key.to_string(),
                    value: item.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match depths.as_slice() {
            [depth] => DisplayDepth::Uniform(*depth),
            _ => DisplayDepth::PerAccount(depths),
        })
    }
}
