use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::selector::DEFAULT_DOCS_URL;

/// Name of the optional project config file at the working directory root.
pub const CONFIG_FILE: &str = ".selgraph.toml";

/// Project configuration loaded from `.selgraph.toml`.
/// Include/exclude patterns are path prefixes applied to discovered CSS and
/// HTML files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root URL that CSS property names are appended to.
    pub docs_url: String,
    /// Path prefixes excluded from discovery.
    exclude: Vec<String>,
    /// Path prefixes discovery is restricted to. Empty means everything.
    include: Vec<String>,
}

/// Raw TOML structure for `.selgraph.toml`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SelgraphTomlConfig {
    /// Documentation root override.
    docs_url: Option<String>,
    /// Excluded prefixes.
    #[serde(default)]
    exclude: Vec<String>,
    /// Included prefixes.
    #[serde(default)]
    include: Vec<String>,
}

/// The JSON object `discover` accepts on stdin. Set fields override the
/// project file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RequestConfig {
    /// Excluded prefixes.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Included prefixes.
    #[serde(default)]
    pub include: Option<Vec<String>>,
}

impl RequestConfig {
    /// Parse the request body. Blank input and `null` mean no overrides.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the input is not a JSON object of this shape.
    pub fn parse(input: &str) -> Result<Self, Error> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: Option<Self> = serde_json::from_str(input)?;
        return Ok(parsed.unwrap_or_default());
    }
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            docs_url: DEFAULT_DOCS_URL.to_string(),
            exclude: Vec::new(),
            include: Vec::new(),
        };
    }
}

impl Config {
    /// Load config from `.selgraph.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist. A file that exists
    /// but is malformed is an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed,
    /// or `Error::ConfigInvalid` if `docs_url` is empty.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: SelgraphTomlConfig = toml::from_str(&content)?;
        let docs_url = match raw.docs_url {
            Some(url) if url.trim().is_empty() => {
                return Err(Error::ConfigInvalid {
                    reason: format!("`docs_url` in {CONFIG_FILE} is empty"),
                });
            },
            Some(url) => url,
            None => DEFAULT_DOCS_URL.to_string(),
        };
        log::debug!("loaded {}", path.display());

        return Ok(Self {
            docs_url,
            exclude: raw.exclude,
            include: raw.include,
        });
    }

    /// Apply the overrides of a `discover` request.
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        if let Some(include) = request.include {
            self.include = include;
        }
        if let Some(exclude) = request.exclude {
            self.exclude = exclude;
        }
        return self;
    }

    /// Check whether a unit-relative file path should be discovered.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));
        if !included {
            return false;
        }
        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}
