use crate::error::ConfigError;
use crate::notify::Delivery;
use crate::parsers::html::CompiledSelectors;
use crate::pipeline::PersistPolicy;
use crate::snapshot::SnapshotFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// CSS selectors used to pull vehicles out of a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSet {
    /// Selector matching one element per vehicle
    pub card: String,

    /// Selector for the model name, relative to the card
    pub name: String,

    /// Selector for the exterior color, relative to the card
    #[serde(default)]
    pub color: Option<String>,

    /// Selector for the stock number, relative to the card
    pub sku: String,
}

/// Page layout of a dealer site
///
/// Most dealers in the registry share one of two site templates; anything
/// else can be described with explicit selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Layout {
    /// Table-style inventory list
    List,
    /// Tile grid without a color column
    Grid,
    /// Explicit selectors
    Custom(SelectorSet),
}

impl Layout {
    /// Resolve the layout into concrete selectors
    pub fn selectors(&self) -> SelectorSet {
        match self {
            Layout::List => SelectorSet {
                card: ".vehicle-list-cell".to_string(),
                name: ".vehicle-year-make-model span[itemprop=model]".to_string(),
                color: Some("td[itemprop=color]".to_string()),
                sku: "td[itemprop=sku]".to_string(),
            },
            Layout::Grid => SelectorSet {
                card: ".vehicle-grid-cell".to_string(),
                name: ".vehicle-year-make-model-1 span[itemprop=model]".to_string(),
                color: None,
                sku: "div.vehicle-information-grid".to_string(),
            },
            Layout::Custom(set) => set.clone(),
        }
    }
}

/// One dealer site to watch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Unique name of the dealer, written into every record
    pub location: String,

    /// Inventory listing page
    pub url: String,

    /// How to find vehicles on the page
    pub selectors: Layout,
}

impl SiteProfile {
    pub fn new(location: &str, url: &str, selectors: Layout) -> Self {
        Self {
            location: location.to_string(),
            url: url.to_string(),
            selectors,
        }
    }
}

/// Top-level configuration for the watcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Dealer sites to scrape, in report order
    #[serde(default = "default_sites")]
    pub sites: Vec<SiteProfile>,

    /// Where the last known snapshot is kept
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Seconds between scheduled runs
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Snapshot serialization format
    #[serde(default)]
    pub format: SnapshotFormat,

    /// How the snapshot is carried in the email
    #[serde(default)]
    pub delivery: Delivery,

    /// Email subject line
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Ordering of snapshot write and email send
    #[serde(default)]
    pub persist: PersistPolicy,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            snapshot_path: default_snapshot_path(),
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            format: SnapshotFormat::default(),
            delivery: Delivery::default(),
            subject: default_subject(),
            persist: PersistPolicy::default(),
        }
    }
}

impl WatchConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_json_str(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        Ok(config)
    }

    /// Check that every site has a usable URL, compilable selectors and a
    /// unique location
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut seen = HashSet::new();

        for site in &self.sites {
            if !seen.insert(site.location.as_str()) {
                return Err(ConfigError::DuplicateLocation(site.location.clone()));
            }

            Url::parse(&site.url).map_err(|source| ConfigError::InvalidUrl {
                location: site.location.clone(),
                url: site.url.clone(),
                source,
            })?;

            CompiledSelectors::compile(&site.selectors.selectors()).map_err(|source| {
                ConfigError::InvalidSelector {
                    location: site.location.clone(),
                    source,
                }
            })?;
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Sender, recipient and API credential for outgoing mail
#[derive(Clone)]
pub struct EmailSettings {
    pub from: String,
    pub to: String,
    pub api_key: String,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl EmailSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(key))
        };

        let api_key = get("EMAIL_API_KEY").or_else(|_| {
            lookup("SENDGRID_API_KEY")
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv("EMAIL_API_KEY"))
        })?;

        Ok(Self {
            from: get("EMAIL_FROM")?,
            to: get("EMAIL_TO")?,
            api_key,
        })
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("logs/vehicles.csv")
}

fn default_interval_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_subject() -> String {
    "WRX Scraper Update".to_string()
}

/// Built-in dealer registry
pub fn default_sites() -> Vec<SiteProfile> {
    vec![
        SiteProfile::new(
            "markham",
            "https://www.markhamsubaru.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "scarboro",
            "https://www.scarborosubaru.ca/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "richmond hill",
            "https://www.rhsubaru.com/new/model/WRX",
            Layout::Grid,
        ),
        SiteProfile::new(
            "ogilve",
            "https://www.ogilviesubaru.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "willowdale",
            "https://www.willowdalesubaru.ca/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "whitby",
            "https://www.whitbysubaru.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "pfaff",
            "https://www.pfaffsubaru.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "newmarket",
            "https://www.nrsubaru.ca/new/WRX.html",
            Layout::Grid,
        ),
        SiteProfile::new(
            "downtown",
            "https://www.subarudowntown.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "barrie",
            "https://www.barriesubaru.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "oakville",
            "https://www.buddssubaru.com/new/WRX.html",
            Layout::List,
        ),
        SiteProfile::new(
            "mississauga",
            "https://www.subarumiss.ca/new/WRX.html",
            Layout::List,
        ),
    ]
}
