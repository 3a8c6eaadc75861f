use crate::error::{FetchError, ParseError};

/// One vehicle listing extracted from a dealer page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    /// Model name as shown on the card
    pub name: String,

    /// Exterior color, empty when the layout has no color field
    pub color: String,

    /// Stock number
    pub sku: String,

    /// Dealer location the record was scraped from
    pub location: String,
}

impl VehicleRecord {
    /// Create a new vehicle record
    pub fn new(name: String, color: String, sku: String, location: String) -> Self {
        Self {
            name,
            color,
            sku,
            location,
        }
    }
}

/// Why a site contributed no records
#[derive(Debug)]
pub enum SiteFailure {
    Fetch(FetchError),
    Parse(ParseError),
}

impl std::fmt::Display for SiteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteFailure::Fetch(e) => write!(f, "fetch failed: {}", e),
            SiteFailure::Parse(e) => write!(f, "parse failed: {}", e),
        }
    }
}

impl From<FetchError> for SiteFailure {
    fn from(e: FetchError) -> Self {
        SiteFailure::Fetch(e)
    }
}

impl From<ParseError> for SiteFailure {
    fn from(e: ParseError) -> Self {
        SiteFailure::Parse(e)
    }
}

/// Outcome of scraping a single site
#[derive(Debug)]
pub enum SiteOutcome {
    Records(Vec<VehicleRecord>),
    Failed(SiteFailure),
}

/// Outcome for one site, tagged with its location
#[derive(Debug)]
pub struct SiteReport {
    pub location: String,
    pub outcome: SiteOutcome,
}

impl SiteReport {
    /// Number of records this site contributed
    pub fn record_count(&self) -> usize {
        match &self.outcome {
            SiteOutcome::Records(records) => records.len(),
            SiteOutcome::Failed(_) => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SiteOutcome::Failed(_))
    }
}
