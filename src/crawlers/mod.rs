pub mod crawler;
pub mod web;

pub use crawler::PageFetcher;
pub use web::HttpFetcher;

use crate::config::SiteProfile;
use crate::parsers::html;
use crate::results::{SiteFailure, SiteOutcome, SiteReport, VehicleRecord};
use futures::future::join_all;

/// Fetches and extracts every site concurrently.
///
/// All requests are started at once and every outcome is awaited, so one
/// failing or slow site never cancels the others. Reports come back in the
/// same order as `profiles`.
pub async fn collect(profiles: &[SiteProfile], fetcher: &dyn PageFetcher) -> Vec<SiteReport> {
    ::log::info!("Scraping {} sites", profiles.len());

    let reports = join_all(profiles.iter().map(|profile| scrape_site(profile, fetcher))).await;

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    ::log::info!(
        "Scraped {} sites: {} succeeded, {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    );

    reports
}

/// Flattens reports into one record list, site order then document order
pub fn flatten(reports: Vec<SiteReport>) -> Vec<VehicleRecord> {
    reports
        .into_iter()
        .flat_map(|report| match report.outcome {
            SiteOutcome::Records(records) => records,
            SiteOutcome::Failed(_) => Vec::new(),
        })
        .collect()
}

/// Scrapes a single site, converting any failure into a report entry
async fn scrape_site(profile: &SiteProfile, fetcher: &dyn PageFetcher) -> SiteReport {
    let outcome = match fetch_and_extract(profile, fetcher).await {
        Ok(records) => {
            ::log::info!("Found {} vehicles at {}", records.len(), profile.location);
            SiteOutcome::Records(records)
        }
        Err(failure) => {
            ::log::warn!("Skipping {}: {}", profile.location, failure);
            SiteOutcome::Failed(failure)
        }
    };

    SiteReport {
        location: profile.location.clone(),
        outcome,
    }
}

async fn fetch_and_extract(
    profile: &SiteProfile,
    fetcher: &dyn PageFetcher,
) -> Result<Vec<VehicleRecord>, SiteFailure> {
    let page = fetcher.fetch(&profile.url).await?;
    let records = html::extract(&page, &profile.selectors.selectors(), &profile.location)?;
    Ok(records)
}
