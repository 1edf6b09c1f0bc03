use anyhow::{Context, Result};
use reqwest::blocking::Client;

use common::models::PackageTeams;

pub const DEFAULT_MAPPING_URL: &str =
    "https://people.canonical.com/~ubuntu-archive/package-team-mapping.json";

pub struct Api {
    client: Client,
    url: String,
}

impl Api {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Api { client, url })
    }

    /// Fetches the mapping fresh; there is no caching and no retry.
    pub fn fetch_mapping(&self) -> Result<PackageTeams> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("Failed to fetch team mapping from {}", self.url))?
            .error_for_status()?;

        response
            .json()
            .context("Team mapping is not a valid JSON team to packages object")
    }
}
