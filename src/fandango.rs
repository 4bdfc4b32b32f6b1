use crate::extract;
use crate::{ScrapeError, ShowtimesQuery, ShowtimesSource, Theater};
use reqwest::{Client, header};

pub const DEFAULT_BASE_URL: &str = "http://www.fandango.com";

/// The site renders this banner instead of listings when the city/state
/// does not resolve.
const NOT_FOUND_PHRASE: &str = "This location can't be found.";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Showtimes source backed by the Fandango movietimes listing pages.
pub struct FandangoSource {
    base_url: String,
}

impl FandangoSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ShowtimesSource for FandangoSource {
    async fn fetch_theaters(
        &self,
        client: &Client,
        query: &ShowtimesQuery,
    ) -> Result<Vec<Theater>, ScrapeError> {
        let url = self.listing_url(query);
        log::debug!("fetching listing page {url}");

        let resp = client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.text().await?;

        if body.contains(NOT_FOUND_PHRASE) {
            return Err(ScrapeError::LocationNotFound);
        }

        let theaters = extract::extract(&body)?;
        log::debug!("extracted {} theaters from {url}", theaters.len());
        Ok(theaters)
    }

    fn listing_url(&self, query: &ShowtimesQuery) -> String {
        format!(
            "{}/{}_+{}_movietimes?date={}",
            self.base_url,
            query.city.to_lowercase(),
            query.state.to_lowercase(),
            query.date
        )
    }
}
