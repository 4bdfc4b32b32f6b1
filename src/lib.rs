use reqwest::Client;
use rss::{ChannelBuilder, ItemBuilder};
use serde::Serialize;

pub mod extract;
pub mod fandango;
pub mod input;
pub mod present;

/// One movie playing at a theater, with its showtimes as short display
/// strings (e.g. "7:40p") in page order. Times are never parsed further.
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub title: String,
    pub showtimes: Vec<String>,
}

/// One theater from the listing page, identified only by its position on
/// the page. A theater with nothing playing has an empty movie list.
#[derive(Debug, Clone, Serialize)]
pub struct Theater {
    pub title: String,
    pub movies: Vec<Movie>,
}

/// The city/state/date triple a listing request is built from. The city is
/// already `+`-joined the way the listing URLs expect it.
#[derive(Debug, Clone)]
pub struct ShowtimesQuery {
    pub city: String,
    pub state: String,
    pub date: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The page body carries the site's "location can't be found" banner.
    #[error("this location can't be found")]
    LocationNotFound,
    #[error(transparent)]
    Layout(#[from] extract::ExtractError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Trait that all showtime sources must implement
#[async_trait::async_trait]
pub trait ShowtimesSource {
    /// Fetch the listing page for the query and extract its theaters
    async fn fetch_theaters(
        &self,
        client: &Client,
        query: &ShowtimesQuery,
    ) -> Result<Vec<Theater>, ScrapeError>;

    /// The listing URL a query resolves to (also used as the feed link)
    fn listing_url(&self, query: &ShowtimesQuery) -> String;
}

/// Generate an RSS feed from a list of theaters, one item per movie.
pub fn generate_rss(
    theaters: &[Theater],
    channel_title: &str,
    channel_link: &str,
    channel_description: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut items = Vec::new();

    for theater in theaters {
        for movie in &theater.movies {
            let mut description_parts = vec![format!("Theater: {}", theater.title)];
            if !movie.showtimes.is_empty() {
                description_parts.push(format!("Showtimes: {}", movie.showtimes.join(", ")));
            }
            let description = description_parts.join("<br/>\n");

            let guid = rss::Guid {
                value: format!("{}#{}/{}", channel_link, theater.title, movie.title),
                permalink: false,
            };

            let mut item_builder = ItemBuilder::default();
            item_builder.title(movie.title.clone());
            item_builder.link(channel_link.to_string());
            item_builder.description(description);
            item_builder.guid(guid);
            item_builder.pub_date(chrono::Utc::now().to_rfc2822());
            items.push(item_builder.build());
        }
    }

    let channel = ChannelBuilder::default()
        .title(channel_title)
        .link(channel_link)
        .description(channel_description)
        .items(items)
        .build();

    let mut buf = Vec::new();
    channel.write_to(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}
