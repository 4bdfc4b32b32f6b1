use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use reqwest::Client;

use showtime_scrape::fandango::{DEFAULT_BASE_URL, FandangoSource};
use showtime_scrape::{
    ScrapeError, ShowtimesQuery, ShowtimesSource, Theater, extract, generate_rss, input, present,
};

/// Find movie theaters and their showtimes for a city and date.
#[derive(Parser)]
#[command(name = "showtime-scrape", version)]
struct Cli {
    /// Location as "City ST" (e.g. "Berkeley CA"); skips the interactive prompt
    #[arg(long)]
    location: Option<String>,

    /// Date as mm/dd/yyyy, today or later; skips the interactive prompt
    #[arg(long)]
    date: Option<String>,

    /// Base URL of the listing site
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Extract from a saved listing page instead of fetching
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Print the theater list as JSON instead of the tree view
    #[arg(long)]
    json: bool,

    /// Also write the listings as an RSS feed to this path
    #[arg(long, value_name = "PATH")]
    rss_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Offline mode: run the extraction engine over a saved page.
    if let Some(path) = &cli.from_file {
        let page = std::fs::read_to_string(path)?;
        let theaters = extract::extract(&page)?;
        emit(&cli, &theaters, &cli.base_url)?;
        return Ok(());
    }

    let interactive = cli.location.is_none() || cli.date.is_none();
    if interactive {
        present::print_instructions();
    }

    // Build a client with a cookie store so the site's Set-Cookie
    // headers are remembered across the retry loop.
    let client = Client::builder().cookie_store(true).build()?;
    let source = FandangoSource::new(cli.base_url.clone());

    // Unknown locations redo the whole input-collection step; everything
    // else (network, HTTP status, page layout) is fatal.
    let (theaters, url) = loop {
        let query = collect_query(&cli)?;
        let url = source.listing_url(&query);
        match source.fetch_theaters(&client, &query).await {
            Ok(theaters) => break (theaters, url),
            Err(ScrapeError::LocationNotFound) if cli.location.is_none() => {
                println!(
                    "\nThe location you entered cannot be found. Please check that your \
                     location was spelled correctly and entered in the correct format"
                );
            }
            Err(err) => return Err(err.into()),
        }
    };

    emit(&cli, &theaters, &url)
}

/// Gather the city/state/date triple, from flags when given and from the
/// prompt loops otherwise. A flag value that fails validation is fatal
/// rather than re-prompted.
fn collect_query(cli: &Cli) -> Result<ShowtimesQuery, Box<dyn Error>> {
    let location = match &cli.location {
        Some(raw) => input::parse_location(raw)
            .ok_or("location must be given in City ST format, e.g. \"Berkeley CA\"")?,
        None => input::prompt_location()?,
    };

    let date = match &cli.date {
        Some(date) => {
            let now = chrono::Local::now();
            let today = now.format("%m/%d/%Y").to_string();
            let current_year = now.format("%Y").to_string();
            if !input::date_has_format(date) {
                return Err("date must be given in mm/dd/yyyy format".into());
            }
            if !input::date_in_range(date, &today, &current_year) {
                return Err("date must be today's date or later".into());
            }
            date.clone()
        }
        None => input::prompt_date()?,
    };

    Ok(ShowtimesQuery {
        city: location.city,
        state: location.state,
        date,
    })
}

fn emit(cli: &Cli, theaters: &[Theater], link: &str) -> Result<(), Box<dyn Error>> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(theaters)?);
    } else {
        present::print_showtimes(theaters);
    }

    if let Some(path) = &cli.rss_out {
        let feed = generate_rss(
            theaters,
            "Movie showtimes",
            link,
            "Theaters and showtimes scraped from the movietimes listing page",
        )?;
        std::fs::write(path, feed)?;
        log::info!("wrote RSS feed to {}", path.display());
    }

    Ok(())
}
