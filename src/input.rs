//! Interactive collection of the location and date, plus the pure
//! validators behind the prompts so they stay testable offline.

use std::io::{self, BufRead, Write};

use chrono::Local;

/// A location split into its URL pieces: multi-word cities are already
/// `+`-joined, the last token is the state abbreviation.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub state: String,
}

/// Split a free-text location into city and state. Needs at least two
/// whitespace tokens; the last one is the state, the rest form the city.
/// Spelling is not checked here, the listing site reports unknown places.
pub fn parse_location(raw: &str) -> Option<Location> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let (&state, city_tokens) = tokens.split_last()?;
    if city_tokens.is_empty() {
        return None;
    }
    Some(Location {
        city: city_tokens.join("+"),
        state: state.to_string(),
    })
}

/// Range check for an already length-checked date string: lexicographic
/// comparison against today's mm/dd/yyyy string, and the year field against
/// the current year string. Component values are deliberately not checked
/// beyond this (see DESIGN.md), matching the site tooling this replaces.
pub fn date_in_range(date: &str, today: &str, current_year: &str) -> bool {
    let Some(year) = date.split('/').nth(2) else {
        return false;
    };
    today <= date && current_year <= year
}

/// Exactly 10 characters of mm/dd/yyyy. Length is the only shape check.
pub fn date_has_format(date: &str) -> bool {
    date.chars().count() == 10
}

/// Prompt for a location until it parses. Never fails on bad input, only
/// on a closed or broken stdin.
pub fn prompt_location() -> io::Result<Location> {
    loop {
        let raw = prompt(
            "\n\nPlease enter your location in the following format: City St. e.g. Berkeley CA: ",
        )?;
        if let Some(location) = parse_location(&raw) {
            return Ok(location);
        }
        println!(
            "\nIncorrect format. Please check that you entered the location in City ST format \
             and that you included both a city and a state."
        );
    }
}

/// Prompt for a date until it passes the shape and range checks.
pub fn prompt_date() -> io::Result<String> {
    let now = Local::now();
    let today = now.format("%m/%d/%Y").to_string();
    let current_year = now.format("%Y").to_string();

    loop {
        let raw = prompt(
            "\n\nPlease enter the date you wish to see the movie in the following format \
             mm/dd/yyyy: ",
        )?;
        if !date_has_format(&raw) {
            println!(
                "Incorrect format. Please check that you entered the date in proper \
                 mm/dd/yyyy format"
            );
            continue;
        }
        if date_in_range(&raw, &today, &current_year) {
            return Ok(raw);
        }
        println!(
            "\nThe date you entered is outside of allowed range. Please check the date you \
             entered is today's date or later."
        );
    }
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    read_input_line(&mut io::stdin().lock())
}

/// A closed stdin reads as zero bytes, not as an error; surfacing it as
/// one keeps the prompt loops from spinning on the guidance message.
fn read_input_line(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
