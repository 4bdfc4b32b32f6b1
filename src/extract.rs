//! Marker-based extraction over a fetched listing page.
//!
//! The listing site is scanned with literal substring markers instead of a
//! structural HTML parse, so any markup change breaks extraction loudly here
//! rather than silently upstream. Callers only see
//! `extract(page) -> Vec<Theater>`; a structural parser could replace this
//! module without touching them.

use crate::{Movie, Theater};

/// Opens every theater block on the listing page.
const THEATER_MARKER: &str = "showtimes-theater-title";
/// Opens every movie block inside a theater block.
const MOVIE_MARKER: &str = "showtimes-movie-container";
/// Present in theater or movie blocks that have nothing playing.
const NO_MOVIES_PHRASE: &str = "there are no movies";
/// The theater title anchor closes with this tag.
const TITLE_CLOSE: &str = "</a>";
/// The movie poster alt text reads "<title> showtimes and tickets".
const ALT_ATTR: &str = "alt=\"";
const MOVIE_TITLE_END: &str = "showtimes and tickets";
/// Each showtime sits directly before this closing tag.
const TIME_CLOSE: &str = "</time>";

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// An expected marker was missing inside a fragment.
    #[error("unrecognized page layout: no {0} in fragment")]
    UnrecognizedLayout(&'static str),
    /// A `</time>` tag had fewer than the 6/7 bytes of showtime text
    /// expected before it, or the slice fell off a character boundary.
    #[error("malformed showtime fragment at byte {0}")]
    MalformedShowtime(usize),
}

/// Extract the theater/movie/showtime tree from a listing page body.
/// A page with no theater markers yields an empty list.
pub fn extract(page: &str) -> Result<Vec<Theater>, ExtractError> {
    let mut theaters = Vec::new();

    for fragment in split_at_marker(THEATER_MARKER, page) {
        let title = theater_title(fragment)?;

        // A dark theater carries the banner in the theater block itself,
        // before any movie container. Checking the whole fragment would
        // also match banners inside individual movie containers, which
        // belong to the movie-level skip below.
        let head_end = fragment.find(MOVIE_MARKER).unwrap_or(fragment.len());
        if fragment[..head_end].contains(NO_MOVIES_PHRASE) {
            theaters.push(Theater {
                title,
                movies: Vec::new(),
            });
            continue;
        }

        let mut movies = Vec::new();
        for movie_fragment in split_at_marker(MOVIE_MARKER, fragment) {
            if movie_fragment.contains(NO_MOVIES_PHRASE) {
                continue;
            }
            movies.push(Movie {
                title: movie_title(movie_fragment)?,
                showtimes: showtimes(movie_fragment)?,
            });
        }

        theaters.push(Theater { title, movies });
    }

    Ok(theaters)
}

/// Partition `text` at every occurrence of `marker`. Each returned segment
/// starts at a marker and runs to the next one (or end of input); text
/// before the first marker is discarded.
fn split_at_marker<'a>(marker: &str, text: &'a str) -> Vec<&'a str> {
    let mut starts = Vec::new();
    let mut from = 0;
    while let Some(pos) = text[from..].find(marker) {
        let at = from + pos;
        starts.push(at);
        from = at + marker.len();
    }

    let mut segments = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        segments.push(&text[start..end]);
    }
    segments
}

/// The theater title is the text between the first `>` after the fragment
/// start (the end of the title anchor's open tag) and the first `</a>`.
fn theater_title(fragment: &str) -> Result<String, ExtractError> {
    let open = fragment
        .find('>')
        .ok_or(ExtractError::UnrecognizedLayout("title anchor open tag"))?;
    let close = fragment
        .find(TITLE_CLOSE)
        .ok_or(ExtractError::UnrecognizedLayout("title anchor close tag"))?;
    if close <= open {
        return Err(ExtractError::UnrecognizedLayout("title anchor open tag"));
    }
    Ok(normalize_ws(&fragment[open + 1..close]))
}

/// The movie title is the poster alt text up to the trailing
/// "showtimes and tickets" suffix.
fn movie_title(fragment: &str) -> Result<String, ExtractError> {
    let end = fragment
        .find(MOVIE_TITLE_END)
        .ok_or(ExtractError::UnrecognizedLayout("showtimes-and-tickets marker"))?;
    let head = &fragment[..end];
    let alt = head
        .find(ALT_ATTR)
        .ok_or(ExtractError::UnrecognizedLayout("poster alt attribute"))?;
    Ok(normalize_ws(&head[alt + ALT_ATTR.len()..]))
}

/// Collect every showtime in a movie fragment, left to right. The time is
/// the 7 bytes before each `</time>`, or 6 when the byte 7 back is `>`
/// (times render with or without a leading markup byte). Too little
/// lookback is an explicit error, never a wrapped slice.
fn showtimes(fragment: &str) -> Result<Vec<String>, ExtractError> {
    let bytes = fragment.as_bytes();
    let mut times = Vec::new();
    let mut from = 0;

    while let Some(pos) = fragment[from..].find(TIME_CLOSE) {
        let close = from + pos;
        if close < 7 {
            return Err(ExtractError::MalformedShowtime(close));
        }
        let start = if bytes[close - 7] == b'>' {
            close - 6
        } else {
            close - 7
        };
        let time = fragment
            .get(start..close)
            .ok_or(ExtractError::MalformedShowtime(close))?;
        times.push(time.to_string());
        from = close + 1;
    }

    Ok(times)
}

/// Trim and collapse runs of whitespace, the way the page's pretty-printed
/// markup requires.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theater_block(title: &str, movies: &str) -> String {
        format!(
            "<a class=\"showtimes-theater-title\" href=\"/theater\">\n  {}\n</a>\n{}",
            title, movies
        )
    }

    fn movie_block(title: &str, times: &[&str]) -> String {
        let times: String = times
            .iter()
            .map(|t| format!("<time datetime=\"\">{}</time>", t))
            .collect();
        format!(
            "<div class=\"showtimes-movie-container\">\
             <img alt=\"{} showtimes and tickets\" src=\"/poster.jpg\">{}</div>",
            title, times
        )
    }

    #[test]
    fn page_without_theater_markers_is_empty() {
        let theaters = extract("<html><body>nothing here</body></html>").unwrap();
        assert!(theaters.is_empty());
    }

    #[test]
    fn extracts_theaters_movies_and_showtimes_in_page_order() {
        let page = format!(
            "<html>{}{}</html>",
            theater_block(
                "Berkeley 7",
                &format!(
                    "{}{}",
                    movie_block("John Wick", &["7:40pm", "10:10pm"]),
                    movie_block("Nightcrawler", &["9:20pm"]),
                ),
            ),
            theater_block("Shattuck Cinemas", &movie_block("Interstellar", &["10:20am"])),
        );

        let theaters = extract(&page).unwrap();
        assert_eq!(theaters.len(), 2);
        assert_eq!(theaters[0].title, "Berkeley 7");
        assert_eq!(theaters[0].movies.len(), 2);
        assert_eq!(theaters[0].movies[0].title, "John Wick");
        assert_eq!(theaters[0].movies[0].showtimes, vec!["7:40pm", "10:10pm"]);
        assert_eq!(theaters[0].movies[1].title, "Nightcrawler");
        assert_eq!(theaters[1].title, "Shattuck Cinemas");
        assert_eq!(theaters[1].movies[0].showtimes, vec!["10:20am"]);
    }

    #[test]
    fn no_movies_phrase_yields_theater_with_empty_movie_list() {
        let page = theater_block(
            "Closed Palace",
            "<p>Sorry, there are no movies showing today.</p>",
        );
        let theaters = extract(&page).unwrap();
        assert_eq!(theaters.len(), 1);
        assert_eq!(theaters[0].title, "Closed Palace");
        assert!(theaters[0].movies.is_empty());
    }

    #[test]
    fn no_movies_movie_fragment_is_skipped() {
        let movies = format!(
            "{}<div class=\"showtimes-movie-container\">there are no movies</div>",
            movie_block("Saw", &["9:30pm"]),
        );
        let page = theater_block("Berkeley 7", &movies);
        let theaters = extract(&page).unwrap();
        assert_eq!(theaters[0].movies.len(), 1);
        assert_eq!(theaters[0].movies[0].title, "Saw");
        assert_eq!(theaters[0].movies[0].showtimes, vec!["9:30pm"]);
    }

    #[test]
    fn no_movies_fragment_before_a_playing_movie_is_skipped() {
        // The banner inside a movie container must not empty the whole
        // theater, wherever the container sits.
        let movies = format!(
            "<div class=\"showtimes-movie-container\">there are no movies</div>{}",
            movie_block("Saw", &["9:30pm"]),
        );
        let page = theater_block("Berkeley 7", &movies);
        let theaters = extract(&page).unwrap();
        assert_eq!(theaters[0].title, "Berkeley 7");
        assert_eq!(theaters[0].movies.len(), 1);
        assert_eq!(theaters[0].movies[0].title, "Saw");
    }

    #[test]
    fn showtimes_appear_left_to_right() {
        let fragment = "x<time>9:30pm</time>y<time>10:10pm</time>";
        assert_eq!(showtimes(fragment).unwrap(), vec!["9:30pm", "10:10pm"]);
    }

    #[test]
    fn lookback_width_follows_leading_markup_byte() {
        // 6-char time directly preceded by '>' takes 6 bytes; a 7-char
        // time pushes the '>' out of the lookback window and takes 7.
        assert_eq!(showtimes("<time>7:40pm</time>").unwrap(), vec!["7:40pm"]);
        assert_eq!(showtimes("<time>10:10pm</time>").unwrap(), vec!["10:10pm"]);
    }

    #[test]
    fn short_lookback_is_a_malformed_fragment_error() {
        let err = showtimes("9p</time>").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedShowtime(_)));
    }

    #[test]
    fn multibyte_boundary_is_a_malformed_fragment_error() {
        // The lookback start lands on the second byte of 'é'; the slice
        // must become an error, not a panic.
        let err = showtimes("aé4:30pm</time>").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedShowtime(_)));
    }

    #[test]
    fn missing_title_anchor_is_unrecognized_layout() {
        let page = "showtimes-theater-title\"><span>Berkeley 7</span>";
        let err = extract(page).unwrap_err();
        assert!(matches!(err, ExtractError::UnrecognizedLayout(_)));
    }

    #[test]
    fn movie_title_round_trips() {
        let block = movie_block("The Grand Budapest Hotel", &["6:15pm"]);
        let page = theater_block("Roxie", &block);
        let title = &extract(&page).unwrap()[0].movies[0].title;
        assert_eq!(title, "The Grand Budapest Hotel");

        // Re-inserting the extracted title at the same position and
        // re-running extraction yields the same title.
        let page = theater_block("Roxie", &movie_block(title, &["6:15pm"]));
        assert_eq!(&extract(&page).unwrap()[0].movies[0].title, title);
    }

    #[test]
    fn split_keeps_marker_at_segment_start() {
        let segments = split_at_marker("b", "abcdeabcde");
        assert_eq!(segments, vec!["bcdea", "bcde"]);
    }
}
