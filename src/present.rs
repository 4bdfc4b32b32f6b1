//! Console output: the instructions header and the indented
//! theater/movie/showtime tree. No logic lives here.

use crate::Theater;

pub fn print_instructions() {
    println!("\n\nWelcome to the movie showtimes generator!");
    println!("Please enter the city and state where you wish to find movie times.");
    println!("Then enter the date which you are interested in.");
    println!("The movie showtimes generator will then return all theaters and showtimes in your area.");
}

/// Print the extracted tree: theater title, each movie, each showtime,
/// blank line between theaters. Theaters with nothing playing print the
/// title only.
pub fn print_showtimes(theaters: &[Theater]) {
    for theater in theaters {
        println!("\nTheater: {}\n", theater.title);

        for movie in &theater.movies {
            println!("  Movie: {}", movie.title);
            for time in &movie.showtimes {
                println!("         {time}");
            }
            println!();
        }
    }
}
