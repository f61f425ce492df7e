//! Fixed catalog used when no saved state exists or no provider key is configured

use super::entry::{CatalogEntry, NewEntry};

struct SeedMovie {
    id: &'static str,
    title: &'static str,
    year: &'static str,
    poster: &'static str,
    plot: &'static str,
    genre: &'static str,
    imdb_rating: &'static str,
}

const SEED_MOVIES: &[SeedMovie] = &[
    SeedMovie {
        id: "tt1375666",
        title: "Inception",
        year: "2010",
        poster: "https://m.media-amazon.com/images/M/MV5BMjAxMzY3NjcxNF5BMl5BanBnXkFtZTcwNTI5OTM0Mw@@._V1_SX300.jpg",
        plot: "A thief who steals corporate secrets through the use of dream-sharing technology.",
        genre: "Action, Sci-Fi, Thriller",
        imdb_rating: "8.8",
    },
    SeedMovie {
        id: "tt0109830",
        title: "Forrest Gump",
        year: "1994",
        poster: "https://m.media-amazon.com/images/M/MV5BNWIwODRlZTUtY2U3ZS00Yzg1LWJhNzYtMmZiYmEyNmU1NjMzXkEyXkFQI1BanBnXkFtZTgwMTQ4NjkxNjE@._V1_SX300.jpg",
        plot: "The presidencies of Kennedy and Johnson, the Vietnam War, and more.",
        genre: "Comedy, Drama, Romance",
        imdb_rating: "8.8",
    },
    SeedMovie {
        id: "tt0848228",
        title: "The Avengers",
        year: "2012",
        poster: "https://m.media-amazon.com/images/M/MV5BNDYxNjQyMjAtNTdiOS00NGYwLWFmNTAtNThmYjU5ZGI2YTI1XkEyXkFQI1BanBnXkFtZTcwMTM0NTUxMw@@._V1_SX300.jpg",
        plot: "Earth's mightiest heroes must come together to stop Loki.",
        genre: "Action, Sci-Fi",
        imdb_rating: "8.0",
    },
    SeedMovie {
        id: "tt0137523",
        title: "Fight Club",
        year: "1999",
        poster: "https://m.media-amazon.com/images/M/MV5BNDIzNDU0YzEtYzE5NS00YTA5LTg2YzItMTkzZjc1ZTdmZGM0XkEyXkFQI1BanBnXkFtZTcwMDU5NjAyNA@@._V1_SX300.jpg",
        plot: "An insomniac and a soap salesman form an underground fight club.",
        genre: "Comedy, Drama",
        imdb_rating: "8.8",
    },
    SeedMovie {
        id: "tt0111161",
        title: "The Shawshank Redemption",
        year: "1994",
        poster: "https://m.media-amazon.com/images/M/MV5BNDE3ODcxYzMtY2YzZC00NmNkLWJiNDEtZDViZWM2MzIxZDYwXkEyXkFQI1BanBnXkFtZTcwMTIwNjAzNw@@._V1_SX300.jpg",
        plot: "Two imprisoned men bond over a number of years.",
        genre: "Drama",
        imdb_rating: "9.3",
    },
];

/// The built-in seed catalog, in display order
pub fn seed_catalog() -> Vec<CatalogEntry> {
    SEED_MOVIES
        .iter()
        .map(|m| {
            CatalogEntry::new(NewEntry {
                id: Some(m.id.to_string()),
                title: Some(m.title.to_string()),
                year: Some(m.year.to_string()),
                poster: Some(m.poster.to_string()),
                plot: Some(m.plot.to_string()),
                genre: Some(m.genre.to_string()),
                imdb_rating: Some(m.imdb_rating.to_string()),
            })
        })
        .collect()
}
