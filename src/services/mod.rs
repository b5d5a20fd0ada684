// Services module - fetching, aggregation and report output

// Metadata providers
pub mod omdb;
pub mod tmdb;

pub mod catalog;
pub mod report;
