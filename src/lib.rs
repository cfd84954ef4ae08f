pub mod agenda;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod summarizer;
