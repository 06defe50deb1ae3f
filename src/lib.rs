pub mod analysis;
pub mod cover_letters;
pub mod database;
pub mod environment;
pub mod jobs;
pub mod utils;
pub mod web;

pub use web::start_web_server;
