pub mod asset;
pub mod cache;
pub mod news;
pub mod price;
pub mod sentiment;
pub mod settings;
pub mod snapshot;
pub mod summary;
