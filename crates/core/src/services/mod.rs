pub mod news_service;
pub mod quote_service;
pub mod summary_service;
