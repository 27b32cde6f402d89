pub mod registry;
pub mod traits;

// API provider implementations
pub mod anthropic;
pub mod coingecko;
pub mod cryptopanic;
