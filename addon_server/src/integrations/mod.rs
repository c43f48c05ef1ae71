mod marketplace;

pub use marketplace::PlatformTokenExchange;
