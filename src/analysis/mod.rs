pub mod market_status;
pub mod technicals;
