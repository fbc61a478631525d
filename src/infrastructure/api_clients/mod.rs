pub mod coingecko_client;

pub use coingecko_client::{parse_simple_price, CoinGeckoClient, COINGECKO_BASE_URL};
