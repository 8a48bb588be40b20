pub mod availability;
pub mod config;
pub mod court;
pub mod error;
pub mod export;
pub mod http_client;
pub mod logging;
pub mod nba_fetch;
pub mod projection;
pub mod results;
pub mod roster;
pub mod sessions;
pub mod shot;
pub mod similarity;
pub mod state;
pub mod store;
pub mod synthetic;
pub mod zones;
