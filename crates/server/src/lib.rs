pub mod block;
pub mod config;
pub mod error;
pub mod metrics;
pub mod net;
pub mod player_registry;
pub mod protocol;
pub mod session;
pub mod spawn;
pub mod state;
