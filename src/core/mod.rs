pub mod timeseries;
pub mod webhook_store;
