pub mod badges;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod store;
