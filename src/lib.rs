// Library exports for testing and binaries

pub mod config;
pub mod contact;
pub mod email;
pub mod i18n;
pub mod metrics;
pub mod project;
pub mod retry;
pub mod server;
