mod backend;
pub use backend::HttpBackend;

mod config;
pub use config::HttpBackendConfig;
