//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared by value into AppState at startup
//! ```
//!
//! # Design Decisions
//! - Config is fixed for the process lifetime; there is no reload
//! - All fields have defaults matching the reference deployment
//! - Upstream targets live only here; requests can never choose them

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, EdgeCacheConfig, GatewayConfig, HttpConfig, ListenerConfig, MemoConfig,
    ObservabilityConfig, PassthroughConfig, TimeoutConfig, UpstreamsConfig,
};
pub use validation::{validate_config, ValidationError};
