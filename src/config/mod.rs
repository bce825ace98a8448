//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MockConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields except target definitions have defaults
//! - Validation separates syntactic (serde) from semantic checks
//! - Targets keep declaration order (see targets.rs)

pub mod loader;
pub mod schema;
pub mod targets;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LambdaConfig, LimitsConfig, ListenerConfig, LogFormat, MockConfig, ObservabilityConfig};
pub use targets::{TargetDefinition, TargetMap};
pub use validation::ValidationError;
