//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup, declaration order)
//!     → matcher.rs (evaluate prefix)
//!     → Return: matched Route or NoMatch
//!
//! Route Compilation (at startup):
//!     TargetMap (ordered)
//!     → Validate (no root prefix)
//!     → Compile prefix matchers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by declaration)

pub mod matcher;
pub mod router;

pub use router::{Route, RouteMatch, RouteTable};
