//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the target for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan (acceptable for typical target counts)
//! - First declared match wins, not the longest prefix
//! - Explicit NoMatch rather than silent default

use crate::config::targets::{TargetDefinition, TargetMap};
use crate::config::validation::{validate_targets, ValidationError};
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// A compiled route: prefix matcher plus the target it forwards to.
#[derive(Debug, Clone)]
pub struct Route {
    pub route_key: String,
    pub matcher: PathPrefixMatcher,
    pub target: TargetDefinition,
}

impl Route {
    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
}

impl<'a> RouteMatch<'a> {
    pub fn route_key(&self) -> &'a str {
        &self.route.route_key
    }

    pub fn target(&self) -> &'a TargetDefinition {
        &self.route.target
    }

    pub fn matched_prefix(&self) -> &'a str {
        self.route.prefix()
    }
}

/// Ordered `(prefix, target)` table built once from the target registry.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile the table, keeping declaration order.
    ///
    /// Fails if any target is unroutable, in particular one whose effective
    /// prefix is `/`.
    pub fn build(targets: &TargetMap) -> Result<Self, Vec<ValidationError>> {
        validate_targets(targets)?;

        let routes = targets
            .iter()
            .map(|(route_key, target)| Route {
                route_key: route_key.clone(),
                matcher: PathPrefixMatcher::new(target.effective_prefix(route_key)),
                target: target.clone(),
            })
            .collect();

        Ok(Self { routes })
    }

    /// Find the first route whose prefix the path starts with.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map(|route| RouteMatch { route })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
