//! Route table and public/protected classification.
//!
//! The registry is built once at startup from the same declarations the
//! router is assembled from, and is read-only afterwards. Classification is
//! fail-closed: a path that matches no registered pattern requires
//! authentication.

use axum::http::Method;

/// Whether a request path requires authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// A registered route: its path pattern, allowed methods, and whether it can
/// be served without authentication.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: String,
    pub methods: Vec<Method>,
    pub public: bool,
}

impl RouteEntry {
    pub fn new(pattern: &str, methods: &[Method], public: bool) -> Self {
        Self {
            pattern: pattern.to_string(),
            methods: methods.to_vec(),
            public,
        }
    }
}

/// One parsed segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{name}` matches exactly one non-empty path segment
    Variable,
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    entry: RouteEntry,
    segments: Vec<Segment>,
    /// Number of literal segments, used as the tie-break score
    literal_count: usize,
}

/// Errors from registry construction. These are startup failures; the
/// process must not serve traffic with a malformed route table.
#[derive(Debug)]
pub enum RegistryError {
    /// Pattern is empty or does not start with '/'
    InvalidPattern(String),
    /// A `{var}` segment is unclosed or mixes literal text with a variable
    InvalidSegment { pattern: String, segment: String },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::InvalidPattern(p) => write!(f, "Invalid route pattern: {}", p),
            RegistryError::InvalidSegment { pattern, segment } => {
                write!(f, "Invalid segment '{}' in route pattern {}", segment, pattern)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// The startup-built table of registered routes.
pub struct RouteRegistry {
    routes: Vec<CompiledRoute>,
}

impl RouteRegistry {
    /// Compile a route table. Fails if any pattern is malformed.
    pub fn build(entries: Vec<RouteEntry>) -> Result<Self, RegistryError> {
        let mut routes = Vec::with_capacity(entries.len());
        for entry in entries {
            let segments = compile_pattern(&entry.pattern)?;
            let literal_count = segments
                .iter()
                .filter(|s| matches!(s, Segment::Literal(_)))
                .count();
            routes.push(CompiledRoute {
                entry,
                segments,
                literal_count,
            });
        }
        Ok(Self { routes })
    }

    /// Classify a concrete request path as public or protected.
    ///
    /// When several patterns structurally match the same path, the one with
    /// the most literal segments wins; ties fall back to registration order.
    /// The root pattern `/` never makes an API path (anything under `/api/`)
    /// public, so a UI index route cannot accidentally expose an API index.
    pub fn classify(&self, path: &str) -> Access {
        let mut best: Option<&CompiledRoute> = None;

        for route in &self.routes {
            if !matches_path(&route.segments, path) {
                continue;
            }
            if route.entry.pattern == "/" && path.starts_with("/api/") {
                continue;
            }
            match best {
                Some(current) if current.literal_count >= route.literal_count => {}
                _ => best = Some(route),
            }
        }

        match best {
            Some(route) if route.entry.public => Access::Public,
            // Unknown paths are protected: fail closed
            _ => Access::Protected,
        }
    }

    /// Look up the registered entry whose pattern owns the given path.
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        let mut best: Option<&CompiledRoute> = None;
        for route in &self.routes {
            if !matches_path(&route.segments, path) {
                continue;
            }
            match best {
                Some(current) if current.literal_count >= route.literal_count => {}
                _ => best = Some(route),
            }
        }
        best.map(|r| &r.entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().map(|r| &r.entry)
    }
}

fn compile_pattern(pattern: &str) -> Result<Vec<Segment>, RegistryError> {
    if pattern.is_empty() || !pattern.starts_with('/') {
        return Err(RegistryError::InvalidPattern(pattern.to_string()));
    }

    // "/" compiles to a single empty literal so it only matches the root
    let mut segments = Vec::new();
    for raw in pattern[1..].split('/') {
        if raw.starts_with('{') || raw.ends_with('}') {
            if !(raw.starts_with('{') && raw.ends_with('}') && raw.len() > 2) {
                return Err(RegistryError::InvalidSegment {
                    pattern: pattern.to_string(),
                    segment: raw.to_string(),
                });
            }
            segments.push(Segment::Variable);
        } else if raw.contains('{') || raw.contains('}') {
            return Err(RegistryError::InvalidSegment {
                pattern: pattern.to_string(),
                segment: raw.to_string(),
            });
        } else {
            segments.push(Segment::Literal(raw.to_string()));
        }
    }
    Ok(segments)
}

fn matches_path(segments: &[Segment], path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() != segments.len() {
        return false;
    }
    segments.iter().zip(parts).all(|(seg, part)| match seg {
        Segment::Literal(lit) => lit == part,
        Segment::Variable => !part.is_empty(),
    })
}
