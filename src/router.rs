use crate::config::{Origin, UpstreamConfig};

/// Paths the backend serves besides `/api/*`. Matched exactly; a trailing
/// slash makes the path frontend traffic.
const BACKEND_EXACT_PATHS: [&str; 3] = ["/docs", "/openapi.json", "/health"];

/// Which upstream a request is routed to. Derived from the path alone,
/// never from the method, headers or body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Backend,
    Frontend,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Backend => "backend",
            Decision::Frontend => "frontend",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a request path. Total over all paths: every input yields
/// exactly one decision, first match wins.
pub fn classify(path: &str) -> Decision {
    if path.starts_with("/api/") {
        return Decision::Backend;
    }
    if BACKEND_EXACT_PATHS.contains(&path) {
        return Decision::Backend;
    }
    Decision::Frontend
}

#[derive(Debug, Clone)]
pub struct Router {
    upstreams: UpstreamConfig,
}

impl Router {
    pub fn new(upstreams: UpstreamConfig) -> Self {
        Router { upstreams }
    }

    pub fn origin(&self, decision: Decision) -> &Origin {
        match decision {
            Decision::Backend => &self.upstreams.backend,
            Decision::Frontend => &self.upstreams.frontend,
        }
    }

    /// Builds the upstream URL for a request: origin + path, with the
    /// original query string appended verbatim when present.
    pub fn upstream_url(&self, decision: Decision, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.origin(decision), path, q),
            None => format!("{}{}", self.origin(decision), path),
        }
    }

    /// The SPA fallback target on the frontend origin.
    pub fn frontend_index_url(&self) -> String {
        format!("{}/index.html", self.upstreams.frontend)
    }
}
