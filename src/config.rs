use anyhow::{bail, Context, Result};
use url::Url;

/// A validated upstream base origin: scheme + host (+ optional port), no
/// path, query or fragment. Stored without a trailing slash so request
/// paths can be appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(String);

impl Origin {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("Invalid origin URL: {}", raw))?;

        match url.scheme() {
            "http" | "https" => {}
            other => bail!("Origin {} has unsupported scheme `{}`", raw, other),
        }

        if url.host_str().is_none() {
            bail!("Origin {} has no host", raw);
        }

        // A bare trailing slash is tolerated; anything else is a path and
        // belongs to the request, not the origin.
        if url.path() != "/" && !url.path().is_empty() {
            bail!("Origin {} must not contain a path (got `{}`)", raw, url.path());
        }
        if url.query().is_some() || url.fragment().is_some() {
            bail!("Origin {} must not contain a query or fragment", raw);
        }

        Ok(Origin(raw.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two upstream origins, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub frontend: Origin,
    pub backend: Origin,
}

impl UpstreamConfig {
    pub fn new(frontend_origin: &str, backend_origin: &str) -> Result<Self> {
        Ok(UpstreamConfig {
            frontend: Origin::parse(frontend_origin)?,
            backend: Origin::parse(backend_origin)?,
        })
    }
}
