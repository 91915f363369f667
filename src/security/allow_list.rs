//! Hostname allow-list for the passthrough proxy.

use std::collections::HashSet;

use url::Url;

use crate::error::GatewayError;

/// Exact, case-insensitive hostname allow-list.
#[derive(Debug, Clone)]
pub struct HostAllowList {
    hosts: HashSet<String>,
}

impl HostAllowList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Parse `target` and accept it only if its host is listed.
    ///
    /// Unparseable targets and non-http(s) schemes are rejected the same way
    /// as unlisted hosts.
    pub fn check(&self, target: &str) -> Result<Url, GatewayError> {
        let denied = || GatewayError::HostNotAllowed {
            target: target.to_string(),
        };

        let url = Url::parse(target).map_err(|_| denied())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(denied());
        }

        match url.host_str() {
            Some(host) if self.hosts.contains(&host.to_ascii_lowercase()) => Ok(url),
            _ => Err(denied()),
        }
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
