use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::cookies::SESSION_COOKIES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Client-side cookie store, optionally persisted as JSON.
///
/// Cookies are fed from `Set-Cookie` values so `Max-Age` is honored the same
/// way a browser would: `Max-Age=0` deletes, a positive value expires later.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, StoredCookie>,
    path: Option<PathBuf>,
}

impl CookieJar {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Jar backed by `path`; a missing file is an empty jar.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cookies = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { cookies, path: Some(path) })
    }

    /// Writes the jar back to its file; no-op for in-memory jars.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = &self.path {
            let content = serde_json::to_string_pretty(&self.cookies)?;
            fs::write(path, content)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .filter(|c| c.expires_at.map_or(true, |at| at > Utc::now()))
            .map(|c| c.value.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), StoredCookie { value: value.to_string(), expires_at: None });
    }

    pub fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
    }

    /// Applies one `Set-Cookie` header value.
    pub fn apply_set_cookie(&mut self, header: &str) {
        let mut parts = header.split(';').map(str::trim);
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let max_age = parts
            .filter_map(|attr| attr.split_once('='))
            .find(|(key, _)| key.eq_ignore_ascii_case("max-age"))
            .and_then(|(_, v)| v.trim().parse::<i64>().ok());

        match max_age {
            Some(secs) if secs <= 0 => self.remove(name),
            Some(secs) => {
                let expires_at = Some(Utc::now() + Duration::seconds(secs));
                self.cookies.insert(name.to_string(), StoredCookie { value: value.to_string(), expires_at });
            }
            None => self.set(name, value),
        }
    }

    /// Drops the four session cookies.
    pub fn clear_session(&mut self) {
        for name in SESSION_COOKIES {
            self.remove(name);
        }
    }

    /// `Cookie` request header for the live cookies, if any.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> =
            self.cookies.keys().filter_map(|name| self.get(name).map(|v| format!("{}={}", name, v))).collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }
}
