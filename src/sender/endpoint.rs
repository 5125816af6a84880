use std::fmt;

pub const GA_HOST: &str = "www.google-analytics.com";

/// Secure collection endpoint.
pub const GA_HTTPS: &str = "https://www.google-analytics.com/";

/// Insecure collection endpoint.
pub const GA_HTTP: &str = "http://www.google-analytics.com/";

/// Validation endpoint; hits are checked but never recorded.
pub const GA_DEBUG: &str = "https://www.google-analytics.com/debug/";

/// Base URL the buffered client sends to. Every base ends in `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Endpoint {
    #[default]
    Https,
    Http,
    Debug,
    Custom(String),
}

impl Endpoint {
    /// `""` and `"https"` select the secure endpoint, `"http"` the insecure
    /// one. Anything else is taken as a full base URL.
    pub fn parse(endpoint: &str) -> Self {
        match endpoint {
            "" | "https" => Endpoint::Https,
            "http" => Endpoint::Http,
            other => Endpoint::Custom(other.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Https => GA_HTTPS,
            Endpoint::Http => GA_HTTP,
            Endpoint::Debug => GA_DEBUG,
            Endpoint::Custom(url) => url,
        }
    }

    /// Single-hit URL; the fragment travels as the query string.
    pub fn collect_url(&self, fragment: &str) -> String {
        format!("{}collect?{}", self.base_url(), fragment)
    }

    pub fn batch_url(&self) -> String {
        format!("{}batch", self.base_url())
    }
}

impl From<&str> for Endpoint {
    fn from(endpoint: &str) -> Self {
        Endpoint::parse(endpoint)
    }
}

impl From<String> for Endpoint {
    fn from(endpoint: String) -> Self {
        Endpoint::parse(&endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url())
    }
}
