//! Data types for the scrapi client
//!
//! Job bookkeeping types returned by the backend, plus the request option
//! bundles callers use to describe a scraping job. Option types serialize
//! straight into the backend's JSON payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScrapiError};

/// Default search domain (top-level domain of the target site)
pub const DEFAULT_DOMAIN: &str = "com";
/// Default first results page
pub const DEFAULT_START_PAGE: i32 = 1;
/// Default number of result pages
pub const DEFAULT_PAGES: i32 = 1;
/// Default number of results per page
pub const DEFAULT_LIMIT: i32 = 10;
/// Default user-agent class
pub const DEFAULT_USER_AGENT: &str = "desktop";

/// Identifier of a backend job, returned by the submit call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Job status as reported by a poll call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still queued or running
    Pending,
    /// Results are ready to fetch
    Done,
    /// Backend gave up on the job
    Faulted,
    /// Any other literal; treated as non-terminal
    Other(String),
}

impl JobStatus {
    /// `done` and `faulted` end polling; everything else keeps it going.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Faulted)
    }
}

impl From<&str> for JobStatus {
    fn from(status: &str) -> Self {
        match status {
            "pending" => Self::Pending,
            "done" => Self::Done,
            "faulted" => Self::Faulted,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Body of a poll response; only `status` is required
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JobInfo {
    pub status: String,
}

/// Device class the backend should impersonate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAgent {
    Desktop,
    DesktopChrome,
    DesktopEdge,
    DesktopFirefox,
    DesktopOpera,
    DesktopSafari,
    Mobile,
    MobileAndroid,
    MobileIos,
    Tablet,
    TabletAndroid,
    TabletIos,
}

impl UserAgent {
    pub const ALL: [UserAgent; 12] = [
        Self::Desktop,
        Self::DesktopChrome,
        Self::DesktopEdge,
        Self::DesktopFirefox,
        Self::DesktopOpera,
        Self::DesktopSafari,
        Self::Mobile,
        Self::MobileAndroid,
        Self::MobileIos,
        Self::Tablet,
        Self::TabletAndroid,
        Self::TabletIos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::DesktopChrome => "desktop_chrome",
            Self::DesktopEdge => "desktop_edge",
            Self::DesktopFirefox => "desktop_firefox",
            Self::DesktopOpera => "desktop_opera",
            Self::DesktopSafari => "desktop_safari",
            Self::Mobile => "mobile",
            Self::MobileAndroid => "mobile_android",
            Self::MobileIos => "mobile_ios",
            Self::Tablet => "tablet",
            Self::TabletAndroid => "tablet_android",
            Self::TabletIos => "tablet_ios",
        }
    }
}

impl FromStr for UserAgent {
    type Err = ScrapiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ua| ua.as_str() == s)
            .ok_or_else(|| {
                ScrapiError::validation("user_agent_type", format!("unknown value '{}'", s))
            })
    }
}

/// Rendering mode for JavaScript-heavy pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Render {
    Html,
    Png,
}

impl Render {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Png => "png",
        }
    }
}

impl FromStr for Render {
    type Err = ScrapiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "html" => Ok(Self::Html),
            "png" => Ok(Self::Png),
            other => Err(ScrapiError::validation(
                "render",
                format!("unknown value '{}'", other),
            )),
        }
    }
}

/// Options for search-engine style sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOpts {
    /// Top-level domain of the search engine (default: "com")
    pub domain: String,
    /// First results page, 1-based (default: 1)
    pub start_page: i32,
    /// Number of pages to scrape (default: 1)
    pub pages: i32,
    /// Results per page (default: 10)
    pub limit: i32,
    /// Device class, see [`UserAgent`] (default: "desktop")
    pub user_agent_type: String,
    /// Interface locale, e.g. "en-US"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// URL the backend notifies when the job finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Custom parsing instructions; implies `parse`
    #[serde(rename = "parsing_instructions", skip_serializing_if = "Option::is_none")]
    pub parse_instructions: Option<Value>,
    /// Ask the backend to return structured data
    pub parse: bool,
}

impl Default for SearchOpts {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            start_page: DEFAULT_START_PAGE,
            pages: DEFAULT_PAGES,
            limit: DEFAULT_LIMIT,
            user_agent_type: DEFAULT_USER_AGENT.to_string(),
            locale: None,
            callback_url: None,
            parse_instructions: None,
            parse: false,
        }
    }
}

impl SearchOpts {
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_start_page(mut self, start_page: i32) -> Self {
        self.start_page = start_page;
        self
    }

    pub fn with_pages(mut self, pages: i32) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent_type = user_agent.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn with_parse_instructions(mut self, instructions: Value) -> Self {
        self.parse_instructions = Some(instructions);
        self.parse = true;
        self
    }

    pub fn with_parse(mut self, parse: bool) -> Self {
        self.parse = parse;
        self
    }
}

/// Options for plain URL scraping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlOpts {
    pub user_agent_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(rename = "parsing_instructions", skip_serializing_if = "Option::is_none")]
    pub parse_instructions: Option<Value>,
    pub parse: bool,
}

impl Default for UrlOpts {
    fn default() -> Self {
        Self {
            user_agent_type: DEFAULT_USER_AGENT.to_string(),
            callback_url: None,
            parse_instructions: None,
            parse: false,
        }
    }
}

impl UrlOpts {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent_type = user_agent.into();
        self
    }

    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn with_parse_instructions(mut self, instructions: Value) -> Self {
        self.parse_instructions = Some(instructions);
        self.parse = true;
        self
    }

    pub fn with_parse(mut self, parse: bool) -> Self {
        self.parse = parse;
        self
    }
}

/// Options for Google sources, which add geolocation, rendering and context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleOpts {
    /// Free-form location, e.g. "New York,New York,United States"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<String>,
    pub user_agent_type: String,
    /// Rendering mode, see [`Render`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(rename = "parsing_instructions", skip_serializing_if = "Option::is_none")]
    pub parse_instructions: Option<Value>,
    pub parse: bool,
    /// Source specific `{key, value}` entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<Value>>,
}

impl Default for GoogleOpts {
    fn default() -> Self {
        Self {
            geo_location: None,
            user_agent_type: DEFAULT_USER_AGENT.to_string(),
            render: None,
            callback_url: None,
            parse_instructions: None,
            parse: false,
            context: None,
        }
    }
}

impl GoogleOpts {
    pub fn with_geo_location(mut self, geo_location: impl Into<String>) -> Self {
        self.geo_location = Some(geo_location.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent_type = user_agent.into();
        self
    }

    pub fn with_render(mut self, render: impl Into<String>) -> Self {
        self.render = Some(render.into());
        self
    }

    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    pub fn with_parse_instructions(mut self, instructions: Value) -> Self {
        self.parse_instructions = Some(instructions);
        self.parse = true;
        self
    }

    pub fn with_parse(mut self, parse: bool) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_context(mut self, context: Vec<Value>) -> Self {
        self.context = Some(context);
        self
    }
}

/// Build a job payload: `source` plus one target field merged over `opts`.
///
/// `target_key` is `"query"` for search sources and `"url"` for URL sources.
pub fn build_payload<T: Serialize>(
    opts: &T,
    source: &str,
    target_key: &str,
    target: &str,
) -> Result<Value> {
    let mut payload = serde_json::to_value(opts)?;
    if let Value::Object(map) = &mut payload {
        map.insert("source".to_string(), Value::from(source));
        map.insert(target_key.to_string(), Value::from(target));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_status_from_literal() {
        assert_eq!(JobStatus::from("pending"), JobStatus::Pending);
        assert_eq!(JobStatus::from("done"), JobStatus::Done);
        assert_eq!(JobStatus::from("faulted"), JobStatus::Faulted);
        assert_eq!(
            JobStatus::from("parsing"),
            JobStatus::Other("parsing".to_string())
        );
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Faulted.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Other("queued".to_string()).is_terminal());
    }

    #[test]
    fn test_user_agent_parse() {
        assert_eq!("mobile_ios".parse::<UserAgent>().unwrap(), UserAgent::MobileIos);
        for ua in UserAgent::ALL {
            assert_eq!(ua.as_str().parse::<UserAgent>().unwrap(), ua);
        }
        let err = "smart_fridge".parse::<UserAgent>().unwrap_err();
        assert_eq!(err.field(), Some("user_agent_type"));
    }

    #[test]
    fn test_user_agent_serialization() {
        let json = serde_json::to_string(&UserAgent::DesktopChrome).unwrap();
        assert_eq!(json, "\"desktop_chrome\"");
    }

    #[test]
    fn test_render_parse() {
        assert_eq!("png".parse::<Render>().unwrap(), Render::Png);
        assert_eq!(Render::Html.as_str(), "html");
        let err = "not-a-mode".parse::<Render>().unwrap_err();
        assert_eq!(err.field(), Some("render"));
    }

    #[test]
    fn test_search_opts_defaults() {
        let opts = SearchOpts::default();
        assert_eq!(opts.domain, "com");
        assert_eq!(opts.start_page, 1);
        assert_eq!(opts.pages, 1);
        assert_eq!(opts.limit, 10);
        assert_eq!(opts.user_agent_type, "desktop");
        assert!(!opts.parse);
    }

    #[test]
    fn test_search_payload() {
        let opts = SearchOpts::default().with_domain("de").with_pages(2);
        let payload = build_payload(&opts, "bing_search", "query", "rust").unwrap();
        assert_eq!(
            payload,
            json!({
                "source": "bing_search",
                "query": "rust",
                "domain": "de",
                "start_page": 1,
                "pages": 2,
                "limit": 10,
                "user_agent_type": "desktop",
                "parse": false,
            })
        );
    }

    #[test]
    fn test_parse_instructions_enable_parse() {
        let opts = UrlOpts::default().with_parse_instructions(json!({"title": {"_fns": []}}));
        let payload = build_payload(&opts, "universal", "url", "https://example.com").unwrap();
        assert_eq!(payload["parse"], json!(true));
        assert_eq!(payload["parsing_instructions"], json!({"title": {"_fns": []}}));
        assert_eq!(payload["url"], json!("https://example.com"));
    }

    #[test]
    fn test_google_payload_omits_absent_fields() {
        let opts = GoogleOpts::default().with_render("html");
        let payload = build_payload(&opts, "google", "url", "https://www.google.com").unwrap();
        assert_eq!(payload["render"], json!("html"));
        assert!(payload.get("geo_location").is_none());
        assert!(payload.get("context").is_none());
        assert!(payload.get("callback_url").is_none());
    }

    #[test]
    fn test_search_opts_deserialize_fills_defaults() {
        let opts: SearchOpts = serde_json::from_str(r#"{"limit": 5}"#).unwrap();
        assert_eq!(opts.limit, 5);
        assert_eq!(opts.domain, "com");
        assert_eq!(opts.pages, 1);
    }
}
