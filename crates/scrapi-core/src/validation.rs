//! Request parameter validation
//!
//! Pure checks run before any request is built. Each check returns
//! `ScrapiError::Validation` naming the offending field, otherwise `Ok(())`.

use url::{ParseError, Url};

use crate::error::{Result, ScrapiError};
use crate::types::{GoogleOpts, Render, SearchOpts, UrlOpts, UserAgent};

/// Search engine domains accepted in [`SearchOpts::domain`]
pub const SEARCH_DOMAINS: &[&str] = &[
    "com", "co.uk", "ca", "com.au", "ie", "de", "at", "ch", "fr", "be", "nl", "es", "it", "pt",
    "pl", "cz", "se", "dk", "no", "fi", "ru", "ua", "by", "kz", "tr", "co.jp", "co.in", "com.br",
    "com.mx", "com.ar",
];

/// Interface locales accepted in [`SearchOpts::locale`]
pub const LOCALES: &[&str] = &[
    "en", "en-US", "en-GB", "de", "de-DE", "fr", "fr-FR", "es", "es-ES", "it", "it-IT", "nl",
    "pl", "pt", "pt-BR", "cs", "sv", "ru", "uk", "be", "kk", "tr", "ja", "id",
];

/// Options bundles that can check themselves before use
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

impl Validate for SearchOpts {
    fn validate(&self) -> Result<()> {
        check_domain(&self.domain, SEARCH_DOMAINS)?;
        if let Some(locale) = &self.locale {
            check_locale(locale, LOCALES)?;
        }
        check_start_page(self.start_page)?;
        check_pages(self.pages)?;
        check_limit(self.limit)?;
        check_user_agent(&self.user_agent_type)
    }
}

impl Validate for UrlOpts {
    fn validate(&self) -> Result<()> {
        check_user_agent(&self.user_agent_type)
    }
}

impl Validate for GoogleOpts {
    fn validate(&self) -> Result<()> {
        check_user_agent(&self.user_agent_type)?;
        if let Some(render) = self.render.as_deref().filter(|r| !r.is_empty()) {
            check_render(render)?;
        }
        Ok(())
    }
}

/// Check that `input_url` is absolute and points at `host`.
///
/// # Example
/// ```
/// use scrapi_core::validation::validate_url;
///
/// assert!(validate_url("https://www.amazon.de/dp/B0", "amazon").is_ok());
/// assert!(validate_url("www.amazon.de/dp/B0", "amazon").is_err());
/// ```
pub fn validate_url(input_url: &str, host: &str) -> Result<()> {
    if input_url.is_empty() {
        return Err(ScrapiError::validation("url", "URL parameter is empty"));
    }

    let parsed = match Url::parse(input_url) {
        Ok(parsed) => parsed,
        Err(ParseError::RelativeUrlWithoutBase) => {
            return Err(ScrapiError::validation("url", "URL is missing scheme"));
        }
        Err(ParseError::EmptyHost) => {
            return Err(ScrapiError::validation("url", "URL is missing a host"));
        }
        Err(e) => {
            return Err(ScrapiError::validation("url", format!("URL is malformed: {}", e)));
        }
    };

    if !has_authority(input_url) {
        return Err(ScrapiError::validation("url", "URL is missing a host"));
    }

    let url_host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(ScrapiError::validation("url", "URL is missing a host")),
    };

    if !url_host.contains(host) {
        return Err(ScrapiError::validation(
            "url",
            format!("URL does not belong to {}", host),
        ));
    }

    Ok(())
}

/// True when the text after `scheme:` is a non-empty `//authority`.
///
/// `Url::parse` recovers a host from inputs like `https:www.example.com`
/// or `http:///www.example.com`; those are rejected here.
fn has_authority(input_url: &str) -> bool {
    let Some((_, rest)) = input_url.split_once(':') else {
        return false;
    };
    match rest.strip_prefix("//") {
        Some(rest) => rest
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|authority| !authority.is_empty()),
        None => false,
    }
}

/// Check `user_agent_type` against the [`UserAgent`] names.
pub fn check_user_agent(user_agent_type: &str) -> Result<()> {
    user_agent_type.parse::<UserAgent>().map(|_| ())
}

/// Check `render` against the [`Render`] modes.
pub fn check_render(render: &str) -> Result<()> {
    render.parse::<Render>().map(|_| ())
}

/// An empty domain means "use the source default" and always passes.
pub fn check_domain(domain: &str, acceptable_domains: &[&str]) -> Result<()> {
    if !domain.is_empty() && !acceptable_domains.contains(&domain) {
        return Err(ScrapiError::validation(
            "domain",
            format!("invalid domain parameter: {}", domain),
        ));
    }
    Ok(())
}

/// Like [`check_domain`], for locales.
pub fn check_locale(locale: &str, acceptable_locales: &[&str]) -> Result<()> {
    if !locale.is_empty() && !acceptable_locales.contains(&locale) {
        return Err(ScrapiError::validation(
            "locale",
            format!("invalid locale parameter: {}", locale),
        ));
    }
    Ok(())
}

/// Results per page must be positive.
pub fn check_limit(limit: i32) -> Result<()> {
    check_positive("limit", limit)
}

/// Page count must be positive.
pub fn check_pages(pages: i32) -> Result<()> {
    check_positive("pages", pages)
}

/// First page is 1-based.
pub fn check_start_page(start_page: i32) -> Result<()> {
    check_positive("start_page", start_page)
}

fn check_positive(field: &'static str, value: i32) -> Result<()> {
    if value <= 0 {
        return Err(ScrapiError::validation(field, "must be greater than 0"));
    }
    Ok(())
}
