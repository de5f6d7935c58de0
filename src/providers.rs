//! Candidate icon URLs for a page
//!
//! The site's own favicon paths come first, then the `www.`-less origin,
//! then third-party services in configured order. Duplicates are dropped so
//! each URL is requested at most once per race.

use crate::config::schema::ProvidersConfig;
use url::Url;

/// Placeholders a service template may use
pub const PLACEHOLDERS: &[&str] = &["{domain}", "{bare_domain}", "{origin}", "{origin_encoded}"];

/// The parts of a page URL that templates are expanded with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Hostname, lowercased by the URL parser
    pub domain: String,
    /// `scheme://host[:port]`
    pub origin: String,
    scheme: String,
    port: Option<u16>,
}

impl Target {
    /// Extract the target from a parsed URL, `None` when it has no host
    pub fn from_url(url: &Url) -> Option<Self> {
        let domain = url.host_str()?.to_string();
        if domain.is_empty() {
            return None;
        }
        let origin = url.origin().ascii_serialization();
        if origin == "null" {
            return None;
        }
        Some(Self {
            domain,
            origin,
            scheme: url.scheme().to_string(),
            port: url.port(),
        })
    }

    /// Parse a raw string, `None` when it is not an absolute URL with a host
    pub fn parse(input: &str) -> Option<Self> {
        Url::parse(input.trim()).ok().as_ref().and_then(Self::from_url)
    }

    /// The domain without a leading `www.`
    pub fn bare_domain(&self) -> &str {
        self.domain.strip_prefix("www.").unwrap_or(&self.domain)
    }

    /// Origin for the `www.`-less domain
    pub fn bare_origin(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.bare_domain(), port),
            None => format!("{}://{}", self.scheme, self.bare_domain()),
        }
    }

    /// Expand the placeholders in a service template
    pub fn expand(&self, template: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(self.origin.as_bytes()).collect();
        template
            .replace("{bare_domain}", self.bare_domain())
            .replace("{domain}", &self.domain)
            .replace("{origin_encoded}", &encoded)
            .replace("{origin}", &self.origin)
    }
}

/// Build the ordered, de-duplicated candidate list for a target
pub fn candidates(target: &Target, config: &ProvidersConfig) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    let mut push = |url: String| {
        if !urls.contains(&url) {
            urls.push(url);
        }
    };

    for path in &config.site_paths {
        push(join_path(&target.origin, path));
    }

    if config.strip_www && target.bare_domain() != target.domain {
        push(join_path(&target.bare_origin(), "/favicon.ico"));
    }

    for template in &config.services {
        push(target.expand(template));
    }

    urls
}

fn join_path(origin: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", origin, path)
    } else {
        format!("{}/{}", origin, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(services: &[&str]) -> ProvidersConfig {
        ProvidersConfig {
            services: services.iter().map(|s| s.to_string()).collect(),
            ..ProvidersConfig::default()
        }
    }

    #[test]
    fn target_from_page_url() {
        let target = Target::parse("https://Example.com:8443/some/page?q=1").unwrap();
        assert_eq!(target.domain, "example.com");
        assert_eq!(target.origin, "https://example.com:8443");
    }

    #[test]
    fn invalid_inputs_have_no_target() {
        assert!(Target::parse("not a url").is_none());
        assert!(Target::parse("").is_none());
        assert!(Target::parse("mailto:someone@example.com").is_none());
        assert!(Target::parse("/relative/path").is_none());
    }

    #[test]
    fn site_paths_come_first() {
        let target = Target::parse("https://example.com/page").unwrap();
        let urls = candidates(&target, &config(&["https://icons.test/{domain}"]));
        assert_eq!(
            urls,
            vec![
                "https://example.com/favicon.ico",
                "https://example.com/favicon.png",
                "https://icons.test/example.com",
            ]
        );
    }

    #[test]
    fn www_origin_adds_bare_candidate() {
        let target = Target::parse("http://www.example.com:8080/").unwrap();
        let urls = candidates(&target, &config(&[]));
        assert_eq!(
            urls,
            vec![
                "http://www.example.com:8080/favicon.ico",
                "http://www.example.com:8080/favicon.png",
                "http://example.com:8080/favicon.ico",
            ]
        );

        let no_strip = ProvidersConfig {
            strip_www: false,
            ..config(&[])
        };
        assert_eq!(candidates(&target, &no_strip).len(), 2);
    }

    #[test]
    fn duplicate_templates_collapse() {
        let target = Target::parse("https://example.com").unwrap();
        let urls = candidates(
            &target,
            &config(&[
                "https://s2.test/?domain={domain}",
                "https://s2.test/?domain={bare_domain}",
            ]),
        );
        assert_eq!(urls.len(), 3);
    }

    #[test]
    fn expands_all_placeholders() {
        let target = Target::parse("https://www.example.com/x").unwrap();
        assert_eq!(
            target.expand("{domain}|{bare_domain}|{origin}|{origin_encoded}"),
            "www.example.com|example.com|https://www.example.com|https%3A%2F%2Fwww.example.com"
        );
    }

    #[test]
    fn default_services_are_expanded() {
        let target = Target::parse("https://example.com").unwrap();
        let urls = candidates(&target, &ProvidersConfig::default());
        assert!(urls.len() > 2);
        for url in &urls {
            for placeholder in PLACEHOLDERS {
                assert!(!url.contains(placeholder), "{} left in {}", placeholder, url);
            }
        }
    }
}
