use crate::error::ScrapeError;
use url::Url;

/// A validated page URL together with the location of its robots.txt
#[derive(Debug, Clone)]
pub struct ScrapeTarget {
    url: Url,
    robots_url: Url,
}

impl ScrapeTarget {
    /// Validate a candidate URL. No network access happens here.
    ///
    /// The input must start with `http`, parse as an absolute URL with an
    /// `http` or `https` scheme and carry a host.
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        if !raw.starts_with("http") {
            return Err(ScrapeError::InvalidUrl);
        }

        let url = Url::parse(raw).map_err(|e| {
            ::log::debug!("Rejecting unparsable URL {}: {}", raw, e);
            ScrapeError::InvalidUrl
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ScrapeError::InvalidUrl);
        }

        let robots_url = robots_url_for(&url).ok_or(ScrapeError::InvalidUrl)?;

        Ok(Self { url, robots_url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// `{scheme}://{authority}/robots.txt`
    pub fn robots_url(&self) -> &Url {
        &self.robots_url
    }

    /// Path used for robots.txt evaluation; the root when the URL has none
    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            path => path,
        }
    }
}

/// Build the robots.txt URL on the same scheme, host and port
fn robots_url_for(url: &Url) -> Option<Url> {
    let mut robots = url.clone();
    robots.set_username("").ok()?;
    robots.set_password(None).ok()?;
    robots.set_query(None);
    robots.set_fragment(None);
    robots.set_path("/robots.txt");
    Some(robots)
}
