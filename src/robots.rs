//! robots.txt parsing and the crawl-policy stage of the pipeline.

use crate::error::ScrapeError;
use crate::fetchers::{HttpClient, HttpRequest};
use crate::target::ScrapeTarget;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};
use std::time::Duration;

/// Bytes left unescaped in a normalized path: unreserved characters and `/`
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Parsed robots.txt rules.
#[derive(Debug, Clone, Default)]
pub struct RobotsTxt {
    /// Groups for named user-agents, in file order
    groups: Vec<AgentGroup>,

    /// The first `*` group, consulted when no named group applies
    default_group: Option<AgentGroup>,

    /// Everything is disallowed (robots.txt answered 401/403)
    disallow_all: bool,

    /// Sitemaps listed anywhere in the file
    sitemaps: Vec<String>,
}

/// Rules shared by one or more consecutive `User-agent` lines.
#[derive(Debug, Clone, Default)]
struct AgentGroup {
    /// Lowercased agent names
    agents: Vec<String>,

    /// Allow/disallow rules in file order
    rules: Vec<Rule>,

    crawl_delay: Option<f64>,
}

#[derive(Debug, Clone)]
struct Rule {
    path: String,
    allow: bool,
}

impl Rule {
    fn new(path: &str, allow: bool) -> Self {
        let path = if path == "*" {
            path.to_string()
        } else {
            normalize_path(path)
        };
        Self { path, allow }
    }

    /// `path` must already be normalized
    fn matches(&self, path: &str) -> bool {
        self.path == "*" || path.starts_with(&self.path)
    }
}

/// Decode then re-escape a path so that `/café`, `/caf%c3%a9` and
/// `/caf%C3%A9` (or `~` and `%7E`) compare equal.
fn normalize_path(path: &str) -> String {
    let decoded: Vec<u8> = percent_decode_str(path).collect();
    percent_encode(&decoded, PATH_SAFE).to_string()
}

impl AgentGroup {
    fn applies_to(&self, agent_token: &str) -> bool {
        self.agents.iter().any(|agent| agent_token.contains(agent.as_str()))
    }

    fn is_default(&self) -> bool {
        self.agents.iter().any(|agent| agent == "*")
    }

    /// The first rule matching the path decides; no match means allowed.
    fn allows(&self, path: &str) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.allow)
            .unwrap_or(true)
    }
}

impl RobotsTxt {
    /// Parse robots.txt content.
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current = AgentGroup::default();
        // Rules were seen since the last User-agent line
        let mut in_rules = false;

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        for line in content.lines() {
            // Strip comments
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    if in_rules {
                        robots.push_group(std::mem::take(&mut current));
                        in_rules = false;
                    }
                    current.agents.push(value.to_lowercase());
                }
                "allow" | "disallow" => {
                    if current.agents.is_empty() {
                        // Rules before any User-agent line belong to nobody
                        continue;
                    }
                    in_rules = true;
                    // An empty Disallow allows everything
                    let allow = directive == "allow" || value.is_empty();
                    current.rules.push(Rule::new(value, allow));
                }
                "crawl-delay" => {
                    if current.agents.is_empty() {
                        continue;
                    }
                    in_rules = true;
                    if let Ok(delay) = value.parse::<f64>() {
                        if delay.is_finite() && delay >= 0.0 {
                            current.crawl_delay = Some(delay);
                        }
                    }
                }
                "sitemap" => {
                    robots.sitemaps.push(value.to_string());
                }
                _ => {}
            }
        }

        robots.push_group(current);
        robots
    }

    /// Policy for a site whose robots.txt answered 401 or 403
    pub fn disallowing_all() -> Self {
        Self {
            disallow_all: true,
            ..Self::default()
        }
    }

    /// Policy for a site without a robots.txt
    pub fn allowing_all() -> Self {
        Self::default()
    }

    fn push_group(&mut self, group: AgentGroup) {
        if group.agents.is_empty() {
            return;
        }
        if group.is_default() {
            if self.default_group.is_none() {
                self.default_group = Some(group);
            }
        } else {
            self.groups.push(group);
        }
    }

    /// The group governing a user-agent: the first named group whose agent
    /// name appears in the product token, else the `*` group
    fn group_for(&self, user_agent: &str) -> Option<&AgentGroup> {
        let agent_token = agent_token(user_agent);
        self.groups
            .iter()
            .find(|group| group.applies_to(&agent_token))
            .or(self.default_group.as_ref())
    }

    /// Check if a path is allowed for a user-agent.
    pub fn is_allowed(&self, user_agent: &str, path: &str) -> bool {
        if self.disallow_all {
            return false;
        }

        let path = if path.is_empty() { "/" } else { path };
        let path = normalize_path(path);

        self.group_for(user_agent)
            .map(|group| group.allows(&path))
            .unwrap_or(true)
    }

    /// Get crawl delay for a user-agent.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        self.group_for(user_agent)
            .and_then(|group| group.crawl_delay)
            .map(Duration::from_secs_f64)
    }

    /// Get listed sitemaps.
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// Product token of a user-agent string: `Name/1.0 (...)` -> `name`
fn agent_token(user_agent: &str) -> String {
    user_agent
        .split('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Fetch and parse robots.txt for the target's site.
///
/// 401/403 disallow everything, other 4xx allow everything. Transport
/// failures, 5xx answers and non-UTF-8 bodies are errors.
pub async fn fetch_robots_txt<C: HttpClient>(
    client: &C,
    target: &ScrapeTarget,
    user_agent: &str,
    timeout: Option<Duration>,
) -> Result<RobotsTxt, ScrapeError> {
    let request = HttpRequest {
        url: target.robots_url().clone(),
        user_agent: user_agent.to_string(),
        timeout,
    };

    let response = client
        .get(&request)
        .await
        .map_err(|e| ScrapeError::PolicyCheck(e.to_string()))?;

    ::log::debug!(
        "robots.txt at {} answered {}",
        target.robots_url(),
        response.status
    );

    match response.status {
        200..=299 => {
            let content = String::from_utf8(response.body).map_err(|e| {
                ScrapeError::PolicyCheck(format!("robots.txt is not valid UTF-8: {}", e))
            })?;
            Ok(RobotsTxt::parse(&content))
        }
        401 | 403 => Ok(RobotsTxt::disallowing_all()),
        400..=499 => Ok(RobotsTxt::allowing_all()),
        _ => Err(ScrapeError::PolicyCheck(format!(
            "robots.txt request to {} returned HTTP status {}",
            target.robots_url(),
            response.status_line()
        ))),
    }
}

/// Crawl-policy stage: fails with [`ScrapeError::CrawlDisallowed`] when the
/// user agent may not fetch the target's path.
pub async fn check<C: HttpClient>(
    client: &C,
    target: &ScrapeTarget,
    user_agent: &str,
    timeout: Option<Duration>,
) -> Result<(), ScrapeError> {
    let robots = fetch_robots_txt(client, target, user_agent, timeout).await?;

    if let Some(delay) = robots.crawl_delay(user_agent) {
        ::log::debug!(
            "robots.txt asks for a crawl delay of {:.1}s",
            delay.as_secs_f64()
        );
    }

    if robots.is_allowed(user_agent, target.path()) {
        Ok(())
    } else {
        ::log::info!("robots.txt disallows {} for {}", target.path(), user_agent);
        Err(ScrapeError::CrawlDisallowed {
            url: target.url().to_string(),
            user_agent: user_agent.to_string(),
        })
    }
}
