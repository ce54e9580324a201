use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::results::{SCRAPED_TEXT_TAG, TOOL_MSG_PREFIX, ToolOutput};
use crate::tests::mock::MockClient;
use crate::tokens::{ELLIPSIS, Truncator};
use crate::ArticleScraper;
use std::time::Duration;

const ARTICLE_URL: &str = "https://example.com/a1";
const ROBOTS_URL: &str = "https://example.com/robots.txt";
const ARTICLE_PAGE: &str = r#"<html><body>
    <header class="site-header"><a href="/">Home</a></header>
    <article class="post-content"><p>Hello world.</p><p>Second para.</p></article>
</body></html>"#;

fn scraper(client: MockClient) -> ArticleScraper<MockClient> {
    ArticleScraper::with_client(ScraperConfig::default(), client).unwrap()
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;

    #[tokio::test]
    async fn test_allowed_article_is_scraped() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "User-agent: *\nAllow: /\n")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        let output = scraper.run_tool(ARTICLE_URL).await;
        assert_eq!(
            output.to_string(),
            "TOOL OUTPUT: SCRAPED TEXT:: Hello world. Second para."
        );
        assert_eq!(
            scraper.client().requested_urls(),
            vec![ROBOTS_URL.to_string(), ARTICLE_URL.to_string()]
        );
    }

    #[tokio::test]
    async fn test_disallowed_article_is_never_fetched() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "User-agent: *\nDisallow: /a1\n")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        let output = scraper.run_tool(ARTICLE_URL).await.to_string();
        assert!(output.starts_with(TOOL_MSG_PREFIX));
        assert!(!output.contains(SCRAPED_TEXT_TAG));
        assert!(output.contains("disallowed by robots.txt"));
        assert!(output.contains(ARTICLE_URL));
        assert!(output.contains("MyArticleScraperSummaryGenerator/1.0"));
        assert_eq!(scraper.client().requested_urls(), vec![ROBOTS_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_requests() {
        let scraper = scraper(MockClient::new());

        for raw in ["ftp://bad", "example.com/a1", "httpfoo"] {
            let result = scraper.scrape(raw).await;
            assert!(matches!(result, Err(ScrapeError::InvalidUrl)), "{}", raw);
        }
        assert_eq!(
            scraper.run_tool("ftp://bad").await.to_string(),
            "TOOL OUTPUT: Error: Invalid URL format. Must start with http or https."
        );
        assert!(scraper.client().requests().is_empty());
    }

    #[tokio::test]
    async fn test_requests_carry_user_agent_and_timeouts() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let config = ScraperConfig {
            user_agent: "TestAgent/2.0".to_string(),
            robots_timeout_secs: Some(3),
            ..ScraperConfig::default()
        };
        let scraper = ArticleScraper::with_client(config, client).unwrap();

        scraper.scrape(ARTICLE_URL).await.unwrap();

        let requests = scraper.client().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.user_agent == "TestAgent/2.0"));
        assert_eq!(requests[0].timeout, Some(Duration::from_secs(3)));
        assert_eq!(requests[1].timeout, Some(Duration::from_secs(15)));
    }

    #[tokio::test]
    async fn test_robots_fetch_has_no_timeout_by_default() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        scraper.scrape(ARTICLE_URL).await.unwrap();
        assert_eq!(scraper.client().requests()[0].timeout, None);
    }
}

#[cfg(test)]
mod robots_status_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_robots_allows_everything() {
        // Unrouted URLs answer 404
        let client = MockClient::new().route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        assert_eq!(
            scraper.scrape(ARTICLE_URL).await.unwrap(),
            "Hello world. Second para."
        );
    }

    #[tokio::test]
    async fn test_forbidden_robots_disallows_everything() {
        for status in [401, 403] {
            let client = MockClient::new()
                .route(ROBOTS_URL, status, "")
                .route(ARTICLE_URL, 200, ARTICLE_PAGE);
            let scraper = scraper(client);

            let result = scraper.scrape(ARTICLE_URL).await;
            assert!(matches!(result, Err(ScrapeError::CrawlDisallowed { .. })));
            assert_eq!(scraper.client().requests().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_unicode_rule_blocks_encoded_path() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "\u{feff}User-agent: *\nDisallow: /café/\n")
            .route("https://example.com/caf%C3%A9/story", 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        let result = scraper.scrape("https://example.com/café/story").await;
        assert!(matches!(result, Err(ScrapeError::CrawlDisallowed { .. })));
        assert_eq!(scraper.client().requested_urls(), vec![ROBOTS_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_robots_server_error_fails_closed() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 503, "")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        let err = scraper.scrape(ARTICLE_URL).await.unwrap_err();
        assert!(matches!(err, ScrapeError::PolicyCheck(_)));
        assert!(err.to_string().starts_with("Error: Failed to check robots.txt."));
        assert!(err.to_string().contains("503"));
        assert_eq!(scraper.client().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_robots_transport_failure_fails_closed() {
        let client = MockClient::new()
            .fail(ROBOTS_URL, "connection refused")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let scraper = scraper(client);

        let output = scraper.run_tool(ARTICLE_URL).await.to_string();
        assert_eq!(
            output,
            "TOOL OUTPUT: Error: Failed to check robots.txt. Details: connection refused"
        );
        assert_eq!(scraper.client().requests().len(), 1);
    }
}

#[cfg(test)]
mod stage_failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_page_error_status() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 500, "oops");
        let scraper = scraper(client);

        let err = scraper.scrape(ARTICLE_URL).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { .. }));
        assert_eq!(
            err.to_string(),
            "Error: Failed to fetch page https://example.com/a1. Details: HTTP status 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_page_transport_failure() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .fail(ARTICLE_URL, "operation timed out");
        let scraper = scraper(client);

        let err = scraper.scrape(ARTICLE_URL).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { .. }));
        assert!(err.to_string().ends_with("Details: operation timed out"));
        // Single attempt, no retries
        assert_eq!(scraper.client().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_page_is_an_extraction_error() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 200, "<html><body>\n</body></html>");
        let scraper = scraper(client);

        let output = scraper.run_tool(ARTICLE_URL).await;
        assert!(!output.is_scraped());
        assert!(
            output
                .to_string()
                .starts_with("TOOL OUTPUT: Error: Failed to parse HTML or extract text from https://example.com/a1.")
        );
    }
}

#[cfg(test)]
mod truncation_tests {
    use super::*;

    fn long_page(paragraphs: usize) -> String {
        let body = (0..paragraphs)
            .map(|i| format!("<p>Paragraph {} talks about the news of the day at some length.</p>", i))
            .collect::<String>();
        format!(r#"<html><body><div class="article-body">{}</div></body></html>"#, body)
    }

    #[tokio::test]
    async fn test_long_article_fits_budget() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 200, &long_page(200));
        let scraper = scraper(client);

        let output = scraper.run_tool(ARTICLE_URL).await;
        let rendered = output.to_string();
        assert!(rendered.starts_with("TOOL OUTPUT: SCRAPED TEXT:: Paragraph 0 talks"));

        let text = ToolOutput::from_tool_string(&rendered)
            .and_then(|o| o.scraped_text().map(str::to_string))
            .unwrap();
        assert!(text.ends_with(ELLIPSIS));

        let truncator = Truncator::new(Default::default(), 600).unwrap();
        assert!(truncator.count_tokens(&text) <= 600);
        assert_eq!(truncator.truncate(&text).unwrap(), text);
    }

    #[tokio::test]
    async fn test_budget_is_configurable() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 200, &long_page(5));
        let config = ScraperConfig {
            token_budget: 12,
            ..ScraperConfig::default()
        };
        let scraper = ArticleScraper::with_client(config, client).unwrap();

        let text = scraper.scrape(ARTICLE_URL).await.unwrap();
        let truncator = Truncator::new(Default::default(), 12).unwrap();
        assert!(truncator.count_tokens(&text) <= 12);
        assert!(text.starts_with("Paragraph 0"));
        assert!(text.ends_with(ELLIPSIS));
    }

    #[tokio::test]
    async fn test_one_token_budget_still_scrapes() {
        let client = MockClient::new()
            .route(ROBOTS_URL, 200, "")
            .route(ARTICLE_URL, 200, ARTICLE_PAGE);
        let config = ScraperConfig {
            token_budget: 1,
            ..ScraperConfig::default()
        };
        let scraper = ArticleScraper::with_client(config, client).unwrap();

        assert_eq!(
            scraper.run_tool(ARTICLE_URL).await.to_string(),
            "TOOL OUTPUT: SCRAPED TEXT:: ..."
        );
    }
}
