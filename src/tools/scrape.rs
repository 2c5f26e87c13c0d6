//! Web page scraping
//!
//! Fetches a page and extracts readable text (optionally scoped by a CSS
//! selector), the title and optionally the outgoing links.

use crate::tools::context::ToolContext;
use crate::tools::http;
use crate::tools::registry::{Tool, ToolCollection};
use crate::tools::schema::{parse_args, Field, ParamSchema};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const MAX_LINKS: usize = 100;

/// Elements tried in order before falling back to `<body>`.
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=main]"];

pub fn scrape_tools() -> Result<ToolCollection> {
    Ok(vec![Arc::new(ScrapeTool::new())])
}

struct ScrapeTool {
    params: ParamSchema,
}

#[derive(Deserialize)]
struct ScrapeArgs {
    url: String,
    selector: Option<String>,
    #[serde(default)]
    include_links: bool,
    #[serde(default = "default_max_length")]
    max_length: usize,
}

fn default_max_length() -> usize {
    10_000
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::InvalidArgument(format!("invalid url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::InvalidArgument(format!(
            "unsupported url scheme '{}', expected http or https",
            other
        ))),
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw)
        .map_err(|e| AppError::InvalidArgument(format!("invalid CSS selector '{}': {:?}", raw, e)))
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn readable_text(document: &Html) -> String {
    for raw in CONTENT_SELECTORS {
        if let Ok(sel) = Selector::parse(raw) {
            let parts: Vec<String> = document
                .select(&sel)
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
                .collect();
            if !parts.is_empty() {
                return parts.join("\n\n");
            }
        }
    }

    Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next().map(|body| element_text(&body)))
        .unwrap_or_default()
}

/// Parse `html` into the tool result. Kept synchronous: `Html` is not `Send`.
fn extract_page(
    url: &Url,
    html: &str,
    selector: Option<&str>,
    include_links: bool,
    max_length: usize,
) -> Result<Value> {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let text = match selector {
        Some(raw) => {
            let sel = parse_selector(raw)?;
            document
                .select(&sel)
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n")
        }
        None => readable_text(&document),
    };

    let total_chars = text.chars().count();
    let truncated = total_chars > max_length;
    let content: String = text.chars().take(max_length).collect();

    let mut result = json!({
        "url": url.as_str(),
        "title": title,
        "content": content,
        "length": total_chars,
        "truncated": truncated,
    });

    if include_links {
        let mut links: Vec<String> = Vec::new();
        if let Ok(sel) = Selector::parse("a[href]") {
            for href in document.select(&sel).filter_map(|a| a.value().attr("href")) {
                let Ok(resolved) = url.join(href) else { continue };
                if !matches!(resolved.scheme(), "http" | "https") {
                    continue;
                }
                let resolved = resolved.to_string();
                if !links.contains(&resolved) {
                    links.push(resolved);
                }
                if links.len() >= MAX_LINKS {
                    break;
                }
            }
        }
        result["links"] = json!(links);
    }

    Ok(result)
}

impl ScrapeTool {
    fn new() -> Self {
        Self {
            params: ParamSchema::new(vec![
                Field::string("url", "http(s) URL of the page to scrape").required(),
                Field::string("selector", "Optional CSS selector to extract specific content"),
                Field::boolean("include_links", "Also return the page's outgoing links")
                    .default_value(json!(false)),
                Field::integer("max_length", "Maximum number of characters of text to return")
                    .range(100.0, 100_000.0)
                    .default_value(json!(10_000)),
            ]),
        }
    }
}

#[async_trait]
impl Tool for ScrapeTool {
    fn name(&self) -> &str {
        "scrape_webpage"
    }

    fn description(&self) -> &str {
        "Fetch a web page and extract its title, readable text and optionally its links"
    }

    fn parameters(&self) -> &ParamSchema {
        &self.params
    }

    async fn run(&self, ctx: &ToolContext, args: Value) -> Result<Value> {
        let args: ScrapeArgs = parse_args(args)?;
        let url = parse_url(&args.url)?;
        if let Some(raw) = args.selector.as_deref() {
            parse_selector(raw)?;
        }

        let provider = url.host_str().unwrap_or("website").to_string();
        let html = http::send_text(&provider, ctx.http.get(url.clone())).await?;

        extract_page(
            &url,
            &html,
            args.selector.as_deref(),
            args.include_links,
            args.max_length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head><title> Example Page </title></head>
          <body>
            <nav>Home | About</nav>
            <main><h1>Hello</h1><p>World of   tools.</p></main>
            <div class="price">42 USD</div>
            <a href="/docs">Docs</a>
            <a href="https://other.org/x">Other</a>
            <a href="/docs">Docs again</a>
            <a href="mailto:me@example.org">Mail</a>
          </body>
        </html>
    "#;

    fn base() -> Url {
        Url::parse("https://example.org/page").unwrap()
    }

    #[test]
    fn test_extracts_main_content_and_title() {
        let result = extract_page(&base(), PAGE, None, false, 10_000).unwrap();
        assert_eq!(result["title"], "Example Page");
        assert_eq!(result["content"], "Hello World of tools.");
        assert_eq!(result["truncated"], false);
        assert!(result.get("links").is_none());
    }

    #[test]
    fn test_selector_scopes_content() {
        let result = extract_page(&base(), PAGE, Some(".price"), false, 10_000).unwrap();
        assert_eq!(result["content"], "42 USD");
    }

    #[test]
    fn test_links_resolved_and_deduplicated() {
        let result = extract_page(&base(), PAGE, None, true, 10_000).unwrap();
        assert_eq!(
            result["links"],
            json!(["https://example.org/docs", "https://other.org/x"])
        );
    }

    #[test]
    fn test_truncation() {
        let result = extract_page(&base(), PAGE, None, false, 5).unwrap();
        assert_eq!(result["content"], "Hello");
        assert_eq!(result["truncated"], true);
        assert_eq!(result["length"], 21);
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("https://example.org").is_ok());
        assert!(matches!(
            parse_url("ftp://example.org"),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(parse_url("not a url"), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(parse_selector("[[["), Err(AppError::InvalidArgument(_))));
    }
}
