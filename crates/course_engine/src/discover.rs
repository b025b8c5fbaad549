use std::sync::LazyLock;

use engine_logging::engine_debug;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::filename::{resource_file_name, NameRegistry};

/// `[text](something.pdf)` in Markdown text.
#[allow(clippy::expect_used)]
static MARKDOWN_PDF_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[[^\]]*\]\(([^)]+?\.pdf)\)").expect("pdf link regex is valid") // Static pattern, safe to panic
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Pdf,
}

/// One remote resource to materialize next to the lesson document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRequest {
    pub url: String,
    pub file_name: String,
    pub kind: ResourceKind,
}

/// Finds the resources embedded in the original lesson content.
///
/// Images that survive as Markdown references are handled later by the link
/// rewrite, which runs for every dialect.
pub trait ResourceDiscovery {
    fn discover_images(&self, base: &Url, registry: &mut NameRegistry) -> Vec<ResourceRequest>;

    fn discover_documents(&self, base: &Url) -> Vec<ResourceRequest>;
}

/// Tree walk over parsed markup: `<img src>` and `<a href="….pdf">`.
pub struct MarkupDiscovery<'a> {
    fragment: &'a Html,
}

impl<'a> MarkupDiscovery<'a> {
    pub fn new(fragment: &'a Html) -> Self {
        Self { fragment }
    }
}

impl ResourceDiscovery for MarkupDiscovery<'_> {
    fn discover_images(&self, base: &Url, registry: &mut NameRegistry) -> Vec<ResourceRequest> {
        let Ok(selector) = Selector::parse("img[src]") else {
            return Vec::new();
        };
        self.fragment
            .select(&selector)
            .filter_map(|element| element.value().attr("src"))
            .filter_map(|src| {
                let url = resolve_resource(src, base)?;
                let name = resource_file_name(url.as_str())?;
                let file_name = registry.assign(url.as_str(), name);
                Some(ResourceRequest {
                    url: url.into(),
                    file_name,
                    kind: ResourceKind::Image,
                })
            })
            .collect()
    }

    fn discover_documents(&self, base: &Url) -> Vec<ResourceRequest> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        self.fragment
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| href.to_ascii_lowercase().ends_with(".pdf"))
            .filter_map(|href| pdf_request(href, base))
            .collect()
    }
}

/// Text scan over content that already is Markdown.
pub struct MarkdownDiscovery<'a> {
    content: &'a str,
}

impl<'a> MarkdownDiscovery<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }
}

impl ResourceDiscovery for MarkdownDiscovery<'_> {
    fn discover_images(&self, _base: &Url, _registry: &mut NameRegistry) -> Vec<ResourceRequest> {
        Vec::new()
    }

    fn discover_documents(&self, base: &Url) -> Vec<ResourceRequest> {
        MARKDOWN_PDF_LINK
            .captures_iter(self.content)
            .filter_map(|caps| caps.get(1))
            .filter_map(|target| pdf_request(target.as_str(), base))
            .collect()
    }
}

fn pdf_request(raw: &str, base: &Url) -> Option<ResourceRequest> {
    let url = resolve_resource(raw, base)?;
    let file_name = resource_file_name(url.as_str())?;
    Some(ResourceRequest {
        url: url.into(),
        file_name,
        kind: ResourceKind::Pdf,
    })
}

/// `http…` references are taken as-is, anything else is joined against
/// `base`. Only http(s) results are kept.
pub(crate) fn resolve_resource(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let resolved = if trimmed.starts_with("http") {
        Url::parse(trimmed).ok()
    } else {
        base.join(trimmed).ok()
    };
    match resolved {
        Some(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        _ => {
            engine_debug!("Ignoring unresolvable resource reference {}", trimmed);
            None
        }
    }
}
