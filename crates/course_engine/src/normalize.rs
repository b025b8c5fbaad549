use std::collections::HashSet;

use engine_logging::engine_debug;
use scraper::Html;
use url::Url;

use crate::convert::{Converter, Html2MdConverter};
use crate::discover::{MarkdownDiscovery, MarkupDiscovery, ResourceDiscovery, ResourceRequest};
use crate::filename::NameRegistry;
use crate::rewrite::localize_image_references;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Markup,
    Markdown,
}

/// Content containing at least one element once parsed as an HTML fragment
/// is markup; anything else is taken to be Markdown already.
pub fn detect_format(content: &str) -> ContentFormat {
    classify(&Html::parse_fragment(content))
}

fn classify(fragment: &Html) -> ContentFormat {
    // The fragment root is the synthetic <html> wrapper.
    let has_elements = fragment
        .root_element()
        .descendants()
        .skip(1)
        .any(|node| node.value().is_element());
    if has_elements {
        ContentFormat::Markup
    } else {
        ContentFormat::Markdown
    }
}

/// A lesson document ready to be written, with the resources it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLesson {
    pub format: ContentFormat,
    pub markdown: String,
    pub resources: Vec<ResourceRequest>,
}

pub struct Normalizer<C: Converter = Html2MdConverter> {
    converter: C,
    site_base: Url,
}

impl Normalizer<Html2MdConverter> {
    pub fn new(site_base: Url) -> Self {
        Self::with_converter(Html2MdConverter, site_base)
    }
}

impl<C: Converter> Normalizer<C> {
    pub fn with_converter(converter: C, site_base: Url) -> Self {
        Self {
            converter,
            site_base,
        }
    }

    /// Turns raw lesson content into a titled Markdown document whose image
    /// references point at local files.
    pub fn normalize(&self, title: &str, content: &str) -> NormalizedLesson {
        let fragment = Html::parse_fragment(content);
        let format = classify(&fragment);

        let (body, discovery): (String, Box<dyn ResourceDiscovery + '_>) = match format {
            ContentFormat::Markup => (
                self.converter.to_markdown(content),
                Box::new(MarkupDiscovery::new(&fragment)),
            ),
            ContentFormat::Markdown => {
                (content.to_string(), Box::new(MarkdownDiscovery::new(content)))
            }
        };

        let mut registry = NameRegistry::new();
        let mut resources = discovery.discover_images(&self.site_base, &mut registry);

        let localized = localize_image_references(&body, &self.site_base);
        resources.extend(localized.requests);
        resources.extend(discovery.discover_documents(&self.site_base));

        let resources = dedupe(resources);
        engine_debug!(
            "Normalized '{}' as {:?} with {} resource(s)",
            title,
            format,
            resources.len()
        );

        NormalizedLesson {
            format,
            markdown: format!("# {title}\n\n{}", localized.markdown),
            resources,
        }
    }
}

/// Drops exact repeats of `(url, file_name)`, keeping first occurrences.
fn dedupe(resources: Vec<ResourceRequest>) -> Vec<ResourceRequest> {
    let mut seen = HashSet::new();
    resources
        .into_iter()
        .filter(|request| seen.insert((request.url.clone(), request.file_name.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{detect_format, ContentFormat, Normalizer};

    #[test]
    fn plain_markdown_has_no_elements() {
        assert_eq!(detect_format("## Heading\n\nSome *text*"), ContentFormat::Markdown);
        assert_eq!(detect_format(""), ContentFormat::Markdown);
        assert_eq!(detect_format("a < b and c > d"), ContentFormat::Markdown);
    }

    #[test]
    fn any_element_means_markup() {
        assert_eq!(detect_format(r#"<img src="a.png">"#), ContentFormat::Markup);
        assert_eq!(detect_format("Text with <b>bold</b>"), ContentFormat::Markup);
    }

    #[test]
    fn normalizer_classifies_like_detect_format() {
        let normalizer = Normalizer::new(Url::parse("https://kodekloud.com").unwrap());
        for content in ["## Plain", "", "a < b", "<p>para</p>", "Text <em>x</em>"] {
            assert_eq!(
                normalizer.normalize("T", content).format,
                detect_format(content),
                "{content:?}"
            );
        }
    }
}
