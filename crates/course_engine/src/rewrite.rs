use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

use crate::discover::{ResourceKind, ResourceRequest};
use crate::filename::resource_file_name;

#[allow(clippy::expect_used)]
static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image reference regex is valid") // Static pattern, safe to panic
});

/// `<img>` tags the converter kept as raw HTML (sized images, for instance).
#[allow(clippy::expect_used)]
static RAW_IMAGE_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(<img\b[^>]*?\bsrc\s*=\s*")([^"]*)(")"#).expect("raw img regex is valid") // Static pattern, safe to panic
});

/// Markdown with image references pointing at local files, plus the
/// downloads needed to back them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedMarkdown {
    pub markdown: String,
    pub requests: Vec<ResourceRequest>,
}

/// Rewrites every `![alt](url)` whose target resolves to an http(s) URL into
/// `![alt](<local name>)`. Targets that do not resolve are left untouched.
pub fn localize_image_references(markdown: &str, base: &Url) -> LocalizedMarkdown {
    let mut requests = Vec::new();

    let rewritten = IMAGE_REFERENCE.replace_all(markdown, |caps: &Captures<'_>| {
        match localize_target(&caps[2], base) {
            Some(request) => {
                let replacement = format!("![{}]({})", &caps[1], request.file_name);
                requests.push(request);
                replacement
            }
            None => caps[0].to_string(),
        }
    });

    let rewritten = RAW_IMAGE_SRC.replace_all(&rewritten, |caps: &Captures<'_>| {
        match localize_target(&caps[2], base) {
            Some(request) => {
                let replacement = format!("{}{}{}", &caps[1], request.file_name, &caps[3]);
                requests.push(request);
                replacement
            }
            None => caps[0].to_string(),
        }
    });

    LocalizedMarkdown {
        markdown: rewritten.into_owned(),
        requests,
    }
}

fn localize_target(target: &str, base: &Url) -> Option<ResourceRequest> {
    // An optional title (`![a](url "title")`) follows the first whitespace.
    let token = target.split_whitespace().next()?;
    let token = token.trim_start_matches('<').trim_end_matches('>');
    let clean = unescape_markdown(token);

    let absolute = if clean.starts_with("http") || clean.starts_with('/') || clean.contains("://") {
        clean
    } else {
        base.join(&clean).ok()?.to_string()
    };
    if !absolute.starts_with("http") {
        return None;
    }

    let url = Url::parse(&absolute).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let file_name = resource_file_name(url.as_str())?;
    Some(ResourceRequest {
        url: url.into(),
        file_name,
        kind: ResourceKind::Image,
    })
}

/// Undoes the escaping a converter applies to Markdown-significant characters.
fn unescape_markdown(text: &str) -> String {
    text.replace(r"\_", "_").replace(r"\*", "*")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::localize_image_references;

    fn base() -> Url {
        Url::parse("https://kodekloud.com").unwrap()
    }

    #[test]
    fn absolute_reference_becomes_local_name() {
        let out = localize_image_references("![alt](https://host/path/img.png?x=1)", &base());
        assert_eq!(out.markdown, "![alt](img.png)");
        assert_eq!(out.requests.len(), 1);
        assert_eq!(out.requests[0].url, "https://host/path/img.png?x=1");
        assert_eq!(out.requests[0].file_name, "img.png");
    }

    #[test]
    fn escaped_underscores_are_recovered() {
        let out = localize_image_references(r"![](https://host/my\_image\_1.png)", &base());
        assert_eq!(out.markdown, "![](my_image_1.png)");
        assert_eq!(out.requests[0].url, "https://host/my_image_1.png");
    }

    #[test]
    fn relative_reference_joins_base() {
        let out = localize_image_references("![d](images/diagram.svg)", &base());
        assert_eq!(out.markdown, "![d](diagram.svg)");
        assert_eq!(out.requests[0].url, "https://kodekloud.com/images/diagram.svg");
    }

    #[test]
    fn root_relative_and_foreign_schemes_are_left_alone() {
        let input = "![a](/static/a.png) ![b](data:image/png;base64,AA==) ![c](ftp://h/c.png)";
        let out = localize_image_references(input, &base());
        assert_eq!(out.markdown, input);
        assert!(out.requests.is_empty());
    }

    #[test]
    fn titles_are_dropped_from_the_target() {
        let out = localize_image_references(r#"![x](https://h/a.png "A title")"#, &base());
        assert_eq!(out.markdown, "![x](a.png)");
    }

    #[test]
    fn raw_img_tags_are_rewritten_too() {
        let input = r#"<img src="https://h/media/wide.png" width="600" />"#;
        let out = localize_image_references(input, &base());
        assert_eq!(out.markdown, r#"<img src="wide.png" width="600" />"#);
        assert_eq!(out.requests[0].file_name, "wide.png");
    }

    #[test]
    fn surrounding_text_is_preserved() {
        let input = "Intro\n\n![one](https://h/1.png) and ![two](https://h/2.png)\n\nOutro";
        let out = localize_image_references(input, &base());
        assert_eq!(out.markdown, "Intro\n\n![one](1.png) and ![two](2.png)\n\nOutro");
        assert_eq!(out.requests.len(), 2);
    }
}
