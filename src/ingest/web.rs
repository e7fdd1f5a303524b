//! Web page loading: fetch a URL and strip markup down to text lines.

use crate::core::errors::CoreError;
use crate::types::{DocMetadata, SourceDocument};

pub async fn fetch_web_document(
    client: &reqwest::Client,
    url: &str,
) -> Result<SourceDocument, CoreError> {
    let response = client.get(url).send().await.map_err(CoreError::llm)?;
    if !response.status().is_success() {
        return Err(CoreError::parse(url, format!("status {}", response.status())));
    }
    let html = response.text().await.map_err(|e| CoreError::parse(url, e))?;

    let text = strip_html_tags(&html);
    Ok(SourceDocument::new(text, DocMetadata::new(url)))
}

/// Simple HTML tag stripper that also drops script/style bodies.
pub fn strip_html_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    let html_lower = html.to_lowercase();
    let chars: Vec<char> = html.chars().collect();
    let chars_lower: Vec<char> = html_lower.chars().collect();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if i + 7 < chars.len() {
            let tag: String = chars_lower[i..i + 7].iter().collect();
            if tag == "<script" {
                in_script = true;
            } else if i + 6 < chars.len()
                && chars_lower[i..i + 6].iter().collect::<String>() == "<style"
            {
                in_style = true;
            }
        }

        if in_script && i + 9 <= chars.len() {
            let tag: String = chars_lower[i..i + 9].iter().collect();
            if tag == "</script>" {
                in_script = false;
                i += 9;
                continue;
            }
        }
        if in_style && i + 8 <= chars.len() {
            let tag: String = chars_lower[i..i + 8].iter().collect();
            if tag == "</style>" {
                in_style = false;
                i += 8;
                continue;
            }
        }

        if in_script || in_style {
            i += 1;
            continue;
        }

        if c == '<' {
            in_tag = true;
        } else if c == '>' {
            in_tag = false;
        } else if !in_tag {
            result.push(c);
        }

        i += 1;
    }

    let lines: Vec<&str> = result
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    lines.join("\n")
}
