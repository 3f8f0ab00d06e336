//! Parsing for server directory listings.
//!
//! Any static file server that renders a directory as an HTML page of
//! `<a href="...">` entries works (Apache autoindex, nginx, `python -m
//! http.server`). Hrefs may be server-absolute or relative to the listed
//! directory; both shapes are handled.

use std::sync::LazyLock;

use regex::Regex;

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*"([^"]*)""#).expect("static regex"));

/// Every `href` attribute value on the page, in document order.
pub(super) fn extract_hrefs(html: &str) -> Vec<&str> {
    HREF.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Track identifiers from a folder listing: entries with a recognized audio
/// extension, reduced to the path segment after `/<folder>/`.
pub(super) fn track_names(html: &str, folder: &str, extensions: &[String]) -> Vec<String> {
    let marker = format!("/{}/", folder.trim_matches('/'));
    extract_hrefs(html)
        .into_iter()
        .filter(|href| has_audio_extension(href, extensions))
        .filter_map(|href| track_name_from_href(href, &marker))
        .collect()
}

fn has_audio_extension(href: &str, extensions: &[String]) -> bool {
    let lower = href.to_ascii_lowercase();
    extensions.iter().any(|ext| {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        !ext.is_empty() && lower.ends_with(&format!(".{ext}"))
    })
}

fn track_name_from_href(href: &str, marker: &str) -> Option<String> {
    if let Some((_, rest)) = href.split_once(marker) {
        if rest.is_empty() {
            return None;
        }
        return Some(rest.to_string());
    }
    // Relative listing entry: the href is the name itself.
    if !href.contains('/') {
        return Some(href.to_string());
    }
    None
}

/// Folder identifiers from the top-level songs listing: entries pointing
/// into the songs directory (or relative subdirectory entries), reduced to
/// their final path segment. `.htaccess` noise is excluded.
pub(super) fn folder_names(html: &str, songs_dir: &str) -> Vec<String> {
    let marker = format!("/{}/", songs_dir.trim_matches('/'));
    extract_hrefs(html)
        .into_iter()
        .filter(|href| !href.contains(".htaccess"))
        .filter_map(|href| folder_name_from_href(href, &marker))
        .collect()
}

fn folder_name_from_href(href: &str, marker: &str) -> Option<String> {
    let candidate = if let Some((_, rest)) = href.split_once(marker) {
        rest
    } else if href.ends_with('/') && !href.contains(':') {
        // Relative subdirectory entry ("ncs/").
        href
    } else {
        return None;
    };

    let name = candidate.trim_end_matches('/');
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return None;
    }
    Some(name.to_string())
}
