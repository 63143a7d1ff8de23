use urlencoding;

/// Extract the video id from a watch URL's `v` query parameter.
pub fn parse_video_id(url: &str) -> Option<String> {
    query_param(url, "v").filter(|id| !id.is_empty())
}

/// Start offset requested by the URL's `t` parameter, in seconds.
/// Accepts both "42" and the conventional "42s" form.
pub fn parse_start_time(url: &str) -> Option<f64> {
    let raw = query_param(url, "t")?;
    let digits = raw.strip_suffix('s').unwrap_or(&raw);
    digits.parse::<f64>().ok().filter(|t| *t >= 0.0)
}

/// Whether a URL points at a watch page.
pub fn is_watch_url(url: &str, watch_marker: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or("");
    path.contains(watch_marker)
}

/// Build a watch URL that opens a video at a given time offset.
/// Seconds are floored; the `t` value carries the conventional `s` suffix.
pub fn watch_url_with_time(watch_base: &str, video_id: &str, seconds: f64) -> String {
    format!(
        "{}?v={}&t={}s",
        watch_base,
        urlencoding::encode(video_id),
        seconds.max(0.0).floor() as u64
    )
}

/// Display title of a page: the document title with the site suffix removed.
pub fn strip_title_suffix<'a>(title: &'a str, suffix: &str) -> &'a str {
    let stripped = if !suffix.is_empty() {
        title.strip_suffix(suffix).unwrap_or(title)
    } else {
        title
    };
    stripped.trim()
}

/// Escape text for interpolation into page markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn query_param(url: &str, name: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let query = without_fragment.split_once('?')?.1;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == name {
            return Some(
                urlencoding::decode(value)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| value.to_string()),
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_id() {
        assert_eq!(parse_video_id("/watch?v=abc123"), Some("abc123".to_string()));
        assert_eq!(
            parse_video_id("/watch?list=x&v=abc&t=10s"),
            Some("abc".to_string())
        );
        assert_eq!(
            parse_video_id("/watch?v=a%20b#frag"),
            Some("a b".to_string())
        );
        assert_eq!(parse_video_id("/watch"), None);
        assert_eq!(parse_video_id("/watch?v="), None);
        assert_eq!(parse_video_id("/library?video=abc"), None);
    }

    #[test]
    fn test_parse_start_time() {
        assert_eq!(parse_start_time("/watch?v=a&t=42s"), Some(42.0));
        assert_eq!(parse_start_time("/watch?v=a&t=42"), Some(42.0));
        assert_eq!(parse_start_time("/watch?v=a"), None);
        assert_eq!(parse_start_time("/watch?v=a&t=oops"), None);
    }

    #[test]
    fn test_is_watch_url() {
        assert!(is_watch_url("/watch?v=abc", "/watch"));
        assert!(!is_watch_url("/library", "/watch"));
        // The marker must sit in the path, not the query
        assert!(!is_watch_url("/library?from=/watch", "/watch"));
    }

    #[test]
    fn test_watch_url_with_time() {
        assert_eq!(
            watch_url_with_time("/watch", "abc", 42.9),
            "/watch?v=abc&t=42s"
        );
        assert_eq!(
            watch_url_with_time("/watch", "a b", 0.0),
            "/watch?v=a%20b&t=0s"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="pwn()">"#),
            "&lt;img src=x onerror=&quot;pwn()&quot;&gt;"
        );
        assert_eq!(escape_html("a & b's"), "a &amp; b&#39;s");
    }

    #[test]
    fn test_strip_title_suffix() {
        assert_eq!(
            strip_title_suffix("My Talk - WatchNotes", " - WatchNotes"),
            "My Talk"
        );
        assert_eq!(strip_title_suffix("No Suffix Here", " - WatchNotes"), "No Suffix Here");
        assert_eq!(strip_title_suffix("  padded  ", ""), "padded");
    }
}
