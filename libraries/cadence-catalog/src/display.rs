//! Formatting helpers for catalog data shown in the terminal

use cadence_core::MediaLink;

/// `m:ss` for a length in seconds
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `m:ss` for a position in milliseconds
pub fn format_millis(ms: u64) -> String {
    format_duration(ms / 1000)
}

/// Pick an image variant: exact quality match, else the last (largest) one
pub fn image_url<'a>(images: &'a [MediaLink], quality: &str) -> Option<&'a str> {
    images
        .iter()
        .find(|img| img.quality == quality)
        .or_else(|| images.last())
        .and_then(MediaLink::href)
}

/// Clean up catalog titles
///
/// Decodes `&quot;` and unwraps album names of the form `From "Movie"`.
pub fn sanitize_title(value: &str) -> String {
    let mut title = replace_ignore_ascii_case(value, "&quot;", "\"");

    if let Some(rest) = strip_prefix_ignore_ascii_case(&title, "from") {
        if rest.starts_with(char::is_whitespace) {
            title = rest.trim_start().to_string();
        }
    }

    let title = title.strip_prefix(['"', '\'']).unwrap_or(&title);
    let title = title.strip_suffix(['"', '\'']).unwrap_or(title);
    title.trim().to_string()
}

/// Compact play counts: `950`, `12.3K`, `1.5M`
pub fn format_play_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

fn strip_prefix_ignore_ascii_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &value[prefix.len()..])
}

fn replace_ignore_ascii_case(value: &str, needle: &str, replacement: &str) -> String {
    let lower = value.to_ascii_lowercase();
    let mut out = String::with_capacity(value.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find(needle) {
        let start = cursor + found;
        out.push_str(&value[cursor..start]);
        out.push_str(replacement);
        cursor = start + needle.len();
    }

    out.push_str(&value[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "60:00");
        assert_eq!(format_millis(262_999), "4:22");
    }

    #[test]
    fn image_selection() {
        let images = vec![
            MediaLink::new("50x50", "https://img/50"),
            MediaLink::new("150x150", "https://img/150"),
            MediaLink::new("500x500", "https://img/500"),
        ];

        assert_eq!(image_url(&images, "150x150"), Some("https://img/150"));
        assert_eq!(image_url(&images, "1000x1000"), Some("https://img/500"));
        assert_eq!(image_url(&[], "500x500"), None);
    }

    #[test]
    fn titles() {
        assert_eq!(sanitize_title("Tum Hi Ho"), "Tum Hi Ho");
        assert_eq!(sanitize_title("From &quot;Aashiqui 2&quot;"), "Aashiqui 2");
        assert_eq!(sanitize_title("from 'Dil Se'"), "Dil Se");
        assert_eq!(sanitize_title("&QUOT;Quoted&quot;"), "Quoted");
        assert_eq!(sanitize_title("Frombie"), "Frombie");
    }

    #[test]
    fn play_counts() {
        assert_eq!(format_play_count(950), "950");
        assert_eq!(format_play_count(12_345), "12.3K");
        assert_eq!(format_play_count(1_500_000), "1.5M");
    }
}
