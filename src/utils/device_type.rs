//! Coarse device classification from the `User-Agent` header.

/// Classifies a user agent as `bot`, `tablet`, `mobile` or `desktop`.
///
/// Returns `None` when no user agent was sent, so the visit's device type
/// stays empty rather than guessed.
pub fn classify_device(user_agent: Option<&str>) -> Option<&'static str> {
    let ua = user_agent?.trim();
    if ua.is_empty() {
        return None;
    }

    let ua = ua.to_ascii_lowercase();

    let kind = if ["bot", "crawler", "spider", "curl/", "wget/"]
        .iter()
        .any(|marker| ua.contains(marker))
    {
        "bot"
    } else if ua.contains("ipad") || ua.contains("tablet") {
        "tablet"
    } else if ["mobi", "iphone", "android"]
        .iter()
        .any(|marker| ua.contains(marker))
    {
        "mobile"
    } else {
        "desktop"
    };

    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_agent() {
        assert_eq!(classify_device(None), None);
        assert_eq!(classify_device(Some("   ")), None);
    }

    #[test]
    fn test_bots() {
        assert_eq!(
            classify_device(Some("Mozilla/5.0 (compatible; Googlebot/2.1)")),
            Some("bot")
        );
        assert_eq!(classify_device(Some("curl/8.5.0")), Some("bot"));
    }

    #[test]
    fn test_tablet() {
        assert_eq!(
            classify_device(Some(
                "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
            )),
            Some("tablet")
        );
    }

    #[test]
    fn test_mobile() {
        assert_eq!(
            classify_device(Some(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148"
            )),
            Some("mobile")
        );
        assert_eq!(
            classify_device(Some("Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile")),
            Some("mobile")
        );
    }

    #[test]
    fn test_desktop() {
        assert_eq!(
            classify_device(Some(
                "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
            )),
            Some("desktop")
        );
    }
}
