/// The two canonical URLs printed on the certificate and made clickable in
/// the exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTargets {
    /// The certificate verification page.
    pub verification_url: String,
    /// The site root, linked from the footer.
    pub site_url: String,
}

impl LinkTargets {
    pub fn new(verification_url: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            verification_url: verification_url.into(),
            site_url: site_url.into(),
        }
    }

    /// The verification URL as printed: scheme and trailing slash dropped.
    pub fn verification_display(&self) -> String {
        display_form(&self.verification_url)
    }

    pub fn site_display(&self) -> String {
        display_form(&self.site_url)
    }
}

impl Default for LinkTargets {
    fn default() -> Self {
        Self::new("https://ezzcode.com/#certificate", "https://ezzcode.com")
    }
}

fn display_form(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_form_drops_scheme() {
        let links = LinkTargets::default();
        assert_eq!(links.verification_display(), "ezzcode.com/#certificate");
        assert_eq!(links.site_display(), "ezzcode.com");
    }

    #[test]
    fn display_form_keeps_unknown_schemes() {
        let links = LinkTargets::new("ftp://host/x/", "http://example.org/");
        assert_eq!(links.verification_display(), "ftp://host/x");
        assert_eq!(links.site_display(), "example.org");
    }
}
