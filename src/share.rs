use url::Url;

/// Query parameter carrying the active service id.
pub const PAGE_PARAM: &str = "page";

/// Reads the active-service id out of the page URL, if one is recorded.
pub fn active_service(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == PAGE_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Records the active service in the page URL, in place.
///
/// The replace-state analogue: the URL changes without producing a new
/// history entry. Unrelated query parameters survive the rewrite.
pub fn set_active_service(url: &mut Url, id: &str) {
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (key, value) in &others {
        pairs.append_pair(key, value);
    }
    pairs.append_pair(PAGE_PARAM, id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_recorded_service() {
        let url = Url::parse("http://localhost/?page=jellyfin").unwrap();
        assert_eq!(active_service(&url).as_deref(), Some("jellyfin"));
    }

    #[test]
    fn missing_parameter_reads_as_none() {
        let url = Url::parse("http://localhost/?theme=dark").unwrap();
        assert_eq!(active_service(&url), None);
    }

    #[test]
    fn writes_and_replaces_in_place() {
        let mut url = Url::parse("http://localhost/").unwrap();

        set_active_service(&mut url, "mail");
        assert_eq!(active_service(&url).as_deref(), Some("mail"));

        set_active_service(&mut url, "grafana");
        assert_eq!(active_service(&url).as_deref(), Some("grafana"));
        assert_eq!(url.query_pairs().count(), 1);
    }

    #[test]
    fn unrelated_parameters_survive() {
        let mut url = Url::parse("http://localhost/?theme=dark&page=mail").unwrap();
        set_active_service(&mut url, "router");

        assert_eq!(active_service(&url).as_deref(), Some("router"));
        assert!(url
            .query_pairs()
            .any(|(key, value)| key == "theme" && value == "dark"));
    }
}
