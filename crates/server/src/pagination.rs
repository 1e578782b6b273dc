//! List envelopes and their `next` / `previous` links.

use std::convert::Infallible;

use api_types::Paginated;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, Uri, request::Parts},
};
use axum_extra::headers::{HeaderMapExt, Host};
use engine::Page;

/// The URL a list request was sent to, the base of its page links.
pub(crate) struct ListUrl {
    /// Scheme and authority, e.g. `http://127.0.0.1:8000`. Unknown when the
    /// request names no host.
    origin: Option<String>,
    uri: Uri,
}

impl ListUrl {
    fn new(uri: Uri, headers: &HeaderMap) -> Self {
        let scheme = uri.scheme_str().unwrap_or("http").to_string();
        let authority = uri.authority().map(ToString::to_string).or_else(|| {
            headers
                .typed_get::<Host>()
                .map(|host| match host.port() {
                    Some(port) => format!("{}:{port}", host.hostname()),
                    None => host.hostname().to_string(),
                })
        });

        Self {
            origin: authority.map(|authority| format!("{scheme}://{authority}")),
            uri,
        }
    }

    /// Rebuild the request URL pointing at `page`.
    ///
    /// Every other query parameter is kept as sent. The first page is linked
    /// without a `page` parameter.
    fn page_link(&self, page: u64) -> String {
        let mut params: Vec<String> = self
            .uri
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| pair.split('=').next() != Some("page"))
            .map(str::to_string)
            .collect();
        if page > 1 {
            params.push(format!("page={page}"));
        }

        let origin = self.origin.as_deref().unwrap_or_default();
        let path = self.uri.path();
        if params.is_empty() {
            format!("{origin}{path}")
        } else {
            format!("{origin}{path}?{}", params.join("&"))
        }
    }
}

impl<S> FromRequestParts<S> for ListUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(parts.uri.clone(), &parts.headers))
    }
}

/// Wrap an engine page in the list envelope, converting every item.
pub(crate) fn paginated<T, U>(
    page: Page<T>,
    url: &ListUrl,
    view: impl FnMut(T) -> U,
) -> Paginated<U> {
    let next = page.has_next().then(|| url.page_link(page.page + 1));
    let previous = page.has_previous().then(|| url.page_link(page.page - 1));

    Paginated {
        count: page.count,
        next,
        previous,
        results: page.items.into_iter().map(view).collect(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header::HOST};

    use super::*;

    fn page(page: u64, num_pages: u64) -> Page<u64> {
        Page {
            items: vec![1, 2],
            count: num_pages * 2,
            page,
            num_pages,
        }
    }

    fn url(uri: &str, host: Option<&'static str>) -> ListUrl {
        let mut headers = HeaderMap::new();
        if let Some(host) = host {
            headers.insert(HOST, HeaderValue::from_static(host));
        }
        ListUrl::new(uri.parse().unwrap(), &headers)
    }

    #[test]
    fn links_are_absolute_and_keep_other_parameters() {
        let url = url(
            "/api/cash_flows/?status=2&page=2&ordering=-amount",
            Some("127.0.0.1:8000"),
        );
        let body = paginated(page(2, 3), &url, |item| item * 10);

        assert_eq!(body.count, 6);
        assert_eq!(body.results, vec![10, 20]);
        assert_eq!(
            body.next.as_deref(),
            Some("http://127.0.0.1:8000/api/cash_flows/?status=2&ordering=-amount&page=3")
        );
        assert_eq!(
            body.previous.as_deref(),
            Some("http://127.0.0.1:8000/api/cash_flows/?status=2&ordering=-amount")
        );
    }

    #[test]
    fn host_without_port() {
        let url = url("/api/statuses/", Some("ledger.example"));
        let body = paginated(page(1, 2), &url, |item| item);
        assert_eq!(
            body.next.as_deref(),
            Some("http://ledger.example/api/statuses/?page=2")
        );
    }

    #[test]
    fn absolute_form_target_wins_over_host_header() {
        let url = url(
            "https://api.example:8443/api/statuses/?page_size=1",
            Some("127.0.0.1:8000"),
        );
        let body = paginated(page(1, 2), &url, |item| item);
        assert_eq!(
            body.next.as_deref(),
            Some("https://api.example:8443/api/statuses/?page_size=1&page=2")
        );
    }

    #[test]
    fn links_stay_relative_without_host() {
        let url = url("/api/statuses", None);
        let body = paginated(page(1, 2), &url, |item| item);
        assert_eq!(body.next.as_deref(), Some("/api/statuses?page=2"));
        assert!(body.previous.is_none());
    }

    #[test]
    fn single_page_has_no_links() {
        let url = url("/api/statuses/", Some("127.0.0.1:8000"));
        let body = paginated(page(1, 1), &url, |item| item);
        assert!(body.next.is_none());
        assert!(body.previous.is_none());
    }
}
