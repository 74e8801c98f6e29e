//! Pagination headers for list and search responses.
//!
//! `X-Total-Count` carries the number of matches and `Link` carries
//! RFC 5988 links to the `next`, `prev`, `last` and `first` pages. Each link
//! is the current request URL with `page` and `size` replaced.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri, header};
use storefront_persistence::types::Page;
use url::Url;

/// Header carrying the total number of matches.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Builds the pagination headers for one page of results.
///
/// `base_url` is the server's public base URL and `uri` the request URI
/// (path and query) the page was produced for.
pub fn pagination_headers<T>(base_url: &str, uri: &Uri, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_elements));

    if let Some(link) = link_header(base_url, uri, page)
        && let Ok(value) = HeaderValue::from_str(&link)
    {
        headers.insert(header::LINK, value);
    }

    headers
}

/// Builds the `Link` header value, or `None` if the request URL is unusable.
pub fn link_header<T>(base_url: &str, uri: &Uri, page: &Page<T>) -> Option<String> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let current = Url::parse(base_url).ok()?.join(path_and_query).ok()?;

    let number = page.page;
    let size = page.size;
    let total_pages = page.total_pages();
    let last_page = total_pages.saturating_sub(1);

    let mut links = Vec::with_capacity(4);
    if let Some(next) = number.checked_add(1).filter(|next| *next < total_pages) {
        links.push(prepare_link(&current, next, size, "next"));
    }
    if number > 0 {
        links.push(prepare_link(&current, number - 1, size, "prev"));
    }
    links.push(prepare_link(&current, last_page, size, "last"));
    links.push(prepare_link(&current, 0, size, "first"));

    Some(links.join(","))
}

fn prepare_link(current: &Url, page: u32, size: u32, rel: &str) -> String {
    let kept: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "size")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = current.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("page", &page.to_string())
        .append_pair("size", &size.to_string());

    let target = url.as_str().replace(',', "%2C").replace(';', "%3B");
    format!("<{}>; rel=\"{}\"", target, rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_persistence::types::PageRequest;

    fn page(number: u32, size: u32, total: u64) -> Page<()> {
        Page::new(Vec::new(), total, &PageRequest::new(number, size))
    }

    #[test]
    fn test_middle_page_has_all_links() {
        let uri: Uri = "/api/products?page=1&size=10&sort=id,asc".parse().unwrap();
        let link = link_header("http://localhost:8080", &uri, &page(1, 10, 35)).unwrap();

        let rels: Vec<&str> = link.split(',').collect();
        assert_eq!(rels.len(), 4);
        assert!(rels[0].ends_with("rel=\"next\""));
        assert!(rels[0].contains("page=2&size=10"));
        assert!(rels[1].contains("page=0&size=10>; rel=\"prev\""));
        assert!(rels[2].contains("page=3&size=10>; rel=\"last\""));
        assert!(rels[3].contains("page=0&size=10>; rel=\"first\""));
        assert!(rels[0].starts_with("<http://localhost:8080/api/products?sort=id%2Casc&"));
    }

    #[test]
    fn test_empty_result_links_to_page_zero() {
        let uri: Uri = "/api/customers".parse().unwrap();
        let link = link_header("http://localhost:8080", &uri, &page(0, 20, 0)).unwrap();

        assert_eq!(
            link,
            "<http://localhost:8080/api/customers?page=0&size=20>; rel=\"last\",\
             <http://localhost:8080/api/customers?page=0&size=20>; rel=\"first\""
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let uri: Uri = "/api/order-items?page=2".parse().unwrap();
        let link = link_header("http://localhost:8080", &uri, &page(2, 10, 30)).unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("rel=\"prev\""));
    }

    #[test]
    fn test_highest_page_number_links_back() {
        let uri: Uri = "/api/products?page=4294967295".parse().unwrap();
        let link = link_header("http://localhost:8080", &uri, &page(u32::MAX, 20, 3)).unwrap();
        assert!(!link.contains("rel=\"next\""));
        assert!(link.contains("page=4294967294&size=20>; rel=\"prev\""));
        assert!(link.contains("page=0&size=20>; rel=\"last\""));
    }

    #[test]
    fn test_total_count_header() {
        let uri: Uri = "/api/products".parse().unwrap();
        let headers = pagination_headers("http://localhost:8080", &uri, &page(0, 20, 3));
        assert_eq!(headers.get(TOTAL_COUNT_HEADER).unwrap(), "3");
        assert!(headers.contains_key(header::LINK));
    }
}
