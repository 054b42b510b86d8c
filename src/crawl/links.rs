// src/crawl/links.rs
// =============================================================================
// Per-page link extraction.
//
// A LinkReader serves exactly one page: the first pull issues a single GET
// and later pulls hand out the page's anchor hrefs one at a time, in
// document order. A redirect response yields the raw Location header as
// the page's only link; the body is never scanned in that case.
//
// Yielded values are unresolved, possibly-relative strings. Resolving a
// link against the page it came from is the caller's job.
// =============================================================================

use reqwest::header::LOCATION;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Errors produced while fetching or reading a page's links. These are
/// recovered per page by the crawler; they never abort a crawl.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("http get error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("redirect response is missing a location header")]
    MissingLocation,

    #[error("redirect location is not valid utf-8")]
    InvalidLocation,
}

enum ReaderState {
    Unfetched,
    Reading(std::vec::IntoIter<String>),
    Done,
}

/// Pull-based reader over the hrefs of a single page.
///
/// Not restartable: once the hrefs are exhausted the reader only returns
/// `Ok(None)`. Dropping the reader releases the underlying connection, so
/// a caller abandoning a page early needs no explicit cleanup.
pub struct LinkReader {
    page_url: Url,
    client: Client,
    state: ReaderState,
}

impl LinkReader {
    /// Creates a reader for the given page. No request is made until the
    /// first call to [`LinkReader::next_link`].
    ///
    /// The client must have redirect following disabled; a 3xx response
    /// is data to this reader, not something to chase.
    pub fn new(page_url: Url, client: Client) -> Self {
        LinkReader {
            page_url,
            client,
            state: ReaderState::Unfetched,
        }
    }

    /// The URL of the page this reader serves.
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// Returns the next href on the page, `Ok(None)` when the page has no
    /// more links, or an error if the page could not be fetched. After an
    /// error the reader is exhausted.
    pub async fn next_link(&mut self) -> Result<Option<String>, ExtractError> {
        if matches!(self.state, ReaderState::Unfetched) {
            // Leave the reader exhausted if the fetch fails.
            self.state = ReaderState::Done;
            let links = self.fetch().await?;
            self.state = ReaderState::Reading(links.into_iter());
        }

        match &mut self.state {
            ReaderState::Reading(links) => match links.next() {
                Some(href) => Ok(Some(href)),
                None => {
                    self.state = ReaderState::Done;
                    Ok(None)
                }
            },
            ReaderState::Unfetched | ReaderState::Done => Ok(None),
        }
    }

    async fn fetch(&self) -> Result<Vec<String>, ExtractError> {
        let response = self.client.get(self.page_url.clone()).send().await?;

        if response.status().is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .ok_or(ExtractError::MissingLocation)?;
            let location = location
                .to_str()
                .map_err(|_| ExtractError::InvalidLocation)?;

            return Ok(vec![location.to_string()]);
        }

        // Error pages are scanned like any other body; a plain "not
        // found" response simply yields no links.
        let body = response.text().await?;

        Ok(extract_hrefs(&body))
    }
}

/// Collects the href of every anchor tag in the document, in document
/// order. The parser is html5ever-based and tolerates malformed markup.
fn extract_hrefs(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let anchors = Selector::parse("a[href]").expect("static selector");

    document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_hrefs_in_document_order() {
        let body = r#"
            <html><body>
                <a href="/first">one</a>
                <p><a href="/second">two</a></p>
                <a name="no-href">skipped</a>
                <a href="?t=0">relative query</a>
            </body></html>
        "#;

        assert_eq!(extract_hrefs(body), vec!["/first", "/second", "?t=0"]);
    }

    #[test]
    fn tolerates_malformed_markup() {
        let body = "<html><a href='/only'><div></a></html";

        assert_eq!(extract_hrefs(body), vec!["/only"]);
    }

    #[test]
    fn ignores_other_tags_and_attributes() {
        let body = r#"
            <img src="/image.png">
            <link href="/style.css" rel="stylesheet">
            <area href="/map">
        "#;

        assert!(extract_hrefs(body).is_empty());
    }
}
