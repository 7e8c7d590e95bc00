use crate::{
    fs,
    models::photo::{SCHEMA, SEARCH_RESULTS},
    schema::{Shape, Typed},
    Client,
};
use eyre::{eyre, Result, WrapErr};
use std::path::{Path, PathBuf};
use url::Url;

/// Photo search endpoint.
const ENDPOINT: &str = "https://api.unsplash.com/search/photos";

/// Static access key, tied to the application.
const ACCESS_KEY: &str = "fc0Hj6zBd3nkUad8E_hpoC2cTsyjo5lj6ca7nQi1ey4";

/// A photo matching a search term.
#[derive(Debug)]
pub struct Photo {
    /// Small-size thumbnail URL.
    url: Url,
}

impl Photo {
    /// Searches for photos matching `query` and keeps the first result's
    /// small thumbnail.
    ///
    /// The response body is validated against the declared shape before
    /// anything is read out of it.
    pub fn search(client: &Client, query: &str) -> Result<Self> {
        let mut url = Url::parse(ENDPOINT).expect("valid photo endpoint");
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("query", query)
            .append_pair("client_id", ACCESS_KEY);

        let body = client.get_json(&url).context("call photo endpoint")?;
        let page = SCHEMA
            .cast(&body, &Shape::Ref(SEARCH_RESULTS))
            .context("validate photo search response")?;

        let small = match first_small_url(&page) {
            Some(small) => small,
            None => return Err(eyre!("no photo for this query")),
        };

        Ok(Self {
            url: small.parse().context("parse thumbnail URL")?,
        })
    }

    /// Returns the thumbnail URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Downloads the thumbnail under `directory`, named after `title`.
    pub fn download(
        &self,
        client: &Client,
        directory: &Path,
        title: &str,
    ) -> Result<PathBuf> {
        let mut bytes = Vec::new();
        client
            .get_image(&self.url, &mut bytes)
            .context("fetch thumbnail")?;

        let mut filename = fs::sanitize_name(title);
        filename.set_extension("jpg");
        let path = [directory, &filename].iter().collect::<PathBuf>();
        fs::atomic_write(&path, &bytes).context("save thumbnail")?;

        Ok(path)
    }
}

/// First result's small thumbnail URL, if the result set is not empty.
fn first_small_url(page: &Typed) -> Option<&str> {
    page.get("results")?
        .index(0)?
        .get("urls")?
        .get("small")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(entries: Vec<(&str, Typed)>) -> Typed {
        Typed::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn result(small: &str) -> Typed {
        record(vec![(
            "urls",
            record(vec![("small", Typed::Str(small.to_owned()))]),
        )])
    }

    #[test]
    fn picks_first_result_thumbnail() {
        let page = record(vec![(
            "results",
            Typed::List(vec![
                result("https://images.example/one"),
                result("https://images.example/two"),
            ]),
        )]);

        assert_eq!(first_small_url(&page), Some("https://images.example/one"));
    }

    #[test]
    fn empty_result_set_has_no_thumbnail() {
        let page = record(vec![("results", Typed::List(vec![]))]);

        assert_eq!(first_small_url(&page), None);
    }
}
