mod image_search;

use reqwest::Client;
use url::Url;

pub use image_search::ImageSearch;

use crate::error::Error;

pub fn make_client() -> reqwest::Client {
    Client::builder()
        .gzip(true)
        .build()
        .expect("client creation should succeed")
}

/// Dining hall slugs as they appear in the menu URLs, e.g. `mosher-jordan`.
pub fn is_valid_hall(hall: &str) -> bool {
    !hall.is_empty()
        && hall
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn menu_url(base: &Url, hall: &str) -> crate::Result<Url> {
    if !is_valid_hall(hall) {
        return Err(Error::InvalidHall(hall.to_owned()));
    }
    base.join(&format!("{hall}/"))
        .map_err(|_| Error::InvalidHall(hall.to_owned()))
}

/// Fetches the raw HTML of a dining hall's menu page.
pub async fn menu_page(client: &reqwest::Client, base: &Url, hall: &str) -> crate::Result<String> {
    let url = menu_url(base, hall)?;
    let start = std::time::Instant::now();
    let response = client.get(url).send().await?.error_for_status()?;
    let text = response.text().await?;
    log::trace!("Got text of {hall} menu page in \t {:?}", start.elapsed());
    Ok(text)
}
