use reqwest::Url;

use crate::{LookupError, WordDefinition};

pub(crate) const DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Appends `word` to `base_url` as a single path segment.
///
/// The word is percent-encoded by the url layer, so `/`, `?` and `#` inside it
/// never change the shape of the request path. `.` and `..` cannot be sent
/// as a segment at all and are rejected.
pub(crate) fn endpoint(base_url: &Url, word: &str) -> Result<Url, LookupError> {
    if matches!(word, "." | "..") {
        return Err(LookupError::new(format!(
            "{word:?} is not a valid path segment"
        )));
    }
    let mut url = base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(word);
    }
    Ok(url)
}

pub(crate) async fn get_definition(
    client: &reqwest::Client,
    base_url: &Url,
    word: &str,
) -> Result<Vec<WordDefinition>, LookupError> {
    let url = endpoint(base_url, word)?;
    tracing::trace!(%url, "requesting definition");
    let res = client.get(url).send().await?.error_for_status()?;
    Ok(res.json::<Vec<WordDefinition>>().await?)
}
