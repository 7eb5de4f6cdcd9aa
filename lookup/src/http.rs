use artist_search_protocol::Candidate;
use url::Url;

use crate::LookupError;
use crate::LookupFuture;
use crate::LookupGateway;
use crate::is_blank_query;

/// Base URL of the public ListenBrainz labs API.
pub const DEFAULT_LOOKUP_ENDPOINT: &str = "https://labs.api.listenbrainz.org";

const SEARCH_PATH: &str = "artist-name-search/json";
const QUERY_PARAM: &str = "artist_name";

/// [`LookupGateway`] backed by the `artist-name-search` HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpLookupGateway {
    client: reqwest::Client,
    search_url: Url,
}

impl HttpLookupGateway {
    pub fn new(endpoint: &str) -> Result<Self, LookupError> {
        let search_url = search_url_for_endpoint(endpoint)?;
        let client = reqwest::Client::builder()
            .user_agent(format!("artist-search/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(LookupError::Client)?;
        Ok(Self { client, search_url })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair(QUERY_PARAM, query);
        url
    }
}

impl LookupGateway for HttpLookupGateway {
    fn lookup(&self, query: &str) -> LookupFuture {
        if is_blank_query(query) {
            return Box::pin(async { Ok(Vec::new()) });
        }

        let client = self.client.clone();
        let url = self.request_url(query);
        Box::pin(async move {
            tracing::debug!(%url, "artist lookup request");
            let response = client
                .get(url)
                .send()
                .await
                .map_err(LookupError::Transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(LookupError::Status {
                    status: status.as_u16(),
                });
            }

            response
                .json::<Vec<Candidate>>()
                .await
                .map_err(LookupError::Decode)
        })
    }
}

fn search_url_for_endpoint(endpoint: &str) -> Result<Url, LookupError> {
    let invalid = |source| LookupError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    };

    let mut base = Url::parse(endpoint.trim()).map_err(invalid)?;
    // `Url::join` replaces the last path segment unless the base ends with a slash.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(SEARCH_PATH).map_err(invalid)
}
