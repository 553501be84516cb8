use hyper::client::HttpConnector;
use hyper::http::uri::InvalidUri;
use hyper::{Body, Client, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use nowplaying::{Parser, PlaybackSnapshot, VolumePolicy};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Startup settings, read from the environment once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub access_token: String,
    pub volume_policy: VolumePolicy,
}

impl Config {
    /// Reads `SPOTIFY_ACCESS_TOKEN` (required), `SPOTIFY_API_URL` and
    /// `NOWPLAYING_VOLUME_POLICY`.
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let access_token = lookup("SPOTIFY_ACCESS_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("SPOTIFY_ACCESS_TOKEN is missing".to_owned()))?;
        let api_url = lookup("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let volume_policy = match lookup("NOWPLAYING_VOLUME_POLICY") {
            Some(policy) => policy
                .parse::<VolumePolicy>()
                .map_err(|e| Error::Config(e.to_string()))?,
            None => VolumePolicy::default(),
        };
        Ok(Config {
            api_url,
            access_token,
            volume_policy,
        })
    }
}

/// Queries the player endpoint and hands the body to the snapshot parser.
///
/// One request per call. Token acquisition and refresh belong to the caller.
pub struct Provider {
    client: Client<HttpsConnector<HttpConnector>>,
    uri: Uri,
    token: String,
    parser: Parser,
}

impl Provider {
    pub fn new(api_url: &str, token: String, parser: Parser) -> Result<Provider, Error> {
        let uri: Uri = format!("{}/v1/me/player", api_url.trim_end_matches('/')).parse()?;
        let https = HttpsConnector::new();
        let client = Client::builder().build::<_, hyper::Body>(https);
        Ok(Provider {
            client,
            uri,
            token,
            parser,
        })
    }

    pub fn from_config(config: &Config) -> Result<Provider, Error> {
        Provider::new(
            &config.api_url,
            config.access_token.clone(),
            Parser::new(config.volume_policy),
        )
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// `Ok(None)` when the provider answers 204, i.e. there is no active
    /// playback to report.
    pub async fn currently_playing(&self) -> Result<Option<PlaybackSnapshot>, Error> {
        debug!(uri = %self.uri, "querying playback state");
        let resp = self
            .client
            .request(
                Request::builder()
                    .uri(self.uri.clone())
                    .header("Authorization", format!("Bearer {}", self.token))
                    .body(Body::empty())?,
            )
            .await?;
        let status = resp.status();
        debug!(%status, "playback state response");
        match status {
            StatusCode::OK => {
                let got = hyper::body::to_bytes(resp.into_body()).await?;
                Ok(Some(self.parser.parse_slice(&got)?))
            }
            StatusCode::NO_CONTENT => Ok(None),
            status => Err(Error::Status(status)),
        }
    }
}

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("http error: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("request error: {0}")]
    RequestError(#[from] hyper::http::Error),
    #[error("invalid api url: {0}")]
    UriError(#[from] InvalidUri),
    #[error(transparent)]
    SnapshotError(#[from] nowplaying::Error),
    #[error("provider answered {0}")]
    Status(StatusCode),
    #[error("configuration error: {0}")]
    Config(String),
}
