//! Document sources.
//!
//! # Responsibilities
//! - Resolve configuration locations (absolute or relative) into URIs
//! - Fetch raw document text over http(s), from local files, or from
//!   resources bundled into the binary
//!
//! # Design Decisions
//! - Only a fixed set of schemes is accepted; anything else is fatal
//! - No retries: a failed fetch fails the load
//! - Sources are traits so tests can serve documents from memory

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use futures_util::future::BoxFuture;
use url::Url;

use crate::loader::error::LoadError;

/// Scheme of documents compiled into the binary.
pub const RESOURCE_SCHEME: &str = "resource";

/// Something that can produce the text of a configuration document.
pub trait DocumentSource: Send + Sync {
    fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<String, LoadError>>;
}

/// Parse a top-level configuration location.
///
/// Absolute URIs are taken as-is; anything without a scheme is treated as a
/// local file path.
pub fn parse_location(location: &str) -> Result<Url, LoadError> {
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let absolute = std::path::absolute(Path::new(location)).map_err(|e| {
                LoadError::InvalidUri {
                    uri: location.to_string(),
                    reason: e.to_string(),
                }
            })?;
            Url::from_file_path(&absolute).map_err(|()| LoadError::InvalidUri {
                uri: location.to_string(),
                reason: "not an absolute file path".to_string(),
            })
        }
        Err(e) => Err(LoadError::InvalidUri {
            uri: location.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Resolve an include reference relative to the document that contains it.
pub fn resolve_reference(base: Option<&Url>, reference: &str) -> Result<Url, LoadError> {
    let invalid = |reason: String| LoadError::InvalidUri {
        uri: reference.to_string(),
        reason,
    };
    match Url::parse(reference) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(reference).map_err(|e| invalid(e.to_string())),
            None => parse_location(reference),
        },
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Documents compiled into the binary, addressed as `resource:///<name>`.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    documents: HashMap<String, String>,
}

impl Resources {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The example configuration shipped with the service.
    pub fn bundled() -> Self {
        Self::empty()
            .with("example.json", include_str!("../../resources/example.json"))
            .with("example-traffic.json", include_str!("../../resources/example-traffic.json"))
            .with("example-devices.json", include_str!("../../resources/example-devices.json"))
            .with("example.xml", include_str!("../../resources/example.xml"))
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.documents.insert(name.into(), text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.documents.get(name).map(String::as_str)
    }

    /// Name of the resource addressed by a `resource:` URI.
    pub fn name_of(uri: &Url) -> &str {
        uri.path().trim_start_matches('/')
    }
}

/// The production source: http(s), file and bundled resources.
#[derive(Debug, Clone)]
pub struct UriSource {
    client: reqwest::Client,
    resources: Resources,
}

impl UriSource {
    /// Create a source whose HTTP fetches time out after `fetch_timeout`.
    pub fn new(fetch_timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|source| LoadError::Http {
                uri: "(client setup)".to_string(),
                source,
            })?;
        Ok(Self {
            client,
            resources: Resources::bundled(),
        })
    }

    async fn fetch_http(&self, uri: &Url) -> Result<String, LoadError> {
        let http_error = |source| LoadError::Http {
            uri: uri.to_string(),
            source,
        };
        let response = self.client.get(uri.clone()).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(http_error)
    }

    async fn fetch_file(&self, uri: &Url) -> Result<String, LoadError> {
        let path = uri.to_file_path().map_err(|()| LoadError::InvalidUri {
            uri: uri.to_string(),
            reason: "not a local file path".to_string(),
        })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                uri: uri.to_string(),
                source,
            })
    }

    fn fetch_resource(&self, uri: &Url) -> Result<String, LoadError> {
        let name = Resources::name_of(uri);
        self.resources
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| LoadError::MissingResource {
                name: name.to_string(),
            })
    }
}

impl DocumentSource for UriSource {
    fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<String, LoadError>> {
        Box::pin(async move {
            tracing::debug!(uri = %uri, "Fetching configuration document");
            match uri.scheme() {
                "http" | "https" => self.fetch_http(uri).await,
                "file" => self.fetch_file(uri).await,
                RESOURCE_SCHEME => self.fetch_resource(uri),
                scheme => Err(LoadError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                    uri: uri.to_string(),
                }),
            }
        })
    }
}

/// Serves bundled resources only. Handy for tests and offline use.
impl DocumentSource for Resources {
    fn fetch<'a>(&'a self, uri: &'a Url) -> BoxFuture<'a, Result<String, LoadError>> {
        Box::pin(async move {
            if uri.scheme() != RESOURCE_SCHEME {
                return Err(LoadError::UnsupportedScheme {
                    scheme: uri.scheme().to_string(),
                    uri: uri.to_string(),
                });
            }
            let name = Resources::name_of(uri);
            self.get(name)
                .map(str::to_string)
                .ok_or_else(|| LoadError::MissingResource {
                    name: name.to_string(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(parse_location("http://host/a.json").unwrap().scheme(), "http");
        assert_eq!(parse_location("resource:///example.json").unwrap().scheme(), "resource");

        let file = parse_location("some/dir/config.json").unwrap();
        assert_eq!(file.scheme(), "file");
        assert!(file.path().ends_with("/some/dir/config.json"));
    }

    #[test]
    fn test_resolve_relative_reference() {
        let base = Url::parse("http://host/configs/root.json").unwrap();
        let resolved = resolve_reference(Some(&base), "devices.json").unwrap();
        assert_eq!(resolved.as_str(), "http://host/configs/devices.json");

        let base = Url::parse("resource:///dir/root.json").unwrap();
        let resolved = resolve_reference(Some(&base), "sub.json").unwrap();
        assert_eq!(Resources::name_of(&resolved), "dir/sub.json");

        let absolute = resolve_reference(Some(&base), "file:///etc/x.json").unwrap();
        assert_eq!(absolute.scheme(), "file");
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(Resources::name_of(&Url::parse("resource:///example.json").unwrap()), "example.json");
        assert_eq!(Resources::name_of(&Url::parse("resource:example.json").unwrap()), "example.json");
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let source = UriSource::new(Duration::from_secs(1)).unwrap();
        let uri = Url::parse("ftp://host/config.json").unwrap();
        let err = source.fetch(&uri).await.unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[tokio::test]
    async fn test_bundled_resources() {
        let source = UriSource::new(Duration::from_secs(1)).unwrap();
        let uri = Url::parse("resource:///example.json").unwrap();
        assert!(source.fetch(&uri).await.unwrap().contains("levels"));

        let missing = Url::parse("resource:///missing.json").unwrap();
        assert!(matches!(
            source.fetch(&missing).await.unwrap_err(),
            LoadError::MissingResource { .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = UriSource::new(Duration::from_secs(1)).unwrap();
        let uri = Url::parse("file:///definitely/not/here.json").unwrap();
        assert!(matches!(source.fetch(&uri).await.unwrap_err(), LoadError::Io { .. }));
    }
}
