//! Blocking Petstore client: one method per endpoint
//!
//! Every method returns the [`Envelope`] as received. Non-2xx statuses are
//! data, not errors; only transport and local I/O failures surface as
//! [`ClientError`]. Nothing is retried.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use petcheck_core::{CheckError, Config, Envelope, Order, Pet, PetStatus, User};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error on {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid header {0}")]
    InvalidHeader(String),
    #[error("cannot build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl From<ClientError> for CheckError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport { operation, source } => CheckError::Transport {
                operation,
                message: source.to_string(),
            },
            ClientError::Io { path, source } => CheckError::Io {
                path,
                message: source.to_string(),
            },
            other @ (ClientError::InvalidHeader(_) | ClientError::Build(_)) => {
                CheckError::Transport {
                    operation: "client setup".to_string(),
                    message: other.to_string(),
                }
            }
        }
    }
}

/// Thin typed wrapper over the Petstore REST API
#[derive(Debug, Clone)]
pub struct PetstoreClient {
    http: Client,
    base_url: String,
    /// Static headers from configuration, sent on every request
    static_headers: HeaderMap,
}

impl PetstoreClient {
    /// Build a client with explicit connect and request timeouts.
    ///
    /// # Errors
    ///
    /// Returns error if a configured header is invalid or the HTTP client fails to build.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            static_headers: header_map(&config.headers)?,
        })
    }

    /// Client with default settings against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(&Config {
            base_url: base_url.into(),
            ..Config::default()
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Static headers plus `Content-Type: application/json`.
    fn json_headers(&self) -> HeaderMap {
        let mut headers = self.static_headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path)).headers(self.json_headers())
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path)).headers(self.json_headers())
    }

    fn post_json<T: Serialize>(&self, path: &str, payload: &T) -> RequestBuilder {
        self.http
            .post(self.url(path))
            .headers(self.json_headers())
            .json(payload)
    }

    fn put_json<T: Serialize>(&self, path: &str, payload: &T) -> RequestBuilder {
        self.http
            .put(self.url(path))
            .headers(self.json_headers())
            .json(payload)
    }

    // ── Pets ──

    /// POST /pet
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn create_pet(&self, pet: &Pet) -> Result<Envelope, ClientError> {
        self.send(self.post_json("pet", pet))
    }

    /// GET /pet/{id}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn get_pet(&self, id: i64) -> Result<Envelope, ClientError> {
        self.send(self.get(&format!("pet/{id}")))
    }

    /// PUT /pet
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn update_pet(&self, pet: &Pet) -> Result<Envelope, ClientError> {
        self.send(self.put_json("pet", pet))
    }

    /// DELETE /pet/{id}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn delete_pet(&self, id: i64) -> Result<Envelope, ClientError> {
        self.send(self.delete(&format!("pet/{id}")))
    }

    /// GET /pet/findByStatus?status=...
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn find_pets_by_status(&self, status: PetStatus) -> Result<Envelope, ClientError> {
        self.send(
            self.get("pet/findByStatus")
                .query(&[("status", status.as_str())]),
        )
    }

    /// POST /pet/{id}/uploadImage as multipart field `file`.
    ///
    /// The file handle moves into the request and is closed when the request
    /// is dropped, whether or not it was delivered. The JSON content type is
    /// replaced by `accept: application/json`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Io`] if the file cannot be opened, otherwise transport failures.
    pub fn upload_pet_image(&self, id: i64, image: &Path) -> Result<Envelope, ClientError> {
        let file = File::open(image).map_err(|source| ClientError::Io {
            path: image.display().to_string(),
            source,
        })?;
        let file_name = image
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        let form = Form::new().part("file", Part::reader(file).file_name(file_name));

        let mut headers = self.static_headers.clone();
        headers.remove(CONTENT_TYPE);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        self.send(
            self.http
                .post(self.url(&format!("pet/{id}/uploadImage")))
                .headers(headers)
                .multipart(form),
        )
    }

    // ── Store ──

    /// GET /store/inventory
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn get_inventory(&self) -> Result<Envelope, ClientError> {
        self.send(self.get("store/inventory"))
    }

    /// POST /store/order
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn create_order(&self, order: &Order) -> Result<Envelope, ClientError> {
        self.send(self.post_json("store/order", order))
    }

    /// GET /store/order/{id}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn get_order(&self, id: i64) -> Result<Envelope, ClientError> {
        self.send(self.get(&format!("store/order/{id}")))
    }

    /// DELETE /store/order/{id}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn delete_order(&self, id: i64) -> Result<Envelope, ClientError> {
        self.send(self.delete(&format!("store/order/{id}")))
    }

    // ── Users ──

    /// POST /user
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn create_user(&self, user: &User) -> Result<Envelope, ClientError> {
        self.send(self.post_json("user", user))
    }

    /// GET /user/{username}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn get_user(&self, username: &str) -> Result<Envelope, ClientError> {
        self.send(self.get(&format!("user/{username}")))
    }

    /// PUT /user/{username}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn update_user(&self, username: &str, user: &User) -> Result<Envelope, ClientError> {
        self.send(self.put_json(&format!("user/{username}"), user))
    }

    /// DELETE /user/{username}
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub fn delete_user(&self, username: &str) -> Result<Envelope, ClientError> {
        self.send(self.delete(&format!("user/{username}")))
    }

    /// Issue the request and wrap whatever comes back.
    fn send(&self, builder: RequestBuilder) -> Result<Envelope, ClientError> {
        let request = builder.build().map_err(|source| ClientError::Transport {
            operation: "request build".to_string(),
            source,
        })?;
        let method = request.method().to_string();
        let url = request.url().to_string();
        let operation = format!("{method} {}", request.url().path());

        tracing::debug!("{operation}");
        let start = Instant::now();
        let resp = self
            .http
            .execute(request)
            .map_err(|source| ClientError::Transport {
                operation: operation.clone(),
                source,
            })?;

        let status = resp.status().as_u16();
        let headers: HashMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let text = resp.text().map_err(|source| ClientError::Transport {
            operation: operation.clone(),
            source,
        })?;
        let elapsed = start.elapsed();
        tracing::debug!("{operation} -> {status} in {} ms", elapsed.as_millis());

        Ok(Envelope::new(method, url, status, headers, text, elapsed))
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, ClientError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::InvalidHeader(format!("name {name:?}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::InvalidHeader(format!("value for {name}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
