//! Blocking HTTP client for the Xunshubao V3 judicial-data verification API.
//!
//! Wraps the envelope codec from `xunshubao-core` with a reqwest transport:
//! one parameterized [`Client::query`] round trip plus named convenience
//! methods for each documented endpoint. Remote business rejections come
//! back as a normal [`QueryOutcome`]; transport and codec faults are typed
//! [`enum@Error`] variants so callers can tell "remote said no" apart from
//! "we could not read what remote said".

mod endpoint;
mod form;

use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{debug, info, warn};

use xunshubao_core::{
    build_envelope, parse_response, BuildError, DecodeError, ResponseEnvelope, CODE_LOCAL_FAILURE,
};

pub use crate::endpoint::Endpoint;
pub use crate::form::{DataInfoForm, SearchForm};
pub use xunshubao_core::{Credentials, CredentialsError, QueryOutcome};

/// Production base URL of the V3 API.
pub const DEFAULT_BASE_URL: &str = "https://api.xunshubao.com";

/// Default transport timeout, matching the reference client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors surfaced by a query round trip.
///
/// Remote business rejection is deliberately not represented here: a
/// well-formed response with a non-success code is an `Ok(QueryOutcome)`.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured base URL could not be parsed or cannot carry paths.
    #[error("invalid API base URL: {0}")]
    BaseUrl(String),
    /// The HTTP client could not be constructed.
    #[error("failed to initialise HTTP client: {0}")]
    Http(#[source] reqwest::Error),
    /// Connection, timeout, or request write failure.
    #[error("transport failure calling {endpoint}: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP status {status}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
    },
    /// The response body was not a valid response envelope.
    #[error("malformed response envelope from {endpoint}: {source}")]
    ResponseFormat {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    /// The request envelope could not be assembled.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The encrypted response payload could not be decoded, which usually
    /// means a key or algorithm-pairing mismatch.
    #[error("failed to decode response payload from {endpoint}: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: DecodeError,
    },
}

impl Error {
    /// Returns the status code the original tuple interface used for every
    /// local failure, for callers still keyed on that sentinel.
    #[must_use]
    pub fn legacy_code(&self) -> &'static str {
        CODE_LOCAL_FAILURE
    }
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API base URL (useful against test doubles).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the transport timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|err| Error::BaseUrl(format!("{}: {err}", self.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::BaseUrl(format!(
                "{} cannot carry request paths",
                self.base_url
            )));
        }
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::Http)?;
        Ok(Client {
            http,
            base_url,
            credentials: self.credentials,
        })
    }
}

/// Blocking client for the verification and query endpoints.
///
/// Holds no mutable state; a single instance may be shared across threads,
/// with each call performing an independent envelope round trip.
#[derive(Debug)]
pub struct Client {
    http: HttpClient,
    base_url: Url,
    credentials: Credentials,
}

impl Client {
    /// Creates a client for the production API with default settings.
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        ClientBuilder::new(credentials).build()
    }

    #[must_use]
    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder::new(credentials)
    }

    /// Performs one signed, encrypted query round trip against `endpoint`.
    ///
    /// This is the single code path behind every convenience method: build
    /// the envelope with the endpoint's algorithm pairing, POST it as JSON,
    /// check the HTTP status, then decrypt and dispatch on the response
    /// status code. Blocks the calling thread until response or timeout.
    pub fn query<T: serde::Serialize>(
        &self,
        endpoint: Endpoint,
        request_id: &str,
        payload: &T,
    ) -> Result<QueryOutcome, Error> {
        let suite = endpoint.suite();
        let envelope = build_envelope(&self.credentials, request_id, payload, suite)?;
        let url = self.endpoint_url(endpoint)?;

        debug!(%endpoint, request_id, "submitting query");
        let response = self
            .http
            .post(url)
            .json(&envelope)
            .send()
            .map_err(|source| {
                warn!(%endpoint, request_id, error = %source, "transport failure");
                Error::Transport { endpoint, source }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%endpoint, request_id, %status, "unexpected HTTP status");
            return Err(Error::Status { endpoint, status });
        }

        let raw: ResponseEnvelope = response
            .json()
            .map_err(|source| Error::ResponseFormat { endpoint, source })?;
        let outcome = parse_response(&self.credentials, &raw, suite)
            .map_err(|source| Error::Decode { endpoint, source })?;

        if outcome.is_success() {
            info!(%endpoint, request_id, "query succeeded");
        } else {
            warn!(
                %endpoint,
                request_id,
                code = %outcome.code,
                msg = %outcome.msg,
                "service rejected query"
            );
        }
        Ok(outcome)
    }

    /// Enforcement-disclosure verification for a company.
    pub fn zxgk_check_company(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZxgkCheckCompany, request_id, form)
    }

    /// Enforcement-disclosure verification for a person.
    pub fn zxgk_check_person(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZxgkCheckPerson, request_id, form)
    }

    /// Bad-credit verification for a company.
    pub fn shixin_check_company(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ShixinCheckCompany, request_id, form)
    }

    /// Bad-credit verification for a person.
    pub fn shixin_check_person(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ShixinCheckPerson, request_id, form)
    }

    /// Consumption-restriction verification for a company.
    pub fn xgl_check_company(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::XglCheckCompany, request_id, form)
    }

    /// Consumption-restriction verification for a person.
    pub fn xgl_check_person(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::XglCheckPerson, request_id, form)
    }

    /// Enforced-debtor verification for a company.
    pub fn zhixing_check_company(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZhixingCheckCompany, request_id, form)
    }

    /// Enforced-debtor verification for a person.
    pub fn zhixing_check_person(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZhixingCheckPerson, request_id, form)
    }

    /// Case-closure verification for a company.
    pub fn zhongben_check_company(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZhongbenCheckCompany, request_id, form)
    }

    /// Case-closure verification for a person.
    pub fn zhongben_check_person(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZhongbenCheckPerson, request_id, form)
    }

    /// Enforcement-disclosure record query for a company.
    pub fn zxgk_query_company(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZxgkQueryCompany, request_id, form)
    }

    /// Enforcement-disclosure record query for a person.
    pub fn zxgk_query_person(
        &self,
        request_id: &str,
        form: &SearchForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::ZxgkQueryPerson, request_id, form)
    }

    /// Detail lookup for a single judicial data record.
    pub fn sifa_data_info(
        &self,
        request_id: &str,
        form: &DataInfoForm,
    ) -> Result<QueryOutcome, Error> {
        self.query(Endpoint::SifaDataInfo, request_id, form)
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::BaseUrl(format!("{} cannot carry request paths", self.base_url)))?
            .extend(endpoint.path().trim_start_matches('/').split('/'));
        Ok(url)
    }
}
