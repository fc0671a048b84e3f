// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! REST client for the `/students` collection.
//!
//! Responsibilities:
//! - Map the four CRUD operations onto `GET`/`POST`/`PUT`/`DELETE` requests.
//! - Turn transport failures, non-2xx statuses, and undecodable bodies into [`ApiError`].
//!
//! The [`StudentsApi`] trait is the seam between the MVU kernel and the network,
//! so command handling can be exercised against an in-memory backend.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use thiserror::Error;
use url::Url;

use crate::models::student::{Student, StudentId, StudentPayload};

/// Collection path appended to the configured base URL.
const COLLECTION: &str = "students";

/// Backend operation an error or log line refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "fetch students",
            Self::Create => "create student",
            Self::Update => "update student",
            Self::Delete => "delete student",
        })
    }
}

/// A failed backend request. Variants only refine the diagnostic text;
/// callers treat every variant as "the request did not succeed".
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid backend URL '{0}': expected an absolute http(s) URL")]
    InvalidUrl(String),

    #[error("Failed to set up the HTTP client: {0}")]
    ClientBuild(#[source] Box<reqwest::Error>),

    #[error("Failed to {operation}: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: Box<reqwest::Error>,
    },

    #[error("Failed to {operation}: server responded with HTTP {status}")]
    Status { operation: Operation, status: u16 },

    #[error("Failed to {operation}: unexpected response body: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: Box<reqwest::Error>,
    },
}

impl ApiError {
    /// Operation the failure belongs to, when known.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::InvalidUrl(_) | Self::ClientBuild(_) => None,
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
        }
    }
}

/// CRUD operations against the student collection.
///
/// Response bodies of create and update are not needed by callers; the list is
/// refetched afterwards.
pub trait StudentsApi: Send + Sync {
    fn list(&self) -> Result<Vec<Student>, ApiError>;
    fn create(&self, payload: &StudentPayload) -> Result<(), ApiError>;
    fn update(&self, id: &StudentId, payload: &StudentPayload) -> Result<(), ApiError>;
    fn delete(&self, id: &StudentId) -> Result<(), ApiError>;
}

/// Blocking HTTP implementation, meant to run on worker threads.
pub struct HttpStudentsApi {
    client: Client,
    base: Url,
}

impl HttpStudentsApi {
    /// Build a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("studentdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::ClientBuild(Box::new(source)))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `<base>/students` or `<base>/students/<id>` with the id encoded as one segment.
    fn endpoint(&self, id: Option<&StudentId>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().map_err(|source| ApiError::Transport {
            operation,
            source: Box::new(source),
        })?;

        let status = response.status();
        tracing::debug!(%operation, status = status.as_u16(), url = %response.url(), "backend responded");
        if !status.is_success() {
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl StudentsApi for HttpStudentsApi {
    fn list(&self) -> Result<Vec<Student>, ApiError> {
        let url = self.endpoint(None)?;
        tracing::debug!(%url, "GET");
        let response = self.send(Operation::List, self.client.get(url))?;
        response.json().map_err(|source| ApiError::Decode {
            operation: Operation::List,
            source: Box::new(source),
        })
    }

    fn create(&self, payload: &StudentPayload) -> Result<(), ApiError> {
        let url = self.endpoint(None)?;
        tracing::debug!(%url, "POST");
        self.send(Operation::Create, self.client.post(url).json(payload))?;
        Ok(())
    }

    fn update(&self, id: &StudentId, payload: &StudentPayload) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id))?;
        tracing::debug!(%url, "PUT");
        self.send(Operation::Update, self.client.put(url).json(payload))?;
        Ok(())
    }

    fn delete(&self, id: &StudentId) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id))?;
        tracing::debug!(%url, "DELETE");
        self.send(Operation::Delete, self.client.delete(url))?;
        Ok(())
    }
}

/// Accept only absolute http(s) URLs with a host.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .ok_or_else(|| ApiError::InvalidUrl(raw.to_string()))
}
