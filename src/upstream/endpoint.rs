//! Configured upstream endpoints

use super::shape::ResponseShape;
use super::types::UpstreamError;
use crate::config::ProviderConfig;
use std::fmt;

/// Where a credential is attached to the request
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Sent as a request header
    Header { name: String, value: String },
    /// Sent as a query parameter
    Query { name: String, value: String },
    /// Required but the env var was unset or empty
    Missing { var: String },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret itself
        match self {
            Credential::Header { name, .. } => write!(f, "Header({name}: ***)"),
            Credential::Query { name, .. } => write!(f, "Query({name}=***)"),
            Credential::Missing { var } => write!(f, "Missing({var})"),
        }
    }
}

/// A fully-resolved upstream request description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Name used in logs, metrics and error messages
    pub name: String,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub credential: Option<Credential>,
    pub shape: ResponseShape,
}

impl Endpoint {
    /// Create an endpoint with no query, headers or credential
    pub fn new(name: impl Into<String>, url: impl Into<String>, shape: ResponseShape) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            credential: None,
            shape,
        }
    }

    /// Resolve a provider config, reading its credential from the process environment
    pub fn from_config(name: &str, config: &ProviderConfig) -> Self {
        Self::from_config_with(name, config, |var| std::env::var(var).ok())
    }

    /// Resolve a provider config with a custom env lookup
    pub fn from_config_with(
        name: &str,
        config: &ProviderConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let credential = config.api_key_env.as_ref().map(|var| {
            match lookup(var).filter(|v| !v.trim().is_empty()) {
                None => Credential::Missing { var: var.clone() },
                Some(value) => match (&config.api_key_header, &config.api_key_query) {
                    (Some(header), _) => Credential::Header {
                        name: header.clone(),
                        value,
                    },
                    (None, Some(param)) => Credential::Query {
                        name: param.clone(),
                        value,
                    },
                    (None, None) => Credential::Query {
                        name: "api_key".to_string(),
                        value,
                    },
                },
            }
        });

        Self {
            name: name.to_string(),
            url: config.url.clone(),
            query: config.query.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            headers: config.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            credential,
            shape: config.shape.clone(),
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a header credential
    pub fn with_header_credential(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.credential = Some(Credential::Header {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Fail early when the credential could not be resolved
    pub fn check_credential(&self) -> Result<(), UpstreamError> {
        match &self.credential {
            Some(Credential::Missing { var }) => Err(UpstreamError::MissingCredential {
                endpoint: self.name.clone(),
                var: var.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Query parameters including a query-string credential
    pub fn query_params(&self) -> Vec<(&str, &str)> {
        let mut params: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(Credential::Query { name, value }) = &self.credential {
            params.push((name.as_str(), value.as_str()));
        }
        params
    }

    /// Headers including a header credential
    pub fn header_pairs(&self) -> Vec<(&str, &str)> {
        let mut headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(Credential::Header { name, value }) = &self.credential {
            headers.push((name.as_str(), value.as_str()));
        }
        headers
    }
}
