//! Providers sub-client: the directory of connectable institutions.

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::http::{Paginator, ZaboHttp};
use crate::resources::require_param;

/// A connectable provider (exchange, wallet, protocol).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub available_currencies: Vec<String>,
}

/// Sub-client for provider directory operations.
#[derive(Clone)]
pub struct Providers {
    http: ZaboHttp,
}

impl Providers {
    pub(crate) fn new(http: ZaboHttp) -> Self {
        Self { http }
    }

    pub async fn get(&self, name: &str) -> Result<Provider, SdkError> {
        require_param(name, "provider name")?;
        self.http.get(&format!("/providers/{name}")).await
    }

    pub async fn list(&self, limit: Option<u32>) -> Result<Paginator<Provider>, SdkError> {
        let path = match limit {
            Some(limit) => format!("/providers?limit={limit}"),
            None => "/providers".to_string(),
        };
        self.http.get_list(&path).await
    }
}
