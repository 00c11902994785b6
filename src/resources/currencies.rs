//! Currencies sub-client: the supported-currency directory.

use serde::{Deserialize, Serialize};

use crate::error::SdkError;
use crate::http::{Paginator, ZaboHttp};
use crate::resources::require_param;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Sub-client for currency directory operations.
#[derive(Clone)]
pub struct Currencies {
    http: ZaboHttp,
}

impl Currencies {
    pub(crate) fn new(http: ZaboHttp) -> Self {
        Self { http }
    }

    pub async fn get(&self, code: &str) -> Result<Currency, SdkError> {
        require_param(code, "currency code")?;
        self.http.get(&format!("/currencies/{code}")).await
    }

    pub async fn list(&self, limit: Option<u32>) -> Result<Paginator<Currency>, SdkError> {
        let path = match limit {
            Some(limit) => format!("/currencies?limit={limit}"),
            None => "/currencies".to_string(),
        };
        self.http.get_list(&path).await
    }
}
