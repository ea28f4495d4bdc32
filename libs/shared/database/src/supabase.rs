use anyhow::Result;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Non-success response from PostgREST. Callers downcast to inspect the status,
/// e.g. to tell a unique-index violation (409) apart from other failures.
#[derive(Debug, Error)]
#[error("API error ({status}): {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT
    }
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            service_role_key: config.supabase_service_role_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_role_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            if status == StatusCode::CONFLICT {
                debug!("API conflict ({}): {}", status, error_text);
            } else {
                error!("API error ({}): {}", status, error_text);
            }

            return Err(ApiError {
                status,
                message: error_text,
            }
            .into());
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Calls a Postgres function exposed through PostgREST.
    pub async fn rpc<T>(&self, function: &str, args: Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/rpc/{}", function);
        self.request(Method::POST, &path, Some(args)).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            supabase_url: server.uri(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: "test-service-key".to_string(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_rpc_sends_keys_and_parses_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/ping"))
            .and(header("apikey", "test-anon-key"))
            .and(header("Authorization", "Bearer test-service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config_for(&server));
        let value: Value = client.rpc("ping", json!({})).await.unwrap();

        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_conflict_status_is_downcastable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/book"))
            .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key value"))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&config_for(&server));
        let err = client.rpc::<Value>("book", json!({})).await.unwrap_err();

        let api_error = err.downcast_ref::<ApiError>().unwrap();
        assert!(api_error.is_conflict());
        assert_eq!(api_error.message, "duplicate key value");
    }
}
