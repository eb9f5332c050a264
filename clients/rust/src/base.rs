use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone)]
pub(crate) struct BaseClient {
    client: Client,
    address: String,
    owner_ref: Option<String>,
    admin_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum APIErrorVariant {
    Network,
    MalformedResponse,
    BadClientData,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ServiceUnavailable,
    InternalError,
    UnexpectedStatusCode,
}

#[derive(Debug)]
pub struct APIError {
    pub variant: APIErrorVariant,
    pub message: String,
}

pub type APIResponse<T> = Result<T, APIError>;

fn variant_for_status(status: StatusCode) -> APIErrorVariant {
    match status {
        StatusCode::BAD_REQUEST => APIErrorVariant::BadClientData,
        StatusCode::UNAUTHORIZED => APIErrorVariant::Unauthorized,
        StatusCode::FORBIDDEN => APIErrorVariant::Forbidden,
        StatusCode::NOT_FOUND => APIErrorVariant::NotFound,
        StatusCode::CONFLICT => APIErrorVariant::Conflict,
        StatusCode::SERVICE_UNAVAILABLE => APIErrorVariant::ServiceUnavailable,
        StatusCode::INTERNAL_SERVER_ERROR => APIErrorVariant::InternalError,
        _ => APIErrorVariant::UnexpectedStatusCode,
    }
}

impl BaseClient {
    pub fn new(address: String) -> Self {
        let address = format!("{}/api/v1", address.trim_end_matches('/'));
        Self {
            client: Client::new(),
            address,
            owner_ref: None,
            admin_key: None,
        }
    }

    pub fn set_owner_ref(&mut self, owner_ref: String) {
        self.owner_ref = Some(owner_ref);
    }

    pub fn set_admin_key(&mut self, admin_key: String) {
        self.admin_key = Some(admin_key);
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.address, path)
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(owner_ref) = &self.owner_ref {
            request = request.header("lull-owner", owner_ref);
        }
        if let Some(admin_key) = &self.admin_key {
            request = request.header("lull-admin-key", admin_key);
        }
        request
    }

    async fn handle_api_response<T: DeserializeOwned>(
        &self,
        res: Result<Response, reqwest::Error>,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = res.map_err(|e| APIError {
            variant: APIErrorVariant::Network,
            message: e.to_string(),
        })?;

        let status = res.status();
        if status != expected_status_code {
            return Err(APIError {
                variant: variant_for_status(status),
                message: res.text().await.unwrap_or_default(),
            });
        }

        res.json::<T>().await.map_err(|e| APIError {
            variant: APIErrorVariant::MalformedResponse,
            message: e.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .authorize(self.client.get(&self.url(&path)))
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn post<T: DeserializeOwned, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .authorize(self.client.post(&self.url(&path)))
            .json(&body)
            .send()
            .await;
        self.handle_api_response(res, expected_status_code).await
    }
}
