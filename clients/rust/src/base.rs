use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    client: Client,
    address: String,
    api_key: Option<String>,
}

#[derive(Debug)]
pub enum APIError {
    Network,
    MalformedResponse,
    Unauthorized,
    BadClientData,
    NotFound,
    UnexpectedStatusCode(StatusCode),
}
pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            client: Client::new(),
            address,
            api_key: None,
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let url = format!("{}/{}", self.address, path);
        let builder = self.client.request(method, &url);

        if let Some(api_key) = &self.api_key {
            builder.header("x-api-key", api_key.clone())
        } else {
            builder
        }
    }

    fn check_status_code(
        &self,
        res: &Response,
        expected_status_code: StatusCode,
    ) -> Result<(), APIError> {
        let status = res.status();
        if status == expected_status_code {
            return Ok(());
        }
        Err(match status {
            StatusCode::BAD_REQUEST => APIError::BadClientData,
            StatusCode::UNAUTHORIZED => APIError::Unauthorized,
            StatusCode::NOT_FOUND => APIError::NotFound,
            _ => APIError::UnexpectedStatusCode(status),
        })
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        &self,
        res: Response,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.check_status_code(&res, expected_status_code)?;
        res.json::<T>()
            .await
            .map_err(|_| APIError::MalformedResponse)
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = match builder.send().await {
            Ok(res) => res,
            Err(_) => return Err(APIError::Network),
        };
        self.handle_api_response(res, expected_status_code).await
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(self.get_client(Method::GET, path), expected_status_code)
            .await
    }

    pub async fn delete<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(self.get_client(Method::DELETE, path), expected_status_code)
            .await
    }

    pub async fn put<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(
            self.get_client(Method::PUT, path).json(&body),
            expected_status_code,
        )
        .await
    }

    pub async fn post<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(
            self.get_client(Method::POST, path).json(&body),
            expected_status_code,
        )
        .await
    }

    pub async fn post_query<T: for<'de> Deserialize<'de>, Q: Serialize>(
        &self,
        query: Q,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        self.send(
            self.get_client(Method::POST, path).query(&query),
            expected_status_code,
        )
        .await
    }
}
