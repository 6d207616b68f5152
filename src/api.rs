use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dates::DateRange;
use crate::models::{
    CategoriesResponse, CategorySet, DashboardSummary, Transaction, TransactionKind,
};
use crate::session;

const API_BASE_URL: &str = "http://localhost:8080/api";

/// Every failure out of this module lands in exactly one of these buckets:
/// the server answered with a non-2xx status, the request never got an
/// answer, or the request could not be constructed at all.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiError {
    Server { status: u16, message: String },
    Network,
    Request(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }

    /// Message shown on the login form, matching the credentials screen's
    /// wording for each failure class.
    pub fn login_message(&self) -> String {
        match self {
            ApiError::Server { status: 401, .. } => "Invalid username or password".to_string(),
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Network => "No response from server. Please try again later.".to_string(),
            _ => "Login failed. Please try again.".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Server { message, .. } if !message.is_empty() => write!(f, "{}", message),
            ApiError::Server { status, .. } => write!(f, "Request failed with status {}", status),
            ApiError::Network => write!(f, "No response from server. Please try again later."),
            ApiError::Request(message) => write!(f, "Request could not be sent: {}", message),
        }
    }
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

fn url(path: &str) -> String {
    format!("{}{}", API_BASE_URL, path)
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match session::stored_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

fn setup_error(err: gloo_net::Error) -> ApiError {
    ApiError::Request(err.to_string())
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn error_message(response: &Response) -> String {
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or(body),
        _ => format!("Request failed with status {}", response.status()),
    }
}

async fn send(request: Request) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(|_| ApiError::Network)?;
    if response.status() == 401 {
        // Drop the persisted token before the error propagates so the next
        // route-guard check re-evaluates as unauthenticated.
        session::clear_token();
    }
    if !response.ok() {
        let status = response.status();
        let message = error_message(&response).await;
        gloo_console::warn!(format!("api: {} -> {} {}", response.url(), status, message));
        return Err(ApiError::Server { status, message });
    }
    Ok(response)
}

async fn dispatch(builder: RequestBuilder) -> Result<Response, ApiError> {
    let request = builder.build().map_err(setup_error)?;
    send(request).await
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Request(e.to_string()))
}

pub async fn login(username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let request = Request::post(&url("/auth/login"))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn register(payload: &RegisterRequest) -> Result<UserProfile, ApiError> {
    let request = Request::post(&url("/auth/register"))
        .json(payload)
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn current_user() -> Result<UserProfile, ApiError> {
    parse(dispatch(authorized(Request::get(&url("/auth/me")))).await?).await
}

pub async fn fetch_profile() -> Result<UserProfile, ApiError> {
    parse(dispatch(authorized(Request::get(&url("/user/profile")))).await?).await
}

pub async fn update_profile(profile: &UserProfile) -> Result<UserProfile, ApiError> {
    let request = authorized(Request::put(&url("/user/profile")))
        .json(profile)
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn change_password(current: &str, new: &str) -> Result<(), ApiError> {
    let request = authorized(Request::post(&url("/user/change-password")))
        .json(&serde_json::json!({ "currentPassword": current, "newPassword": new }))
        .map_err(setup_error)?;
    send(request).await?;
    Ok(())
}

pub async fn transactions_by_range(
    kind: TransactionKind,
    range: &DateRange,
) -> Result<Vec<Transaction>, ApiError> {
    let request = authorized(Request::post(&url(&format!("/{}/date-range", kind.path()))))
        .json(range)
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn create_transaction(
    kind: TransactionKind,
    transaction: &Transaction,
) -> Result<Transaction, ApiError> {
    let request = authorized(Request::post(&url(&format!("/{}", kind.path()))))
        .json(transaction)
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn update_transaction(
    kind: TransactionKind,
    id: i64,
    transaction: &Transaction,
) -> Result<Transaction, ApiError> {
    let request = authorized(Request::put(&url(&format!("/{}/{}", kind.path(), id))))
        .json(transaction)
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn delete_transaction(kind: TransactionKind, id: i64) -> Result<(), ApiError> {
    dispatch(authorized(Request::delete(&url(&format!(
        "/{}/{}",
        kind.path(),
        id
    )))))
    .await?;
    Ok(())
}

pub async fn dashboard_by_range(range: &DateRange) -> Result<DashboardSummary, ApiError> {
    let request = authorized(Request::post(&url("/dashboard/date-range")))
        .json(range)
        .map_err(setup_error)?;
    parse(send(request).await?).await
}

pub async fn categories() -> Result<CategorySet, ApiError> {
    let response: CategoriesResponse =
        parse(dispatch(authorized(Request::get(&url("/utils/categories")))).await?).await?;
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_classification() {
        let err = ApiError::Server {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.login_message(), "Invalid username or password");
    }

    #[test]
    fn network_failure_login_message() {
        assert_eq!(
            ApiError::Network.login_message(),
            "No response from server. Please try again later."
        );
    }

    #[test]
    fn server_validation_message_passes_through_verbatim() {
        let err = ApiError::Server {
            status: 400,
            message: "Username is already taken".to_string(),
        };
        assert_eq!(err.login_message(), "Username is already taken");
        assert_eq!(err.to_string(), "Username is already taken");
    }

    #[test]
    fn setup_failure_gets_generic_login_message() {
        let err = ApiError::Request("bad body".to_string());
        assert_eq!(err.login_message(), "Login failed. Please try again.");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn not_found_classification() {
        let err = ApiError::Server {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Request failed with status 404");
    }
}
