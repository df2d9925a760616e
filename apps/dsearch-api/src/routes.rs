use std::panic::AssertUnwindSafe;

use axum::{
	Json, Router,
	body::Bytes,
	extract::{Request, State},
	http::{
		HeaderMap, HeaderValue, StatusCode,
		header::{
			ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
			ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION,
		},
	},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{self, MethodRouter},
};
use futures::FutureExt;
use serde::Serialize;

use dsearch_service::{Error as ServiceError, SearchRequest, SearchResponse};

use crate::state::AppState;

pub const SEARCH_PATH: &str = "/v1/search/unified";
/// Path the search was first published under; kept so existing callers keep working.
pub const LEGACY_SEARCH_PATH: &str = "/semantic-search-unified";

const CORS_ALLOW_ORIGIN: &str = "*";
const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const CORS_ALLOW_METHODS: &str = "POST, OPTIONS";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", routing::get(health))
		.route(SEARCH_PATH, search_route())
		.route(LEGACY_SEARCH_PATH, search_route())
		.layer(middleware::from_fn(cors))
		.with_state(state)
}

fn search_route() -> MethodRouter<AppState> {
	routing::post(search).options(preflight).fallback(method_not_allowed)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn preflight() -> StatusCode {
	StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
	ApiError::method_not_allowed()
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
	let authorization = read_authorization(&headers).ok_or_else(ApiError::unauthorized)?;
	let payload: SearchRequest = serde_json::from_slice(&body).map_err(|err| {
		tracing::debug!(error = %err, "Rejected malformed search body.");

		ApiError::malformed_body()
	})?;
	let response = AssertUnwindSafe(state.service.search(payload, Some(authorization)))
		.catch_unwind()
		.await
		.map_err(|_| {
			tracing::error!("Unified search panicked.");

			ApiError::internal()
		})??;

	Ok(Json(response))
}

async fn cors(request: Request, next: Next) -> Response {
	let mut response = next.run(request).await;
	let headers = response.headers_mut();

	headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(CORS_ALLOW_ORIGIN));
	headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(CORS_ALLOW_HEADERS));
	headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(CORS_ALLOW_METHODS));

	response
}

/// Returns the raw header value, to be forwarded unchanged, when it carries a bearer token.
fn read_authorization(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let token = value.trim().strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(value) }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: &'static str,
	message: String,
	message_ar: &'static str,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: &'static str,
	message: String,
	message_ar: &'static str,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error: &'static str,
		message: impl Into<String>,
		message_ar: &'static str,
	) -> Self {
		Self { status, error, message: message.into(), message_ar }
	}

	fn bad_request(message: impl Into<String>, message_ar: &'static str) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "bad_request", message, message_ar)
	}

	fn malformed_body() -> Self {
		Self::bad_request(
			"Request body must be a valid JSON search request.",
			"يجب أن يكون نص الطلب طلب بحث بتنسيق JSON صالح",
		)
	}

	fn unauthorized() -> Self {
		Self::new(
			StatusCode::UNAUTHORIZED,
			"unauthorized",
			"Authorization header required.",
			"مطلوب رأس التفويض",
		)
	}

	fn method_not_allowed() -> Self {
		Self::new(
			StatusCode::METHOD_NOT_ALLOWED,
			"method_not_allowed",
			"Only POST method is allowed.",
			"يُسمح فقط بأسلوب POST",
		)
	}

	fn internal() -> Self {
		Self::new(
			StatusCode::INTERNAL_SERVER_ERROR,
			"internal_server_error",
			"An unexpected error occurred.",
			"حدث خطأ غير متوقع",
		)
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::EmptyQuery =>
				Self::bad_request(err.to_string(), "الاستعلام مطلوب ولا يمكن أن يكون فارغاً"),
			ServiceError::InvalidEntityTypes { .. } =>
				Self::bad_request(err.to_string(), "أنواع كيانات غير صالحة"),
			ServiceError::Provider { .. } | ServiceError::Storage { .. } => {
				tracing::error!(error = %err, "Unified search failed.");

				Self::internal()
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error: self.error, message: self.message, message_ar: self.message_ar };

		(self.status, Json(body)).into_response()
	}
}
