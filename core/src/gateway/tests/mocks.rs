//! Scripted transport for exercising the gateway and the service clients

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::errors::TransportError;
use crate::gateway::{HttpMethod, HttpRequest, HttpTransport, RawResponse};

enum Scripted {
    Respond(RawResponse),
    Fail(TransportError),
}

struct Route {
    method: HttpMethod,
    path: String,
    script: VecDeque<Scripted>,
}

/// Transport answering from per-route scripts and recording every request
///
/// Responses for a route are consumed in order; the last one repeats.
/// Unscripted routes answer 404.
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    required_token: Mutex<Option<String>>,
}

/// Routes reachable without a bearer token
const OPEN_PATHS: [&str; 8] = [
    "/login",
    "/login/verify-otp",
    "/register",
    "/register/start",
    "/register/verify",
    "/refresh",
    "/logout",
    "/captcha/new",
];

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            required_token: Mutex::new(None),
        }
    }

    /// Answer 401 to protected routes unless they carry `token`
    pub fn require_token(self, token: &str) -> Self {
        *self.required_token.lock().unwrap() = Some(token.to_string());
        self
    }

    /// Script a response for requests whose URL ends with `path`
    pub fn respond(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.push(method, path, Scripted::Respond(RawResponse::new(status, body)))
    }

    /// Script a response with a raw (possibly malformed) body
    pub fn respond_raw(self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.push(method, path, Scripted::Respond(RawResponse::new(status, body)))
    }

    /// Script a transport failure
    pub fn fail(self, method: HttpMethod, path: &str, error: TransportError) -> Self {
        self.push(method, path, Scripted::Fail(error))
    }

    fn push(self, method: HttpMethod, path: &str, scripted: Scripted) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|r| r.method == method && r.path == path) {
                Some(route) => route.script.push_back(scripted),
                None => routes.push(Route {
                    method,
                    path: path.to_string(),
                    script: VecDeque::from(vec![scripted]),
                }),
            }
        }
        self
    }

    /// Every request executed so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests executed against a route
    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url.ends_with(path))
            .collect()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        // Let concurrent callers interleave like real I/O would
        tokio::task::yield_now().await;

        let required = self.required_token.lock().unwrap().clone();
        if let Some(required) = required {
            let open = OPEN_PATHS.iter().any(|path| request.url.ends_with(path));
            if !open && bearer(&request).as_deref() != Some(required.as_str()) {
                return Ok(RawResponse::new(401, r#"{"message": "Token has expired"}"#));
            }
        }

        let mut routes = self.routes.lock().unwrap();
        // Longest matching path wins so `/login` does not shadow `/login/verify-otp`
        let route = routes
            .iter_mut()
            .filter(|r| r.method == request.method && request.url.ends_with(&r.path))
            .max_by_key(|r| r.path.len());

        let Some(route) = route else {
            return Ok(RawResponse::new(404, r#"{"message": "no route"}"#));
        };
        let scripted = if route.script.len() > 1 {
            route.script.pop_front()
        } else {
            route.script.front().map(|s| match s {
                Scripted::Respond(response) => Scripted::Respond(response.clone()),
                Scripted::Fail(error) => Scripted::Fail(error.clone()),
            })
        };
        match scripted {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(error)) => Err(error),
            None => Ok(RawResponse::new(404, "")),
        }
    }
}

/// Signed access token with the given subject and role, expiring in `minutes`
pub fn access_token(sub: &str, role: &str, minutes: i64) -> String {
    let exp = (Utc::now() + Duration::minutes(minutes)).timestamp();
    encode(
        &Header::default(),
        &json!({"sub": sub, "role": role, "type": "access", "exp": exp}),
        &EncodingKey::from_secret(b"service-secret"),
    )
    .unwrap()
}

/// Authorization header a request was sent with
pub fn bearer(request: &HttpRequest) -> Option<String> {
    request
        .header("Authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}
