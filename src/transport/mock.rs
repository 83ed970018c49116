//! Scripted HTTP client shared by the test suites.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::body::LimitedBody;
use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock client answering from per-route queues.
///
/// Routes are keyed by `"METHOD path"`, e.g. `"GET /list.dat"`. The last
/// response queued for a route is repeated once the queue runs dry.
/// Unknown routes answer 404.
#[derive(Debug, Default)]
pub struct MockClient {
    routes: Mutex<HashMap<String, VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response with the given status and body for a route.
    pub fn on(self, route: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.on_response(route, Ok(response(status, body)))
    }

    /// Queues an arbitrary result for a route.
    pub fn on_response(self, route: &str, result: Result<HttpResponse, HttpError>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(route.to_string())
            .or_default()
            .push_back(result);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for one route.
    pub fn requests_to(&self, route: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| route_of(r) == route)
            .collect()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let route = route_of(&req);
        let limit = req.max_body;
        self.requests.lock().unwrap().push(req);

        let scripted = self.next_for(&route)?;
        limited(scripted, limit)
    }
}

impl MockClient {
    fn next_for(&self, route: &str) -> Result<HttpResponse, HttpError> {
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(route) else {
            return Ok(response(404, "not found"));
        };

        if queue.len() > 1 {
            return queue.pop_front().unwrap_or_else(|| Ok(response(404, "")));
        }

        match queue.front() {
            Some(Ok(resp)) => Ok(resp.clone()),
            Some(Err(HttpError::Timeout)) => Err(HttpError::Timeout),
            Some(Err(HttpError::InvalidUrl(u))) => Err(HttpError::InvalidUrl(u.clone())),
            Some(Err(HttpError::Connection(e))) => {
                Err(HttpError::Connection(e.to_string().into()))
            }
            Some(Err(HttpError::BodyTooLarge { size, limit })) => Err(HttpError::BodyTooLarge {
                size: *size,
                limit: *limit,
            }),
            None => Ok(response(404, "")),
        }
    }
}

/// Applies the request's body limit the way a real client reads the body.
fn limited(mut resp: HttpResponse, limit: Option<usize>) -> Result<HttpResponse, HttpError> {
    let announced = resp
        .headers
        .get(http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let mut body = LimitedBody::start(limit, announced)?;
    body.push(&resp.body)?;
    resp.body = body.finish();
    Ok(resp)
}

fn route_of(req: &HttpRequest) -> String {
    format!("{} {}", req.method, req.url.path())
}

/// Builds a response with no headers.
pub fn response(status: u16, body: impl Into<Vec<u8>>) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        body.into(),
    )
}
