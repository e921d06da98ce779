//! In-process stand-in for the booking service.
//!
//! [`MockBooker`] mounts wiremock responders for every endpoint the suite
//! calls and keeps bookings and issued tokens in shared state, so a full
//! create → read → update → patch → delete lifecycle behaves like the real
//! service, quirks included:
//!
//! - bad credentials answer 200 with `{"reason": "Bad credentials"}`
//! - mutating calls without a valid `token` cookie answer 403
//! - mutating an unknown id answers 405
//! - delete and ping answer 201 `Created`
//! - reading a deleted id answers 404 `Not Found`

use booker_client::{BookingId, BookingPatch, BookingRequest, Credentials};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use wiremock::{
    matchers::{method, path, path_regex},
    Mock, MockServer, Request, ResponseTemplate,
};

#[cfg(test)]
#[path = "mock_booker_tests.rs"]
mod tests;

const BOOKING_ID_ROUTE: &str = r"^/booking/\d+$";

/// Credentials the mock accepts unless configured otherwise.
pub fn default_credentials() -> Credentials {
    Credentials::new("admin", "password123")
}

#[derive(Debug)]
struct BookerState {
    credentials: Credentials,
    next_id: u64,
    tokens: HashSet<String>,
    bookings: BTreeMap<u64, BookingRequest>,
}

type SharedState = Arc<Mutex<BookerState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, BookerState> {
    state.lock().expect("mock booker state poisoned")
}

/// Stateful booking service mock.
pub struct MockBooker {
    server: MockServer,
    state: SharedState,
}

impl MockBooker {
    /// Starts a mock that accepts [`default_credentials`].
    pub async fn start() -> Self {
        Self::start_with_credentials(default_credentials()).await
    }

    /// Starts a mock that accepts only `credentials`.
    pub async fn start_with_credentials(credentials: Credentials) -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(BookerState {
            credentials,
            next_id: 1,
            tokens: HashSet::new(),
            bookings: BTreeMap::new(),
        }));

        let booker = Self { server, state };
        booker.mount_routes().await;
        booker
    }

    /// Base URI of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Stores a booking directly, as if another client had created it.
    pub fn seed_booking(&self, booking: BookingRequest) -> BookingId {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.bookings.insert(id, booking);
        BookingId::new(id)
    }

    /// Current stored state of a booking.
    pub fn booking(&self, id: BookingId) -> Option<BookingRequest> {
        lock(&self.state).bookings.get(&id.value()).cloned()
    }

    pub fn booking_ids(&self) -> Vec<BookingId> {
        lock(&self.state)
            .bookings
            .keys()
            .copied()
            .map(BookingId::new)
            .collect()
    }

    /// Number of requests the server has received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// JSON bodies of the requests received for `http_method` and exact `request_path`.
    pub async fn received_json(
        &self,
        http_method: &str,
        request_path: &str,
    ) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .filter_map(|r| r.body_json::<serde_json::Value>().ok())
            .collect()
    }

    /// Replaces the stateful behaviour of one route with a fixed response.
    ///
    /// `route` is a regular expression matched against the request path.
    /// Overrides take precedence over the default routes.
    pub async fn override_response(
        &self,
        http_method: &str,
        route: &str,
        template: ResponseTemplate,
    ) {
        Mock::given(method(http_method))
            .and(path_regex(route))
            .respond_with(template)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    async fn mount_routes(&self) {
        let state = Arc::clone(&self.state);
        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(move |request: &Request| authenticate(&state, request))
            .mount(&self.server)
            .await;

        let state = Arc::clone(&self.state);
        Mock::given(method("POST"))
            .and(path("/booking"))
            .respond_with(move |request: &Request| create_booking(&state, request))
            .mount(&self.server)
            .await;

        let state = Arc::clone(&self.state);
        Mock::given(method("GET"))
            .and(path("/booking"))
            .respond_with(move |_: &Request| list_booking_ids(&state))
            .mount(&self.server)
            .await;

        let state = Arc::clone(&self.state);
        Mock::given(method("GET"))
            .and(path_regex(BOOKING_ID_ROUTE))
            .respond_with(move |request: &Request| get_booking(&state, request))
            .mount(&self.server)
            .await;

        let state = Arc::clone(&self.state);
        Mock::given(method("PUT"))
            .and(path_regex(BOOKING_ID_ROUTE))
            .respond_with(move |request: &Request| update_booking(&state, request))
            .mount(&self.server)
            .await;

        let state = Arc::clone(&self.state);
        Mock::given(method("PATCH"))
            .and(path_regex(BOOKING_ID_ROUTE))
            .respond_with(move |request: &Request| partial_update_booking(&state, request))
            .mount(&self.server)
            .await;

        let state = Arc::clone(&self.state);
        Mock::given(method("DELETE"))
            .and(path_regex(BOOKING_ID_ROUTE))
            .respond_with(move |request: &Request| delete_booking(&state, request))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
            .mount(&self.server)
            .await;
    }
}

fn text(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_string(body)
}

fn booking_id_from(request: &Request) -> Option<u64> {
    request
        .url
        .path()
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn token_from(request: &Request) -> Option<String> {
    let cookies = request.headers.get("cookie")?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "token")
        .map(|(_, value)| value.to_string())
}

fn is_authorized(state: &BookerState, request: &Request) -> bool {
    token_from(request).is_some_and(|token| state.tokens.contains(&token))
}

fn authenticate(state: &SharedState, request: &Request) -> ResponseTemplate {
    let Ok(credentials) = serde_json::from_slice::<Credentials>(&request.body) else {
        return ResponseTemplate::new(200).set_body_json(json!({ "reason": "Bad credentials" }));
    };

    let mut state = lock(state);
    if credentials != state.credentials {
        return ResponseTemplate::new(200).set_body_json(json!({ "reason": "Bad credentials" }));
    }

    let token = format!("mock{:011}", state.tokens.len() + 1);
    state.tokens.insert(token.clone());
    debug!("Issued mock auth token");

    ResponseTemplate::new(200).set_body_json(json!({ "token": token }))
}

fn create_booking(state: &SharedState, request: &Request) -> ResponseTemplate {
    let Ok(booking) = serde_json::from_slice::<BookingRequest>(&request.body) else {
        return text(500, "Internal Server Error");
    };

    let mut state = lock(state);
    let id = state.next_id;
    state.next_id += 1;
    state.bookings.insert(id, booking.clone());
    debug!(booking_id = id, "Created mock booking");

    ResponseTemplate::new(200).set_body_json(json!({ "bookingid": id, "booking": booking }))
}

fn list_booking_ids(state: &SharedState) -> ResponseTemplate {
    let state = lock(state);
    // The real service returns ids newest first
    let ids: Vec<_> = state
        .bookings
        .keys()
        .rev()
        .map(|id| json!({ "bookingid": id }))
        .collect();

    ResponseTemplate::new(200).set_body_json(ids)
}

fn get_booking(state: &SharedState, request: &Request) -> ResponseTemplate {
    let state = lock(state);
    match booking_id_from(request).and_then(|id| state.bookings.get(&id)) {
        Some(booking) => ResponseTemplate::new(200).set_body_json(booking),
        None => text(404, "Not Found"),
    }
}

fn update_booking(state: &SharedState, request: &Request) -> ResponseTemplate {
    let mut state = lock(state);
    if !is_authorized(&state, request) {
        return text(403, "Forbidden");
    }

    let Some(id) = booking_id_from(request).filter(|id| state.bookings.contains_key(id)) else {
        return text(405, "Method Not Allowed");
    };

    let Ok(booking) = serde_json::from_slice::<BookingRequest>(&request.body) else {
        return text(400, "Bad Request");
    };

    state.bookings.insert(id, booking.clone());
    ResponseTemplate::new(200).set_body_json(booking)
}

fn partial_update_booking(state: &SharedState, request: &Request) -> ResponseTemplate {
    let mut state = lock(state);
    if !is_authorized(&state, request) {
        return text(403, "Forbidden");
    }

    let Some(id) = booking_id_from(request).filter(|id| state.bookings.contains_key(id)) else {
        return text(405, "Method Not Allowed");
    };

    let Ok(patch) = serde_json::from_slice::<BookingPatch>(&request.body) else {
        return text(400, "Bad Request");
    };

    let Some(current) = state.bookings.get(&id) else {
        return text(405, "Method Not Allowed");
    };
    let patched = patch.apply_to(current);
    state.bookings.insert(id, patched.clone());

    ResponseTemplate::new(200).set_body_json(patched)
}

fn delete_booking(state: &SharedState, request: &Request) -> ResponseTemplate {
    let mut state = lock(state);
    if !is_authorized(&state, request) {
        return text(403, "Forbidden");
    }

    match booking_id_from(request).and_then(|id| state.bookings.remove(&id)) {
        Some(_) => text(201, "Created"),
        None => text(405, "Method Not Allowed"),
    }
}
