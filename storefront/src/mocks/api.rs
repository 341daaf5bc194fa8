//! Scriptable REST API mocks.

use crate::error::ApiError;
use crate::mocks::fixtures;
use crate::providers::{AuthApi, CartApi, ProductApi, ProfileApi};
use crate::types::{
    CartRequest, LoginRequest, LoginResponse, Product, ProductId, Profile, RegisterRequest,
    RegisterResponse, UserId,
};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type Responder<Req, Res> = Arc<dyn Fn(&Req) -> Result<Res, ApiError> + Send + Sync>;

struct EndpointState<Req, Res> {
    responder: Responder<Req, Res>,
    queued: VecDeque<(Duration, Result<Res, ApiError>)>,
    requests: Vec<Req>,
}

/// One mocked endpoint.
///
/// Calls first consume queued replies (each after its delay), then fall back
/// to the responder. Every request is recorded. Clones share the script.
pub struct Endpoint<Req, Res> {
    state: Arc<Mutex<EndpointState<Req, Res>>>,
}

impl<Req, Res> Endpoint<Req, Res>
where
    Req: Clone + Send + 'static,
    Res: Clone + Send + 'static,
{
    /// Endpoint answering every call through `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Req) -> Result<Res, ApiError> + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(EndpointState {
                responder: Arc::new(responder),
                queued: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EndpointState<Req, Res>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer every later call with `result`.
    pub fn respond_with(&self, result: Result<Res, ApiError>)
    where
        Res: Sync,
    {
        self.lock().responder = Arc::new(move |_| result.clone());
    }

    /// Answer the next unscripted call with `result` after `delay`.
    pub fn enqueue(&self, delay: Duration, result: Result<Res, ApiError>) {
        self.lock().queued.push_back((delay, result));
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Req> {
        self.lock().requests.clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    /// Serve one call.
    ///
    /// # Errors
    ///
    /// Returns the scripted [`ApiError`], if any.
    pub async fn call(&self, request: Req) -> Result<Res, ApiError> {
        let (delay, result) = {
            let mut state = self.lock();
            let reply = match state.queued.pop_front() {
                Some(queued) => queued,
                None => (Duration::ZERO, (state.responder)(&request)),
            };
            state.requests.push(request);
            reply
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

impl<Req, Res> Clone for Endpoint<Req, Res> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<Req, Res> fmt::Debug for Endpoint<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

/// The rejection of a login with bad credentials.
#[must_use]
pub fn invalid_credentials() -> ApiError {
    ApiError::Status {
        status: 401,
        message: "Invalid credentials".to_string(),
    }
}

/// Mock authentication API.
///
/// By default every login succeeds with token `"mock-token"` and every
/// registration succeeds.
#[derive(Debug, Clone)]
pub struct MockAuthApi {
    /// `POST /auth/login`
    pub login: Endpoint<LoginRequest, LoginResponse>,
    /// `POST /users`
    pub register: Endpoint<RegisterRequest, RegisterResponse>,
}

impl MockAuthApi {
    /// Mock accepting any credentials.
    #[must_use]
    pub fn new() -> Self {
        Self {
            login: Endpoint::new(|_: &LoginRequest| {
                Ok(LoginResponse {
                    token: "mock-token".to_string(),
                })
            }),
            register: Endpoint::new(|_: &RegisterRequest| Ok(RegisterResponse { id: Some(11) })),
        }
    }

    /// Mock issuing `token` on every login.
    #[must_use]
    pub fn accepting(token: &str) -> Self {
        let mock = Self::new();
        mock.login.respond_with(Ok(LoginResponse {
            token: token.to_string(),
        }));
        mock
    }

    /// Mock rejecting every login with `"Invalid credentials"`.
    #[must_use]
    pub fn rejecting() -> Self {
        let mock = Self::new();
        mock.login.respond_with(Err(invalid_credentials()));
        mock
    }
}

impl Default for MockAuthApi {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthApi for MockAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.login.call(request.clone()).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.register.call(request.clone()).await
    }
}

/// Mock product API serving [`fixtures::products`].
#[derive(Debug, Clone)]
pub struct MockProductApi {
    /// `GET /products`
    pub products: Endpoint<(), Vec<Product>>,
    /// `GET /products/{id}`
    pub product: Endpoint<ProductId, Product>,
}

impl MockProductApi {
    /// Mock serving the fixture catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalogue(fixtures::products())
    }

    /// Mock serving `catalogue`; unknown ids answer 404.
    #[must_use]
    pub fn with_catalogue(catalogue: Vec<Product>) -> Self {
        let by_id = catalogue.clone();
        Self {
            products: Endpoint::new(move |_: &()| Ok(catalogue.clone())),
            product: Endpoint::new(move |id: &ProductId| {
                by_id
                    .iter()
                    .find(|product| product.id == *id)
                    .cloned()
                    .ok_or_else(|| ApiError::status(404, Some("Not Found"), ""))
            }),
        }
    }
}

impl Default for MockProductApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductApi for MockProductApi {
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        self.products.call(()).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.product.call(id).await
    }
}

/// Mock cart API. Lists [`fixtures::carts`]; created entries are echoed back.
#[derive(Debug, Clone)]
pub struct MockCartApi {
    /// `GET /carts`
    pub carts: Endpoint<(), Vec<CartRequest>>,
    /// `POST /carts`
    pub add: Endpoint<CartRequest, CartRequest>,
}

impl MockCartApi {
    /// Mock with the fixture carts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            carts: Endpoint::new(|_: &()| Ok(fixtures::carts())),
            add: Endpoint::new(|request: &CartRequest| Ok(request.clone())),
        }
    }
}

impl Default for MockCartApi {
    fn default() -> Self {
        Self::new()
    }
}

impl CartApi for MockCartApi {
    async fn get_carts(&self) -> Result<Vec<CartRequest>, ApiError> {
        self.carts.call(()).await
    }

    async fn add_cart(&self, request: &CartRequest) -> Result<CartRequest, ApiError> {
        self.add.call(request.clone()).await
    }
}

/// Mock profile API serving [`fixtures::profile`] for any id.
#[derive(Debug, Clone)]
pub struct MockProfileApi {
    /// `GET /users/{id}`
    pub profile: Endpoint<UserId, Profile>,
}

impl MockProfileApi {
    /// Mock answering with the fixture profile, re-numbered to the asked id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: Endpoint::new(|id: &UserId| {
                Ok(Profile {
                    id: *id,
                    ..fixtures::profile()
                })
            }),
        }
    }
}

impl Default for MockProfileApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileApi for MockProfileApi {
    async fn get_profile(&self, id: UserId) -> Result<Profile, ApiError> {
        self.profile.call(id).await
    }
}
