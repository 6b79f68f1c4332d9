use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{Request, Response};
use crate::common::{debug, error, info, HttpError};
use crate::core::hook::UnauthorizedHook;
use crate::core::middleware::Middleware;
use crate::core::refresh::{Outcome, RefreshGate, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    // `Client::refresh`, e.g. when a session is restored.
    Explicit,
    // A request answered 401.
    Request,
}

/// Recovers from expired credentials.
///
/// A 401 on a request that has not been retried yet starts (or joins) a
/// single-flight refresh. On success the request is replayed once; on failure
/// it fails with the refresh error and the unauthorized hook runs once per
/// failed episode.
pub(crate) struct Authenticator<MW> {
    refresh_path: String,
    gate: RefreshGate,
    hook: Arc<UnauthorizedHook>,
    next: MW,
}

impl<MW> Authenticator<MW>
where
    MW: Middleware,
{
    pub(crate) fn new(refresh_path: impl Into<String>, hook: Arc<UnauthorizedHook>, next: MW) -> Self {
        Self {
            refresh_path: refresh_path.into(),
            gate: RefreshGate::new(),
            hook,
            next,
        }
    }

    /// Run a refresh, or wait for the one in flight.
    ///
    /// An explicit refresh that fails ends the session only when other
    /// callers were waiting on it. A failure in the request path always does.
    pub(crate) async fn refresh(&self) -> Outcome {
        self.run_refresh(Trigger::Explicit).await
    }

    async fn run_refresh(&self, trigger: Trigger) -> Outcome {
        match self.gate.enter() {
            Ticket::Waiter(waiter) => waiter.wait().await,
            Ticket::Owner(guard) => {
                info!(path = %self.refresh_path, "Refreshing credentials");
                let request = Request::post(self.refresh_path.as_str()).without_refresh();
                let outcome = self.next.apply(request).await.map(|_| ());
                let released = guard.settle(&outcome);
                debug!(released, ok = outcome.is_ok(), "Refresh settled");

                if let Err(err) = &outcome {
                    if trigger == Trigger::Request || released > 0 {
                        error!(cause = %err, "Refresh token invalid. Logging out");
                        self.hook.fire();
                    }
                }
                outcome
            }
        }
    }

    async fn recover(&self, mut request: Request) -> Result<Response, HttpError> {
        self.run_refresh(Trigger::Request).await?;
        request.mark_retried();
        debug!(request = %request, "Replay after refresh");
        self.next.apply(request).await
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &RefreshGate {
        &self.gate
    }
}

#[async_trait]
impl<MW> Middleware for Authenticator<MW>
where
    MW: Middleware + 'static,
{
    async fn apply(&self, request: Request) -> Result<Response, HttpError> {
        // Keep a copy only when a replay is possible.
        let replay = (request.is_refreshable() && !request.is_retried()).then(|| request.clone());

        match self.next.apply(request).await {
            Err(err) if err.is_unauthorized() => match replay {
                Some(request) => self.recover(request).await,
                None => Err(err),
            },
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::client::mock::Backend;
    use crate::core::hook::Registration;

    type Fixture = (
        Arc<Authenticator<Arc<Backend>>>,
        Arc<AtomicUsize>,
        Registration,
    );

    fn authenticator(backend: &Arc<Backend>) -> Fixture {
        let hook = UnauthorizedHook::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let registration = hook.register(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (
            Arc::new(Authenticator::new("/auth/refresh", hook, backend.clone())),
            fired,
            registration,
        )
    }

    #[test]
    fn concurrent_401s_share_one_refresh() {
        const N: usize = 5;
        let backend = Backend::new();
        backend.route("GET /products/page", 200, json!({"content": []}));
        let hold = backend.hold_refresh();
        let (auth, fired, _registration) = authenticator(&backend);

        tokio_test::block_on(async move {
            let handles: Vec<_> = (0..N)
                .map(|_| {
                    let auth = auth.clone();
                    tokio::spawn(async move { auth.apply(Request::get("/products/page")).await })
                })
                .collect();

            while backend.unauthorized_hits() < N {
                tokio::task::yield_now().await;
            }
            assert_eq!(auth.gate().pending(), N - 1);
            hold.notify_one();

            for handle in handles {
                let response = handle.await.unwrap().unwrap();
                assert_eq!(response.status(), 200);
            }
            assert_eq!(backend.refresh_calls(), 1);
            assert_eq!(auth.gate().pending(), 0);
            assert!(!auth.gate().is_in_flight());
            assert_eq!(backend.count("GET /products/page"), 2 * N);
            assert_eq!(fired.load(Ordering::SeqCst), 0);
        });
    }

    #[test]
    fn failed_refresh_fails_every_request_and_fires_once() {
        const N: usize = 4;
        let backend = Backend::new();
        backend.set_refresh_ok(false);
        let hold = backend.hold_refresh();
        let (auth, fired, _registration) = authenticator(&backend);

        tokio_test::block_on(async move {
            let handles: Vec<_> = (0..N)
                .map(|_| {
                    let auth = auth.clone();
                    tokio::spawn(async move { auth.apply(Request::get("/orders/page")).await })
                })
                .collect();

            while backend.unauthorized_hits() < N {
                tokio::task::yield_now().await;
            }
            hold.notify_one();

            for handle in handles {
                let err = handle.await.unwrap().unwrap_err();
                assert!(err.is_unauthorized());
                assert_eq!(err.message(), "Refresh token expired");
            }
            assert_eq!(backend.refresh_calls(), 1);
            assert_eq!(fired.load(Ordering::SeqCst), 1);
            assert_eq!(auth.gate().pending(), 0);
            // Nothing was replayed.
            assert_eq!(backend.count("GET /orders/page"), N);
        });
    }

    #[test]
    fn failed_explicit_refresh_with_waiters_fires_once() {
        let backend = Backend::new();
        backend.set_refresh_ok(false);
        let hold = backend.hold_refresh();
        let (auth, fired, _registration) = authenticator(&backend);

        tokio_test::block_on(async move {
            let owner = {
                let auth = auth.clone();
                tokio::spawn(async move { auth.refresh().await })
            };
            while backend.refresh_calls() < 1 {
                tokio::task::yield_now().await;
            }
            let queued = {
                let auth = auth.clone();
                tokio::spawn(async move { auth.apply(Request::get("/orders/page")).await })
            };
            while auth.gate().pending() < 1 {
                tokio::task::yield_now().await;
            }
            hold.notify_one();

            assert!(owner.await.unwrap().is_err());
            let err = queued.await.unwrap().unwrap_err();
            assert!(err.is_unauthorized());
            assert_eq!(backend.refresh_calls(), 1);
            assert_eq!(fired.load(Ordering::SeqCst), 1);

            // Alone, an explicit refresh leaves the session to its caller.
            let hold = backend.hold_refresh();
            hold.notify_one();
            assert!(auth.refresh().await.is_err());
            assert_eq!(fired.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn second_401_is_final() {
        let backend = Backend::new();
        backend.route("GET /warehouses/count", 401, json!({"message": "Token revoked"}));
        let (auth, fired, _registration) = authenticator(&backend);

        tokio_test::block_on(async move {
            let err = auth
                .apply(Request::get("/warehouses/count"))
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
            assert_eq!(err.message(), "Token revoked");
            assert_eq!(backend.refresh_calls(), 1);
            assert_eq!(backend.count("GET /warehouses/count"), 2);
            assert_eq!(fired.load(Ordering::SeqCst), 0);
        });
    }

    #[test]
    fn other_statuses_pass_through() {
        let backend = Backend::new();
        backend.set_authorized(true);
        backend.route("DELETE /users/7", 403, json!({"message": "Access denied"}));
        backend.route("GET /orders/99", 404, json!({"message": "Order not found"}));
        backend.unreachable("GET /predictions/current");
        let (auth, _, _registration) = authenticator(&backend);

        tokio_test::block_on(async move {
            let err = auth.apply(Request::delete("/users/7")).await.unwrap_err();
            assert_eq!(err.status(), 403);
            let err = auth.apply(Request::get("/orders/99")).await.unwrap_err();
            assert_eq!(err.status(), 404);
            let err = auth
                .apply(Request::get("/predictions/current"))
                .await
                .unwrap_err();
            assert!(err.is_network());
            assert_eq!(backend.refresh_calls(), 0);
        });
    }

    #[test]
    fn non_refreshable_request_fails_on_401() {
        let backend = Backend::new();
        let (auth, _, _registration) = authenticator(&backend);

        tokio_test::block_on(async move {
            let err = auth
                .apply(Request::get("/users/me").without_refresh())
                .await
                .unwrap_err();
            assert!(err.is_unauthorized());
            assert_eq!(backend.refresh_calls(), 0);
        });
    }
}
