//! Scheme guard: extract → verify → attach Principal to extensions.
//!
//! - Each route group is bound to exactly one verifier when the router is built
//! - No cross-scheme fallback: a credential of another shape fails extraction
//! - Failures never reach the handler (and so never reach the product store)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::{debug, error, warn};

use crate::error::AppError;
use crate::services::auth::{AuthError, Scheme, Verifier, credential::ExtractionError, extract};
use crate::state::AppState;

#[derive(Clone)]
struct SchemeGuard {
    verifier: Arc<dyn Verifier>,
    realm: Arc<str>,
}

/// Put `router`'s routes behind the verifier for `scheme`.
///
/// `route_layer` is used so unknown paths still answer 404 rather than 401.
pub fn require(router: Router<AppState>, state: &AppState, scheme: Scheme) -> Router<AppState> {
    let guard = SchemeGuard {
        verifier: state.auth.verifier(scheme),
        realm: state.realm.clone(),
    };
    router.route_layer(middleware::from_fn_with_state(guard, guard_middleware))
}

fn log_failure(scheme: Scheme, err: &AuthError) {
    match err {
        // Operational problems, not bad credentials.
        AuthError::ProviderUnavailable(reason) | AuthError::Backend(reason) => {
            error!(scheme = %scheme, kind = err.kind(), reason = %reason, "authentication failed");
        }
        _ => warn!(scheme = %scheme, kind = err.kind(), "authentication failed"),
    }
}

async fn guard_middleware(
    State(guard): State<SchemeGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let scheme = guard.verifier.scheme();
    let fail = |err: AuthError| {
        log_failure(scheme, &err);
        AppError::auth(scheme, err).with_realm(guard.realm.clone())
    };

    let credential = extract(req.headers(), scheme).map_err(|e: ExtractionError| {
        debug!(scheme = %scheme, reason = %e, "credential extraction failed");
        fail(AuthError::MissingCredentials)
    })?;

    let principal = guard.verifier.verify(credential).await.map_err(fail)?;

    // handed to the Principal extractor
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
