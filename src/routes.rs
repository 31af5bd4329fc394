use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, Request, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    controllers::{achievements, auth, chapters, home, me, notifications, progress, support},
    middlewares::jwt_auth_middleware,
    remote::{AccountStore, RemoteStore},
    state::SharedAppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn init_router<B>(state: SharedAppState<B>) -> Router
where
    B: RemoteStore + AccountStore,
{
    let app = Router::new()
        .route("/", get(home::index))
        .route("/auth", post(auth::store::<B>));

    let protected = Router::new()
        .route("/me", get(me::index::<B>).patch(me::update::<B>))
        .route("/progress", get(progress::index::<B>))
        .route("/chapters", get(chapters::index::<B>))
        .route("/chapters/{id}", get(chapters::show::<B>))
        .route("/chapters/{id}/progress", put(chapters::update_progress::<B>))
        .route("/chapters/{id}/complete", post(chapters::complete::<B>))
        .route(
            "/chapters/{id}/exercises/{exercise_id}",
            put(chapters::save_exercise::<B>),
        )
        .route("/notifications", get(notifications::index::<B>))
        .route("/notifications/read", post(notifications::read::<B>))
        .route("/achievements", get(achievements::index::<B>))
        .route(
            "/support/tickets",
            get(support::index::<B>).post(support::store::<B>),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware::<B>,
        ));

    let x_request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let request_id_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or_default();
                let user_agent = request
                    .headers()
                    .get(header::USER_AGENT)
                    .and_then(|val| val.to_str().ok())
                    .unwrap_or_default();

                let matched_path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::info_span!(
                    "http_request",
                    request_id,
                    method = ?request.method(),
                    uri = ?request.uri(),
                    path = matched_path,
                    version = ?request.version(),
                    user_agent,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id_header));

    app.merge(protected)
        .layer(CompressionLayer::new())
        .layer(request_id_middleware)
        .with_state(state)
}
