//! GraphQL API exposing distribution statements of the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::MatchedPath,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Extension, Json, Router,
};
use axum_client_ip::InsecureClientIp;
use derive_more::Debug;
use juniper::{
    http::GraphQLBatchResponse, DefaultScalarValue, EmptyMutation,
    EmptySubscription, ScalarValue,
};
use juniper_axum::extract::JuniperRequest;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing as log;
// Used in binary.
use refinery as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Postgres>;

/// [`juniper`] GraphQL response.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code of the response.
    pub status_code: http::StatusCode,

    /// Underlying GraphQL response.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl<S> IntoResponse for JuniperResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let Self {
            status_code,
            response,
        } = self;

        if response.is_ok() {
            Json(response).into_response()
        } else {
            (status_code, Json(response)).into_response()
        }
    }
}

/// GraphQL API handler.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(gql_request): JuniperRequest,
) -> JuniperResponse {
    JuniperResponse {
        status_code: context.error_status_code(),
        response: gql_request.execute(&*schema, &context).await,
    }
}

/// Builds the HTTP [`Router`] serving the GraphQL API on `/graphql` over the
/// provided [`Service`].
pub fn router(service: Service, cors: CorsLayer) -> Router {
    let schema = api::Schema::new(
        api::Query,
        EmptyMutation::new(),
        EmptySubscription::new(),
    );

    Router::new()
        .route(
            "/graphql",
            on(MethodFilter::GET.or(MethodFilter::POST), graphql),
        )
        .layer(Extension(Arc::new(schema)))
        .layer(Extension(service))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|r: &http::Request<_>| {
                    log::info_span!(
                        "HTTP request",
                        http.client_ip = InsecureClientIp::from(
                            r.headers(),
                            r.extensions(),
                        )
                        .map(|ip| ip.0.to_string())
                        .ok(),
                        http.method = r.method().as_str(),
                        http.route = r
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str),
                        http.user_agent = r
                            .headers()
                            .get(http::header::USER_AGENT)
                            .and_then(|h| h.to_str().ok()),
                        http.status_code = log::field::Empty,
                    )
                })
                .on_response(
                    |r: &http::Response<_>, dur: Duration, span: &log::Span| {
                        let status = r.status();
                        _ = span.record(
                            "http.status_code",
                            log::field::display(status.as_u16()),
                        );

                        let duration = format!("{}ms", dur.as_millis());
                        let failed =
                            status.is_client_error() || status.is_server_error();
                        if failed {
                            log::error!(duration = %duration);
                        } else {
                            log::info!(duration = %duration);
                        }
                    },
                ),
        )
}
