#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod page;
mod route;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

use store::Store;

pub type AppState = State;

/// The shared application state.
///
/// The store is built once at startup and handed to every handler,
/// so no handler needs to know which backend is in use.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
}

/// Builds the full router, with the `OpenAPI` document served under `/docs`.
///
/// Every request is given `request_timeout` to complete before it is
/// answered with `408 Request Timeout`.
pub fn app(state: State, request_timeout: Duration) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/api/v1/posts", route::post::routes())
		.nest("/api/v1/users", route::user::routes())
		.nest("/maintenance", route::maintenance::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.route("/", get(route::maintenance::root))
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(TimeoutLayer::new(request_timeout)),
		)
		.with_state(state)
}

async fn shutdown_signal() {
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(%error, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
	let config = config::Config::from_env().expect("invalid configuration");
	let _guard = trace::init_tracing_subscriber(&config).expect("failed to initialize tracing");

	let state = State {
		store: store::connect(&config.storage)
			.await
			.expect("failed to connect to storage"),
	};

	tracing::info!(storage = config.storage.mode(), "storage ready");

	let app = app(state, config.request_timeout);

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");
}
