#![warn(clippy::pedantic)]

mod clock;
mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod route;
mod store;
#[cfg(test)]
mod test;

use std::{path::Path, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use chrono::FixedOffset;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	services::ServeDir,
	trace::TraceLayer,
};

use crate::{
	clock::{Clock, SystemClock},
	config::{Config, UPLOADS},
	store::Store,
};

pub type AppState = State;

/// The shared application state.
///
/// Handlers pull out only the part they need through [`axum::extract::FromRef`].
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub store: Store,
	pub clock: Arc<dyn Clock>,
	/// Offset used when showing times to visitors.
	pub timezone: FixedOffset,
}

/// Builds the full application: the board, the greeting exercises, the
/// documented JSON API, and static files from `public_dir` for everything else.
pub fn app(state: AppState, public_dir: &Path) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/api/posts", route::post::routes())
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.merge(route::board::routes())
		.merge(route::greeting::routes())
		.fallback_service(ServeDir::new(public_dir))
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let config = Config::load().expect("environment misconfigured");
	let clock: Arc<dyn Clock> = Arc::new(SystemClock);

	let state = State {
		store: Store::new(&config.data_file, config.upload_dir(), format!("/{UPLOADS}"))
			.with_clock(clock.clone()),
		clock,
		timezone: config.timezone,
	};

	tracing::info!(
		data_file = %state.store.data_file().display(),
		upload_dir = %state.store.upload_dir().display(),
		"serving bulletin board"
	);

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, app(state, &config.public_dir))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");

	tracing::info!("server shut down");
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");

		tracing::info!("received Ctrl+C, shutting down");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;

		tracing::info!("received terminate signal, shutting down");
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}
}
