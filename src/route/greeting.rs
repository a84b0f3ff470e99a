use std::sync::Arc;

use axum::{
	extract::State,
	http::{header, HeaderMap},
	routing::get,
	Router,
};
use chrono::FixedOffset;
use rand::seq::SliceRandom;

use crate::{clock::Clock, AppState};

pub const FORTUNES: [&str; 4] = ["Excellent luck", "Good luck", "Fair luck", "Bad luck"];

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/hello", get(hello))
		.route("/info", get(info))
		.route("/webfortune", get(fortune))
}

pub async fn hello() -> &'static str {
	"Hello from the bulletin server!"
}

/// Echoes the current time and the caller's user agent.
pub async fn info(
	State(clock): State<Arc<dyn Clock>>,
	State(timezone): State<FixedOffset>,
	headers: HeaderMap,
) -> String {
	let now = clock.now().with_timezone(&timezone);
	let agent = headers
		.get(header::USER_AGENT)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default();

	format!(
		"The current time is {} and your browser is \"{agent}\".",
		now.format("%Y/%m/%d %H:%M:%S")
	)
}

/// Draws a fortune at random.
pub async fn fortune() -> String {
	let fortune = FORTUNES
		.choose(&mut rand::thread_rng())
		.copied()
		.unwrap_or(FORTUNES[0]);

	format!("Your fortune today is {fortune}.")
}
