use std::sync::Arc;

pub use axum_test::TestServer;
use chrono::{DateTime, FixedOffset};
pub use serde_json::json;
use tempfile::TempDir;

use crate::{
	clock::{
		fixed::{FixedClock, SequentialNames},
		Clock,
	},
	config::UPLOADS,
	store::Store,
	State,
};

/// The instant every test clock is stuck at: 2023-11-14 22:13:20 UTC.
pub const FIXED_TIMESTAMP: i64 = 1_700_000_000;

/// A running application backed by its own temporary directory.
pub struct TestApp {
	pub server: TestServer,
	pub store: Store,
	_dir: TempDir,
}

pub fn app() -> TestApp {
	let dir = TempDir::new().unwrap();
	let public_dir = dir.path().join("public");

	let clock: Arc<dyn Clock> = Arc::new(FixedClock(
		DateTime::from_timestamp(FIXED_TIMESTAMP, 0).unwrap(),
	));
	let store = Store::new(
		public_dir.join("logs.json"),
		public_dir.join(UPLOADS),
		format!("/{UPLOADS}"),
	)
	.with_clock(clock.clone())
	.with_names(Arc::new(SequentialNames::default()));

	let state = State {
		store: store.clone(),
		clock,
		timezone: FixedOffset::east_opt(9 * 3600).unwrap(),
	};

	TestApp {
		server: TestServer::new(crate::app(state, &public_dir)).unwrap(),
		store,
		_dir: dir,
	}
}
