use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};

use chrono::FixedOffset;
use tracing::{info, warn};

/// The URL prefix uploaded images are served under, relative to the public directory.
pub const UPLOADS: &str = "uploads";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid value for {key}: {message}")]
	Invalid { key: &'static str, message: String },
}

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	/// Served as static files; uploads land in its `uploads` directory.
	pub public_dir: PathBuf,
	/// The JSON file holding every post.
	pub data_file: PathBuf,
	/// Offset used when displaying times.
	pub timezone: FixedOffset,
}

impl Config {
	pub fn load() -> Result<Self, Error> {
		let public_dir: PathBuf = try_load("PUBLIC_DIR", "public")?;
		let data_file = match var("BBS_DATA_FILE") {
			Some(path) => PathBuf::from(path),
			None => public_dir.join("logs.json"),
		};

		Ok(Self {
			host: try_load("HOST", "127.0.0.1")?,
			port: try_load("PORT", "8080")?,
			data_file,
			timezone: try_load("TIMEZONE", "+09:00")?,
			public_dir,
		})
	}

	pub fn upload_dir(&self) -> PathBuf {
		self.public_dir.join(UPLOADS)
	}
}

fn var(key: &str) -> Option<String> {
	env::var(key).ok()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, Error>
where
	T::Err: Display,
{
	var(key)
		.unwrap_or_else(|| {
			info!("{key} not set, using default: {default}");
			default.to_owned()
		})
		.parse()
		.map_err(|error: T::Err| {
			warn!("invalid {key} value: {error}");

			Error::Invalid {
				key,
				message: error.to_string(),
			}
		})
}
