use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A source of the current time.
///
/// Handlers and the store never call [`Utc::now`] directly so that tests
/// can pin the time with a fixed implementation.
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// Produces file name stems for uploaded attachments.
pub trait NameGenerator: Send + Sync {
	/// Returns a unique file name ending in `extension` (which includes the dot).
	fn generate(&self, extension: &str) -> String;
}

/// Random v4 uuids, so concurrent uploads never collide.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNames;

impl NameGenerator for UuidNames {
	fn generate(&self, extension: &str) -> String {
		format!("{}{extension}", Uuid::new_v4().simple())
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_uuid_names_keep_extension() {
		let name = UuidNames.generate(".png");

		assert!(name.ends_with(".png"));
		assert_eq!(name.len(), 32 + 4);
	}

	#[test]
	fn test_uuid_names_are_unique() {
		assert_ne!(UuidNames.generate(".gif"), UuidNames.generate(".gif"));
	}
}
