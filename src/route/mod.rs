pub mod board;
pub mod docs;
pub mod greeting;
pub mod model;
pub mod post;
