pub use crate::{
	model::Post,
	route::model::{IdInput, SearchInput},
};
