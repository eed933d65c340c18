pub mod cache;
pub mod dispatch;
pub mod normalize;
pub mod schema;
pub mod search;
