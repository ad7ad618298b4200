pub mod api;
pub mod http;
pub mod model;
pub mod navigation;
pub mod purchase;
pub mod rating;
pub mod session;
