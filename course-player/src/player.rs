pub mod action;
pub mod controls;
pub mod media_source;
pub mod simulated;
pub mod state;
pub mod store;
pub mod time_display;
pub mod visibility;
