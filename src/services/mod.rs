pub mod api;
pub mod booking_form;
pub mod catalog;
pub mod credentials;
pub mod format;
pub mod navigation;
