pub mod error_toast;
pub mod event_detail;
pub mod event_list;
pub mod footer;
pub mod header;
pub mod help_overlay;
