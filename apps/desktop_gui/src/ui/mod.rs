//! UI layer for desktop GUI: app shell, pages, and the delete dialog.

pub mod app;

pub use app::CreatorverseApp;
