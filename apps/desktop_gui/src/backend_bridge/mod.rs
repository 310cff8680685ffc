//! Backend worker: owns the tokio runtime and the creators store on a dedicated thread.

pub mod commands;
pub mod runtime;
