// Logomark - watermarking image upload service

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod server;
pub mod storage;
pub mod watermark;
