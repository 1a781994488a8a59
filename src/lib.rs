pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod export;
pub mod generation;
pub mod session_management;
pub mod sticker;
pub mod storage;
pub mod web_interface;
