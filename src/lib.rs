pub mod app;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod domain;
pub mod error;
pub mod evolution;
pub mod list;
pub mod output;
pub mod scroll;
pub mod search;
pub mod tui;
