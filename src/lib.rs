//! A sticker diary: one entry per calendar day with a mood, stickers, an
//! image and an optional generated editorial, kept in a single local file.

pub mod app;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod diary_entry;
pub mod diary_state;
pub mod draft;
pub mod editorial;
pub mod errors;
pub mod gemini;
pub mod logging;
pub mod stickers;
pub mod storage;
pub mod text_input;
pub mod ui;
