//! Quip PDF Bot - Slack bot that exports Quip documents to PDF
//!
//! A `/quiptopdf` slash command lists recent documents, finds one by id or
//! title, and runs Quip's asynchronous PDF export, delivering the result
//! back into the channel as an upload or a download link.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
