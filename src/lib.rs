//! Shortledger - URL shortener backed by a single JSON ledger
//!
//! Every short URL lives in one JSON array stored under a single key of a
//! bucket-style store. Three handlers share that ledger: shorten, redirect
//! and top-N domain metrics.
//!
//! Cargo features: `server` and `cli` (both default), `s3` for the Amazon S3
//! store, `full` for everything.
//!
//! Layout: `storage` holds the store trait, its backends and the ledger model;
//! `services` the shorten/redirect/metrics logic shared by the HTTP `api` and
//! the command line in `interfaces`; `runtime` wires them up per mode;
//! `config` and `system` carry settings and logging.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
