//! Techstore storefront library.
//!
//! Client-side state of the store: the shared shopping cart with
//! write-through persistence, the login session, local accounts and the
//! product catalog. Every surface (CLI, tests) builds an [`state::AppState`]
//! and works through the handles it exposes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;

