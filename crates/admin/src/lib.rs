//! Techstore back-office library.
//!
//! This crate provides the admin dashboard functionality as a library:
//! a client for the admin REST API (users and product CRUD) and the
//! search/pagination used by the dashboard tables.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod pagination;

pub use api::AdminClient;
pub use error::AdminError;
pub use pagination::{PAGE_SIZE, Page, Searchable, filter_and_paginate};
