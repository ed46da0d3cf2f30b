//! REST API for the ContactX contact registry.

pub mod rest;

pub use rest::RestApi;
