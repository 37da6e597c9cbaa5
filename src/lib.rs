//! Favorite toggle for the document archive.
//!
//! ARCHITECTURE
//! ============
//! Client side: a [`control::ToggleControl`] per document, a
//! [`dispatch::DelegatedListener`] that routes clicks to the
//! [`controller::FavoriteToggleController`], which flips the control
//! optimistically, calls the server through [`api::FavoriteApi`] and
//! reconciles or rolls back, reporting through [`notify::Notifier`].
//!
//! Server side: [`server::app`] exposes the toggle endpoint over a
//! [`server::store::FavoriteStore`].

pub mod api;
pub mod config;
pub mod control;
pub mod controller;
pub mod dispatch;
pub mod notify;
pub mod server;
