//! Invoice line-item translation through AI providers.
//!
//! The [`application::orchestrator`] binds form buttons to a
//! [`domain::traits::TranslationBackend`], which is either the in-process
//! [`application::service::LocalBackend`] or a hosted service reached through
//! [`infrastructure::network::rpc::RpcBackend`].

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;
