//! Client side of Invitely: a typed API client, the state a front end
//! keeps between requests, share links, a toast queue and the PDF export
//! of an invitation preview.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod session;
pub mod share;
pub mod state;
pub mod toast;

#[cfg(test)]
mod test_server;
