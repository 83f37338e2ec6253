//! # mailship-smtp
//!
//! SMTP delivery for mailship messages.
//!
//! ## Features
//!
//! - **Three delivery modes**: unauthenticated relay, plain authenticated
//!   submission, and submission upgraded with STARTTLS
//! - **One session pipeline**: dial → optional TLS upgrade → optional
//!   AUTH PLAIN → envelope → DATA → QUIT, shared by all modes
//! - **TLS**: pure-Rust rustls, with an insecure mode for self-signed
//!   endpoints
//! - **Connectivity probe**: dial attempt racing a timeout window
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailship_mime::Mail;
//! use mailship_smtp::Mailer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailship_smtp::SendError> {
//!     let mailer = Mailer::new("smtp.example.com", 587)
//!         .credentials("user@example.com", "password")
//!         .starttls(true);
//!
//!     let mail = Mail::new("user@example.com", "Hello", "Hi there!")
//!         .to("recipient@example.com");
//!
//!     mailer.send(&mail).await
//! }
//! ```
//!
//! Each `send` is synchronous and single-shot: one connection, driven to
//! completion or first failure, closed before the call returns. Independent
//! messages may be sent concurrently from separate tasks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod command;
mod error;
mod mailer;
mod reply;
mod session;
mod stream;

pub use address::Address;
pub use command::Command;
pub use error::{Error, Result};
pub use mailer::{AuthMode, Mailer, SendError};
pub use reply::{Reply, ReplyCode};
pub use session::Session;
pub use stream::{SmtpStream, connect};
