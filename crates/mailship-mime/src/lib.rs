//! # mailship-mime
//!
//! MIME payload construction for outgoing mail.
//!
//! ## Features
//!
//! - **Header rendering**: From/Reply-To/To/Cc/Bcc with CRLF termination
//! - **Subject encoding**: RFC 2047 encoded-words, folded one chunk per line
//! - **Body encoding**: base64 hard-wrapped at 76 characters
//! - **Attachments**: `multipart/mixed` assembly with random hex boundaries
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailship_mime::{BodyFormat, Mail};
//!
//! let mut mail = Mail::new("sender@example.com", "Report", "See attached.")
//!     .to("recipient@example.com")
//!     .format(BodyFormat::Plain);
//! mail.attach_file("report.pdf", "report.pdf")?;
//!
//! let payload = mail.render()?;
//! // `payload` is ready to stream as SMTP DATA content
//! ```
//!
//! Rendering is pure data transformation: no network access, and the
//! message is not consumed. Each render with attachments draws a fresh
//! boundary token; inject [`FixedBoundary`] for deterministic output in
//! tests.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod boundary;
mod error;
mod mail;

pub mod encoding;

pub use boundary::{BoundarySource, FixedBoundary, RandomBoundary};
pub use error::{Error, Result};
pub use mail::{BodyFormat, Mail};
