//! Client for the Zoho Sheet data API.
//!
//! [`TokenAuthority`] owns the OAuth side (device-code and refresh-token
//! grants), and [`SheetClient`] implements [`SheetOperations`] on top of it:
//! workbooks, worksheets, tables and record-level reads and writes.

pub mod config;
pub mod error;
pub mod models;
pub mod zoho;

pub use config::{Config, Credentials};
pub use error::{Result, SheetError};
pub use zoho::{SheetClient, SheetOperations, TokenAuthority, TokenSource};
