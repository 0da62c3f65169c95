#![warn(missing_docs)]

//! # AutoQliq Driver
//!
//! The browser-driver seam of the engine: the capability contract the
//! execution pipeline consumes ([`WebDriver`]), the backend fault sum
//! ([`DriverError`]), driver session configuration ([`DriverOptions`]),
//! and the lifecycle manager that guarantees acquire/release pairing
//! ([`DriverManager`]).
//!
//! No browser protocol lives here. Concrete backends implement
//! [`DriverFactory`] + [`WebDriver`] out of tree; [`ScriptedDriver`] is
//! the in-tree implementation used by the engine and scheduler tests.

pub mod browser;
pub mod driver;
pub mod error;
pub mod manager;
pub mod options;
pub mod scripted;

pub use browser::BrowserType;
pub use driver::WebDriver;
pub use error::DriverError;
pub use manager::{DriverFactory, DriverManager};
pub use options::DriverOptions;
pub use scripted::{ScriptedDriver, ScriptedDriverHandle};
