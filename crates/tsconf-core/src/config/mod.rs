//! TypeScript/JavaScript project configuration
//!
//! ## Configuration Discovery
//!
//! Starting from a directory, each ancestor is checked for `tsconfig.json`
//! and then `jsconfig.json`; the nearest match wins. A path that names a file
//! is used as-is.
//!
//! ## Configuration Inheritance
//!
//! A config may extend another one with a single string:
//!
//! ```jsonc
//! {
//!   // resolved relative to this file, or under node_modules for packages
//!   "extends": "./tsconfig.base",
//!   "compilerOptions": {
//!     "strict": true,
//!   },
//! }
//! ```
//!
//! Files are parsed leniently (comments, trailing commas, leading BOM). The
//! whole chain is flattened into one [`TsConfig`], with each descendant's
//! keys overriding its ancestor's and `compilerOptions` merged on its own.

pub mod document;
pub mod loader;
pub mod locator;
pub mod merge;
pub mod parser;

pub use document::TsConfig;
pub use loader::{ConfigLoader, LoaderResult};
pub use locator::{CONFIG_FILE_NAMES, ConfigLocator};
pub use parser::ConfigParser;
