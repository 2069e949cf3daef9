//! # oxide-args
//!
//! Lenient argv parsing into named flags and positional tokens.
//!
//! This crate provides:
//! - Long flags (`--name value`, `--name=value`, `--no-name`)
//! - Short flag groups (`-abc`, `-n5`, `-o=file`)
//! - Boolean and string flag declarations
//! - Aliases and default values
//! - Numeric value detection
//!
//! Nothing here fails: unknown flags are kept as-is, so callers decide
//! what counts as invalid.
//!
//! ## Quick Start
//!
//! ```
//! use oxide_args::{parse, ParseOptions};
//!
//! let options = ParseOptions::new()
//!     .boolean("verbose")
//!     .alias("v", "verbose")
//!     .default_value("port", 8080);
//!
//! let args = parse(["serve", "-v", "--host", "0.0.0.0"], &options);
//! assert_eq!(args.positional, vec!["serve"]);
//! assert!(args.is_set("verbose"));
//! assert_eq!(args.get_str("host"), Some("0.0.0.0"));
//! assert_eq!(args.get_f64("port"), Some(8080.0));
//! ```

mod options;
mod parser;
mod value;

pub use options::ParseOptions;
pub use parser::{parse, Args};
pub use value::Value;
