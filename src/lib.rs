//! A command line is declared as a tree: a root ([`Cli`]), nested
//! [`Group`]s and leaf [`Command`]s, each carrying typed options ([`Opt`]).
//! The token list is then matched against that tree in one forward pass and
//! exactly one command handler runs with its leftover tokens.
//!
//! ```no_run
//! use cmdtree::{Cli, Command, Opt, Slot};
//!
//! let name = Slot::new(String::new());
//! let mut cli = Cli::new("greeter", "v1.0.0");
//! cli.add_options([Opt::required_value(&name, "name", 'n', "who to greet")]).unwrap();
//! let greeting = name.clone();
//! cli.add_commands([Command::new("hello", "say hello", move |_args| {
//!     println!("Hello {}", greeting.get());
//!     Ok(())
//! })])
//! .unwrap();
//! if let Err(err) = cli.handle_env() {
//!     cli.exit(1, &[&err]);
//! }
//! ```
use std::ffi::OsString;

mod node;
mod opt;
mod rt;
mod text;
mod usage;
mod value;

pub use crate::{
    node::{Arg, Cli, Command, Group, Node, DEFAULT_VERSION},
    opt::{Opt, Slot},
    rt::Outcome,
    text::{escape, sentence},
    usage::Palette,
    value::{parse_duration, Kind, Value},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a parse call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A command handler or an option callback failed.
    #[error(transparent)]
    Handler(anyhow::Error),
}

/// Malformed input, detected while matching tokens.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unknown argument: `{0}`")]
    UnknownArgument(String),
    #[error("missing `{0}` value")]
    MissingOptionValue(String),
    #[error("can't parse `{option}` as {kind}: `{value}`, {reason}")]
    InvalidValueFormat { option: String, value: String, kind: Kind, reason: String },
    #[error("missing required options: {}", .0.join(", "))]
    MissingRequiredOptions(Vec<String>),
    #[error("argument is not valid unicode: {0:?}")]
    NotUnicode(OsString),
}

/// A broken declaration. These are programming mistakes, the tree should not
/// be used to parse anything after one of these.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("duplicate name `{name}` in `{node}`")]
    DuplicateName { name: String, node: String },
    #[error("invalid default `{value}` for `{option}`: {reason}")]
    InvalidDefault { option: String, value: String, reason: String },
}
