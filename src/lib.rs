// Library interface for the tush shell
// The binary, integration tests and benchmarks all go through here.

pub mod builtins;
pub mod config;
pub mod error;
pub mod executor;
pub mod expansion;
pub mod glob_expansion;
pub mod lexer;
pub mod parser;
pub mod redirect;
pub mod runtime;

pub use builtins::{Application, Builtins};
pub use error::{Result, ShellError};
pub use executor::{eval, parse_command, Command, CommandBuilder};
pub use runtime::Runtime;
