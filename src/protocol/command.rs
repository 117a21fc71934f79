//! Command definitions
//!
//! Builds request frames. Redis expects every request as an array of bulk
//! strings: the command name followed by its arguments.

use std::fmt;

use super::Value;

/// A request to send to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    args: Vec<String>,
}

impl Command {
    /// Start a command with no arguments
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append one argument, rendered as text
    pub fn arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Append every argument from an iterator
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.args.extend(args.into_iter().map(|a| a.to_string()));
        self
    }

    /// Command name, e.g. `"SET"`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of arguments after the name
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Build the request frame
    pub fn into_value(self) -> Value {
        let mut items = Vec::with_capacity(self.args.len() + 1);
        items.push(Value::BulkString(self.name.to_string()));
        items.extend(self.args.into_iter().map(Value::BulkString));
        Value::Array(items)
    }
}

impl From<Command> for Value {
    fn from(command: Command) -> Self {
        command.into_value()
    }
}
