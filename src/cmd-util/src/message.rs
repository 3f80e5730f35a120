//! Labelled status lines for the command line. Successes go to stdout so
//! they can be piped; warnings and errors go to stderr.

use colored::{ColoredString, Colorize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

impl Level {
    fn label(self) -> ColoredString {
        match self {
            Level::Success => "[SUCCESS]".green().bold(),
            Level::Warning => "[WARNING]".yellow().bold(),
            Level::Error => "  [ERROR]".red().bold(),
        }
    }
}

pub fn emit(level: Level, args: fmt::Arguments<'_>) {
    match level {
        Level::Success => println!("{} {}", level.label(), args),
        Level::Warning | Level::Error => eprintln!("{} {}", level.label(), args),
    }
}

#[macro_export]
macro_rules! success_message {
    ($($arg:tt)*) => {
        $crate::message::emit($crate::message::Level::Success, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warning_message {
    ($($arg:tt)*) => {
        $crate::message::emit($crate::message::Level::Warning, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error_message {
    ($($arg:tt)*) => {
        $crate::message::emit($crate::message::Level::Error, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Level::Success, "[SUCCESS]")]
    #[case(Level::Warning, "[WARNING]")]
    #[case(Level::Error, "  [ERROR]")]
    fn test_labels_line_up(#[case] level: Level, #[case] expected: &str) {
        let label = level.label();
        assert_eq!(&*label, expected);
        assert_eq!(label.len(), 9);
    }

    #[test]
    fn test_macros_are_expressions() {
        let sent: Result<(), ()> = Ok(());
        match sent {
            Ok(()) => success_message!("sent {}", 1),
            Err(()) => warning_message!("not sent"),
        }
    }
}
