//! Colored console output for script progress. Human readable only, not a machine contract.

use colored::{
    Color,
    Colorize,
};

/// Formats a key/value pair, optionally overriding the key and value colors.
///
/// Requires the `colored::Colorize` trait to be in scope.
///
/// - `fmt_kv!(key, value)`
/// - `fmt_kv!(key, value, key_color)`
/// - `fmt_kv!(key, value, key_color, value_color)`
#[macro_export]
macro_rules! fmt_kv {
    ($key:expr, $value:expr $(,)?) => {
        $crate::fmt_kv!(
            $key,
            $value,
            $crate::LogColor::Highlight,
            $crate::LogColor::FadedGray
        )
    };
    ($key:expr, $value:expr, $key_color:expr $(,)?) => {
        $crate::fmt_kv!($key, $value, $key_color, $crate::LogColor::FadedGray)
    };
    ($key:expr, $value:expr, $key_color:expr, $value_color:expr $(,)?) => {{
        let __k = ::std::string::ToString::to_string(&$key);
        let __v = ::std::string::ToString::to_string(&$value);
        ::std::format!("{}: {}", __k.color($key_color), __v.color($value_color))
    }};
}

/// Prints a key/value pair on its own line. Same arguments as [`fmt_kv!`].
#[macro_export]
macro_rules! print_kv {
    ($($args:expr),+ $(,)?) => {
        ::std::println!("{}", $crate::fmt_kv!($($args),+))
    };
}

#[derive(Clone, Copy, Debug)]
pub enum LogColor {
    Highlight,
    Debug,
    Error,
    Warning,
    Header,
    Info,
    FadedGray,
}

#[rustfmt::skip]
impl From<LogColor> for Color {
    fn from(value: LogColor) -> Color {
        match value {
            LogColor::Highlight  => Color::TrueColor { r: 255, g: 215, b: 87  },
            LogColor::Debug      => Color::TrueColor { r: 40,  g: 100, b: 153 },
            LogColor::Error      => Color::TrueColor { r: 255, g: 0,   b: 45  },
            LogColor::Warning    => Color::TrueColor { r: 180, g: 105, b: 0   },
            LogColor::Header     => Color::TrueColor { r: 0,   g: 255, b: 0   },
            LogColor::Info       => Color::TrueColor { r: 0,   g: 95,  b: 255 },
            LogColor::FadedGray  => Color::TrueColor { r: 95,  g: 95,  b: 95  },
        }
    }
}

const DIVIDER_WIDTH: usize = 80;

pub fn fmt_divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

pub fn log_divider() {
    println!("{}", fmt_divider().color(LogColor::FadedGray));
}

/// `=== title ===`, padded to the divider width.
pub fn fmt_header(title: &str) -> String {
    let title = format!(" {title} ");
    format!("{title:=^width$}", width = DIVIDER_WIDTH)
}

pub fn log_header(title: &str) {
    println!("{}", fmt_header(title).color(LogColor::Header).bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_and_print_kv() {
        colored::control::set_override(false);
        assert_eq!(fmt_kv!("Mint", "abc"), "Mint: abc");
        assert_eq!(fmt_kv!("Mint", 6, LogColor::Info), "Mint: 6");
        assert_eq!(
            fmt_kv!("Mint", 6u8, LogColor::Info, LogColor::Highlight),
            "Mint: 6"
        );
        print_kv!("hello", "world");
        print_kv!("hello", "world", LogColor::Info);
        print_kv!("hello", "world", LogColor::Info, LogColor::Highlight);
    }

    #[test]
    fn header_width() {
        let header = fmt_header("SPL token");
        assert_eq!(header.len(), DIVIDER_WIDTH);
        assert!(header.contains(" SPL token "));
        assert!(header.starts_with('='));
        assert_eq!(fmt_divider().len(), DIVIDER_WIDTH);
    }
}
