// Configuration module
// Loose settings bag plus the typed view the cursor engine reads

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: HashMap<String, ConfigValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Config {
    pub fn default() -> Self {
        Self {
            settings: HashMap::new(),
        }
    }

    /// Settings bag seeded with every editing default
    pub fn with_defaults() -> Self {
        let mut config = Self::default();
        config.set("read_only", false);
        config.set("auto_closing_brackets", "languageDefined");
        config.set("auto_closing_overtype", "auto");
        config.set("auto_surround", true);
        config.set("auto_close_before", DEFAULT_AUTO_CLOSE_BEFORE);
        config.set("auto_closing_pairs", DEFAULT_AUTO_CLOSING_PAIRS);
        config.set("auto_indent", true);
        config.set("multi_cursor_merge_overlapping", true);
        config.set("multi_cursor_paste", "spread");
        config.set("empty_selection_clipboard", true);
        config
    }

    /// Set a configuration value
    pub fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) {
        self.settings.insert(key.to_string(), value.into());
    }

    /// Get a setting value
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.settings.get(key)
    }

    /// Get boolean setting
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Get integer setting
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    /// Get string setting
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| match v {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

// ==================== Typed cursor configuration ====================

/// Characters that may follow the cursor for an opening bracket to auto-close
pub const DEFAULT_AUTO_CLOSE_BEFORE: &str = ";:.,=}])> \n\t";

/// Whitespace-separated open/close pairs
pub const DEFAULT_AUTO_CLOSING_PAIRS: &str = "() [] {} \"\" '' ``";

/// When typing an opening character also inserts its close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoClosingStrategy {
    Always,
    /// Only before whitespace, end of line or a char from `auto_close_before`
    #[default]
    LanguageDefined,
    /// Only before whitespace or end of line
    BeforeWhitespace,
    Never,
}

/// When typing a close character steps over an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoClosingOvertype {
    Always,
    /// Only over close characters that were inserted automatically
    #[default]
    Auto,
    Never,
}

/// How multi-line text is pasted into several cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiCursorPaste {
    /// One line per cursor when the line count matches the cursor count
    #[default]
    Spread,
    /// Every cursor receives the full text
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoClosingPair {
    pub open: String,
    pub close: String,
}

/// Settings the cursors controller and the typing algorithms read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorConfig {
    pub read_only: bool,
    pub auto_closing_brackets: AutoClosingStrategy,
    pub auto_closing_overtype: AutoClosingOvertype,
    pub auto_surround: bool,
    pub auto_close_before: String,
    pub auto_closing_pairs: Vec<AutoClosingPair>,
    pub auto_indent: bool,
    pub multi_cursor_merge_overlapping: bool,
    pub multi_cursor_paste: MultiCursorPaste,
    pub empty_selection_clipboard: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self::from_config(&Config::with_defaults())
    }
}

fn parse_pairs(pairs: &str) -> Vec<AutoClosingPair> {
    pairs.split_whitespace()
        .filter_map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(open), Some(close), None) => Some(AutoClosingPair {
                    open: open.to_string(),
                    close: close.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}

impl CursorConfig {
    /// Read the typed configuration; missing or mistyped keys fall back to defaults
    pub fn from_config(config: &Config) -> Self {
        let flag = |key: &str, default: bool| config.get_bool(key).unwrap_or(default);

        let auto_closing_brackets = match config.get_string("auto_closing_brackets") {
            Some("always") => AutoClosingStrategy::Always,
            Some("beforeWhitespace") => AutoClosingStrategy::BeforeWhitespace,
            Some("never") => AutoClosingStrategy::Never,
            _ => AutoClosingStrategy::LanguageDefined,
        };
        let auto_closing_overtype = match config.get_string("auto_closing_overtype") {
            Some("always") => AutoClosingOvertype::Always,
            Some("never") => AutoClosingOvertype::Never,
            _ => AutoClosingOvertype::Auto,
        };
        let multi_cursor_paste = match config.get_string("multi_cursor_paste") {
            Some("full") => MultiCursorPaste::Full,
            _ => MultiCursorPaste::Spread,
        };

        Self {
            read_only: flag("read_only", false),
            auto_closing_brackets,
            auto_closing_overtype,
            auto_surround: flag("auto_surround", true),
            auto_close_before: config
                .get_string("auto_close_before")
                .unwrap_or(DEFAULT_AUTO_CLOSE_BEFORE)
                .to_string(),
            auto_closing_pairs: parse_pairs(
                config
                    .get_string("auto_closing_pairs")
                    .unwrap_or(DEFAULT_AUTO_CLOSING_PAIRS),
            ),
            auto_indent: flag("auto_indent", true),
            multi_cursor_merge_overlapping: flag("multi_cursor_merge_overlapping", true),
            multi_cursor_paste,
            empty_selection_clipboard: flag("empty_selection_clipboard", true),
        }
    }

    /// Close character paired with `open`
    pub fn close_for(&self, open: &str) -> Option<&str> {
        self.auto_closing_pairs
            .iter()
            .find(|p| p.open == open)
            .map(|p| p.close.as_str())
    }

    /// True if `ch` closes one of the configured pairs
    pub fn is_close_character(&self, ch: &str) -> bool {
        self.auto_closing_pairs.iter().any(|p| p.close == ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.settings.is_empty());
        let seeded = Config::with_defaults();
        assert_eq!(seeded.get_bool("auto_indent"), Some(true));
        assert_eq!(seeded.get_string("multi_cursor_paste"), Some("spread"));
    }

    #[test]
    fn test_set_get_settings() {
        let mut config = Config::default();

        config.set("bool_setting", true);
        assert_eq!(config.get_bool("bool_setting"), Some(true));

        config.set("int_setting", 42);
        assert_eq!(config.get_int("int_setting"), Some(42));

        config.set("string_setting", "hello");
        assert_eq!(config.get_string("string_setting"), Some("hello"));
    }

    #[test]
    fn test_type_mismatch() {
        let mut config = Config::default();
        config.set("val", 10);
        // Should return None if type doesn't match
        assert_eq!(config.get_bool("val"), None);
        assert_eq!(config.get_string("val"), None);
    }

    #[test]
    fn test_cursor_config_from_defaults() {
        let cursor = CursorConfig::default();
        assert!(!cursor.read_only);
        assert_eq!(cursor.auto_closing_brackets, AutoClosingStrategy::LanguageDefined);
        assert_eq!(cursor.auto_closing_pairs.len(), 6);
        assert_eq!(cursor.close_for("("), Some(")"));
        assert!(cursor.is_close_character("]"));
        assert!(!cursor.is_close_character("("));
    }

    #[test]
    fn test_cursor_config_overrides() {
        let mut config = Config::with_defaults();
        config.set("read_only", true);
        config.set("auto_closing_brackets", "never");
        config.set("auto_closing_pairs", "<> ab invalid");
        config.set("multi_cursor_paste", "full");
        // Mistyped values fall back to defaults
        config.set("auto_indent", 0);
        let cursor = CursorConfig::from_config(&config);
        assert!(cursor.read_only);
        assert_eq!(cursor.auto_closing_brackets, AutoClosingStrategy::Never);
        assert_eq!(cursor.close_for("<"), Some(">"));
        assert_eq!(cursor.close_for("a"), Some("b"));
        assert_eq!(cursor.auto_closing_pairs.len(), 2);
        assert_eq!(cursor.multi_cursor_paste, MultiCursorPaste::Full);
        assert!(cursor.auto_indent);
    }

    #[test]
    fn test_config_value_conversions() {
        let b: ConfigValue = true.into();
        assert_eq!(b, ConfigValue::Bool(true));

        let i: ConfigValue = 100i64.into();
        assert_eq!(i, ConfigValue::Int(100));

        let s: ConfigValue = "test".into();
        assert_eq!(s, ConfigValue::String("test".to_string()));
    }
}
