use serde::{Deserialize, Serialize};

/// Static description of the display the driver talks to.
///
/// The driver only ever borrows this. `columns` feeds the cursor address arithmetic of
/// [HD44780Driver::set_cursor](crate::HD44780Driver::set_cursor); the preferences are applied by
/// [HD44780Driver::apply_preferences](crate::HD44780Driver::apply_preferences).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub rows: u8,
    pub columns: u8,
    /// Show the underline cursor.
    pub cursor: bool,
    /// Blink the character under the cursor.
    pub blink: bool,
    /// Move the cursor right after every character.
    pub increment: bool,
}

impl DisplayConfig {
    pub fn new(rows: u8, columns: u8) -> Self {
        DisplayConfig {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn with_cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_blink(mut self, blink: bool) -> Self {
        self.blink = blink;
        self
    }

    pub fn with_increment(mut self, increment: bool) -> Self {
        self.increment = increment;
        self
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            rows: 2,
            columns: 16,
            cursor: true,
            blink: false,
            increment: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: DisplayConfig = serde_json::from_str(r#"{ "rows": 4, "columns": 20 }"#).unwrap();
        assert_eq!(config, DisplayConfig::new(4, 20));
        assert!(config.cursor);
        assert!(!config.blink);
        assert!(config.increment);
    }

    #[test]
    fn builder_sets_preferences() {
        let config = DisplayConfig::new(2, 16)
            .with_cursor(false)
            .with_blink(true)
            .with_increment(false);
        assert!(!config.cursor);
        assert!(config.blink);
        assert!(!config.increment);
    }
}
