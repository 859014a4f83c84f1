//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// When the key applies.
    pub context: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, context: &'static str, description: &'static str) -> Self {
        Self {
            key,
            context,
            description,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", "annotation selected", "Delete the selected annotation"),
            Shortcut::new("Enter", "text entry", "Confirm the text"),
            Shortcut::new("Escape", "text entry", "Discard the text"),
            Shortcut::new("Backspace", "text entry", "Remove the last character"),
        ]
    }

    /// All shortcuts as an aligned table.
    pub fn format_all() -> String {
        let mut out = String::from("Keyboard shortcuts:\n");
        for shortcut in Self::all() {
            out.push_str(&format!(
                "  {:10} {:22} {}\n",
                shortcut.key, shortcut.context, shortcut.description
            ));
        }
        out
    }
}
