//! User configuration — keybindings and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/outline-tree/config.toml` (default
//! `~/.config/outline-tree/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the outline view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    JumpSiblingUp,
    JumpSiblingDown,
    ToggleSelect,
    Grab,
    ExpandAll,
    CollapseAll,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::Expand,
        Action::Collapse,
        Action::JumpSiblingUp,
        Action::JumpSiblingDown,
        Action::ToggleSelect,
        Action::Grab,
        Action::ExpandAll,
        Action::CollapseAll,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::Expand => "Expand",
            Action::Collapse => "Collapse / Parent",
            Action::JumpSiblingUp => "Prev Sibling Block",
            Action::JumpSiblingDown => "Next Sibling Block",
            Action::ToggleSelect => "Select Block",
            Action::Grab => "Grab / Move Block",
            Action::ExpandAll => "Expand All",
            Action::CollapseAll => "Collapse All",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Expand => "expand",
            Action::Collapse => "collapse",
            Action::JumpSiblingUp => "jump_sibling_up",
            Action::JumpSiblingDown => "jump_sibling_down",
            Action::ToggleSelect => "toggle_select",
            Action::Grab => "grab",
            Action::ExpandAll => "expand_all",
            Action::CollapseAll => "collapse_all",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "move_up" => Some(Action::MoveUp),
            "move_down" => Some(Action::MoveDown),
            "expand" => Some(Action::Expand),
            "collapse" => Some(Action::Collapse),
            "jump_sibling_up" => Some(Action::JumpSiblingUp),
            "jump_sibling_down" => Some(Action::JumpSiblingDown),
            "toggle_select" => Some(Action::ToggleSelect),
            "grab" => Some(Action::Grab),
            "expand_all" => Some(Action::ExpandAll),
            "collapse_all" => Some(Action::CollapseAll),
            "open_settings" => Some(Action::OpenSettings),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Modifiers that participate in matching; platform-specific extras
/// (SUPER, HYPER, META) are ignored.
const MOD_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// Named keys as they appear in the config file.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Space", KeyCode::Char(' ')),
];

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && self.modifiers == event.modifiers & MOD_MASK
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & MOD_MASK,
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut prefix = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                prefix.push_str(name);
            }
        }
        prefix
    }

    /// Canonical config-file name of a key code.
    fn code_name(code: KeyCode) -> String {
        if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, c)| *c == code) {
            return (*name).to_string();
        }
        match code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        }
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Backspace => "Bksp".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            other => Self::code_name(other),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), Self::code_name(self.code))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut parts = s.split('+').rev();
        let key_part = parts.next()?;

        for part in parts {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let lowered = key_part.to_lowercase();
        let code = if let Some((_, code)) = NAMED_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&lowered))
        {
            *code
        } else if let Some(digits) = lowered.strip_prefix('f').filter(|d| !d.is_empty()) {
            KeyCode::F(digits.parse().ok()?)
        } else if lowered.chars().count() == 1 {
            KeyCode::Char(lowered.chars().next()?)
        } else {
            return None;
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Cycle values offered for the overscan setting.
pub const OVERSCAN_STEPS: &[usize] = &[0, 2, 5, 10, 20];

/// Application configuration — keybindings and view settings.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Windowed rendering: materialise only the rows near the viewport.
    pub windowed: bool,
    /// Extra rows materialised on each side of the viewport.
    pub overscan: usize,
    /// Show the "add block" appender row under selected parents.
    pub show_appender: bool,
    /// Double-click detection window for mouse expand/collapse.
    pub double_click_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            windowed: true,
            overscan: 5,
            show_appender: true,
            double_click_ms: 250,
        }
    }
}

impl AppConfig {
    /// Hard-coded default keybindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let alt = KeyModifiers::ALT;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Expand, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Collapse, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(JumpSiblingUp, vec![KeyBind::new(Up, alt)]);
        m.insert(JumpSiblingDown, vec![KeyBind::new(Down, alt)]);
        m.insert(ToggleSelect, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(Grab, vec![KeyBind::new(Char('m'), n)]);
        m.insert(ExpandAll, vec![KeyBind::new(Char('e'), n)]);
        m.insert(CollapseAll, vec![KeyBind::new(Char('c'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match (shouldn't happen after conflict resolution), the one with
    /// the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |bind| (action, bind)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"↑ / k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: navigate | {}: expand/collapse | {}: select | {}: move | {}: settings",
            self.short_binding(Action::MoveUp),
            self.short_binding(Action::Expand),
            self.short_binding(Action::ToggleSelect),
            self.short_binding(Action::Grab),
            self.short_binding(Action::OpenSettings),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // View settings.
            match key {
                "windowed" => {
                    config.windowed = value == "true";
                    continue;
                }
                "overscan" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.overscan = v.min(100);
                    }
                    continue;
                }
                "show_appender" => {
                    config.show_appender = value == "true";
                    continue;
                }
                "double_click_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        // Keep this bounded for predictable UX.
                        config.double_click_ms = v.clamp(100, 2000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# outline-tree configuration".to_string(),
            String::new(),
            "# View settings".to_string(),
            format!("windowed = {}", self.windowed),
            format!("overscan = {}", self.overscan),
            format!("show_appender = {}", self.show_appender),
            format!("double_click_ms = {}", self.double_click_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/outline-tree/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("outline-tree").join("config.toml")
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_round_trip_through_the_config_format() {
        let config = AppConfig::default();
        let parsed = AppConfig::parse_config(&config.serialise());
        for &action in Action::ALL {
            assert_eq!(
                parsed.bindings.get(&action),
                config.bindings.get(&action),
                "{action:?}"
            );
        }
        assert_eq!(parsed.windowed, config.windowed);
        assert_eq!(parsed.overscan, config.overscan);
        assert_eq!(parsed.show_appender, config.show_appender);
    }

    #[test]
    fn add_binding_steals_the_key_from_other_actions() {
        let mut config = AppConfig::default();
        let bind = KeyBind::new(KeyCode::Char('q'), KeyModifiers::NONE);
        config.add_binding(Action::MoveDown, bind.clone());

        assert!(config.bindings[&Action::Quit].is_empty());
        assert!(config.bindings[&Action::MoveDown].contains(&bind));
    }

    #[test]
    fn unparsable_lines_are_ignored() {
        let config = AppConfig::parse_config("garbage\nquit = NoSuchKey+x\noverscan = 7\n");
        // Bad binding line keeps the default.
        assert_eq!(config.bindings[&Action::Quit].len(), 1);
        assert_eq!(config.overscan, 7);
    }
}
