//! Command registry and keyboard shortcuts for the timeline editor.
//!
//! Shortcuts never fire while a text field or other widget holds keyboard
//! focus, so typing into an input is never intercepted.

use std::collections::HashMap;

// ── Shortcut representation ─────────────────────────────────────

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: bool, // ⌘ on macOS, Ctrl elsewhere
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: false,
    };
    pub const CMD: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        command: true,
    };
    pub const CMD_SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        command: true,
    };

    pub fn from_egui(mods: egui::Modifiers) -> Self {
        Self {
            ctrl: mods.ctrl && !mods.command,
            shift: mods.shift,
            alt: mods.alt,
            command: mods.command,
        }
    }
}

/// A keyboard shortcut (modifier + key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Shortcut {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
        Self {
            modifiers,
            key: key.into(),
        }
    }

    /// Translate an egui key press. Zoom keys ignore Shift so `+` works on
    /// layouts where it shares a key with `=`.
    pub fn from_egui(key: egui::Key, mods: egui::Modifiers) -> Option<Self> {
        let name = match key {
            egui::Key::Equals => "=",
            egui::Key::Plus => "+",
            egui::Key::Minus => "-",
            egui::Key::Space => "Space",
            egui::Key::F => "F",
            egui::Key::Z => "Z",
            _ => return None,
        };
        let mut modifiers = Modifiers::from_egui(mods);
        if matches!(key, egui::Key::Equals | egui::Key::Plus | egui::Key::Minus) {
            modifiers.shift = false;
        }
        Some(Self::new(modifiers, name))
    }

    /// Format for display: "⌘Z", "⇧⌘Z", etc.
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.ctrl {
            s.push('⌃');
        }
        if self.modifiers.alt {
            s.push('⌥');
        }
        if self.modifiers.shift {
            s.push('⇧');
        }
        if self.modifiers.command {
            s.push('⌘');
        }
        s.push_str(&self.key.to_uppercase());
        s
    }
}

// ── Commands ────────────────────────────────────────────────────

/// Editor actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorCommand {
    ZoomIn,
    ZoomOut,
    ToggleFit,
    PlayPause,
    Undo,
    Redo,
}

/// A registered command.
#[derive(Debug, Clone)]
pub struct Command {
    pub id: &'static str,
    pub name: &'static str,
    pub action: EditorCommand,
    pub shortcuts: Vec<Shortcut>,
}

impl Command {
    /// Primary shortcut label for menus and tooltips.
    pub fn shortcut_label(&self) -> Option<String> {
        self.shortcuts.first().map(Shortcut::display)
    }
}

// ── Registry ────────────────────────────────────────────────────

pub struct CommandRegistry {
    commands: Vec<Command>,
    by_id: HashMap<&'static str, usize>,
    by_shortcut: HashMap<Shortcut, usize>,
}

impl CommandRegistry {
    /// Create a registry with the editor's built-in commands.
    pub fn new() -> Self {
        let mut reg = Self {
            commands: Vec::new(),
            by_id: HashMap::new(),
            by_shortcut: HashMap::new(),
        };
        reg.register_builtins();
        reg
    }

    pub fn register(&mut self, cmd: Command) {
        let idx = self.commands.len();
        self.by_id.insert(cmd.id, idx);
        for shortcut in &cmd.shortcuts {
            self.by_shortcut.insert(shortcut.clone(), idx);
        }
        self.commands.push(cmd);
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.by_id.get(id).map(|&i| &self.commands[i])
    }

    pub fn get_by_shortcut(&self, shortcut: &Shortcut) -> Option<&Command> {
        self.by_shortcut.get(shortcut).map(|&i| &self.commands[i])
    }

    pub fn all(&self) -> &[Command] {
        &self.commands
    }

    /// Resolve a key press. Nothing fires while text input has focus.
    pub fn resolve(&self, shortcut: &Shortcut, text_input_focused: bool) -> Option<EditorCommand> {
        if text_input_focused {
            return None;
        }
        self.get_by_shortcut(shortcut).map(|cmd| cmd.action)
    }

    /// Commands triggered by this frame's key presses.
    pub fn poll(&self, ctx: &egui::Context) -> Vec<EditorCommand> {
        let text_input_focused = ctx.wants_keyboard_input();
        ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat,
                        modifiers,
                        ..
                    } => {
                        let shortcut = Shortcut::from_egui(*key, *modifiers)?;
                        let command = self.resolve(&shortcut, text_input_focused)?;
                        // Holding a zoom key keeps zooming; everything else fires once.
                        let repeatable =
                            matches!(command, EditorCommand::ZoomIn | EditorCommand::ZoomOut);
                        (!*repeat || repeatable).then_some(command)
                    }
                    _ => None,
                })
                .collect()
        })
    }

    fn register_builtins(&mut self) {
        self.register(Command {
            id: "view.zoom_in",
            name: "Zoom In",
            action: EditorCommand::ZoomIn,
            shortcuts: vec![
                Shortcut::new(Modifiers::NONE, "="),
                Shortcut::new(Modifiers::NONE, "+"),
            ],
        });
        self.register(Command {
            id: "view.zoom_out",
            name: "Zoom Out",
            action: EditorCommand::ZoomOut,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "-")],
        });
        self.register(Command {
            id: "view.fit_toggle",
            name: "Fit Timeline / Restore Zoom",
            action: EditorCommand::ToggleFit,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "F")],
        });
        self.register(Command {
            id: "transport.play_pause",
            name: "Play/Pause",
            action: EditorCommand::PlayPause,
            shortcuts: vec![Shortcut::new(Modifiers::NONE, "Space")],
        });
        self.register(Command {
            id: "edit.undo",
            name: "Undo",
            action: EditorCommand::Undo,
            shortcuts: vec![Shortcut::new(Modifiers::CMD, "Z")],
        });
        self.register(Command {
            id: "edit.redo",
            name: "Redo",
            action: EditorCommand::Redo,
            shortcuts: vec![Shortcut::new(Modifiers::CMD_SHIFT, "Z")],
        });
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
