use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::collector::Collector;
use crate::system::process::ProcessInfo;
use crate::system::procfs::ProcReader;
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::{ColorSupport, Theme, resolve_color_support};

const CPU_HISTORY_CAPACITY: usize = 60;
const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub cycle_sort: KeyCode,
    pub cycle_theme: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Filter processes"),
            (key_label(self.cycle_sort), "Cycle sort column"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.help), "Toggle help"),
            (key_label(self.refresh), "Refresh now"),
        ];
        entries.push(("\u{2191}\u{2193}".to_string(), "Select process"));
        entries.push(("PgUp/PgDn".to_string(), "Jump"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Cpu,
    Memory,
    Pid,
    User,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Cpu => SortMode::Memory,
            SortMode::Memory => SortMode::Pid,
            SortMode::Pid => SortMode::User,
            SortMode::User => SortMode::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Cpu => "CPU",
            SortMode::Memory => "RAM",
            SortMode::Pid => "PID",
            SortMode::User => "User",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "ram" => SortMode::Memory,
            "pid" => SortMode::Pid,
            "user" => SortMode::User,
            _ => SortMode::Cpu,
        }
    }
}

pub struct App {
    pub running: bool,
    pub collector: Collector,
    pub snapshot: SystemSnapshot,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub theme: Theme,
    pub color_support: ColorSupport,
    pub sort_mode: SortMode,
    pub keybinds: ResolvedKeybinds,
    pub cpu_history: VecDeque<u64>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let reader = ProcReader::with_roots(&config.sources.proc_root, &config.sources.etc_root);
        let mut collector = Collector::new(reader, config.general.show_kernel_threads);
        let snapshot = collector.refresh();

        let color_support = resolve_color_support(&config.general.color_support);
        let theme = Theme::from_config(&config.general.theme, color_support);
        let sort_mode = SortMode::from_str_config(&config.general.default_sort);
        let keybinds = ResolvedKeybinds::from_config(&config.keybinds);

        let mut app = App {
            running: true,
            collector,
            snapshot,
            selected_index: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            theme,
            color_support,
            sort_mode,
            keybinds,
            cpu_history: VecDeque::with_capacity(CPU_HISTORY_CAPACITY),
        };
        app.record_cpu_history();
        app
    }

    pub fn refresh_data(&mut self) {
        self.snapshot = self.collector.refresh();
        self.record_cpu_history();
        self.clamp_selection();
    }

    fn record_cpu_history(&mut self) {
        // Sparkline wants integers; scale the [0,1] ratio to 0..10000.
        let cpu_val = (self.snapshot.cpu_utilization * 10_000.0) as u64;
        if self.cpu_history.len() == CPU_HISTORY_CAPACITY {
            self.cpu_history.pop_front();
        }
        self.cpu_history.push_back(cpu_val);
    }

    /// Processes surviving the current filter, in the current sort order.
    pub fn visible_rows(&self) -> Vec<&ProcessInfo> {
        let needle = self.filter_text.to_lowercase();
        let mut rows: Vec<&ProcessInfo> = self
            .snapshot
            .processes
            .iter()
            .filter(|p| p.matches_filter(&needle))
            .collect();

        match self.sort_mode {
            SortMode::Cpu => rows.sort_by(|a, b| {
                b.cpu_percent
                    .partial_cmp(&a.cpu_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.pid.cmp(&b.pid))
            }),
            SortMode::Memory => rows.sort_by(|a, b| b.ram_kb.cmp(&a.ram_kb).then(a.pid.cmp(&b.pid))),
            SortMode::Pid => rows.sort_by_key(|p| p.pid),
            SortMode::User => rows.sort_by(|a, b| a.user.cmp(&b.user).then(a.pid.cmp(&b.pid))),
        }
        rows
    }

    pub fn selected_process(&self) -> Option<&ProcessInfo> {
        self.visible_rows().get(self.selected_index).copied()
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Home),
            KeyCode::End => return Action::Navigate(Direction::End),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.clamp_selection();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.clamp_selection();
            }
            Action::CycleSortMode => {
                self.sort_mode = self.sort_mode.next();
                self.selected_index = 0;
            }
            Action::CycleTheme => {
                self.theme = self.theme.next(self.color_support);
            }
            Action::ToggleHelp => {
                self.input_mode = match self.input_mode {
                    InputMode::Help => InputMode::Normal,
                    _ => InputMode::Help,
                };
            }
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }

    fn navigate(&mut self, dir: Direction) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = match dir {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(len - 1),
            Direction::PageUp => self.selected_index.saturating_sub(PAGE_JUMP),
            Direction::PageDown => (self.selected_index + PAGE_JUMP).min(len - 1),
            Direction::Home => 0,
            Direction::End => len - 1,
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }
}
