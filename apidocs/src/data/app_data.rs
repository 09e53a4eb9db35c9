use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    data::catalog::Catalog,
    explain::{Explain, ExplainCache, explain_path},
    nav::Navigator,
};

/// Pane receiving key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Details,
    Input,
}

/// What the command line submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    Search,
    Command,
}

impl InputPurpose {
    pub fn prompt(self) -> char {
        match self {
            InputPurpose::Search => '/',
            InputPurpose::Command => ':',
        }
    }
}

/// Text being typed into the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInput {
    pub purpose: InputPurpose,
    pub text: String,
}

/// Session state of the browser.
///
/// Every key press is routed through [`AppData::handle_key`], so the whole
/// interaction can be driven without a terminal.
pub struct AppData {
    /// Drill-down and search state.
    pub navigator: Navigator,
    /// Pane that currently owns key input.
    pub focus: Focus,
    /// Set once the user asked to leave.
    pub should_quit: bool,
    /// Vertical scroll of the details pane.
    pub details_scroll: u16,
    cache: ExplainCache,
    explainer: Box<dyn Explain>,
    input: Option<CommandInput>,
    return_focus: Focus,
    details_title: String,
    details: String,
    status: String,
}

impl AppData {
    pub fn new(catalog: Catalog, explainer: Box<dyn Explain>) -> Self {
        let mut app = AppData {
            navigator: Navigator::new(catalog),
            focus: Focus::Tree,
            should_quit: false,
            details_scroll: 0,
            cache: ExplainCache::new(),
            explainer,
            input: None,
            return_focus: Focus::Tree,
            details_title: String::new(),
            details: String::new(),
            status: String::new(),
        };
        app.refresh_details();
        app
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn details_title(&self) -> &str {
        &self.details_title
    }

    pub fn input(&self) -> Option<&CommandInput> {
        self.input.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Dispatch one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.focus {
            Focus::Tree => self.on_tree_key(key.code),
            Focus::Details => self.on_details_key(key.code),
            Focus::Input => self.on_input_key(key.code),
        }
    }

    fn on_tree_key(&mut self, code: KeyCode) {
        let before = self.navigator.selected();
        match code {
            KeyCode::Enter => self.navigator.select(),
            KeyCode::Esc => {
                self.navigator.step_back();
            }
            KeyCode::Tab => {
                self.focus = Focus::Details;
                return;
            }
            KeyCode::Char('j') | KeyCode::Down => self.navigator.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.navigator.move_cursor(-1),
            KeyCode::PageDown => self.navigator.move_cursor(10),
            KeyCode::PageUp => self.navigator.move_cursor(-10),
            KeyCode::Char('g') | KeyCode::Home => self.navigator.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.navigator.select_last(),
            KeyCode::Char('h') | KeyCode::Left => self.navigator.set_expanded(false),
            KeyCode::Char('l') | KeyCode::Right => self.navigator.set_expanded(true),
            KeyCode::Char('b') => {
                self.navigator.jump_to_parent();
            }
            KeyCode::Char('/') => self.open_input(InputPurpose::Search),
            KeyCode::Char(':') => self.open_input(InputPurpose::Command),
            _ => return,
        }
        // Esc and Enter can swap the whole view without moving the cursor id.
        if before != self.navigator.selected() || matches!(code, KeyCode::Esc | KeyCode::Enter) {
            self.refresh_details();
        }
    }

    fn on_details_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Esc => self.focus = Focus::Tree,
            KeyCode::Char('j') | KeyCode::Down => {
                self.details_scroll = self.details_scroll.saturating_add(1)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.details_scroll = self.details_scroll.saturating_sub(1)
            }
            KeyCode::PageDown => self.details_scroll = self.details_scroll.saturating_add(10),
            KeyCode::PageUp => self.details_scroll = self.details_scroll.saturating_sub(10),
            KeyCode::Char('g') | KeyCode::Home => self.details_scroll = 0,
            KeyCode::Char('/') => self.open_input(InputPurpose::Search),
            KeyCode::Char(':') => self.open_input(InputPurpose::Command),
            _ => {}
        }
    }

    fn on_input_key(&mut self, code: KeyCode) {
        let Some(input) = self.input.as_mut() else {
            self.focus = self.return_focus;
            return;
        };
        match code {
            KeyCode::Esc => self.close_input(),
            KeyCode::Enter => {
                let input = input.clone();
                self.close_input();
                self.submit(input);
            }
            KeyCode::Backspace => {
                input.text.pop();
            }
            KeyCode::Char(c) => input.text.push(c),
            _ => {}
        }
    }

    fn open_input(&mut self, purpose: InputPurpose) {
        self.return_focus = if self.focus == Focus::Input {
            Focus::Tree
        } else {
            self.focus
        };
        self.input = Some(CommandInput {
            purpose,
            text: String::new(),
        });
        self.focus = Focus::Input;
        self.status.clear();
    }

    fn close_input(&mut self) {
        self.input = None;
        self.focus = self.return_focus;
    }

    fn submit(&mut self, input: CommandInput) {
        match input.purpose {
            InputPurpose::Search => {
                let query = input.text.trim();
                info!("search {query:?}");
                self.navigator.search(query);
                self.focus = Focus::Tree;
                self.refresh_details();
            }
            InputPurpose::Command => self.run_command(input.text.trim()),
        }
    }

    fn run_command(&mut self, command: &str) {
        match command {
            "q" | "q!" | "quit" => self.should_quit = true,
            "" => {}
            other => {
                warn!("unknown command {other:?}");
                self.status = format!("unknown command: {other}");
            }
        }
    }

    /// Show the documentation of the selected node.
    ///
    /// A failed lookup is not fatal: the pane keeps the path as its title and
    /// shows no body.
    pub fn refresh_details(&mut self) {
        self.details_scroll = 0;
        let catalog = self.navigator.catalog();
        let node = catalog.node(self.navigator.selected());

        let Some((resource, path)) = self.navigator.explain_target() else {
            self.details_title = node.label.clone();
            self.details.clear();
            return;
        };
        self.details_title = path.to_string();

        let key = format!("{}/{}", resource.group_version(), path);
        let explainer = self.explainer.as_ref();
        match self
            .cache
            .get_or_render(&key, || explain_path(explainer, resource, path))
        {
            Ok(text) => self.details = text.to_string(),
            Err(e) => {
                warn!("explain {path}: {e}");
                self.details.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        data::{
            catalog::{CatalogNode, NodeId, NodeKind},
            resource::GroupVersionResource,
        },
        error::RenderError,
    };

    struct CountingExplainer {
        calls: Rc<Cell<usize>>,
    }

    impl Explain for CountingExplainer {
        fn render(
            &self,
            resource: &GroupVersionResource,
            fields: &[&str],
        ) -> Result<String, RenderError> {
            self.calls.set(self.calls.get() + 1);
            if fields.last() == Some(&"broken") {
                return Err(RenderError::FieldNotFound {
                    path: resource.resource.clone(),
                    field: "broken".into(),
                });
            }
            Ok(format!("{} {}", resource.resource, fields.join(".")))
        }
    }

    fn catalog() -> (Catalog, NodeId) {
        let gvr = GroupVersionResource {
            group: String::new(),
            version: "v1".into(),
            resource: "pods".into(),
        };
        let mut c = Catalog::new(CatalogNode::new("API Resources", NodeKind::Root));
        let v1 = c.push_child(c.root(), CatalogNode::new("v1", NodeKind::Group));
        let pods = c.push_child(
            v1,
            CatalogNode::new("Pod (pods)", NodeKind::Resource)
                .with_path("pods")
                .with_resource(gvr.clone())
                .with_expanded(false),
        );
        for field in ["broken", "metadata"] {
            c.push_child(
                pods,
                CatalogNode::new(field, NodeKind::Field)
                    .with_path(format!("pods.{field}"))
                    .with_resource(gvr.clone()),
            );
        }
        (c, pods)
    }

    fn app() -> (AppData, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let explainer = CountingExplainer {
            calls: calls.clone(),
        };
        (AppData::new(catalog().0, Box::new(explainer)), calls)
    }

    fn press(app: &mut AppData, keys: &str) {
        for c in keys.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                '\x1b' => KeyCode::Esc,
                '\t' => KeyCode::Tab,
                c => KeyCode::Char(c),
            };
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_selection_explains_once() {
        let (mut app, calls) = app();
        assert_eq!(app.details_title(), "API Resources");
        assert_eq!(calls.get(), 0);

        press(&mut app, "jj");
        assert_eq!(app.details_title(), "pods");
        assert_eq!(app.details(), "pods ");
        assert_eq!(calls.get(), 1);

        press(&mut app, "kj");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_render_error_shows_path_only() {
        let (mut app, _) = app();
        press(&mut app, "jj\nj");
        assert_eq!(app.details_title(), "pods.broken");
        assert_eq!(app.details(), "");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_command() {
        let (mut app, _) = app();
        press(&mut app, ":x\n");
        assert_eq!(app.status(), "unknown command: x");
        assert!(!app.should_quit);
        press(&mut app, ":q\n");
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_and_escape() {
        let (mut app, _) = app();
        press(&mut app, "/meta");
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.input().map(|i| i.text.as_str()), Some("meta"));

        press(&mut app, "\n");
        assert_eq!(app.focus, Focus::Tree);
        assert_eq!(app.navigator.query(), Some("meta"));
        assert_eq!(app.navigator.rows().len(), 4);

        press(&mut app, "\x1b");
        assert!(!app.navigator.is_filtered());
    }

    #[test]
    fn test_input_escape_restores_focus() {
        let (mut app, _) = app();
        press(&mut app, "\t/ab\x1b");
        assert_eq!(app.focus, Focus::Details);
        assert!(app.input().is_none());
        assert!(!app.navigator.is_filtered());
    }

    #[test]
    fn test_drill_down_and_back() {
        let (mut app, _) = app();
        let (_, pods) = catalog();
        press(&mut app, "jj\n");
        assert_eq!(app.navigator.display_root(), pods);
        press(&mut app, "\x1b");
        assert_eq!(app.navigator.stack().len(), 1);
        assert_eq!(app.navigator.selected(), pods);
    }
}
