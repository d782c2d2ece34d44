//! Application state and event routing.

use std::sync::Arc;

use mdlive_core::help::HelpBar;
use mdlive_core::help::HelpBarOptions;
use mdlive_core::input::InputEvent;
use mdlive_core::input::KeyCode;
use mdlive_core::input::KeyEvent;
use mdlive_core::input::MouseButton;
use mdlive_core::input::MouseEvent;
use mdlive_core::input::MouseEventKind;
use mdlive_core::keymap;
use mdlive_core::keymap::Binding;
use mdlive_core::keymap::Keymap;
use mdlive_core::split::Container;
use mdlive_core::split::DividerEvent;
use mdlive_core::split::SplitState;
use mdlive_core::textarea::TextArea;
use mdlive_core::textarea::TextAreaAction;
use mdlive_core::textarea::TextAreaOptions;
use mdlive_core::theme::Theme;
use mdlive_markdown::document::FrameSize;
use mdlive_markdown::document::PrintDocument;
use mdlive_markdown::live::LivePreview;
use mdlive_markdown::project::Projector;
use mdlive_markdown::project::VisualTree;
use mdlive_markdown::view::PreviewView;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::print::PrintHost;

pub const EDITOR_PLACEHOLDER: &str = "Type your markdown here...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Preview,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Print,
    ToggleFocus,
    Frame(FrameSize),
}

/// Screen regions from the last draw, used to route mouse events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitMap {
    /// Both panes plus the divider. Drag ratios are measured against it.
    pub main: Rect,
    pub editor: Rect,
    /// Grab area around the divider column.
    pub divider: Rect,
    pub preview: Rect,
    pub frame_buttons: Vec<(FrameSize, Rect)>,
    pub print_button: Rect,
}

pub struct App {
    pub(crate) live: LivePreview,
    pub(crate) editor: TextArea,
    pub(crate) preview: PreviewView,
    pub(crate) split: SplitState,
    pub(crate) frame: FrameSize,
    pub(crate) frame_selector: bool,
    pub(crate) focus: Focus,
    pub(crate) help: HelpBar,
    pub(crate) hits: HitMap,
    pub(crate) theme: Theme,
    global_keys: Keymap<Action>,
    preview_keys: Keymap<Action>,
    printer: Box<dyn PrintHost>,
    quit: bool,
}

impl App {
    pub fn new(config: &AppConfig, initial: &str, printer: Box<dyn PrintHost>) -> Self {
        let theme = Theme::default();
        let live = LivePreview::new(Projector::new(config.markdown_options()), initial);

        let mut editor = TextArea::with_options(TextAreaOptions {
            placeholder: Some(EDITOR_PLACEHOLDER.to_string()),
            placeholder_style: theme.text_muted,
            ..TextAreaOptions::default()
        });
        editor.set_text(initial);

        let frame = config.frame_size;
        let mut preview = PreviewView::new();
        preview.set_tree(live.tree());
        preview.set_max_columns(frame.max_columns());

        let global_keys = global_keymap(config.frame_selector);
        let preview_keys = Keymap::new()
            .bind(Binding::new("p", "print", vec![keymap::key_char('p')]), Action::Print)
            .bind(Binding::new("q", "quit", vec![keymap::key_char('q')]), Action::Quit);
        let help = HelpBar::with_options(
            global_keys.bindings(),
            HelpBarOptions {
                style: theme.text_muted,
                key_style: theme.accent,
                status_style: theme.text_primary,
                ..HelpBarOptions::default()
            },
        );

        Self {
            live,
            editor,
            preview,
            split: SplitState::new(config.initial_ratio),
            frame,
            frame_selector: config.frame_selector,
            focus: Focus::Editor,
            help,
            hits: HitMap::default(),
            theme,
            global_keys,
            preview_keys,
            printer,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn frame(&self) -> FrameSize {
        self.frame
    }

    pub fn split(&self) -> SplitState {
        self.split
    }

    pub fn text(&self) -> &str {
        self.live.text()
    }

    pub fn tree(&self) -> Arc<VisualTree> {
        self.live.tree()
    }

    pub fn status(&self) -> Option<&str> {
        self.help.status()
    }

    pub fn hits(&self) -> &HitMap {
        &self.hits
    }

    /// Draws the whole screen and records the hit map. Returns the editor cursor position.
    pub fn draw(&mut self, f: &mut Frame<'_>) -> Option<(u16, u16)> {
        crate::ui::draw(f, self)
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => {
                if self.focus == Focus::Editor {
                    let action = self.editor.input(InputEvent::Paste(text));
                    self.after_edit(action);
                }
            }
            InputEvent::Mouse(m) => self.handle_mouse(m),
            InputEvent::Resize { .. } => {}
        }
    }

    pub fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit = true,
            Action::Print => self.print(),
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Editor => Focus::Preview,
                    Focus::Preview => Focus::Editor,
                };
            }
            Action::Frame(frame) => self.set_frame(frame),
        }
    }

    /// No-op while the frame selector is disabled.
    pub fn set_frame(&mut self, frame: FrameSize) {
        if !self.frame_selector {
            return;
        }
        self.frame = frame;
        self.preview.set_max_columns(frame.max_columns());
        tracing::debug!(%frame, "frame changed");
    }

    /// Sends the current visual tree to the print host and reports the outcome in the status line.
    pub fn print(&mut self) {
        let document = PrintDocument::new(&self.live.tree(), self.frame);
        match self.printer.print(&document) {
            Ok(path) => {
                self.help
                    .set_status(format!("Print document: {}", path.display()), None);
            }
            Err(e) => {
                tracing::error!("{e}");
                self.help.set_status(e.to_string(), Some(self.theme.danger));
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = self.global_keys.action_for(&key) {
            self.perform(action);
            return;
        }
        match self.focus {
            Focus::Editor => {
                let action = self.editor.input(InputEvent::Key(key));
                self.after_edit(action);
            }
            Focus::Preview => {
                if let Some(action) = self.preview_keys.action_for(&key) {
                    self.perform(action);
                    return;
                }
                self.preview
                    .handle_event_in_area(self.hits.preview, InputEvent::Key(key));
            }
        }
    }

    fn after_edit(&mut self, action: TextAreaAction) {
        if action == TextAreaAction::Changed {
            let tree = self.live.replace_text(self.editor.text());
            self.preview.set_tree(tree);
        }
    }

    fn container(&self) -> Container {
        Container::new(self.hits.main.x as f64, self.hits.main.width as f64)
    }

    fn handle_mouse(&mut self, m: MouseEvent) {
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_press(m),
            MouseEventKind::Up(MouseButton::Left) => {
                if self.split.is_dragging() {
                    self.split = self.split.apply(DividerEvent::Release, self.container());
                    tracing::debug!(ratio = self.split.ratio(), "divider released");
                }
            }
            _ if m.is_pointer_move() => {
                if self.split.is_dragging() {
                    let x = m.x as f64;
                    self.split = self
                        .split
                        .apply(DividerEvent::Move { x }, self.container());
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if point_in(self.hits.editor, m.x, m.y) {
                    self.editor
                        .input_in_area(self.hits.editor, InputEvent::Mouse(m));
                } else {
                    self.preview.handle_mouse_event(self.hits.preview, m);
                }
            }
            _ => {}
        }
    }

    fn handle_press(&mut self, m: MouseEvent) {
        let (x, y) = (m.x, m.y);
        if point_in(self.hits.divider, x, y) {
            self.split = self.split.apply(DividerEvent::Press, self.container());
            return;
        }
        let clicked_frame = self
            .hits
            .frame_buttons
            .iter()
            .find(|(_, r)| point_in(*r, x, y))
            .map(|(frame, _)| *frame);
        if let Some(frame) = clicked_frame {
            self.set_frame(frame);
            return;
        }
        if point_in(self.hits.print_button, x, y) {
            self.print();
            return;
        }
        if point_in(self.hits.editor, x, y) {
            self.focus = Focus::Editor;
            self.editor
                .input_in_area(self.hits.editor, InputEvent::Mouse(m));
        } else if point_in(self.hits.preview, x, y) {
            self.focus = Focus::Preview;
        }
    }
}

fn global_keymap(frame_selector: bool) -> Keymap<Action> {
    let mut keys = Keymap::new()
        .bind(
            Binding::new("^P", "print", vec![keymap::key_ctrl('p')]),
            Action::Print,
        )
        .bind(
            Binding::new(
                "tab",
                "focus",
                vec![KeyEvent::new(KeyCode::Tab), KeyEvent::new(KeyCode::BackTab)],
            ),
            Action::ToggleFocus,
        );
    if frame_selector {
        for (digit, frame) in ('1'..='3').zip(FrameSize::ALL) {
            keys = keys.bind(
                Binding::new(
                    format!("M-{digit}"),
                    frame.to_string(),
                    vec![keymap::key_alt(digit)],
                ),
                Action::Frame(frame),
            );
        }
    }
    keys.bind(
        Binding::new(
            "^Q",
            "quit",
            vec![keymap::key_ctrl('q'), keymap::key_ctrl('c')],
        ),
        Action::Quit,
    )
}

pub(crate) fn point_in(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x
        && x < r.x.saturating_add(r.width)
        && y >= r.y
        && y < r.y.saturating_add(r.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::PrintError;
    use mdlive_core::input::KeyModifiers;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder {
        printed: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl PrintHost for Recorder {
        fn print(&mut self, document: &PrintDocument) -> Result<PathBuf, PrintError> {
            if self.fail {
                return Err(PrintError::Open {
                    path: PathBuf::from("/tmp/doc.html"),
                    source: std::io::Error::other("no browser"),
                });
            }
            self.printed.borrow_mut().push(document.to_html());
            Ok(PathBuf::from("/tmp/doc.html"))
        }
    }

    fn app_with(config: &AppConfig, initial: &str) -> (App, Recorder) {
        let recorder = Recorder::default();
        let app = App::new(config, initial, Box::new(recorder.clone()));
        (app, recorder)
    }

    fn new_app(initial: &str) -> (App, Recorder) {
        app_with(&AppConfig::default(), initial)
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
    }

    fn mouse(x: u16, y: u16, kind: MouseEventKind) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(x, y, kind))
    }

    fn with_layout(app: &mut App) {
        app.hits = HitMap {
            main: Rect::new(0, 1, 100, 20),
            editor: Rect::new(1, 2, 47, 18),
            divider: Rect::new(49, 1, 3, 20),
            preview: Rect::new(53, 2, 46, 18),
            frame_buttons: vec![
                (FrameSize::A4, Rect::new(9, 0, 4, 1)),
                (FrameSize::Letter, Rect::new(14, 0, 8, 1)),
                (FrameSize::FullWidth, Rect::new(23, 0, 12, 1)),
            ],
            print_button: Rect::new(76, 0, 24, 1),
        };
    }

    #[test]
    fn typing_reprojects_preview() {
        let (mut app, _) = new_app("");
        type_str(&mut app, "# Hi");
        assert_eq!(app.text(), "# Hi");
        assert_eq!(app.tree().to_html(), "<h1>Hi</h1>");
        assert_eq!(app.preview.tree().to_html(), "<h1>Hi</h1>");
    }

    #[test]
    fn paste_reaches_editor_only_when_focused() {
        let (mut app, _) = new_app("");
        app.handle_event(InputEvent::Paste("*a*".to_string()));
        assert_eq!(app.tree().to_html(), "<p><em>a</em></p>");

        app.perform(Action::ToggleFocus);
        app.handle_event(InputEvent::Paste("zzz".to_string()));
        assert_eq!(app.text(), "*a*");
    }

    #[test]
    fn ctrl_p_prints_current_tree_in_frame() {
        let (mut app, recorder) = new_app("# Notes");
        app.handle_event(InputEvent::Key(keymap::key_ctrl('p')));
        let printed = recorder.printed.borrow();
        assert_eq!(printed.len(), 1);
        assert!(printed[0].contains("<h1>Notes</h1>"));
        assert!(printed[0].contains("frame-a4"));
        assert_eq!(app.status(), Some("Print document: /tmp/doc.html"));
    }

    #[test]
    fn plain_p_types_in_editor_and_prints_in_preview() {
        let (mut app, recorder) = new_app("");
        type_str(&mut app, "p");
        assert_eq!(app.text(), "p");
        assert!(recorder.printed.borrow().is_empty());

        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.focus(), Focus::Preview);
        app.handle_event(key(KeyCode::Char('p')));
        assert_eq!(recorder.printed.borrow().len(), 1);
    }

    #[test]
    fn failed_print_reports_status_and_keeps_running() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut app = App::new(&AppConfig::default(), "x", Box::new(recorder));
        app.print();
        assert!(app.status().unwrap_or_default().contains("no browser"));
        assert!(!app.should_quit());
    }

    #[test]
    fn quit_bindings() {
        let (mut app, _) = new_app("");
        type_str(&mut app, "q");
        assert!(!app.should_quit());
        app.handle_event(InputEvent::Key(keymap::key_ctrl('q')));
        assert!(app.should_quit());

        let (mut app, _) = new_app("");
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn back_tab_toggles_focus() {
        let (mut app, _) = new_app("");
        app.handle_event(InputEvent::Key(
            KeyEvent::new(KeyCode::BackTab).with_modifiers(KeyModifiers {
                shift: true,
                ..KeyModifiers::none()
            }),
        ));
        assert_eq!(app.focus(), Focus::Preview);
    }

    #[test]
    fn drag_updates_ratio_only_inside_band() {
        let (mut app, _) = new_app("");
        with_layout(&mut app);

        app.handle_event(mouse(50, 5, MouseEventKind::Down(MouseButton::Left)));
        assert!(app.split().is_dragging());

        app.handle_event(mouse(30, 5, MouseEventKind::Drag(MouseButton::Left)));
        assert_eq!(app.split().ratio(), 30.0);
        app.handle_event(mouse(10, 5, MouseEventKind::Drag(MouseButton::Left)));
        assert_eq!(app.split().ratio(), 30.0);
        app.handle_event(mouse(85, 5, MouseEventKind::Drag(MouseButton::Left)));
        assert_eq!(app.split().ratio(), 30.0);
        app.handle_event(mouse(80, 5, MouseEventKind::Drag(MouseButton::Left)));
        assert_eq!(app.split().ratio(), 80.0);

        app.handle_event(mouse(95, 30, MouseEventKind::Up(MouseButton::Left)));
        assert!(!app.split().is_dragging());
        app.handle_event(mouse(40, 5, MouseEventKind::Moved));
        assert_eq!(app.split().ratio(), 80.0);
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let (mut app, _) = new_app("");
        with_layout(&mut app);
        app.handle_event(mouse(30, 5, MouseEventKind::Drag(MouseButton::Left)));
        assert_eq!(app.split().ratio(), 50.0);
    }

    #[test]
    fn frame_buttons_and_keys() {
        let (mut app, _) = new_app("");
        with_layout(&mut app);
        app.handle_event(mouse(15, 0, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(app.frame(), FrameSize::Letter);
        app.handle_event(InputEvent::Key(keymap::key_alt('3')));
        assert_eq!(app.frame(), FrameSize::FullWidth);
        app.handle_event(InputEvent::Key(keymap::key_alt('1')));
        assert_eq!(app.frame(), FrameSize::A4);
    }

    #[test]
    fn disabled_selector_pins_frame() {
        let config = AppConfig {
            frame_selector: false,
            frame_size: FrameSize::Letter,
            ..AppConfig::default()
        };
        let (mut app, _) = app_with(&config, "");
        app.handle_event(InputEvent::Key(keymap::key_alt('1')));
        app.set_frame(FrameSize::FullWidth);
        assert_eq!(app.frame(), FrameSize::Letter);
        assert_eq!(app.text(), "");
    }

    #[test]
    fn print_button_click_prints() {
        let (mut app, recorder) = new_app("text");
        with_layout(&mut app);
        app.handle_event(mouse(80, 0, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(recorder.printed.borrow().len(), 1);
    }

    #[test]
    fn clicks_move_focus() {
        let (mut app, _) = new_app("");
        with_layout(&mut app);
        app.handle_event(mouse(60, 5, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(app.focus(), Focus::Preview);
        app.handle_event(mouse(5, 5, MouseEventKind::Down(MouseButton::Left)));
        assert_eq!(app.focus(), Focus::Editor);
    }

    #[test]
    fn disabled_extensions_reach_projector() {
        let config = AppConfig {
            extensions: crate::config::Extensions {
                gfm: true,
                raw_html: false,
            },
            ..AppConfig::default()
        };
        let (app, _) = app_with(&config, "<b>x</b>");
        assert_eq!(app.tree().to_html(), "<p>&lt;b&gt;x&lt;/b&gt;</p>");
    }
}
