use std::path::PathBuf;

use mdlive::app::App;
use mdlive::app::Focus;
use mdlive::config::AppConfig;
use mdlive::print::PrintError;
use mdlive::print::PrintHost;
use mdlive::sample::SAMPLE_DOCUMENT;
use mdlive::ui;
use mdlive_core::input::InputEvent;
use mdlive_core::input::KeyCode;
use mdlive_core::input::KeyEvent;
use mdlive_core::input::MouseButton;
use mdlive_core::input::MouseEvent;
use mdlive_core::input::MouseEventKind;
use mdlive_markdown::document::FrameSize;
use mdlive_markdown::document::PrintDocument;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

struct NoopPrinter;

impl PrintHost for NoopPrinter {
    fn print(&mut self, _document: &PrintDocument) -> Result<PathBuf, PrintError> {
        Ok(PathBuf::from("out.html"))
    }
}

fn app(initial: &str) -> App {
    App::new(&AppConfig::default(), initial, Box::new(NoopPrinter))
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) {
    terminal
        .draw(|f| {
            if let Some(pos) = app.draw(f) {
                f.set_cursor_position(pos);
            }
        })
        .unwrap();
}

fn row(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" ").to_string())
        .collect()
}

fn screen(buf: &Buffer) -> String {
    (0..buf.area.height)
        .map(|y| row(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn press(app: &mut App, x: u16, y: u16) {
    app.handle_event(InputEvent::Mouse(MouseEvent::new(
        x,
        y,
        MouseEventKind::Down(MouseButton::Left),
    )));
}

#[test]
fn draws_header_panes_and_help() {
    let mut terminal = Terminal::new(TestBackend::new(120, 60)).unwrap();
    let mut app = app(SAMPLE_DOCUMENT);
    draw(&mut terminal, &mut app);
    let buf = terminal.backend().buffer().clone();

    let header = row(&buf, 0);
    assert!(header.starts_with(ui::APP_TITLE));
    assert!(header.contains(" A4 "));
    assert!(header.contains(" Letter "));
    assert!(header.contains(" Full Width "));
    assert!(header.trim_end().ends_with(ui::PRINT_LABEL.trim_end()));

    let text = screen(&buf);
    assert!(text.contains(ui::EDITOR_TITLE));
    assert!(text.contains("Preview (A4)"));
    assert!(text.contains(" javascript "));
    assert!(row(&buf, 59).contains("print"));
}

#[test]
fn empty_editor_shows_placeholder() {
    let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
    let mut app = app("");
    draw(&mut terminal, &mut app);
    let text = screen(terminal.backend().buffer());
    assert!(text.contains("Type your markdown here..."));
}

#[test]
fn dragging_the_drawn_divider_resizes_panes() {
    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    let mut app = app("text");
    draw(&mut terminal, &mut app);

    let divider = app.hits().divider;
    assert_eq!(divider.width, 3);
    press(&mut app, divider.x + 1, divider.y + 2);
    assert!(app.split().is_dragging());

    app.handle_event(InputEvent::Mouse(MouseEvent::new(
        25,
        5,
        MouseEventKind::Drag(MouseButton::Left),
    )));
    app.handle_event(InputEvent::Mouse(MouseEvent::new(
        25,
        5,
        MouseEventKind::Up(MouseButton::Left),
    )));
    assert_eq!(app.split().ratio(), 25.0);
    assert!(!app.split().is_dragging());

    draw(&mut terminal, &mut app);
    let (left, _) = app.split().pane_widths(100, 1);
    assert_eq!(app.hits().editor.width, left - 2);
}

#[test]
fn clicking_drawn_buttons_changes_frame() {
    let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
    let mut app = app("# T");
    draw(&mut terminal, &mut app);

    let (_, full) = app
        .hits()
        .frame_buttons
        .iter()
        .copied()
        .find(|(frame, _)| *frame == FrameSize::FullWidth)
        .unwrap();
    press(&mut app, full.x, full.y);
    assert_eq!(app.frame(), FrameSize::FullWidth);

    draw(&mut terminal, &mut app);
    assert!(screen(terminal.backend().buffer()).contains("Preview (Full Width)"));

    let print = app.hits().print_button;
    press(&mut app, print.x + 1, print.y);
    assert_eq!(app.status(), Some("Print document: out.html"));
}

#[test]
fn cursor_follows_typing_and_hides_in_preview() {
    let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
    let mut app = app("");
    draw(&mut terminal, &mut app);
    let editor = app.hits().editor;

    app.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Char('a'))));
    draw(&mut terminal, &mut app);
    assert_eq!(
        terminal.get_cursor_position().unwrap(),
        (editor.x + 1, editor.y).into()
    );

    app.handle_event(InputEvent::Key(KeyEvent::new(KeyCode::Tab)));
    assert_eq!(app.focus(), Focus::Preview);
}

#[test]
fn tiny_terminal_does_not_panic() {
    for (w, h) in [(1, 1), (3, 2), (10, 3), (30, 4)] {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        let mut app = app(SAMPLE_DOCUMENT);
        draw(&mut terminal, &mut app);
    }
}

mod drag_properties {
    use super::*;
    use mdlive_core::split::MAX_RATIO;
    use mdlive_core::split::MIN_RATIO;
    use proptest::prelude::*;

    fn pointer() -> impl Strategy<Value = MouseEventKind> {
        prop_oneof![
            Just(MouseEventKind::Down(MouseButton::Left)),
            Just(MouseEventKind::Drag(MouseButton::Left)),
            Just(MouseEventKind::Up(MouseButton::Left)),
            Just(MouseEventKind::Moved),
        ]
    }

    proptest! {
        #[test]
        fn ratio_stays_in_band(
            events in prop::collection::vec((0u16..100, 0u16..20, pointer()), 0..40)
        ) {
            let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
            let mut app = app("x");
            draw(&mut terminal, &mut app);
            for (x, y, kind) in events {
                app.handle_event(InputEvent::Mouse(MouseEvent::new(x, y, kind)));
                let ratio = app.split().ratio();
                prop_assert!((MIN_RATIO..=MAX_RATIO).contains(&ratio));
                if kind == MouseEventKind::Up(MouseButton::Left) {
                    prop_assert!(!app.split().is_dragging());
                }
            }
        }
    }
}
