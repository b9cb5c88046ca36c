use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::TextArea;

use crate::domain::models::AssistantRef;
use crate::domain::models::Author;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::services::ActionsService;
use crate::domain::services::AppState;
use crate::domain::services::AppStateProps;
use crate::domain::services::ConversationService;
use crate::domain::services::EventsService;

const WAITING_FRAMES: [&str; 4] = ["   ", ".  ", ".. ", "..."];

/// Restores the terminal from outside the normal teardown path. Only called
/// from the panic hook, where there is nothing useful to do with failures.
pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        crossterm::cursor::Show
    );
}

pub async fn start_loop(
    conversation: Arc<ConversationService>,
    assistants: Vec<AssistantRef>,
) -> Result<()> {
    enable_raw_mode()?;
    execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let res = main_loop(&mut terminal, conversation, assistants).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}

fn build_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(Block::default().borders(Borders::ALL));
    textarea.set_placeholder_text("Write your message");
    textarea.set_cursor_line_style(Style::default());
    return textarea;
}

async fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    conversation: Arc<ConversationService>,
    assistants: Vec<AssistantRef>,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut events = EventsService::new(event_rx);
    let mut app_state = AppState::new(AppStateProps { assistants });
    let mut textarea = build_textarea();

    tokio::spawn(async move {
        if let Err(err) = ActionsService::start(conversation, event_tx, &mut action_rx).await {
            tracing::error!(error = ?err, "actions worker stopped");
        }
    });

    loop {
        terminal.draw(|frame| render(frame, &mut app_state, &textarea))?;

        match events.next().await? {
            Event::ThreadReady(thread_id) => app_state.handle_thread_ready(thread_id),
            Event::AssistantReply(text) => app_state.handle_reply(&text),
            Event::ConversationError(err) => app_state.handle_error(&err),
            Event::UITick => {
                if app_state.waiting_for_backend {
                    app_state.ticks += 1;
                }
            }
            Event::UIScrollUp => {
                if app_state.picker_open {
                    app_state.picker_up();
                } else {
                    app_state.scroll.up();
                }
            }
            Event::UIScrollDown => {
                if app_state.picker_open {
                    app_state.picker_down();
                } else {
                    app_state.scroll.down();
                }
            }
            Event::UIScrollPageUp => app_state.scroll.up_page(),
            Event::UIScrollPageDown => app_state.scroll.down_page(),
            Event::KeyboardCTRLC => {
                if app_state.waiting_for_backend && !app_state.exit_warning {
                    app_state.exit_warning = true;
                    app_state.add_message(Message::new(
                        Author::Parley,
                        "A run is still in flight and cannot be cancelled. Press CTRL+C again to quit anyway.",
                    ));
                    continue;
                }
                break;
            }
            Event::KeyboardCTRLL => {
                if !app_state.waiting_for_backend {
                    app_state.picker_open = true;
                }
            }
            Event::KeyboardCTRLO => {
                if !app_state.picker_open && !app_state.waiting_for_backend {
                    textarea.insert_newline();
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.picker_open && !app_state.waiting_for_backend {
                    textarea.insert_str(text.replace('\r', "\n"));
                }
            }
            Event::KeyboardCharInput(input) => {
                if app_state.picker_open {
                    // Esc backs out of the picker once a selection exists.
                    if input.key == tui_textarea::Key::Esc
                        && app_state.session.selected_assistant_id.is_some()
                    {
                        app_state.picker_open = false;
                    }
                } else if !app_state.waiting_for_backend {
                    textarea.input(input);
                }
            }
            Event::KeyboardEnter => {
                if app_state.picker_open {
                    app_state.confirm_selection();
                    continue;
                }
                if app_state.waiting_for_backend {
                    continue;
                }

                let text = textarea.lines().join("\n").trim().to_string();
                if text.is_empty() {
                    continue;
                }
                if ["/quit", "/exit", "/q"].contains(&text.as_str()) {
                    break;
                }

                app_state.submit(&text, &action_tx)?;
                textarea = build_textarea();
            }
        }
    }

    return Ok(());
}

fn render(frame: &mut Frame<'_>, app_state: &mut AppState, textarea: &TextArea<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    app_state.set_rect(layout[0]);

    let transcript = Paragraph::new(app_state.bubble_list.lines())
        .scroll((app_state.scroll.position, 0));
    frame.render_widget(transcript, layout[0]);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        layout[0],
        &mut app_state.scroll.scrollbar_state,
    );

    frame.render_widget(textarea, layout[1]);
    frame.render_widget(Paragraph::new(status_line(app_state)), layout[2]);

    if app_state.picker_open {
        render_picker(frame, app_state);
    }
}

fn status_line(app_state: &AppState) -> String {
    if app_state.waiting_for_backend {
        let frame = WAITING_FRAMES[app_state.ticks as usize % WAITING_FRAMES.len()];
        let name = app_state
            .selected_assistant()
            .map(|assistant| assistant.name.clone())
            .unwrap_or_else(|| "the assistant".to_string());
        return format!("Waiting for {name}{frame}");
    }

    return "Enter: send | CTRL+O: line break | CTRL+L: assistants | CTRL+C: quit".to_string();
}

fn render_picker(frame: &mut Frame<'_>, app_state: &AppState) {
    let area = centered_rect(frame.area(), 50, app_state.assistants.len() as u16 + 2);

    let items = app_state
        .assistants
        .iter()
        .map(|assistant| ListItem::new(assistant.name.clone()))
        .collect::<Vec<ListItem>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select an assistant"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(app_state.picker_index));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    return Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
}
