use anyhow::{anyhow, Result};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::agent::AgentTag;
use crate::client::{BackendClient, ChatResponse};
use crate::controller::QueryController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub controller: QueryController,

    // Transport
    pub client: BackendClient,
    pub query_task: Option<JoinHandle<Result<ChatResponse>>>,

    // Input state
    pub query_input: String,
    pub query_cursor: usize, // cursor position in query_input, in chars

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height, for scroll calculations
    pub chat_width: u16,  // inner width, for wrap calculations
    pub chat_area: Option<Rect>, // for mouse hit-testing (updated during render)

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Agent picker state
    pub show_agent_picker: bool,
    pub agent_picker_state: ListState,
}

impl App {
    pub fn new(backend_url: &str, initial_agent: AgentTag) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            controller: QueryController::new(initial_agent),
            client: BackendClient::new(backend_url),
            query_task: None,
            query_input: String::new(),
            query_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,
            animation_frame: 0,
            show_agent_picker: false,
            agent_picker_state: ListState::default(),
        }
    }

    /// Start a query for the current input. The controller enforces the
    /// single-flight guard and the blank-input rejection; when it refuses,
    /// nothing changes and the input is kept for the user to edit.
    pub fn submit_query(&mut self) {
        let Some(request) = self.controller.dispatch(&self.query_input) else {
            return;
        };

        self.query_input.clear();
        self.query_cursor = 0;
        self.scroll_chat_to_bottom();

        let client = self.client.clone();
        self.query_task = Some(tokio::spawn(async move { client.send(&request).await }));
    }

    /// Resolve the in-flight query once its task has finished. Called from
    /// the event loop on every tick; does nothing while the request is still
    /// outstanding.
    pub async fn reap_query(&mut self) {
        let finished = self
            .query_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.query_task.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(join_error) => Err(anyhow!("query task aborted: {join_error}")),
            };
            self.controller.resolve(result);
            // Resolution clears the input even if text was typed in flight.
            self.query_input.clear();
            self.query_cursor = 0;
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.controller.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Scroll the chat so the latest message (or the typing indicator) is
    /// visible. Line counts are estimated with the same wrap width the chat
    /// pane renders with; blocks never merge or drop source lines, so the
    /// raw line count is close enough.
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.controller.conversation().snapshot() {
            total_lines += 1; // Role line ("Você:" or "Ana:")
            total_lines += wrapped_line_count(&msg.content, wrap_width);
            total_lines += 1; // Blank line after message
        }

        if self.controller.is_pending() {
            total_lines += 2; // "Ana:" + typing indicator
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    // Agent selection
    pub fn select_agent(&mut self, tag: AgentTag) {
        self.controller.select_agent(tag);
    }

    pub fn open_agent_picker(&mut self) {
        let current_idx = AgentTag::all()
            .iter()
            .position(|t| *t == self.controller.current_agent())
            .unwrap_or(0);
        self.agent_picker_state.select(Some(current_idx));
        self.show_agent_picker = true;
    }

    pub fn agent_picker_nav_down(&mut self) {
        let len = AgentTag::all().len();
        let i = self.agent_picker_state.selected().unwrap_or(0);
        self.agent_picker_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn agent_picker_nav_up(&mut self) {
        let i = self.agent_picker_state.selected().unwrap_or(0);
        self.agent_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn confirm_agent_picker(&mut self) {
        if let Some(i) = self.agent_picker_state.selected() {
            if let Some(&tag) = AgentTag::all().get(i) {
                self.select_agent(tag);
            }
        }
        self.show_agent_picker = false;
    }
}

fn wrapped_line_count(content: &str, wrap_width: usize) -> u16 {
    let mut lines: u16 = 0;
    for line in content.lines() {
        // Use character count, not byte length, for proper UTF-8 handling
        let char_count = line.chars().count();
        if char_count == 0 {
            lines += 1; // Empty line still takes one line
        } else {
            lines += ((char_count / wrap_width.max(1)) + 1) as u16;
        }
    }
    lines
}
