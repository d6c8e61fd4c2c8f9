use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use indexmap::IndexMap;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::Store;
use crate::model::{DEFAULT_LEAD_TYPE, Lead, LeadId, NewLead, Note, Stage, StageId, Task};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::command::Command;
use super::dispatch::Dispatcher;
use super::message::Message;
use super::render;
use super::theme::Theme;
use super::update::update;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Board,
    LeadList,
    LeadDetail,
    NewLead,
    TaskList,
    Help,
}

/// Screens that can open a lead's detail and be returned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnView {
    Board,
    LeadList,
    TaskList,
}

impl ReturnView {
    pub fn view(self) -> View {
        match self {
            ReturnView::Board => View::Board,
            ReturnView::LeadList => View::LeadList,
            ReturnView::TaskList => View::TaskList,
        }
    }

    /// Name stored in state.json
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnView::Board => "board",
            ReturnView::LeadList => "leads",
            ReturnView::TaskList => "tasks",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "board" => Some(ReturnView::Board),
            "leads" => Some(ReturnView::LeadList),
            "tasks" => Some(ReturnView::TaskList),
            _ => None,
        }
    }
}

/// The single status/error slot shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Status(String),
    Error(String),
}

/// Intent to put the cursor on a lead after it moves stages. Consumed by
/// the next board reload, whichever request that reload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSelection {
    pub lead_id: LeadId,
    pub stage_id: StageId,
}

/// A single-line text input with a byte-offset cursor on a grapheme boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
    pub placeholder: &'static str,
    /// Maximum length in chars
    pub char_limit: Option<usize>,
}

impl TextField {
    pub fn new(placeholder: &'static str) -> Self {
        TextField {
            placeholder,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn insert(&mut self, c: char) {
        if self
            .char_limit
            .is_some_and(|limit| self.value.chars().count() >= limit)
        {
            return;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.value, self.cursor) {
            self.value.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.value, self.cursor) {
            self.value.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.value, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }
}

/// Board projection: stages, their leads, and the two cursors
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub stages: Vec<Stage>,
    /// Replaced wholesale by each reload; a missing key means no leads
    pub by_stage: IndexMap<StageId, Vec<Lead>>,
    pub stage_index: usize,
    pub lead_index: usize,
    pub loaded: bool,
    pub pending: Option<PendingSelection>,
    /// Stage to re-select on the first reload after startup
    pub restore_stage: Option<StageId>,
}

impl PipelineState {
    pub fn leads_in(&self, stage_id: StageId) -> &[Lead] {
        self.by_stage
            .get(&stage_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        self.stages.get(self.stage_index)
    }

    pub fn current_leads(&self) -> &[Lead] {
        self.current_stage()
            .map(|stage| self.leads_in(stage.id))
            .unwrap_or_default()
    }

    pub fn selected_lead(&self) -> Option<&Lead> {
        self.current_leads().get(self.lead_index)
    }

    /// Pull both cursors back inside their collections (0 when empty).
    pub fn clamp(&mut self) {
        self.stage_index = clamp_index(self.stage_index, self.stages.len());
        self.lead_index = clamp_index(self.lead_index, self.current_leads().len());
    }
}

/// Focus within the lead list screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadsFocus {
    List,
    Search,
}

#[derive(Debug, Clone)]
pub struct LeadsState {
    pub leads: Vec<Lead>,
    pub index: usize,
    pub search: TextField,
    /// Query of the last submitted search
    pub query: String,
    pub focus: LeadsFocus,
    pub loaded: bool,
}

impl Default for LeadsState {
    fn default() -> Self {
        LeadsState {
            leads: Vec::new(),
            index: 0,
            search: TextField::new("Search leads (name, phone, email, source)…"),
            query: String::new(),
            focus: LeadsFocus::List,
            loaded: false,
        }
    }
}

impl LeadsState {
    pub fn selected(&self) -> Option<&Lead> {
        self.leads.get(self.index)
    }

    /// Case-insensitive literal matcher for the applied query
    pub fn highlight_re(&self) -> Option<Regex> {
        if self.query.is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(&self.query))).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TasksState {
    pub tasks: Vec<Task>,
    pub index: usize,
    pub loaded: bool,
}

impl TasksState {
    pub fn selected(&self) -> Option<&Task> {
        self.tasks.get(self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddNoteForm {
    pub body: TextField,
}

pub const NOTE_CHAR_LIMIT: usize = 500;

impl Default for AddNoteForm {
    fn default() -> Self {
        AddNoteForm {
            body: TextField::new("Write a note and press enter…").with_limit(NOTE_CHAR_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Due,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTaskForm {
    pub title: TextField,
    pub due: TextField,
    pub field: TaskField,
}

impl Default for AddTaskForm {
    fn default() -> Self {
        AddTaskForm {
            title: TextField::new("Follow-up task (e.g. Call about pre-approval)…"),
            due: TextField::new("Due date (YYYY-MM-DD) optional"),
            field: TaskField::Title,
        }
    }
}

impl AddTaskForm {
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.field {
            TaskField::Title => &mut self.title,
            TaskField::Due => &mut self.due,
        }
    }
}

/// What holds input on the lead detail screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailFocus {
    Tasks,
    Note(AddNoteForm),
    Task(AddTaskForm),
}

/// Snapshot of one lead with its tasks and notes
#[derive(Debug, Clone)]
pub struct LeadDetailState {
    pub lead: Lead,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub task_index: usize,
    pub focus: DetailFocus,
    pub return_to: ReturnView,
}

impl LeadDetailState {
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.task_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewLeadField {
    Name,
    Phone,
    Email,
    Type,
    Source,
}

impl NewLeadField {
    pub const ALL: [NewLeadField; 5] = [
        NewLeadField::Name,
        NewLeadField::Phone,
        NewLeadField::Email,
        NewLeadField::Type,
        NewLeadField::Source,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NewLeadField::Name => "Name",
            NewLeadField::Phone => "Phone",
            NewLeadField::Email => "Email",
            NewLeadField::Type => "Type",
            NewLeadField::Source => "Source",
        }
    }

    pub fn next(self) -> Option<Self> {
        let i = Self::ALL.iter().position(|f| *f == self)?;
        Self::ALL.get(i + 1).copied()
    }

    pub fn prev(self) -> Option<Self> {
        let i = Self::ALL.iter().position(|f| *f == self)?;
        i.checked_sub(1).map(|i| Self::ALL[i])
    }
}

#[derive(Debug, Clone)]
pub struct NewLeadForm {
    pub name: TextField,
    pub phone: TextField,
    pub email: TextField,
    pub lead_type: TextField,
    pub source: TextField,
    pub field: NewLeadField,
    /// Stage the lead will be created in; `None` means the first stage
    pub stage_id: Option<StageId>,
}

impl NewLeadForm {
    pub fn new(stage_id: Option<StageId>) -> Self {
        NewLeadForm {
            name: TextField::new("Full name"),
            phone: TextField::new("Phone"),
            email: TextField::new("Email"),
            lead_type: TextField::new("Lead type: buyer/seller/other").with_value(DEFAULT_LEAD_TYPE),
            source: TextField::new("Source: Zillow, referral, sign call…"),
            field: NewLeadField::Name,
            stage_id,
        }
    }

    pub fn field(&self, field: NewLeadField) -> &TextField {
        match field {
            NewLeadField::Name => &self.name,
            NewLeadField::Phone => &self.phone,
            NewLeadField::Email => &self.email,
            NewLeadField::Type => &self.lead_type,
            NewLeadField::Source => &self.source,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.field {
            NewLeadField::Name => &mut self.name,
            NewLeadField::Phone => &mut self.phone,
            NewLeadField::Email => &mut self.email,
            NewLeadField::Type => &mut self.lead_type,
            NewLeadField::Source => &mut self.source,
        }
    }

    pub fn to_new_lead(&self) -> NewLead {
        NewLead {
            full_name: self.name.value.clone(),
            phone: self.phone.value.clone(),
            email: self.email.value.clone(),
            lead_type: self.lead_type.value.clone(),
            source: self.source.value.clone(),
        }
        .normalized()
    }
}

/// Main application state
pub struct App {
    pub view: View,
    /// Screen to go back to when help closes
    pub help_return: View,
    pub should_quit: bool,
    pub theme: Theme,
    pub pipeline: PipelineState,
    pub leads: LeadsState,
    pub tasks: TasksState,
    pub detail: Option<LeadDetailState>,
    pub new_lead: Option<NewLeadForm>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        App {
            view: View::Board,
            help_return: View::Board,
            should_quit: false,
            theme,
            pipeline: PipelineState::default(),
            leads: LeadsState::default(),
            tasks: TasksState::default(),
            detail: None,
            new_lead: None,
            notice: None,
        }
    }

    /// True when a text field holds input focus; global shortcuts are off.
    pub fn is_typing(&self) -> bool {
        match self.view {
            View::NewLead => true,
            View::LeadList => self.leads.focus == LeadsFocus::Search,
            View::LeadDetail => self
                .detail
                .as_ref()
                .is_some_and(|d| d.focus != DetailFocus::Tasks),
            View::Board | View::TaskList | View::Help => false,
        }
    }

    /// The top-level screen behind whatever is showing
    pub fn top_level(&self) -> ReturnView {
        let view = if self.view == View::Help {
            self.help_return
        } else {
            self.view
        };
        match view {
            View::LeadList => ReturnView::LeadList,
            View::TaskList => ReturnView::TaskList,
            View::LeadDetail => self
                .detail
                .as_ref()
                .map_or(ReturnView::Board, |d| d.return_to),
            View::Board | View::NewLead | View::Help => ReturnView::Board,
        }
    }

    /// Loads issued when the loop starts
    pub fn initial_commands(&self) -> Vec<Command> {
        vec![
            Command::LoadBoard,
            Command::LoadLeads {
                query: self.leads.query.clone(),
            },
            Command::LoadOpenTasks,
        ]
    }

    pub fn restore(&mut self, state: &UiState) {
        if let Some(view) = ReturnView::parse(&state.view) {
            self.view = view.view();
        }
        if let Some(query) = &state.last_search {
            let query = query.trim();
            self.leads.query = query.to_string();
            self.leads.search.set_value(query);
        }
        self.pipeline.restore_stage = state.stage_id;
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            view: self.top_level().as_str().to_string(),
            last_search: (!self.leads.query.is_empty()).then(|| self.leads.query.clone()),
            // Before the first board reload the restored stage still stands
            stage_id: self
                .pipeline
                .current_stage()
                .map(|s| s.id)
                .or(self.pipeline.restore_stage),
        }
    }
}

/// Clamp an index into `[0, len - 1]`, or 0 for an empty collection.
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Run the TUI against `store`, restoring and saving UI state at `state_path`.
pub fn run(
    store: Arc<dyn Store>,
    theme: Theme,
    state_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(theme);
    if let Some(saved) = read_ui_state(state_path) {
        app.restore(&saved);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("pipeboard-worker")
        .build()?;
    let (tx, rx) = unbounded_channel();
    let dispatcher = Dispatcher::new(store, runtime.handle().clone(), tx.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before any panic output
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    spawn_input_thread(tx);
    let result = runtime.block_on(run_event_loop(&mut terminal, &mut app, &dispatcher, rx));

    if let Err(e) = write_ui_state(state_path, &app.ui_state()) {
        tracing::warn!(path = %state_path.display(), error = %e, "could not save ui state");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    drop(dispatcher);
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Forward terminal events into the loop's queue until it closes.
fn spawn_input_thread(tx: UnboundedSender<Message>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(Message::Input(ev)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal read failed");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "terminal poll failed");
                    break;
                }
            }
        }
    })
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher,
    mut rx: UnboundedReceiver<Message>,
) -> Result<(), Box<dyn std::error::Error>> {
    dispatcher.dispatch(app.initial_commands());
    terminal.draw(|frame| render::render(frame, app))?;

    while let Some(msg) = rx.recv().await {
        let commands = update(app, msg);
        if app.should_quit {
            break;
        }
        dispatcher.dispatch(commands);
        terminal.draw(|frame| render::render(frame, app))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_field_edits_on_grapheme_boundaries() {
        let mut f = TextField::new("");
        for c in "Zoe".chars() {
            f.insert(c);
        }
        f.insert('\u{0301}');
        assert_eq!(f.value, "Zoe\u{0301}");
        f.backspace();
        assert_eq!(f.value, "Zo");
        f.home();
        f.delete();
        assert_eq!(f.value, "o");
        f.end();
        f.insert('!');
        f.left();
        f.left();
        f.insert('J');
        assert_eq!(f.value, "Jo!");
        assert_eq!(f.cursor, 1);
        f.right();
        f.right();
        f.right();
        assert_eq!(f.cursor, 3);
    }

    #[test]
    fn text_field_respects_char_limit() {
        let mut f = TextField::new("").with_limit(3);
        for c in "abcd".chars() {
            f.insert(c);
        }
        assert_eq!(f.value, "abc");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut f = TextField::new("").with_value("ab");
        f.home();
        f.backspace();
        assert_eq!(f.value, "ab");
        assert_eq!(f.cursor, 0);
    }

    #[test]
    fn new_lead_fields_step_linearly() {
        assert_eq!(NewLeadField::Name.next(), Some(NewLeadField::Phone));
        assert_eq!(NewLeadField::Source.next(), None);
        assert_eq!(NewLeadField::Name.prev(), None);
        assert_eq!(NewLeadField::Type.prev(), Some(NewLeadField::Email));
    }

    #[test]
    fn new_lead_form_normalizes() {
        let mut form = NewLeadForm::new(None);
        assert_eq!(form.lead_type.value, "buyer");
        form.name.set_value("  Jane Roe ");
        form.lead_type.set_value(" Seller ");
        let lead = form.to_new_lead();
        assert_eq!(lead.full_name, "Jane Roe");
        assert_eq!(lead.lead_type, "seller");
    }

    #[test]
    fn typing_follows_focus() {
        let mut app = App::new(Theme::default());
        assert!(!app.is_typing());
        app.view = View::LeadList;
        assert!(!app.is_typing());
        app.leads.focus = LeadsFocus::Search;
        assert!(app.is_typing());
        app.view = View::NewLead;
        assert!(app.is_typing());
        app.view = View::Help;
        assert!(!app.is_typing());
    }

    #[test]
    fn clamp_handles_shrink_and_empty() {
        assert_eq!(clamp_index(5, 3), 2);
        assert_eq!(clamp_index(1, 3), 1);
        assert_eq!(clamp_index(4, 0), 0);
    }

    #[test]
    fn quitting_before_the_board_loads_keeps_the_saved_stage() {
        let mut app = App::new(Theme::default());
        app.restore(&UiState {
            view: "board".into(),
            last_search: None,
            stage_id: Some(StageId(3)),
        });
        assert!(!app.pipeline.loaded);
        assert_eq!(app.ui_state().stage_id, Some(StageId(3)));
    }

    #[test]
    fn ui_state_round_trip_through_app() {
        let mut app = App::new(Theme::default());
        app.restore(&UiState {
            view: "leads".into(),
            last_search: Some(" roe ".into()),
            stage_id: Some(StageId(2)),
        });
        assert_eq!(app.view, View::LeadList);
        assert_eq!(app.leads.query, "roe");
        assert_eq!(app.leads.search.value, "roe");
        assert_eq!(app.pipeline.restore_stage, Some(StageId(2)));

        let saved = app.ui_state();
        assert_eq!(saved.view, "leads");
        assert_eq!(saved.last_search.as_deref(), Some("roe"));
        assert_eq!(saved.stage_id, None);
    }

    #[test]
    fn unknown_saved_view_keeps_board() {
        let mut app = App::new(Theme::default());
        app.restore(&UiState {
            view: "inbox".into(),
            ..Default::default()
        });
        assert_eq!(app.view, View::Board);
        assert_eq!(app.ui_state().view, "board");
    }
}
