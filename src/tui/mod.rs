// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Drives a [`Workspace`] from crossterm key and mouse events and draws it with ratatui: header,
//! user need, the map canvas, the stage ruler and the footer, plus the map manager, help and
//! recovery overlays.

use std::{
    borrow::Cow,
    collections::BTreeMap,
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::layout::CanvasGrid;
use crate::model::{now_millis, ComponentId, ComponentType, Diagram, DiagramId, Position};
use crate::render::{render_map, stage_ruler, Hit, MapCanvas, RenderOptions};
use crate::workspace::{Command, Outcome, Workspace};

mod editor;
mod filter;
mod gesture;
mod hints;
mod theme;

use editor::{EditAction, LineEditor};
use gesture::{Cell, Gesture, GestureConfig, GestureRecognizer};
use hints::{HintAction, HintTarget};
use theme::TuiTheme;

const FOOTER_BRAND: &str = "evomap";
const HINT_CHARS: &str = "ASDFJKLEWCMPGH";
const NUDGE_STEP: f64 = 1.0;
const NUDGE_STEP_LARGE: f64 = 10.0;
const TOAST_TTL: Duration = Duration::from_secs(2);

/// Runs the interactive terminal UI until the user quits.
pub fn run(workspace: Workspace) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(workspace, theme, copy_to_clipboard);

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                Event::FocusLost => app.handle_focus_lost(),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    app.expire_toast(Instant::now());
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    if app.workspace.session().active_diagram().is_none() {
        app.map = None;
        app.frame = FrameLayout::default();
        render_recovery(frame, app, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, rows[0]);
    render_user_need(frame, app, rows[1]);
    render_canvas(frame, app, rows[2]);
    render_ruler(frame, app, rows[3]);
    render_footer(frame, app, rows[4]);

    match app.panel {
        Panel::None => {
            app.frame.manager = Rect::default();
            app.frame.manager_list = Rect::default();
        }
        Panel::Manager => render_manager(frame, app, area),
        Panel::Help => render_help(frame, app, area),
    }
}

fn render_canvas(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let status = app.canvas_status();
    let focused = app.workspace.draw().is_drawing() || app.drag.is_some();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_style(focused))
        .title(Line::from(Span::styled(
            " ▲ Value Chain (visible) ",
            app.theme.dim_style(),
        )))
        .title(Line::from(Span::styled(status, app.theme.accent_style())).right_aligned())
        .title_bottom(Line::from(Span::styled(" ▼ invisible ", app.theme.dim_style())));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.frame.canvas = inner;

    let rendered = {
        let Some(diagram) = app.view_diagram() else {
            return;
        };
        let options = app.render_options();
        match render_map(&diagram, inner.width, inner.height, &options) {
            Ok(map) => {
                let lines = canvas_lines(app, &diagram, &map);
                Some((map, lines))
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to render map");
                None
            }
        }
    };
    let Some((map, lines)) = rendered else {
        app.map = None;
        return;
    };
    app.map = Some(map);
    frame.render_widget(Paragraph::new(lines), inner);

    if let HintMode::Awaiting { typed, targets, .. } = &app.hint_mode {
        let style = app.theme.hint_style();
        for target in targets.iter().filter(|t| t.label.starts_with(typed.as_str())) {
            let x = inner.x.saturating_add(target.x as u16);
            let y = inner.y.saturating_add(target.y as u16);
            if x >= inner.right() || y >= inner.bottom() {
                continue;
            }
            let room = usize::from(inner.right() - x);
            let label = target.label.chars().take(room).collect::<String>();
            frame.buffer_mut().set_string(x, y, label, style);
        }
    }
}

fn canvas_lines(app: &App, diagram: &Diagram, map: &MapCanvas) -> Vec<Line<'static>> {
    let types = diagram
        .nodes()
        .iter()
        .map(|component| (component.id(), component.component_type()))
        .collect::<BTreeMap<_, _>>();

    let mut lines = Vec::with_capacity(map.height());
    for y in 0..map.height() {
        let mut spans = Vec::<Span<'static>>::new();
        let mut run = String::new();
        let mut run_style = Style::default();
        for x in 0..map.width() {
            let style = app.cell_style(map.hit_at(x, y), &types);
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            run.push(map.char_at(x, y).unwrap_or(' '));
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

// Header, user need, ruler, footer, panels and their helpers.
include!("chrome.rs");

#[derive(Debug, Clone, Copy, Default)]
struct FrameLayout {
    name: Rect,
    need_title: Rect,
    need_description: Rect,
    canvas: Rect,
    manager: Rect,
    manager_list: Rect,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
struct DragPreview {
    id: ComponentId,
    position: Position,
    /// Grab point relative to the badge anchor, in cells.
    grab: (i32, i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditTarget {
    MapName,
    UserNeedTitle,
    UserNeedDescription,
    Component(ComponentId),
}

#[derive(Debug, Clone)]
struct Editing {
    target: EditTarget,
    editor: LineEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    None,
    Manager,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HintKind {
    Component,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HintMode {
    Inactive,
    Awaiting {
        kind: HintKind,
        typed: String,
        targets: Vec<HintTarget>,
    },
}

#[derive(Debug, Default)]
struct ManagerState {
    cursor: usize,
    filter: LineEditor,
    filtering: bool,
    confirm_delete: Option<DiagramId>,
    list_state: ListState,
}

type Clipboard = fn(&str) -> Result<&'static str, String>;

pub(crate) struct App {
    workspace: Workspace,
    theme: TuiTheme,
    clipboard: Clipboard,
    gestures: GestureRecognizer,
    selected: Option<ComponentId>,
    hover: Hit,
    drag: Option<DragPreview>,
    editing: Option<Editing>,
    panel: Panel,
    manager: ManagerState,
    hint_mode: HintMode,
    help_scroll: u16,
    help_viewport_height: u16,
    toast: Option<Toast>,
    frame: FrameLayout,
    map: Option<MapCanvas>,
    should_quit: bool,
}

impl App {
    fn new(workspace: Workspace, theme: TuiTheme, clipboard: Clipboard) -> Self {
        let mut app = Self {
            workspace,
            theme,
            clipboard,
            gestures: GestureRecognizer::new(GestureConfig::default()),
            selected: None,
            hover: Hit::Background,
            drag: None,
            editing: None,
            panel: Panel::None,
            manager: ManagerState::default(),
            hint_mode: HintMode::Inactive,
            help_scroll: 0,
            help_viewport_height: 0,
            toast: None,
            frame: FrameLayout::default(),
            map: None,
            should_quit: false,
        };
        app.surface_store_error();
        app
    }

    fn active_diagram(&self) -> Option<&Diagram> {
        self.workspace.session().active_diagram()
    }

    fn is_drawing(&self) -> bool {
        self.workspace.draw().is_drawing()
    }

    /// The active diagram with any in-flight drag applied.
    fn view_diagram(&self) -> Option<Cow<'_, Diagram>> {
        let diagram = self.active_diagram()?;
        let Some(drag) = &self.drag else {
            return Some(Cow::Borrowed(diagram));
        };
        let mut preview = diagram.clone();
        if let Some(component) = preview.component_mut(&drag.id) {
            component.set_position(drag.position);
        }
        Some(Cow::Owned(preview))
    }

    fn hovered_component(&self) -> Option<&ComponentId> {
        match &self.hover {
            Hit::Component(id) | Hit::RemoveButton(id) => Some(id),
            _ => None,
        }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hovered_component: self
                .hovered_component()
                .or(self.selected.as_ref())
                .cloned(),
            max_label_width: None,
        }
    }

    fn cell_style(&self, hit: &Hit, types: &BTreeMap<&ComponentId, ComponentType>) -> Style {
        match hit {
            Hit::Background => self.theme.base_style(),
            Hit::Divider => self.theme.divider_style(),
            Hit::Edge { from, to } => {
                let hovered = matches!(&self.hover, Hit::Edge { from: f, to: t } if f == from && t == to);
                let touches_selection = self
                    .selected
                    .as_ref()
                    .is_some_and(|id| id == from || id == to);
                if hovered {
                    self.theme.edge_style(true)
                } else if touches_selection {
                    self.theme.accent_style()
                } else {
                    self.theme.edge_style(false)
                }
            }
            Hit::Component(id) => {
                if self.workspace.draw().from_id() == Some(id) {
                    return self.theme.source_style();
                }
                let style = self
                    .theme
                    .component_style(types.get(id).copied().unwrap_or_default());
                if self.selected.as_ref() == Some(id) {
                    style.patch(self.theme.selection_style())
                } else {
                    style
                }
            }
            Hit::RemoveButton(_) => self.theme.error_style().add_modifier(Modifier::BOLD),
        }
    }

    fn canvas_status(&self) -> String {
        let name_of = |id: &ComponentId| {
            self.active_diagram()
                .and_then(|diagram| diagram.component(id))
                .map_or_else(|| id.to_string(), |component| component.name().to_owned())
        };
        if let Some(drag) = &self.drag {
            return format!(" Moving {} ", name_of(&drag.id));
        }
        match self.workspace.draw().from_id() {
            Some(from) => format!(" Drawing: {} depends on… ", name_of(from)),
            None if self.is_drawing() => " Drawing: pick the dependent component ".to_owned(),
            None => String::new(),
        }
    }

    // ----- commands -------------------------------------------------------------------------

    fn dispatch(&mut self, command: Command) -> Outcome {
        let before = self.workspace.session().active_diagram_id().cloned();
        let outcome = self.workspace.dispatch(command);
        match &outcome {
            Outcome::Rejected(err) => self.set_toast(err.to_string()),
            Outcome::Blank => self.set_toast("Empty text ignored"),
            Outcome::Applied(_) | Outcome::Unchanged => {}
        }
        self.surface_store_error();
        if self.workspace.session().active_diagram_id() != before.as_ref() {
            self.forget_view_state();
        }
        self.reconcile();
        outcome
    }

    fn surface_store_error(&mut self) {
        if let Some(err) = self.workspace.take_error() {
            self.set_toast(format!("Storage error: {err}"));
        }
    }

    /// Drops per-map view state after the active map changed.
    fn forget_view_state(&mut self) {
        self.selected = None;
        self.hover = Hit::Background;
        self.drag = None;
        self.editing = None;
        self.hint_mode = HintMode::Inactive;
        self.gestures.reset();
    }

    /// Clears references to components that no longer exist.
    fn reconcile(&mut self) {
        let diagram = self.workspace.session().active_diagram();
        let exists = |id: &ComponentId| diagram.is_some_and(|d| d.component(id).is_some());

        if self.selected.as_ref().is_some_and(|id| !exists(id)) {
            self.selected = None;
        }
        if self.drag.as_ref().is_some_and(|drag| !exists(&drag.id)) {
            self.drag = None;
        }
        if let Some(Editing {
            target: EditTarget::Component(id),
            ..
        }) = &self.editing
        {
            if !exists(id) {
                self.editing = None;
            }
        }
        let hover_gone = match &self.hover {
            Hit::Component(id) | Hit::RemoveButton(id) => !exists(id),
            Hit::Edge { from, to } => !diagram
                .and_then(|d| d.component(from))
                .is_some_and(|component| component.depends_on(to)),
            Hit::Background | Hit::Divider => false,
        };
        if hover_gone {
            self.hover = Hit::Background;
        }
        if self.hint_mode != HintMode::Inactive {
            self.hint_mode = HintMode::Inactive;
        }
    }

    fn add_component(&mut self) {
        if let Outcome::Applied(delta) = self.dispatch(Command::AddComponent) {
            self.selected = delta.added.first().cloned();
        }
    }

    fn remove_component(&mut self, id: ComponentId) {
        self.dispatch(Command::RemoveComponent(id));
    }

    fn new_map(&mut self) {
        if self.dispatch(Command::NewMap).applied() {
            self.set_toast("Created a new map");
        }
    }

    fn copy_map(&mut self) {
        if self.dispatch(Command::CopyMap).applied() {
            self.set_toast("Copied map");
        }
    }

    fn switch_map(&mut self, step: isize) {
        let diagrams = self.workspace.session().diagrams();
        if diagrams.len() < 2 {
            return;
        }
        let current = self
            .workspace
            .session()
            .active_diagram_id()
            .and_then(|active| diagrams.iter().position(|d| d.id() == active))
            .unwrap_or(0);
        let len = diagrams.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        let id = diagrams[next].id().clone();
        self.dispatch(Command::SelectMap(id));
    }

    fn nudge(&mut self, id: ComponentId, d_evolution: f64, d_value: f64) {
        if self.is_drawing() {
            self.set_toast("Finish or cancel drawing before moving components");
            return;
        }
        let Some(current) = self
            .active_diagram()
            .and_then(|diagram| diagram.component(&id))
            .map(|component| component.position())
        else {
            return;
        };
        let position = Position::new(current.evolution + d_evolution, current.value + d_value);
        self.dispatch(Command::Reposition { id, position });
    }

    fn cycle_selection(&mut self, step: isize) {
        let Some(diagram) = self.active_diagram() else {
            return;
        };
        let nodes = diagram.nodes();
        if nodes.is_empty() {
            self.selected = None;
            return;
        }
        let len = nodes.len() as isize;
        let next = match self
            .selected
            .as_ref()
            .and_then(|id| nodes.iter().position(|node| node.id() == id))
        {
            Some(idx) => (idx as isize + step).rem_euclid(len) as usize,
            None if step < 0 => nodes.len() - 1,
            None => 0,
        };
        self.selected = Some(nodes[next].id().clone());
    }

    fn yank_route(&mut self) {
        let Some(route) = self.workspace.route() else {
            self.set_toast("No active map");
            return;
        };
        match (self.clipboard)(&route) {
            Ok(backend) => self.set_toast(format!("Yanked {route} ({backend})")),
            Err(err) => self.set_toast(format!("Clipboard error: {err}")),
        }
    }

    fn escape(&mut self) {
        self.gestures.cancel();
        self.drag = None;
        self.editing = None;
        self.panel = Panel::None;
        self.manager.confirm_delete = None;
        self.manager.filtering = false;
        self.hint_mode = HintMode::Inactive;
        self.selected = None;
        self.dispatch(Command::Escape);
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    // ----- inline editing -------------------------------------------------------------------

    fn begin_edit(&mut self, target: EditTarget) {
        let Some(diagram) = self.active_diagram() else {
            return;
        };
        let initial = match &target {
            EditTarget::MapName => diagram.name().to_owned(),
            EditTarget::UserNeedTitle => diagram.user_need_title().to_owned(),
            EditTarget::UserNeedDescription => diagram.user_need_description().to_owned(),
            EditTarget::Component(id) => match diagram.component(id) {
                Some(component) => component.name().to_owned(),
                None => return,
            },
        };
        self.hint_mode = HintMode::Inactive;
        self.drag = None;
        self.editing = Some(Editing {
            target,
            editor: LineEditor::new(&initial),
        });
    }

    fn commit_edit(&mut self) {
        let Some(Editing { target, editor }) = self.editing.take() else {
            return;
        };
        let text = editor.text().to_owned();
        let command = match target {
            EditTarget::MapName => Command::RenameMap(text),
            EditTarget::UserNeedTitle => Command::SetUserNeedTitle(text),
            EditTarget::UserNeedDescription => Command::SetUserNeedDescription(text),
            EditTarget::Component(id) => Command::RenameComponent { id, name: text },
        };
        self.dispatch(command);
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        let Some(editing) = self.editing.as_mut() else {
            return;
        };
        match editing.editor.handle_key(code) {
            EditAction::Continue => {}
            EditAction::Commit => self.commit_edit(),
            EditAction::Cancel => self.editing = None,
        }
    }

    fn editing_text(&self, target: &EditTarget) -> Option<&LineEditor> {
        self.editing
            .as_ref()
            .filter(|editing| &editing.target == target)
            .map(|editing| &editing.editor)
    }

    // ----- keys -----------------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.active_diagram().is_none() {
            return self.handle_recovery_key(code);
        }

        if self.editing.is_some() {
            self.handle_edit_key(code);
            return false;
        }

        match self.panel {
            Panel::Help => return self.handle_help_key(code),
            Panel::Manager => return self.handle_manager_key(code),
            Panel::None => {}
        }

        if self.handle_hint_key(code) {
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.open_help(),
            KeyCode::Esc => self.escape(),
            KeyCode::Char('m') => self.open_manager(),
            KeyCode::Char('n') => self.new_map(),
            KeyCode::Char('c') => self.copy_map(),
            KeyCode::Char('[') => self.switch_map(-1),
            KeyCode::Char(']') => self.switch_map(1),
            KeyCode::Char('R') => self.begin_edit(EditTarget::MapName),
            KeyCode::Char('T') => self.begin_edit(EditTarget::UserNeedTitle),
            KeyCode::Char('E') => self.begin_edit(EditTarget::UserNeedDescription),
            KeyCode::Char('a') => self.add_component(),
            KeyCode::Char('d') => {
                self.dispatch(Command::ToggleDrawing);
            }
            KeyCode::Char('f') => self.enter_hint_mode(HintKind::Component),
            KeyCode::Char('u') => self.enter_hint_mode(HintKind::Edge),
            KeyCode::Char('y') => self.yank_route(),
            KeyCode::Tab => self.cycle_selection(1),
            KeyCode::BackTab => self.cycle_selection(-1),
            _ => self.handle_component_key(code),
        }

        false
    }

    fn handle_component_key(&mut self, code: KeyCode) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        match code {
            KeyCode::Enter | KeyCode::Char(' ') if self.is_drawing() => {
                self.dispatch(Command::ClickComponent(id));
            }
            KeyCode::Enter | KeyCode::Char('r') => self.begin_edit(EditTarget::Component(id)),
            KeyCode::Char('x') | KeyCode::Delete => self.remove_component(id),
            KeyCode::Char('t') => {
                self.dispatch(Command::CycleComponentType(id));
            }
            KeyCode::Left | KeyCode::Char('h') => self.nudge(id, -NUDGE_STEP, 0.0),
            KeyCode::Right | KeyCode::Char('l') => self.nudge(id, NUDGE_STEP, 0.0),
            KeyCode::Up | KeyCode::Char('k') => self.nudge(id, 0.0, NUDGE_STEP),
            KeyCode::Down | KeyCode::Char('j') => self.nudge(id, 0.0, -NUDGE_STEP),
            KeyCode::Char('H') => self.nudge(id, -NUDGE_STEP_LARGE, 0.0),
            KeyCode::Char('L') => self.nudge(id, NUDGE_STEP_LARGE, 0.0),
            KeyCode::Char('K') => self.nudge(id, 0.0, NUDGE_STEP_LARGE),
            KeyCode::Char('J') => self.nudge(id, 0.0, -NUDGE_STEP_LARGE),
            _ => {}
        }
    }

    fn handle_recovery_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                if self.dispatch(Command::ResetStorage).applied() {
                    tracing::info!("storage reset from recovery screen");
                    self.set_toast("Storage reset");
                }
            }
            _ => {}
        }
        false
    }

    fn open_help(&mut self) {
        self.panel = Panel::Help;
        self.help_scroll = 0;
        self.hint_mode = HintMode::Inactive;
    }

    fn handle_help_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Char('?') => self.panel = Panel::None,
            KeyCode::Down | KeyCode::Char('j') => self.help_scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.help_scroll_by(-1),
            KeyCode::PageDown => self.help_scroll_page(1),
            KeyCode::PageUp => self.help_scroll_page(-1),
            KeyCode::Home => self.help_scroll = 0,
            KeyCode::End => self.help_scroll = u16::MAX,
            _ => {}
        }
        false
    }

    fn help_scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.help_scroll).saturating_add(delta);
        self.help_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
    }

    fn help_scroll_page(&mut self, direction: i32) {
        let page = i32::from(self.help_viewport_height.max(1));
        self.help_scroll_by(page * direction);
    }

    // ----- hints ----------------------------------------------------------------------------

    fn enter_hint_mode(&mut self, kind: HintKind) {
        let Some(map) = &self.map else {
            return;
        };
        let targets = match kind {
            HintKind::Component => hints::component_targets(map, HINT_CHARS),
            HintKind::Edge => hints::edge_targets(map, HINT_CHARS),
        };
        if targets.is_empty() {
            self.set_toast(match kind {
                HintKind::Component => "No components to pick",
                HintKind::Edge => "No dependencies to remove",
            });
            return;
        }
        self.hint_mode = HintMode::Awaiting {
            kind,
            typed: String::new(),
            targets,
        };
    }

    /// Consumes the key while hint labels are shown.
    fn handle_hint_key(&mut self, code: KeyCode) -> bool {
        let HintMode::Awaiting {
            kind,
            mut typed,
            targets,
        } = std::mem::replace(&mut self.hint_mode, HintMode::Inactive)
        else {
            return false;
        };

        match code {
            KeyCode::Esc => {}
            KeyCode::Backspace => {
                typed.pop();
                self.hint_mode = HintMode::Awaiting {
                    kind,
                    typed,
                    targets,
                };
            }
            KeyCode::Char(ch) => {
                typed.push(ch.to_ascii_uppercase());
                if let Some(target) = targets.iter().find(|t| t.label == typed) {
                    let action = target.action.clone();
                    self.run_hint_action(action);
                } else if targets.iter().any(|t| t.label.starts_with(typed.as_str())) {
                    self.hint_mode = HintMode::Awaiting {
                        kind,
                        typed,
                        targets,
                    };
                } else {
                    self.set_toast(format!("No hint {typed}"));
                }
            }
            _ => {}
        }
        true
    }

    fn run_hint_action(&mut self, action: HintAction) {
        match action {
            HintAction::Component(id) => {
                if self.is_drawing() {
                    self.dispatch(Command::ClickComponent(id.clone()));
                }
                self.selected = Some(id);
            }
            HintAction::Edge { from, to } => {
                self.dispatch(Command::RemoveDependency { from, to });
            }
        }
    }

    // ----- map manager ----------------------------------------------------------------------

    fn open_manager(&mut self) {
        self.manager = ManagerState::default();
        let active = self.workspace.session().active_diagram_id();
        self.manager.cursor = self
            .manager_entries()
            .iter()
            .position(|diagram| Some(diagram.id()) == active)
            .unwrap_or(0);
        self.hint_mode = HintMode::Inactive;
        self.panel = Panel::Manager;
    }

    /// Maps ordered by recency, narrowed and ranked by the filter.
    fn manager_entries(&self) -> Vec<&Diagram> {
        let by_recency = self.workspace.session().by_recency();
        filter::rank(
            self.manager.filter.text(),
            by_recency.iter().map(|diagram| diagram.name()),
        )
        .into_iter()
        .map(|idx| by_recency[idx])
        .collect()
    }

    fn clamp_manager_cursor(&mut self) {
        let len = self.manager_entries().len();
        self.manager.cursor = self.manager.cursor.min(len.saturating_sub(1));
    }

    fn manager_entry_id(&self, idx: usize) -> Option<DiagramId> {
        self.manager_entries()
            .get(idx)
            .map(|diagram| diagram.id().clone())
    }

    fn select_manager_entry(&mut self, idx: usize) {
        if let Some(id) = self.manager_entry_id(idx) {
            self.dispatch(Command::SelectMap(id));
            self.panel = Panel::None;
        }
    }

    fn request_delete(&mut self, idx: usize) {
        if self.workspace.session().diagrams().len() <= 1 {
            self.set_toast("The only map cannot be deleted");
            return;
        }
        self.manager.confirm_delete = self.manager_entry_id(idx);
    }

    fn confirm_delete(&mut self) {
        let Some(id) = self.manager.confirm_delete.take() else {
            return;
        };
        let name = self
            .workspace
            .session()
            .diagram(&id)
            .map(|diagram| diagram.name().to_owned())
            .unwrap_or_default();
        if self.dispatch(Command::DeleteMap(id)).applied() {
            self.set_toast(format!("Deleted \"{name}\""));
        }
        self.clamp_manager_cursor();
    }

    fn handle_manager_key(&mut self, code: KeyCode) -> bool {
        if self.manager.confirm_delete.is_some() {
            match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.manager.confirm_delete = None;
                }
                _ => {}
            }
            return false;
        }

        if self.manager.filtering {
            match self.manager.filter.handle_key(code) {
                EditAction::Continue => {}
                EditAction::Commit => self.manager.filtering = false,
                EditAction::Cancel => {
                    self.manager.filter.clear();
                    self.manager.filtering = false;
                }
            }
            self.clamp_manager_cursor();
            return false;
        }

        let len = self.manager_entries().len();
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Char('m') => self.panel = Panel::None,
            KeyCode::Down | KeyCode::Char('j') => {
                self.manager.cursor = (self.manager.cursor + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.manager.cursor = self.manager.cursor.saturating_sub(1);
            }
            KeyCode::Home => self.manager.cursor = 0,
            KeyCode::End => self.manager.cursor = len.saturating_sub(1),
            KeyCode::Enter => self.select_manager_entry(self.manager.cursor),
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(self.manager.cursor),
            KeyCode::Char('n') => {
                self.new_map();
                self.panel = Panel::None;
            }
            KeyCode::Char('c') => {
                self.copy_map();
                self.panel = Panel::None;
            }
            KeyCode::Char('/') => self.manager.filtering = true,
            _ => {}
        }
        false
    }

    // ----- mouse ----------------------------------------------------------------------------

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.active_diagram().is_none() {
            return;
        }
        if mouse.kind == MouseEventKind::Moved {
            self.hover_at(Cell::new(mouse.column, mouse.row));
            return;
        }
        for gesture in self.gestures.process(&mouse, now) {
            self.handle_gesture(gesture);
        }
    }

    fn handle_focus_lost(&mut self) {
        if self.gestures.cancel().is_some() {
            self.drag = None;
        }
        self.hover = Hit::Background;
    }

    fn canvas_hit(&self, cell: Cell) -> Option<&Hit> {
        let area = self.frame.canvas;
        if !contains(area, cell) {
            return None;
        }
        let map = self.map.as_ref()?;
        Some(map.hit_at(usize::from(cell.x - area.x), usize::from(cell.y - area.y)))
    }

    fn hover_at(&mut self, cell: Cell) {
        if self.panel != Panel::None || self.gestures.is_dragging() {
            return;
        }
        self.hover = self.canvas_hit(cell).cloned().unwrap_or_default();
    }

    /// Semantic position under a screen cell, clamped to the axes.
    fn position_at(&self, cell: Cell, grab: (i32, i32)) -> Position {
        let area = self.frame.canvas;
        CanvasGrid::new(area.width, area.height).position_at(
            i32::from(cell.x) - i32::from(area.x) - grab.0,
            i32::from(cell.y) - i32::from(area.y) - grab.1,
        )
    }

    fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Click(cell) => self.click(cell),
            Gesture::DoubleClick(cell) => self.double_click(cell),
            Gesture::DragStart { start } => self.drag_start(start),
            Gesture::DragMove { current, .. } => self.drag_move(current),
            Gesture::DragEnd { start, end } => self.drag_end(start, end),
            Gesture::DragCancel => self.drag = None,
        }
    }

    fn click(&mut self, cell: Cell) {
        if self.editing.is_some() {
            // Clicking elsewhere saves, like leaving the field.
            self.commit_edit();
        }

        match self.panel {
            Panel::Help => {
                self.panel = Panel::None;
                return;
            }
            Panel::Manager => {
                self.click_manager(cell);
                return;
            }
            Panel::None => {}
        }
        self.hint_mode = HintMode::Inactive;

        if contains(self.frame.name, cell) {
            self.begin_edit(EditTarget::MapName);
            return;
        }
        if contains(self.frame.need_title, cell) {
            self.begin_edit(EditTarget::UserNeedTitle);
            return;
        }
        if contains(self.frame.need_description, cell) {
            self.begin_edit(EditTarget::UserNeedDescription);
            return;
        }

        let Some(hit) = self.canvas_hit(cell).cloned() else {
            return;
        };
        match hit {
            Hit::RemoveButton(id) => self.remove_component(id),
            Hit::Component(id) => {
                if self.is_drawing() {
                    self.dispatch(Command::ClickComponent(id.clone()));
                }
                self.selected = Some(id);
            }
            Hit::Edge { from, to } if !self.is_drawing() => {
                self.dispatch(Command::RemoveDependency { from, to });
            }
            Hit::Edge { .. } | Hit::Background | Hit::Divider => {
                self.dispatch(Command::ClickBackground);
                self.selected = None;
            }
        }
    }

    /// The first click of the pair has already been handled as a [`Gesture::Click`].
    fn double_click(&mut self, cell: Cell) {
        if self.panel != Panel::None || self.is_drawing() {
            return;
        }
        let Some(Hit::Component(id)) = self.canvas_hit(cell).cloned() else {
            return;
        };
        self.selected = Some(id.clone());
        self.begin_edit(EditTarget::Component(id));
    }

    fn drag_start(&mut self, start: Cell) {
        if self.panel != Panel::None || self.is_drawing() {
            return;
        }
        if self.editing.is_some() {
            self.commit_edit();
        }
        let Some(Hit::Component(id)) = self.canvas_hit(start).cloned() else {
            return;
        };
        let Some(position) = self
            .active_diagram()
            .and_then(|diagram| diagram.component(&id))
            .map(|component| component.position())
        else {
            return;
        };
        let area = self.frame.canvas;
        let grab = self
            .map
            .as_ref()
            .and_then(|map| map.badge(&id))
            .map_or((0, 0), |badge| {
                (
                    i32::from(start.x - area.x) - badge.anchor.0 as i32,
                    i32::from(start.y - area.y) - badge.anchor.1 as i32,
                )
            });
        self.hint_mode = HintMode::Inactive;
        self.hover = Hit::Background;
        self.selected = Some(id.clone());
        self.drag = Some(DragPreview { id, position, grab });
    }

    fn drag_move(&mut self, current: Cell) {
        let Some(grab) = self.drag.as_ref().map(|drag| drag.grab) else {
            return;
        };
        let position = self.position_at(current, grab);
        if let Some(drag) = self.drag.as_mut() {
            drag.position = position;
        }
    }

    fn drag_end(&mut self, start: Cell, end: Cell) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if start == end {
            return;
        }
        let position = self.position_at(end, drag.grab);
        self.dispatch(Command::Reposition {
            id: drag.id,
            position,
        });
    }

    fn click_manager(&mut self, cell: Cell) {
        if self.manager.confirm_delete.is_some() {
            return;
        }
        if !contains(self.frame.manager, cell) {
            self.panel = Panel::None;
            return;
        }
        let list = self.frame.manager_list;
        if !contains(list, cell) {
            return;
        }
        let row = usize::from(cell.y - list.y) / MANAGER_ROWS_PER_ENTRY;
        let idx = self.manager.list_state.offset() + row;
        if idx < self.manager_entries().len() {
            self.manager.cursor = idx;
            self.select_manager_entry(idx);
        }
    }
}

fn contains(area: Rect, cell: Cell) -> bool {
    area.width > 0
        && area.height > 0
        && cell.x >= area.x
        && cell.x < area.right()
        && cell.y >= area.y
        && cell.y < area.bottom()
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )
        .map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::{Duration, Instant};

    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};

    use super::{draw, App, TuiTheme};
    use crate::model::ComponentId;
    use crate::render::Hit;
    use crate::workspace::Workspace;

    fn fake_clipboard(_text: &str) -> Result<&'static str, String> {
        Ok("test")
    }

    /// Drives the app against an in-memory terminal, redrawing after every event.
    pub(crate) struct HeadlessTui {
        pub(crate) app: App,
        terminal: Terminal<TestBackend>,
        now: Instant,
    }

    impl HeadlessTui {
        pub(crate) fn new(workspace: Workspace, width: u16, height: u16) -> Self {
            let terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
            let mut tui = Self {
                app: App::new(workspace, TuiTheme::default(), fake_clipboard),
                terminal,
                now: Instant::now(),
            };
            tui.redraw();
            tui
        }

        pub(crate) fn redraw(&mut self) {
            let app = &mut self.app;
            self.terminal
                .draw(|frame| draw(frame, app))
                .expect("draw");
        }

        pub(crate) fn workspace(&self) -> &Workspace {
            &self.app.workspace
        }

        pub(crate) fn press(&mut self, code: KeyCode) -> bool {
            let quit = self.app.handle_key_code(code);
            self.redraw();
            quit
        }

        pub(crate) fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        pub(crate) fn mouse(&mut self, kind: MouseEventKind, x: u16, y: u16) {
            let event = MouseEvent {
                kind,
                column: x,
                row: y,
                modifiers: KeyModifiers::NONE,
            };
            self.app.handle_mouse(event, self.now);
            self.redraw();
        }

        /// A single click; successive calls never merge into a double-click.
        pub(crate) fn click(&mut self, x: u16, y: u16) {
            self.now += Duration::from_secs(1);
            self.mouse(MouseEventKind::Down(MouseButton::Left), x, y);
            self.mouse(MouseEventKind::Up(MouseButton::Left), x, y);
        }

        pub(crate) fn double_click(&mut self, x: u16, y: u16) {
            self.click(x, y);
            self.now += Duration::from_millis(50);
            self.mouse(MouseEventKind::Down(MouseButton::Left), x, y);
            self.mouse(MouseEventKind::Up(MouseButton::Left), x, y);
        }

        pub(crate) fn drag(&mut self, from: (u16, u16), to: (u16, u16)) {
            self.now += Duration::from_secs(1);
            self.mouse(MouseEventKind::Down(MouseButton::Left), from.0, from.1);
            self.mouse(MouseEventKind::Drag(MouseButton::Left), to.0, to.1);
            self.mouse(MouseEventKind::Up(MouseButton::Left), to.0, to.1);
        }

        pub(crate) fn hover(&mut self, x: u16, y: u16) {
            self.mouse(MouseEventKind::Moved, x, y);
        }

        /// First screen cell (row-major) whose canvas hit equals `hit`.
        pub(crate) fn hit_cell(&self, hit: &Hit) -> Option<(u16, u16)> {
            let area = self.app.frame.canvas;
            let map = self.app.map.as_ref()?;
            (0..map.height())
                .flat_map(|y| (0..map.width()).map(move |x| (x, y)))
                .find(|&(x, y)| map.hit_at(x, y) == hit)
                .map(|(x, y)| (area.x + x as u16, area.y + y as u16))
        }

        pub(crate) fn component_cell(&self, id: &ComponentId) -> (u16, u16) {
            self.hit_cell(&Hit::Component(id.clone()))
                .expect("component is visible")
        }

        pub(crate) fn canvas_origin(&self) -> (u16, u16) {
            (self.app.frame.canvas.x, self.app.frame.canvas.y)
        }

        pub(crate) fn screen(&self) -> String {
            let buffer = self.terminal.backend().buffer();
            let width = usize::from(buffer.area.width);
            buffer
                .content()
                .chunks(width.max(1))
                .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
