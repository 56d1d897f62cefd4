// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Header, user need, ruler, footer, panel and style helpers used by TUI rendering.
const MANAGER_ROWS_PER_ENTRY: usize = 2;
const EDIT_MARKER: &str = " ✎";

fn render_header(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let Some(diagram) = app.active_diagram() else {
        return;
    };
    let editor = app.editing_text(&EditTarget::MapName);
    let name = editor.map_or_else(|| diagram.name().to_owned(), |editor| editor.text().to_owned());
    let cursor = editor.map(LineEditor::cursor);

    let counter = {
        let diagrams = app.workspace.session().diagrams();
        let idx = diagrams
            .iter()
            .position(|d| d.id() == diagram.id())
            .map_or(0, |idx| idx + 1);
        format!("map {idx}/{}", diagrams.len())
    };
    let route = app.workspace.route().unwrap_or_default();
    let right = format!("{route}  {counter} ");

    let name_width = name.chars().count() + EDIT_MARKER.chars().count() + 1;
    let name_style = if cursor.is_some() {
        app.theme.title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        app.theme.title_style()
    };
    let left = Line::from(vec![
        Span::raw(" "),
        Span::styled(name, name_style),
        Span::styled(EDIT_MARKER, app.theme.dim_style()),
    ]);
    let right = Line::from(Span::styled(right, app.theme.dim_style())).right_aligned();

    frame.render_widget(Paragraph::new(right), area);
    frame.render_widget(Paragraph::new(left), area);

    app.frame.name = Rect {
        width: clamp_to_u16(name_width).min(area.width),
        height: 1,
        ..area
    };
    if let Some(cursor) = cursor {
        place_cursor(frame, area, 1 + cursor);
    }
}

fn render_user_need(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let Some(diagram) = app.active_diagram() else {
        return;
    };
    let title_editor = app.editing_text(&EditTarget::UserNeedTitle);
    let description_editor = app.editing_text(&EditTarget::UserNeedDescription);
    let title = title_editor.map_or_else(
        || diagram.user_need_title().to_owned(),
        |editor| editor.text().to_owned(),
    );
    let description = description_editor.map_or_else(
        || diagram.user_need_description().to_owned(),
        |editor| editor.text().to_owned(),
    );
    let title_cursor = title_editor.map(LineEditor::cursor);
    let description_cursor = description_editor.map(LineEditor::cursor);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border_style(title_cursor.or(description_cursor).is_some()))
        .title(Line::from(Span::styled(" User Need ", app.theme.dim_style())));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(title, app.theme.title_style()),
            Span::styled(EDIT_MARKER, app.theme.dim_style()),
        ]),
        Line::from(vec![
            Span::styled(description, app.theme.dim_style()),
            Span::styled(EDIT_MARKER, app.theme.dim_style()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    let row = |offset: u16| Rect {
        y: inner.y.saturating_add(offset),
        height: u16::from(inner.height > offset),
        ..inner
    };
    app.frame.need_title = row(0);
    app.frame.need_description = row(1);

    if let Some(cursor) = title_cursor {
        place_cursor(frame, app.frame.need_title, cursor);
    } else if let Some(cursor) = description_cursor {
        place_cursor(frame, app.frame.need_description, cursor);
    }
}

fn render_ruler(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let canvas = app.frame.canvas;
    let area = Rect {
        x: canvas.x,
        width: canvas.width,
        ..area
    };
    let ruler = Line::from(vec![
        Span::styled(stage_ruler(area.width), app.theme.dim_style()),
    ]);
    frame.render_widget(Paragraph::new(ruler), area);
}

fn render_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let brand = footer_brand_line(app);
    let brand_width = clamp_to_u16(FOOTER_BRAND.len() + 1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(brand_width)])
        .split(area);

    frame.render_widget(Paragraph::new(footer_help_line(app)), columns[0]);
    frame.render_widget(Paragraph::new(brand).alignment(Alignment::Right), columns[1]);
}

fn footer_help_line(app: &App) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    if let Some(toast) = &app.toast {
        spans.push(Span::styled(" Toast: ".to_owned(), app.theme.dim_style()));
        spans.push(Span::styled(toast.message.clone(), app.theme.accent_style()));
        return Line::from(spans);
    }

    spans.push(Span::raw(" "));
    if app.editing.is_some() {
        push_footer_entry(app, &mut spans, "SAVE", "Enter");
        push_footer_entry(app, &mut spans, "CANCEL", "Esc");
    } else if let HintMode::Awaiting { kind, typed, .. } = &app.hint_mode {
        let label = match kind {
            HintKind::Component => "PICK",
            HintKind::Edge => "UNLINK",
        };
        let typed = if typed.is_empty() { "…" } else { typed.as_str() };
        push_footer_entry(app, &mut spans, label, typed);
        push_footer_entry(app, &mut spans, "CANCEL", "Esc");
    } else if app.is_drawing() {
        push_footer_entry(app, &mut spans, "PICK", "click/f");
        push_footer_entry(app, &mut spans, "CANCEL", "Esc/d");
    } else {
        push_footer_entry(app, &mut spans, "ADD", "a");
        push_footer_entry(app, &mut spans, "LINK", "d");
        push_footer_entry(app, &mut spans, "HINT", "f");
        push_footer_entry(app, &mut spans, "UNLINK", "u");
        push_footer_entry(app, &mut spans, "MAPS", "m");
        push_footer_entry(app, &mut spans, "HELP", "?");
        push_footer_entry(app, &mut spans, "QUIT", "q");
    }

    Line::from(spans)
}

fn footer_brand_line(app: &App) -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        app.theme.accent_style(),
    )])
}

fn push_footer_entry(app: &App, spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if spans.len() > 1 {
        spans.push(Span::styled(" | ".to_owned(), app.theme.dim_style()));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        app.theme.dim_style(),
    ));
    spans.push(Span::styled(value.to_owned(), app.theme.key_style()));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn render_manager(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ My Maps ─")
        .border_style(app.theme.panel_border_style(true))
        .title_style(app.theme.title_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.frame.manager = area;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let filter_line = if app.manager.filtering || !app.manager.filter.text().is_empty() {
        Line::from(vec![
            Span::styled("/ ", app.theme.key_style()),
            Span::raw(app.manager.filter.text().to_owned()),
        ])
    } else {
        Line::from(Span::styled("/ to filter", app.theme.dim_style()))
    };
    frame.render_widget(Paragraph::new(filter_line), rows[0]);
    if app.manager.filtering {
        place_cursor(frame, rows[0], 2 + app.manager.filter.cursor());
    }

    let now = now_millis();
    let items = {
        let active = app.workspace.session().active_diagram_id();
        app.manager_entries()
            .into_iter()
            .map(|diagram| {
                let is_active = Some(diagram.id()) == active;
                let marker = if is_active { "● " } else { "  " };
                let detail = if is_active {
                    "Currently active".to_owned()
                } else {
                    format!("Updated {}", time_ago(now, diagram.last_modified()))
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, app.theme.accent_style()),
                        Span::styled(diagram.name().to_owned(), app.theme.title_style()),
                    ]),
                    Line::from(Span::styled(format!("  {detail}"), app.theme.dim_style())),
                ])
            })
            .collect::<Vec<_>>()
    };

    app.frame.manager_list = rows[2];
    if items.is_empty() {
        app.manager.list_state.select(None);
        frame.render_widget(
            Paragraph::new(Span::styled("No maps match", app.theme.dim_style())),
            rows[2],
        );
    } else {
        app.manager.list_state.select(Some(app.manager.cursor));
        let list = List::new(items).highlight_style(app.theme.selection_style());
        frame.render_stateful_widget(list, rows[2], &mut app.manager.list_state);
    }

    let mut keys = vec![Span::raw("")];
    push_footer_entry(app, &mut keys, "OPEN", "Enter");
    push_footer_entry(app, &mut keys, "NEW", "n");
    push_footer_entry(app, &mut keys, "COPY", "c");
    if app.workspace.session().diagrams().len() > 1 {
        push_footer_entry(app, &mut keys, "DELETE", "d");
    }
    push_footer_entry(app, &mut keys, "CLOSE", "Esc");
    frame.render_widget(Paragraph::new(Line::from(keys)), rows[3]);

    if let Some(id) = &app.manager.confirm_delete {
        let name = app
            .workspace
            .session()
            .diagram(id)
            .map(|diagram| diagram.name().to_owned())
            .unwrap_or_default();
        render_confirm_delete(frame, app, area, &name);
    }
}

fn render_confirm_delete(frame: &mut Frame<'_>, app: &App, panel: Rect, name: &str) {
    let area = centered_rect(80, 40, panel);
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(format!(
            "Are you sure you want to delete \"{name}\"? This cannot be undone."
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", app.theme.key_style()),
            Span::raw(" delete   "),
            Span::styled("n/Esc", app.theme.key_style()),
            Span::raw(" keep"),
        ]),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Delete map ─")
        .border_style(app.theme.error_style());
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(82, 84, main_area);
    frame.render_widget(Clear, area);

    let key_style = app.theme.key_style();
    let header_style = app.theme.title_style();
    let key_col_width = ["h/j/k/l, ←↓↑→", "Enter/r, 2×click"]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();

    lines.push(Line::from(Span::styled(
        "--- Working with Components ---",
        header_style,
    )));
    lines.push(help_kv("a", "Add a component near the center", key_col_width, key_style));
    lines.push(help_kv("Tab/Shift-Tab", "Select next/previous component", key_col_width, key_style));
    lines.push(help_kv("f", "Pick a component by hint label", key_col_width, key_style));
    lines.push(help_kv("drag", "Move a component on both axes", key_col_width, key_style));
    lines.push(help_kv("h/j/k/l, ←↓↑→", "Nudge the selection by 1", key_col_width, key_style));
    lines.push(help_kv("H/J/K/L", "Nudge the selection by 10", key_col_width, key_style));
    lines.push(help_kv("Enter/r, 2×click", "Rename the selection; Enter saves", key_col_width, key_style));
    lines.push(help_kv("t", "Cycle software/hardware/service", key_col_width, key_style));
    lines.push(help_kv("x/Del, click ×", "Remove the selection", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "--- Managing Dependencies ---",
        header_style,
    )));
    lines.push(help_kv(
        "d",
        "Draw: pick the dependent, then what it depends on",
        key_col_width,
        key_style,
    ));
    lines.push(help_kv("Esc/d, click map", "Cancel drawing", key_col_width, key_style));
    lines.push(help_kv("click line", "Remove a dependency (hover turns it red)", key_col_width, key_style));
    lines.push(help_kv("u", "Remove a dependency by hint label", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Map Management ---", header_style)));
    lines.push(help_kv("m", "My Maps: open, filter, delete", key_col_width, key_style));
    lines.push(help_kv("n/c", "New map / copy current map", key_col_width, key_style));
    lines.push(help_kv("[/]", "Previous/next map", key_col_width, key_style));
    lines.push(help_kv("R, click name", "Rename the map", key_col_width, key_style));
    lines.push(help_kv("T/E", "Edit user need title/description", key_col_width, key_style));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("--- Saving & Sharing ---", header_style)));
    lines.push(Line::from(Span::styled(
        "Every change is saved automatically. There is no save button.",
        app.theme.dim_style(),
    )));
    lines.push(help_kv("y", "Copy the map's #/map/<id> address", key_col_width, key_style));
    lines.push(help_kv("Esc", "Cancel whatever is in progress", key_col_width, key_style));
    lines.push(help_kv("j/k, PgUp/PgDn", "Scroll help", key_col_width, key_style));
    lines.push(help_kv("q", "Quit", key_col_width, key_style));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(app.theme.panel_border_style(true))
        .title_style(header_style);
    let inner = block.inner(area);
    app.help_viewport_height = inner.height;
    let max_scroll = lines
        .len()
        .saturating_sub(inner.height.max(1) as usize)
        .min(u16::MAX as usize) as u16;
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_recovery(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let area = centered_rect(70, 50, main_area);
    frame.render_widget(Clear, area);

    let key_style = app.theme.key_style();
    let mut lines = vec![
        Line::from(Span::styled("No map to show.", app.theme.title_style())),
        Line::from(""),
        Line::from("Saved data could not be turned into a usable map."),
        Line::from(""),
        help_kv("r", "Reset storage and reload", 1, key_style),
        help_kv("q", "Quit", 1, key_style),
    ];
    if let Some(toast) = &app.toast {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            toast.message.clone(),
            app.theme.error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Recovery ─")
        .border_style(app.theme.error_style());
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn place_cursor(frame: &mut Frame<'_>, area: Rect, offset: usize) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let x = area
        .x
        .saturating_add(clamp_to_u16(offset))
        .min(area.right().saturating_sub(1));
    frame.set_cursor_position((x, area.y));
}

fn clamp_to_u16(value: usize) -> u16 {
    value.min(usize::from(u16::MAX)) as u16
}

/// Coarse relative time, largest unit first: "3 days ago", "just now".
fn time_ago(now_ms: u64, then_ms: u64) -> String {
    let seconds = now_ms.saturating_sub(then_ms) / 1000;
    let units = [
        (31_536_000, "years"),
        (2_592_000, "months"),
        (86_400, "days"),
        (3_600, "hours"),
        (60, "minutes"),
    ];
    for (unit, label) in units {
        // Strictly more than one unit, so exactly 60s is still "just now".
        if seconds > unit {
            return format!("{} {label} ago", seconds / unit);
        }
    }
    "just now".to_owned()
}
