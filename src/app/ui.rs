//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::state::{AppState, EditTarget, Mode, SettingsRow};
use crate::auth::{AuthField, AuthMode};
use crate::lifecycle::Phase;
use crate::models::{ApiService, ConnectionStatus, PlatformId};
use crate::routes::{DashboardView, Route};
use crate::theme::ThemeColors;

/// App icon
const ICON: &str = "✨";

/// Spinner animation frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render function
pub fn render(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    // Set background
    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    match state.route {
        Route::Splash => render_splash(frame, state, area),
        Route::Auth => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            render_auth(frame, state, chunks[0]);
            render_status_bar(frame, state, chunks[1]);
        }
        Route::Dashboard(view) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(28), Constraint::Min(0)])
                .split(rows[0]);

            render_sidebar(frame, state, view, cols[0]);
            match view {
                DashboardView::Create => render_create_view(frame, state, cols[1]),
                DashboardView::Review => render_review_view(frame, state, cols[1]),
                DashboardView::Connections => render_connections_view(frame, state, cols[1]),
                DashboardView::Settings => render_settings_view(frame, state, cols[1]),
            }
            render_status_bar(frame, state, rows[1]);
        }
    }

    // Render modal dialogs
    match state.mode {
        Mode::Help => render_help_popup(frame, state),
        Mode::Editing(EditTarget::ApiKey(_)) | Mode::Normal => {}
        Mode::Editing(target) => render_edit_popup(frame, state, target),
    }
}

fn panel<'a>(colors: &ThemeColors, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            colors.block_focus()
        } else {
            colors.block()
        })
        .style(Style::default().bg(colors.bg))
}

fn spinner(state: &AppState) -> &'static str {
    let frame_idx = (state.current_tick() / 2) as usize % SPINNER.len();
    SPINNER[frame_idx]
}

fn render_splash(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let mut lines: Vec<Line> = crate::LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l, colors.logo_style_primary())))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{ICON} AI-powered content for every platform"),
        colors.logo_style_secondary(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{} Loading...", spinner(state)),
        colors.text_dim(),
    )));
    lines.push(Line::from(Span::styled("press any key", colors.text_muted())));

    let height = lines.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let inner = Rect {
        y: area.y + top,
        height: height.min(area.height),
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_auth(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let form = &state.auth_form;
    let popup_area = centered_rect(50, 60, area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {ICON} Contentify AI"),
            colors.text_primary().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "  Create engaging posts for all your socials",
            colors.text_dim(),
        )),
        Line::from(""),
    ];

    for field in form.fields() {
        let (label, value) = match field {
            AuthField::Name => ("Name", form.name.clone()),
            AuthField::Email => ("Email", form.email.clone()),
            AuthField::Password => ("Password", "•".repeat(form.password.chars().count())),
        };
        let focused = *field == form.focus;
        let cursor = if focused { "▏" } else { "" };
        content.push(Line::from(vec![
            Span::styled(
                format!("  {label:<10}"),
                if focused {
                    colors.text_primary()
                } else {
                    colors.text_dim()
                },
            ),
            Span::styled(
                format!("{value}{cursor}"),
                if focused {
                    colors.selected()
                } else {
                    colors.text()
                },
            ),
        ]));
        content.push(Line::from(""));
    }

    let switch_hint = match form.mode {
        AuthMode::Login => "no account? sign up",
        AuthMode::Signup => "have an account? sign in",
    };
    content.push(Line::from(vec![
        Span::styled("  Enter", colors.key_hint()),
        Span::styled(format!(": {}  ", state.auth_submit_label()), colors.text_muted()),
        Span::styled("Tab", colors.key_hint()),
        Span::styled(": next field  ", colors.text_muted()),
    ]));
    content.push(Line::from(vec![
        Span::styled("  Ctrl+T", colors.key_hint()),
        Span::styled(format!(": {switch_hint}  "), colors.text_muted()),
        Span::styled("Esc", colors.key_hint()),
        Span::styled(": quit", colors.text_muted()),
    ]));

    let block = panel(&colors, format!(" {} ", form.mode.title()), true);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(Paragraph::new(content).block(block), popup_area);
}

fn render_sidebar(frame: &mut Frame, state: &AppState, current: DashboardView, area: Rect) {
    let colors = state.theme.colors();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    let items: Vec<ListItem> = DashboardView::all()
        .iter()
        .map(|view| {
            let style = if *view == current {
                colors.selected()
            } else {
                colors.text()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", view.index() + 1), colors.key_hint()),
                Span::styled(format!("{} {}", view.icon(), view.label()), style),
            ]))
        })
        .collect();

    let nav = List::new(items).block(panel(&colors, format!(" {ICON} Contentify "), false));
    frame.render_widget(nav, chunks[0]);

    let user_lines = match state.auth.user() {
        Some(user) => vec![
            Line::from(vec![
                Span::styled(format!(" ({}) ", user.initial()), colors.text_primary()),
                Span::styled(user.name.clone(), colors.text()),
            ]),
            Line::from(Span::styled(format!(" {}", user.email), colors.text_dim())),
            Line::from(vec![
                Span::styled(" L", colors.key_hint()),
                Span::styled(": log out", colors.text_muted()),
            ]),
        ],
        None => vec![Line::from(Span::styled(" not signed in", colors.text_muted()))],
    };
    frame.render_widget(
        Paragraph::new(user_lines).block(panel(&colors, " Account ", false)),
        chunks[1],
    );
}

fn platform_pill(colors: &ThemeColors, platform: PlatformId, selected: bool) -> Span<'static> {
    if selected {
        Span::styled(
            format!(" {} {} ✓ ", platform.emoji(), platform.name()),
            colors.platform_badge(platform),
        )
    } else {
        Span::styled(
            format!(" {} {} ", platform.emoji(), platform.name()),
            colors.text_dim(),
        )
    }
}

fn render_create_view(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    // Idea
    let idea = if state.form.idea.is_empty() {
        Paragraph::new(Span::styled(
            "What would you like to post about? Press i to describe your idea.",
            colors.text_muted(),
        ))
    } else {
        Paragraph::new(state.form.idea.as_str()).style(colors.text())
    };
    frame.render_widget(
        idea.wrap(Wrap { trim: false })
            .block(panel(&colors, " 💡 Content idea ", true)),
        chunks[0],
    );

    // Platforms
    let mut spans = vec![Span::raw(" ")];
    for (i, platform) in PlatformId::all().iter().enumerate() {
        let mut pill = platform_pill(&colors, *platform, state.form.platforms.contains(platform));
        if i == state.platform_cursor % PlatformId::all().len() {
            pill.style = pill.style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        spans.push(pill);
        spans.push(Span::raw(" "));
    }
    let hint = Line::from(vec![
        Span::styled(" ←/→", colors.key_hint()),
        Span::styled(": move  ", colors.text_muted()),
        Span::styled("Space", colors.key_hint()),
        Span::styled(": toggle", colors.text_muted()),
    ]);
    frame.render_widget(
        Paragraph::new(vec![Line::from(spans), hint])
            .block(panel(&colors, " 🎯 Platforms ", false)),
        chunks[1],
    );

    // Image
    let image_line = match &state.form.upload {
        Some(image) => Line::from(vec![
            Span::styled(" 🖼  ", colors.text()),
            Span::styled(image.label(), colors.text_primary()),
            Span::styled("   x", colors.key_hint()),
            Span::styled(": remove", colors.text_muted()),
        ]),
        None => Line::from(vec![
            Span::styled(" 🎨 An image will be generated from your idea   ", colors.text_dim()),
            Span::styled("u", colors.key_hint()),
            Span::styled(": upload your own", colors.text_muted()),
        ]),
    };
    frame.render_widget(
        Paragraph::new(vec![image_line]).block(panel(&colors, " Image ", false)),
        chunks[2],
    );

    // Action
    let action = if state.lifecycle.is_generating() {
        Line::from(vec![
            Span::styled(format!(" {} Generating content...  ", spinner(state)), colors.text_info()),
            Span::styled("Esc", colors.key_hint()),
            Span::styled(": cancel", colors.text_muted()),
        ])
    } else if state.form.can_submit() {
        Line::from(vec![
            Span::styled(" Enter", colors.key_hint()),
            Span::styled(": ✨ Generate content", colors.text_success()),
        ])
    } else {
        Line::from(Span::styled(
            " Add an idea or image and pick at least one platform",
            colors.text_muted(),
        ))
    };
    frame.render_widget(Paragraph::new(action).block(panel(&colors, "", false)), chunks[3]);
}

fn phase_span(colors: &ThemeColors, phase: Phase) -> Span<'static> {
    match phase {
        Phase::Scheduled { at } => Span::styled(
            format!(
                "📅 Scheduled for {}",
                at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
            ),
            colors.text_success(),
        ),
        Phase::Published { .. } => Span::styled("✅ Published", colors.text_success()),
        Phase::Editing => Span::styled("✏️  Edited", colors.text_warning()),
        other => Span::styled(other.label().to_string(), colors.text_dim()),
    }
}

fn render_review_view(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let Some(draft) = state.lifecycle.draft() else {
        let empty = Paragraph::new(Span::styled(
            "No draft yet. Press 1 to create one.",
            colors.text_muted(),
        ))
        .block(panel(&colors, " Review & Schedule ", false));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    // Platform tabs
    let platforms = state.review_platforms();
    let titles: Vec<Line> = platforms
        .iter()
        .map(|p| Line::from(format!("{} {}", p.emoji(), p.name())))
        .collect();
    let selected = platforms
        .iter()
        .position(|p| *p == state.review_platform)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(colors.tab())
        .highlight_style(colors.tab_active())
        .divider(Span::styled(" │ ", colors.text_muted()))
        .block(panel(&colors, " Platforms ", false));
    frame.render_widget(tabs, chunks[0]);

    // Source image
    let image = Line::from(vec![
        Span::styled(
            if draft.is_uploaded() { " 🖼  " } else { " 🎨 " },
            colors.text(),
        ),
        Span::styled(draft.source_image().label(), colors.text_primary()),
    ]);
    let idea_title = if draft.idea().trim().is_empty() {
        " Image ".to_string()
    } else {
        format!(" 💡 {} ", draft.preview(40))
    };
    frame.render_widget(
        Paragraph::new(image).block(panel(&colors, idea_title, false)),
        chunks[1],
    );

    // Caption
    let platform = state.review_platform;
    let caption = draft.caption(platform).unwrap_or_default();
    let width = chunks[2].width.saturating_sub(2).max(1) as usize;
    let lines: Vec<Line> = caption
        .split('\n')
        .flat_map(|para| {
            if para.is_empty() {
                vec![Line::from("")]
            } else {
                textwrap::wrap(para, width)
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l.into_owned(), colors.text())))
                    .collect()
            }
        })
        .collect();
    let len = draft.caption_len(platform);
    let max = platform.max_caption_len();
    let counter = Span::styled(
        format!(" {len}/{max} "),
        if platform.fits(caption) {
            colors.text_dim()
        } else {
            colors.text_error()
        },
    );
    let title = Line::from(vec![
        Span::styled(format!(" {} caption ", platform.name()), colors.platform(platform)),
        counter,
    ]);
    frame.render_widget(
        Paragraph::new(lines).block(panel(&colors, title, true)),
        chunks[2],
    );

    // Actions
    let busy = !state.tickets.is_idle();
    let schedule_text = if state.schedule_input.is_empty() {
        "not set".to_string()
    } else {
        state.schedule_input.clone()
    };
    let status_line = Line::from(vec![
        Span::raw(" "),
        phase_span(&colors, state.lifecycle.phase()),
        Span::styled("   🕐 ", colors.text_dim()),
        Span::styled(schedule_text, colors.text()),
        Span::styled(
            if busy {
                format!("   {} working...", spinner(state))
            } else {
                String::new()
            },
            colors.text_info(),
        ),
    ]);
    let over = draft.over_limit();
    let warning = if over.is_empty() {
        Span::styled(
            format!(
                "   created {}",
                draft
                    .created_at()
                    .with_timezone(&chrono::Local)
                    .format("%H:%M")
            ),
            colors.text_muted(),
        )
    } else {
        let names: Vec<_> = over.iter().map(|p| p.name()).collect();
        Span::styled(
            format!("   ⚠ too long for {}", names.join(", ")),
            colors.text_error(),
        )
    };
    let status_line = Line::from(
        status_line
            .spans
            .into_iter()
            .chain(std::iter::once(warning))
            .collect::<Vec<_>>(),
    );
    let keys = Line::from(vec![
        Span::styled(" e", colors.key_hint()),
        Span::styled(": edit  ", colors.text_muted()),
        Span::styled("i", colors.key_hint()),
        Span::styled(": improve  ", colors.text_muted()),
        Span::styled("#", colors.key_hint()),
        Span::styled(": hashtags  ", colors.text_muted()),
        Span::styled("s", colors.key_hint()),
        Span::styled(": schedule  ", colors.text_muted()),
        Span::styled("p", colors.key_hint()),
        Span::styled(": publish  ", colors.text_muted()),
        Span::styled("c", colors.key_hint()),
        Span::styled(": copy  ", colors.text_muted()),
        Span::styled("n", colors.key_hint()),
        Span::styled(": new draft", colors.text_muted()),
    ]);
    frame.render_widget(
        Paragraph::new(vec![status_line, keys]).block(panel(&colors, "", false)),
        chunks[3],
    );
}

fn render_connections_view(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let items: Vec<ListItem> = PlatformId::all()
        .iter()
        .enumerate()
        .map(|(i, platform)| {
            let status = state.connections.status(*platform);
            let status_style = match status {
                ConnectionStatus::Connected => colors.text_success(),
                ConnectionStatus::Connecting => colors.text_warning(),
                ConnectionStatus::Disconnected => colors.text_muted(),
            };
            let name_style = if i == state.connection_cursor % PlatformId::all().len() {
                colors.selected()
            } else {
                colors.platform(*platform)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!(" {} {:<14}", platform.emoji(), platform.name()), name_style),
                    Span::styled(format!(" {} {}", status.emoji(), status.as_str()), status_style),
                ]),
                Line::from(Span::styled(
                    format!("    {}", platform.description()),
                    colors.text_dim(),
                )),
            ])
        })
        .collect();

    let title = format!(
        " 🔗 Connections ({}/{}) ",
        state.connections.connected_count(),
        PlatformId::all().len()
    );
    frame.render_widget(List::new(items).block(panel(&colors, title, true)), chunks[0]);

    let url = state
        .last_authorize_url
        .as_deref()
        .unwrap_or("Connect an account to publish to it");
    let footer = vec![
        Line::from(Span::styled(format!(" {url}"), colors.text_dim())),
        Line::from(vec![
            Span::styled(" Enter", colors.key_hint()),
            Span::styled(": connect  ", colors.text_muted()),
            Span::styled("d", colors.key_hint()),
            Span::styled(": disconnect  ", colors.text_muted()),
            Span::styled("j/k", colors.key_hint()),
            Span::styled(": move", colors.text_muted()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(footer)
            .wrap(Wrap { trim: true })
            .block(panel(&colors, "", false)),
        chunks[1],
    );
}

fn key_row_lines(state: &AppState, colors: &ThemeColors, service: ApiService, focused: bool) -> Vec<Line<'static>> {
    let record = state.vault.record(service);
    let editing = state.mode == Mode::Editing(EditTarget::ApiKey(service));
    let value = if record.value.is_empty() && !editing {
        "not set".to_string()
    } else {
        format!("{}{}", record.display(), if editing { "▏" } else { "" })
    };
    let badge = if record.saved {
        Span::styled(" ✓ saved", colors.text_success())
    } else if record.value.is_empty() {
        Span::raw("")
    } else {
        Span::styled(" • unsaved", colors.text_warning())
    };
    vec![
        Line::from(vec![
            Span::styled(
                format!(" 🔑 {:<12}", service.name()),
                if focused {
                    colors.selected()
                } else {
                    colors.text_primary()
                },
            ),
            Span::styled(value, if editing { colors.selected() } else { colors.text() }),
            badge,
        ]),
        Line::from(Span::styled(
            format!("    {}", service.description()),
            colors.text_dim(),
        )),
        Line::from(Span::styled(
            format!("    {}", service.instructions_url()),
            colors.text_muted(),
        )),
        Line::from(""),
    ]
}

fn render_settings_view(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();
    let current = state.settings_row();

    let mut lines = vec![Line::from("")];
    for row in SettingsRow::all() {
        let focused = *row == current;
        match row {
            SettingsRow::Key(service) => {
                lines.extend(key_row_lines(state, &colors, *service, focused));
            }
            SettingsRow::Theme => {
                let mode = state.theme_mode();
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {} {:<12}", mode.icon(), "Appearance"),
                        if focused {
                            colors.selected()
                        } else {
                            colors.text_primary()
                        },
                    ),
                    Span::styled(format!("{} ({})", mode.name(), state.theme.name()), colors.text()),
                ]));
                lines.push(Line::from(""));
            }
        }
    }
    lines.push(Line::from(vec![
        Span::styled(" e", colors.key_hint()),
        Span::styled(": edit  ", colors.text_muted()),
        Span::styled("s", colors.key_hint()),
        Span::styled(": save  ", colors.text_muted()),
        Span::styled("d", colors.key_hint()),
        Span::styled(": delete  ", colors.text_muted()),
        Span::styled("v", colors.key_hint()),
        Span::styled(": show/hide  ", colors.text_muted()),
        Span::styled("o", colors.key_hint()),
        Span::styled(": get a key  ", colors.text_muted()),
        Span::styled("Enter", colors.key_hint()),
        Span::styled(": toggle theme", colors.text_muted()),
    ]));
    lines.push(Line::from(Span::styled(
        " Keys stay in memory for this session only.",
        colors.text_muted(),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel(&colors, " ⚙️  Settings ", true)),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let loading_indicator = if state.is_loading() {
        format!("{} ", spinner(state))
    } else {
        String::new()
    };

    let content = if !state.status.is_empty() {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_secondary()),
            Span::styled(state.status.as_str(), colors.text_secondary()),
        ]
    } else {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_secondary()),
            Span::styled("1-4", colors.key_hint()),
            Span::styled(": views  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("t", colors.key_hint()),
            Span::styled(": theme  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    };

    let status =
        Paragraph::new(Line::from(content)).style(Style::default().bg(colors.bg_secondary));
    frame.render_widget(status, area);
}

fn render_edit_popup(frame: &mut Frame, state: &AppState, target: EditTarget) {
    let colors = state.theme.colors();
    let (percent_y, hint, placeholder) = match target {
        EditTarget::Caption => (50, "Esc: done  Enter: new line", ""),
        EditTarget::Idea => (30, "Enter: save  Esc: cancel", "A cozy coffee shop on a rainy day..."),
        EditTarget::UploadPath => (20, "Enter: attach  Esc: cancel", "~/Pictures/photo.jpg"),
        EditTarget::ScheduleTime => (
            20,
            "Enter: schedule  Esc: cancel",
            "in 2h, 15:00, 3pm, 2030-01-15 09:30",
        ),
        EditTarget::ApiKey(_) => (20, "Enter: save  Esc: cancel", ""),
    };
    let popup_area = centered_rect(60, percent_y, frame.area());

    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(bg_block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .margin(1)
        .split(popup_area);

    let block = panel(&colors, format!(" {} ", target.label()), true);
    frame.render_widget(block, popup_area);

    let text = if state.edit_buffer.is_empty() {
        Paragraph::new(Span::styled(placeholder, colors.text_muted()))
    } else {
        Paragraph::new(state.edit_buffer.as_str()).style(colors.text())
    };
    frame.render_widget(text, chunks[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(hint, colors.text_muted())).alignment(Alignment::Right),
        chunks[1],
    );

    // Cursor at the end of the buffer
    let last_line = state.edit_buffer.rsplit('\n').next().unwrap_or_default();
    let line_idx = state.edit_buffer.matches('\n').count() as u16;
    let x = chunks[0].x + (last_line.width() as u16).min(chunks[0].width.saturating_sub(1));
    let y = chunks[0].y + line_idx.min(chunks[0].height.saturating_sub(1));
    frame.set_cursor_position((x, y));
}

fn help_line<'a>(colors: &ThemeColors, keys: &'a str, text: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {keys:<17}"), colors.key_hint()),
        Span::styled(text, colors.text()),
    ])
}

fn help_section<'a>(colors: &ThemeColors, title: &'a str) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        colors.text_primary().add_modifier(Modifier::BOLD),
    ))
}

fn render_help_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 70, frame.area());

    // First render a solid background block to cover everything underneath
    let bg_block = Block::default().style(Style::default().bg(colors.bg_secondary));
    frame.render_widget(Clear, popup_area);
    frame.render_widget(bg_block, popup_area);

    let help_content = vec![
        Line::from(""),
        help_section(&colors, "Navigation"),
        help_line(&colors, "1-4", "Jump to a view"),
        help_line(&colors, "Tab / Shift+Tab", "Next / previous view"),
        help_line(&colors, "t", "Toggle light/dark"),
        help_line(&colors, "L", "Log out"),
        Line::from(""),
        help_section(&colors, "Create"),
        help_line(&colors, "i", "Describe your idea"),
        help_line(&colors, "u / x", "Upload / remove image"),
        help_line(&colors, "←/→ Space", "Choose platforms"),
        help_line(&colors, "Enter", "Generate"),
        help_line(&colors, "Esc", "Cancel generation"),
        Line::from(""),
        help_section(&colors, "Review & Schedule"),
        help_line(&colors, "←/→", "Switch platform"),
        help_line(&colors, "e / c", "Edit / copy caption"),
        help_line(&colors, "i / #", "Improve writing / hashtags"),
        help_line(&colors, "s / p", "Schedule / publish now"),
        help_line(&colors, "n", "Start a new draft"),
        Line::from(""),
        help_section(&colors, "Connections & Settings"),
        help_line(&colors, "j/k", "Move"),
        help_line(&colors, "Enter / d", "Connect / disconnect"),
        help_line(&colors, "e s d v o", "Edit, save, delete, show, get key"),
        Line::from(""),
        help_line(&colors, "q", "Quit"),
    ];

    let help = Paragraph::new(help_content).block(
        Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.block_focus()),
    );
    frame.render_widget(help, popup_area);
}

/// Helper function to create a centered rect
const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}
