//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching business logic.
//!
//! ## For contributors
//!
//! * Home is a three-row split: label bar, feed (plus an optional detail
//!   pane on the right), and a one-line status bar.
//! * Login and Register share [`draw_auth_form`].
//! * Drawing the feed records which cards are on screen in
//!   [`App::visible`]; the main loop uses that to start similar-article
//!   lookups for cards as they appear.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LabelsState, Route};
use crate::article::ArticleCard;
use crate::feed::FeedState;
use crate::forms::{AuthForm, BannerKind};
use crate::similar::{group_by_source, Disclosure};

/// Rows taken by one article card in the feed list.
const CARD_HEIGHT: u16 = 2;

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match app.route {
        Route::Home => draw_home(app, frame, main_area),
        Route::Auth(mode) => draw_auth_form(app.form(mode), frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_home(app: &mut App, frame: &mut Frame, area: Rect) {
    let [labels_area, feed_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    draw_label_bar(app, frame, labels_area);

    if app.detail_open {
        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(feed_area);
        draw_feed(app, frame, list_area);
        draw_detail(app, frame, detail_area);
    } else {
        draw_feed(app, frame, feed_area);
    }
}

/// Render the label filter bar with the active label highlighted.
fn draw_label_bar(app: &App, frame: &mut Frame, area: Rect) {
    let labels = match &app.labels {
        LabelsState::Loaded(labels) if !labels.is_empty() => labels,
        _ => {
            let empty = Paragraph::new(Span::styled(
                " No categories found",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(empty, area);
            return;
        }
    };

    let active = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::Cyan);

    let mut spans = vec![Span::raw(" ")];
    let all_style = if app.selected_label.is_none() { active } else { inactive };
    spans.push(Span::styled(" All ", all_style));
    for (i, label) in labels.iter().enumerate() {
        let style = if app.selected_label == Some(i) { active } else { inactive };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {label} "), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the feed in whichever state it is in.
fn draw_feed(app: &mut App, frame: &mut Frame, area: Rect) {
    let query = app.feed.query();
    let title = format!(
        " News · sort: {} · page {} ",
        query.sort_by,
        app.feed.page()
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    let placeholder = match app.feed.state() {
        FeedState::Loading => Some(Line::styled(
            "Loading articles…",
            Style::default().fg(Color::Yellow),
        )),
        FeedState::Errored(message) => Some(Line::from(vec![
            Span::styled(
                "Could not load articles: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.as_str(), Style::default().fg(Color::Red)),
            Span::raw("  (r: retry)"),
        ])),
        FeedState::Empty => Some(Line::styled(
            "No articles found",
            Style::default().fg(Color::DarkGray),
        )),
        FeedState::Populated(_) => None,
    };

    if let Some(line) = placeholder {
        app.visible = 0..0;
        let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let now = Utc::now();
    let list_items: Vec<ListItem> = app
        .feed
        .articles()
        .iter()
        .map(|entry| {
            let card = ArticleCard::from(entry);
            let disclosure = app.similar.get(card.link);

            let heading = Line::styled(
                card.title.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            );

            let mut meta = vec![
                Span::styled(format!("[{}]", card.source), Style::default().fg(Color::Cyan)),
            ];
            if let Some(age) = card.age(now) {
                meta.push(Span::raw("  "));
                meta.push(Span::styled(age, Style::default().fg(Color::DarkGray)));
            }
            meta.push(Span::raw("  "));
            meta.push(disclosure_span(disclosure));
            meta.push(Span::raw("  "));
            meta.push(Span::styled(
                card.link.to_string(),
                Style::default().fg(Color::DarkGray),
            ));

            ListItem::new(vec![heading, Line::from(meta)])
        })
        .collect();
    let count = list_items.len();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);

    let inner_height = area.height.saturating_sub(2);
    let on_screen = inner_height.div_ceil(CARD_HEIGHT) as usize;
    let offset = app.list_state.offset();
    app.visible = offset..(offset + on_screen).min(count);
}

/// Short summary of other coverage shown on a card.
fn disclosure_span(disclosure: Option<&Disclosure>) -> Span<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    match disclosure {
        None | Some(Disclosure::Pending) => Span::styled("…", dim),
        Some(other) => {
            let sources = group_by_source(other.entries()).len();
            match sources {
                0 => Span::styled("no other sources", dim),
                1 => Span::styled("+1 other source", Style::default().fg(Color::Green)),
                n => Span::styled(format!("+{n} other sources"), Style::default().fg(Color::Green)),
            }
        }
    }
}

/// Render the full article plus its similar coverage grouped by source.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Article ").borders(Borders::ALL);
    let Some(entry) = app.selected_article() else {
        frame.render_widget(block, area);
        return;
    };
    let card = ArticleCard::from(entry);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::styled(
            card.title.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::styled(card.source.to_string(), Style::default().fg(Color::Cyan)),
            Span::raw(card.age(Utc::now()).map(|a| format!("  {a}")).unwrap_or_default()),
        ]),
        Line::raw(""),
    ];
    if let Some(description) = card.description {
        lines.push(Line::raw(description.to_string()));
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(vec![
        Span::styled("Link: ", label),
        Span::raw(card.link.to_string()),
    ]));
    if let Some(photo) = card.photo {
        lines.push(Line::from(vec![
            Span::styled("Photo: ", label),
            Span::raw(photo.to_string()),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Also covered by",
        Style::default().add_modifier(Modifier::BOLD),
    ));

    match app.similar.get(card.link) {
        None | Some(Disclosure::Pending) => lines.push(Line::styled("  looking…", label)),
        Some(disclosure) => {
            let groups = group_by_source(disclosure.entries());
            if groups.is_empty() {
                lines.push(Line::styled("  no other sources", label));
            }
            for (source, links) in groups {
                lines.push(Line::styled(
                    format!("  {source}"),
                    Style::default().fg(Color::Cyan),
                ));
                for link in links {
                    lines.push(Line::raw(format!("    {link}")));
                }
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render a login or registration form with its banners.
fn draw_auth_form(form: &AuthForm, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", form.mode().title()))
        .borders(Borders::ALL);

    let mut lines = Vec::new();
    for banner in &form.banners {
        let color = match banner.kind {
            BannerKind::Success => Color::Green,
            BannerKind::Error => Color::Red,
        };
        lines.push(Line::styled(
            banner.message.clone(),
            Style::default().fg(color),
        ));
    }
    if !form.banners.is_empty() {
        lines.push(Line::raw(""));
    }

    for &field in form.fields() {
        let focused = form.focused() == field;
        let value = form.value(field);
        let shown = if field.is_secret() {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let marker = if focused { "▸ " } else { "  " };
        let style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<18}", format!("{}:", field.label())), style),
            Span::raw(shown),
        ]));
    }

    if form.passwords_mismatch() && !form.confirm.is_empty() {
        lines.push(Line::styled(
            "  Passwords do not match",
            Style::default().fg(Color::Red),
        ));
    }
    if form.is_submitting() {
        lines.push(Line::styled("  Submitting…", Style::default().fg(Color::Yellow)));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "  Enter: submit  Tab: next field  Esc: back",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let session = match (app.session.logged_in, app.session.admin) {
        (true, true) => "admin",
        (true, false) => "logged in",
        (false, _) => "guest",
    };
    let help = match app.route {
        Route::Home if app.session.logged_in => {
            "  q: quit  ↑/↓: scroll  Enter: open  Tab: label  s: sort  n/p: page  r: reload  o: logout"
        }
        Route::Home => {
            "  q: quit  ↑/↓: scroll  Enter: open  Tab: label  s: sort  n/p: page  r: reload  L: login  R: register"
        }
        Route::Auth(_) => "  Esc: back",
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} articles", app.feed.articles().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(format!("[{session}]"), Style::default().fg(Color::Magenta)),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}
