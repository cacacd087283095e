use crate::app::{App, Areas, Focus, REMOVE_CONTROL, clamp, list_inner};
use pairwatch::{LOADING, PollerState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Split the screen. The detail panel only gets space while it is open.
pub fn layout(area: Rect, detail_open: bool) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    let filters = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(left[1]);

    let (favorites, detail) = if detail_open {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(columns[1]);
        (right[0], Some(right[1]))
    } else {
        (columns[1], None)
    };

    Areas {
        filter: left[0],
        quote_assets: filters[0],
        statuses: filters[1],
        pairs: left[2],
        favorites,
        detail,
        status_bar: rows[1],
    }
}

pub fn render(f: &mut Frame, app: &mut App) {
    let areas = layout(f.area(), app.watcher.detail().is_open());
    app.areas = areas;

    render_filter(f, app, areas.filter);
    render_quote_assets(f, app, areas.quote_assets);
    render_statuses(f, app, areas.statuses);
    render_pairs(f, app, areas.pairs);
    render_favorites(f, app, areas.favorites);
    if let Some(area) = areas.detail {
        render_detail(f, app, area);
    }
    render_status_bar(f, app, areas.status_bar);
}

fn block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        })
}

fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

fn render_filter(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Filter;
    let line = if app.filter_input.is_empty() && !focused {
        Line::from(Span::styled(
            "Filter pairs",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(app.filter_input.as_str()),
            if focused {
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))
            } else {
                Span::raw("")
            },
        ])
    };

    f.render_widget(Paragraph::new(line).block(block("FILTER", focused)), area);
}

fn checklist<'a>(options: &[String], selected: impl Fn(&str) -> bool) -> Vec<ListItem<'a>> {
    options
        .iter()
        .map(|option| {
            let (mark, style) = if selected(option) {
                ("[x]", Style::default().fg(Color::Green))
            } else {
                ("[ ]", Style::default())
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} {}", mark, option),
                style,
            )))
        })
        .collect()
}

fn render_quote_assets(f: &mut Frame, app: &mut App, area: Rect) {
    let filter = app.watcher.filter();
    let items = checklist(app.watcher.catalog().quote_assets(), |asset| {
        filter.quote_assets().contains(asset)
    });
    clamp(&mut app.quote_asset_list, items.len());

    let list = List::new(items)
        .block(block("QUOTE ASSETS", app.focus == Focus::QuoteAssets))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut app.quote_asset_list);
}

fn render_statuses(f: &mut Frame, app: &mut App, area: Rect) {
    let filter = app.watcher.filter();
    let items = checklist(app.watcher.catalog().statuses(), |status| {
        filter.statuses().contains(status)
    });
    clamp(&mut app.status_list, items.len());

    let list = List::new(items)
        .block(block("STATUS", app.focus == Focus::Statuses))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut app.status_list);
}

fn render_pairs(f: &mut Frame, app: &mut App, area: Rect) {
    let favorites = app.watcher.favorites();
    let visible = app.watcher.visible_pairs();
    let title = format!("CURRENCY PAIRS ({}/{})", visible.len(), app.watcher.catalog().len());

    let items: Vec<ListItem<'_>> = visible
        .iter()
        .map(|pair| {
            let favorite = favorites.contains(pair.id.as_str());
            ListItem::new(Line::from(vec![
                Span::styled(
                    if favorite { "* " } else { "  " },
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    pair.id.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" (Status: {})", pair.status),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();
    clamp(&mut app.pair_list, items.len());

    let list = List::new(items)
        .block(block(&title, app.focus == Focus::Pairs))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut app.pair_list);
}

fn render_favorites(f: &mut Frame, app: &mut App, area: Rect) {
    let width = usize::from(list_inner(area).width);
    let text_width = width.saturating_sub(REMOVE_CONTROL.len());
    let open = app.watcher.detail().open_pair();

    let items: Vec<ListItem<'_>> = app
        .watcher
        .favorites()
        .iter()
        .map(|pair| {
            let price = app.watcher.price_label(pair.as_str());
            let text = format!("{} - {}", pair, price);
            let text_style = if open == Some(pair) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if price == LOADING {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(fit(&text, text_width), text_style),
                Span::styled(
                    REMOVE_CONTROL,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();
    clamp(&mut app.favorite_list, items.len());

    let list = List::new(items)
        .block(block("FAVORITE PAIRS", app.focus == Focus::Favorites))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut app.favorite_list);
}

/// Truncate or pad `text` to exactly `width` columns, keeping the remove control at the row end.
fn fit(text: &str, width: usize) -> String {
    let text: String = text.chars().take(width).collect();
    format!("{:<width$}", text)
}

fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    let Some(record) = app.watcher.detail().record() else {
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        record.pair.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(record.fields().into_iter().map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
            Span::raw(value.to_string()),
        ])
    }));

    f.render_widget(Paragraph::new(lines).block(block("DETAILS", false)), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let watcher = &app.watcher;

    let (poller, poller_color) = match watcher.poller_state() {
        PollerState::Polling => ("POLLING", Color::Green),
        PollerState::Idle => ("IDLE", Color::DarkGray),
    };
    let updated = watcher
        .prices()
        .updated_at()
        .map(|at| at.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(
            format!(" {} ", poller),
            Style::default().fg(poller_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "| {}/{} pairs | {} favorites | prices @ {} ",
            watcher.visible_pairs().len(),
            watcher.catalog().len(),
            watcher.favorites().len(),
            updated
        )),
    ];
    if let Some(pair) = watcher.detail().pending_pair() {
        spans.push(Span::styled(
            format!("| fetching {} details ", pair),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        "| Tab focus  Enter select  d details  x remove  drag row = details  q quit",
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
