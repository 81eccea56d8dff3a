//! TUI rendering logic for the browser.

use cinefav_core::{FavoriteMovie, MovieDetails, SearchSnapshot};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::state::{ActivePane, BrowserState, DetailView, InputMode};

/// Marker shown next to favorite rows.
const FAVORITE_MARK: &str = "\u{2605}";

/// Data read from the core for one frame.
#[derive(Debug)]
pub struct BrowserView<'a> {
    /// Search session.
    pub search: &'a SearchSnapshot,
    /// Favorites collection.
    pub favorites: &'a [FavoriteMovie],
}

impl BrowserView<'_> {
    fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f.id == id)
    }
}

fn pane_border(state: &BrowserState, pane: ActivePane) -> Style {
    if state.active_pane == pane && state.input_mode == InputMode::Normal {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState, view: &BrowserView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // query input
            Constraint::Min(5),    // lists
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_query(frame, chunks[0], state, view);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    draw_results(frame, panes[0], state, view);
    draw_favorites(frame, panes[1], state, view);
    draw_footer(frame, chunks[2], state);

    if let Some(detail) = &state.detail {
        draw_detail(frame, frame.area(), detail, view);
    }
}

/// Draws the query input with a result summary.
fn draw_query(frame: &mut Frame, area: Rect, state: &BrowserState, view: &BrowserView<'_>) {
    let style = if state.input_mode == InputMode::Query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search = view.search;
    let summary = if search.is_loading() {
        String::from(" Searching... ")
    } else if search.input.trim().is_empty() {
        String::from(" Search: / ")
    } else {
        format!(
            " {} of {} results ",
            search.items.len(),
            search.total_available
        )
    };

    let input = Paragraph::new(state.query.as_str())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(summary));
    frame.render_widget(input, area);
}

/// Draws the results pane (left), or its empty-state message.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowserState, view: &BrowserView<'_>) {
    let search = view.search;
    let title = if search.input.trim().is_empty() {
        " Popular "
    } else {
        " Results "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(pane_border(state, ActivePane::Results));

    let items = search.display_items();
    if items.is_empty() {
        let message = match (&search.error, search.is_loading()) {
            (_, true) => String::from("Loading..."),
            (Some(err), false) => err.to_string(),
            (None, false) if search.input.trim().is_empty() => {
                String::from("Type to search movies.")
            }
            (None, false) => String::new(),
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            let mark = if view.is_favorite(&item.id) {
                FAVORITE_MARK
            } else {
                " "
            };
            Row::new(vec![
                String::from(mark),
                item.title.clone(),
                item.year.clone(),
                item.kind.clone().unwrap_or_default(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(8),
    ];

    let mut footer = None;
    if search.status.is_loading() {
        footer = Some("Loading more...");
    } else if let Some(err) = &search.error
        && err.is_transport()
    {
        footer = Some("Could not load more results.");
    }

    let block = match footer {
        Some(text) => block.title_bottom(Line::from(text)),
        None => block,
    };

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["", "Title", "Year", "Type"])
                .style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .bottom_margin(1),
        )
        .block(block)
        .row_highlight_style(highlight());

    frame.render_stateful_widget(table, area, &mut state.results_table_state);
}

/// Draws the favorites pane (right).
fn draw_favorites(
    frame: &mut Frame,
    area: Rect,
    state: &mut BrowserState,
    view: &BrowserView<'_>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Favorites ({}) ", view.favorites.len()))
        .border_style(pane_border(state, ActivePane::Favorites));

    if view.favorites.is_empty() {
        frame.render_widget(Paragraph::new("No favorites yet.").block(block), area);
        return;
    }

    let rows: Vec<Row> = view
        .favorites
        .iter()
        .map(|f| Row::new(vec![f.title.clone(), f.year.clone()]))
        .collect();
    let widths = [Constraint::Min(16), Constraint::Length(11)];

    let table = Table::new(rows, widths)
        .block(block)
        .row_highlight_style(highlight());

    frame.render_stateful_widget(table, area, &mut state.favorites_table_state);
}

/// Draws the footer with key hints or the latest notice.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if let Some(notice) = &state.notice {
        Line::from(notice.as_str()).style(Style::default().fg(Color::Red))
    } else if state.detail.is_some() {
        Line::from("Esc: close  f: favorite  o: open IMDb  Ctrl-C: quit")
    } else {
        match state.input_mode {
            InputMode::Query => {
                Line::from("Type to search | Enter/\u{2193}: results | Esc: clear | Ctrl-C: quit")
            }
            InputMode::Normal => Line::from(
                "\u{2191}\u{2193}/j/k: move  Space/f: favorite  Enter: details  o: open  Tab: pane  /: search  q: quit",
            ),
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Centers a `percent_x` by `percent_y` rectangle inside `area`.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn detail_lines(details: &MovieDetails) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(format!("{} ({})", details.title, details.year))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
    ];
    let fields = [
        ("Rated", &details.rated),
        ("Released", &details.released),
        ("Runtime", &details.runtime),
        ("Genre", &details.genre),
        ("Director", &details.director),
        ("Writer", &details.writer),
        ("Actors", &details.actors),
        ("IMDb", &details.imdb_rating),
        ("Box office", &details.box_office),
    ];
    lines.extend(
        fields
            .into_iter()
            .filter_map(|(label, value)| Some(Line::from(format!("{label}: {}", value.as_ref()?)))),
    );
    if let Some(plot) = &details.plot {
        lines.push(Line::from(""));
        lines.push(Line::from(plot.clone()));
    }
    lines
}

/// Draws the detail popup over the lists.
fn draw_detail(frame: &mut Frame, area: Rect, detail: &DetailView, view: &BrowserView<'_>) {
    let popup = centered(area, 70, 70);
    let mark = if view.is_favorite(detail.id()) {
        format!(" {FAVORITE_MARK} ")
    } else {
        String::new()
    };

    let lines = match detail {
        DetailView::Loading { id } => vec![Line::from(format!("Loading {id}..."))],
        DetailView::Loaded(details) => detail_lines(details),
        DetailView::Failed { message, .. } => vec![Line::from(message.clone())],
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {}{mark}", detail.id()))
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinefav_core::{FetchError, SearchResultItem};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn render(state: &mut BrowserState, view: &BrowserView<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| draw(frame, state, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_not_found_message_is_shown() {
        // Arrange
        let mut state = BrowserState::new();
        let search = SearchSnapshot {
            input: String::from("qwertyuiop"),
            error: Some(FetchError::NotFound {
                message: String::from("Movie not found!"),
            }),
            ..SearchSnapshot::default()
        };
        let view = BrowserView {
            search: &search,
            favorites: &[],
        };

        // Act
        let screen = render(&mut state, &view);

        // Assert
        assert!(screen.contains("Movie not found!"));
        assert!(screen.contains("No favorites yet."));
    }

    #[test]
    fn test_favorite_rows_are_marked() {
        // Arrange
        let mut state = BrowserState::new();
        let item = SearchResultItem {
            id: String::from("tt0372784"),
            title: String::from("Batman Begins"),
            year: String::from("2005"),
            poster_url: String::from("N/A"),
            kind: Some(String::from("movie")),
        };
        let search = SearchSnapshot {
            input: String::from("batman"),
            items: vec![item.clone()],
            total_available: 1,
            ..SearchSnapshot::default()
        };
        let favorites = vec![item.to_favorite()];
        let view = BrowserView {
            search: &search,
            favorites: &favorites,
        };
        state.sync(1, 1);

        // Act
        let screen = render(&mut state, &view);

        // Assert
        assert!(screen.contains(FAVORITE_MARK));
        assert!(screen.contains("Batman Begins"));
        assert!(screen.contains("Favorites (1)"));
        assert!(screen.contains("1 of 1 results"));
    }
}
