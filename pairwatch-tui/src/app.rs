//! Terminal application state and input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pairwatch::{PairId, Point, Watcher};
use ratatui::{
    layout::{Margin, Position, Rect},
    widgets::ListState,
};

/// Approximate size of one terminal cell in pixels, used to express mouse drags in the
/// pixel units the swipe thresholds are defined in.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Label of the remove control rendered at the end of every favorites row.
pub const REMOVE_CONTROL: &str = "[X]";

const PAGE: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filter,
    QuoteAssets,
    Statuses,
    Pairs,
    Favorites,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Filter,
        Focus::QuoteAssets,
        Focus::Statuses,
        Focus::Pairs,
        Focus::Favorites,
    ];

    fn next(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(index + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Screen areas from the most recent draw, used for mouse hit testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Areas {
    pub filter: Rect,
    pub quote_assets: Rect,
    pub statuses: Rect,
    pub pairs: Rect,
    pub favorites: Rect,
    pub detail: Option<Rect>,
    pub status_bar: Rect,
}

pub struct App {
    pub watcher: Watcher,
    pub focus: Focus,
    pub filter_input: String,
    pub quote_asset_list: ListState,
    pub status_list: ListState,
    pub pair_list: ListState,
    pub favorite_list: ListState,
    pub areas: Areas,
    /// Favorite row a left press started on. The matching release is routed back to it.
    pressed: Option<PairId>,
    pub should_quit: bool,
}

impl App {
    pub fn new(watcher: Watcher) -> Self {
        Self {
            watcher,
            focus: Focus::Filter,
            filter_input: String::new(),
            quote_asset_list: ListState::default(),
            status_list: ListState::default(),
            pair_list: ListState::default(),
            favorite_list: ListState::default(),
            areas: Areas::default(),
            pressed: None,
            should_quit: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Up => self.step(-1),
            KeyCode::Down => self.step(1),
            KeyCode::PageUp => self.step(-PAGE),
            KeyCode::PageDown => self.step(PAGE),
            _ if self.focus == Focus::Filter => self.on_filter_key(key.code),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('d') if self.focus == Focus::Favorites => {
                if let Some(pair) = self.selected_favorite() {
                    self.watcher.toggle_detail(pair.as_str());
                }
            }
            KeyCode::Char('x') | KeyCode::Delete if self.focus == Focus::Favorites => {
                if let Some(pair) = self.selected_favorite() {
                    self.watcher.remove_favorite(pair.as_str());
                }
            }
            _ => {}
        }
    }

    fn on_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.filter_input.push(c),
            KeyCode::Backspace => {
                self.filter_input.pop();
            }
            KeyCode::Enter => {
                self.focus = Focus::Pairs;
                return;
            }
            _ => return,
        }

        self.watcher.set_filter_text(self.filter_input.clone());
        self.pair_list.select(None);
        *self.pair_list.offset_mut() = 0;
    }

    /// Enter/Space on the focused list.
    fn activate(&mut self) {
        match self.focus {
            Focus::QuoteAssets => {
                let catalog = self.watcher.catalog();
                if let Some(asset) = selected(&self.quote_asset_list, catalog.quote_assets()) {
                    self.watcher.toggle_quote_asset(&asset);
                }
            }
            Focus::Statuses => {
                let catalog = self.watcher.catalog();
                if let Some(status) = selected(&self.status_list, catalog.statuses()) {
                    self.watcher.toggle_status(&status);
                }
            }
            Focus::Pairs => {
                let pair = self
                    .pair_list
                    .selected()
                    .and_then(|index| {
                        let visible = self.watcher.visible_pairs();
                        visible.get(index).map(|pair| pair.id.clone())
                    });
                if let Some(pair) = pair {
                    self.watcher.add_favorite(pair);
                }
            }
            Focus::Favorites => {
                if let Some(pair) = self.selected_favorite() {
                    self.watcher.toggle_detail(pair.as_str());
                }
            }
            Focus::Filter => {}
        }
    }

    fn selected_favorite(&self) -> Option<PairId> {
        self.favorite_list
            .selected()
            .and_then(|index| self.watcher.favorites().get_index(index).cloned())
    }

    fn step(&mut self, delta: isize) {
        let (state, len) = match self.focus {
            Focus::Filter => return,
            Focus::QuoteAssets => (
                &mut self.quote_asset_list,
                self.watcher.catalog().quote_assets().len(),
            ),
            Focus::Statuses => (&mut self.status_list, self.watcher.catalog().statuses().len()),
            Focus::Pairs => (&mut self.pair_list, self.watcher.visible_pairs().len()),
            Focus::Favorites => (&mut self.favorite_list, self.watcher.favorites().len()),
        };
        move_selection(state, len, delta);
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        let point = to_point(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.on_press(position, point),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(pair) = self.pressed.take() {
                    self.watcher.gesture_end(pair.as_str(), point);
                }
            }
            MouseEventKind::ScrollUp => self.on_scroll(position, -1),
            MouseEventKind::ScrollDown => self.on_scroll(position, 1),
            _ => {}
        }
    }

    fn on_press(&mut self, position: Position, point: Point) {
        let areas = self.areas;

        if areas.filter.contains(position) {
            self.focus = Focus::Filter;
        } else if let Some(index) = row_at(areas.quote_assets, &self.quote_asset_list, position) {
            self.focus = Focus::QuoteAssets;
            if let Some(asset) = self.watcher.catalog().quote_assets().get(index).cloned() {
                self.quote_asset_list.select(Some(index));
                self.watcher.toggle_quote_asset(&asset);
            }
        } else if let Some(index) = row_at(areas.statuses, &self.status_list, position) {
            self.focus = Focus::Statuses;
            if let Some(status) = self.watcher.catalog().statuses().get(index).cloned() {
                self.status_list.select(Some(index));
                self.watcher.toggle_status(&status);
            }
        } else if let Some(index) = row_at(areas.pairs, &self.pair_list, position) {
            self.focus = Focus::Pairs;
            let pair = self.watcher.visible_pairs().get(index).map(|p| p.id.clone());
            if let Some(pair) = pair {
                self.pair_list.select(Some(index));
                self.watcher.add_favorite(pair);
            }
        } else if let Some(index) = row_at(areas.favorites, &self.favorite_list, position) {
            self.focus = Focus::Favorites;
            let Some(pair) = self.watcher.favorites().get_index(index).cloned() else {
                return;
            };
            self.favorite_list.select(Some(index));

            if on_remove_control(areas.favorites, position) {
                self.watcher.remove_favorite(pair.as_str());
            } else {
                self.watcher.gesture_start(pair.as_str(), point);
                self.pressed = Some(pair);
            }
        }
    }

    fn on_scroll(&mut self, position: Position, delta: isize) {
        let areas = self.areas;
        let focus = [
            (areas.quote_assets, Focus::QuoteAssets),
            (areas.statuses, Focus::Statuses),
            (areas.pairs, Focus::Pairs),
            (areas.favorites, Focus::Favorites),
        ]
        .into_iter()
        .find(|(area, _)| area.contains(position))
        .map(|(_, focus)| focus);

        if let Some(focus) = focus {
            self.focus = focus;
            self.step(delta);
        }
    }
}

/// Convert a terminal cell into pixel coordinates.
pub fn to_point(column: u16, row: u16) -> Point {
    Point::new(
        f64::from(column) * CELL_WIDTH_PX,
        f64::from(row) * CELL_HEIGHT_PX,
    )
}

/// Content rect of a bordered list block.
pub fn list_inner(area: Rect) -> Rect {
    area.inner(Margin::new(1, 1))
}

/// Index of the list row under `position`, if any.
fn row_at(area: Rect, state: &ListState, position: Position) -> Option<usize> {
    let inner = list_inner(area);
    if !inner.contains(position) {
        return None;
    }
    Some(state.offset() + usize::from(position.y - inner.y))
}

fn on_remove_control(area: Rect, position: Position) -> bool {
    let inner = list_inner(area);
    let width = REMOVE_CONTROL.len() as u16;
    position.x >= inner.right().saturating_sub(width)
}

fn selected(state: &ListState, options: &[String]) -> Option<String> {
    state.selected().and_then(|index| options.get(index).cloned())
}

/// Move the selection by `delta` rows, clamped to `len`.
fn move_selection(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().map_or(-1, |index| index as isize);
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
}

/// Keep a selection inside a list that may have shrunk since the last draw.
pub fn clamp(state: &mut ListState, len: usize) {
    match state.selected() {
        Some(_) if len == 0 => state.select(None),
        Some(index) if index >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_selection() {
        struct TestCase {
            selected: Option<usize>,
            len: usize,
            delta: isize,
            expected: Option<usize>,
        }

        let tests = vec![
            TestCase {
                // TC0: first Down selects the first row
                selected: None,
                len: 5,
                delta: 1,
                expected: Some(0),
            },
            TestCase {
                // TC1: clamped at the end
                selected: Some(4),
                len: 5,
                delta: 1,
                expected: Some(4),
            },
            TestCase {
                // TC2: page up clamps at the top
                selected: Some(3),
                len: 5,
                delta: -10,
                expected: Some(0),
            },
            TestCase {
                // TC3: empty list clears the selection
                selected: Some(2),
                len: 0,
                delta: 1,
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let mut state = ListState::default().with_selected(test.selected);
            move_selection(&mut state, test.len, test.delta);
            assert_eq!(state.selected(), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_row_at_respects_border_and_offset() {
        let area = Rect::new(10, 5, 30, 10);
        let state = ListState::default().with_offset(4);

        // Border rows and columns are not list rows
        assert_eq!(row_at(area, &state, Position::new(10, 7)), None);
        assert_eq!(row_at(area, &state, Position::new(20, 5)), None);

        // First content row maps to the offset
        assert_eq!(row_at(area, &state, Position::new(11, 6)), Some(4));
        assert_eq!(row_at(area, &state, Position::new(20, 8)), Some(6));
    }

    #[test]
    fn test_on_remove_control() {
        let area = Rect::new(0, 0, 40, 10);
        // Inner rect spans columns 1..39, control occupies the last three
        assert!(on_remove_control(area, Position::new(36, 1)));
        assert!(on_remove_control(area, Position::new(38, 1)));
        assert!(!on_remove_control(area, Position::new(35, 1)));
    }

    #[test]
    fn test_horizontal_drag_across_cells_is_a_swipe() {
        use pairwatch::Gesture;

        // 10 columns = 80px, same row
        let start = to_point(20, 4);
        assert_eq!(Gesture::classify(start, to_point(30, 4)), Gesture::Swipe);

        // 2 columns = 16px
        assert_eq!(Gesture::classify(start, to_point(22, 4)), Gesture::Tap);
    }

    #[test]
    fn test_focus_cycle() {
        let mut focus = Focus::Filter;
        for _ in 0..Focus::ORDER.len() {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Filter);
        assert_eq!(Focus::Filter.previous(), Focus::Favorites);
    }
}
