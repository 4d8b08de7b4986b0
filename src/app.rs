use crate::calendar::{
    build_month_grid, days_in_month, render_tree, Calendar, CalendarDate, InvalidDateError,
    MonthGrid,
};
use crate::help::Help;
use crate::picker::{DatePicker, PickerInput, PickerOutput, PickerState};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    DefaultTerminal,
};
use std::io::{self, Write};
use time::{Date, Duration, Month};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    today: Date,
    date: Date,
    // Always the grid for `date`
    grid: MonthGrid,
    state: AppState,
}

impl App {
    pub(crate) fn new(today: Date, date: CalendarDate) -> Result<App, InvalidDateError> {
        let grid = build_month_grid(date)?;
        Ok(App {
            today,
            date: date.to_date()?,
            grid,
            state: AppState::Calendar,
        })
    }

    pub(crate) fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        while !self.quitting() {
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or tried to move
    // outside the supported range of dates
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.previous_day(),
                KeyCode::Char('l') | KeyCode::Right => self.next_day(),
                KeyCode::Char('k') | KeyCode::Up => self.previous_week(),
                KeyCode::Char('j') | KeyCode::Down => self.next_week(),
                KeyCode::Char('p') | KeyCode::PageUp => self.previous_month(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next_month(),
                KeyCode::Char('0') | KeyCode::Home => self.select_date(self.today),
                KeyCode::Char('g') => {
                    self.state = AppState::Picking(PickerState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Picking(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let output = match key {
                    KeyCode::Char('-') => state.handle_input(PickerInput::Negative),
                    KeyCode::Char('+') => state.handle_input(PickerInput::Positive),
                    KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
                        Some(d) => state.handle_input(PickerInput::Digit(d)),
                        None => PickerOutput::Invalid,
                    },
                    KeyCode::Backspace | KeyCode::Delete => {
                        state.handle_input(PickerInput::Backspace)
                    }
                    KeyCode::Enter => state.handle_input(PickerInput::Enter),
                    _ => PickerOutput::Invalid,
                };
                match output {
                    PickerOutput::Ok => true,
                    PickerOutput::Invalid => false,
                    PickerOutput::Submit(date) => match self.select(date) {
                        Ok(()) => {
                            self.state = AppState::Calendar;
                            true
                        }
                        Err(e) => {
                            tracing::warn!(
                                year = date.year(),
                                month0 = date.month0(),
                                day = date.day(),
                                "rejected date entry: {e}"
                            );
                            false
                        }
                    },
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")?;
        io::stdout().flush()
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Recompute the grid for `date` and make it the selection.  On error,
    /// nothing changes.
    fn select(&mut self, date: CalendarDate) -> Result<(), InvalidDateError> {
        let grid = build_month_grid(date)?;
        self.date = date.to_date()?;
        self.grid = grid;
        tracing::info!(date = %self.date, title = self.grid.title(), "selected date");
        Ok(())
    }

    fn select_date(&mut self, date: Date) -> bool {
        self.select(CalendarDate::from(date)).is_ok()
    }

    fn next_day(&mut self) -> bool {
        self.date.next_day().is_some_and(|d| self.select_date(d))
    }

    fn previous_day(&mut self) -> bool {
        self.date.previous_day().is_some_and(|d| self.select_date(d))
    }

    fn next_week(&mut self) -> bool {
        self.date
            .checked_add(Duration::WEEK)
            .is_some_and(|d| self.select_date(d))
    }

    fn previous_week(&mut self) -> bool {
        self.date
            .checked_sub(Duration::WEEK)
            .is_some_and(|d| self.select_date(d))
    }

    fn next_month(&mut self) -> bool {
        let month = self.date.month().next();
        let year = if month == Month::January {
            self.date.year().checked_add(1)
        } else {
            Some(self.date.year())
        };
        year.is_some_and(|y| self.select_in_month(y, month))
    }

    fn previous_month(&mut self) -> bool {
        let month = self.date.month().previous();
        let year = if month == Month::December {
            self.date.year().checked_sub(1)
        } else {
            Some(self.date.year())
        };
        year.is_some_and(|y| self.select_in_month(y, month))
    }

    // Keeps the current day of the month, clamped to the length of the new
    // month
    fn select_in_month(&mut self, year: i32, month: Month) -> bool {
        let Ok(length) = days_in_month(year, month) else {
            return false;
        };
        let date = CalendarDate::new(year, u8::from(month) - 1, self.date.day().min(length));
        self.select(date).is_ok()
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let height = Calendar::height_for_weeks(self.grid.weeks().len());
        let top = area.height.saturating_sub(height) / 2;
        let cal_area = Rect {
            y: area.y + top,
            height: area.height - top,
            ..area
        };
        let tree = render_tree(&self.grid);
        Calendar::new(&tree).render(cal_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Picking(ref mut state) = self.state {
            DatePicker.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Picking(PickerState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE};
    use time::macros::date;

    fn app(date: Date) -> App {
        App::new(date!(2025 - 01 - 22), CalendarDate::from(date)).unwrap()
    }

    fn press_all(app: &mut App, keys: &str) {
        for ch in keys.chars() {
            assert!(app.handle_key(KeyCode::Char(ch)), "key {ch:?} rejected");
        }
    }

    #[test]
    fn test_render() {
        let mut app = app(date!(2022 - 10 - 03));
        let area = Rect::new(0, 0, 40, 16);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "                                        ",
            "              October 2022              ",
            "Sun   Mon   Tue   Wed   Thu   Fri   Sat ",
            "────────────────────────────────────────",
            "                                      1 ",
            "                                        ",
            "  2   [ 3]    4     5     6     7     8 ",
            "                                        ",
            "  9    10    11    12    13    14    15 ",
            "                                        ",
            " 16    17    18    19    20    21    22 ",
            "                                        ",
            " 23    24    25    26    27    28    29 ",
            "                                        ",
            " 30    31                               ",
            "                                        ",
        ]);
        expected.set_style(*expected.area(), BASE_STYLE);
        expected.set_style(Rect::new(14, 1, 12, 1), TITLE_STYLE);
        for i in 0..7 {
            expected.set_style(Rect::new(i * 6, 2, 3, 1), WEEKDAY_STYLE);
        }
        expected.set_style(Rect::new(6, 6, 4, 1), SELECTED_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_day_and_week_moves() {
        let mut app = app(date!(2022 - 10 - 31));
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.date, date!(2022 - 11 - 01));
        assert_eq!(app.grid.title(), "November 2022");
        assert_eq!(app.grid.selected_day(), Some(1));
        press_all(&mut app, "kk");
        assert_eq!(app.date, date!(2022 - 10 - 18));
        assert_eq!(app.grid.title(), "October 2022");
        press_all(&mut app, "hj");
        assert_eq!(app.date, date!(2022 - 10 - 24));
        assert_eq!(app.grid.selected_day(), Some(24));
    }

    #[test]
    fn test_month_moves_clamp_day() {
        let mut app = app(date!(2024 - 01 - 31));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.date, date!(2024 - 02 - 29));
        assert_eq!(app.grid.day_count(), 29);
        press_all(&mut app, "nnnnnnnnnnn");
        assert_eq!(app.date, date!(2025 - 01 - 29));
        press_all(&mut app, "p");
        assert_eq!(app.date, date!(2024 - 12 - 29));
        assert_eq!(app.grid.title(), "December 2024");
    }

    #[test]
    fn test_end_of_time() {
        let mut app = app(date!(9999 - 12 - 31));
        assert!(!app.handle_key(KeyCode::Right));
        assert!(!app.handle_key(KeyCode::Char('n')));
        assert!(!app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.date, date!(9999 - 12 - 31));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.date, date!(9999 - 11 - 30));
    }

    #[test]
    fn test_today() {
        let mut app = app(date!(2022 - 10 - 03));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.date, date!(2025 - 01 - 22));
        assert_eq!(app.grid.title(), "January 2025");
    }

    #[test]
    fn test_picker() {
        let mut app = app(date!(2022 - 10 - 03));
        press_all(&mut app, "g20240215");
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.date, date!(2024 - 02 - 15));
        assert_eq!(app.grid.day_count(), 29);
    }

    #[test]
    fn test_picker_rejects_invalid_date() {
        let mut app = app(date!(2022 - 10 - 03));
        press_all(&mut app, "g20230229");
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(matches!(app.state, AppState::Picking(_)));
        assert_eq!(app.date, date!(2022 - 10 - 03));
        assert_eq!(app.grid.title(), "October 2022");
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Calendar);
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app(date!(2022 - 10 - 03));
        press_all(&mut app, "?");
        assert_eq!(app.state, AppState::Helping);
        press_all(&mut app, "x");
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x')));
        press_all(&mut app, "q");
        assert!(app.quitting());
    }
}
