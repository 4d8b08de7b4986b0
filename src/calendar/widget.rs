use super::grid::DAYS_IN_WEEK;
use super::tree::{Node, Role};
use crate::theme::{SELECTED_STYLE, TITLE_STYLE, WEEKDAY_STYLE};
use ratatui::{prelude::*, widgets::*};

/// Number of columns from the start of one weekday column to the start of the
/// next
const DAY_WIDTH: u16 = 6;

/// Number of columns taken up by a single day number, including its brackets
/// or padding
const CELL_WIDTH: u16 = 4;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = DAY_WIDTH * 6 + CELL_WIDTH;

/// Number of lines taken up by the title, weekday labels, and rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

const ACS_HLINE: char = '─';

/// Draws the render tree of a month grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<'a> {
    tree: &'a Node,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(tree: &'a Node) -> Calendar<'a> {
        Calendar { tree }
    }

    /// Number of lines needed to draw a month spanning `weeks` calendar rows
    pub(crate) fn height_for_weeks(weeks: usize) -> u16 {
        let weeks = u16::try_from(weeks).unwrap_or(u16::MAX);
        HEADER_LINES.saturating_add(
            weeks
                .saturating_mul(WEEK_LINES)
                .saturating_sub(WEEK_LINES - 1),
        )
    }
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let area = Rect {
            x: area.x + left,
            width: MAIN_WIDTH.min(area.width),
            ..area
        };
        let mut canvas = BufferCanvas::new(area, buf);
        if let Some(heading) = self.tree.find(Role::Heading) {
            canvas.draw_title(&heading.text_content());
        }
        for (i, header) in std::iter::zip(0u16.., self.tree.find_all(Role::ColumnHeader)) {
            canvas.draw_weekday(i, &header.text_content());
        }
        canvas.hline(HEADER_LINES - 1, 0, ACS_HLINE, MAIN_WIDTH);
        for (i, cell) in std::iter::zip(0usize.., self.tree.find_all(Role::GridCell)) {
            let text = cell.text_content();
            if text.is_empty() {
                continue;
            }
            let Ok(week_no) = u16::try_from(i / DAYS_IN_WEEK) else {
                break;
            };
            let col = u16::try_from(i % DAYS_IN_WEEK).unwrap_or_default();
            canvas.draw_day(week_no, col, &text, cell.is_selected());
        }
    }
}

/// Draw the calendar into an off-screen buffer just big enough to hold it and
/// return the result as lines of text, with trailing whitespace removed
pub(crate) fn plain_text(tree: &Node) -> String {
    let weeks = tree.find_all(Role::GridCell).len().div_ceil(DAYS_IN_WEEK);
    let height = Calendar::height_for_weeks(weeks);
    let area = Rect::new(0, 0, MAIN_WIDTH, height);
    let mut buf = Buffer::empty(area);
    Calendar::new(tree).render(area, &mut buf);
    let mut s = String::new();
    for y in area.top()..area.bottom() {
        let line = (area.left()..area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>();
        s.push_str(line.trim_end());
        s.push('\n');
    }
    s
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        self.mvprint(
            0,
            self.area.width.saturating_sub(width) / 2,
            title,
            Some(TITLE_STYLE),
        );
    }

    fn draw_weekday(&mut self, col: u16, name: &str) {
        self.mvprint(1, DAY_WIDTH * col, name, Some(WEEKDAY_STYLE));
    }

    fn draw_day(&mut self, week_no: u16, col: u16, day: &str, selected: bool) {
        let (s, style) = if selected {
            (format!("[{day:>2}]"), Some(SELECTED_STYLE))
        } else {
            (format!(" {day:>2} "), None)
        };
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            DAY_WIDTH * col,
            s,
            style,
        );
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
