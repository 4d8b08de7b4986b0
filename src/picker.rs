use crate::calendar::CalendarDate;
use crate::theme::{
    picker::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 17;
const OUTER_HEIGHT: u16 = 8;

/// Number of digits in a full `YYYY-MM-DD` entry; the cursor sits here once
/// the entry is ready to submit
const ENTER_POS: usize = 8;

/// Popup for typing in a date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DatePicker;

impl StatefulWidget for DatePicker {
    type State = PickerState;

    /*
     * .................
     * .┌ Select Date ┐.
     * .│             │.
     * .│ -YYYY-MM-DD │.
     * .│             │.
     * .│   [ENTER]   │.
     * .└─────────────┘.
     * .................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title("Select Date")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PickerState {
    negative: bool,
    // Year digits, then month digits, then day digits
    digits: [Option<u8>; ENTER_POS],
    pos: usize,
}

impl PickerState {
    pub(crate) fn new() -> PickerState {
        PickerState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Only the "[ENTER]" text and not its centering padding should be
            // underlined, so style a span rather than the line.
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            if self.negative { "-" } else { " " },
            BASE_STYLE,
        )];
        for (i, dg) in self.digits.iter().enumerate() {
            if i == 4 || i == 6 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            spans.push(match dg {
                Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                None => Span::styled(placeholder(i), UNFILLED_CELL_STYLE),
            });
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: PickerInput) -> PickerOutput {
        match (input, self.pos) {
            (PickerInput::Negative, 0) => {
                self.negative = !self.negative;
                PickerOutput::Ok
            }
            (PickerInput::Positive, 0) => {
                self.negative = false;
                PickerOutput::Ok
            }
            (PickerInput::Digit(d), 0..ENTER_POS) if d < 10 => {
                self.digits[self.pos] = Some(d);
                self.pos += 1;
                PickerOutput::Ok
            }
            (PickerInput::Backspace, 1..) => {
                self.pos -= 1;
                self.digits[self.pos] = None;
                PickerOutput::Ok
            }
            (PickerInput::Enter, ENTER_POS) => match self.to_calendar_date() {
                Some(date) => PickerOutput::Submit(date),
                None => PickerOutput::Invalid,
            },
            _ => PickerOutput::Invalid,
        }
    }

    // Returns `None` if any digit is missing or the month is zero.  Other
    // out-of-range components are left for the grid builder to reject.
    fn to_calendar_date(self) -> Option<CalendarDate> {
        let mut year = 0i32;
        for &d in &self.digits[0..4] {
            year = year * 10 + i32::from(d?);
        }
        if self.negative {
            year = -year;
        }
        let month = self.number(4..6)?;
        let day = self.number(6..8)?;
        Some(CalendarDate::new(year, month.checked_sub(1)?, day))
    }

    fn number(&self, range: std::ops::Range<usize>) -> Option<u8> {
        self.digits
            .get(range)?
            .iter()
            .try_fold(0u8, |acc, &d| Some(acc * 10 + d?))
    }
}

fn placeholder(pos: usize) -> &'static str {
    match pos {
        0..4 => "Y",
        4..6 => "M",
        _ => "D",
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerInput {
    Negative,
    Positive,
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerOutput {
    Ok,
    Invalid,
    Submit(CalendarDate),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(state: &mut PickerState, s: &str) {
        for ch in s.chars() {
            let d = u8::try_from(ch.to_digit(10).unwrap()).unwrap();
            assert_eq!(state.handle_input(PickerInput::Digit(d)), PickerOutput::Ok);
        }
    }

    #[test]
    fn test_submit() {
        let mut state = PickerState::new();
        assert_eq!(state.handle_input(PickerInput::Enter), PickerOutput::Invalid);
        type_digits(&mut state, "20221003");
        assert_eq!(
            state.handle_input(PickerInput::Digit(1)),
            PickerOutput::Invalid
        );
        assert_eq!(
            state.handle_input(PickerInput::Enter),
            PickerOutput::Submit(CalendarDate::new(2022, 9, 3))
        );
    }

    #[test]
    fn test_negative_year() {
        let mut state = PickerState::new();
        assert_eq!(state.handle_input(PickerInput::Negative), PickerOutput::Ok);
        type_digits(&mut state, "0044");
        assert_eq!(
            state.handle_input(PickerInput::Positive),
            PickerOutput::Invalid
        );
        type_digits(&mut state, "0315");
        assert_eq!(
            state.handle_input(PickerInput::Enter),
            PickerOutput::Submit(CalendarDate::new(-44, 2, 15))
        );
    }

    #[test]
    fn test_backspace() {
        let mut state = PickerState::new();
        assert_eq!(
            state.handle_input(PickerInput::Backspace),
            PickerOutput::Invalid
        );
        type_digits(&mut state, "20239");
        assert_eq!(state.handle_input(PickerInput::Backspace), PickerOutput::Ok);
        type_digits(&mut state, "0228");
        assert_eq!(
            state.handle_input(PickerInput::Enter),
            PickerOutput::Submit(CalendarDate::new(2023, 1, 28))
        );
    }

    #[test]
    fn test_month_zero() {
        let mut state = PickerState::new();
        type_digits(&mut state, "20230015");
        assert_eq!(state.handle_input(PickerInput::Enter), PickerOutput::Invalid);
    }

    #[test]
    fn test_unchecked_day() {
        let mut state = PickerState::new();
        type_digits(&mut state, "20230230");
        assert_eq!(
            state.handle_input(PickerInput::Enter),
            PickerOutput::Submit(CalendarDate::new(2023, 1, 30))
        );
    }

    #[test]
    fn test_line() {
        let mut state = PickerState::new();
        type_digits(&mut state, "202210");
        let line = state.to_line();
        let s = line
            .spans
            .iter()
            .map(|sp| sp.content.as_ref())
            .collect::<String>();
        assert_eq!(s, " 2022-10-DD");
        assert_eq!(line.spans.last().map(|sp| sp.style), Some(UNFILLED_CELL_STYLE));
    }
}
