mod grid;
mod tree;
mod widget;
pub(crate) use self::grid::{
    build_month_grid, days_in_month, CalendarDate, InvalidDateError, MonthGrid,
};
pub(crate) use self::tree::render_tree;
pub(crate) use self::widget::{plain_text, Calendar};
