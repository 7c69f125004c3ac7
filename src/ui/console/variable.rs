use crate::debugger::Variable;
use crate::ui::console::print::style::{KeywordView, ValueView};
use itertools::Itertools;

const CHANGED_MARK: &str = "*";
const UNKNOWN_VALUE: &str = "<unknown>";

/// Render a single variables panel row: `#0 name = value`, changed values are marked,
/// watched expressions carry a watchpoint number.
pub fn render_variable(index: usize, var: &Variable) -> String {
    let mark = if var.changed { CHANGED_MARK } else { " " };
    let value = ValueView::from(var.value.as_deref().unwrap_or(UNKNOWN_VALUE));
    let mut row = format!("{mark}#{index} {} = {value}", KeywordView::from(&var.name));
    if let Some(number) = var.watch {
        row.push_str(&format!(" [watchpoint {number}]"));
    }
    row
}

pub fn render_variables(variables: &[Variable]) -> String {
    variables
        .iter()
        .enumerate()
        .map(|(i, var)| render_variable(i, var))
        .join("\n")
}
