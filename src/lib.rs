pub mod debugger;
pub mod ui;
