use log::debug;
use rustyline::history::History;
use rustyline::{Editor, ExternalPrinter as RLExternalPrinter, Helper};
use std::cell::RefCell;
use std::fmt::Display;

/// Where console messages go.
enum Sink {
    /// Messages are printed above a line that user is typing.
    Editor(RefCell<Box<dyn RLExternalPrinter>>),
    /// Plain stdout, used if editor can not print asynchronously (not a terminal, for example).
    Stdout,
}

/// Prints debugger events while the editor thread waits for a user command.
pub struct ExternalPrinter {
    sink: Sink,
}

impl ExternalPrinter {
    pub fn new<H: Helper, I: History>(editor: &mut Editor<H, I>) -> Self {
        let sink = match editor.create_external_printer() {
            Ok(printer) => Sink::Editor(RefCell::new(Box::new(printer))),
            Err(e) => {
                debug!(target: "debugger", "external printer unavailable, use stdout: {e}");
                Sink::Stdout
            }
        };
        Self { sink }
    }

    pub fn print(&self, msg: impl Display) {
        let msg = msg.to_string();
        match &self.sink {
            Sink::Stdout => println!("{msg}"),
            Sink::Editor(printer) => {
                if let Err(e) = printer.borrow_mut().print(msg.clone()) {
                    debug!(target: "debugger", "external printer: {e}");
                    println!("{msg}");
                }
            }
        }
    }

    /// Print a message followed by an empty line.
    pub fn println(&self, msg: impl Display) {
        self.print(format!("{msg}\n"))
    }
}

pub mod style {
    use crate::ui::config;
    use crossterm::style::{Color, Stylize};
    use std::fmt::{Display, Formatter};

    fn paint(f: &mut Formatter<'_>, value: &impl Display, color: Color) -> std::fmt::Result {
        if config::current().colored {
            write!(f, "{}", value.to_string().with(color))
        } else {
            write!(f, "{value}")
        }
    }

    /// Declare a wrapper that renders a value in a fixed color, colors are dropped
    /// if disabled in configuration.
    macro_rules! view_struct {
        ($name: ident, $color: expr) => {
            pub struct $name<T: Display>(T);

            impl<T: Display> From<T> for $name<T> {
                fn from(value: T) -> Self {
                    Self(value)
                }
            }

            impl<T: Display> Display for $name<T> {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    paint(f, &self.0, $color)
                }
            }
        };
    }

    view_struct!(LineNumberView, Color::Blue);
    view_struct!(FilePathView, Color::Green);
    view_struct!(ValueView, Color::Yellow);
    view_struct!(KeywordView, Color::Magenta);
    view_struct!(EchoView, Color::DarkGrey);
    view_struct!(ErrorView, Color::Red);
}
