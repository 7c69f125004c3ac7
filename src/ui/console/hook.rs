use crate::debugger::{EventHook, MarkerKind, SourcePlace, Variable};
use crate::ui::console::file::FileView;
use crate::ui::console::print::style::{EchoView, ErrorView, FilePathView, KeywordView};
use crate::ui::console::print::ExternalPrinter;
use crate::ui::console::variable::render_variables;
use crate::ui::console::Control;
use indexmap::IndexSet;
use log::warn;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

/// Number of source lines shown before and after the current one.
const SOURCE_BOUNDS: u64 = 2;

/// True if both names point to the same file, one of them may be a relative path or
/// a bare file name.
fn same_file(a: &str, b: &str) -> bool {
    a == b || Path::new(a).ends_with(b) || Path::new(b).ends_with(a)
}

pub struct TerminalHook {
    printer: Rc<ExternalPrinter>,
    control_rx: Rc<Receiver<Control>>,
    file_view: FileView,
    markers: RefCell<IndexSet<(SourcePlace, MarkerKind)>>,
}

impl TerminalHook {
    pub fn new(printer: Rc<ExternalPrinter>, control_rx: Rc<Receiver<Control>>) -> Self {
        Self {
            printer,
            control_rx,
            file_view: FileView::new(),
            markers: RefCell::default(),
        }
    }

    fn breakpoint_lines(&self, file: &str) -> Vec<u64> {
        self.markers
            .borrow()
            .iter()
            .filter(|(place, kind)| *kind == MarkerKind::Breakpoint && same_file(&place.file, file))
            .map(|(place, _)| place.line)
            .collect()
    }
}

impl EventHook for TerminalHook {
    fn insert_marker(&self, place: &SourcePlace, kind: MarkerKind) {
        if self.markers.borrow_mut().insert((place.clone(), kind)) && kind == MarkerKind::Breakpoint
        {
            self.printer.println(format!(
                "Breakpoint at {}:{}",
                FilePathView::from(&place.file),
                place.line
            ));
        }
    }

    fn remove_marker(&self, place: &SourcePlace, kind: MarkerKind) {
        if self
            .markers
            .borrow_mut()
            .shift_remove(&(place.clone(), kind))
            && kind == MarkerKind::Breakpoint
        {
            self.printer.println(format!(
                "Remove breakpoint at {}:{}",
                FilePathView::from(&place.file),
                place.line
            ));
        }
    }

    fn clear_markers(&self, kind: MarkerKind) {
        self.markers.borrow_mut().retain(|(_, k)| *k != kind);
    }

    fn navigate(&self, place: &SourcePlace) -> anyhow::Result<()> {
        self.printer.println(format!(
            "Stopped at {}:{}",
            FilePathView::from(&place.file),
            place.line
        ));
        let source = self.file_view.render_source(
            place,
            SOURCE_BOUNDS,
            &self.breakpoint_lines(&place.file),
        )?;
        self.printer.print(source);
        Ok(())
    }

    fn show_error(&self, title: &str, text: &str) {
        self.printer
            .println(format!("{}: {text}", ErrorView::from(title)));
    }

    fn ask_yes_no(&self, title: &str, question: &str) -> bool {
        self.printer
            .print(format!("{}: {question} (y or n)", KeywordView::from(title)));

        match self.control_rx.recv() {
            Ok(Control::Cmd(answer)) => {
                let answer = answer.trim().to_lowercase();
                answer == "y" || answer == "yes"
            }
            Ok(Control::Interrupt) | Ok(Control::Terminate) => false,
            Err(e) => {
                warn!(target: "debugger", "no answer: {e}");
                false
            }
        }
    }

    fn refresh_variables(&self, variables: &[Variable]) {
        if variables.is_empty() {
            return;
        }
        self.printer.print(render_variables(variables));
    }

    fn show_text(&self, title: &str, text: &str) {
        self.printer
            .print(format!("{}:\n{text}", KeywordView::from(title)));
    }

    fn on_echo(&self, traffic: &str) {
        self.printer.print(EchoView::from(traffic.trim_end()));
    }

    fn on_debugee_output(&self, output: &[u8]) {
        self.printer.print(String::from_utf8_lossy(output));
    }
}
