use crate::debugger::SourcePlace;
use crate::ui::console::print::style::{KeywordView, LineNumberView};
use anyhow::Context;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::{fs, io};

const BREAKPOINT_GLYPH: char = '*';
const CURRENT_LINE_GLYPH: char = '>';

#[derive(Default)]
pub struct FileView {
    cached_lines: RefCell<HashMap<PathBuf, Box<[String]>>>,
}

impl FileView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `length` lines starting from `start` (zero-based).
    ///
    /// # Arguments
    ///
    /// * `file_path`: source file
    /// * `start`: first line index
    /// * `length`: lines count
    /// * `current`: line number (one-based) where debugee is stopped
    /// * `breakpoints`: line numbers (one-based) with breakpoints
    fn render(
        &self,
        file_path: &Path,
        start: u64,
        length: u64,
        current: u64,
        breakpoints: &[u64],
    ) -> anyhow::Result<String> {
        let mut cache = self.cached_lines.borrow_mut();
        if !cache.contains_key(file_path) {
            let file = fs::File::open(file_path)
                .with_context(|| format!("open {}", file_path.display()))?;
            let lines = io::BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .collect::<Vec<_>>();
            cache.insert(file_path.to_path_buf(), lines.into_boxed_slice());
        }
        let Some(file_lines) = cache.get(file_path) else {
            return Ok(String::new());
        };

        let result = file_lines
            .iter()
            .enumerate()
            .skip(start as usize)
            .take(length as usize)
            .fold(String::default(), |acc, (idx, line)| {
                let line_number = idx as u64 + 1;
                let bp = if breakpoints.contains(&line_number) {
                    BREAKPOINT_GLYPH
                } else {
                    ' '
                };

                if line_number == current {
                    format!(
                        "{acc}{bp}{} {} {line}\n",
                        KeywordView::from(CURRENT_LINE_GLYPH),
                        LineNumberView::from(format!("{line_number:>4}")),
                    )
                } else {
                    format!("{acc}{bp}  {line_number:>4} {line}\n")
                }
            });

        Ok(result)
    }

    /// Render source code around a place, `bounds` lines before and after it.
    pub fn render_source(
        &self,
        place: &SourcePlace,
        bounds: u64,
        breakpoints: &[u64],
    ) -> anyhow::Result<String> {
        let line_number = if place.line == 0 { 1 } else { place.line };
        let line_pos = line_number - 1;
        let start = line_pos.saturating_sub(bounds);

        self.render(
            Path::new(&place.file),
            start,
            bounds * 2 + 1,
            line_number,
            breakpoints,
        )
    }
}
