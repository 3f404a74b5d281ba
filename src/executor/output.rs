//! Output callbacks
//!
//! The core never formats for a terminal. It hands text to two host
//! callbacks: `print` starts a new output line, `append` extends the line the
//! host is currently showing.

use std::cell::RefCell;
use std::rc::Rc;

pub type OutputFn = Box<dyn FnMut(&str)>;

pub struct Output {
    print: OutputFn,
    append: OutputFn,
}

impl Output {
    pub fn new(print: impl FnMut(&str) + 'static, append: impl FnMut(&str) + 'static) -> Self {
        Output {
            print: Box::new(print),
            append: Box::new(append),
        }
    }

    /// Output that goes nowhere
    pub fn discard() -> Self {
        Output::new(|_| {}, |_| {})
    }

    pub fn print(&mut self, text: &str) {
        (self.print)(text)
    }

    pub fn append(&mut self, text: &str) {
        (self.append)(text)
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Output")
    }
}

/* ===================== Transcript ===================== */

/// Collects output into lines
///
/// Clones share the same buffer, so one clone can be moved into the
/// callbacks while another is kept for reading.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(print, append)` callbacks feeding this transcript
    pub fn callbacks(&self) -> (impl FnMut(&str) + 'static, impl FnMut(&str) + 'static) {
        let print_lines = Rc::clone(&self.lines);
        let append_lines = Rc::clone(&self.lines);

        let print = move |text: &str| print_lines.borrow_mut().push(text.to_string());
        let append = move |text: &str| {
            let mut lines = append_lines.borrow_mut();
            match lines.last_mut() {
                Some(last) => last.push_str(text),
                None => lines.push(text.to_string()),
            }
        };
        (print, append)
    }

    pub fn output(&self) -> Output {
        let (print, append) = self.callbacks();
        Output::new(print, append)
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Every line terminated by a newline
    pub fn text(&self) -> String {
        self.lines
            .borrow()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}
