/// Growable buffer that collects raw debugger output between two command boundaries.
///
/// Callers must not keep a [`OutputPool::snapshot`] across an [`OutputPool::append`] call,
/// borrow rules enforce that.
#[derive(Default, Debug)]
pub struct OutputPool {
    buf: Vec<u8>,
}

impl OutputPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Remove everything after the last newline, a buffer without newline becomes empty.
    pub fn drop_last_line(&mut self) {
        let keep = self
            .buf
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|pos| pos + 1)
            .unwrap_or_default();
        self.buf.truncate(keep);
    }

    /// Cut off everything starting at `len` offset.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    pub fn snapshot(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True if buffer contains only whitespaces or control characters.
    pub fn is_blank(&self) -> bool {
        self.buf.iter().all(|&b| b <= b' ')
    }

    /// Return accumulated output as a text and reset the pool.
    pub fn take_text(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        self.reset();
        text
    }
}
