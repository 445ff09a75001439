//! Ordered sink for resolve and type diagnostics.
//!
//! Errors in those passes are recoverable: each is reported once, traversal
//! continues, and the pass folds an aggregate success flag. The sink prints
//! every line as it arrives (the externally observable error stream) and
//! keeps it for programmatic inspection.

#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: String) {
        println!("{}", message);
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
