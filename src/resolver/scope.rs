// Lexical scope chain: a stack of name-to-symbol frames, innermost last.

use std::collections::HashMap;
use std::rc::Rc;

use crate::resolver::symbol::Symbol;

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, Rc<Symbol>>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }

    /// Depth of the innermost frame; the global frame is level 1.
    pub fn level(&self) -> usize {
        self.frames.len()
    }

    /// Insert into the innermost frame, replacing any existing binding for
    /// the name there.
    pub fn bind(&mut self, name: &str, symbol: Rc<Symbol>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), symbol);
        }
    }

    /// Search frames innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<Rc<Symbol>> {
        for frame in self.frames.iter().rev() {
            if let Some(symbol) = frame.get(name) {
                return Some(Rc::clone(symbol));
            }
        }
        return None;
    }

    /// Search only the innermost frame.
    pub fn lookup_current(&self, name: &str) -> Option<Rc<Symbol>> {
        self.frames
            .last()
            .and_then(|frame| frame.get(name))
            .map(Rc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Type;
    use crate::resolver::symbol::{Symbol, SymbolKind};

    fn sym(kind: SymbolKind, name: &str) -> Rc<Symbol> {
        Rc::new(Symbol::new(kind, Type::Integer, name, 0, 0))
    }

    #[test]
    fn inner_binding_shadows_and_reverts() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        scopes.bind("x", sym(SymbolKind::Global, "x"));

        scopes.enter();
        scopes.bind("x", sym(SymbolKind::Local, "x"));
        assert!(matches!(
            scopes.lookup("x").unwrap().kind,
            SymbolKind::Local
        ));

        scopes.exit();
        assert!(matches!(
            scopes.lookup("x").unwrap().kind,
            SymbolKind::Global
        ));
    }

    #[test]
    fn lookup_current_ignores_outer_frames() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        scopes.bind("x", sym(SymbolKind::Global, "x"));
        scopes.enter();
        assert!(scopes.lookup_current("x").is_none());
        assert!(scopes.lookup("x").is_some());
    }

    #[test]
    fn level_counts_frames() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.level(), 0);
        scopes.enter();
        assert_eq!(scopes.level(), 1);
        scopes.enter();
        assert_eq!(scopes.level(), 2);
        scopes.exit();
        assert_eq!(scopes.level(), 1);
    }
}
