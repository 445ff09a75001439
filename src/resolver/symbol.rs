// Symbols produced by resolution and consumed by the code generator.

use crate::ast::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Global,
    Local,
    Param,
}

/// One declared name. `which` is the position within its own declarative
/// group; `which_total` counts across all locals and parameters of the
/// enclosing function and fixes the stack-slot offset. Globals carry zeros
/// for both and are addressed by name.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub ty: Type,
    pub name: String,
    pub which: usize,
    pub which_total: usize,
}

impl Symbol {
    pub fn new(kind: SymbolKind, ty: Type, name: &str, which: usize, which_total: usize) -> Self {
        Self {
            kind,
            ty,
            name: name.to_string(),
            which,
            which_total,
        }
    }

    /// The operand the code generator uses to address this symbol: globals
    /// by name (address-of for strings and arrays), locals and parameters
    /// relative to the frame pointer.
    pub fn storage_location(&self) -> String {
        match self.kind {
            SymbolKind::Global => match self.ty {
                Type::String | Type::Array { .. } => format!("${}", self.name),
                _ => self.name.clone(),
            },
            SymbolKind::Local | SymbolKind::Param => {
                format!("{}(%rbp)", -8 * self.which_total as i64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn global_scalars_are_addressed_by_name() {
        let s = Symbol::new(SymbolKind::Global, Type::Integer, "count", 0, 0);
        assert_eq!(s.storage_location(), "count");
    }

    #[test]
    fn global_strings_and_arrays_take_the_address_form() {
        let s = Symbol::new(SymbolKind::Global, Type::String, "greeting", 0, 0);
        assert_eq!(s.storage_location(), "$greeting");

        let arr = Type::array(Type::Integer, Some(Expr::integer(3)));
        let a = Symbol::new(SymbolKind::Global, arr, "values", 0, 0);
        assert_eq!(a.storage_location(), "$values");
    }

    #[test]
    fn locals_and_params_are_frame_relative() {
        let p = Symbol::new(SymbolKind::Param, Type::Integer, "a", 1, 1);
        assert_eq!(p.storage_location(), "-8(%rbp)");

        let l = Symbol::new(SymbolKind::Local, Type::Integer, "x", 1, 3);
        assert_eq!(l.storage_location(), "-24(%rbp)");
    }
}
