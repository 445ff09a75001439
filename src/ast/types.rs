// Type descriptors for the cminor type system.

use crate::ast::ast_def::{Expr, ExprKind, Param};

/// A cminor type. Array sizes are kept as the original size expression so
/// the checker can inspect literal sizes; they are ignored by structural
/// equality.
#[derive(Debug, Clone)]
pub enum Type {
    Boolean,
    Character,
    Integer,
    String,
    Void,
    Array {
        element: Box<Type>,
        size: Option<Box<Expr>>,
    },
    Function {
        return_type: Box<Type>,
        params: Vec<Param>,
    },
}

impl Type {
    pub fn array(element: Type, size: Option<Expr>) -> Self {
        Self::Array {
            element: Box::new(element),
            size: size.map(Box::new),
        }
    }

    pub fn function(return_type: Type, params: Vec<Param>) -> Self {
        Self::Function {
            return_type: Box::new(return_type),
            params,
        }
    }

    /// Structural equality: same tag, element types equal for arrays (size
    /// not compared), return type and parameter type lists equal for
    /// functions (parameter names ignored).
    pub fn equals(&self, other: &Type) -> bool {
        match (self, other) {
            (Self::Boolean, Self::Boolean)
            | (Self::Character, Self::Character)
            | (Self::Integer, Self::Integer)
            | (Self::String, Self::String)
            | (Self::Void, Self::Void) => true,
            (Self::Array { element: a, .. }, Self::Array { element: b, .. }) => a.equals(b),
            (
                Self::Function {
                    return_type: ra,
                    params: pa,
                },
                Self::Function {
                    return_type: rb,
                    params: pb,
                },
            ) => {
                ra.equals(rb)
                    && pa.len() == pb.len()
                    && pa.iter().zip(pb.iter()).all(|(a, b)| a.ty.equals(&b.ty))
            }
            _ => false,
        }
    }

    /// The value types a `print` statement accepts and a data-section entry
    /// can describe.
    pub fn is_printable(&self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Character | Self::Integer | Self::String
        )
    }

    /// The declared size of an array type, when it is an integer literal.
    pub fn size_literal(&self) -> Option<i64> {
        match self {
            Self::Array {
                size: Some(size), ..
            } => match size.kind {
                ExprKind::IntegerLiteral(value) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_equality_is_by_tag() {
        assert!(Type::Integer.equals(&Type::Integer));
        assert!(!Type::Integer.equals(&Type::Boolean));
        assert!(!Type::String.equals(&Type::Character));
    }

    #[test]
    fn array_equality_ignores_size() {
        let three = Type::array(Type::Integer, Some(Expr::integer(3)));
        let five = Type::array(Type::Integer, Some(Expr::integer(5)));
        let bools = Type::array(Type::Boolean, Some(Expr::integer(3)));
        assert!(three.equals(&five));
        assert!(!three.equals(&bools));
    }

    #[test]
    fn function_equality_ignores_param_names() {
        let f = Type::function(Type::Integer, vec![Param::new("a", Type::Integer)]);
        let g = Type::function(Type::Integer, vec![Param::new("b", Type::Integer)]);
        let h = Type::function(Type::Integer, vec![Param::new("a", Type::Boolean)]);
        assert!(f.equals(&g));
        assert!(!f.equals(&h));
    }

    #[test]
    fn function_equality_compares_arity() {
        let f = Type::function(Type::Void, vec![Param::new("a", Type::Integer)]);
        let g = Type::function(Type::Void, Vec::new());
        assert!(!f.equals(&g));
    }
}
