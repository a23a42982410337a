//! The constant-evaluation interface.
//!
//! The store does not evaluate expressions itself; the check pass hands it
//! an evaluator which type-checks an expression and reduces it to a concrete
//! value. The one shipped here handles exactly the literal expressions the
//! parser produces, which is all that trivial integer constant folding
//! requires.

use ternc_lex::LitValue;
use ternc_par::ast::{Expr, ExprKind};
use ternc_util::{Diagnostic, Storage};

/// A constant produced by evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Evaluates expressions to constants on behalf of the type store.
pub trait ConstEval {
    /// Type-checks `expr` and reduces it to a concrete integer or float.
    fn eval(&mut self, expr: &Expr) -> Result<ConstValue, Diagnostic>;
}

/// Literal-only evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralEval;

impl ConstEval for LiteralEval {
    fn eval(&mut self, expr: &Expr) -> Result<ConstValue, Diagnostic> {
        let ExprKind::Constant(lit) = &expr.kind;
        let value = match (&lit.value, lit.storage) {
            (_, Storage::Bool | Storage::Null) => {
                return Err(Diagnostic::error(
                    expr.loc.clone(),
                    "expression is not a numeric constant",
                ))
            }
            (LitValue::Signed(v), _) => ConstValue::Signed(*v),
            (LitValue::Unsigned(v), _) => ConstValue::Unsigned(*v),
            (LitValue::Float(v), _) => ConstValue::Float(*v),
            (LitValue::Rune(c), _) => ConstValue::Unsigned(*c as u64),
            (LitValue::Bytes(_), _) => {
                return Err(Diagnostic::error(
                    expr.loc.clone(),
                    "expression is not a numeric constant",
                ))
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use ternc_lex::Literal;
    use ternc_util::Location;

    use super::*;

    fn constant(lit: Literal) -> Expr {
        Expr {
            loc: Location::new("eval.tn".into(), 1, 1),
            kind: ExprKind::Constant(lit),
        }
    }

    #[test]
    fn literals_evaluate() {
        let mut eval = LiteralEval;
        let expr = constant(Literal {
            storage: Storage::Int,
            value: LitValue::Signed(16),
        });
        assert_eq!(eval.eval(&expr).unwrap(), ConstValue::Signed(16));

        let expr = constant(Literal {
            storage: Storage::Size,
            value: LitValue::Unsigned(8),
        });
        assert_eq!(eval.eval(&expr).unwrap(), ConstValue::Unsigned(8));
    }

    #[test]
    fn strings_are_not_constants() {
        let mut eval = LiteralEval;
        let expr = constant(Literal {
            storage: Storage::String,
            value: LitValue::Bytes(b"no".to_vec()),
        });
        assert!(eval.eval(&expr).is_err());
    }
}
