//! AST normalization passes run once after parsing

use crate::parsing::ast::{Expression, Operator};

/// Rewrites every `a BETWEEN lo AND hi` into `(a >= lo) AND (a <= hi)`,
/// recursively. `NOT BETWEEN` becomes the negation of the rewritten form.
/// The tested expression is cloned into both comparisons, so downstream
/// passes never see a BETWEEN node.
pub fn replace_between_by_ge_and_le(expr: &mut Expression) {
    expr.transform::<std::convert::Infallible>(&mut |node| {
        if let Expression::Operator(Operator::Between {
            expr: tested,
            low,
            high,
            negated,
        }) = node
        {
            let ge = Operator::GreaterThanOrEqual(tested.clone(), low.clone());
            let le = Operator::LessThanOrEqual(tested.clone(), high.clone());
            let and = Operator::And(Box::new(ge.into()), Box::new(le.into()));
            *node = if *negated {
                Operator::Not(Box::new(and.into())).into()
            } else {
                and.into()
            };
        }
        Ok(())
    })
    .unwrap_or_else(|never| match never {});
}
