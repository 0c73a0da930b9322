// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Pretty-printing of terms and formulas with minimal parentheses.

use std::fmt;

use crate::syntax::*;

fn precedence(f: &Formula) -> usize {
    use crate::syntax::{BinOp::*, Formula::*, UOp::*};

    match f {
        Quantified { .. } => 0,
        BinOp(Implies | Iff, _, _) => 10,
        BinOp(Or, _, _) => 40,
        BinOp(And, _, _) => 50,
        // printed as `lhs != rhs`
        UnaryOp(Not, body) if matches!(**body, Equals(_, _)) => 60,
        Equals(_, _) => 60,
        UnaryOp(Not | Possibly | Necessarily, _) => 70,
        Literal(_) | Atom(_) | Pred(_, _) => 1000,
    }
}

fn parens(add_parens: bool, s: String) -> String {
    if add_parens {
        format!("({s})")
    } else {
        s
    }
}

fn right_associative(op: &BinOp) -> bool {
    matches!(op, BinOp::Implies | BinOp::Iff)
}

/// Print a term.
pub fn term(t: &Term) -> String {
    match t {
        Term::Const(c) => c.to_string(),
        Term::Var(x) => x.to_string(),
        Term::App(f, args) => format!(
            "{f}({})",
            args.iter().map(term).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Print a formula.
pub fn formula(f: &Formula) -> String {
    // handling of precedence is based on
    // https://stackoverflow.com/questions/6277747/pretty-print-expression-with-as-few-parentheses-as-possible
    match f {
        Formula::Literal(false) => "false".to_string(),
        Formula::Literal(true) => "true".to_string(),
        Formula::Atom(p) => p.to_string(),
        Formula::Pred(p, args) => format!(
            "{p}({})",
            args.iter().map(term).collect::<Vec<_>>().join(", ")
        ),
        Formula::Equals(lhs, rhs) => format!("{} = {}", term(lhs), term(rhs)),
        Formula::UnaryOp(op, arg) => match (op, &**arg) {
            (UOp::Not, Formula::Equals(lhs, rhs)) => format!("{} != {}", term(lhs), term(rhs)),
            _ => {
                let arg = parens(precedence(f) > precedence(arg), formula(arg));
                match op {
                    UOp::Not => format!("!{arg}"),
                    UOp::Possibly => format!("<>{arg}"),
                    UOp::Necessarily => format!("[]{arg}"),
                }
            }
        },
        Formula::BinOp(op, arg1, arg2) => {
            let use_left_paren = precedence(f) > precedence(arg1)
                || (precedence(f) == precedence(arg1) && right_associative(op));
            let use_right_paren = precedence(f) > precedence(arg2);
            let left = parens(use_left_paren, formula(arg1));
            let right = parens(use_right_paren, formula(arg2));
            let op = match op {
                BinOp::And => "&",
                BinOp::Or => "|",
                BinOp::Implies => "->",
                BinOp::Iff => "<->",
            };
            format!("{left} {op} {right}")
        }
        Formula::Quantified {
            quantifier,
            binder,
            body,
        } => {
            let quantifier = match quantifier {
                Quantifier::Forall => "forall",
                Quantifier::Exists => "exists",
            };
            format!("{quantifier} {binder}. {}", formula(body))
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", term(self))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", formula(self))
    }
}
