//! Statement tree and function types.

use super::expr::{Expr, Var};
use serde::{Deserialize, Serialize};
use std::fmt;

/// IR statement
///
/// A closed set of node kinds: loops, conditionals, sequences and opaque
/// leaf stores. Passes dispatch over it by exhaustive matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stmt {
    /// `for var in [min, min + extent)`, increasing order
    For {
        var: Var,
        min: Expr,
        extent: Expr,
        body: Box<Stmt>,
    },
    /// Guarded execution
    IfThenElse {
        condition: Expr,
        then_case: Box<Stmt>,
        else_case: Option<Box<Stmt>>,
    },
    /// Ordered sequence
    Seq(Vec<Stmt>),
    /// Leaf store `buffer[index] = value`
    Store {
        buffer: String,
        index: Expr,
        value: Expr,
    },
    /// Empty statement
    NoOp,
}

impl Stmt {
    /// Build a loop node without validation.
    ///
    /// Use [`crate::rewrite::make_for`] when the extent may be negative.
    pub fn for_range(var: Var, min: Expr, extent: Expr, body: Stmt) -> Self {
        Stmt::For {
            var,
            min,
            extent,
            body: Box::new(body),
        }
    }

    pub fn if_then(condition: Expr, then_case: Stmt) -> Self {
        Stmt::IfThenElse {
            condition,
            then_case: Box::new(then_case),
            else_case: None,
        }
    }

    pub fn if_then_else(condition: Expr, then_case: Stmt, else_case: Stmt) -> Self {
        Stmt::IfThenElse {
            condition,
            then_case: Box::new(then_case),
            else_case: Some(Box::new(else_case)),
        }
    }

    pub fn store(buffer: impl Into<String>, index: Expr, value: Expr) -> Self {
        Stmt::Store {
            buffer: buffer.into(),
            index,
            value,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Stmt::NoOp)
    }

    /// Count conditional nodes recursively
    pub fn count_conditionals(&self) -> usize {
        match self {
            Stmt::For { body, .. } => body.count_conditionals(),
            Stmt::IfThenElse {
                then_case,
                else_case,
                ..
            } => {
                1 + then_case.count_conditionals()
                    + else_case.as_ref().map_or(0, |e| e.count_conditionals())
            }
            Stmt::Seq(stmts) => stmts.iter().map(Stmt::count_conditionals).sum(),
            Stmt::Store { .. } | Stmt::NoOp => 0,
        }
    }

    /// Count loop nodes recursively
    pub fn count_loops(&self) -> usize {
        match self {
            Stmt::For { body, .. } => 1 + body.count_loops(),
            Stmt::IfThenElse {
                then_case,
                else_case,
                ..
            } => then_case.count_loops() + else_case.as_ref().map_or(0, |e| e.count_loops()),
            Stmt::Seq(stmts) => stmts.iter().map(Stmt::count_loops).sum(),
            Stmt::Store { .. } | Stmt::NoOp => 0,
        }
    }

    /// Count leaf stores recursively
    pub fn count_stores(&self) -> usize {
        match self {
            Stmt::For { body, .. } => body.count_stores(),
            Stmt::IfThenElse {
                then_case,
                else_case,
                ..
            } => then_case.count_stores() + else_case.as_ref().map_or(0, |e| e.count_stores()),
            Stmt::Seq(stmts) => stmts.iter().map(Stmt::count_stores).sum(),
            Stmt::Store { .. } => 1,
            Stmt::NoOp => 0,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match stmt {
        Stmt::For {
            var,
            min,
            extent,
            body,
        } => {
            writeln!(f, "{}for ({}, {}, {}) {{", pad, var, min, extent)?;
            write_stmt(f, body, indent + 1)?;
            writeln!(f, "{}}}", pad)
        }
        Stmt::IfThenElse {
            condition,
            then_case,
            else_case,
        } => {
            writeln!(f, "{}if {} {{", pad, condition)?;
            write_stmt(f, then_case, indent + 1)?;
            if let Some(else_case) = else_case {
                writeln!(f, "{}}} else {{", pad)?;
                write_stmt(f, else_case, indent + 1)?;
            }
            writeln!(f, "{}}}", pad)
        }
        Stmt::Seq(stmts) => {
            for s in stmts {
                write_stmt(f, s, indent)?;
            }
            Ok(())
        }
        Stmt::Store {
            buffer,
            index,
            value,
        } => writeln!(f, "{}{}[{}] = {}", pad, buffer, index, value),
        Stmt::NoOp => writeln!(f, "{}noop", pad),
    }
}

/// A lowered function: scalar parameters, buffer arguments and a body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimFunc {
    /// Function name
    pub name: String,
    /// Scalar integer parameters, unbounded inside the body
    pub params: Vec<Var>,
    /// Buffer arguments, by name
    pub buffers: Vec<String>,
    /// Function body
    pub body: Stmt,
}

impl PrimFunc {
    pub fn new(name: impl Into<String>, params: Vec<Var>, buffers: Vec<String>, body: Stmt) -> Self {
        Self {
            name: name.into(),
            params,
            buffers,
            body,
        }
    }

    /// Replace the body, keeping the signature
    pub fn with_body(mut self, body: Stmt) -> Self {
        self.body = body;
        self
    }
}

impl fmt::Display for PrimFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut args: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        args.extend(self.buffers.iter().cloned());
        writeln!(f, "func {}({}) {{", self.name, args.join(", "))?;
        write_stmt(f, &self.body, 1)?;
        writeln!(f, "}}")
    }
}
