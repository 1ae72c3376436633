//! Tree-walking execution of lowered functions
//!
//! Loops run in increasing order of their variable, conditionals evaluate
//! their guard once per visit, and `&&`/`||` short-circuit. Every store is
//! appended to a trace so two executions can be compared store by store.
//! Integer arithmetic is checked: overflow and division by zero are errors.
//! Calls resolve through a function table preloaded with `abs`, `sign` and
//! `clamp`; more can be registered with [`Interpreter::register`].

use crate::buffer::Buffers;
use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;
use hoist_tir::{BinOp, Expr, LogicOp, PrimFunc, Stmt, Var};
use std::collections::HashMap;

/// One executed store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub buffer: String,
    pub index: i64,
    pub value: i64,
}

/// Dynamic counters of one or more executions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStats {
    /// Conditional guards evaluated
    pub guard_evaluations: usize,
    /// Stores executed
    pub stores: usize,
    /// Loop body executions, over all loops
    pub iterations: usize,
}

/// Final state of an execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub buffers: Buffers,
    pub trace: Vec<StoreEvent>,
    pub stats: ExecStats,
}

/// Pure integer function callable from expressions
pub type Function = fn(&[i64]) -> RuntimeResult<i64>;

/// Interpreter over a scalar environment and a set of buffers
#[derive(Debug)]
pub struct Interpreter {
    scalars: HashMap<Var, i64>,
    buffers: Buffers,
    functions: HashMap<String, Function>,
    trace: Vec<StoreEvent>,
    stats: ExecStats,
}

impl Interpreter {
    pub fn new(buffers: Buffers) -> Self {
        let mut interp = Self {
            scalars: HashMap::new(),
            buffers,
            functions: HashMap::new(),
            trace: Vec::new(),
            stats: ExecStats::default(),
        };
        interp.register("abs", builtin_abs);
        interp.register("sign", builtin_sign);
        interp.register("clamp", builtin_clamp);
        interp
    }

    /// Make `function` callable as `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, function: Function) -> Option<Function> {
        self.functions.insert(name.into(), function)
    }

    /// Bind a scalar, returning its previous value
    pub fn bind(&mut self, var: Var, value: i64) -> Option<i64> {
        self.scalars.insert(var, value)
    }

    /// Run `func` with `args` bound to its scalar parameters in order.
    ///
    /// Every buffer the function declares must already be present.
    pub fn run(&mut self, func: &PrimFunc, args: &[i64]) -> RuntimeResult<()> {
        if args.len() != func.params.len() {
            return Err(RuntimeError::argument_error(format!(
                "{} expects {} scalar arguments, got {}",
                func.name,
                func.params.len(),
                args.len()
            )));
        }
        if let Some(missing) = func.buffers.iter().find(|b| !self.buffers.contains(b)) {
            return Err(RuntimeError::UnknownBuffer(missing.clone()));
        }
        for (param, arg) in func.params.iter().zip(args) {
            self.bind(param.clone(), *arg);
        }
        log::debug!("exec: running {} with {:?}", func.name, args);
        self.exec(&func.body)
    }

    /// Execute one statement
    pub fn exec(&mut self, stmt: &Stmt) -> RuntimeResult<()> {
        match stmt {
            Stmt::For {
                var,
                min,
                extent,
                body,
            } => {
                let min = self.eval(min)?.as_int()?;
                let extent = self.eval(extent)?.as_int()?;
                if extent < 0 {
                    return Err(RuntimeError::NegativeExtent {
                        var: var.name().to_string(),
                        extent,
                    });
                }
                let previous = self.scalars.get(var).copied();
                let result = self.run_loop(var, min, extent, body);
                match previous {
                    Some(value) => self.scalars.insert(var.clone(), value),
                    None => self.scalars.remove(var),
                };
                result
            }
            Stmt::IfThenElse {
                condition,
                then_case,
                else_case,
            } => {
                self.stats.guard_evaluations += 1;
                if self.eval(condition)?.as_bool()? {
                    self.exec(then_case)
                } else if let Some(else_case) = else_case {
                    self.exec(else_case)
                } else {
                    Ok(())
                }
            }
            Stmt::Seq(stmts) => stmts.iter().try_for_each(|s| self.exec(s)),
            Stmt::Store {
                buffer,
                index,
                value,
            } => {
                let index = self.eval(index)?.as_int()?;
                let value = self.eval(value)?.as_int()?;
                self.buffers.store(buffer, index, value)?;
                log::trace!("exec: {}[{}] = {}", buffer, index, value);
                self.stats.stores += 1;
                self.trace.push(StoreEvent {
                    buffer: buffer.clone(),
                    index,
                    value,
                });
                Ok(())
            }
            Stmt::NoOp => Ok(()),
        }
    }

    fn run_loop(&mut self, var: &Var, min: i64, extent: i64, body: &Stmt) -> RuntimeResult<()> {
        for offset in 0..extent {
            let value = min.checked_add(offset).ok_or_else(|| {
                RuntimeError::overflow_error(format!("loop over {} past {}", var, i64::MAX))
            })?;
            self.scalars.insert(var.clone(), value);
            self.stats.iterations += 1;
            self.exec(body)?;
        }
        Ok(())
    }

    /// Evaluate an expression in the current environment
    pub fn eval(&self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Var(var) => self
                .scalars
                .get(var)
                .map(|v| Value::Int(*v))
                .ok_or_else(|| RuntimeError::UnboundVariable(var.name().to_string())),
            Expr::Binary { op, lhs, rhs } => {
                let a = self.eval(lhs)?.as_int()?;
                let b = self.eval(rhs)?.as_int()?;
                match op.eval(a, b) {
                    Some(v) => Ok(Value::Int(v)),
                    None if b == 0 && matches!(op, BinOp::FloorDiv | BinOp::FloorMod) => {
                        Err(RuntimeError::DivisionByZero)
                    }
                    None => Err(RuntimeError::overflow_error(format!("{} {} {}", a, op, b))),
                }
            }
            Expr::Cmp { op, lhs, rhs } => {
                let a = self.eval(lhs)?.as_int()?;
                let b = self.eval(rhs)?.as_int()?;
                Ok(Value::Bool(op.eval(a, b)))
            }
            Expr::Logic { op, lhs, rhs } => {
                let a = self.eval(lhs)?.as_bool()?;
                match (op, a) {
                    (LogicOp::And, false) => Ok(Value::Bool(false)),
                    (LogicOp::Or, true) => Ok(Value::Bool(true)),
                    _ => Ok(Value::Bool(self.eval(rhs)?.as_bool()?)),
                }
            }
            Expr::Not(operand) => Ok(Value::Bool(!self.eval(operand)?.as_bool()?)),
            Expr::Load { buffer, index } => {
                let index = self.eval(index)?.as_int()?;
                Ok(Value::Int(self.buffers.load(buffer, index)?))
            }
            Expr::Call { name, args } => {
                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| RuntimeError::UnknownFunction(name.clone()))?;
                let values = args
                    .iter()
                    .map(|a| self.eval(a)?.as_int())
                    .collect::<RuntimeResult<Vec<_>>>()?;
                Ok(Value::Int(function(&values)?))
            }
        }
    }

    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    pub fn trace(&self) -> &[StoreEvent] {
        &self.trace
    }

    pub fn stats(&self) -> &ExecStats {
        &self.stats
    }

    /// Consume the interpreter, keeping buffers, trace and counters
    pub fn into_execution(self) -> Execution {
        Execution {
            buffers: self.buffers,
            trace: self.trace,
            stats: self.stats,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Buffers::new())
    }
}

fn expect_args(name: &str, args: &[i64], count: usize) -> RuntimeResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(RuntimeError::argument_error(format!(
            "{} expects {} arguments, got {}",
            name,
            count,
            args.len()
        )))
    }
}

fn builtin_abs(args: &[i64]) -> RuntimeResult<i64> {
    expect_args("abs", args, 1)?;
    args[0]
        .checked_abs()
        .ok_or_else(|| RuntimeError::overflow_error(format!("abs({})", args[0])))
}

fn builtin_sign(args: &[i64]) -> RuntimeResult<i64> {
    expect_args("sign", args, 1)?;
    Ok(args[0].signum())
}

/// `clamp(x, lo, hi)`, an error when `lo > hi`
fn builtin_clamp(args: &[i64]) -> RuntimeResult<i64> {
    expect_args("clamp", args, 3)?;
    let (x, lo, hi) = (args[0], args[1], args[2]);
    if lo > hi {
        return Err(RuntimeError::argument_error(format!("clamp bounds {} > {}", lo, hi)));
    }
    Ok(x.clamp(lo, hi))
}

/// Run `func` once on fresh state
pub fn execute(func: &PrimFunc, args: &[i64], buffers: Buffers) -> RuntimeResult<Execution> {
    let mut interp = Interpreter::new(buffers);
    interp.run(func, args)?;
    Ok(interp.into_execution())
}
