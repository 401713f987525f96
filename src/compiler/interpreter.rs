use std::cell::Cell;
use std::rc::Rc;
use crate::compiler::ast::{BinaryOperator, Node, NodeKind, UnaryOperator};
use crate::compiler::builtins::{self, Builtin, BuiltinError};
use crate::compiler::environment::{Context, BUILTIN_CONSTANTS};
use crate::compiler::error::{Error, ErrorKind, LangResult};
use crate::compiler::lexer::{Span, Token};
use crate::compiler::number::{ArithmeticError, Number};

#[cfg(test)]
mod tests;

/// `None` is the result of expressions that produce no value: loops, and `if`
/// expressions where no branch was taken.
pub type Evaluation = LangResult<Option<Number>>;

/// Evaluates syntax trees against a [`Context`].
#[derive(Debug, Default)]
pub struct Interpreter {
    visited: Cell<usize>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::default()
    }

    /// Number of nodes evaluated so far.
    pub fn visited(&self) -> usize {
        self.visited.get()
    }

    pub fn visit(&self, node: &Node, context: &Rc<Context>) -> Evaluation {
        self.visited.set(self.visited.get() + 1);

        match node.kind() {
            NodeKind::Number { value, .. } => {
                tracing::trace!(node = %node, "number");
                Ok(Some(Number::new(*value).at(node.span().clone())))
            },
            NodeKind::VarAccess { name } => self.visit_var_access(node, name, context).map(Some),
            NodeKind::VarAssign { name, value } => self.visit_var_assign(name, value, context).map(Some),
            NodeKind::BinOp { left, operator, right, .. } => self.visit_bin_op(node, left, *operator, right, context).map(Some),
            NodeKind::UnaryOp { operator, operand, .. } => self.visit_unary_op(node, *operator, operand, context).map(Some),
            NodeKind::If { cases, else_case } => self.visit_if(cases, else_case.as_deref(), context),
            NodeKind::For { var_name, start, end, step, body } =>
                self.visit_for(node, var_name, start, end, step.as_deref(), body, context).map(|_| None),
            NodeKind::While { condition, body } => self.visit_while(condition, body, context).map(|_| None),
            NodeKind::FuncDef { .. } => Err(Error::runtime(ErrorKind::Unsupported, node.span().clone(),
                "Function definitions are parsed but not evaluated", context)),
            NodeKind::Call { callee, args } => self.visit_call(node, callee, args, context).map(Some),
        }
    }

    /// Evaluates `node`, which has to produce a value.
    fn visit_value(&self, node: &Node, context: &Rc<Context>) -> LangResult<Number> {
        match self.visit(node, context)? {
            Some(value) => Ok(value),
            None => Err(Error::runtime(ErrorKind::Type, node.span().clone(),
                "Expected a value, but this expression produced none", context)),
        }
    }

    fn visit_var_access(&self, node: &Node, name: &Token, context: &Rc<Context>) -> LangResult<Number> {
        tracing::trace!(name = name.source(), "variable access");

        match context.get(name.source()) {
            Some(value) => Ok(value.at(node.span().clone())),
            None => Err(Error::runtime(ErrorKind::UndefinedIdentifier, node.span().clone(),
                format!("'{}' is not defined", name.source()), context)),
        }
    }

    fn visit_var_assign(&self, name: &Token, value: &Node, context: &Rc<Context>) -> LangResult<Number> {
        let value = self.visit_value(value, context)?;
        let name_source = name.source();

        if BUILTIN_CONSTANTS.iter().any(|(constant, _)| *constant == name_source) || builtins::is_builtin(name_source) {
            return Err(Error::runtime(ErrorKind::ReservedName, name.span(),
                format!("'{}' is a reserved name and cannot be assigned", name_source), context));
        }

        tracing::trace!(name = name_source, value = %value, "variable assignment");
        context.set(name_source, value.clone());
        Ok(value)
    }

    fn visit_bin_op(&self, node: &Node, left: &Node, operator: BinaryOperator, right: &Node, context: &Rc<Context>) -> LangResult<Number> {
        tracing::trace!(%operator, "binary operation");

        let left = self.visit_value(left, context)?;
        let right = self.visit_value(right, context)?;

        let result = match operator {
            BinaryOperator::Add => left.plus(&right),
            BinaryOperator::Subtract => left.minus(&right),
            BinaryOperator::Multiply => left.times(&right),
            BinaryOperator::Divide => left.divided_by(&right),
            BinaryOperator::Power => left.raised_to(&right),

            BinaryOperator::Equal => Ok(left.equals(&right)),
            BinaryOperator::NotEqual => Ok(left.not_equals(&right)),
            BinaryOperator::Less => Ok(left.less_than(&right)),
            BinaryOperator::Greater => Ok(left.greater_than(&right)),
            BinaryOperator::LessEqual => Ok(left.less_equal(&right)),
            BinaryOperator::GreaterEqual => Ok(left.greater_equal(&right)),

            BinaryOperator::And => Ok(left.logical_and(&right)),
            BinaryOperator::Or => Ok(left.logical_or(&right)),
            BinaryOperator::Exclor => Ok(left.exclusive_or(&right)),
        };

        result
            .map(|value| value.at(node.span().clone()))
            .map_err(|error| {
                // A zero divisor is reported where the divisor is, not on the whole expression
                let span = match (error, right.span()) {
                    (ArithmeticError::DivisionByZero, Some(span)) => span.clone(),
                    _ => node.span().clone(),
                };

                Error::runtime(ErrorKind::Runtime, span, error.to_string(), context)
            })
    }

    fn visit_unary_op(&self, node: &Node, operator: UnaryOperator, operand: &Node, context: &Rc<Context>) -> LangResult<Number> {
        tracing::trace!(%operator, "unary operation");

        let operand = self.visit_value(operand, context)?;

        let result = match operator {
            UnaryOperator::Plus => Ok(operand),
            UnaryOperator::Minus => operand.negated(),
            UnaryOperator::Not => Ok(operand.logical_not()),
        };

        result
            .map(|value| value.at(node.span().clone()))
            .map_err(|error| Error::runtime(ErrorKind::Runtime, node.span().clone(), error.to_string(), context))
    }

    fn visit_if(&self, cases: &[(Node, Node)], else_case: Option<&Node>, context: &Rc<Context>) -> Evaluation {
        for (condition, expr) in cases {
            if self.visit_value(condition, context)?.is_true() {
                return self.visit(expr, context);
            }
        }

        match else_case {
            Some(else_case) => self.visit(else_case, context),
            None => Ok(None),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn visit_for(&self, node: &Node, var_name: &Token, start: &Node, end: &Node, step: Option<&Node>, body: &Node, context: &Rc<Context>) -> LangResult<()> {
        let start = self.visit_value(start, context)?;
        let end = self.visit_value(end, context)?;

        let step = match step {
            Some(step) => {
                let value = self.visit_value(step, context)?;

                if value.is_zero() {
                    return Err(Error::runtime(ErrorKind::Runtime, step.span().clone(),
                        "Loop step must not be zero", context));
                }

                value
            },
            None => Number::int(1),
        };

        tracing::trace!(var = var_name.source(), %start, %end, %step, "for loop");

        let ascending = !step.is_negative();
        let mut counter = start;

        loop {
            let keep_going = if ascending {
                counter.less_than(&end).is_true()
            } else {
                counter.greater_than(&end).is_true()
            };

            if !keep_going {
                break;
            }

            context.set(var_name.source(), counter.clone());
            self.visit(body, context)?;

            counter = counter.plus(&step)
                .map_err(|error| Error::runtime(ErrorKind::Runtime, node.span().clone(), error.to_string(), context))?;
        }

        Ok(())
    }

    fn visit_while(&self, condition: &Node, body: &Node, context: &Rc<Context>) -> LangResult<()> {
        while self.visit_value(condition, context)?.is_true() {
            self.visit(body, context)?;
        }

        Ok(())
    }

    fn visit_call(&self, node: &Node, callee: &Node, args: &[Node], context: &Rc<Context>) -> LangResult<Number> {
        if let NodeKind::VarAccess { name } = callee.kind() {
            if let Some(builtin) = builtins::lookup(name.source()) {
                let values = args.iter()
                    .map(|arg| self.visit_value(arg, context))
                    .collect::<LangResult<Vec<Number>>>()?;

                return self.call_builtin(node, builtin, &values, context);
            }
        }

        let value = self.visit_value(callee, context)?;

        Err(Error::runtime(ErrorKind::Runtime, callee.span().clone(),
            format!("{} is not callable", value), context))
    }

    fn call_builtin(&self, node: &Node, builtin: &Builtin, values: &[Number], context: &Rc<Context>) -> LangResult<Number> {
        let call_context = Context::new_with_parent(builtin.name, context, node.span().start.clone());

        tracing::debug!(function = builtin.name, arguments = values.len(), needs_working_dir = builtin.needs_working_dir, "calling builtin");

        builtin.check_arity(values.len())
            .map_err(|details| Error::runtime(ErrorKind::Arity, node.span().clone(), details, &call_context))?;

        for (index, value) in values.iter().enumerate() {
            call_context.set(&builtin.parameter_name(index), value.clone());
        }

        builtin.call(values)
            .map(|value| value.at(node.span().clone()))
            .map_err(|error| {
                let (kind, span) = match &error {
                    BuiltinError::ArgumentType { position, .. } => (ErrorKind::Type, argument_span(node, values, *position)),
                    BuiltinError::MissingArgument { .. } => (ErrorKind::Arity, node.span().clone()),
                    BuiltinError::Domain(_) => (ErrorKind::Runtime, node.span().clone()),
                };

                Error::runtime(kind, span, error.to_string(), &call_context)
            })
    }
}

/// Where the one-based `position`th argument of a call was written.
fn argument_span(node: &Node, values: &[Number], position: usize) -> Span {
    position.checked_sub(1)
        .and_then(|index| values.get(index))
        .and_then(Number::span)
        .unwrap_or_else(|| node.span())
        .clone()
}
