use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use crate::compiler::lexer::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow")]
    Overflow,
}

type ArithmeticResult = Result<Number, ArithmeticError>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

/// The only runtime value. Integers stay integers until they meet a float or a
/// division; comparisons and logical operators produce `0` or `1`.
///
/// The span is where the value was produced, attached after construction with
/// [`Number::at`]. Equality ignores it.
#[derive(Clone, Debug)]
pub struct Number {
    value: NumberValue,
    span: Option<Span>,
}

impl Number {
    pub fn new(value: NumberValue) -> Number {
        Number { value, span: None }
    }

    pub fn int(value: i64) -> Number {
        Number { value: NumberValue::Int(value), span: None }
    }

    pub fn float(value: f64) -> Number {
        Number { value: NumberValue::Float(value), span: None }
    }

    pub fn from_bool(value: bool) -> Number {
        Number::int(i64::from(value))
    }

    pub fn at(mut self, span: Span) -> Number {
        self.span = Some(span);
        self
    }

    pub fn value(&self) -> NumberValue { self.value }
    pub fn span(&self) -> Option<&Span> { self.span.as_ref() }

    pub fn as_f64(&self) -> f64 {
        match self.value {
            NumberValue::Int(value) => value as f64,
            NumberValue::Float(value) => value,
        }
    }

    pub fn is_true(&self) -> bool {
        !self.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        match self.value {
            NumberValue::Int(value) => value == 0,
            NumberValue::Float(value) => value == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self.value {
            NumberValue::Int(value) => value < 0,
            NumberValue::Float(value) => value < 0.0,
        }
    }

    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        match (self.value, other.value) {
            (NumberValue::Int(left), NumberValue::Int(right)) => Some(left.cmp(&right)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }

    // Arithmetic

    pub fn plus(&self, other: &Number) -> ArithmeticResult {
        self.arithmetic(other, i64::checked_add, |left, right| left + right)
    }

    pub fn minus(&self, other: &Number) -> ArithmeticResult {
        self.arithmetic(other, i64::checked_sub, |left, right| left - right)
    }

    pub fn times(&self, other: &Number) -> ArithmeticResult {
        self.arithmetic(other, i64::checked_mul, |left, right| left * right)
    }

    /// Always produces a float.
    pub fn divided_by(&self, other: &Number) -> ArithmeticResult {
        if other.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }

        Ok(Number::float(self.as_f64() / other.as_f64()))
    }

    pub fn raised_to(&self, other: &Number) -> ArithmeticResult {
        match (self.value, other.value) {
            (NumberValue::Int(base), NumberValue::Int(exponent)) if exponent >= 0 => u32::try_from(exponent).ok()
                .and_then(|exponent| base.checked_pow(exponent))
                .map(Number::int)
                .ok_or(ArithmeticError::Overflow),
            _ if self.is_zero() && other.is_negative() => Err(ArithmeticError::DivisionByZero),
            _ => Ok(Number::float(self.as_f64().powf(other.as_f64()))),
        }
    }

    pub fn negated(&self) -> ArithmeticResult {
        self.times(&Number::int(-1))
    }

    fn arithmetic(&self, other: &Number, int_op: fn(i64, i64) -> Option<i64>, float_op: fn(f64, f64) -> f64) -> ArithmeticResult {
        match (self.value, other.value) {
            (NumberValue::Int(left), NumberValue::Int(right)) => int_op(left, right)
                .map(Number::int)
                .ok_or(ArithmeticError::Overflow),
            _ => Ok(Number::float(float_op(self.as_f64(), other.as_f64()))),
        }
    }

    // Comparison

    pub fn equals(&self, other: &Number) -> Number {
        Number::from_bool(self.compare(other) == Some(Ordering::Equal))
    }

    pub fn not_equals(&self, other: &Number) -> Number {
        Number::from_bool(self.compare(other) != Some(Ordering::Equal))
    }

    pub fn less_than(&self, other: &Number) -> Number {
        Number::from_bool(self.compare(other) == Some(Ordering::Less))
    }

    pub fn greater_than(&self, other: &Number) -> Number {
        Number::from_bool(self.compare(other) == Some(Ordering::Greater))
    }

    pub fn less_equal(&self, other: &Number) -> Number {
        Number::from_bool(matches!(self.compare(other), Some(Ordering::Less | Ordering::Equal)))
    }

    pub fn greater_equal(&self, other: &Number) -> Number {
        Number::from_bool(matches!(self.compare(other), Some(Ordering::Greater | Ordering::Equal)))
    }

    // Logic

    pub fn logical_and(&self, other: &Number) -> Number {
        Number::from_bool(self.is_true() && other.is_true())
    }

    pub fn logical_or(&self, other: &Number) -> Number {
        Number::from_bool(self.is_true() || other.is_true())
    }

    pub fn exclusive_or(&self, other: &Number) -> Number {
        Number::from_bool(self.is_true() != other.is_true())
    }

    pub fn logical_not(&self) -> Number {
        Number::from_bool(self.is_zero())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.value {
            NumberValue::Int(value) => write!(f, "{}", value),
            NumberValue::Float(value) => write!(f, "{:?}", value),
        }
    }
}
