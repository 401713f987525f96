use std::cmp::Ordering;
use std::collections::HashMap;
use lazy_static::lazy_static;
use crate::compiler::number::{Number, NumberValue};
use crate::util;

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = [
        Builtin { name: "abs", required: &["value"], optional: &[], strict: true, needs_working_dir: false, body: abs },
        Builtin { name: "sqrt", required: &["value"], optional: &[], strict: true, needs_working_dir: false, body: sqrt },
        Builtin { name: "floor", required: &["value"], optional: &[], strict: true, needs_working_dir: false, body: floor },
        Builtin { name: "round", required: &["value"], optional: &["digits"], strict: true, needs_working_dir: false, body: round },
        Builtin { name: "min", required: &["first", "second"], optional: &[], strict: false, needs_working_dir: false, body: min },
        Builtin { name: "max", required: &["first", "second"], optional: &[], strict: false, needs_working_dir: false, body: max },
    ].into_iter().map(|builtin| (builtin.name, builtin)).collect();
}

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

fn nth(position: &usize) -> String {
    util::ordinal(*position)
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuiltinError {
    /// `position` is one-based.
    #[error("{} argument of '{function}' must be {expected}", nth(.position))]
    ArgumentType {
        position: usize,
        function: &'static str,
        expected: &'static str,
    },
    #[error("'{function}' is missing its {} argument", nth(.position))]
    MissingArgument {
        position: usize,
        function: &'static str,
    },
    #[error("{0}")]
    Domain(String),
}

type BuiltinResult = Result<Number, BuiltinError>;

/// The values a builtin was called with, already checked against its arity.
pub struct Arguments<'a> {
    function: &'static str,
    values: &'a [Number],
}

impl<'a> Arguments<'a> {
    pub fn all(&self) -> &'a [Number] {
        self.values
    }

    pub fn required(&self, index: usize) -> Result<&'a Number, BuiltinError> {
        self.values.get(index)
            .ok_or(BuiltinError::MissingArgument { position: index + 1, function: self.function })
    }

    pub fn optional_integer(&self, index: usize) -> Result<Option<i64>, BuiltinError> {
        match self.values.get(index).map(Number::value) {
            None => Ok(None),
            Some(NumberValue::Int(value)) => Ok(Some(value)),
            Some(NumberValue::Float(_)) => Err(BuiltinError::ArgumentType {
                position: index + 1,
                function: self.function,
                expected: "an integer",
            }),
        }
    }
}

/// A function provided by the language itself.
///
/// Parameters are declared by name: every call binds its arguments under these names
/// in the call's own context. A `strict` builtin accepts between `required.len()` and
/// `required.len() + optional.len()` arguments; any other builtin accepts at least
/// `required.len()`.
///
/// None of the numeric builtins touch the file system, so `needs_working_dir` is
/// unset for all of them.
pub struct Builtin {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub strict: bool,
    pub needs_working_dir: bool,
    body: fn(&Arguments) -> BuiltinResult,
}

impl Builtin {
    pub fn check_arity(&self, count: usize) -> Result<(), String> {
        let min = self.required.len();
        let max = min + self.optional.len();

        let accepted = if self.strict { (min..=max).contains(&count) } else { count >= min };

        if accepted {
            return Ok(());
        }

        let (expected, plural) = if !self.strict {
            (format!("at least {}", min), min != 1)
        } else if min == max {
            (min.to_string(), min != 1)
        } else {
            (format!("{} to {}", min, max), true)
        };

        Err(format!("'{}' takes {} argument{} but {} {} given",
            self.name, expected, if plural { "s" } else { "" },
            count, if count == 1 { "was" } else { "were" }))
    }

    /// The name the argument at `index` is bound to inside the call.
    pub fn parameter_name(&self, index: usize) -> String {
        self.required.iter().chain(self.optional.iter())
            .nth(index)
            .map(|name| (*name).to_owned())
            .unwrap_or_else(|| format!("arg{}", index + 1))
    }

    pub fn call(&self, values: &[Number]) -> BuiltinResult {
        (self.body)(&Arguments { function: self.name, values })
    }
}

fn to_int(value: f64) -> BuiltinResult {
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(Number::int(value as i64))
    } else {
        Err(BuiltinError::Domain(format!("{:?} cannot be represented as an integer", value)))
    }
}

fn abs(arguments: &Arguments) -> BuiltinResult {
    match arguments.required(0)?.value() {
        NumberValue::Int(value) => value.checked_abs()
            .map(Number::int)
            .ok_or_else(|| BuiltinError::Domain(String::from("Integer overflow"))),
        NumberValue::Float(value) => Ok(Number::float(value.abs())),
    }
}

fn sqrt(arguments: &Arguments) -> BuiltinResult {
    let value = arguments.required(0)?;

    if value.is_negative() {
        return Err(BuiltinError::Domain(String::from("Cannot take the square root of a negative number")));
    }

    Ok(Number::float(value.as_f64().sqrt()))
}

fn floor(arguments: &Arguments) -> BuiltinResult {
    match arguments.required(0)?.value() {
        NumberValue::Int(value) => Ok(Number::int(value)),
        NumberValue::Float(value) => to_int(value.floor()),
    }
}

// Without `digits` the result is an integer, like `floor`.
fn round(arguments: &Arguments) -> BuiltinResult {
    let value = arguments.required(0)?;

    let digits = match arguments.optional_integer(1)? {
        Some(digits) => digits,
        None => return match value.value() {
            NumberValue::Int(value) => Ok(Number::int(value)),
            NumberValue::Float(value) => to_int(value.round()),
        },
    };

    if let NumberValue::Int(value) = value.value() {
        if digits >= 0 {
            return Ok(Number::int(value));
        }
    }

    let digits = i32::try_from(digits)
        .map_err(|_| BuiltinError::Domain(format!("Cannot round to {} digits", digits)))?;
    let factor = 10_f64.powi(digits);

    Ok(Number::float((value.as_f64() * factor).round() / factor))
}

fn min(arguments: &Arguments) -> BuiltinResult {
    extreme(arguments, Ordering::Less)
}

fn max(arguments: &Arguments) -> BuiltinResult {
    extreme(arguments, Ordering::Greater)
}

fn extreme(arguments: &Arguments, wanted: Ordering) -> BuiltinResult {
    let mut best = arguments.required(0)?;

    for value in arguments.all().iter().skip(1) {
        if value.compare(best) == Some(wanted) {
            best = value;
        }
    }

    Ok(best.clone())
}
