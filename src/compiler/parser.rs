use crate::compiler::ast::{BinaryOperator, Node, UnaryOperator};
use crate::compiler::error::{Error, LangResult};
use crate::compiler::lexer::{Token, TokenType};
use crate::compiler::number::NumberValue;


type ParseFn = fn(&mut Parser) -> LangResult<Node>;

const LOGICAL_OPERATORS: [(TokenType, BinaryOperator); 3] = [
    (TokenType::And, BinaryOperator::And),
    (TokenType::Or, BinaryOperator::Or),
    (TokenType::Exclor, BinaryOperator::Exclor),
];

const COMPARISON_OPERATORS: [(TokenType, BinaryOperator); 6] = [
    (TokenType::Equal, BinaryOperator::Equal),
    (TokenType::NotEqual, BinaryOperator::NotEqual),
    (TokenType::Less, BinaryOperator::Less),
    (TokenType::Greater, BinaryOperator::Greater),
    (TokenType::LessEqual, BinaryOperator::LessEqual),
    (TokenType::GreaterEqual, BinaryOperator::GreaterEqual),
];

const ARITHMETIC_OPERATORS: [(TokenType, BinaryOperator); 2] = [
    (TokenType::Plus, BinaryOperator::Add),
    (TokenType::Minus, BinaryOperator::Subtract),
];

const TERM_OPERATORS: [(TokenType, BinaryOperator); 2] = [
    (TokenType::Multiply, BinaryOperator::Multiply),
    (TokenType::Divide, BinaryOperator::Divide),
];

const POWER_OPERATORS: [(TokenType, BinaryOperator); 1] = [
    (TokenType::Power, BinaryOperator::Power),
];

const EXPECTED_EXPRESSION: &str = "Expected 'var', 'if', 'for', 'while', 'def', int, float, identifier, '+', '-', '(' or 'not'";
const EXPECTED_COMPARISON: &str = "Expected int, float, identifier, '+', '-', '(' or 'not'";
const EXPECTED_ATOM: &str = "Expected int, float, identifier, '+', '-', '(', 'if', 'for', 'while' or 'def'";
const EXPECTED_OPERATOR: &str = "Expected '+', '-', '*', '/', '^', '==', '!=', '<', '>', '<=', '>=', 'and', 'or' or 'exclor'";

/// Builds one expression tree from the output of [`Lexer::make_tokens`].
///
/// The first syntax error aborts parsing. When an attempt fails and a more general
/// message is available for it, that message is only used if the attempt had not
/// consumed any tokens yet; otherwise the error found deeper in the input is kept.
///
/// [`Lexer::make_tokens`]: crate::compiler::lexer::Lexer::make_tokens
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// `tokens` must end with an [`TokenType::Eof`] token.
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser { tokens, index: 0 }
    }

    pub fn parse(&mut self) -> LangResult<Node> {
        let node = self.parse_expression()?;

        if !self.is_eof() {
            return Err(self.error_at_current(EXPECTED_OPERATOR));
        }

        tracing::debug!(ast = %node, "parsed expression");
        Ok(node)
    }

    // Expression parsing

    fn parse_expression(&mut self) -> LangResult<Node> {
        let start = self.index;

        if self.check(TokenType::Var) {
            let keyword = self.consume();
            let name = self.expect_name("variable name")?;
            self.expect(TokenType::Assign, "Expected '='")?;

            let value = self.parse_expression()?;
            return Ok(Node::var_assign(&keyword, name, value));
        }

        self.parse_binary(Self::parse_comparison, &LOGICAL_OPERATORS, Self::parse_comparison)
            .map_err(|error| self.prefer_deepest(start, error, EXPECTED_EXPRESSION))
    }

    fn parse_comparison(&mut self) -> LangResult<Node> {
        let start = self.index;

        if self.check(TokenType::Not) {
            let operator_token = self.consume();
            let operand = self.parse_comparison()?;

            return Ok(Node::unary_op(UnaryOperator::Not, operator_token, operand));
        }

        self.parse_binary(Self::parse_arithmetic, &COMPARISON_OPERATORS, Self::parse_arithmetic)
            .map_err(|error| self.prefer_deepest(start, error, EXPECTED_COMPARISON))
    }

    fn parse_arithmetic(&mut self) -> LangResult<Node> {
        self.parse_binary(Self::parse_term, &ARITHMETIC_OPERATORS, Self::parse_term)
    }

    fn parse_term(&mut self) -> LangResult<Node> {
        self.parse_binary(Self::parse_factor, &TERM_OPERATORS, Self::parse_factor)
    }

    fn parse_factor(&mut self) -> LangResult<Node> {
        let operator = match self.current().token_type() {
            TokenType::Plus => UnaryOperator::Plus,
            TokenType::Minus => UnaryOperator::Minus,
            _ => return self.parse_power(),
        };

        let operator_token = self.consume();
        let operand = self.parse_factor()?;

        Ok(Node::unary_op(operator, operator_token, operand))
    }

    // The right operand is a factor, so `2^3^2` is `2^(3^2)` and `2^-1` parses.
    fn parse_power(&mut self) -> LangResult<Node> {
        self.parse_binary(Self::parse_call, &POWER_OPERATORS, Self::parse_factor)
    }

    fn parse_call(&mut self) -> LangResult<Node> {
        let callee = self.parse_atom()?;

        if !self.matches(TokenType::ParenthesisLeft) {
            return Ok(callee);
        }

        let mut arguments = vec![];

        if !self.check(TokenType::ParenthesisRight) {
            arguments.push(self.parse_expression()?);

            while self.matches(TokenType::Comma) {
                arguments.push(self.parse_expression()?);
            }
        }

        let closing = self.expect(TokenType::ParenthesisRight, "Expected ',' or ')'")?;
        Ok(Node::call(callee, arguments, &closing))
    }

    fn parse_atom(&mut self) -> LangResult<Node> {
        let token = self.current().clone();

        match token.token_type() {
            TokenType::Int => {
                self.consume();

                match token.source().parse::<i64>() {
                    Ok(value) => Ok(Node::number(token, NumberValue::Int(value))),
                    Err(err) => Err(Error::invalid_syntax(token.span(), format!("Failed to parse int literal: {}", err))),
                }
            },
            TokenType::Float => {
                self.consume();

                match token.source().parse::<f64>() {
                    Ok(value) => Ok(Node::number(token, NumberValue::Float(value))),
                    Err(err) => Err(Error::invalid_syntax(token.span(), format!("Failed to parse float literal: {}", err))),
                }
            },
            TokenType::Identifier => {
                self.consume();
                Ok(Node::var_access(token))
            },
            TokenType::ParenthesisLeft => {
                self.consume();

                let expr = self.parse_expression()?;
                self.expect(TokenType::ParenthesisRight, "Expected ')'")?;

                Ok(expr)
            },
            TokenType::If => self.parse_if_expression(),
            TokenType::For => self.parse_for_expression(),
            TokenType::While => self.parse_while_expression(),
            TokenType::Def => self.parse_function_definition(),

            _ => Err(self.error_at_current(EXPECTED_ATOM)),
        }
    }

    fn parse_if_expression(&mut self) -> LangResult<Node> {
        let keyword = self.consume();
        let mut cases = vec![self.parse_if_case()?];

        while self.matches(TokenType::Elif) {
            cases.push(self.parse_if_case()?);
        }

        let else_case = if self.matches(TokenType::Else) {
            Some(self.parse_expression()?)
        } else { None };

        Ok(Node::if_expr(&keyword, cases, else_case))
    }

    fn parse_if_case(&mut self) -> LangResult<(Node, Node)> {
        let condition = self.parse_expression()?;
        self.expect(TokenType::Then, "Expected 'then'")?;
        let expr = self.parse_expression()?;

        Ok((condition, expr))
    }

    fn parse_for_expression(&mut self) -> LangResult<Node> {
        let keyword = self.consume();

        let var_name = self.expect_name("loop variable name")?;
        self.expect(TokenType::Assign, "Expected '='")?;

        let start = self.parse_expression()?;
        self.expect(TokenType::To, "Expected 'to'")?;
        let end = self.parse_expression()?;

        let step = if self.matches(TokenType::Step) {
            Some(self.parse_expression()?)
        } else { None };

        self.expect(TokenType::Then, "Expected 'then'")?;
        let body = self.parse_expression()?;

        Ok(Node::for_expr(&keyword, var_name, start, end, step, body))
    }

    fn parse_while_expression(&mut self) -> LangResult<Node> {
        let keyword = self.consume();

        let condition = self.parse_expression()?;
        self.expect(TokenType::Then, "Expected 'then'")?;
        let body = self.parse_expression()?;

        Ok(Node::while_expr(&keyword, condition, body))
    }

    fn parse_function_definition(&mut self) -> LangResult<Node> {
        let keyword = self.consume();

        let name = if self.check(TokenType::Identifier) {
            Some(self.consume())
        } else { None };

        self.expect(TokenType::ParenthesisLeft, if name.is_some() { "Expected '('" } else { "Expected identifier or '('" })?;

        let mut params = vec![];

        if self.check(TokenType::Identifier) || self.current().token_type().is_keyword() {
            let param = self.parse_parameter(&params)?;
            params.push(param);

            while self.matches(TokenType::Comma) {
                let param = self.parse_parameter(&params)?;
                params.push(param);
            }

            self.expect(TokenType::ParenthesisRight, "Expected ',' or ')'")?;
        } else {
            self.expect(TokenType::ParenthesisRight, "Expected identifier or ')'")?;
        }

        self.expect(TokenType::Arrow, "Expected '->'")?;
        let body = self.parse_expression()?;

        Ok(Node::func_def(&keyword, name, params, body))
    }

    fn parse_parameter(&mut self, previous: &[Token]) -> LangResult<Token> {
        let name = self.expect_name("parameter name")?;

        if previous.iter().any(|param| param.source() == name.source()) {
            return Err(Error::invalid_syntax(name.span(), format!("Duplicate parameter '{}'", name.source())));
        }

        Ok(name)
    }

    /// Parses `operand (operator operand)*` into a left-nested tree, using `right_operand`
    /// for every operand after the first.
    fn parse_binary(&mut self, operand: ParseFn, operators: &[(TokenType, BinaryOperator)], right_operand: ParseFn) -> LangResult<Node> {
        let mut left = operand(self)?;

        while let Some(&(_, operator)) = operators.iter().find(|(token_type, _)| self.check(*token_type)) {
            let operator_token = self.consume();
            let right = right_operand(self)?;

            left = Node::bin_op(left, operator, operator_token, right);
        }

        Ok(left)
    }

    // Token handling

    fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Returns the current token and moves past it. Never moves past the end of input.
    fn consume(&mut self) -> Token {
        let token = self.current().clone();

        if token.token_type() != TokenType::Eof {
            self.index += 1;
        }

        token
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> LangResult<Token> {
        if self.check(token_type) {
            return Ok(self.consume());
        }

        Err(self.error_at_current(message))
    }

    /// Expects an identifier to bind; keywords get their own message.
    fn expect_name(&mut self, what: &str) -> LangResult<Token> {
        if self.current().token_type().is_keyword() {
            return Err(self.error_at_current(format!("Expected {}, found keyword '{}'", what, self.current().source())));
        }

        self.expect(TokenType::Identifier, "Expected identifier")
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current().token_type() == token_type
    }

    fn is_eof(&self) -> bool {
        self.current().token_type() == TokenType::Eof
    }

    // Error handling

    fn error_at_current(&self, details: impl Into<String>) -> Error {
        Error::invalid_syntax(self.current().span(), details)
    }

    /// `error` was raised inside an attempt that began at token `start`. It is replaced
    /// by a failure with `details` at the current token only if the attempt has not
    /// consumed anything yet.
    fn prefer_deepest(&self, start: usize, error: Error, details: &str) -> Error {
        if self.index == start {
            self.error_at_current(details)
        } else {
            error
        }
    }
}
