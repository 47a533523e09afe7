//! Tokenizer for derived-dimension expressions such as `mass*length/time`.

use std::sync::OnceLock;

use regex::Regex;

fn operator_regex() -> &'static Regex {
    static OPERATOR: OnceLock<Regex> = OnceLock::new();
    // Any single character that can't be part of a dimension key
    OPERATOR.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

/// One token of a derived expression with its position.
///
/// Even positions are operands, odd positions operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Operand(&'a str),
    Operator(&'a str),
}

/// A derived expression split into alternating operand/operator tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedExpression<'a> {
    tokens: Vec<Token<'a>>,
}

impl<'a> DerivedExpression<'a> {
    /// Split `expression` at operator characters, keeping the operators.
    ///
    /// Operands are kept verbatim, surrounding whitespace included, so
    /// `length * length` yields `"length "` and `" length"`. Two adjacent
    /// operators produce an empty operand between them.
    pub fn parse(expression: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut start = 0;
        for op in operator_regex().find_iter(expression) {
            tokens.push(Token::Operand(&expression[start..op.start()]));
            tokens.push(Token::Operator(op.as_str()));
            start = op.end();
        }
        tokens.push(Token::Operand(&expression[start..]));
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn operands(&self) -> Vec<&'a str> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operand(s) => Some(*s),
                Token::Operator(_) => None,
            })
            .collect()
    }

    pub fn operators(&self) -> Vec<&'a str> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operator(s) => Some(*s),
                Token::Operand(_) => None,
            })
            .collect()
    }
}

/// Operators allowed between dimensions.
pub fn is_valid_operator(op: &str) -> bool {
    op == "*" || op == "/"
}

/// The dimensionless placeholder operand.
pub const DIMENSIONLESS: &str = "1";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_product_and_quotient_when_parsing_then_splits_alternating() {
        let expr = DerivedExpression::parse("mass*length/time");

        assert_eq!(expr.operands(), vec!["mass", "length", "time"]);
        assert_eq!(expr.operators(), vec!["*", "/"]);
        assert_eq!(
            expr.tokens(),
            &[
                Token::Operand("mass"),
                Token::Operator("*"),
                Token::Operand("length"),
                Token::Operator("/"),
                Token::Operand("time"),
            ]
        );
    }

    #[rstest]
    #[case("mass+length", vec!["+"])]
    #[case("length|time", vec!["|"])]
    #[case("a*b^c", vec!["*", "^"])]
    fn given_foreign_operator_when_parsing_then_operator_token_is_kept(
        #[case] input: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(DerivedExpression::parse(input).operators(), expected);
    }

    #[test]
    fn given_adjacent_operators_when_parsing_then_empty_operand_between() {
        let expr = DerivedExpression::parse("mass**length");
        assert_eq!(expr.operands(), vec!["mass", "", "length"]);
    }

    #[test]
    fn given_spaces_around_operator_when_parsing_then_operands_keep_them() {
        let expr = DerivedExpression::parse("1 / time");
        assert_eq!(expr.operands(), vec!["1 ", " time"]);
        assert!(expr.operators().iter().all(|op| is_valid_operator(op)));
    }
}
