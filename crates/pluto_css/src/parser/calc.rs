use crate::parser::CssParser;
use crate::stream::TokenStream;
use crate::tokenizer::TokenType;
use crate::values::{AngleUnit, CalcItem, CalcList, CalcOp, CalcUnit, CssValue, LengthUnit};

fn precedence(op: CalcOp) -> u8 {
    match op {
        CalcOp::Mul | CalcOp::Div => 2,
        _ => 1,
    }
}

impl CssParser<'_> {
    /// Parses a `calc()`/`min()`/`max()`/`clamp()` function into a postfix
    /// [`CalcList`]. The stream must be positioned at the function token.
    ///
    /// `clamp(a, b, c)` emits the postfix equivalent of `max(a, min(b, c))`.
    pub(crate) fn parse_calc_function(&mut self, stream: &mut TokenStream, allows_negative: bool) -> Option<CssValue> {
        let TokenType::Function(name) = stream.peek(0).token_type.clone() else {
            return None;
        };
        let lower = name.to_ascii_lowercase();
        if !matches!(lower.as_str(), "calc" | "min" | "max" | "clamp") {
            return None;
        }

        let mut block = stream.consume_block()?;
        let mut items = Vec::new();

        match lower.as_str() {
            "calc" => {
                // a single expression; commas are errors here
                self.parse_calc_expression(&mut block, &mut items)?;
                block.consume_whitespace();
                if !block.at_end() {
                    return None;
                }
            }
            "min" | "max" => {
                let op = if lower == "min" { CalcOp::Min } else { CalcOp::Max };
                let mut count = 0;
                loop {
                    self.parse_calc_expression(&mut block, &mut items)?;
                    count += 1;
                    if count > 1 {
                        items.push(CalcItem::Op(op));
                    }
                    block.consume_whitespace();
                    match block.peek(0).token_type {
                        TokenType::Comma => {
                            block.consume();
                        }
                        TokenType::Eof => break,
                        _ => return None,
                    }
                }
                if count == 0 {
                    return None;
                }
            }
            _ => {
                // clamp(a, b, c)
                for arg in 0..3 {
                    self.parse_calc_expression(&mut block, &mut items)?;
                    block.consume_whitespace();
                    if arg < 2 {
                        if block.peek(0).token_type != TokenType::Comma {
                            return None;
                        }
                        block.consume();
                    }
                }
                block.consume_whitespace();
                if !block.at_end() {
                    return None;
                }
                items.push(CalcItem::Op(CalcOp::Min));
                items.push(CalcItem::Op(CalcOp::Max));
            }
        }

        if !valid_postfix(&items) {
            return None;
        }

        let unitless = items
            .iter()
            .all(|item| matches!(item, CalcItem::Op(_) | CalcItem::Literal { unit: CalcUnit::None, .. }));

        Some(CssValue::Calc(CalcList {
            allows_negative,
            unitless,
            items,
        }))
    }

    /// One additive expression, converted to postfix via shunting-yard.
    /// Stops at a top level comma or the end of the block.
    fn parse_calc_expression(&mut self, block: &mut TokenStream, out: &mut Vec<CalcItem>) -> Option<()> {
        let mut ops: Vec<CalcOp> = Vec::new();
        let mut saw_operand = false;

        loop {
            block.consume_whitespace();
            match block.peek(0).token_type.clone() {
                TokenType::Eof | TokenType::Comma => break,
                TokenType::Number { value, .. } => {
                    block.consume();
                    out.push(CalcItem::Literal {
                        value,
                        unit: CalcUnit::None,
                    });
                    saw_operand = true;
                }
                TokenType::Percentage { value, .. } => {
                    block.consume();
                    out.push(CalcItem::Literal {
                        value,
                        unit: CalcUnit::Percent,
                    });
                    saw_operand = true;
                }
                TokenType::Dimension { value, unit, .. } => {
                    let unit = if let Some(length) = LengthUnit::from_name(&unit) {
                        CalcUnit::Length(length)
                    } else if let Some(angle) = AngleUnit::from_name(&unit) {
                        CalcUnit::Angle(angle)
                    } else {
                        return None;
                    };
                    block.consume();
                    out.push(CalcItem::Literal { value, unit });
                    saw_operand = true;
                }
                TokenType::Function(_) => {
                    // nested calc/min/max/clamp acts as one operand
                    let CssValue::Calc(nested) = self.parse_calc_function(block, true)? else {
                        return None;
                    };
                    out.extend(nested.items);
                    saw_operand = true;
                }
                TokenType::LParen => {
                    let mut inner = block.consume_block()?;
                    self.parse_calc_expression(&mut inner, out)?;
                    inner.consume_whitespace();
                    if !inner.at_end() {
                        // a comma inside parentheses is an error
                        return None;
                    }
                    saw_operand = true;
                }
                TokenType::Delim(c @ ('+' | '-' | '*' | '/')) => {
                    let op = match c {
                        '+' => CalcOp::Add,
                        '-' => CalcOp::Sub,
                        '*' => CalcOp::Mul,
                        _ => CalcOp::Div,
                    };
                    block.consume();
                    while let Some(top) = ops.last() {
                        if precedence(*top) >= precedence(op) {
                            out.push(CalcItem::Op(*top));
                            ops.pop();
                        } else {
                            break;
                        }
                    }
                    ops.push(op);
                }
                _ => return None,
            }
        }

        if !saw_operand {
            return None;
        }
        while let Some(op) = ops.pop() {
            out.push(CalcItem::Op(op));
        }
        Some(())
    }
}

/// Checks operand arity over the whole postfix list: every operator needs
/// two operands and exactly one value must remain.
fn valid_postfix(items: &[CalcItem]) -> bool {
    let mut depth: i32 = 0;
    for item in items {
        match item {
            CalcItem::Literal { .. } => depth += 1,
            CalcItem::Op(_) => {
                if depth < 2 {
                    return false;
                }
                depth -= 1;
            }
        }
    }
    depth == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    fn parse(source: &str) -> Option<CalcList> {
        let tokens = tokenize_str(source);
        let mut stream = TokenStream::new(&tokens);
        let mut parser = CssParser::test_default();
        match parser.parse_calc_function(&mut stream, true)? {
            CssValue::Calc(list) => Some(list),
            _ => None,
        }
    }

    fn eval(source: &str) -> Option<f32> {
        parse(source)?.evaluate(|value, unit| match unit {
            CalcUnit::None => Some(value),
            CalcUnit::Length(unit) => unit.absolute_px_factor().map(|f| value * f),
            CalcUnit::Percent => None,
            CalcUnit::Angle(unit) => Some(unit.to_degrees(value)),
        })
    }

    #[test]
    fn precedence_respected() {
        assert_eq!(eval("calc(2 + 3 * 4)"), Some(14.0));
        assert_eq!(eval("calc((2 + 3) * 4)"), Some(20.0));
        assert_eq!(eval("calc(10 - 4 - 3)"), Some(3.0));
    }

    #[test]
    fn mixed_units_resolve() {
        assert_eq!(eval("calc(1in + 4px)"), Some(100.0));
    }

    #[test]
    fn min_max_fold() {
        assert_eq!(eval("min(3, 1, 2)"), Some(1.0));
        assert_eq!(eval("max(3, 1, 2)"), Some(3.0));
    }

    #[test]
    fn clamp_is_max_of_min() {
        assert_eq!(eval("clamp(2, 10, 5)"), Some(5.0));
        assert_eq!(eval("clamp(2, 1, 5)"), Some(2.0));
        assert_eq!(eval("clamp(2, 3, 5)"), Some(3.0));
    }

    #[test]
    fn nested_functions() {
        assert_eq!(eval("calc(min(1, 2) + max(3, 4))"), Some(5.0));
    }

    #[test]
    fn unitless_flag() {
        assert!(parse("calc(1 + 2)").unwrap().unitless);
        assert!(!parse("calc(1px + 2px)").unwrap().unitless);
    }

    #[test]
    fn commas_in_calc_are_errors() {
        assert!(parse("calc(1, 2)").is_none());
        assert!(parse("calc((1, 2))").is_none());
    }

    #[test]
    fn clamp_arity_enforced() {
        assert!(parse("clamp(1, 2)").is_none());
        assert!(parse("clamp(1, 2, 3, 4)").is_none());
    }

    #[test]
    fn dangling_operator_is_invalid() {
        assert!(parse("calc(1 +)").is_none());
        assert!(parse("calc(* 2)").is_none());
    }

    #[test]
    fn unknown_unit_is_invalid() {
        assert!(parse("calc(1fr + 2px)").is_none());
    }
}
