//! Integer evaluation of port-range expressions.
//!
//! Synthesized wire widths come from `"{range_high}+1"`. Range bounds in
//! hand-written headers are usually literals or small arithmetic on them
//! (`7`, `16-1`, `2*4-1`, `$clog2(64)-1`). Anything that references a
//! parameter (`WIDTH-1`) does not evaluate and the caller keeps the text.

/// Evaluates an integer expression.
///
/// Supports `+ - * / % **`, parentheses, unary minus, Verilog literals
/// (`8'hFF`, `'d3`, `1_000`) and `$clog2(...)`. Returns `None` when the
/// expression contains identifiers, is malformed, or divides by zero.
pub fn eval_int(expr: &str) -> Option<i64> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos == parser.tokens.len() {
        Some(value)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(i64),
    Op(&'static str),
    LParen,
    RParen,
    Clog2,
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' => i += 1,
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                tokens.push(Token::Op("**"));
                i += 2;
            }
            b'+' | b'-' | b'*' | b'/' | b'%' => {
                tokens.push(Token::Op(match c {
                    b'+' => "+",
                    b'-' => "-",
                    b'*' => "*",
                    b'/' => "/",
                    _ => "%",
                }));
                i += 1;
            }
            b'$' => {
                if expr[i..].starts_with("$clog2") {
                    tokens.push(Token::Clog2);
                    i += "$clog2".len();
                } else {
                    return None;
                }
            }
            b'0'..=b'9' | b'\'' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'\'' || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Token::Num(parse_literal(&expr[start..i])?));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

/// Parses a decimal or based Verilog literal (`42`, `4'b1010`, `8'hFF`, `'d3`).
fn parse_literal(text: &str) -> Option<i64> {
    let text = text.replace('_', "");
    let Some(tick) = text.find('\'') else {
        return text.parse().ok();
    };
    let after = &text[tick + 1..];
    let after = after
        .strip_prefix('s')
        .or_else(|| after.strip_prefix('S'))
        .unwrap_or(after);
    let mut chars = after.chars();
    let radix = match chars.next()? {
        'b' | 'B' => 2,
        'o' | 'O' => 8,
        'd' | 'D' => 10,
        'h' | 'H' => 16,
        _ => return None,
    };
    i64::from_str_radix(chars.as_str(), radix).ok()
}

fn clog2(n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    64 - i64::from((n - 1).leading_zeros())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expr(&mut self) -> Option<i64> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ ("+" | "-"))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = apply_binop(op, lhs, rhs)?;
        }
        Some(lhs)
    }

    fn term(&mut self) -> Option<i64> {
        let mut lhs = self.power()?;
        while let Some(Token::Op(op @ ("*" | "/" | "%"))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.power()?;
            lhs = apply_binop(op, lhs, rhs)?;
        }
        Some(lhs)
    }

    fn power(&mut self) -> Option<i64> {
        let base = self.unary()?;
        if self.peek() == Some(&Token::Op("**")) {
            self.pos += 1;
            let exp = self.power()?;
            return apply_binop("**", base, exp);
        }
        Some(base)
    }

    fn unary(&mut self) -> Option<i64> {
        match self.peek() {
            Some(Token::Op("-")) => {
                self.pos += 1;
                Some(-self.unary()?)
            }
            Some(Token::Op("+")) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> Option<i64> {
        match self.next()? {
            Token::Num(n) => Some(n),
            Token::LParen => {
                let v = self.expr()?;
                (self.next()? == Token::RParen).then_some(v)
            }
            Token::Clog2 => {
                if self.next()? != Token::LParen {
                    return None;
                }
                let v = self.expr()?;
                (self.next()? == Token::RParen).then_some(clog2(v))
            }
            _ => None,
        }
    }
}

fn apply_binop(op: &str, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        "+" => lhs.checked_add(rhs),
        "-" => lhs.checked_sub(rhs),
        "*" => lhs.checked_mul(rhs),
        "/" => lhs.checked_div(rhs),
        "%" => lhs.checked_rem(rhs),
        "**" => u32::try_from(rhs).ok().and_then(|e| lhs.checked_pow(e)),
        _ => None,
    }
}
