use super::ast::{BinaryOp, Expr, Literal, Stmt, UnaryOp, EVENT_ACCESSOR};
use super::lexer::LineLexer;
use super::parsercore::Parser;
use super::token::{Token, TokenKind, TokenKind::*};
use crate::error::ParseError;
use crate::{check, expect, optional, repeat};

/// Parse one physical line into its statements.
pub fn parse_line(code: &str) -> Result<Vec<Stmt>, ParseError> {
    Parser::new(LineLexer::new(code, 0).parse().into_iter()).parse_line()
}

/// Parse one standalone expression.
pub fn parse_expr(code: &str) -> Result<Expr, ParseError> {
    Parser::new(LineLexer::new(code, 0).parse().into_iter()).parse_expression()
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// line = stmt { ";" stmt } [ ";" ]
    ///
    /// A compound header (`def`, `class`, `try`, `except`) may be followed by
    /// its body on the same line.
    pub fn parse_line(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while self.peek().is_some() {
            let stmt = self.parse_stmt()?;
            let compound = matches!(
                stmt,
                Stmt::Def(..) | Stmt::Class(..) | Stmt::Try | Stmt::Except
            );
            stmts.push(stmt);
            if !compound && optional!(self, Semicolon).is_none() {
                break;
            }
        }
        self.finish()?;
        Ok(stmts)
    }

    pub fn parse_expression(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.finish()?;
        Ok(expr)
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) => Err(ParseError::UnexpectedToken(token.into())),
            None => Ok(()),
        }
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl<I: Iterator<Item = Token>> Parser<I> {
    /// stmt = def-stmt | class-stmt | return-stmt | import-stmt | try-stmt | except-stmt | "pass" | assign-stmt | expr-stmt
    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::UnexpectedEOL);
        };
        match token.kind {
            // def-stmt = "def" ident "(" [ ident { "," ident } ] ")" ":"
            KwDef => {
                expect!(self, KwDef)?;
                let name = self.parse_ident()?;
                expect!(self, LParen)?;
                let params = repeat!(self, self.parse_ident(), Comma, RParen);
                expect!(self, RParen)?;
                expect!(self, Colon)?;
                Ok(Stmt::Def(name, params))
            }

            // class-stmt = "class" ident [ "(" [ expr { "," expr } ] ")" ] ":"
            KwClass => {
                expect!(self, KwClass)?;
                let name = self.parse_ident()?;
                let bases = optional!(self, LParen, {
                    let bases = repeat!(self, self.parse_expr(), Comma, RParen);
                    expect!(self, RParen)?;
                    bases
                });
                expect!(self, Colon)?;
                Ok(Stmt::Class(name, bases.unwrap_or_default()))
            }

            // return-stmt = "return" [ expr ]
            KwReturn => {
                expect!(self, KwReturn)?;
                if self.at_stmt_end() {
                    Ok(Stmt::Return(None))
                } else {
                    Ok(Stmt::Return(Some(self.parse_expr()?)))
                }
            }

            // import-stmt = ( "import" | "from" ) ...
            KwImport | KwFrom => {
                self.consume_until(|token| token.kind == Semicolon);
                Ok(Stmt::Import)
            }

            // try-stmt = "try" ":"
            KwTry => {
                expect!(self, KwTry)?;
                expect!(self, Colon)?;
                Ok(Stmt::Try)
            }

            // except-stmt = "except" ... ":"
            KwExcept => {
                expect!(self, KwExcept)?;
                self.consume_until(|token| token.kind == Colon);
                expect!(self, Colon)?;
                Ok(Stmt::Except)
            }

            KwPass => {
                expect!(self, KwPass)?;
                Ok(Stmt::Pass)
            }

            // assign-stmt = expr ( "=" | "+=" | "-=" ) expr
            // expr-stmt = expr
            _ => {
                let target = self.parse_expr()?;
                if optional!(self, Equal).is_some() {
                    let value = self.parse_expr()?;
                    Ok(Stmt::Assign(target, value))
                } else if optional!(self, PlusEqual).is_some() {
                    let value = self.parse_expr()?;
                    Ok(Stmt::AugAssign(BinaryOp::Add, target, value))
                } else if optional!(self, MinusEqual).is_some() {
                    let value = self.parse_expr()?;
                    Ok(Stmt::AugAssign(BinaryOp::Sub, target, value))
                } else {
                    Ok(Stmt::Expr(target))
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<I: Iterator<Item = Token>> Parser<I> {
    /// expr = lambda-expr | cond-expr
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if check!(self, KwLambda) {
            self.parse_lambda_expr()
        } else {
            self.parse_cond_expr()
        }
    }

    /// lambda-expr = "lambda" [ ident { "," ident } ] ":" expr
    fn parse_lambda_expr(&mut self) -> Result<Expr, ParseError> {
        expect!(self, KwLambda)?;
        let params = repeat!(self, self.parse_ident(), Comma, Colon);
        expect!(self, Colon)?;
        let body = self.parse_expr()?;
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// cond-expr = or-expr [ "if" or-expr "else" expr ]
    ///
    /// The `else` branch is a full expression, so chains nest to the right.
    fn parse_cond_expr(&mut self) -> Result<Expr, ParseError> {
        let then = self.parse_or_expr()?;
        if optional!(self, KwIf).is_none() {
            return Ok(then);
        }
        let condition = self.parse_or_expr()?;
        expect!(self, KwElse)?;
        let otherwise = self.parse_expr()?;
        Ok(Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// or-expr = and-expr { "or" and-expr }
    fn parse_or_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_and_expr, |kind| match kind {
            KwOr => Some(BinaryOp::Or),
            _ => None,
        })
    }

    /// and-expr = not-expr { "and" not-expr }
    fn parse_and_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_not_expr, |kind| match kind {
            KwAnd => Some(BinaryOp::And),
            _ => None,
        })
    }

    /// not-expr = "not" not-expr | comparison
    fn parse_not_expr(&mut self) -> Result<Expr, ParseError> {
        if optional!(self, KwNot).is_some() {
            let expr = self.parse_not_expr()?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(expr)));
        }
        self.parse_comparison()
    }

    /// comparison = bitor-expr { comp-op bitor-expr }
    /// comp-op = "<" | ">" | "==" | ">=" | "<=" | "!=" | "is" [ "not" ]
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_bitor_expr()?;
        loop {
            let op = match self.peek().map(|token| &token.kind) {
                Some(LAngle) => BinaryOp::Lt,
                Some(LAngleEqual) => BinaryOp::Le,
                Some(RAngle) => BinaryOp::Gt,
                Some(RAngleEqual) => BinaryOp::Ge,
                Some(EqualEqual) => BinaryOp::Eq,
                Some(ExclEqual) => BinaryOp::Ne,
                Some(KwIs) => BinaryOp::Eq,
                _ => break,
            };
            let is = self.next().is_some_and(|token| token.kind == KwIs);
            let op = if is && optional!(self, KwNot).is_some() {
                BinaryOp::Ne
            } else {
                op
            };
            let rhs = self.parse_bitor_expr()?;
            lhs = Expr::BinaryOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// bitor-expr = xor-expr { "|" xor-expr }
    fn parse_bitor_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_xor_expr, |kind| match kind {
            Pipe => Some(BinaryOp::BitOr),
            _ => None,
        })
    }

    /// xor-expr = bitand-expr { "^" bitand-expr }
    fn parse_xor_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_bitand_expr, |kind| match kind {
            Caret => Some(BinaryOp::BitXor),
            _ => None,
        })
    }

    /// bitand-expr = shift-expr { "&" shift-expr }
    fn parse_bitand_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_shift_expr, |kind| match kind {
            Ampasand => Some(BinaryOp::BitAnd),
            _ => None,
        })
    }

    /// shift-expr = add-expr { ( "<<" | ">>" ) add-expr }
    fn parse_shift_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_add_expr, |kind| match kind {
            LAngleLAngle => Some(BinaryOp::Shl),
            RAngleRAngle => Some(BinaryOp::Shr),
            _ => None,
        })
    }

    /// add-expr = mul-expr { ( "+" | "-" ) mul-expr }
    fn parse_add_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_mul_expr, |kind| match kind {
            Plus => Some(BinaryOp::Add),
            Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    /// mul-expr = unary-expr { ( "*" | "/" | "//" | "%" ) unary-expr }
    fn parse_mul_expr(&mut self) -> Result<Expr, ParseError> {
        self.fold_binary(Self::parse_unary_expr, |kind| match kind {
            Star => Some(BinaryOp::Mul),
            Slash => Some(BinaryOp::Div),
            SlashSlash => Some(BinaryOp::FloorDiv),
            Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    /// unary-expr = ( "+" | "-" | "~" ) unary-expr | power-expr
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().map(|token| &token.kind) {
            Some(Plus) => UnaryOp::Pos,
            Some(Minus) => UnaryOp::Neg,
            Some(Tilde) => UnaryOp::Invert,
            _ => return self.parse_power_expr(),
        };
        self.next();
        let expr = self.parse_unary_expr()?;
        Ok(Expr::Unary(op, Box::new(expr)))
    }

    /// power-expr = postfix-expr [ "**" unary-expr ]
    fn parse_power_expr(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_postfix_expr()?;
        if optional!(self, StarStar).is_some() {
            let exp = self.parse_unary_expr()?;
            return Ok(Expr::BinaryOp(BinaryOp::Pow, Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    /// postfix-expr = atom { postfix-op }
    /// postfix-op = "(" [ expr { "," expr } ] ")" | "[" expr "]" | "." ident
    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            // Call: expr "(" [ expr { "," expr } ] ")"
            if check!(self, LParen) {
                expect!(self, LParen)?;
                let args = repeat!(self, self.parse_expr(), Comma, RParen);
                expect!(self, RParen)?;
                expr = call(expr, args);
                continue;
            }

            // Subscript: expr "[" expr "]"
            if check!(self, LBracket) {
                expect!(self, LBracket)?;
                let index = self.parse_expr()?;
                expect!(self, RBracket)?;
                expr = Expr::Subscript(Box::new(expr), Box::new(index));
                continue;
            }

            // Attribute: expr "." ident
            if check!(self, Period) {
                expect!(self, Period)?;
                let field = self.parse_ident()?;
                expr = Expr::Attribute(Box::new(expr), field);
                continue;
            }

            break;
        }
        Ok(expr)
    }

    /// atom = ident | num-lit | text-lit { text-lit } | "True" | "False" | "None"
    ///      | "(" [ expr { "," expr } [ "," ] ] ")" | "[" [ expr { "," expr } ] "]"
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::UnexpectedEOL);
        };
        match &token.kind {
            Ident(_) => Ok(Expr::Identifier(self.parse_ident()?)),

            Number(num) => {
                let num = num.clone();
                self.next();
                Ok(Expr::Literal(Literal::Number(num)))
            }

            // Adjacent literals are one string
            Text(_) => {
                let mut text = String::new();
                while let Some(Token {
                    kind: Text(part), ..
                }) = optional!(self, Text(_))
                {
                    text.push_str(&part);
                }
                Ok(Expr::Literal(Literal::Text(text)))
            }

            KwTrue => {
                self.next();
                Ok(Expr::Literal(Literal::Bool(true)))
            }

            KwFalse => {
                self.next();
                Ok(Expr::Literal(Literal::Bool(false)))
            }

            KwNone => {
                self.next();
                Ok(Expr::Literal(Literal::None))
            }

            // Group or tuple
            LParen => {
                expect!(self, LParen)?;
                if optional!(self, RParen).is_some() {
                    return Ok(Expr::List(Vec::new()));
                }
                let first = self.parse_expr()?;
                if optional!(self, RParen).is_some() {
                    return Ok(Expr::Group(Box::new(first)));
                }
                let mut items = vec![first];
                while optional!(self, Comma).is_some() {
                    if check!(self, RParen) {
                        break;
                    }
                    items.push(self.parse_expr()?);
                }
                expect!(self, RParen)?;
                Ok(Expr::List(items))
            }

            // List: "[" [ expr { "," expr } ] "]"
            LBracket => {
                expect!(self, LBracket)?;
                let items = repeat!(self, self.parse_expr(), Comma, RBracket);
                expect!(self, RBracket)?;
                Ok(Expr::List(items))
            }

            TokenKind::Error(err) => Err(ParseError::InvalidToken(err.clone())),

            _ => Err(ParseError::UnexpectedToken(token.into())),
        }
    }

    /// ident = ( "A".."Z" | "a".."z" | "_" ) { "0".."9" | "A".."Z" | "a".."z" | "_" }
    fn parse_ident(&mut self) -> Result<String, ParseError> {
        match expect!(self, Ident(_))?.kind {
            Ident(name) => Ok(name),
            _ => Err(ParseError::UnexpectedEOL),
        }
    }

    /// operand { op operand }, left associative
    fn fold_binary(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
        op_of: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> Result<Expr, ParseError> {
        let mut lhs = operand(self)?;
        while let Some(op) = self.peek().and_then(|token| op_of(&token.kind)) {
            self.next();
            let rhs = operand(self)?;
            lhs = Expr::BinaryOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }
}

/// `EV("KEY", level)` is an event reference, everything else a plain call.
fn call(callee: Expr, mut args: Vec<Expr>) -> Expr {
    let is_accessor = matches!(&callee, Expr::Identifier(name) if name == EVENT_ACCESSOR);
    if is_accessor && args.len() == 2 {
        if let Expr::Literal(Literal::Text(key)) = &args[0] {
            let key = key.clone();
            let level = args.remove(1);
            return Expr::EventRef {
                key,
                level: Box::new(level),
            };
        }
    }
    Expr::Call {
        callee: Box::new(callee),
        args,
    }
}
