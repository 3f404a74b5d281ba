//! # Compiler - statement graph and plan emission
//!
//! Single pass, recursive descent, one token of lookahead (plus a peek at the
//! token after an identifier to tell assignments apart).
//!
//! Every statement compiles to a `Fragment`: the head and tail nodes of a
//! small graph, so callers can splice blocks by linking one tail to the next
//! head. Control flow is pre-linearized through `next`/`jmp` links:
//!
//! ```text
//! IF c ... ELSE ... END      if.next = then, if.jmp = else (or join)
//!                            both branch tails -> join
//! FOR i IN a..b ... END      for.jmp = body (or end), body tail -> end
//! WHILE c ... END            end.jmp = header, header.next = end.next = join
//! FUNC f(p) ... END          body, [RETURN 0], exit; every RETURN -> exit
//! ```
//!
//! Any grammar violation aborts the whole compile.

pub mod expr;
pub mod plan;


use crate::arena::{ArenaError, StrId};
use crate::executor::errors::{self, Fault};
use crate::executor::heap::Heap;
use crate::executor::types::{Plan, Stmt, StmtId, StmtKind};
use crate::lexer::{line_at, next_token, Keyword, Token, TokenKind};
use expr::Expr;
use plan::build_expr_plan;

/// Compile `source` into the heap, returning the first statement
///
/// An empty program has no statements.
pub fn compile(source: &str, heap: &mut Heap) -> Result<Option<StmtId>, Fault> {
    let mut compiler = Compiler::new(source, heap)?;
    let program = compiler.parse_block()?;
    if compiler.peek().kind != TokenKind::Eof {
        return Err(compiler.unexpected("a statement"));
    }
    Ok(program.map(|fragment| fragment.head))
}

/// Head and tail of a compiled piece of graph
#[derive(Debug, Clone, Copy)]
struct Fragment {
    head: StmtId,
    tail: StmtId,
}

impl Fragment {
    fn single(id: StmtId) -> Self {
        Fragment { head: id, tail: id }
    }
}

pub(crate) struct Compiler<'a> {
    source: &'a str,
    heap: &'a mut Heap,
    current: Token,
    /// Position just past `current`
    cursor: usize,
    /// Return statements of each function being compiled, innermost last
    returns: Vec<Vec<StmtId>>,
}

impl<'a> Compiler<'a> {
    fn new(source: &'a str, heap: &'a mut Heap) -> Result<Self, Fault> {
        let (current, cursor) = next_token(source, 0)?;
        Ok(Compiler {
            source,
            heap,
            current,
            cursor,
            returns: Vec::new(),
        })
    }

    /* ===================== Tokens ===================== */

    fn peek(&self) -> Token {
        self.current
    }

    fn peek_second(&self) -> Result<Token, Fault> {
        next_token(self.source, self.cursor).map(|(token, _)| token)
    }

    /// Consume the current token and return it
    fn advance(&mut self) -> Result<Token, Fault> {
        let token = self.current;
        if token.kind != TokenKind::Eof {
            let (next, cursor) = next_token(self.source, self.cursor)?;
            self.current = next;
            self.cursor = cursor;
        }
        Ok(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, Fault> {
        if self.current.kind == kind {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, Fault> {
        if self.current.kind != kind {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, Fault> {
        if !self.current.is_keyword(keyword) {
            return Err(self.unexpected(keyword.as_str()));
        }
        self.advance()
    }

    fn line_of(&self, token: Token) -> usize {
        line_at(self.source, token.span.start)
    }

    fn unexpected(&self, expected: &str) -> Fault {
        let token = self.current;
        let found = match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", token.span.text(self.source)),
        };
        Fault::compile(
            errors::UNEXPECTED_TOKEN,
            self.line_of(token),
            format!("Expected {}, found {}", expected, found),
        )
    }

    /* ===================== Arena access ===================== */

    fn out_of_memory(&self, err: ArenaError) -> Fault {
        Fault::compile(errors::OUT_OF_MEMORY, self.line_of(self.current), err.to_string())
    }

    fn intern(&mut self, text: &str, token: Token) -> Result<StrId, Fault> {
        self.heap.strings.intern(text).map_err(|err| {
            Fault::compile(errors::OUT_OF_MEMORY, self.line_of(token), err.to_string())
        })
    }

    fn node(&mut self, kind: StmtKind, line: usize) -> Result<StmtId, Fault> {
        self.heap
            .alloc_stmt(Stmt::new(kind, line))
            .map_err(|err| self.out_of_memory(err))
    }

    fn plan(&mut self, expr: &Expr, as_statement: bool) -> Result<Plan, Fault> {
        build_expr_plan(expr, &mut self.heap.ops, as_statement).map_err(|err| self.out_of_memory(err))
    }

    fn link(&mut self, from: StmtId, to: StmtId) {
        self.heap.stmt_mut(from).next = Some(to);
    }

    fn set_jmp(&mut self, from: StmtId, to: StmtId) {
        self.heap.stmt_mut(from).jmp = Some(to);
    }

    /* ===================== Blocks ===================== */

    /// Statements up to (not including) `EOF`, `END` or `ELSE`
    fn parse_block(&mut self) -> Result<Option<Fragment>, Fault> {
        let mut block: Option<Fragment> = None;
        loop {
            while self.eat(TokenKind::Semicolon)? {}

            let token = self.peek();
            if token.kind == TokenKind::Eof
                || token.is_keyword(Keyword::End)
                || token.is_keyword(Keyword::Else)
            {
                return Ok(block);
            }

            let fragment = self.parse_statement()?;
            block = Some(match block {
                None => fragment,
                Some(prev) => {
                    self.link(prev.tail, fragment.head);
                    Fragment {
                        head: prev.head,
                        tail: fragment.tail,
                    }
                }
            });
        }
    }

    /* ===================== Statements ===================== */

    fn parse_statement(&mut self) -> Result<Fragment, Fault> {
        let token = self.peek();
        match (token.kind, token.keyword) {
            (TokenKind::Keyword, Some(Keyword::If)) => self.parse_if(),
            (TokenKind::Keyword, Some(Keyword::For)) => self.parse_for(),
            (TokenKind::Keyword, Some(Keyword::While)) => self.parse_while(),
            (TokenKind::Keyword, Some(Keyword::Func)) => self.parse_func(),
            (TokenKind::Keyword, Some(Keyword::Return)) => self.parse_return(),
            (TokenKind::Identifier, _) if self.peek_second()?.kind == TokenKind::Equal => {
                self.parse_assign()
            }
            _ => self.parse_expr_statement(),
        }
    }

    fn parse_assign(&mut self) -> Result<Fragment, Fault> {
        let token = self.advance()?;
        let line = self.line_of(token);
        let var = self.intern(token.span.text(self.source), token)?;
        self.expect(TokenKind::Equal, "'='")?;

        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;

        let plan = self.plan(&value, false)?;
        let node = self.node(StmtKind::Assign { var, plan }, line)?;
        Ok(Fragment::single(node))
    }

    fn parse_expr_statement(&mut self) -> Result<Fragment, Fault> {
        let line = self.line_of(self.peek());
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;

        let node = if expr.is_call() {
            let plan = self.plan(&expr, true)?;
            self.node(StmtKind::Call { plan }, line)?
        } else {
            let plan = self.plan(&expr, false)?;
            self.node(StmtKind::Expr { plan }, line)?
        };
        Ok(Fragment::single(node))
    }

    fn parse_if(&mut self) -> Result<Fragment, Fault> {
        let token = self.advance()?;
        let line = self.line_of(token);
        let cond = self.parse_expr()?;
        let cond = self.plan(&cond, false)?;

        let then_block = self.parse_block()?;
        let else_block = if self.peek().is_keyword(Keyword::Else) {
            self.advance()?;
            self.parse_block()?
        } else {
            None
        };
        let end = self.expect_keyword(Keyword::End)?;

        let node = self.node(StmtKind::If { cond }, line)?;
        let join = self.node(StmtKind::Nop, self.line_of(end))?;

        match then_block {
            Some(block) => {
                self.link(node, block.head);
                self.link(block.tail, join);
            }
            None => self.link(node, join),
        }
        match else_block {
            Some(block) => {
                self.set_jmp(node, block.head);
                self.link(block.tail, join);
            }
            None => self.set_jmp(node, join),
        }

        Ok(Fragment {
            head: node,
            tail: join,
        })
    }

    fn parse_for(&mut self) -> Result<Fragment, Fault> {
        let token = self.advance()?;
        let line = self.line_of(token);
        let var_token = self.expect(TokenKind::Identifier, "a loop variable")?;
        let var = self.intern(var_token.span.text(self.source), var_token)?;
        self.expect_keyword(Keyword::In)?;

        let min = self.parse_expr()?;
        self.expect(TokenKind::Dot, "'..'")?;
        self.expect(TokenKind::Dot, "'..'")?;
        let max = self.parse_expr()?;
        let min = self.plan(&min, false)?;
        let max = self.plan(&max, false)?;

        let body = self.parse_block()?;
        let end = self.expect_keyword(Keyword::End)?;
        let end_line = self.line_of(end);

        let header = self.node(StmtKind::For { var, min, max }, line)?;
        let end = self.node(StmtKind::ForEnd { var }, end_line)?;
        self.finish_loop(header, body, end, end_line)
    }

    fn parse_while(&mut self) -> Result<Fragment, Fault> {
        let token = self.advance()?;
        let line = self.line_of(token);
        let cond = self.parse_expr()?;
        let cond = self.plan(&cond, false)?;

        let body = self.parse_block()?;
        let end = self.expect_keyword(Keyword::End)?;
        let end_line = self.line_of(end);

        let header = self.node(StmtKind::While { cond }, line)?;
        let end = self.node(StmtKind::WhileEnd, end_line)?;
        self.finish_loop(header, body, end, end_line)
    }

    /// Wire a loop header, its body and its end node around a join node
    fn finish_loop(
        &mut self,
        header: StmtId,
        body: Option<Fragment>,
        end: StmtId,
        end_line: usize,
    ) -> Result<Fragment, Fault> {
        let join = self.node(StmtKind::Nop, end_line)?;

        match body {
            Some(block) => {
                self.set_jmp(header, block.head);
                self.link(block.tail, end);
            }
            None => self.set_jmp(header, end),
        }
        self.set_jmp(end, header);
        self.link(header, join);
        self.link(end, join);

        Ok(Fragment {
            head: header,
            tail: join,
        })
    }

    fn parse_func(&mut self) -> Result<Fragment, Fault> {
        let token = self.advance()?;
        let line = self.line_of(token);
        let name_token = self.expect(TokenKind::Identifier, "a function name")?;
        let name = self.intern(name_token.span.text(self.source), name_token)?;

        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.eat(TokenKind::RParen)? {
            loop {
                let param = self.expect(TokenKind::Identifier, "a parameter name")?;
                params.push(self.intern(param.span.text(self.source), param)?);
                if self.eat(TokenKind::Comma)? {
                    continue;
                }
                self.expect(TokenKind::RParen, "',' or ')'")?;
                break;
            }
        }

        self.returns.push(Vec::new());
        let body = self.parse_block()?;
        let end = self.expect_keyword(Keyword::End)?;
        let end_line = self.line_of(end);
        let mut returns = self.returns.pop().unwrap_or_default();

        let ends_with_return = body.is_some_and(|block| {
            matches!(self.heap.stmt(block.tail).kind, StmtKind::Return { .. })
        });
        let body = match body {
            Some(block) if ends_with_return => block,
            _ => {
                let zero = self.plan(&Expr::Number(0), false)?;
                let implicit = self.node(StmtKind::Return { plan: zero }, end_line)?;
                returns.push(implicit);
                match body {
                    Some(block) => {
                        self.link(block.tail, implicit);
                        Fragment {
                            head: block.head,
                            tail: implicit,
                        }
                    }
                    None => Fragment::single(implicit),
                }
            }
        };

        let exit = self.node(StmtKind::FuncExit, end_line)?;
        for ret in returns {
            self.link(ret, exit);
        }

        let params = self
            .heap
            .alloc_names(&params)
            .map_err(|err| self.out_of_memory(err))?;
        let decl = self.node(
            StmtKind::FuncDecl {
                name,
                params,
                body: body.head,
            },
            line,
        )?;
        Ok(Fragment::single(decl))
    }

    fn parse_return(&mut self) -> Result<Fragment, Fault> {
        let token = self.peek();
        let line = self.line_of(token);
        if self.returns.is_empty() {
            return Err(Fault::compile(
                errors::RETURN_OUTSIDE_FUNCTION,
                line,
                "RETURN outside of a function",
            ));
        }
        self.advance()?;

        let value = if self.peek().kind == TokenKind::Semicolon {
            Expr::Number(0)
        } else {
            self.parse_expr()?
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let plan = self.plan(&value, false)?;
        let node = self.node(StmtKind::Return { plan }, line)?;
        if let Some(returns) = self.returns.last_mut() {
            returns.push(node);
        }
        Ok(Fragment::single(node))
    }
}
