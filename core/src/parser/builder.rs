//! Turns pest pairs into arena-allocated syntax tree nodes.

use core::cell::Cell;

use bumpalo::Bump;
use pest::iterators::{Pair, Pairs};

use super::comments::CommentIndex;
use super::error::{ParseError, ParseErrorKind};
use super::grammar::{PRATT_PARSER, Rule};
use crate::ast::*;
use crate::{Vec, format, vec};

type Result<T> = core::result::Result<T, ParseError>;

pub(super) struct Builder<'a> {
    arena: &'a Bump,
    origin: &'a str,
    source: &'a str,
    /// Comment-free copy of `source` the pairs were parsed from.
    masked: &'a str,
    comments: CommentIndex<'a>,
    max_depth: usize,
    depth: Cell<usize>,
}

/// Restores the nesting depth when dropped.
struct Nested<'b> {
    depth: &'b Cell<usize>,
    levels: usize,
}

impl Drop for Nested<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - self.levels);
    }
}

/// Operators of a flat `expression` pair.
struct OperatorCounts {
    /// Prefix, postfix and binary operators.
    operators: usize,
    /// Longest run of consecutive prefix operators.
    prefix_run: usize,
}

impl OperatorCounts {
    fn of(pairs: Pairs<'_, Rule>) -> Self {
        let mut counts = OperatorCounts {
            operators: 0,
            prefix_run: 0,
        };
        let mut run = 0;
        for pair in pairs {
            match pair.as_rule() {
                Rule::u_plus
                | Rule::u_neg
                | Rule::u_not
                | Rule::u_xor
                | Rule::u_deref
                | Rule::u_addr
                | Rule::u_recv => {
                    run += 1;
                    counts.prefix_run = counts.prefix_run.max(run);
                    counts.operators += 1;
                    continue;
                }
                Rule::selector_op
                | Rule::type_assert_op
                | Rule::index_op
                | Rule::slice_op
                | Rule::call_op
                | Rule::literal_value
                | Rule::lor
                | Rule::land
                | Rule::eql
                | Rule::neq
                | Rule::lss
                | Rule::leq
                | Rule::gtr
                | Rule::geq
                | Rule::add
                | Rule::sub
                | Rule::or
                | Rule::xor
                | Rule::mul
                | Rule::quo
                | Rule::rem
                | Rule::shl
                | Rule::shr
                | Rule::and
                | Rule::and_not => counts.operators += 1,
                _ => {}
            }
            run = 0;
        }
        counts
    }
}

impl<'a> Builder<'a> {
    pub fn new(
        arena: &'a Bump,
        origin: &'a str,
        source: &'a str,
        masked: &'a str,
        comments: CommentIndex<'a>,
        max_depth: usize,
    ) -> Self {
        Self {
            arena,
            origin,
            source,
            masked,
            comments,
            max_depth,
            depth: Cell::new(0),
        }
    }

    // === Helpers ===

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.origin, self.source, span)
    }

    fn nest(&self, pair: &Pair<'a, Rule>) -> Result<Nested<'_>> {
        let depth = self.depth.get() + 1;
        self.check_depth(depth, pair.as_span().into())?;
        Ok(self.descend(1))
    }

    /// Moves `levels` deeper without checking; the nodes built below check.
    fn descend(&self, levels: usize) -> Nested<'_> {
        self.depth.set(self.depth.get() + levels);
        Nested {
            depth: &self.depth,
            levels,
        }
    }

    fn check_depth(&self, depth: usize, span: Span) -> Result<()> {
        if depth > self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    depth,
                    max_depth: self.max_depth,
                },
                span,
            ));
        }
        Ok(())
    }

    /// Next child of a pair whose shape the grammar guarantees.
    fn next(&self, pairs: &mut Pairs<'a, Rule>, parent: &Span) -> Result<Pair<'a, Rule>> {
        pairs.next().ok_or_else(|| {
            self.error(
                ParseErrorKind::Other {
                    message: "missing expected pair in rule".into(),
                },
                parent.clone(),
            )
        })
    }

    /// Source text of `start..end` without surrounding blanks, comments,
    /// or semicolons.
    fn text_of(&self, start: usize, end: usize) -> &'a str {
        let is_blank = |c: char| c.is_whitespace() || c == ';';
        let masked = &self.masked[start..end];
        let trimmed = masked.trim_start_matches(is_blank);
        let start = end - trimmed.len();
        let end = start + trimmed.trim_end_matches(is_blank).len();
        &self.source[start..end]
    }

    fn text(&self, span: &Span) -> &'a str {
        self.text_of(span.start(), span.end())
    }

    fn pair_text(&self, pair: &Pair<'a, Rule>) -> &'a str {
        let span = pair.as_span();
        self.text_of(span.start(), span.end())
    }

    fn exprs(&self, list: Vec<Expr<'a>>) -> &'a [Expr<'a>] {
        self.arena.alloc_slice_copy(&list)
    }

    fn stmts(&self, list: Vec<Stmt<'a>>) -> &'a [Stmt<'a>] {
        self.arena.alloc_slice_copy(&list)
    }

    // === Files and declarations ===

    pub fn file(&self, name: &'a str, pair: Pair<'a, Rule>) -> Result<&'a File<'a>> {
        let span = Span::from(pair.as_span());
        let mut package = None;
        let mut doc = None;
        let mut decls = Vec::new();
        let mut imports = Vec::new();

        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::package_clause => {
                    doc = self.comments.lead(child.as_span().start());
                    let clause = Span::from(child.as_span());
                    package = Some(self.ident(&self.next(&mut child.into_inner(), &clause)?));
                }
                Rule::import_decl => {
                    let decl = self.gen_decl(child)?;
                    imports.extend(decl.specs.iter().filter_map(|spec| match spec {
                        Spec::ImportSpec(import) => Some(*import),
                        _ => None,
                    }));
                    decls.push(Decl::GenDecl(decl));
                }
                Rule::const_decl | Rule::var_decl | Rule::type_decl => {
                    decls.push(Decl::GenDecl(self.gen_decl(child)?));
                }
                Rule::func_decl => decls.push(Decl::FuncDecl(self.func_decl(child)?)),
                Rule::EOI => {}
                rule => unreachable!("unexpected rule in source file: {:?}", rule),
            }
        }

        let package = package.ok_or_else(|| {
            self.error(
                ParseErrorKind::Other {
                    message: "missing package clause".into(),
                },
                span,
            )
        })?;

        Ok(self.arena.alloc(File {
            name,
            doc,
            package,
            decls: self.arena.alloc_slice_copy(&decls),
            imports: self.arena.alloc_slice_copy(&imports),
            comments: self.arena.alloc_slice_copy(&self.comments.groups()),
            text: self.source.trim(),
        }))
    }

    fn gen_decl(&self, pair: Pair<'a, Rule>) -> Result<&'a GenDecl<'a>> {
        let span = Span::from(pair.as_span());
        let tok = match pair.as_rule() {
            Rule::import_decl => DeclKind::Import,
            Rule::const_decl => DeclKind::Const,
            Rule::var_decl => DeclKind::Var,
            Rule::type_decl => DeclKind::Type,
            rule => unreachable!("not a declaration: {:?}", rule),
        };
        let doc = self.comments.lead(span.start());
        let body = self.next(&mut pair.into_inner(), &span)?;

        let (specs, lparen) = match body.as_rule() {
            Rule::import_group | Rule::const_group | Rule::var_group | Rule::type_group => {
                let specs = body
                    .into_inner()
                    .map(|spec| self.spec(spec, true))
                    .collect::<Result<Vec<_>>>()?;
                (specs, true)
            }
            _ => (vec![self.spec(body, false)?], false),
        };

        Ok(self.arena.alloc(GenDecl {
            doc,
            tok,
            specs: self.arena.alloc_slice_copy(&specs),
            lparen,
            text: self.text(&span),
        }))
    }

    /// One spec; only specs inside parentheses carry their own doc comment.
    fn spec(&self, pair: Pair<'a, Rule>, grouped: bool) -> Result<Spec<'a>> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let doc = if grouped {
            self.comments.lead(span.start())
        } else {
            None
        };
        let comment = self.comments.line(span.start() + text.len());

        match pair.as_rule() {
            Rule::import_spec => {
                let mut name = None;
                let mut path = None;
                for child in pair.into_inner() {
                    match child.as_rule() {
                        Rule::import_name => name = Some(self.ident(&child)),
                        _ => path = Some(self.basic_lit(&child)),
                    }
                }
                let path = path.ok_or_else(|| {
                    self.error(
                        ParseErrorKind::Other {
                            message: "missing import path".into(),
                        },
                        span.clone(),
                    )
                })?;
                Ok(Spec::ImportSpec(self.arena.alloc(ImportSpec {
                    doc,
                    name,
                    path,
                    comment,
                    text,
                })))
            }
            Rule::const_spec | Rule::var_spec => {
                let mut names: &'a [&'a Ident<'a>] = &[];
                let mut ty = None;
                let mut values: &'a [Expr<'a>] = &[];
                for child in pair.into_inner() {
                    match child.as_rule() {
                        Rule::ident_list => names = self.ident_list(child),
                        Rule::expression_list => values = self.expr_list(child)?,
                        _ => ty = Some(self.ty(child)?),
                    }
                }
                Ok(Spec::ValueSpec(self.arena.alloc(ValueSpec {
                    doc,
                    names,
                    ty,
                    values,
                    comment,
                    text,
                })))
            }
            Rule::type_spec => {
                let mut inner = pair.into_inner();
                let name = self.ident(&self.next(&mut inner, &span)?);
                let mut ty_pair = self.next(&mut inner, &span)?;
                let assign = ty_pair.as_rule() == Rule::alias_mark;
                if assign {
                    ty_pair = self.next(&mut inner, &span)?;
                }
                Ok(Spec::TypeSpec(self.arena.alloc(TypeSpec {
                    doc,
                    name,
                    assign,
                    ty: self.ty(ty_pair)?,
                    comment,
                    text,
                })))
            }
            rule => unreachable!("not a spec: {:?}", rule),
        }
    }

    fn func_decl(&self, pair: Pair<'a, Rule>) -> Result<&'a FuncDecl<'a>> {
        let span = Span::from(pair.as_span());
        let doc = self.comments.lead(span.start());
        let mut recv = None;
        let mut name = None;
        let mut ty = None;
        let mut body = None;

        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::receiver => {
                    let receiver = Span::from(child.as_span());
                    recv = Some(self.field_list(self.next(&mut child.into_inner(), &receiver)?)?);
                }
                Rule::ident => name = Some(self.ident(&child)),
                Rule::signature => {
                    let text = self.pair_text(&child);
                    ty = Some(self.func_type(child, text)?);
                }
                Rule::block => body = Some(self.block(child)?),
                rule => unreachable!("unexpected rule in function declaration: {:?}", rule),
            }
        }

        let missing = |what: &str| {
            self.error(
                ParseErrorKind::Other {
                    message: format!("missing {what} in function declaration"),
                },
                span.clone(),
            )
        };
        Ok(self.arena.alloc(FuncDecl {
            doc,
            recv,
            name: name.ok_or_else(|| missing("name"))?,
            ty: ty.ok_or_else(|| missing("signature"))?,
            body,
            text: self.text(&span),
        }))
    }

    // === Types and fields ===

    fn ident(&self, pair: &Pair<'a, Rule>) -> &'a Ident<'a> {
        self.arena.alloc(Ident {
            name: self.pair_text(pair),
        })
    }

    fn ident_list(&self, pair: Pair<'a, Rule>) -> &'a [&'a Ident<'a>] {
        let names: Vec<_> = pair.into_inner().map(|ident| self.ident(&ident)).collect();
        self.arena.alloc_slice_copy(&names)
    }

    fn basic_lit(&self, pair: &Pair<'a, Rule>) -> &'a BasicLit<'a> {
        let kind = match pair.as_rule() {
            Rule::int_lit => LitKind::Int,
            Rule::float_lit => LitKind::Float,
            Rule::imaginary_lit => LitKind::Imag,
            Rule::rune_lit => LitKind::Char,
            _ => LitKind::String,
        };
        self.arena.alloc(BasicLit {
            kind,
            value: self.pair_text(pair),
        })
    }

    /// A `FuncType` from a `signature` pair; `text` is the type's text.
    fn func_type(&self, pair: Pair<'a, Rule>, text: &'a str) -> Result<&'a FuncType<'a>> {
        let span = Span::from(pair.as_span());
        let mut inner = pair.into_inner();
        let params = self.field_list(self.next(&mut inner, &span)?)?;
        let results = match inner.next() {
            Some(result) => Some(self.result(result)?),
            None => None,
        };
        Ok(self.arena.alloc(FuncType {
            params,
            results,
            text,
        }))
    }

    fn result(&self, pair: Pair<'a, Rule>) -> Result<&'a FieldList<'a>> {
        let span = Span::from(pair.as_span());
        let inner = self.next(&mut pair.into_inner(), &span)?;
        if inner.as_rule() == Rule::parameters {
            return self.field_list(inner);
        }
        // A single unnamed result without parentheses.
        let text = self.pair_text(&inner);
        let field: &'a Field<'a> = self.arena.alloc(Field {
            doc: None,
            names: &[],
            ty: self.ty(inner)?,
            tag: None,
            comment: None,
            text,
        });
        Ok(self.arena.alloc(FieldList {
            list: self.arena.alloc_slice_copy(&[field]),
            text,
        }))
    }

    /// A `FieldList` from a `parameters` pair.
    fn field_list(&self, pair: Pair<'a, Rule>) -> Result<&'a FieldList<'a>> {
        let text = self.pair_text(&pair);
        let fields = pair
            .into_inner()
            .map(|param| self.parameter(param))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.arena.alloc(FieldList {
            list: self.arena.alloc_slice_copy(&fields),
            text,
        }))
    }

    fn parameter(&self, pair: Pair<'a, Rule>) -> Result<&'a Field<'a>> {
        let span = Span::from(pair.as_span());
        let mut names: &'a [&'a Ident<'a>] = &[];
        let mut variadic = None;
        let mut ty = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::ident_list => names = self.ident_list(child),
                Rule::variadic => variadic = Some(child.as_span().start()),
                _ => {
                    let end = child.as_span().end();
                    let elt = self.ty(child)?;
                    ty = Some(match variadic {
                        Some(start) => Expr::Ellipsis(self.arena.alloc(Ellipsis {
                            elt: Some(elt),
                            text: self.text_of(start, end),
                        })),
                        None => elt,
                    });
                }
            }
        }
        let ty = ty.ok_or_else(|| {
            self.error(
                ParseErrorKind::Other {
                    message: "missing parameter type".into(),
                },
                span.clone(),
            )
        })?;
        Ok(self.arena.alloc(Field {
            doc: None,
            names,
            ty,
            tag: None,
            comment: None,
            text: self.text(&span),
        }))
    }

    /// Braced member list of a struct or interface type; its text starts
    /// at the opening brace.
    fn member_list(
        &self,
        span: &Span,
        fields: Vec<&'a Field<'a>>,
    ) -> &'a FieldList<'a> {
        let open = self.masked[span.start()..span.end()]
            .find('{')
            .map_or(span.start(), |offset| span.start() + offset);
        self.arena.alloc(FieldList {
            list: self.arena.alloc_slice_copy(&fields),
            text: self.text_of(open, span.end()),
        })
    }

    fn struct_field(&self, pair: Pair<'a, Rule>) -> Result<&'a Field<'a>> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let mut names: &'a [&'a Ident<'a>] = &[];
        let mut ty = None;
        let mut tag = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::ident_list => names = self.ident_list(child),
                Rule::interpreted_string | Rule::raw_string => tag = Some(self.basic_lit(&child)),
                Rule::embedded_pointer => {
                    let pointer = Span::from(child.as_span());
                    let x = self.qualified(self.next(&mut child.into_inner(), &pointer)?)?;
                    ty = Some(Expr::StarExpr(self.arena.alloc(StarExpr {
                        x,
                        text: self.text(&pointer),
                    })));
                }
                _ => ty = Some(self.ty(child)?),
            }
        }
        let ty = ty.ok_or_else(|| {
            self.error(
                ParseErrorKind::Other {
                    message: "missing field type".into(),
                },
                span.clone(),
            )
        })?;
        Ok(self.arena.alloc(Field {
            doc: self.comments.lead(span.start()),
            names,
            ty,
            tag,
            comment: self.comments.line(span.start() + text.len()),
            text,
        }))
    }

    fn interface_elem(&self, pair: Pair<'a, Rule>) -> Result<&'a Field<'a>> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let (names, ty): (&'a [&'a Ident<'a>], Expr<'a>) = match pair.as_rule() {
            Rule::method_elem => {
                let mut inner = pair.into_inner();
                let name = self.ident(&self.next(&mut inner, &span)?);
                let signature = self.next(&mut inner, &span)?;
                let sig_text = self.pair_text(&signature);
                (
                    self.arena.alloc_slice_copy(&[name]),
                    Expr::FuncType(self.func_type(signature, sig_text)?),
                )
            }
            _ => (&[], self.qualified(pair)?),
        };
        Ok(self.arena.alloc(Field {
            doc: self.comments.lead(span.start()),
            names,
            ty,
            tag: None,
            comment: self.comments.line(span.start() + text.len()),
            text,
        }))
    }

    /// `name` or `pkg.Name`.
    fn qualified(&self, pair: Pair<'a, Rule>) -> Result<Expr<'a>> {
        let span = Span::from(pair.as_span());
        let mut inner = pair.into_inner();
        let first = self.ident(&self.next(&mut inner, &span)?);
        Ok(match inner.next() {
            Some(sel) => Expr::SelectorExpr(self.arena.alloc(SelectorExpr {
                x: Expr::Ident(first),
                sel: self.ident(&sel),
                text: self.text(&span),
            })),
            None => Expr::Ident(first),
        })
    }

    fn ty(&self, pair: Pair<'a, Rule>) -> Result<Expr<'a>> {
        let _nested = self.nest(&pair)?;
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let alloc = self.arena;

        Ok(match pair.as_rule() {
            Rule::qualified_ident => self.qualified(pair)?,
            Rule::pointer_type => Expr::StarExpr(alloc.alloc(StarExpr {
                x: self.ty(self.next(&mut pair.into_inner(), &span)?)?,
                text,
            })),
            Rule::array_type => {
                let mut parts: Vec<_> = pair.into_inner().collect();
                let elt = self.ty(parts.pop().ok_or_else(|| self.missing_pair(&span))?)?;
                let len = match parts.pop() {
                    Some(len) if len.as_rule() == Rule::ellipsis_length => {
                        Some(Expr::Ellipsis(alloc.alloc(Ellipsis {
                            elt: None,
                            text: self.pair_text(&len),
                        })))
                    }
                    Some(len) => Some(self.expr(len)?),
                    None => None,
                };
                Expr::ArrayType(alloc.alloc(ArrayType { len, elt, text }))
            }
            Rule::map_type => {
                let mut inner = pair.into_inner();
                let key = self.ty(self.next(&mut inner, &span)?)?;
                let value = self.ty(self.next(&mut inner, &span)?)?;
                Expr::MapType(alloc.alloc(MapType { key, value, text }))
            }
            Rule::chan_type => {
                let mut inner = pair.into_inner();
                let dir_pair = self.next(&mut inner, &span)?;
                let dir_text = dir_pair.as_str();
                let dir = if dir_text.starts_with("<-") {
                    ChanDir::Recv
                } else if dir_text.contains("<-") {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let value = self.ty(self.next(&mut inner, &span)?)?;
                Expr::ChanType(alloc.alloc(ChanType { dir, value, text }))
            }
            Rule::func_type => {
                let signature = self.next(&mut pair.into_inner(), &span)?;
                Expr::FuncType(self.func_type(signature, text)?)
            }
            Rule::struct_type => {
                let fields = pair
                    .into_inner()
                    .map(|field| self.struct_field(field))
                    .collect::<Result<Vec<_>>>()?;
                Expr::StructType(alloc.alloc(StructType {
                    fields: self.member_list(&span, fields),
                    text,
                }))
            }
            Rule::interface_type => {
                let methods = pair
                    .into_inner()
                    .map(|elem| self.interface_elem(elem))
                    .collect::<Result<Vec<_>>>()?;
                Expr::InterfaceType(alloc.alloc(InterfaceType {
                    methods: self.member_list(&span, methods),
                    text,
                }))
            }
            Rule::paren_type => Expr::ParenExpr(alloc.alloc(ParenExpr {
                x: self.ty(self.next(&mut pair.into_inner(), &span)?)?,
                text,
            })),
            rule => unreachable!("not a type: {:?}", rule),
        })
    }

    fn missing_pair(&self, span: &Span) -> ParseError {
        self.error(
            ParseErrorKind::Other {
                message: "missing expected pair in rule".into(),
            },
            span.clone(),
        )
    }

    // === Statements ===

    fn block(&self, pair: Pair<'a, Rule>) -> Result<&'a BlockStmt<'a>> {
        let span = Span::from(pair.as_span());
        let list = self.next(&mut pair.into_inner(), &span)?;
        Ok(self.arena.alloc(BlockStmt {
            list: self.statement_list(list)?,
            text: self.text(&span),
        }))
    }

    fn statement_list(&self, pair: Pair<'a, Rule>) -> Result<&'a [Stmt<'a>]> {
        let list = pair
            .into_inner()
            .map(|stmt| self.stmt(stmt))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.stmts(list))
    }

    fn stmt(&self, pair: Pair<'a, Rule>) -> Result<Stmt<'a>> {
        let _nested = self.nest(&pair)?;
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let alloc = self.arena;

        Ok(match pair.as_rule() {
            Rule::empty_stmt => Stmt::EmptyStmt(alloc.alloc(EmptyStmt {
                text: span.str_of(self.source),
            })),
            Rule::labeled_stmt => {
                let mut inner = pair.into_inner();
                let label = self.ident(&self.next(&mut inner, &span)?);
                let stmt = match inner.next() {
                    Some(stmt) => self.stmt(stmt)?,
                    // A label right before a closing brace labels nothing.
                    None => Stmt::EmptyStmt(alloc.alloc(EmptyStmt { text: "" })),
                };
                Stmt::LabeledStmt(alloc.alloc(LabeledStmt { label, stmt, text }))
            }
            Rule::simple_stmt | Rule::header_simple_stmt => self.simple_stmt(pair)?,
            Rule::const_decl | Rule::var_decl | Rule::type_decl => {
                Stmt::DeclStmt(alloc.alloc(DeclStmt {
                    decl: self.gen_decl(pair)?,
                    text,
                }))
            }
            Rule::go_stmt => {
                let call = self.call(pair, "go")?;
                Stmt::GoStmt(alloc.alloc(GoStmt { call, text }))
            }
            Rule::defer_stmt => {
                let call = self.call(pair, "defer")?;
                Stmt::DeferStmt(alloc.alloc(DeferStmt { call, text }))
            }
            Rule::return_stmt => {
                let results = match pair.into_inner().next() {
                    Some(list) => self.expr_list(list)?,
                    None => &[],
                };
                Stmt::ReturnStmt(alloc.alloc(ReturnStmt { results, text }))
            }
            Rule::break_stmt | Rule::continue_stmt | Rule::goto_stmt | Rule::fallthrough_stmt => {
                let kind = match pair.as_rule() {
                    Rule::break_stmt => BranchKind::Break,
                    Rule::continue_stmt => BranchKind::Continue,
                    Rule::goto_stmt => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = pair.into_inner().next().map(|ident| self.ident(&ident));
                Stmt::BranchStmt(alloc.alloc(BranchStmt { kind, label, text }))
            }
            Rule::block => Stmt::BlockStmt(self.block(pair)?),
            Rule::if_stmt => Stmt::IfStmt(self.if_stmt(pair)?),
            Rule::expr_switch_stmt => {
                let mut init = None;
                let mut tag = None;
                let mut body = None;
                for child in pair.into_inner() {
                    match child.as_rule() {
                        Rule::header_simple_stmt => init = Some(self.stmt(child)?),
                        Rule::header_expression => tag = Some(self.expr(child)?),
                        _ => body = Some(self.clause_body(child)?),
                    }
                }
                let body = body.ok_or_else(|| self.missing_pair(&span))?;
                Stmt::SwitchStmt(alloc.alloc(SwitchStmt {
                    init,
                    tag,
                    body,
                    text,
                }))
            }
            Rule::type_switch_stmt => {
                let mut init = None;
                let mut assign = None;
                let mut body = None;
                for child in pair.into_inner() {
                    match child.as_rule() {
                        Rule::header_simple_stmt => init = Some(self.stmt(child)?),
                        Rule::type_switch_guard => assign = Some(self.type_switch_guard(child)?),
                        _ => body = Some(self.clause_body(child)?),
                    }
                }
                Stmt::TypeSwitchStmt(alloc.alloc(TypeSwitchStmt {
                    init,
                    assign: assign.ok_or_else(|| self.missing_pair(&span))?,
                    body: body.ok_or_else(|| self.missing_pair(&span))?,
                    text,
                }))
            }
            Rule::select_stmt => {
                let body = self.clause_body(self.next(&mut pair.into_inner(), &span)?)?;
                Stmt::SelectStmt(alloc.alloc(SelectStmt { body, text }))
            }
            Rule::for_stmt => self.for_stmt(pair)?,
            rule => unreachable!("not a statement: {:?}", rule),
        })
    }

    fn simple_stmt(&self, pair: Pair<'a, Rule>) -> Result<Stmt<'a>> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let alloc = self.arena;
        let mut inner = pair.into_inner();
        let lhs = self.expr_list(self.next(&mut inner, &span)?)?;

        let single = |what: &str| match lhs {
            [x] => Ok(*x),
            _ => Err(self.error(
                ParseErrorKind::InvalidStatement {
                    message: format!("expected 1 expression in {what}, found {}", lhs.len()),
                },
                span.clone(),
            )),
        };

        let Some(op) = inner.next() else {
            let x = single("expression statement")?;
            return Ok(Stmt::ExprStmt(alloc.alloc(ExprStmt { x, text })));
        };

        Ok(match op.as_rule() {
            Rule::assign_op => {
                let op = AssignOp::from_token(op.as_str()).ok_or_else(|| self.missing_pair(&span))?;
                let rhs = self.expr_list(self.next(&mut inner, &span)?)?;
                Stmt::AssignStmt(alloc.alloc(AssignStmt { lhs, op, rhs, text }))
            }
            Rule::send_op => {
                let chan = single("send statement")?;
                let value = self.expr(self.next(&mut inner, &span)?)?;
                Stmt::SendStmt(alloc.alloc(SendStmt { chan, value, text }))
            }
            Rule::inc_dec_op => {
                let x = single("increment statement")?;
                let op = if op.as_str() == "++" {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                Stmt::IncDecStmt(alloc.alloc(IncDecStmt { x, op, text }))
            }
            rule => unreachable!("not a simple statement operator: {:?}", rule),
        })
    }

    /// The call of a `go` or `defer` statement.
    fn call(&self, pair: Pair<'a, Rule>, keyword: &str) -> Result<&'a CallExpr<'a>> {
        let span = Span::from(pair.as_span());
        match self.expr(self.next(&mut pair.into_inner(), &span)?)? {
            Expr::CallExpr(call) => Ok(call),
            _ => Err(self.error(
                ParseErrorKind::InvalidStatement {
                    message: format!("expression in {keyword} must be function call"),
                },
                span,
            )),
        }
    }

    fn if_stmt(&self, pair: Pair<'a, Rule>) -> Result<&'a IfStmt<'a>> {
        let span = Span::from(pair.as_span());
        let mut init = None;
        let mut cond = None;
        let mut body = None;
        let mut else_branch = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::header_simple_stmt => init = Some(self.stmt(child)?),
                Rule::header_expression => cond = Some(self.expr(child)?),
                Rule::block if body.is_none() => body = Some(self.block(child)?),
                Rule::block => else_branch = Some(Stmt::BlockStmt(self.block(child)?)),
                Rule::if_stmt => else_branch = Some(Stmt::IfStmt(self.if_stmt(child)?)),
                rule => unreachable!("unexpected rule in if statement: {:?}", rule),
            }
        }
        Ok(self.arena.alloc(IfStmt {
            init,
            cond: cond.ok_or_else(|| self.missing_pair(&span))?,
            body: body.ok_or_else(|| self.missing_pair(&span))?,
            else_branch,
            text: self.text(&span),
        }))
    }

    /// `x := y.(type)` or `y.(type)`.
    fn type_switch_guard(&self, pair: Pair<'a, Rule>) -> Result<Stmt<'a>> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let mut name = None;
        let mut assert = None;
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::ident => name = Some(self.ident(&child)),
                _ => {
                    let start = child.as_span().start();
                    let x = self.expr(child)?;
                    assert = Some(Expr::TypeAssertExpr(self.arena.alloc(TypeAssertExpr {
                        x,
                        ty: None,
                        text: self.text_of(start, span.end()),
                    })));
                }
            }
        }
        let assert = assert.ok_or_else(|| self.missing_pair(&span))?;
        Ok(match name {
            Some(name) => Stmt::AssignStmt(self.arena.alloc(AssignStmt {
                lhs: self.exprs(vec![Expr::Ident(name)]),
                op: AssignOp::Define,
                rhs: self.exprs(vec![assert]),
                text,
            })),
            None => Stmt::ExprStmt(self.arena.alloc(ExprStmt { x: assert, text })),
        })
    }

    /// Body of a switch or select: a block whose statements are clauses.
    fn clause_body(&self, pair: Pair<'a, Rule>) -> Result<&'a BlockStmt<'a>> {
        let text = self.pair_text(&pair);
        let clauses = pair
            .into_inner()
            .map(|clause| self.clause(clause))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.arena.alloc(BlockStmt {
            list: self.stmts(clauses),
            text,
        }))
    }

    fn clause(&self, pair: Pair<'a, Rule>) -> Result<Stmt<'a>> {
        let _nested = self.nest(&pair)?;
        let text = self.pair_text(&pair);
        let rule = pair.as_rule();
        let mut head = None;
        let mut body: &'a [Stmt<'a>] = &[];
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::statement_list => body = self.statement_list(child)?,
                _ => head = Some(child),
            }
        }

        Ok(match rule {
            Rule::case_clause => {
                let list = match head {
                    Some(list) => self.expr_list(list)?,
                    None => &[],
                };
                Stmt::CaseClause(self.arena.alloc(CaseClause { list, body, text }))
            }
            Rule::comm_clause => {
                let comm = match head {
                    Some(comm) => Some(self.stmt(comm)?),
                    None => None,
                };
                Stmt::CommClause(self.arena.alloc(CommClause { comm, body, text }))
            }
            rule => unreachable!("not a clause: {:?}", rule),
        })
    }

    fn for_stmt(&self, pair: Pair<'a, Rule>) -> Result<Stmt<'a>> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let alloc = self.arena;
        let mut inner = pair.into_inner();
        let first = self.next(&mut inner, &span)?;

        let (header, body) = match first.as_rule() {
            Rule::block => (None, self.block(first)?),
            _ => (Some(first), self.block(self.next(&mut inner, &span)?)?),
        };

        let Some(header) = header else {
            return Ok(Stmt::ForStmt(alloc.alloc(ForStmt {
                init: None,
                cond: None,
                post: None,
                body,
                text,
            })));
        };

        Ok(match header.as_rule() {
            Rule::header_expression => Stmt::ForStmt(alloc.alloc(ForStmt {
                init: None,
                cond: Some(self.expr(header)?),
                post: None,
                body,
                text,
            })),
            Rule::for_clause => {
                let mut init = None;
                let mut cond = None;
                let mut post = None;
                for part in header.into_inner() {
                    let span = Span::from(part.as_span());
                    let rule = part.as_rule();
                    let value = self.next(&mut part.into_inner(), &span)?;
                    match rule {
                        Rule::for_init => init = Some(self.stmt(value)?),
                        Rule::for_cond => cond = Some(self.expr(value)?),
                        _ => post = Some(self.stmt(value)?),
                    }
                }
                Stmt::ForStmt(alloc.alloc(ForStmt {
                    init,
                    cond,
                    post,
                    body,
                    text,
                }))
            }
            Rule::range_clause => {
                let mut key = None;
                let mut value = None;
                let mut tok = None;
                let mut x = None;
                for part in header.into_inner() {
                    match part.as_rule() {
                        Rule::header_expression_list => {
                            let list = self.expr_list(part)?;
                            key = list.first().copied();
                            value = list.get(1).copied();
                        }
                        Rule::range_assign => tok = AssignOp::from_token(part.as_str()),
                        Rule::range_kw => {}
                        _ => x = Some(self.expr(part)?),
                    }
                }
                Stmt::RangeStmt(alloc.alloc(RangeStmt {
                    key,
                    value,
                    tok,
                    x: x.ok_or_else(|| self.missing_pair(&span))?,
                    body,
                    text,
                }))
            }
            rule => unreachable!("unexpected rule in for statement: {:?}", rule),
        })
    }

    // === Expressions ===

    fn expr_list(&self, pair: Pair<'a, Rule>) -> Result<&'a [Expr<'a>]> {
        let list = pair
            .into_inner()
            .map(|expr| self.expr(expr))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.exprs(list))
    }

    /// Builds an `expression` or `header_expression` pair.
    ///
    /// Operators have no pairs of their own, so each built operand carries
    /// the number of operator levels above its deepest node.
    pub fn expr(&self, pair: Pair<'a, Rule>) -> Result<Expr<'a>> {
        let _nested = self.nest(&pair)?;
        let base = self.depth.get();
        let alloc = self.arena;

        // Prefix operators recurse inside the Pratt parser itself.
        let counts = OperatorCounts::of(pair.clone().into_inner());
        self.check_depth(base + counts.prefix_run, pair.as_span().into())?;
        // Operands sit below at most `counts.operators` operator nodes.
        let _operators = self.descend(counts.operators);

        let (expr, _, _) = PRATT_PARSER
            .map_primary(|primary| -> Result<(Expr<'a>, Span, usize)> {
                let (expr, span) = self.operand(primary)?;
                Ok((expr, span, 0))
            })
            .map_prefix(|op, rhs| {
                let (x, rhs_span, levels) = rhs?;
                let span = Span::new(op.as_span().start(), rhs_span.end());
                let levels = levels + 1;
                self.check_depth(base + levels, span.clone())?;
                let text = self.text(&span);
                let unary = |kind| Expr::UnaryExpr(alloc.alloc(UnaryExpr { op: kind, x, text }));
                let expr = match op.as_rule() {
                    Rule::u_deref => Expr::StarExpr(alloc.alloc(StarExpr { x, text })),
                    Rule::u_plus => unary(UnaryOp::Plus),
                    Rule::u_neg => unary(UnaryOp::Neg),
                    Rule::u_not => unary(UnaryOp::Not),
                    Rule::u_xor => unary(UnaryOp::Xor),
                    Rule::u_addr => unary(UnaryOp::Addr),
                    Rule::u_recv => unary(UnaryOp::Recv),
                    rule => unreachable!("Unknown prefix operator: {:?}", rule),
                };
                Ok((expr, span, levels))
            })
            .map_infix(|lhs, op, rhs| {
                let (x, lhs_span, lhs_levels) = lhs?;
                let (y, rhs_span, rhs_levels) = rhs?;
                let op = match op.as_rule() {
                    Rule::lor => BinaryOp::LogicalOr,
                    Rule::land => BinaryOp::LogicalAnd,
                    Rule::eql => BinaryOp::Eq,
                    Rule::neq => BinaryOp::NotEq,
                    Rule::lss => BinaryOp::Less,
                    Rule::leq => BinaryOp::LessEq,
                    Rule::gtr => BinaryOp::Greater,
                    Rule::geq => BinaryOp::GreaterEq,
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::or => BinaryOp::Or,
                    Rule::xor => BinaryOp::Xor,
                    Rule::mul => BinaryOp::Mul,
                    Rule::quo => BinaryOp::Quo,
                    Rule::rem => BinaryOp::Rem,
                    Rule::shl => BinaryOp::Shl,
                    Rule::shr => BinaryOp::Shr,
                    Rule::and => BinaryOp::And,
                    Rule::and_not => BinaryOp::AndNot,
                    rule => unreachable!("Unknown binary operator: {:?}", rule),
                };
                let span = Span::combine(&lhs_span, &rhs_span);
                let levels = lhs_levels.max(rhs_levels) + 1;
                self.check_depth(base + levels, span.clone())?;
                let text = self.text(&span);
                let expr = Expr::BinaryExpr(alloc.alloc(BinaryExpr { x, op, y, text }));
                Ok((expr, span, levels))
            })
            .map_postfix(|lhs, op| {
                let (x, lhs_span, levels) = lhs?;
                let levels = levels + 1;
                let span = Span::combine(&lhs_span, &Span::from(op.as_span()));
                self.check_depth(base + levels, span)?;
                let (expr, span) = self.postfix((x, lhs_span), op)?;
                Ok((expr, span, levels))
            })
            .parse(pair.into_inner())?;

        Ok(expr)
    }

    fn operand(&self, pair: Pair<'a, Rule>) -> Result<(Expr<'a>, Span)> {
        let span = Span::from(pair.as_span());
        let text = self.text(&span);
        let alloc = self.arena;

        let expr = match pair.as_rule() {
            Rule::int_lit
            | Rule::float_lit
            | Rule::imaginary_lit
            | Rule::rune_lit
            | Rule::interpreted_string
            | Rule::raw_string => Expr::BasicLit(self.basic_lit(&pair)),
            Rule::ident => Expr::Ident(self.ident(&pair)),
            Rule::func_lit => {
                let mut inner = pair.into_inner();
                let signature = self.next(&mut inner, &span)?;
                let ty_text = self.text_of(span.start(), signature.as_span().end());
                let ty = self.func_type(signature, ty_text)?;
                let body = self.block(self.next(&mut inner, &span)?)?;
                Expr::FuncLit(alloc.alloc(FuncLit { ty, body, text }))
            }
            Rule::typed_composite => {
                let mut inner = pair.into_inner();
                let ty = self.ty(self.next(&mut inner, &span)?)?;
                let elts = self.elements(self.next(&mut inner, &span)?)?;
                Expr::CompositeLit(alloc.alloc(CompositeLit {
                    ty: Some(ty),
                    elts,
                    text,
                }))
            }
            Rule::paren_expr => Expr::ParenExpr(alloc.alloc(ParenExpr {
                x: self.expr(self.next(&mut pair.into_inner(), &span)?)?,
                text,
            })),
            _ => self.ty(pair)?,
        };
        Ok((expr, span))
    }

    fn postfix(&self, lhs: (Expr<'a>, Span), op: Pair<'a, Rule>) -> Result<(Expr<'a>, Span)> {
        let (x, lhs_span) = lhs;
        let op_span = Span::from(op.as_span());
        let span = Span::combine(&lhs_span, &op_span);
        let text = self.text(&span);
        let alloc = self.arena;

        let expr = match op.as_rule() {
            Rule::selector_op => {
                let sel = self.ident(&self.next(&mut op.into_inner(), &op_span)?);
                Expr::SelectorExpr(alloc.alloc(SelectorExpr { x, sel, text }))
            }
            Rule::type_assert_op => {
                let ty = self.ty(self.next(&mut op.into_inner(), &op_span)?)?;
                Expr::TypeAssertExpr(alloc.alloc(TypeAssertExpr {
                    x,
                    ty: Some(ty),
                    text,
                }))
            }
            Rule::index_op => {
                let index = self.expr(self.next(&mut op.into_inner(), &op_span)?)?;
                Expr::IndexExpr(alloc.alloc(IndexExpr { x, index, text }))
            }
            Rule::slice_op => {
                let mut low = None;
                let mut high = None;
                let mut max = None;
                for bound in op.into_inner() {
                    let bound_span = Span::from(bound.as_span());
                    let rule = bound.as_rule();
                    let value = self.expr(self.next(&mut bound.into_inner(), &bound_span)?)?;
                    match rule {
                        Rule::slice_low => low = Some(value),
                        Rule::slice_high => high = Some(value),
                        _ => max = Some(value),
                    }
                }
                Expr::SliceExpr(alloc.alloc(SliceExpr {
                    x,
                    low,
                    high,
                    max,
                    slice3: max.is_some(),
                    text,
                }))
            }
            Rule::call_op => {
                let mut args = Vec::new();
                let mut has_ellipsis = false;
                for arg in op.into_inner() {
                    match arg.as_rule() {
                        Rule::call_ellipsis => has_ellipsis = true,
                        _ => args.push(self.expr(arg)?),
                    }
                }
                Expr::CallExpr(alloc.alloc(CallExpr {
                    fun: x,
                    args: self.exprs(args),
                    has_ellipsis,
                    text,
                }))
            }
            Rule::literal_value => Expr::CompositeLit(alloc.alloc(CompositeLit {
                ty: Some(x),
                elts: self.elements(op)?,
                text,
            })),
            rule => unreachable!("Unknown postfix operator: {:?}", rule),
        };
        Ok((expr, span))
    }

    /// Elements of a `literal_value` pair.
    fn elements(&self, pair: Pair<'a, Rule>) -> Result<&'a [Expr<'a>]> {
        let elts = pair
            .into_inner()
            .map(|keyed| {
                let span = Span::from(keyed.as_span());
                let mut inner = keyed.into_inner();
                let key = self.element(self.next(&mut inner, &span)?)?;
                Ok(match inner.next() {
                    Some(value) => Expr::KeyValueExpr(self.arena.alloc(KeyValueExpr {
                        key,
                        value: self.element(value)?,
                        text: self.text(&span),
                    })),
                    None => key,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.exprs(elts))
    }

    /// An element of a composite literal; a bare `{...}` has an elided type.
    fn element(&self, pair: Pair<'a, Rule>) -> Result<Expr<'a>> {
        if pair.as_rule() != Rule::literal_value {
            return self.expr(pair);
        }
        let _nested = self.nest(&pair)?;
        let text = self.pair_text(&pair);
        Ok(Expr::CompositeLit(self.arena.alloc(CompositeLit {
            ty: None,
            elts: self.elements(pair)?,
            text,
        })))
    }
}
