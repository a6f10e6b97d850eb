//! Hand-built grammars and a toy lexer shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset")]

use furrow_ir::{SharedInterner, Span, Token, TokenKind};
use furrow_parse::{
    ParseError, ParseResult, ParseTables, ParserConfig, ParserSupport, Production, RuleId,
    TableBuilder, VecTokenSource,
};
use furrow_scope::{Resolution, VarAddress};

pub const ID: TokenKind = TokenKind::new(257);
pub const NUM: TokenKind = TokenKind::new(258);
pub const SEMI: TokenKind = TokenKind::from_char(b';');
pub const EQ: TokenKind = TokenKind::from_char(b'=');
pub const LBRACE: TokenKind = TokenKind::from_char(b'{');
pub const RBRACE: TokenKind = TokenKind::from_char(b'}');
pub const RPAREN: TokenKind = TokenKind::from_char(b')');

/// Values built by the test reducers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Node {
    #[default]
    Empty,
    Token(String),
    Num(String),
    Var(VarAddress),
    Call(String),
    Assign {
        name: String,
        addr: VarAddress,
        new: bool,
        value: Box<Node>,
    },
    ExprStmt(Box<Node>),
    Stmt(String),
    Block {
        vars: Vec<String>,
        body: Vec<Node>,
    },
    List(Vec<Node>),
    Error,
}

impl Node {
    fn text(&self) -> String {
        match self {
            Node::Token(text) | Node::Num(text) => text.clone(),
            other => format!("{other:?}"),
        }
    }

    fn into_list(self) -> Vec<Node> {
        match self {
            Node::List(items) => items,
            other => vec![other],
        }
    }
}

/// Split `src` into identifiers, numbers and single-character tokens.
pub fn lex(src: &str) -> VecTokenSource<Node> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let kind = if c.is_ascii_alphabetic() || c == b'_' || c == b'@' || c == b'$' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || b"_@$".contains(&bytes[i])) {
                i += 1;
            }
            ID
        } else if c.is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            NUM
        } else {
            i += 1;
            TokenKind::from_char(c)
        };
        let text = &src[start..i];
        let value = if kind == NUM {
            Node::Num(text.to_string())
        } else {
            Node::Token(text.to_string())
        };
        let span = Span::try_from_range(start..i).unwrap();
        tokens.push(Token::new(kind, value, span));
    }
    VecTokenSource::new(tokens)
}

/// One token per non-space character, kind = the character.
pub fn lex_chars(src: &str) -> VecTokenSource<Node> {
    src.char_indices()
        .filter(|(_, c)| !c.is_ascii_whitespace())
        .map(|(i, c)| {
            let span = Span::try_from_range(i..i + 1).unwrap();
            let kind = TokenKind::from_char(u8::try_from(c).unwrap());
            Token::new(kind, Node::Token(c.to_string()), span)
        })
        .collect()
}

pub fn support(config: ParserConfig) -> ParserSupport<Node> {
    ParserSupport::new(config, SharedInterner::new()).unwrap()
}

/// `S -> a b` over the characters `a` and `b`.
pub fn pair_tables() -> ParseTables {
    let a = TokenKind::from_char(b'a');
    let b = TokenKind::from_char(b'b');
    let mut t = TableBuilder::new();
    t.token(a, "'a'").token(b, "'b'");
    let s = t.rule(0, 2, "S : 'a' 'b'");
    t.shift(0, a, 2).shift(2, b, 3).default_reduce(3, s).goto(0, 0, 1);
    t.build().unwrap()
}

// Statement list with an error production:
//
//   list : /* empty */ | list stmt
//   stmt : ID ';' | error ';'
pub const LIST_EMPTY: RuleId = RuleId::new(1);
pub const LIST_MORE: RuleId = RuleId::new(2);
pub const STMT_ID: RuleId = RuleId::new(3);
pub const STMT_ERROR: RuleId = RuleId::new(4);

pub fn list_tables() -> ParseTables {
    const LIST: u32 = 0;
    const STMT: u32 = 1;
    let mut t = TableBuilder::new();
    t.token(ID, "tIDENTIFIER").token(SEMI, "';'").token(RPAREN, "')'");
    assert_eq!(t.rule(LIST, 0, "list :"), LIST_EMPTY);
    assert_eq!(t.rule(LIST, 2, "list : list stmt"), LIST_MORE);
    assert_eq!(t.rule(STMT, 2, "stmt : ID ';'"), STMT_ID);
    assert_eq!(t.rule(STMT, 2, "stmt : error ';'"), STMT_ERROR);

    t.default_reduce(0, LIST_EMPTY)
        .goto(0, LIST, 1)
        .shift(1, ID, 2)
        .shift(1, TokenKind::ERROR, 3)
        .goto(1, STMT, 4)
        .shift(2, SEMI, 5)
        .shift(3, SEMI, 6)
        .default_reduce(4, LIST_MORE)
        .default_reduce(5, STMT_ID)
        .default_reduce(6, STMT_ERROR);
    t.build().unwrap()
}

pub fn reduce_list(
    rule: RuleId,
    p: Production<'_, Node>,
    _support: &mut ParserSupport<Node>,
) -> Result<Node, ParseError> {
    Ok(match rule {
        LIST_EMPTY => Node::List(Vec::new()),
        LIST_MORE => {
            let [list, stmt] = p.into_array().unwrap();
            let mut items = list.into_list();
            items.push(stmt);
            Node::List(items)
        }
        STMT_ID => Node::Stmt(p.get(0).unwrap().text()),
        STMT_ERROR => Node::Error,
        _ => p.into_first_or_default(),
    })
}

// Assignment/block language:
//
//   program  : stmts
//   stmts    : /* empty */ | stmts stmt
//   stmt     : ID '=' expr ';' | expr ';' | block
//   block    : '{' blk_open stmts '}'
//   blk_open : /* empty */
//   expr     : ID | NUM
pub const PROGRAM: RuleId = RuleId::new(1);
pub const STMTS_EMPTY: RuleId = RuleId::new(2);
pub const STMTS_MORE: RuleId = RuleId::new(3);
pub const STMT_ASSIGN: RuleId = RuleId::new(4);
pub const STMT_EXPR: RuleId = RuleId::new(5);
pub const STMT_BLOCK: RuleId = RuleId::new(6);
pub const BLOCK: RuleId = RuleId::new(7);
pub const BLOCK_OPEN: RuleId = RuleId::new(8);
pub const EXPR_ID: RuleId = RuleId::new(9);
pub const EXPR_NUM: RuleId = RuleId::new(10);

pub fn block_tables() -> ParseTables {
    const PROGRAM_NT: u32 = 0;
    const STMTS: u32 = 1;
    const STMT: u32 = 2;
    const BLOCK_NT: u32 = 3;
    const BLK_OPEN: u32 = 4;
    const EXPR: u32 = 5;

    let mut t = TableBuilder::new();
    t.token(ID, "tIDENTIFIER")
        .token(NUM, "tINTEGER")
        .token(SEMI, "';'")
        .token(EQ, "'='")
        .token(LBRACE, "'{'")
        .token(RBRACE, "'}'");
    for (rule, lhs, len, text) in [
        (PROGRAM, PROGRAM_NT, 1, "program : stmts"),
        (STMTS_EMPTY, STMTS, 0, "stmts :"),
        (STMTS_MORE, STMTS, 2, "stmts : stmts stmt"),
        (STMT_ASSIGN, STMT, 4, "stmt : ID '=' expr ';'"),
        (STMT_EXPR, STMT, 2, "stmt : expr ';'"),
        (STMT_BLOCK, STMT, 1, "stmt : block"),
        (BLOCK, BLOCK_NT, 4, "block : '{' blk_open stmts '}'"),
        (BLOCK_OPEN, BLK_OPEN, 0, "blk_open :"),
        (EXPR_ID, EXPR, 1, "expr : ID"),
        (EXPR_NUM, EXPR, 1, "expr : NUM"),
    ] {
        assert_eq!(t.rule(lhs, len, text), rule);
    }

    t.default_reduce(0, STMTS_EMPTY)
        .goto(0, PROGRAM_NT, 1)
        .goto(0, STMTS, 2);

    // Statement starts, shared by the top level (2) and block bodies (14).
    for state in [2, 14] {
        t.shift(state, ID, 3)
            .shift(state, NUM, 4)
            .shift(state, LBRACE, 5)
            .goto(state, STMT, 6)
            .goto(state, EXPR, 7)
            .goto(state, BLOCK_NT, 8);
    }
    t.reduce(2, TokenKind::EOF, PROGRAM)
        .shift(14, RBRACE, 16)
        .shift(3, EQ, 9)
        .reduce(3, SEMI, EXPR_ID)
        .default_reduce(4, EXPR_NUM)
        .default_reduce(5, BLOCK_OPEN)
        .goto(5, BLK_OPEN, 10)
        .default_reduce(6, STMTS_MORE)
        .shift(7, SEMI, 11)
        .default_reduce(8, STMT_BLOCK)
        .shift(9, ID, 12)
        .shift(9, NUM, 4)
        .goto(9, EXPR, 13)
        .default_reduce(10, STMTS_EMPTY)
        .goto(10, STMTS, 14)
        .default_reduce(11, STMT_EXPR)
        .default_reduce(12, EXPR_ID)
        .shift(13, SEMI, 15)
        .default_reduce(15, STMT_ASSIGN)
        .default_reduce(16, BLOCK);
    t.build().unwrap()
}

pub fn reduce_block(
    rule: RuleId,
    p: Production<'_, Node>,
    support: &mut ParserSupport<Node>,
) -> Result<Node, ParseError> {
    Ok(match rule {
        PROGRAM => p.into_first_or_default(),
        STMTS_EMPTY => Node::List(Vec::new()),
        STMTS_MORE => {
            let [list, stmt] = p.into_array().unwrap();
            let mut items = list.into_list();
            items.push(stmt);
            Node::List(items)
        }
        STMT_ASSIGN => {
            let [id, _, value, _] = p.into_array().unwrap();
            let name = id.text();
            let (addr, new) = support.assignable(support.intern(&name))?;
            Node::Assign {
                name,
                addr,
                new,
                value: Box::new(value),
            }
        }
        STMT_EXPR => Node::ExprStmt(Box::new(p.into_first_or_default())),
        BLOCK_OPEN => {
            support.push_block_scope()?;
            Node::Empty
        }
        BLOCK => {
            let scope = support.pop_current_scope()?;
            let vars = support
                .scopes()
                .scope(scope)
                .variables()
                .iter()
                .map(|&name| support.name_str(name).to_string())
                .collect();
            let [_, _, body, _] = p.into_array().unwrap();
            Node::Block {
                vars,
                body: body.into_list(),
            }
        }
        EXPR_ID => {
            let name = p.get(0).unwrap().text();
            match support.declare_identifier(support.intern(&name)) {
                Resolution::Variable(addr) => Node::Var(addr),
                Resolution::ImplicitSelfCall => Node::Call(name),
            }
        }
        _ => p.into_first_or_default(),
    })
}

pub fn parse_block(src: &str, config: ParserConfig) -> Result<ParseResult<Node>, ParseError> {
    let tables = block_tables();
    furrow_parse::parse(
        &tables,
        config,
        SharedInterner::new(),
        &mut lex(src),
        &mut furrow_parse::reducer_fn(reduce_block),
    )
}
