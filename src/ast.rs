use std::rc::Rc;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code. It is used in the AST both for literal expressions and for
/// literal patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// A string literal with its quotes stripped.
    Str(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// A parsed program: `init <name> { <statements> }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The name after `init`.
    pub name: String,
    /// Top-level statements, executed in the global scope.
    pub body: Vec<Statement>,
    /// Line number of the `init` keyword.
    pub line: usize,
}

/// A type annotation such as `int` or `Option<int>`.
///
/// Annotations are recorded but generic arguments are never specialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// The head name.
    pub name:      String,
    /// Generic arguments, possibly empty.
    pub arguments: Vec<Self>,
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            let args = self.arguments
                           .iter()
                           .map(ToString::to_string)
                           .collect::<Vec<_>>();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Each variant models a distinct syntactic construct and carries only the
/// fields relevant to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable or a declared function by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation (negation or `not`).
    Unary {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (addition, comparison, etc.).
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Call of a named function or of a variable holding a function value.
    Call {
        /// Name of the function or variable being called.
        callee:    String,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Call of a computed function value, e.g. `handlers[0](1)` or
    /// `make_adder(1)(2)`.
    Apply {
        /// Expression producing the function.
        callee:    Box<Self>,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Method call on a receiver (e.g. `p.norm()`).
    MethodCall {
        /// The receiver expression, bound to `self`.
        receiver:  Box<Self>,
        /// Method name.
        method:    String,
        /// Arguments, not counting the receiver.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Call through a path: a variant constructor `Shape::Circle(2)` or an
    /// associated function `Point::origin()`.
    PathCall {
        /// Enum or type name before `::`.
        owner:     String,
        /// Variant or function name after `::`.
        name:      String,
        /// Arguments.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A path without arguments, i.e. a field-less variant `Shape::Empty`.
    Path {
        /// Enum name.
        owner: String,
        /// Variant name.
        name:  String,
        /// Line number in the source code.
        line:  usize,
    },
    /// Field access (`p.x`, or `t.0` on tuples).
    FieldAccess {
        /// The accessed value.
        object: Box<Self>,
        /// Field name or tuple position.
        field:  String,
        /// Line number in the source code.
        line:   usize,
    },
    /// Indexing expression (e.g., `xs[2]`).
    Index {
        /// The container to index into.
        target: Box<Self>,
        /// The index to access.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Tuple literal `(a, b)`.
    Tuple {
        /// Elements of the tuple.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// List literal `[a, b]`.
    List {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Struct literal `Point { x: 1, y: 2 }`.
    StructLiteral {
        /// The struct type name.
        type_name: String,
        /// Field initializers in source order.
        fields:    Vec<(String, Self)>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Monadic `do { .. }` / `for { .. }` block.
    Do {
        /// The bind clauses and final expression.
        block: Rc<DoBlock>,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use rinse::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Unary { line, .. }
            | Self::Binary { line, .. }
            | Self::Call { line, .. }
            | Self::Apply { line, .. }
            | Self::MethodCall { line, .. }
            | Self::PathCall { line, .. }
            | Self::Path { line, .. }
            | Self::FieldAccess { line, .. }
            | Self::Index { line, .. }
            | Self::Tuple { line, .. }
            | Self::List { line, .. }
            | Self::StructLiteral { line, .. }
            | Self::Do { line, .. } => *line,
        }
    }
}

/// A monadic block: bind clauses followed by an optional final expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DoBlock {
    /// `name <- expr` clauses in source order.
    pub clauses: Vec<BindClause>,
    /// The `yield`/`return` expression, if any.
    pub result:  Option<Expr>,
}

/// A single `name <- expr` clause of a monadic block.
#[derive(Debug, Clone, PartialEq)]
pub struct BindClause {
    /// Name bound to the unwrapped value in the remaining clauses.
    pub name:  String,
    /// The monadic value.
    pub value: Expr,
    /// Line number in the source code.
    pub line:  usize,
}

/// A user-defined function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:     String,
    /// Declaring type for `fn Type.name(..)` declarations.
    pub owner:    Option<String>,
    /// Generic parameter names; recorded, never specialized.
    pub generics: Vec<String>,
    /// The parameter names, including a leading `self` for methods.
    pub params:   Vec<String>,
    /// The body executed when the function is called.
    pub body:     Vec<Statement>,
    /// Line number in the source code.
    pub line:     usize,
}

impl FunctionDef {
    /// Whether the first parameter is `self`.
    #[must_use]
    pub fn has_self(&self) -> bool {
        self.params.first().is_some_and(|p| p == "self")
    }

    /// Number of arguments a caller supplies, not counting `self`.
    ///
    /// ## Example
    /// ```
    /// use rinse::ast::FunctionDef;
    ///
    /// let def = FunctionDef { name:     "scale".into(),
    ///                         owner:    None,
    ///                         generics: vec![],
    ///                         params:   vec!["self".into(), "k".into()],
    ///                         body:     vec![],
    ///                         line:     1, };
    ///
    /// assert!(def.has_self());
    /// assert_eq!(def.arity(), 1);
    /// ```
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len() - usize::from(self.has_self())
    }
}

/// A struct field declaration with an optional default initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name:       String,
    /// Optional type annotation.
    pub annotation: Option<TypeName>,
    /// Initializer used when a literal omits the field.
    pub default:    Option<Expr>,
}

/// `struct Name<T> { field, field = default }`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    /// The struct's type name.
    pub name:     String,
    /// Generic parameter names.
    pub generics: Vec<String>,
    /// Fields in declaration order.
    pub fields:   Vec<FieldDef>,
    /// Line number in the source code.
    pub line:     usize,
}

/// One variant of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
    /// Variant name.
    pub name:   String,
    /// Positional field names.
    pub fields: Vec<String>,
}

/// `enum Name<T> { A, B(x, y) }`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    /// The enum's name.
    pub name:     String,
    /// Generic parameter names.
    pub generics: Vec<String>,
    /// Variants in declaration order.
    pub variants: Vec<VariantDef>,
    /// Line number in the source code.
    pub line:     usize,
}

/// `trait Name<T> extends Parent { fn required(self); fn provided(self) { .. } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitDef {
    /// The trait's name.
    pub name:     String,
    /// Generic parameter names.
    pub generics: Vec<String>,
    /// Optional parent trait.
    pub parent:   Option<String>,
    /// Method names declared without a body.
    pub required: Vec<String>,
    /// Methods declared with a default body.
    pub provided: Vec<Rc<FunctionDef>>,
    /// Line number in the source code.
    pub line:     usize,
}

/// `impl Type { .. }` or `impl<T> Trait<Args> for Type { .. }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplDef {
    /// Generic parameter names after `impl`.
    pub generics:   Vec<String>,
    /// The implemented trait, `None` for inherent impls.
    pub trait_name: Option<String>,
    /// Type arguments applied to the trait.
    pub trait_args: Vec<TypeName>,
    /// The implementing type.
    pub type_name:  String,
    /// Supplied method bodies.
    pub methods:    Vec<Rc<FunctionDef>>,
    /// Line number in the source code.
    pub line:       usize,
}

/// A `case <pattern> { .. }` arm of a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// The pattern tested against the subject.
    pub pattern: Pattern,
    /// The statements run when the pattern matches.
    pub body:    Vec<Statement>,
    /// Line number in the source code.
    pub line:    usize,
}

/// A pattern used by `switch` cases.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`, matches anything and binds nothing.
    Wildcard,
    /// A literal that must compare equal.
    Literal(LiteralValue),
    /// An inclusive integer range `a..b`.
    Range {
        /// Lower bound, inclusive.
        start: i64,
        /// Upper bound, inclusive.
        end:   i64,
    },
    /// A free identifier, matches anything and binds it.
    Binding(String),
    /// `(p1, p2, ..)`.
    Tuple(Vec<Self>),
    /// `Type(p1, ..)` for structs or `Enum::Variant(p1, ..)` for variants;
    /// sub-patterns are matched positionally.
    Destructure {
        /// Struct or enum name.
        owner:   String,
        /// Variant name for enum patterns.
        variant: Option<String>,
        /// Positional sub-patterns.
        fields:  Vec<Self>,
    },
}

/// How a destructuring `let` takes its value apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructureTarget {
    /// `let (a, b) = ..`, positional.
    Tuple(Vec<String>),
    /// `let Point { x, y } = ..`, by field name.
    Struct {
        /// Expected struct type.
        type_name: String,
        /// Field names, each bound to a variable of the same name.
        fields:    Vec<String>,
    },
    /// `let Shape::Rect(w, h) = ..`, positional.
    Variant {
        /// Expected enum.
        enum_name: String,
        /// Expected variant.
        variant:   String,
        /// Names bound to the variant's fields.
        bindings:  Vec<String>,
    },
}

/// One step of an assignment target path.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceSegment {
    /// `.field`
    Field(String),
    /// `[index]`
    Index(Expr),
}

/// The left-hand side of an assignment: a variable followed by field and
/// index steps, e.g. `grid[i][j]` or `self.pos.x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// The variable the path starts at.
    pub root: String,
    /// Steps applied left to right; the last one is written.
    pub path: Vec<PlaceSegment>,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name (: type)? = value`.
    Let {
        /// The name of the variable.
        name:       String,
        /// Optional type annotation.
        annotation: Option<TypeName>,
        /// The initial value of the variable.
        value:      Expr,
        /// Line number in the source code.
        line:       usize,
    },
    /// Destructuring `let`.
    Destructure {
        /// The shape being taken apart.
        target: DestructureTarget,
        /// The value being destructured.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// Plain, indexed or field assignment.
    Assign {
        /// What is written.
        target: Place,
        /// The value which is being assigned.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// `print(expr)`.
    Print {
        /// The printed expression.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `if cond { .. } else { .. }`.
    If {
        /// Must evaluate to a boolean.
        condition:   Expr,
        /// Statements run when the condition holds.
        then_branch: Vec<Statement>,
        /// Statements run otherwise; `else if` nests another `If` here.
        else_branch: Option<Vec<Statement>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `for var in start..end { .. }` or `for var in collection { .. }`.
    For {
        /// Loop variable, scoped to one iteration.
        var:      String,
        /// What is iterated.
        iterable: ForIterable,
        /// Loop body.
        body:     Vec<Statement>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `while cond { .. }`.
    While {
        /// Re-evaluated before every pass.
        condition: Expr,
        /// Loop body.
        body:      Vec<Statement>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A nested `{ .. }` block with its own scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Statement>,
        /// Line number in the source code.
        line:       usize,
    },
    /// A function or `fn Type.name` method declaration.
    Function(Rc<FunctionDef>),
    /// A struct declaration.
    Struct(Rc<StructDef>),
    /// An enum declaration.
    Enum(Rc<EnumDef>),
    /// A trait declaration.
    Trait(Rc<TraitDef>),
    /// An inherent or trait impl.
    Impl(Rc<ImplDef>),
    /// `return expr?`.
    Return {
        /// Returned value, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `break`.
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue`.
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// `switch subject { case p { .. } default { .. } }`.
    Switch {
        /// Evaluated exactly once.
        subject: Expr,
        /// Cases in declaration order.
        cases:   Vec<Case>,
        /// Statements run when no case matches.
        default: Option<Vec<Statement>>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `proof cond { .. }`.
    Proof {
        /// Must hold, or the run halts.
        condition: Expr,
        /// Statements run once the condition held.
        body:      Vec<Statement>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A standalone expression evaluated for its effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

/// What a `for` statement iterates over.
#[derive(Debug, Clone, PartialEq)]
pub enum ForIterable {
    /// Inclusive integer range `start..end`.
    Range {
        /// First value.
        start: Expr,
        /// Last value, inclusive.
        end:   Expr,
    },
    /// Elements of a list or tuple.
    Collection(Expr),
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and logic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `not x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "not"),
        }
    }
}
