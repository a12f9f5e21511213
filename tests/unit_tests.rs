//! Integration tests for the resolver.
//!
//! These exercise the symbol table, the dispatcher and the reducer together
//! through the public crate surface.

use quill::quill_compiler::{infer_substitution, pack_variadic};
use quill::{
    AmbiguityPolicy, CallNode, CompilationError, Context, ContextError, DispatchKind,
    DispatchOptions, Expr, GenericConstraints, Literal, MethodEntry, Node, Param, ReducerOptions,
    Signature, Span, SymbolDefinition, SymbolError, SymbolKey, SymbolTable, TypeEntry, TypeHash,
    TypeRegistry, TypeSystem, dispatch_method, primitives,
};

fn at(line: u32, col: u32) -> Span {
    Span::new(line, col, 1)
}

fn fns() -> TypeHash {
    TypeHash::from_name("Fns")
}

fn function(name: &str, params: Vec<Param>, ret: TypeHash) -> MethodEntry {
    MethodEntry::static_fn(fns(), name, params, ret)
}

fn unary(name: &str, param: TypeHash, ret: TypeHash) -> MethodEntry {
    function(name, vec![Param::new("x", param)], ret)
}

fn dispatch(
    types: &TypeRegistry,
    members: &[MethodEntry],
    args: Vec<Expr>,
) -> Result<Option<Expr>, CompilationError> {
    dispatch_method(
        types,
        None,
        members,
        &[],
        args,
        Span::default(),
        &DispatchOptions::default(),
    )
}

fn int(value: i64) -> Node {
    Node::literal(Literal::Int(value), Span::default())
}

fn speak(owner: TypeHash) -> SymbolKey {
    SymbolKey::member_of(DispatchKind::METHOD, owner, "speak")
}

// =============================================================================
// Symbol Table
// =============================================================================

#[test]
fn test_child_shadows_parent() {
    let key = SymbolKey::global(DispatchKind::MEMBER, "x");
    let root = SymbolTable::root();
    root.add(key.clone(), 1).unwrap();
    let child = SymbolTable::child(&root);
    child.add(key.clone(), 2).unwrap();

    assert_eq!(child.resolve(&key), Ok(2));
    assert_eq!(root.resolve(&key), Ok(1));

    assert_eq!(child.remove(&key), Ok(true));
    assert_eq!(child.resolve(&key), Ok(1));
}

#[test]
fn test_frozen_root_rejects_mutation() {
    let key = SymbolKey::global(DispatchKind::METHOD, "f");
    let late = SymbolKey::global(DispatchKind::METHOD, "g");
    let root = SymbolTable::root();
    root.add(key.clone(), "f").unwrap();
    root.freeze();

    assert_eq!(root.add(late.clone(), "g"), Err(SymbolError::ReadOnly));
    assert_eq!(root.remove(&key), Err(SymbolError::ReadOnly));
    assert_eq!(root.clear(), Err(SymbolError::ReadOnly));

    // children of a frozen table stay writable
    let child = SymbolTable::child(&root);
    child.add(late, "g").unwrap();
}

#[test]
fn test_child_with_inherited_entries_stays_empty() {
    let key = SymbolKey::global(DispatchKind::MEMBER, "pi");
    let root = SymbolTable::root();
    root.add(key.clone(), "3.14159").unwrap();

    let child = SymbolTable::child_with_entries(&root, [(key.clone(), "3.14159")]).unwrap();
    assert_eq!(child.count(), 0);
    assert_eq!(child.resolve(&key), root.resolve(&key));

    let changed = SymbolTable::child_with_entries(&root, [(key.clone(), "3")]).unwrap();
    assert_eq!(changed.count(), 1);
    assert_eq!(changed.resolve(&key), Ok("3"));
}

#[test]
fn test_missing_key_reports_not_found() {
    let root: std::rc::Rc<SymbolTable<i32>> = SymbolTable::root();
    let key = SymbolKey::global(DispatchKind::METHOD, "nowhere");
    assert_eq!(root.try_resolve(&key), None);
    assert_eq!(root.resolve(&key), Err(SymbolError::KeyNotFound { key }));
}

#[test]
fn test_most_specific_receiver_wins() {
    let mut types = TypeRegistry::with_builtins();
    let animal = types.register(TypeEntry::class("Animal")).unwrap();
    let dog = TypeEntry::class("Dog").with_base(animal);
    let dog = types.register(dog).unwrap();

    let global = SymbolKey::global(DispatchKind::METHOD, "speak");
    let root = SymbolTable::root();
    root.add(global.clone(), "global").unwrap();
    root.add(speak(primitives::OBJECT), "object").unwrap();
    root.add(speak(animal), "animal").unwrap();

    let (matched, value) = root.resolve_match(&speak(dog), &types).unwrap();
    assert_eq!(value, "animal");
    assert_eq!(matched.left_type(), Some(animal));

    let on_string = speak(primitives::STRING);
    let found = root.resolve_match(&on_string, &types).map(|(_, v)| v);
    assert_eq!(found, Some("object"));

    let found = root.resolve_match(&global, &types).map(|(_, v)| v);
    assert_eq!(found, Some("global"));
}

#[test]
fn test_nearest_contract_wins_over_unrelated_contract() {
    let mut types = TypeRegistry::with_builtins();
    let shape = types.register(TypeEntry::interface("IShape")).unwrap();
    let named = types.register(TypeEntry::interface("INamed")).unwrap();
    let drawable = TypeEntry::interface("IDrawable").with_interface(shape);
    let drawable = types.register(drawable).unwrap();
    let widget = types.register(TypeEntry::class("Widget")).unwrap();
    let button = TypeEntry::class("Button")
        .with_base(widget)
        .with_interface(drawable)
        .with_interface(named);
    let button = types.register(button).unwrap();

    let draw = |owner| SymbolKey::member_of(DispatchKind::METHOD, owner, "draw");
    let root = SymbolTable::root();
    // INamed goes in first, so insertion order alone would pick it
    root.add(draw(named), "named").unwrap();
    root.add(draw(shape), "shape").unwrap();
    let found = root.resolve_match(&draw(button), &types).map(|(_, v)| v);
    assert_eq!(found, Some("shape"));

    root.add(draw(widget), "widget").unwrap();
    let found = root.resolve_match(&draw(button), &types).map(|(_, v)| v);
    assert_eq!(found, Some("widget"));
}

#[test]
fn test_inner_scope_match_beats_outer_specificity() {
    let mut types = TypeRegistry::with_builtins();
    let animal = types.register(TypeEntry::class("Animal")).unwrap();
    let dog = TypeEntry::class("Dog").with_base(animal);
    let dog = types.register(dog).unwrap();

    let root = SymbolTable::root();
    root.add(speak(dog), "outer").unwrap();
    let child = SymbolTable::child(&root);
    child.add(speak(primitives::OBJECT), "inner").unwrap();

    let found = child.resolve_match(&speak(dog), &types).map(|(_, v)| v);
    assert_eq!(found, Some("inner"));
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_exact_arity_beats_variadic() {
    let types = TypeRegistry::with_builtins();
    let ints = types.array_of(primitives::INT).unwrap();
    let rest = vec![Param::new("xs", ints)];
    let variadic = function("f", rest, primitives::INT).as_variadic();
    let single = unary("f", primitives::INT, primitives::INT);

    let members = [variadic, single.clone()];
    let args = vec![Expr::int(1)];
    let expr = dispatch(&types, &members, args).unwrap().unwrap();
    match expr {
        Expr::Call { method, args, .. } => {
            assert_eq!(method.func_hash, single.func_hash);
            assert_eq!(args, vec![Expr::int(1)]);
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_exact_arity_wins_among_unary_binary_and_variadic() {
    let types = TypeRegistry::with_builtins();
    let ints = types.array_of(primitives::INT).unwrap();
    let one = unary("f", primitives::INT, primitives::INT);
    let pair = vec![
        Param::new("a", primitives::INT),
        Param::new("b", primitives::INT),
    ];
    let two = function("f", pair, primitives::INT);
    let rest = vec![Param::new("xs", ints)];
    let rest = function("f", rest, primitives::INT).as_variadic();

    let forward = [one.clone(), two.clone(), rest.clone()];
    let reversed = [rest, two.clone(), one];
    for members in [forward, reversed] {
        let args = vec![Expr::int(1), Expr::int(2)];
        let expr = dispatch(&types, &members, args).unwrap().unwrap();
        let Expr::Call { method, .. } = &expr else {
            panic!("expected call, got {expr:?}");
        };
        assert_eq!(method.func_hash, two.func_hash);
    }
}

#[test]
fn test_generic_identity_infers_argument_type() {
    let mut types = TypeRegistry::with_builtins();
    let t = types
        .register_generic_param("id", "T", 0, GenericConstraints::empty(), vec![])
        .unwrap();
    let id = unary("id", t, t).with_generic_params(vec![t]);

    let args = vec![Expr::string("hello")];
    let map = infer_substitution(&types, &id, &args).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&t), Some(&primitives::STRING));

    let expr = dispatch(&types, &[id], args).unwrap().unwrap();
    assert_eq!(expr.ty(), primitives::STRING);
    match expr {
        Expr::Call { method, .. } => assert_eq!(method.generic_args, vec![primitives::STRING]),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_variadic_tail_is_packed() {
    let types = TypeRegistry::with_builtins();
    let ints = types.array_of(primitives::INT).unwrap();
    let params = vec![Param::new("a", primitives::INT), Param::new("rest", ints)];
    let f = function("f", params, primitives::VOID).as_variadic();
    let args = || vec![Expr::int(1), Expr::int(2), Expr::int(3)];

    let packed = vec![
        Expr::int(1),
        Expr::NewArray {
            element: primitives::INT,
            items: vec![Expr::int(2), Expr::int(3)],
            ty: ints,
        },
    ];
    assert_eq!(pack_variadic(&types, &f, args()).unwrap(), packed);

    let expr = dispatch(&types, &[f], args()).unwrap().unwrap();
    match expr {
        Expr::Call { args, .. } => assert_eq!(args, packed),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_empty_variadic_tail_packs_empty_array() {
    let types = TypeRegistry::with_builtins();
    let strs = types.array_of(primitives::STRING).unwrap();
    let parts = vec![Param::new("parts", strs)];
    let join = function("join", parts, primitives::STRING).as_variadic();

    let empty = Expr::NewArray {
        element: primitives::STRING,
        items: vec![],
        ty: strs,
    };
    match dispatch(&types, &[join], vec![]).unwrap() {
        Some(Expr::Call { args, .. }) => assert_eq!(args, vec![empty]),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_no_applicable_overload_is_none() {
    let types = TypeRegistry::with_builtins();
    let f = unary("f", primitives::INT, primitives::VOID);
    let wrong_type = dispatch(&types, &[f.clone()], vec![Expr::string("no")]);
    assert_eq!(wrong_type, Ok(None));
    let too_many = dispatch(&types, &[f], vec![Expr::int(1), Expr::int(2)]);
    assert_eq!(too_many, Ok(None));
    assert_eq!(dispatch(&types, &[], vec![]), Ok(None));
}

// =============================================================================
// Reduction
// =============================================================================

fn sample_context() -> Context {
    let mut ctx = Context::new();

    let point = TypeHash::from_name("Point");
    let xy = vec![
        Param::new("x", primitives::INT),
        Param::new("y", primitives::INT),
    ];
    let new_point = MethodEntry::constructor(point, "Point", xy);
    ctx.register_type(TypeEntry::value("Point").with_constructor(new_point))
        .unwrap();

    let math = TypeHash::from_name("Math");
    let operand = vec![Param::new("x", primitives::INT)];
    let abs = MethodEntry::static_fn(math, "abs", operand, primitives::INT);
    ctx.register_type(TypeEntry::class("Math").with_method(abs))
        .unwrap();

    let signature = Signature::new(vec![primitives::INT], primitives::BOOL);
    let delegate = TypeEntry::delegate("IntPredicate", signature);
    let predicate = ctx.register_type(delegate).unwrap();
    let any = unary("any", predicate, primitives::BOOL);
    ctx.register_function("any", vec![any]).unwrap();

    let shout = unary("shout", primitives::STRING, primitives::STRING);
    ctx.register_extension(shout).unwrap();

    let x = SymbolKey::global(DispatchKind::MEMBER, "x");
    let ten = SymbolDefinition::constant(Expr::int(10));
    ctx.register(x, ten).unwrap();

    ctx.seal().unwrap();
    ctx
}

#[test]
fn test_constructor_call_reduces_to_new() {
    let ctx = sample_context();
    let call = CallNode::constructor("Point", vec![int(1), int(2)], at(1, 1));
    let expr = ctx.compile(&Node::Call(call)).unwrap();
    assert!(matches!(expr, Expr::New { ty, .. } if ty == TypeHash::from_name("Point")));
}

#[test]
fn test_static_method_through_type_reference() {
    let ctx = sample_context();
    let call = CallNode::method("abs", vec![int(-3)], at(1, 5))
        .with_receiver(Node::symbol("Math", at(1, 1)));
    let expr = ctx.compile(&Node::Call(call)).unwrap();
    assert!(matches!(&expr, Expr::Call { receiver: None, .. }));
    assert!(matches!(expr, Expr::Call { method, .. } if method.name == "abs"));
}

#[test]
fn test_extension_method_on_literal() {
    let ctx = sample_context();
    let receiver = Node::literal(Literal::Str("hi".into()), at(1, 1));
    let call = CallNode::method("shout", vec![], at(1, 6)).with_receiver(receiver);
    let expr = ctx.compile(&Node::Call(call)).unwrap();
    assert_eq!(expr.ty(), primitives::STRING);
    match expr {
        Expr::Call { args, .. } => assert_eq!(args, vec![Expr::string("hi")]),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_lambda_argument_binds_to_delegate() {
    let ctx = sample_context();
    let n = vec![Param::new("n", primitives::INT)];
    let body = Node::literal(Literal::Bool(true), at(1, 12));
    let lambda = Node::lambda(n, body, at(1, 5));
    let call = CallNode::method("any", vec![lambda], at(1, 1));
    let expr = ctx.compile(&Node::Call(call)).unwrap();
    match expr {
        Expr::Call { args, .. } => {
            assert_eq!(args[0].ty(), TypeHash::from_name("IntPredicate"));
        }
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_lambda_parameter_shadows_global() {
    let ctx = sample_context();
    let global = ctx.compile(&Node::symbol("x", at(1, 1))).unwrap();
    assert_eq!(global, Expr::int(10));

    let x = vec![Param::new("x", primitives::STRING)];
    let lambda = Node::lambda(x, Node::symbol("x", at(1, 9)), at(1, 1));
    match ctx.compile(&lambda).unwrap() {
        Expr::Lambda { body, .. } => assert_eq!(*body, Expr::parameter("x", primitives::STRING)),
        other => panic!("expected lambda, got {other:?}"),
    }
}

#[test]
fn test_live_members_of_array_receiver() {
    let ctx = sample_context();
    let ints = ctx.types().array_of(primitives::INT).unwrap();
    let mut reducer = ctx.reducer().unwrap();
    reducer.push_scope(at(1, 1)).unwrap();
    let key = SymbolKey::global(DispatchKind::MEMBER, "xs");
    let xs_param = SymbolDefinition::parameter("xs", ints);
    reducer.define(key, xs_param).unwrap();
    let xs = || Node::symbol("xs", at(2, 1));

    let length = CallNode::member("Length", at(2, 4)).with_receiver(xs());
    let length = reducer.reduce_call(&length).unwrap();
    assert_eq!(length.ty(), primitives::INT);

    let indexer = CallNode::new(DispatchKind::MEMBER, "", vec![int(0)], at(3, 3));
    let item = reducer.reduce_call(&indexer.with_receiver(xs())).unwrap();
    assert!(matches!(&item, Expr::Member { member, .. } if member.name() == "Item"));
    assert_eq!(item.ty(), primitives::INT);

    let push = CallNode::method("push", vec![int(4)], at(4, 4)).with_receiver(xs());
    let push = reducer.reduce_call(&push).unwrap();
    assert_eq!(push.ty(), primitives::VOID);

    let no = Node::literal(Literal::Str("no".into()), at(5, 9));
    let bad_push = CallNode::method("push", vec![no], at(5, 4)).with_receiver(xs());
    assert!(matches!(
        reducer.reduce_call(&bad_push),
        Err(CompilationError::NoMatchingOverload { span, .. }) if span == at(5, 4)
    ));

    let unknown = CallNode::method("frob", vec![], at(6, 4)).with_receiver(xs());
    assert!(matches!(
        reducer.reduce_call(&unknown),
        Err(CompilationError::UndefinedSymbol { name, .. }) if name == "frob"
    ));

    reducer.pop_scope().unwrap();
    assert!(reducer.reduce(&xs()).is_err());
}

#[test]
fn test_reject_policy_surfaces_ambiguity() {
    let policy = DispatchOptions::new().with_ambiguity(AmbiguityPolicy::Reject);
    let options = ReducerOptions::new().with_dispatch(policy);
    let mut ctx = Context::new().with_options(options);
    let by_int = unary("show", primitives::INT, primitives::VOID);
    let by_object = unary("show", primitives::OBJECT, primitives::VOID);
    let overloads = vec![by_int, by_object];
    ctx.register_function("show", overloads).unwrap();
    ctx.seal().unwrap();

    let call = CallNode::method("show", vec![int(1)], at(7, 2));
    let Err(ContextError::Compilation(err)) = ctx.compile(&Node::Call(call)) else {
        panic!("expected a compilation error");
    };
    assert_eq!(err.span(), at(7, 2));
    assert!(matches!(err, CompilationError::AmbiguousOverload { .. }));
}

#[test]
fn test_scope_depth_is_bounded() {
    let options = ReducerOptions::new().with_max_scope_depth(1);
    let mut ctx = Context::new().with_options(options);
    ctx.seal().unwrap();

    let inner = Node::lambda(vec![], int(1), at(1, 9));
    let outer = Node::lambda(vec![], inner, at(1, 1));
    let err = ctx.compile(&outer).unwrap_err();
    assert!(matches!(
        err,
        ContextError::Compilation(CompilationError::ScopeTooDeep { limit: 1, .. })
    ));
}
