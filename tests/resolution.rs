//! Resolution behaviour against a hand-built object graph.

use std::sync::{Arc, Mutex};
use std::thread;

use object_dispatch::routing::{split_path, DispatchError, Dispatcher, LookupError, NodeRef, Redirect};
use object_dispatch::security::AllowAll;

mod common;

use common::{leaf, segments, Controller, RecordingPolicy, H};

fn resolve(root: &NodeRef<H>, path: &str) -> Result<(H, Vec<String>), DispatchError<H>> {
    Dispatcher::new(AllowAll)
        .resolve_path(root, path)
        .map(|r| (r.handler, r.remainder))
}

fn shop() -> NodeRef<H> {
    let item = Controller::new("item").index("item.index").build();
    let shop = Controller::new("shop")
        .child("item", item)
        .child("view", leaf("shop.view"))
        .build();
    Controller::new("root").child("shop", shop).build()
}

#[test]
fn test_descends_to_leaf_with_remainder() {
    let root = shop();
    assert_eq!(resolve(&root, "/shop/view").unwrap(), ("shop.view", vec![]));
    assert_eq!(
        resolve(&root, "/shop/view/extra/1").unwrap(),
        ("shop.view", segments(&["extra", "1"]))
    );
}

#[test]
fn test_index_requires_trailing_separator() {
    let root = shop();
    assert_eq!(resolve(&root, "/shop/item/").unwrap(), ("item.index", vec![]));

    match resolve(&root, "/shop/item") {
        Err(DispatchError::NonCanonicalPath { handler, remainder }) => {
            assert_eq!(handler, "item.index");
            assert!(remainder.is_empty());
        }
        other => panic!("expected non-canonical, got {other:?}"),
    }
}

#[test]
fn test_index_drops_only_leading_empty_segment() {
    let root = shop();
    assert_eq!(
        resolve(&root, "/shop/item//x").unwrap(),
        ("item.index", segments(&["x"]))
    );
}

#[test]
fn test_non_canonical_is_not_retried_via_fallbacks() {
    let item = Controller::new("item").index("item.index").build();
    let root = Controller::new("root")
        .default_handler("catch")
        .child("item", item)
        .build();
    assert!(matches!(
        resolve(&root, "/item"),
        Err(DispatchError::NonCanonicalPath { handler: "item.index", .. })
    ));
}

#[test]
fn test_root_default_catches_unknown_path() {
    let root = Controller::new("root").default_handler("catch").build();
    assert_eq!(
        resolve(&root, "/unknown/x").unwrap(),
        ("catch", segments(&["unknown", "x"]))
    );
}

#[test]
fn test_nearest_default_wins() {
    let shop = Controller::new("shop").default_handler("shop.catch").build();
    let root = Controller::new("root")
        .default_handler("root.catch")
        .child("shop", shop)
        .build();
    assert_eq!(
        resolve(&root, "/shop/missing/deeper").unwrap(),
        ("shop.catch", segments(&["missing", "deeper"]))
    );
    assert_eq!(resolve(&root, "/other").unwrap(), ("root.catch", segments(&["other"])));
}

#[test]
fn test_lookup_tried_before_default_on_same_node() {
    let target = leaf("found");
    let root = Controller::new("root")
        .default_handler("catch")
        .lookup(move |args| Ok(Some(Redirect::new(target.clone(), args[1..].to_vec()))))
        .build();
    assert_eq!(resolve(&root, "/a/b").unwrap(), ("found", segments(&["b"])));
}

#[test]
fn test_deeper_default_beats_shallower_lookup() {
    let target = leaf("looked-up");
    let shop = Controller::new("shop").default_handler("shop.catch").build();
    let root = Controller::new("root")
        .lookup(move |args| Ok(Some(Redirect::new(target.clone(), args.to_vec()))))
        .child("shop", shop)
        .build();
    assert_eq!(resolve(&root, "/shop/missing").unwrap(), ("shop.catch", segments(&["missing"])));
}

#[test]
fn test_lookup_arity_error_falls_through() {
    let shop = Controller::new("shop")
        .lookup(|args| {
            LookupError::check_arity(2, Some(2), args.len())?;
            panic!("arity check should have declined");
        })
        .build();
    let root = Controller::new("root")
        .default_handler("catch")
        .child("shop", shop)
        .build();
    assert_eq!(
        resolve(&root, "/shop/only-one").unwrap(),
        ("catch", segments(&["shop", "only-one"]))
    );
}

#[test]
fn test_lookup_falsy_result_falls_through() {
    let shop = Controller::new("shop").lookup(|_| Ok(None)).build();
    let root = Controller::new("root")
        .default_handler("catch")
        .child("shop", shop)
        .build();
    assert_eq!(resolve(&root, "/shop/x").unwrap().0, "catch");
}

#[test]
fn test_lookup_failure_aborts_resolution() {
    let shop = Controller::new("shop")
        .lookup(|_| Err(LookupError::Failed("database unavailable".into())))
        .build();
    let root = Controller::new("root")
        .default_handler("catch")
        .child("shop", shop)
        .build();
    match resolve(&root, "/shop/x") {
        Err(DispatchError::Lookup(e)) => assert_eq!(e.to_string(), "database unavailable"),
        other => panic!("expected lookup failure, got {other:?}"),
    }
}

#[test]
fn test_resumed_traversal_grows_same_stack() {
    let product = Controller::new("product")
        .default_handler("product.catch")
        .child("reviews", leaf("product.reviews"))
        .build();
    let root = Controller::new("root")
        .default_handler("root.catch")
        .lookup(move |args| Ok(Some(Redirect::new(product.clone(), args[1..].to_vec()))))
        .build();

    assert_eq!(resolve(&root, "/42/reviews").unwrap(), ("product.reviews", vec![]));
    // The product default was pushed during the resumed walk and sits above
    // the root default.
    assert_eq!(
        resolve(&root, "/42/nope").unwrap(),
        ("product.catch", segments(&["nope"]))
    );
}

#[test]
fn test_router_overrides_descent() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();
    let x = Controller::new("x").child("b", leaf("x.b")).build();
    let a = Controller::new("a")
        .child("a", leaf("a.a"))
        .router(move |remainder| {
            recorded.lock().unwrap().push(remainder.to_vec());
            Ok(Some(Redirect::new(x.clone(), remainder[1..].to_vec())))
        })
        .build();
    let root = Controller::new("root").child("a", a).build();

    assert_eq!(resolve(&root, "/a/a/b").unwrap(), ("x.b", vec![]));
    assert_eq!(*seen.lock().unwrap(), vec![segments(&["a", "b"])]);
}

#[test]
fn test_router_without_target_is_not_found() {
    let root = Controller::new("root").router(|_| Ok(None)).build();
    assert!(matches!(resolve(&root, "/anything"), Err(DispatchError::NotFound)));
}

#[test]
fn test_router_failure_propagates() {
    let root = Controller::new("root")
        .default_handler("catch")
        .router(|_| Err("router exploded".into()))
        .build();
    assert!(matches!(resolve(&root, "/x"), Err(DispatchError::Router(_))));
}

#[test]
fn test_exhausted_stack_is_not_found() {
    let root = shop();
    assert!(matches!(resolve(&root, "/nowhere"), Err(DispatchError::NotFound)));
    assert!(matches!(resolve(&root, "/"), Err(DispatchError::NotFound)));
}

#[test]
fn test_boundary_crossings_in_order() {
    let dispatcher = Dispatcher::new(RecordingPolicy::default());
    let root = shop();
    dispatcher.resolve(&root, &split_path("/shop/item/")).unwrap();

    let crossings = dispatcher.policy().crossings();
    let expected = [("<start>", "root"), ("root", "shop"), ("shop", "item")];
    assert_eq!(crossings.len(), expected.len());
    for ((from, to), (want_from, want_to)) in crossings.iter().zip(expected) {
        assert_eq!((from.as_str(), to.as_str()), (want_from, want_to));
    }
}

#[test]
fn test_lookup_jump_fires_boundary_hook() {
    let product = Controller::new("product").index("product.index").build();
    let root = Controller::new("root")
        .lookup(move |args| Ok(Some(Redirect::new(product.clone(), args[1..].to_vec()))))
        .build();

    let dispatcher = Dispatcher::new(RecordingPolicy::default());
    let resolved = dispatcher.resolve_path(&root, "/42/").unwrap();
    assert_eq!(resolved.handler, "product.index");

    let crossings = dispatcher.policy().crossings();
    assert_eq!(
        crossings,
        vec![
            ("<start>".to_string(), "root".to_string()),
            ("root.lookup".to_string(), "product".to_string()),
            ("<start>".to_string(), "product".to_string()),
        ]
    );
}

#[test]
fn test_router_jump_fires_boundary_hook() {
    let x = Controller::new("x").child("b", leaf("x.b")).build();
    let a = Controller::new("a")
        .router(move |remainder| Ok(Some(Redirect::new(x.clone(), remainder[1..].to_vec()))))
        .build();
    let root = Controller::new("root").child("a", a).build();

    let dispatcher = Dispatcher::new(RecordingPolicy::default());
    let resolved = dispatcher.resolve_path(&root, "/a/v1/b").unwrap();
    assert_eq!(resolved.handler, "x.b");

    // The routed node starts a fresh run, so it is also entered from <start>.
    let crossings = dispatcher.policy().crossings();
    assert_eq!(
        crossings,
        vec![
            ("<start>".to_string(), "root".to_string()),
            ("root".to_string(), "a".to_string()),
            ("a.route".to_string(), "x".to_string()),
            ("<start>".to_string(), "x".to_string()),
        ]
    );
}

#[test]
fn test_security_checks_only_final_handler() {
    let shop = Controller::new("shop").default_handler("shop.catch").build();
    let root = Controller::new("root")
        .default_handler("root.catch")
        .child("shop", shop)
        .build();

    let dispatcher = Dispatcher::new(RecordingPolicy::default());
    dispatcher.resolve_path(&root, "/shop/missing").unwrap();
    assert_eq!(dispatcher.policy().checks(), vec!["shop.catch"]);
}

#[test]
fn test_security_failure_is_not_backtracked() {
    let shop = Controller::new("shop").child("secret", leaf("shop.secret")).build();
    let root = Controller::new("root")
        .default_handler("catch")
        .child("shop", shop)
        .build();

    let dispatcher = Dispatcher::new(RecordingPolicy::denying("shop.secret"));
    match dispatcher.resolve_path(&root, "/shop/secret") {
        Err(DispatchError::Forbidden(e)) => assert_eq!(e.target, "shop.secret"),
        other => panic!("expected forbidden, got {other:?}"),
    }
    assert_eq!(dispatcher.policy().checks(), vec!["shop.secret"]);
}

#[test]
fn test_concurrent_resolutions_are_independent() {
    let shop = Controller::new("shop").default_handler("shop.catch").build();
    let root = Controller::new("root")
        .default_handler("root.catch")
        .child("shop", shop)
        .build();
    let dispatcher = Arc::new(Dispatcher::new(AllowAll));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let root = root.clone();
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                let path = if i % 2 == 0 { "/shop/x" } else { "/y" };
                dispatcher.resolve_path(&root, path).unwrap().handler
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let expected = if i % 2 == 0 { "shop.catch" } else { "root.catch" };
        assert_eq!(handle.join().unwrap(), expected);
    }
}
