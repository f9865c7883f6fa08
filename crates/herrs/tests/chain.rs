use herrs::{BacktraceStack, Error, ErrorKind, Message, Params, RenderOptions, ScriptedStack, StackSource, e};
use http::StatusCode;
use pretty_assertions::assert_eq;

#[test]
fn validation_error_renders_tag_and_message() {
    let err = e!(ErrorKind::ValidationError, Message::from("bad id"));

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.rendered(), "VALIDATION_ERROR: bad id");
}

#[test]
fn status_descends_to_first_kind() {
    let inner = e!(ErrorKind::NotFound, Message::from("missing"));
    let outer = e!(inner);

    assert_eq!(outer.status(), StatusCode::NOT_FOUND);
    assert_eq!(outer.flattened_message(), "missing");
}

#[test]
fn status_prefers_outermost_kind() {
    let inner = e!(ErrorKind::NotFound, Message::from("missing"));
    let mid = e!(ErrorKind::SupplierError, inner);
    let outer = e!(Message::from("fetch"), mid);

    assert_eq!(outer.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn status_defaults_to_internal_error() {
    let inner = e!(Message::from("a"));
    let outer = e!(Message::from("b"), inner);

    assert_eq!(outer.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn every_kind_maps_through_a_wrapper() {
    for kind in ErrorKind::all() {
        let inner = e!(kind, Message::from("inner"));
        let outer = e!(Message::from("outer"), inner);
        assert_eq!(outer.status(), kind.http_status(), "kind {kind}");
        assert_eq!(outer.rendered(), format!("outer:\n\t{}: inner", kind.tag()));
    }
}

#[test]
fn rewrapping_same_kind_and_message_prints_once() {
    let inner = e!(ErrorKind::NotFound, Message::from("missing"));
    let outer = e!(ErrorKind::NotFound, Message::from("missing"), inner);

    let rendered = outer.rendered();
    assert_eq!(rendered, "NOT_FOUND: missing");
    assert_eq!(rendered.matches("NOT_FOUND").count(), 1);
    assert_eq!(rendered.matches("missing").count(), 1);

    let copy = outer.wrapped().expect("wrapped copy");
    assert_eq!(copy.kind(), None);
    assert_eq!(copy.message(), "");
    assert_eq!(outer.flattened_message(), "missing");
}

#[test]
fn flattened_message_ends_with_opaque_text() {
    let io = std::io::Error::other("broken pipe");
    let inner = e!(ErrorKind::SerializationError, Message::from("encode body"), io);
    let outer = e!(Message::from("respond"), inner);

    assert_eq!(outer.flattened_message(), "respond: encode body: broken pipe");
    assert_eq!(
        outer.rendered_with(&RenderOptions::single_line()),
        "respond:: JSON_ERROR: encode body: broken pipe"
    );
}

#[test]
fn empty_error_renders_no_error() {
    let err = e!(Message::from(""));
    assert!(err.is_empty());
    assert_eq!(err.rendered(), "no error");
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn params_stay_on_their_layer() {
    let inner = e!(ErrorKind::InvalidInput, Params::new(("limit", 0)));
    let outer = e!(Message::from("list orders"), inner);

    assert!(outer.params().is_none());
    assert!(outer.wrapped().and_then(Error::params).is_some());
}

#[test]
fn coalescing_across_three_layers_prints_one_trace() {
    let stack = ScriptedStack::new();
    let main = stack.frame("app::main", "src/main.rs", 8);
    let serve = stack.frame("app::server::serve", "src/server.rs", 21);
    let handler_call = stack.frame("app::api::handler", "src/api.rs", 30);
    let handler_wrap = stack.frame("app::api::handler", "src/api.rs", 34);
    let svc_call = stack.frame("app::svc::users::get", "src/svc.rs", 12);
    let svc_wrap = stack.frame("app::svc::users::get", "src/svc.rs", 15);
    let repo = stack.frame("app::repo::find", "src/repo.rs", 50);
    let report = stack.frame("app::server::report", "src/server.rs", 40);

    stack.enter(&[repo, svc_call, handler_call, serve, main]);
    let repo_err = Error::builder()
        .kind(ErrorKind::RepositoryError)
        .message("find user")
        .build_with(&stack);

    stack.enter(&[svc_wrap, handler_call, serve, main]);
    let svc_err = Error::builder()
        .message("get user")
        .wrap(repo_err)
        .build_with(&stack);
    assert_eq!(svc_err.frames().len(), 2 + 4);

    stack.enter(&[handler_wrap, serve, main]);
    let handler_err = Error::builder()
        .kind(ErrorKind::NotFound)
        .wrap(svc_err)
        .build_with(&stack);

    assert_eq!(
        handler_err.frames(),
        &[repo, svc_call, svc_wrap, handler_call, handler_wrap, serve, main][..]
    );
    assert!(handler_err.chain().skip(1).all(|layer| layer.frames().is_empty()));

    stack.enter(&[report, serve, main]);
    assert_eq!(
        handler_err.stack_trace_with(&RenderOptions::default(), &stack),
        "src/api.rs:34: app::api::handler:\n\
         \tsrc/svc.rs:15: ...svc::users::get:\n\
         \tsrc/repo.rs:50: ...repo::find"
    );
}

#[test]
fn disjoint_stacks_are_kept_apart() {
    let stack = ScriptedStack::new();
    let main = stack.frame("app::main", "src/main.rs", 8);
    let handler = stack.frame("app::handler", "src/api.rs", 30);
    let thread_start = stack.frame("std::thread::start", "thread.rs", 1);
    let worker = stack.frame("app::worker::run", "src/worker.rs", 9);

    stack.enter(&[worker, thread_start]);
    let inner = Error::builder().message("job failed").build_with(&stack);

    stack.enter(&[handler, main]);
    let outer = Error::builder().message("enqueue").wrap(inner).build_with(&stack);

    assert_eq!(outer.frames(), &[handler, main][..]);
    assert_eq!(
        outer.wrapped().map(Error::frames),
        Some(&[worker, thread_start][..])
    );
}

#[test]
fn process_stacks_coalesce() {
    fn inner_layer() -> Error {
        e!(ErrorKind::CacheMalfunction, Message::from("evict"))
    }

    let inner = inner_layer();
    let inner_len = inner.frames().len();
    let outer = e!(Message::from("refresh"), inner);

    assert!(outer.frames().len() >= inner_len);
    assert!(outer.wrapped().unwrap().frames().is_empty());
}

#[inline(never)]
fn build_at_origin() -> Error {
    e!(ErrorKind::NotFound, Message::from("user 7"))
}

#[inline(never)]
fn wrap_at_handler() -> Error {
    let err = build_at_origin();
    e!(Message::from("get profile"), err)
}

#[test]
fn first_frame_is_the_building_function() {
    let err = build_at_origin();
    let origin = BacktraceStack.resolve(err.frames()[0]);
    assert!(origin.name.ends_with("build_at_origin"), "first frame: {origin:?}");
    assert!(origin.file.ends_with("chain.rs"), "first frame: {origin:?}");
}

#[test]
fn process_trace_skips_construction_frames() {
    let err = wrap_at_handler();
    let trace = err.stack_trace();

    assert!(trace.contains("wrap_at_handler"), "trace: {trace}");
    assert!(trace.ends_with("build_at_origin"), "trace: {trace}");
    assert!(!trace.contains("herrs::"), "trace: {trace}");
    assert!(!trace.contains("backtrace::"), "trace: {trace}");
}
