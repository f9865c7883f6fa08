//! A sample request failure, used to preview log output.

use herrs::{Error, ErrorKind, RenderOptions, StackSource};

#[derive(Debug)]
#[allow(dead_code)]
struct ProfileRequest {
    user_id: u64,
    tenant: &'static str,
}

/// What the demo produced.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub status: u16,
    pub flattened: String,
    pub log_line: String,
}

fn query_user(stack: &dyn StackSource, user_id: u64) -> Error {
    let refused = std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    );
    Error::builder()
        .kind(ErrorKind::RepositoryError)
        .message(format!("select user {user_id}"))
        .source(refused)
        .build_with(stack)
}

fn load_profile(stack: &dyn StackSource, user_id: u64) -> Error {
    let err = query_user(stack, user_id);
    Error::builder().message("load profile").wrap(err).build_with(stack)
}

fn handle_request(stack: &dyn StackSource, user_id: u64) -> Error {
    let err = load_profile(stack, user_id);
    Error::builder()
        .kind(ErrorKind::NotFound)
        .message("profile unavailable")
        .params(ProfileRequest {
            user_id,
            tenant: "acme",
        })
        .wrap(err)
        .build_with(stack)
}

/// A three-layer chain: repository failure over a refused connection,
/// wrapped by the service and the request handler.
///
/// Frames are captured from `stack`, innermost layer first.
pub fn sample_chain(stack: &dyn StackSource) -> Error {
    handle_request(stack, 7)
}

/// Build the sample chain and log it, capturing and resolving frames with
/// the same `stack`.
pub fn run_demo(opts: &RenderOptions, stack: &dyn StackSource) -> DemoReport {
    let err = sample_chain(stack);
    DemoReport {
        status: err.status().as_u16(),
        flattened: err.flattened_message(),
        log_line: err.log_line_with(opts, stack),
    }
}
