//! Fetch tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread, then
//! drives the blocking `Fetcher` over real TCP. ureq serves as a reference
//! client to cross-check the bytes our engine delivers.

use std::net::SocketAddr;
use std::time::Duration;

use fetch_core::{FetchConfig, FetchError, Fetcher, HttpRequest, TcpTransport, Transport};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// Wraps `TcpTransport` and counts connections.
struct CountingTransport {
    inner: TcpTransport,
    calls: usize,
}

impl Transport for CountingTransport {
    fn fetch(&mut self, host: &str, port: u16, request: &[u8]) -> Result<Vec<u8>, FetchError> {
        self.calls += 1;
        self.inner.fetch(host, port, request)
    }
}

fn fetcher() -> Fetcher<CountingTransport> {
    let config = FetchConfig::default().with_timeout(Duration::from_secs(5));
    let transport = CountingTransport {
        inner: TcpTransport::new(config.timeout),
        calls: 0,
    };
    Fetcher::new(transport, config)
}

#[test]
fn plain_fetch() {
    let addr = start_server();
    let mut f = fetcher();
    let outcome = f.fetch(&format!("http://{addr}/hello")).unwrap();
    assert_eq!(outcome.response.status, 200);
    assert_eq!(outcome.response.body, mock_server::HELLO_BODY);
    assert_eq!(outcome.response.header("Content-Type"), Some("text/plain"));
}

#[test]
fn wire_request_is_byte_exact() {
    let addr = start_server();
    let outcome = fetcher().fetch(&format!("http://{addr}/echo")).unwrap();
    let expected = HttpRequest::get(&addr.ip().to_string(), "/echo");
    assert_eq!(outcome.response.body, expected.as_bytes());
}

#[test]
fn binary_body_matches_reference_client() {
    let addr = start_server();
    let url = format!("http://{addr}/bytes/70000");
    let ours = fetcher().fetch(&url).unwrap().response.body;

    let reference = ureq::get(&url)
        .call()
        .unwrap()
        .body_mut()
        .read_to_vec()
        .unwrap();

    assert_eq!(ours.len(), 70000);
    assert_eq!(ours, reference);
    assert_eq!(ours, mock_server::pattern_bytes(70000));
}

#[test]
fn follows_host_relative_chain() {
    let addr = start_server();
    let mut f = fetcher();
    let outcome = f.fetch(&format!("http://{addr}/redirect/4")).unwrap();
    assert_eq!(outcome.response.body, mock_server::ARRIVED_BODY);
    assert_eq!(outcome.redirects.len(), 4);
    assert_eq!(outcome.final_url, format!("http://{addr}/redirect/0"));
    assert_eq!(f.into_transport().calls, 5);
}

#[test]
fn follows_absolute_then_relative() {
    let addr = start_server();
    let outcome = fetcher()
        .fetch(&format!("http://{addr}/absolute-redirect/1"))
        .unwrap();
    assert_eq!(
        outcome.redirects,
        vec![
            format!("http://{addr}/redirect/1"),
            format!("http://{addr}/redirect/0"),
        ]
    );

    let outcome = fetcher().fetch(&format!("http://{addr}/dir/")).unwrap();
    assert_eq!(outcome.final_url, format!("http://{addr}/dir/file.txt"));
    assert_eq!(outcome.response.body, mock_server::DIR_FILE_BODY);
}

#[test]
fn redirect_chain_matches_reference_client() {
    let addr = start_server();
    let url = format!("http://{addr}/redirect/3");
    let ours = fetcher().fetch(&url).unwrap().response.body;
    let reference = ureq::get(&url)
        .call()
        .unwrap()
        .body_mut()
        .read_to_vec()
        .unwrap();
    assert_eq!(ours, reference);
}

#[test]
fn eleven_hops_stop_before_twelfth_fetch() {
    let addr = start_server();
    let mut f = fetcher();
    let err = f.fetch(&format!("http://{addr}/redirect/11")).unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects { max: 10 }));
    assert_eq!(f.into_transport().calls, 11);
}

#[test]
fn redirect_loop_is_bounded() {
    let addr = start_server();
    let mut f = fetcher();
    let err = f.fetch(&format!("http://{addr}/loop")).unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects { .. }));
    assert_eq!(f.into_transport().calls, 11);
}

#[test]
fn terminal_statuses() {
    let addr = start_server();
    let cases: [(&str, fn(&FetchError) -> bool); 5] = [
        ("/status/404", |e| matches!(e, FetchError::ClientError { status: 404, .. })),
        ("/status/500", |e| matches!(e, FetchError::ServerError { status: 500, .. })),
        ("/status/204", |e| matches!(e, FetchError::UnexpectedStatus { status: 204, .. })),
        ("/status/302", |e| matches!(e, FetchError::MissingRedirectLocation { status: 302 })),
        ("/no-such-path", |e| matches!(e, FetchError::ClientError { status: 404, .. })),
    ];
    for (path, check) in cases {
        let err = fetcher().fetch(&format!("http://{addr}{path}")).unwrap_err();
        assert!(check(&err), "{path}: {err:?}");
    }
}

#[test]
fn malformed_responses() {
    let addr = start_server();
    for path in ["/malformed", "/no-status"] {
        let err = fetcher().fetch(&format!("http://{addr}{path}")).unwrap_err();
        assert!(
            matches!(err, FetchError::MalformedResponse { .. }),
            "{path}: {err:?}"
        );
    }
}

#[test]
fn closed_port_is_connection_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = fetcher()
        .fetch(&format!("http://127.0.0.1:{port}/"))
        .unwrap_err();
    assert!(matches!(err, FetchError::Connection { .. }));
}
