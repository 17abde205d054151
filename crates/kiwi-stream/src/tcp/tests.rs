use std::time::Duration;

use tokio::{io::AsyncWriteExt, net::TcpListener};

use super::*;

/// Listener that greets every accepted connection with `payload` and hangs up.
async fn serve_once_each(payloads: Vec<&'static str>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        for payload in payloads {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(payload.as_bytes()).await.unwrap();
            sock.shutdown().await.unwrap();
        }
    });
    port
}

fn recorder(spool: &Path) -> TcpRecorder {
    TcpRecorder::new(StreamConfig::new("40m", spool))
}

async fn read(path: &Path) -> Vec<u8> {
    tokio::fs::read(path).await.unwrap()
}

#[tokio::test]
async fn pumps_stream_into_segment_until_peer_hangs_up() {
    let spool = tempfile::tempdir().unwrap();
    let port = serve_once_each(vec!["hello kiwi"]).await;
    let mut rec = recorder(spool.path());

    rec.connect("127.0.0.1", port).await.unwrap();
    rec.open().await.unwrap();
    let err = loop {
        if let Err(e) = rec.run().await {
            break e;
        }
    };
    rec.close().await;

    assert!(matches!(err, RecorderError::ServerTerminated(_)));
    let segment = rec.segment().unwrap().to_path_buf();
    assert!(segment.starts_with(spool.path().join("40m")));
    assert_eq!(read(&segment).await, b"hello kiwi");
    assert_eq!(rec.bytes_written(), 10);
}

#[tokio::test]
async fn reconnect_appends_unless_segment_was_reset() {
    let spool = tempfile::tempdir().unwrap();
    let port = serve_once_each(vec!["one,", "two", "three"]).await;
    let mut rec = recorder(spool.path());

    for _ in 0..2 {
        rec.connect("127.0.0.1", port).await.unwrap();
        rec.open().await.unwrap();
        while rec.run().await.is_ok() {}
        rec.close().await;
    }
    let first = rec.segment().unwrap().to_path_buf();
    assert_eq!(read(&first).await, b"one,two");

    rec.reset_segment();
    rec.connect("127.0.0.1", port).await.unwrap();
    rec.open().await.unwrap();
    while rec.run().await.is_ok() {}
    rec.close().await;

    let second = rec.segment().unwrap().to_path_buf();
    assert_ne!(first, second);
    assert_eq!(read(&second).await, b"three");
    assert_eq!(read(&first).await, b"one,two");
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let spool = tempfile::tempdir().unwrap();
    let mut rec = recorder(spool.path());
    let err = rec.connect("127.0.0.1", port).await.unwrap_err();
    assert!(matches!(err, RecorderError::Connect(_)));
}

#[tokio::test]
async fn reset_by_peer_is_a_server_termination() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        sock.write_all(b"data").await.unwrap();
        #[allow(deprecated)]
        sock.set_linger(Some(Duration::ZERO)).unwrap();
        drop(sock);
    });

    let spool = tempfile::tempdir().unwrap();
    let mut rec = recorder(spool.path());
    rec.connect("127.0.0.1", port).await.unwrap();
    rec.open().await.unwrap();
    let err = loop {
        if let Err(e) = rec.run().await {
            break e;
        }
    };
    rec.close().await;

    assert!(matches!(err, RecorderError::ServerTerminated(_)), "{err:?}");
    assert_eq!(err.kind(), kiwi_core::FailureKind::Terminated);
}

#[test]
fn hangup_errors_map_to_server_termination() {
    for kind in [
        io::ErrorKind::ConnectionReset,
        io::ErrorKind::ConnectionAborted,
        io::ErrorKind::BrokenPipe,
        io::ErrorKind::UnexpectedEof,
    ] {
        assert!(matches!(
            hangup_or_io(io::Error::from(kind)),
            RecorderError::ServerTerminated(_)
        ));
    }
    assert!(matches!(
        hangup_or_io(io::Error::from(io::ErrorKind::PermissionDenied)),
        RecorderError::Io(_)
    ));
}

#[tokio::test]
async fn exhausted_time_limit_stops_the_pump() {
    let spool = tempfile::tempdir().unwrap();
    let port = serve_once_each(vec!["data"]).await;
    let cfg = StreamConfig::new("40m", spool.path()).with_time_limit(Some(Duration::ZERO));
    let mut rec = TcpRecorder::new(cfg);

    rec.connect("127.0.0.1", port).await.unwrap();
    rec.open().await.unwrap();
    assert_eq!(rec.run().await, Err(RecorderError::TimeLimit));
    rec.close().await;
}

#[tokio::test]
async fn session_calls_out_of_order_are_unclassified() {
    let spool = tempfile::tempdir().unwrap();
    let mut rec = recorder(spool.path());

    assert!(matches!(rec.open().await, Err(RecorderError::Other(_))));
    assert!(matches!(rec.run().await, Err(RecorderError::Other(_))));
}

#[tokio::test]
async fn close_is_idempotent() {
    let spool = tempfile::tempdir().unwrap();
    let mut rec = recorder(spool.path());

    rec.close().await;
    rec.close().await;
    assert!(rec.segment().is_none());
}
