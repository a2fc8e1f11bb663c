//! Integration tests for the request/response pipeline.
//!
//! These tests stand in for the external message bus: a plain TCP peer (or
//! an in-memory duplex stream) that receives framed request envelopes and
//! delivers framed response envelopes, the way the real bus eventually
//! would.

#![allow(clippy::unwrap_used)] // unwrap is acceptable in tests

use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use prost_types::Any;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Barrier;
use tokio::time::timeout;

use farstat::bus::{self, FramedBus, MAX_FRAME_LEN};
use farstat::proto::{Envelope, Extra, Group, StatRequest, StatResponse, Status, User};
use farstat::{ClientId, REMOTE_SERVICE, RequestIssuer, ResponseListener, Sink};

fn success_response(path: &str) -> StatResponse {
    StatResponse {
        path: path.to_string(),
        status: Some(Status {
            success: true,
            error_details: String::new(),
        }),
        size: 220,
        mode: 0o100644,
        extra: Some(Extra {
            inode: 12345,
            hardlinks_number: 1,
            owner: Some(User {
                uid: 0,
                name: "root".to_string(),
            }),
            owner_group: Some(Group {
                gid: 0,
                name: "root".to_string(),
            }),
            last_access_time: Some(prost_types::Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
            last_data_modification_time: Some(prost_types::Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
            last_status_change_time: Some(prost_types::Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
        }),
    }
}

fn response_envelope(response: &StatResponse) -> Envelope {
    Envelope {
        destination: None,
        data: Some(Any::from_msg(response).unwrap()),
    }
}

fn failure_envelope(path: &str, details: &str) -> Envelope {
    response_envelope(&StatResponse {
        path: path.to_string(),
        status: Some(Status {
            success: false,
            error_details: details.to_string(),
        }),
        ..Default::default()
    })
}

/// One request goes out over a real socket, the fake bus answers, and the
/// answer lands rendered in the output file.
#[tokio::test]
async fn test_end_to_end_over_tcp() {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();

    // The fake bus: expect one request envelope, deliver one response.
    let bus_task = tokio::spawn(async move {
        let (mut stream, _) = server.accept().await.unwrap();
        let frame = bus::read_frame(&mut stream, MAX_FRAME_LEN)
            .await
            .unwrap()
            .unwrap();
        let envelope = Envelope::decode(frame.as_slice()).unwrap();

        let destination = envelope.destination.unwrap();
        assert_eq!(destination.client_id, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(destination.service_name, REMOTE_SERVICE);
        let request: StatRequest = envelope.data.unwrap().to_msg().unwrap();
        assert_eq!(request.path, "/etc/hosts");

        let response = response_envelope(&success_response(&request.path));
        bus::write_frame(&mut stream, &response.encode_to_vec())
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("responses.txt");

    let (sender, inbound) = FramedBus::connect(addr).await.unwrap();
    let listener = ResponseListener::new(Sink::File(output.clone()));
    let dispatch = tokio::spawn(bus::run_dispatch(inbound, listener));

    let issuer = RequestIssuer::new(Arc::new(sender), ClientId::from_hex("deadbeef").unwrap());
    issuer.send_request("/etc/hosts").await.unwrap();

    // The fake bus closes the connection after replying, which ends the
    // dispatch loop cleanly.
    timeout(Duration::from_secs(5), dispatch)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    timeout(Duration::from_secs(5), bus_task)
        .await
        .unwrap()
        .unwrap();

    let rendered = std::fs::read_to_string(&output).unwrap();
    assert!(rendered.starts_with("path: /etc/hosts\n"), "got: {rendered}");
    assert!(rendered.contains("size: 220 bytes\n"));
    assert!(rendered.contains("mode: -rw-r--r--\n"));
    assert!(rendered.contains("node: 12345\n"));
    assert!(rendered.ends_with("\n\n"));
}

/// A frame that does not decode as an envelope is dropped; the next valid
/// frame still renders.
#[tokio::test]
async fn test_dispatch_survives_garbage_frames() {
    let (mut bus_side, client_side) = tokio::io::duplex(4096);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("responses.txt");
    let listener = ResponseListener::new(Sink::File(output.clone()));
    let dispatch = tokio::spawn(bus::run_dispatch(client_side, listener));

    bus::write_frame(&mut bus_side, &[0xff, 0xff, 0xff]).await.unwrap();
    let envelope = failure_envelope("/gone", "no such file or directory");
    bus::write_frame(&mut bus_side, &envelope.encode_to_vec())
        .await
        .unwrap();
    drop(bus_side);

    timeout(Duration::from_secs(5), dispatch)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let rendered = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        rendered,
        "stat on \"/gone\" failed:\nno such file or directory\n\n"
    );
}

/// Concurrent deliveries never interleave their rendered blocks.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deliveries_do_not_interleave() {
    const DELIVERIES: usize = 16;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("responses.txt");
    let listener = ResponseListener::new(Sink::File(output.clone()));

    let barrier = Arc::new(Barrier::new(DELIVERIES));
    let mut tasks = Vec::new();
    for i in 0..DELIVERIES {
        let listener = listener.clone();
        let barrier = Arc::clone(&barrier);
        tasks.push(tokio::spawn(async move {
            let envelope = failure_envelope(
                &format!("/path/{i}"),
                &format!("error details for delivery {i}"),
            );
            barrier.wait().await;
            listener.handle(envelope).await;
        }));
    }
    for task in tasks {
        timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    }

    let rendered = std::fs::read_to_string(&output).unwrap();
    let mut blocks: Vec<&str> = rendered
        .split_terminator("\n\n")
        .collect();
    blocks.sort_unstable();

    let mut expected: Vec<String> = (0..DELIVERIES)
        .map(|i| format!("stat on \"/path/{i}\" failed:\nerror details for delivery {i}"))
        .collect();
    expected.sort_unstable();

    assert_eq!(blocks, expected, "blocks interleaved or lost");
}

/// The request payload round-trips through an envelope unchanged.
#[tokio::test]
async fn test_request_roundtrip_through_the_wire_format() {
    let request = StatRequest {
        path: "/weird path/with spaces".to_string(),
    };
    let envelope = Envelope {
        destination: None,
        data: Some(Any::from_msg(&request).unwrap()),
    };

    let (mut a, mut b) = tokio::io::duplex(4096);
    bus::write_frame(&mut a, &envelope.encode_to_vec()).await.unwrap();
    let frame = bus::read_frame(&mut b, MAX_FRAME_LEN).await.unwrap().unwrap();

    let decoded = Envelope::decode(frame.as_slice()).unwrap();
    let unpacked: StatRequest = decoded.data.unwrap().to_msg().unwrap();
    assert_eq!(unpacked.path, "/weird path/with spaces");
}
