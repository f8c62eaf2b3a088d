//! End-to-end session and lifecycle tests against a fake collector.
//!
//! The collector side is a plain tokio TCP listener speaking the same
//! one-JSON-object-per-read framing as the node. Discovery-dependent tests
//! use distinct UDP ports so they can run concurrently.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::watch;
use tokio::time;

use picocast_node::{
    //
    ConnectionState,
    Error,
    MonotonicClock,
    NodeConfig,
    NodeController,
    SensorPtr,
    Session,
    SessionMessage,
    SimulatedSensor,
    Status,
};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn test_config() -> NodeConfig {
    // Short idle so empty-payload skips don't slow the tests down.
    NodeConfig::default().with_idle_interval(Duration::from_millis(10))
}

fn test_sensor() -> SensorPtr {
    Arc::new(SimulatedSensor::new(Arc::new(MonotonicClock::new())))
}

fn command(status: Status) -> SessionMessage {
    SessionMessage {
        status,
        data: Vec::new(),
    }
}

/// Fake collector: accepts node connections and exchanges framed JSON.
struct Collector {
    // ---
    listener: TcpListener,
}

struct CollectorConn {
    // ---
    stream: TcpStream,
    buf: Vec<u8>,
}

impl Collector {
    async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self { listener }
    }

    fn port(&self) -> u16 {
        self.listener.local_addr().unwrap().port()
    }

    async fn accept(&self) -> CollectorConn {
        let (stream, _) = time::timeout(RECV_TIMEOUT, self.listener.accept())
            .await
            .expect("no node connected")
            .unwrap();
        CollectorConn {
            stream,
            buf: vec![0u8; 1024],
        }
    }
}

impl CollectorConn {
    async fn send(&mut self, msg: &SessionMessage) {
        self.stream.write_all(&msg.encode().unwrap()).await.unwrap();
    }

    async fn send_raw(&mut self, raw: &[u8]) {
        self.stream.write_all(raw).await.unwrap();
    }

    async fn recv(&mut self) -> SessionMessage {
        let len = time::timeout(RECV_TIMEOUT, self.stream.read(&mut self.buf))
            .await
            .expect("no frame from node")
            .unwrap();
        assert!(len > 0, "node closed the connection");
        SessionMessage::decode(&self.buf[..len]).unwrap()
    }
}

#[tokio::test]
async fn connect_sends_conn_handshake() {
    let collector = Collector::bind().await;
    let port = collector.port();

    let node = tokio::spawn(async move {
        Session::connect("127.0.0.1", port, &test_config()).await
    });

    let mut conn = collector.accept().await;
    assert_eq!(conn.recv().await.status, Status::Conn);

    node.await.unwrap().unwrap();
}

#[tokio::test]
async fn connect_to_refused_port_is_connect_error() {
    // Bind-then-drop to get a port nothing is listening on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    // Session has no Debug impl, so take the error side explicitly.
    let err = Session::connect("127.0.0.1", port, &test_config())
        .await
        .err()
        .expect("connect unexpectedly succeeded");
    assert!(matches!(err, Error::Connect { .. }));
}

#[tokio::test]
async fn receive_skips_whitespace_payloads() {
    let collector = Collector::bind().await;
    let port = collector.port();

    let node = tokio::spawn(async move {
        let mut session = Session::connect("127.0.0.1", port, &test_config()).await?;
        session.receive().await
    });

    let mut conn = collector.accept().await;
    assert_eq!(conn.recv().await.status, Status::Conn);

    conn.send_raw(b"   ").await;
    time::sleep(Duration::from_millis(50)).await;
    conn.send(&command(Status::Ack)).await;

    let msg = node.await.unwrap().unwrap();
    assert_eq!(msg.status, Status::Ack);
}

#[tokio::test]
async fn undecodable_payload_is_session_decode_error() {
    let collector = Collector::bind().await;
    let port = collector.port();

    let node = tokio::spawn(async move {
        let mut session = Session::connect("127.0.0.1", port, &test_config()).await?;
        session.receive().await
    });

    let mut conn = collector.accept().await;
    assert_eq!(conn.recv().await.status, Status::Conn);
    conn.send_raw(b"garbage").await;

    let err = node.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::SessionDecode(_)));
}

#[tokio::test]
async fn peer_close_is_connection_lost() {
    let collector = Collector::bind().await;
    let port = collector.port();

    let node = tokio::spawn(async move {
        let mut session = Session::connect("127.0.0.1", port, &test_config()).await?;
        session.receive().await
    });

    let conn = collector.accept().await;
    drop(conn);

    let err = node.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::ConnectionLost(_)));
}

/// Full lifecycle: discovery, session commands, re-discovery after the
/// collector drops the connection, and CLOSE on shutdown.
#[tokio::test]
async fn controller_serves_commands_and_survives_session_loss() {
    let discovery_port = 51613;
    let collector = Collector::bind().await;
    let tcp_port = collector.port();

    let config = test_config().with_discovery_port(discovery_port);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let node = tokio::spawn(async move {
        let mut controller = NodeController::new(config, test_sensor());
        controller.run(shutdown_rx).await;
        controller
    });

    // Broadcast announcements until aborted; the node needs one per
    // discovery cycle.
    let announcer = tokio::spawn(async move {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let payload = format!(
            r#"{{"ID":"PicoCast","ip":"127.0.0.1","port":{tcp_port},"iter":1}}"#
        );
        loop {
            let _ = socket
                .send_to(payload.as_bytes(), ("127.0.0.1", discovery_port))
                .await;
            time::sleep(Duration::from_millis(20)).await;
        }
    });

    let mut conn = collector.accept().await;
    assert_eq!(conn.recv().await.status, Status::Conn);

    // ACK is answered with exactly one fresh reading.
    conn.send(&command(Status::Ack)).await;
    let reply = conn.recv().await;
    assert_eq!(reply.status, Status::Mes);
    assert_eq!(reply.data.len(), 1);

    // 20 samples total: exactly one lands in the retained buffer.
    for _ in 0..19 {
        conn.send(&command(Status::Ack)).await;
        assert_eq!(conn.recv().await.status, Status::Mes);
    }
    conn.send(&command(Status::Data)).await;
    let reply = conn.recv().await;
    assert_eq!(reply.status, Status::Data);
    assert_eq!(reply.data.len(), 1);

    // RST clears the buffer and still answers with a measurement.
    conn.send(&command(Status::Rst)).await;
    assert_eq!(conn.recv().await.status, Status::Mes);
    conn.send(&command(Status::Data)).await;
    assert!(conn.recv().await.data.is_empty());

    // Dropping the connection sends the node back to discovery; the
    // announcer is still broadcasting, so it comes back.
    drop(conn);
    let mut conn = collector.accept().await;
    assert_eq!(conn.recv().await.status, Status::Conn);

    // Shutdown: best-effort CLOSE, then the loop ends.
    shutdown_tx.send(true).unwrap();
    assert_eq!(conn.recv().await.status, Status::Close);

    let controller = time::timeout(RECV_TIMEOUT, node)
        .await
        .expect("node did not stop")
        .unwrap();
    assert_eq!(controller.state(), ConnectionState::Closed);

    announcer.abort();
}
