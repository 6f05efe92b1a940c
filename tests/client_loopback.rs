//! End-to-end tests of the client against a scripted server on loopback.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::{sleep, timeout};
use twitched_irc::{
    BadgeTable, Client, ClientConfig, ConnectionError, ConnectionState, Credentials, Event, Events,
    TryRecvError,
};

const WAIT: Duration = Duration::from_secs(5);

/// Server side of one accepted connection.
struct Peer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write: OwnedWriteHalf,
}

impl Peer {
    async fn accept(listener: &TcpListener) -> Peer {
        let (stream, _) = timeout(WAIT, listener.accept())
            .await
            .expect("accept timed out")
            .expect("accept failed");
        let (read, write) = stream.into_split();
        Peer {
            lines: BufReader::new(read).lines(),
            write,
        }
    }

    async fn recv(&mut self) -> Option<String> {
        timeout(WAIT, self.lines.next_line())
            .await
            .expect("server read timed out")
            .expect("server read failed")
    }

    async fn expect_line(&mut self) -> String {
        self.recv().await.expect("client closed the connection")
    }

    async fn send(&mut self, line: &str) {
        self.write.write_all(line.as_bytes()).await.expect("server write failed");
    }
}

async fn listen() -> (TcpListener, ClientConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    (listener, ClientConfig::with_server("127.0.0.1", port))
}

fn client(config: ClientConfig) -> (Client, Events) {
    let table: BadgeTable = [("subscriber", "6", "url1")].into_iter().collect();
    Client::new(config, Arc::new(table))
}

async fn next_event(events: &mut Events) -> Event {
    timeout(WAIT, events.recv())
        .await
        .expect("event timed out")
        .expect("event stream ended")
}

#[tokio::test]
async fn test_guest_session() {
    let (listener, config) = listen().await;
    let (client, mut events) = client(config);

    client.connect("Foo", None).await.expect("connect");
    assert_eq!(client.state(), ConnectionState::Joined);

    let mut peer = Peer::accept(&listener).await;
    assert_eq!(peer.expect_line().await, "CAP REQ :twitch.tv/tags");
    let nick = peer.expect_line().await;
    assert!(nick.starts_with("NICK justinfan"), "{}", nick);
    assert!(nick["NICK justinfan".len()..].parse::<u32>().is_ok(), "{}", nick);
    assert_eq!(peer.expect_line().await, "JOIN #foo");

    peer.send(":justinfan1!justinfan1@justinfan1.tmi.twitch.tv JOIN #foo\r\n")
        .await;
    let Event::ConnectionNotice(notice) = next_event(&mut events).await else {
        panic!("expected a connection notice");
    };
    assert_eq!(notice.display_name, "#foo");
    assert_eq!(notice.body, "connected");
    assert_eq!(client.channel().as_deref(), Some("#foo"));

    // The PING is answered and produces no event; the PRIVMSG behind it is
    // the next thing the consumer sees.
    peer.send(":tmi.twitch.tv 001 justinfan1 :Welcome, GLHF!\r\nPING :tmi.twitch.tv\r\n")
        .await;
    peer.send("@badges=subscriber/6;color=#FF0000;display-name=Tester :tester!tester@host PRIVMSG #foo :Hello\r\n")
        .await;

    assert_eq!(peer.expect_line().await, "PONG tmi.twitch.tv");

    let Event::Message(msg) = next_event(&mut events).await else {
        panic!("expected a chat message");
    };
    assert_eq!(msg.display_name, "Tester");
    assert_eq!(msg.body, "Hello");
    assert_eq!(msg.badge_image_urls, vec!["url1"]);

    client.send_privmsg("hi there").await.expect("send");
    assert_eq!(peer.expect_line().await, "PRIVMSG #foo :hi there");

    client.disconnect().await;
    assert_eq!(peer.recv().await, None);
}

#[tokio::test]
async fn test_authenticated_handshake() {
    let (listener, config) = listen().await;
    let (client, _events) = client(config);

    client
        .connect("bar", Some(Credentials::new("token123", "MyLogin")))
        .await
        .expect("connect");

    let mut peer = Peer::accept(&listener).await;
    assert_eq!(peer.expect_line().await, "CAP REQ :twitch.tv/tags");
    assert_eq!(peer.expect_line().await, "PASS oauth:token123");
    assert_eq!(peer.expect_line().await, "NICK mylogin");
    assert_eq!(peer.expect_line().await, "JOIN #bar");
}

#[tokio::test]
async fn test_server_close_is_reported() {
    let (listener, config) = listen().await;
    let (client, mut events) = client(config);
    let mut state = client.watch_state();

    client.connect("foo", None).await.expect("connect");
    let mut peer = Peer::accept(&listener).await;
    // Drain the handshake so the close is a clean FIN.
    for _ in 0..3 {
        peer.expect_line().await;
    }
    drop(peer);

    let event = next_event(&mut events).await;
    assert!(
        matches!(event, Event::Error(ConnectionError::Closed)),
        "{:?}",
        event
    );
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(*state.borrow_and_update(), ConnectionState::Disconnected);

    assert!(matches!(
        client.send_privmsg("anyone?").await,
        Err(ConnectionError::NotConnected)
    ));
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let (listener, config) = listen().await;
    let (client, mut events) = client(config);

    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);

    client.connect("foo", None).await.expect("connect");
    let mut peer = Peer::accept(&listener).await;

    client.disconnect().await;
    client.disconnect().await;
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(client.channel(), None);

    // Handshake, then end of stream.
    for _ in 0..3 {
        peer.expect_line().await;
    }
    assert_eq!(peer.recv().await, None);

    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert!(matches!(
        client.send_privmsg("hello").await,
        Err(ConnectionError::NotConnected)
    ));
}

#[tokio::test]
async fn test_reconnect_supersedes_previous_connection() {
    let (listener, config) = listen().await;
    let (client, mut events) = client(config);

    client.connect("first", None).await.expect("connect");
    let mut old = Peer::accept(&listener).await;

    client.connect("second", None).await.expect("reconnect");
    let mut new = Peer::accept(&listener).await;

    for _ in 0..3 {
        old.expect_line().await;
    }
    assert_eq!(old.recv().await, None);

    assert_eq!(new.expect_line().await, "CAP REQ :twitch.tv/tags");
    new.expect_line().await;
    assert_eq!(new.expect_line().await, "JOIN #second");

    new.send(":justinfan1!justinfan1@justinfan1.tmi.twitch.tv JOIN #second\r\n")
        .await;
    let Event::ConnectionNotice(notice) = next_event(&mut events).await else {
        panic!("expected a connection notice");
    };
    assert_eq!(notice.display_name, "#second");
    assert_eq!(client.channel().as_deref(), Some("#second"));
}

#[tokio::test]
async fn test_connect_refused() {
    let (listener, config) = listen().await;
    drop(listener);
    let (client, mut events) = client(config);

    let err = client.connect("foo", None).await.expect_err("nothing is listening");
    assert!(matches!(err, ConnectionError::Connect { .. }), "{:?}", err);
    assert_eq!(client.state(), ConnectionState::Disconnected);

    let event = next_event(&mut events).await;
    assert!(
        matches!(event, Event::Error(ConnectionError::Connect { .. })),
        "{:?}",
        event
    );
}

/// Sends 1 MiB chat lines until one fails.
fn flood(client: &Arc<Client>) -> tokio::task::JoinHandle<ConnectionError> {
    let client = Arc::clone(client);
    tokio::spawn(async move {
        let line = "x".repeat(1 << 20);
        loop {
            if let Err(e) = client.send_privmsg(&line).await {
                return e;
            }
        }
    })
}

#[tokio::test]
async fn test_disconnect_aborts_stalled_write() {
    let (listener, config) = listen().await;
    let (client, _events) = client(config);
    let client = Arc::new(client);

    client.connect("foo", None).await.expect("connect");
    // Accepted but never read, so the socket buffers fill up.
    let (_stream, _) = listener.accept().await.expect("accept");

    let writer = flood(&client);
    sleep(Duration::from_millis(500)).await;

    timeout(Duration::from_secs(3), client.disconnect())
        .await
        .expect("disconnect blocked behind a stalled write");
    assert_eq!(client.state(), ConnectionState::Disconnected);

    let err = timeout(WAIT, writer)
        .await
        .expect("stalled write was not aborted")
        .expect("writer task panicked");
    assert!(matches!(err, ConnectionError::NotConnected), "{:?}", err);
}

#[tokio::test]
async fn test_reconnect_supersedes_stalled_write() {
    let (listener, config) = listen().await;
    let (client, _events) = client(config);
    let client = Arc::new(client);

    client.connect("first", None).await.expect("connect");
    let (_stalled, _) = listener.accept().await.expect("accept");

    let writer = flood(&client);
    sleep(Duration::from_millis(500)).await;

    timeout(Duration::from_secs(3), client.connect("second", None))
        .await
        .expect("connect blocked behind a stalled write")
        .expect("reconnect");
    let mut peer = Peer::accept(&listener).await;
    assert_eq!(peer.expect_line().await, "CAP REQ :twitch.tv/tags");

    let err = timeout(WAIT, writer).await.expect("timed out").expect("panicked");
    assert!(matches!(err, ConnectionError::NotConnected), "{:?}", err);
    assert_eq!(client.state(), ConnectionState::Joined);
}

#[tokio::test]
async fn test_write_failure_disconnects() {
    let (listener, config) = listen().await;
    let (client, mut events) = client(config);
    let client = Arc::new(client);

    client.connect("foo", None).await.expect("connect");
    let (stream, _) = listener.accept().await.expect("accept");

    let writer = flood(&client);
    sleep(Duration::from_millis(500)).await;

    // Reset instead of a clean close, so the stalled write fails.
    socket2::SockRef::from(&stream)
        .set_linger(Some(Duration::ZERO))
        .expect("set linger");
    drop(stream);

    let err = timeout(WAIT, writer).await.expect("timed out").expect("panicked");
    assert!(matches!(err, ConnectionError::Write(_)), "{:?}", err);
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(client.channel(), None);

    // The read loop saw the same reset; it may or may not report it first,
    // but nothing else arrives.
    while let Ok(event) = events.try_recv() {
        assert!(matches!(event, Event::Error(_)), "{:?}", event);
    }
    assert!(matches!(
        client.send_privmsg("again").await,
        Err(ConnectionError::NotConnected)
    ));
}

#[tokio::test]
async fn test_no_events_after_disconnect() {
    let (listener, config) = listen().await;
    let (client, mut events) = client(config);

    client.connect("foo", None).await.expect("connect");
    let mut peer = Peer::accept(&listener).await;
    for _ in 0..3 {
        peer.expect_line().await;
    }

    // Keep chat lines coming while the client disconnects.
    let server = tokio::spawn(async move {
        let line = ":viewer!viewer@host PRIVMSG #foo :spam\r\n".repeat(64);
        while peer.write.write_all(line.as_bytes()).await.is_ok() {
            tokio::task::yield_now().await;
        }
    });

    let Event::Message(first) = next_event(&mut events).await else {
        panic!("expected a chat message");
    };
    assert_eq!(first.body, "spam");

    client.disconnect().await;

    // Whatever was emitted before disconnect returned is still queued.
    while let Ok(event) = events.try_recv() {
        assert!(matches!(event, Event::Message(_)), "{:?}", event);
    }
    sleep(Duration::from_millis(200)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    timeout(WAIT, server).await.expect("server kept writing").expect("server panicked");
}
