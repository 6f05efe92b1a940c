//! Benchmarks for line parsing, chat message building, and serialization.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use twitched_irc::chat::{self, BadgeTable};
use twitched_irc::{IrcEncode, Message};

/// Keepalive from the server
const PING: &str = "PING :tmi.twitch.tv";

/// Chat line without tags
const PLAIN_PRIVMSG: &str = ":tester!tester@tester.tmi.twitch.tv PRIVMSG #channel :Hello, world!";

/// Chat line as actually delivered with the tags capability
const TAGGED_PRIVMSG: &str = "@badge-info=subscriber/8;badges=subscriber/6,premium/1;client-nonce=a1b2c3;color=#0000FF;display-name=Foo;emotes=25:6-10,20-24/100:0-3;first-msg=0;flags=;id=b34ccfc7-4977-403a-8a94-33c6bac34fb8;mod=0;room-id=1337;subscriber=1;tmi-sent-ts=1507246572675;turbo=0;user-id=1337;user-type= :foo!foo@foo.tmi.twitch.tv PRIVMSG #bar :LUL  Kappa hello Kappa";

/// Numeric from the registration burst
const NUMERIC: &str = ":tmi.twitch.tv 372 justinfan1 :You are in a maze of twisty passages, all alike.";

fn badge_table() -> BadgeTable {
    [
        ("subscriber", "6", "https://static-cdn.jtvnw.net/badges/v1/sub6/3"),
        ("premium", "1", "https://static-cdn.jtvnw.net/badges/v1/prime/3"),
    ]
    .into_iter()
    .collect()
}

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Parsing");

    for (name, line) in [
        ("ping", PING),
        ("plain_privmsg", PLAIN_PRIVMSG),
        ("tagged_privmsg", TAGGED_PRIVMSG),
        ("numeric", NUMERIC),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| black_box(Message::parse(black_box(line))))
        });
    }

    group.finish();
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chat Message Building");
    let table = badge_table();

    let plain = Message::parse(PLAIN_PRIVMSG).unwrap();
    let tagged = Message::parse(TAGGED_PRIVMSG).unwrap();

    group.bench_function("plain", |b| {
        b.iter(|| black_box(chat::build(black_box(&plain), &table)))
    });

    group.bench_function("tagged", |b| {
        b.iter(|| black_box(chat::build(black_box(&tagged), &table)))
    });

    group.bench_function("parse_and_build", |b| {
        b.iter(|| {
            let msg = Message::parse(black_box(TAGGED_PRIVMSG)).unwrap();
            black_box(chat::build(&msg, &table))
        })
    });

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Serialization");

    let privmsg = Message::privmsg("#channel", "Hello there, chat!");
    let join = Message::join("SomeStreamer");

    group.bench_function("privmsg", |b| b.iter(|| black_box(privmsg.to_bytes())));
    group.bench_function("join", |b| b.iter(|| black_box(join.to_bytes())));

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_build,
    benchmark_serialization
);
criterion_main!(benches);
