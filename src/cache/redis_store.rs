//! Redis Store Module
//!
//! `KeyValueStore` over a Redis server. Expiry uses the server's native `EX` TTL.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::KeyValueStore;
use crate::error::Result;

// == Redis Store ==
/// Redis-backed store sharing one multiplexed connection across callers.
///
/// The connection is opened on first use, so an unreachable server at startup
/// only fails individual calls. A connection that hits an I/O error is
/// discarded and the next call reconnects.
pub struct RedisStore {
    client: Client,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisStore {
    /// Creates a store for `url` without connecting.
    pub fn open(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        // Held across the connect: concurrent callers wait on one attempt
        // instead of each opening a connection.
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        info!(addr = ?self.client.get_connection_info().addr, "Connected to Redis");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Runs `cmd` on the shared connection, dropping it on connection-level failures.
    async fn query<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        let mut conn = self.connection().await?;
        match cmd.query_async::<_, T>(&mut conn).await {
            Ok(value) => Ok(value),
            Err(err) => {
                if is_connection_failure(&err) {
                    warn!(error = %err, "Redis connection lost, will reconnect on next call");
                    self.conn.lock().await.take();
                }
                Err(err.into())
            }
        }
    }
}

fn is_connection_failure(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal()
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.query(redis::cmd("GET").arg(key)).await
    }

    async fn set_ex(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        self.query(redis::cmd("SET").arg(key).arg(value).arg("EX").arg(ttl_secs))
            .await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let removed: i64 = self.query(redis::cmd("DEL").arg(key)).await?;
        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<()> {
        let _: String = self.query(&redis::cmd("PING")).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn close(&self) {
        if self.conn.lock().await.take().is_some() {
            debug!("Redis connection released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    // Nothing listens on port 1; connects are refused immediately.
    const UNREACHABLE: &str = "redis://127.0.0.1:1/";

    #[test]
    fn test_open_rejects_bad_url() {
        assert!(RedisStore::open("not a url").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let store = RedisStore::open(UNREACHABLE).unwrap();

        let result = store.get("key").await;
        assert!(matches!(result, Err(CacheError::Transport(_))));

        let result = store.ping().await;
        assert!(matches!(result, Err(CacheError::Transport(_))));
    }

    #[tokio::test]
    async fn test_close_without_connection() {
        let store = RedisStore::open(UNREACHABLE).unwrap();
        store.close().await;
        assert_eq!(store.backend_name(), "redis");
    }

    /// Reads one RESP array command from `buf`, returning its parts and byte length.
    fn parse_command(buf: &[u8]) -> Option<(Vec<String>, usize)> {
        let text = std::str::from_utf8(buf).ok()?;
        let line_end = |from: usize| text[from..].find("\r\n").map(|i| from + i);

        if !text.starts_with('*') {
            return None;
        }
        let end = line_end(0)?;
        let count: usize = text[1..end].parse().ok()?;
        let mut pos = end + 2;

        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            if !text[pos..].starts_with('$') {
                return None;
            }
            let end = line_end(pos)?;
            let len: usize = text[pos + 1..end].parse().ok()?;
            let start = end + 2;
            if text.len() < start + len + 2 {
                return None;
            }
            parts.push(text[start..start + len].to_string());
            pos = start + len + 2;
        }
        Some((parts, pos))
    }

    /// Minimal RESP server: PING gets PONG, anything else gets OK.
    /// With `hang_up_after_ping`, the socket is closed right after the first PONG.
    async fn serve_fake_redis(mut socket: TcpStream, hang_up_after_ping: bool) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            while let Some((parts, used)) = parse_command(&buf) {
                buf.drain(..used);
                let is_ping = parts
                    .first()
                    .is_some_and(|name| name.eq_ignore_ascii_case("PING"));
                let reply: &[u8] = if is_ping { b"+PONG\r\n" } else { b"+OK\r\n" };
                if socket.write_all(reply).await.is_err() {
                    return;
                }
                if is_ping && hang_up_after_ping {
                    return;
                }
            }
        }
    }

    #[tokio::test]
    async fn test_lost_connection_is_discarded_and_reopened() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            serve_fake_redis(socket, true).await;
            let (socket, _) = listener.accept().await.unwrap();
            serve_fake_redis(socket, false).await;
        });

        let store = RedisStore::open(&format!("redis://{}/", addr)).unwrap();

        store.ping().await.unwrap();
        assert!(store.conn.lock().await.is_some(), "Connection should be cached");

        // The server hung up after answering the ping
        let result = tokio::time::timeout(Duration::from_secs(5), store.get("cart:1"))
            .await
            .expect("get should fail, not hang, on a closed connection");
        assert!(matches!(result, Err(CacheError::Transport(_))));
        assert!(
            store.conn.lock().await.is_none(),
            "Failed connection should be discarded"
        );

        // Next call opens a fresh connection
        store.ping().await.unwrap();
        assert!(store.conn.lock().await.is_some());

        store.close().await;
        assert!(store.conn.lock().await.is_none());
        server.abort();
    }

    #[test]
    fn test_parse_command() {
        let (parts, used) = parse_command(b"*2\r\n$3\r\nGET\r\n$6\r\ncart:1\r\n").unwrap();
        assert_eq!(parts, vec!["GET", "cart:1"]);
        assert_eq!(used, 25);
        assert!(parse_command(b"*2\r\n$3\r\nGET\r\n$6\r\ncar").is_none());
    }
}
