//! End-to-end tests against a local LiveReload-style WebSocket server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow, ensure};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use livereload_tab::{
    ConnectionState, Indicator, IndicatorState, PROTOCOL_OFFICIAL_7, ReloadOptions, TabHost,
    TabId, TabInfo, TabManager,
};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, PartialEq)]
enum HostCall {
    Indicator(TabId, IndicatorState),
    Reload(TabId, bool),
}

struct ChannelHost(mpsc::UnboundedSender<HostCall>);

impl TabHost for ChannelHost {
    fn set_indicator(&self, tab_id: TabId, indicator: &Indicator) {
        let _ = self.0.send(HostCall::Indicator(tab_id, indicator.state));
    }

    fn reload(&self, tab_id: TabId, options: ReloadOptions) {
        let _ = self.0.send(HostCall::Reload(tab_id, options.bypass_cache));
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("livereload_tab=debug"))
        .with_test_writer()
        .try_init();
}

async fn next_call(rx: &mut mpsc::UnboundedReceiver<HostCall>) -> anyhow::Result<HostCall> {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .context("timed out waiting for host call")?
        .ok_or_else(|| anyhow!("host dropped"))
}

fn manager_for(port: u16) -> anyhow::Result<(TabManager, mpsc::UnboundedReceiver<HostCall>)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let manager = TabManager::builder()
        .host(Arc::new(ChannelHost(tx)))
        .port(port)
        .build()?;
    Ok((manager, rx))
}

fn tab() -> TabInfo {
    TabInfo::new(1, "http://127.0.0.1:8080/index.html")
}

async fn accept(listener: TcpListener) -> anyhow::Result<WebSocketStream<TcpStream>> {
    let (stream, _) = listener.accept().await?;
    Ok(tokio_tungstenite::accept_async(stream).await?)
}

async fn expect_hello(ws: &mut WebSocketStream<TcpStream>) -> anyhow::Result<()> {
    let frame = ws.next().await.ok_or_else(|| anyhow!("no hello"))??;
    let hello: Value = serde_json::from_str(frame.to_text()?)?;
    ensure!(hello["command"] == "hello", "unexpected frame: {hello}");
    ensure!(
        hello["protocols"] == json!([PROTOCOL_OFFICIAL_7]),
        "unexpected protocols: {hello}"
    );
    Ok(())
}

async fn send_json(ws: &mut WebSocketStream<TcpStream>, value: Value) -> anyhow::Result<()> {
    ws.send(WsMessage::Text(value.to_string().into())).await?;
    Ok(())
}

fn hello_reply() -> Value {
    json!({
        "command": "hello",
        "protocols": [PROTOCOL_OFFICIAL_7],
        "serverName": "test-server",
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_handshake_reload_and_remote_close() -> anyhow::Result<()> {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let (close_tx, close_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await?;
        expect_hello(&mut ws).await?;
        send_json(&mut ws, hello_reply()).await?;
        send_json(&mut ws, json!({ "command": "reload", "path": "x.css", "liveCSS": true }))
            .await?;
        let _ = close_rx.await;
        ws.close(None).await?;
        Ok::<_, anyhow::Error>(())
    });

    let (manager, mut rx) = manager_for(port)?;
    let connector = manager.toggle(&tab()).context("no connector")?;
    assert_eq!(
        connector.target().as_str(),
        format!("ws://127.0.0.1:{port}/livereload")
    );

    let id = TabId::new(1);
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Connecting)
    );
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Connected)
    );
    assert_eq!(next_call(&mut rx).await?, HostCall::Reload(id, false));

    let _ = close_tx.send(());
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Disconnected)
    );
    assert_eq!(connector.state(), ConnectionState::Disconnected);
    assert_eq!(manager.len(), 1);

    server.await??;
    Ok(())
}

#[tokio::test]
async fn test_invalid_handshake_then_valid() -> anyhow::Result<()> {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await?;
        expect_hello(&mut ws).await?;
        ws.send(WsMessage::Text("not json".into())).await?;
        send_json(&mut ws, json!({ "command": "hello", "protocols": ["other"] })).await?;
        send_json(&mut ws, json!({ "command": "reload", "path": "early.css" })).await?;
        send_json(&mut ws, hello_reply()).await?;
        send_json(&mut ws, json!({ "command": "reload", "path": "late.css" })).await?;
        // Hold the socket open until the client goes away.
        while let Some(Ok(_)) = ws.next().await {}
        Ok::<_, anyhow::Error>(())
    });

    let (manager, mut rx) = manager_for(port)?;
    manager.toggle(&tab()).context("no connector")?;

    let id = TabId::new(1);
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Connecting)
    );
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Connected)
    );
    assert_eq!(next_call(&mut rx).await?, HostCall::Reload(id, false));

    assert!(manager.tab_removed(id));
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Disconnected)
    );
    assert!(rx.try_recv().is_err());

    server.await??;
    Ok(())
}

#[tokio::test]
async fn test_toggle_off_closes_socket() -> anyhow::Result<()> {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let (closed_tx, closed_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let mut ws = accept(listener).await?;
        expect_hello(&mut ws).await?;
        send_json(&mut ws, hello_reply()).await?;
        loop {
            match ws.next().await {
                Some(Ok(WsMessage::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            }
        }
        let _ = closed_tx.send(());
        Ok::<_, anyhow::Error>(())
    });

    let (manager, mut rx) = manager_for(port)?;
    let connector = manager.toggle(&tab()).context("no connector")?;
    let id = TabId::new(1);
    next_call(&mut rx).await?;
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Connected)
    );

    let again = manager.toggle(&tab()).context("no connector")?;
    assert!(again.same_as(&connector));
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Disconnected)
    );

    timeout(Duration::from_secs(5), closed_rx)
        .await
        .context("server never saw the close")??;
    server.await??;
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_reports_disconnected() -> anyhow::Result<()> {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let (manager, mut rx) = manager_for(port)?;
    let connector = manager.toggle(&tab()).context("no connector")?;

    let id = TabId::new(1);
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Connecting)
    );
    assert_eq!(
        next_call(&mut rx).await?,
        HostCall::Indicator(id, IndicatorState::Disconnected)
    );
    assert_eq!(connector.state(), ConnectionState::Disconnected);
    assert_eq!(manager.len(), 1);
    Ok(())
}
