//! Socket-level tests for the relay channel.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use stardeck_shared::anim::AnimId;
use stardeck_shared::proto::{
    decode_event, encode_event, ClientEvent, PlayerSnapshot, ServerEvent, SessionId,
};
use stardeck_shared::relay::{RelayConn, RelayListener};

/// Unit-style test: both event directions round-trip through the codec.
#[test]
fn events_roundtrip_bytes() -> anyhow::Result<()> {
    let out = ClientEvent::go_to_next_scene();
    assert_eq!(decode_event::<ClientEvent>(&encode_event(&out)?)?, out);

    let inbound = ServerEvent::FirstPlayer(true);
    assert_eq!(decode_event::<ServerEvent>(&encode_event(&inbound)?)?, inbound);

    let disconnect = ServerEvent::PlayerDisconnected("peer-3".into());
    assert_eq!(
        decode_event::<ServerEvent>(&encode_event(&disconnect)?)?,
        disconnect
    );

    Ok(())
}

/// Full integration: a listener plays the relay, the client connects, and
/// events flow both ways over real sockets.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_relay_full_roundtrip() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let bind = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
    let listener = RelayListener::bind(bind).await?;
    let addr = listener.local_addr()?;

    // The relay side: greet, then echo the first snapshot back as an
    // all-players update stamped with another session's id.
    let relay_side = tokio::spawn(async move {
        let (mut conn, _peer) = listener.accept().await?;
        conn.send(&ServerEvent::Connect {
            id: "session-1".into(),
        })
        .await?;
        conn.send(&ServerEvent::InitialCoordinates { x: 100.0, y: 80.0 })
            .await?;

        let ev: ClientEvent = conn.recv().await?;
        let ClientEvent::UpdatePlayers(mut snap) = ev else {
            anyhow::bail!("expected a snapshot, got {ev:?}");
        };
        snap.id = Some(SessionId::from("ghost-7"));
        conn.send(&ServerEvent::UpdatePlayers(vec![snap])).await?;
        Ok::<_, anyhow::Error>(())
    });

    let mut client = RelayConn::connect(addr).await?;

    let hello: ServerEvent = client.recv().await?;
    assert_eq!(
        hello,
        ServerEvent::Connect {
            id: "session-1".into()
        }
    );
    let coords: ServerEvent = client.recv().await?;
    assert_eq!(coords, ServerEvent::InitialCoordinates { x: 100.0, y: 80.0 });

    client
        .send(&ClientEvent::UpdatePlayers(PlayerSnapshot {
            id: None,
            posx: 100.0,
            posy: 80.0,
            velocityx: 1.2,
            velocityy: 0.0,
            animation: Some(AnimId::MoveX),
            key: Some(AnimId::MoveX),
        }))
        .await?;

    let update = client
        .recv_timeout::<ServerEvent>(Duration::from_secs(2))
        .await?;
    match update {
        Some(ServerEvent::UpdatePlayers(players)) => {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].id, Some("ghost-7".into()));
            assert_eq!(players[0].key, Some(AnimId::MoveX));
        }
        other => panic!("expected an all-players update, got {other:?}"),
    }

    relay_side.await??;
    client.disconnect().await?;
    Ok(())
}
