//! Standalone scene host.
//!
//! Usage:
//!   cargo run -p stardeck_client -- [--addr 127.0.0.1:40000] [--map assets/backgrounds/lobby.json]
//!
//! Connects to the relay, runs the lobby scene headlessly at ~60 Hz, and
//! follows the scene-exit directive once the relay approves progress.

use std::env;
use std::time::Duration;

use anyhow::Context;
use stardeck_client::input::Buttons;
use stardeck_client::scene::{LobbyScene, ScenePhase};
use stardeck_shared::config::SceneConfig;
use stardeck_shared::proto::ServerEvent;
use stardeck_shared::relay::RelayConn;
use stardeck_shared::stage::RecordingStage;
use stardeck_shared::tilemap::TileMap;
use tracing::info;

fn parse_args() -> SceneConfig {
    let mut cfg = SceneConfig::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--addr" if i + 1 < args.len() => {
                cfg.relay_addr = args[i + 1].clone();
                i += 2;
            }
            "--map" if i + 1 < args.len() => {
                cfg.map_path = args[i + 1].clone();
                i += 2;
            }
            _ => i += 1,
        }
    }
    cfg
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = parse_args();
    info!(relay = %cfg.relay_addr, map = %cfg.map_path, "Starting lobby scene");

    let map_def = TileMap::load(&cfg.map_path).context("load lobby map")?;
    let addr: std::net::SocketAddr = cfg.relay_addr.parse().context("parse relay_addr")?;
    let mut relay = RelayConn::connect(addr).await.context("connect")?;

    // Headless stage; a rendering backend slots in here.
    let mut stage = RecordingStage::new();
    let mut scene = LobbyScene::new(cfg.clone());
    scene.preload(&mut stage);

    let frame = Duration::from_millis(16);
    let mut created = false;

    loop {
        // Queued deliveries dispatch between frames, in arrival order.
        while let Some(ev) = relay
            .recv_timeout::<ServerEvent>(Duration::from_millis(1))
            .await?
        {
            scene.handle_event(&mut stage, ev);
        }

        if !created && scene.session_id().is_some() {
            scene.create(&mut stage, &map_def);
            created = true;
        }

        if created {
            // Keyboard sampling would come from a windowing host; headless
            // players stand idle.
            scene.update(&mut stage, Buttons::empty());
        }

        for ev in scene.drain_outbox() {
            relay.send(&ev).await?;
        }

        if scene.phase() == ScenePhase::Fading {
            tokio::time::sleep(Duration::from_millis(cfg.fade_ms)).await;
            scene.fade_complete();
        }

        if let Some(exit) = scene.take_exit() {
            info!(next = %exit.next_scene, "Scene finished, handing off");
            relay.disconnect().await?;
            break;
        }

        tokio::time::sleep(frame).await;
    }

    Ok(())
}
