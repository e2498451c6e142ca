//! Lobby scene.
//!
//! One instance per scene activation. The host owns the frame loop and the
//! stage; network deliveries are dispatched through `handle_event` between
//! frames, so no two handlers ever run concurrently. Outbound traffic is
//! collected in an outbox the host drains after each frame.
//!
//! Malformed or missing payload fields were already defaulted at the
//! protocol boundary; anything the scene cannot act on is ignored rather
//! than surfaced.

use stardeck_shared::anim::{AnimId, FRAME_HEIGHT, FRAME_WIDTH, REGISTRY};
use stardeck_shared::config::SceneConfig;
use stardeck_shared::math::Vec2;
use stardeck_shared::proto::{
    ClientEvent, PlayerSnapshot, SceneHandoff, ServerEvent, SessionId, NEXT_SCENE,
};
use stardeck_shared::stage::{SpriteBody, SpriteId, Stage};
use stardeck_shared::tilemap::TileMap;
use tracing::{debug, info, warn};

use crate::input::Buttons;
use crate::map;
use crate::player::{ControlAction, Controller};
use crate::reconcile::RemoteRoster;
use crate::snapshot::SnapshotPolicy;

/// Overlay label on the transition affordance.
const START_BUTTON_LABEL: &str = "Ready?";

/// How far each already-present remote shifts the local spawn point.
const SPAWN_CROWD_OFFSET: f32 = 30.0;

/// Where the scene is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Waiting for bootstrap events; `create` has not run.
    Boot,
    /// Frame loop active.
    Running,
    /// Progress approved; camera fading out.
    Fading,
    /// Exit produced; the host should start the next scene.
    Finished,
}

/// What the host needs to start the next scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneExit {
    pub next_scene: String,
    pub handoff: SceneHandoff,
}

pub struct LobbyScene {
    cfg: SceneConfig,
    phase: ScenePhase,

    // Session bootstrap: assigned once by the relay, read for the lifetime
    // of the scene.
    session_id: Option<SessionId>,
    player_number: Option<u32>,
    spawn: Option<Vec2>,
    first_player: bool,
    progress_requested: bool,

    player: Option<SpriteId>,
    controller: Controller,
    policy: SnapshotPolicy,
    roster: RemoteRoster,

    updates_subscribed: bool,
    pending_handoff: Option<SceneHandoff>,
    outbox: Vec<ClientEvent>,
    exit: Option<SceneExit>,
}

impl LobbyScene {
    pub fn new(cfg: SceneConfig) -> Self {
        let controller = Controller::new(cfg.move_speed);
        let policy = SnapshotPolicy::new(cfg.snapshot_heartbeat);
        Self {
            cfg,
            phase: ScenePhase::Boot,
            session_id: None,
            player_number: None,
            spawn: None,
            first_player: false,
            progress_requested: false,
            player: None,
            controller,
            policy,
            roster: RemoteRoster::new(),
            updates_subscribed: false,
            pending_handoff: None,
            outbox: Vec::new(),
            exit: None,
        }
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn player_sprite(&self) -> Option<SpriteId> {
        self.player
    }

    pub fn remote_count(&self) -> usize {
        self.roster.len()
    }

    pub fn remote_sprite(&self, id: &SessionId) -> Option<SpriteId> {
        self.roster.sprite(id)
    }

    /// Queues the assets this scene renders with.
    pub fn preload(&self, stage: &mut dyn Stage) {
        stage.load_spritesheet(
            &self.cfg.player_texture,
            &self.cfg.player_sheet,
            FRAME_WIDTH,
            FRAME_HEIGHT,
        );
        stage.load_tilemap(&self.cfg.map_key, &self.cfg.map_path);
        stage.load_image(&self.cfg.tileset_name, &self.cfg.tileset_image);
        stage.load_image("healthbar", &self.cfg.icon_image);
    }

    /// Materializes the map, registers the animation table, and spawns the
    /// local player. From here on snapshot deliveries drive the roster.
    pub fn create(&mut self, stage: &mut dyn Stage, map_def: &TileMap) {
        map::build_map(stage, map_def, &self.cfg);
        for spec in &REGISTRY {
            stage.register_animation(spec);
        }

        let spawn = self.spawn.unwrap_or(Vec2::new(
            self.cfg.canvas_width / 2.0,
            self.cfg.canvas_height / 2.0,
        ));
        // Late joiners shift right so players don't stack on the spawn tile.
        let spawn = Vec2::new(
            spawn.x + self.roster.len() as f32 * SPAWN_CROWD_OFFSET,
            spawn.y,
        );
        let player = stage.spawn_sprite(&self.cfg.player_texture, spawn);
        stage.configure_body(player, &SpriteBody::PLAYER);
        stage.camera_set_bounds(self.cfg.canvas_width, self.cfg.canvas_height);
        stage.camera_follow(player);
        stage.camera_zoom(self.cfg.camera_zoom);

        self.player = Some(player);
        self.updates_subscribed = true;
        self.phase = ScenePhase::Running;
        info!(x = spawn.x, y = spawn.y, "Scene created");
    }

    /// Dispatches one relay delivery. Bootstrap fields are write-once.
    pub fn handle_event(&mut self, stage: &mut dyn Stage, ev: ServerEvent) {
        match ev {
            ServerEvent::Connect { id } => {
                if self.session_id.is_none() {
                    info!(session = %id, "Session established");
                    self.session_id = Some(id);
                }
            }
            ServerEvent::InitialCoordinates { x, y } => {
                if self.spawn.is_none() {
                    self.spawn = Some(Vec2::new(x, y));
                }
            }
            ServerEvent::FirstPlayer(first) => {
                if first && !self.first_player {
                    self.first_player = true;
                    stage.show_start_button(START_BUTTON_LABEL);
                }
            }
            ServerEvent::PlayerNumber(number) => {
                if self.player_number.is_none() {
                    self.player_number = Some(number);
                }
            }
            ServerEvent::UpdatePlayers(players) => {
                if self.updates_subscribed {
                    self.roster.apply_update(
                        stage,
                        self.session_id.as_ref(),
                        &players,
                        &self.cfg.player_texture,
                        &SpriteBody::PLAYER,
                    );
                }
            }
            ServerEvent::PlayerDisconnected(id) => {
                self.roster.apply_disconnect(stage, &id);
            }
            ServerEvent::GoToDesert(mut handoff) => {
                if self.phase == ScenePhase::Fading || self.phase == ScenePhase::Finished {
                    debug!("Duplicate progress approval ignored");
                    return;
                }
                handoff.socket_id = self.session_id.clone();
                handoff.my_number = self.player_number;
                self.pending_handoff = Some(handoff);
                self.updates_subscribed = false;
                stage.camera_fade_out(self.cfg.fade_ms);
                self.phase = ScenePhase::Fading;
                info!("Progress approved, fading out");
            }
        }
    }

    /// Runs one frame of local-player logic.
    pub fn update(&mut self, stage: &mut dyn Stage, buttons: Buttons) {
        let Some(player) = self.player else {
            return;
        };
        if self.phase == ScenePhase::Finished {
            return;
        }

        match self.controller.tick(buttons) {
            ControlAction::Suspended => {}
            ControlAction::Knockdown => {
                stage.set_velocity(player, Vec2::ZERO);
                stage.play_once(player, AnimId::Dead);
                stage.set_frozen(player, true);
                let pos = stage.position(player);
                // The terminal snapshot carries no category key and bypasses
                // the rate policy; it is the last one this entity sends.
                self.outbox.push(ClientEvent::UpdatePlayers(PlayerSnapshot {
                    id: None,
                    posx: pos.x,
                    posy: pos.y,
                    velocityx: 0.0,
                    velocityy: 0.0,
                    animation: Some(AnimId::Dead),
                    key: None,
                }));
                info!("Local player knocked down");
            }
            ControlAction::Move {
                velocity,
                anim,
                flip,
            } => {
                if let Some(flip) = flip {
                    stage.set_flip_x(player, flip);
                }
                stage.play_looping(player, anim);
                stage.set_velocity(player, velocity);
                let pos = stage.position(player);
                let snap = PlayerSnapshot {
                    id: None,
                    posx: pos.x,
                    posy: pos.y,
                    velocityx: velocity.x,
                    velocityy: velocity.y,
                    animation: Some(anim),
                    key: Some(anim),
                };
                if let Some(snap) = self.policy.offer(snap) {
                    self.outbox.push(ClientEvent::UpdatePlayers(snap));
                }
            }
        }
    }

    /// Activation of the transition affordance. Only the session the relay
    /// designated first may request progress, and only once.
    pub fn start_pressed(&mut self) {
        if !self.first_player {
            warn!("Start pressed without first-player designation, ignored");
            return;
        }
        if self.progress_requested {
            return;
        }
        self.progress_requested = true;
        self.outbox.push(ClientEvent::go_to_next_scene());
    }

    /// Called by the host when the camera fade has run its course.
    pub fn fade_complete(&mut self) {
        if self.phase != ScenePhase::Fading {
            return;
        }
        let Some(handoff) = self.pending_handoff.take() else {
            return;
        };
        self.exit = Some(SceneExit {
            next_scene: NEXT_SCENE.to_string(),
            handoff,
        });
        self.phase = ScenePhase::Finished;
    }

    /// Outbound events produced since the last drain, FIFO.
    pub fn drain_outbox(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// The exit directive, once the fade has completed.
    pub fn take_exit(&mut self) -> Option<SceneExit> {
        self.exit.take()
    }
}
