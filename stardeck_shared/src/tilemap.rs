//! Tile-map loader.
//!
//! Parses the Tiled JSON export the lobby map ships as. Only the pieces the
//! scene needs are modeled: layer grids, tileset gid ranges, and per-tile
//! boolean properties (the wall flag). Unknown fields are ignored.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::stage::TileBody;

/// A parsed tile map.
#[derive(Debug, Clone, Deserialize)]
pub struct TileMap {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<TileLayer>,
    #[serde(default)]
    pub tilesets: Vec<TileSet>,
}

/// One layer: a row-major grid of global tile ids, 0 meaning empty.
#[derive(Debug, Clone, Deserialize)]
pub struct TileLayer {
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub data: Vec<u32>,
}

/// One tileset and its per-tile properties.
#[derive(Debug, Clone, Deserialize)]
pub struct TileSet {
    pub name: String,
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileDef {
    pub id: u32,
    #[serde(default)]
    pub properties: Vec<TileProperty>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileProperty {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl TileMap {
    /// Parses a map from its JSON text.
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("parse tile map json")
    }

    /// Loads a map file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("open {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("load map {}", path.display()))
    }

    pub fn tileset(&self, name: &str) -> Option<&TileSet> {
        self.tilesets.iter().find(|t| t.name == name)
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

impl TileSet {
    /// Global ids of tiles whose boolean `property` is true.
    pub fn flagged_gids(&self, property: &str) -> HashSet<u32> {
        self.tiles
            .iter()
            .filter(|tile| {
                tile.properties
                    .iter()
                    .any(|p| p.name == property && p.value == serde_json::Value::Bool(true))
            })
            .map(|tile| self.first_gid + tile.id)
            .collect()
    }
}

impl TileLayer {
    /// World-space collision rectangles for every cell holding one of `gids`.
    pub fn bodies_for(&self, gids: &HashSet<u32>, tile_w: u32, tile_h: u32) -> Vec<TileBody> {
        if self.width == 0 {
            return Vec::new();
        }
        self.data
            .iter()
            .enumerate()
            .filter(|(_, gid)| gids.contains(gid))
            .map(|(i, _)| {
                let col = (i as u32) % self.width;
                let row = (i as u32) / self.width;
                TileBody {
                    x: (col * tile_w) as f32,
                    y: (row * tile_h) as f32,
                    w: tile_w as f32,
                    h: tile_h as f32,
                }
            })
            .collect()
    }
}
