use crate::*;
use serde_json::{Value, json};

/// Current save format revision.
pub const SAVE_VERSION: u64 = 2;
/// Oldest revision the decoder still understands. Version 1 predates the
/// movement fields; they decode to defaults (forward default-filling only,
/// no downgrade path).
pub const OLDEST_SAVE_VERSION: u64 = 1;
/// Overlay entries beyond this cap are dropped, in first-write order, to
/// bound blob size.
pub const OVERLAY_CAP: usize = 10_000;

/// Ephemeral, versioned transfer shape of a full world snapshot. Constructed
/// on demand for persistence and discarded after decode.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveBlob {
    pub version: u64,
    pub player_cell: Cell,
    pub held: Token,
    pub goal: u64,
    pub overlay: Vec<(Cell, Token)>,
    pub movement_mode: MovementMode,
    pub follow_enabled: bool,
    pub last_sample: Option<GeoSample>,
}

impl SaveBlob {
    /// Projects the current world state into the transfer shape.
    pub fn capture<G: TokenGenerator>(world: &GameWorld<G>) -> Self {
        if world.overlay.len() > OVERLAY_CAP {
            log::warn!(
                "overlay has {} entries, saving only the first {}",
                world.overlay.len(),
                OVERLAY_CAP
            );
        }
        Self {
            version: SAVE_VERSION,
            player_cell: world.player_cell(),
            held: world.held(),
            goal: world.goal(),
            overlay: world.overlay.entries_in_order().take(OVERLAY_CAP).collect(),
            movement_mode: world.movement_mode(),
            follow_enabled: world.follow_enabled(),
            last_sample: world.last_sample(),
        }
    }

    pub fn to_json(&self) -> String {
        let overlay: Vec<Value> = self
            .overlay
            .iter()
            .map(|&((row, col), token)| json!([row, col, token.value()]))
            .collect();
        json!({
            "version": self.version,
            "playerCell": [self.player_cell.0, self.player_cell.1],
            "heldToken": self.held.value(),
            "goal": self.goal,
            "overlay": overlay,
            "movementMode": self.movement_mode.as_str(),
            "followEnabled": self.follow_enabled,
            "lastSample": self.last_sample.map(|s| json!({
                "lat": s.lat,
                "lng": s.lng,
                "accuracy": s.accuracy,
            })),
        })
        .to_string()
    }

    /// Decodes a blob, defensively.
    ///
    /// An unparseable blob or an unrecognized/missing version rejects the
    /// whole thing (the caller treats that as "no save"). For recognized
    /// versions every field is populated individually, substituting the
    /// pre-load default from `config` for anything absent or of the wrong
    /// shape. Compound fields are all-or-nothing: a player-cell pair missing
    /// one coordinate falls back entirely rather than mixing old and new.
    /// Decoding the same text twice yields identical blobs.
    pub fn from_json(text: &str, config: &GameConfig) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            log::warn!("save blob is not JSON: {}", err);
            SaveError::Malformed
        })?;
        let obj = value.as_object().ok_or(SaveError::Malformed)?;

        let version = obj
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(SaveError::MissingVersion)?;
        if !(OLDEST_SAVE_VERSION..=SAVE_VERSION).contains(&version) {
            return Err(SaveError::UnknownVersion(version));
        }

        let overlay: Vec<(Cell, Token)> = obj
            .get("overlay")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(overlay_entry_from)
                    .take(OVERLAY_CAP)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            version,
            player_cell: obj
                .get("playerCell")
                .and_then(cell_from)
                .unwrap_or(START_CELL),
            held: Token::from_value(
                obj.get("heldToken")
                    .and_then(Value::as_u64)
                    .filter(|&v| v > 0),
            ),
            goal: obj
                .get("goal")
                .and_then(Value::as_u64)
                .filter(|&g| g >= 2)
                .unwrap_or(config.goal),
            overlay,
            // version-1 blobs simply lack the fields below; the same default
            // filling covers both a v1 blob and a damaged v2 one
            movement_mode: obj
                .get("movementMode")
                .and_then(Value::as_str)
                .and_then(MovementMode::parse)
                .unwrap_or_default(),
            follow_enabled: obj
                .get("followEnabled")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            last_sample: obj.get("lastSample").and_then(sample_from),
        })
    }

    /// Builds a fresh world carrying this blob's state. Infallible: all
    /// tolerance decisions were made in [`SaveBlob::from_json`].
    pub fn restore(&self, config: GameConfig) -> GameWorld {
        let mut config = config;
        config.goal = self.goal;
        let mut world = GameWorld::new(config);
        world.player_cell = self.player_cell;
        world.held = self.held;
        world.mode = self.movement_mode;
        world.follow_enabled = self.follow_enabled;
        world.last_sample = self.last_sample;
        for &(cell, token) in &self.overlay {
            world.overlay.set(cell, token);
        }
        world
    }
}

fn cell_from(value: &Value) -> Option<Cell> {
    match value.as_array()?.as_slice() {
        [row, col] => Some((row.as_i64()?, col.as_i64()?)),
        _ => None,
    }
}

fn overlay_entry_from(value: &Value) -> Option<(Cell, Token)> {
    match value.as_array()?.as_slice() {
        [row, col, token] => {
            let cell = (row.as_i64()?, col.as_i64()?);
            let token = if token.is_null() {
                Token::Empty
            } else {
                Token::Value(token.as_u64().filter(|&v| v > 0)?)
            };
            Some((cell, token))
        }
        _ => None,
    }
}

fn sample_from(value: &Value) -> Option<GeoSample> {
    let obj = value.as_object()?;
    Some(GeoSample {
        lat: finite(obj.get("lat")?)?,
        lng: finite(obj.get("lng")?)?,
        accuracy: finite(obj.get("accuracy")?)?,
    })
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_world() -> GameWorld {
        let mut world = GameWorld::new(GameConfig::default());
        // drive state only through the engine surface
        world.step(1, 0);
        world.step(0, 1);
        let mut cell = None;
        'search: for row in -5..5 {
            for col in -5..5 {
                if !world.token_at((row, col)).is_empty() && world.in_range((row, col)) {
                    cell = Some((row, col));
                    break 'search;
                }
            }
        }
        let cell = cell.expect("default generator should populate some nearby cell");
        assert!(world.click_cell(cell).has_update());
        world.set_movement_mode(MovementMode::Sampled);
        world.set_follow_enabled(true);
        world.apply_sample(GeoSample {
            lat: 0.001,
            lng: -0.002,
            accuracy: 12.5,
        });
        world
    }

    fn assert_same_state(a: &GameWorld, b: &GameWorld) {
        assert_eq!(a.player_cell(), b.player_cell());
        assert_eq!(a.held(), b.held());
        assert_eq!(a.goal(), b.goal());
        assert_eq!(a.movement_mode(), b.movement_mode());
        assert_eq!(a.follow_enabled(), b.follow_enabled());
        assert_eq!(a.last_sample(), b.last_sample());
        assert_eq!(a.overlay, b.overlay);
    }

    #[test]
    fn encode_decode_round_trips_exactly() {
        let config = GameConfig::default();
        let world = populated_world();

        let json = SaveBlob::capture(&world).to_json();
        let blob = SaveBlob::from_json(&json, &config).unwrap();
        let restored = blob.restore(config);

        assert_same_state(&world, &restored);
    }

    #[test]
    fn decoding_is_idempotent() {
        let config = GameConfig::default();
        let json = SaveBlob::capture(&populated_world()).to_json();
        assert_eq!(
            SaveBlob::from_json(&json, &config).unwrap(),
            SaveBlob::from_json(&json, &config).unwrap()
        );
    }

    #[test]
    fn unknown_version_rejects_the_whole_blob() {
        let config = GameConfig::default();
        assert_eq!(
            SaveBlob::from_json(r#"{"version": 99}"#, &config),
            Err(SaveError::UnknownVersion(99))
        );
        assert_eq!(
            SaveBlob::from_json(r#"{"playerCell": [1, 2]}"#, &config),
            Err(SaveError::MissingVersion)
        );
        assert_eq!(
            SaveBlob::from_json("not json at all", &config),
            Err(SaveError::Malformed)
        );
    }

    #[test]
    fn version_one_blob_defaults_the_newer_fields() {
        let config = GameConfig::default();
        let json = r#"{
            "version": 1,
            "playerCell": [3, -2],
            "heldToken": 8,
            "goal": 64,
            "overlay": [[3, -2, null], [0, 0, 16]]
        }"#;

        let blob = SaveBlob::from_json(json, &config).unwrap();
        assert_eq!(blob.player_cell, (3, -2));
        assert_eq!(blob.held, Token::Value(8));
        assert_eq!(blob.goal, 64);
        assert_eq!(blob.movement_mode, MovementMode::Stepped);
        assert!(!blob.follow_enabled);
        assert_eq!(blob.last_sample, None);

        let world = blob.restore(config);
        assert_eq!(world.goal(), 64);
        assert_eq!(world.token_at((3, -2)), Token::Empty);
        assert_eq!(world.token_at((0, 0)), Token::Value(16));
    }

    #[test]
    fn malformed_fields_fall_back_wholesale() {
        let config = GameConfig::default();
        // playerCell is missing a coordinate: the whole pair falls back, the
        // valid half is never adopted
        let json = r#"{
            "version": 2,
            "playerCell": [7],
            "heldToken": "many",
            "goal": 0,
            "overlay": [[1, 1, 4], [2, "x", 8], [3]],
            "movementMode": "teleport",
            "followEnabled": "yes",
            "lastSample": {"lat": 1.0, "lng": 2.0}
        }"#;

        let blob = SaveBlob::from_json(json, &config).unwrap();
        assert_eq!(blob.player_cell, START_CELL);
        assert_eq!(blob.held, Token::Empty);
        assert_eq!(blob.goal, config.goal);
        assert_eq!(blob.overlay, vec![((1, 1), Token::Value(4))]);
        assert_eq!(blob.movement_mode, MovementMode::Stepped);
        assert!(!blob.follow_enabled);
        assert_eq!(blob.last_sample, None);
    }

    #[test]
    fn decode_preserves_insertion_order() {
        let mut blob = SaveBlob::capture(&GameWorld::new(GameConfig::default()));
        blob.overlay = (0..20).map(|i| ((i, i), Token::Value(2))).collect();
        let json = blob.to_json();

        let decoded = SaveBlob::from_json(&json, &GameConfig::default()).unwrap();
        assert_eq!(decoded.overlay.len(), 20);
        assert_eq!(decoded.overlay.first(), Some(&((0, 0), Token::Value(2))));
        assert_eq!(decoded.overlay.last(), Some(&((19, 19), Token::Value(2))));
    }

    #[test]
    fn capture_caps_oversized_overlays() {
        let mut world = GameWorld::new(GameConfig::default());
        for i in 0..(OVERLAY_CAP as i64 + 10) {
            world.overlay.set((i, 0), Token::Empty);
        }
        let blob = SaveBlob::capture(&world);
        assert_eq!(blob.overlay.len(), OVERLAY_CAP);
        assert_eq!(blob.overlay.first(), Some(&((0, 0), Token::Empty)));
        assert_eq!(
            blob.overlay.last(),
            Some(&((OVERLAY_CAP as i64 - 1, 0), Token::Empty))
        );
    }

    #[test]
    fn failed_decode_leaves_caller_state_alone() {
        // rejecting a blob returns Err without constructing any world; the
        // in-memory world the caller holds is untouched by construction
        let config = GameConfig::default();
        let world = populated_world();
        let before = world.clone();

        assert!(SaveBlob::from_json(r#"{"version": 42}"#, &config).is_err());
        assert_same_state(&before, &world);
    }
}
