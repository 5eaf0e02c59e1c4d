//! Collaborators used when the level runs without a game engine.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use survivor_core::{
    ChestBlueprint, CurrencyError, CurrencyStore, EntityHandle, EntityManager, GemKind,
    LevelOutcome, LevelReport, LevelStats, LoadedLevel, MonsterKind, SpawnRequest,
};

/// Counts spawns instead of creating entities.
#[derive(Debug, Default)]
pub(crate) struct HeadlessEntities {
    next_handle: u64,
    monsters: u64,
    chests: u32,
}

impl HeadlessEntities {
    /// Chests spawned since the level was prepared.
    pub(crate) const fn chests(&self) -> u32 {
        self.chests
    }

    /// Monsters alive or dead spawned since the level was prepared.
    pub(crate) const fn monsters(&self) -> u64 {
        self.monsters
    }
}

impl EntityManager for HeadlessEntities {
    fn prepare(&mut self, level: &LoadedLevel) {
        self.monsters = 0;
        self.chests = 0;
        log::debug!(
            "preparing `{}` on background `{}`",
            level.name(),
            level.blueprint().background_texture
        );
    }

    fn spawn_monster(&mut self, request: &SpawnRequest) -> EntityHandle {
        self.next_handle += 1;
        self.monsters += 1;
        let handle = EntityHandle::new(self.next_handle);
        if let MonsterKind::Boss(boss) = request.kind {
            log::info!("boss {} entered with {:.0} hp", boss.get(), request.hp);
        }
        handle
    }

    fn spawn_chest(&mut self, chest: &ChestBlueprint) {
        self.chests += 1;
        log::trace!("chest `{}` dropped", chest.name);
    }

    fn spawn_gem_cluster(&mut self, count: u32, gem: GemKind) {
        log::debug!("scattered {count} {gem:?} gems");
    }
}

/// Prints the end-of-level summary to standard output.
#[derive(Debug, Default)]
pub(crate) struct ConsoleReport;

impl LevelReport for ConsoleReport {
    fn open(&mut self, outcome: LevelOutcome, stats: &LevelStats) {
        let verdict = if outcome.is_won() {
            "level passed"
        } else {
            "level failed"
        };
        println!(
            "{verdict} after {:.1}s: {} coins, {} kills, {} regular spawns, {} bosses, {} escorts, {} chests",
            stats.time_survived.as_secs_f32(),
            stats.coins_gained,
            stats.monsters_killed,
            stats.regular_spawns,
            stats.bosses_spawned,
            stats.escorts_spawned,
            stats.chests_spawned
        );
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CoinFile {
    coins: u64,
}

/// Coin total persisted as a small JSON document.
///
/// A missing file counts as zero coins.
#[derive(Debug)]
pub(crate) struct JsonCoinStore {
    path: PathBuf,
}

impl JsonCoinStore {
    /// Creates a store backed by `path`.
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl CurrencyStore for JsonCoinStore {
    fn coins(&self) -> Result<u64, CurrencyError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(unavailable(&self.path, &error)),
        };
        let file: CoinFile = serde_json::from_str(&contents).map_err(|error| {
            CurrencyError::Corrupt(format!("{}: {error}", self.path.display()))
        })?;
        Ok(file.coins)
    }

    fn set_coins(&mut self, total: u64) -> Result<(), CurrencyError> {
        let json = serde_json::to_string_pretty(&CoinFile { coins: total })
            .map_err(|error| CurrencyError::Corrupt(error.to_string()))?;
        fs::write(&self.path, json).map_err(|error| unavailable(&self.path, &error))
    }
}

fn unavailable(path: &Path, error: &io::Error) -> CurrencyError {
    CurrencyError::Unavailable(format!("{}: {error}", path.display()))
}
