#![allow(dead_code)]

use survivor_core::{
    BossBlueprint, BossId, ChestBlueprint, CurrencyError, CurrencyStore, Curve, EntityHandle,
    EntityManager, EscortWave, GemKind, LevelBlueprint, LevelOutcome, LevelReport, LevelStats,
    LoadedLevel, MonsterKey, MonsterKind, MonsterPool, MonsterVariant, MonsterWeight, PoolId,
    ScriptedEventBlueprint, SpawnRequest, SpawnTableBlueprint, VariantId,
};
use survivor_director::LevelDirector;

pub type Director = LevelDirector<RecordingEntities, RecordingReport, MemoryCurrency>;

#[derive(Debug, Default)]
pub struct RecordingEntities {
    pub prepared: u32,
    pub monsters: Vec<(EntityHandle, SpawnRequest)>,
    pub chests: u32,
    pub gem_clusters: Vec<(u32, GemKind)>,
    next_handle: u64,
}

impl RecordingEntities {
    pub fn bosses(&self) -> Vec<(EntityHandle, BossId)> {
        self.monsters
            .iter()
            .filter_map(|(handle, request)| match request.kind {
                MonsterKind::Boss(boss) => Some((*handle, boss)),
                MonsterKind::Regular(_) => None,
            })
            .collect()
    }

    pub fn count_of(&self, key: MonsterKey) -> usize {
        self.monsters
            .iter()
            .filter(|(_, request)| request.kind == MonsterKind::Regular(key))
            .count()
    }
}

impl EntityManager for RecordingEntities {
    fn prepare(&mut self, _level: &LoadedLevel) {
        self.prepared += 1;
    }

    fn spawn_monster(&mut self, request: &SpawnRequest) -> EntityHandle {
        self.next_handle += 1;
        let handle = EntityHandle::new(self.next_handle);
        self.monsters.push((handle, *request));
        handle
    }

    fn spawn_chest(&mut self, _chest: &ChestBlueprint) {
        self.chests += 1;
    }

    fn spawn_gem_cluster(&mut self, count: u32, gem: GemKind) {
        self.gem_clusters.push((count, gem));
    }
}

#[derive(Debug, Default)]
pub struct RecordingReport {
    pub opened: Vec<(LevelOutcome, LevelStats)>,
}

impl LevelReport for RecordingReport {
    fn open(&mut self, outcome: LevelOutcome, stats: &LevelStats) {
        self.opened.push((outcome, stats.clone()));
    }
}

#[derive(Debug, Default)]
pub struct MemoryCurrency {
    pub total: u64,
    pub writes: u32,
    pub unavailable: bool,
}

impl CurrencyStore for MemoryCurrency {
    fn coins(&self) -> Result<u64, CurrencyError> {
        if self.unavailable {
            return Err(CurrencyError::Unavailable("offline".to_owned()));
        }
        Ok(self.total)
    }

    fn set_coins(&mut self, total: u64) -> Result<(), CurrencyError> {
        if self.unavailable {
            return Err(CurrencyError::Unavailable("offline".to_owned()));
        }
        self.total = total;
        self.writes += 1;
        Ok(())
    }
}

pub fn key(pool: u32, variant: u32) -> MonsterKey {
    MonsterKey::new(PoolId::new(pool), VariantId::new(variant))
}

fn variant(name: &str, hp: f32) -> MonsterVariant {
    MonsterVariant {
        name: name.to_owned(),
        hp,
    }
}

fn boss(name: &str, hp: f32) -> BossBlueprint {
    BossBlueprint {
        name: name.to_owned(),
        hp,
    }
}

/// Ten minute level with two mini-bosses and a final boss at the level end.
pub fn blueprint() -> LevelBlueprint {
    LevelBlueprint {
        name: "graveyard".to_owned(),
        level_duration_secs: 600.0,
        initial_gem_count: 10,
        initial_gem_kind: GemKind::White,
        chest: ChestBlueprint {
            name: "wooden".to_owned(),
        },
        chest_spawn_period_secs: 30.0,
        chest_spawn_amount: 2,
        background_texture: "grass".to_owned(),
        monster_pools: vec![
            MonsterPool {
                name: "melee".to_owned(),
                variants: vec![
                    variant("bat", 5.0),
                    variant("zombie", 12.0),
                    variant("skeleton archer", 8.0),
                ],
            },
            MonsterPool {
                name: "heavy".to_owned(),
                variants: vec![variant("mummy", 40.0)],
            },
        ],
        bosses: vec![
            boss("giant bat", 400.0),
            boss("bone colossus", 900.0),
            boss("reaper", 5_000.0),
        ],
        spawn_table: SpawnTableBlueprint {
            spawn_rate: Curve::constant(1.0),
            hp_multiplier: Curve::from_points(&[(0.0, 1.0), (1.0, 2.0)]),
            monsters: vec![
                MonsterWeight {
                    monster: key(0, 0),
                    weight: Curve::from_points(&[(0.0, 3.0), (1.0, 1.0)]),
                },
                MonsterWeight {
                    monster: key(0, 1),
                    weight: Curve::constant(2.0),
                },
                MonsterWeight {
                    monster: key(1, 0),
                    weight: Curve::from_points(&[(0.0, 0.0), (1.0, 2.0)]),
                },
            ],
        },
        scripted_events: vec![
            ScriptedEventBlueprint {
                name: "first mini boss".to_owned(),
                trigger_secs: 180.0,
                boss: BossId::new(0),
                escorts: Vec::new(),
                final_boss: false,
            },
            ScriptedEventBlueprint {
                name: "second mini boss".to_owned(),
                trigger_secs: 360.0,
                boss: BossId::new(1),
                escorts: vec![EscortWave {
                    monster: key(0, 2),
                    count: 30,
                }],
                final_boss: false,
            },
            ScriptedEventBlueprint {
                name: "final boss".to_owned(),
                trigger_secs: 600.0,
                boss: BossId::new(2),
                escorts: vec![
                    EscortWave {
                        monster: key(0, 2),
                        count: 30,
                    },
                    EscortWave {
                        monster: key(1, 0),
                        count: 15,
                    },
                ],
                final_boss: true,
            },
        ],
        rng_seed: 0x5eed,
    }
}

pub fn director_with(blueprint: LevelBlueprint, currency: MemoryCurrency) -> Director {
    let mut director = LevelDirector::from_blueprint(
        blueprint,
        RecordingEntities::default(),
        RecordingReport::default(),
        currency,
    )
    .expect("test blueprint is valid");
    director.start();
    director
}

pub fn started(blueprint: LevelBlueprint) -> Director {
    director_with(blueprint, MemoryCurrency::default())
}
