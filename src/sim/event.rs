/// Events emitted during a simulation step or a screen transition.
/// The presentation layer consumes these for sound and logging.

#[allow(dead_code)]
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemySpawned { level: u32 },
    EnemyFired,
    WaterFired,
    EnemyDamaged { health_left: u32 },
    EnemyDestroyed { score: u32 },
    PlayerHit { lives_left: u32 },
    LevelUp { level: u32 },
    GameOver { score: u32, high_score: u32 },
}
