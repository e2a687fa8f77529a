/// Sprite assets: text-art glyph blocks loaded once at startup.
///
/// A sprite file is plain UTF-8. Every line is one row of glyphs; trailing
/// blank lines are ignored and spaces are transparent when drawn. Any
/// missing, unreadable or empty sprite is a fatal startup error.

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rows: Vec<Vec<char>>,
    pub width: usize,
}

impl Sprite {
    /// Parse sprite text. Returns `None` when there are no visible glyphs.
    pub fn parse(text: &str) -> Option<Sprite> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|l| l.trim_end().chars().collect())
            .collect();
        while rows.last().map_or(false, |r| r.is_empty()) {
            rows.pop();
        }
        if rows.iter().all(|r| r.iter().all(|c| c.is_whitespace())) {
            return None;
        }
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Some(Sprite { rows, width })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

pub fn load_sprite(path: &Path) -> Result<Sprite> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot load sprite {}", path.display()))?;
    match Sprite::parse(&text) {
        Some(sprite) => Ok(sprite),
        None => bail!("sprite {} is empty", path.display()),
    }
}

/// Every sprite the game draws.
#[derive(Clone, Debug)]
pub struct SpriteSet {
    pub hero: Sprite,
    pub enemy: Sprite,
    pub water: Sprite,
    pub bullet: Sprite,
}

impl SpriteSet {
    pub fn load(dir: &Path) -> Result<Self> {
        let set = SpriteSet {
            hero: load_sprite(&dir.join("hero.txt"))?,
            enemy: load_sprite(&dir.join("enemy.txt"))?,
            water: load_sprite(&dir.join("water.txt"))?,
            bullet: load_sprite(&dir.join("bullet.txt"))?,
        };
        info!("sprites loaded from {}", dir.display());
        Ok(set)
    }
}
