//! Pluggable bird looks. Nothing here affects physics; the renderer asks the
//! active provider for a face each frame and falls back to the drawn bird.
//!
//! Faces are JSON documents with a palette and character rows:
//!
//! ```json
//! { "palette": { "y": "#f5c842", "k": "#141414" },
//!   "rows": [".yyy.", "yykyy", "yyyyy", ".yyy."] }
//! ```
//!
//! `.` and space are transparent.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::render::Rgb;

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Option<Rgb>>,
}

#[derive(Deserialize)]
struct SpriteFile {
    palette: HashMap<char, String>,
    rows: Vec<String>,
}

impl Sprite {
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let bad = |reason: String| Error::Sprite {
            path: path.to_path_buf(),
            reason,
        };
        let file: SpriteFile = serde_json::from_str(text).map_err(|e| bad(e.to_string()))?;

        let mut palette = HashMap::with_capacity(file.palette.len());
        for (key, hex) in &file.palette {
            let color = Rgb::from_hex(hex).ok_or_else(|| bad(format!("bad color {hex:?}")))?;
            palette.insert(*key, color);
        }

        let height = file.rows.len();
        let width = file.rows.first().map_or(0, |r| r.chars().count());
        if width == 0 {
            return Err(bad("sprite has no pixels".into()));
        }

        let mut pixels = Vec::with_capacity(width * height);
        for (y, row) in file.rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(bad(format!("row {y} is not {width} pixels wide")));
            }
            for ch in row.chars() {
                let px = match ch {
                    '.' | ' ' => None,
                    _ => Some(
                        *palette
                            .get(&ch)
                            .ok_or_else(|| bad(format!("row {y} uses {ch:?} which is not in the palette")))?,
                    ),
                };
                pixels.push(px);
            }
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(path, &text)
    }

    /// `None` for transparent or out-of-range pixels.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[y * self.width + x]
    }
}

pub trait BirdAppearance {
    /// Called once per frame before drawing.
    fn refresh(&mut self, _frame: u64) {}

    /// The face to draw in place of the default bird.
    fn face(&self) -> Option<&Sprite>;

    /// A short user-facing message, handed out once.
    fn take_notice(&mut self) -> Option<String> {
        None
    }
}

/// The built-in drawn bird.
pub struct DefaultBird;

impl BirdAppearance for DefaultBird {
    fn face(&self) -> Option<&Sprite> {
        None
    }
}

/// A face picked once at startup.
pub struct FaceFile {
    sprite: Sprite,
}

impl FaceFile {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            sprite: Sprite::load(path)?,
        })
    }
}

impl BirdAppearance for FaceFile {
    fn face(&self) -> Option<&Sprite> {
        Some(&self.sprite)
    }
}

/// A face file that something else keeps overwriting, e.g. a camera capture
/// script. Re-read every `every` frames when its mtime changes. A failed read
/// keeps the last good face and raises a notice once per failure streak.
pub struct FaceSnapshots {
    path: PathBuf,
    every: u64,
    current: Option<Sprite>,
    modified: Option<SystemTime>,
    failing: bool,
    notice: Option<String>,
}

impl FaceSnapshots {
    pub fn new(path: impl Into<PathBuf>, every: u64) -> Self {
        let mut snapshots = Self {
            path: path.into(),
            every: every.max(1),
            current: None,
            modified: None,
            failing: false,
            notice: None,
        };
        snapshots.poll();
        snapshots
    }

    fn poll(&mut self) {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        if modified.is_some() && modified == self.modified && !self.failing {
            return;
        }

        match Sprite::load(&self.path) {
            Ok(sprite) => {
                if self.failing {
                    tracing::info!(path = %self.path.display(), "face capture recovered");
                }
                self.current = Some(sprite);
                self.modified = modified;
                self.failing = false;
            }
            Err(e) => {
                if !self.failing {
                    tracing::warn!(path = %self.path.display(), error = %e, "face capture failed, keeping previous face");
                    self.notice = Some("NO FACE".to_owned());
                }
                self.failing = true;
            }
        }
    }
}

impl BirdAppearance for FaceSnapshots {
    fn refresh(&mut self, frame: u64) {
        if frame % self.every == 0 {
            self.poll();
        }
    }

    fn face(&self) -> Option<&Sprite> {
        self.current.as_ref()
    }

    fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
