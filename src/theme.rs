//! Theme data consumed by the core.
//!
//! A theme reskins the whole game without touching simulation logic: colors,
//! audio cue names, a tuning override, and the entity visual variant table.
//! Themes are immutable once loaded; switching themes rebuilds the session
//! rather than mutating shared state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Tuning;

/// CSS-style color strings handed to the (external) renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub danger: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#0b0e1a".into(),
            foreground: "#e8e8f0".into(),
            accent: "#57d7ff".into(),
            danger: "#ff5470".into(),
        }
    }
}

/// Entity kinds that can carry themed visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Enemy,
    Projectile,
    Boss,
}

/// Snapshot of the entity fields a variant predicate may inspect.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityView {
    pub tough: bool,
    /// Remaining hp as a fraction of spawn hp
    pub hp_frac: f32,
    /// Depth; low values are close to the player
    pub z: f32,
}

/// Closed set of predicates a variant rule may be gated on.
///
/// Evaluated in declaration order; the last rule in a list acts as the
/// fallback regardless of its gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantGate {
    Always,
    Tough,
    /// Below half of spawn hp
    Damaged,
    /// Depth under 0.25, close enough to loom
    Near,
}

impl VariantGate {
    fn matches(self, view: &EntityView) -> bool {
        match self {
            VariantGate::Always => true,
            VariantGate::Tough => view.tough,
            VariantGate::Damaged => view.hp_frac < 0.5,
            VariantGate::Near => view.z < 0.25,
        }
    }
}

/// What the renderer should draw for a matched entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visual {
    pub sprite: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub tint: Option<String>,
}

fn default_scale() -> f32 {
    1.0
}

/// One gated entry in a variant list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRule {
    pub when: VariantGate,
    pub visual: Visual,
}

/// Entity-kind → ordered variant rules with a guaranteed fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantTable {
    rules: HashMap<EntityKind, Vec<VariantRule>>,
}

impl VariantTable {
    /// Resolve the visual for an entity: first rule whose gate matches, in
    /// declaration order; if none match, the last rule wins.
    pub fn resolve(&self, kind: EntityKind, view: &EntityView) -> Option<&Visual> {
        let rules = self.rules.get(&kind)?;
        rules
            .iter()
            .find(|r| r.when.matches(view))
            .or_else(|| rules.last())
            .map(|r| &r.visual)
    }

    pub fn insert(&mut self, kind: EntityKind, rules: Vec<VariantRule>) {
        self.rules.insert(kind, rules);
    }
}

/// A complete theme: presentation data plus the gameplay tuning override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub palette: Palette,
    /// Audio cue names keyed by event kind, played by the external synth
    #[serde(default)]
    pub cues: HashMap<String, String>,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub visuals: VariantTable,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".into(),
            palette: Palette::default(),
            cues: HashMap::new(),
            tuning: Tuning::default(),
            visuals: VariantTable::default(),
        }
    }
}

impl Theme {
    /// Parse a theme from JSON. Missing sections fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let theme: Theme = serde_json::from_str(json)?;
        log::info!("Loaded theme '{}'", theme.name);
        Ok(theme)
    }
}
