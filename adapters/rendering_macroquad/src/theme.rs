use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use hillside_core::{EntityShade, TileKind};
use hillside_rendering::Color;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const ALL_PALETTE_KEYS: [PaletteKey; 8] = [
    PaletteKey::Background,
    PaletteKey::Bedrock,
    PaletteKey::Grass,
    PaletteKey::Dirt,
    PaletteKey::Pipe,
    PaletteKey::Explorer,
    PaletteKey::Moss,
    PaletteKey::Umber,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum PaletteKey {
    Background,
    Bedrock,
    Grass,
    Dirt,
    Pipe,
    Explorer,
    Moss,
    Umber,
}

/// Colors used when drawing tiles and entities as flat rectangles.
///
/// A palette can be loaded from a TOML manifest so the look of a session is
/// adjustable without recompiling; every key must be present exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    background: Color,
    bedrock: Color,
    grass: Color,
    dirt: Color,
    pipe: Color,
    explorer: Color,
    moss: Color,
    umber: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(59, 122, 87),
            bedrock: Color::from_rgb_u8(52, 52, 56),
            grass: Color::from_rgb_u8(106, 170, 64),
            dirt: Color::from_rgb_u8(134, 96, 67),
            pipe: Color::from_rgb_u8(46, 139, 87),
            explorer: Color::from_rgb_u8(64, 120, 200),
            moss: Color::from_rgb_u8(84, 160, 72),
            umber: Color::from_rgb_u8(92, 64, 51),
        }
    }
}

impl Palette {
    /// Loads a palette from the manifest located at the provided path.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read palette manifest at {}",
                manifest_path.display()
            )
        })?;
        Self::from_manifest_str(&contents)
    }

    /// Background color used to clear each frame.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Color assigned to the provided tile kind.
    #[must_use]
    pub const fn tile_color(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Bedrock => self.bedrock,
            TileKind::Grass => self.grass,
            TileKind::Dirt => self.dirt,
            TileKind::Pipe => self.pipe,
        }
    }

    /// Color assigned to the provided entity shade.
    #[must_use]
    pub const fn entity_color(&self, shade: EntityShade) -> Color {
        match shade {
            EntityShade::Explorer => self.explorer,
            EntityShade::Moss => self.moss,
            EntityShade::Umber => self.umber,
        }
    }

    fn from_manifest_str(contents: &str) -> Result<Self> {
        let mut palette = Self::default();
        for (key, color) in parse_manifest(contents)? {
            match key {
                PaletteKey::Background => palette.background = color,
                PaletteKey::Bedrock => palette.bedrock = color,
                PaletteKey::Grass => palette.grass = color,
                PaletteKey::Dirt => palette.dirt = color,
                PaletteKey::Pipe => palette.pipe = color,
                PaletteKey::Explorer => palette.explorer = color,
                PaletteKey::Moss => palette.moss = color,
                PaletteKey::Umber => palette.umber = color,
            }
        }
        Ok(palette)
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    colors: HashMap<String, [u8; 3]>,
}

fn parse_manifest(contents: &str) -> Result<Vec<(PaletteKey, Color)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse palette manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported palette manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, channels) in manifest.colors {
        let key =
            parse_palette_key(&name).with_context(|| format!("unknown palette key `{name}`"))?;
        let color = Color::from_rgb_u8(channels[0], channels[1], channels[2]);
        if resolved.insert(key, color).is_some() {
            bail!("palette manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(ALL_PALETTE_KEYS.len());
    for key in ALL_PALETTE_KEYS {
        let Some(color) = resolved.remove(&key) else {
            bail!("palette manifest missing entry for {key:?}");
        };
        ordered.push((key, color));
    }

    if !resolved.is_empty() {
        let unexpected = resolved
            .into_keys()
            .map(|key| format!("{key:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        bail!("palette manifest contains unexpected keys: {unexpected}");
    }

    Ok(ordered)
}

fn parse_palette_key(name: &str) -> Result<PaletteKey> {
    match name {
        "Background" => Ok(PaletteKey::Background),
        "Bedrock" => Ok(PaletteKey::Bedrock),
        "Grass" => Ok(PaletteKey::Grass),
        "Dirt" => Ok(PaletteKey::Dirt),
        "Pipe" => Ok(PaletteKey::Pipe),
        "Explorer" => Ok(PaletteKey::Explorer),
        "Moss" => Ok(PaletteKey::Moss),
        "Umber" => Ok(PaletteKey::Umber),
        _ => bail!("unknown palette key `{name}`"),
    }
}
