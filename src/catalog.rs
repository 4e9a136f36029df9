//! The prompt catalog: ordered (identifier, prompt) pairs.

use crate::error::{HeroGenError, Result};
use std::collections::HashSet;

/// One image to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCatalogEntry {
    id: String,
    prompt: String,
}

impl PromptCatalogEntry {
    /// Creates an entry. Identifiers are validated when added to a catalog.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }

    /// Identifier, also the output filename stem.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Prompt text sent to the provider.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// First `max_chars` characters of the prompt, for progress output.
    pub fn prompt_preview(&self, max_chars: usize) -> &str {
        match self.prompt.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.prompt[..idx],
            None => &self.prompt,
        }
    }
}

/// Ordered, immutable set of prompts with unique identifiers.
#[derive(Debug, Clone, Default)]
pub struct PromptCatalog {
    entries: Vec<PromptCatalogEntry>,
}

impl PromptCatalog {
    /// Builds a catalog, preserving order.
    ///
    /// Rejects empty identifiers, identifiers that are not a plain file
    /// stem, and duplicates.
    pub fn from_entries(entries: impl IntoIterator<Item = PromptCatalogEntry>) -> Result<Self> {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut seen = HashSet::new();

        for entry in &entries {
            validate_id(entry.id())?;
            if !seen.insert(entry.id()) {
                return Err(HeroGenError::Config(format!(
                    "duplicate catalog identifier: {}",
                    entry.id()
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The two newsletter hero images.
    pub fn newsletter_heroes() -> Self {
        Self {
            entries: vec![
                PromptCatalogEntry::new("week1-hero", WEEK1_HERO_PROMPT),
                PromptCatalogEntry::new("week2-hero", WEEK2_HERO_PROMPT),
            ],
        }
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[PromptCatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PromptCatalog {
    type Item = &'a PromptCatalogEntry;
    type IntoIter = std::slice::Iter<'a, PromptCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(HeroGenError::Config("catalog identifier is empty".into()));
    }
    if id == "." || id == ".." || id.contains(['/', '\\']) || id.contains('\0') {
        return Err(HeroGenError::Config(format!(
            "catalog identifier is not a valid file stem: {id}"
        )));
    }
    Ok(())
}

const WEEK1_HERO_PROMPT: &str = "\
Create a vibrant, photorealistic image of a modern middle school science classroom:

SUBJECTS:
- 4-5 diverse students (ages 11-14: African American, Latino, Asian, Caucasian)
- Students are excited, engaged, collaborating
- Some pointing at screens, others discussing animatedly

TECHNOLOGY:
- Tablets and laptops on desks
- Screens showing colorful biological cell models
- Interactive molecular pathway diagrams visible on displays
- Clear technology integration in learning

SETTING:
- Bright modern classroom
- Natural sunlight from large windows
- Clean, contemporary educational environment
- Professional but inviting atmosphere

COLOR PALETTE:
- Navy blue (#030C3C) and bright blue (#0F6ACE) accents
- Natural classroom colors (wood, whites, neutrals)
- Colorful scientific visualizations on screens
- Warm, inspiring lighting

MOOD: Inspiring, collaborative, future-ready science education
STYLE: Professional educational photography, natural lighting, high quality, 16:9 wide format
FOCUS: Students actively engaged with computational biology tools";

const WEEK2_HERO_PROMPT: &str = "\
Create a professional scientific research image:

MAIN ELEMENT:
- Large professional monitor/display showing Cell Collective platform
- Screen displays intricate biological network diagrams
- Colorful interactive cellular models with nodes and connections
- Complex systems biology visualizations clearly visible

NETWORK VISUALIZATION:
- Interconnected pathways with blue, teal, and cyan nodes
- Molecular interactions shown as connecting lines
- Scientific precision and sophistication
- Multiple biological components in network

SETTING:
- Clean modern research laboratory or workspace
- Professional scientific environment
- Subtle research equipment in soft focus background
- Contemporary, cutting-edge aesthetic

COLOR PALETTE:
- Navy blue (#030C3C) and bright blue (#0F6ACE) dominant
- Light blue (#38aefd) accents in visualizations
- Professional scientific color scheme
- Clean whites and modern grays

MOOD: Cutting-edge research, scientific innovation, systems biology
STYLE: Professional scientific photography, soft lighting, high-tech aesthetic, 16:9 wide format
FOCUS: Cell Collective platform interface showcasing biological complexity";
