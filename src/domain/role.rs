//! Structural role of a node, derived from its statement label

use std::fmt;

/// Structural category of a curriculum node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    LearningArea,
    Subject,
    YearLevel,
    Strand,
    SubStrand,
    ContentDescription,
    Elaboration,
    AchievementStandard,
    AchievementStandardComponent,
    /// General capabilities, cross-curriculum priorities and anything else not modelled
    Unknown,
}

impl Role {
    /// Classify a statement label. Matching is exact on the trimmed text.
    pub fn of(label: &str) -> Self {
        match label.trim() {
            "Learning Area" => Role::LearningArea,
            "Subject" => Role::Subject,
            "Year Level" | "Level" => Role::YearLevel,
            "Strand" => Role::Strand,
            "Sub-Strand" => Role::SubStrand,
            "Content Description" => Role::ContentDescription,
            "Elaboration" => Role::Elaboration,
            "Achievement Standard" => Role::AchievementStandard,
            "Achievement Standard Component" => Role::AchievementStandardComponent,
            _ => Role::Unknown,
        }
    }

    /// Classify an optional label; a missing label is `Unknown`.
    pub fn of_opt(label: Option<&str>) -> Self {
        label.map(Self::of).unwrap_or(Role::Unknown)
    }

    /// Canonical label text as it appears in the source graph.
    pub fn label(&self) -> &'static str {
        match self {
            Role::LearningArea => "Learning Area",
            Role::Subject => "Subject",
            Role::YearLevel => "Year Level",
            Role::Strand => "Strand",
            Role::SubStrand => "Sub-Strand",
            Role::ContentDescription => "Content Description",
            Role::Elaboration => "Elaboration",
            Role::AchievementStandard => "Achievement Standard",
            Role::AchievementStandardComponent => "Achievement Standard Component",
            Role::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
