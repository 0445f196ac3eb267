//! Curriculum model: the typed tree rebuilt from the source graph
//!
//! Parents own their children by value. Children point back to their parent
//! through key paths (titles from the learning area down), never through a
//! strong pointer, so the tree has no ownership cycles. Back-references are
//! resolved against the owning [`Curriculum`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::DomainError;
use crate::domain::node::NodeId;
use crate::domain::role::Role;
use crate::domain::timestamp::Modified;

/// Attributes shared by every curriculum entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMeta {
    /// Source graph node
    pub id: NodeId,
    /// Display text (for content descriptions, the statement itself)
    pub title: String,
    /// Short notation, e.g. `AC9M7N01`
    pub code: String,
    pub modified: Modified,
    pub nominal_year_level: Option<String>,
}

/// Common read access to an entity's [`NodeMeta`].
pub trait CurriculumNode {
    fn meta(&self) -> &NodeMeta;

    fn id(&self) -> &NodeId {
        &self.meta().id
    }

    fn title(&self) -> &str {
        &self.meta().title
    }

    fn code(&self) -> &str {
        &self.meta().code
    }

    fn modified(&self) -> String {
        self.meta().modified.display()
    }
}

macro_rules! curriculum_node {
    ($($ty:ty),+ $(,)?) => {
        $(impl CurriculumNode for $ty {
            fn meta(&self) -> &NodeMeta {
                &self.meta
            }
        })+
    };
}

/// What to do when two siblings share a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Last write wins; a warning names the parent and key
    #[default]
    Overwrite,
    /// Fail the file with [`DomainError::DuplicateKey`]
    Reject,
}

/// Insert `value` under `key`, applying the duplicate policy.
pub fn attach<V>(
    map: &mut BTreeMap<String, V>,
    key: String,
    value: V,
    policy: DuplicatePolicy,
    parent: &str,
    role: Role,
) -> Result<(), DomainError> {
    if map.contains_key(&key) {
        match policy {
            DuplicatePolicy::Reject => {
                return Err(DomainError::DuplicateKey {
                    parent: parent.to_string(),
                    role,
                    key,
                });
            }
            DuplicatePolicy::Overwrite => {
                warn!(%role, key = %key, owner = parent, "duplicate key, overwriting earlier entry");
            }
        }
    }
    map.insert(key, value);
    Ok(())
}

// ============================================================
// BACK-REFERENCES
// ============================================================

/// Key path of a subject: learning area title, subject title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectRef {
    pub learning_area: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct YearLevelRef {
    pub subject: SubjectRef,
    pub year_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrandRef {
    pub year_level: YearLevelRef,
    pub strand: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubStrandRef {
    pub strand: StrandRef,
    pub sub_strand: String,
}

/// Owner of a content description, fixed when it is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentParent {
    Strand(StrandRef),
    SubStrand(SubStrandRef),
}

impl ContentParent {
    /// The strand, whether the owner is the strand itself or one of its sub-strands.
    pub fn strand(&self) -> &StrandRef {
        match self {
            ContentParent::Strand(strand) => strand,
            ContentParent::SubStrand(sub) => &sub.strand,
        }
    }
}

// ============================================================
// ENTITIES
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningArea {
    pub meta: NodeMeta,
    /// Keyed by title
    pub subjects: BTreeMap<String, Subject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub meta: NodeMeta,
    /// Title of the owning learning area
    pub learning_area: String,
    /// Keyed by title
    pub year_levels: BTreeMap<String, YearLevel>,
}

impl Subject {
    pub fn key(&self) -> SubjectRef {
        SubjectRef {
            learning_area: self.learning_area.clone(),
            subject: self.meta.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearLevel {
    pub meta: NodeMeta,
    /// Free text, may contain HTML markup
    pub description: String,
    pub subject: SubjectRef,
    pub achievement_standard: Option<AchievementStandard>,
    /// Keyed by title
    pub strands: BTreeMap<String, Strand>,
}

impl YearLevel {
    pub fn key(&self) -> YearLevelRef {
        YearLevelRef {
            subject: self.subject.clone(),
            year_level: self.meta.title.clone(),
        }
    }

    /// Integers appearing as words in the title: "Years 9 and 10" -> [9, 10].
    pub fn year_numbers(&self) -> Vec<u32> {
        self.meta
            .title
            .split_whitespace()
            .filter_map(|word| word.parse().ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strand {
    pub meta: NodeMeta,
    pub year_level: YearLevelRef,
    /// Keyed by title
    pub sub_strands: BTreeMap<String, SubStrand>,
    /// Keyed by code; only populated when the strand has no sub-strands
    pub content_descriptions: BTreeMap<String, ContentDescription>,
}

impl Strand {
    pub fn key(&self) -> StrandRef {
        StrandRef {
            year_level: self.year_level.clone(),
            strand: self.meta.title.clone(),
        }
    }

    pub fn has_sub_strands(&self) -> bool {
        !self.sub_strands.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubStrand {
    pub meta: NodeMeta,
    pub strand: StrandRef,
    /// Keyed by code
    pub content_descriptions: BTreeMap<String, ContentDescription>,
}

impl SubStrand {
    pub fn key(&self) -> SubStrandRef {
        SubStrandRef {
            strand: self.strand.clone(),
            sub_strand: self.meta.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDescription {
    pub meta: NodeMeta,
    pub parent: ContentParent,
    /// Keyed by code
    pub elaborations: BTreeMap<String, Elaboration>,
    /// Keyed by code
    pub achievement_standard_components: BTreeMap<String, AchievementStandardComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elaboration {
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStandard {
    pub meta: NodeMeta,
    /// Keyed by code
    pub components: BTreeMap<String, AchievementStandardComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStandardComponent {
    pub meta: NodeMeta,
}

curriculum_node!(
    LearningArea,
    Subject,
    YearLevel,
    Strand,
    SubStrand,
    ContentDescription,
    Elaboration,
    AchievementStandard,
    AchievementStandardComponent,
);

// ============================================================
// AGGREGATE
// ============================================================

/// Titles from the learning area down to the owner of a content description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceInHierarchy {
    pub learning_area: String,
    pub subject: String,
    pub year_level: String,
    pub strand: String,
    pub sub_strand: Option<String>,
}

impl PlaceInHierarchy {
    /// Titles in order: learning area, subject, year level, strand, sub-strand.
    pub fn chain(&self) -> Vec<&str> {
        let mut chain = vec![
            self.learning_area.as_str(),
            self.subject.as_str(),
            self.year_level.as_str(),
            self.strand.as_str(),
        ];
        if let Some(sub) = &self.sub_strand {
            chain.push(sub);
        }
        chain
    }
}

/// A file that was loaded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Node with notation "root"; absent only in lenient mode
    pub root: Option<NodeId>,
    /// Titles of the learning areas this file contributed
    pub learning_areas: Vec<String>,
}

/// Entity counts for one learning area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub subjects: usize,
    pub year_levels: usize,
    pub strands: usize,
    pub sub_strands: usize,
    pub content_descriptions: usize,
    pub elaborations: usize,
    pub achievement_standards: usize,
}

/// All learning areas loaded so far, keyed by title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Curriculum {
    pub learning_areas: BTreeMap<String, LearningArea>,
    files: Vec<SourceFile>,
}

impl Curriculum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the learning areas of one fully built file.
    pub fn commit(
        &mut self,
        source: SourceFile,
        learning_areas: Vec<LearningArea>,
        policy: DuplicatePolicy,
    ) -> Result<(), DomainError> {
        // Check first so a rejected file leaves the model untouched
        if policy == DuplicatePolicy::Reject {
            if let Some(dup) = learning_areas
                .iter()
                .find(|la| self.learning_areas.contains_key(&la.meta.title))
            {
                return Err(DomainError::DuplicateKey {
                    parent: "curriculum".to_string(),
                    role: Role::LearningArea,
                    key: dup.meta.title.clone(),
                });
            }
        }
        for la in learning_areas {
            attach(
                &mut self.learning_areas,
                la.meta.title.clone(),
                la,
                policy,
                "curriculum",
                Role::LearningArea,
            )?;
        }
        self.files.push(source);
        Ok(())
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn roots(&self) -> Vec<&NodeId> {
        self.files.iter().filter_map(|f| f.root.as_ref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.learning_areas.is_empty()
    }

    pub fn learning_area(&self, title: &str) -> Option<&LearningArea> {
        self.learning_areas.get(title)
    }

    pub fn subject(&self, key: &SubjectRef) -> Option<&Subject> {
        self.learning_area(&key.learning_area)?
            .subjects
            .get(&key.subject)
    }

    pub fn year_level(&self, key: &YearLevelRef) -> Option<&YearLevel> {
        self.subject(&key.subject)?.year_levels.get(&key.year_level)
    }

    pub fn strand(&self, key: &StrandRef) -> Option<&Strand> {
        self.year_level(&key.year_level)?.strands.get(&key.strand)
    }

    pub fn sub_strand(&self, key: &SubStrandRef) -> Option<&SubStrand> {
        self.strand(&key.strand)?.sub_strands.get(&key.sub_strand)
    }

    /// Every content description in the model, whichever layer owns it.
    pub fn content_descriptions(&self) -> impl Iterator<Item = &ContentDescription> {
        self.learning_areas
            .values()
            .flat_map(|la| la.subjects.values())
            .flat_map(|s| s.year_levels.values())
            .flat_map(|yl| yl.strands.values())
            .flat_map(|strand| {
                strand.content_descriptions.values().chain(
                    strand
                        .sub_strands
                        .values()
                        .flat_map(|sub| sub.content_descriptions.values()),
                )
            })
    }

    /// First content description with this code.
    pub fn content_description(&self, code: &str) -> Option<&ContentDescription> {
        self.content_descriptions().find(|cd| cd.meta.code == code)
    }

    /// Walk the back-references of `cd` up to its learning area.
    pub fn place_in_hierarchy(
        &self,
        cd: &ContentDescription,
    ) -> Result<PlaceInHierarchy, DomainError> {
        let dangling = |what: &str| {
            DomainError::DanglingReference(format!("{} of content description {}", what, cd.meta.code))
        };

        let sub_strand = match &cd.parent {
            ContentParent::Strand(_) => None,
            ContentParent::SubStrand(key) => Some(
                self.sub_strand(key)
                    .ok_or_else(|| dangling("sub-strand"))?
                    .meta
                    .title
                    .clone(),
            ),
        };
        let strand = self
            .strand(cd.parent.strand())
            .ok_or_else(|| dangling("strand"))?;
        let year_level = self
            .year_level(&strand.year_level)
            .ok_or_else(|| dangling("year level"))?;
        let subject = self
            .subject(&year_level.subject)
            .ok_or_else(|| dangling("subject"))?;
        let learning_area = self
            .learning_area(&subject.learning_area)
            .ok_or_else(|| dangling("learning area"))?;

        Ok(PlaceInHierarchy {
            learning_area: learning_area.meta.title.clone(),
            subject: subject.meta.title.clone(),
            year_level: year_level.meta.title.clone(),
            strand: strand.meta.title.clone(),
            sub_strand,
        })
    }

    /// Entity counts per learning area, keyed by title.
    pub fn summary(&self) -> BTreeMap<&str, Summary> {
        self.learning_areas
            .iter()
            .map(|(title, la)| (title.as_str(), la.summary()))
            .collect()
    }
}

impl LearningArea {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            subjects: self.subjects.len(),
            ..Summary::default()
        };
        for yl in self.subjects.values().flat_map(|s| s.year_levels.values()) {
            summary.year_levels += 1;
            if yl.achievement_standard.is_some() {
                summary.achievement_standards += 1;
            }
            for strand in yl.strands.values() {
                summary.strands += 1;
                summary.sub_strands += strand.sub_strands.len();
                let cds = strand.content_descriptions.values().chain(
                    strand
                        .sub_strands
                        .values()
                        .flat_map(|s| s.content_descriptions.values()),
                );
                for cd in cds {
                    summary.content_descriptions += 1;
                    summary.elaborations += cd.elaborations.len();
                }
            }
        }
        summary
    }
}
