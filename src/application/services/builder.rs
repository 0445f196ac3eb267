//! Tree builder: rebuilds the typed curriculum from `isChildOf` links
//!
//! Root and learning-area discovery run against the triples of the file being
//! loaded. Everything below a learning area is looked up in the merged store,
//! since descendants may live in any file loaded so far.

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::application::services::classifier::{ClassifiedChild, HierarchyClassifier};
use crate::config::{LoadSettings, SubjectScope};
use crate::domain::{
    attach, vocab, AchievementStandard, AchievementStandardComponent, ContentDescription,
    ContentParent, DomainError, DuplicatePolicy, Elaboration, LearningArea, Modified, NodeId,
    NodeInfo, NodeMeta, ObjectPattern, Role, Strand, StrandRef, SubStrand, Subject, SubjectRef,
    YearLevel, YearLevelRef,
};
use crate::infrastructure::traits::TripleStore;

/// Learning areas built from one file, not yet attached to a curriculum.
#[derive(Debug, Clone)]
pub struct FileBuild {
    /// Node with notation "root", absent only when the root check is lenient
    pub root: Option<NodeId>,
    pub learning_areas: Vec<LearningArea>,
}

pub type BuildResult<T> = Result<T, DomainError>;

/// Recursive assembler for one file's curriculum subtree.
pub struct TreeBuilder<'s> {
    store: &'s dyn TripleStore,
    classifier: HierarchyClassifier<'s>,
    settings: &'s LoadSettings,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(store: &'s dyn TripleStore, settings: &'s LoadSettings) -> Self {
        Self {
            store,
            classifier: HierarchyClassifier::new(store),
            settings,
        }
    }

    /// Build every learning area found in `scope`.
    ///
    /// Fails on the first malformed node; nothing partial is returned.
    #[instrument(level = "debug", skip_all)]
    pub fn build(&self, scope: &dyn TripleStore) -> BuildResult<FileBuild> {
        let root = self.discover_root(scope)?;

        let la_nodes = scope.subjects_matching(
            vocab::STATEMENT_LABEL,
            ObjectPattern::Literal(Role::LearningArea.label()),
        );
        if la_nodes.is_empty() {
            warn!("no learning area found in graph");
        }

        let mut learning_areas = BTreeMap::new();
        for id in la_nodes {
            let info = self.classifier.extractor().extract(&id);
            let la = self.learning_area(id, &info)?;
            attach(
                &mut learning_areas,
                la.meta.title.clone(),
                la,
                self.settings.duplicate_keys,
                "file",
                Role::LearningArea,
            )?;
        }

        Ok(FileBuild {
            root,
            learning_areas: learning_areas.into_values().collect(),
        })
    }

    fn discover_root(&self, scope: &dyn TripleStore) -> BuildResult<Option<NodeId>> {
        let mut roots = scope.subjects_matching(
            vocab::STATEMENT_NOTATION,
            ObjectPattern::Literal(vocab::ROOT_NOTATION),
        );
        match roots.len() {
            1 => Ok(roots.pop()),
            0 if !self.settings.strict_root => {
                warn!("no root node, continuing without one");
                Ok(None)
            }
            count => Err(DomainError::RootCardinality { count }),
        }
    }

    fn learning_area(&self, id: NodeId, info: &NodeInfo) -> BuildResult<LearningArea> {
        let meta = meta(id, info, Role::LearningArea, false)?;
        debug!(title = %meta.title, "learning area");

        let subject_nodes = match self.settings.subject_scope {
            SubjectScope::LearningArea => self
                .classifier
                .children_with_role(&meta.id, Role::Subject)
                .into_iter()
                .map(|child| child.id)
                .collect(),
            SubjectScope::Graph => self.store.subjects_matching(
                vocab::STATEMENT_LABEL,
                ObjectPattern::Literal(Role::Subject.label()),
            ),
        };

        let mut subjects = BTreeMap::new();
        for id in subject_nodes {
            let info = self.classifier.extractor().extract(&id);
            let subject = self.subject(&meta.title, id, &info)?;
            self.attach(&mut subjects, subject.meta.title.clone(), subject, &meta, Role::Subject)?;
        }
        Ok(LearningArea { meta, subjects })
    }

    fn subject(&self, learning_area: &str, id: NodeId, info: &NodeInfo) -> BuildResult<Subject> {
        let meta = meta(id, info, Role::Subject, false)?;
        debug!(title = %meta.title, "subject");
        let key = SubjectRef {
            learning_area: learning_area.to_string(),
            subject: meta.title.clone(),
        };

        let mut year_levels = BTreeMap::new();
        for child in self.classifier.classified_children(&meta.id) {
            let unlabelled = child.info.label.is_none();
            if child.role != Role::YearLevel && !unlabelled {
                debug!(
                    child = %child.id,
                    label = child.info.label.as_deref().unwrap_or_default(),
                    "not a year level, skipping"
                );
                continue;
            }
            let yl = self.year_level(key.clone(), child)?;
            self.attach(&mut year_levels, yl.meta.title.clone(), yl, &meta, Role::YearLevel)?;
        }
        Ok(Subject {
            meta,
            learning_area: learning_area.to_string(),
            year_levels,
        })
    }

    fn year_level(&self, subject: SubjectRef, child: ClassifiedChild) -> BuildResult<YearLevel> {
        let description = child.info.description.clone().unwrap_or_default();
        let meta = meta(child.id, &child.info, Role::YearLevel, false)?;
        debug!(title = %meta.title, "year level");
        let key = YearLevelRef {
            subject: subject.clone(),
            year_level: meta.title.clone(),
        };

        let mut strands = BTreeMap::new();
        for child in self.classifier.children_with_role(&meta.id, Role::Strand) {
            let strand = self.strand(key.clone(), child)?;
            self.attach(&mut strands, strand.meta.title.clone(), strand, &meta, Role::Strand)?;
        }

        let mut achievement_standard: Option<AchievementStandard> = None;
        for child in self
            .classifier
            .children_with_role(&meta.id, Role::AchievementStandard)
        {
            let standard = self.achievement_standard(child)?;
            if let Some(previous) = achievement_standard.replace(standard) {
                match self.settings.duplicate_keys {
                    DuplicatePolicy::Reject => {
                        return Err(DomainError::DuplicateKey {
                            parent: meta.title.clone(),
                            role: Role::AchievementStandard,
                            key: previous.meta.code,
                        });
                    }
                    DuplicatePolicy::Overwrite => warn!(
                        owner = %meta.title,
                        "more than one achievement standard, keeping the last"
                    ),
                }
            }
        }

        Ok(YearLevel {
            meta,
            description,
            subject,
            achievement_standard,
            strands,
        })
    }

    fn strand(&self, year_level: YearLevelRef, child: ClassifiedChild) -> BuildResult<Strand> {
        let meta = meta(child.id, &child.info, Role::Strand, false)?;
        let key = StrandRef {
            year_level: year_level.clone(),
            strand: meta.title.clone(),
        };

        let mut sub_strands = BTreeMap::new();
        let mut content_descriptions = BTreeMap::new();
        if self.classifier.has_sub_strand_children(&meta.id) {
            debug!(title = %meta.title, "strand with sub-strands");
            for child in self.classifier.children_with_role(&meta.id, Role::SubStrand) {
                let sub = self.sub_strand(key.clone(), child)?;
                self.attach(&mut sub_strands, sub.meta.title.clone(), sub, &meta, Role::SubStrand)?;
            }
        } else {
            debug!(title = %meta.title, "strand with direct content");
            self.content_descriptions(
                &meta,
                ContentParent::Strand(key),
                &mut content_descriptions,
            )?;
        }

        Ok(Strand {
            meta,
            year_level,
            sub_strands,
            content_descriptions,
        })
    }

    fn sub_strand(&self, strand: StrandRef, child: ClassifiedChild) -> BuildResult<SubStrand> {
        let meta = meta(child.id, &child.info, Role::SubStrand, false)?;
        debug!(title = %meta.title, "sub-strand");
        let mut sub = SubStrand {
            meta,
            strand,
            content_descriptions: BTreeMap::new(),
        };
        let parent = ContentParent::SubStrand(sub.key());
        self.content_descriptions(&sub.meta, parent, &mut sub.content_descriptions)?;
        Ok(sub)
    }

    fn content_descriptions(
        &self,
        owner: &NodeMeta,
        parent: ContentParent,
        into: &mut BTreeMap<String, ContentDescription>,
    ) -> BuildResult<()> {
        for child in self
            .classifier
            .children_with_role(&owner.id, Role::ContentDescription)
        {
            let cd = self.content_description(parent.clone(), child)?;
            self.attach(into, cd.meta.code.clone(), cd, owner, Role::ContentDescription)?;
        }
        Ok(())
    }

    fn content_description(
        &self,
        parent: ContentParent,
        child: ClassifiedChild,
    ) -> BuildResult<ContentDescription> {
        let meta = meta(child.id, &child.info, Role::ContentDescription, true)?;
        debug!(code = %meta.code, "content description");

        let mut elaborations = BTreeMap::new();
        let mut achievement_standard_components = BTreeMap::new();
        for extra in self.classifier.classified_children(&meta.id) {
            match extra.role {
                Role::Elaboration => {
                    let elaboration = Elaboration {
                        meta: self::meta(extra.id, &extra.info, Role::Elaboration, true)?,
                    };
                    let key = elaboration.meta.code.clone();
                    self.attach(&mut elaborations, key, elaboration, &meta, Role::Elaboration)?;
                }
                Role::AchievementStandardComponent => {
                    let component = component(extra)?;
                    let key = component.meta.code.clone();
                    self.attach(
                        &mut achievement_standard_components,
                        key,
                        component,
                        &meta,
                        Role::AchievementStandardComponent,
                    )?;
                }
                other => debug!(child = %extra.id, role = %other, "ignored content description child"),
            }
        }

        Ok(ContentDescription {
            meta,
            parent,
            elaborations,
            achievement_standard_components,
        })
    }

    fn achievement_standard(&self, child: ClassifiedChild) -> BuildResult<AchievementStandard> {
        let meta = meta(child.id, &child.info, Role::AchievementStandard, false)?;
        debug!(title = %meta.title, "achievement standard");

        let mut components = BTreeMap::new();
        for child in self
            .classifier
            .children_with_role(&meta.id, Role::AchievementStandardComponent)
        {
            let component = component(child)?;
            self.attach(
                &mut components,
                component.meta.code.clone(),
                component,
                &meta,
                Role::AchievementStandardComponent,
            )?;
        }
        Ok(AchievementStandard { meta, components })
    }

    fn attach<V>(
        &self,
        map: &mut BTreeMap<String, V>,
        key: String,
        value: V,
        owner: &NodeMeta,
        role: Role,
    ) -> BuildResult<()> {
        attach(map, key, value, self.settings.duplicate_keys, &owner.title, role)
    }
}

fn component(child: ClassifiedChild) -> BuildResult<AchievementStandardComponent> {
    let meta = meta(child.id, &child.info, Role::AchievementStandardComponent, true)?;
    Ok(AchievementStandardComponent { meta })
}

/// Turn extracted info into entity metadata, enforcing required fields.
///
/// Title and modified are always required; the code only for entities keyed by it.
fn meta(id: NodeId, info: &NodeInfo, role: Role, code_required: bool) -> BuildResult<NodeMeta> {
    let missing = |field: &'static str| DomainError::MissingField {
        node: id.clone(),
        role,
        field,
    };

    let title = info.title.clone().ok_or_else(|| missing("title"))?;
    let raw = info.modified_raw.as_deref().ok_or_else(|| missing("modified"))?;
    let modified = Modified::parse(raw).map_err(|_| DomainError::InvalidTimestamp {
        node: id.clone(),
        value: raw.to_string(),
    })?;
    let code = match (&info.code, code_required) {
        (Some(code), _) => code.clone(),
        (None, true) => return Err(missing("code")),
        (None, false) => String::new(),
    };

    Ok(NodeMeta {
        id,
        title,
        code,
        modified,
        nominal_year_level: info.nominal_year_level.clone(),
    })
}
