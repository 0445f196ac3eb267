//! Terminal tree views of the curriculum and of walked graphs

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{
    ContentDescription, Curriculum, CurriculumNode, LearningArea, Strand, TreeArena, YearLevel,
};

/// Conversion into a printable `termtree::Tree`.
pub trait ToTermTree {
    fn to_term_tree(&self) -> Tree<String>;
}

impl ToTermTree for TreeArena {
    fn to_term_tree(&self) -> Tree<String> {
        fn build_tree(arena: &TreeArena, node_idx: Index) -> Option<Tree<String>> {
            let node = arena.get_node(node_idx)?;
            let leaves = node
                .children
                .iter()
                .filter_map(|&child| build_tree(arena, child));
            Some(Tree::new(node.data.to_string()).with_leaves(leaves))
        }

        self.root()
            .and_then(|root| build_tree(self, root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

impl ToTermTree for Curriculum {
    fn to_term_tree(&self) -> Tree<String> {
        Tree::new("Curriculum".to_string())
            .with_leaves(self.learning_areas.values().map(|la| la.to_term_tree()))
    }
}

impl ToTermTree for LearningArea {
    fn to_term_tree(&self) -> Tree<String> {
        let subjects = self.subjects.values().map(|subject| {
            Tree::new(entry(subject)).with_leaves(subject.year_levels.values().map(year_level))
        });
        Tree::new(entry(self)).with_leaves(subjects)
    }
}

fn year_level(yl: &YearLevel) -> Tree<String> {
    let mut tree = Tree::new(entry(yl));
    if let Some(standard) = &yl.achievement_standard {
        tree.push(
            Tree::new(format!("Achievement Standard {}", standard.code()))
                .with_leaves(standard.components.values().map(|c| c.code().to_string())),
        );
    }
    tree.with_leaves(yl.strands.values().map(strand))
}

fn strand(strand: &Strand) -> Tree<String> {
    let subs = strand.sub_strands.values().map(|sub| {
        Tree::new(entry(sub)).with_leaves(sub.content_descriptions.values().map(content))
    });
    Tree::new(entry(strand))
        .with_leaves(subs)
        .with_leaves(strand.content_descriptions.values().map(content))
}

fn content(cd: &ContentDescription) -> Tree<String> {
    let mut text = cd.code().to_string();
    if !cd.elaborations.is_empty() {
        text.push_str(&format!(" ({} elaborations)", cd.elaborations.len()));
    }
    Tree::new(text)
}

fn entry(node: &impl CurriculumNode) -> String {
    if node.code().is_empty() {
        node.title().to_string()
    } else {
        format!("{} [{}]", node.title(), node.code())
    }
}
