//! Markdown rendering of a loaded curriculum
//!
//! Produces one index page covering every learning area and one page per
//! content description, grouped in a folder per learning area. Links use the
//! `[[wiki-link]]` form understood by Foam and MkDocs roam plugins.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::{Captures, Regex};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::RenderSettings;
use crate::domain::{ContentDescription, Curriculum, LearningArea, Strand, Subject, YearLevel};
use crate::infrastructure::traits::FileSystem;

pub const INDEX_NAME: &str = "v9-learning-areas";

const HTML_TAG: &str = r"<[^>]*>";
const HTML_ENTITY: &str = r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);";

/// What a render run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub index: PathBuf,
    /// Content description pages, in writing order
    pub pages: Vec<PathBuf>,
}

pub struct MarkdownRenderer {
    fs: Arc<dyn FileSystem>,
    settings: RenderSettings,
    html_tag: Regex,
    html_entity: Regex,
}

impl MarkdownRenderer {
    pub fn new(fs: Arc<dyn FileSystem>, settings: RenderSettings) -> ApplicationResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ApplicationError::OperationFailed {
                context: format!("compile regex {pattern}"),
                source: Box::new(e),
            })
        };
        Ok(Self {
            fs,
            settings,
            html_tag: compile(HTML_TAG)?,
            html_entity: compile(HTML_ENTITY)?,
        })
    }

    /// Folder holding the pages of one learning area.
    pub fn folder_name(learning_area: &LearningArea) -> String {
        learning_area.meta.title.replace(' ', "_")
    }

    /// Year levels pass unless secondary-only is set; then every year number
    /// in the title must be 7 or above, and a title without any is rejected.
    pub fn includes_year_level(&self, year_level: &YearLevel) -> bool {
        if !self.settings.secondary_only {
            return true;
        }
        let years = year_level.year_numbers();
        !years.is_empty() && years.iter().all(|&y| y >= 7)
    }

    pub fn includes_subject(&self, subject: &Subject) -> bool {
        !self
            .settings
            .exclude_subjects
            .iter()
            .any(|s| s == &subject.meta.title)
    }

    /// Write the index page and every content description page under `output`.
    #[instrument(level = "debug", skip(self, curriculum))]
    pub fn render(&self, curriculum: &Curriculum, output: &Path) -> ApplicationResult<RenderReport> {
        self.fs
            .create_dir_all(output)
            .with_path_context("create output directory", output)?;

        let mut report = RenderReport {
            index: output.join(format!("{INDEX_NAME}.md")),
            pages: Vec::new(),
        };

        for la in curriculum.learning_areas.values() {
            let folder = output.join(Self::folder_name(la));
            self.fs
                .create_dir_all(&folder)
                .with_path_context("create learning area directory", &folder)?;

            for cd in self.included_content(la) {
                let path = folder.join(format!("{}.md", cd.meta.code));
                let page = self.content_page(curriculum, cd)?;
                self.fs
                    .write(&path, &page)
                    .with_path_context("write content description page", &path)?;
                debug!("wrote {}", path.display());
                report.pages.push(path);
            }
        }

        let index = self.index_page(curriculum);
        self.fs
            .write(&report.index, &index)
            .with_path_context("write index page", &report.index)?;

        info!(
            "rendered {} content description page(s) into {}",
            report.pages.len(),
            output.display()
        );
        Ok(report)
    }

    fn included_content<'c>(
        &'c self,
        la: &'c LearningArea,
    ) -> impl Iterator<Item = &'c ContentDescription> + 'c {
        la.subjects
            .values()
            .filter(move |s| self.includes_subject(s))
            .flat_map(|s| s.year_levels.values())
            .filter(move |yl| self.includes_year_level(yl))
            .flat_map(|yl| yl.strands.values())
            .flat_map(|strand| {
                strand
                    .sub_strands
                    .values()
                    .flat_map(|sub| sub.content_descriptions.values())
                    .chain(strand.content_descriptions.values())
            })
    }

    /// The learning-area overview page.
    pub fn index_page(&self, curriculum: &Curriculum) -> String {
        let mut out = String::new();
        out.push_str("# Learning Areas\n\n");
        out.push_str("See also: [[australian-curriculum]], [[teaching]]\n\n");

        for la in curriculum.learning_areas.values() {
            let _ = write!(out, "## {}\n\n", la.meta.title);
            for subject in la.subjects.values().filter(|s| self.includes_subject(s)) {
                let _ = write!(out, "### {}\n\n", subject.meta.title);
                for yl in subject
                    .year_levels
                    .values()
                    .filter(|yl| self.includes_year_level(yl))
                {
                    self.write_year_level(&mut out, yl);
                }
            }
        }

        out.push_str(concat!(
            "\n[//begin]: # \"Autogenerated link references for markdown compatibility\"\n",
            "[australian-curriculum]: ..%2Faustralian-curriculum \"Australian Curriculum\"\n",
            "[teaching]: ..%2F..%2Fteaching \"Teaching\"\n",
            "[//end]: # \"Autogenerated link references\"\n",
        ));
        out
    }

    fn write_year_level(&self, out: &mut String, yl: &YearLevel) {
        let _ = write!(out, "#### {}\n\n", yl.meta.title);

        let description = self.strip_html(&yl.description).replace('\n', "\n\t");
        let _ = write!(out, "??? info \"Year level description\"\n\n\t{}\n\n", description);

        if let Some(standard) = &yl.achievement_standard {
            let title = standard.meta.title.replace('\n', "\n\n\t");
            let _ = write!(out, "??? info \"Achievement Standard\"\n\n\t{}\n\n", title);
            for component in standard.components.values() {
                let _ = writeln!(out, "\t - _{}_: {}", component.meta.code, component.meta.title);
            }
            out.push('\n');
        }

        for strand in yl.strands.values() {
            write_strand(out, strand);
        }
    }

    /// Page for one content description, with a breadcrumb back to the index.
    pub fn content_page(
        &self,
        curriculum: &Curriculum,
        cd: &ContentDescription,
    ) -> ApplicationResult<String> {
        let place = curriculum.place_in_hierarchy(cd)?;

        let mut see_also = format!("[[{INDEX_NAME}|Learning Areas]]");
        for linked in [&place.learning_area, &place.subject] {
            let _ = write!(see_also, " / [[{INDEX_NAME}#{linked}|{linked}]]");
        }
        let plain = [Some(&place.strand), place.sub_strand.as_ref(), Some(&place.year_level)];
        for level in plain.into_iter().flatten() {
            let _ = write!(see_also, " / {level}");
        }

        let mut out = String::new();
        let _ = write!(
            out,
            "---\ntitle: \"{}\"\ntype: \"note\"\ntags: australian-curriculum\n---\n\n",
            cd.meta.code
        );
        let _ = write!(out, "See also: {}\n\n", see_also);
        let _ = write!(out, "> {}\n\n", cd.meta.title);

        if !cd.elaborations.is_empty() {
            out.push_str("??? note \"Elaborations\"\n\n");
            for e in cd.elaborations.values() {
                let _ = writeln!(out, "\t- _{}_ - {}", e.meta.code, e.meta.title);
            }
            out.push('\n');
        }
        if !cd.achievement_standard_components.is_empty() {
            out.push_str("??? note \"Achievement Standard Components\"\n\n");
            for c in cd.achievement_standard_components.values() {
                let _ = writeln!(out, "\t- _{}_ - {}", c.meta.code, c.meta.title);
            }
            out.push('\n');
        }

        let _ = write!(
            out,
            "[//begin]: # \"Autogenerated link references for markdown compatibility\"\n\
             [{INDEX_NAME}]: ..%2F{INDEX_NAME} \"Learning Areas\"\n\
             [//end]: # \"Autogenerated link references\"\n"
        );
        Ok(out)
    }

    /// Drop HTML tags and blank lines left behind by them, then decode entities.
    fn strip_html(&self, text: &str) -> String {
        let stripped = self.html_tag.replace_all(text, "");
        let decoded = self.html_entity.replace_all(&stripped, |caps: &Captures| {
            decode_entity(&caps[1]).map_or_else(|| caps[0].to_string(), String::from)
        });
        decoded
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decode a named or numeric entity body; unknown names stay untouched.
fn decode_entity(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(c)
}

fn write_strand(out: &mut String, strand: &Strand) {
    let _ = write!(out, "##### {}\n\n", strand.meta.title);
    for sub in strand.sub_strands.values() {
        let _ = write!(out, "###### _{}_\n\n", sub.meta.title);
        write_cards(out, sub.content_descriptions.values());
    }
    if !strand.content_descriptions.is_empty() {
        write_cards(out, strand.content_descriptions.values());
    }
}

fn write_cards<'a>(out: &mut String, cds: impl Iterator<Item = &'a ContentDescription>) {
    out.push_str("<div class=\"grid cards\" markdown>\n\n");
    for cd in cds {
        let _ = write!(out, "- __[[{}]]__\n\n    {}\n\n", cd.meta.code, cd.meta.title);
    }
    out.push_str("</div>\n\n");
}
