//! Version pull request description.
//!
//! The body lists one `## name@version` section per changed package. When it
//! does not fit in `max_chars`, sections lose their changelog excerpt from the
//! lowest priority upwards, and only when every section is collapsed is the
//! text cut off.

use release_core::BumpType;
use release_project::DEFAULT_PR_BODY_MAX_CHARS;

use super::package_diff::ChangedPackage;

const TRUNCATION_MARKER: &str = "\n\n...\n\n_Description truncated to fit the pull request size limit._";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrBody {
    pub text: String,
    /// Sections whose changelog excerpt was replaced by a pointer.
    pub collapsed: usize,
    /// Set when the body still did not fit after collapsing every section.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct PrBodyBuilder {
    base_branch: String,
    max_chars: usize,
    pre_release: bool,
    changelog_url_base: Option<String>,
}

impl PrBodyBuilder {
    #[must_use]
    pub fn new(base_branch: impl Into<String>) -> Self {
        Self {
            base_branch: base_branch.into(),
            max_chars: DEFAULT_PR_BODY_MAX_CHARS,
            pre_release: false,
            changelog_url_base: None,
        }
    }

    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Adds the warning that the base branch is in pre-release mode.
    #[must_use]
    pub fn with_pre_release(mut self, pre_release: bool) -> Self {
        self.pre_release = pre_release;
        self
    }

    /// URL prefix for changelog links, e.g.
    /// `https://github.com/acme/monorepo/blob/changeset-release/main`.
    /// Without it, collapsed sections name the file path instead.
    #[must_use]
    pub fn with_changelog_url_base(mut self, base: Option<String>) -> Self {
        self.changelog_url_base = base.map(|b| b.trim_end_matches('/').to_string());
        self
    }

    #[must_use]
    pub fn build(&self, packages: &[ChangedPackage]) -> PrBody {
        let sections: Vec<Section> = sort_by_priority(packages)
            .into_iter()
            .map(|pkg| self.section(pkg))
            .collect();

        let preamble = self.preamble();

        for collapse_from in (0..=sections.len()).rev() {
            let text = render(&preamble, &sections, collapse_from);
            if char_len(&text) <= self.max_chars {
                return PrBody {
                    text,
                    collapsed: sections[collapse_from..]
                        .iter()
                        .filter(|s| s.collapses())
                        .count(),
                    truncated: false,
                };
            }
        }

        let text = render(&preamble, &sections, 0);
        PrBody {
            text: truncate(&text, self.max_chars),
            collapsed: sections.iter().filter(|s| s.collapses()).count(),
            truncated: true,
        }
    }

    fn preamble(&self) -> String {
        let mut preamble = format!(
            "This PR was opened by changeset-release. When you're ready to do a release, \
             you can merge this and the packages will be published automatically. If you're \
             not ready to do a release yet, that's fine, whenever you add more changesets to \
             `{}`, this PR will be updated.\n",
            self.base_branch
        );

        if self.pre_release {
            preamble.push_str(&format!(
                "\n> [!WARNING]\n> `{}` is currently in **pre mode** so this branch has \
                 prereleases rather than normal releases. To exit pre mode, set \
                 `mode = \"exit\"` in `pre.toml` in the changeset directory on `{}`.\n",
                self.base_branch, self.base_branch
            ));
        }

        preamble.push_str("\n# Releases\n");
        preamble
    }

    fn section(&self, pkg: &ChangedPackage) -> Section {
        let heading = format!("## {}@{}", pkg.name, pkg.new_version);

        let detail = pkg
            .changelog
            .as_ref()
            .map(|entry| entry.content.trim())
            .filter(|content| !content.is_empty())
            .map(str::to_string);

        let path = pkg.changelog_path();
        let pointer = match &self.changelog_url_base {
            Some(base) => format!("See the [changelog]({base}/{path}) for details."),
            None => format!("See `{path}` for details."),
        };

        Section {
            heading,
            detail,
            pointer,
        }
    }
}

struct Section {
    heading: String,
    detail: Option<String>,
    pointer: String,
}

impl Section {
    /// Whether the pointer is shorter than the excerpt it replaces.
    fn collapses(&self) -> bool {
        self.detail
            .as_ref()
            .is_some_and(|detail| char_len(detail) > char_len(&self.pointer))
    }

    fn render(&self, collapsed: bool) -> String {
        match &self.detail {
            Some(_) if collapsed && self.collapses() => {
                format!("{}\n\n{}", self.heading, self.pointer)
            }
            Some(detail) => format!("{}\n\n{detail}", self.heading),
            None => self.heading.clone(),
        }
    }
}

/// Publishable packages first, then by the highest bump named in the
/// changelog entry, then by name. Sections are collapsed from the end, so
/// major releases keep their detail longest.
fn sort_by_priority(packages: &[ChangedPackage]) -> Vec<&ChangedPackage> {
    let mut sorted: Vec<&ChangedPackage> = packages.iter().collect();
    sorted.sort_by(|a, b| {
        b.publishable
            .cmp(&a.publishable)
            .then_with(|| highest_level(b).cmp(&highest_level(a)))
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

fn highest_level(pkg: &ChangedPackage) -> Option<BumpType> {
    pkg.changelog.as_ref().and_then(|entry| entry.highest_level)
}

/// Sections at `collapse_from` and after are rendered without their detail.
fn render(preamble: &str, sections: &[Section], collapse_from: usize) -> String {
    let rendered: Vec<String> = sections
        .iter()
        .enumerate()
        .map(|(i, s)| s.render(i >= collapse_from))
        .collect();

    let mut text = preamble.to_string();
    if !rendered.is_empty() {
        text.push('\n');
        text.push_str(&rendered.join("\n\n"));
        text.push('\n');
    }
    text
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(idx, _)| &s[..idx])
}

fn truncate(text: &str, max_chars: usize) -> String {
    let marker_len = char_len(TRUNCATION_MARKER);
    if max_chars <= marker_len {
        return take_chars(text, max_chars).to_string();
    }

    let mut out = take_chars(text, max_chars - marker_len).to_string();
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_changelog::ChangelogEntry;

    fn package(name: &str, version: &str, changelog: Option<&str>) -> ChangedPackage {
        ChangedPackage {
            name: name.to_string(),
            old_version: Some("1.0.0".to_string()),
            new_version: version.to_string(),
            relative_dir: format!("crates/{name}"),
            publishable: true,
            changelog: changelog.map(ChangelogEntry::new),
        }
    }

    #[test]
    fn lists_every_package_with_changelog() {
        let packages = vec![
            package("pkg-a", "1.1.0", Some("### Minor Changes\n\n- Add widgets")),
            package("pkg-b", "2.0.1", Some("### Patch Changes\n\n- Fix gears")),
        ];

        let body = PrBodyBuilder::new("main").build(&packages);

        assert!(!body.truncated);
        assert_eq!(body.collapsed, 0);
        assert!(body.text.contains("`main`"));
        assert!(body.text.contains("# Releases"));
        assert!(body.text.contains("## pkg-a@1.1.0\n\n### Minor Changes\n\n- Add widgets"));
        assert!(body.text.contains("## pkg-b@2.0.1\n\n### Patch Changes\n\n- Fix gears"));
        assert!(!body.text.contains("pre mode"));
    }

    #[test]
    fn publishable_packages_come_first_then_alphabetical() {
        let mut private = package("aaa-internal", "0.2.0", None);
        private.publishable = false;
        let packages = vec![
            package("zeta", "1.0.1", None),
            private,
            package("alpha", "3.0.0", None),
        ];

        let text = PrBodyBuilder::new("main").build(&packages).text;

        let alpha = text.find("## alpha@").expect("alpha listed");
        let zeta = text.find("## zeta@").expect("zeta listed");
        let internal = text.find("## aaa-internal@").expect("internal listed");
        assert!(alpha < zeta);
        assert!(zeta < internal);
    }

    #[test]
    fn larger_bumps_come_before_smaller_ones() {
        let mut major = package("zeta", "2.0.0", Some("- Break things"));
        major.changelog = major
            .changelog
            .map(|entry| entry.with_highest_level(BumpType::Major));
        let mut patch = package("alpha", "1.0.1", Some("- Fix things"));
        patch.changelog = patch
            .changelog
            .map(|entry| entry.with_highest_level(BumpType::Patch));
        let unknown = package("aaa", "1.1.0", None);

        let text = PrBodyBuilder::new("main")
            .build(&[unknown, patch, major])
            .text;

        let zeta = text.find("## zeta@").expect("zeta listed");
        let alpha = text.find("## alpha@").expect("alpha listed");
        let aaa = text.find("## aaa@").expect("aaa listed");
        assert!(zeta < alpha);
        assert!(alpha < aaa);
    }

    #[test]
    fn missing_changelog_leaves_bare_heading() {
        let body = PrBodyBuilder::new("main").build(&[package("pkg-a", "1.1.0", None)]);

        assert!(body.text.ends_with("## pkg-a@1.1.0\n"));
    }

    #[test]
    fn pre_release_adds_warning() {
        let body = PrBodyBuilder::new("develop")
            .with_pre_release(true)
            .build(&[package("pkg-a", "2.0.0-beta.0", None)]);

        assert!(body.text.contains("`develop` is currently in **pre mode**"));
    }

    #[test]
    fn build_is_deterministic() {
        let packages = vec![
            package("pkg-b", "2.0.1", Some("- b")),
            package("pkg-a", "1.1.0", Some("- a")),
        ];
        let builder = PrBodyBuilder::new("main").with_max_chars(400);

        assert_eq!(builder.build(&packages), builder.build(&packages));
    }

    #[test]
    fn oversized_body_collapses_lowest_priority_first() {
        let long = "- change\n".repeat(50);
        let packages = vec![
            package("pkg-a", "1.1.0", Some(&long)),
            package("pkg-b", "2.0.1", Some(&long)),
        ];
        let full = PrBodyBuilder::new("main").build(&packages).text;
        let max = char_len(&full) - 100;

        let body = PrBodyBuilder::new("main")
            .with_max_chars(max)
            .with_changelog_url_base(Some(
                "https://github.com/acme/monorepo/blob/changeset-release/main/".to_string(),
            ))
            .build(&packages);

        assert!(!body.truncated);
        assert_eq!(body.collapsed, 1);
        assert!(char_len(&body.text) <= max);
        assert!(body.text.contains("## pkg-a@1.1.0\n\n- change"));
        assert!(body.text.contains(
            "## pkg-b@2.0.1\n\nSee the [changelog](https://github.com/acme/monorepo/blob/changeset-release/main/crates/pkg-b/CHANGELOG.md) for details."
        ));
    }

    #[test]
    fn collapsing_keeps_every_package_name() {
        let long = "- detail line\n".repeat(200);
        let packages: Vec<_> = (0..10)
            .map(|i| package(&format!("pkg-{i}"), "1.0.1", Some(&long)))
            .collect();

        let body = PrBodyBuilder::new("main").with_max_chars(2_000).build(&packages);

        assert!(!body.truncated);
        assert!(char_len(&body.text) <= 2_000);
        for i in 0..10 {
            assert!(body.text.contains(&format!("## pkg-{i}@1.0.1")));
        }
    }

    #[test]
    fn hard_truncates_when_collapsing_is_not_enough() {
        let packages: Vec<_> = (0..50)
            .map(|i| package(&format!("package-with-a-long-name-{i}"), "1.0.1", Some("- x")))
            .collect();

        let body = PrBodyBuilder::new("main").with_max_chars(600).build(&packages);

        assert!(body.truncated);
        assert_eq!(char_len(&body.text), 600);
        assert!(body.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ééééé";

        assert_eq!(take_chars(text, 2), "éé");
        assert_eq!(truncate(text, 3), "ééé");
    }
}
