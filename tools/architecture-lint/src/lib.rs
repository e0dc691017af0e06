//! Boundary lint for the attendance backend.
//!
//! Two rules are checked over the `domain` and `outbound` trees of
//! `backend/src`:
//!
//! - [`Rule::Layering`]: `domain` never names `outbound`, the crate-root
//!   `config` module or a configuration crate (`clap`, `ortho_config`).
//!   `outbound` may use `domain` but never `config` or a configuration crate.
//! - [`Rule::PairedLinkEdit`]: the crate-private methods that edit one side
//!   of a course link (`add_student`, `attach_course`, `assign_lecturer`
//!   and friends) are only called from `domain/enrollment.rs` and
//!   `domain/reconciliation.rs`, which always edit both sides together.
//!   Test code is exempt: `tests.rs` and `*_tests.rs` files as well as
//!   `#[cfg(test)]` items.
//!
//! Run it with `cargo run -p architecture-lint [CRATE_DIR]`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};

/// Library name of the linted crate, as written in absolute paths.
const CRATE_NAME: &str = "attendance";

/// Crates that only the configuration layer may use.
const CONFIGURATION_CRATES: [&str; 2] = ["clap", "ortho_config"];

/// Methods that change one side of a course link.
const ONE_SIDED_LINK_EDITS: [&str; 8] = [
    "add_student",
    "remove_student",
    "assign_department",
    "assign_lecturer",
    "attach_course",
    "detach_course",
    "enroll_in",
    "unenroll_from",
];

/// Modules allowed to call [`ONE_SIDED_LINK_EDITS`].
const LINK_EDIT_OWNERS: [&str; 2] = ["domain/enrollment.rs", "domain/reconciliation.rs"];

/// Which rule a [`Violation`] breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    /// A layer names a module or crate it must not depend on.
    Layering,
    /// A one-sided link edit outside the modules that pair them.
    PairedLinkEdit,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Layering => "layering",
            Self::PairedLinkEdit => "paired-link-edit",
        })
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Broken rule.
    pub rule: Rule,
    /// What was found.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.file.display(), self.rule, self.message)
    }
}

/// Failure modes returned by the lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Reading the source tree failed.
    Io(io::Error),
    /// A file is not under `domain/` or `outbound/`.
    UnknownLayer {
        /// Offending path relative to `backend/src`.
        file: PathBuf,
    },
    /// A file is not valid Rust.
    Parse {
        /// Offending path relative to `backend/src`.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// The sources break one or more rules.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read backend sources: {err}"),
            Self::UnknownLayer { file } => write!(
                f,
                "{} is outside the domain and outbound layers",
                file.display()
            ),
            Self::Parse { file, message } => {
                write!(f, "cannot parse {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "  {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Lint the `domain` and `outbound` sources of the crate in `crate_dir`.
pub fn lint_backend_sources(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let sources = read_layer_sources(&crate_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint in-memory sources.
///
/// Violations from every file are gathered and reported together, sorted by
/// file and rule.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = BTreeSet::new();
    for source in sources {
        let location = Location::of(&source.file)?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        let mut references = References::default();
        references.visit_file(&parsed);
        violations.extend(check_layering(&location, &references));
        violations.extend(check_paired_link_edits(&location, &references));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(
            violations.into_iter().collect(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Outbound,
}

impl Layer {
    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
        }
    }

    fn forbids_module(self, module: &str) -> bool {
        match self {
            Self::Domain => matches!(module, "outbound" | "config"),
            Self::Outbound => module == "config",
        }
    }
}

/// Where a source file sits and whether it only holds test code.
struct Location<'a> {
    file: &'a Path,
    layer: Layer,
    test_only: bool,
}

impl<'a> Location<'a> {
    fn of(file: &'a Path) -> Result<Self, ArchitectureLintError> {
        let layer = match file.iter().next().and_then(|root| root.to_str()) {
            Some("domain") => Layer::Domain,
            Some("outbound") => Layer::Outbound,
            _ => {
                return Err(ArchitectureLintError::UnknownLayer {
                    file: file.to_path_buf(),
                });
            }
        };
        let stem = file.file_stem().and_then(|stem| stem.to_str()).unwrap_or("");
        let in_tests_dir = file.iter().any(|part| part == "tests");
        Ok(Self {
            file,
            layer,
            test_only: in_tests_dir || stem == "tests" || stem.ends_with("_tests"),
        })
    }

    fn owns_link_edits(&self) -> bool {
        LINK_EDIT_OWNERS
            .iter()
            .any(|owner| self.file == Path::new(owner))
    }

    fn violation(&self, rule: Rule, message: String) -> Violation {
        Violation {
            file: self.file.to_path_buf(),
            rule,
            message,
        }
    }
}

/// What a path refers to, judged from its leading segments.
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    /// A top-level module of the linted crate.
    Module(&'a str),
    /// An external crate, or a local item the lint cannot tell apart.
    Crate(&'a str),
}

fn target(segments: &[String]) -> Option<Target<'_>> {
    let mut iter = segments.iter().map(String::as_str);
    let first = iter.next()?;
    match first {
        "crate" | "self" | "super" => iter
            .find(|segment| !matches!(*segment, "self" | "super"))
            .map(Target::Module),
        CRATE_NAME => iter.next().map(Target::Module),
        "domain" | "outbound" => Some(Target::Module(first)),
        _ => Some(Target::Crate(first)),
    }
}

fn check_layering(location: &Location<'_>, references: &References) -> Vec<Violation> {
    let layer = location.layer;
    let mut messages = BTreeSet::new();
    for segments in &references.paths {
        match target(segments) {
            Some(Target::Module(module)) if layer.forbids_module(module) => {
                messages.insert(format!(
                    "{} must not depend on crate::{module}",
                    layer.name()
                ));
            }
            Some(Target::Crate(name)) if CONFIGURATION_CRATES.contains(&name) => {
                messages.insert(format!(
                    "{} must not depend on external crate `{name}`",
                    layer.name()
                ));
            }
            _ => {}
        }
    }
    messages
        .into_iter()
        .map(|message| location.violation(Rule::Layering, message))
        .collect()
}

fn check_paired_link_edits(location: &Location<'_>, references: &References) -> Vec<Violation> {
    if location.test_only || location.owns_link_edits() {
        return Vec::new();
    }
    let via_paths = references
        .paths
        .iter()
        .filter(|segments| segments.len() > 1)
        .filter_map(|segments| segments.last());
    references
        .method_calls
        .iter()
        .chain(via_paths)
        .filter(|name| ONE_SIDED_LINK_EDITS.contains(&name.as_str()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|name| {
            location.violation(
                Rule::PairedLinkEdit,
                format!(
                    "`{name}` edits one side of a course link; go through enrollment or reconciliation"
                ),
            )
        })
        .collect()
}

/// Paths and method names named by non-test code in one file.
#[derive(Default)]
struct References {
    paths: BTreeSet<Vec<String>>,
    method_calls: BTreeSet<String>,
}

impl References {
    fn add_use_tree(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.add_use_tree(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                let mut full = prefix.clone();
                full.push(ident.to_string());
                self.paths.insert(full);
            }
            syn::UseTree::Glob(_) => {
                let mut full = prefix.clone();
                full.push("*".to_owned());
                self.paths.insert(full);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.add_use_tree(item, prefix);
                }
            }
        }
    }
}

fn is_test_only(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|predicate| predicate == "test")
    })
}

impl<'ast> Visit<'ast> for References {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_test_only(&node.attrs) {
            visit::visit_item_mod(self, node);
        }
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if !is_test_only(&node.attrs) {
            visit::visit_item_fn(self, node);
        }
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        if !is_test_only(&node.attrs) {
            self.add_use_tree(&node.tree, &mut Vec::new());
        }
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        visit::visit_path(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        self.method_calls.insert(node.method.to_string());
        visit::visit_expr_method_call(self, node);
    }
}

/// Read every `.rs` file under `src/domain` and `src/outbound`.
fn read_layer_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending: Vec<PathBuf> = ["domain", "outbound"]
        .iter()
        .map(|layer| src_dir.join(layer))
        .filter(|dir| dir.is_dir())
        .collect();
    let mut sources = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let file = path
                    .strip_prefix(src_dir)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| path.clone());
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }
    sources.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(sources)
}

#[cfg(test)]
mod tests;
