//! Project and language identity for Wikimedia wikis.
//!
//! # Design
//! A `Project` is a plain value: the project slug plus an optional language
//! tag. The named projects (`WIKIPEDIA`, `COMMONS`, ...) are `const` values;
//! a caller wanting another language derives a copy with `with_language`
//! instead of mutating a shared instance. `commons` and `wikispecies` are
//! multilingual wikis without a language segment, so their language is
//! always `None` regardless of what the caller asks for.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{ApiError, Operation};

/// A Wikimedia project family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    Wikipedia,
    Wiktionary,
    Wikiquote,
    Wikivoyage,
    Wikinews,
    Wikibooks,
    Wikisource,
    Wikiversity,
    Commons,
    Wikispecies,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 10] = [
        ProjectKind::Wikipedia,
        ProjectKind::Wiktionary,
        ProjectKind::Wikiquote,
        ProjectKind::Wikivoyage,
        ProjectKind::Wikinews,
        ProjectKind::Wikibooks,
        ProjectKind::Wikisource,
        ProjectKind::Wikiversity,
        ProjectKind::Commons,
        ProjectKind::Wikispecies,
    ];

    /// The slug used as the project path segment.
    pub const fn name(self) -> &'static str {
        match self {
            ProjectKind::Wikipedia => "wikipedia",
            ProjectKind::Wiktionary => "wiktionary",
            ProjectKind::Wikiquote => "wikiquote",
            ProjectKind::Wikivoyage => "wikivoyage",
            ProjectKind::Wikinews => "wikinews",
            ProjectKind::Wikibooks => "wikibooks",
            ProjectKind::Wikisource => "wikisource",
            ProjectKind::Wikiversity => "wikiversity",
            ProjectKind::Commons => "commons",
            ProjectKind::Wikispecies => "wikispecies",
        }
    }

    /// Whether URLs for this project carry a language segment.
    pub const fn is_multilingual(self) -> bool {
        !matches!(self, ProjectKind::Commons | ProjectKind::Wikispecies)
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ApiError::InvalidArgument {
                operation: Operation::Configure,
                message: format!("unknown project: {s:?}"),
            })
    }
}

/// A language tag such as `en`, `de` or `zh-yue`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(Cow<'static, str>);

impl Language {
    pub const ENGLISH: Language = Language(Cow::Borrowed("en"));

    /// Validate and lowercase a language tag.
    pub fn new(tag: &str) -> Result<Self, ApiError> {
        let valid = !tag.is_empty()
            && !tag.starts_with('-')
            && !tag.ends_with('-')
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ApiError::InvalidArgument {
                operation: Operation::Configure,
                message: format!("invalid language tag: {tag:?}"),
            });
        }
        Ok(Language(Cow::Owned(tag.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::new(s)
    }
}

/// A wiki to query: a project family plus the language edition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Project {
    kind: ProjectKind,
    language: Option<Language>,
}

impl Project {
    /// A project in the default language (English), or without a language
    /// for the language-free projects.
    pub const fn new(kind: ProjectKind) -> Self {
        let language = if kind.is_multilingual() {
            Some(Language::ENGLISH)
        } else {
            None
        };
        Self { kind, language }
    }

    /// Look a project up by its slug, e.g. `"wiktionary"`.
    pub fn from_name(name: &str) -> Result<Self, ApiError> {
        Ok(Self::new(name.parse()?))
    }

    /// A copy of this project in another language. Language-free projects
    /// are returned unchanged.
    pub fn with_language(&self, language: Language) -> Self {
        Self {
            kind: self.kind,
            language: self.kind.is_multilingual().then_some(language),
        }
    }

    /// A copy of this project with the language segment dropped.
    pub fn without_language(&self) -> Self {
        Self {
            kind: self.kind,
            language: None,
        }
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(language) => write!(f, "{}/{}", self.kind, language),
            None => write!(f, "{}", self.kind),
        }
    }
}

pub const WIKIPEDIA: Project = Project::new(ProjectKind::Wikipedia);
pub const WIKTIONARY: Project = Project::new(ProjectKind::Wiktionary);
pub const WIKIQUOTE: Project = Project::new(ProjectKind::Wikiquote);
pub const WIKIVOYAGE: Project = Project::new(ProjectKind::Wikivoyage);
pub const WIKINEWS: Project = Project::new(ProjectKind::Wikinews);
pub const WIKIBOOKS: Project = Project::new(ProjectKind::Wikibooks);
pub const WIKISOURCE: Project = Project::new(ProjectKind::Wikisource);
pub const WIKIVERSITY: Project = Project::new(ProjectKind::Wikiversity);
pub const COMMONS: Project = Project::new(ProjectKind::Commons);
pub const WIKISPECIES: Project = Project::new(ProjectKind::Wikispecies);
