//! Hyperlinks to the other repository views.

use crate::error::ApiError;
use crate::render::html::Html;
use crate::types::ContentRef;
use std::io;
use url::{Position, Url};

/// Target view of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Tree,
    Plain,
    Log,
    Blame,
    Stats,
}

impl LinkKind {
    pub fn page(&self) -> &'static str {
        match self {
            LinkKind::Tree => "tree",
            LinkKind::Plain => "plain",
            LinkKind::Log => "log",
            LinkKind::Blame => "blame",
            LinkKind::Stats => "stats",
        }
    }
}

/// Request to link another view at a revision and path
#[derive(Debug, Clone, Copy)]
pub struct ViewLink<'a> {
    pub kind: LinkKind,
    pub head: &'a str,
    pub rev: &'a str,
    pub path: &'a str,
}

/// Link-building collaborator
pub trait LinkBuilder {
    /// URL of another view.
    fn view_url(&self, link: &ViewLink<'_>) -> String;

    /// URL of a pinned submodule commit, if the repository configures one.
    fn submodule_url(&self, path: &str, id: &ContentRef) -> Option<String>;
}

/// Emit `<a class='..' href='..'>label</a>` for a view link.
pub fn write_link(
    html: &mut Html<'_>,
    links: &dyn LinkBuilder,
    link: &ViewLink<'_>,
    label: &str,
    class: Option<&str>,
) -> io::Result<()> {
    html.raw("<a")?;
    if let Some(class) = class {
        html.raw(" class='")?;
        html.attr(class)?;
        html.raw("'")?;
    }
    html.raw(" href='")?;
    html.attr(&links.view_url(link))?;
    html.raw("'>")?;
    html.txt(label)?;
    html.raw("</a>")
}

/// cgit-style path URLs: `{virtual_root}{repo}/{page}/{path}?h=..&id=..`
#[derive(Debug, Clone)]
pub struct UrlLinks {
    base: Url,
    repo: String,
    default_branch: String,
    module_link: Option<String>,
}

impl UrlLinks {
    pub fn new(
        virtual_root: &str,
        repo: &str,
        default_branch: &str,
        module_link: Option<String>,
    ) -> Result<Self, ApiError> {
        let root = if virtual_root.starts_with('/') {
            virtual_root.to_string()
        } else {
            format!("/{}", virtual_root)
        };
        let base = Url::parse("http://localhost")
            .and_then(|u| u.join(&root))
            .map_err(|e| ApiError::ConfigError(format!("Invalid virtual root {:?}: {}", virtual_root, e)))?;
        Ok(UrlLinks {
            base,
            repo: repo.to_string(),
            default_branch: default_branch.to_string(),
            module_link,
        })
    }
}

impl LinkBuilder for UrlLinks {
    fn view_url(&self, link: &ViewLink<'_>) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            if !self.repo.is_empty() {
                segments.push(&self.repo);
            }
            segments.push(link.kind.page());
            segments.extend(link.path.split('/').filter(|s| !s.is_empty()));
        }

        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if !link.head.is_empty() && link.head != self.default_branch {
            pairs.push(("h", link.head));
        }
        if link.kind != LinkKind::Stats && !link.rev.is_empty() && link.rev != link.head {
            pairs.push(("id", link.rev));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url[Position::BeforePath..].to_string()
    }

    fn submodule_url(&self, path: &str, id: &ContentRef) -> Option<String> {
        self.module_link
            .as_ref()
            .map(|template| template.replace("{path}", path).replace("{id}", &id.to_hex()))
    }
}
