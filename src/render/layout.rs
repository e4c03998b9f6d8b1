//! Page layout collaborators: the chrome around a rendered fragment.

use crate::render::html::Html;
use std::io;

/// Begin/end bracketing around the rendered fragment, plus terminal error pages
pub trait PageLayout {
    fn begin(&mut self, html: &mut Html<'_>, title: &str) -> io::Result<()>;

    fn end(&mut self, html: &mut Html<'_>) -> io::Result<()>;

    fn error_page(
        &mut self,
        html: &mut Html<'_>,
        status: u16,
        title: &str,
        message: &str,
    ) -> io::Result<()>;
}

/// Minimal standalone HTML document
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    pub site_title: String,
}

impl DocumentLayout {
    pub fn new(site_title: impl Into<String>) -> Self {
        DocumentLayout {
            site_title: site_title.into(),
        }
    }

    fn head(&self, html: &mut Html<'_>, title: &str) -> io::Result<()> {
        html.raw("<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'/>\n<title>")?;
        html.txt(title)?;
        if !self.site_title.is_empty() {
            html.raw(" - ")?;
            html.txt(&self.site_title)?;
        }
        html.raw("</title>\n</head>\n<body>\n<div class='content'>")
    }
}

impl PageLayout for DocumentLayout {
    fn begin(&mut self, html: &mut Html<'_>, title: &str) -> io::Result<()> {
        self.head(html, title)
    }

    fn end(&mut self, html: &mut Html<'_>) -> io::Result<()> {
        html.raw("</div> <!-- class=content -->\n</body>\n</html>\n")
    }

    fn error_page(
        &mut self,
        html: &mut Html<'_>,
        status: u16,
        title: &str,
        message: &str,
    ) -> io::Result<()> {
        self.head(html, &format!("{} {}", status, title))?;
        html.raw("<div class='error'>")?;
        html.txt(message)?;
        html.raw("</div>\n")?;
        self.end(html)
    }
}

/// No chrome at all; for embedding the fragment into a caller's page
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentLayout;

impl PageLayout for FragmentLayout {
    fn begin(&mut self, _html: &mut Html<'_>, _title: &str) -> io::Result<()> {
        Ok(())
    }

    fn end(&mut self, _html: &mut Html<'_>) -> io::Result<()> {
        Ok(())
    }

    fn error_page(
        &mut self,
        html: &mut Html<'_>,
        _status: u16,
        _title: &str,
        message: &str,
    ) -> io::Result<()> {
        html.raw("<div class='error'>")?;
        html.txt(message)?;
        html.raw("</div>\n")
    }
}
